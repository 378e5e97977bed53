use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use rand::{rngs::OsRng, RngCore};
use runtime::{
    nonce::{NonceNotFound, NonceStoreInner},
    Credential,
};

const NONCE_BYTES: usize = 64;

struct NonceEntry {
    credential: Credential,
    issued_at: Instant,
}

/// Process-local access code store. Codes do not survive a restart and are not shared between
/// gateway instances.
pub struct InMemoryNonceStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, NonceEntry>>,
}

impl InMemoryNonceStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of codes that can still be redeemed.
    pub fn pending(&self) -> usize {
        let mut entries = self.lock();
        self.sweep(&mut entries);
        entries.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, NonceEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sweep(&self, entries: &mut HashMap<String, NonceEntry>) {
        let before = entries.len();
        entries.retain(|_, entry| entry.issued_at.elapsed() < self.ttl);

        let expired = before - entries.len();
        if expired > 0 {
            tracing::debug!("dropped {expired} expired access codes");
        }
    }
}

impl NonceStoreInner for InMemoryNonceStore {
    fn issue(&self, credential: Credential) -> String {
        let mut bytes = [0u8; NONCE_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let nonce = hex::encode(bytes);

        let mut entries = self.lock();
        self.sweep(&mut entries);

        entries.insert(
            nonce.clone(),
            NonceEntry {
                credential,
                issued_at: Instant::now(),
            },
        );

        nonce
    }

    fn redeem(&self, nonce: &str) -> Result<Credential, NonceNotFound> {
        let mut entries = self.lock();
        self.sweep(&mut entries);

        entries
            .remove(nonce)
            .map(|entry| entry.credential)
            .ok_or(NonceNotFound)
    }
}
