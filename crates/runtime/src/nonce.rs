use std::sync::Arc;

use crate::Credential;

/// Covers unknown, already redeemed and expired access codes alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("access code not found")]
pub struct NonceNotFound;

/// One-time access codes standing in for a credential in redirect URLs.
///
/// A code moves from issued to either redeemed or expired, nothing else. Redemption must be atomic:
/// out of any number of concurrent attempts for the same code, exactly one gets the credential.
pub trait NonceStoreInner: Send + Sync {
    fn issue(&self, credential: Credential) -> String;

    fn redeem(&self, nonce: &str) -> Result<Credential, NonceNotFound>;
}

#[derive(Clone)]
pub struct NonceStore(Arc<dyn NonceStoreInner>);

impl NonceStore {
    pub fn new(inner: impl NonceStoreInner + 'static) -> Self {
        Self(Arc::new(inner))
    }
}

impl std::ops::Deref for NonceStore {
    type Target = dyn NonceStoreInner;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
