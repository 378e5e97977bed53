mod fetch;
mod nonce;

pub use fetch::NativeFetcher;
pub use nonce::InMemoryNonceStore;
