pub mod credential;
pub mod error;
pub mod fetch;
pub mod nonce;

pub use credential::{Credential, ForwardedAuthorization};
