use std::fmt;

use http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

/// Bearer token handed out by the upstream API. Never printed, never persisted.
pub struct Credential(SecretString);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(SecretString::new(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// The `authorization` header of the incoming request, passed along to the upstream API as-is.
#[derive(Default)]
pub struct ForwardedAuthorization(Option<SecretString>);

impl ForwardedAuthorization {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let value = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| SecretString::new(value.to_string()));

        ForwardedAuthorization(value)
    }

    pub fn bearer(credential: &Credential) -> Self {
        ForwardedAuthorization(Some(SecretString::new(format!("Bearer {}", credential.expose()))))
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Header value for the upstream request, empty when the caller sent none.
    pub(crate) fn header_value(&self) -> HeaderValue {
        let mut value = self
            .0
            .as_ref()
            .and_then(|value| HeaderValue::from_str(value.expose_secret()).ok())
            .unwrap_or_else(|| HeaderValue::from_static(""));

        value.set_sensitive(true);
        value
    }
}

impl fmt::Debug for ForwardedAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("ForwardedAuthorization([REDACTED])"),
            None => f.write_str("ForwardedAuthorization(None)"),
        }
    }
}
