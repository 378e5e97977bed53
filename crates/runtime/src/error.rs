use std::{borrow::Cow, fmt};

use field_transcoder::TranscodeError;
use graphql_cursor::PaginationError;

use crate::{fetch::FetchError, nonce::NonceNotFound};

/// Error codes exposed in the `extensions.code` of GraphQL errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PartialErrorCode {
    UpstreamUnavailable,
    UpstreamRejected,
    InvalidCursor,
    NonceNotFound,
    TranscodeAmbiguous,
    InternalServerError,
}

/// User facing error, turned into a GraphQL error by the server.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialGraphqlError {
    pub message: Cow<'static, str>,
    pub code: PartialErrorCode,
    /// Will be serialized as a map, but we store it as a Vec for efficiency
    pub extensions: Vec<(Cow<'static, str>, serde_json::Value)>,
}

impl PartialGraphqlError {
    pub fn new(message: impl Into<Cow<'static, str>>, code: PartialErrorCode) -> Self {
        PartialGraphqlError {
            message: message.into(),
            code,
            extensions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions.push((key.into(), value.into()));
        self
    }

    pub fn internal_server_error() -> Self {
        PartialGraphqlError::new("Internal server error", PartialErrorCode::InternalServerError)
    }

    /// The same answer for every failed login, whatever the upstream said.
    pub fn login_failed() -> Self {
        PartialGraphqlError::new("Failed to login", PartialErrorCode::UpstreamRejected)
    }
}

impl fmt::Display for PartialGraphqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl From<FetchError> for PartialGraphqlError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::UpstreamUnavailable(_) => {
                PartialGraphqlError::new("Upstream API is unavailable", PartialErrorCode::UpstreamUnavailable)
            }
            FetchError::UpstreamRejected { status, body } => PartialGraphqlError::new(
                format!("Upstream API responded with status {}", status.as_u16()),
                PartialErrorCode::UpstreamRejected,
            )
            .with_extension("status", status.as_u16())
            .with_extension("body", body),
            FetchError::Transcode(error) => PartialGraphqlError::from(error),
            FetchError::InvalidRequest(error) | FetchError::InvalidResponse(error) => {
                tracing::error!("upstream exchange failed: {error}");
                PartialGraphqlError::internal_server_error()
            }
        }
    }
}

impl From<TranscodeError> for PartialGraphqlError {
    fn from(error: TranscodeError) -> Self {
        PartialGraphqlError::new(error.to_string(), PartialErrorCode::TranscodeAmbiguous)
    }
}

impl From<PaginationError> for PartialGraphqlError {
    fn from(error: PaginationError) -> Self {
        PartialGraphqlError::new(error.to_string(), PartialErrorCode::InvalidCursor)
    }
}

impl From<NonceNotFound> for PartialGraphqlError {
    fn from(_: NonceNotFound) -> Self {
        PartialGraphqlError::new("Incorrect access code.", PartialErrorCode::NonceNotFound)
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use serde_json::json;

    use super::*;

    #[test]
    fn rejection_keeps_status_and_body() {
        let error = PartialGraphqlError::from(FetchError::UpstreamRejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        });

        assert_eq!(PartialErrorCode::UpstreamRejected, error.code);
        assert_eq!("Upstream API responded with status 500", error.to_string());
        let expected: Vec<(Cow<'static, str>, serde_json::Value)> =
            vec![("status".into(), json!(500)), ("body".into(), json!("boom"))];

        assert_eq!(expected, error.extensions);
    }

    #[test]
    fn failed_logins_carry_no_upstream_details() {
        let error = PartialGraphqlError::login_failed();

        assert_eq!("Failed to login", error.to_string());
        assert_eq!(PartialErrorCode::UpstreamRejected, error.code);
        assert!(error.extensions.is_empty());
    }

    #[test]
    fn codes_are_screaming_snake_case() {
        assert_eq!("UPSTREAM_REJECTED", PartialErrorCode::UpstreamRejected.to_string());
        assert_eq!("INVALID_CURSOR", PartialErrorCode::InvalidCursor.to_string());
        assert_eq!("TRANSCODE_AMBIGUOUS", PartialErrorCode::TranscodeAmbiguous.to_string());
    }

    #[test]
    fn transport_details_stay_internal() {
        let error = PartialGraphqlError::from(FetchError::unavailable("connection refused (os error 111)"));

        assert_eq!("Upstream API is unavailable", error.to_string());
        assert!(error.extensions.is_empty());
    }
}
