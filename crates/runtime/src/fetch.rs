use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use field_transcoder::{FieldMapping, TranscodeError};
use http::{
    header::{ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE},
    HeaderMap, HeaderValue, Method, StatusCode,
};
use serde_json::Value;
use url::Url;

use crate::ForwardedAuthorization;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The upstream API could not be reached, or the connection broke mid-request.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("upstream responded with status {status}")]
    UpstreamRejected { status: StatusCode, body: String },
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    pub fn unavailable(error: impl ToString) -> Self {
        FetchError::UpstreamUnavailable(error.to_string())
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// A fully prepared request, as it goes over the wire.
pub struct FetchRequest<'a> {
    pub url: &'a Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

pub struct FetchResponse {
    pub status: StatusCode,
    pub bytes: Bytes,
}

#[async_trait::async_trait]
pub trait FetcherInner: Send + Sync {
    async fn fetch(&self, request: FetchRequest<'_>) -> FetchResult<FetchResponse>;
}

/// Request body in the gateway's field naming. Converted to upstream names before encoding.
pub enum UpstreamBody {
    Json(Value),
    Form(Value),
}

/// A call to `<upstream>/<resource>[/<id>]`.
pub struct UpstreamRequest<'a> {
    pub resource: &'a str,
    pub id: Option<&'a str>,
    pub method: Method,
    /// Applied on top of the base headers. The authorization header always comes from the caller.
    pub headers: HeaderMap,
    pub body: Option<UpstreamBody>,
    pub authorization: &'a ForwardedAuthorization,
    pub fields: &'static FieldMapping,
}

impl<'a> UpstreamRequest<'a> {
    pub fn new(
        method: Method,
        resource: &'a str,
        authorization: &'a ForwardedAuthorization,
        fields: &'static FieldMapping,
    ) -> Self {
        UpstreamRequest {
            resource,
            id: None,
            method,
            headers: HeaderMap::new(),
            body: None,
            authorization,
            fields,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: UpstreamBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// A successful upstream response. The body is only reachable in the gateway's field naming.
#[derive(Debug)]
pub struct UpstreamResponse {
    status: StatusCode,
    bytes: Bytes,
    fields: &'static FieldMapping,
}

impl UpstreamResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The decoded body with external field names. An empty body reads as `null`.
    pub fn json(&self) -> FetchResult<Value> {
        if self.bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        let value: Value =
            serde_json::from_slice(&self.bytes).map_err(|error| FetchError::InvalidResponse(error.to_string()))?;

        self.fields.to_external(value).map_err(|error| {
            tracing::warn!(%error, "upstream response contains a field that cannot be renamed");
            FetchError::from(error)
        })
    }

    pub fn json_as<T: serde::de::DeserializeOwned>(&self) -> FetchResult<T> {
        serde_json::from_value(self.json()?).map_err(|error| FetchError::InvalidResponse(error.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub base_url: Url,
    pub accept_language: String,
    pub timeout: Option<Duration>,
}

/// The single path to the upstream API.
///
/// Adds the base headers and the caller's authorization, renames fields in both directions, and
/// turns non-2xx statuses into [`FetchError::UpstreamRejected`]. Never retries.
#[derive(Clone)]
pub struct Fetcher {
    inner: Arc<dyn FetcherInner>,
    base_url: Url,
    base_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl Fetcher {
    pub fn new(fetcher: impl FetcherInner + 'static, settings: UpstreamSettings) -> FetchResult<Fetcher> {
        if settings.base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidRequest(format!(
                "`{}` cannot be used as the upstream base url",
                settings.base_url
            )));
        }

        let accept_language = HeaderValue::from_str(&settings.accept_language)
            .map_err(|error| FetchError::InvalidRequest(format!("invalid accept-language: {error}")))?;

        let mut base_headers = HeaderMap::new();
        base_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        base_headers.insert(ACCEPT_LANGUAGE, accept_language);

        Ok(Fetcher {
            inner: Arc::new(fetcher),
            base_url: settings.base_url,
            base_headers,
            timeout: settings.timeout,
        })
    }

    pub async fn request(&self, request: UpstreamRequest<'_>) -> FetchResult<UpstreamResponse> {
        let UpstreamRequest {
            resource,
            id,
            method,
            headers,
            body,
            authorization,
            fields,
        } = request;

        let url = self.url(resource, id)?;

        let mut request_headers = self.base_headers.clone();
        request_headers.extend(headers);
        request_headers.insert(AUTHORIZATION, authorization.header_value());

        let body = match body {
            Some(body) => {
                let (content_type, bytes) = encode_body(body, fields)?;
                request_headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                Some(bytes)
            }
            None => None,
        };

        tracing::debug!(%method, %url, "sending upstream request");

        let execution = self.inner.fetch(FetchRequest {
            url: &url,
            method: method.clone(),
            headers: request_headers,
            body,
        });

        let response = match self.timeout {
            Some(timeout) => {
                let timeout = async {
                    tokio::time::sleep(timeout).await;
                    Err(FetchError::UpstreamUnavailable(format!(
                        "request to `{resource}` timed out"
                    )))
                };

                tokio::select! {
                    result = timeout => { result }
                    result = execution => { result }
                }
            }
            None => execution.await,
        }?;

        if !response.status.is_success() {
            tracing::warn!(%method, %url, status = response.status.as_u16(), "upstream rejected the request");

            return Err(FetchError::UpstreamRejected {
                status: response.status,
                body: String::from_utf8_lossy(&response.bytes).into_owned(),
            });
        }

        Ok(UpstreamResponse {
            status: response.status,
            bytes: response.bytes,
            fields,
        })
    }

    fn url(&self, resource: &str, id: Option<&str>) -> FetchResult<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidRequest("upstream url cannot be a base".into()))?
            .pop_if_empty()
            .push(resource)
            .extend(id);

        Ok(url)
    }
}

fn encode_body(body: UpstreamBody, fields: &FieldMapping) -> FetchResult<(&'static str, Bytes)> {
    let to_upstream = |value: Value| {
        fields.to_upstream(value).map_err(|error| {
            tracing::warn!(%error, "request body contains a field that cannot be renamed");
            FetchError::from(error)
        })
    };

    match body {
        UpstreamBody::Json(value) => {
            let value = to_upstream(value)?;
            let bytes = serde_json::to_vec(&value).map_err(|error| FetchError::InvalidRequest(error.to_string()))?;

            Ok(("application/json", bytes.into()))
        }
        UpstreamBody::Form(value) => {
            let value = to_upstream(value)?;
            let encoded =
                serde_urlencoded::to_string(&value).map_err(|error| FetchError::InvalidRequest(error.to_string()))?;

            Ok(("application/x-www-form-urlencoded", encoded.into()))
        }
    }
}
