use std::time::Duration;

use duration_str::deserialize_option_duration;
use http::{HeaderName, HeaderValue};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, ExposeHeaders};
use url::Url;

#[derive(Clone, Default, Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// If false (or not defined), credentials are not allowed in requests
    pub allow_credentials: bool,
    /// Origins from which we allow requests. Any origin when not set.
    pub allow_origins: Option<AnyOrUrlArray>,
    /// Maximum time between OPTIONS and the next request
    #[serde(deserialize_with = "deserialize_option_duration")]
    pub max_age: Option<Duration>,
    /// HTTP methods allowed to the endpoint.
    pub allow_methods: Option<AnyOrHttpMethodArray>,
    /// Headers allowed in incoming requests. Defaults to the headers a browser form or a
    /// GraphQL client sends.
    pub allow_headers: Option<AnyOrHeaderArray>,
    /// Headers exposed from the OPTIONS request
    pub expose_headers: Option<AnyOrHeaderArray>,
}

#[derive(Debug, PartialEq, Clone, Copy, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl From<HttpMethod> for http::Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Head => http::Method::HEAD,
            HttpMethod::Options => http::Method::OPTIONS,
            HttpMethod::Patch => http::Method::PATCH,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[serde(expecting = "expecting string \"any\", or an array of urls")]
pub enum AnyOrUrlArray {
    Any,
    #[serde(untagged)]
    Explicit(Vec<Url>),
}

impl From<AnyOrUrlArray> for AllowOrigin {
    fn from(value: AnyOrUrlArray) -> Self {
        match value {
            AnyOrUrlArray::Any => AllowOrigin::any(),
            AnyOrUrlArray::Explicit(ref origins) => {
                // A parsed url is always ascii, so nothing is lost here.
                let origins = origins
                    .iter()
                    .map(|url| url.as_str())
                    .map(|url| url.strip_suffix('/').unwrap_or(url))
                    .filter_map(|url| HeaderValue::from_str(url).ok());

                AllowOrigin::list(origins)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[serde(expecting = "expecting string \"any\", or an array of capitalized HTTP methods")]
pub enum AnyOrHttpMethodArray {
    Any,
    #[serde(untagged)]
    Explicit(Vec<HttpMethod>),
}

impl From<AnyOrHttpMethodArray> for AllowMethods {
    fn from(value: AnyOrHttpMethodArray) -> Self {
        match value {
            AnyOrHttpMethodArray::Any => AllowMethods::any(),
            AnyOrHttpMethodArray::Explicit(methods) => {
                AllowMethods::list(methods.into_iter().map(http::Method::from))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[serde(expecting = "expecting string \"any\", or an array of header names")]
pub enum AnyOrHeaderArray {
    Any,
    #[serde(untagged)]
    Explicit(#[serde(deserialize_with = "deserialize_header_names")] Vec<HeaderName>),
}

impl From<AnyOrHeaderArray> for AllowHeaders {
    fn from(value: AnyOrHeaderArray) -> Self {
        match value {
            AnyOrHeaderArray::Any => AllowHeaders::any(),
            AnyOrHeaderArray::Explicit(headers) => AllowHeaders::list(headers),
        }
    }
}

impl From<AnyOrHeaderArray> for ExposeHeaders {
    fn from(value: AnyOrHeaderArray) -> Self {
        match value {
            AnyOrHeaderArray::Any => ExposeHeaders::any(),
            AnyOrHeaderArray::Explicit(headers) => ExposeHeaders::list(headers),
        }
    }
}

fn deserialize_header_names<'de, D>(deserializer: D) -> Result<Vec<HeaderName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::{de::Error, Deserialize};

    Vec::<String>::deserialize(deserializer)?
        .into_iter()
        .map(|name| HeaderName::from_bytes(name.as_bytes()).map_err(D::Error::custom))
        .collect()
}
