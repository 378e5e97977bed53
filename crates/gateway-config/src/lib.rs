//! Configuration of the gateway, read from a TOML file.

mod cors;

use std::{net::SocketAddr, time::Duration};

use duration_str::deserialize_option_duration;
use url::Url;

pub use cors::{AnyOrHeaderArray, AnyOrHttpMethodArray, AnyOrUrlArray, CorsConfig, HttpMethod};

const DEFAULT_GRAPH_PATH: &str = "/graphql";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";
const DEFAULT_ACCESS_CODE_TTL: Duration = Duration::from_secs(60);
const DEFAULT_PAGE_LIMIT: usize = 20;

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Configuration struct to define settings for the gateway.
pub struct Config {
    /// Server bind settings
    pub network: NetworkConfig,
    /// Graph location and features, such as introspection
    pub graph: GraphConfig,
    /// The REST API behind the gateway
    pub upstream: UpstreamConfig,
    /// One-time codes handed to browsers after a login
    pub access_codes: AccessCodesConfig,
    /// List query settings
    pub pagination: PaginationConfig,
    /// Cross-origin resource sharing settings
    pub cors: Option<CorsConfig>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    pub listen_address: Option<SocketAddr>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    pub path: String,
    pub introspection: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_GRAPH_PATH.to_string(),
            introspection: true,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Base url of the upstream API. Must be given here or on the command line.
    pub url: Option<Url>,
    /// Sent as `accept-language` on every upstream request
    pub accept_language: String,
    /// Upper bound for a single upstream request. No limit when not set.
    #[serde(deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: None,
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessCodesConfig {
    /// How long an access code can be redeemed after the login
    #[serde(deserialize_with = "duration_str::deserialize_duration")]
    pub ttl: Duration,
}

impl Default for AccessCodesConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_ACCESS_CODE_TTL,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    /// Page size when a list query gives no limit
    pub default_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use http::HeaderName;
    use indoc::indoc;

    use super::*;

    #[test]
    fn defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(None, config.network.listen_address);
        assert_eq!("/graphql", config.graph.path);
        assert!(config.graph.introspection);
        assert_eq!(None, config.upstream.url);
        assert_eq!("en-US,en;q=0.5", config.upstream.accept_language);
        assert_eq!(None, config.upstream.timeout);
        assert_eq!(Duration::from_secs(60), config.access_codes.ttl);
        assert_eq!(20, config.pagination.default_limit);
        assert!(config.cors.is_none());
    }

    #[test]
    fn network_ipv4() {
        let input = indoc! {r#"
            [network]
            listen_address = "0.0.0.0:4000"
        "#};

        let config: Config = toml::from_str(input).unwrap();
        let expected = Some(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 4000));

        assert_eq!(expected, config.network.listen_address);
    }

    #[test]
    fn network_ipv6() {
        let input = indoc! {r#"
            [network]
            listen_address = "[::1]:4000"
        "#};

        let config: Config = toml::from_str(input).unwrap();
        let expected = Some(SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 4000));

        assert_eq!(expected, config.network.listen_address);
    }

    #[test]
    fn upstream() {
        let input = indoc! {r#"
            [upstream]
            url = "https://portal.example.com/api/"
            accept_language = "fr-CA"
            timeout = "5s"
        "#};

        let config: Config = toml::from_str(input).unwrap();

        assert_eq!(
            Some("https://portal.example.com/api/"),
            config.upstream.url.as_ref().map(Url::as_str)
        );
        assert_eq!("fr-CA", config.upstream.accept_language);
        assert_eq!(Some(Duration::from_secs(5)), config.upstream.timeout);
    }

    #[test]
    fn access_codes_and_pagination() {
        let input = indoc! {r#"
            [access_codes]
            ttl = "2m"

            [pagination]
            default_limit = 50
        "#};

        let config: Config = toml::from_str(input).unwrap();

        assert_eq!(Duration::from_secs(120), config.access_codes.ttl);
        assert_eq!(50, config.pagination.default_limit);
    }

    #[test]
    fn graph_path() {
        let input = indoc! {r#"
            [graph]
            path = "/api/graphql"
            introspection = false
        "#};

        let config: Config = toml::from_str(input).unwrap();

        assert_eq!("/api/graphql", config.graph.path);
        assert!(!config.graph.introspection);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let input = indoc! {r#"
            [upstream]
            uri = "https://portal.example.com"
        "#};

        let error = toml::from_str::<Config>(input).unwrap_err();

        assert!(error.to_string().contains("unknown field `uri`"), "{error}");
    }

    #[test]
    fn cors_explicit() {
        let input = indoc! {r#"
            [cors]
            allow_credentials = true
            allow_origins = ["https://app.example.com/"]
            max_age = "60s"
            allow_methods = ["GET", "POST"]
            allow_headers = ["Content-Type", "Authorization"]
        "#};

        let config: Config = toml::from_str(input).unwrap();
        let cors = config.cors.unwrap();

        assert!(cors.allow_credentials);
        assert_eq!(
            Some(AnyOrUrlArray::Explicit(vec!["https://app.example.com/".parse().unwrap()])),
            cors.allow_origins
        );
        assert_eq!(Some(Duration::from_secs(60)), cors.max_age);
        assert_eq!(
            Some(AnyOrHttpMethodArray::Explicit(vec![HttpMethod::Get, HttpMethod::Post])),
            cors.allow_methods
        );
        assert_eq!(
            Some(AnyOrHeaderArray::Explicit(vec![
                HeaderName::from_static("content-type"),
                HeaderName::from_static("authorization"),
            ])),
            cors.allow_headers
        );
        assert_eq!(None, cors.expose_headers);
    }

    #[test]
    fn cors_any() {
        let input = indoc! {r#"
            [cors]
            allow_origins = "any"
            allow_methods = "any"
            allow_headers = "any"
        "#};

        let config: Config = toml::from_str(input).unwrap();
        let cors = config.cors.unwrap();

        assert_eq!(Some(AnyOrUrlArray::Any), cors.allow_origins);
        assert_eq!(Some(AnyOrHttpMethodArray::Any), cors.allow_methods);
        assert_eq!(Some(AnyOrHeaderArray::Any), cors.allow_headers);
    }

    #[test]
    fn cors_invalid_method() {
        let input = indoc! {r#"
            [cors]
            allow_methods = ["GOT"]
        "#};

        assert!(toml::from_str::<Config>(input).is_err());
    }
}
