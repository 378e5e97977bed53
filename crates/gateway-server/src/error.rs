use runtime::fetch::FetchError;

/// The gateway server error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither the configuration nor the command line names the upstream API
    #[error("no upstream url configured, set `upstream.url` or pass `--upstream-url`")]
    MissingUpstreamUrl,
    /// The upstream settings cannot be used
    #[error("invalid upstream settings: {0}")]
    Upstream(#[from] FetchError),
    /// Internal error
    #[error("internal error: {0}")]
    InternalError(String),
    /// Cannot start the HTTP server
    #[error("starting server: {0}")]
    Server(#[source] std::io::Error),
}
