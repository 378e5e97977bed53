mod cors;
mod graphql;
mod login;
mod session;
mod state;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    routing::{get, post},
    Router,
};
use gateway_config::{Config, UpstreamConfig};
use handlebars::Handlebars;
use runtime::{
    fetch::{Fetcher, UpstreamSettings},
    nonce::NonceStore,
};
use runtime_local::{InMemoryNonceStore, NativeFetcher};
use state::ServerState;
use tokio::{net::TcpListener, signal};

use crate::{resolvers, Error, PaginationSettings};

const DEFAULT_LISTEN_ADDRESS: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000);

/// Start parameter for the gateway.
pub struct ServerConfig {
    /// The GraphQL endpoint listen address. Takes precedence over the configuration.
    pub listen_addr: Option<SocketAddr>,
    /// The gateway configuration.
    pub config: Config,
}

/// Starts the server and serves requests until a shutdown signal arrives.
pub async fn serve(ServerConfig { listen_addr, config }: ServerConfig) -> crate::Result<()> {
    let fetcher = upstream_fetcher(&config.upstream)?;
    let nonces = NonceStore::new(InMemoryNonceStore::new(config.access_codes.ttl));

    let router = router(&config, fetcher, nonces)?;

    let addr = listen_addr
        .or(config.network.listen_address)
        .unwrap_or(DEFAULT_LISTEN_ADDRESS);

    let listener = TcpListener::bind(addr).await.map_err(Error::Server)?;

    tracing::info!("GraphQL endpoint exposed at http://{addr}{}", config.graph.path);

    axum::serve(listener, router)
        .with_graceful_shutdown(graceful_shutdown())
        .await
        .map_err(Error::Server)
}

/// The fetcher for the configured upstream API.
pub fn upstream_fetcher(config: &UpstreamConfig) -> crate::Result<Fetcher> {
    let base_url = config.url.clone().ok_or(Error::MissingUpstreamUrl)?;

    let settings = UpstreamSettings {
        base_url,
        accept_language: config.accept_language.clone(),
        timeout: config.timeout,
    };

    Ok(Fetcher::new(NativeFetcher::default(), settings)?)
}

/// All gateway routes: GraphQL at the configured path, and the browser login flow.
pub fn router(config: &Config, fetcher: Fetcher, nonces: NonceStore) -> crate::Result<Router> {
    resolvers::validate_entities().map_err(|error| Error::InternalError(error.to_string()))?;

    let schema = resolvers::build_schema(
        fetcher.clone(),
        PaginationSettings {
            default_limit: config.pagination.default_limit,
        },
        config.graph.introspection,
    );

    let state = ServerState::new(schema, fetcher, nonces, templates()?);
    let cors = cors::generate(config.cors.clone().unwrap_or_default());

    let router = Router::new()
        .route(&config.graph.path, get(graphql::execute).post(graphql::execute))
        .route("/", get(login::start))
        .route("/login", get(login::page))
        .route("/authenticate", post(login::authenticate))
        .route("/token", post(login::token))
        .route("/logout", get(login::logout))
        .layer(cors)
        .with_state(state);

    Ok(router)
}

fn templates() -> crate::Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();

    handlebars
        .register_template_string(login::LOGIN_TEMPLATE, include_str!("../templates/login.hbs"))
        .map_err(|error| Error::InternalError(format!("login template: {error}")))?;

    Ok(handlebars)
}

/// Resolves on Ctrl+C or, on unix, SIGTERM. In-flight requests are allowed to finish.
async fn graceful_shutdown() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install the SIGTERM handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down gracefully...");
}
