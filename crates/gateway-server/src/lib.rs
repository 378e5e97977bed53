//! The gateway server: a GraphQL schema over the upstream REST API, plus the browser login flow
//! that turns a username and password into an upstream token.

mod error;
mod resolvers;
mod server;

pub use error::Error;
pub use resolvers::{build_schema, GatewaySchema, PaginationSettings};
pub use server::{router, serve, upstream_fetcher, ServerConfig};

/// The result type of the gateway server
pub type Result<T> = std::result::Result<T, Error>;
