use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use http::HeaderMap;
use runtime::ForwardedAuthorization;

use super::state::ServerState;

/// Executes a GraphQL request, forwarding the caller's `authorization` header to the upstream.
pub(super) async fn execute(
    State(state): State<ServerState>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let authorization = ForwardedAuthorization::from_headers(&headers);
    let request = request.into_inner().data(authorization);

    state.schema().execute(request).await.into()
}
