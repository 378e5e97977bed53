use async_graphql::{Context, Object, SimpleObject, ID};
use http::Method;
use runtime::{
    error::PartialGraphqlError,
    fetch::{FetchResult, Fetcher, UpstreamBody, UpstreamRequest},
    Credential, ForwardedAuthorization,
};
use serde_json::json;

use super::{entities, error::graphql_error, tags::deserialize_id, upstream};

const RESOURCE: &str = "session";

#[derive(Clone, PartialEq, serde::Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub user_id: Option<ID>,
    #[serde(default)]
    pub token: Option<String>,
}

impl Session {
    /// The upstream token of this session, if the upstream handed one out.
    pub(crate) fn into_credential(self) -> Option<Credential> {
        self.token.filter(|token| !token.is_empty()).map(Credential::new)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Exchanges a username and password for an upstream session.
pub(crate) async fn login(
    fetcher: &Fetcher,
    authorization: &ForwardedAuthorization,
    login: &str,
    password: &str,
) -> FetchResult<Session> {
    let fields = entities::sessions()?;
    let body = UpstreamBody::Form(json!({ "login": login, "password": password }));

    let response = fetcher
        .request(UpstreamRequest::new(Method::POST, RESOURCE, authorization, fields).with_body(body))
        .await?;

    response.json_as()
}

pub(crate) async fn logout(fetcher: &Fetcher, authorization: &ForwardedAuthorization) -> FetchResult<()> {
    let fields = entities::sessions()?;

    fetcher
        .request(UpstreamRequest::new(Method::DELETE, RESOURCE, authorization, fields))
        .await?;

    Ok(())
}

#[derive(Default)]
pub struct SessionQuery;

#[Object]
impl SessionQuery {
    /// The upstream session behind the `authorization` header, null without one.
    async fn session(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<Session>> {
        let (fetcher, authorization) = upstream(ctx)?;

        if !authorization.is_present() {
            return Ok(None);
        }

        let fields = entities::sessions().map_err(graphql_error)?;

        let response = fetcher
            .request(UpstreamRequest::new(Method::GET, RESOURCE, authorization, fields))
            .await
            .map_err(graphql_error)?;

        response.json_as().map_err(graphql_error)
    }
}

#[derive(Default)]
pub struct SessionMutation;

#[Object]
impl SessionMutation {
    async fn login(&self, ctx: &Context<'_>, login: String, password: String) -> async_graphql::Result<Session> {
        let (fetcher, authorization) = upstream(ctx)?;

        self::login(fetcher, authorization, &login, &password)
            .await
            .map_err(|error| {
                tracing::debug!("login rejected: {error}");
                graphql_error(PartialGraphqlError::login_failed())
            })
    }

    /// Ends the upstream session of the `authorization` header.
    async fn logout(&self, ctx: &Context<'_>) -> async_graphql::Result<bool> {
        let (fetcher, authorization) = upstream(ctx)?;

        logout(fetcher, authorization).await.map_err(graphql_error)?;

        Ok(true)
    }
}
