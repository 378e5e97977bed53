//! Browser login: the client sends the user to `/?returnUrl=..`, the user logs in, and the browser
//! comes back to the client with a one-time access code that the client exchanges for the token.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::PrivateCookieJar;
use http::{HeaderMap, StatusCode};
use runtime::{error::PartialGraphqlError, nonce::NonceNotFound, ForwardedAuthorization};
use serde_json::json;
use url::Url;

use super::{session::Session, state::ServerState};
use crate::resolvers::sessions;

pub(super) const LOGIN_TEMPLATE: &str = "login.html";

const LOGIN_PAGE: &str = "/login";

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StartParams {
    return_url: Option<String>,
}

pub(super) async fn start(jar: PrivateCookieJar, Query(params): Query<StartParams>) -> Response {
    let Some(return_url) = params.return_url.filter(|url| !url.is_empty()) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    if let Err(error) = Url::parse(&return_url) {
        tracing::debug!("rejecting return url `{return_url}`: {error}");
        return (StatusCode::BAD_REQUEST, "Invalid returnUrl").into_response();
    }

    let mut session = Session::from_jar(&jar);
    session.return_url = Some(return_url);

    (session.store(jar), Redirect::to(LOGIN_PAGE)).into_response()
}

pub(super) async fn page(State(state): State<ServerState>, jar: PrivateCookieJar) -> Response {
    let session = Session::from_jar(&jar);

    match state
        .templates()
        .render(LOGIN_TEMPLATE, &json!({ "error": session.error }))
    {
        Ok(html) => Html(html).into_response(),
        Err(error) => {
            tracing::error!("cannot render the login page: {error}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(serde::Deserialize)]
pub(super) struct LoginForm {
    login: String,
    password: String,
}

pub(super) async fn authenticate(
    State(state): State<ServerState>,
    jar: PrivateCookieJar,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let mut session = Session::from_jar(&jar);

    let Some(mut return_url) = session.return_url.as_deref().and_then(|url| Url::parse(url).ok()) else {
        return (StatusCode::BAD_REQUEST, "Missing returnUrl").into_response();
    };

    let authorization = ForwardedAuthorization::from_headers(&headers);

    let credential = match sessions::login(state.fetcher(), &authorization, &form.login, &form.password).await {
        Ok(upstream_session) => upstream_session.into_credential(),
        Err(error) => {
            tracing::info!("login rejected: {error}");
            None
        }
    };

    let Some(credential) = credential else {
        session.error = Some(PartialGraphqlError::login_failed().message.into_owned());
        return (session.store(jar), Redirect::to(LOGIN_PAGE)).into_response();
    };

    let access_code = state.nonces().issue(credential);
    return_url.query_pairs_mut().append_pair("accessCode", &access_code);

    session.return_url = None;
    session.error = None;

    (session.store(jar), Redirect::to(return_url.as_str())).into_response()
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TokenRequest {
    access_code: Option<String>,
}

pub(super) async fn token(State(state): State<ServerState>, request: Option<Json<TokenRequest>>) -> Response {
    let redeemed = request
        .and_then(|Json(request)| request.access_code)
        .ok_or(NonceNotFound)
        .and_then(|access_code| state.nonces().redeem(&access_code));

    match redeemed {
        Ok(credential) => Json(json!({ "token": credential.expose() })).into_response(),
        Err(error) => {
            let error = PartialGraphqlError::from(error);
            (StatusCode::FORBIDDEN, Json(json!({ "error": error.message }))).into_response()
        }
    }
}

pub(super) async fn logout(State(state): State<ServerState>, jar: PrivateCookieJar, headers: HeaderMap) -> Response {
    let authorization = ForwardedAuthorization::from_headers(&headers);

    if let Err(error) = sessions::logout(state.fetcher(), &authorization).await {
        tracing::debug!("ignoring failed upstream logout: {error}");
    }

    let mut session = Session::from_jar(&jar);
    session.error = None;

    (session.store(jar), Redirect::to(LOGIN_PAGE)).into_response()
}
