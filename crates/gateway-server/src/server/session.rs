use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    PrivateCookieJar,
};

const SESSION_COOKIE: &str = "gateway_session";

/// Browser login state, kept encrypted in a cookie between the login page and `/authenticate`.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Session {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Session {
    /// A missing or unreadable cookie is an empty session.
    pub(super) fn from_jar(jar: &PrivateCookieJar) -> Self {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
            .unwrap_or_default()
    }

    pub(super) fn store(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        let value = match serde_json::to_string(self) {
            Ok(value) => value,
            Err(error) => {
                tracing::error!("cannot serialize the login session: {error}");
                return jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
            }
        };

        let cookie = Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);

        jar.add(cookie)
    }
}
