use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use handlebars::Handlebars;
use runtime::{fetch::Fetcher, nonce::NonceStore};

use crate::GatewaySchema;

struct ServerStateInner {
    schema: GatewaySchema,
    fetcher: Fetcher,
    nonces: NonceStore,
    templates: Handlebars<'static>,
    cookie_key: Key,
}

#[derive(Clone)]
pub(super) struct ServerState {
    inner: Arc<ServerStateInner>,
}

impl ServerState {
    pub(super) fn new(
        schema: GatewaySchema,
        fetcher: Fetcher,
        nonces: NonceStore,
        templates: Handlebars<'static>,
    ) -> Self {
        Self {
            inner: Arc::new(ServerStateInner {
                schema,
                fetcher,
                nonces,
                templates,
                // Sessions only live as long as the process.
                cookie_key: Key::generate(),
            }),
        }
    }

    pub(super) fn schema(&self) -> &GatewaySchema {
        &self.inner.schema
    }

    pub(super) fn fetcher(&self) -> &Fetcher {
        &self.inner.fetcher
    }

    pub(super) fn nonces(&self) -> &NonceStore {
        &self.inner.nonces
    }

    pub(super) fn templates(&self) -> &Handlebars<'static> {
        &self.inner.templates
    }
}

impl FromRef<ServerState> for Key {
    fn from_ref(state: &ServerState) -> Self {
        state.inner.cookie_key.clone()
    }
}
