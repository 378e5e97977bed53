use async_graphql::ErrorExtensions;
use runtime::error::PartialGraphqlError;

/// Turns a gateway error into a GraphQL error carrying `extensions.code` and any extra
/// extensions, such as the upstream `status` of a rejection.
pub(crate) fn graphql_error(error: impl Into<PartialGraphqlError>) -> async_graphql::Error {
    let PartialGraphqlError {
        message,
        code,
        extensions,
    } = error.into();

    async_graphql::Error::new(message).extend_with(move |_, values| {
        values.set("code", code.to_string());

        for (key, value) in extensions {
            match async_graphql::Value::from_json(value) {
                Ok(value) => values.set(key, value),
                Err(error) => tracing::warn!("dropping error extension `{key}`: {error}"),
            }
        }
    })
}
