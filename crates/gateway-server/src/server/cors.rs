use gateway_config::{AnyOrHeaderArray, AnyOrHttpMethodArray, AnyOrUrlArray, CorsConfig};
use http::{
    header::{ACCEPT, CONTENT_TYPE, ORIGIN},
    HeaderName, Method,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer, ExposeHeaders};

pub(super) fn generate(
    CorsConfig {
        allow_credentials,
        allow_origins,
        max_age,
        allow_methods,
        allow_headers,
        expose_headers,
    }: CorsConfig,
) -> CorsLayer {
    // Browsers refuse wildcards on credentialed requests, so those echo the request instead.
    let origin = match allow_origins {
        None | Some(AnyOrUrlArray::Any) if allow_credentials => AllowOrigin::mirror_request(),
        None => AllowOrigin::any(),
        Some(origins) => AllowOrigin::from(origins),
    };

    let methods = match allow_methods {
        Some(AnyOrHttpMethodArray::Any) if allow_credentials => AllowMethods::mirror_request(),
        None => AllowMethods::list([Method::GET, Method::POST, Method::OPTIONS]),
        Some(methods) => AllowMethods::from(methods),
    };

    let headers = match allow_headers {
        Some(AnyOrHeaderArray::Any) if allow_credentials => AllowHeaders::mirror_request(),
        None => AllowHeaders::list(default_allowed_headers()),
        Some(headers) => AllowHeaders::from(headers),
    };

    let mut cors_layer = CorsLayer::new()
        .allow_credentials(allow_credentials)
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers);

    if let Some(max_age) = max_age {
        cors_layer = cors_layer.max_age(max_age);
    }

    match expose_headers {
        Some(AnyOrHeaderArray::Any) if allow_credentials => {
            tracing::warn!("ignoring `expose_headers = \"any\"`, it cannot be combined with credentials");
        }
        Some(headers) => cors_layer = cors_layer.expose_headers(ExposeHeaders::from(headers)),
        None => {}
    }

    cors_layer
}

/// What a browser form or a plain GraphQL client sends.
fn default_allowed_headers() -> [HeaderName; 4] {
    [
        ORIGIN,
        HeaderName::from_static("x-requested-with"),
        CONTENT_TYPE,
        ACCEPT,
    ]
}
