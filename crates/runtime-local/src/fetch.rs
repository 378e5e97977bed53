use runtime::fetch::{FetchError, FetchRequest, FetchResponse, FetchResult, FetcherInner};

#[derive(Clone, Default)]
pub struct NativeFetcher {
    client: reqwest::Client,
}

#[async_trait::async_trait]
impl FetcherInner for NativeFetcher {
    async fn fetch(&self, request: FetchRequest<'_>) -> FetchResult<FetchResponse> {
        let mut builder = self
            .client
            .request(request.method, request.url.clone())
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|error| {
            tracing::warn!("upstream request failed: {error}");
            FetchError::unavailable(error)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(FetchError::unavailable)?;

        Ok(FetchResponse { status, bytes })
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, HeaderValue, Method, StatusCode};
    use wiremock::{
        matchers::{body_string, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    #[tokio::test]
    async fn sends_the_request_as_prepared() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tags"))
            .and(header("accept", "application/json"))
            .and(body_string("name=x"))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":1}"#))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/tags", server.uri()).parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let response = NativeFetcher::default()
            .fetch(FetchRequest {
                url: &url,
                method: Method::POST,
                headers,
                body: Some("name=x".into()),
            })
            .await
            .unwrap();

        assert_eq!(StatusCode::CREATED, response.status);
        assert_eq!(br#"{"id":1}"#.as_slice(), response.bytes.as_ref());
    }

    #[tokio::test]
    async fn unreachable_upstream_is_unavailable() {
        // nothing listens on the port once the listener is gone
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/tags", listener.local_addr().unwrap()).parse().unwrap();
        drop(listener);

        let result = NativeFetcher::default()
            .fetch(FetchRequest {
                url: &url,
                method: Method::GET,
                headers: HeaderMap::new(),
                body: None,
            })
            .await;

        assert!(
            matches!(result, Err(FetchError::UpstreamUnavailable(_))),
            "unexpected outcome: {:?}",
            result.map(|response| response.status)
        );
    }
}
