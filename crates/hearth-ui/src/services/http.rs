//! Native HTTP transport (`reqwest`), used off the browser.
//!
//! Requests carry no timeout; callers needing one pass their own client to
//! [`ReqwestTransport::with_client`].

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::core::fetch::{Transport, TransportResponse};
use crate::error::FetchError;

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Client with reqwest's defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] when the TLS backend cannot initialise.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|err| FetchError::transport(err.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn read(response: reqwest::Response) -> Result<TransportResponse, FetchError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| FetchError::transport(err.to_string()))?;
        Ok(TransportResponse { status, body })
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::transport(err.to_string()))?;
        Self::read(response).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: Option<&Value>,
    ) -> Result<TransportResponse, FetchError> {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            let payload = serde_json::to_string(body).map_err(|err| FetchError::Decode {
                message: err.to_string(),
            })?;
            request = request.body(payload);
        }
        let response = request
            .send()
            .await
            .map_err(|err| FetchError::transport(err.to_string()))?;
        Self::read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::core::fetch::{PostRequest, RequestPhase, get_json};
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::rc::Rc;
    use std::time::Duration;

    fn config(server: &MockServer) -> Result<ClientConfig> {
        hearth_test_support::logging::init_test_logging();
        Ok(ClientConfig::from_values(Some(&server.base_url()), Some("test"))?)
    }

    #[tokio::test]
    async fn orders_post_surfaces_server_error() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/orders")
                .header("content-type", "application/json")
                .json_body(json!({ "id": 1 }));
            then.status(500).body("internal");
        });

        let transport: Rc<dyn Transport> = Rc::new(ReqwestTransport::new()?);
        let request: PostRequest<Value> =
            PostRequest::new(transport, &config(&server)?, "orders", Some(json!({ "id": 1 })));
        let state = request.trigger().await;

        mock.assert();
        assert_eq!(state.phase, RequestPhase::Failed);
        assert_eq!(state.error.as_deref(), Some("request failed with status 500"));
        assert_eq!(state.data, None);
        assert!(!state.loading);
        Ok(())
    }

    #[tokio::test]
    async fn orders_post_decodes_json() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/orders");
            then.status(200).json_body(json!({ "order": 42 }));
        });

        let transport: Rc<dyn Transport> = Rc::new(ReqwestTransport::new()?);
        let request: PostRequest<Value> =
            PostRequest::new(transport, &config(&server)?, "/orders", Some(json!({ "id": 42 })));
        let state = request.trigger().await;
        assert_eq!(state.data, Some(json!({ "order": 42 })));
        Ok(())
    }

    #[tokio::test]
    async fn translation_get_reads_payload() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/language/de.json");
            then.status(200).json_body(json!({ "nav": { "home": "Start" } }));
        });

        let transport = ReqwestTransport::new()?;
        let url = config(&server)?.endpoint("language/de.json");
        let payload: Value = get_json(&transport, &url).await?;
        mock.assert();
        assert_eq!(payload["nav"]["home"], "Start");
        Ok(())
    }

    #[tokio::test]
    async fn slow_responses_are_awaited() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/orders");
            then.status(200)
                .delay(Duration::from_secs(11))
                .json_body(json!({ "order": 7 }));
        });

        let transport: Rc<dyn Transport> = Rc::new(ReqwestTransport::new()?);
        let request: PostRequest<Value> =
            PostRequest::new(transport, &config(&server)?, "orders", Some(json!({ "id": 7 })));
        let state = request.trigger().await;

        mock.assert();
        assert_eq!(state.phase, RequestPhase::Success);
        assert_eq!(state.data, Some(json!({ "order": 7 })));
        Ok(())
    }

    #[tokio::test]
    #[allow(deprecated)]
    async fn missing_body_sends_no_payload() -> Result<()> {
        let server = MockServer::start_async().await;
        let literal_null = server.mock(|when, then| {
            when.method(POST).path("/ping").body("null");
            then.status(500);
        });
        let empty = server.mock(|when, then| {
            when.method(POST)
                .path("/ping")
                .header("content-type", "application/json")
                .body("");
            then.status(204);
        });

        let transport = ReqwestTransport::new()?;
        let url = config(&server)?.endpoint("ping");
        let response = transport.post_json(&url, None).await?;

        assert_eq!(response.status, 204);
        empty.assert();
        literal_null.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() -> Result<()> {
        let transport = ReqwestTransport::new()?;
        let result = transport.get("http://127.0.0.1:9/unreachable").await;
        assert!(matches!(result, Err(FetchError::Transport { .. })));
        Ok(())
    }
}
