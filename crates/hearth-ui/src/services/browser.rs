//! Browser HTTP transport (`gloo-net` over `fetch`).

use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;

use crate::core::fetch::{Transport, TransportResponse};
use crate::error::FetchError;

/// [`Transport`] issuing requests through `window.fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

async fn read(response: gloo_net::http::Response) -> Result<TransportResponse, FetchError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| FetchError::transport(err.to_string()))?;
    Ok(TransportResponse { status, body })
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, FetchError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|err| FetchError::transport(err.to_string()))?;
        read(response).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: Option<&Value>,
    ) -> Result<TransportResponse, FetchError> {
        let request = Request::post(url).header("Content-Type", "application/json");
        let response = match body {
            Some(body) => {
                let payload = serde_json::to_string(body).map_err(|err| FetchError::Decode {
                    message: err.to_string(),
                })?;
                request.body(payload).send().await
            }
            None => request.send().await,
        }
        .map_err(|err| FetchError::transport(err.to_string()))?;
        read(response).await
    }
}
