//! Remote fetch routine and the transport port it runs on.
//!
//! # Design
//! - The transport only moves bytes; status interpretation and JSON decoding
//!   happen here so every adapter reports failures the same way.
//! - `loading` is cleared on every completion path; a failed request keeps
//!   the data of the last successful one.
//! - No retry, cancellation or de-duplication.
//! - Each request keeps its [`RequestState`] in a yewdux context of its own,
//!   so two requests decoding the same type never share state.

use std::rc::Rc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::core::store::{Context, Slice, Store, SubscriptionId};
use crate::error::FetchError;

/// Raw HTTP response handed back by a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decode the body as JSON, mapping non-success statuses to errors.
    /// An empty body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for non-2xx responses and
    /// [`FetchError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        if !self.is_success() {
            return Err(FetchError::Status {
                status: self.status,
            });
        }
        let text = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(text).map_err(|err| FetchError::Decode {
            message: err.to_string(),
        })
    }
}

/// HTTP transport used by the request routines.
#[async_trait(?Send)]
pub trait Transport {
    /// Issue a `GET`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent or the body cannot be read.
    async fn get(&self, url: &str) -> Result<TransportResponse, FetchError>;

    /// Issue a `POST` with `Content-Type: application/json` and the serialized body.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent or the body cannot be read.
    async fn post_json(
        &self,
        url: &str,
        body: Option<&Value>,
    ) -> Result<TransportResponse, FetchError>;
}

/// `GET` `url` and decode the JSON response.
///
/// # Errors
///
/// Propagates transport failures, non-success statuses and decode failures.
pub async fn get_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &str,
) -> Result<T, FetchError> {
    transport.get(url).await?.json()
}

/// Lifecycle of a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestPhase {
    /// Never triggered.
    #[default]
    Idle,
    /// In flight.
    Pending,
    /// Last run succeeded.
    Success,
    /// Last run failed.
    Failed,
}

/// Observable state of a request routine.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestState<T> {
    /// Lifecycle phase.
    pub phase: RequestPhase,
    /// Decoded response of the last successful run.
    pub data: Option<T>,
    /// Message of the last failure, cleared when a new run starts.
    pub error: Option<String>,
    /// Whether a run is in flight.
    pub loading: bool,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            phase: RequestPhase::Idle,
            data: None,
            error: None,
            loading: false,
        }
    }
}

impl<T: Clone + PartialEq + 'static> Store for RequestState<T> {
    fn new(_cx: &Context) -> Self {
        Self::default()
    }

    fn should_notify(&self, old: &Self) -> bool {
        self != old
    }
}

/// `POST {api_base}/{path}` with an optional JSON body.
pub struct PostRequest<T: Clone + PartialEq + 'static> {
    transport: Rc<dyn Transport>,
    url: String,
    body: Option<Value>,
    state: Slice<RequestState<T>>,
}

impl<T: DeserializeOwned + Clone + PartialEq + 'static> PostRequest<T> {
    /// Prepare the request; nothing is sent until [`PostRequest::trigger`].
    #[must_use]
    pub fn new(
        transport: Rc<dyn Transport>,
        config: &ClientConfig,
        path: &str,
        body: Option<Value>,
    ) -> Self {
        Self {
            transport,
            url: config.endpoint(path),
            body,
            state: Slice::with_state(&Context::new(), RequestState::default()),
        }
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the request once and settle the state.
    pub async fn trigger(&self) -> RequestState<T> {
        self.state.update(|state| {
            state.phase = RequestPhase::Pending;
            state.error = None;
            state.loading = true;
        });

        let result = match self.transport.post_json(&self.url, self.body.as_ref()).await {
            Ok(response) => response.json::<T>(),
            Err(err) => Err(err),
        };

        self.state.update(|state| {
            match result {
                Ok(data) => {
                    state.phase = RequestPhase::Success;
                    state.data = Some(data);
                }
                Err(err) => {
                    tracing::warn!(url = %self.url, error = %err, "request failed");
                    state.phase = RequestPhase::Failed;
                    state.error = Some(err.to_string());
                }
            }
            state.loading = false;
        });
        self.state.get()
    }

    /// Trigger only when a body was supplied. Returns `None` when skipped.
    pub async fn auto_trigger(&self) -> Option<RequestState<T>> {
        if self.body.is_none() {
            return None;
        }
        Some(self.trigger().await)
    }

    /// Latest state.
    #[must_use]
    pub fn state(&self) -> RequestState<T> {
        self.state.get()
    }

    /// Observe state changes.
    pub fn subscribe(&self, listener: impl Fn(&RequestState<T>) + 'static) -> SubscriptionId {
        self.state.subscribe(listener)
    }

    /// Stop observing.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }
}

impl<T: Clone + PartialEq + 'static> std::fmt::Debug for PostRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostRequest")
            .field("url", &self.url)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Scripted transport recording every request.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        responses: RefCell<VecDeque<Result<TransportResponse, FetchError>>>,
        pub(crate) requests: RefCell<Vec<(String, String, Option<Value>)>>,
    }

    impl ScriptedTransport {
        pub(crate) fn respond(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(TransportResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub(crate) fn fail(self, err: FetchError) -> Self {
            self.responses.borrow_mut().push_back(Err(err));
            self
        }

        fn next(&self) -> Result<TransportResponse, FetchError> {
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(FetchError::Unknown))
        }
    }

    #[async_trait(?Send)]
    impl Transport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<TransportResponse, FetchError> {
            self.requests
                .borrow_mut()
                .push(("GET".into(), url.to_string(), None));
            self.next()
        }

        async fn post_json(
            &self,
            url: &str,
            body: Option<&Value>,
        ) -> Result<TransportResponse, FetchError> {
            self.requests
                .borrow_mut()
                .push(("POST".into(), url.to_string(), body.cloned()));
            self.next()
        }
    }

    fn request(transport: &Rc<ScriptedTransport>, body: Option<Value>) -> PostRequest<Value> {
        let transport: Rc<dyn Transport> = Rc::clone(transport) as Rc<dyn Transport>;
        PostRequest::new(transport, &ClientConfig::default(), "orders", body)
    }

    #[tokio::test]
    async fn server_error_reports_status_and_settles() {
        let transport = Rc::new(ScriptedTransport::default().respond(500, "boom"));
        let req = request(&transport, Some(json!({ "id": 1 })));

        let state = req.trigger().await;
        assert_eq!(state.phase, RequestPhase::Failed);
        assert!(state.error.as_deref().is_some_and(|msg| msg.contains("500")));
        assert_eq!(state.data, None);
        assert!(!state.loading);

        let requests = transport.requests.borrow();
        assert_eq!(requests[0].1, "http://localhost:3000/orders");
        assert_eq!(requests[0].2, Some(json!({ "id": 1 })));
    }

    #[tokio::test]
    async fn success_decodes_body() {
        let transport = Rc::new(ScriptedTransport::default().respond(201, r#"{"ok":true}"#));
        let req = request(&transport, Some(json!({ "id": 2 })));
        let state = req.trigger().await;
        assert_eq!(state.phase, RequestPhase::Success);
        assert_eq!(state.data, Some(json!({ "ok": true })));
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn failure_keeps_previous_data() {
        let transport = Rc::new(
            ScriptedTransport::default()
                .respond(200, "[1]")
                .fail(FetchError::Transport {
                    message: "connection refused".into(),
                }),
        );
        let req = request(&transport, Some(json!({})));
        req.trigger().await;
        let state = req.trigger().await;
        assert_eq!(state.error.as_deref(), Some("connection refused"));
        assert_eq!(state.data, Some(json!([1])));
    }

    #[tokio::test]
    async fn unknown_failure_uses_fallback_message() {
        let transport = Rc::new(ScriptedTransport::default().fail(FetchError::Unknown));
        let req = request(&transport, Some(json!({})));
        let state = req.trigger().await;
        assert_eq!(state.error.as_deref(), Some("unknown request error"));
    }

    #[tokio::test]
    async fn auto_trigger_requires_body() {
        let transport = Rc::new(ScriptedTransport::default().respond(200, ""));
        let without = request(&transport, None);
        assert!(without.auto_trigger().await.is_none());
        assert!(transport.requests.borrow().is_empty());

        let with = request(&transport, Some(json!({ "id": 3 })));
        let state = with.auto_trigger().await;
        assert_eq!(state.map(|s| s.data), Some(Some(Value::Null)));
    }

    #[tokio::test]
    async fn listeners_see_pending_then_settled() {
        let transport = Rc::new(ScriptedTransport::default().respond(200, "{}"));
        let req = request(&transport, Some(json!({})));
        let phases = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&phases);
        req.subscribe(move |state| sink.borrow_mut().push((state.phase, state.loading)));

        req.trigger().await;
        assert_eq!(
            *phases.borrow(),
            vec![(RequestPhase::Pending, true), (RequestPhase::Success, false)]
        );
    }
}
