use async_trait::async_trait;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use lens_core::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use crate::backend::{Backend, Endpoint};

type Responder = Box<dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Scripted backend that records every call in the order it was issued.
///
/// Endpoints without a script fail like an unreachable server.
#[derive(Default)]
pub struct MockBackend {
    responders: HashMap<Endpoint, Responder>,
    calls: Mutex<Vec<(Endpoint, Value)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every call to `endpoint` with `response`.
    pub fn respond(self, endpoint: Endpoint, response: Value) -> Self {
        self.route(endpoint, move |_| {
            let response = response.clone();
            async move { Ok(response) }
        })
    }

    pub fn fail(self, endpoint: Endpoint, message: impl Into<String>) -> Self {
        let message = message.into();
        self.route(endpoint, move |_| {
            let message = message.clone();
            async move { Err(Error::remote(endpoint.path(), message)) }
        })
    }

    /// Answers calls to `endpoint` with the future built from the request body.
    pub fn route<F, Fut>(mut self, endpoint: Endpoint, responder: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.responders
            .insert(endpoint, Box::new(move |body: Value| responder(body).boxed()));
        self
    }

    pub fn calls(&self) -> Vec<(Endpoint, Value)> {
        self.lock_calls().clone()
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.lock_calls().iter().map(|(endpoint, _)| *endpoint).collect()
    }

    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.lock_calls().iter().filter(|(e, _)| *e == endpoint).count()
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<(Endpoint, Value)>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockBackend")
            .field("scripted", &self.responders.keys().collect::<Vec<_>>())
            .field("calls", &self.lock_calls().len())
            .finish()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn invoke(&self, endpoint: Endpoint, body: Value) -> Result<Value> {
        self.lock_calls().push((endpoint, body.clone()));
        match self.responders.get(&endpoint) {
            Some(responder) => responder(body).await,
            None => Err(Error::remote(endpoint.path(), "connection refused")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let mock = MockBackend::new()
            .respond(Endpoint::FactCheck, json!({ "ok": true }))
            .route(Endpoint::RelatedTopics, |body| async move {
                Ok(json!({ "topics": body["summary"] }))
            });

        mock.invoke(Endpoint::RelatedTopics, json!({ "summary": "S" })).await.unwrap();
        mock.invoke(Endpoint::FactCheck, json!({ "url": "u" })).await.unwrap();
        assert!(mock.invoke(Endpoint::DeepResearch, json!({ "url": "u" })).await.is_err());

        assert_eq!(
            mock.endpoints(),
            vec![Endpoint::RelatedTopics, Endpoint::FactCheck, Endpoint::DeepResearch]
        );
        assert_eq!(mock.count(Endpoint::FactCheck), 1);
    }

    #[tokio::test]
    async fn test_route_sees_request_body() {
        let mock = MockBackend::new().route(Endpoint::RelatedTopics, |body| async move {
            Ok(json!({ "topics": body["summary"] }))
        });
        let value = mock
            .invoke(Endpoint::RelatedTopics, json!({ "summary": "S" }))
            .await
            .unwrap();
        assert_eq!(value, json!({ "topics": "S" }));
    }
}
