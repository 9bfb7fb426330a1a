//! Scripted registry transport for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use serde_json::{json, Value};

use super::transport::{
    Method, RegistryRequest, RegistryResponse, RegistryTransport, TransportError,
};

/// A request as seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub username: String,
    pub accept: Option<String>,
    pub body: Option<Value>,
}

enum Scripted {
    Reply(RegistryResponse),
    Fail(String),
}

/// Transport that replays scripted responses per method and records every
/// request it receives.
///
/// A request with no scripted response left fails with a transport error.
#[derive(Default)]
pub struct MockTransport {
    scripted: Mutex<HashMap<Method, VecDeque<Scripted>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method`.
    pub fn respond(self, method: Method, status: u16, body: impl Into<String>) -> Self {
        self.push(method, Scripted::Reply(RegistryResponse::new(status, body)))
    }

    /// Queue a successful fetch reporting the DOI in `state`.
    pub fn respond_state(self, state: &str) -> Self {
        let body = json!({"data": {"attributes": {"state": state}}}).to_string();
        self.respond(Method::Get, 200, body)
    }

    /// Queue a transport failure for `method`.
    pub fn fail(self, method: Method, message: impl Into<String>) -> Self {
        self.push(method, Scripted::Fail(message.into()))
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received with `method`.
    pub fn count(&self, method: Method) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    fn push(self, method: Method, scripted: Scripted) -> Self {
        self.scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(method)
            .or_default()
            .push_back(scripted);
        self
    }
}

impl RegistryTransport for MockTransport {
    fn send(&self, request: &RegistryRequest<'_>) -> Result<RegistryResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                method: request.method,
                url: request.url.to_string(),
                username: request.credentials.username.clone(),
                accept: request.accept.map(String::from),
                body: request.body.cloned(),
            });

        let next = self
            .scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&request.method)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(TransportError(message)),
            None => Err(TransportError(format!(
                "no scripted response for {} {}",
                request.method, request.url
            ))),
        }
    }
}
