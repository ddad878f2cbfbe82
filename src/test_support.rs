//! Scripted transport and recording navigator shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::controller::{Navigator, Route};
use crate::error::TransportError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

enum Reply {
    Respond(ApiResponse),
    Fail,
    Deferred(oneshot::Receiver<()>, ApiResponse),
}

/// Transport answering each path from a queue of canned replies.
///
/// Paths with no reply left fail like an unreachable server.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<&'static str, VecDeque<Reply>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, path: &'static str, reply: Reply) {
        self.replies.lock().unwrap().entry(path).or_default().push_back(reply);
    }

    pub fn respond(&self, path: &'static str, status: u16, body: Value) {
        self.push(path, Reply::Respond(ApiResponse::new(status, Some(body))));
    }

    pub fn respond_empty(&self, path: &'static str, status: u16) {
        self.push(path, Reply::Respond(ApiResponse::new(status, None)));
    }

    pub fn fail(&self, path: &'static str) {
        self.push(path, Reply::Fail);
    }

    /// Queue a reply that is only delivered once the returned sender fires.
    pub fn defer(&self, path: &'static str, status: u16, body: Value) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(path, Reply::Deferred(rx, ApiResponse::new(status, Some(body))));
        tx
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_paths(&self) -> Vec<&'static str> {
        self.sent().iter().map(|req| req.path).collect()
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let path = request.path;
        self.sent.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Deferred(gate, response)) => {
                let _ = gate.await;
                Ok(response)
            }
            Some(Reply::Fail) | None => Err(TransportError::Request(format!("connection refused: {path}"))),
        }
    }
}

/// Navigator that remembers every route it was sent to.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<Route>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}
