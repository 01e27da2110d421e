//! Scripted transport for exercising exchanges without a network

use super::client::Transport;
use super::types::WsError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Replies are scripted per URI and consumed in order. An exhausted script
/// answers with `{}`.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<HashMap<String, VecDeque<Result<String, WsError>>>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, uri: &str, reply: Result<String, WsError>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(uri.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Every (uri, payload) sent so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, uri: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(u, _)| u == uri)
            .map(|(_, p)| p)
            .collect()
    }
}

pub fn dropped(uri: &str) -> WsError {
    WsError::ConnectionDropped {
        uri: uri.to_string(),
        reason: "connection reset by peer".to_string(),
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send_and_receive(&self, uri: &str, payload: &str) -> Result<String, WsError> {
        self.calls
            .lock()
            .unwrap()
            .push((uri.to_string(), payload.to_string()));

        self.replies
            .lock()
            .unwrap()
            .get_mut(uri)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok("{}".to_string()))
    }
}
