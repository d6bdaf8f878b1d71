//! Scripted in-memory transport for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::protocol::{McpRequest, McpResponse};
use crate::transport::{Transport, TransportError};

/// What the scripted server does with the next request.
pub(crate) enum Step {
    /// Answer with this result, re-keyed to the request id.
    Reply(serde_json::Value),
    Fail(crate::protocol::McpError),
    Error(TransportError),
    /// Never answer.
    Hang,
}

pub(crate) struct MockTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<McpRequest>>,
    notifications: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl MockTransport {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
            notifications: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn requests(&self) -> Vec<McpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: McpRequest) -> Result<McpResponse, TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        let id = request.id.clone();
        self.requests.lock().unwrap().push(request);

        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(result)) => Ok(McpResponse::answer(id, Ok(result))),
            Some(Step::Fail(error)) => Ok(McpResponse::answer(id, Err(error))),
            Some(Step::Error(error)) => Err(error),
            Some(Step::Hang) => std::future::pending().await,
            None => Err(TransportError::Closed),
        }
    }

    async fn notify(&self, notification: McpRequest) -> Result<(), TransportError> {
        self.notifications.lock().unwrap().push(notification.method);
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
