//! In-memory transport for driving handlers in tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::TransportError;
use super::request::RequestDescriptor;
use super::transport::{Response, Transport};

/// Replays queued responses in order and records every request it receives.
///
/// Once the queue is drained the last response is repeated forever, so a
/// misbehaving handler can be observed hitting the round cap.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Response, TransportError>>>,
    last: Mutex<Option<Response>>,
    requests: Mutex<Vec<RequestDescriptor>>,
    sends: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: Response) -> Self {
        self.responses.lock().push_back(Ok(response));
        self
    }

    pub fn respond_json(self, url: &str, value: serde_json::Value) -> Self {
        self.respond(
            Response::new(url, value.to_string()).with_content_type("application/json"),
        )
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    pub fn sends(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<Response, TransportError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        let next = self.responses.lock().pop_front();
        match next {
            Some(Ok(response)) => {
                *self.last.lock() = Some(response.clone());
                Ok(response)
            }
            Some(Err(error)) => Err(error),
            None => self
                .last
                .lock()
                .clone()
                .ok_or_else(|| TransportError::invalid_request("no scripted response left")),
        }
    }
}
