//! Scripted transport for deterministic synchronizer tests.
#![allow(dead_code)] // not every test binary uses every helper

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use shelf_client::{Transport, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// One recorded request.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

struct Scripted {
    gate: Option<oneshot::Receiver<()>>,
    outcome: Result<Value, TransportError>,
}

/// Transport returning scripted outcomes in FIFO order.
///
/// Gated responses park until their sender fires, which lets a test hold
/// several mutations in flight and resolve them in a chosen order.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_ok(&self, value: Value) {
        self.push(None, Ok(value));
    }

    pub fn push_err(&self, err: TransportError) {
        self.push(None, Err(err));
    }

    pub fn push_status_err(&self, status: u16) {
        self.push_err(TransportError::Status {
            status,
            message: "scripted failure".to_string(),
        });
    }

    /// Script a response that is withheld until the returned sender fires.
    pub fn push_gated_ok(&self, value: Value) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Some(rx), Ok(value));
        tx
    }

    pub fn push_gated_status_err(&self, status: u16) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(
            Some(rx),
            Err(TransportError::Status {
                status,
                message: "scripted failure".to_string(),
            }),
        );
        tx
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, gate: Option<oneshot::Receiver<()>>, outcome: Result<Value, TransportError>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted { gate, outcome });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });
        let scripted = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("request arrived with no scripted response");
        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }
        scripted.outcome
    }
}
