use super::{ProgressFn, ValidationService};
use crate::models::{SelectedFile, ValidationReport};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type MockOutcome = std::result::Result<serde_json::Value, String>;

/// In-memory stand-in for the remote validation service.
///
/// Responses are queued with the builder methods and cycled per call;
/// per-call delays let tests script overlapping submissions.
#[derive(Clone)]
pub struct MockValidationClient {
    outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    delays: Arc<Mutex<Vec<Duration>>>,
    progress_events: Arc<Mutex<Vec<u8>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockValidationClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            delays: Arc::new(Mutex::new(Vec::new())),
            progress_events: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_report_response(self, report: serde_json::Value) -> Self {
        self.outcomes.lock().unwrap().push(Ok(report));
        self
    }

    pub fn with_error_response(self, message: &str) -> Self {
        self.outcomes.lock().unwrap().push(Err(message.to_string()));
        self
    }

    /// Delay applied to the n-th call before it resolves.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.delays.lock().unwrap().push(delay);
        self
    }

    /// Progress percentages emitted on every call before resolving.
    pub fn with_progress_events(self, events: Vec<u8>) -> Self {
        *self.progress_events.lock().unwrap() = events;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockValidationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ValidationService for MockValidationClient {
    async fn validate(
        &self,
        _file: &SelectedFile,
        progress: ProgressFn,
    ) -> Result<ValidationReport> {
        let index = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count - 1
        };

        let delay = self.delays.lock().unwrap().get(index).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let events = self.progress_events.lock().unwrap().clone();
        if events.is_empty() {
            progress(100);
        } else {
            for pct in events {
                progress(pct);
            }
        }

        let outcome = {
            let outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                // Default mock response
                Ok(json!({"ectdValid": true, "status": "PASS"}))
            } else {
                outcomes[index % outcomes.len()].clone()
            }
        };

        match outcome {
            Ok(report) => Ok(ValidationReport(report)),
            Err(message) => Err(Error::Transport(message)),
        }
    }
}
