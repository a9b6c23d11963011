//! Upload state machine and submission tracking.
//!
//! The shared [`UploadState`] must only ever reflect the most recently
//! issued submission. Every submission gets a monotonically increasing
//! ticket from [`SubmissionTracker::begin`], and outcomes carrying a stale
//! ticket are discarded regardless of arrival order.

use crate::models::ValidationReport;
use std::sync::Mutex;

/// Lifecycle of one upload attempt as seen by the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    Idle,
    Uploading { progress: u8 },
    Succeeded(ValidationReport),
    Failed(String),
}

impl UploadState {
    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading { .. })
    }

    pub fn progress(&self) -> Option<u8> {
        match self {
            UploadState::Uploading { progress } => Some(*progress),
            _ => None,
        }
    }
}

/// Ticket identifying one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission(u64);

#[derive(Debug)]
struct Inner {
    latest: u64,
    state: UploadState,
}

/// Owns the single shared [`UploadState`] and enforces that only the
/// latest submission can mutate it.
#[derive(Debug)]
pub struct SubmissionTracker {
    inner: Mutex<Inner>,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                latest: 0,
                state: UploadState::Idle,
            }),
        }
    }

    /// Start a new submission: replaces the state wholesale with
    /// `Uploading { progress: 0 }` and returns the ticket that outcome
    /// calls must present.
    pub fn begin(&self) -> Submission {
        let mut inner = self.inner.lock().unwrap();
        inner.latest += 1;
        inner.state = UploadState::Uploading { progress: 0 };
        Submission(inner.latest)
    }

    /// Advisory progress update. Returns false when the ticket is stale or
    /// the submission already finished.
    pub fn progress(&self, submission: Submission, pct: u8) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if submission.0 != inner.latest || !inner.state.is_uploading() {
            return false;
        }
        inner.state = UploadState::Uploading {
            progress: pct.min(100),
        };
        true
    }

    /// Terminal success for one submission. Stale tickets are discarded.
    pub fn succeed(&self, submission: Submission, report: ValidationReport) -> bool {
        self.finish(submission, UploadState::Succeeded(report))
    }

    /// Terminal failure for one submission. Stale tickets are discarded.
    pub fn fail(&self, submission: Submission, message: String) -> bool {
        self.finish(submission, UploadState::Failed(message))
    }

    fn finish(&self, submission: Submission, outcome: UploadState) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if submission.0 != inner.latest {
            tracing::debug!(
                "Discarding outcome for superseded submission {} (latest is {})",
                submission.0,
                inner.latest
            );
            return false;
        }
        inner.state = outcome;
        true
    }

    /// Back to Idle, e.g. after a new file is selected. Any in-flight
    /// submission becomes stale.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.latest += 1;
        inner.state = UploadState::Idle;
    }

    /// Cancel the in-flight submission, if any, leaving the state at Idle.
    /// The transport future itself is aborted by dropping it on the caller
    /// side. Returns whether an upload was actually in flight.
    pub fn cancel(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if !inner.state.is_uploading() {
            return false;
        }
        inner.latest += 1;
        inner.state = UploadState::Idle;
        true
    }

    pub fn snapshot(&self) -> UploadState {
        self.inner.lock().unwrap().state.clone()
    }
}

impl Default for SubmissionTracker {
    fn default() -> Self {
        Self::new()
    }
}
