//! Application orchestration for one upload session.

use crate::models::{Config, SelectedFile, ValidationReport};
use crate::state::{SubmissionTracker, UploadState};
use crate::validate::{HttpValidationClient, ProgressFn, ValidationService};
use crate::{Error, Result};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Coordinates file selection, submission, and result rendering.
///
/// The shared upload state only ever reflects the most recently issued
/// submission; superseded responses are discarded by the tracker.
pub struct App {
    service: Box<dyn ValidationService>,
    tracker: Arc<SubmissionTracker>,
    selected: Mutex<Option<Arc<SelectedFile>>>,
    progress_hook: Option<ProgressFn>,
}

impl App {
    /// Build an app from a concrete service dependency.
    ///
    /// This is primarily useful for integration tests and harnesses that
    /// need to inject mocks.
    pub fn with_service(service: Box<dyn ValidationService>) -> Self {
        Self {
            service,
            tracker: Arc::new(SubmissionTracker::new()),
            selected: Mutex::new(None),
            progress_hook: None,
        }
    }

    /// Construct an app talking to the configured HTTP endpoint.
    pub fn new(config: &Config) -> Result<Self> {
        let client = HttpValidationClient::new(config)?;
        Ok(Self::with_service(Box::new(client)))
    }

    /// External observer for progress updates, e.g. a terminal progress
    /// bar. Only invoked for updates belonging to the latest submission.
    pub fn set_progress_hook(&mut self, hook: ProgressFn) {
        self.progress_hook = Some(hook);
    }

    /// Store the chosen file, clearing any prior result or error.
    pub fn select_file(&self, file: SelectedFile) {
        info!("Selected {} ({} bytes)", file.name, file.len());
        *self.selected.lock().unwrap() = Some(Arc::new(file));
        self.tracker.reset();
    }

    pub fn state(&self) -> UploadState {
        self.tracker.snapshot()
    }

    /// Cancel the in-flight submission, if any. The shared state returns
    /// to Idle and the superseded response is discarded on arrival.
    pub fn cancel(&self) -> bool {
        self.tracker.cancel()
    }

    /// Submit the selected file for validation.
    ///
    /// Fails immediately with [`Error::MissingFile`] when no file is
    /// selected; no request is made in that case. Returns this
    /// submission's own outcome; the shared state is updated through the
    /// tracker so a superseded submission cannot overwrite a newer one.
    pub async fn submit(&self) -> Result<ValidationReport> {
        let file = self
            .selected
            .lock()
            .unwrap()
            .clone()
            .ok_or(Error::MissingFile)?;

        let submission = self.tracker.begin();
        let tracker = Arc::clone(&self.tracker);
        let hook = self.progress_hook.clone();
        let progress: ProgressFn = Arc::new(move |pct| {
            if tracker.progress(submission, pct) {
                if let Some(hook) = &hook {
                    hook(pct);
                }
            }
        });

        match self.service.validate(&file, progress).await {
            Ok(report) => {
                if self.tracker.succeed(submission, report.clone()) {
                    info!("Validation response received for {}", file.name);
                }
                Ok(report)
            }
            Err(err) => {
                self.tracker.fail(submission, err.to_string());
                Err(err)
            }
        }
    }

    /// One-shot CLI flow: load the file, submit it, and print the report.
    pub async fn run(&self, path: Option<&Path>) -> Result<()> {
        let path = path.ok_or(Error::MissingFile)?;
        let file = SelectedFile::from_path(path)?;
        self.select_file(file);

        let report = self.submit().await?;

        println!("{}", report.to_pretty());
        if let Some(verdict) = report.verdict() {
            println!("{}", verdict);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;
    use crate::validate::MockValidationClient;
    use serde_json::json;
    use std::time::Duration;

    fn test_file() -> SelectedFile {
        SelectedFile {
            name: "dossier.pdf".to_string(),
            bytes: b"%PDF-1.4\ncontent".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_submit_without_file_makes_no_service_call() {
        let mock = MockValidationClient::new();
        let probe = mock.clone();
        let app = App::with_service(Box::new(mock));

        let err = app.submit().await.unwrap_err();

        assert!(matches!(err, Error::MissingFile));
        assert_eq!(probe.get_call_count(), 0);
        assert_eq!(app.state(), UploadState::Idle);
    }

    #[tokio::test]
    async fn test_submit_success_reflects_report() {
        let mock =
            MockValidationClient::new().with_report_response(json!({"ectdValid": true}));
        let app = App::with_service(Box::new(mock));

        app.select_file(test_file());
        let report = app.submit().await.unwrap();

        assert_eq!(report.verdict(), Some(Verdict::Passed));
        assert_eq!(app.state(), UploadState::Succeeded(report));
    }

    #[tokio::test]
    async fn test_submit_failure_sets_failed_with_message() {
        let mock = MockValidationClient::new().with_error_response("connection refused");
        let app = App::with_service(Box::new(mock));

        app.select_file(test_file());
        let err = app.submit().await.unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        match app.state() {
            UploadState::Failed(message) => assert!(!message.is_empty()),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_progress_starts_over_after_failure() {
        let mock = MockValidationClient::new()
            .with_error_response("boom")
            .with_delay(Duration::from_millis(0))
            .with_delay(Duration::from_secs(60));
        let app = App::with_service(Box::new(mock));

        app.select_file(test_file());
        let _ = app.submit().await;

        // The next submission replaces the failure and starts at zero.
        let pending = app.submit();
        tokio::pin!(pending);
        let _ =
            tokio::time::timeout(Duration::from_millis(50), pending.as_mut()).await;
        assert_eq!(app.state(), UploadState::Uploading { progress: 0 });
    }

    #[tokio::test]
    async fn test_select_file_clears_prior_result() {
        let mock =
            MockValidationClient::new().with_report_response(json!({"ectdValid": false}));
        let app = App::with_service(Box::new(mock));

        app.select_file(test_file());
        app.submit().await.unwrap();
        assert!(matches!(app.state(), UploadState::Succeeded(_)));

        app.select_file(test_file());
        assert_eq!(app.state(), UploadState::Idle);
    }

    #[tokio::test]
    async fn test_later_submission_wins_when_first_response_arrives_last() {
        let mock = MockValidationClient::new()
            .with_report_response(json!({"seq": 1}))
            .with_report_response(json!({"seq": 2}))
            .with_delay(Duration::from_millis(200))
            .with_delay(Duration::from_millis(10));
        let app = App::with_service(Box::new(mock));

        app.select_file(test_file());
        let (first, second) = tokio::join!(app.submit(), app.submit());

        // Each submission still observes its own outcome.
        assert_eq!(first.unwrap().0["seq"], 1);
        assert_eq!(second.unwrap().0["seq"], 2);

        // The shared state only reflects the later submission.
        match app.state() {
            UploadState::Succeeded(report) => assert_eq!(report.0["seq"], 2),
            other => panic!("expected Succeeded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_later_submission_wins_when_responses_arrive_in_order() {
        let mock = MockValidationClient::new()
            .with_report_response(json!({"seq": 1}))
            .with_report_response(json!({"seq": 2}))
            .with_delay(Duration::from_millis(10))
            .with_delay(Duration::from_millis(200));
        let app = App::with_service(Box::new(mock));

        app.select_file(test_file());
        let _ = tokio::join!(app.submit(), app.submit());

        match app.state() {
            UploadState::Succeeded(report) => assert_eq!(report.0["seq"], 2),
            other => panic!("expected Succeeded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_progress_hook_sees_tracked_updates_only() {
        let mock =
            MockValidationClient::new().with_progress_events(vec![25, 50, 75, 100]);
        let mut app = App::with_service(Box::new(mock));

        let seen: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        app.set_progress_hook(Arc::new(move |pct| sink.lock().unwrap().push(pct)));

        app.select_file(test_file());
        app.submit().await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![25, 50, 75, 100]);
    }

    #[tokio::test]
    async fn test_run_without_path_is_missing_file() {
        let mock = MockValidationClient::new();
        let probe = mock.clone();
        let app = App::with_service(Box::new(mock));

        let err = app.run(None).await.unwrap_err();

        assert!(matches!(err, Error::MissingFile));
        assert_eq!(probe.get_call_count(), 0);
    }
}
