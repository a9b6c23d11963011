//! Validation service integration
//!
//! Defines the service seam for submitting a file to the remote eCTD
//! validation endpoint, with a real multipart HTTP client and an
//! in-memory mock for tests.

pub mod client;
pub mod mime;
pub mod mock;

pub use client::HttpValidationClient;
pub use mock::MockValidationClient;

use crate::models::{SelectedFile, ValidationReport};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Invoked with the percentage (0-100) of the upload body handed to the
/// transport. Advisory feedback only.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

#[async_trait]
pub trait ValidationService: Send + Sync {
    async fn validate(&self, file: &SelectedFile, progress: ProgressFn)
        -> Result<ValidationReport>;
}
