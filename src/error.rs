//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no file selected; choose a PDF before submitting")]
    MissingFile,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("upload timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("validation service returned {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("response body was not valid JSON: {0}")]
    ResponseFormat(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
