use super::{mime, ProgressFn, ValidationService};
use crate::models::{Config, SelectedFile, ValidationReport};
use crate::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Multipart upload client for the remote validation endpoint.
pub struct HttpValidationClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpValidationClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Transport(err.to_string())
        }
    }

    /// Wrap the file content in a chunked stream that reports, after each
    /// chunk is handed to the transport, how much of the body has been sent.
    fn progress_body(file: &SelectedFile, progress: ProgressFn) -> Body {
        let total = file.bytes.len() as u64;
        let chunks: Vec<std::io::Result<Vec<u8>>> = file
            .bytes
            .chunks(UPLOAD_CHUNK_SIZE)
            .map(|chunk| Ok(chunk.to_vec()))
            .collect();

        let sent = Arc::new(AtomicU64::new(0));
        let stream = futures::stream::iter(chunks).inspect(move |chunk| {
            if let Ok(chunk) = chunk {
                let sent_so_far =
                    sent.fetch_add(chunk.len() as u64, Ordering::SeqCst) + chunk.len() as u64;
                let pct = ((sent_so_far as f64 / total as f64) * 100.0).round() as u8;
                progress(pct);
            }
        });

        Body::wrap_stream(stream)
    }
}

#[async_trait]
impl ValidationService for HttpValidationClient {
    async fn validate(
        &self,
        file: &SelectedFile,
        progress: ProgressFn,
    ) -> Result<ValidationReport> {
        let mime_type = mime::detect_upload_mime(&file.bytes);
        let body = Self::progress_body(file, progress.clone());
        let part = Part::stream_with_length(body, file.bytes.len() as u64)
            .file_name(file.name.clone())
            .mime_str(mime_type)
            .map_err(|e| Error::Config(format!("Invalid part mime type {}: {}", mime_type, e)))?;
        let form = Form::new().part("file", part);

        tracing::info!(
            "Uploading {} ({} bytes) to {}",
            file.name,
            file.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Upload request failed: {}", e);
                self.classify(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| self.classify(e))?;
            tracing::error!("Validation service error (status {}): {}", status, body);
            return Err(Error::HttpStatus { status, body });
        }

        progress(100);

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse validation response: {}\nBody: {}", e, body);
            e
        })?;

        Ok(ValidationReport(value))
    }
}
