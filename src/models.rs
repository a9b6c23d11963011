//! Data models and structures
//!
//! Defines the configuration, the selected file handle, and the validation
//! report wrapper returned by the remote service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/validate";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let endpoint =
            std::env::var("ECTD_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let timeout_secs = match std::env::var("ECTD_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                crate::Error::Config(format!("ECTD_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Apply CLI-level overrides on top of the environment configuration.
    pub fn with_overrides(mut self, endpoint: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }
}

/// A user-chosen file: name plus raw content, replaced wholesale on
/// re-selection.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.pdf")
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(Self { name, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Opaque validation report from the remote service.
///
/// The body is passed through unmodified; the only field the client ever
/// inspects is the optional boolean `ectdValid`, which drives the pass/fail
/// verdict line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport(pub serde_json::Value);

impl ValidationReport {
    pub fn ectd_valid(&self) -> Option<bool> {
        self.0.get("ectdValid").and_then(|v| v.as_bool())
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.ectd_valid().map(|valid| {
            if valid {
                Verdict::Passed
            } else {
                Verdict::Failed
            }
        })
    }

    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Passed => write!(f, "eCTD Compliance Check Passed"),
            Verdict::Failed => write!(f, "eCTD Compliance Check Failed"),
        }
    }
}
