//! Upload client for a remote eCTD validation service
//!
//! Submits a user-chosen PDF as multipart form data to a configured HTTP
//! endpoint, tracks upload progress, and surfaces the JSON validation
//! report (or a human-readable error) for display.

pub mod app;
pub mod error;
pub mod models;
pub mod state;
pub mod validate;

pub use error::{Error, Result};
