//! Where raw items come from.
//!
//! The engine never talks to a tracker directly. Anything that can produce
//! a batch of [`RawItem`]s implements [`ItemSource`]; [`fetch_with_retry`]
//! wraps a source with bounded, backed-off retries.

mod json;
mod retry;

pub use json::JsonFileSource;
pub use retry::{RetryPolicy, RetryState, fetch_with_retry};

use crate::model::RawItem;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Unauthorized: check the tracker token")]
    Unauthorized,

    #[error("Rate limited{}", .reset.as_ref().map(|r| format!(" until {r}")).unwrap_or_default())]
    RateLimited { reset: Option<String> },

    #[error("HTTP {status}")]
    Http {
        status: u16,
        retry_after: Option<u64>,
    },

    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SourceError {
    /// Failures worth another attempt. Auth and malformed payloads are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::RateLimited { .. } | SourceError::Transient(_) => true,
            SourceError::Http { status, .. } => *status == 429 || *status >= 500,
            SourceError::Unauthorized | SourceError::Io(_) | SourceError::Json(_) => false,
        }
    }

    /// Server-provided wait hint in seconds, if any.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            SourceError::Http { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

pub trait ItemSource {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    fn fetch(&mut self) -> Result<Vec<RawItem>, SourceError>;
}
