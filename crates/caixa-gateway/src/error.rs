//! # Gateway Error Types
//!
//! Error types for remote row store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  HTTP failure (reqwest::Error) ──┐                                      │
//! │                                  │                                      │
//! │  API error body (PostgREST) ─────┼──► GatewayError (this module)        │
//! │                                  │         │                            │
//! │  Row shape mismatch ─────────────┘         ▼                            │
//! │                                   StoreError::Remote (caixa-store)      │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                                   user-visible notice                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Remote row store errors.
///
/// The store never retries these; it logs them, surfaces a notice and
/// leaves the snapshot unchanged.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend answered with an error status.
    ///
    /// ## When This Occurs
    /// - Constraint violation on insert/update
    /// - Row-level security rejecting the write
    /// - Any non-2xx answer from the REST endpoint
    #[error("backend error{}: {message} (status {status})", fmt_code(.code))]
    Api {
        status: u16,
        /// Backend error code when the body carried one (e.g. "23505").
        code: Option<String>,
        message: String,
    },

    /// The request never produced an answer (DNS, TLS, connection reset).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured base URL or a derived endpoint is invalid.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A fetched row could not be normalized into an entity.
    ///
    /// ## When This Occurs
    /// - Money column holds a malformed decimal
    /// - Category token outside the known set
    #[error("cannot decode {row} row: {reason}")]
    Decode { row: &'static str, reason: String },

    /// Request or response body (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GatewayError {
    /// Creates a Decode error for a given row kind.
    pub fn decode(row: &'static str, reason: impl Into<String>) -> Self {
        GatewayError::Decode {
            row,
            reason: reason.into(),
        }
    }
}

fn fmt_code(code: &Option<String>) -> String {
    match code {
        Some(c) => format!(" [{}]", c),
        None => String::new(),
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
