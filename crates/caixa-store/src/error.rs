//! # Store Error Types
//!
//! The action-boundary error taxonomy.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AuthRequired     no session; aborts before any remote call             │
//! │  Validation       caller-supplied data violates an entity invariant     │
//! │  Remote           the gateway call failed; earlier writes of the same   │
//! │                   action are NOT rolled back                            │
//! │                                                                         │
//! │  NotFound is not an error: update/delete addressed at a missing id      │
//! │  answers ActionOutcome::Rejected(NotFound) with no state change.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use caixa_core::ValidationError;
use caixa_gateway::GatewayError;

/// Why a store action failed.
///
/// Every failure is logged and surfaced as a one-line notice; the snapshot
/// is left unchanged and nothing is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No authenticated session; the action aborted before any remote call.
    #[error("sign in to record changes")]
    AuthRequired,

    /// Input violates an entity invariant; checked before any remote call.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// A gateway call failed mid-action. Remote writes that succeeded
    /// before the failing call remain in place (no compensation).
    #[error("could not reach the data service: {0}")]
    Remote(#[from] GatewayError),
}

/// Result type for store actions that yield a value.
pub type StoreResult<T> = Result<T, StoreError>;
