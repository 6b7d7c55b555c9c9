//! # caixa-store: Synchronized Store for Caixa
//!
//! The heart of the system: one in-memory [`caixa_core::AppState`]
//! snapshot mirrored from the hosted row store, mutated through two-phase
//! actions (remote write, then pure reducer), surfaced to the UI through
//! the snapshot itself plus a drainable notice log.
//!
//! ## Modules
//!
//! - [`store`] - The `Store` container and its actions
//! - [`reducer`] - Pure snapshot mutators and patch types
//! - [`notice`] - User-visible notice log
//! - [`cache`] - Local snapshot cache (`caixa-storage` slot)
//! - [`error`] - `StoreError` taxonomy
//!
//! ## Example
//!
//! ```rust,no_run
//! use caixa_gateway::MemoryGateway;
//! use caixa_store::Store;
//!
//! # async fn demo() -> Result<(), caixa_store::StoreError> {
//! let mut store = Store::new(MemoryGateway::with_user("u1"));
//! store.initialize().await?;
//!
//! store.add_product("Coxinha", "de frango", 550).await?;
//! assert_eq!(store.state().products.len(), 1);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod error;
pub mod notice;
pub mod reducer;
pub mod store;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cache::{FileCache, SnapshotCache, CACHE_NAMESPACE};
pub use error::{StoreError, StoreResult};
pub use notice::{Notice, NoticeLevel, NoticeLog};
pub use reducer::{ExpensePatch, NewExpense, ProductPatch, SalePatch};
pub use store::{ActionOutcome, ActionResult, RejectReason, Store};
