//! # caixa-gateway: Remote Data Gateway for Caixa
//!
//! Everything that touches the hosted row store lives here: the
//! [`Gateway`] and [`Session`] traits the store consumes, the persisted
//! row shapes with their entity normalization, a PostgREST-style
//! [`RestGateway`], and an in-process [`MemoryGateway`] for tests.
//!
//! ## Modules
//!
//! - [`gateway`] - The `Gateway` / `Session` traits
//! - [`rows`] - Wire row shapes and row ↔ entity mapping
//! - [`rest`] - REST implementation over reqwest
//! - [`memory`] - In-process implementation for tests and offline use
//! - [`error`] - `GatewayError` / `GatewayResult`

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gateway;
pub mod memory;
pub mod rest;
pub mod rows;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{GatewayError, GatewayResult};
pub use gateway::{Gateway, Session};
pub use memory::MemoryGateway;
pub use rest::RestGateway;
pub use rows::{
    ExpenseRow, ExpenseTagRow, ProductRow, SaleLineItemRow, SaleRow, TokenRow,
};
