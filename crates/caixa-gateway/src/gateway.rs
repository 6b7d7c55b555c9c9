//! # Gateway Traits
//!
//! The capability the store consumes: row-oriented CRUD per collection,
//! plus the auth-session lookup.
//!
//! ## Collections
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products              one row per product                              │
//! │  sales                 one row per sale (totals, payment method, date) │
//! │  sale_line_items       child rows, keyed by sale_id                    │
//! │  expenses              one row per expense                             │
//! │  expense_tags          link rows {expense_id, tag}                     │
//! │  user_payment_methods  custom payment-method tokens                    │
//! │  user_expense_tags     tag tokens                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract Assumptions
//! - Inserts succeed or error; no partial insert within one call.
//! - Deletes are idempotent: deleting a missing row is not an error.
//! - Reads return rows in the persisted representation; normalization
//!   into entities happens in [`crate::rows`].
//! - Multi-step actions (a sale row followed by its line-item rows) are
//!   NOT transactional across calls. The store documents and accepts the
//!   resulting inconsistency window.

use async_trait::async_trait;

use crate::error::GatewayResult;
use crate::rows::{
    ExpenseRow, ExpenseTagRow, ProductRow, SaleLineItemRow, SaleRow, TokenRow,
};

// =============================================================================
// Session
// =============================================================================

/// The auth boundary: an optional authenticated-user identifier.
///
/// Mutating store actions resolve this first and abort with
/// `AuthRequired` when it is absent.
pub trait Session: Send + Sync {
    fn current_user(&self) -> Option<String>;
}

// =============================================================================
// Gateway
// =============================================================================

/// Row-oriented access to the hosted backend.
///
/// One method per remote operation the store performs; the store composes
/// them into actions. Every write is a single round trip with no retry.
#[async_trait]
pub trait Gateway: Send + Sync {
    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    async fn fetch_products(&self) -> GatewayResult<Vec<ProductRow>>;

    async fn insert_product(&self, row: &ProductRow) -> GatewayResult<()>;

    async fn update_product(&self, row: &ProductRow) -> GatewayResult<()>;

    /// Idempotent; unconditional (no referential check against sales).
    async fn delete_product(&self, id: &str) -> GatewayResult<()>;

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    async fn fetch_sales(&self) -> GatewayResult<Vec<SaleRow>>;

    async fn fetch_sale_line_items(&self) -> GatewayResult<Vec<SaleLineItemRow>>;

    async fn insert_sale(&self, row: &SaleRow) -> GatewayResult<()>;

    async fn insert_sale_line_items(&self, rows: &[SaleLineItemRow]) -> GatewayResult<()>;

    async fn update_sale(&self, row: &SaleRow) -> GatewayResult<()>;

    /// Drops every line item of `sale_id` and writes `rows` in its place.
    async fn replace_sale_line_items(
        &self,
        sale_id: &str,
        rows: &[SaleLineItemRow],
    ) -> GatewayResult<()>;

    /// Idempotent. Also drops the sale's line items.
    async fn delete_sale(&self, id: &str) -> GatewayResult<()>;

    /// Bulk cascade: every sale whose payment_method equals `old` is
    /// rewritten to `new` in one filtered update.
    async fn rename_sales_payment_method(&self, old: &str, new: &str) -> GatewayResult<()>;

    // -------------------------------------------------------------------------
    // Expenses
    // -------------------------------------------------------------------------

    async fn fetch_expenses(&self) -> GatewayResult<Vec<ExpenseRow>>;

    async fn fetch_expense_tag_links(&self) -> GatewayResult<Vec<ExpenseTagRow>>;

    async fn insert_expense(&self, row: &ExpenseRow) -> GatewayResult<()>;

    async fn insert_expense_tag_links(&self, rows: &[ExpenseTagRow]) -> GatewayResult<()>;

    async fn update_expense(&self, row: &ExpenseRow) -> GatewayResult<()>;

    /// Drops every tag link of `expense_id` and writes `rows` in its place.
    async fn replace_expense_tag_links(
        &self,
        expense_id: &str,
        rows: &[ExpenseTagRow],
    ) -> GatewayResult<()>;

    /// Idempotent. Also drops the expense's tag links.
    async fn delete_expense(&self, id: &str) -> GatewayResult<()>;

    /// Bulk cascade: every link row whose tag equals `old` becomes `new`.
    async fn rename_expense_tag_links(&self, old: &str, new: &str) -> GatewayResult<()>;

    /// Bulk cascade: every link row whose tag equals `tag` is dropped.
    async fn delete_expense_tag_links(&self, tag: &str) -> GatewayResult<()>;

    // -------------------------------------------------------------------------
    // Payment-method tokens (user_payment_methods)
    // -------------------------------------------------------------------------

    async fn fetch_payment_methods(&self) -> GatewayResult<Vec<TokenRow>>;

    async fn insert_payment_method(&self, row: &TokenRow) -> GatewayResult<()>;

    async fn rename_payment_method(&self, old: &str, new: &str) -> GatewayResult<()>;

    /// Idempotent.
    async fn delete_payment_method(&self, name: &str) -> GatewayResult<()>;

    // -------------------------------------------------------------------------
    // Tag tokens (user_expense_tags)
    // -------------------------------------------------------------------------

    async fn fetch_expense_tags(&self) -> GatewayResult<Vec<TokenRow>>;

    async fn insert_expense_tag(&self, row: &TokenRow) -> GatewayResult<()>;

    async fn rename_expense_tag(&self, old: &str, new: &str) -> GatewayResult<()>;

    /// Idempotent.
    async fn delete_expense_tag(&self, name: &str) -> GatewayResult<()>;
}
