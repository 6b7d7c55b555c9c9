//! # In-Process Gateway
//!
//! [`MemoryGateway`] implements [`Gateway`] and [`Session`] over in-memory
//! tables. It backs the store's tests (including the failure paths, via
//! write-failure injection) and doubles as an offline backend for
//! development.
//!
//! ## Thread Safety
//! Tables live behind a `Mutex` because store actions may run from any
//! worker thread; no lock is held across an await point (there are none).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{Gateway, Session};
use crate::rows::{
    ExpenseRow, ExpenseTagRow, ProductRow, SaleLineItemRow, SaleRow, TokenRow,
};

/// Writes remaining before injected failures kick in.
///
/// `usize::MAX` effectively disables injection.
const NO_FAILURE: usize = usize::MAX;

#[derive(Debug, Default)]
struct Tables {
    products: Vec<ProductRow>,
    sales: Vec<SaleRow>,
    sale_line_items: Vec<SaleLineItemRow>,
    expenses: Vec<ExpenseRow>,
    expense_tag_links: Vec<ExpenseTagRow>,
    payment_methods: Vec<TokenRow>,
    expense_tags: Vec<TokenRow>,
}

/// In-memory implementation of the remote row store.
#[derive(Debug)]
pub struct MemoryGateway {
    tables: Mutex<Tables>,
    session_user: Mutex<Option<String>>,
    /// Writes left before every further write fails.
    writes_before_failure: AtomicUsize,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        MemoryGateway {
            tables: Mutex::new(Tables::default()),
            session_user: Mutex::new(None),
            writes_before_failure: AtomicUsize::new(NO_FAILURE),
        }
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway with an active session.
    pub fn with_user(user_id: &str) -> Self {
        let gateway = Self::new();
        gateway.set_session(Some(user_id.to_string()));
        gateway
    }

    /// Sets or clears the authenticated user.
    pub fn set_session(&self, user_id: Option<String>) {
        *self.session_user.lock().expect("session mutex poisoned") = user_id;
    }

    /// After `n` more successful writes, every write fails until
    /// [`clear_failures`](Self::clear_failures). `fail_after_writes(0)`
    /// fails the very next write.
    pub fn fail_after_writes(&self, n: usize) {
        self.writes_before_failure.store(n, Ordering::SeqCst);
    }

    /// Disables write-failure injection.
    pub fn clear_failures(&self) {
        self.writes_before_failure.store(NO_FAILURE, Ordering::SeqCst);
    }

    fn check_write(&self) -> GatewayResult<()> {
        let remaining = self.writes_before_failure.load(Ordering::SeqCst);
        if remaining == NO_FAILURE {
            return Ok(());
        }
        if remaining == 0 {
            return Err(GatewayError::Api {
                status: 503,
                code: None,
                message: "injected write failure".to_string(),
            });
        }
        self.writes_before_failure
            .store(remaining - 1, Ordering::SeqCst);
        Ok(())
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("tables mutex poisoned")
    }

    // -------------------------------------------------------------------------
    // Test accessors
    // -------------------------------------------------------------------------

    /// Snapshot of the persisted product rows (assertions in tests).
    pub fn product_rows(&self) -> Vec<ProductRow> {
        self.tables().products.clone()
    }

    /// Snapshot of the persisted sale rows.
    pub fn sale_rows(&self) -> Vec<SaleRow> {
        self.tables().sales.clone()
    }

    /// Snapshot of the persisted line-item rows.
    pub fn sale_line_item_rows(&self) -> Vec<SaleLineItemRow> {
        self.tables().sale_line_items.clone()
    }

    /// Snapshot of the persisted expense rows.
    pub fn expense_rows(&self) -> Vec<ExpenseRow> {
        self.tables().expenses.clone()
    }

    /// Snapshot of the persisted tag link rows.
    pub fn expense_tag_link_rows(&self) -> Vec<ExpenseTagRow> {
        self.tables().expense_tag_links.clone()
    }
}

impl Session for MemoryGateway {
    fn current_user(&self) -> Option<String> {
        self.session_user
            .lock()
            .expect("session mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    async fn fetch_products(&self) -> GatewayResult<Vec<ProductRow>> {
        Ok(self.tables().products.clone())
    }

    async fn insert_product(&self, row: &ProductRow) -> GatewayResult<()> {
        self.check_write()?;
        self.tables().products.push(row.clone());
        Ok(())
    }

    async fn update_product(&self, row: &ProductRow) -> GatewayResult<()> {
        self.check_write()?;
        let mut tables = self.tables();
        if let Some(existing) = tables.products.iter_mut().find(|p| p.id == row.id) {
            *existing = row.clone();
        }
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> GatewayResult<()> {
        self.check_write()?;
        self.tables().products.retain(|p| p.id != id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    async fn fetch_sales(&self) -> GatewayResult<Vec<SaleRow>> {
        Ok(self.tables().sales.clone())
    }

    async fn fetch_sale_line_items(&self) -> GatewayResult<Vec<SaleLineItemRow>> {
        Ok(self.tables().sale_line_items.clone())
    }

    async fn insert_sale(&self, row: &SaleRow) -> GatewayResult<()> {
        self.check_write()?;
        self.tables().sales.push(row.clone());
        Ok(())
    }

    async fn insert_sale_line_items(&self, rows: &[SaleLineItemRow]) -> GatewayResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.check_write()?;
        self.tables().sale_line_items.extend(rows.iter().cloned());
        Ok(())
    }

    async fn update_sale(&self, row: &SaleRow) -> GatewayResult<()> {
        self.check_write()?;
        let mut tables = self.tables();
        if let Some(existing) = tables.sales.iter_mut().find(|s| s.id == row.id) {
            *existing = row.clone();
        }
        Ok(())
    }

    async fn replace_sale_line_items(
        &self,
        sale_id: &str,
        rows: &[SaleLineItemRow],
    ) -> GatewayResult<()> {
        self.check_write()?;
        let mut tables = self.tables();
        tables.sale_line_items.retain(|l| l.sale_id != sale_id);
        tables.sale_line_items.extend(rows.iter().cloned());
        Ok(())
    }

    async fn delete_sale(&self, id: &str) -> GatewayResult<()> {
        self.check_write()?;
        let mut tables = self.tables();
        tables.sale_line_items.retain(|l| l.sale_id != id);
        tables.sales.retain(|s| s.id != id);
        Ok(())
    }

    async fn rename_sales_payment_method(&self, old: &str, new: &str) -> GatewayResult<()> {
        self.check_write()?;
        for sale in self
            .tables()
            .sales
            .iter_mut()
            .filter(|s| s.payment_method == old)
        {
            sale.payment_method = new.to_string();
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Expenses
    // -------------------------------------------------------------------------

    async fn fetch_expenses(&self) -> GatewayResult<Vec<ExpenseRow>> {
        Ok(self.tables().expenses.clone())
    }

    async fn fetch_expense_tag_links(&self) -> GatewayResult<Vec<ExpenseTagRow>> {
        Ok(self.tables().expense_tag_links.clone())
    }

    async fn insert_expense(&self, row: &ExpenseRow) -> GatewayResult<()> {
        self.check_write()?;
        self.tables().expenses.push(row.clone());
        Ok(())
    }

    async fn insert_expense_tag_links(&self, rows: &[ExpenseTagRow]) -> GatewayResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.check_write()?;
        self.tables().expense_tag_links.extend(rows.iter().cloned());
        Ok(())
    }

    async fn update_expense(&self, row: &ExpenseRow) -> GatewayResult<()> {
        self.check_write()?;
        let mut tables = self.tables();
        if let Some(existing) = tables.expenses.iter_mut().find(|e| e.id == row.id) {
            *existing = row.clone();
        }
        Ok(())
    }

    async fn replace_expense_tag_links(
        &self,
        expense_id: &str,
        rows: &[ExpenseTagRow],
    ) -> GatewayResult<()> {
        self.check_write()?;
        let mut tables = self.tables();
        tables.expense_tag_links.retain(|l| l.expense_id != expense_id);
        tables.expense_tag_links.extend(rows.iter().cloned());
        Ok(())
    }

    async fn delete_expense(&self, id: &str) -> GatewayResult<()> {
        self.check_write()?;
        let mut tables = self.tables();
        tables.expense_tag_links.retain(|l| l.expense_id != id);
        tables.expenses.retain(|e| e.id != id);
        Ok(())
    }

    async fn rename_expense_tag_links(&self, old: &str, new: &str) -> GatewayResult<()> {
        self.check_write()?;
        for link in self
            .tables()
            .expense_tag_links
            .iter_mut()
            .filter(|l| l.tag == old)
        {
            link.tag = new.to_string();
        }
        Ok(())
    }

    async fn delete_expense_tag_links(&self, tag: &str) -> GatewayResult<()> {
        self.check_write()?;
        self.tables().expense_tag_links.retain(|l| l.tag != tag);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Payment-method tokens
    // -------------------------------------------------------------------------

    async fn fetch_payment_methods(&self) -> GatewayResult<Vec<TokenRow>> {
        Ok(self.tables().payment_methods.clone())
    }

    async fn insert_payment_method(&self, row: &TokenRow) -> GatewayResult<()> {
        self.check_write()?;
        self.tables().payment_methods.push(row.clone());
        Ok(())
    }

    async fn rename_payment_method(&self, old: &str, new: &str) -> GatewayResult<()> {
        self.check_write()?;
        for token in self
            .tables()
            .payment_methods
            .iter_mut()
            .filter(|t| t.name == old)
        {
            token.name = new.to_string();
        }
        Ok(())
    }

    async fn delete_payment_method(&self, name: &str) -> GatewayResult<()> {
        self.check_write()?;
        self.tables().payment_methods.retain(|t| t.name != name);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Tag tokens
    // -------------------------------------------------------------------------

    async fn fetch_expense_tags(&self) -> GatewayResult<Vec<TokenRow>> {
        Ok(self.tables().expense_tags.clone())
    }

    async fn insert_expense_tag(&self, row: &TokenRow) -> GatewayResult<()> {
        self.check_write()?;
        self.tables().expense_tags.push(row.clone());
        Ok(())
    }

    async fn rename_expense_tag(&self, old: &str, new: &str) -> GatewayResult<()> {
        self.check_write()?;
        for token in self
            .tables()
            .expense_tags
            .iter_mut()
            .filter(|t| t.name == old)
        {
            token.name = new.to_string();
        }
        Ok(())
    }

    async fn delete_expense_tag(&self, name: &str) -> GatewayResult<()> {
        self.check_write()?;
        self.tables().expense_tags.retain(|t| t.name != name);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::rows::decimal_from_cents;

    fn product_row(id: &str) -> ProductRow {
        ProductRow {
            id: id.to_string(),
            user_id: Some("u1".to_string()),
            name: format!("Product {}", id),
            description: None,
            price: decimal_from_cents(500),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let gateway = MemoryGateway::with_user("u1");
        gateway.insert_product(&product_row("p1")).await.unwrap();

        let rows = gateway.fetch_products().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "p1");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let gateway = MemoryGateway::new();
        gateway.delete_product("never-existed").await.unwrap();
        gateway.delete_expense_tag("ghost").await.unwrap();
    }

    #[tokio::test]
    async fn test_failure_injection_counts_writes() {
        let gateway = MemoryGateway::new();
        gateway.fail_after_writes(1);

        // First write still lands...
        gateway.insert_product(&product_row("p1")).await.unwrap();
        // ...the next one fails.
        let err = gateway.insert_product(&product_row("p2")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Api { status: 503, .. }));

        // Reads are unaffected; the first row is still there.
        assert_eq!(gateway.fetch_products().await.unwrap().len(), 1);

        gateway.clear_failures();
        gateway.insert_product(&product_row("p3")).await.unwrap();
    }

    #[tokio::test]
    async fn test_session_toggle() {
        let gateway = MemoryGateway::new();
        assert!(gateway.current_user().is_none());

        gateway.set_session(Some("u1".to_string()));
        assert_eq!(gateway.current_user().as_deref(), Some("u1"));

        gateway.set_session(None);
        assert!(gateway.current_user().is_none());
    }
}
