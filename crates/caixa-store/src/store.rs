//! # Synchronized Store
//!
//! One process-wide snapshot of all business state, mirrored from the
//! hosted row store.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  created empty ──► restore_cached() (optional) ──► initialize()        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  user actions for the remainder of the session                          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  discarded at process end (no teardown)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Action Shape
//! Every mutating action runs two phases:
//!
//! 1. resolve the session, validate inputs, write remotely; any failure
//!    aborts with the snapshot untouched;
//! 2. on success only, apply a pure reducer to the snapshot.
//!
//! Guard-clause outcomes (missing id, protected default, duplicate name)
//! are not errors: they answer [`ActionOutcome::Rejected`] and change no
//! state, locally or remotely. Failures are logged, surfaced as one
//! notice, and never retried.
//!
//! ## Concurrency
//! Actions take `&mut self` and run on one logical thread; a gateway call
//! suspends the action, and unrelated actions may interleave between
//! suspension points. Reducers replace whole field sets, so whichever
//! action resumes last wins: there is no merging and no conflict
//! detection.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use caixa_core::validation;
use caixa_core::{is_default_payment_method, AppState, Expense, Product, Sale, SaleLine};
use caixa_gateway::rows::{
    expense_tag_rows, expenses_from_rows, sales_from_rows, ExpenseRow, ProductRow,
    SaleLineItemRow, SaleRow, TokenRow,
};
use caixa_gateway::{Gateway, Session};

use crate::cache::SnapshotCache;
use crate::error::{StoreError, StoreResult};
use crate::notice::{Notice, NoticeLog};
use crate::reducer::{
    self, ExpensePatch, FetchedSnapshot, NewExpense, ProductPatch, SalePatch,
};

// =============================================================================
// Action Outcomes
// =============================================================================

/// Why a guard clause turned an action into a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Update/delete addressed at an id that is not in the snapshot.
    NotFound,
    /// Rename/removal of a protected default payment method.
    ProtectedDefault,
    /// Rename target already exists and differs from the old name.
    DuplicateName,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotFound => write!(f, "target not found"),
            RejectReason::ProtectedDefault => write!(f, "protected default"),
            RejectReason::DuplicateName => write!(f, "name already exists"),
        }
    }
}

/// What an action did.
///
/// Guard clauses answer `Rejected` instead of silently returning, so
/// callers and tests can tell "applied" from "refused" deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    Rejected(RejectReason),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

/// Result type of every mutating action.
pub type ActionResult = Result<ActionOutcome, StoreError>;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Store
// =============================================================================

/// The synchronized store: snapshot + gateway + notices + optional cache.
///
/// Explicitly owned and injectable: construct one per process, or one
/// per test with a [`caixa_gateway::MemoryGateway`]. Nothing here is
/// global.
pub struct Store<G> {
    gateway: G,
    state: AppState,
    cache: Option<Box<dyn SnapshotCache>>,
    notices: NoticeLog,
    initialized: bool,
}

impl<G> Store<G>
where
    G: Gateway + Session,
{
    /// Creates an empty store over a gateway.
    pub fn new(gateway: G) -> Self {
        Store {
            gateway,
            state: AppState::default(),
            cache: None,
            notices: NoticeLog::new(),
            initialized: false,
        }
    }

    /// Attaches a local snapshot cache.
    pub fn with_cache(mut self, cache: impl SnapshotCache + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// The current snapshot: sole source of truth for the UI and for the
    /// report aggregators in `caixa_core::reports`.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The underlying gateway (tests inspect persisted rows through it).
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Whether `initialize` has completed against a live session.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Drains pending user-visible notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take_all()
    }

    // -------------------------------------------------------------------------
    // Initialization
    // -------------------------------------------------------------------------

    /// Loads the cached snapshot, if any, so the UI has something to show
    /// before the remote fetch completes. Returns whether a cache was
    /// restored. The cache may be stale; `initialize` replaces it.
    pub fn restore_cached(&mut self) -> bool {
        let Some(cache) = &self.cache else {
            return false;
        };
        match cache.load() {
            Some(state) => {
                debug!("restored snapshot from local cache");
                self.state = state;
                true
            }
            None => false,
        }
    }

    /// Fetches every collection and replaces the snapshot wholesale.
    ///
    /// Idempotent; without an active session this is a no-op. Payment
    /// methods become defaults ∪ fetched custom tokens; every other slice
    /// is exactly what the backend returned, normalized.
    pub async fn initialize(&mut self) -> StoreResult<()> {
        if self.gateway.current_user().is_none() {
            debug!("initialize skipped: no active session");
            return Ok(());
        }

        let result = self.try_initialize().await;
        match &result {
            Ok(()) => {
                info!(
                    products = self.state.products.len(),
                    sales = self.state.sales.len(),
                    expenses = self.state.expenses.len(),
                    "store initialized"
                );
                self.persist_cache();
            }
            Err(err) => {
                error!(error = %err, "initialize failed");
                self.notices.push(Notice::error(err.to_string()));
            }
        }
        result
    }

    async fn try_initialize(&mut self) -> StoreResult<()> {
        let product_rows = self.gateway.fetch_products().await?;
        let sale_rows = self.gateway.fetch_sales().await?;
        let line_rows = self.gateway.fetch_sale_line_items().await?;
        let expense_rows = self.gateway.fetch_expenses().await?;
        let link_rows = self.gateway.fetch_expense_tag_links().await?;
        let method_rows = self.gateway.fetch_payment_methods().await?;
        let tag_rows = self.gateway.fetch_expense_tags().await?;

        let products = product_rows
            .into_iter()
            .map(|row| row.into_entity())
            .collect::<Result<Vec<_>, _>>()?;
        let sales = sales_from_rows(sale_rows, line_rows)?;
        let expenses = expenses_from_rows(expense_rows, link_rows)?;

        reducer::snapshot_replaced(
            &mut self.state,
            FetchedSnapshot {
                products,
                sales,
                expenses,
                payment_methods: method_rows.into_iter().map(|t| t.name).collect(),
                expense_tags: tag_rows.into_iter().map(|t| t.name).collect(),
            },
        );
        self.initialized = true;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Product actions
    // -------------------------------------------------------------------------

    pub async fn add_product(
        &mut self,
        name: &str,
        description: &str,
        price_cents: i64,
    ) -> ActionResult {
        debug!(name = %name, price_cents, "add_product");
        let result = self.try_add_product(name, description, price_cents).await;
        self.conclude("add_product", result)
    }

    async fn try_add_product(
        &mut self,
        name: &str,
        description: &str,
        price_cents: i64,
    ) -> ActionResult {
        let user_id = self.session_user()?;
        validation::validate_product_name(name)?;
        validation::validate_description(description)?;
        validation::validate_price_cents(price_cents)?;

        let now = Utc::now();
        let product = Product {
            id: new_id(),
            user_id: Some(user_id),
            name: name.trim().to_string(),
            description: description.to_string(),
            price_cents,
            created_at: now,
            updated_at: now,
        };

        self.gateway
            .insert_product(&ProductRow::from_entity(&product))
            .await?;
        reducer::product_added(&mut self.state, product);
        Ok(ActionOutcome::Applied)
    }

    pub async fn update_product(&mut self, id: &str, patch: ProductPatch) -> ActionResult {
        debug!(id = %id, "update_product");
        let result = self.try_update_product(id, patch).await;
        self.conclude("update_product", result)
    }

    async fn try_update_product(&mut self, id: &str, patch: ProductPatch) -> ActionResult {
        self.session_user()?;
        if let Some(name) = &patch.name {
            validation::validate_product_name(name)?;
        }
        if let Some(description) = &patch.description {
            validation::validate_description(description)?;
        }
        if let Some(price_cents) = patch.price_cents {
            validation::validate_price_cents(price_cents)?;
        }

        let Some(existing) = self.state.product(id) else {
            return Ok(ActionOutcome::Rejected(RejectReason::NotFound));
        };
        let updated = reducer::merged_product(existing, &patch, Utc::now());

        self.gateway
            .update_product(&ProductRow::from_entity(&updated))
            .await?;
        reducer::product_replaced(&mut self.state, updated);
        Ok(ActionOutcome::Applied)
    }

    /// Unconditional: sales referencing the product keep their line items
    /// and render a placeholder for the missing product.
    pub async fn delete_product(&mut self, id: &str) -> ActionResult {
        debug!(id = %id, "delete_product");
        let result = self.try_delete_product(id).await;
        self.conclude("delete_product", result)
    }

    async fn try_delete_product(&mut self, id: &str) -> ActionResult {
        self.session_user()?;
        if self.state.product(id).is_none() {
            return Ok(ActionOutcome::Rejected(RejectReason::NotFound));
        }

        self.gateway.delete_product(id).await?;
        reducer::product_removed(&mut self.state, id);
        Ok(ActionOutcome::Applied)
    }

    // -------------------------------------------------------------------------
    // Sale actions
    // -------------------------------------------------------------------------

    /// Records a sale dated now. The total is computed from current
    /// product prices, never taken from the caller.
    pub async fn add_sale(&mut self, items: Vec<SaleLine>, payment_method: &str) -> ActionResult {
        debug!(lines = items.len(), payment_method = %payment_method, "add_sale");
        let result = self.try_add_sale(items, payment_method, Utc::now()).await;
        self.conclude("add_sale", result)
    }

    /// Records a sale at an explicit past date (forgotten-entry flow).
    pub async fn add_retroactive_sale(
        &mut self,
        items: Vec<SaleLine>,
        payment_method: &str,
        date: DateTime<Utc>,
    ) -> ActionResult {
        debug!(lines = items.len(), date = %date, "add_retroactive_sale");
        let result = self.try_add_sale(items, payment_method, date).await;
        self.conclude("add_retroactive_sale", result)
    }

    async fn try_add_sale(
        &mut self,
        items: Vec<SaleLine>,
        payment_method: &str,
        date: DateTime<Utc>,
    ) -> ActionResult {
        let user_id = self.session_user()?;
        validation::validate_token_name("payment method", payment_method)?;
        validation::validate_line_items(&self.state, &items)?;

        let total_cents = self.state.sale_total_cents(&items);
        let sale = Sale {
            id: new_id(),
            user_id: Some(user_id),
            items,
            total_cents,
            payment_method: payment_method.to_string(),
            date,
        };

        self.gateway.insert_sale(&SaleRow::from_entity(&sale)).await?;

        // Second remote step. If it fails, the sale row stays orphaned on
        // the backend and the snapshot is left unchanged: an accepted
        // inconsistency window, not compensated.
        let line_rows: Vec<SaleLineItemRow> = sale
            .items
            .iter()
            .map(|line| SaleLineItemRow::from_line(new_id(), &sale.id, line))
            .collect();
        self.gateway.insert_sale_line_items(&line_rows).await?;

        reducer::sale_added(&mut self.state, sale);
        Ok(ActionOutcome::Applied)
    }

    /// Replaces a sale's items, payment method and/or date. Replacing the
    /// items recomputes the total against current prices.
    pub async fn edit_sale(&mut self, id: &str, patch: SalePatch) -> ActionResult {
        debug!(id = %id, "edit_sale");
        let result = self.try_edit_sale(id, patch).await;
        self.conclude("edit_sale", result)
    }

    async fn try_edit_sale(&mut self, id: &str, patch: SalePatch) -> ActionResult {
        self.session_user()?;
        if let Some(items) = &patch.items {
            validation::validate_line_items(&self.state, items)?;
        }
        if let Some(payment_method) = &patch.payment_method {
            validation::validate_token_name("payment method", payment_method)?;
        }

        let Some(existing) = self.state.sale(id) else {
            return Ok(ActionOutcome::Rejected(RejectReason::NotFound));
        };
        let updated = reducer::merged_sale(&self.state, existing, &patch);

        self.gateway.update_sale(&SaleRow::from_entity(&updated)).await?;
        if patch.items.is_some() {
            let line_rows: Vec<SaleLineItemRow> = updated
                .items
                .iter()
                .map(|line| SaleLineItemRow::from_line(new_id(), &updated.id, line))
                .collect();
            self.gateway
                .replace_sale_line_items(&updated.id, &line_rows)
                .await?;
        }

        reducer::sale_replaced(&mut self.state, updated);
        Ok(ActionOutcome::Applied)
    }

    pub async fn delete_sale(&mut self, id: &str) -> ActionResult {
        debug!(id = %id, "delete_sale");
        let result = self.try_delete_sale(id).await;
        self.conclude("delete_sale", result)
    }

    async fn try_delete_sale(&mut self, id: &str) -> ActionResult {
        self.session_user()?;
        if self.state.sale(id).is_none() {
            return Ok(ActionOutcome::Rejected(RejectReason::NotFound));
        }

        self.gateway.delete_sale(id).await?;
        reducer::sale_removed(&mut self.state, id);
        Ok(ActionOutcome::Applied)
    }

    // -------------------------------------------------------------------------
    // Expense actions
    // -------------------------------------------------------------------------

    pub async fn add_expense(&mut self, fields: NewExpense) -> ActionResult {
        debug!(description = %fields.description, "add_expense");
        let result = self.try_add_expense(fields, Utc::now()).await;
        self.conclude("add_expense", result)
    }

    pub async fn add_retroactive_expense(
        &mut self,
        fields: NewExpense,
        date: DateTime<Utc>,
    ) -> ActionResult {
        debug!(description = %fields.description, date = %date, "add_retroactive_expense");
        let result = self.try_add_expense(fields, date).await;
        self.conclude("add_retroactive_expense", result)
    }

    async fn try_add_expense(&mut self, fields: NewExpense, date: DateTime<Utc>) -> ActionResult {
        let user_id = self.session_user()?;
        validation::validate_expense_description(&fields.description)?;
        validation::validate_amount_cents(fields.amount_cents)?;
        validation::validate_recurrence_day(fields.recurrence_day)?;

        let expense = Expense {
            id: new_id(),
            user_id: Some(user_id),
            description: fields.description,
            amount_cents: fields.amount_cents,
            category: fields.category,
            date,
            is_recurring: fields.is_recurring,
            recurrence_day: fields.recurrence_day,
            tags: fields.tags,
        };

        self.gateway
            .insert_expense(&ExpenseRow::from_entity(&expense))
            .await?;
        // Same accepted window as sales: a failed link write leaves the
        // expense row remote-only.
        self.gateway
            .insert_expense_tag_links(&expense_tag_rows(&expense))
            .await?;

        reducer::expense_added(&mut self.state, expense);
        Ok(ActionOutcome::Applied)
    }

    pub async fn update_expense(&mut self, id: &str, patch: ExpensePatch) -> ActionResult {
        debug!(id = %id, "update_expense");
        let result = self.try_update_expense(id, patch).await;
        self.conclude("update_expense", result)
    }

    async fn try_update_expense(&mut self, id: &str, patch: ExpensePatch) -> ActionResult {
        self.session_user()?;
        if let Some(description) = &patch.description {
            validation::validate_expense_description(description)?;
        }
        if let Some(amount_cents) = patch.amount_cents {
            validation::validate_amount_cents(amount_cents)?;
        }
        if let Some(recurrence_day) = patch.recurrence_day {
            validation::validate_recurrence_day(recurrence_day)?;
        }

        let Some(existing) = self.state.expense(id) else {
            return Ok(ActionOutcome::Rejected(RejectReason::NotFound));
        };
        let updated = reducer::merged_expense(existing, &patch);

        self.gateway
            .update_expense(&ExpenseRow::from_entity(&updated))
            .await?;
        if patch.tags.is_some() {
            self.gateway
                .replace_expense_tag_links(&updated.id, &expense_tag_rows(&updated))
                .await?;
        }

        reducer::expense_replaced(&mut self.state, updated);
        Ok(ActionOutcome::Applied)
    }

    pub async fn delete_expense(&mut self, id: &str) -> ActionResult {
        debug!(id = %id, "delete_expense");
        let result = self.try_delete_expense(id).await;
        self.conclude("delete_expense", result)
    }

    async fn try_delete_expense(&mut self, id: &str) -> ActionResult {
        self.session_user()?;
        if self.state.expense(id).is_none() {
            return Ok(ActionOutcome::Rejected(RejectReason::NotFound));
        }

        self.gateway.delete_expense(id).await?;
        reducer::expense_removed(&mut self.state, id);
        Ok(ActionOutcome::Applied)
    }

    // -------------------------------------------------------------------------
    // Payment-method actions
    // -------------------------------------------------------------------------

    /// Registers a custom payment method. Idempotent on an exact
    /// (case-sensitive) duplicate.
    pub async fn add_payment_method(&mut self, name: &str) -> ActionResult {
        debug!(name = %name, "add_payment_method");
        let result = self.try_add_payment_method(name).await;
        self.conclude("add_payment_method", result)
    }

    async fn try_add_payment_method(&mut self, name: &str) -> ActionResult {
        let user_id = self.session_user()?;
        validation::validate_token_name("payment method", name)?;

        if self.state.payment_methods.iter().any(|m| m == name) {
            // Already registered: the desired end state holds.
            return Ok(ActionOutcome::Applied);
        }

        self.gateway
            .insert_payment_method(&TokenRow::new(Some(user_id), name))
            .await?;
        reducer::payment_method_added(&mut self.state, name);
        Ok(ActionOutcome::Applied)
    }

    /// Renames a custom payment method and cascades into every sale
    /// referencing the old token, remotely and locally.
    pub async fn update_payment_method(&mut self, old: &str, new: &str) -> ActionResult {
        debug!(old = %old, new = %new, "update_payment_method");
        let result = self.try_update_payment_method(old, new).await;
        self.conclude("update_payment_method", result)
    }

    async fn try_update_payment_method(&mut self, old: &str, new: &str) -> ActionResult {
        self.session_user()?;
        validation::validate_token_name("payment method", new)?;

        if is_default_payment_method(old) {
            return Ok(ActionOutcome::Rejected(RejectReason::ProtectedDefault));
        }
        if old == new {
            return Ok(ActionOutcome::Applied);
        }
        if self.state.payment_methods.iter().any(|m| m == new) {
            return Ok(ActionOutcome::Rejected(RejectReason::DuplicateName));
        }
        if !self.state.payment_methods.iter().any(|m| m == old) {
            return Ok(ActionOutcome::Rejected(RejectReason::NotFound));
        }

        self.gateway.rename_payment_method(old, new).await?;
        self.gateway.rename_sales_payment_method(old, new).await?;

        reducer::payment_method_renamed(&mut self.state, old, new);
        Ok(ActionOutcome::Applied)
    }

    /// Removes a custom payment method. Sales keep referencing the
    /// removed token (no cascade).
    pub async fn remove_payment_method(&mut self, name: &str) -> ActionResult {
        debug!(name = %name, "remove_payment_method");
        let result = self.try_remove_payment_method(name).await;
        self.conclude("remove_payment_method", result)
    }

    async fn try_remove_payment_method(&mut self, name: &str) -> ActionResult {
        self.session_user()?;

        if is_default_payment_method(name) {
            return Ok(ActionOutcome::Rejected(RejectReason::ProtectedDefault));
        }
        if !self.state.payment_methods.iter().any(|m| m == name) {
            return Ok(ActionOutcome::Rejected(RejectReason::NotFound));
        }

        self.gateway.delete_payment_method(name).await?;
        reducer::payment_method_removed(&mut self.state, name);
        Ok(ActionOutcome::Applied)
    }

    // -------------------------------------------------------------------------
    // Tag actions
    // -------------------------------------------------------------------------

    /// Registers an expense tag. Idempotent on an exact duplicate.
    pub async fn add_tag(&mut self, name: &str) -> ActionResult {
        debug!(name = %name, "add_tag");
        let result = self.try_add_tag(name).await;
        self.conclude("add_tag", result)
    }

    async fn try_add_tag(&mut self, name: &str) -> ActionResult {
        let user_id = self.session_user()?;
        validation::validate_token_name("tag", name)?;

        if self.state.expense_tags.iter().any(|t| t == name) {
            return Ok(ActionOutcome::Applied);
        }

        self.gateway
            .insert_expense_tag(&TokenRow::new(Some(user_id), name))
            .await?;
        reducer::tag_added(&mut self.state, name);
        Ok(ActionOutcome::Applied)
    }

    /// Renames a tag and cascades into every expense's tag set. No
    /// protected tags exist.
    pub async fn update_tag(&mut self, old: &str, new: &str) -> ActionResult {
        debug!(old = %old, new = %new, "update_tag");
        let result = self.try_update_tag(old, new).await;
        self.conclude("update_tag", result)
    }

    async fn try_update_tag(&mut self, old: &str, new: &str) -> ActionResult {
        self.session_user()?;
        validation::validate_token_name("tag", new)?;

        if old == new {
            return Ok(ActionOutcome::Applied);
        }
        if self.state.expense_tags.iter().any(|t| t == new) {
            return Ok(ActionOutcome::Rejected(RejectReason::DuplicateName));
        }
        if !self.state.expense_tags.iter().any(|t| t == old) {
            return Ok(ActionOutcome::Rejected(RejectReason::NotFound));
        }

        self.gateway.rename_expense_tag(old, new).await?;
        self.gateway.rename_expense_tag_links(old, new).await?;

        reducer::tag_renamed(&mut self.state, old, new);
        Ok(ActionOutcome::Applied)
    }

    /// Removes a tag and strips it from every expense's tag set.
    pub async fn remove_tag(&mut self, name: &str) -> ActionResult {
        debug!(name = %name, "remove_tag");
        let result = self.try_remove_tag(name).await;
        self.conclude("remove_tag", result)
    }

    async fn try_remove_tag(&mut self, name: &str) -> ActionResult {
        self.session_user()?;

        if !self.state.expense_tags.iter().any(|t| t == name) {
            return Ok(ActionOutcome::Rejected(RejectReason::NotFound));
        }

        self.gateway.delete_expense_tag(name).await?;
        self.gateway.delete_expense_tag_links(name).await?;

        reducer::tag_removed(&mut self.state, name);
        Ok(ActionOutcome::Applied)
    }

    // -------------------------------------------------------------------------
    // Plumbing
    // -------------------------------------------------------------------------

    fn session_user(&self) -> StoreResult<String> {
        self.gateway.current_user().ok_or(StoreError::AuthRequired)
    }

    /// The single action boundary: applied actions refresh the cache,
    /// rejections are logged, failures are logged and surfaced as one
    /// user-visible notice. Nothing is retried.
    fn conclude(&mut self, action: &'static str, result: ActionResult) -> ActionResult {
        match &result {
            Ok(ActionOutcome::Applied) => {
                info!(action, "applied");
                self.persist_cache();
            }
            Ok(ActionOutcome::Rejected(reason)) => {
                warn!(action, reason = %reason, "rejected");
            }
            Err(err) => {
                error!(action, error = %err, "failed");
                self.notices.push(Notice::error(err.to_string()));
            }
        }
        result
    }

    fn persist_cache(&mut self) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.save(&self.state) {
                // Cache trouble never fails an action.
                warn!(error = %err, "could not persist snapshot cache");
            }
        }
    }
}
