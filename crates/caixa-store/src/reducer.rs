//! # Reducers
//!
//! Pure snapshot mutators: phase 2 of every action.
//!
//! ## Two-Phase Actions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  phase 1 (store.rs)        resolve session, validate, write remotely   │
//! │        │                                                                │
//! │        ▼  only on success                                               │
//! │  phase 2 (THIS MODULE)     apply a pure reducer to the snapshot        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keeping phase 2 pure means every state transition, including the
//! payment-method and tag cascades, tests without a gateway. Mutations
//! replace whole field sets; nested structures are never patched in place.

use chrono::{DateTime, Utc};

use caixa_core::{
    is_default_payment_method, AppState, Expense, ExpenseCategory, Product, Sale, SaleLine,
    DEFAULT_PAYMENT_METHODS,
};

// =============================================================================
// Patch Types
// =============================================================================

/// Partial field set for `update_product`.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
}

/// Partial field set for `edit_sale`. Replacing `items` recomputes the
/// total against current prices.
#[derive(Debug, Clone, Default)]
pub struct SalePatch {
    pub items: Option<Vec<SaleLine>>,
    pub payment_method: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Fields for a new expense (id, date and owner are supplied by the store).
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount_cents: i64,
    pub category: ExpenseCategory,
    pub is_recurring: bool,
    pub recurrence_day: Option<u8>,
    pub tags: Vec<String>,
}

/// Partial field set for `update_expense`.
///
/// `recurrence_day` is doubly optional: `None` leaves it alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub amount_cents: Option<i64>,
    pub category: Option<ExpenseCategory>,
    pub date: Option<DateTime<Utc>>,
    pub is_recurring: Option<bool>,
    pub recurrence_day: Option<Option<u8>>,
    pub tags: Option<Vec<String>>,
}

// =============================================================================
// Merge Helpers
// =============================================================================

/// Merges a patch into a product, refreshing `updated_at`.
pub fn merged_product(product: &Product, patch: &ProductPatch, now: DateTime<Utc>) -> Product {
    let mut merged = product.clone();
    if let Some(name) = &patch.name {
        merged.name = name.clone();
    }
    if let Some(description) = &patch.description {
        merged.description = description.clone();
    }
    if let Some(price_cents) = patch.price_cents {
        merged.price_cents = price_cents;
    }
    merged.updated_at = now;
    merged
}

/// Merges a patch into a sale. When items are replaced the total is
/// recomputed from CURRENT prices; the historical total is not preserved.
pub fn merged_sale(state: &AppState, sale: &Sale, patch: &SalePatch) -> Sale {
    let mut merged = sale.clone();
    if let Some(items) = &patch.items {
        merged.items = items.clone();
        merged.total_cents = state.sale_total_cents(items);
    }
    if let Some(payment_method) = &patch.payment_method {
        merged.payment_method = payment_method.clone();
    }
    if let Some(date) = patch.date {
        merged.date = date;
    }
    merged
}

/// Merges a patch into an expense.
pub fn merged_expense(expense: &Expense, patch: &ExpensePatch) -> Expense {
    let mut merged = expense.clone();
    if let Some(description) = &patch.description {
        merged.description = description.clone();
    }
    if let Some(amount_cents) = patch.amount_cents {
        merged.amount_cents = amount_cents;
    }
    if let Some(category) = patch.category {
        merged.category = category;
    }
    if let Some(date) = patch.date {
        merged.date = date;
    }
    if let Some(is_recurring) = patch.is_recurring {
        merged.is_recurring = is_recurring;
    }
    if let Some(recurrence_day) = patch.recurrence_day {
        merged.recurrence_day = recurrence_day;
    }
    if let Some(tags) = &patch.tags {
        merged.tags = tags.clone();
    }
    merged
}

// =============================================================================
// Entity Reducers
// =============================================================================

pub fn product_added(state: &mut AppState, product: Product) {
    state.products.push(product);
}

/// Replaces the product with the same id. No-op when absent.
pub fn product_replaced(state: &mut AppState, product: Product) {
    if let Some(existing) = state.products.iter_mut().find(|p| p.id == product.id) {
        *existing = product;
    }
}

pub fn product_removed(state: &mut AppState, id: &str) {
    state.products.retain(|p| p.id != id);
}

pub fn sale_added(state: &mut AppState, sale: Sale) {
    state.sales.push(sale);
}

pub fn sale_replaced(state: &mut AppState, sale: Sale) {
    if let Some(existing) = state.sales.iter_mut().find(|s| s.id == sale.id) {
        *existing = sale;
    }
}

pub fn sale_removed(state: &mut AppState, id: &str) {
    state.sales.retain(|s| s.id != id);
}

pub fn expense_added(state: &mut AppState, expense: Expense) {
    state.expenses.push(expense);
}

pub fn expense_replaced(state: &mut AppState, expense: Expense) {
    if let Some(existing) = state.expenses.iter_mut().find(|e| e.id == expense.id) {
        *existing = expense;
    }
}

pub fn expense_removed(state: &mut AppState, id: &str) {
    state.expenses.retain(|e| e.id != id);
}

// =============================================================================
// Payment-Method Reducers
// =============================================================================

/// Appends a payment method unless already present (exact, case-sensitive).
pub fn payment_method_added(state: &mut AppState, name: &str) {
    if !state.payment_methods.iter().any(|m| m == name) {
        state.payment_methods.push(name.to_string());
    }
}

/// Renames a payment method token and cascades into every sale that
/// referenced the old token.
pub fn payment_method_renamed(state: &mut AppState, old: &str, new: &str) {
    state.payment_methods = state
        .payment_methods
        .iter()
        .map(|m| if m == old { new.to_string() } else { m.clone() })
        .collect();

    state.sales = state
        .sales
        .iter()
        .map(|sale| {
            if sale.payment_method == old {
                let mut updated = sale.clone();
                updated.payment_method = new.to_string();
                updated
            } else {
                sale.clone()
            }
        })
        .collect();
}

/// Removes a payment method token. Sales keep referencing the removed
/// token (no cascade); display code tolerates dangling tokens.
pub fn payment_method_removed(state: &mut AppState, name: &str) {
    state.payment_methods.retain(|m| m != name);
}

// =============================================================================
// Tag Reducers
// =============================================================================

/// Appends a tag unless already present.
pub fn tag_added(state: &mut AppState, name: &str) {
    if !state.expense_tags.iter().any(|t| t == name) {
        state.expense_tags.push(name.to_string());
    }
}

/// Renames a tag token and cascades into every expense's tag set.
pub fn tag_renamed(state: &mut AppState, old: &str, new: &str) {
    state.expense_tags = state
        .expense_tags
        .iter()
        .map(|t| if t == old { new.to_string() } else { t.clone() })
        .collect();

    state.expenses = state
        .expenses
        .iter()
        .map(|expense| {
            if expense.tags.iter().any(|t| t == old) {
                let mut updated = expense.clone();
                updated.tags = updated
                    .tags
                    .iter()
                    .map(|t| if t == old { new.to_string() } else { t.clone() })
                    .collect();
                updated
            } else {
                expense.clone()
            }
        })
        .collect();
}

/// Removes a tag token and strips it from every expense's tag set.
pub fn tag_removed(state: &mut AppState, name: &str) {
    state.expense_tags.retain(|t| t != name);

    state.expenses = state
        .expenses
        .iter()
        .map(|expense| {
            if expense.tags.iter().any(|t| t == name) {
                let mut updated = expense.clone();
                updated.tags.retain(|t| t != name);
                updated
            } else {
                expense.clone()
            }
        })
        .collect();
}

// =============================================================================
// Fetch Reducer
// =============================================================================

/// The normalized result of one fetch per collection.
#[derive(Debug, Clone, Default)]
pub struct FetchedSnapshot {
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
    /// Custom payment-method tokens (defaults are implicit).
    pub payment_methods: Vec<String>,
    pub expense_tags: Vec<String>,
}

/// Replaces every snapshot slice wholesale with fetched rows.
///
/// Payment methods become defaults ∪ fetched custom tokens: the
/// protected defaults always exist even when no row backs them. Tags are
/// replaced as fetched (no protected set).
pub fn snapshot_replaced(state: &mut AppState, fetched: FetchedSnapshot) {
    state.products = fetched.products;
    state.sales = fetched.sales;
    state.expenses = fetched.expenses;

    let mut methods: Vec<String> = DEFAULT_PAYMENT_METHODS
        .iter()
        .map(|m| m.to_string())
        .collect();
    for custom in fetched.payment_methods {
        if !methods.iter().any(|m| *m == custom) {
            methods.push(custom);
        }
    }
    state.payment_methods = methods;

    state.expense_tags = fetched.expense_tags;

    debug_assert!(state
        .payment_methods
        .iter()
        .take(DEFAULT_PAYMENT_METHODS.len())
        .all(|m| is_default_payment_method(m)));
}

// =============================================================================
// Unit Tests
// =============================================================================
