//! # Domain Types
//!
//! Core domain types used throughout Caixa.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Expense      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  items[]        │   │  description    │       │
//! │  │  price_cents    │   │  total_cents    │   │  amount_cents   │       │
//! │  │  created_at     │   │  payment_method │   │  category/tags  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Payment methods and expense tags are plain string tokens held in      │
//! │  the AppState snapshot, not entities of their own.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity id is a UUID v4 string, generated at creation time and
//! immutable afterwards. Owning-user references are optional: rows written
//! before authentication landed in the product have none.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Defaults
// =============================================================================

/// Protected payment methods. Always present, never renamed or removed.
pub const DEFAULT_PAYMENT_METHODS: [&str; 5] = ["cash", "credit", "debit", "pix", "other"];

/// Starter expense tags seeded into a fresh snapshot.
///
/// Unlike payment methods these are NOT protected: the user may rename or
/// remove every one of them.
pub const DEFAULT_EXPENSE_TAGS: [&str; 7] = [
    "food",
    "supplies",
    "maintenance",
    "utilities",
    "rent",
    "taxes",
    "other",
];

/// Returns true if `name` is one of the protected payment methods.
pub fn is_default_payment_method(name: &str) -> bool {
    DEFAULT_PAYMENT_METHODS.contains(&name)
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning user, when the row was written by an authenticated session.
    pub user_id: Option<String>,

    /// Display name.
    pub name: String,

    /// Free-text description.
    pub description: String,

    /// Unit price in centavos. Never negative.
    pub price_cents: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated. Refreshes on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One line of a sale: a product reference and a quantity.
///
/// The product is referenced by id only. A line survives the deletion of
/// its product; display code must tolerate an unresolvable `product_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: String,

    /// Units sold. Always ≥ 1.
    pub quantity: i64,
}

/// A recorded sale transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub user_id: Option<String>,

    /// Ordered line items.
    pub items: Vec<SaleLine>,

    /// Total in centavos.
    ///
    /// Invariant: equals Σ(quantity × product price) evaluated against the
    /// product snapshot at the moment of creation or edit. Not preserved
    /// historically: re-editing the items recomputes against current prices.
    pub total_cents: i64,

    /// Payment method token. One of the registered methods or a custom one;
    /// may dangle after a custom method is removed.
    pub payment_method: String,

    /// When the sale happened (may be retroactive).
    pub date: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as a Money type.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Expense
// =============================================================================

/// Expense category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    /// Recurring cost of keeping the doors open (rent, payroll).
    Fixed,
    /// Day-to-day variable cost (ingredients, repairs).
    Variable,
}

/// A recorded expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub user_id: Option<String>,
    pub description: String,

    /// Amount in centavos. Always positive.
    pub amount_cents: i64,

    pub category: ExpenseCategory,

    /// When the expense happened (may be retroactive).
    pub date: DateTime<Utc>,

    /// Whether the expense repeats monthly.
    #[serde(default)]
    pub is_recurring: bool,

    /// Day of month (1-31) the recurrence falls on.
    /// Meaningful only when `category == Fixed && is_recurring`.
    #[serde(default)]
    pub recurrence_day: Option<u8>,

    /// Tag tokens. May be empty.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Expense {
    /// Returns the amount as a Money type.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// AppState Snapshot
// =============================================================================

/// The aggregate snapshot mirrored from the remote store.
///
/// This is the sole source of truth for the UI and for every derived
/// aggregate. Mutated only through the store's reducers; each mutation
/// replaces whole field sets rather than patching nested structures in
/// place, so applying a mutation is safe regardless of interleaving
/// (last write wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
    pub payment_methods: Vec<String>,
    pub expense_tags: Vec<String>,
}

impl Default for AppState {
    /// A fresh snapshot: empty collections, default payment methods,
    /// starter expense tags.
    fn default() -> Self {
        AppState {
            products: Vec::new(),
            sales: Vec::new(),
            expenses: Vec::new(),
            payment_methods: DEFAULT_PAYMENT_METHODS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            expense_tags: DEFAULT_EXPENSE_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl AppState {
    /// Looks up a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a sale by id.
    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    /// Looks up an expense by id.
    pub fn expense(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Computes a sale total from line items against current prices.
    ///
    /// A line whose product is missing from the snapshot contributes zero,
    /// mirroring how display code renders deleted products.
    pub fn sale_total_cents(&self, items: &[SaleLine]) -> i64 {
        items
            .iter()
            .map(|line| {
                self.product(&line.product_id)
                    .map(|p| p.price_cents * line.quantity)
                    .unwrap_or(0)
            })
            .sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            user_id: None,
            name: format!("Product {}", id),
            description: String::new(),
            price_cents,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_snapshot() {
        let state = AppState::default();
        assert!(state.products.is_empty());
        assert_eq!(state.payment_methods.len(), 5);
        assert!(state.payment_methods.contains(&"pix".to_string()));
        assert!(state.expense_tags.contains(&"rent".to_string()));
    }

    #[test]
    fn test_is_default_payment_method() {
        assert!(is_default_payment_method("cash"));
        assert!(is_default_payment_method("pix"));
        assert!(!is_default_payment_method("voucher"));
        // Case sensitive exact match
        assert!(!is_default_payment_method("Cash"));
    }

    #[test]
    fn test_sale_total_from_current_prices() {
        let mut state = AppState::default();
        state.products.push(product("p1", 1000));
        state.products.push(product("p2", 500));

        let items = vec![
            SaleLine {
                product_id: "p1".to_string(),
                quantity: 2,
            },
            SaleLine {
                product_id: "p2".to_string(),
                quantity: 1,
            },
        ];

        assert_eq!(state.sale_total_cents(&items), 2500);
    }

    #[test]
    fn test_sale_total_tolerates_missing_product() {
        let mut state = AppState::default();
        state.products.push(product("p1", 1000));

        let items = vec![
            SaleLine {
                product_id: "p1".to_string(),
                quantity: 1,
            },
            SaleLine {
                product_id: "ghost".to_string(),
                quantity: 3,
            },
        ];

        // Missing product contributes zero rather than failing.
        assert_eq!(state.sale_total_cents(&items), 1000);
    }
}
