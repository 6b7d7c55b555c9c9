//! # Wire Rows & Normalization
//!
//! Persisted row shapes for the hosted backend, and the explicit mapping
//! between rows and entities.
//!
//! ## Persisted Representation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Row (wire)                          Entity (caixa-core)               │
//! │  ──────────────────────────          ─────────────────────────         │
//! │  snake_case field names        ───►  struct fields                     │
//! │  money as decimal string       ───►  integer centavos (i64)            │
//! │  "10.50" or 10.5                                                        │
//! │  category as text token        ───►  ExpenseCategory enum              │
//! │  child rows (line items, tag   ───►  attached to their parent          │
//! │  links) fetched per collection                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mapping lives here, next to the trait that produces the rows, and
//! every coercion is a [`GatewayError::Decode`] on bad input, never a panic.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use caixa_core::{Expense, ExpenseCategory, Product, Sale, SaleLine};

use crate::error::{GatewayError, GatewayResult};

// =============================================================================
// Money Coercion
// =============================================================================

/// Converts a wire decimal into centavos.
///
/// The backend serializes numeric columns as strings ("10.50") or, behind
/// some proxies, as JSON numbers; serde handles both into `Decimal`. A
/// value that does not fit integer centavos is a decode error.
pub fn cents_from_decimal(row: &'static str, field: &str, value: Decimal) -> GatewayResult<i64> {
    let scaled = (value * Decimal::from(100)).round_dp(0);
    scaled.to_i64().ok_or_else(|| {
        GatewayError::decode(row, format!("{} out of range: {}", field, value))
    })
}

/// Converts centavos into the wire decimal (two fractional digits).
pub fn decimal_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

// =============================================================================
// Category Tokens
// =============================================================================

const CATEGORY_FIXED: &str = "fixed";
const CATEGORY_VARIABLE: &str = "variable";

fn category_to_token(category: ExpenseCategory) -> &'static str {
    match category {
        ExpenseCategory::Fixed => CATEGORY_FIXED,
        ExpenseCategory::Variable => CATEGORY_VARIABLE,
    }
}

fn category_from_token(token: &str) -> GatewayResult<ExpenseCategory> {
    match token {
        CATEGORY_FIXED => Ok(ExpenseCategory::Fixed),
        CATEGORY_VARIABLE => Ok(ExpenseCategory::Variable),
        other => Err(GatewayError::decode(
            "expenses",
            format!("unknown category token: {}", other),
        )),
    }
}

// =============================================================================
// Product Rows
// =============================================================================

/// One row of the `products` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    /// Builds the persisted row for an entity.
    pub fn from_entity(product: &Product) -> Self {
        ProductRow {
            id: product.id.clone(),
            user_id: product.user_id.clone(),
            name: product.name.clone(),
            description: if product.description.is_empty() {
                None
            } else {
                Some(product.description.clone())
            },
            price: decimal_from_cents(product.price_cents),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }

    /// Normalizes the row into an entity.
    pub fn into_entity(self) -> GatewayResult<Product> {
        let price_cents = cents_from_decimal("products", "price", self.price)?;
        Ok(Product {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            price_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// =============================================================================
// Sale Rows
// =============================================================================

/// One row of the `sales` collection. Line items live in their own
/// collection and are attached during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRow {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub total: Decimal,
    pub payment_method: String,
    pub sale_date: DateTime<Utc>,
}

/// One row of the `sale_line_items` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLineItemRow {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
}

impl SaleRow {
    pub fn from_entity(sale: &Sale) -> Self {
        SaleRow {
            id: sale.id.clone(),
            user_id: sale.user_id.clone(),
            total: decimal_from_cents(sale.total_cents),
            payment_method: sale.payment_method.clone(),
            sale_date: sale.date,
        }
    }
}

impl SaleLineItemRow {
    /// Builds a child row for one line of a sale. The row id is generated
    /// by the caller (the store owns id generation).
    pub fn from_line(id: String, sale_id: &str, line: &SaleLine) -> Self {
        SaleLineItemRow {
            id,
            sale_id: sale_id.to_string(),
            product_id: line.product_id.clone(),
            quantity: line.quantity,
        }
    }
}

/// Normalizes sale rows and their line-item rows into entities.
///
/// Line items attach to their parent in fetched order; a line whose parent
/// sale is missing is dropped (the backend may hold orphans from partial
/// writes; see the store's documentation).
pub fn sales_from_rows(
    rows: Vec<SaleRow>,
    line_rows: Vec<SaleLineItemRow>,
) -> GatewayResult<Vec<Sale>> {
    let mut lines_by_sale: HashMap<String, Vec<SaleLine>> = HashMap::new();
    for line in line_rows {
        lines_by_sale
            .entry(line.sale_id)
            .or_default()
            .push(SaleLine {
                product_id: line.product_id,
                quantity: line.quantity,
            });
    }

    rows.into_iter()
        .map(|row| {
            let total_cents = cents_from_decimal("sales", "total", row.total)?;
            Ok(Sale {
                items: lines_by_sale.remove(&row.id).unwrap_or_default(),
                id: row.id,
                user_id: row.user_id,
                total_cents,
                payment_method: row.payment_method,
                date: row.sale_date,
            })
        })
        .collect()
}

// =============================================================================
// Expense Rows
// =============================================================================

/// One row of the `expenses` collection. Tag links live in `expense_tags`
/// and are attached during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRow {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub expense_date: DateTime<Utc>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
    #[serde(default)]
    pub recurrence_day: Option<i64>,
}

/// One link row of the `expense_tags` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTagRow {
    pub expense_id: String,
    pub tag: String,
}

impl ExpenseRow {
    pub fn from_entity(expense: &Expense) -> Self {
        ExpenseRow {
            id: expense.id.clone(),
            user_id: expense.user_id.clone(),
            description: expense.description.clone(),
            amount: decimal_from_cents(expense.amount_cents),
            category: category_to_token(expense.category).to_string(),
            expense_date: expense.date,
            is_recurring: Some(expense.is_recurring),
            recurrence_day: expense.recurrence_day.map(|d| d as i64),
        }
    }
}

/// Builds the link rows for an expense's tag set.
pub fn expense_tag_rows(expense: &Expense) -> Vec<ExpenseTagRow> {
    expense
        .tags
        .iter()
        .map(|tag| ExpenseTagRow {
            expense_id: expense.id.clone(),
            tag: tag.clone(),
        })
        .collect()
}

/// Normalizes expense rows and their tag links into entities.
pub fn expenses_from_rows(
    rows: Vec<ExpenseRow>,
    tag_rows: Vec<ExpenseTagRow>,
) -> GatewayResult<Vec<Expense>> {
    let mut tags_by_expense: HashMap<String, Vec<String>> = HashMap::new();
    for link in tag_rows {
        tags_by_expense
            .entry(link.expense_id)
            .or_default()
            .push(link.tag);
    }

    rows.into_iter()
        .map(|row| {
            let amount_cents = cents_from_decimal("expenses", "amount", row.amount)?;
            let category = category_from_token(&row.category)?;
            let recurrence_day = match row.recurrence_day {
                None => None,
                Some(day) => Some(u8::try_from(day).map_err(|_| {
                    GatewayError::decode("expenses", format!("recurrence_day out of range: {}", day))
                })?),
            };
            Ok(Expense {
                tags: tags_by_expense.remove(&row.id).unwrap_or_default(),
                id: row.id,
                user_id: row.user_id,
                description: row.description,
                amount_cents,
                category,
                date: row.expense_date,
                is_recurring: row.is_recurring.unwrap_or(false),
                recurrence_day,
            })
        })
        .collect()
}

// =============================================================================
// Token Rows
// =============================================================================

/// One row of the `user_payment_methods` or `user_expense_tags`
/// collections: a user-scoped plain string token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
}

impl TokenRow {
    pub fn new(user_id: Option<String>, name: impl Into<String>) -> Self {
        TokenRow {
            user_id,
            name: name.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_cents_from_decimal_string_and_number() {
        // Wire sends decimals as strings...
        let row: ProductRow = serde_json::from_value(json!({
            "id": "p1",
            "name": "Coxinha",
            "price": "10.50",
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(row.clone().into_entity().unwrap().price_cents, 1050);

        // ...or as JSON numbers behind some proxies.
        let row: ProductRow = serde_json::from_value(json!({
            "id": "p1",
            "name": "Coxinha",
            "price": 10.5,
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(row.into_entity().unwrap().price_cents, 1050);
    }

    #[test]
    fn test_decimal_round_trip() {
        assert_eq!(decimal_from_cents(1050).to_string(), "10.50");
        assert_eq!(
            cents_from_decimal("products", "price", decimal_from_cents(99999)).unwrap(),
            99999
        );
        assert_eq!(
            cents_from_decimal("products", "price", Decimal::from(3)).unwrap(),
            300
        );
    }

    #[test]
    fn test_product_row_round_trip() {
        let product = Product {
            id: "p1".to_string(),
            user_id: Some("u1".to_string()),
            name: "Coxinha".to_string(),
            description: "de frango".to_string(),
            price_cents: 550,
            created_at: instant(2024, 5, 1),
            updated_at: instant(2024, 5, 2),
        };

        let row = ProductRow::from_entity(&product);
        assert_eq!(row.price.to_string(), "5.50");

        let back = row.into_entity().unwrap();
        assert_eq!(back.id, product.id);
        assert_eq!(back.description, "de frango");
        assert_eq!(back.price_cents, 550);
    }

    #[test]
    fn test_sales_attach_line_items_in_order() {
        let rows = vec![
            SaleRow {
                id: "s1".to_string(),
                user_id: None,
                total: decimal_from_cents(2500),
                payment_method: "cash".to_string(),
                sale_date: instant(2024, 5, 1),
            },
            SaleRow {
                id: "s2".to_string(),
                user_id: None,
                total: decimal_from_cents(400),
                payment_method: "pix".to_string(),
                sale_date: instant(2024, 5, 2),
            },
        ];
        let lines = vec![
            SaleLineItemRow {
                id: "l1".to_string(),
                sale_id: "s1".to_string(),
                product_id: "p1".to_string(),
                quantity: 2,
            },
            SaleLineItemRow {
                id: "l2".to_string(),
                sale_id: "s1".to_string(),
                product_id: "p2".to_string(),
                quantity: 1,
            },
            // Orphan from a partial write: parent sale never landed.
            SaleLineItemRow {
                id: "l3".to_string(),
                sale_id: "ghost".to_string(),
                product_id: "p1".to_string(),
                quantity: 9,
            },
        ];

        let sales = sales_from_rows(rows, lines).unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].total_cents, 2500);
        assert_eq!(sales[0].items.len(), 2);
        assert_eq!(sales[0].items[0].product_id, "p1");
        assert_eq!(sales[0].items[1].product_id, "p2");
        assert!(sales[1].items.is_empty());
    }

    #[test]
    fn test_expense_row_round_trip() {
        let expense = Expense {
            id: "e1".to_string(),
            user_id: None,
            description: "Aluguel".to_string(),
            amount_cents: 120000,
            category: ExpenseCategory::Fixed,
            date: instant(2024, 5, 5),
            is_recurring: true,
            recurrence_day: Some(5),
            tags: vec!["rent".to_string()],
        };

        let row = ExpenseRow::from_entity(&expense);
        assert_eq!(row.category, "fixed");
        assert_eq!(row.amount.to_string(), "1200.00");

        let links = expense_tag_rows(&expense);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].tag, "rent");

        let back = expenses_from_rows(vec![row], links).unwrap();
        assert_eq!(back[0].amount_cents, 120000);
        assert_eq!(back[0].category, ExpenseCategory::Fixed);
        assert!(back[0].is_recurring);
        assert_eq!(back[0].recurrence_day, Some(5));
        assert_eq!(back[0].tags, vec!["rent".to_string()]);
    }

    #[test]
    fn test_unknown_category_is_decode_error() {
        let row = ExpenseRow {
            id: "e1".to_string(),
            user_id: None,
            description: "??".to_string(),
            amount: decimal_from_cents(100),
            category: "weird".to_string(),
            expense_date: instant(2024, 5, 5),
            is_recurring: None,
            recurrence_day: None,
        };

        let err = expenses_from_rows(vec![row], Vec::new()).unwrap_err();
        assert!(matches!(err, GatewayError::Decode { row: "expenses", .. }));
    }
}
