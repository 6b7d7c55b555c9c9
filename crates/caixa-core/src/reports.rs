//! # Report Aggregators
//!
//! Pure, stateless functions that compute dashboard and report figures
//! from the snapshot.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Aggregation Pipeline                               │
//! │                                                                         │
//! │  AppState snapshot          Period (caller-supplied)                    │
//! │        │                          │                                     │
//! │        └──────────┬───────────────┘                                     │
//! │                   ▼                                                     │
//! │        filter by date inclusion (inclusive bounds, calendar days)      │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │        reduce: totals, breakdowns, rankings, growth                    │
//! │                                                                         │
//! │  Empty collections reduce to zeroed totals and empty breakdowns —      │
//! │  never an error.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Calendar Semantics
//! Windows are naive calendar dates: the caller decides what "today" means
//! (the UI derives it from local time). Entity timestamps are UTC instants;
//! inclusion tests the instant's calendar date against the window, both
//! bounds inclusive.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::types::{Expense, ExpenseCategory, Product, Sale};

/// Bucket label for expenses that carry no tags.
pub const UNTAGGED_LABEL: &str = "sem tag";

/// Placeholder name for sale lines whose product was deleted.
pub const MISSING_PRODUCT_LABEL: &str = "produto removido";

// =============================================================================
// Period
// =============================================================================

/// An inclusive calendar-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// A single calendar day.
    pub fn day(date: NaiveDate) -> Self {
        Period {
            start: date,
            end: date,
        }
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let (start, end) = month_bounds(date.year(), date.month());
        Period { start, end }
    }

    /// The calendar month `n` months before the month containing `anchor`.
    ///
    /// `months_back(anchor, 0)` is the anchor's own month; the reports
    /// screen offers the last 12 via `n = 0..12`.
    pub fn months_back(anchor: NaiveDate, n: u32) -> Self {
        let total = anchor.year() * 12 + anchor.month() as i32 - 1 - n as i32;
        let year = total.div_euclid(12);
        let month = total.rem_euclid(12) as u32 + 1;
        let (start, end) = month_bounds(year, month);
        Period { start, end }
    }

    /// The immediately preceding window of equal length.
    ///
    /// A calendar-month window precedes to the previous calendar month
    /// (whose day count may differ); any other window shifts back by its
    /// own length in days.
    pub fn preceding(&self) -> Period {
        if self.is_calendar_month() {
            return Period::months_back(self.start, 1);
        }

        let len_days = (self.end - self.start).num_days() + 1;
        let end = self.start - Duration::days(1);
        let start = end - Duration::days(len_days - 1);
        Period { start, end }
    }

    /// Tests whether a UTC instant falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let date = instant.date_naive();
        date >= self.start && date <= self.end
    }

    fn is_calendar_month(&self) -> bool {
        let (start, end) = month_bounds(self.start.year(), self.start.month());
        self.start == start && self.end == end
    }
}

/// First and last day of a calendar month.
fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    // Months are always valid here (1-12 by construction).
    let start = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid next month");
    (start, next.pred_opt().expect("previous day exists"))
}

// =============================================================================
// Sales Aggregation
// =============================================================================

/// Per-payment-method slice of a sales summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodTotal {
    pub method: String,
    pub total_cents: i64,
    pub count: usize,
}

/// Sales figures for one window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SalesSummary {
    pub total_cents: i64,
    pub count: usize,
    /// Sorted by total descending, then method name for determinism.
    pub by_payment_method: Vec<PaymentMethodTotal>,
}

/// Sums sales falling inside the window.
pub fn sales_summary(sales: &[Sale], period: &Period) -> SalesSummary {
    let mut total = 0i64;
    let mut count = 0usize;
    let mut by_method: BTreeMap<&str, (i64, usize)> = BTreeMap::new();

    for sale in sales.iter().filter(|s| period.contains(s.date)) {
        total += sale.total_cents;
        count += 1;
        let entry = by_method.entry(sale.payment_method.as_str()).or_default();
        entry.0 += sale.total_cents;
        entry.1 += 1;
    }

    let mut by_payment_method: Vec<PaymentMethodTotal> = by_method
        .into_iter()
        .map(|(method, (total_cents, count))| PaymentMethodTotal {
            method: method.to_string(),
            total_cents,
            count,
        })
        .collect();
    by_payment_method.sort_by(|a, b| {
        b.total_cents
            .cmp(&a.total_cents)
            .then_with(|| a.method.cmp(&b.method))
    });

    SalesSummary {
        total_cents: total,
        count,
        by_payment_method,
    }
}

// =============================================================================
// Product Ranking
// =============================================================================

/// Quantity and revenue of one product over a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSales {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    /// quantity × current unit price. Zero when the product was deleted.
    pub total_cents: i64,
}

/// Ranks products by units sold inside the window, top `limit`.
///
/// Revenue is computed against CURRENT prices, matching how sale totals
/// are recomputed on edit. Lines referencing a deleted product are kept
/// under a placeholder name with zero revenue; a sale must never break a
/// report just because its product is gone.
pub fn top_products(
    sales: &[Sale],
    products: &[Product],
    period: &Period,
    limit: usize,
) -> Vec<ProductSales> {
    let mut by_product: BTreeMap<&str, i64> = BTreeMap::new();

    for sale in sales.iter().filter(|s| period.contains(s.date)) {
        for line in &sale.items {
            *by_product.entry(line.product_id.as_str()).or_default() += line.quantity;
        }
    }

    let mut ranking: Vec<ProductSales> = by_product
        .into_iter()
        .filter(|(_, quantity)| *quantity > 0)
        .map(|(product_id, quantity)| {
            match products.iter().find(|p| p.id == product_id) {
                Some(product) => ProductSales {
                    product_id: product_id.to_string(),
                    name: product.name.clone(),
                    quantity,
                    total_cents: product.price_cents * quantity,
                },
                None => ProductSales {
                    product_id: product_id.to_string(),
                    name: MISSING_PRODUCT_LABEL.to_string(),
                    quantity,
                    total_cents: 0,
                },
            }
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranking.truncate(limit);
    ranking
}

// =============================================================================
// Expense Aggregation
// =============================================================================

/// Per-tag slice of an expense summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTotal {
    pub tag: String,
    pub total_cents: i64,
}

/// Expense figures for one window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpensesSummary {
    pub total_cents: i64,
    pub count: usize,
    pub fixed_cents: i64,
    pub variable_cents: i64,
    /// Sorted by total descending. Untagged expenses pool into
    /// [`UNTAGGED_LABEL`]. An expense with N tags contributes its full
    /// amount to each of its N tags.
    pub by_tag: Vec<TagTotal>,
}

/// Sums expenses falling inside the window.
pub fn expenses_summary(expenses: &[Expense], period: &Period) -> ExpensesSummary {
    let mut total = 0i64;
    let mut count = 0usize;
    let mut fixed = 0i64;
    let mut variable = 0i64;
    let mut by_tag: BTreeMap<&str, i64> = BTreeMap::new();

    for expense in expenses.iter().filter(|e| period.contains(e.date)) {
        total += expense.amount_cents;
        count += 1;
        match expense.category {
            ExpenseCategory::Fixed => fixed += expense.amount_cents,
            ExpenseCategory::Variable => variable += expense.amount_cents,
        }

        if expense.tags.is_empty() {
            *by_tag.entry(UNTAGGED_LABEL).or_default() += expense.amount_cents;
        } else {
            for tag in &expense.tags {
                *by_tag.entry(tag.as_str()).or_default() += expense.amount_cents;
            }
        }
    }

    let mut by_tag: Vec<TagTotal> = by_tag
        .into_iter()
        .map(|(tag, total_cents)| TagTotal {
            tag: tag.to_string(),
            total_cents,
        })
        .collect();
    by_tag.sort_by(|a, b| {
        b.total_cents
            .cmp(&a.total_cents)
            .then_with(|| a.tag.cmp(&b.tag))
    });

    ExpensesSummary {
        total_cents: total,
        count,
        fixed_cents: fixed,
        variable_cents: variable,
        by_tag,
    }
}

// =============================================================================
// Profit
// =============================================================================

/// Sales minus expenses inside the window. May be negative.
pub fn profit_cents(sales: &[Sale], expenses: &[Expense], period: &Period) -> i64 {
    let income: i64 = sales
        .iter()
        .filter(|s| period.contains(s.date))
        .map(|s| s.total_cents)
        .sum();
    let spent: i64 = expenses
        .iter()
        .filter(|e| period.contains(e.date))
        .map(|e| e.amount_cents)
        .sum();
    income - spent
}

/// All-time profit: every sale minus every expense, no window.
pub fn all_time_profit_cents(sales: &[Sale], expenses: &[Expense]) -> i64 {
    let income: i64 = sales.iter().map(|s| s.total_cents).sum();
    let spent: i64 = expenses.iter().map(|e| e.amount_cents).sum();
    income - spent
}

// =============================================================================
// Daily Series
// =============================================================================

/// One day of the daily sales chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySales {
    /// Day of month, 1-based.
    pub day: u32,
    pub total_cents: i64,
}

/// Per-day sale totals across the window, zeros included.
///
/// Intended for month windows (the daily chart); works for any window by
/// emitting one entry per day from start to end.
pub fn daily_sales(sales: &[Sale], period: &Period) -> Vec<DailySales> {
    let mut series = Vec::new();
    let mut date = period.start;
    while date <= period.end {
        series.push(DailySales {
            day: date.day(),
            total_cents: 0,
        });
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    for sale in sales.iter().filter(|s| period.contains(s.date)) {
        let offset = (sale.date.date_naive() - period.start).num_days() as usize;
        if let Some(entry) = series.get_mut(offset) {
            entry.total_cents += sale.total_cents;
        }
    }

    series
}

// =============================================================================
// Recent Transactions
// =============================================================================

/// Whether a feed entry came from a sale or an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Sale,
    Expense,
}

/// One entry of the dashboard's recent-transactions feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEntry {
    pub id: String,
    pub kind: TransactionKind,
    /// Expense description; empty for sales (the UI labels those itself).
    pub description: String,
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
}

/// Merges sales and expenses into one date-descending feed, top `limit`.
pub fn recent_transactions(
    sales: &[Sale],
    expenses: &[Expense],
    limit: usize,
) -> Vec<TransactionEntry> {
    let mut feed: Vec<TransactionEntry> = sales
        .iter()
        .map(|s| TransactionEntry {
            id: s.id.clone(),
            kind: TransactionKind::Sale,
            description: String::new(),
            amount_cents: s.total_cents,
            date: s.date,
        })
        .chain(expenses.iter().map(|e| TransactionEntry {
            id: e.id.clone(),
            kind: TransactionKind::Expense,
            description: e.description.clone(),
            amount_cents: e.amount_cents,
            date: e.date,
        }))
        .collect();

    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed.truncate(limit);
    feed
}

// =============================================================================
// Growth
// =============================================================================

/// Signed percentage change between two windows' totals.
///
/// Edge rules: 0% when both windows are zero; 100% when the prior window
/// is zero but the current one is not.
pub fn growth_percent(current_cents: i64, previous_cents: i64) -> f64 {
    if previous_cents == 0 {
        if current_cents == 0 {
            0.0
        } else {
            100.0
        }
    } else {
        (current_cents - previous_cents) as f64 / previous_cents as f64 * 100.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleLine;
    use chrono::{NaiveDate, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn product(id: &str, name: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            user_id: None,
            name: name.to_string(),
            description: String::new(),
            price_cents,
            created_at: instant(2024, 1, 1),
            updated_at: instant(2024, 1, 1),
        }
    }

    fn sale(id: &str, total_cents: i64, method: &str, when: DateTime<Utc>) -> Sale {
        Sale {
            id: id.to_string(),
            user_id: None,
            items: Vec::new(),
            total_cents,
            payment_method: method.to_string(),
            date: when,
        }
    }

    fn expense(
        id: &str,
        amount_cents: i64,
        category: ExpenseCategory,
        tags: &[&str],
        when: DateTime<Utc>,
    ) -> Expense {
        Expense {
            id: id.to_string(),
            user_id: None,
            description: format!("expense {}", id),
            amount_cents,
            category,
            date: when,
            is_recurring: false,
            recurrence_day: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Period
    // -------------------------------------------------------------------------

    #[test]
    fn test_month_window_bounds() {
        let p = Period::month_of(date(2024, 2, 15));
        assert_eq!(p.start, date(2024, 2, 1));
        assert_eq!(p.end, date(2024, 2, 29)); // leap year

        let dec = Period::month_of(date(2023, 12, 31));
        assert_eq!(dec.start, date(2023, 12, 1));
        assert_eq!(dec.end, date(2023, 12, 31));
    }

    #[test]
    fn test_months_back_crosses_year() {
        let p = Period::months_back(date(2024, 2, 10), 3);
        assert_eq!(p.start, date(2023, 11, 1));
        assert_eq!(p.end, date(2023, 11, 30));

        let same = Period::months_back(date(2024, 2, 10), 0);
        assert_eq!(same, Period::month_of(date(2024, 2, 1)));
    }

    #[test]
    fn test_preceding_month_window() {
        let march = Period::month_of(date(2024, 3, 5));
        let feb = march.preceding();
        assert_eq!(feb.start, date(2024, 2, 1));
        assert_eq!(feb.end, date(2024, 2, 29));
    }

    #[test]
    fn test_preceding_day_window() {
        let today = Period::day(date(2024, 3, 1));
        let yesterday = today.preceding();
        assert_eq!(yesterday, Period::day(date(2024, 2, 29)));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let p = Period::month_of(date(2024, 5, 10));
        assert!(p.contains(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()));
        assert!(p.contains(Utc.with_ymd_and_hms(2024, 5, 31, 23, 59, 59).unwrap()));
        assert!(!p.contains(instant(2024, 6, 1)));
        assert!(!p.contains(instant(2024, 4, 30)));
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    #[test]
    fn test_sales_summary_empty() {
        let summary = sales_summary(&[], &Period::day(date(2024, 5, 1)));
        assert_eq!(summary.total_cents, 0);
        assert_eq!(summary.count, 0);
        assert!(summary.by_payment_method.is_empty());
    }

    #[test]
    fn test_sales_summary_filters_and_breaks_down() {
        let sales = vec![
            sale("s1", 1000, "cash", instant(2024, 5, 2)),
            sale("s2", 2500, "pix", instant(2024, 5, 10)),
            sale("s3", 500, "cash", instant(2024, 5, 20)),
            sale("s4", 9999, "cash", instant(2024, 6, 1)), // outside
        ];
        let summary = sales_summary(&sales, &Period::month_of(date(2024, 5, 1)));

        assert_eq!(summary.total_cents, 4000);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.by_payment_method.len(), 2);
        assert_eq!(summary.by_payment_method[0].method, "pix");
        assert_eq!(summary.by_payment_method[0].total_cents, 2500);
        assert_eq!(summary.by_payment_method[1].method, "cash");
        assert_eq!(summary.by_payment_method[1].count, 2);
    }

    // -------------------------------------------------------------------------
    // Top products
    // -------------------------------------------------------------------------

    #[test]
    fn test_top_products_ranking() {
        let products = vec![
            product("p1", "Coxinha", 500),
            product("p2", "Refrigerante", 400),
        ];
        let mut s1 = sale("s1", 1400, "cash", instant(2024, 5, 3));
        s1.items = vec![
            SaleLine {
                product_id: "p1".to_string(),
                quantity: 2,
            },
            SaleLine {
                product_id: "p2".to_string(),
                quantity: 1,
            },
        ];
        let mut s2 = sale("s2", 400, "pix", instant(2024, 5, 4));
        s2.items = vec![SaleLine {
            product_id: "p2".to_string(),
            quantity: 1,
        }];

        let ranking = top_products(
            &[s1, s2],
            &products,
            &Period::month_of(date(2024, 5, 1)),
            10,
        );

        assert_eq!(ranking.len(), 2);
        // p1 and p2 both sold 2 units; tie breaks on name.
        assert_eq!(ranking[0].name, "Coxinha");
        assert_eq!(ranking[0].quantity, 2);
        assert_eq!(ranking[0].total_cents, 1000);
        assert_eq!(ranking[1].name, "Refrigerante");
        assert_eq!(ranking[1].total_cents, 800);
    }

    #[test]
    fn test_top_products_tolerates_deleted_product() {
        let mut s = sale("s1", 900, "cash", instant(2024, 5, 3));
        s.items = vec![SaleLine {
            product_id: "gone".to_string(),
            quantity: 3,
        }];

        let ranking = top_products(&[s], &[], &Period::month_of(date(2024, 5, 1)), 10);

        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].name, MISSING_PRODUCT_LABEL);
        assert_eq!(ranking[0].quantity, 3);
        assert_eq!(ranking[0].total_cents, 0);
    }

    #[test]
    fn test_top_products_limit() {
        let products = vec![
            product("p1", "A", 100),
            product("p2", "B", 100),
            product("p3", "C", 100),
        ];
        let mut s = sale("s1", 0, "cash", instant(2024, 5, 3));
        s.items = vec![
            SaleLine {
                product_id: "p1".to_string(),
                quantity: 5,
            },
            SaleLine {
                product_id: "p2".to_string(),
                quantity: 3,
            },
            SaleLine {
                product_id: "p3".to_string(),
                quantity: 1,
            },
        ];

        let ranking = top_products(&[s], &products, &Period::month_of(date(2024, 5, 1)), 2);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].quantity, 5);
    }

    // -------------------------------------------------------------------------
    // Expenses
    // -------------------------------------------------------------------------

    #[test]
    fn test_expenses_summary_tags_and_split() {
        let expenses = vec![
            expense(
                "e1",
                10000,
                ExpenseCategory::Fixed,
                &["rent"],
                instant(2024, 5, 1),
            ),
            expense(
                "e2",
                3000,
                ExpenseCategory::Variable,
                &["food", "supplies"],
                instant(2024, 5, 2),
            ),
            expense("e3", 500, ExpenseCategory::Variable, &[], instant(2024, 5, 3)),
            expense(
                "e4",
                7777,
                ExpenseCategory::Fixed,
                &["rent"],
                instant(2024, 4, 30), // outside
            ),
        ];

        let summary = expenses_summary(&expenses, &Period::month_of(date(2024, 5, 1)));

        assert_eq!(summary.total_cents, 13500);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.fixed_cents, 10000);
        assert_eq!(summary.variable_cents, 3500);

        assert_eq!(summary.by_tag[0].tag, "rent");
        assert_eq!(summary.by_tag[0].total_cents, 10000);
        let untagged = summary
            .by_tag
            .iter()
            .find(|t| t.tag == UNTAGGED_LABEL)
            .unwrap();
        assert_eq!(untagged.total_cents, 500);
        // e2 contributes its full amount to both of its tags.
        let food = summary.by_tag.iter().find(|t| t.tag == "food").unwrap();
        assert_eq!(food.total_cents, 3000);
    }

    // -------------------------------------------------------------------------
    // Profit / daily series / feed
    // -------------------------------------------------------------------------

    #[test]
    fn test_profit() {
        let sales = vec![
            sale("s1", 5000, "cash", instant(2024, 5, 2)),
            sale("s2", 1000, "pix", instant(2024, 6, 2)),
        ];
        let expenses = vec![expense(
            "e1",
            2000,
            ExpenseCategory::Variable,
            &[],
            instant(2024, 5, 5),
        )];

        let may = Period::month_of(date(2024, 5, 1));
        assert_eq!(profit_cents(&sales, &expenses, &may), 3000);
        assert_eq!(all_time_profit_cents(&sales, &expenses), 4000);
        // A loss goes negative, not saturated.
        assert_eq!(
            profit_cents(&[], &expenses, &may),
            -2000
        );
    }

    #[test]
    fn test_daily_sales_series() {
        let sales = vec![
            sale("s1", 1000, "cash", instant(2024, 5, 2)),
            sale("s2", 500, "cash", instant(2024, 5, 2)),
            sale("s3", 300, "pix", instant(2024, 5, 31)),
        ];
        let series = daily_sales(&sales, &Period::month_of(date(2024, 5, 1)));

        assert_eq!(series.len(), 31);
        assert_eq!(series[0].day, 1);
        assert_eq!(series[0].total_cents, 0);
        assert_eq!(series[1].day, 2);
        assert_eq!(series[1].total_cents, 1500);
        assert_eq!(series[30].total_cents, 300);
    }

    #[test]
    fn test_recent_transactions_feed() {
        let sales = vec![
            sale("s1", 1000, "cash", instant(2024, 5, 2)),
            sale("s2", 500, "pix", instant(2024, 5, 9)),
        ];
        let expenses = vec![expense(
            "e1",
            2000,
            ExpenseCategory::Fixed,
            &[],
            instant(2024, 5, 5),
        )];

        let feed = recent_transactions(&sales, &expenses, 2);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].id, "s2");
        assert_eq!(feed[0].kind, TransactionKind::Sale);
        assert_eq!(feed[1].id, "e1");
        assert_eq!(feed[1].kind, TransactionKind::Expense);
        assert_eq!(feed[1].description, "expense e1");
    }

    // -------------------------------------------------------------------------
    // Growth
    // -------------------------------------------------------------------------

    #[test]
    fn test_growth_percent_edges() {
        assert_eq!(growth_percent(0, 0), 0.0);
        assert_eq!(growth_percent(500, 0), 100.0);
        assert_eq!(growth_percent(1500, 1000), 50.0);
        assert_eq!(growth_percent(500, 1000), -50.0);
        assert_eq!(growth_percent(0, 1000), -100.0);
    }
}
