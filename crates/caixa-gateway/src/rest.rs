//! # REST Gateway
//!
//! [`RestGateway`] talks PostgREST-style HTTP to the hosted row store.
//!
//! ## Request Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch      GET    /{table}?select=*                                    │
//! │  insert     POST   /{table}              body: [row, ...]              │
//! │             Prefer: return=minimal                                      │
//! │  update     PATCH  /{table}?{col}=eq.{v} body: {field: value, ...}     │
//! │  delete     DELETE /{table}?{col}=eq.{v}                               │
//! │                                                                         │
//! │  headers:   apikey: <key>                                              │
//! │             Authorization: Bearer <access token>   (when signed in)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row-level security on the backend scopes every row to the bearer token,
//! so no client-side user filter is added. There are no retries and no
//! request timeouts beyond the client defaults: one call per store action.
//!
//! ## Session
//! The auth handshake happens outside this crate; the gateway is handed
//! the resulting access token and user id via [`RestGateway::with_session`]
//! and answers [`Session::current_user`] from that.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{Gateway, Session};
use crate::rows::{
    ExpenseRow, ExpenseTagRow, ProductRow, SaleLineItemRow, SaleRow, TokenRow,
};

use async_trait::async_trait;

// =============================================================================
// Collection Names
// =============================================================================

const TABLE_PRODUCTS: &str = "products";
const TABLE_SALES: &str = "sales";
const TABLE_SALE_LINE_ITEMS: &str = "sale_line_items";
const TABLE_EXPENSES: &str = "expenses";
const TABLE_EXPENSE_TAG_LINKS: &str = "expense_tags";
const TABLE_PAYMENT_METHODS: &str = "user_payment_methods";
const TABLE_EXPENSE_TAGS: &str = "user_expense_tags";

// =============================================================================
// RestGateway
// =============================================================================

/// PostgREST-style client for the hosted row store.
#[derive(Debug, Clone)]
pub struct RestGateway {
    base_url: Url,
    api_key: String,
    access_token: Option<String>,
    user_id: Option<String>,
    http: Client,
}

impl RestGateway {
    /// Creates a gateway against `base_url` (the REST root, e.g.
    /// `https://<project>.example.co/rest/v1`).
    pub fn new(base_url: &str, api_key: &str) -> GatewayResult<Self> {
        // A trailing slash keeps Url::join from eating the last segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(RestGateway {
            base_url: Url::parse(&normalized)?,
            api_key: api_key.to_string(),
            access_token: None,
            user_id: None,
            http: Client::new(),
        })
    }

    /// Attaches an authenticated session: the access token goes on every
    /// request, the user id answers session lookups.
    pub fn with_session(mut self, user_id: &str, access_token: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self.access_token = Some(access_token.to_string());
        self
    }

    // -------------------------------------------------------------------------
    // Request plumbing
    // -------------------------------------------------------------------------

    fn endpoint(&self, table: &str, filters: &[(&str, &str)]) -> GatewayResult<Url> {
        let mut url = self.base_url.join(table)?;
        for (column, value) in filters {
            url.query_pairs_mut()
                .append_pair(column, &format!("eq.{}", value));
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut req = self.http.request(method, url).header("apikey", &self.api_key);
        if let Some(token) = &self.access_token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Turns a non-success response into a structured API error.
    async fn ensure_ok(response: Response) -> GatewayResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(api_error(status, &body))
    }

    async fn get_rows<T: DeserializeOwned>(&self, table: &str) -> GatewayResult<Vec<T>> {
        let mut url = self.endpoint(table, &[])?;
        url.query_pairs_mut().append_pair("select", "*");

        debug!(table = %table, "fetching rows");
        let response = self.request(Method::GET, url).send().await?;
        let rows = Self::ensure_ok(response).await?.json().await?;
        Ok(rows)
    }

    async fn insert_rows(&self, table: &str, body: &Value) -> GatewayResult<()> {
        debug!(table = %table, "inserting rows");
        let response = self
            .request(Method::POST, self.endpoint(table, &[])?)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        Self::ensure_ok(response).await?;
        Ok(())
    }

    async fn patch_rows(
        &self,
        table: &str,
        filters: &[(&str, &str)],
        body: &Value,
    ) -> GatewayResult<()> {
        debug!(table = %table, "updating rows");
        let response = self
            .request(Method::PATCH, self.endpoint(table, filters)?)
            .json(body)
            .send()
            .await?;
        Self::ensure_ok(response).await?;
        Ok(())
    }

    async fn delete_rows(&self, table: &str, filters: &[(&str, &str)]) -> GatewayResult<()> {
        debug!(table = %table, "deleting rows");
        let response = self
            .request(Method::DELETE, self.endpoint(table, filters)?)
            .send()
            .await?;
        // A delete matching zero rows still answers 2xx: idempotent.
        Self::ensure_ok(response).await?;
        Ok(())
    }
}

// =============================================================================
// Error Body Decoding
// =============================================================================

/// PostgREST error body: `{"code": "...", "message": "...", ...}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    #[allow(dead_code)]
    hint: Option<String>,
}

fn api_error(status: StatusCode, body: &str) -> GatewayError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => GatewayError::Api {
            status: status.as_u16(),
            code: parsed.code,
            message: parsed
                .message
                .or(parsed.details)
                .unwrap_or_else(|| "unspecified backend error".to_string()),
        },
        // Non-JSON bodies (proxies, gateways) are preserved verbatim.
        Err(_) => GatewayError::Api {
            status: status.as_u16(),
            code: None,
            message: if body.is_empty() {
                "unspecified backend error".to_string()
            } else {
                body.to_string()
            },
        },
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl Session for RestGateway {
    fn current_user(&self) -> Option<String> {
        self.user_id.clone()
    }
}

#[async_trait]
impl Gateway for RestGateway {
    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    async fn fetch_products(&self) -> GatewayResult<Vec<ProductRow>> {
        self.get_rows(TABLE_PRODUCTS).await
    }

    async fn insert_product(&self, row: &ProductRow) -> GatewayResult<()> {
        self.insert_rows(TABLE_PRODUCTS, &json!([row])).await
    }

    async fn update_product(&self, row: &ProductRow) -> GatewayResult<()> {
        self.patch_rows(TABLE_PRODUCTS, &[("id", &row.id)], &serde_json::to_value(row)?)
            .await
    }

    async fn delete_product(&self, id: &str) -> GatewayResult<()> {
        self.delete_rows(TABLE_PRODUCTS, &[("id", id)]).await
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    async fn fetch_sales(&self) -> GatewayResult<Vec<SaleRow>> {
        self.get_rows(TABLE_SALES).await
    }

    async fn fetch_sale_line_items(&self) -> GatewayResult<Vec<SaleLineItemRow>> {
        self.get_rows(TABLE_SALE_LINE_ITEMS).await
    }

    async fn insert_sale(&self, row: &SaleRow) -> GatewayResult<()> {
        self.insert_rows(TABLE_SALES, &json!([row])).await
    }

    async fn insert_sale_line_items(&self, rows: &[SaleLineItemRow]) -> GatewayResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.insert_rows(TABLE_SALE_LINE_ITEMS, &serde_json::to_value(rows)?)
            .await
    }

    async fn update_sale(&self, row: &SaleRow) -> GatewayResult<()> {
        self.patch_rows(TABLE_SALES, &[("id", &row.id)], &serde_json::to_value(row)?)
            .await
    }

    async fn replace_sale_line_items(
        &self,
        sale_id: &str,
        rows: &[SaleLineItemRow],
    ) -> GatewayResult<()> {
        self.delete_rows(TABLE_SALE_LINE_ITEMS, &[("sale_id", sale_id)])
            .await?;
        self.insert_sale_line_items(rows).await
    }

    async fn delete_sale(&self, id: &str) -> GatewayResult<()> {
        self.delete_rows(TABLE_SALE_LINE_ITEMS, &[("sale_id", id)])
            .await?;
        self.delete_rows(TABLE_SALES, &[("id", id)]).await
    }

    async fn rename_sales_payment_method(&self, old: &str, new: &str) -> GatewayResult<()> {
        self.patch_rows(
            TABLE_SALES,
            &[("payment_method", old)],
            &json!({ "payment_method": new }),
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Expenses
    // -------------------------------------------------------------------------

    async fn fetch_expenses(&self) -> GatewayResult<Vec<ExpenseRow>> {
        self.get_rows(TABLE_EXPENSES).await
    }

    async fn fetch_expense_tag_links(&self) -> GatewayResult<Vec<ExpenseTagRow>> {
        self.get_rows(TABLE_EXPENSE_TAG_LINKS).await
    }

    async fn insert_expense(&self, row: &ExpenseRow) -> GatewayResult<()> {
        self.insert_rows(TABLE_EXPENSES, &json!([row])).await
    }

    async fn insert_expense_tag_links(&self, rows: &[ExpenseTagRow]) -> GatewayResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.insert_rows(TABLE_EXPENSE_TAG_LINKS, &serde_json::to_value(rows)?)
            .await
    }

    async fn update_expense(&self, row: &ExpenseRow) -> GatewayResult<()> {
        self.patch_rows(TABLE_EXPENSES, &[("id", &row.id)], &serde_json::to_value(row)?)
            .await
    }

    async fn replace_expense_tag_links(
        &self,
        expense_id: &str,
        rows: &[ExpenseTagRow],
    ) -> GatewayResult<()> {
        self.delete_rows(TABLE_EXPENSE_TAG_LINKS, &[("expense_id", expense_id)])
            .await?;
        self.insert_expense_tag_links(rows).await
    }

    async fn delete_expense(&self, id: &str) -> GatewayResult<()> {
        self.delete_rows(TABLE_EXPENSE_TAG_LINKS, &[("expense_id", id)])
            .await?;
        self.delete_rows(TABLE_EXPENSES, &[("id", id)]).await
    }

    async fn rename_expense_tag_links(&self, old: &str, new: &str) -> GatewayResult<()> {
        self.patch_rows(
            TABLE_EXPENSE_TAG_LINKS,
            &[("tag", old)],
            &json!({ "tag": new }),
        )
        .await
    }

    async fn delete_expense_tag_links(&self, tag: &str) -> GatewayResult<()> {
        self.delete_rows(TABLE_EXPENSE_TAG_LINKS, &[("tag", tag)]).await
    }

    // -------------------------------------------------------------------------
    // Payment-method tokens
    // -------------------------------------------------------------------------

    async fn fetch_payment_methods(&self) -> GatewayResult<Vec<TokenRow>> {
        self.get_rows(TABLE_PAYMENT_METHODS).await
    }

    async fn insert_payment_method(&self, row: &TokenRow) -> GatewayResult<()> {
        self.insert_rows(TABLE_PAYMENT_METHODS, &json!([row])).await
    }

    async fn rename_payment_method(&self, old: &str, new: &str) -> GatewayResult<()> {
        self.patch_rows(TABLE_PAYMENT_METHODS, &[("name", old)], &json!({ "name": new }))
            .await
    }

    async fn delete_payment_method(&self, name: &str) -> GatewayResult<()> {
        self.delete_rows(TABLE_PAYMENT_METHODS, &[("name", name)]).await
    }

    // -------------------------------------------------------------------------
    // Tag tokens
    // -------------------------------------------------------------------------

    async fn fetch_expense_tags(&self) -> GatewayResult<Vec<TokenRow>> {
        self.get_rows(TABLE_EXPENSE_TAGS).await
    }

    async fn insert_expense_tag(&self, row: &TokenRow) -> GatewayResult<()> {
        self.insert_rows(TABLE_EXPENSE_TAGS, &json!([row])).await
    }

    async fn rename_expense_tag(&self, old: &str, new: &str) -> GatewayResult<()> {
        self.patch_rows(TABLE_EXPENSE_TAGS, &[("name", old)], &json!({ "name": new }))
            .await
    }

    async fn delete_expense_tag(&self, name: &str) -> GatewayResult<()> {
        self.delete_rows(TABLE_EXPENSE_TAGS, &[("name", name)]).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
