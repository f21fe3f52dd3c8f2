//! Backend API client
//!
//! Thin typed wrapper over the backend's REST endpoints. The backend owns
//! every schema here; this client attaches auth, maps failures into the
//! library error taxonomy, and otherwise passes values through untouched.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sift_core::error::{Error, Result};
use sift_core::models::{Account, AccountKind, Category, EntityRef, FieldKind, Payee, Transaction};
use sift_core::selection::SelectionEvent;
use sift_core::suggest::Suggestion;
use sift_core::view::{FilterState, SortField, SortOrder};
use sift_core::ClientConfig;

/// Error body shape returned by the backend on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Query parameters for transaction listing and export
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unassigned_payee: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unassigned_category: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl From<&FilterState> for TransactionQuery {
    fn from(filters: &FilterState) -> Self {
        Self {
            search: filters.search.clone(),
            account_id: filters.account_id,
            unassigned_payee: filters.unassigned_payee,
            unassigned_category: filters.unassigned_category,
            from: filters.date_from,
            to: filters.date_to,
            sort: Some(filters.sort_field),
            order: Some(filters.sort_order),
            limit: None,
            offset: None,
        }
    }
}

/// One page of transactions plus the unpaged total
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: i64,
}

/// Request body for creating an account
#[derive(Debug, Serialize)]
pub struct NewAccount {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<AccountKind>,
}

/// Request body for a single field update
#[derive(Debug, Serialize)]
struct FieldUpdateRequest<'a> {
    field: FieldKind,
    value_id: Option<&'a str>,
    value_name: Option<&'a str>,
}

/// Request body for a bulk field update
#[derive(Debug, Serialize)]
pub struct BulkUpdateRequest {
    pub transaction_ids: Vec<i64>,
    pub field: FieldKind,
    pub value_id: Option<String>,
    pub value_name: Option<String>,
}

/// Result of a bulk update
#[derive(Debug, Deserialize)]
pub struct BulkUpdateResult {
    pub updated: i64,
}

/// Result of a balance recalculation
#[derive(Debug, Deserialize)]
pub struct RecalculateResult {
    pub accounts_updated: i64,
}

/// Result of a transaction import
#[derive(Debug, Deserialize)]
pub struct ImportResult {
    pub imported: i64,
    pub skipped: i64,
}

/// Wire request for the suggestion endpoint
#[derive(Debug, Serialize)]
pub(crate) struct SuggestRequest<'a> {
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_kind: Option<AccountKind>,
    pub existing_payees: &'a [EntityRef],
    pub existing_categories: &'a [EntityRef],
}

/// Wire response from the suggestion endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct SuggestResponse {
    #[serde(default)]
    pub payee_suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub category_suggestions: Vec<Suggestion>,
}

/// Typed client for the backend REST API
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// Create a client from resolved configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(transport)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Create a client against an explicit base URL with default settings
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::new(&ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.authed(builder).send().await.map_err(transport)?;
        decode(response).await
    }

    async fn send_no_body(&self, builder: RequestBuilder) -> Result<()> {
        let response = self.authed(builder).send().await.map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(api_error(status, response).await)
        }
    }

    /// GET /api/health - true when the backend answers; never errors
    pub async fn health(&self) -> bool {
        match self.http.get(self.url("/api/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Health check failed");
                false
            }
        }
    }

    // ----- accounts -----

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.send(self.http.get(self.url("/api/accounts"))).await
    }

    pub async fn create_account(&self, account: &NewAccount) -> Result<Account> {
        self.send(self.http.post(self.url("/api/accounts")).json(account))
            .await
    }

    pub async fn update_account(&self, id: i64, account: &NewAccount) -> Result<Account> {
        self.send(
            self.http
                .put(self.url(&format!("/api/accounts/{}", id)))
                .json(account),
        )
        .await
    }

    pub async fn delete_account(&self, id: i64) -> Result<()> {
        self.send_no_body(self.http.delete(self.url(&format!("/api/accounts/{}", id))))
            .await
    }

    // ----- transactions -----

    pub async fn list_transactions(&self, query: &TransactionQuery) -> Result<TransactionPage> {
        self.send(self.http.get(self.url("/api/transactions")).query(query))
            .await
    }

    pub async fn get_transaction(&self, id: i64) -> Result<Transaction> {
        self.send(self.http.get(self.url(&format!("/api/transactions/{}", id))))
            .await
    }

    /// Update one payee/category field. No automatic retry: on failure the
    /// caller reverts its optimistic value and leaves the editor open.
    pub async fn update_transaction_field(
        &self,
        id: i64,
        field: FieldKind,
        value_id: Option<&str>,
        value_name: Option<&str>,
    ) -> Result<Transaction> {
        let body = FieldUpdateRequest {
            field,
            value_id,
            value_name,
        };
        self.send(
            self.http
                .patch(self.url(&format!("/api/transactions/{}", id)))
                .json(&body),
        )
        .await
    }

    pub async fn bulk_update(&self, request: &BulkUpdateRequest) -> Result<BulkUpdateResult> {
        self.send(
            self.http
                .post(self.url("/api/transactions/bulk-update"))
                .json(request),
        )
        .await
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<()> {
        self.send_no_body(
            self.http
                .delete(self.url(&format!("/api/transactions/{}", id))),
        )
        .await
    }

    pub async fn recalculate_balances(&self) -> Result<RecalculateResult> {
        self.send(
            self.http
                .post(self.url("/api/transactions/recalculate-balances")),
        )
        .await
    }

    /// Ship a CSV file to the backend untouched; parsing is its job
    pub async fn import_transactions(&self, account_id: i64, csv: Vec<u8>) -> Result<ImportResult> {
        self.send(
            self.http
                .post(self.url("/api/transactions/import"))
                .query(&[("account_id", account_id)])
                .header("content-type", "text/csv")
                .body(csv),
        )
        .await
    }

    /// Fetch the full filtered set for local export
    pub async fn export_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        self.send(
            self.http
                .get(self.url("/api/transactions/export"))
                .query(query),
        )
        .await
    }

    // ----- payees / categories -----

    pub async fn list_payees(&self) -> Result<Vec<Payee>> {
        self.send(self.http.get(self.url("/api/payees"))).await
    }

    pub async fn create_payee(&self, name: &str) -> Result<Payee> {
        self.send(
            self.http
                .post(self.url("/api/payees"))
                .json(&serde_json::json!({ "name": name })),
        )
        .await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.send(self.http.get(self.url("/api/categories"))).await
    }

    pub async fn create_category(&self, name: &str) -> Result<Category> {
        self.send(
            self.http
                .post(self.url("/api/categories"))
                .json(&serde_json::json!({ "name": name })),
        )
        .await
    }

    // ----- suggestions / selections -----

    pub(crate) async fn post_suggestions(
        &self,
        request: &SuggestRequest<'_>,
    ) -> Result<SuggestResponse> {
        self.send(self.http.post(self.url("/api/suggestions")).json(request))
            .await
    }

    pub(crate) async fn post_selection(&self, event: &SelectionEvent) -> Result<()> {
        self.send_no_body(self.http.post(self.url("/api/selections")).json(event))
            .await
    }
}

fn transport(e: reqwest::Error) -> Error {
    Error::Transport(e.to_string())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        response.json().await.map_err(transport)
    } else {
        Err(api_error(status, response).await)
    }
}

async fn api_error(status: StatusCode, response: Response) -> Error {
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    if status == StatusCode::NOT_FOUND {
        Error::NotFound(message)
    } else if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::BAD_REQUEST {
        Error::Validation(message)
    } else {
        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::with_base_url("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/api/health"), "http://localhost:3000/api/health");
    }

    #[test]
    fn test_query_from_filter_state() {
        let filters = FilterState {
            search: Some("coffee".to_string()),
            account_id: Some(3),
            unassigned_payee: true,
            ..FilterState::default()
        };

        let query = TransactionQuery::from(&filters);
        assert_eq!(query.search.as_deref(), Some("coffee"));
        assert_eq!(query.account_id, Some(3));
        assert!(query.unassigned_payee);
        assert!(!query.unassigned_category);
        assert_eq!(query.sort, Some(SortField::Date));
    }

    #[test]
    fn test_query_skips_unset_params() {
        let query = TransactionQuery::default();
        let encoded = serde_json::to_value(&query).unwrap();
        // Only flags set to true and present options should serialize
        assert_eq!(encoded, serde_json::json!({}));
    }
}
