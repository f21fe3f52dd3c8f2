//! Test utilities for sift-client
//!
//! This module provides a mock backend API server that can be used for
//! development and integration tests. It serves canned suggestions keyed by
//! description content, counts requests per route, and can be scripted to
//! fail upcoming requests for retry and fallback tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Shared state behind the mock routes
#[derive(Default)]
struct MockState {
    suggestion_hits: AtomicUsize,
    selection_hits: AtomicUsize,
    fail_suggestions: AtomicUsize,
    fail_selections: AtomicUsize,
    fail_updates: AtomicUsize,
    selections: Mutex<Vec<Value>>,
}

/// Mock backend API server for testing and development
pub struct MockApiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    state: Arc<MockState>,
}

impl MockApiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/api/health", get(handle_health))
            .route("/api/accounts", get(handle_accounts))
            .route("/api/payees", get(handle_payees))
            .route("/api/categories", get(handle_categories))
            .route("/api/transactions", get(handle_transactions))
            .route("/api/transactions/export", get(handle_export))
            .route(
                "/api/transactions/:id",
                get(handle_get_transaction).patch(handle_update_transaction),
            )
            .route("/api/transactions/bulk-update", post(handle_bulk_update))
            .route(
                "/api/transactions/recalculate-balances",
                post(handle_recalculate),
            )
            .route("/api/suggestions", post(handle_suggestions))
            .route("/api/selections", post(handle_selections))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            state,
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Number of suggestion requests received so far
    pub fn suggestion_requests(&self) -> usize {
        self.state.suggestion_hits.load(Ordering::SeqCst)
    }

    /// Number of selection requests received so far
    pub fn selection_requests(&self) -> usize {
        self.state.selection_hits.load(Ordering::SeqCst)
    }

    /// Fail the next `n` suggestion requests with a 500
    pub fn fail_next_suggestions(&self, n: usize) {
        self.state.fail_suggestions.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` selection requests with a 500
    pub fn fail_next_selections(&self, n: usize) {
        self.state.fail_selections.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` field updates with a 422
    pub fn fail_next_updates(&self, n: usize) {
        self.state.fail_updates.store(n, Ordering::SeqCst);
    }

    /// Selection payloads received so far
    pub fn recorded_selections(&self) -> Vec<Value> {
        self.state.selections.lock().unwrap().clone()
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Consume one scripted failure, if any remain
fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn handle_accounts() -> Json<Value> {
    Json(json!([
        { "id": 1, "name": "Everyday Checking", "kind": "checking", "balance": 2450.10 },
        { "id": 2, "name": "Travel Card", "kind": "credit", "balance": -312.40 },
    ]))
}

async fn handle_payees() -> Json<Value> {
    Json(json!([
        { "id": "p1", "name": "Starbucks" },
        { "id": "p3", "name": "Safeway" },
    ]))
}

async fn handle_categories() -> Json<Value> {
    Json(json!([
        { "id": "c1", "name": "Coffee" },
        { "id": "c2", "name": "Streaming" },
    ]))
}

fn canned_transactions() -> Value {
    json!([
        {
            "id": 10,
            "account_id": 2,
            "date": "2024-01-15",
            "description": "STARBUCKS STORE #123",
            "amount": -5.75,
            "payee_id": null,
            "category_id": null
        },
        {
            "id": 11,
            "account_id": 2,
            "date": "2024-01-16",
            "description": "NETFLIX.COM",
            "amount": -15.49,
            "payee_id": "p2",
            "payee_name": "Netflix",
            "category_id": "c2",
            "category_name": "Streaming"
        },
    ])
}

async fn handle_transactions() -> Json<Value> {
    Json(json!({ "transactions": canned_transactions(), "total": 2 }))
}

async fn handle_export() -> Json<Value> {
    Json(canned_transactions())
}

async fn handle_get_transaction(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({
        "id": id,
        "account_id": 2,
        "date": "2024-01-15",
        "description": "STARBUCKS STORE #123",
        "amount": -5.75,
        "payee_id": null,
        "category_id": null
    }))
}

async fn handle_update_transaction(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if take_failure(&state.fail_updates) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "invalid value" })),
        );
    }

    let field = body["field"].as_str().unwrap_or("payee");
    let mut tx = json!({
        "id": id,
        "account_id": 2,
        "date": "2024-01-15",
        "description": "STARBUCKS STORE #123",
        "amount": -5.75,
        "payee_id": null,
        "category_id": null
    });
    tx[format!("{}_id", field)] = body["value_id"].clone();
    tx[format!("{}_name", field)] = body["value_name"].clone();

    (StatusCode::OK, Json(tx))
}

async fn handle_bulk_update(Json(body): Json<Value>) -> Json<Value> {
    let count = body["transaction_ids"]
        .as_array()
        .map(|ids| ids.len())
        .unwrap_or(0);
    Json(json!({ "updated": count }))
}

async fn handle_recalculate() -> Json<Value> {
    Json(json!({ "accounts_updated": 2 }))
}

async fn handle_suggestions(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.suggestion_hits.fetch_add(1, Ordering::SeqCst);

    if take_failure(&state.fail_suggestions) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "suggestion service unavailable" })),
        );
    }

    let description = body["description"].as_str().unwrap_or("").to_lowercase();

    let (payees, categories) = if description.contains("starbucks") {
        (
            json!([{
                "id": "p1", "name": "Starbucks", "kind": "ai_suggestion",
                "confidence": 0.92, "reason": "matched previous coffee purchases"
            }]),
            json!([{
                "id": "c1", "name": "Coffee", "kind": "ai_suggestion",
                "confidence": 0.84, "reason": "typical category for this payee"
            }]),
        )
    } else if description.contains("netflix") {
        (
            json!([{
                "id": "p2", "name": "Netflix", "kind": "ai_suggestion",
                "confidence": 0.97, "reason": "recurring subscription"
            }]),
            json!([{
                "id": "c2", "name": "Streaming", "kind": "ai_suggestion",
                "confidence": 0.95, "reason": "recurring subscription"
            }]),
        )
    } else if description.contains("safeway") {
        (
            json!([{
                "id": "p3", "name": "Safeway", "kind": "ai_suggestion",
                "confidence": 0.71, "reason": "partial name match"
            }]),
            json!([]),
        )
    } else {
        (json!([]), json!([]))
    };

    (
        StatusCode::OK,
        Json(json!({
            "payee_suggestions": payees,
            "category_suggestions": categories
        })),
    )
}

async fn handle_selections(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.selection_hits.fetch_add(1, Ordering::SeqCst);

    if take_failure(&state.fail_selections) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "recording unavailable" })),
        );
    }

    state.selections.lock().unwrap().push(body);
    (StatusCode::OK, Json(json!({ "status": "recorded" })))
}
