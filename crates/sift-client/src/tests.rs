//! Client tests against the mock backend API server

use std::time::Duration;

use sift_core::models::{AccountKind, EntityRef, FieldKind, SelectionMethod};
use sift_core::selection::{SelectionContext, SelectionEvent};
use sift_core::suggest::{fallback_from_existing, ConfidenceTier, SuggestionKind};
use sift_core::ClientConfig;

use crate::api::{ApiClient, BulkUpdateRequest, TransactionQuery};
use crate::recorder::SelectionRecorder;
use crate::suggestions::{SuggestionFetcher, SuggestionQuery};
use crate::test_utils::MockApiServer;

fn entity(id: &str, name: &str) -> EntityRef {
    EntityRef {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn config_for(server: &MockApiServer) -> ClientConfig {
    ClientConfig {
        base_url: server.url(),
        ..ClientConfig::default()
    }
}

fn fetcher_for(server: &MockApiServer) -> SuggestionFetcher {
    let config = config_for(server);
    let api = ApiClient::new(&config).unwrap();
    SuggestionFetcher::new(api, &config)
}

fn starbucks_query() -> SuggestionQuery {
    SuggestionQuery {
        description: "Starbucks Coffee".to_string(),
        amount: Some(5.75),
        account_id: Some(2),
        account_kind: Some(AccountKind::Credit),
        existing_payees: vec![entity("p1", "Starbucks"), entity("p3", "Safeway")],
        existing_categories: vec![entity("c1", "Coffee")],
    }
}

// ========== Suggestion Fetcher ==========

#[tokio::test]
async fn test_fetch_returns_ranked_merged_lists() {
    let server = MockApiServer::start().await;
    let fetcher = fetcher_for(&server);

    let ranked = fetcher.fetch(&starbucks_query()).await.unwrap();

    // AI suggestion first, then the remaining known payee unranked
    assert_eq!(ranked.payees.len(), 2);
    assert_eq!(ranked.payees[0].id, "p1");
    assert_eq!(ranked.payees[0].kind, SuggestionKind::AiSuggestion);
    assert_eq!(ranked.payees[0].confidence, 0.92);
    assert_eq!(ranked.payees[0].tier(), ConfidenceTier::High);
    assert_eq!(ranked.payees[1].id, "p3");
    assert_eq!(ranked.payees[1].kind, SuggestionKind::Existing);

    assert_eq!(ranked.categories.len(), 1);
    assert_eq!(ranked.categories[0].id, "c1");
    assert_eq!(ranked.categories[0].kind, SuggestionKind::AiSuggestion);
}

#[tokio::test]
async fn test_short_description_issues_no_request() {
    let server = MockApiServer::start().await;
    let fetcher = fetcher_for(&server);

    let mut query = starbucks_query();
    query.description = "St".to_string();

    let ranked = fetcher.fetch(&query).await.unwrap();
    assert!(ranked.payees.is_empty());
    assert!(ranked.categories.is_empty());
    assert_eq!(server.suggestion_requests(), 0);
}

#[tokio::test]
async fn test_identical_query_within_ttl_hits_cache() {
    let server = MockApiServer::start().await;
    let fetcher = fetcher_for(&server);

    fetcher.fetch(&starbucks_query()).await.unwrap();
    assert_eq!(server.suggestion_requests(), 1);

    // Whitespace/case variants share the normalized key
    let mut repeat = starbucks_query();
    repeat.description = "  starbucks   COFFEE ".to_string();
    let ranked = fetcher.fetch(&repeat).await.unwrap();

    assert_eq!(server.suggestion_requests(), 1);
    assert_eq!(ranked.payees[0].id, "p1");
}

#[tokio::test]
async fn test_changed_input_issues_new_request() {
    let server = MockApiServer::start().await;
    let fetcher = fetcher_for(&server);

    fetcher.fetch(&starbucks_query()).await.unwrap();

    let mut changed = starbucks_query();
    changed.amount = Some(6.25);
    fetcher.fetch(&changed).await.unwrap();

    assert_eq!(server.suggestion_requests(), 2);
}

#[tokio::test]
async fn test_single_failure_is_retried() {
    let server = MockApiServer::start().await;
    let fetcher = fetcher_for(&server);

    server.fail_next_suggestions(1);
    let ranked = fetcher.fetch(&starbucks_query()).await.unwrap();

    assert_eq!(server.suggestion_requests(), 2);
    assert_eq!(ranked.payees[0].id, "p1");
}

#[tokio::test]
async fn test_persistent_failure_surfaces_after_one_retry() {
    let server = MockApiServer::start().await;
    let fetcher = fetcher_for(&server);

    server.fail_next_suggestions(2);
    let query = starbucks_query();
    let result = fetcher.fetch(&query).await;

    assert!(result.is_err());
    assert_eq!(server.suggestion_requests(), 2);

    // Caller's degraded path: known entities, unranked
    let fallback = fallback_from_existing(&query.existing_payees);
    assert_eq!(fallback.len(), 2);
    assert!(fallback.iter().all(|s| s.kind == SuggestionKind::Existing));
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let server = MockApiServer::start().await;
    let fetcher = fetcher_for(&server);

    server.fail_next_suggestions(2);
    assert!(fetcher.fetch(&starbucks_query()).await.is_err());

    // The service recovered; the same query fetches fresh
    let ranked = fetcher.fetch(&starbucks_query()).await.unwrap();
    assert_eq!(ranked.payees[0].id, "p1");
    assert_eq!(server.suggestion_requests(), 3);
}

#[tokio::test]
async fn test_unknown_description_yields_existing_only() {
    let server = MockApiServer::start().await;
    let fetcher = fetcher_for(&server);

    let mut query = starbucks_query();
    query.description = "ACH TRANSFER 99871".to_string();

    let ranked = fetcher.fetch(&query).await.unwrap();
    assert_eq!(ranked.payees.len(), 2);
    assert!(ranked
        .payees
        .iter()
        .all(|s| s.kind == SuggestionKind::Existing));
}

// ========== Selection Recorder ==========

fn sample_event(shown_confidence: Option<f64>) -> SelectionEvent {
    let ctx = SelectionContext {
        transaction_id: 10,
        field_kind: FieldKind::Payee,
        description: "Starbucks Coffee".to_string(),
        amount: Some(5.75),
        account_kind: Some(AccountKind::Credit),
    };
    let shown = match shown_confidence {
        Some(confidence) => vec![sift_core::suggest::Suggestion::ai(
            "p1",
            "Starbucks",
            confidence,
        )],
        None => vec![],
    };
    SelectionEvent::from_choice(ctx, &shown, "p1", "Starbucks", SelectionMethod::Suggestion)
}

#[tokio::test]
async fn test_recorder_delivers_event() {
    let server = MockApiServer::start().await;
    let recorder = SelectionRecorder::new(ApiClient::with_base_url(&server.url()).unwrap());

    let delivered = recorder.record_blocking(&sample_event(Some(0.92))).await;
    assert!(delivered);

    let recorded = server.recorded_selections();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0]["transaction_id"], 10);
    assert_eq!(recorded[0]["field_kind"], "payee");
    assert_eq!(recorded[0]["was_suggested"], true);
    assert_eq!(recorded[0]["suggestion_confidence"], 0.92);
}

#[tokio::test]
async fn test_recorder_retries_once_then_succeeds() {
    let server = MockApiServer::start().await;
    let recorder = SelectionRecorder::new(ApiClient::with_base_url(&server.url()).unwrap());

    server.fail_next_selections(1);
    let delivered = recorder.record_blocking(&sample_event(Some(0.92))).await;

    assert!(delivered);
    assert_eq!(server.selection_requests(), 2);
    assert_eq!(server.recorded_selections().len(), 1);
}

#[tokio::test]
async fn test_recorder_swallows_persistent_failure() {
    let server = MockApiServer::start().await;
    let recorder = SelectionRecorder::new(ApiClient::with_base_url(&server.url()).unwrap());

    server.fail_next_selections(2);
    let delivered = recorder.record_blocking(&sample_event(Some(0.92))).await;

    // No error propagates; exactly one retry was attempted
    assert!(!delivered);
    assert_eq!(server.selection_requests(), 2);
    assert!(server.recorded_selections().is_empty());
}

#[tokio::test]
async fn test_fire_and_forget_recording() {
    let server = MockApiServer::start().await;
    let recorder = SelectionRecorder::new(ApiClient::with_base_url(&server.url()).unwrap());

    recorder.record(sample_event(None));

    // Spawned delivery lands without the caller awaiting it
    for _ in 0..50 {
        if server.selection_requests() > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let recorded = server.recorded_selections();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0]["was_suggested"], false);
    assert!(recorded[0]["suggestion_confidence"].is_null());
}

// ========== CRUD pass-through ==========

#[tokio::test]
async fn test_health_check() {
    let server = MockApiServer::start().await;
    let client = ApiClient::with_base_url(&server.url()).unwrap();
    assert!(client.health().await);
}

#[tokio::test]
async fn test_health_check_unreachable_is_false() {
    let client = ApiClient::with_base_url("http://127.0.0.1:1").unwrap();
    assert!(!client.health().await);
}

#[tokio::test]
async fn test_list_accounts() {
    let server = MockApiServer::start().await;
    let client = ApiClient::with_base_url(&server.url()).unwrap();

    let accounts = client.list_accounts().await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].name, "Everyday Checking");
    assert_eq!(accounts[1].kind, Some(AccountKind::Credit));
}

#[tokio::test]
async fn test_list_transactions() {
    let server = MockApiServer::start().await;
    let client = ApiClient::with_base_url(&server.url()).unwrap();

    let page = client
        .list_transactions(&TransactionQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.transactions.len(), 2);
    assert!(page.transactions[0].field_is_empty(FieldKind::Payee));
    assert!(!page.transactions[1].field_is_empty(FieldKind::Payee));
}

#[tokio::test]
async fn test_update_transaction_field() {
    let server = MockApiServer::start().await;
    let client = ApiClient::with_base_url(&server.url()).unwrap();

    let updated = client
        .update_transaction_field(10, FieldKind::Payee, Some("p1"), Some("Starbucks"))
        .await
        .unwrap();

    assert_eq!(updated.payee_id.as_deref(), Some("p1"));
    assert_eq!(updated.payee_name.as_deref(), Some("Starbucks"));
}

#[tokio::test]
async fn test_update_failure_maps_to_validation_error() {
    let server = MockApiServer::start().await;
    let client = ApiClient::with_base_url(&server.url()).unwrap();

    server.fail_next_updates(1);
    let result = client
        .update_transaction_field(10, FieldKind::Payee, Some("p1"), Some("Starbucks"))
        .await;

    match result {
        Err(sift_core::Error::Validation(message)) => {
            assert!(message.contains("invalid value"));
        }
        other => panic!("expected validation error, got {:?}", other.map(|t| t.id)),
    }
}

#[tokio::test]
async fn test_bulk_update_and_recalculate() {
    let server = MockApiServer::start().await;
    let client = ApiClient::with_base_url(&server.url()).unwrap();

    let result = client
        .bulk_update(&BulkUpdateRequest {
            transaction_ids: vec![10, 11],
            field: FieldKind::Category,
            value_id: Some("c1".to_string()),
            value_name: Some("Coffee".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(result.updated, 2);

    let recalc = client.recalculate_balances().await.unwrap();
    assert_eq!(recalc.accounts_updated, 2);
}

#[tokio::test]
async fn test_export_transactions() {
    let server = MockApiServer::start().await;
    let client = ApiClient::with_base_url(&server.url()).unwrap();

    let transactions = client
        .export_transactions(&TransactionQuery::default())
        .await
        .unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[1].description, "NETFLIX.COM");
}

#[tokio::test]
async fn test_list_payees_and_categories() {
    let server = MockApiServer::start().await;
    let client = ApiClient::with_base_url(&server.url()).unwrap();

    let payees = client.list_payees().await.unwrap();
    assert_eq!(payees.len(), 2);
    assert_eq!(payees[0].name, "Starbucks");

    let categories = client.list_categories().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].name, "Streaming");
}

// ========== End-to-end scenario ==========

#[tokio::test]
async fn test_accept_high_confidence_suggestion_flow() {
    let server = MockApiServer::start().await;
    let config = config_for(&server);
    let api = ApiClient::new(&config).unwrap();
    let fetcher = SuggestionFetcher::new(api.clone(), &config);
    let recorder = SelectionRecorder::new(api.clone());
    let metrics = sift_core::SessionMetrics::new();

    // Fetch suggestions for an uncategorized transaction
    let query = starbucks_query();
    let ranked = fetcher.fetch(&query).await.unwrap();
    let top = &ranked.payees[0];
    metrics.record_shown(1);

    // High tier + empty field + non-trivial description => auto-expand
    assert!(sift_core::should_auto_expand(
        true,
        &ranked.payees,
        &query.description
    ));

    // User accepts: persist the field, then record the selection
    let updated = api
        .update_transaction_field(10, FieldKind::Payee, Some(&top.id), Some(&top.name))
        .await
        .unwrap();
    assert_eq!(updated.payee_id.as_deref(), Some("p1"));

    let event = SelectionEvent::from_choice(
        SelectionContext {
            transaction_id: updated.id,
            field_kind: FieldKind::Payee,
            description: query.description.clone(),
            amount: query.amount,
            account_kind: query.account_kind,
        },
        &ranked.payees,
        &top.id,
        &top.name,
        SelectionMethod::Suggestion,
    );
    assert!(event.was_suggested);
    assert_eq!(event.suggestion_confidence, Some(0.92));

    assert!(recorder.record_blocking(&event).await);
    metrics.record_accepted();

    assert_eq!(server.recorded_selections().len(), 1);
    assert_eq!(metrics.acceptance_rate(), 1.0);
}
