//! CLI command tests
//!
//! This module contains tests for the CLI commands, run against the mock
//! backend API server from sift-client's test utilities.

use sift_client::api::ApiClient;
use sift_client::recorder::SelectionRecorder;
use sift_client::suggestions::SuggestionFetcher;
use sift_client::test_utils::MockApiServer;
use sift_core::metrics::SessionMetrics;
use sift_core::models::FieldKind;
use sift_core::prefs::PrefsStore;
use sift_core::suggest::Suggestion;
use sift_core::view::{FilterState, SortField, SortOrder};
use sift_core::ClientConfig;

use crate::commands::{self, badge, parse_date, truncate, TransactionFlags};

fn config_for(server: &MockApiServer) -> ClientConfig {
    ClientConfig {
        base_url: server.url(),
        ..ClientConfig::default()
    }
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer description", 10), "a longe...");
}

#[test]
fn test_parse_date() {
    assert_eq!(
        parse_date("2024-01-15").unwrap(),
        chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    );
    assert!(parse_date("01/15/2024").is_err());
}

#[test]
fn test_badge_shows_tier_and_score() {
    let s = Suggestion::ai("p1", "Starbucks", 0.92);
    assert_eq!(badge(&s), "[high 0.92]");

    let s = Suggestion::ai("p2", "Safeway", 0.6);
    assert_eq!(badge(&s), "[medium 0.60]");
}

#[test]
fn test_transaction_flags_overlay_saved_filters() {
    let saved = FilterState::default()
        .with_search(Some("netflix".to_string()))
        .with_account(Some(7));

    let flags = TransactionFlags {
        search: Some("starbucks".to_string()),
        sort: Some("amount".to_string()),
        order: Some("asc".to_string()),
        ..TransactionFlags::default()
    };

    let filters = flags.apply_to(saved).unwrap();
    // Explicit flag wins, untouched saved values survive
    assert_eq!(filters.search.as_deref(), Some("starbucks"));
    assert_eq!(filters.account_id, Some(7));
    assert_eq!(filters.sort_field, SortField::Amount);
    assert_eq!(filters.sort_order, SortOrder::Asc);
}

#[test]
fn test_transaction_flags_reject_bad_sort() {
    let flags = TransactionFlags {
        sort: Some("payee".to_string()),
        ..TransactionFlags::default()
    };
    assert!(flags.apply_to(FilterState::default()).is_err());
}

#[test]
fn test_target_fields() {
    assert_eq!(
        commands::categorize::target_fields("both").unwrap(),
        vec![FieldKind::Payee, FieldKind::Category]
    );
    assert_eq!(
        commands::categorize::target_fields("payee").unwrap(),
        vec![FieldKind::Payee]
    );
    assert!(commands::categorize::target_fields("memo").is_err());
}

// ========== Command Tests ==========

#[tokio::test]
async fn test_cmd_status() {
    let server = MockApiServer::start().await;
    let config = config_for(&server);
    let api = ApiClient::new(&config).unwrap();

    assert!(commands::cmd_status(&api, &config).await.is_ok());
}

#[tokio::test]
async fn test_cmd_accounts_list() {
    let server = MockApiServer::start().await;
    let api = ApiClient::with_base_url(&server.url()).unwrap();

    assert!(commands::cmd_accounts_list(&api).await.is_ok());
}

#[tokio::test]
async fn test_cmd_transactions_list_remembers_filters() {
    let server = MockApiServer::start().await;
    let api = ApiClient::with_base_url(&server.url()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let prefs = PrefsStore::with_dir(dir.path());

    let flags = TransactionFlags {
        search: Some("starbucks".to_string()),
        ..TransactionFlags::default()
    };
    commands::cmd_transactions_list(&api, &prefs, &flags, 20, 0, true)
        .await
        .unwrap();

    let saved = prefs.load("transactions");
    assert_eq!(saved.filters.search.as_deref(), Some("starbucks"));

    // A later run without flags starts from the saved state
    let reloaded = TransactionFlags::default()
        .apply_to(saved.filters)
        .unwrap();
    assert_eq!(reloaded.search.as_deref(), Some("starbucks"));
}

#[tokio::test]
async fn test_cmd_suggest() {
    let server = MockApiServer::start().await;
    let config = config_for(&server);
    let api = ApiClient::new(&config).unwrap();
    let fetcher = SuggestionFetcher::new(api.clone(), &config);

    commands::cmd_suggest(&api, &fetcher, "STARBUCKS STORE #123", Some(-5.75), None, false)
        .await
        .unwrap();
    assert_eq!(server.suggestion_requests(), 1);

    // JSON output path reuses the cached result
    commands::cmd_suggest(&api, &fetcher, "STARBUCKS STORE #123", Some(-5.75), None, true)
        .await
        .unwrap();
    assert_eq!(server.suggestion_requests(), 1);
}

#[tokio::test]
async fn test_cmd_suggest_degrades_on_persistent_failure() {
    let server = MockApiServer::start().await;
    let config = config_for(&server);
    let api = ApiClient::new(&config).unwrap();
    let fetcher = SuggestionFetcher::new(api.clone(), &config);

    server.fail_next_suggestions(2);
    // Falls back to known entities instead of erroring
    commands::cmd_suggest(&api, &fetcher, "STARBUCKS STORE #123", None, None, false)
        .await
        .unwrap();
    assert_eq!(server.suggestion_requests(), 2);
}

#[tokio::test]
async fn test_cmd_categorize_print_only_applies_nothing() {
    let server = MockApiServer::start().await;
    let config = config_for(&server);
    let api = ApiClient::new(&config).unwrap();
    let fetcher = SuggestionFetcher::new(api.clone(), &config);
    let recorder = SelectionRecorder::new(api.clone());
    let metrics = SessionMetrics::new();

    commands::cmd_categorize(&api, &fetcher, &recorder, &metrics, "both", 25, false)
        .await
        .unwrap();

    // The unassigned Starbucks transaction surfaced both fields
    assert_eq!(metrics.shown(), 2);
    assert_eq!(metrics.accepted(), 0);
    assert!(server.recorded_selections().is_empty());
}

#[tokio::test]
async fn test_cmd_categorize_apply_updates_and_records() {
    let server = MockApiServer::start().await;
    let config = config_for(&server);
    let api = ApiClient::new(&config).unwrap();
    let fetcher = SuggestionFetcher::new(api.clone(), &config);
    let recorder = SelectionRecorder::new(api.clone());
    let metrics = SessionMetrics::new();

    commands::cmd_categorize(&api, &fetcher, &recorder, &metrics, "both", 25, true)
        .await
        .unwrap();

    // Payee (0.92) and category (0.84) are both high tier => both applied
    assert_eq!(metrics.accepted(), 2);
    assert_eq!(metrics.acceptance_rate(), 1.0);

    let recorded = server.recorded_selections();
    assert_eq!(recorded.len(), 2);
    assert!(recorded.iter().all(|e| e["was_suggested"] == true));
    assert!(recorded.iter().all(|e| e["transaction_id"] == 10));
}

#[tokio::test]
async fn test_cmd_categorize_single_field() {
    let server = MockApiServer::start().await;
    let config = config_for(&server);
    let api = ApiClient::new(&config).unwrap();
    let fetcher = SuggestionFetcher::new(api.clone(), &config);
    let recorder = SelectionRecorder::new(api.clone());
    let metrics = SessionMetrics::new();

    commands::cmd_categorize(&api, &fetcher, &recorder, &metrics, "payee", 25, true)
        .await
        .unwrap();

    assert_eq!(metrics.accepted(), 1);
    let recorded = server.recorded_selections();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0]["field_kind"], "payee");
    assert_eq!(recorded[0]["suggestion_confidence"], 0.92);
}

#[tokio::test]
async fn test_cmd_edit_records_manual_selection() {
    let server = MockApiServer::start().await;
    let api = ApiClient::with_base_url(&server.url()).unwrap();
    let recorder = SelectionRecorder::new(api.clone());

    commands::cmd_edit(
        &api,
        &recorder,
        10,
        "payee",
        Some("p3"),
        Some("Safeway"),
        false,
    )
    .await
    .unwrap();

    let recorded = server.recorded_selections();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0]["was_suggested"], false);
    assert_eq!(recorded[0]["method"], "manual");
    assert_eq!(recorded[0]["selected_id"], "p3");
}

#[tokio::test]
async fn test_cmd_edit_requires_id_and_name() {
    let server = MockApiServer::start().await;
    let api = ApiClient::with_base_url(&server.url()).unwrap();
    let recorder = SelectionRecorder::new(api.clone());

    let result = commands::cmd_edit(&api, &recorder, 10, "payee", None, None, false).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cmd_export_writes_csv() {
    let server = MockApiServer::start().await;
    let api = ApiClient::with_base_url(&server.url()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");

    commands::cmd_export(&api, Some(&path), None, None, None, None)
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,account_id,date,description,amount,payee,category,notes"
    );
    assert!(contents.contains("NETFLIX.COM"));
    assert!(contents.contains("-15.49"));
}
