//! Suggestion commands (suggest, categorize)
//!
//! `categorize` is the assisted edit flow: each unassigned field gets an
//! inline editor driven through its state machine, suggestions are fetched
//! and tier-badged, high-confidence ones are applied with `--apply`, and
//! every applied choice is recorded for the recommendation service.

use anyhow::{bail, Result};
use tracing::warn;

use sift_client::api::{ApiClient, TransactionQuery};
use sift_client::recorder::SelectionRecorder;
use sift_client::suggestions::{SuggestionFetcher, SuggestionQuery};
use sift_core::editor::{EditorCommand, EditorEffect, FieldEditor};
use sift_core::metrics::SessionMetrics;
use sift_core::models::{EntityRef, FieldKind, SelectionMethod, Transaction};
use sift_core::selection::{SelectionContext, SelectionEvent};
use sift_core::suggest::{fallback_from_existing, ConfidenceTier, Suggestion, SuggestionKind};

use super::{badge, truncate};

/// One-off suggestions for a description
pub async fn cmd_suggest(
    api: &ApiClient,
    fetcher: &SuggestionFetcher,
    description: &str,
    amount: Option<f64>,
    account_id: Option<i64>,
    json: bool,
) -> Result<()> {
    let existing_payees: Vec<EntityRef> =
        api.list_payees().await?.iter().map(EntityRef::from).collect();
    let existing_categories: Vec<EntityRef> = api
        .list_categories()
        .await?
        .iter()
        .map(EntityRef::from)
        .collect();

    let query = SuggestionQuery {
        description: description.to_string(),
        amount,
        account_id,
        account_kind: None,
        existing_payees,
        existing_categories,
    };

    let ranked = match fetcher.fetch(&query).await {
        Ok(ranked) => ranked,
        Err(e) => {
            warn!(error = %e, "Suggestion fetch failed, showing known entities");
            println!("⚠️  Suggestion service unavailable; known entities only");
            print_list("Payees", &fallback_from_existing(&query.existing_payees));
            print_list(
                "Categories",
                &fallback_from_existing(&query.existing_categories),
            );
            return Ok(());
        }
    };

    if json {
        let out = serde_json::json!({
            "payees": ranked.payees,
            "categories": ranked.categories,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("💡 Suggestions for \"{}\"", truncate(description, 50));
    print_list("Payees", &ranked.payees);
    print_list("Categories", &ranked.categories);

    Ok(())
}

fn print_list(title: &str, suggestions: &[Suggestion]) {
    println!();
    println!("   {}:", title);
    if suggestions.is_empty() {
        println!("      (none)");
        return;
    }
    for s in suggestions {
        match s.kind {
            SuggestionKind::AiSuggestion => {
                let reason = s.reason.as_deref().unwrap_or("");
                println!("      {} {:24} {}", badge(s), truncate(&s.name, 24), reason);
            }
            SuggestionKind::Existing => {
                println!("      [existing]  {}", truncate(&s.name, 24));
            }
        }
    }
}

/// Which fields `categorize` should fill
pub(crate) fn target_fields(field: &str) -> Result<Vec<FieldKind>> {
    match field {
        "payee" => Ok(vec![FieldKind::Payee]),
        "category" => Ok(vec![FieldKind::Category]),
        "both" => Ok(vec![FieldKind::Payee, FieldKind::Category]),
        other => bail!("Unknown field '{}' (payee, category, both)", other),
    }
}

/// Walk unassigned transactions and fill fields from suggestions
pub async fn cmd_categorize(
    api: &ApiClient,
    fetcher: &SuggestionFetcher,
    recorder: &SelectionRecorder,
    metrics: &SessionMetrics,
    field: &str,
    limit: i64,
    apply: bool,
) -> Result<()> {
    let fields = target_fields(field)?;

    let existing_payees: Vec<EntityRef> =
        api.list_payees().await?.iter().map(EntityRef::from).collect();
    let existing_categories: Vec<EntityRef> = api
        .list_categories()
        .await?
        .iter()
        .map(EntityRef::from)
        .collect();

    let query = TransactionQuery {
        unassigned_payee: fields.contains(&FieldKind::Payee),
        unassigned_category: fields.contains(&FieldKind::Category),
        limit: Some(limit),
        ..TransactionQuery::default()
    };
    let page = api.list_transactions(&query).await?;

    if page.transactions.is_empty() {
        println!("Nothing to categorize 🎉");
        return Ok(());
    }

    let mut applied = 0;
    for tx in &page.transactions {
        for &field in fields.iter().filter(|f| tx.field_is_empty(**f)) {
            let outcome = categorize_field(
                api,
                fetcher,
                recorder,
                metrics,
                tx,
                field,
                &existing_payees,
                &existing_categories,
                apply,
            )
            .await;

            match outcome {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(transaction_id = tx.id, field = %field, error = %e, "Skipping field")
                }
            }
        }
    }

    let snapshot = metrics.snapshot();
    println!();
    println!("📊 Session summary");
    println!("   Suggestions shown:    {}", snapshot.shown);
    println!("   Accepted:             {}", snapshot.accepted);
    println!("   Rejected:             {}", snapshot.rejected);
    println!(
        "   Acceptance rate:      {:.0}%",
        snapshot.acceptance_rate * 100.0
    );
    if apply {
        println!("   Fields updated:       {}", applied);
    } else if snapshot.shown > 0 {
        println!("   (re-run with --apply to accept high-confidence suggestions)");
    }

    Ok(())
}

/// Drive one field through the editor machine. Returns true when a value
/// was applied.
#[allow(clippy::too_many_arguments)]
async fn categorize_field(
    api: &ApiClient,
    fetcher: &SuggestionFetcher,
    recorder: &SelectionRecorder,
    metrics: &SessionMetrics,
    tx: &Transaction,
    field: FieldKind,
    existing_payees: &[EntityRef],
    existing_categories: &[EntityRef],
    apply: bool,
) -> Result<bool> {
    let mut editor = FieldEditor::new(field);
    let effects = editor.apply(EditorCommand::DescriptionChanged(tx.description.clone()));

    // Trivial descriptions produce no fetch; nothing to do for this field
    if !effects
        .iter()
        .any(|e| matches!(e, EditorEffect::FetchSuggestions { .. }))
    {
        return Ok(false);
    }

    let query = SuggestionQuery {
        description: tx.description.clone(),
        amount: Some(tx.amount),
        account_id: Some(tx.account_id),
        account_kind: None,
        existing_payees: existing_payees.to_vec(),
        existing_categories: existing_categories.to_vec(),
    };

    let effects = match fetcher.fetch(&query).await {
        Ok(ranked) => {
            let suggestions = match field {
                FieldKind::Payee => ranked.payees,
                FieldKind::Category => ranked.categories,
            };
            editor.apply(EditorCommand::SuggestionsLoaded {
                description: tx.description.clone(),
                suggestions,
            })
        }
        Err(e) => {
            warn!(error = %e, "Suggestion fetch failed, falling back to known entities");
            let existing = match field {
                FieldKind::Payee => existing_payees,
                FieldKind::Category => existing_categories,
            };
            editor.apply(EditorCommand::FetchFailed {
                fallback: fallback_from_existing(existing),
            })
        }
    };

    for effect in &effects {
        if let EditorEffect::RecordShown(count) = effect {
            metrics.record_shown(*count as u64);
        }
    }

    let shown = editor.shown_suggestions().to_vec();
    let top = match shown.iter().find(|s| s.kind == SuggestionKind::AiSuggestion) {
        Some(top) => top.clone(),
        None => return Ok(false),
    };

    println!(
        "   #{:<5} {:32} {} → {} {}",
        tx.id,
        truncate(&tx.description, 32),
        field,
        truncate(&top.name, 20),
        badge(&top)
    );

    if !apply {
        return Ok(false);
    }

    if top.tier() != ConfidenceTier::High {
        // Standing instruction is to take high-confidence only; anything
        // shown but skipped counts as rejected
        metrics.record_rejected();
        return Ok(false);
    }

    api.update_transaction_field(tx.id, field, Some(&top.id), Some(&top.name))
        .await?;
    editor.apply(EditorCommand::ValueCommitted {
        id: top.id.clone(),
        name: top.name.clone(),
    });

    let event = SelectionEvent::from_choice(
        SelectionContext {
            transaction_id: tx.id,
            field_kind: field,
            description: tx.description.clone(),
            amount: Some(tx.amount),
            account_kind: None,
        },
        &shown,
        &top.id,
        &top.name,
        SelectionMethod::Suggestion,
    );
    recorder.record_blocking(&event).await;
    metrics.record_accepted();

    Ok(true)
}
