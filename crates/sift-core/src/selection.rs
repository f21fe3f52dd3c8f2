//! Selection events
//!
//! A selection event records what the user ultimately chose for a field,
//! together with the context the recommendation service needs to learn from
//! it. Events are built from the suggestion list that was on screen at
//! selection time, which is the only place `was_suggested` may come from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AccountKind, FieldKind, SelectionMethod};
use crate::suggest::Suggestion;

/// Feedback record describing a committed field edit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub transaction_id: i64,
    pub field_kind: FieldKind,
    pub selected_id: String,
    pub selected_name: String,
    /// Source transaction context
    pub description: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub account_kind: Option<AccountKind>,
    /// True only when the selected id was present in the suggestion list
    /// shown for this field at selection time
    pub was_suggested: bool,
    /// The matched suggestion's score; absent when not suggested
    #[serde(default)]
    pub suggestion_confidence: Option<f64>,
    pub method: SelectionMethod,
    pub occurred_at: DateTime<Utc>,
}

/// Context for building a selection event
#[derive(Debug, Clone)]
pub struct SelectionContext {
    pub transaction_id: i64,
    pub field_kind: FieldKind,
    pub description: String,
    pub amount: Option<f64>,
    pub account_kind: Option<AccountKind>,
}

impl SelectionEvent {
    /// Build an event for a committed choice against the suggestions that
    /// were shown.
    ///
    /// `was_suggested` and `suggestion_confidence` are derived from the shown
    /// list, never supplied by the caller: a selection matching a shown id is
    /// suggested with that element's confidence regardless of how the user
    /// picked it, and any other selection is not.
    pub fn from_choice(
        ctx: SelectionContext,
        shown: &[Suggestion],
        selected_id: &str,
        selected_name: &str,
        method: SelectionMethod,
    ) -> Self {
        let matched = shown.iter().find(|s| s.id == selected_id);

        Self {
            transaction_id: ctx.transaction_id,
            field_kind: ctx.field_kind,
            selected_id: selected_id.to_string(),
            selected_name: selected_name.to_string(),
            description: ctx.description,
            amount: ctx.amount,
            account_kind: ctx.account_kind,
            was_suggested: matched.is_some(),
            suggestion_confidence: matched.map(|s| s.confidence),
            method: if matched.is_some() {
                SelectionMethod::Suggestion
            } else {
                method
            },
            occurred_at: Utc::now(),
        }
    }
}
