//! Sift Core Library
//!
//! Shared functionality for the Sift finance client:
//! - Domain models mirroring the backend's REST API
//! - Suggestion model with confidence tiers and auto-expand gating
//! - Selection events for recommendation feedback
//! - Session metrics (shown/accepted/rejected)
//! - Inline editor state machine
//! - View state with persisted per-view preferences
//! - Client configuration

pub mod config;
pub mod editor;
pub mod error;
pub mod metrics;
pub mod models;
pub mod prefs;
pub mod selection;
pub mod suggest;
pub mod view;

pub use config::ClientConfig;
pub use editor::{EditorCommand, EditorEffect, EditorPhase, FieldEditor};
pub use error::{Error, Result};
pub use metrics::{MetricsSnapshot, SessionMetrics};
pub use models::{
    Account, AccountKind, Category, EntityRef, FieldKind, Payee, SelectionMethod, Transaction,
};
pub use prefs::{PrefsStore, ViewPrefs};
pub use selection::{SelectionContext, SelectionEvent};
pub use suggest::{
    fallback_from_existing, merge_with_existing, should_auto_expand, ConfidenceTier, Suggestion,
    SuggestionKind,
};
pub use view::{ColumnWidths, FilterState, SortField, SortOrder};
