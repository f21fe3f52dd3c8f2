//! Inline field editor state machine
//!
//! Models one payee/category editor as explicit commands applied to a state
//! struct, returning the effects the host should run (fetch, record metrics,
//! open the dropdown). Keeping the transitions here makes the lifecycle
//! testable without any rendering or network environment, and pins down two
//! behaviors the host must not improvise:
//!
//! - a fetch result for a description the user has since changed is stale and
//!   is dropped, never rendered
//! - auto-expand fires at most once per distinct description value, no matter
//!   how often suggestions are reloaded for it

use crate::models::FieldKind;
use crate::suggest::{should_auto_expand, Suggestion, SuggestionKind};

/// Default minimum description length before a fetch is issued
pub const MIN_FETCH_DESCRIPTION: usize = 3;

/// Request lifecycle of the editor's suggestion list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Input to the editor reducer
#[derive(Debug, Clone)]
pub enum EditorCommand {
    /// The transaction description changed (value-level, not a re-render)
    DescriptionChanged(String),
    /// A fetch for `description` completed
    SuggestionsLoaded {
        description: String,
        suggestions: Vec<Suggestion>,
    },
    /// The fetch failed after its retry; `fallback` is the unranked
    /// existing-entity list
    FetchFailed { fallback: Vec<Suggestion> },
    /// User opened the dropdown
    Expanded,
    /// User closed the dropdown
    Collapsed,
    /// User committed a value
    ValueCommitted { id: String, name: String },
    /// User cleared the field
    ValueCleared,
}

/// Side effects the host must run after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEffect {
    /// Issue a suggestion fetch for this description
    FetchSuggestions { description: String },
    /// Count suggestions as shown in the session metrics
    RecordShown(usize),
    /// Open the dropdown without user interaction
    AutoExpand,
}

/// One inline editor for a single transaction field
#[derive(Debug)]
pub struct FieldEditor {
    field_kind: FieldKind,
    phase: EditorPhase,
    description: String,
    value: Option<(String, String)>,
    suggestions: Vec<Suggestion>,
    expanded: bool,
    auto_expanded_for: Option<String>,
    min_description_len: usize,
}

impl FieldEditor {
    pub fn new(field_kind: FieldKind) -> Self {
        Self {
            field_kind,
            phase: EditorPhase::Idle,
            description: String::new(),
            value: None,
            suggestions: Vec::new(),
            expanded: false,
            auto_expanded_for: None,
            min_description_len: MIN_FETCH_DESCRIPTION,
        }
    }

    /// Override the fetch gate (tests, nonstandard hosts)
    pub fn with_min_description_len(mut self, len: usize) -> Self {
        self.min_description_len = len;
        self
    }

    pub fn field_kind(&self) -> FieldKind {
        self.field_kind
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn value(&self) -> Option<&(String, String)> {
        self.value.as_ref()
    }

    /// The suggestion list currently on screen; selection events must be
    /// built against exactly this list
    pub fn shown_suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Apply a command and return the effects to run
    pub fn apply(&mut self, cmd: EditorCommand) -> Vec<EditorEffect> {
        match cmd {
            EditorCommand::DescriptionChanged(description) => {
                if description == self.description {
                    return Vec::new();
                }
                self.description = description;
                self.suggestions.clear();

                if self.description.chars().count() < self.min_description_len {
                    self.phase = EditorPhase::Idle;
                    return Vec::new();
                }

                self.phase = EditorPhase::Loading;
                vec![EditorEffect::FetchSuggestions {
                    description: self.description.clone(),
                }]
            }

            EditorCommand::SuggestionsLoaded {
                description,
                suggestions,
            } => {
                // Stale result: the input moved on while this was in flight
                if description != self.description {
                    return Vec::new();
                }

                self.phase = EditorPhase::Ready;
                self.suggestions = suggestions;

                let ai_count = self
                    .suggestions
                    .iter()
                    .filter(|s| s.kind == SuggestionKind::AiSuggestion)
                    .count();

                let mut effects = Vec::new();
                if ai_count > 0 {
                    effects.push(EditorEffect::RecordShown(ai_count));
                }

                if !self.expanded
                    && self.auto_expanded_for.as_deref() != Some(self.description.as_str())
                    && should_auto_expand(
                        self.value.is_none(),
                        &self.suggestions,
                        &self.description,
                    )
                {
                    self.expanded = true;
                    self.auto_expanded_for = Some(self.description.clone());
                    effects.push(EditorEffect::AutoExpand);
                }

                effects
            }

            EditorCommand::FetchFailed { fallback } => {
                self.phase = EditorPhase::Failed;
                self.suggestions = fallback;
                Vec::new()
            }

            EditorCommand::Expanded => {
                self.expanded = true;
                Vec::new()
            }

            EditorCommand::Collapsed => {
                self.expanded = false;
                Vec::new()
            }

            EditorCommand::ValueCommitted { id, name } => {
                self.value = Some((id, name));
                self.expanded = false;
                Vec::new()
            }

            EditorCommand::ValueCleared => {
                self.value = None;
                Vec::new()
            }
        }
    }
}
