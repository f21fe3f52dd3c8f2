//! Suggestion model and confidence gating
//!
//! Suggestions are ranked candidates for a transaction field, produced by the
//! backend's recommendation service. The client classifies each by a fixed
//! confidence threshold into a tier that drives auto-expand and badge
//! styling, merges them with the already-known entities, and falls back to
//! the plain entity list when the service is unavailable.

use serde::{Deserialize, Serialize};

use crate::models::EntityRef;

/// Minimum description length before auto-expand is considered
pub const AUTO_EXPAND_MIN_DESCRIPTION: usize = 5;

/// Where a suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Produced by the recommendation service
    AiSuggestion,
    /// A known entity, shown unranked
    Existing,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiSuggestion => "ai_suggestion",
            Self::Existing => "existing",
        }
    }
}

/// A ranked candidate value for a transaction field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub name: String,
    pub kind: SuggestionKind,
    /// Service certainty, 0.0-1.0
    pub confidence: f64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Suggestion {
    /// Build a service suggestion, clamping confidence into [0.0, 1.0]
    pub fn ai(id: impl Into<String>, name: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: SuggestionKind::AiSuggestion,
            confidence: confidence.clamp(0.0, 1.0),
            reason: None,
            color: None,
        }
    }

    /// Build an unranked entry from a known entity
    pub fn existing(entity: &EntityRef) -> Self {
        Self {
            id: entity.id.clone(),
            name: entity.name.clone(),
            kind: SuggestionKind::Existing,
            confidence: 0.0,
            reason: None,
            color: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn tier(&self) -> ConfidenceTier {
        ConfidenceTier::from_score(self.confidence)
    }
}

/// Confidence bucket derived from the score via fixed thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// High iff score >= 0.8, Medium iff 0.6 <= score < 0.8, Low otherwise.
    /// Ties at a boundary land on the higher tier.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::High
        } else if score >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Badge label for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Badge color (hex) for display
    pub fn color(&self) -> &'static str {
        match self {
            Self::High => "#16a34a",
            Self::Medium => "#d97706",
            Self::Low => "#6b7280",
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Whether an editor for an empty field should open itself.
///
/// Fires only when the field has no committed value, at least one High-tier
/// suggestion exists, and the description is non-trivial.
pub fn should_auto_expand(
    field_is_empty: bool,
    suggestions: &[Suggestion],
    description: &str,
) -> bool {
    field_is_empty
        && description.chars().count() >= AUTO_EXPAND_MIN_DESCRIPTION
        && suggestions
            .iter()
            .any(|s| s.tier() == ConfidenceTier::High)
}

/// Merge ranked service suggestions with the known entities.
///
/// Service suggestions come first, sorted by descending confidence (stable
/// for equal scores), then any entity not already suggested, unranked. The
/// result never contains duplicate ids.
pub fn merge_with_existing(ai: Vec<Suggestion>, existing: &[EntityRef]) -> Vec<Suggestion> {
    let mut merged = ai;
    merged.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    merged.dedup_by(|a, b| a.id == b.id);

    for entity in existing {
        if !merged.iter().any(|s| s.id == entity.id) {
            merged.push(Suggestion::existing(entity));
        }
    }

    merged
}

/// Unranked entity list used when the suggestion service is unavailable
pub fn fallback_from_existing(existing: &[EntityRef]) -> Vec<Suggestion> {
    existing.iter().map(Suggestion::existing).collect()
}
