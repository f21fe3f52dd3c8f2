//! View state for transaction tables
//!
//! Immutable-ish state structs with small pure update helpers. The filter
//! surface mirrors the backend's transaction list query; column widths are
//! plain presentation state. Both round-trip through the preference store as
//! opaque JSON.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sortable columns of the transaction list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Description,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Description => "description",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Filter state for a transaction list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FilterState {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub account_id: Option<i64>,
    /// Only transactions missing a payee
    #[serde(default)]
    pub unassigned_payee: bool,
    /// Only transactions missing a category
    #[serde(default)]
    pub unassigned_category: bool,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub sort_field: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl FilterState {
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_account(mut self, account_id: Option<i64>) -> Self {
        self.account_id = account_id;
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Sort by `field`, toggling direction when it is already active
    pub fn sorted_by(mut self, field: SortField) -> Self {
        if self.sort_field == field {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::default();
        }
        self
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Minimum rendered column width
pub const MIN_COLUMN_WIDTH: u16 = 40;
/// Maximum rendered column width
pub const MAX_COLUMN_WIDTH: u16 = 600;

/// Per-column pixel widths, keyed by column name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ColumnWidths(HashMap<String, u16>);

impl ColumnWidths {
    pub fn get(&self, column: &str) -> Option<u16> {
        self.0.get(column).copied()
    }

    /// Set a width, clamped to the rendered bounds
    pub fn resize(&mut self, column: &str, width: u16) {
        self.0.insert(
            column.to_string(),
            width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH),
        );
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
