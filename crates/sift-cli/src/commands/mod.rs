//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `accounts` - Account commands and the status command
//! - `categorize` - Suggestion commands (suggest, categorize)
//! - `entities` - Payee and category commands
//! - `export` - Local CSV export
//! - `transactions` - Transaction commands (list, edit)

pub mod accounts;
pub mod categorize;
pub mod entities;
pub mod export;
pub mod transactions;

// Re-export command functions for main.rs
pub use accounts::*;
pub use categorize::*;
pub use entities::*;
pub use export::*;
pub use transactions::*;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use sift_core::suggest::Suggestion;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}

/// Parse a YYYY-MM-DD date flag
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s))
}

/// Tier badge for a suggestion, e.g. "[high 0.92]"
pub fn badge(suggestion: &Suggestion) -> String {
    format!("[{} {:.2}]", suggestion.tier().label(), suggestion.confidence)
}
