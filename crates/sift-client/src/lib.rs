//! Sift API client
//!
//! Typed client for the Sift finance backend:
//! - CRUD pass-through for accounts, transactions, payees, and categories
//! - Suggestion fetching with TTL request deduplication
//! - Best-effort selection recording

pub mod api;
pub mod cache;
pub mod recorder;
pub mod suggestions;

/// Test utilities including the mock backend API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

pub use api::{
    ApiClient, BulkUpdateRequest, BulkUpdateResult, ImportResult, NewAccount, RecalculateResult,
    TransactionPage, TransactionQuery,
};
pub use cache::{normalize_description, CacheKey, SuggestionCache};
pub use recorder::SelectionRecorder;
pub use suggestions::{RankedSuggestions, SuggestionFetcher, SuggestionQuery};
