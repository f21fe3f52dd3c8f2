//! Suggestion request deduplication
//!
//! Re-renders and repeated edits produce identical suggestion queries in
//! quick succession; this cache answers them without a network round trip.
//! Keys are the normalized input tuple, values live for a short TTL, and
//! expired entries are pruned opportunistically on insert. Errors are never
//! cached.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::suggestions::{RankedSuggestions, SuggestionQuery};

/// Normalized form of one suggestion input tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    description: String,
    amount_cents: Option<i64>,
    account_id: Option<i64>,
    account_kind: Option<&'static str>,
    payee_ids: Vec<String>,
    category_ids: Vec<String>,
}

impl CacheKey {
    pub fn from_query(query: &SuggestionQuery) -> Self {
        let mut payee_ids: Vec<String> =
            query.existing_payees.iter().map(|e| e.id.clone()).collect();
        payee_ids.sort();
        let mut category_ids: Vec<String> = query
            .existing_categories
            .iter()
            .map(|e| e.id.clone())
            .collect();
        category_ids.sort();

        Self {
            description: normalize_description(&query.description),
            amount_cents: query.amount.map(|a| (a * 100.0).round() as i64),
            account_id: query.account_id,
            account_kind: query.account_kind.map(|k| k.as_str()),
            payee_ids,
            category_ids,
        }
    }
}

/// Trim, lowercase, and collapse internal whitespace
pub fn normalize_description(description: &str) -> String {
    description
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

struct CacheEntry {
    inserted_at: Instant,
    value: RankedSuggestions,
}

/// TTL cache over ranked suggestion results
pub struct SuggestionCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl SuggestionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// A fresh entry for the key, or None when absent or expired
    pub fn get(&self, key: &CacheKey) -> Option<RankedSuggestions> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        entries
            .get(key)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: CacheKey, value: RankedSuggestions) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        entries.insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
