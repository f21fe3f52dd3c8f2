//! Suggestion fetcher
//!
//! Requests ranked payee/category candidates from the backend for a
//! transaction's description/amount/account context, merges them with the
//! already-known entities, and deduplicates repeat queries through a short
//! TTL cache. Descriptions under the configured minimum length never leave
//! the process. One automatic retry; after that the error surfaces and the
//! caller renders the existing-entity list unranked.

use tracing::{debug, warn};

use sift_core::error::Result;
use sift_core::models::{AccountKind, EntityRef};
use sift_core::suggest::{merge_with_existing, Suggestion};
use sift_core::ClientConfig;

use crate::api::{ApiClient, SuggestRequest};
use crate::cache::{CacheKey, SuggestionCache};

/// Input tuple for one suggestion fetch
#[derive(Debug, Clone)]
pub struct SuggestionQuery {
    pub description: String,
    pub amount: Option<f64>,
    pub account_id: Option<i64>,
    pub account_kind: Option<AccountKind>,
    /// Known payees, used for merging and as the failure fallback
    pub existing_payees: Vec<EntityRef>,
    /// Known categories, likewise
    pub existing_categories: Vec<EntityRef>,
}

/// Ranked suggestion lists for both editable fields
#[derive(Debug, Clone, Default)]
pub struct RankedSuggestions {
    pub payees: Vec<Suggestion>,
    pub categories: Vec<Suggestion>,
}

/// Fetches and caches suggestions for inline editors
pub struct SuggestionFetcher {
    api: ApiClient,
    cache: SuggestionCache,
    min_description_len: usize,
}

impl SuggestionFetcher {
    pub fn new(api: ApiClient, config: &ClientConfig) -> Self {
        Self {
            api,
            cache: SuggestionCache::new(config.suggestion_cache_ttl),
            min_description_len: config.min_description_len,
        }
    }

    /// Fetch ranked suggestions for the query.
    ///
    /// Returns an empty result without any network traffic when the
    /// description is under the minimum length. Identical queries inside the
    /// cache TTL are answered from the cache.
    pub async fn fetch(&self, query: &SuggestionQuery) -> Result<RankedSuggestions> {
        if query.description.trim().chars().count() < self.min_description_len {
            return Ok(RankedSuggestions::default());
        }

        let key = CacheKey::from_query(query);
        if let Some(hit) = self.cache.get(&key) {
            debug!(description = %query.description, "Suggestion cache hit");
            return Ok(hit);
        }

        let response = match self.request(query).await {
            Ok(response) => response,
            Err(first) => {
                warn!(error = %first, "Suggestion fetch failed, retrying once");
                self.request(query).await?
            }
        };

        let ranked = RankedSuggestions {
            payees: merge_with_existing(clamp_all(response.payee_suggestions), &query.existing_payees),
            categories: merge_with_existing(
                clamp_all(response.category_suggestions),
                &query.existing_categories,
            ),
        };

        self.cache.insert(key, ranked.clone());
        Ok(ranked)
    }

    async fn request(&self, query: &SuggestionQuery) -> Result<crate::api::SuggestResponse> {
        self.api
            .post_suggestions(&SuggestRequest {
                description: &query.description,
                amount: query.amount,
                account_id: query.account_id,
                account_kind: query.account_kind,
                existing_payees: &query.existing_payees,
                existing_categories: &query.existing_categories,
            })
            .await
    }
}

/// The wire is untrusted; pin scores back into [0.0, 1.0]
fn clamp_all(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    for s in &mut suggestions {
        s.confidence = s.confidence.clamp(0.0, 1.0);
    }
    suggestions
}
