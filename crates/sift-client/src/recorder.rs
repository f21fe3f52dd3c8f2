//! Selection recorder
//!
//! Posts selection events to the backend so future suggestions improve.
//! This path is best-effort telemetry: delivery happens off the caller's
//! critical path, gets one automatic retry, and a persistent failure is
//! logged and swallowed. It never blocks or reverts the field update the
//! user actually made.

use tracing::{debug, warn};

use sift_core::selection::SelectionEvent;

use crate::api::ApiClient;

/// Delivers selection events, exactly once per user selection
#[derive(Clone)]
pub struct SelectionRecorder {
    api: ApiClient,
}

impl SelectionRecorder {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fire-and-forget delivery on a spawned task. Returns immediately;
    /// the caller's field-update mutation proceeds independently.
    pub fn record(&self, event: SelectionEvent) {
        let api = self.api.clone();
        tokio::spawn(async move {
            deliver(&api, &event).await;
        });
    }

    /// Deliver and wait. Same retry/swallow policy; reports whether the
    /// event reached the backend. Used by CLI flows that end the process
    /// right after recording.
    pub async fn record_blocking(&self, event: &SelectionEvent) -> bool {
        deliver(&self.api, event).await
    }
}

async fn deliver(api: &ApiClient, event: &SelectionEvent) -> bool {
    match api.post_selection(event).await {
        Ok(()) => {
            debug!(
                transaction_id = event.transaction_id,
                field = %event.field_kind,
                "Selection recorded"
            );
            return true;
        }
        Err(first) => {
            warn!(error = %first, "Selection recording failed, retrying once");
        }
    }

    match api.post_selection(event).await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                transaction_id = event.transaction_id,
                field = %event.field_kind,
                error = %e,
                "Selection recording failed, dropping event"
            );
            false
        }
    }
}
