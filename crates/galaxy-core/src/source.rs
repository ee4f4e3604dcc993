//! Data collaborator boundary - where papers come from.
//!
//! The navigator never talks HTTP itself. It asks a [`PaperSource`] for a
//! field's root set or a paper's references and gets back a [`PaperSet`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use galaxy_types::{Breadth, PaperSet};
use parking_lot::Mutex;
use thiserror::Error;

/// Transport failure from the data collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Non-2xx response. `message` is the server's own message when it sent
    /// one, otherwise "request failed with status N".
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Request never produced a response.
    #[error("{0}")]
    Network(String),

    /// Response body couldn't be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Build a status error, preferring the body's message when non-blank.
    pub fn from_status(status: u16, body_message: Option<String>) -> Self {
        let message = body_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("request failed with status {status}"));
        FetchError::Status { status, message }
    }
}

/// Source of papers for the galaxy.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Root paper set for a field.
    async fn field_papers(&self, field: &str, breadth: Breadth) -> Result<PaperSet, FetchError>;

    /// Papers referenced by `paper_id`.
    async fn references(&self, paper_id: &str, breadth: Breadth)
        -> Result<PaperSet, FetchError>;
}

// =============================================================================
// IN-MEMORY SOURCE
// =============================================================================

/// In-memory [`PaperSource`] with optional latency, for offline use and tests.
///
/// Keys not registered resolve to an empty set. Every call is counted.
#[derive(Debug, Default)]
pub struct MemorySource {
    fields: Mutex<HashMap<(String, Breadth), PaperSet>>,
    references: Mutex<HashMap<(String, Breadth), Result<PaperSet, FetchError>>>,
    latency: Option<Duration>,
    field_calls: AtomicUsize,
    reference_calls: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency` (tokio time, so it honours paused clocks).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert_field(&self, field: &str, breadth: Breadth, set: PaperSet) {
        self.fields.lock().insert((field.to_string(), breadth), set);
    }

    /// Register references for both breadths.
    pub fn insert_references(&self, paper_id: &str, set: PaperSet) {
        let mut refs = self.references.lock();
        refs.insert((paper_id.to_string(), Breadth::Strict), Ok(set.clone()));
        refs.insert((paper_id.to_string(), Breadth::Broad), Ok(set));
    }

    pub fn insert_references_for(&self, paper_id: &str, breadth: Breadth, set: PaperSet) {
        self.references
            .lock()
            .insert((paper_id.to_string(), breadth), Ok(set));
    }

    /// Make every reference lookup for `paper_id` fail.
    pub fn fail_references(&self, paper_id: &str, error: FetchError) {
        let mut refs = self.references.lock();
        refs.insert((paper_id.to_string(), Breadth::Strict), Err(error.clone()));
        refs.insert((paper_id.to_string(), Breadth::Broad), Err(error));
    }

    pub fn field_calls(&self) -> usize {
        self.field_calls.load(Ordering::SeqCst)
    }

    pub fn reference_calls(&self) -> usize {
        self.reference_calls.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl PaperSource for MemorySource {
    async fn field_papers(&self, field: &str, breadth: Breadth) -> Result<PaperSet, FetchError> {
        self.field_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        Ok(self
            .fields
            .lock()
            .get(&(field.to_string(), breadth))
            .cloned()
            .unwrap_or_default())
    }

    async fn references(
        &self,
        paper_id: &str,
        breadth: Breadth,
    ) -> Result<PaperSet, FetchError> {
        self.reference_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        self.references
            .lock()
            .get(&(paper_id.to_string(), breadth))
            .cloned()
            .unwrap_or_else(|| Ok(PaperSet::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_types::Paper;

    #[test]
    fn status_error_prefers_body_message() {
        let err = FetchError::from_status(404, Some("work not found".into()));
        assert_eq!(err.to_string(), "work not found");
    }

    #[test]
    fn status_error_falls_back_to_generic_message() {
        assert_eq!(
            FetchError::from_status(500, None).to_string(),
            "request failed with status 500"
        );
        assert_eq!(
            FetchError::from_status(502, Some("   ".into())).to_string(),
            "request failed with status 502"
        );
    }

    #[tokio::test]
    async fn memory_source_counts_calls() {
        let source = MemorySource::new();
        source.insert_references("W1", PaperSet::new(vec![Paper::new("W2", "Ref")]));

        let refs = source.references("W1", Breadth::Strict).await.unwrap();
        assert_eq!(refs.len(), 1);
        let missing = source.references("W9", Breadth::Strict).await.unwrap();
        assert!(missing.is_empty());

        assert_eq!(source.reference_calls(), 2);
        assert_eq!(source.field_calls(), 0);
    }
}
