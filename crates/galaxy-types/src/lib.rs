//! Shared API Types for the paper galaxy
//!
//! These are DATA CONTRACTS only - no behavior beyond display helpers,
//! no state, no rendering types.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────┐
//! │  Paper API       │  JSON   │  galaxy-core     │
//! │  (HTTP)          │ ◄─────► │  Navigator       │
//! └──────────────────┘         └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Everything that crosses the HTTP boundary lives here
//! 2. camelCase on the wire, snake_case in Rust
//! 3. Identifiers are strings (work ids, not UUIDs)

use serde::{Deserialize, Serialize};

/// `reason` value the API uses to say a filtered query under-returned and a
/// broadened retry is worthwhile.
pub const REASON_TOO_FEW_RESULTS: &str = "too_few_results";

/// Maximum number of authors shown for a paper.
pub const MAX_DISPLAY_AUTHORS: usize = 3;

// ============================================================================
// PAPER
// ============================================================================

/// A scholarly paper as returned by the API.
///
/// The navigation engine attaches these to point entities but never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Work identifier (used for reference lookups)
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub citation_count: u32,
    #[serde(default)]
    pub doi: Option<String>,
    /// Precomputed size/weight metric from the server
    #[serde(default)]
    pub size: Option<f32>,
}

impl Paper {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_citations(mut self, citation_count: u32) -> Self {
        self.citation_count = citation_count;
        self
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Authors for display: at most three, with "et al." when truncated.
    pub fn display_authors(&self) -> String {
        let shown: Vec<&str> = self
            .authors
            .iter()
            .take(MAX_DISPLAY_AUTHORS)
            .map(String::as_str)
            .collect();
        let mut text = shown.join(", ");
        if self.authors.len() > MAX_DISPLAY_AUTHORS {
            text.push_str(" et al.");
        }
        text
    }

    /// One-line label: "Title (2019)".
    pub fn label(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }

    /// DOI as a resolvable URL, if present.
    pub fn doi_url(&self) -> Option<String> {
        self.doi
            .as_deref()
            .filter(|doi| !doi.trim().is_empty())
            .map(|doi| format!("https://doi.org/{}", doi.trim()))
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

/// Response body for both the field root set and a paper's references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaperSet {
    #[serde(default)]
    pub papers: Vec<Paper>,
    /// Optional server hint, e.g. [`REASON_TOO_FEW_RESULTS`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PaperSet {
    pub fn new(papers: Vec<Paper>) -> Self {
        Self {
            papers,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// True when the server flagged this result as under-returning.
    pub fn signals_too_few(&self) -> bool {
        self.reason.as_deref() == Some(REASON_TOO_FEW_RESULTS)
    }
}

/// Error body of a non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// REQUEST SHAPE
// ============================================================================

/// How strict the server-side relevance filter should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Breadth {
    /// Normal filtered query
    #[default]
    Strict,
    /// Fallback with the relevance filter relaxed
    Broad,
}

impl Breadth {
    pub fn is_broad(&self) -> bool {
        matches!(self, Breadth::Broad)
    }
}
