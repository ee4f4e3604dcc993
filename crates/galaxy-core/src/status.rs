//! What the UI reads back, and what each navigation request returned.

use std::sync::Arc;

use galaxy_types::Paper;
use serde::Serialize;

use crate::fault::{NavError, Rejection};

/// Which flow, if any, currently holds the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    LoadingRoot,
    DrillingIn,
    DrillingBack,
}

impl FlowState {
    pub fn is_idle(self) -> bool {
        self == FlowState::Idle
    }
}

/// Read-only view of the navigator for the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavStatus {
    pub flow: FlowState,
    pub loading: bool,
    /// Takes precedence over `notice` when both would be shown
    pub error: Option<String>,
    pub notice: Option<String>,
    pub current_depth: f32,
    pub navigation_stack_size: usize,
    pub layer_count: usize,
    pub selected_paper: Option<Arc<Paper>>,
    pub tooltip: Option<Arc<Paper>>,
    /// Whether a drill-in request would be attempted right now
    pub drill_available: bool,
}

impl NavStatus {
    /// The single banner to show: the error if any, else the notice.
    pub fn banner(&self) -> Option<&str> {
        self.error.as_deref().or(self.notice.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { papers: usize, broadened: bool },
    Empty,
    Failed(NavError),
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrillOutcome {
    Entered { paper_id: String, depth: f32, references: usize },
    /// `cached` when answered from the empty-result cache without fetching.
    NoReferences { paper_id: String, cached: bool },
    Failed(NavError),
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackOutcome {
    Returned { depth: f32 },
    Failed(NavError),
    Rejected(Rejection),
}

impl DrillOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, DrillOutcome::Rejected(_))
    }
}

impl BackOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, BackOutcome::Rejected(_))
    }
}
