//! Fault types for navigation.
//!
//! `NavError` is a real failure surfaced to the caller (and to `status.error`
//! when it comes from the network). `Rejection` is a request that was simply
//! not carried out: the UI treats it as a no-op.

use crate::layer::LayerKey;
use crate::source::FetchError;
use thiserror::Error;

/// Navigation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    /// Paper identifier missing or blank. Rejected before any network call.
    #[error("invalid paper identifier: {0:?}")]
    InvalidPaperId(String),

    /// Field name missing or blank.
    #[error("invalid field: {0:?}")]
    InvalidField(String),

    /// Fetch failed or returned non-2xx.
    #[error(transparent)]
    Transport(#[from] FetchError),

    /// A layer was requested for an empty paper list.
    #[error("cannot create a layer from an empty paper set")]
    EmptyLayer,

    /// Attempted to remove the only remaining layer.
    #[error("cannot remove the root layer")]
    RootLayerRemoval,

    /// Referenced layer doesn't exist.
    #[error("layer {0} not found")]
    LayerNotFound(LayerKey),
}

impl NavError {
    /// Check if this error came from the data collaborator.
    pub fn is_transport(&self) -> bool {
        matches!(self, NavError::Transport(_))
    }

    /// Check if this error indicates a programming error in the caller.
    pub fn is_bug(&self) -> bool {
        matches!(
            self,
            NavError::EmptyLayer | NavError::RootLayerRemoval | NavError::LayerNotFound(_)
        )
    }
}

/// Why a drill/back/load request was not carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Another drill or back flow is in flight.
    #[error("navigation already in progress")]
    Busy,

    /// Drill-in requires a selected paper.
    #[error("no paper selected")]
    NoSelection,

    /// Back requires at least one snapshot.
    #[error("navigation history is empty")]
    NoHistory,

    /// Back requires at least two layers.
    #[error("only the root layer is loaded")]
    RootOnly,

    /// The root layer has already been loaded for this navigator.
    #[error("root layer already loaded")]
    AlreadyLoaded,

    /// No field has been selected yet.
    #[error("no field loaded")]
    NotLoaded,

    /// The navigator was torn down.
    #[error("navigator has been torn down")]
    TornDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_displays_verbatim() {
        let err = NavError::from(FetchError::Status {
            status: 503,
            message: "upstream unavailable".into(),
        });
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "upstream unavailable");
    }

    #[test]
    fn nav_error_is_bug() {
        assert!(NavError::EmptyLayer.is_bug());
        assert!(NavError::RootLayerRemoval.is_bug());
        assert!(!NavError::InvalidPaperId(String::new()).is_bug());
    }

    #[test]
    fn rejection_display() {
        assert!(Rejection::Busy.to_string().contains("in progress"));
        assert!(Rejection::NoHistory.to_string().contains("empty"));
    }
}
