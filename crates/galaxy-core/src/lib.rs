//! Galaxy navigation engine
//!
//! Manages a stack of star layers (one per drill depth), drives camera and
//! opacity transitions from a single clock, and serializes drill-in / back
//! flows against the render loop and the network.
//!
//! No HTTP and no real renderer here: papers come through [`PaperSource`],
//! pixels go through [`Scene`].

pub mod animation;
pub mod cancel;
pub mod clock;
pub mod config;
pub mod easing;
pub mod fault;
pub mod history;
pub mod layer;
pub mod layout;
pub mod navigator;
pub mod scene;
pub mod selection;
pub mod source;
pub mod status;

pub use animation::{AnimationScheduler, CameraTransition, OpacityTarget, OpacityTransition};
pub use cancel::CancellationToken;
pub use clock::{Clock, TokioClock};
pub use config::NavigatorConfig;
pub use fault::{NavError, Rejection};
pub use history::{NavigationHistory, NavigationSnapshot};
pub use layer::{
    Appearance, EntityId, GalaxyLayer, LayerKey, LayerOptions, LayerStore, PointEntity, Rgb,
};
pub use layout::{LayoutParams, StarPosition};
pub use navigator::{GalaxyState, Navigator};
pub use scene::{CameraState, HeadlessScene, Scene, ScreenPoint};
pub use selection::{ClickOutcome, SelectionController};
pub use source::{FetchError, MemorySource, PaperSource};
pub use status::{BackOutcome, DrillOutcome, FlowState, LoadOutcome, NavStatus};

pub use galaxy_types::{Breadth, Paper, PaperSet};
