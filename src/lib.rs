//! Galaxy navigator
//!
//! Wires the navigation engine to the paper API and a settings file, and
//! exposes a session facade for a UI (or the `galaxy_nav` CLI).

pub mod api;
pub mod config;
pub mod session;

pub use api::{ApiClient, ApiClientError};
pub use config::{ApiSettings, GalaxySettings, RenderSettings, SettingsError};
pub use session::GalaxySession;

pub use galaxy_core;
pub use galaxy_types;
