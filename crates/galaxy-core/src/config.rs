//! Navigator tuning.
//!
//! Loaded as the `navigation` section of the settings file. Every field has a
//! default so a partial section is fine.

use serde::{Deserialize, Serialize};

use crate::layer::Rgb;
use crate::layout::LayoutParams;
use crate::scene::CameraState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Distance between consecutive layers along -z
    pub depth_step: f32,
    /// Camera sits this far in front of the layer it looks at
    pub camera_layer_offset: f32,
    /// How far the camera nudges during the pre-zoom
    pub pre_zoom_distance: f32,
    pub pre_zoom_ms: u64,
    /// Full camera transition between layers
    pub transition_ms: u64,
    /// Layer fade in / fade out
    pub fade_ms: u64,
    /// Back waits this long for the top layer to fade before removing it
    pub back_wait_ms: u64,
    /// Opacity of a layer that has been drilled out of
    pub dimmed_opacity: f32,
    /// Entities at or below this opacity can't be picked
    pub pick_opacity_floor: f32,
    pub highlight_intensity_delta: f32,
    pub highlight_emissive: Rgb,
    /// A root set smaller than this triggers the broadened fallback
    pub min_root_papers: usize,
    pub layer_thickness: f32,
    pub layer_spread: f32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            depth_step: 400.0,
            camera_layer_offset: 260.0,
            pre_zoom_distance: 60.0,
            pre_zoom_ms: 350,
            transition_ms: 1600,
            fade_ms: 1200,
            back_wait_ms: 600,
            dimmed_opacity: 0.18,
            pick_opacity_floor: 0.05,
            highlight_intensity_delta: 0.8,
            highlight_emissive: Rgb::HIGHLIGHT,
            min_root_papers: 12,
            layer_thickness: 40.0,
            layer_spread: 180.0,
        }
    }
}

impl NavigatorConfig {
    /// Layout parameters for the layer store.
    pub fn layout(&self) -> LayoutParams {
        LayoutParams {
            spread: self.layer_spread,
            thickness: self.layer_thickness,
            ..LayoutParams::default()
        }
    }

    /// Camera resting in front of a layer at `depth`.
    pub fn camera_for_depth(&self, depth: f32) -> CameraState {
        CameraState::new(depth + self.camera_layer_offset, depth)
    }

    /// Validate values that would break navigation.
    pub fn validate(&self) -> Result<(), String> {
        if self.depth_step.is_nan() || self.depth_step <= 0.0 {
            return Err(format!("depth_step must be positive, got {}", self.depth_step));
        }
        if !(self.dimmed_opacity > 0.0 && self.dimmed_opacity <= 1.0) {
            return Err(format!(
                "dimmed_opacity must be in (0, 1], got {}",
                self.dimmed_opacity
            ));
        }
        if self.pick_opacity_floor >= self.dimmed_opacity {
            return Err("pick_opacity_floor must be below dimmed_opacity".to_string());
        }
        Ok(())
    }
}
