//! Animation scheduler - camera and opacity transitions driven by absolute time.
//!
//! # Rules
//! - Call `tick(now)` once per render frame with the current clock reading
//! - Values are a pure function of `now`, never of how many ticks happened,
//!   so skipped frames don't slow anything down
//! - At most one camera transition; any number of opacity transitions
//! - Starting a transition never snaps: it begins from the value the old
//!   transition would show at that same instant

use tracing::trace;

use crate::easing::{ease_in_out_cubic, lerp_f32, progress};
use crate::layer::EntityId;
use crate::scene::CameraState;

/// Anything whose entities carry an opacity the scheduler can drive.
pub trait OpacityTarget {
    fn opacity(&self, id: EntityId) -> Option<f32>;
    fn set_opacity(&mut self, id: EntityId, opacity: f32);
}

/// Eased camera move from one z pair to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub from: CameraState,
    pub to: CameraState,
}

impl CameraTransition {
    /// Camera state at `now_ms`.
    pub fn sample(&self, now_ms: f64) -> CameraState {
        let t = ease_in_out_cubic(progress(self.start_ms, self.duration_ms, now_ms));
        CameraState {
            position_z: lerp_f32(self.from.position_z, self.to.position_z, t),
            target_z: lerp_f32(self.from.target_z, self.to.target_z, t),
        }
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        progress(self.start_ms, self.duration_ms, now_ms) >= 1.0
    }
}

/// Eased fade of a set of entities toward one shared opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct OpacityTransition {
    pub start_ms: f64,
    pub duration_ms: f64,
    /// Starting opacity captured per entity
    pub from: Vec<(EntityId, f32)>,
    pub to: f32,
}

impl OpacityTransition {
    fn eased(&self, now_ms: f64) -> f32 {
        ease_in_out_cubic(progress(self.start_ms, self.duration_ms, now_ms))
    }

    /// Opacity of `id` at `now_ms`, if this transition drives it.
    pub fn sample(&self, id: EntityId, now_ms: f64) -> Option<f32> {
        let t = self.eased(now_ms);
        self.from
            .iter()
            .find(|(entity, _)| *entity == id)
            .map(|(_, from)| lerp_f32(*from, self.to, t))
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        progress(self.start_ms, self.duration_ms, now_ms) >= 1.0
    }
}

/// Owns every live transition.
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    camera: Option<CameraTransition>,
    fades: Vec<OpacityTransition>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera state at `now_ms`: the live transition's value, or `resting`.
    pub fn camera_at(&self, now_ms: f64, resting: CameraState) -> CameraState {
        self.camera
            .as_ref()
            .map(|c| c.sample(now_ms))
            .unwrap_or(resting)
    }

    /// Start a camera transition, replacing any live one.
    ///
    /// `current` is the camera as last applied; when a transition is already
    /// live its instantaneous value at `now_ms` is used instead.
    pub fn start_camera(
        &mut self,
        now_ms: f64,
        current: CameraState,
        to: CameraState,
        duration_ms: f64,
    ) {
        let from = self.camera_at(now_ms, current);
        trace!(?from, ?to, duration_ms, "camera transition");
        self.camera = Some(CameraTransition {
            start_ms: now_ms,
            duration_ms,
            from,
            to,
        });
    }

    /// Start fading `ids` toward `to`.
    ///
    /// Each entity starts from its current interpolated opacity; entities that
    /// were part of an older fade are taken out of it.
    pub fn start_fade(
        &mut self,
        now_ms: f64,
        ids: &[EntityId],
        to: f32,
        duration_ms: f64,
        targets: &dyn OpacityTarget,
    ) {
        let from: Vec<(EntityId, f32)> = ids
            .iter()
            .filter_map(|id| {
                let live = self.fades.iter().rev().find_map(|f| f.sample(*id, now_ms));
                live.or_else(|| targets.opacity(*id)).map(|o| (*id, o))
            })
            .collect();

        self.forget(ids);
        if from.is_empty() {
            return;
        }
        trace!(entities = from.len(), to, duration_ms, "opacity transition");
        self.fades.push(OpacityTransition {
            start_ms: now_ms,
            duration_ms,
            from,
            to,
        });
    }

    /// Drop `ids` from every live fade (entities being disposed).
    pub fn forget(&mut self, ids: &[EntityId]) {
        if ids.is_empty() {
            return;
        }
        for fade in &mut self.fades {
            fade.from.retain(|(id, _)| !ids.contains(id));
        }
        self.fades.retain(|f| !f.from.is_empty());
    }

    /// Apply every live transition at `now_ms`. Finished transitions are
    /// applied at their end value and then dropped.
    ///
    /// Returns true while anything is still animating.
    pub fn tick(
        &mut self,
        now_ms: f64,
        camera: &mut CameraState,
        targets: &mut dyn OpacityTarget,
    ) -> bool {
        if let Some(transition) = self.camera {
            *camera = transition.sample(now_ms);
            if transition.is_finished(now_ms) {
                self.camera = None;
            }
        }

        for fade in &self.fades {
            let t = fade.eased(now_ms);
            for (id, from) in &fade.from {
                targets.set_opacity(*id, lerp_f32(*from, fade.to, t));
            }
        }
        self.fades.retain(|f| !f.is_finished(now_ms));

        self.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.camera.is_some() || !self.fades.is_empty()
    }

    pub fn camera_transition(&self) -> Option<&CameraTransition> {
        self.camera.as_ref()
    }

    pub fn fade_count(&self) -> usize {
        self.fades.len()
    }

    /// Drop everything (teardown).
    pub fn clear(&mut self) {
        self.camera = None;
        self.fades.clear();
    }
}
