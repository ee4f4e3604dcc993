//! Navigation history for drill-in / back.
//!
//! Each drill-in pushes a snapshot of the layer being left. Back peeks it for
//! the camera to restore and pops it once the top layer is gone. Pure stack:
//! no merging, no capping.

use serde::{Deserialize, Serialize};

use crate::layer::LayerKey;
use crate::layout::StarPosition;
use crate::scene::CameraState;

/// The state of one layer at the moment it was drilled out of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    /// Layer we came from.
    pub layer_key: LayerKey,

    /// Depth of that layer.
    pub depth: f32,

    /// Camera z when the drill started.
    pub camera_z: f32,

    /// Orbit target z when the drill started.
    pub camera_target_z: f32,

    /// Star positions of the layer.
    pub star_positions: Vec<StarPosition>,
}

impl NavigationSnapshot {
    pub fn new(layer_key: LayerKey, depth: f32, camera: CameraState) -> Self {
        Self {
            layer_key,
            depth,
            camera_z: camera.position_z,
            camera_target_z: camera.target_z,
            star_positions: Vec::new(),
        }
    }

    pub fn with_star_positions(mut self, star_positions: Vec<StarPosition>) -> Self {
        self.star_positions = star_positions;
        self
    }

    /// Camera recorded by the snapshot.
    pub fn camera(&self) -> CameraState {
        CameraState::new(self.camera_z, self.camera_target_z)
    }
}

/// Stack of snapshots, bottom is the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationHistory {
    snapshots: Vec<NavigationSnapshot>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    pub fn push(&mut self, snapshot: NavigationSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Pop the most recent snapshot, `None` when empty.
    pub fn pop(&mut self) -> Option<NavigationSnapshot> {
        self.snapshots.pop()
    }

    pub fn peek(&self) -> Option<&NavigationSnapshot> {
        self.snapshots.last()
    }

    pub fn size(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Iterate from the root upward.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationSnapshot> {
        self.snapshots.iter()
    }

    /// Layer keys from the root upward.
    pub fn breadcrumbs(&self) -> Vec<LayerKey> {
        self.snapshots.iter().map(|s| s.layer_key.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(key: &str, depth: f32) -> NavigationSnapshot {
        NavigationSnapshot::new(
            LayerKey::new(key),
            depth,
            CameraState::new(depth + 260.0, depth),
        )
    }

    #[test]
    fn history_push_pop() {
        let mut history = NavigationHistory::new();
        history.push(snapshot("root:ml", 0.0));
        history.push(snapshot("refs:W1", -400.0));
        assert_eq!(history.size(), 2);

        let popped = history.pop().unwrap();
        assert_eq!(popped.layer_key, LayerKey::new("refs:W1"));
        assert_eq!(popped.camera(), CameraState::new(-140.0, -400.0));

        history.pop().unwrap();
        assert!(history.is_empty());
        assert!(history.pop().is_none());
    }

    #[test]
    fn history_peek_does_not_remove() {
        let mut history = NavigationHistory::new();
        assert!(history.peek().is_none());
        history.push(snapshot("root:ml", 0.0));
        assert_eq!(history.peek().unwrap().depth, 0.0);
        assert_eq!(history.size(), 1);
    }

    #[test]
    fn history_keeps_duplicates() {
        let mut history = NavigationHistory::new();
        for _ in 0..3 {
            history.push(snapshot("refs:W1", -400.0));
        }
        assert_eq!(history.size(), 3);
    }

    #[test]
    fn history_breadcrumbs() {
        let mut history = NavigationHistory::new();
        history.push(snapshot("root:ml", 0.0));
        history.push(snapshot("refs:W1", -400.0));
        assert_eq!(
            history.breadcrumbs(),
            vec![LayerKey::new("root:ml"), LayerKey::new("refs:W1")]
        );

        history.clear();
        assert!(history.breadcrumbs().is_empty());
    }
}
