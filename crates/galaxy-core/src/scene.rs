//! Render collaborator boundary.
//!
//! The engine only needs a point-cloud renderer that can add/remove point
//! entities, mutate their appearance and opacity, move a camera along z, and
//! pick the entities under a screen point. [`HeadlessScene`] is an in-memory
//! implementation used by the CLI and tests.

use serde::{Deserialize, Serialize};

use crate::layer::{Appearance, EntityId, PointEntity};
use crate::layout::StarPosition;

/// Camera z and orbit-target z. The camera always looks along -z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CameraState {
    pub position_z: f32,
    pub target_z: f32,
}

impl CameraState {
    pub fn new(position_z: f32, target_z: f32) -> Self {
        Self {
            position_z,
            target_z,
        }
    }

    /// Shift both camera and target by `dz`.
    pub fn offset(self, dz: f32) -> Self {
        Self::new(self.position_z + dz, self.target_z + dz)
    }
}

/// Point on screen in normalized device coordinates ([-1, 1] on both axes, +y up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 3D point-cloud renderer.
pub trait Scene: Send {
    fn add_entity(&mut self, entity: &PointEntity);

    /// Detach the entity and dispose its render resources.
    fn remove_entity(&mut self, id: EntityId);

    fn set_opacity(&mut self, id: EntityId, opacity: f32);

    fn set_appearance(&mut self, id: EntityId, appearance: &Appearance);

    fn set_camera(&mut self, camera: CameraState);

    /// Entities under `point`, nearest first.
    fn pick(&self, point: ScreenPoint) -> Vec<EntityId>;

    /// Number of entities currently attached.
    fn entity_count(&self) -> usize;

    /// Release everything the renderer still holds (teardown).
    fn release(&mut self);
}

// =============================================================================
// HEADLESS SCENE
// =============================================================================

#[derive(Debug, Clone)]
struct SceneEntity {
    id: EntityId,
    position: StarPosition,
    appearance: Appearance,
    opacity: f32,
}

/// In-memory scene with a perspective pick.
///
/// The camera sits on the z axis looking toward -z with a square viewport.
#[derive(Debug, Clone)]
pub struct HeadlessScene {
    /// Insertion order is pick tie-break order
    entities: Vec<SceneEntity>,
    camera: CameraState,
    fov_y_degrees: f32,
    disposed: usize,
    released: bool,
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessScene {
    const NEAR: f32 = 0.1;

    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            camera: CameraState::default(),
            fov_y_degrees: 60.0,
            disposed: 0,
            released: false,
        }
    }

    pub fn with_fov(mut self, fov_y_degrees: f32) -> Self {
        self.fov_y_degrees = fov_y_degrees;
        self
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    /// Total entities disposed through `remove_entity` or `release`.
    pub fn disposed_count(&self) -> usize {
        self.disposed
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn opacity(&self, id: EntityId) -> Option<f32> {
        self.find(id).map(|e| e.opacity)
    }

    pub fn appearance(&self, id: EntityId) -> Option<Appearance> {
        self.find(id).map(|e| e.appearance)
    }

    /// Project an entity to the screen. `None` if unknown or behind the camera.
    pub fn project(&self, id: EntityId) -> Option<ScreenPoint> {
        let entity = self.find(id)?;
        let (point, _, _) = self.project_position(&entity.position)?;
        Some(point)
    }

    fn find(&self, id: EntityId) -> Option<&SceneEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    fn find_mut(&mut self, id: EntityId) -> Option<&mut SceneEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Returns (screen point, screen-space radius, distance along view axis).
    fn project_position(&self, position: &StarPosition) -> Option<(ScreenPoint, f32, f32)> {
        let distance = self.camera.position_z - position.z;
        if distance <= Self::NEAR {
            return None;
        }
        let half_fov = (self.fov_y_degrees.to_radians() / 2.0).tan();
        let scale = 1.0 / (distance * half_fov);
        Some((
            ScreenPoint::new(position.x * scale, position.y * scale),
            position.radius * scale,
            distance,
        ))
    }
}

impl Scene for HeadlessScene {
    fn add_entity(&mut self, entity: &PointEntity) {
        self.entities.push(SceneEntity {
            id: entity.id,
            position: entity.position,
            appearance: entity.current,
            opacity: entity.opacity,
        });
    }

    fn remove_entity(&mut self, id: EntityId) {
        let before = self.entities.len();
        self.entities.retain(|e| e.id != id);
        self.disposed += before - self.entities.len();
    }

    fn set_opacity(&mut self, id: EntityId, opacity: f32) {
        if let Some(entity) = self.find_mut(id) {
            entity.opacity = opacity;
        }
    }

    fn set_appearance(&mut self, id: EntityId, appearance: &Appearance) {
        if let Some(entity) = self.find_mut(id) {
            entity.appearance = *appearance;
        }
    }

    fn set_camera(&mut self, camera: CameraState) {
        self.camera = camera;
    }

    fn pick(&self, point: ScreenPoint) -> Vec<EntityId> {
        let mut hits: Vec<(f32, EntityId)> = self
            .entities
            .iter()
            .filter_map(|entity| {
                let (center, radius, distance) = self.project_position(&entity.position)?;
                let dx = center.x - point.x;
                let dy = center.y - point.y;
                (dx * dx + dy * dy <= radius * radius).then_some((distance, entity.id))
            })
            .collect();
        // Stable: equal distances keep insertion order
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, id)| id).collect()
    }

    fn entity_count(&self) -> usize {
        self.entities.len()
    }

    fn release(&mut self) {
        self.disposed += self.entities.len();
        self.entities.clear();
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Rgb;
    use galaxy_types::Paper;
    use std::sync::Arc;

    fn entity(id: u64, x: f32, z: f32, radius: f32) -> PointEntity {
        let appearance = Appearance {
            color: Rgb::STAR,
            emissive_color: Rgb::STAR,
            emissive_intensity: 0.5,
        };
        PointEntity {
            id: EntityId(id),
            paper: Arc::new(Paper::new(format!("W{id}"), "T")),
            position: StarPosition {
                x,
                y: 0.0,
                z,
                radius,
            },
            base: appearance,
            current: appearance,
            opacity: 1.0,
        }
    }

    #[test]
    fn pick_returns_nearest_first() {
        let mut scene = HeadlessScene::new();
        scene.set_camera(CameraState::new(100.0, 0.0));
        scene.add_entity(&entity(1, 0.0, -50.0, 5.0));
        scene.add_entity(&entity(2, 0.0, 0.0, 5.0));

        assert_eq!(
            scene.pick(ScreenPoint::new(0.0, 0.0)),
            vec![EntityId(2), EntityId(1)]
        );
    }

    #[test]
    fn pick_ties_keep_insertion_order() {
        let mut scene = HeadlessScene::new();
        scene.set_camera(CameraState::new(100.0, 0.0));
        scene.add_entity(&entity(7, 0.0, 0.0, 5.0));
        scene.add_entity(&entity(3, 0.0, 0.0, 5.0));

        assert_eq!(
            scene.pick(ScreenPoint::new(0.0, 0.0)),
            vec![EntityId(7), EntityId(3)]
        );
    }

    #[test]
    fn pick_misses_and_skips_behind_camera() {
        let mut scene = HeadlessScene::new();
        scene.set_camera(CameraState::new(100.0, 0.0));
        scene.add_entity(&entity(1, 0.0, 200.0, 5.0));
        scene.add_entity(&entity(2, 50.0, 0.0, 1.0));

        assert!(scene.pick(ScreenPoint::new(0.0, 0.0)).is_empty());
        assert!(scene.project(EntityId(1)).is_none());
    }

    #[test]
    fn projected_point_picks_entity() {
        let mut scene = HeadlessScene::new();
        scene.set_camera(CameraState::new(260.0, 0.0));
        scene.add_entity(&entity(4, 40.0, -10.0, 3.0));

        let point = scene.project(EntityId(4)).unwrap();
        assert_eq!(scene.pick(point), vec![EntityId(4)]);
    }

    #[test]
    fn remove_and_release_count_disposals() {
        let mut scene = HeadlessScene::new();
        scene.add_entity(&entity(1, 0.0, 0.0, 1.0));
        scene.add_entity(&entity(2, 0.0, 0.0, 1.0));
        scene.add_entity(&entity(3, 0.0, 0.0, 1.0));

        scene.remove_entity(EntityId(1));
        scene.remove_entity(EntityId(1));
        assert_eq!(scene.entity_count(), 2);
        assert_eq!(scene.disposed_count(), 1);

        scene.release();
        assert_eq!(scene.entity_count(), 0);
        assert_eq!(scene.disposed_count(), 3);
        assert!(scene.is_released());
    }
}
