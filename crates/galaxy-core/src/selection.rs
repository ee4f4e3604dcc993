//! Selection controller - hover and click over the layer store.
//!
//! At most one entity is selected (and highlighted) across all layers. Picks
//! go through the same [`LayerStore`] the orchestrator mutates, so an entity
//! from a removed layer can never be hovered or selected.

use std::sync::Arc;

use galaxy_types::Paper;
use tracing::debug;

use crate::config::NavigatorConfig;
use crate::layer::{Appearance, EntityId, LayerStore};
use crate::scene::{Scene, ScreenPoint};

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Clicked the entity that was already selected.
    Reselected(EntityId),
    /// A different entity is now selected.
    Selected(EntityId),
    /// Clicked empty space; nothing is selected.
    Cleared,
}

#[derive(Debug, Default)]
pub struct SelectionController {
    selected: Option<EntityId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    /// Paper of the selected entity.
    pub fn selected_paper(&self, layers: &LayerStore) -> Option<Arc<Paper>> {
        self.selected
            .and_then(|id| layers.entity(id))
            .map(|e| Arc::clone(&e.paper))
    }

    /// Nearest live, visible entity under `point`.
    pub fn pick(
        scene: &dyn Scene,
        layers: &LayerStore,
        point: ScreenPoint,
        config: &NavigatorConfig,
    ) -> Option<EntityId> {
        scene.pick(point).into_iter().find(|id| {
            layers
                .entity(*id)
                .is_some_and(|e| e.opacity > config.pick_opacity_floor)
        })
    }

    /// Paper under `point`, for the tooltip. Never changes appearance.
    pub fn hover(
        &self,
        scene: &dyn Scene,
        layers: &LayerStore,
        point: ScreenPoint,
        config: &NavigatorConfig,
    ) -> Option<Arc<Paper>> {
        Self::pick(scene, layers, point, config)
            .and_then(|id| layers.entity(id))
            .map(|e| Arc::clone(&e.paper))
    }

    pub fn click(
        &mut self,
        scene: &mut dyn Scene,
        layers: &mut LayerStore,
        point: ScreenPoint,
        config: &NavigatorConfig,
    ) -> ClickOutcome {
        match Self::pick(&*scene, layers, point, config) {
            Some(id) => self.select(scene, layers, id, config),
            None => {
                self.clear(scene, layers);
                ClickOutcome::Cleared
            }
        }
    }

    /// Select `id` directly, highlighting it and reverting the previous one.
    pub fn select(
        &mut self,
        scene: &mut dyn Scene,
        layers: &mut LayerStore,
        id: EntityId,
        config: &NavigatorConfig,
    ) -> ClickOutcome {
        if self.selected == Some(id) {
            return ClickOutcome::Reselected(id);
        }
        if layers.entity(id).is_none() {
            self.clear(scene, layers);
            return ClickOutcome::Cleared;
        }

        self.revert(scene, layers);
        if let Some(entity) = layers.entity_mut(id) {
            let highlight = Appearance {
                color: entity.base.color,
                emissive_color: config.highlight_emissive,
                emissive_intensity: entity.base.emissive_intensity
                    + config.highlight_intensity_delta,
            };
            entity.current = highlight;
            scene.set_appearance(id, &highlight);
            debug!(entity = %id, paper = %entity.paper.id, "selected");
        }
        self.selected = Some(id);
        ClickOutcome::Selected(id)
    }

    /// Revert any highlight and drop the selection.
    pub fn clear(&mut self, scene: &mut dyn Scene, layers: &mut LayerStore) {
        self.revert(scene, layers);
        self.selected = None;
    }

    /// Forget the selection without touching appearance (entities already gone).
    pub fn reset(&mut self) {
        self.selected = None;
    }

    fn revert(&mut self, scene: &mut dyn Scene, layers: &mut LayerStore) {
        let Some(previous) = self.selected.take() else {
            return;
        };
        // The entity may have been disposed with its layer
        if let Some(entity) = layers.entity_mut(previous) {
            entity.current = entity.base;
            scene.set_appearance(previous, &entity.base);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{LayerKey, LayerOptions};
    use crate::scene::{CameraState, HeadlessScene};
    use crate::animation::OpacityTarget;

    fn setup(n: usize) -> (HeadlessScene, LayerStore, Vec<EntityId>) {
        let mut scene = HeadlessScene::new();
        scene.set_camera(CameraState::new(260.0, 0.0));
        let config = NavigatorConfig::default();
        let mut layers = LayerStore::new(config.layout());
        let papers = (0..n)
            .map(|i| Paper::new(format!("W{i}"), format!("Paper {i}")))
            .collect();
        let ids = layers
            .create_layer(
                &mut scene,
                papers,
                0.0,
                LayerOptions::new(LayerKey::root("ml"), 1.0),
            )
            .unwrap()
            .entity_ids();
        (scene, layers, ids)
    }

    #[test]
    fn hover_returns_paper_without_highlight() {
        let (scene, layers, ids) = setup(3);
        let config = NavigatorConfig::default();
        let selection = SelectionController::new();

        let point = scene.project(ids[1]).unwrap();
        let paper = selection.hover(&scene, &layers, point, &config).unwrap();
        assert!(scene.pick(point).contains(&ids[1]));
        assert!(layers.entity(ids[1]).unwrap().is_at_base());
        assert!(layers.find_paper(&paper.id).is_some());
    }

    #[test]
    fn click_a_then_b_leaves_only_b_highlighted() {
        let (mut scene, mut layers, ids) = setup(3);
        let config = NavigatorConfig::default();
        let mut selection = SelectionController::new();

        selection.select(&mut scene, &mut layers, ids[0], &config);
        let outcome = selection.select(&mut scene, &mut layers, ids[1], &config);
        assert_eq!(outcome, ClickOutcome::Selected(ids[1]));

        let a = layers.entity(ids[0]).unwrap();
        let b = layers.entity(ids[1]).unwrap();
        assert!(a.is_at_base());
        assert_eq!(scene.appearance(ids[0]), Some(a.base));
        assert_eq!(b.current.emissive_color, config.highlight_emissive);
        assert_eq!(
            b.current.emissive_intensity,
            b.base.emissive_intensity + config.highlight_intensity_delta
        );

        let highlighted = layers
            .layers()
            .flat_map(|l| l.entities.iter())
            .filter(|e| !e.is_at_base())
            .count();
        assert_eq!(highlighted, 1);
    }

    #[test]
    fn clicking_selected_entity_reconfirms() {
        let (mut scene, mut layers, ids) = setup(2);
        let config = NavigatorConfig::default();
        let mut selection = SelectionController::new();

        let point = scene.project(ids[0]).unwrap();
        let first = selection.click(&mut scene, &mut layers, point, &config);
        let picked = match first {
            ClickOutcome::Selected(id) => id,
            other => panic!("expected selection, got {other:?}"),
        };
        assert_eq!(
            selection.click(&mut scene, &mut layers, point, &config),
            ClickOutcome::Reselected(picked)
        );
        assert_eq!(selection.selected(), Some(picked));
    }

    #[test]
    fn click_on_nothing_clears() {
        let (mut scene, mut layers, ids) = setup(2);
        let config = NavigatorConfig::default();
        let mut selection = SelectionController::new();

        selection.select(&mut scene, &mut layers, ids[0], &config);
        let outcome = selection.click(&mut scene, &mut layers, ScreenPoint::new(5.0, 5.0), &config);
        assert_eq!(outcome, ClickOutcome::Cleared);
        assert!(selection.selected().is_none());
        assert!(layers.entity(ids[0]).unwrap().is_at_base());
    }

    #[test]
    fn invisible_entities_are_not_picked() {
        let (mut scene, mut layers, ids) = setup(1);
        let config = NavigatorConfig::default();
        let point = scene.project(ids[0]).unwrap();

        layers.with_scene(&mut scene).set_opacity(ids[0], 0.0);
        assert!(SelectionController::pick(&scene, &layers, point, &config).is_none());
    }

    #[test]
    fn clear_tolerates_disposed_entity() {
        let (mut scene, mut layers, ids) = setup(1);
        let config = NavigatorConfig::default();
        let mut selection = SelectionController::new();
        selection.select(&mut scene, &mut layers, ids[0], &config);

        layers.clear(&mut scene);
        selection.clear(&mut scene, &mut layers);
        assert!(selection.selected().is_none());
    }
}
