//! Layer store - the stack of galaxy layers, one per drill depth.
//!
//! The store owns every point entity end-to-end: entities are added to the
//! scene when their layer is created and removed (disposed) when the layer is
//! removed or the store is cleared. The active layer is the top of the stack.

use std::fmt;
use std::sync::Arc;

use galaxy_types::Paper;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::OpacityTarget;
use crate::fault::NavError;
use crate::layout::{generate_positions, star_appearance, LayoutParams, StarPosition};
use crate::scene::Scene;

// =============================================================================
// ENTITIES
// =============================================================================

/// Identifier of a point entity. Allocated monotonically by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Linear RGB color, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const STAR: Rgb = Rgb::new(0.85, 0.9, 1.0);
    pub const HIGHLIGHT: Rgb = Rgb::new(1.0, 0.75, 0.2);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Color and glow of a point entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub color: Rgb,
    pub emissive_color: Rgb,
    pub emissive_intensity: f32,
}

/// A renderable star carrying one paper.
#[derive(Debug, Clone)]
pub struct PointEntity {
    pub id: EntityId,
    /// Shared with the response it came from; the entity doesn't own its lifecycle
    pub paper: Arc<Paper>,
    pub position: StarPosition,
    /// Appearance at creation. Never mutated.
    pub base: Appearance,
    /// Appearance as currently rendered (selection changes this)
    pub current: Appearance,
    /// Opacity as currently rendered (the animation scheduler changes this)
    pub opacity: f32,
}

impl PointEntity {
    pub fn is_at_base(&self) -> bool {
        self.current == self.base
    }
}

// =============================================================================
// LAYERS
// =============================================================================

/// Stable key of a layer, e.g. `root:machine-learning` or `refs:W2741809807`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerKey(String);

impl LayerKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn root(field: &str) -> Self {
        Self(format!("root:{field}"))
    }

    pub fn references(paper_id: &str) -> Self {
        Self(format!("refs:{paper_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// All the stars of one drill depth.
#[derive(Debug, Clone)]
pub struct GalaxyLayer {
    pub key: LayerKey,
    /// `-k * depth_step` where k is the distance from the root
    pub depth: f32,
    /// Ids are contiguous and ascending
    pub entities: Vec<PointEntity>,
    pub generated_positions: Vec<StarPosition>,
}

impl GalaxyLayer {
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        let first = self.entities.first()?.id.0;
        let index = id.0.checked_sub(first)? as usize;
        (index < self.entities.len()).then_some(index)
    }
}

/// Options for [`LayerStore::create_layer`].
#[derive(Debug, Clone)]
pub struct LayerOptions {
    pub layer_key: LayerKey,
    pub initial_opacity: f32,
}

impl LayerOptions {
    pub fn new(layer_key: LayerKey, initial_opacity: f32) -> Self {
        Self {
            layer_key,
            initial_opacity,
        }
    }
}

// =============================================================================
// LAYER STORE
// =============================================================================

/// Ordered stack of galaxy layers. Index 0 is the root.
#[derive(Debug)]
pub struct LayerStore {
    layers: Vec<GalaxyLayer>,
    next_id: u64,
    layout: LayoutParams,
}

impl LayerStore {
    pub fn new(layout: LayoutParams) -> Self {
        Self {
            layers: Vec::new(),
            next_id: 1,
            layout,
        }
    }

    /// Build one entity per paper at `depth` and push the layer as the new top.
    ///
    /// Callers must not pass an empty paper list; that returns
    /// [`NavError::EmptyLayer`] and leaves the store untouched.
    pub fn create_layer(
        &mut self,
        scene: &mut dyn Scene,
        papers: Vec<Paper>,
        depth: f32,
        options: LayerOptions,
    ) -> Result<&GalaxyLayer, NavError> {
        if papers.is_empty() {
            return Err(NavError::EmptyLayer);
        }

        let generated_positions = generate_positions(&papers, depth, &self.layout);
        let entities: Vec<PointEntity> = papers
            .into_iter()
            .zip(generated_positions.iter())
            .map(|(paper, position)| {
                let appearance = star_appearance(&paper);
                let id = EntityId(self.next_id);
                self.next_id += 1;
                PointEntity {
                    id,
                    paper: Arc::new(paper),
                    position: *position,
                    base: appearance,
                    current: appearance,
                    opacity: options.initial_opacity,
                }
            })
            .collect();

        for entity in &entities {
            scene.add_entity(entity);
        }

        debug!(
            layer = %options.layer_key,
            depth,
            entities = entities.len(),
            "layer created"
        );

        let index = self.layers.len();
        self.layers.push(GalaxyLayer {
            key: options.layer_key,
            depth,
            entities,
            generated_positions,
        });
        Ok(&self.layers[index])
    }

    /// Remove a layer, disposing all its entities. Returns the removed ids.
    ///
    /// The sole remaining layer can't be removed this way.
    pub fn remove_layer(
        &mut self,
        scene: &mut dyn Scene,
        key: &LayerKey,
    ) -> Result<Vec<EntityId>, NavError> {
        let index = self
            .layers
            .iter()
            .rposition(|l| &l.key == key)
            .ok_or_else(|| NavError::LayerNotFound(key.clone()))?;
        if self.layers.len() <= 1 {
            return Err(NavError::RootLayerRemoval);
        }

        let layer = self.layers.remove(index);
        let ids = layer.entity_ids();
        for id in &ids {
            scene.remove_entity(*id);
        }
        debug!(layer = %layer.key, disposed = ids.len(), "layer removed");
        Ok(ids)
    }

    /// Dispose every entity of every layer (teardown / field change).
    pub fn clear(&mut self, scene: &mut dyn Scene) -> usize {
        let mut disposed = 0;
        for layer in self.layers.drain(..) {
            for entity in &layer.entities {
                scene.remove_entity(entity.id);
            }
            disposed += layer.entities.len();
        }
        disposed
    }

    pub fn active_layer(&self) -> Option<&GalaxyLayer> {
        self.layers.last()
    }

    /// Layer directly beneath the active one.
    pub fn previous_layer(&self) -> Option<&GalaxyLayer> {
        self.layers.iter().rev().nth(1)
    }

    /// Depth of the active layer, 0 when empty.
    pub fn current_depth(&self) -> f32 {
        self.active_layer().map(|l| l.depth).unwrap_or(0.0)
    }

    /// Number of layers on the stack.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> impl Iterator<Item = &GalaxyLayer> {
        self.layers.iter()
    }

    pub fn entity_count(&self) -> usize {
        self.layers.iter().map(|l| l.entities.len()).sum()
    }

    pub fn entity(&self, id: EntityId) -> Option<&PointEntity> {
        self.layers
            .iter()
            .find_map(|l| l.index_of(id).map(|i| &l.entities[i]))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut PointEntity> {
        self.layers
            .iter_mut()
            .find_map(|l| l.index_of(id).map(|i| &mut l.entities[i]))
    }

    /// Find the entity carrying `paper_id`, searching from the active layer down.
    pub fn find_paper(&self, paper_id: &str) -> Option<&PointEntity> {
        self.layers
            .iter()
            .rev()
            .find_map(|l| l.entities.iter().find(|e| e.paper.id == paper_id))
    }

    /// Pair the store with a scene so opacity writes reach both.
    pub fn with_scene<'a>(&'a mut self, scene: &'a mut dyn Scene) -> SceneLayers<'a> {
        SceneLayers {
            layers: self,
            scene,
        }
    }
}

/// Layer store + scene, for writers that must keep both in sync.
pub struct SceneLayers<'a> {
    layers: &'a mut LayerStore,
    scene: &'a mut dyn Scene,
}

impl OpacityTarget for SceneLayers<'_> {
    fn opacity(&self, id: EntityId) -> Option<f32> {
        self.layers.entity(id).map(|e| e.opacity)
    }

    fn set_opacity(&mut self, id: EntityId, opacity: f32) {
        if let Some(entity) = self.layers.entity_mut(id) {
            entity.opacity = opacity;
            self.scene.set_opacity(id, opacity);
        }
    }
}
