//! Drill/back orchestrator.
//!
//! [`Navigator`] is a cheap, cloneable handle over the shared galaxy state.
//! The UI calls it directly; the render loop ticks it; drill-in, back and
//! root loading run as async flows that interleave timed waits with fetches.
//!
//! # Rules
//! - One flow at a time. A request that arrives while another flow holds the
//!   navigator is rejected, never queued
//! - The flow slot is released by [`FlowGuard`]'s `Drop`, so every exit path
//!   (including a dropped future) frees it
//! - The state lock is never held across an `.await`
//! - After every `.await` a flow re-takes the lock and checks the
//!   cancellation token under it before touching shared state

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use galaxy_types::{Breadth, Paper, PaperSet};
use parking_lot::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::animation::AnimationScheduler;
use crate::cancel::CancellationToken;
use crate::clock::{Clock, TokioClock};
use crate::config::NavigatorConfig;
use crate::fault::{NavError, Rejection};
use crate::history::{NavigationHistory, NavigationSnapshot};
use crate::layer::{LayerKey, LayerOptions, LayerStore};
use crate::scene::{CameraState, Scene, ScreenPoint};
use crate::selection::{ClickOutcome, SelectionController};
use crate::source::{FetchError, PaperSource};
use crate::status::{BackOutcome, DrillOutcome, FlowState, LoadOutcome, NavStatus};

// =============================================================================
// SHARED STATE
// =============================================================================

/// Everything a navigator mutates, behind one lock.
pub struct GalaxyState<S: Scene> {
    scene: S,
    layers: LayerStore,
    history: NavigationHistory,
    selection: SelectionController,
    animations: AnimationScheduler,
    /// Camera as last applied to the scene
    camera: CameraState,
    flow: FlowState,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    tooltip: Option<Arc<Paper>>,
    /// Papers known to have no references
    empty_references: HashSet<String>,
}

impl<S: Scene> GalaxyState<S> {
    fn new(mut scene: S, config: &NavigatorConfig) -> Self {
        // Start well outside the root layer so loading it zooms in
        let camera = CameraState::new(config.camera_layer_offset * 2.0, 0.0);
        scene.set_camera(camera);
        Self {
            scene,
            layers: LayerStore::new(config.layout()),
            history: NavigationHistory::new(),
            selection: SelectionController::new(),
            animations: AnimationScheduler::new(),
            camera,
            flow: FlowState::Idle,
            loading: false,
            error: None,
            notice: None,
            tooltip: None,
            empty_references: HashSet::new(),
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn animations(&self) -> &AnimationScheduler {
        &self.animations
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn flow(&self) -> FlowState {
        self.flow
    }

    fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    fn set_notice(&mut self, message: String) {
        self.notice = Some(message);
    }

    fn clear_selection(&mut self) {
        self.selection.clear(&mut self.scene, &mut self.layers);
        self.tooltip = None;
    }

    /// Apply every live transition at `now_ms` and push the camera to the scene.
    fn tick(&mut self, now_ms: f64) -> bool {
        let mut targets = self.layers.with_scene(&mut self.scene);
        let animating = self.animations.tick(now_ms, &mut self.camera, &mut targets);
        self.scene.set_camera(self.camera);
        animating
    }
}

/// Holds the flow slot; releases it on drop.
struct FlowGuard<S: Scene> {
    state: Arc<Mutex<GalaxyState<S>>>,
}

impl<S: Scene> FlowGuard<S> {
    /// Claim the slot. The caller holds the lock and has checked it is idle.
    fn begin(
        shared: &Arc<Mutex<GalaxyState<S>>>,
        state: &mut GalaxyState<S>,
        flow: FlowState,
    ) -> Self {
        debug_assert!(state.flow.is_idle());
        state.flow = flow;
        state.loading = true;
        state.error = None;
        state.notice = None;
        Self {
            state: Arc::clone(shared),
        }
    }
}

impl<S: Scene> Drop for FlowGuard<S> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.flow = FlowState::Idle;
        state.loading = false;
    }
}

fn no_references_notice(paper: &Paper) -> String {
    format!("No references found for {}", paper.label())
}

fn no_papers_notice(field: &str) -> String {
    format!("No papers found for {field}")
}

fn broadened_notice(field: &str) -> String {
    format!("Few papers matched {field}; showing a broadened selection")
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Cloneable handle onto one galaxy.
pub struct Navigator<S: Scene> {
    state: Arc<Mutex<GalaxyState<S>>>,
    source: Arc<dyn PaperSource>,
    clock: Arc<dyn Clock>,
    config: Arc<NavigatorConfig>,
    cancel: CancellationToken,
}

impl<S: Scene> Clone for Navigator<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            source: Arc::clone(&self.source),
            clock: Arc::clone(&self.clock),
            config: Arc::clone(&self.config),
            cancel: self.cancel.clone(),
        }
    }
}

impl<S: Scene> Navigator<S> {
    /// Create a navigator over `scene`. Must be called inside a tokio runtime.
    pub fn new(scene: S, source: Arc<dyn PaperSource>, config: NavigatorConfig) -> Self {
        Self::with_clock(scene, source, config, Arc::new(TokioClock::new()))
    }

    pub fn with_clock(
        scene: S,
        source: Arc<dyn PaperSource>,
        config: NavigatorConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(GalaxyState::new(scene, &config))),
            source,
            clock,
            config: Arc::new(config),
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    fn now(&self) -> f64 {
        self.clock.now_ms()
    }

    fn ms(value: u64) -> f64 {
        value as f64
    }

    /// Lock the state for a flow resuming after an await. `None` once torn down.
    fn resume(&self) -> Option<MutexGuard<'_, GalaxyState<S>>> {
        let guard = self.state.lock();
        // Checked under the lock: teardown cancels before it locks
        (!self.cancel.is_cancelled()).then_some(guard)
    }

    // =========================================================================
    // ROOT
    // =========================================================================

    /// Fetch a field's root papers and show them as layer 0.
    ///
    /// When the strict query under-returns, the broadened fallback is
    /// requested once and a notice says so.
    #[instrument(skip(self))]
    pub async fn load_root(&self, field: &str) -> LoadOutcome {
        let field = field.trim();
        if field.is_empty() {
            let err = NavError::InvalidField(field.to_string());
            self.state.lock().set_error(err.to_string());
            return LoadOutcome::Failed(err);
        }

        let _flow = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if self.cancel.is_cancelled() {
                return LoadOutcome::Rejected(Rejection::TornDown);
            }
            if !state.flow.is_idle() {
                warn!(flow = ?state.flow, "load rejected: busy");
                return LoadOutcome::Rejected(Rejection::Busy);
            }
            if !state.layers.is_empty() {
                return LoadOutcome::Rejected(Rejection::AlreadyLoaded);
            }
            FlowGuard::begin(&self.state, state, FlowState::LoadingRoot)
        };

        let fetched = self.fetch_root(field).await;

        let Some(mut guard) = self.resume() else {
            debug!("navigator torn down during load");
            return LoadOutcome::Rejected(Rejection::TornDown);
        };
        let state = &mut *guard;
        let (set, broadened) = match fetched {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "root load failed");
                state.set_error(err.to_string());
                return LoadOutcome::Failed(NavError::Transport(err));
            }
        };
        if set.is_empty() {
            state.set_notice(no_papers_notice(field));
            return LoadOutcome::Empty;
        }

        let count = set.len();
        let ids = match state.layers.create_layer(
            &mut state.scene,
            set.papers,
            0.0,
            LayerOptions::new(LayerKey::root(field), 0.0),
        ) {
            Ok(layer) => layer.entity_ids(),
            Err(err) => {
                state.set_error(err.to_string());
                return LoadOutcome::Failed(err);
            }
        };

        let now = self.now();
        let targets = state.layers.with_scene(&mut state.scene);
        state
            .animations
            .start_fade(now, &ids, 1.0, Self::ms(self.config.fade_ms), &targets);
        state.animations.start_camera(
            now,
            state.camera,
            self.config.camera_for_depth(0.0),
            Self::ms(self.config.transition_ms),
        );
        if broadened {
            state.set_notice(broadened_notice(field));
        }

        info!(papers = count, broadened, "root layer loaded");
        LoadOutcome::Loaded {
            papers: count,
            broadened,
        }
    }

    async fn fetch_root(&self, field: &str) -> Result<(PaperSet, bool), FetchError> {
        let strict = self.source.field_papers(field, Breadth::Strict).await?;
        if strict.len() >= self.config.min_root_papers && !strict.signals_too_few() {
            return Ok((strict, false));
        }

        debug!(
            papers = strict.len(),
            min = self.config.min_root_papers,
            "root set under-returned, requesting broadened fallback"
        );
        match self.source.field_papers(field, Breadth::Broad).await {
            Ok(broad) if broad.len() > strict.len() => Ok((broad, true)),
            Ok(_) => Ok((strict, false)),
            Err(err) if !strict.is_empty() => {
                warn!(error = %err, "broadened fallback failed, keeping strict set");
                Ok((strict, false))
            }
            Err(err) => Err(err),
        }
    }

    // =========================================================================
    // DRILL-IN
    // =========================================================================

    /// Select the entity carrying `paper_id` and drill into it.
    pub async fn drill_into(&self, paper_id: &str) -> DrillOutcome {
        if paper_id.trim().is_empty() {
            let err = NavError::InvalidPaperId(paper_id.to_string());
            self.state.lock().set_error(err.to_string());
            return DrillOutcome::Failed(err);
        }
        {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if !state.flow.is_idle() {
                return DrillOutcome::Rejected(Rejection::Busy);
            }
            let Some(id) = state.layers.find_paper(paper_id).map(|e| e.id) else {
                return DrillOutcome::Rejected(Rejection::NoSelection);
            };
            state
                .selection
                .select(&mut state.scene, &mut state.layers, id, &self.config);
        }
        self.drill_in().await
    }

    /// Drill into the selected paper's references.
    #[instrument(skip(self), fields(paper_id))]
    pub async fn drill_in(&self) -> DrillOutcome {
        let (_flow, paper, pending) = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if self.cancel.is_cancelled() {
                return DrillOutcome::Rejected(Rejection::TornDown);
            }
            if !state.flow.is_idle() {
                warn!(flow = ?state.flow, "drill-in rejected: busy");
                return DrillOutcome::Rejected(Rejection::Busy);
            }
            let Some(paper) = state.selection.selected_paper(&state.layers) else {
                return DrillOutcome::Rejected(Rejection::NoSelection);
            };
            tracing::Span::current().record("paper_id", paper.id.as_str());

            if paper.id.trim().is_empty() {
                let err = NavError::InvalidPaperId(paper.id.clone());
                state.set_error(err.to_string());
                return DrillOutcome::Failed(err);
            }
            if state.empty_references.contains(&paper.id) {
                debug!("no references (cached)");
                state.error = None;
                state.set_notice(no_references_notice(&paper));
                return DrillOutcome::NoReferences {
                    paper_id: paper.id.clone(),
                    cached: true,
                };
            }
            let Some(active) = state.layers.active_layer() else {
                return DrillOutcome::Rejected(Rejection::NoSelection);
            };

            let now = self.now();
            let camera = state.animations.camera_at(now, state.camera);
            let pending = NavigationSnapshot::new(active.key.clone(), active.depth, camera)
                .with_star_positions(active.generated_positions.clone());

            state.animations.start_camera(
                now,
                state.camera,
                camera.offset(-self.config.pre_zoom_distance),
                Self::ms(self.config.pre_zoom_ms),
            );
            let flow = FlowGuard::begin(&self.state, state, FlowState::DrillingIn);
            (flow, paper, pending)
        };

        let pre_zoom = tokio::time::sleep(Duration::from_millis(self.config.pre_zoom_ms));
        let (_, fetched) = tokio::join!(pre_zoom, self.fetch_references(&paper.id));

        let Some(mut guard) = self.resume() else {
            debug!("navigator torn down during drill-in");
            return DrillOutcome::Rejected(Rejection::TornDown);
        };
        let state = &mut *guard;
        let now = self.now();
        let revert_ms = Self::ms(self.config.pre_zoom_ms);

        let set = match fetched {
            Ok(set) => set,
            Err(err) => {
                warn!(error = %err, "reference fetch failed");
                state
                    .animations
                    .start_camera(now, state.camera, pending.camera(), revert_ms);
                state.set_error(err.to_string());
                return DrillOutcome::Failed(NavError::Transport(err));
            }
        };
        if set.is_empty() {
            info!("paper has no references");
            state
                .animations
                .start_camera(now, state.camera, pending.camera(), revert_ms);
            state.empty_references.insert(paper.id.clone());
            state.set_notice(no_references_notice(&paper));
            return DrillOutcome::NoReferences {
                paper_id: paper.id.clone(),
                cached: false,
            };
        }

        let next_depth = state.layers.current_depth() - self.config.depth_step;
        let outgoing = state
            .layers
            .active_layer()
            .map(|l| l.entity_ids())
            .unwrap_or_default();
        let references = set.len();
        let incoming = match state.layers.create_layer(
            &mut state.scene,
            set.papers,
            next_depth,
            LayerOptions::new(LayerKey::references(&paper.id), 0.0),
        ) {
            Ok(layer) => layer.entity_ids(),
            Err(err) => {
                state
                    .animations
                    .start_camera(now, state.camera, pending.camera(), revert_ms);
                state.set_error(err.to_string());
                return DrillOutcome::Failed(err);
            }
        };
        state.history.push(pending);

        let fade_ms = Self::ms(self.config.fade_ms);
        let targets = state.layers.with_scene(&mut state.scene);
        state.animations.start_fade(
            now,
            &outgoing,
            self.config.dimmed_opacity,
            fade_ms,
            &targets,
        );
        state
            .animations
            .start_fade(now, &incoming, 1.0, fade_ms, &targets);

        state.clear_selection();
        state.animations.start_camera(
            now,
            state.camera,
            self.config.camera_for_depth(next_depth),
            Self::ms(self.config.transition_ms),
        );

        info!(
            depth = next_depth,
            references,
            stack = state.history.size(),
            "drilled in"
        );
        DrillOutcome::Entered {
            paper_id: paper.id.clone(),
            depth: next_depth,
            references,
        }
    }

    /// References with one broadened retry on the "too few results" signal.
    async fn fetch_references(&self, paper_id: &str) -> Result<PaperSet, FetchError> {
        let set = self.source.references(paper_id, Breadth::Strict).await?;
        if set.signals_too_few() {
            debug!("references under-returned, retrying broadened");
            return self.source.references(paper_id, Breadth::Broad).await;
        }
        Ok(set)
    }

    // =========================================================================
    // BACK
    // =========================================================================

    /// Return to the previous layer.
    #[instrument(skip(self))]
    pub async fn back(&self) -> BackOutcome {
        let (_flow, top_key) = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if self.cancel.is_cancelled() {
                return BackOutcome::Rejected(Rejection::TornDown);
            }
            if !state.flow.is_idle() {
                warn!(flow = ?state.flow, "back rejected: busy");
                return BackOutcome::Rejected(Rejection::Busy);
            }
            if state.history.is_empty() {
                return BackOutcome::Rejected(Rejection::NoHistory);
            }
            let (Some(top), Some(beneath)) =
                (state.layers.active_layer(), state.layers.previous_layer())
            else {
                return BackOutcome::Rejected(Rejection::RootOnly);
            };
            let top_key = top.key.clone();
            let top_ids = top.entity_ids();
            let beneath_ids = beneath.entity_ids();

            let now = self.now();
            let camera = state.animations.camera_at(now, state.camera);
            state.animations.start_camera(
                now,
                state.camera,
                camera.offset(self.config.pre_zoom_distance),
                Self::ms(self.config.pre_zoom_ms),
            );
            let targets = state.layers.with_scene(&mut state.scene);
            state.animations.start_fade(
                now,
                &top_ids,
                0.0,
                Self::ms(self.config.back_wait_ms),
                &targets,
            );
            state.animations.start_fade(
                now,
                &beneath_ids,
                1.0,
                Self::ms(self.config.fade_ms),
                &targets,
            );
            let flow = FlowGuard::begin(&self.state, state, FlowState::DrillingBack);
            (flow, top_key)
        };

        tokio::time::sleep(Duration::from_millis(self.config.back_wait_ms)).await;

        let Some(mut guard) = self.resume() else {
            debug!("navigator torn down during back");
            return BackOutcome::Rejected(Rejection::TornDown);
        };
        let state = &mut *guard;
        let Some((depth, restore)) = state.history.peek().map(|p| (p.depth, p.camera())) else {
            let err = NavError::LayerNotFound(top_key);
            state.set_error(err.to_string());
            return BackOutcome::Failed(err);
        };
        let removed = match state.layers.remove_layer(&mut state.scene, &top_key) {
            Ok(ids) => ids,
            Err(err) => {
                warn!(error = %err, "back failed");
                state.set_error(err.to_string());
                return BackOutcome::Failed(err);
            }
        };
        state.animations.forget(&removed);
        state.history.pop();
        state.clear_selection();

        let now = self.now();
        state.animations.start_camera(
            now,
            state.camera,
            restore,
            Self::ms(self.config.transition_ms),
        );

        info!(
            depth,
            disposed = removed.len(),
            stack = state.history.size(),
            "returned"
        );
        BackOutcome::Returned { depth }
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Update the tooltip from the pointer position.
    pub fn hover_at(&self, point: ScreenPoint) -> Option<Arc<Paper>> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let paper = state
            .selection
            .hover(&state.scene, &state.layers, point, &self.config);
        state.tooltip = paper.clone();
        paper
    }

    pub fn click_at(&self, point: ScreenPoint) -> ClickOutcome {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state
            .selection
            .click(&mut state.scene, &mut state.layers, point, &self.config)
    }

    /// Select the entity carrying `paper_id`. False if no such entity is loaded.
    pub fn select_paper(&self, paper_id: &str) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Some(id) = state.layers.find_paper(paper_id).map(|e| e.id) else {
            return false;
        };
        state
            .selection
            .select(&mut state.scene, &mut state.layers, id, &self.config);
        true
    }

    pub fn clear_selection(&self) {
        self.state.lock().clear_selection();
    }

    // =========================================================================
    // RENDER LOOP
    // =========================================================================

    /// Advance every transition to the current clock reading.
    ///
    /// Returns true while anything is still animating.
    pub fn tick_now(&self) -> bool {
        let now = self.now();
        self.state.lock().tick(now)
    }

    /// Tick once per `frame_interval` until teardown. Late frames are
    /// skipped rather than bunched; values depend only on the clock.
    pub fn spawn_render_loop(&self, frame_interval: Duration) -> JoinHandle<()>
    where
        S: 'static,
    {
        let navigator = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(frame_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if navigator.cancel.is_cancelled() {
                    debug!("render loop stopped");
                    break;
                }
                navigator.tick_now();
            }
        })
    }

    // =========================================================================
    // TEARDOWN
    // =========================================================================

    /// Stop everything and dispose every entity. Flows still in flight
    /// resolve as [`Rejection::TornDown`] without touching state.
    ///
    /// Returns the number of entities disposed.
    pub fn teardown(&self) -> usize {
        self.cancel.cancel();
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let disposed = state.layers.clear(&mut state.scene);
        state.history.clear();
        state.selection.reset();
        state.animations.clear();
        state.tooltip = None;
        state.empty_references.clear();
        state.scene.release();
        info!(disposed, "navigator torn down");
        disposed
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // =========================================================================
    // READ
    // =========================================================================

    pub fn status(&self) -> NavStatus {
        let state = self.state.lock();
        let selected_paper = state.selection.selected_paper(&state.layers);
        let drill_available = state.flow.is_idle()
            && !self.cancel.is_cancelled()
            && selected_paper
                .as_ref()
                .is_some_and(|p| !state.empty_references.contains(&p.id));
        NavStatus {
            flow: state.flow,
            loading: state.loading,
            error: state.error.clone(),
            notice: state.notice.clone(),
            current_depth: state.layers.current_depth(),
            navigation_stack_size: state.history.size(),
            layer_count: state.layers.len(),
            selected_paper,
            tooltip: state.tooltip.clone(),
            drill_available,
        }
    }

    /// Layer keys of the navigation history, root first.
    pub fn breadcrumbs(&self) -> Vec<LayerKey> {
        self.state.lock().history.breadcrumbs()
    }

    /// Whether `paper_id` is known to have no references.
    pub fn has_no_references(&self, paper_id: &str) -> bool {
        self.state.lock().empty_references.contains(paper_id)
    }

    /// Read the shared state under the lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&GalaxyState<S>) -> R) -> R {
        f(&*self.state.lock())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::scene::HeadlessScene;
    use crate::source::MemorySource;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Drill,
        Back,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![Just(Step::Drill), Just(Step::Back)]
    }

    /// Every paper `P{n}` references `P{n}-a` and `P{n}-b`.
    fn chain_source(depth: usize) -> MemorySource {
        let source = MemorySource::new();
        source.insert_field(
            "chain",
            Breadth::Strict,
            PaperSet::new(vec![Paper::new("P0", "Root")]),
        );
        for level in 0..depth {
            source.insert_references(
                &format!("P{level}"),
                PaperSet::new(vec![
                    Paper::new(format!("P{}", level + 1), "Next"),
                    Paper::new(format!("X{}", level + 1), "Side"),
                ]),
            );
        }
        source
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn history_tracks_layers(steps in prop::collection::vec(step(), 1..16)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();

            runtime.block_on(async {
                let config = NavigatorConfig { min_root_papers: 1, ..Default::default() };
                let nav = Navigator::new(
                    HeadlessScene::new(),
                    Arc::new(chain_source(16)),
                    config,
                );
                nav.load_root("chain").await;
                let mut depth = 0usize;

                for step in steps {
                    match step {
                        Step::Drill => {
                            nav.select_paper(&format!("P{depth}"));
                            if matches!(nav.drill_in().await, DrillOutcome::Entered { .. }) {
                                depth += 1;
                            }
                        }
                        Step::Back => {
                            if matches!(nav.back().await, BackOutcome::Returned { .. }) {
                                depth -= 1;
                            }
                        }
                    }
                    tokio::time::sleep(Duration::from_millis(2000)).await;
                    nav.tick_now();

                    let status = nav.status();
                    prop_assert_eq!(status.navigation_stack_size, status.layer_count - 1);
                    prop_assert_eq!(status.navigation_stack_size, depth);
                    prop_assert_eq!(status.current_depth, -(depth as f32) * 400.0);
                    let entities = nav.with_state(|s| (s.scene().entity_count(), s.layers().entity_count()));
                    prop_assert_eq!(entities.0, entities.1);
                }
                Ok::<(), TestCaseError>(())
            })?;
        }
    }
}
