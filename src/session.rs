//! UI-facing session: one field at a time.
//!
//! Selecting a field tears down the current navigator (render loop, entities,
//! flows still in flight) and opens a fresh one on a new scene.

use std::sync::Arc;
use std::time::Duration;

use galaxy_core::{
    BackOutcome, ClickOutcome, DrillOutcome, LayerKey, LoadOutcome, NavStatus, Navigator,
    NavigatorConfig, PaperSource, Rejection, Scene, ScreenPoint,
};
use galaxy_types::Paper;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

type SceneFactory<S> = Box<dyn Fn() -> S + Send + Sync>;

pub struct GalaxySession<S: Scene + 'static> {
    source: Arc<dyn PaperSource>,
    config: NavigatorConfig,
    make_scene: SceneFactory<S>,
    frame_interval: Option<Duration>,
    field: Option<String>,
    navigator: Option<Navigator<S>>,
    render_loop: Option<JoinHandle<()>>,
}

impl<S: Scene + 'static> GalaxySession<S> {
    pub fn new(
        source: Arc<dyn PaperSource>,
        config: NavigatorConfig,
        make_scene: impl Fn() -> S + Send + Sync + 'static,
    ) -> Self {
        Self {
            source,
            config,
            make_scene: Box::new(make_scene),
            frame_interval: None,
            field: None,
            navigator: None,
            render_loop: None,
        }
    }

    /// Run a render loop for every navigator this session opens.
    pub fn with_render_loop(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = Some(frame_interval);
        self
    }

    /// Switch to `field`: tear down whatever is showing and load the new root.
    #[instrument(skip(self))]
    pub async fn select_field(&mut self, field: &str) -> LoadOutcome {
        self.close();

        let navigator = Navigator::new(
            (self.make_scene)(),
            Arc::clone(&self.source),
            self.config.clone(),
        );
        if let Some(interval) = self.frame_interval {
            self.render_loop = Some(navigator.spawn_render_loop(interval));
        }
        self.navigator = Some(navigator.clone());
        self.field = Some(field.trim().to_string());

        navigator.load_root(field).await
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn navigator(&self) -> Option<&Navigator<S>> {
        self.navigator.as_ref()
    }

    pub fn hover_at(&self, point: ScreenPoint) -> Option<Arc<Paper>> {
        self.navigator.as_ref()?.hover_at(point)
    }

    pub fn click_at(&self, point: ScreenPoint) -> Option<ClickOutcome> {
        self.navigator.as_ref().map(|n| n.click_at(point))
    }

    pub async fn request_drill_in(&self, paper_id: &str) -> DrillOutcome {
        match &self.navigator {
            Some(navigator) => navigator.drill_into(paper_id).await,
            None => DrillOutcome::Rejected(Rejection::NotLoaded),
        }
    }

    pub async fn request_back(&self) -> BackOutcome {
        match &self.navigator {
            Some(navigator) => navigator.back().await,
            None => BackOutcome::Rejected(Rejection::NotLoaded),
        }
    }

    pub fn status(&self) -> Option<NavStatus> {
        self.navigator.as_ref().map(Navigator::status)
    }

    pub fn breadcrumbs(&self) -> Vec<LayerKey> {
        self.navigator
            .as_ref()
            .map(Navigator::breadcrumbs)
            .unwrap_or_default()
    }

    /// Tear down the current navigator, if any. Returns entities disposed.
    pub fn close(&mut self) -> usize {
        if let Some(handle) = self.render_loop.take() {
            handle.abort();
        }
        let Some(navigator) = self.navigator.take() else {
            return 0;
        };
        let disposed = navigator.teardown();
        info!(field = ?self.field.take(), disposed, "field closed");
        disposed
    }
}

impl<S: Scene + 'static> Drop for GalaxySession<S> {
    fn drop(&mut self) {
        self.close();
    }
}
