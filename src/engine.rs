use crate::config::ViewerConfig;
use crate::error::ApiError;
use crate::hit::{self, IconSize};
use crate::input::{Button, InputState};
use crate::scene::{Scene, SceneStore};
use crate::sync::{CycleOutcome, CycleStep, SessionId, SyncScheduler, TickPermit};
use crate::transform::{Point, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine handlers for the host to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// First scene loaded: create the canvas at this size.
    CreateCanvas { width: f64, height: f64 },
    /// A drag began: start the recurring sync timer for `session`.
    StartSync { session: SessionId, interval_ms: u32 },
    /// The drag ended: cancel the timer for `session`.
    StopSync { session: SessionId },
}

/// Viewer state shared by the render loop, pointer handlers, and sync timer.
///
/// Holds no browser handles so it can be driven directly from tests.
#[derive(Debug)]
pub struct EngineCore {
    pub store: SceneStore,
    pub input: InputState,
    pub sync: SyncScheduler,
    viewport: Option<Viewport>,
    icon: IconSize,
    sync_interval_ms: u32,
    load_error: Option<String>,
    sync_error: Option<String>,
    shut_down: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            store: SceneStore::new(),
            input: InputState::default(),
            sync: SyncScheduler::new(),
            viewport: None,
            icon: config.icon_size(),
            sync_interval_ms: config.sync_interval_ms,
            load_error: None,
            sync_error: None,
            shut_down: false,
        }
    }

    // --- Data inputs ---

    /// Apply the result of the initial scene fetch.
    ///
    /// The first success fixes the viewport and asks the host for a canvas.
    /// After [`shut_down`](Self::shut_down) the result is dropped.
    pub fn load(&mut self, fetched: Result<Scene, ApiError>) -> Vec<Action> {
        if self.shut_down {
            log::debug!("scene load finished after shutdown; ignoring");
            return Vec::new();
        }
        match fetched {
            Ok(scene) => {
                let mut actions = Vec::new();
                if self.viewport.is_none() {
                    self.viewport = Some(Viewport::new(scene.width, scene.height));
                    actions.push(Action::CreateCanvas { width: scene.width, height: scene.height });
                }
                log::info!(
                    "scene loaded: {}x{}, {} polygons, lit area {}%",
                    scene.width,
                    scene.height,
                    scene.polygons.len(),
                    scene.lit_area
                );
                self.load_error = None;
                self.apply_scene(scene);
                actions
            }
            Err(err) => {
                log::error!("scene load failed: {err}");
                self.load_error = Some(err.to_string());
                Vec::new()
            }
        }
    }

    /// Adopt the icon's real size once its image has loaded.
    pub fn set_icon_size(&mut self, icon: IconSize) {
        if icon.width > 0.0 && icon.height > 0.0 {
            self.icon = icon;
        }
    }

    #[allow(clippy::float_cmp)]
    fn apply_scene(&mut self, scene: Scene) {
        if let Some(viewport) = self.viewport {
            if scene.width != viewport.width || scene.height != viewport.height {
                log::warn!(
                    "scene size changed to {}x{}; keeping viewport {}x{}",
                    scene.width,
                    scene.height,
                    viewport.width,
                    viewport.height
                );
            }
        }
        self.store.replace(scene);

        // Keep the icon under the pointer while a drag outlives the pulled light.
        if let InputState::DraggingLight { last_screen, .. } = self.input {
            self.move_light_to(last_screen);
        }
    }

    fn move_light_to(&mut self, screen_pt: Point) {
        if let Some(viewport) = self.viewport {
            self.store.set_light_position(viewport.to_sim(screen_pt));
        }
    }

    // --- Input events ---

    /// Pointer pressed. Starts a drag session when the press lands on the light.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if self.shut_down || button != Button::Primary || self.input.is_dragging() {
            return Vec::new();
        }
        let (Some(scene), Some(viewport)) = (self.store.scene(), self.viewport) else {
            return Vec::new();
        };
        if !hit::hits_light(screen_pt, scene.light, &viewport, self.icon) {
            return Vec::new();
        }

        let session = self.sync.start();
        self.input = InputState::DraggingLight { session, last_screen: screen_pt };
        log::debug!("drag {session} started at ({}, {})", screen_pt.x, screen_pt.y);
        vec![Action::StartSync { session, interval_ms: self.sync_interval_ms }]
    }

    /// Pointer moved. While dragging, the light follows the pointer.
    pub fn on_pointer_move(&mut self, screen_pt: Point) {
        let InputState::DraggingLight { session, .. } = self.input else {
            return;
        };
        self.input = InputState::DraggingLight { session, last_screen: screen_pt };
        self.move_light_to(screen_pt);
    }

    /// Pointer released, on any button. Ends the drag and its sync session.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.end_drag()
    }

    /// End any active drag without a pointer release (window blur).
    pub fn end_drag(&mut self) -> Vec<Action> {
        let Some(session) = self.input.session() else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        self.sync.stop(session);
        log::debug!("drag {session} ended");
        vec![Action::StopSync { session }]
    }

    /// Tear down: end any drag and refuse further loads and grabs.
    pub fn shut_down(&mut self) -> Vec<Action> {
        self.shut_down = true;
        self.end_drag()
    }

    // --- Sync cycle ---

    /// Start a cycle: claim the in-flight slot and snapshot the config payload.
    pub fn begin_cycle(&mut self, session: SessionId) -> CycleStep {
        match self.sync.try_begin(session) {
            TickPermit::Stale => return CycleStep::Done(CycleOutcome::Stale),
            TickPermit::InFlight => {
                log::debug!("sync {session}: previous cycle still in flight, skipping tick");
                return CycleStep::Done(CycleOutcome::Skipped);
            }
            TickPermit::Proceed => {}
        }
        match self.store.scene() {
            Some(scene) => CycleStep::Push(scene.config_payload()),
            None => {
                self.sync.finish(session);
                CycleStep::Done(CycleOutcome::Stale)
            }
        }
    }

    /// Handle push completion. `None` means go on and pull.
    pub fn after_push(&mut self, session: SessionId, pushed: Result<(), ApiError>) -> Option<CycleOutcome> {
        if !self.sync.is_live(session) {
            self.sync.finish(session);
            log::debug!("sync {session}: ended during push, not pulling");
            return Some(CycleOutcome::Stale);
        }
        match pushed {
            Ok(()) => None,
            Err(err) => {
                self.sync.finish(session);
                Some(self.record_sync_failure(session, err))
            }
        }
    }

    /// Handle pull completion: replace the store unless the session has ended.
    pub fn after_pull(&mut self, session: SessionId, pulled: Result<Scene, ApiError>) -> CycleOutcome {
        self.sync.finish(session);
        if !self.sync.is_live(session) {
            log::debug!("sync {session}: discarding response that arrived after release");
            return CycleOutcome::Stale;
        }
        match pulled {
            Ok(scene) => {
                self.sync_error = None;
                self.apply_scene(scene);
                CycleOutcome::Applied
            }
            Err(err) => self.record_sync_failure(session, err),
        }
    }

    fn record_sync_failure(&mut self, session: SessionId, err: ApiError) -> CycleOutcome {
        log::warn!("sync {session}: {err}");
        self.sync_error = Some(err.to_string());
        CycleOutcome::Failed(err)
    }

    // --- Queries ---

    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.store.scene()
    }

    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    #[must_use]
    pub fn icon_size(&self) -> IconSize {
        self.icon
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.input.is_dragging()
    }

    /// Error text to draw instead of the lit-area label, if any.
    #[must_use]
    pub fn overlay_error(&self) -> Option<&str> {
        self.sync_error.as_deref().or(self.load_error.as_deref())
    }
}
