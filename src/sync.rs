//! Push/pull synchronization with the lighting backend during a drag.
//!
//! SESSION MODEL
//! =============
//! Every drag gesture opens a numbered session. The recurring timer owned by
//! the host fires [`run_cycle`] for that session; each cycle pushes the current
//! config and, only after the push completes, pulls the recomputed scene.
//!
//! Cycles check liveness at every suspension point. Once the session is
//! stopped no new request is issued for it, and a response that lands late is
//! dropped instead of overwriting newer state. A tick that fires while the
//! same session's previous cycle is still in flight is skipped.
//!
//! ERROR HANDLING
//! ==============
//! Push and pull failures end the current cycle only. The engine records the
//! message for the overlay and the next tick tries again.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::cell::RefCell;
use std::fmt;

use futures::future::LocalBoxFuture;

use crate::engine::{Action, EngineCore};
use crate::error::ApiError;
use crate::scene::{ConfigPayload, Scene};

/// Identifier of one drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The remote side of the protocol.
///
/// Futures are `!Send`: everything runs on the browser's single event loop.
pub trait SceneBackend {
    /// `GET scene`.
    fn fetch_scene(&self) -> LocalBoxFuture<'_, Result<Scene, ApiError>>;

    /// `POST config`.
    fn push_config(&self, payload: ConfigPayload) -> LocalBoxFuture<'_, Result<(), ApiError>>;
}

/// Whether a tick may start a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPermit {
    Proceed,
    /// The session's previous cycle has not finished.
    InFlight,
    /// The session has been stopped.
    Stale,
}

/// Session bookkeeping: which session is live and which has a cycle in flight.
#[derive(Debug, Default)]
pub struct SyncScheduler {
    last_id: u64,
    active: Option<SessionId>,
    in_flight: Option<SessionId>,
}

impl SyncScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session, superseding any active one.
    pub fn start(&mut self) -> SessionId {
        self.last_id += 1;
        let session = SessionId(self.last_id);
        self.active = Some(session);
        session
    }

    /// Close `session`. Returns `false` if it was not the live session.
    pub fn stop(&mut self, session: SessionId) -> bool {
        if self.active == Some(session) {
            self.active = None;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<SessionId> {
        self.active
    }

    #[must_use]
    pub fn is_live(&self, session: SessionId) -> bool {
        self.active == Some(session)
    }

    /// Claim the in-flight slot for `session` if it is live and idle.
    pub fn try_begin(&mut self, session: SessionId) -> TickPermit {
        if !self.is_live(session) {
            return TickPermit::Stale;
        }
        if self.in_flight == Some(session) {
            return TickPermit::InFlight;
        }
        self.in_flight = Some(session);
        TickPermit::Proceed
    }

    /// Release the in-flight slot held by `session`.
    pub fn finish(&mut self, session: SessionId) {
        if self.in_flight == Some(session) {
            self.in_flight = None;
        }
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<SessionId> {
        self.in_flight
    }
}

/// First half of a cycle as decided by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleStep {
    /// Push this payload.
    Push(ConfigPayload),
    /// Nothing to do; the cycle is over.
    Done(CycleOutcome),
}

/// How a sync cycle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The pulled scene replaced the store.
    Applied,
    /// Skipped because the previous cycle is still in flight.
    Skipped,
    /// The session ended before the cycle could finish; nothing was applied.
    Stale,
    /// Push or pull failed; the message is on the overlay.
    Failed(ApiError),
}

/// Run one push-then-pull cycle for `session`.
///
/// No borrow of `engine` is held across an await, so pointer handlers may run
/// while the requests are pending.
pub async fn run_cycle<B>(engine: &RefCell<EngineCore>, backend: &B, session: SessionId) -> CycleOutcome
where
    B: SceneBackend + ?Sized,
{
    let payload = match engine.borrow_mut().begin_cycle(session) {
        CycleStep::Push(payload) => payload,
        CycleStep::Done(outcome) => return outcome,
    };

    let pushed = backend.push_config(payload).await;
    if let Some(outcome) = engine.borrow_mut().after_push(session, pushed) {
        return outcome;
    }

    let pulled = backend.fetch_scene().await;
    engine.borrow_mut().after_pull(session, pulled)
}

/// Fetch the initial scene and hand it to the engine.
///
/// Returns the host actions the load produced (canvas creation on success).
pub async fn load_initial<B>(engine: &RefCell<EngineCore>, backend: &B) -> Vec<Action>
where
    B: SceneBackend + ?Sized,
{
    let fetched = backend.fetch_scene().await;
    engine.borrow_mut().load(fetched)
}
