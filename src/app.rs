//! Browser bootstrap: wires DOM events, timers, and HTTP to [`EngineCore`].
//!
//! ARCHITECTURE
//! ============
//! [`Viewer`] owns one `Rc<Shared>` context holding the engine, the HTTP
//! backend, the canvas surface, and every browser handle (listeners, the
//! animation-frame callback, the sync timer). Callbacks capture a `Weak` to
//! it, so dropping the viewer releases everything: the sync [`Interval`] is
//! cancelled by its guard's drop, listeners detach themselves, and the pending
//! animation frame is cancelled.
//!
//! The engine decides; this module only carries out its [`Action`]s.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Interval;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, HtmlImageElement, MouseEvent, Node};

use crate::api::HttpBackend;
use crate::config::ViewerConfig;
use crate::engine::{Action, EngineCore};
use crate::hit::IconSize;
use crate::input::Button;
use crate::render::{self, CanvasSurface};
use crate::sync::{self, SessionId};
use crate::transform::Point;

/// Recurring sync timer for one drag session. Dropping it cancels the timer.
struct SyncTimer {
    session: SessionId,
    _interval: Interval,
}

/// A DOM listener that detaches itself on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("failed to detach {} listener: {err:?}", self.event);
        }
    }
}

struct Shared {
    engine: RefCell<EngineCore>,
    backend: HttpBackend,
    config: ViewerConfig,
    icon: Option<HtmlImageElement>,
    icon_onload: RefCell<Option<Closure<dyn FnMut()>>>,
    surface: RefCell<Option<CanvasSurface>>,
    timer: RefCell<Option<SyncTimer>>,
    listeners: RefCell<Vec<Listener>>,
    frame: RefCell<Option<Closure<dyn FnMut()>>>,
    frame_id: Cell<Option<i32>>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        cancel_frame(self);
    }
}

/// Handle returned to the host page.
#[wasm_bindgen]
pub struct Viewer {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl Viewer {
    /// Start the viewer: fetch the scene, then create the canvas and begin drawing.
    ///
    /// `config_json` may be empty for defaults.
    ///
    /// # Errors
    ///
    /// Returns a JS error string if the config is invalid.
    pub fn start(config_json: &str) -> Result<Viewer, JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("logger already installed");
        }

        let config = ViewerConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let icon = match config.icon_src.as_deref() {
            Some(src) => {
                let img = HtmlImageElement::new()?;
                img.set_src(src);
                Some(img)
            }
            None => None,
        };

        let shared = Rc::new(Shared {
            engine: RefCell::new(EngineCore::new(&config)),
            backend: HttpBackend::from_config(&config),
            config,
            icon,
            icon_onload: RefCell::new(None),
            surface: RefCell::new(None),
            timer: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            frame: RefCell::new(None),
            frame_id: Cell::new(None),
        });

        watch_icon_size(&shared);
        start_render_loop(&shared);

        let loading = Rc::clone(&shared);
        wasm_bindgen_futures::spawn_local(async move {
            let actions = sync::load_initial(&loading.engine, &loading.backend).await;
            handle_actions(&loading, actions);
        });

        Ok(Viewer { shared })
    }

    /// Stop drawing, end any drag, and detach all listeners.
    ///
    /// A scene load still in flight is dropped when it lands.
    pub fn stop(&self) {
        let shared = &self.shared;
        let actions = shared.engine.borrow_mut().shut_down();
        handle_actions(shared, actions);
        shared.timer.borrow_mut().take();
        shared.listeners.borrow_mut().clear();
        cancel_frame(shared);
    }

    /// Last known lit-area percentage, if a scene is loaded.
    #[wasm_bindgen(getter, js_name = litArea)]
    pub fn lit_area(&self) -> Option<f64> {
        self.shared.engine.borrow().scene().map(|s| s.lit_area)
    }

    #[wasm_bindgen(getter, js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.shared.engine.borrow().is_dragging()
    }
}

fn is_stopped(shared: &Shared) -> bool {
    shared.engine.borrow().is_shut_down()
}

fn handle_actions(shared: &Rc<Shared>, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::CreateCanvas { .. } if is_stopped(shared) => {
                log::debug!("viewer stopped; not creating canvas");
            }
            Action::CreateCanvas { width, height } => {
                if let Err(err) = mount_canvas(shared, width, height) {
                    log::error!("failed to create canvas: {err:?}");
                }
            }
            Action::StartSync { session, interval_ms } => start_sync_timer(shared, session, interval_ms),
            Action::StopSync { session } => stop_sync_timer(shared, session),
        }
    }
}

// =============================================================
// Sync timer
// =============================================================

fn start_sync_timer(shared: &Rc<Shared>, session: SessionId, interval_ms: u32) {
    if is_stopped(shared) {
        return;
    }
    let weak = Rc::downgrade(shared);
    let interval = Interval::new(interval_ms, move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = sync::run_cycle(&shared.engine, &shared.backend, session).await;
            log::trace!("sync {session}: {outcome:?}");
        });
    });
    log::info!("sync {session} started every {interval_ms}ms");
    *shared.timer.borrow_mut() = Some(SyncTimer { session, _interval: interval });
}

fn stop_sync_timer(shared: &Shared, session: SessionId) {
    let mut timer = shared.timer.borrow_mut();
    if timer.as_ref().is_some_and(|t| t.session == session) {
        timer.take();
        log::info!("sync {session} stopped");
    }
}

// =============================================================
// Canvas and input
// =============================================================

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn mount_canvas(shared: &Rc<Shared>, width: f64, height: f64) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("created element is not a canvas"))?;
    canvas.set_width(width.max(0.0).round() as u32);
    canvas.set_height(height.max(0.0).round() as u32);

    let container = shared
        .config
        .container_id
        .as_deref()
        .and_then(|id| document.get_element_by_id(id));
    let parent: Node = match container {
        Some(el) => el.into(),
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("no document body"))?
            .into(),
    };
    parent.append_child(&canvas)?;

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("unexpected context type"))?;
    *shared.surface.borrow_mut() = Some(CanvasSurface::new(ctx, shared.icon.clone()));

    install_listeners(shared, &canvas, window.as_ref())
}

fn install_listeners(shared: &Rc<Shared>, canvas: &HtmlCanvasElement, window: &EventTarget) -> Result<(), JsValue> {
    let mut listeners = Vec::with_capacity(4);

    let weak = Rc::downgrade(shared);
    let origin = canvas.clone();
    listeners.push(listen_mouse(canvas.as_ref(), "mousedown", move |ev| {
        with_shared(&weak, |shared| {
            let pt = pointer_point(&origin, &ev);
            let actions = shared.engine.borrow_mut().on_pointer_down(pt, Button::from_dom(ev.button()));
            handle_actions(shared, actions);
        });
    })?);

    // Move and release are tracked on the window so a drag survives leaving the canvas.
    let weak = Rc::downgrade(shared);
    let origin = canvas.clone();
    listeners.push(listen_mouse(window, "mousemove", move |ev| {
        with_shared(&weak, |shared| {
            shared.engine.borrow_mut().on_pointer_move(pointer_point(&origin, &ev));
        });
    })?);

    let weak = Rc::downgrade(shared);
    listeners.push(listen(window, "mouseup", move |_ev| {
        with_shared(&weak, |shared| {
            let actions = shared.engine.borrow_mut().on_pointer_up();
            handle_actions(shared, actions);
        });
    })?);

    // A release outside the window never reaches us; losing focus ends the drag instead.
    let weak = Rc::downgrade(shared);
    listeners.push(listen(window, "blur", move |_ev| {
        with_shared(&weak, |shared| {
            let actions = shared.engine.borrow_mut().end_drag();
            handle_actions(shared, actions);
        });
    })?);

    shared.listeners.borrow_mut().extend(listeners);
    Ok(())
}

fn listen(
    target: &EventTarget,
    event: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Listener, JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    Ok(Listener { target: target.clone(), event, closure })
}

fn listen_mouse(
    target: &EventTarget,
    event: &'static str,
    mut handler: impl FnMut(MouseEvent) + 'static,
) -> Result<Listener, JsValue> {
    listen(target, event, move |ev: Event| match ev.dyn_into::<MouseEvent>() {
        Ok(ev) => handler(ev),
        Err(ev) => log::warn!("{event} delivered a non-mouse event: {:?}", ev.type_()),
    })
}

fn with_shared(weak: &Weak<Shared>, f: impl FnOnce(&Rc<Shared>)) {
    if let Some(shared) = weak.upgrade() {
        if !is_stopped(&shared) {
            f(&shared);
        }
    }
}

/// Pointer position in canvas pixels.
fn pointer_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point::new(f64::from(ev.client_x()) - rect.left(), f64::from(ev.client_y()) - rect.top())
}

fn watch_icon_size(shared: &Rc<Shared>) {
    let Some(img) = shared.icon.as_ref() else {
        return;
    };
    let weak = Rc::downgrade(shared);
    let onload = Closure::<dyn FnMut()>::new(move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Some(img) = shared.icon.as_ref() else {
            return;
        };
        let size = IconSize::new(f64::from(img.natural_width()), f64::from(img.natural_height()));
        shared.engine.borrow_mut().set_icon_size(size);
    });
    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    *shared.icon_onload.borrow_mut() = Some(onload);
}

// =============================================================
// Render loop
// =============================================================

fn start_render_loop(shared: &Rc<Shared>) {
    let weak = Rc::downgrade(shared);
    let tick = Closure::<dyn FnMut()>::new(move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        shared.frame_id.set(None);
        render_frame(&shared);
        request_frame(&shared);
    });
    *shared.frame.borrow_mut() = Some(tick);
    request_frame(shared);
}

fn render_frame(shared: &Shared) {
    let engine = shared.engine.borrow();
    let mut surface = shared.surface.borrow_mut();
    let Some(surface) = surface.as_mut() else {
        return;
    };
    if let Err(err) = render::draw(surface, &engine) {
        log::warn!("render failed: {err:?}");
    }
}

fn request_frame(shared: &Shared) {
    if is_stopped(shared) {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let frame = shared.frame.borrow();
    let Some(tick) = frame.as_ref() else {
        return;
    };
    match window.request_animation_frame(tick.as_ref().unchecked_ref()) {
        Ok(id) => shared.frame_id.set(Some(id)),
        Err(err) => log::error!("requestAnimationFrame failed: {err:?}"),
    }
}

fn cancel_frame(shared: &Shared) {
    let (Some(id), Some(window)) = (shared.frame_id.take(), web_sys::window()) else {
        return;
    };
    if let Err(err) = window.cancel_animation_frame(id) {
        log::warn!("cancelAnimationFrame failed: {err:?}");
    }
}
