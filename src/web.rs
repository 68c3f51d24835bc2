//! The browser side: finds the canvas, wires window and document events into
//! the engine and drives it from `requestAnimationFrame`.
//!
//! Anything missing from the page (no window, no canvas, no 2D context) leaves
//! an inert `ParticleSystem` whose methods do nothing.

use crate::config::{particle_count_for_width, Config, ConfigUpdate};
use crate::engine::{Motion, ParticleEngine, RunState, Schedule};
use crate::errors::{EnvironmentSnafu, ParticleError};
use crate::simulation::Bounds;
use crate::surface::CanvasSurface;
use rand::{rngs::StdRng, SeedableRng};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

type Engine = ParticleEngine<CanvasSurface, StdRng>;
type Shared<T> = Rc<RefCell<T>>;

/// The self-rescheduling `requestAnimationFrame` callback.
struct AnimationLoop {
    window: Window,
    engine: Shared<Engine>,
    callback: Shared<Option<Closure<dyn FnMut(f64)>>>,
    /// Handle of the frame currently requested, if any
    pending: Rc<Cell<Option<i32>>>,
}

impl AnimationLoop {
    fn new(window: Window, engine: Shared<Engine>) -> Rc<Self> {
        let animation = Rc::new(AnimationLoop {
            window,
            engine: Rc::clone(&engine),
            callback: Rc::new(RefCell::new(None)),
            pending: Rc::new(Cell::new(None)),
        });

        // The closure only holds a weak handle on the loop, so dropping the
        // `ParticleSystem` is enough to tear everything down.
        let weak = Rc::downgrade(&animation);
        let closure = Closure::wrap(Box::new(move |now: f64| {
            let animation = match weak.upgrade() {
                Some(animation) => animation,
                None => return,
            };
            animation.pending.set(None);

            let schedule = {
                #[cfg(feature = "frame_timing")]
                let _timer = crate::utils::Timer::new("ParticleSystem::frame");
                engine.borrow_mut().frame(now)
            };
            if schedule == Schedule::NextFrame {
                animation.request();
            }
        }) as Box<dyn FnMut(f64)>);
        *animation.callback.borrow_mut() = Some(closure);

        animation
    }

    fn request(&self) {
        if self.pending.get().is_some() {
            return;
        }
        let callback = self.callback.borrow();
        let callback = match callback.as_ref() {
            Some(callback) => callback,
            None => return,
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => self.pending.set(Some(handle)),
            Err(error) => {
                tracing::warn!("requestAnimationFrame failed: {:?}", error);
                self.engine.borrow_mut().frame_dropped();
            }
        }
    }

    fn schedule(&self, schedule: Schedule) {
        if schedule == Schedule::NextFrame {
            self.request();
        }
    }

    fn cancel(&self) {
        if let Some(handle) = self.pending.take() {
            if let Err(error) = self.window.cancel_animation_frame(handle) {
                tracing::debug!("cancelAnimationFrame failed: {:?}", error);
            }
        }
    }
}

/// An event listener we added and must remove again.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => Some(Self {
                target: target.clone(),
                event,
                closure,
            }),
            Err(error) => {
                tracing::warn!("Couldn't listen for `{}`: {:?}", event, error);
                None
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(error) = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            tracing::debug!("Couldn't stop listening for `{}`: {:?}", self.event, error);
        }
    }
}

/// Everything a live particle system holds on to.
struct Running {
    engine: Shared<Engine>,
    animation: Rc<AnimationLoop>,
    _listeners: Vec<Listener>,
}

/// The particle background, as seen from the page's JavaScript.
#[wasm_bindgen]
pub struct ParticleSystem {
    running: Option<Running>,
}

#[wasm_bindgen]
impl ParticleSystem {
    /// Start the background on the canvas with the given id. Never throws: on
    /// a page without that canvas the returned system simply does nothing.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> ParticleSystem {
        let running = match Self::start(canvas_id) {
            Ok(running) => running,
            Err(error) => {
                tracing::warn!("Particle background disabled: {}", error);
                None
            }
        };
        ParticleSystem { running }
    }

    pub fn pause(&self) {
        if let Some(running) = &self.running {
            running.engine.borrow_mut().pause();
        }
    }

    pub fn resume(&self) {
        if let Some(running) = &self.running {
            let schedule = running.engine.borrow_mut().resume();
            running.animation.schedule(schedule);
        }
    }

    /// Merge a partial config such as `{ particleCount: 40 }` and rebuild the
    /// particles.
    #[wasm_bindgen(js_name = updateConfig)]
    pub fn update_config(&self, partial: &JsValue) -> Result<(), JsValue> {
        let running = match &self.running {
            Some(running) => running,
            None => return Ok(()),
        };
        // `undefined` stringifies to nothing, treat it like `{}`
        let json = js_sys::JSON::stringify(partial)?
            .as_string()
            .unwrap_or_else(|| "{}".to_owned());
        let update = ConfigUpdate::from_json(&json)?;
        running.engine.borrow_mut().update_config(&update);
        Ok(())
    }

    /// The current config as a plain object, `undefined` when inert.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        match &self.running {
            Some(running) => {
                let json = running.engine.borrow().config().to_json()?;
                js_sys::JSON::parse(&json)
            }
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.running.as_ref().map_or(false, |running| {
            let engine = running.engine.borrow();
            engine.run_state() == RunState::Running && engine.motion() == Motion::Animated
        })
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.running
            .as_ref()
            .map_or(0, |running| running.engine.borrow().particle_count())
    }
}

impl ParticleSystem {
    fn start(canvas_id: &str) -> Result<Option<Running>, ParticleError> {
        let window = web_sys::window().ok_or_else(|| missing("window"))?;
        let document = window.document().ok_or_else(|| missing("document"))?;
        let canvas = match document
            .get_element_by_id(canvas_id)
            .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok())
        {
            Some(canvas) => canvas,
            None => {
                tracing::debug!("No canvas `{}` on this page", canvas_id);
                return Ok(None);
            }
        };
        let surface = CanvasSurface::new(canvas)?;

        let motion = if prefers_reduced_motion(&window) {
            Motion::Reduced
        } else {
            Motion::Animated
        };
        let bounds = viewport(&window);
        // Responsive tiers only kick in on resize, the first paint uses the defaults
        let (engine, schedule) = ParticleEngine::start(
            surface,
            bounds,
            Config::default(),
            StdRng::from_entropy(),
            motion,
        );
        let engine = Rc::new(RefCell::new(engine));
        let animation = AnimationLoop::new(window.clone(), Rc::clone(&engine));

        let listeners = match motion {
            Motion::Reduced => Vec::new(),
            Motion::Animated => bind_events(&window, &document, &engine, &animation),
        };
        animation.schedule(schedule);
        tracing::info!("Particle background started on `{}`", canvas_id);

        Ok(Some(Running {
            engine,
            animation,
            _listeners: listeners,
        }))
    }
}

impl Drop for ParticleSystem {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.animation.cancel();
        }
    }
}

fn bind_events(
    window: &Window,
    document: &Document,
    engine: &Shared<Engine>,
    animation: &Rc<AnimationLoop>,
) -> Vec<Listener> {
    let mut listeners = Vec::new();

    let resize = {
        let engine = Rc::clone(engine);
        let handle = window.clone();
        Listener::attach(window, "resize", move |_event| {
            let bounds = viewport(&handle);
            let mut engine = engine.borrow_mut();
            engine.resize(bounds.width, bounds.height);
            engine.update_config(&ConfigUpdate::particle_count(particle_count_for_width(
                bounds.width,
            )));
        })
    };
    listeners.extend(resize);

    let mousemove = {
        let engine = Rc::clone(engine);
        let handle = window.clone();
        Listener::attach(window, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                engine.borrow_mut().pointer_moved(
                    f64::from(event.client_x()),
                    f64::from(event.client_y()),
                    now(&handle),
                );
            }
        })
    };
    listeners.extend(mousemove);

    let visibility = {
        let engine = Rc::clone(engine);
        let animation = Rc::clone(animation);
        let handle = document.clone();
        Listener::attach(document, "visibilitychange", move |_event| {
            let schedule = engine.borrow_mut().visibility_changed(handle.hidden());
            animation.schedule(schedule);
        })
    };
    listeners.extend(visibility);

    listeners
}

fn missing(what: &str) -> ParticleError {
    EnvironmentSnafu { what }.build()
}

fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map_or(false, |query| query.matches())
}

fn viewport(window: &Window) -> Bounds {
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Bounds::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

/// Milliseconds on the same clock as animation frame timestamps.
fn now(window: &Window) -> f64 {
    window
        .performance()
        .map_or_else(js_sys::Date::now, |performance| performance.now())
}
