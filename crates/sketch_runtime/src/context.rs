//! Animation contexts
//!
//! A [`Sketch`] is the state collaborators see from inside their callbacks:
//! timers, size, input snapshot and the drawing surface. The registry wraps
//! each one in an [`AnimationContext`] together with its [`Callbacks`] and
//! its frame scheduler.

use crate::config::SketchConfig;
use crate::input::InputNormalizer;
use rustc_hash::FxHashMap;
use sketch_animation::{FrameClock, FrameScheduler, FrameTarget};
use sketch_core::{CallbackSlot, InputEvent, KeyState, PointerSample};
use sketch_platform::{FrameRequestId, Surface, SurfaceKind, Viewport};
use smallvec::SmallVec;
use slotmap::new_key_type;
use tracing::debug;

new_key_type! {
    /// Handle returned by `create`
    pub struct ContextId;
}

/// Lifecycle callback: setup, resize, update, draw, focus and blur
pub type LifecycleFn = Box<dyn FnMut(&mut Sketch)>;

/// Input callback
pub type EventFn = Box<dyn FnMut(&mut Sketch, &InputEvent)>;

/// Collaborator callbacks of one context
#[derive(Default)]
pub struct Callbacks {
    setup: Option<LifecycleFn>,
    resize: Option<LifecycleFn>,
    update: Option<LifecycleFn>,
    draw: Option<LifecycleFn>,
    focus: Option<LifecycleFn>,
    blur: Option<LifecycleFn>,
    events: FxHashMap<CallbackSlot, EventFn>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_setup(mut self, f: impl FnMut(&mut Sketch) + 'static) -> Self {
        self.setup = Some(Box::new(f));
        self
    }

    pub fn on_resize(mut self, f: impl FnMut(&mut Sketch) + 'static) -> Self {
        self.resize = Some(Box::new(f));
        self
    }

    pub fn on_update(mut self, f: impl FnMut(&mut Sketch) + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn on_draw(mut self, f: impl FnMut(&mut Sketch) + 'static) -> Self {
        self.draw = Some(Box::new(f));
        self
    }

    pub fn on_focus(mut self, f: impl FnMut(&mut Sketch) + 'static) -> Self {
        self.focus = Some(Box::new(f));
        self
    }

    pub fn on_blur(mut self, f: impl FnMut(&mut Sketch) + 'static) -> Self {
        self.blur = Some(Box::new(f));
        self
    }

    /// Fill an input slot. Focus and blur slots go through
    /// [`on_focus`](Self::on_focus) and [`on_blur`](Self::on_blur).
    pub fn on(mut self, slot: CallbackSlot, f: impl FnMut(&mut Sketch, &InputEvent) + 'static) -> Self {
        self.events.insert(slot, Box::new(f));
        self
    }

    /// Run the callbacks behind `slots` in order, stopping once the sketch
    /// asks to be destroyed. Returns the slots that fired.
    pub(crate) fn fire(
        &mut self,
        sketch: &mut Sketch,
        slots: &[CallbackSlot],
        event: Option<&InputEvent>,
    ) -> SmallVec<[CallbackSlot; 2]> {
        let mut fired = SmallVec::new();
        for &slot in slots {
            if sketch.is_destroyed() {
                break;
            }
            let ran = match (slot, event) {
                (CallbackSlot::Focus, _) => run(&mut self.focus, sketch),
                (CallbackSlot::Blur, _) => run(&mut self.blur, sketch),
                (_, Some(event)) => match self.events.get_mut(&slot) {
                    Some(f) => {
                        f(sketch, event);
                        true
                    }
                    None => false,
                },
                (_, None) => false,
            };
            if ran {
                fired.push(slot);
            }
        }
        fired
    }
}

fn run(callback: &mut Option<LifecycleFn>, sketch: &mut Sketch) -> bool {
    match callback {
        Some(f) => {
            f(sketch);
            true
        }
        None => false,
    }
}

/// Viewport values captured once per tick or event
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportMetrics {
    pub inner_size: (f32, f32),
    pub scroll: (f32, f32),
    pub device_pixel_ratio: Option<f32>,
}

impl ViewportMetrics {
    pub fn capture(viewport: &dyn Viewport) -> Self {
        Self {
            inner_size: viewport.inner_size(),
            scroll: viewport.scroll(),
            device_pixel_ratio: viewport.device_pixel_ratio(),
        }
    }
}

/// Context state visible to callbacks
pub struct Sketch {
    id: ContextId,
    config: SketchConfig,
    clock: FrameClock,
    wall: f64,
    logical: (f32, f32),
    width: f32,
    height: f32,
    surface: Box<dyn Surface>,
    input: InputNormalizer,
    destroy_requested: bool,
}

impl Sketch {
    pub(crate) fn new(id: ContextId, config: SketchConfig, surface: Box<dyn Surface>, wall: f64) -> Self {
        let logical = if config.width > 0.0 && config.height > 0.0 {
            (config.width, config.height)
        } else {
            let rect = surface.bounding_rect();
            (rect.width, rect.height)
        };
        let (width, height) = surface.backing_size();
        Self {
            id,
            config,
            clock: FrameClock::new(),
            wall,
            logical,
            width,
            height,
            surface,
            input: InputNormalizer::new(),
            destroy_requested: false,
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn kind(&self) -> SurfaceKind {
        self.surface.kind()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Wall-clock time of the last frame (or start)
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn dt(&self) -> f64 {
        self.clock.dt()
    }

    pub fn millis(&self) -> f64 {
        self.clock.millis()
    }

    /// Backing width from the last resize, DPR-scaled under retina
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn pointer(&self) -> PointerSample {
        self.input.pointer()
    }

    pub fn touches(&self) -> SmallVec<[PointerSample; 4]> {
        self.input.touches()
    }

    pub fn keys(&self) -> &KeyState {
        self.input.keys()
    }

    pub fn dragging(&self) -> bool {
        self.input.dragging()
    }

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    /// Start running. Timing restarts from the current wall clock, so a
    /// context that was paused does not see the pause as one long frame.
    pub fn start(&mut self) {
        self.clock.start(self.wall);
        debug!(context = ?self.id, now = self.wall, "start");
    }

    pub fn stop(&mut self) {
        if self.clock.is_running() {
            debug!(context = ?self.id, "stop");
        }
        self.clock.stop();
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Clear the surface. Only canvas surfaces have anything to clear.
    pub fn clear(&mut self) {
        if self.surface.kind().is_2d() {
            self.surface.clear();
        }
    }

    /// Ask the registry to tear this context down once the current callback
    /// returns.
    pub fn destroy(&mut self) {
        self.destroy_requested = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroy_requested
    }

    pub(crate) fn set_wall(&mut self, wall: f64) {
        self.wall = wall;
    }

    pub(crate) fn input_mut(&mut self) -> &mut InputNormalizer {
        &mut self.input
    }

    /// Recompute the context size and write it to the surface.
    pub(crate) fn apply_size(&mut self, metrics: &ViewportMetrics) {
        if self.config.fullscreen {
            self.logical = metrics.inner_size;
        }
        let (mut w, mut h) = self.logical;

        if self.config.retina && self.surface.kind().is_2d() {
            if let Some(ratio) = metrics.device_pixel_ratio {
                self.surface.set_display_size(w, h);
                w *= ratio;
                h *= ratio;
                self.surface.set_scale(ratio);
            }
        }

        if self.surface.backing_size() != (w, h) {
            self.surface.set_backing_size(w, h);
        }

        self.width = w;
        self.height = h;
        debug!(context = ?self.id, width = w, height = h, "resize applied");
    }
}

/// A context as the registry stores it
pub(crate) struct AnimationContext {
    pub(crate) sketch: Sketch,
    pub(crate) callbacks: Callbacks,
    pub(crate) scheduler: FrameScheduler,
    pub(crate) request: Option<FrameRequestId>,
}

impl AnimationContext {
    pub(crate) fn new(sketch: Sketch, callbacks: Callbacks) -> Self {
        let interval = sketch.config.interval;
        Self {
            sketch,
            callbacks,
            scheduler: FrameScheduler::new(interval),
            request: None,
        }
    }

    /// Borrow the pieces a scheduler call needs.
    pub(crate) fn split(&mut self, metrics: ViewportMetrics) -> (&mut FrameScheduler, ContextFrame<'_>) {
        let AnimationContext {
            sketch,
            callbacks,
            scheduler,
            ..
        } = self;
        (
            scheduler,
            ContextFrame {
                sketch,
                callbacks,
                metrics,
            },
        )
    }
}

/// Frame target view over one context
pub(crate) struct ContextFrame<'a> {
    pub(crate) sketch: &'a mut Sketch,
    pub(crate) callbacks: &'a mut Callbacks,
    metrics: ViewportMetrics,
}

impl FrameTarget for ContextFrame<'_> {
    fn clock(&mut self) -> &mut FrameClock {
        &mut self.sketch.clock
    }

    fn setup(&mut self) {
        run(&mut self.callbacks.setup, self.sketch);
    }

    fn apply_size(&mut self) {
        self.sketch.apply_size(&self.metrics);
    }

    fn resized(&mut self) {
        run(&mut self.callbacks.resize, self.sketch);
    }

    fn update(&mut self) {
        run(&mut self.callbacks.update, self.sketch);
    }

    fn auto_clear(&self) -> bool {
        self.sketch.config.autoclear && self.sketch.surface.kind().is_2d()
    }

    fn clear(&mut self) {
        self.sketch.clear();
    }

    fn draw(&mut self) {
        run(&mut self.callbacks.draw, self.sketch);
    }

    fn halted(&self) -> bool {
        self.sketch.destroy_requested
    }
}
