//! Context registry
//!
//! Owns every live context of one host, the shared frame source, and the
//! listener table. Nothing here is global: tests build as many isolated
//! registries as they like.
//!
//! The host drives the registry with [`ContextRegistry::pump`], which first
//! delivers queued platform events and then runs every frame request that
//! has come due. Each context keeps exactly one outstanding request while it
//! exists, running or not; only `destroy` cancels it.

use crate::config::{ConfigOverrides, SketchConfig};
use crate::context::{AnimationContext, Callbacks, ContextId, Sketch, ViewportMetrics};
use crate::error::{Result, RuntimeError};
use crate::input::BINDINGS;
use rustc_hash::FxHashMap;
use sketch_animation::TickOutcome;
use sketch_core::{CallbackSlot, EventType, RawEvent};
use sketch_platform::{
    EventTarget, FrameRequestId, FrameSource, Listeners, Platform, PlatformError, Surface,
    TimerFrameSource,
};
use slotmap::SlotMap;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

/// Registry of animation contexts bound to one platform
pub struct ContextRegistry<P: Platform> {
    platform: P,
    frames: Box<dyn FrameSource>,
    contexts: SlotMap<ContextId, AnimationContext>,
    listeners: Listeners<ContextId>,
    requests: FxHashMap<FrameRequestId, ContextId>,
    order: Vec<ContextId>,
    defaults: SketchConfig,
}

impl<P: Platform> ContextRegistry<P> {
    /// Build a registry on `platform`, falling back to timer-driven frames
    /// when the host has no native refresh callback.
    pub fn new(mut platform: P) -> Self {
        let frames = match platform.native_frames() {
            Some(frames) => frames,
            None => {
                debug!(platform = platform.name(), "no native frame source, using timer");
                Box::new(TimerFrameSource::new()) as Box<dyn FrameSource>
            }
        };
        Self {
            platform,
            frames,
            contexts: SlotMap::with_key(),
            listeners: Listeners::new(),
            requests: FxHashMap::default(),
            order: Vec::new(),
            defaults: SketchConfig::default(),
        }
    }

    /// Replace the base config overrides are merged onto.
    pub fn with_defaults(mut self, defaults: SketchConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Whether frames come from the host rather than the timer emulation
    pub fn has_native_frames(&self) -> bool {
        self.frames.is_native()
    }

    /// Earliest time a pending frame becomes due, when the source knows it
    pub fn next_deadline(&self) -> Option<f64> {
        self.frames.next_deadline()
    }

    fn now(&self) -> f64 {
        self.platform.clock().now_ms()
    }

    fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics::capture(self.platform.viewport())
    }

    /// Create a context on a fresh surface.
    pub fn create(&mut self, overrides: ConfigOverrides, callbacks: Callbacks) -> Result<ContextId> {
        let config = self.defaults.merge(overrides)?;
        self.check_container(&config)?;
        let surface = self.platform.create_surface(config.kind)?;
        Ok(self.install(config, surface, callbacks))
    }

    /// Create a context around a surface the caller already owns. The
    /// surface's own kind wins over any configured `type`.
    pub fn adopt(
        &mut self,
        surface: Box<dyn Surface>,
        overrides: ConfigOverrides,
        callbacks: Callbacks,
    ) -> Result<ContextId> {
        let mut config = self.defaults.merge(overrides)?;
        config.kind = surface.kind();
        self.check_container(&config)?;
        Ok(self.install(config, surface, callbacks))
    }

    fn check_container(&self, config: &SketchConfig) -> Result<()> {
        match config.container {
            Some(container) if !self.platform.has_container(container) => {
                Err(PlatformError::UnknownContainer(container.0).into())
            }
            _ => Ok(()),
        }
    }

    fn install(&mut self, config: SketchConfig, mut surface: Box<dyn Surface>, callbacks: Callbacks) -> ContextId {
        let now = self.now();
        let metrics = self.metrics();

        let container = config
            .container
            .unwrap_or_else(|| self.platform.default_container());
        surface.attach(container);
        let surface_id = surface.id();
        let autostart = config.autostart;
        let kind = config.kind;

        let id = self.contexts.insert_with_key(|id| {
            AnimationContext::new(Sketch::new(id, config, surface, now), callbacks)
        });

        self.order.push(id);

        for (target, types) in BINDINGS {
            for &event_type in *types {
                self.listeners.add(target.resolve(surface_id), event_type, id);
            }
        }

        if let Some(context) = self.contexts.get_mut(id) {
            if autostart {
                context.sketch.start();
            }
            let (scheduler, mut frame) = context.split(metrics);
            scheduler.resize(&mut frame);
        }

        self.arm(id, now);
        debug!(context = ?id, %kind, container = container.0, autostart, "context created");
        id
    }

    /// Replace the context's outstanding frame request with a fresh one.
    fn arm(&mut self, id: ContextId, now: f64) {
        let Some(context) = self.contexts.get_mut(id) else {
            return;
        };
        if let Some(previous) = context.request.take() {
            self.frames.cancel_frame(previous);
            self.requests.remove(&previous);
        }
        let request = self.frames.request_frame(now);
        context.request = Some(request);
        self.requests.insert(request, id);
    }

    /// Tear a context down: listeners, frame request, container, registry.
    pub fn destroy(&mut self, id: ContextId) -> Result<()> {
        let mut context = self
            .contexts
            .remove(id)
            .ok_or_else(|| RuntimeError::UnknownContext(format!("{id:?}")))?;

        self.order.retain(|other| *other != id);
        let unbound = self.listeners.remove_owner(id);
        if let Some(request) = context.request.take() {
            self.frames.cancel_frame(request);
            self.requests.remove(&request);
        }
        context.sketch.surface_mut().detach();
        context.sketch.stop();

        debug!(context = ?id, listeners = unbound, "context destroyed");
        Ok(())
    }

    /// Destroy every context, returning how many there were.
    pub fn destroy_all(&mut self) -> usize {
        let ids = self.ids();
        for id in &ids {
            let _ = self.destroy(*id);
        }
        ids.len()
    }

    /// Live contexts in creation order
    pub fn ids(&self) -> Vec<ContextId> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn contains(&self, id: ContextId) -> bool {
        self.contexts.contains_key(id)
    }

    pub fn get(&self, id: ContextId) -> Option<&Sketch> {
        self.contexts.get(id).map(|context| &context.sketch)
    }

    /// Mutable access outside callbacks. A `destroy()` requested through
    /// this handle takes effect on the next pump.
    pub fn get_mut(&mut self, id: ContextId) -> Option<&mut Sketch> {
        let now = self.now();
        self.contexts.get_mut(id).map(|context| {
            context.sketch.set_wall(now);
            &mut context.sketch
        })
    }

    fn sketch_mut(&mut self, id: ContextId) -> Result<&mut Sketch> {
        self.get_mut(id)
            .ok_or_else(|| RuntimeError::UnknownContext(format!("{id:?}")))
    }

    pub fn start(&mut self, id: ContextId) -> Result<()> {
        self.sketch_mut(id)?.start();
        Ok(())
    }

    pub fn stop(&mut self, id: ContextId) -> Result<()> {
        self.sketch_mut(id)?.stop();
        Ok(())
    }

    pub fn toggle(&mut self, id: ContextId) -> Result<()> {
        self.sketch_mut(id)?.toggle();
        Ok(())
    }

    pub fn clear(&mut self, id: ContextId) -> Result<()> {
        self.sketch_mut(id)?.clear();
        Ok(())
    }

    /// Destroy contexts that asked for it outside a callback.
    fn reap(&mut self) {
        let doomed: Vec<ContextId> = self
            .contexts
            .iter()
            .filter(|(_, context)| context.sketch.is_destroyed())
            .map(|(id, _)| id)
            .collect();
        for id in doomed {
            let _ = self.destroy(id);
        }
    }

    /// Deliver queued platform events, then run every frame that has come
    /// due. Returns the number of context ticks run.
    pub fn pump(&mut self) -> usize {
        self.reap();

        for (target, event) in self.platform.poll_events() {
            self.dispatch(target, &event);
        }

        let now = self.now();
        let ready = self.frames.take_ready(now);
        let mut ticks = 0;
        for request in ready {
            let Some(id) = self.requests.remove(&request) else {
                warn!(request = request.0, "stale frame request ignored");
                continue;
            };
            if !self.contexts.contains_key(id) {
                warn!(context = ?id, "frame for destroyed context ignored");
                continue;
            }
            self.tick(id, now);
            ticks += 1;
        }
        ticks
    }

    fn tick(&mut self, id: ContextId, now: f64) {
        if let Some(context) = self.contexts.get_mut(id) {
            // the fired request is spent; forget it before re-arming
            context.request = None;
        }
        self.arm(id, now);

        let metrics = self.metrics();
        let Some(context) = self.contexts.get_mut(id) else {
            return;
        };
        context.sketch.set_wall(now);
        let (scheduler, mut frame) = context.split(metrics);
        let outcome = scheduler.tick(now, &mut frame);
        trace!(context = ?id, ?outcome, "tick");

        if outcome == TickOutcome::Halted || context.sketch.is_destroyed() {
            let _ = self.destroy(id);
        }
    }

    /// Deliver one raw platform event to every context subscribed to it.
    ///
    /// Returns the number of contexts reached.
    pub fn dispatch(&mut self, target: EventTarget, event: &RawEvent) -> usize {
        let owners = self.listeners.owners(target, event.event_type);
        if owners.is_empty() {
            trace!(?target, event = %event.event_type, "no listeners");
            return 0;
        }

        let now = self.now();
        let metrics = self.metrics();
        let mut reached = 0;
        for id in owners {
            let Some(context) = self.contexts.get_mut(id) else {
                continue;
            };
            context.sketch.set_wall(now);
            let fired = deliver(context, event, metrics);
            trace!(context = ?id, event = %event.event_type, fired = ?fired.as_slice(), "event");
            reached += 1;

            if context.sketch.is_destroyed() {
                let _ = self.destroy(id);
            }
        }
        reached
    }
}

/// Route one event through a context's input state and callbacks.
fn deliver(
    context: &mut AnimationContext,
    event: &RawEvent,
    metrics: ViewportMetrics,
) -> SmallVec<[CallbackSlot; 2]> {
    let ty = event.event_type;
    match ty {
        EventType::Focus | EventType::Blur => {
            if context.sketch.config().autopause {
                if ty == EventType::Blur {
                    context.sketch.stop();
                } else {
                    context.sketch.start();
                }
            }
            let AnimationContext {
                sketch, callbacks, ..
            } = context;
            callbacks.fire(sketch, ty.slots(), None)
        }
        EventType::Resize => {
            let (scheduler, mut frame) = context.split(metrics);
            scheduler.resize(&mut frame);
            SmallVec::new()
        }
        _ if ty.is_keyboard() => {
            let input = context.sketch.input_mut().key_event(event);
            let AnimationContext {
                sketch, callbacks, ..
            } = context;
            callbacks.fire(sketch, ty.slots(), Some(&input))
        }
        _ if ty.is_pointer() => {
            let bounds = context.sketch.surface().bounding_rect();
            let input = context
                .sketch
                .input_mut()
                .pointer_event(event, bounds, metrics.scroll);
            let AnimationContext {
                sketch, callbacks, ..
            } = context;
            callbacks.fire(sketch, ty.slots(), Some(&input))
        }
        _ => SmallVec::new(),
    }
}
