//! Headless host
//!
//! Deterministic implementations of every host service: a clock that only
//! moves when told to, a scriptable viewport, surfaces that record what was
//! done to them, and a frame source that fires on demand. Handles are cheap
//! clones sharing state, so a test keeps its own copy after the platform has
//! been handed to a runtime.

use crate::error::{PlatformError, Result};
use crate::frame::{FrameRequestId, FrameSource};
use crate::listener::EventTarget;
use crate::platform::{Clock, Platform, Viewport};
use crate::surface::{ContainerId, Rect, Surface, SurfaceId, SurfaceKind};
use sketch_core::RawEvent;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Size a freshly created surface reports before anything resizes it
pub const DEFAULT_SURFACE_SIZE: (f32, f32) = (300.0, 150.0);

/// Clock advanced by hand
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    /// Move forward by `ms` and return the new time.
    pub fn advance(&self, ms: f64) -> f64 {
        let now = self.now.get() + ms;
        self.now.set(now);
        now
    }

    pub fn now(&self) -> f64 {
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Viewport metrics of the headless page
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub inner_width: f32,
    pub inner_height: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub device_pixel_ratio: Option<f32>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            inner_width: 800.0,
            inner_height: 600.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            device_pixel_ratio: None,
        }
    }
}

/// Scriptable viewport
#[derive(Clone, Debug, Default)]
pub struct HeadlessViewport {
    state: Rc<Cell<ViewportState>>,
}

impl HeadlessViewport {
    pub fn new(width: f32, height: f32) -> Self {
        let viewport = Self::default();
        viewport.set_inner_size(width, height);
        viewport
    }

    pub fn set_inner_size(&self, width: f32, height: f32) {
        let mut state = self.state.get();
        state.inner_width = width;
        state.inner_height = height;
        self.state.set(state);
    }

    pub fn set_scroll(&self, x: f32, y: f32) {
        let mut state = self.state.get();
        state.scroll_x = x;
        state.scroll_y = y;
        self.state.set(state);
    }

    pub fn set_device_pixel_ratio(&self, ratio: Option<f32>) {
        let mut state = self.state.get();
        state.device_pixel_ratio = ratio;
        self.state.set(state);
    }

    pub fn state(&self) -> ViewportState {
        self.state.get()
    }
}

impl Viewport for HeadlessViewport {
    fn inner_size(&self) -> (f32, f32) {
        let state = self.state.get();
        (state.inner_width, state.inner_height)
    }

    fn scroll(&self) -> (f32, f32) {
        let state = self.state.get();
        (state.scroll_x, state.scroll_y)
    }

    fn device_pixel_ratio(&self) -> Option<f32> {
        self.state.get().device_pixel_ratio
    }
}

/// Everything a headless surface has been told
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceState {
    pub kind: SurfaceKind,
    pub rect: Rect,
    pub backing: (f32, f32),
    pub display: Option<(f32, f32)>,
    pub scale: f32,
    pub clears: u32,
    pub backing_writes: u32,
    pub container: Option<ContainerId>,
}

/// Recording surface
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    id: SurfaceId,
    state: Rc<RefCell<SurfaceState>>,
}

impl HeadlessSurface {
    pub fn new(id: SurfaceId, kind: SurfaceKind) -> Self {
        let (width, height) = DEFAULT_SURFACE_SIZE;
        Self {
            id,
            state: Rc::new(RefCell::new(SurfaceState {
                kind,
                rect: Rect::new(0.0, 0.0, width, height),
                backing: (width, height),
                display: None,
                scale: 1.0,
                clears: 0,
                backing_writes: 0,
                container: None,
            })),
        }
    }

    /// Snapshot of the recorded state
    pub fn state(&self) -> SurfaceState {
        self.state.borrow().clone()
    }

    /// Move or resize the surface on the page.
    pub fn set_bounding_rect(&self, rect: Rect) {
        self.state.borrow_mut().rect = rect;
    }
}

impl Surface for HeadlessSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn kind(&self) -> SurfaceKind {
        self.state.borrow().kind
    }

    fn bounding_rect(&self) -> Rect {
        self.state.borrow().rect
    }

    fn backing_size(&self) -> (f32, f32) {
        self.state.borrow().backing
    }

    fn set_backing_size(&mut self, width: f32, height: f32) {
        let mut state = self.state.borrow_mut();
        state.backing = (width, height);
        state.backing_writes += 1;
    }

    fn set_display_size(&mut self, width: f32, height: f32) {
        let mut state = self.state.borrow_mut();
        state.display = Some((width, height));
        state.rect.width = width;
        state.rect.height = height;
    }

    fn set_scale(&mut self, ratio: f32) {
        self.state.borrow_mut().scale = ratio;
    }

    fn clear(&mut self) {
        self.state.borrow_mut().clears += 1;
    }

    fn attach(&mut self, container: ContainerId) {
        self.state.borrow_mut().container = Some(container);
    }

    fn detach(&mut self) {
        self.state.borrow_mut().container = None;
    }

    fn container(&self) -> Option<ContainerId> {
        self.state.borrow().container
    }
}

#[derive(Debug, Default)]
struct ManualFrames {
    next_id: u64,
    pending: Vec<FrameRequestId>,
    requested: u64,
    cancelled: u64,
}

/// Native-style frame source that fires every pending request on each pump
#[derive(Clone, Debug, Default)]
pub struct ManualFrameSource {
    inner: Rc<RefCell<ManualFrames>>,
}

impl ManualFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests not yet fired or cancelled
    pub fn pending(&self) -> Vec<FrameRequestId> {
        self.inner.borrow().pending.clone()
    }

    pub fn requested_count(&self) -> u64 {
        self.inner.borrow().requested
    }

    pub fn cancelled_count(&self) -> u64 {
        self.inner.borrow().cancelled
    }
}

impl FrameSource for ManualFrameSource {
    fn request_frame(&mut self, _now: f64) -> FrameRequestId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        inner.requested += 1;
        let id = FrameRequestId(inner.next_id);
        inner.pending.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.pending.len();
        inner.pending.retain(|pending| *pending != id);
        if inner.pending.len() != before {
            inner.cancelled += 1;
        }
    }

    fn take_ready(&mut self, _now: f64) -> Vec<FrameRequestId> {
        std::mem::take(&mut self.inner.borrow_mut().pending)
    }

    fn is_native(&self) -> bool {
        true
    }
}

/// In-memory host
#[derive(Debug)]
pub struct HeadlessPlatform {
    clock: ManualClock,
    viewport: HeadlessViewport,
    frames: ManualFrameSource,
    native_frames: bool,
    surfaces: Vec<HeadlessSurface>,
    containers: Vec<ContainerId>,
    unsupported: Vec<SurfaceKind>,
    events: VecDeque<(EventTarget, RawEvent)>,
}

impl HeadlessPlatform {
    /// The page body container
    pub const BODY: ContainerId = ContainerId(0);

    pub fn new() -> Self {
        Self {
            clock: ManualClock::new(0.0),
            viewport: HeadlessViewport::default(),
            frames: ManualFrameSource::new(),
            native_frames: true,
            surfaces: Vec::new(),
            containers: vec![Self::BODY],
            unsupported: Vec::new(),
            events: VecDeque::new(),
        }
    }

    /// A host without a per-refresh primitive, so the runtime has to emulate one
    pub fn without_native_frames() -> Self {
        Self {
            native_frames: false,
            ..Self::new()
        }
    }

    pub fn with_viewport(self, width: f32, height: f32) -> Self {
        self.viewport.set_inner_size(width, height);
        self
    }

    /// Refuse to create surfaces of `kind`.
    pub fn without_surface_kind(mut self, kind: SurfaceKind) -> Self {
        self.unsupported.push(kind);
        self
    }

    /// Register another element surfaces may attach to.
    pub fn add_container(&mut self) -> ContainerId {
        let id = ContainerId(self.containers.len() as u64);
        self.containers.push(id);
        id
    }

    pub fn manual_clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn headless_viewport(&self) -> &HeadlessViewport {
        &self.viewport
    }

    /// Handle on the native frame source, shared with the runtime
    pub fn manual_frames(&self) -> &ManualFrameSource {
        &self.frames
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&HeadlessSurface> {
        self.surfaces.iter().find(|surface| surface.id == id)
    }

    /// Every surface created so far, including destroyed ones
    pub fn surfaces(&self) -> &[HeadlessSurface] {
        &self.surfaces
    }

    /// Queue a raw event for the next poll.
    pub fn push_event(&mut self, target: EventTarget, event: RawEvent) {
        self.events.push_back((target, event));
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HeadlessPlatform {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn clock(&self) -> &dyn Clock {
        &self.clock
    }

    fn viewport(&self) -> &dyn Viewport {
        &self.viewport
    }

    fn create_surface(&mut self, kind: SurfaceKind) -> Result<Box<dyn Surface>> {
        if self.unsupported.contains(&kind) {
            return Err(PlatformError::Unsupported(kind.to_string()));
        }
        let id = SurfaceId(self.surfaces.len() as u64 + 1);
        let surface = HeadlessSurface::new(id, kind);
        self.surfaces.push(surface.clone());
        tracing::trace!(surface = id.0, %kind, "headless surface created");
        Ok(Box::new(surface))
    }

    fn default_container(&self) -> ContainerId {
        Self::BODY
    }

    fn has_container(&self, container: ContainerId) -> bool {
        self.containers.contains(&container)
    }

    fn native_frames(&mut self) -> Option<Box<dyn FrameSource>> {
        if self.native_frames {
            Some(Box::new(self.frames.clone()))
        } else {
            None
        }
    }

    fn poll_events(&mut self) -> Vec<(EventTarget, RawEvent)> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_core::EventType;

    #[test]
    fn test_clock_handles_share_time() {
        let clock = ManualClock::new(10.0);
        let copy = clock.clone();
        assert_eq!(copy.advance(6.0), 16.0);
        assert_eq!(clock.now_ms(), 16.0);
    }

    #[test]
    fn test_viewport_updates() {
        let viewport = HeadlessViewport::new(1024.0, 768.0);
        viewport.set_scroll(0.0, 40.0);
        viewport.set_device_pixel_ratio(Some(2.0));
        assert_eq!(viewport.inner_size(), (1024.0, 768.0));
        assert_eq!(viewport.scroll(), (0.0, 40.0));
        assert_eq!(viewport.device_pixel_ratio(), Some(2.0));
    }

    #[test]
    fn test_surface_records_operations() {
        let mut platform = HeadlessPlatform::new();
        let mut surface = platform.create_surface(SurfaceKind::Canvas).unwrap();
        surface.set_backing_size(640.0, 480.0);
        surface.set_display_size(320.0, 240.0);
        surface.set_scale(2.0);
        surface.clear();
        surface.attach(HeadlessPlatform::BODY);

        let recorded = platform.surface(surface.id()).unwrap().state();
        assert_eq!(recorded.backing, (640.0, 480.0));
        assert_eq!(recorded.display, Some((320.0, 240.0)));
        assert_eq!(recorded.rect.width, 320.0);
        assert_eq!(recorded.scale, 2.0);
        assert_eq!(recorded.clears, 1);
        assert_eq!(recorded.backing_writes, 1);
        assert_eq!(recorded.container, Some(HeadlessPlatform::BODY));

        surface.detach();
        assert_eq!(surface.container(), None);
    }

    #[test]
    fn test_unsupported_kind() {
        let mut platform = HeadlessPlatform::new().without_surface_kind(SurfaceKind::WebGl);
        assert!(matches!(
            platform.create_surface(SurfaceKind::WebGl),
            Err(PlatformError::Unsupported(_))
        ));
        assert!(platform.create_surface(SurfaceKind::Dom).is_ok());
    }

    #[test]
    fn test_manual_frames_fire_all_pending() {
        let mut platform = HeadlessPlatform::new();
        let handle = platform.manual_frames().clone();
        let mut frames = platform.native_frames().unwrap();
        assert!(frames.is_native());

        let a = frames.request_frame(0.0);
        let b = frames.request_frame(0.0);
        frames.cancel_frame(a);
        assert_eq!(handle.pending(), vec![b]);
        assert_eq!(frames.take_ready(0.0), vec![b]);
        assert!(handle.pending().is_empty());
        assert_eq!(handle.requested_count(), 2);
        assert_eq!(handle.cancelled_count(), 1);
    }

    #[test]
    fn test_no_native_frames() {
        let mut platform = HeadlessPlatform::without_native_frames();
        assert!(platform.native_frames().is_none());
    }

    #[test]
    fn test_containers() {
        let mut platform = HeadlessPlatform::new();
        let extra = platform.add_container();
        assert!(platform.has_container(extra));
        assert!(platform.has_container(HeadlessPlatform::BODY));
        assert!(!platform.has_container(ContainerId(99)));
    }

    #[test]
    fn test_events_drain_in_order() {
        let mut platform = HeadlessPlatform::new();
        platform.push_event(EventTarget::Window, RawEvent::window(EventType::Blur));
        platform.push_event(EventTarget::Document, RawEvent::key(EventType::KeyDown, 32));
        let events = platform.poll_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, EventTarget::Window);
        assert_eq!(events[1].1.key_code, Some(32));
        assert!(platform.poll_events().is_empty());
    }
}
