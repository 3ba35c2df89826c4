//! Platform trait and host services

use crate::error::Result;
use crate::frame::FrameSource;
use crate::listener::EventTarget;
use crate::surface::{ContainerId, Surface, SurfaceKind};
use sketch_core::RawEvent;

/// Monotonic wall clock in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Browser-style viewport metrics
pub trait Viewport {
    /// Inner size of the viewport in layout pixels
    fn inner_size(&self) -> (f32, f32);

    /// Current page scroll offset
    fn scroll(&self) -> (f32, f32);

    /// Device pixel ratio, if the host reports one
    fn device_pixel_ratio(&self) -> Option<f32>;
}

/// Platform abstraction trait
///
/// Implemented by each host backend to hand the runtime its clock, viewport,
/// drawing surfaces, frame callbacks and raw input.
pub trait Platform {
    /// Get the platform name
    fn name(&self) -> &'static str;

    fn clock(&self) -> &dyn Clock;

    fn viewport(&self) -> &dyn Viewport;

    /// Allocate a fresh, detached drawing surface
    fn create_surface(&mut self, kind: SurfaceKind) -> Result<Box<dyn Surface>>;

    /// Container surfaces attach to when none is configured (the page body)
    fn default_container(&self) -> ContainerId;

    /// Check that a configured container exists
    fn has_container(&self, container: ContainerId) -> bool {
        container == self.default_container()
    }

    /// The host's native per-refresh callback source.
    ///
    /// `None` means the runtime falls back to
    /// [`TimerFrameSource`](crate::frame::TimerFrameSource). Called once, when
    /// the runtime is built.
    fn native_frames(&mut self) -> Option<Box<dyn FrameSource>>;

    /// Drain raw events queued since the last call, in arrival order.
    fn poll_events(&mut self) -> Vec<(EventTarget, RawEvent)> {
        Vec::new()
    }
}
