//! Sketch Platform Abstraction Layer
//!
//! Host services the runtime is given rather than reaching for globals:
//!
//! - [`Platform`] - the top-level host abstraction
//! - [`Clock`] and [`Viewport`] - wall-clock time and page metrics
//! - [`Surface`] - a drawing surface with separate backing and display sizes
//! - [`FrameSource`] - one-shot per-refresh callbacks, with
//!   [`TimerFrameSource`] for hosts that have none
//! - [`Listeners`] - subscription bookkeeping per [`EventTarget`]
//!
//! The [`headless`] module implements all of them deterministically.

pub mod error;
pub mod frame;
pub mod headless;
pub mod listener;
pub mod platform;
pub mod surface;

pub use error::{PlatformError, Result};
pub use frame::{FrameRequestId, FrameSource, TimerFrameSource, TIMER_FRAME_MS};
pub use listener::{EventTarget, ListenerId, Listeners};
pub use platform::{Clock, Platform, Viewport};
pub use surface::{ContainerId, Rect, Surface, SurfaceId, SurfaceKind};
