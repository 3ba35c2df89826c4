//! Sketch Runtime
//!
//! Drives independent animated surfaces: per-frame update and draw, input
//! normalized across mouse, touch and keyboard, resize handling, and the
//! create/start/stop/destroy lifecycle.
//!
//! # Example
//!
//! ```rust
//! use sketch_platform::headless::HeadlessPlatform;
//! use sketch_runtime::{Callbacks, ConfigOverrides, ContextRegistry};
//!
//! let mut registry = ContextRegistry::new(HeadlessPlatform::new());
//! let id = registry
//!     .create(
//!         ConfigOverrides::new().size(320.0, 240.0),
//!         Callbacks::new().on_draw(|sketch| {
//!             let _ = (sketch.width(), sketch.millis());
//!         }),
//!     )
//!     .unwrap();
//!
//! registry.platform().manual_clock().advance(16.0);
//! registry.pump();
//! assert_eq!(registry.get(id).map(|s| s.dt()), Some(16.0));
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod headless;
pub mod input;
pub mod registry;

pub use config::{ConfigOverrides, SketchConfig};
pub use context::{Callbacks, ContextId, EventFn, LifecycleFn, Sketch, ViewportMetrics};
pub use error::{ConfigError, Result, RuntimeError};
pub use headless::{HeadlessRunConfig, HeadlessRuntime, RunSummary};
pub use input::{BindingTarget, InputNormalizer, BINDINGS};
pub use registry::ContextRegistry;

pub use sketch_core::{CallbackSlot, EventKind, EventType, InputEvent, RawEvent, TouchPoint};
