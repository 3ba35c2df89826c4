//! Sketch Core
//!
//! Foundational primitives shared by every other Sketch crate:
//!
//! - **Math helpers**: interpolation, range mapping, and a seeded random source
//!   exposed to collaborators that animate their own models
//! - **Input events**: raw platform event types, the normalized [`InputEvent`],
//!   and the static table mapping raw event types to callback slots
//! - **Key state**: pressed state indexed by numeric code and by key name
//!
//! # Example
//!
//! ```rust
//! use sketch_core::math::{lerp, map_range};
//!
//! assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
//! assert_eq!(map_range(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
//! ```

pub mod events;
pub mod keys;
pub mod math;

pub use events::{
    CallbackSlot, EventKind, EventType, InputEvent, ParseEventTypeError, PointerSample,
    RawEvent, TouchPoint,
};
pub use keys::{key_name, KeyState};
pub use math::Random;
