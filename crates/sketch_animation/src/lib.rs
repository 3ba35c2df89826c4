//! Sketch Animation System
//!
//! Timing curves and the per-surface frame loop.
//!
//! # Features
//!
//! - **Cubic Bezier**: CSS-style timing curves with evaluation, numeric
//!   inversion (Newton-Raphson with bisection fallback), and De Casteljau
//!   subdivision
//! - **Easing**: named timing functions backed by the curve engine
//! - **Frame Scheduling**: setup/resize/update/draw sequencing with throttling
//!   and pause-safe timers

pub mod bezier;
pub mod easing;
pub mod scheduler;

pub use bezier::{Axis, BezierError, CubicBezier, Point, Result};
pub use easing::{Easing, ParseEasingError};
pub use scheduler::{FrameClock, FrameScheduler, FrameTarget, TickOutcome};
