//! Cubic bezier timing curves
//!
//! A two-dimensional cubic bezier with fixed endpoints `(0, 0)` and `(1, 1)`
//! and two free control points inside the unit square, the same shape CSS
//! uses for `cubic-bezier()` timing functions.
//!
//! Curves are immutable. Subdivision and cloning produce new curves.
//!
//! # Limitations
//!
//! Inversion ([`CubicBezier::solve_t`]) falls back to bisection, which assumes
//! the projection of the curve onto the queried axis is monotonic. That holds
//! for conventional easing control points. For non-monotonic projections the
//! result is some `t` in `[0, 1]`, not necessarily the one closest to the
//! query.
//!
//! Subdivision renormalizes each half against its split point. When a curve's
//! y projection overshoots or dips between the endpoints, a renormalized
//! control point can land outside `[0, 1]` for some valid `t`; the split then
//! fails with [`BezierError::InvalidControlPoint`] naming that derived point.

use std::fmt;
use thiserror::Error;

/// Newton-Raphson iteration budget before falling back to bisection
const NEWTON_ITERATIONS: usize = 8;

/// Derivative magnitude below which Newton is abandoned
const NEWTON_MIN_SLOPE: f64 = 1e-6;

/// Bisection stops after this many halvings even without exact convergence
const BISECTION_MAX_STEPS: usize = 128;

/// Rounding slack tolerated on derived control points
const UNIT_SNAP: f64 = 1e-12;

/// Curve errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BezierError {
    /// A control point coordinate was outside `[0, 1]`
    #[error("'{name}' must be a number between 0 and 1, got {value}")]
    InvalidControlPoint { name: &'static str, value: f64 },

    /// A query argument was outside its domain
    #[error("'{name}' must be a number between 0 and 1, got {value}")]
    OutOfRange { name: &'static str, value: f64 },

    /// Epsilon was zero, negative, or not finite
    #[error("'epsilon' must be a finite number greater than 0, got {0}")]
    InvalidEpsilon(f64),
}

/// Result type for curve operations
pub type Result<T> = std::result::Result<T, BezierError>;

/// Axis selector for single-axis queries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// A point on (or controlling) a curve
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }
}

/// Intermediate points of one De Casteljau split
struct AuxPoints {
    /// First control point of the left curve
    i0: Point,
    /// Second control point of the right curve
    i2: Point,
    /// Second control point of the left curve
    j0: Point,
    /// First control point of the right curve
    j1: Point,
    /// The division point
    k: Point,
}

/// Cubic bezier from `(0, 0)` to `(1, 1)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    p1: Point,
    p2: Point,
}

impl CubicBezier {
    /// `cubic-bezier(0, 0, 1, 1)`
    pub const LINEAR: CubicBezier = CubicBezier::from_points(0.0, 0.0, 1.0, 1.0);
    /// `cubic-bezier(0.25, 0.1, 0.25, 1)`
    pub const EASE: CubicBezier = CubicBezier::from_points(0.25, 0.1, 0.25, 1.0);
    /// `cubic-bezier(0.42, 0, 1, 1)`
    pub const EASE_IN: CubicBezier = CubicBezier::from_points(0.42, 0.0, 1.0, 1.0);
    /// `cubic-bezier(0, 0, 0.58, 1)`
    pub const EASE_OUT: CubicBezier = CubicBezier::from_points(0.0, 0.0, 0.58, 1.0);
    /// `cubic-bezier(0.42, 0, 0.58, 1)`
    pub const EASE_IN_OUT: CubicBezier = CubicBezier::from_points(0.42, 0.0, 0.58, 1.0);

    /// Create a curve from its two control points.
    ///
    /// Every coordinate must lie in `[0, 1]`; anything else (including NaN)
    /// is rejected rather than clamped.
    pub fn new(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Result<Self> {
        check_control("p1x", p1x)?;
        check_control("p1y", p1y)?;
        check_control("p2x", p2x)?;
        check_control("p2y", p2y)?;
        Ok(Self::from_points(p1x, p1y, p2x, p2y))
    }

    const fn from_points(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Self {
        Self {
            p1: Point::new(p1x, p1y),
            p2: Point::new(p2x, p2y),
        }
    }

    pub fn linear() -> Self {
        Self::LINEAR
    }

    pub fn ease() -> Self {
        Self::EASE
    }

    pub fn ease_in() -> Self {
        Self::EASE_IN
    }

    pub fn ease_out() -> Self {
        Self::EASE_OUT
    }

    pub fn ease_in_out() -> Self {
        Self::EASE_IN_OUT
    }

    pub fn p1(&self) -> Point {
        self.p1
    }

    pub fn p2(&self) -> Point {
        self.p2
    }

    /// `(p1x, p1y, p2x, p2y)`
    pub fn control_points(&self) -> (f64, f64, f64, f64) {
        (self.p1.x, self.p1.y, self.p2.x, self.p2.y)
    }

    /// Single-axis cubic at `t`, given that axis' control coordinates.
    ///
    /// Horner form of `3(1-t)²t·p1 + 3(1-t)t²·p2 + t³`.
    #[inline]
    pub fn coordinate(t: f64, p1: f64, p2: f64) -> f64 {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        ((a * t + b) * t + c) * t
    }

    /// First derivative of the single-axis cubic at `t`.
    #[inline]
    pub fn derivative(t: f64, p1: f64, p2: f64) -> f64 {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (3.0 * a * t + 2.0 * b) * t + c
    }

    fn axis_controls(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.p1.x, self.p2.x),
            Axis::Y => (self.p1.y, self.p2.y),
        }
    }

    /// Point on the curve at parameter `t`.
    ///
    /// `t = 0` and `t = 1` return the exact endpoints.
    pub fn evaluate(&self, t: f64) -> Result<Point> {
        if t == 0.0 || t == 1.0 {
            return Ok(Point::new(t, t));
        }
        if !(t > 0.0 && t < 1.0) {
            return Err(BezierError::OutOfRange {
                name: "t",
                value: t,
            });
        }

        Ok(Point {
            x: Self::coordinate(t, self.p1.x, self.p2.x),
            y: Self::coordinate(t, self.p1.y, self.p2.y),
        })
    }

    /// Find `t` such that the curve's `axis` coordinate equals `value`
    /// within `epsilon`.
    ///
    /// Runs up to eight Newton-Raphson steps from `t = value`, giving up early
    /// on a flat derivative, then falls back to bisection on `[0, 1]`. The
    /// bisection is bounded; if it never lands within `epsilon` the last
    /// midpoint is returned, so callers must tolerate `epsilon`-level error.
    pub fn solve_t(&self, value: f64, axis: Axis, epsilon: f64) -> Result<f64> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(BezierError::InvalidEpsilon(epsilon));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(BezierError::OutOfRange {
                name: match axis {
                    Axis::X => "x",
                    Axis::Y => "y",
                },
                value,
            });
        }

        let (p1, p2) = self.axis_controls(axis);

        let mut t = value;
        for _ in 0..NEWTON_ITERATIONS {
            let residual = Self::coordinate(t, p1, p2) - value;
            if residual.abs() < epsilon {
                return Ok(t);
            }
            let slope = Self::derivative(t, p1, p2);
            if slope.abs() < NEWTON_MIN_SLOPE {
                break;
            }
            t -= residual / slope;
        }

        tracing::trace!(value, ?axis, "newton did not converge, bisecting");

        let mut lo = 0.0_f64;
        let mut hi = 1.0_f64;
        t = value;
        let mut steps = 0;
        while lo < hi && steps < BISECTION_MAX_STEPS {
            let current = Self::coordinate(t, p1, p2);
            if (current - value).abs() < epsilon {
                return Ok(t);
            }
            if value > current {
                lo = t;
            } else {
                hi = t;
            }
            t = (hi - lo) * 0.5 + lo;
            steps += 1;
        }

        Ok(t)
    }

    pub fn solve_t_for_x(&self, x: f64, epsilon: f64) -> Result<f64> {
        self.solve_t(x, Axis::X, epsilon)
    }

    pub fn solve_t_for_y(&self, y: f64, epsilon: f64) -> Result<f64> {
        self.solve_t(y, Axis::Y, epsilon)
    }

    /// De Casteljau construction for `0 < t < 1`.
    fn aux_points(&self, t: f64) -> AuxPoints {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(1.0, 1.0);

        // First round
        let i0 = start.lerp(self.p1, t);
        let i1 = self.p1.lerp(self.p2, t);
        let i2 = self.p2.lerp(end, t);

        // Second round
        let j0 = i0.lerp(i1, t);
        let j1 = i1.lerp(i2, t);

        let k = j0.lerp(j1, t);

        AuxPoints { i0, i2, j0, j1, k }
    }

    /// Split the curve at `t` into the parts covering `[0, t]` and `[t, 1]`.
    ///
    /// Each half is renormalized so its own endpoints are `(0, 0)` and
    /// `(1, 1)`. At `t = 0` the left half is linear (zero duration) and the
    /// right half is a copy; `t = 1` is the mirror case.
    pub fn divide_at_t(&self, t: f64) -> Result<(CubicBezier, CubicBezier)> {
        if !(0.0..=1.0).contains(&t) {
            return Err(BezierError::OutOfRange {
                name: "t",
                value: t,
            });
        }
        if t == 0.0 {
            return Ok((Self::LINEAR, *self));
        }
        if t == 1.0 {
            return Ok((*self, Self::LINEAR));
        }

        let AuxPoints { i0, i2, j0, j1, k } = self.aux_points(t);

        let left = CubicBezier::new(
            snap_unit(i0.x / k.x),
            snap_unit(i0.y / k.y),
            snap_unit(j0.x / k.x),
            snap_unit(j0.y / k.y),
        )?;
        let right = CubicBezier::new(
            snap_unit((j1.x - k.x) / (1.0 - k.x)),
            snap_unit((j1.y - k.y) / (1.0 - k.y)),
            snap_unit((i2.x - k.x) / (1.0 - k.x)),
            snap_unit((i2.y - k.y) / (1.0 - k.y)),
        )?;

        Ok((left, right))
    }

    /// Split where the curve's x coordinate equals `x`.
    pub fn divide_at_x(&self, x: f64, epsilon: f64) -> Result<(CubicBezier, CubicBezier)> {
        if !(0.0..=1.0).contains(&x) {
            return Err(BezierError::OutOfRange {
                name: "x",
                value: x,
            });
        }
        let t = self.solve_t_for_x(x, epsilon)?;
        self.divide_at_t(t)
    }

    /// Split where the curve's y coordinate equals `y`.
    pub fn divide_at_y(&self, y: f64, epsilon: f64) -> Result<(CubicBezier, CubicBezier)> {
        if !(0.0..=1.0).contains(&y) {
            return Err(BezierError::OutOfRange {
                name: "y",
                value: y,
            });
        }
        let t = self.solve_t_for_y(y, epsilon)?;
        self.divide_at_t(t)
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::LINEAR
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cubic-bezier({}, {}, {}, {})",
            self.p1.x, self.p1.y, self.p2.x, self.p2.y
        )
    }
}

fn check_control(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(BezierError::InvalidControlPoint { name, value })
    }
}

// Renormalized split points can land a rounding error outside the unit square.
fn snap_unit(value: f64) -> f64 {
    if value < 0.0 && value > -UNIT_SNAP {
        0.0
    } else if value > 1.0 && value < 1.0 + UNIT_SNAP {
        1.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_endpoints_are_exact() {
        let curve = CubicBezier::new(0.3, 0.9, 0.7, 0.1).unwrap();
        assert_eq!(curve.evaluate(0.0).unwrap(), Point::new(0.0, 0.0));
        assert_eq!(curve.evaluate(1.0).unwrap(), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_evaluate_rejects_out_of_range() {
        let curve = CubicBezier::ease();
        assert!(matches!(
            curve.evaluate(-0.1),
            Err(BezierError::OutOfRange { name: "t", .. })
        ));
        assert!(curve.evaluate(1.5).is_err());
        assert!(curve.evaluate(f64::NAN).is_err());
    }

    #[test]
    fn test_evaluate_matches_bernstein_form() {
        let curve = CubicBezier::new(0.1, 0.8, 0.6, 0.3).unwrap();
        for i in 1..20 {
            let t = i as f64 / 20.0;
            let mt = 1.0 - t;
            let bx = 3.0 * mt * mt * t * 0.1 + 3.0 * mt * t * t * 0.6 + t * t * t;
            let by = 3.0 * mt * mt * t * 0.8 + 3.0 * mt * t * t * 0.3 + t * t * t;
            let p = curve.evaluate(t).unwrap();
            assert_abs_diff_eq!(p.x, bx, epsilon = 1e-12);
            assert_abs_diff_eq!(p.y, by, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let (p1, p2) = (0.25, 0.9);
        let h = 1e-6;
        for i in 1..10 {
            let t = i as f64 / 10.0;
            let numeric = (CubicBezier::coordinate(t + h, p1, p2)
                - CubicBezier::coordinate(t - h, p1, p2))
                / (2.0 * h);
            assert_abs_diff_eq!(CubicBezier::derivative(t, p1, p2), numeric, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_construction_validates_each_coordinate() {
        assert!(matches!(
            CubicBezier::new(1.5, 0.0, 0.0, 0.0),
            Err(BezierError::InvalidControlPoint { name: "p1x", .. })
        ));
        assert!(matches!(
            CubicBezier::new(0.0, -0.1, 0.0, 0.0),
            Err(BezierError::InvalidControlPoint { name: "p1y", .. })
        ));
        assert!(matches!(
            CubicBezier::new(0.0, 0.0, f64::NAN, 0.0),
            Err(BezierError::InvalidControlPoint { name: "p2x", .. })
        ));
        assert!(matches!(
            CubicBezier::new(0.0, 0.0, 0.0, 2.0),
            Err(BezierError::InvalidControlPoint { name: "p2y", .. })
        ));
        assert!(CubicBezier::new(0.0, 0.0, 0.0, 0.0).is_ok());
        assert!(CubicBezier::new(1.0, 1.0, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_solve_rejects_bad_epsilon() {
        let curve = CubicBezier::ease();
        assert_eq!(
            curve.solve_t(0.5, Axis::X, 0.0),
            Err(BezierError::InvalidEpsilon(0.0))
        );
        assert!(curve.solve_t(0.5, Axis::X, -1e-3).is_err());
        assert!(curve.solve_t(0.5, Axis::X, f64::INFINITY).is_err());
        assert!(curve.solve_t(0.5, Axis::X, f64::NAN).is_err());
    }

    #[test]
    fn test_solve_rejects_out_of_range_value() {
        let curve = CubicBezier::ease();
        assert!(matches!(
            curve.solve_t(1.2, Axis::Y, 1e-6),
            Err(BezierError::OutOfRange { name: "y", .. })
        ));
    }

    #[test]
    fn test_solve_flat_start_uses_bisection() {
        // x(t) = 3t² - 2t³ has slope 6e-7 at t = 1e-7, below the Newton threshold
        let curve = CubicBezier::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let t = curve.solve_t_for_x(1e-7, 1e-9).unwrap();
        let x = curve.evaluate(t).unwrap().x;
        assert_abs_diff_eq!(x, 1e-7, epsilon = 1e-9);
        assert!(t > 1e-4);
    }

    #[test]
    fn test_divide_degenerate_ends() {
        let curve = CubicBezier::ease();
        let (left, right) = curve.divide_at_t(0.0).unwrap();
        assert_eq!(left, CubicBezier::linear());
        assert_eq!(right, curve);

        let (left, right) = curve.divide_at_t(1.0).unwrap();
        assert_eq!(left, curve);
        assert_eq!(right, CubicBezier::linear());

        assert!(curve.divide_at_t(-0.01).is_err());
        assert!(curve.divide_at_t(1.01).is_err());
    }

    #[test]
    fn test_divide_at_x_validates_before_solving() {
        let curve = CubicBezier::ease();
        assert!(matches!(
            curve.divide_at_x(1.5, 1e-6),
            Err(BezierError::OutOfRange { name: "x", .. })
        ));
        assert!(matches!(
            curve.divide_at_y(0.5, 0.0),
            Err(BezierError::InvalidEpsilon(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            CubicBezier::ease().to_string(),
            "cubic-bezier(0.25, 0.1, 0.25, 1)"
        );
    }

    #[test]
    fn test_clone_is_independent_equal_copy() {
        let curve = CubicBezier::new(0.2, 0.4, 0.6, 0.8).unwrap();
        let copy = curve.clone();
        assert_eq!(copy.control_points(), (0.2, 0.4, 0.6, 0.8));
        assert_eq!(copy, curve);
    }
}
