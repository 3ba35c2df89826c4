//! Easing functions for animations

use crate::bezier::CubicBezier;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Precision used when inverting a bezier timing curve
const EASING_EPSILON: f64 = 1e-7;

/// Easing function type
///
/// The CSS keywords (`Ease`, `EaseIn`, `EaseOut`, `EaseInOut`) are the bezier
/// presets; the polynomial variants are closed-form.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    Bezier(CubicBezier),
}

impl Easing {
    /// Timing curve behind this easing, if it is bezier based
    pub fn curve(&self) -> Option<CubicBezier> {
        match self {
            Easing::Linear => Some(CubicBezier::LINEAR),
            Easing::Ease => Some(CubicBezier::EASE),
            Easing::EaseIn => Some(CubicBezier::EASE_IN),
            Easing::EaseOut => Some(CubicBezier::EASE_OUT),
            Easing::EaseInOut => Some(CubicBezier::EASE_IN_OUT),
            Easing::Bezier(curve) => Some(*curve),
            _ => None,
        }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    ///
    /// Progress outside the unit range is clamped. Bezier easings treat the
    /// progress as the curve's x coordinate and return the matching y.
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Ease
            | Easing::EaseIn
            | Easing::EaseOut
            | Easing::EaseInOut
            | Easing::Bezier(_) => match self.curve() {
                Some(curve) => bezier_ease(&curve, t),
                None => t,
            },
        }
    }
}

/// y for the given x on a timing curve.
fn bezier_ease(curve: &CubicBezier, x: f64) -> f64 {
    // Endpoints are always exact
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    // x is in (0, 1) and epsilon is a valid constant, so neither call can fail
    curve
        .solve_t_for_x(x, EASING_EPSILON)
        .and_then(|t| curve.evaluate(t.clamp(0.0, 1.0)))
        .map(|p| p.y)
        .unwrap_or(x)
}

/// Unrecognized easing name
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown easing: {0}")]
pub struct ParseEasingError(pub String);

impl FromStr for Easing {
    type Err = ParseEasingError;

    /// Accepts CSS keywords (`ease-in-out`), camel case (`easeInOut`), the
    /// polynomial names (`ease-in-quad`), and `cubic-bezier(a, b, c, d)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(args) = trimmed
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let values: Vec<f64> = args
                .split(',')
                .map(|v| v.trim().parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|_| ParseEasingError(s.to_string()))?;
            if let [p1x, p1y, p2x, p2y] = values[..] {
                return CubicBezier::new(p1x, p1y, p2x, p2y)
                    .map(Easing::Bezier)
                    .map_err(|_| ParseEasingError(s.to_string()));
            }
            return Err(ParseEasingError(s.to_string()));
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "linear" => Ok(Easing::Linear),
            "ease" => Ok(Easing::Ease),
            "easein" => Ok(Easing::EaseIn),
            "easeout" => Ok(Easing::EaseOut),
            "easeinout" => Ok(Easing::EaseInOut),
            "easeinquad" => Ok(Easing::EaseInQuad),
            "easeoutquad" => Ok(Easing::EaseOutQuad),
            "easeinoutquad" => Ok(Easing::EaseInOutQuad),
            "easeincubic" => Ok(Easing::EaseInCubic),
            "easeoutcubic" => Ok(Easing::EaseOutCubic),
            "easeinoutcubic" => Ok(Easing::EaseInOutCubic),
            _ => Err(ParseEasingError(s.to_string())),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::Ease => f.write_str("ease"),
            Easing::EaseIn => f.write_str("ease-in"),
            Easing::EaseOut => f.write_str("ease-out"),
            Easing::EaseInOut => f.write_str("ease-in-out"),
            Easing::EaseInQuad => f.write_str("ease-in-quad"),
            Easing::EaseOutQuad => f.write_str("ease-out-quad"),
            Easing::EaseInOutQuad => f.write_str("ease-in-out-quad"),
            Easing::EaseInCubic => f.write_str("ease-in-cubic"),
            Easing::EaseOutCubic => f.write_str("ease-out-cubic"),
            Easing::EaseInOutCubic => f.write_str("ease-in-out-cubic"),
            Easing::Bezier(curve) => write!(f, "{curve}"),
        }
    }
}
