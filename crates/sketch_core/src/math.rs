//! Math helpers for collaborators
//!
//! Interpolation, range mapping, and randomization primitives used by code
//! built on top of the runtime (particle placement, lifetimes, and so on).

use std::time::{SystemTime, UNIX_EPOCH};

pub const TWO_PI: f64 = std::f64::consts::PI * 2.0;
pub const HALF_PI: f64 = std::f64::consts::PI / 2.0;
pub const QUARTER_PI: f64 = std::f64::consts::PI / 4.0;

/// Linear interpolation between `min` and `max`.
#[inline]
pub fn lerp(min: f64, max: f64, amount: f64) -> f64 {
    min + amount * (max - min)
}

/// Map `num` from the range `[min_a, max_a]` onto `[min_b, max_b]`.
///
/// The result is not clamped; values outside the source range extrapolate.
#[inline]
pub fn map_range(num: f64, min_a: f64, max_a: f64, min_b: f64, max_b: f64) -> f64 {
    (num - min_a) / (max_a - min_a) * (max_b - min_b) + min_b
}

// xorshift32 never leaves zero, so a zero seed is replaced.
const FALLBACK_SEED: u32 = 0x9E37_79B9;

/// Small seeded pseudo-random source (xorshift32).
///
/// Not suitable for anything security related. Deterministic for a given
/// seed, which keeps animation tests reproducible.
#[derive(Clone, Debug)]
pub struct Random {
    state: u32,
}

impl Random {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { FALLBACK_SEED } else { seed },
        }
    }

    /// Seed from the system clock.
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(FALLBACK_SEED);
        Self::new(nanos)
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform value in `[0, max)`.
    pub fn below(&mut self, max: f64) -> f64 {
        self.next_f64() * max
    }

    /// Uniform value in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Pick a random element, `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.next_f64() * items.len() as f64) as usize;
        items.get(index.min(items.len() - 1))
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::from_time()
    }
}
