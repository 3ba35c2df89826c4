//! Frame callback primitives
//!
//! A [`FrameSource`] hands out one-shot frame requests. Hosts with a native
//! per-refresh callback implement it directly; hosts without one get
//! [`TimerFrameSource`], which paces requests to roughly 16ms.

use std::collections::BTreeMap;

/// Target frame period of the timer emulation, in milliseconds
pub const TIMER_FRAME_MS: f64 = 16.0;

/// Identifies one pending frame request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(pub u64);

/// Best-effort per-refresh callback source
pub trait FrameSource {
    /// Ask for one frame after `now`.
    fn request_frame(&mut self, now: f64) -> FrameRequestId;

    /// Forget a request. Unknown or already-fired ids are ignored.
    fn cancel_frame(&mut self, id: FrameRequestId);

    /// Requests whose frame has arrived by `now`, in firing order.
    ///
    /// Returned requests are consumed.
    fn take_ready(&mut self, now: f64) -> Vec<FrameRequestId>;

    /// Earliest time a pending request becomes ready, if known
    fn next_deadline(&self) -> Option<f64> {
        None
    }

    /// Whether this source is the host's own refresh primitive
    fn is_native(&self) -> bool;
}

/// Timer-based emulation of a per-refresh callback
///
/// Each request is scheduled `max(0, 16 - (now - then))` milliseconds out,
/// where `then` is the due time of the previous request, so a steady caller
/// settles at one frame per 16ms.
#[derive(Debug, Default)]
pub struct TimerFrameSource {
    next_id: u64,
    then: f64,
    pending: BTreeMap<FrameRequestId, f64>,
}

impl TimerFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for TimerFrameSource {
    fn request_frame(&mut self, now: f64) -> FrameRequestId {
        let delay = (TIMER_FRAME_MS - (now - self.then)).max(0.0);
        let due = now + delay;
        self.then = due;

        self.next_id += 1;
        let id = FrameRequestId(self.next_id);
        self.pending.insert(id, due);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.pending.remove(&id);
    }

    fn take_ready(&mut self, now: f64) -> Vec<FrameRequestId> {
        let mut ready: Vec<(f64, FrameRequestId)> = self
            .pending
            .iter()
            .filter(|(_, due)| **due <= now)
            .map(|(id, due)| (*due, *id))
            .collect();
        ready.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        for (_, id) in &ready {
            self.pending.remove(id);
        }
        ready.into_iter().map(|(_, id)| id).collect()
    }

    fn next_deadline(&self) -> Option<f64> {
        self.pending.values().copied().min_by(|a, b| a.total_cmp(b))
    }

    fn is_native(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_is_paced() {
        let mut frames = TimerFrameSource::new();
        frames.request_frame(0.0);
        assert_eq!(frames.next_deadline(), Some(16.0));
    }

    #[test]
    fn test_late_request_fires_immediately() {
        let mut frames = TimerFrameSource::new();
        frames.request_frame(0.0); // due 16
        let late = frames.request_frame(100.0);
        assert_eq!(frames.take_ready(100.0), vec![FrameRequestId(1), late]);
    }

    #[test]
    fn test_steady_cadence() {
        let mut frames = TimerFrameSource::new();
        let mut now = 0.0;
        let mut dues = Vec::new();
        for _ in 0..4 {
            frames.request_frame(now);
            let due = frames.next_deadline().unwrap();
            dues.push(due);
            assert_eq!(frames.take_ready(due).len(), 1);
            now = due;
        }
        assert_eq!(dues, vec![16.0, 32.0, 48.0, 64.0]);
    }

    #[test]
    fn test_not_ready_before_deadline() {
        let mut frames = TimerFrameSource::new();
        frames.request_frame(0.0);
        assert!(frames.take_ready(10.0).is_empty());
        assert_eq!(frames.take_ready(16.0).len(), 1);
        assert!(frames.take_ready(100.0).is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut frames = TimerFrameSource::new();
        let id = frames.request_frame(0.0);
        frames.cancel_frame(id);
        frames.cancel_frame(id);
        assert_eq!(frames.pending_count(), 0);
        assert!(frames.take_ready(1000.0).is_empty());
        assert!(!frames.is_native());
    }
}
