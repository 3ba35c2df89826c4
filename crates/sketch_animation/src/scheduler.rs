//! Frame scheduler
//!
//! Sequences the per-frame work of one animated surface. The scheduler does
//! not own a timer: the host (or the runtime registry) re-arms the next frame
//! and then calls [`FrameScheduler::tick`] with the current wall-clock time.
//!
//! Per tick, in order:
//!
//! 1. first tick only: `setup`
//! 2. pending resize: re-apply the surface size, then the `resize` callback
//! 3. if running and the throttle counter is at phase 0: advance the clock,
//!    `update`, clear (when auto-clear applies), `draw`
//! 4. advance the throttle counter modulo the interval

/// Timers of one animated surface, in milliseconds
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    running: bool,
    now: f64,
    dt: f64,
    millis: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or keep) running, restarting timing from `wall`.
    ///
    /// Resetting `now` here is what keeps a resumed loop from reporting the
    /// whole pause as one frame.
    pub fn start(&mut self, wall: f64) {
        self.now = wall;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self, wall: f64) {
        if self.running {
            self.stop();
        } else {
            self.start(wall);
        }
    }

    /// Record a frame at `wall` and return its delta. Never negative.
    pub fn advance(&mut self, wall: f64) -> f64 {
        let dt = (wall - self.now).max(0.0);
        self.dt = dt;
        self.millis += dt;
        self.now = wall;
        dt
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Wall-clock time of the last start or frame
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Duration of the last rendered frame
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Accumulated running time
    pub fn millis(&self) -> f64 {
        self.millis
    }
}

/// The surface a scheduler drives
///
/// Implemented by the runtime's animation context. Callback-invoking methods
/// are expected to be no-ops when the collaborator registered nothing.
pub trait FrameTarget {
    fn clock(&mut self) -> &mut FrameClock;

    /// One-time setup callback
    fn setup(&mut self);

    /// Recompute dimensions and write them to the backing surface
    fn apply_size(&mut self);

    /// Resize callback
    fn resized(&mut self);

    fn update(&mut self);

    /// Whether the surface should be cleared between update and draw
    fn auto_clear(&self) -> bool;

    fn clear(&mut self);

    fn draw(&mut self);

    /// A callback tore the target down; the rest of the tick is skipped.
    fn halted(&self) -> bool {
        false
    }
}

/// What a tick ended up doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running: heartbeat only
    Idle,
    /// Running, but skipped by the interval throttle
    Throttled,
    /// update and draw ran
    Rendered,
    /// A callback halted the target mid-tick
    Halted,
}

/// Per-surface frame sequencing
#[derive(Clone, Debug)]
pub struct FrameScheduler {
    interval: u32,
    counter: u32,
    setup_done: bool,
    resize_pending: bool,
    ticks: u64,
}

impl FrameScheduler {
    /// `interval` is the throttle divisor: only every `interval`-th tick
    /// renders. Values below 1 are treated as 1.
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            counter: 0,
            setup_done: false,
            resize_pending: true,
            ticks: 0,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Number of ticks run so far, rendered or not
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Apply a size change now.
    ///
    /// The `resize` callback fires immediately once setup has run; before
    /// that it is deferred to the first tick, which runs it right after
    /// `setup`.
    pub fn resize<T: FrameTarget>(&mut self, target: &mut T) {
        target.apply_size();
        if self.setup_done {
            target.resized();
            self.resize_pending = false;
        } else {
            self.resize_pending = true;
        }
    }

    /// Run one frame at wall-clock time `wall` (milliseconds).
    pub fn tick<T: FrameTarget>(&mut self, wall: f64, target: &mut T) -> TickOutcome {
        self.ticks += 1;

        if !self.setup_done {
            self.setup_done = true;
            target.setup();
            if target.halted() {
                return TickOutcome::Halted;
            }
        }

        if self.resize_pending {
            self.resize_pending = false;
            target.apply_size();
            target.resized();
            if target.halted() {
                return TickOutcome::Halted;
            }
        }

        let phase = self.counter;
        self.counter = (self.counter + 1) % self.interval;

        if !target.clock().is_running() {
            return TickOutcome::Idle;
        }
        if phase != 0 {
            return TickOutcome::Throttled;
        }

        let dt = target.clock().advance(wall);
        tracing::trace!(tick = self.ticks, dt, "frame");

        target.update();
        if target.halted() {
            return TickOutcome::Halted;
        }

        if target.auto_clear() {
            target.clear();
        }

        target.draw();
        if target.halted() {
            return TickOutcome::Halted;
        }

        TickOutcome::Rendered
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(1)
    }
}
