use std::time::{Duration, Instant};

/// Identifies one pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Timing capability that drives the simulation one frame at a time.
pub trait FrameScheduler {
    /// Asks for one more frame. Replaces any pending request.
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraws `handle` if it is still pending.
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Monotonic timestamp in milliseconds.
    fn now(&self) -> f64;
}

/// Fixed-rate frame source for the terminal main loop.
///
/// The clock advances by real elapsed time, clamped to a few frame intervals
/// so a stalled terminal never hands the simulation a huge step.
pub struct FrameLoop {
    interval: Duration,
    last_wake: Instant,
    clock_ms: f64,
    pending: Option<FrameHandle>,
    next_id: u64,
}

const MAX_FRAMES_PER_WAKE: u32 = 3;

impl FrameLoop {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            last_wake: Instant::now(),
            clock_ms: 0.0,
            pending: None,
            next_id: 0,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// How long the caller may block before the next frame is due.
    pub fn time_until_due(&self) -> Duration {
        if !self.is_scheduled() {
            return self.interval * MAX_FRAMES_PER_WAKE;
        }
        self.interval.saturating_sub(self.last_wake.elapsed())
    }

    /// Consumes the pending request if its frame is due, returning the frame
    /// timestamp.
    pub fn next_frame(&mut self) -> Option<f64> {
        if self.pending.is_none() || self.last_wake.elapsed() < self.interval {
            return None;
        }
        self.pending = None;

        let now = Instant::now();
        let elapsed = now
            .duration_since(self.last_wake)
            .min(self.interval * MAX_FRAMES_PER_WAKE);
        self.last_wake = now;
        self.clock_ms += elapsed.as_secs_f64() * 1000.0;
        Some(self.clock_ms)
    }
}

impl FrameScheduler for FrameLoop {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn now(&self) -> f64 {
        let elapsed = self
            .last_wake
            .elapsed()
            .min(self.interval * MAX_FRAMES_PER_WAKE);
        self.clock_ms + elapsed.as_secs_f64() * 1000.0
    }
}

/// Scheduler driven by hand from tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct ManualScheduler {
    pub(crate) now_ms: f64,
    pub(crate) pending: Option<FrameHandle>,
    pub(crate) requests: u64,
    pub(crate) cancels: u64,
}

#[cfg(test)]
impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.requests += 1;
        let handle = FrameHandle(self.requests);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancels += 1;
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn now(&self) -> f64 {
        self.now_ms
    }
}
