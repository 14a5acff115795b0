//! Rollover-safe interval scheduling on a wrapping millisecond counter.

/// Telemetry tick interval.
pub const TELEMETRY_INTERVAL_MS: u32 = 100;

/// Status line interval.
pub const STATUS_INTERVAL_MS: u32 = 1_000;

/// True once `interval_ms` has passed since `last_ms`, across counter wrap.
#[inline]
pub const fn due_now(
    last_ms: u32,
    interval_ms: u32,
    now_ms: u32,
) -> bool {
    now_ms.wrapping_sub(last_ms) >= interval_ms
}

/// A periodic deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalTimer {
    interval_ms: u32,
    last_ms: u32,
}

impl IntervalTimer {
    /// First fire is one interval after `now_ms`.
    pub const fn new(
        interval_ms: u32,
        now_ms: u32,
    ) -> Self {
        Self { interval_ms, last_ms: now_ms }
    }

    /// Returns true and re-arms when due.
    pub fn poll(
        &mut self,
        now_ms: u32,
    ) -> bool {
        if due_now(self.last_ms, self.interval_ms, now_ms) {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}
