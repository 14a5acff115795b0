//! Headlight switch debounce.
//!
//! The switch line comes from the car loom and chatters when the stalk is
//! moved, so a level only counts once it has held for [`SETTLE_MS`].

/// Time a new level must hold before it is accepted.
pub const SETTLE_MS: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwitchDebounce {
    stable: bool,
    /// Level seen and when it was first seen.
    pending: Option<(bool, u32)>,
}

impl SwitchDebounce {
    pub const fn new(initial: bool) -> Self { Self { stable: initial, pending: None } }

    #[inline]
    pub const fn state(&self) -> bool { self.stable }

    /// Feed the raw level at `now_ms`. Returns the debounced level.
    pub fn update(
        &mut self,
        raw: bool,
        now_ms: u32,
    ) -> bool {
        if raw == self.stable {
            self.pending = None;
            return self.stable;
        }

        match self.pending {
            Some((level, since)) if level == raw => {
                if now_ms.wrapping_sub(since) >= SETTLE_MS {
                    self.stable = raw;
                    self.pending = None;
                }
            }
            _ => self.pending = Some((raw, now_ms)),
        }
        self.stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_must_hold() {
        let mut switch = SwitchDebounce::new(false);
        assert!(!switch.update(true, 0));
        assert!(!switch.update(true, 49));
        assert!(switch.update(true, 50));
    }

    #[test]
    fn test_chatter_is_ignored() {
        let mut switch = SwitchDebounce::new(false);
        for t in 0..20 {
            switch.update(t % 2 == 0, t * 10);
        }
        assert!(!switch.state());
    }

    #[test]
    fn test_bounce_restarts_settle_time() {
        let mut switch = SwitchDebounce::new(true);
        switch.update(false, 0);
        switch.update(true, 30);
        assert!(switch.update(false, 40));
        assert!(!switch.update(false, 90));
    }

    #[test]
    fn test_settle_across_rollover() {
        let mut switch = SwitchDebounce::new(false);
        switch.update(true, u32::MAX - 10);
        assert!(switch.update(true, 40));
    }
}
