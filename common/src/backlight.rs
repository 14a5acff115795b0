//! Headlight-driven day/night backlight fade.
//!
//! Turning the headlights on dims the panel to the night preset, turning them
//! off restores the day preset. Each change fades linearly over the configured
//! duration; timestamps are wrapping `u32` milliseconds.

use crate::config::GaugeConfig;

/// Period of the simulated headlight switch.
pub const SIMULATED_HEADLIGHT_PERIOD_MS: u32 = 10_000;

/// Simulated headlight switch: off for the first period, then toggling.
#[inline]
pub const fn simulated_headlight(elapsed_ms: u32) -> bool { (elapsed_ms / SIMULATED_HEADLIGHT_PERIOD_MS) % 2 == 1 }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FadeState {
    Steady(u8),
    Fading { from: u8, to: u8, start_ms: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BacklightController {
    state: FadeState,
    headlight_on: bool,
}

impl BacklightController {
    /// Start at the preset matching the headlight, without fading.
    pub fn new(
        headlight_on: bool,
        config: &GaugeConfig,
    ) -> Self {
        Self { state: FadeState::Steady(target_for(headlight_on, config)), headlight_on }
    }

    #[inline]
    pub const fn state(&self) -> FadeState { self.state }

    #[inline]
    pub const fn headlight_on(&self) -> bool { self.headlight_on }

    /// Advance the fade and return the duty to apply.
    ///
    /// A headlight edge starts a fade from the current brightness. A preset
    /// edited while steady also fades to the new value.
    pub fn update(
        &mut self,
        headlight_on: bool,
        now_ms: u32,
        config: &GaugeConfig,
    ) -> u8 {
        let target = target_for(headlight_on, config);

        let edge = headlight_on != self.headlight_on;
        self.headlight_on = headlight_on;

        let current = self.brightness_at(now_ms, config);
        match self.state {
            FadeState::Steady(level) if level != target => {
                self.state = FadeState::Fading { from: level, to: target, start_ms: now_ms };
            }
            FadeState::Fading { to, .. } if edge || to != target => {
                self.state = FadeState::Fading { from: current, to: target, start_ms: now_ms };
            }
            _ => {}
        }

        self.step(now_ms, config)
    }

    fn step(
        &mut self,
        now_ms: u32,
        config: &GaugeConfig,
    ) -> u8 {
        let level = self.brightness_at(now_ms, config);
        if let FadeState::Fading { to, start_ms, .. } = self.state {
            if now_ms.wrapping_sub(start_ms) >= config.fade_duration_ms() {
                self.state = FadeState::Steady(to);
                return to;
            }
        }
        level
    }

    /// Brightness at `now_ms` without advancing state.
    pub fn brightness_at(
        &self,
        now_ms: u32,
        config: &GaugeConfig,
    ) -> u8 {
        match self.state {
            FadeState::Steady(level) => level,
            FadeState::Fading { from, to, start_ms } => {
                fade_level(from, to, now_ms.wrapping_sub(start_ms), config.fade_duration_ms())
            }
        }
    }
}

#[inline]
fn target_for(
    headlight_on: bool,
    config: &GaugeConfig,
) -> u8 {
    if headlight_on { config.night_duty() } else { config.day_duty() }
}

/// Linear interpolation from `from` to `to`, exact at both ends.
pub fn fade_level(
    from: u8,
    to: u8,
    elapsed_ms: u32,
    duration_ms: u32,
) -> u8 {
    if elapsed_ms >= duration_ms {
        return to;
    }
    let fraction = elapsed_ms as f32 / duration_ms as f32;
    let level = from as f32 + (to as f32 - from as f32) * fraction;
    level.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn config(fade_ms: i32) -> GaugeConfig {
        let mut c = GaugeConfig::DEFAULT;
        c.bl_fade_duration = fade_ms;
        c
    }

    #[test]
    fn test_boot_matches_headlight() {
        let c = config(500);
        assert_eq!(BacklightController::new(false, &c).state(), FadeState::Steady(255));
        assert_eq!(BacklightController::new(true, &c).state(), FadeState::Steady(80));
    }

    #[test]
    fn test_headlight_on_fades_to_night() {
        let c = config(500);
        let mut bl = BacklightController::new(false, &c);

        assert_eq!(bl.update(true, 1_000, &c), 255);
        let mid = bl.update(true, 1_250, &c);
        assert!(mid < 255 && mid > 80, "{mid}");
        assert_eq!(bl.update(true, 1_500, &c), 80);
        assert_eq!(bl.state(), FadeState::Steady(80));
    }

    #[test]
    fn test_zero_duration_snaps_same_tick() {
        let c = config(0);
        let mut bl = BacklightController::new(false, &c);
        assert_eq!(bl.update(true, 5, &c), 80);
        assert_eq!(bl.state(), FadeState::Steady(80));
    }

    #[test]
    fn test_reversal_starts_from_current_level() {
        let c = config(1000);
        let mut bl = BacklightController::new(false, &c);
        bl.update(true, 0, &c);
        let halfway = bl.update(true, 500, &c);

        bl.update(false, 500, &c);
        assert_eq!(bl.state(), FadeState::Fading { from: halfway, to: 255, start_ms: 500 });
        assert_eq!(bl.update(false, 1_500, &c), 255);
    }

    #[test]
    fn test_fade_across_timer_rollover() {
        let c = config(500);
        let mut bl = BacklightController::new(false, &c);
        let start = u32::MAX - 100;
        bl.update(true, start, &c);
        let mid = bl.update(true, start.wrapping_add(250), &c);
        assert!(mid < 255 && mid > 80);
        assert_eq!(bl.update(true, start.wrapping_add(500), &c), 80);
    }

    #[test]
    fn test_preset_change_while_steady_fades() {
        let mut c = config(500);
        let mut bl = BacklightController::new(false, &c);
        c.bl_brightness_day = 200;
        bl.update(false, 100, &c);
        assert_eq!(bl.state(), FadeState::Fading { from: 255, to: 200, start_ms: 100 });
        assert_eq!(bl.update(false, 600, &c), 200);
    }

    #[test]
    fn test_simulated_headlight_toggles_every_period() {
        assert!(!simulated_headlight(0));
        assert!(!simulated_headlight(9_999));
        assert!(simulated_headlight(10_000));
        assert!(!simulated_headlight(20_000));
    }

    proptest! {
        #[test]
        fn test_fade_endpoints(from in any::<u8>(), to in any::<u8>(), duration in 1u32..5000) {
            prop_assert_eq!(fade_level(from, to, 0, duration), from);
            prop_assert_eq!(fade_level(from, to, duration, duration), to);
            prop_assert_eq!(fade_level(from, to, duration + 1, duration), to);
        }

        #[test]
        fn test_fade_is_monotonic(from in any::<u8>(), to in any::<u8>(), duration in 1u32..5000, a in 0u32..6000, b in 0u32..6000) {
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            let x = fade_level(from, to, early, duration);
            let y = fade_level(from, to, late, duration);
            if to >= from {
                prop_assert!(x <= y && y <= to && x >= from);
            } else {
                prop_assert!(x >= y && y >= to && x <= from);
            }
        }
    }
}
