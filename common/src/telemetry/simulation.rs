//! Deterministic drive cycle for bench testing without a sender.
//!
//! Pressure follows cold start, warm-up, hot idle, rev-up, cruise and
//! rev-down, then holds hot idle. Time is continuous seconds since boot.

use micromath::F32;

use super::JitterSource;
use crate::thresholds::{TEMP_SIM_MAX, TEMP_SIM_MIN};

#[inline]
fn lerp(
    from: f32,
    to: f32,
    fraction: f32,
) -> f32 {
    from + (to - from) * fraction
}

#[inline]
fn sin(x: f32) -> f32 { F32(x).sin().0 }

/// Curve value and jitter amplitude at `t` seconds.
fn pressure_curve(t: f32) -> (f32, f32) {
    let hot_idle = |t: f32| 11.0 + 2.0 * sin(0.5 * t);

    if t < 5.0 {
        (60.0, 2.0)
    } else if t < 15.0 {
        (lerp(60.0, 11.0, (t - 5.0) / 10.0), 1.5)
    } else if t < 30.0 {
        (hot_idle(t), 0.5)
    } else if t < 35.0 {
        (lerp(11.0, 51.0, (t - 30.0) / 5.0), 1.5)
    } else if t < 45.0 {
        (48.0 + 3.0 * sin(0.3 * t), 1.0)
    } else if t < 50.0 {
        (lerp(48.0, 11.0, (t - 45.0) / 5.0), 1.5)
    } else {
        (hot_idle(t), 0.5)
    }
}

/// Simulated oil pressure in psi, clamped to `[0, max_psi]`.
pub fn simulated_pressure<J: JitterSource>(
    elapsed_ms: u32,
    jitter: &mut J,
    max_psi: f32,
) -> f32 {
    let t = elapsed_ms as f32 / 1000.0;
    let (base, amplitude) = pressure_curve(t);
    (base + jitter.jitter(amplitude)).clamp(0.0, max_psi)
}

/// Simulated coolant temperature in degrees C.
pub fn simulated_temperature<J: JitterSource>(
    elapsed_ms: u32,
    jitter: &mut J,
) -> f32 {
    let t = elapsed_ms as f32 / 1000.0;

    let mut base = if t < 25.0 { lerp(60.0, 90.0, t / 25.0) } else { 90.0 + 2.0 * sin(0.2 * t) };

    // Heat soak spike
    if (40.0..45.0).contains(&t) {
        base += 12.0;
    }

    (base + jitter.jitter(1.0)).clamp(TEMP_SIM_MIN, TEMP_SIM_MAX)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::telemetry::{NoJitter, XorShiftJitter};

    fn at(seconds: f32) -> f32 { simulated_pressure((seconds * 1000.0) as u32, &mut NoJitter, 100.0) }

    #[test]
    fn test_cold_start_plateau() {
        assert_eq!(at(0.0), 60.0);
        assert_eq!(at(4.9), 60.0);
    }

    #[test]
    fn test_warm_up_ramp() {
        assert!((at(5.0) - 60.0).abs() < 1e-3);
        assert!((at(10.0) - 35.5).abs() < 1e-3);
        assert!(at(14.9) < 12.0);
    }

    #[test]
    fn test_hot_idle_band() {
        for s in 15..30 {
            let p = at(s as f32);
            assert!((8.9..=13.1).contains(&p), "{s}s -> {p}");
        }
    }

    #[test]
    fn test_rev_up_and_down() {
        assert!((at(32.5) - 31.0).abs() < 1e-3);
        assert!((at(47.5) - 29.5).abs() < 1e-3);
    }

    #[test]
    fn test_cruise_band() {
        for s in 35..45 {
            let p = at(s as f32);
            assert!((44.9..=51.1).contains(&p), "{s}s -> {p}");
        }
    }

    #[test]
    fn test_hot_idle_repeats_after_cycle() {
        for s in [50.0, 75.0, 600.0] {
            let p = at(s);
            assert!((8.9..=13.1).contains(&p), "{s}s -> {p}");
        }
    }

    #[test]
    fn test_pressure_respects_full_scale() {
        let p = simulated_pressure(1_000, &mut NoJitter, 40.0);
        assert_eq!(p, 40.0);
    }

    #[test]
    fn test_temperature_profile() {
        let t = |s: f32| simulated_temperature((s * 1000.0) as u32, &mut NoJitter);
        assert_eq!(t(0.0), 60.0);
        assert!((t(12.5) - 75.0).abs() < 1e-3);
        assert!((88.0..=92.0).contains(&t(30.0)));
        assert!(t(42.0) > 99.0);
        assert!((88.0..=92.0).contains(&t(50.0)));
    }

    proptest! {
        #[test]
        fn test_pressure_always_in_range(ms in any::<u32>(), seed in any::<u32>()) {
            let mut jitter = XorShiftJitter::new(seed);
            let p = simulated_pressure(ms, &mut jitter, 100.0);
            prop_assert!((0.0..=100.0).contains(&p));
        }

        #[test]
        fn test_temperature_always_in_range(ms in any::<u32>(), seed in any::<u32>()) {
            let mut jitter = XorShiftJitter::new(seed);
            let t = simulated_temperature(ms, &mut jitter);
            prop_assert!((TEMP_SIM_MIN..=TEMP_SIM_MAX).contains(&t));
        }
    }
}
