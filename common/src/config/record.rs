//! The runtime configuration record and its validation rules.

use crate::thresholds::{
    BRIGHTNESS_MAX,
    BRIGHTNESS_MIN,
    EMA_ALPHA_MAX,
    EMA_ALPHA_MIN,
    FADE_DURATION_MAX_MS,
    FADE_DURATION_MIN_MS,
    OIL_PRESSURE_MIN_SAFE,
    OIL_PRESSURE_MIN_WARN,
    TEMP_WARNING_HIGH,
};

/// Persisted key names. These double as HTML form field names, and are kept
/// within the 15 character limit of the flash key-value layer.
pub mod keys {
    pub const SIM_DATA: &str = "simData";
    pub const SIM_TEMP: &str = "simTemp";
    pub const SIM_HEADLIGHT: &str = "simHL";
    pub const SENSOR_MIN_V: &str = "sensMinV";
    pub const SENSOR_MAX_V: &str = "sensMaxV";
    pub const SENSOR_MAX_PSI: &str = "sensMaxP";
    pub const DIVIDER_R1: &str = "vdR1";
    pub const DIVIDER_R2: &str = "vdR2";
    pub const OIL_SAFE: &str = "oilSafe";
    pub const OIL_WARN: &str = "oilWarn";
    pub const TEMP_WARN: &str = "tempWarn";
    pub const BL_DAY: &str = "blDay";
    pub const BL_NIGHT: &str = "blNight";
    pub const BL_FADE: &str = "blFade";
    pub const EMA_ALPHA: &str = "emaAlpha";

    /// Number of persisted keys.
    pub const COUNT: usize = 15;

    /// Every key, in form order.
    pub const ALL: [&str; COUNT] = [
        SIM_DATA,
        SIM_TEMP,
        SIM_HEADLIGHT,
        SENSOR_MIN_V,
        SENSOR_MAX_V,
        SENSOR_MAX_PSI,
        DIVIDER_R1,
        DIVIDER_R2,
        OIL_SAFE,
        OIL_WARN,
        TEMP_WARN,
        BL_DAY,
        BL_NIGHT,
        BL_FADE,
        EMA_ALPHA,
    ];

    /// Longest key the storage layer accepts.
    pub const MAX_KEY_LEN: usize = 15;
}

const _: () = {
    let mut i = 0;
    while i < keys::ALL.len() {
        assert!(keys::ALL[i].len() <= keys::MAX_KEY_LEN);
        i += 1;
    }
};

/// Calibration and behavior parameters editable at runtime.
///
/// One instance exists, owned by [`ConfigStore`](super::ConfigStore). Every
/// other component borrows it per call and never keeps a copy across ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GaugeConfig {
    // Simulation toggles
    pub use_simulated_data: bool,
    pub use_simulated_temp: bool,
    pub use_simulated_headlight: bool,

    // Sensor calibration (Lowdoller 7990100: 0.5 V = 0 psi, 4.5 V = 100 psi)
    pub sensor_min_voltage: f32,
    pub sensor_max_voltage: f32,
    pub sensor_max_psi: f32,
    pub voltage_divider_r1: f32,
    pub voltage_divider_r2: f32,

    // Safety thresholds
    pub oil_pressure_min_safe: f32,
    pub oil_pressure_min_warn: f32,
    pub temp_warning_high: f32,

    // Backlight
    pub bl_brightness_day: i32,
    pub bl_brightness_night: i32,
    pub bl_fade_duration: i32,

    // Display
    pub ema_alpha: f32,
}

impl GaugeConfig {
    /// Factory defaults, used on first boot and after a reset.
    pub const DEFAULT: Self = Self {
        use_simulated_data: true,
        use_simulated_temp: true,
        use_simulated_headlight: true,
        sensor_min_voltage: 0.5,
        sensor_max_voltage: 4.5,
        sensor_max_psi: 100.0,
        voltage_divider_r1: 3900.0,
        voltage_divider_r2: 10000.0,
        oil_pressure_min_safe: OIL_PRESSURE_MIN_SAFE,
        oil_pressure_min_warn: OIL_PRESSURE_MIN_WARN,
        temp_warning_high: TEMP_WARNING_HIGH,
        bl_brightness_day: 255,
        bl_brightness_night: 80,
        bl_fade_duration: 500,
        ema_alpha: 0.15,
    };

    /// Fade duration in milliseconds, never negative.
    #[inline]
    pub const fn fade_duration_ms(&self) -> u32 {
        if self.bl_fade_duration < 0 {
            0
        } else {
            self.bl_fade_duration as u32
        }
    }

    /// Day preset as a PWM duty.
    #[inline]
    pub fn day_duty(&self) -> u8 { self.bl_brightness_day.clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX) as u8 }

    /// Night preset as a PWM duty.
    #[inline]
    pub fn night_duty(&self) -> u8 { self.bl_brightness_night.clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX) as u8 }

    /// Smoothing factor limited to the editable range.
    #[inline]
    pub fn smoothing_alpha(&self) -> f32 { self.ema_alpha.clamp(EMA_ALPHA_MIN, EMA_ALPHA_MAX) }

    /// Apply a form submission on top of this record.
    ///
    /// Fields missing from `update` (or that failed to parse) keep their current
    /// value. Invalid calibration pairs are reset to factory defaults and
    /// out-of-range numbers are clamped, never rejected.
    pub fn apply(
        &self,
        update: &ConfigUpdate,
    ) -> (Self, Corrections) {
        let mut next = *self;
        let mut corrections = Corrections::default();

        next.use_simulated_data = update.use_simulated_data;
        next.use_simulated_temp = update.use_simulated_temp;
        next.use_simulated_headlight = update.use_simulated_headlight;

        let mut take_f32 = |slot: &mut f32, field: Option<f32>| match field {
            Some(value) if value.is_finite() => *slot = value,
            _ => corrections.kept_prior += 1,
        };
        take_f32(&mut next.sensor_min_voltage, update.sensor_min_voltage);
        take_f32(&mut next.sensor_max_voltage, update.sensor_max_voltage);
        take_f32(&mut next.sensor_max_psi, update.sensor_max_psi);
        take_f32(&mut next.voltage_divider_r1, update.voltage_divider_r1);
        take_f32(&mut next.voltage_divider_r2, update.voltage_divider_r2);
        take_f32(&mut next.oil_pressure_min_safe, update.oil_pressure_min_safe);
        take_f32(&mut next.oil_pressure_min_warn, update.oil_pressure_min_warn);
        take_f32(&mut next.temp_warning_high, update.temp_warning_high);
        take_f32(&mut next.ema_alpha, update.ema_alpha);

        let mut take_i32 = |slot: &mut i32, field: Option<i32>| match field {
            Some(value) => *slot = value,
            None => corrections.kept_prior += 1,
        };
        take_i32(&mut next.bl_brightness_day, update.bl_brightness_day);
        take_i32(&mut next.bl_brightness_night, update.bl_brightness_night);
        take_i32(&mut next.bl_fade_duration, update.bl_fade_duration);

        corrections.merge(next.sanitize());
        (next, corrections)
    }

    /// Enforce the record invariants in place.
    ///
    /// Also run after loading, so a hand-edited or stale flash image cannot
    /// put the gauge into an invalid state.
    #[allow(clippy::neg_cmp_op_on_partial_ord)] // NaN must fail these checks too
    pub fn sanitize(&mut self) -> Corrections {
        let mut corrections = Corrections::default();

        let mut restore_non_finite = |slot: &mut f32, default: f32| {
            if !slot.is_finite() {
                *slot = default;
                corrections.defaults_restored += 1;
            }
        };
        restore_non_finite(&mut self.voltage_divider_r1, Self::DEFAULT.voltage_divider_r1);
        restore_non_finite(&mut self.oil_pressure_min_safe, Self::DEFAULT.oil_pressure_min_safe);
        restore_non_finite(&mut self.oil_pressure_min_warn, Self::DEFAULT.oil_pressure_min_warn);
        restore_non_finite(&mut self.temp_warning_high, Self::DEFAULT.temp_warning_high);
        restore_non_finite(&mut self.ema_alpha, Self::DEFAULT.ema_alpha);

        if !(self.voltage_divider_r2 > 0.0) {
            self.voltage_divider_r2 = Self::DEFAULT.voltage_divider_r2;
            corrections.divider_reset = true;
        }

        if !(self.sensor_max_psi > 0.0) {
            self.sensor_max_psi = Self::DEFAULT.sensor_max_psi;
            corrections.max_psi_reset = true;
        }

        if !(self.sensor_min_voltage < self.sensor_max_voltage) {
            self.sensor_min_voltage = Self::DEFAULT.sensor_min_voltage;
            self.sensor_max_voltage = Self::DEFAULT.sensor_max_voltage;
            corrections.voltage_range_reset = true;
        }

        let mut clamp_i32 = |slot: &mut i32, min: i32, max: i32| {
            let clamped = (*slot).clamp(min, max);
            if clamped != *slot {
                *slot = clamped;
                corrections.clamped += 1;
            }
        };
        clamp_i32(&mut self.bl_brightness_day, BRIGHTNESS_MIN, BRIGHTNESS_MAX);
        clamp_i32(&mut self.bl_brightness_night, BRIGHTNESS_MIN, BRIGHTNESS_MAX);
        clamp_i32(&mut self.bl_fade_duration, FADE_DURATION_MIN_MS, FADE_DURATION_MAX_MS);

        let alpha = self.ema_alpha.clamp(EMA_ALPHA_MIN, EMA_ALPHA_MAX);
        if alpha != self.ema_alpha {
            self.ema_alpha = alpha;
            corrections.clamped += 1;
        }

        corrections
    }
}

impl Default for GaugeConfig {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Update Request
// =============================================================================

/// A decoded save request.
///
/// Booleans come from checkboxes, where an absent field means `false`.
/// Numeric fields are `None` when missing or unparseable.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConfigUpdate {
    pub use_simulated_data: bool,
    pub use_simulated_temp: bool,
    pub use_simulated_headlight: bool,
    pub sensor_min_voltage: Option<f32>,
    pub sensor_max_voltage: Option<f32>,
    pub sensor_max_psi: Option<f32>,
    pub voltage_divider_r1: Option<f32>,
    pub voltage_divider_r2: Option<f32>,
    pub oil_pressure_min_safe: Option<f32>,
    pub oil_pressure_min_warn: Option<f32>,
    pub temp_warning_high: Option<f32>,
    pub bl_brightness_day: Option<i32>,
    pub bl_brightness_night: Option<i32>,
    pub bl_fade_duration: Option<i32>,
    pub ema_alpha: Option<f32>,
}

impl ConfigUpdate {
    /// An update that re-submits every field of `config` unchanged.
    pub const fn from_config(config: &GaugeConfig) -> Self {
        Self {
            use_simulated_data: config.use_simulated_data,
            use_simulated_temp: config.use_simulated_temp,
            use_simulated_headlight: config.use_simulated_headlight,
            sensor_min_voltage: Some(config.sensor_min_voltage),
            sensor_max_voltage: Some(config.sensor_max_voltage),
            sensor_max_psi: Some(config.sensor_max_psi),
            voltage_divider_r1: Some(config.voltage_divider_r1),
            voltage_divider_r2: Some(config.voltage_divider_r2),
            oil_pressure_min_safe: Some(config.oil_pressure_min_safe),
            oil_pressure_min_warn: Some(config.oil_pressure_min_warn),
            temp_warning_high: Some(config.temp_warning_high),
            bl_brightness_day: Some(config.bl_brightness_day),
            bl_brightness_night: Some(config.bl_brightness_night),
            bl_fade_duration: Some(config.bl_fade_duration),
            ema_alpha: Some(config.ema_alpha),
        }
    }
}

/// What validation changed while applying an update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Corrections {
    /// Numeric fields that were missing or unparseable and kept their value.
    pub kept_prior: u8,
    /// Divider R2 was not positive and went back to its default.
    pub divider_reset: bool,
    /// Sensor min voltage was not below max; both went back to defaults.
    pub voltage_range_reset: bool,
    /// Full-scale pressure was not positive and went back to its default.
    pub max_psi_reset: bool,
    /// Fields pulled back into their allowed range.
    pub clamped: u8,
    /// Non-finite fields that went back to their defaults.
    pub defaults_restored: u8,
}

impl Corrections {
    /// True when the update was stored exactly as submitted.
    pub const fn is_clean(&self) -> bool {
        self.kept_prior == 0
            && !self.divider_reset
            && !self.voltage_range_reset
            && !self.max_psi_reset
            && self.clamped == 0
            && self.defaults_restored == 0
    }

    fn merge(
        &mut self,
        other: Self,
    ) {
        self.kept_prior += other.kept_prior;
        self.divider_reset |= other.divider_reset;
        self.voltage_range_reset |= other.voltage_range_reset;
        self.max_psi_reset |= other.max_psi_reset;
        self.clamped += other.clamped;
        self.defaults_restored += other.defaults_restored;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_satisfy_invariants() {
        let mut config = GaugeConfig::DEFAULT;
        assert!(config.sanitize().is_clean());
        assert_eq!(config, GaugeConfig::DEFAULT);
    }

    #[test]
    fn test_negative_divider_resets_only_r2() {
        let mut update = ConfigUpdate::from_config(&GaugeConfig::DEFAULT);
        update.voltage_divider_r2 = Some(-5.0);
        update.voltage_divider_r1 = Some(4700.0);

        let (config, corrections) = GaugeConfig::DEFAULT.apply(&update);
        assert!(corrections.divider_reset);
        assert!(!corrections.voltage_range_reset);
        assert_eq!(config.voltage_divider_r2, 10000.0);
        assert_eq!(config.voltage_divider_r1, 4700.0);
    }

    #[test]
    fn test_zero_divider_is_invalid() {
        let mut update = ConfigUpdate::from_config(&GaugeConfig::DEFAULT);
        update.voltage_divider_r2 = Some(0.0);
        let (config, corrections) = GaugeConfig::DEFAULT.apply(&update);
        assert!(corrections.divider_reset);
        assert_eq!(config.voltage_divider_r2, GaugeConfig::DEFAULT.voltage_divider_r2);
    }

    #[test]
    fn test_inverted_voltage_range_resets_both() {
        let mut prior = GaugeConfig::DEFAULT;
        prior.sensor_min_voltage = 0.6;
        prior.sensor_max_voltage = 4.4;

        let mut update = ConfigUpdate::from_config(&prior);
        update.sensor_min_voltage = Some(5.0);
        update.sensor_max_voltage = Some(1.0);

        let (config, corrections) = prior.apply(&update);
        assert!(corrections.voltage_range_reset);
        assert_eq!(config.sensor_min_voltage, 0.5);
        assert_eq!(config.sensor_max_voltage, 4.5);
    }

    #[test]
    fn test_equal_voltages_reset_both() {
        let mut update = ConfigUpdate::from_config(&GaugeConfig::DEFAULT);
        update.sensor_min_voltage = Some(2.0);
        update.sensor_max_voltage = Some(2.0);
        let (config, _) = GaugeConfig::DEFAULT.apply(&update);
        assert_eq!(config.sensor_min_voltage, 0.5);
        assert_eq!(config.sensor_max_voltage, 4.5);
    }

    #[test]
    fn test_non_positive_full_scale_is_reset() {
        let mut update = ConfigUpdate::from_config(&GaugeConfig::DEFAULT);
        update.sensor_max_psi = Some(0.0);
        let (config, corrections) = GaugeConfig::DEFAULT.apply(&update);
        assert!(corrections.max_psi_reset);
        assert_eq!(config.sensor_max_psi, 100.0);
    }

    #[test]
    fn test_unparsed_field_keeps_prior_value() {
        let mut prior = GaugeConfig::DEFAULT;
        prior.sensor_max_psi = 150.0;

        let mut update = ConfigUpdate::from_config(&prior);
        update.sensor_max_psi = None;
        update.bl_fade_duration = None;

        let (config, corrections) = prior.apply(&update);
        assert_eq!(config.sensor_max_psi, 150.0);
        assert_eq!(config.bl_fade_duration, prior.bl_fade_duration);
        assert_eq!(corrections.kept_prior, 2);
    }

    #[test]
    fn test_non_finite_number_keeps_prior_value() {
        let mut update = ConfigUpdate::from_config(&GaugeConfig::DEFAULT);
        update.oil_pressure_min_warn = Some(f32::NAN);
        let (config, corrections) = GaugeConfig::DEFAULT.apply(&update);
        assert_eq!(config.oil_pressure_min_warn, OIL_PRESSURE_MIN_WARN);
        assert_eq!(corrections.kept_prior, 1);
    }

    #[test]
    fn test_ranges_are_clamped() {
        let mut update = ConfigUpdate::from_config(&GaugeConfig::DEFAULT);
        update.bl_brightness_day = Some(300);
        update.bl_brightness_night = Some(-20);
        update.bl_fade_duration = Some(9000);
        update.ema_alpha = Some(0.0);

        let (config, corrections) = GaugeConfig::DEFAULT.apply(&update);
        assert_eq!(config.bl_brightness_day, 255);
        assert_eq!(config.bl_brightness_night, 0);
        assert_eq!(config.bl_fade_duration, 5000);
        assert!((config.ema_alpha - 0.01).abs() < f32::EPSILON);
        assert_eq!(corrections.clamped, 4);
    }

    #[test]
    fn test_non_finite_fields_restore_defaults() {
        let mut config = GaugeConfig::DEFAULT;
        config.ema_alpha = f32::NAN;
        config.oil_pressure_min_safe = f32::NAN;
        config.oil_pressure_min_warn = f32::INFINITY;
        config.temp_warning_high = f32::NEG_INFINITY;
        config.voltage_divider_r1 = f32::NAN;

        let corrections = config.sanitize();
        assert_eq!(config, GaugeConfig::DEFAULT);
        assert_eq!(corrections.defaults_restored, 5);
        assert!(!corrections.is_clean());
    }

    #[test]
    fn test_checkboxes_absent_mean_false() {
        let update = ConfigUpdate::default();
        let (config, _) = GaugeConfig::DEFAULT.apply(&update);
        assert!(!config.use_simulated_data);
        assert!(!config.use_simulated_temp);
        assert!(!config.use_simulated_headlight);
    }

    #[test]
    fn test_resaving_valid_config_is_identity() {
        let mut prior = GaugeConfig::DEFAULT;
        prior.oil_pressure_min_warn = 15.0;
        prior.bl_brightness_night = 40;
        prior.use_simulated_temp = false;

        let (config, corrections) = prior.apply(&ConfigUpdate::from_config(&prior));
        assert_eq!(config, prior);
        assert!(corrections.is_clean());
    }

    #[test]
    fn test_duty_accessors_clamp() {
        let mut config = GaugeConfig::DEFAULT;
        config.bl_brightness_day = 400;
        config.bl_brightness_night = -1;
        config.bl_fade_duration = -10;
        assert_eq!(config.day_duty(), 255);
        assert_eq!(config.night_duty(), 0);
        assert_eq!(config.fade_duration_ms(), 0);
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, a) in keys::ALL.iter().enumerate() {
            for b in &keys::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
