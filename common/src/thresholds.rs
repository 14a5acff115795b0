//! Compiled threshold and limit constants.
//!
//! Runtime-editable thresholds (`oilSafe`, `oilWarn`, `tempWarn`) live in
//! [`GaugeConfig`](crate::config::GaugeConfig); the values here are their
//! factory defaults plus the fixed limits the configuration validator and the
//! sensor math clamp against.
//!
//! # Compile-Time Validation
//!
//! Each group carries `const` assertions on ordering, so a bad edit fails the
//! build instead of producing an inverted zone.

// =============================================================================
// Oil Pressure (2GR-FE service manual: 11.6 psi hot idle, 55.5 psi @ 6000 rpm)
// =============================================================================

/// Below this the needle is in the critical zone.
pub const OIL_PRESSURE_MIN_SAFE: f32 = 8.0;

/// Below this the needle is in the warning zone.
pub const OIL_PRESSURE_MIN_WARN: f32 = 10.0;

const _: () = assert!(OIL_PRESSURE_MIN_SAFE < OIL_PRESSURE_MIN_WARN);

// =============================================================================
// Coolant Temperature
// =============================================================================

/// Above this the coolant readout switches to the high zone.
pub const TEMP_WARNING_HIGH: f32 = 110.0;

/// Lower clamp of the simulated coolant curve.
pub const TEMP_SIM_MIN: f32 = 60.0;

/// Upper clamp of the simulated coolant curve.
pub const TEMP_SIM_MAX: f32 = 120.0;

/// Value reported when no coolant sender is wired.
pub const TEMP_PLACEHOLDER: f32 = 90.0;

const _: () = assert!(TEMP_SIM_MIN < TEMP_SIM_MAX);
const _: () = assert!(TEMP_PLACEHOLDER >= TEMP_SIM_MIN && TEMP_PLACEHOLDER <= TEMP_SIM_MAX);

// =============================================================================
// Display
// =============================================================================

/// Minimum change of the smoothed value that triggers a redraw.
pub const REDRAW_THRESHOLD: f32 = 0.5;

// =============================================================================
// Editable Field Limits
// =============================================================================

pub const BRIGHTNESS_MIN: i32 = 0;
pub const BRIGHTNESS_MAX: i32 = 255;

pub const FADE_DURATION_MIN_MS: i32 = 0;
pub const FADE_DURATION_MAX_MS: i32 = 5000;

pub const EMA_ALPHA_MIN: f32 = 0.01;
pub const EMA_ALPHA_MAX: f32 = 1.0;

const _: () = assert!(BRIGHTNESS_MIN < BRIGHTNESS_MAX);
const _: () = assert!(FADE_DURATION_MIN_MS < FADE_DURATION_MAX_MS);
const _: () = assert!(EMA_ALPHA_MIN > 0.0 && EMA_ALPHA_MIN < EMA_ALPHA_MAX);
