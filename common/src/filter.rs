//! Exponential moving average for the displayed values.

use crate::config::GaugeConfig;
use crate::telemetry::Sample;

/// Smoothed pressure and temperature. Starts at zero on every boot, so the
/// needle rises from the stop instead of jumping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterState {
    pub pressure: f32,
    pub temperature: f32,
}

impl FilterState {
    pub const fn new() -> Self { Self { pressure: 0.0, temperature: 0.0 } }

    /// Fold one raw sample into both streams.
    pub fn update(
        &mut self,
        sample: &Sample,
        config: &GaugeConfig,
    ) {
        let alpha = config.smoothing_alpha();
        self.pressure = ema(self.pressure, sample.pressure, alpha);
        self.temperature = ema(self.temperature, sample.temperature, alpha);
    }
}

/// One smoothing step: `previous * (1 - alpha) + raw * alpha`.
#[inline]
pub fn ema(
    previous: f32,
    raw: f32,
    alpha: f32,
) -> f32 {
    previous * (1.0 - alpha) + raw * alpha
}
