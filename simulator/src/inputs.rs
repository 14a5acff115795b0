//! Host stand-ins for the sender ADC and the jitter source.

use gauge_common::telemetry::{AnalogInput, JitterSource};

/// Largest 12-bit conversion result.
pub const ADC_MAX_COUNTS: u16 = 4095;

/// ADC counts moved per arrow key press.
pub const ADC_STEP: u16 = 50;

/// Sender input driven from the keyboard.
///
/// Up/Down move the reading; `F` toggles a failed conversion so the
/// skipped-read path can be watched.
#[derive(Debug)]
pub struct KeyboardAdc {
    counts: u16,
    failing: bool,
}

impl KeyboardAdc {
    pub const fn new(counts: u16) -> Self { Self { counts, failing: false } }

    pub const fn counts(&self) -> u16 { self.counts }

    pub fn raise(&mut self) { self.counts = self.counts.saturating_add(ADC_STEP).min(ADC_MAX_COUNTS); }

    pub fn lower(&mut self) { self.counts = self.counts.saturating_sub(ADC_STEP); }

    pub fn toggle_failure(&mut self) -> bool {
        self.failing = !self.failing;
        self.failing
    }
}

impl AnalogInput for KeyboardAdc {
    fn read_raw(&mut self) -> Option<u16> { (!self.failing).then_some(self.counts) }
}

/// Uniform jitter from the thread-local RNG.
#[derive(Debug, Default)]
pub struct RandJitter;

impl JitterSource for RandJitter {
    fn jitter(
        &mut self,
        amplitude: f32,
    ) -> f32 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        rand::random_range(-amplitude..=amplitude)
    }
}
