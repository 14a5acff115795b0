//! Per-tick pressure and temperature samples.
//!
//! Each channel is either simulated from elapsed time or read from hardware.
//! The choice is made from the configuration flags when the source is built
//! (and again on [`TelemetrySource::reconfigure`]), never per tick.

mod sensor;
mod simulation;

pub use sensor::{
    convert_counts,
    read_pressure,
    SensorReading,
    ADC_BATCH_SIZE,
    ADC_FULL_SCALE_COUNTS,
    ADC_REFERENCE_VOLTS,
};
pub use simulation::{simulated_pressure, simulated_temperature};

use crate::config::GaugeConfig;
use crate::thresholds::TEMP_PLACEHOLDER;

// =============================================================================
// Collaborators
// =============================================================================

/// One analog channel. `None` means the conversion failed.
pub trait AnalogInput {
    fn read_raw(&mut self) -> Option<u16>;
}

/// Uniform noise added to simulated curves.
pub trait JitterSource {
    /// A value in `[-amplitude, amplitude]`.
    fn jitter(
        &mut self,
        amplitude: f32,
    ) -> f32;
}

/// Small xorshift32 generator, good enough for needle wobble.
#[derive(Clone, Copy, Debug)]
pub struct XorShiftJitter {
    state: u32,
}

impl XorShiftJitter {
    pub const fn new(seed: u32) -> Self {
        // Zero is a fixed point of xorshift
        Self { state: if seed == 0 { 0x9E37_79B9 } else { seed } }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl JitterSource for XorShiftJitter {
    fn jitter(
        &mut self,
        amplitude: f32,
    ) -> f32 {
        // Top 24 bits give an exact f32 in [0, 1]
        let unit = (self.next_u32() >> 8) as f32 / ((1u32 << 24) - 1) as f32;
        (unit * 2.0 - 1.0) * amplitude
    }
}

/// Jitter that is always zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn jitter(
        &mut self,
        _amplitude: f32,
    ) -> f32 {
        0.0
    }
}

// =============================================================================
// Source Selection
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressureSource {
    Simulated,
    Sensor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TemperatureSource {
    Simulated,
    /// No coolant sender is wired; a fixed value is reported.
    Placeholder,
}

/// Raw values for one tick, before smoothing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub pressure: f32,
    pub temperature: f32,
    /// Conversion details when pressure came from the sensor.
    pub sensor: Option<SensorReading>,
}

pub struct TelemetrySource<J> {
    pressure: PressureSource,
    temperature: TemperatureSource,
    jitter: J,
}

impl<J: JitterSource> TelemetrySource<J> {
    pub fn new(
        config: &GaugeConfig,
        jitter: J,
    ) -> Self {
        let mut source = Self {
            pressure: PressureSource::Simulated,
            temperature: TemperatureSource::Simulated,
            jitter,
        };
        source.reconfigure(config);
        source
    }

    /// Pick the variants matching the current flags.
    pub fn reconfigure(
        &mut self,
        config: &GaugeConfig,
    ) {
        self.pressure = if config.use_simulated_data {
            PressureSource::Simulated
        } else {
            PressureSource::Sensor
        };
        self.temperature = if config.use_simulated_temp {
            TemperatureSource::Simulated
        } else {
            TemperatureSource::Placeholder
        };
    }

    #[inline]
    pub const fn pressure_source(&self) -> PressureSource { self.pressure }

    #[inline]
    pub const fn temperature_source(&self) -> TemperatureSource { self.temperature }

    /// Produce this tick's raw values.
    ///
    /// Returns `None` when the sensor channel is selected and every ADC read
    /// in the batch failed.
    pub fn sample<A: AnalogInput>(
        &mut self,
        elapsed_ms: u32,
        adc: &mut A,
        config: &GaugeConfig,
    ) -> Option<Sample> {
        let (pressure, sensor) = match self.pressure {
            PressureSource::Simulated => {
                (simulated_pressure(elapsed_ms, &mut self.jitter, config.sensor_max_psi), None)
            }
            PressureSource::Sensor => {
                let reading = read_pressure(adc, config)?;
                (reading.pressure, Some(reading))
            }
        };

        let temperature = match self.temperature {
            TemperatureSource::Simulated => simulated_temperature(elapsed_ms, &mut self.jitter),
            TemperatureSource::Placeholder => TEMP_PLACEHOLDER,
        };

        Some(Sample { pressure, temperature, sensor })
    }
}
