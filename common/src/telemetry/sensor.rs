//! ADC to PSI conversion for a ratiometric 0.5-4.5 V pressure sender.
//!
//! The sender runs on 5 V, so its output reaches the 3.3 V ADC through a
//! resistive divider (R1 high side, R2 to ground).

use super::AnalogInput;
use crate::config::GaugeConfig;

/// ADC reference voltage.
pub const ADC_REFERENCE_VOLTS: f32 = 3.3;

/// Highest 12-bit conversion result.
pub const ADC_FULL_SCALE_COUNTS: f32 = 4095.0;

/// Conversions averaged per tick.
pub const ADC_BATCH_SIZE: usize = 10;

/// One converted pressure reading with its intermediate values.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    /// Mean raw ADC counts over the batch.
    pub counts: f32,
    /// Voltage at the ADC pin.
    pub measured_voltage: f32,
    /// Voltage at the sender, divider undone.
    pub sensor_voltage: f32,
    /// Pressure, clamped to `[0, sensor_max_psi]`.
    pub pressure: f32,
}

/// Average a batch of conversions and convert it.
///
/// Failed conversions are left out of the mean. Returns `None` when none of
/// them succeeded.
pub fn read_pressure<A: AnalogInput>(
    adc: &mut A,
    config: &GaugeConfig,
) -> Option<SensorReading> {
    let mut sum: u32 = 0;
    let mut good: u32 = 0;

    for _ in 0..ADC_BATCH_SIZE {
        if let Some(raw) = adc.read_raw() {
            sum += u32::from(raw);
            good += 1;
        }
    }

    if good == 0 {
        return None;
    }

    Some(convert_counts(sum as f32 / good as f32, config))
}

/// Convert mean ADC counts to a reading.
pub fn convert_counts(
    counts: f32,
    config: &GaugeConfig,
) -> SensorReading {
    let measured_voltage = counts * ADC_REFERENCE_VOLTS / ADC_FULL_SCALE_COUNTS;

    let r1 = config.voltage_divider_r1;
    let r2 = config.voltage_divider_r2;
    let sensor_voltage = measured_voltage * (r1 + r2) / r2;

    let span = config.sensor_max_voltage - config.sensor_min_voltage;
    let raw_psi = (sensor_voltage - config.sensor_min_voltage) / span * config.sensor_max_psi;
    let pressure = raw_psi.clamp(0.0, config.sensor_max_psi);

    SensorReading {
        counts,
        measured_voltage,
        sensor_voltage,
        pressure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedAdc {
        values: &'static [Option<u16>],
        index: usize,
    }

    impl AnalogInput for ScriptedAdc {
        fn read_raw(&mut self) -> Option<u16> {
            let v = self.values[self.index % self.values.len()];
            self.index += 1;
            v
        }
    }

    /// Counts the ADC would read for a given sender voltage.
    fn counts_for(sensor_volts: f32, config: &GaugeConfig) -> f32 {
        let r1 = config.voltage_divider_r1;
        let r2 = config.voltage_divider_r2;
        sensor_volts * r2 / (r1 + r2) * ADC_FULL_SCALE_COUNTS / ADC_REFERENCE_VOLTS
    }

    #[test]
    fn test_calibration_endpoints() {
        let config = GaugeConfig::DEFAULT;
        let zero = convert_counts(counts_for(0.5, &config), &config);
        let full = convert_counts(counts_for(4.5, &config), &config);
        assert!(zero.pressure.abs() < 0.01);
        assert!((full.pressure - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_midpoint_is_half_scale() {
        let config = GaugeConfig::DEFAULT;
        let reading = convert_counts(counts_for(2.5, &config), &config);
        assert!((reading.pressure - 50.0).abs() < 0.01);
        assert!((reading.sensor_voltage - 2.5).abs() < 0.001);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let config = GaugeConfig::DEFAULT;
        assert_eq!(convert_counts(0.0, &config).pressure, 0.0);
        assert_eq!(convert_counts(ADC_FULL_SCALE_COUNTS, &config).pressure, 100.0);
    }

    #[test]
    fn test_divider_is_undone() {
        let config = GaugeConfig::DEFAULT;
        let reading = convert_counts(ADC_FULL_SCALE_COUNTS, &config);
        assert!((reading.measured_voltage - 3.3).abs() < 1e-4);
        assert!((reading.sensor_voltage - 3.3 * 13900.0 / 10000.0).abs() < 1e-3);
    }

    #[test]
    fn test_failed_reads_are_skipped() {
        let config = GaugeConfig::DEFAULT;
        let mut adc = ScriptedAdc { values: &[Some(1000), None, Some(2000), None, Some(1500)], index: 0 };
        // Two passes over the script: 1000, 2000, 1500 twice.
        let reading = read_pressure(&mut adc, &config).unwrap();
        assert!((reading.counts - 1500.0).abs() < 1e-3);
        assert_eq!(adc.index, ADC_BATCH_SIZE);
    }

    #[test]
    fn test_all_reads_failing_yields_none() {
        let config = GaugeConfig::DEFAULT;
        let mut adc = ScriptedAdc { values: &[None], index: 0 };
        assert!(read_pressure(&mut adc, &config).is_none());
    }
}
