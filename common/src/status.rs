//! Once-per-second status line for the serial/RTT console.

use core::fmt;

use crate::gauge::Zone;
use crate::schedule::{IntervalTimer, STATUS_INTERVAL_MS};
use crate::telemetry::SensorReading;

/// One status report. `Display` renders the console text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusLine {
    pub pressure: f32,
    pub zone: Zone,
    pub temperature: f32,
    /// Present when pressure came from the sensor.
    pub sensor: Option<SensorReading>,
}

impl fmt::Display for StatusLine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.sensor {
            Some(r) => write!(
                f,
                "ADC: {:.0} | Voltage: {:.2}V | Sensor: {:.2}V | Oil Pressure: {:.1} PSI [{}] | Coolant: {:.0}C",
                r.counts,
                r.measured_voltage,
                r.sensor_voltage,
                self.pressure,
                self.zone.label(),
                self.temperature,
            ),
            None => write!(
                f,
                "Oil Pressure: {:.1} PSI [{}] | Coolant: {:.0}C",
                self.pressure,
                self.zone.label(),
                self.temperature,
            ),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusLine {
    fn format(
        &self,
        f: defmt::Formatter<'_>,
    ) {
        match self.sensor {
            Some(r) => defmt::write!(
                f,
                "ADC: {=f32} | Voltage: {=f32}V | Sensor: {=f32}V | Oil Pressure: {=f32} PSI [{=str}] | Coolant: {=f32}C",
                r.counts,
                r.measured_voltage,
                r.sensor_voltage,
                self.pressure,
                self.zone.label(),
                self.temperature,
            ),
            None => defmt::write!(
                f,
                "Oil Pressure: {=f32} PSI [{=str}] | Coolant: {=f32}C",
                self.pressure,
                self.zone.label(),
                self.temperature,
            ),
        }
    }
}

/// Rate limiter for [`StatusLine`]s.
#[derive(Clone, Copy, Debug)]
pub struct StatusReporter {
    timer: IntervalTimer,
}

impl StatusReporter {
    pub const fn new(now_ms: u32) -> Self { Self { timer: IntervalTimer::new(STATUS_INTERVAL_MS, now_ms) } }

    /// Returns `line` when a report is due.
    pub fn poll(
        &mut self,
        now_ms: u32,
        line: StatusLine,
    ) -> Option<StatusLine> {
        self.timer.poll(now_ms).then_some(line)
    }
}
