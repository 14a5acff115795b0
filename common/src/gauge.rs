//! Value to needle geometry, color zones, and redraw suppression.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;
use micromath::F32;

use crate::colors::{NEEDLE_COLOR, RED, YELLOW};
use crate::config::GaugeConfig;
use crate::layout::{CENTER, END_ANGLE_DEG, FULL_SCALE_PSI, NEEDLE_LENGTH, START_ANGLE_DEG};
use crate::thresholds::REDRAW_THRESHOLD;

// =============================================================================
// Angle Mapping
// =============================================================================

/// Map a dial value onto the sweep. Values outside `[0, FULL_SCALE_PSI]` pin
/// to the stops.
#[inline]
pub fn value_to_angle(value: f32) -> f32 {
    let clamped = value.clamp(0.0, FULL_SCALE_PSI);
    START_ANGLE_DEG + (clamped / FULL_SCALE_PSI) * (END_ANGLE_DEG - START_ANGLE_DEG)
}

/// Offset of `radius` along `angle_deg`, screen y pointing down.
#[inline]
pub fn polar_offset(
    radius: f32,
    angle_deg: f32,
) -> (f32, f32) {
    let rad = F32(angle_deg.to_radians());
    (radius * rad.cos().0, radius * rad.sin().0)
}

/// Point at `radius` from the gauge center along `angle_deg`.
#[inline]
pub fn polar_point(
    radius: i32,
    angle_deg: f32,
) -> Point {
    let (dx, dy) = polar_offset(radius as f32, angle_deg);
    CENTER + Point::new(dx as i32, dy as i32)
}

/// Needle tip for a given angle.
#[inline]
pub fn needle_tip(angle_deg: f32) -> Point { polar_point(NEEDLE_LENGTH, angle_deg) }

/// Base corners of a needle triangle of the given half-width.
pub fn needle_base(
    angle_deg: f32,
    half_width: f32,
) -> (Point, Point) {
    let (dx, dy) = polar_offset(half_width, angle_deg + 90.0);
    let (dx, dy) = (dx as i32, dy as i32);
    (CENTER + Point::new(dx, dy), CENTER - Point::new(dx, dy))
}

// =============================================================================
// Zones
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Zone {
    Critical,
    Warning,
    Normal,
    High,
}

impl Zone {
    pub const fn color(self) -> Rgb565 {
        match self {
            Zone::Critical | Zone::Warning => RED,
            Zone::Normal => NEEDLE_COLOR,
            Zone::High => YELLOW,
        }
    }

    /// Tag used in the status line.
    pub const fn label(self) -> &'static str {
        match self {
            Zone::Critical => "CRITICAL LOW!",
            Zone::Warning => "WARNING - Low",
            Zone::Normal => "NORMAL",
            Zone::High => "HIGH",
        }
    }
}

/// Bounds for [`Zone`] classification. Unset bounds never match.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZoneThresholds {
    pub min_safe: Option<f32>,
    pub min_warn: Option<f32>,
    pub high: Option<f32>,
}

impl ZoneThresholds {
    /// Oil pressure: low bounds only.
    pub const fn pressure(config: &GaugeConfig) -> Self {
        Self {
            min_safe: Some(config.oil_pressure_min_safe),
            min_warn: Some(config.oil_pressure_min_warn),
            high: None,
        }
    }

    /// Coolant: high bound only.
    pub const fn temperature(config: &GaugeConfig) -> Self {
        Self { min_safe: None, min_warn: None, high: Some(config.temp_warning_high) }
    }

    /// First matching zone, checked Critical, Warning, High.
    pub fn classify(
        &self,
        value: f32,
    ) -> Zone {
        let below = |bound: Option<f32>| bound.is_some_and(|b| value < b);
        let above = |bound: Option<f32>| bound.is_some_and(|b| value > b);

        if below(self.min_safe) {
            Zone::Critical
        } else if below(self.min_warn) {
            Zone::Warning
        } else if above(self.high) {
            Zone::High
        } else {
            Zone::Normal
        }
    }
}

// =============================================================================
// Redraw Suppression
// =============================================================================

/// Remembers the last value actually drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RedrawGate {
    last_drawn: Option<f32>,
}

impl RedrawGate {
    pub const fn new() -> Self { Self { last_drawn: None } }

    /// True when nothing was drawn yet or `value` moved past the threshold.
    pub fn should_redraw(
        &self,
        value: f32,
    ) -> bool {
        match self.last_drawn {
            None => true,
            Some(last) => F32(value - last).abs().0 > REDRAW_THRESHOLD,
        }
    }

    /// Record that `value` is now on screen.
    #[inline]
    pub fn mark_drawn(
        &mut self,
        value: f32,
    ) {
        self.last_drawn = Some(value);
    }

    /// Force the next evaluation to draw.
    #[inline]
    pub fn invalidate(&mut self) { self.last_drawn = None; }

    #[inline]
    pub const fn last_drawn(&self) -> Option<f32> { self.last_drawn }
}

/// Everything the renderer needs for one needle position.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Evaluation {
    pub value: f32,
    pub angle_deg: f32,
    pub zone: Zone,
    pub redraw: bool,
}

/// Evaluate a smoothed value against its zones and redraw gate.
pub fn evaluate(
    value: f32,
    thresholds: &ZoneThresholds,
    gate: &RedrawGate,
) -> Evaluation {
    Evaluation {
        value,
        angle_deg: value_to_angle(value),
        zone: thresholds.classify(value),
        redraw: gate.should_redraw(value),
    }
}
