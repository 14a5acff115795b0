//! Gauge geometry constants.
//!
//! # Pre-computed Layout Constants
//!
//! Radii and positions are derived from [`GAUGE_RADIUS`] at compile time, so
//! the render path only does the trigonometry for the angle it is drawing.
//! Angles are in degrees, measured clockwise from the positive x axis
//! because screen y grows downward.

use embedded_graphics::prelude::{Point, Size};

// =============================================================================
// Display Configuration
// =============================================================================

/// Panel width in pixels (round 240x240 ST7789 / GC9A01 class panel).
pub const SCREEN_WIDTH: u32 = 240;

/// Panel height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

/// Gauge center X.
pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

/// Gauge center Y.
pub const CENTER_Y: i32 = (SCREEN_HEIGHT / 2) as i32;

/// Gauge center as a point.
pub const CENTER: Point = Point::new(CENTER_X, CENTER_Y);

/// Outer bezel radius.
pub const GAUGE_RADIUS: i32 = 110;

// =============================================================================
// Sweep
// =============================================================================

/// Angle of the zero mark (bottom left).
pub const START_ANGLE_DEG: f32 = 135.0;

/// Angle of the full-scale mark (bottom right), 270 degree sweep.
pub const END_ANGLE_DEG: f32 = 405.0;

/// Value printed at the end of the dial.
pub const FULL_SCALE_PSI: f32 = 100.0;

const _: () = assert!(END_ANGLE_DEG - START_ANGLE_DEG > 180.0);

// =============================================================================
// Needle
// =============================================================================

/// Distance from the center to the needle tip.
pub const NEEDLE_LENGTH: i32 = GAUGE_RADIUS - 25;

/// Half-width of the needle base at the hub.
pub const NEEDLE_HALF_WIDTH: f32 = 3.0;

/// Half-width of the eraser triangle. Wider than the needle so rasterization
/// differences between the two triangles leave no orange pixels behind.
pub const ERASER_HALF_WIDTH: f32 = 7.0;

const _: () = assert!(ERASER_HALF_WIDTH > NEEDLE_HALF_WIDTH);

// =============================================================================
// Face Markings
// =============================================================================

/// Major tick every 10 psi.
pub const MAJOR_TICK_STEP: u32 = 10;

/// Numeral every 20 psi.
pub const LABEL_STEP: u32 = 20;

/// Minor tick halfway between major ticks.
pub const MINOR_TICK_OFFSET: u32 = 5;

pub const MAJOR_TICK_OUTER: i32 = GAUGE_RADIUS - 12;
pub const MAJOR_TICK_INNER: i32 = GAUGE_RADIUS - 22;
pub const MINOR_TICK_INNER: i32 = GAUGE_RADIUS - 18;

/// Radius at which numerals are centered.
pub const LABEL_RADIUS: i32 = GAUGE_RADIUS - 38;

/// Low-pressure arc band.
pub const WARNING_ARC_OUTER: i32 = GAUGE_RADIUS - 3;
pub const WARNING_ARC_INNER: i32 = GAUGE_RADIUS - 9;

/// Inner accent ring.
pub const INNER_RING_RADIUS: i32 = GAUGE_RADIUS - 10;

/// Hub: accent disc, face-colored core, white ring.
pub const HUB_OUTER_RADIUS: u32 = 6;
pub const HUB_INNER_RADIUS: u32 = 4;

// =============================================================================
// Legends and Readouts
// =============================================================================

/// "OIL" legend (top of the text, horizontally centered).
pub const LEGEND_TITLE_POS: Point = Point::new(CENTER_X, 40);

/// "x1 PSI" legend.
pub const LEGEND_UNIT_POS: Point = Point::new(CENTER_X, 52);

/// Digital pressure readout frame.
pub const READOUT_BOX_POS: Point = Point::new(85, 175);
pub const READOUT_BOX_SIZE: Size = Size::new(70, 25);

/// Area cleared before each readout update (inside the frame).
pub const READOUT_CLEAR_POS: Point = Point::new(86, 176);
pub const READOUT_CLEAR_SIZE: Size = Size::new(68, 23);

/// Top-center of the readout digits.
pub const READOUT_TEXT_POS: Point = Point::new(CENTER_X, 180);

/// Coolant readout below the pressure box, inside the sweep gap.
pub const COOLANT_CLEAR_POS: Point = Point::new(CENTER_X - 24, 204);
pub const COOLANT_CLEAR_SIZE: Size = Size::new(48, 12);
pub const COOLANT_TEXT_POS: Point = Point::new(CENTER_X, 205);

/// Splash text anchor.
pub const SPLASH_TEXT_POS: Point = Point::new(CENTER_X, CENTER_Y - 20);
