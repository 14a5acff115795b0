//! Color constants for the gauge face.
//!
//! The palette follows the early-90s Toyota cluster look: black face, white
//! markings, orange needle, red low-pressure zone.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! This format is native to the ST7789 panel and needs no conversion when
//! written over SPI.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black. Gauge face and eraser color.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Bezel, tick marks, labels.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red (31, 0, 0). Low-pressure arc, warning and critical needle.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure yellow. Values above the configured upper bound.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

// =============================================================================
// Custom Colors
// =============================================================================

/// Toyota needle orange. RGB565 `0xFD20` = (31, 41, 0).
pub const ORANGE: Rgb565 = Rgb565::new(31, 41, 0);

/// Light gray accent for the inner ring and hub. RGB565 `0x7BEF` = (15, 31, 15).
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(15, 31, 15);

// =============================================================================
// Semantic Aliases
// =============================================================================

/// Background of the gauge face. Anything drawn in this color is "erased".
pub const FACE_COLOR: Rgb565 = BLACK;

/// Markings: bezel, ticks, numerals, legends.
pub const TEXT_COLOR: Rgb565 = WHITE;

/// Needle color in the normal zone.
pub const NEEDLE_COLOR: Rgb565 = ORANGE;

/// Low-pressure arc and warning readouts.
pub const WARNING_COLOR: Rgb565 = RED;

/// Inner ring and hub.
pub const ACCENT_COLOR: Rgb565 = LIGHT_GRAY;

#[cfg(test)]
mod tests {
    use embedded_graphics::prelude::IntoStorage;

    use super::*;

    #[test]
    fn test_palette_matches_panel_values() {
        assert_eq!(ORANGE.into_storage(), 0xFD20);
        assert_eq!(LIGHT_GRAY.into_storage(), 0x7BEF);
        assert_eq!(RED.into_storage(), 0xF800);
        assert_eq!(FACE_COLOR.into_storage(), 0x0000);
        assert_eq!(TEXT_COLOR.into_storage(), 0xFFFF);
    }
}
