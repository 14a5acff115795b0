//! Pre-computed text styles and font choices.
//!
//! Styles are `const` so nothing is built on the render path; only the color
//! varies per draw, so callers pair a font reference with the zone color.

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::PROFONT_24_POINT;

/// Horizontally centered, anchored at the top of the glyphs.
pub const CENTERED_TOP: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Top)
    .build();

/// Legends and the coolant readout (6x10).
pub const SMALL_FONT: &MonoFont = &FONT_6X10;

/// Dial numerals and the digital pressure readout (10x20).
pub const MEDIUM_FONT: &MonoFont = &FONT_10X20;

/// Splash text (`ProFont` 24pt).
pub const LARGE_FONT: &MonoFont = &PROFONT_24_POINT;

/// Text size requested through [`GaugeCanvas::text`](crate::render::GaugeCanvas::text).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

impl TextSize {
    pub const fn font(self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => SMALL_FONT,
            TextSize::Medium => MEDIUM_FONT,
            TextSize::Large => LARGE_FONT,
        }
    }

    /// Glyph height in pixels.
    pub const fn height(self) -> u32 { self.font().character_size.height }
}
