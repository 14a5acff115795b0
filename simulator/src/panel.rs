//! Backlight emulation for the simulator window.
//!
//! The gauge renders into an undimmed framebuffer, like the ST7789 on the
//! board. The window shows a copy scaled by the current PWM duty so day/night
//! presets and fades are visible on the desktop.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::SimulatorDisplay;

/// Scale each channel of `color` by `duty / 255`.
pub fn dim_color(color: Rgb565, duty: u8) -> Rgb565 {
    if duty == u8::MAX {
        return color;
    }
    let duty = u16::from(duty);
    // Fixed point, rounded to nearest
    let scale = |channel: u8| ((u16::from(channel) * duty + 127) / 255) as u8;
    Rgb565::new(scale(color.r()), scale(color.g()), scale(color.b()))
}

/// What the panel shows through the backlight.
pub struct BacklitPanel {
    shown: SimulatorDisplay<Rgb565>,
}

impl BacklitPanel {
    pub fn new(size: Size) -> Self { Self { shown: SimulatorDisplay::new(size) } }

    /// Copy `frame` scaled by `duty` and return the result for the window.
    pub fn light(
        &mut self,
        frame: &SimulatorDisplay<Rgb565>,
        duty: u8,
    ) -> &SimulatorDisplay<Rgb565> {
        let pixels = frame
            .bounding_box()
            .points()
            .map(|point| Pixel(point, dim_color(frame.get_pixel(point), duty)));
        self.shown.draw_iter(pixels).ok();
        &self.shown
    }
}
