//! ST7789 driver for the 240x240 round-bezel panel.
//!
//! Drawing goes to a RAM framebuffer through [`St7789Renderer`], which
//! remembers whether anything changed. The main loop pushes the whole frame
//! with [`St7789Flusher::flush_buffer`] (async DMA) only when it did, so a
//! steady needle costs no SPI traffic.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Config as SpiConfig, Spi};
use embassy_time::Timer;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

pub const WIDTH: usize = 240;
pub const HEIGHT: usize = 240;
pub const BUFFER_SIZE: usize = WIDTH * HEIGHT * 2;

/// Datasheet maximum write clock.
pub const SPI_FREQUENCY_HZ: u32 = 62_500_000;

pub fn panel_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = SPI_FREQUENCY_HZ;
    config
}

// ST7789 Commands
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

/// Owns the SPI bus and pushes frames to the panel.
pub struct St7789Flusher<'d> {
    spi: Spi<'d, SPI0, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
}

impl<'d> St7789Flusher<'d> {
    pub fn new(
        spi: Spi<'d, SPI0, Async>,
        dc: Output<'d>,
        cs: Output<'d>,
    ) -> Self {
        Self { spi, dc, cs }
    }

    pub async fn init(&mut self) {
        self.write_command(SWRESET).await;
        Timer::after_millis(150).await;

        self.write_command(SLPOUT).await;
        Timer::after_millis(10).await;

        // RGB565
        self.write_command(COLMOD).await;
        self.write_data(&[0x55]).await;

        // Native portrait orientation, square panel
        self.write_command(MADCTL).await;
        self.write_data(&[0x00]).await;

        // IPS panels need inversion for correct colors
        self.write_command(INVON).await;
        Timer::after_millis(10).await;

        self.write_command(NORON).await;
        Timer::after_millis(10).await;

        self.write_command(DISPON).await;
        Timer::after_millis(10).await;

        // Every flush covers the full screen
        self.set_window(0, 0, WIDTH as u16, HEIGHT as u16).await;
    }

    async fn write_command(
        &mut self,
        cmd: u8,
    ) {
        self.cs.set_low();
        self.dc.set_low();
        self.spi.write(&[cmd]).await.ok();
        self.cs.set_high();
    }

    async fn write_data(
        &mut self,
        data: &[u8],
    ) {
        self.cs.set_low();
        self.dc.set_high();
        self.spi.write(data).await.ok();
        self.cs.set_high();
    }

    async fn set_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) {
        let x1 = x + w - 1;
        let y1 = y + h - 1;

        self.write_command(CASET).await;
        self.write_data(&[(x >> 8) as u8, x as u8, (x1 >> 8) as u8, x1 as u8]).await;

        self.write_command(RASET).await;
        self.write_data(&[(y >> 8) as u8, y as u8, (y1 >> 8) as u8, y1 as u8]).await;
    }

    /// Send a full frame via DMA.
    pub async fn flush_buffer(
        &mut self,
        buffer: &[u8],
    ) {
        self.cs.set_low();
        self.dc.set_low();
        self.spi.blocking_write(&[RAMWR]).ok();
        self.dc.set_high();
        self.spi.write(buffer).await.ok();
        self.cs.set_high();
    }
}

/// Framebuffer draw target with change tracking.
pub struct St7789Renderer<'a> {
    framebuffer: &'a mut [u8; BUFFER_SIZE],
    dirty: bool,
}

impl<'a> St7789Renderer<'a> {
    pub fn new(framebuffer: &'a mut [u8; BUFFER_SIZE]) -> Self { Self { framebuffer, dirty: true } }

    /// The frame as sent to the panel.
    #[inline]
    pub fn frame(&self) -> &[u8] { self.framebuffer.as_slice() }

    /// True when something was drawn since the last call.
    pub fn take_dirty(&mut self) -> bool { core::mem::replace(&mut self.dirty, false) }

    #[inline]
    fn pixel_bytes(color: Rgb565) -> [u8; 2] {
        let raw: RawU16 = color.into();
        raw.into_inner().to_be_bytes()
    }

    #[inline]
    fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Rgb565,
    ) {
        if x >= 0 && x < WIDTH as i32 && y >= 0 && y < HEIGHT as i32 {
            let idx = (y as usize * WIDTH + x as usize) * 2;
            self.framebuffer[idx..idx + 2].copy_from_slice(&Self::pixel_bytes(color));
        }
    }
}

impl OriginDimensions for St7789Renderer<'_> {
    fn size(&self) -> Size { Size::new(WIDTH as u32, HEIGHT as u32) }
}

impl DrawTarget for St7789Renderer<'_> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        self.dirty = true;
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let drawable_area = area.intersection(&self.bounding_box());
        if drawable_area.size == Size::zero() {
            return Ok(());
        }

        let bytes = Self::pixel_bytes(color);
        let x_start = drawable_area.top_left.x as usize;
        let width = drawable_area.size.width as usize;

        for y in drawable_area.rows() {
            let start = (y as usize * WIDTH + x_start) * 2;
            for pixel in self.framebuffer[start..start + width * 2].chunks_exact_mut(2) {
                pixel.copy_from_slice(&bytes);
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let bytes = Self::pixel_bytes(color);
        for pixel in self.framebuffer.chunks_exact_mut(2) {
            pixel.copy_from_slice(&bytes);
        }
        self.dirty = true;
        Ok(())
    }
}
