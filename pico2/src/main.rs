//! SW20 oil-pressure gauge firmware for Raspberry Pi Pico 2 (RP2350).
//!
//! Drives a 240x240 ST7789 panel from the shared gauge pipeline.
//!
//! # Wiring
//!
//! - Panel: DC=16, CS=17, CLK=18, MOSI=19, reset tied to RUN
//! - Backlight: GPIO20 (PWM)
//! - Headlight switch: GPIO21, active low with internal pull-up
//! - Oil pressure sender: GPIO26 (ADC0) through the R1/R2 divider
//!
//! The board has no radio, so the configuration page is not served. The
//! settings restored from flash (or the defaults) are used as-is.

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod flash_store;
mod io;
mod st7789;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::Spi;
use embassy_time::{Duration, Instant, Timer};
use gauge_common::config::{OpenStatus, SnapshotStore};
use gauge_common::layout::FULL_SCALE_PSI;
use gauge_common::render::{SWEEP_COLOR, SweepAnimation};
use gauge_common::telemetry::XorShiftJitter;
use gauge_common::{Cluster, ConfigStore, GaugeConfig};
use gauge_pico2::headlight::SwitchDebounce;
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::flash_store::FlashMedium;
use crate::io::{AdcSender, PwmBacklight};
use crate::st7789::{BUFFER_SIZE, St7789Flusher, St7789Renderer, panel_spi_config};

// =============================================================================
// Timing
// =============================================================================

const SPLASH_DURATION: Duration = Duration::from_millis(1500);
const SWEEP_STEP_DELAY: Duration = Duration::from_millis(8);
const SWEEP_PEAK_HOLD: Duration = Duration::from_millis(150);

/// Main loop poll period. Telemetry runs on its own 100 ms schedule.
const LOOP_PERIOD: Duration = Duration::from_millis(5);

const JITTER_SEED: u32 = 0x5732_4D52;

static FRAMEBUFFER: ConstStaticCell<[u8; BUFFER_SIZE]> = ConstStaticCell::new([0; BUFFER_SIZE]);

/// Wrapping millisecond counter fed to the gauge pipeline.
#[inline]
fn now_ms() -> u32 { Instant::now().as_millis() as u32 }

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("SW20 oil gauge v{} starting...", env!("CARGO_PKG_VERSION"));

    let p = embassy_rp::init(Default::default());

    // Settings
    let (storage, status) = SnapshotStore::open(FlashMedium::new(p.FLASH));
    match status {
        OpenStatus::Restored(count) => info!("Restored {} settings from flash", count),
        OpenStatus::Blank => info!("No saved settings, using defaults"),
        OpenStatus::Unreadable(err) => warn!("Settings flash unreadable ({}), using defaults", err),
    }
    let store = ConfigStore::open(storage);
    let config: GaugeConfig = *store.config();
    log_sources(&config);
    warn!("No network interface on this board, config page unavailable");

    // Display
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, panel_spi_config());
    let mut flusher = St7789Flusher::new(spi, dc, cs);
    flusher.init().await;
    let mut panel = St7789Renderer::new(FRAMEBUFFER.take());
    info!("Display initialized");

    // Inputs and backlight
    let headlight_pin = Input::new(p.PIN_21, Pull::Up);
    let mut headlight = SwitchDebounce::new(headlight_pin.is_low());
    let mut sender = AdcSender::new(p.ADC, p.PIN_26);

    let mut cluster = Cluster::new(&config, headlight.state(), now_ms(), XorShiftJitter::new(JITTER_SEED));
    let mut backlight = PwmBacklight::new(
        p.PWM_SLICE2,
        p.PIN_20,
        cluster.service_backlight(headlight.state(), now_ms(), &config),
    );
    info!("Backlight duty {}", backlight.duty());

    // Boot splash and needle sweep
    cluster.renderer_mut().draw_splash(&mut panel);
    flusher.flush_buffer(panel.frame()).await;
    Timer::after(SPLASH_DURATION).await;

    cluster.draw_face(&mut panel, &config);
    for position in SweepAnimation::new() {
        cluster.renderer_mut().draw_needle_at(&mut panel, position, SWEEP_COLOR);
        flusher.flush_buffer(panel.frame()).await;
        Timer::after(if position >= FULL_SCALE_PSI { SWEEP_PEAK_HOLD } else { SWEEP_STEP_DELAY }).await;
    }
    cluster.draw_face(&mut panel, &config);

    info!("Main loop starting");

    loop {
        let now = now_ms();

        let lit = headlight.update(headlight_pin.is_low(), now);
        backlight.set_duty(cluster.service_backlight(lit, now, &config));

        if let Some(report) = cluster.service_telemetry(&mut panel, &mut sender, now, &config) {
            if report.sample.is_none() {
                warn!("ADC produced no reading this tick");
            }
            if let Some(line) = report.status {
                info!("{}", line);
            }
        }

        if panel.take_dirty() {
            flusher.flush_buffer(panel.frame()).await;
        }

        Timer::after(LOOP_PERIOD).await;
    }
}

fn log_sources(config: &GaugeConfig) {
    if config.use_simulated_data {
        info!("Oil pressure: simulated drive cycle");
    } else {
        info!(
            "Oil pressure: sender {}-{} V for 0-{} psi, divider {}/{} ohm",
            config.sensor_min_voltage,
            config.sensor_max_voltage,
            config.sensor_max_psi,
            config.voltage_divider_r1,
            config.voltage_divider_r2,
        );
    }
    if config.use_simulated_temp {
        info!("Coolant: simulated");
    } else {
        info!("Coolant: fixed placeholder");
    }
}
