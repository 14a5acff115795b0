//! SW20 oil-pressure gauge simulator for the desktop.
//!
//! Runs the shared gauge pipeline in an `embedded-graphics-simulator` window
//! and serves the configuration page over HTTP.
//!
//! Keys: `H` headlight switch, `Up`/`Down` sender ADC counts, `F` failed
//! conversions. The sender keys only matter once the page turns simulated
//! data off. The window is dimmed by the backlight duty.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod inputs;
mod panel;
mod screens;
mod server;
mod settings;
mod store;
mod timing;

use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use gauge_common::colors::FACE_COLOR;
use gauge_common::config::{OpenStatus, SnapshotStore};
use gauge_common::layout::{SCREEN_HEIGHT, SCREEN_WIDTH};
use gauge_common::web::ConfigEvent;
use gauge_common::{Cluster, ConfigStore, GaugeConfig};
use log::{debug, error, info, warn};

use crate::inputs::{KeyboardAdc, RandJitter};
use crate::panel::BacklitPanel;
use crate::screens::{run_splash, run_sweep};
use crate::server::ConfigServer;
use crate::settings::Settings;
use crate::store::FileMedium;
use crate::timing::FRAME_TIME;

/// Sender reading the keyboard ADC starts from (about 1.2 V at the pin).
const INITIAL_ADC_COUNTS: u16 = 1500;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("SW20 oil gauge simulator v{}", env!("CARGO_PKG_VERSION"));
    let settings = Settings::from_env();

    let (storage, status) = SnapshotStore::open(FileMedium::new(&settings.store_path));
    match status {
        OpenStatus::Restored(count) => info!("Restored {count} settings from {}", settings.store_path.display()),
        OpenStatus::Blank => info!("No saved settings in {}, using defaults", settings.store_path.display()),
        OpenStatus::Unreadable(err) => warn!("Settings store unreadable ({err}), using defaults"),
    }
    let mut store = ConfigStore::open(storage);
    log_sources(store.config());

    let mut server = match ConfigServer::bind(settings.http_addr) {
        Ok(server) => {
            info!("Config page at http://{}/", settings.http_addr);
            Some(server)
        }
        Err(err) => {
            warn!("Config page unavailable: {err}");
            None
        }
    };

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("SW20 Oil Gauge", &output_settings);

    display.clear(FACE_COLOR).ok();
    window.update(&display);

    let boot = Instant::now();
    let now_ms = || boot.elapsed().as_millis() as u32;

    let mut headlight = false;
    let mut adc = KeyboardAdc::new(INITIAL_ADC_COUNTS);
    let mut cluster = Cluster::new(store.config(), headlight, now_ms(), RandJitter);

    if !run_splash(&mut display, &mut window, &mut cluster) {
        return;
    }
    let config = *store.config();
    if !run_sweep(&mut display, &mut window, &mut cluster, &config) {
        return;
    }

    let mut duty = cluster.service_backlight(headlight, now_ms(), store.config());
    info!("Backlight duty {duty}");
    let mut backlit = BacklitPanel::new(display.size());

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => match keycode {
                    Keycode::H if !repeat => {
                        headlight = !headlight;
                        info!("Headlight switch {}", if headlight { "on" } else { "off" });
                    }
                    Keycode::Up => adc.raise(),
                    Keycode::Down => adc.lower(),
                    Keycode::F if !repeat => {
                        let failing = adc.toggle_failure();
                        info!("ADC conversions {}", if failing { "failing" } else { "restored" });
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        let now = now_ms();

        let next_duty = cluster.service_backlight(headlight, now, store.config());
        if next_duty != duty {
            debug!("Backlight duty {next_duty}");
            duty = next_duty;
        }

        if let Some(server) = server.as_mut() {
            if let Some(event) = server.poll(&mut store) {
                log_event(&event);
                cluster.apply_event(&mut display, &event, store.config());
                if event.applied() {
                    log_sources(store.config());
                }
            }
        }

        if let Some(report) = cluster.service_telemetry(&mut display, &mut adc, now, store.config()) {
            if report.sample.is_none() {
                debug!("No sender reading this tick");
            }
            if let Some(line) = report.status {
                info!("{line}");
            }
        }

        window.update(backlit.light(&display, duty));

        if let Some(left) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            thread::sleep(left);
        }
    }

    info!("Simulator closed");
}

fn log_sources(config: &GaugeConfig) {
    let pressure = if config.use_simulated_data { "simulated drive cycle" } else { "sender on ADC" };
    let temperature = if config.use_simulated_temp { "simulated" } else { "fixed placeholder" };
    info!("Oil pressure: {pressure}, coolant: {temperature}");
    if !config.use_simulated_data {
        info!(
            "Sender {:.2}-{:.2} V for 0-{:.0} psi, divider {:.0}/{:.0} ohm",
            config.sensor_min_voltage,
            config.sensor_max_voltage,
            config.sensor_max_psi,
            config.voltage_divider_r1,
            config.voltage_divider_r2,
        );
    }
}

fn log_event(event: &ConfigEvent) {
    match event {
        ConfigEvent::Saved(outcome) if outcome.corrections.is_clean() => info!("Settings saved"),
        ConfigEvent::Saved(outcome) => warn!("Settings saved with corrections: {:?}", outcome.corrections),
        ConfigEvent::Reset(_) => info!("Settings reset to defaults"),
        ConfigEvent::Failed(err) => error!("Settings not saved: {err}"),
    }
}
