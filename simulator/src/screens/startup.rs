//! Boot splash and needle sweep.
//!
//! Both return `false` when the window was closed, so `main` can exit early.

use std::thread;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics_simulator::{SimulatorDisplay, SimulatorEvent, Window};
use gauge_common::render::{SWEEP_COLOR, SweepAnimation};
use gauge_common::{Cluster, GaugeConfig, JitterSource};

use crate::timing::{FRAME_TIME, SPLASH_DURATION, SWEEP_PEAK_HOLD, SWEEP_STEP_DELAY};

fn quit_requested(window: &mut Window) -> bool { window.events().any(|ev| matches!(ev, SimulatorEvent::Quit)) }

/// Present the current frame and wait `duration`, watching for Quit.
fn hold(
    display: &SimulatorDisplay<Rgb565>,
    window: &mut Window,
    duration: Duration,
) -> bool {
    let start = Instant::now();
    loop {
        window.update(display);
        if quit_requested(window) {
            return false;
        }
        let Some(left) = duration.checked_sub(start.elapsed()) else {
            return true;
        };
        thread::sleep(left.min(FRAME_TIME));
    }
}

pub fn run_splash<J: JitterSource>(
    display: &mut SimulatorDisplay<Rgb565>,
    window: &mut Window,
    cluster: &mut Cluster<J>,
) -> bool {
    cluster.renderer_mut().draw_splash(display);
    hold(display, window, SPLASH_DURATION)
}

/// Draw the face and sweep the needle to full scale and back.
pub fn run_sweep<J: JitterSource>(
    display: &mut SimulatorDisplay<Rgb565>,
    window: &mut Window,
    cluster: &mut Cluster<J>,
    config: &GaugeConfig,
) -> bool {
    cluster.draw_face(display, config);

    for position in SweepAnimation::new() {
        cluster.renderer_mut().draw_needle_at(display, position, SWEEP_COLOR);
        let delay = if position >= gauge_common::layout::FULL_SCALE_PSI { SWEEP_PEAK_HOLD } else { SWEEP_STEP_DELAY };
        if !hold(display, window, delay) {
            return false;
        }
    }

    // Leave the live needle to the first telemetry tick
    cluster.draw_face(display, config);
    true
}
