//! Timing constants for the simulator.
//!
//! These use `std::time::Duration`, which the `no_std` common crate cannot,
//! so they live here rather than next to the gauge logic.

use std::time::Duration;

/// Target frame time (~50 FPS). The main loop sleeps if the frame finishes early.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// How long the "MR2" splash stays up.
pub const SPLASH_DURATION: Duration = Duration::from_millis(1500);

/// Delay between needle positions of the boot sweep.
pub const SWEEP_STEP_DELAY: Duration = Duration::from_millis(8);

/// Hold at full scale before sweeping back.
pub const SWEEP_PEAK_HOLD: Duration = Duration::from_millis(150);
