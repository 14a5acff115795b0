//! Gauge firmware library - the parts of the Pico 2 build that run on the host.
//!
//! The binary (`main.rs`) adds the RP2350 peripherals on top of these.
//!
//! # Testing
//!
//! ```bash
//! cargo test -p gauge-pico2 --lib --target x86_64-unknown-linux-gnu
//! ```

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod flash_frame;
pub mod headlight;
