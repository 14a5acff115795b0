//! Telemetry-to-display pipeline for the SW20 oil-pressure gauge.
//!
//! This crate contains the platform-agnostic gauge shared between the desktop
//! simulator and the Pico 2 firmware:
//!
//! - [`config`]: Runtime configuration record, validation and persistence
//! - [`telemetry`]: Simulated and sensor-backed pressure/coolant samples
//! - [`filter`]: Exponential smoothing of the displayed values
//! - [`gauge`]: Angle mapping, color zones and redraw suppression
//! - [`render`]: Face drawing and the erase/restore/redraw needle cycle
//! - [`backlight`]: Headlight-driven day/night fade
//! - [`schedule`]: Rollover-safe interval timing
//! - [`status`]: Once-per-second console status line
//! - [`web`]: Configuration page routing and form decoding
//! - [`cluster`]: The per-loop pipeline tying the above together
//! - [`colors`], [`layout`], [`styles`], [`thresholds`]: Compile-time constants
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` outside of tests. Time is passed in as a wrapping
//! `u32` millisecond counter, so nothing here depends on a clock.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod backlight;
pub mod cluster;
pub mod colors;
pub mod config;
pub mod filter;
pub mod gauge;
pub mod layout;
pub mod render;
pub mod schedule;
pub mod status;
pub mod styles;
pub mod telemetry;
pub mod thresholds;
pub mod web;

// Re-export commonly used items
pub use cluster::{Cluster, TickReport};
pub use config::{ConfigStore, ConfigUpdate, GaugeConfig, KeyValueStore, StorageError};
pub use render::GaugeCanvas;
pub use telemetry::{AnalogInput, JitterSource};
