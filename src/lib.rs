//! AirNode firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alert;
pub mod app;
pub mod calibration;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod power;
pub mod session;

pub mod pins;

// The ESP-IDF-backed modules compile on the host too; their hardware
// paths are replaced by cfg-gated simulation stubs.
pub mod adapters;
pub mod drivers;
pub mod sensors;
