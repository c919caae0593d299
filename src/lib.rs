//! SleepSync pebble firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod effects;
pub mod events;
pub mod link;
pub mod scheduler;

pub mod error;
pub mod pins;

// Hardware-facing modules; the actual peripheral code inside is
// guarded by cfg attributes, so the crate builds on host targets.
pub mod adapters;
pub mod drivers;
pub mod sensors;

mod esp_link_shims;
