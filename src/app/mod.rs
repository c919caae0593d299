//! Application core — pure domain logic, zero I/O.
//!
//! Business rules for the SleepSync pebble: command interpretation,
//! device state, and the effect lifecycle. All interaction with
//! hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod state;
