//! Long-running light and alarm effects.
//!
//! `steps` holds the colour tables, `alarm` the tone ramp math, and
//! `engine` the single-active-effect scheduler that advances whichever
//! effect is running on each control tick.

pub mod alarm;
pub mod engine;
pub mod steps;

pub use engine::{CancelToken, EffectEngine, EffectKind};
