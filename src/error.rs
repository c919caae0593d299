//! Unified error types for the SleepSync firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling uniform.
//! All variants are `Copy` so they can be cheaply passed between the command
//! interpreter and the effect scheduler without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned corrupt data.
    Sensor(SensorError),
    /// A command frame could not be decoded or executed.
    Command(CommandError),
    /// An inbound serial frame violated framing limits.
    Frame(FrameError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Frame(e) => write!(f, "frame: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// GPIO read returned an error.
    GpioReadFailed,
    /// Climate sensor did not answer the start signal.
    ClimateTimeout,
    /// Climate sensor frame checksum did not match.
    ChecksumMismatch,
    /// Climate sensor polled again before its minimum interval elapsed.
    TooSoon,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::ClimateTimeout => write!(f, "climate sensor timeout"),
            Self::ChecksumMismatch => write!(f, "climate checksum mismatch"),
            Self::TooSoon => write!(f, "climate polled too soon"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Framing errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Frame exceeded the decoder buffer; the whole frame is discarded.
    TooLong,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong => write!(f, "frame too long"),
        }
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Why an inbound command was rejected.  Each variant maps to a distinct
/// failure message in the `command_response` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Payload was not parseable JSON.
    BadJson,
    /// JSON parsed but the `command` field is missing or not a string.
    MissingCommand,
    /// Command name is not in the command table.
    UnknownCommand,
    /// A required parameter is missing or has the wrong type.
    InvalidParams(&'static str),
    /// The command conflicts with the current effect state.
    Conflict(ConflictError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadJson => write!(f, "invalid JSON"),
            Self::MissingCommand => write!(f, "missing 'command' field"),
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::InvalidParams(what) => write!(f, "invalid parameters: {what}"),
            Self::Conflict(e) => write!(f, "{e}"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

/// Effect-state conflicts.  These are normal operational outcomes, not
/// faults: the device stays healthy and simply reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictError {
    /// The requested effect is already the active one.
    AlreadyActive,
    /// A stop was requested but nothing matching is running.
    NothingActive,
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyActive => write!(f, "effect already active"),
            Self::NothingActive => write!(f, "no matching effect active"),
        }
    }
}

impl From<ConflictError> for CommandError {
    fn from(e: ConflictError) -> Self {
        Self::Conflict(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
