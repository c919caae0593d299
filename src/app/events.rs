//! Outbound application events.
//!
//! The [`DeviceService`](super::service::DeviceService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — on the device they become
//! newline-terminated JSON records on the serial link; in tests they are
//! captured in a vector.

use crate::app::state::{SensorSnapshot, StatusReport};

/// Longest command name / token we echo back verbatim.
pub const MAX_COMMAND_NAME: usize = 32;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Startup announcement, once after init succeeds.
    Ready,

    /// Acknowledgement of one inbound command.  Exactly one per frame.
    Response {
        /// The command name exactly as received (JSON value or raw token).
        command: heapless::String<MAX_COMMAND_NAME>,
        success: bool,
        message: String,
    },

    /// Wire-visible device status snapshot.
    Status(StatusReport),

    /// Periodic (or on-demand) sensor snapshot.
    Sensors(SensorSnapshot),

    /// Rising edge on the sound detector (already cooldown-filtered).
    Sound,
}
