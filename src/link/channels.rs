//! Serial-link inter-task channels.
//!
//! Uses `embassy-sync` bounded MPMC channels to bridge the async I/O
//! task with the synchronous control loop. Both tasks share these
//! static channels without heap allocation.
//!
//! ```text
//! ┌──────────────┐   FrameMsg   ┌───────────────┐
//! │   I/O Task   │─────────────▶│  Control Loop │
//! │  (async)     │◀─────────────│  (sync)       │
//! └──────────────┘   RecordMsg  └───────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use super::codec::MAX_FRAME_LEN;

/// Which decoder produced an inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Brace-delimited JSON object.
    Json,
    /// CR/LF-terminated plain-text token.
    Line,
}

/// One complete inbound frame, delivered to the control loop.
pub struct FrameMsg {
    pub kind: FrameKind,
    /// Raw frame bytes (JSON text including braces, or the bare token).
    pub payload: Vec<u8, MAX_FRAME_LEN>,
}

/// One outbound newline-terminated JSON record, ready to write.
pub struct RecordMsg {
    pub data: Vec<u8, MAX_FRAME_LEN>,
}

/// Channel depth for inbound frames.
const FRAME_DEPTH: usize = 8;

/// Channel depth for outbound records.  Deeper than inbound: one
/// command can fan out into response + status records while periodic
/// telemetry is also queued.
const RECORD_DEPTH: usize = 16;

/// Inbound frame channel: I/O task → control loop.
pub static FRAME_CHANNEL: Channel<CriticalSectionRawMutex, FrameMsg, FRAME_DEPTH> = Channel::new();

/// Outbound record channel: control loop → I/O task.
pub static RECORD_CHANNEL: Channel<CriticalSectionRawMutex, RecordMsg, RECORD_DEPTH> =
    Channel::new();
