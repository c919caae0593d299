//! Mock adapters for integration tests.
//!
//! Records every actuator call and emitted event so tests can assert on
//! the full history without touching real GPIO/PWM registers.

use sleepsync::app::events::AppEvent;
use sleepsync::app::ports::{ActuatorPort, EventSink};
use sleepsync::link::channels::{FrameKind, FrameMsg};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActuatorCall {
    SetRgb {
        r: u8,
        g: u8,
        b: u8,
    },
    SetTone {
        frequency_hz: u16,
        volume: u8,
    },
    BuzzerOff,
    PlayTone {
        frequency_hz: u16,
        volume: u8,
        duration_ms: u32,
    },
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    /// Colour currently on the LED, replaying the call history.
    pub fn current_rgb(&self) -> (u8, u8, u8) {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetRgb { r, g, b } => Some((*r, *g, *b)),
                ActuatorCall::AllOff => Some((0, 0, 0)),
                _ => None,
            })
            .unwrap_or((0, 0, 0))
    }

    pub fn buzzer_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetTone { volume, .. } => Some(*volume > 0),
                ActuatorCall::BuzzerOff | ActuatorCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn set_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.calls.push(ActuatorCall::SetRgb { r, g, b });
    }

    fn set_tone(&mut self, frequency_hz: u16, volume: u8) {
        self.calls.push(ActuatorCall::SetTone {
            frequency_hz,
            volume,
        });
    }

    fn buzzer_off(&mut self) {
        self.calls.push(ActuatorCall::BuzzerOff);
    }

    fn play_tone_blocking(&mut self, frequency_hz: u16, volume: u8, duration_ms: u32) {
        self.calls.push(ActuatorCall::PlayTone {
            frequency_hz,
            volume,
            duration_ms,
        });
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Every `Response` event as (command, success, message).
    pub fn responses(&self) -> Vec<(String, bool, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Response {
                    command,
                    success,
                    message,
                } => Some((command.to_string(), *success, message.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn last_response(&self) -> Option<(String, bool, String)> {
        self.responses().pop()
    }

    pub fn status_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Status(_)))
            .count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Frame builders ────────────────────────────────────────────

#[allow(dead_code)]
pub fn json_frame(text: &str) -> FrameMsg {
    let mut payload = heapless::Vec::new();
    payload
        .extend_from_slice(text.as_bytes())
        .expect("test frame fits the wire buffer");
    FrameMsg {
        kind: FrameKind::Json,
        payload,
    }
}

#[allow(dead_code)]
pub fn line_frame(token: &str) -> FrameMsg {
    let mut payload = heapless::Vec::new();
    payload
        .extend_from_slice(token.as_bytes())
        .expect("test token fits the wire buffer");
    FrameMsg {
        kind: FrameKind::Line,
        payload,
    }
}
