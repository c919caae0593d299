//! Outbound JSON record builders.
//!
//! Each builder serializes one self-contained record and terminates it
//! with `\n`.  Records are handed to the single writer task via the
//! outbound channel, so emission is atomic from the caller's view —
//! partial records can never interleave.
//!
//! Field names match the original wire protocol; clients parse these
//! byte-for-byte, so they are fixed.

use serde::Serialize;

use crate::app::state::{SensorSnapshot, StatusReport};
use crate::link::codec::MAX_FRAME_LEN;

/// One serialized, newline-terminated record.
pub type Record = heapless::Vec<u8, MAX_FRAME_LEN>;

/// Reported in the `device_ready` announcement.
pub const DEVICE_NAME: &str = "sleepsync-pebble";

// ── Wire structs ─────────────────────────────────────────────

#[derive(Serialize)]
struct DeviceReady<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    device: &'static str,
    version: &'a str,
    timestamp: u64,
}

#[derive(Serialize)]
struct CommandResponse<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    command: &'a str,
    success: bool,
    message: &'a str,
    timestamp: u64,
}

#[derive(Serialize)]
struct SoundEvent {
    #[serde(rename = "type")]
    kind: &'static str,
    detected: bool,
    timestamp: u64,
}

#[derive(Serialize)]
struct SensorData {
    #[serde(rename = "type")]
    kind: &'static str,
    data: SensorFields,
}

#[derive(Serialize)]
struct SensorFields {
    light_level: u16,
    sound_detected: bool,
    temperature: f32,
    humidity: f32,
    timestamp: u64,
}

#[derive(Serialize)]
struct DeviceStatus {
    #[serde(rename = "type")]
    kind: &'static str,
    status: StatusFields,
    timestamp: u64,
}

#[derive(Serialize)]
struct StatusFields {
    alarm_enabled: bool,
    alarm_active: bool,
    sunrise_active: bool,
    sunset_active: bool,
    alarm_frequency: u16,
    alarm_volume: u8,
    rgb: RgbFields,
}

#[derive(Serialize)]
struct RgbFields {
    red: u8,
    green: u8,
    blue: u8,
}

// ── Builders ─────────────────────────────────────────────────

pub fn device_ready(timestamp: u64) -> Option<Record> {
    to_record(&DeviceReady {
        kind: "device_ready",
        device: DEVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        timestamp,
    })
}

pub fn command_response(
    command: &str,
    success: bool,
    message: &str,
    timestamp: u64,
) -> Option<Record> {
    to_record(&CommandResponse {
        kind: "command_response",
        command,
        success,
        message,
        timestamp,
    })
}

pub fn sound_event(timestamp: u64) -> Option<Record> {
    to_record(&SoundEvent {
        kind: "sound_event",
        detected: true,
        timestamp,
    })
}

pub fn sensor_data(snapshot: &SensorSnapshot) -> Option<Record> {
    to_record(&SensorData {
        kind: "sensor_data",
        data: SensorFields {
            light_level: snapshot.light_level,
            sound_detected: snapshot.sound_detected,
            temperature: snapshot.temperature,
            humidity: snapshot.humidity,
            timestamp: snapshot.timestamp,
        },
    })
}

pub fn device_status(report: &StatusReport, timestamp: u64) -> Option<Record> {
    to_record(&DeviceStatus {
        kind: "device_status",
        status: StatusFields {
            alarm_enabled: report.alarm_enabled,
            alarm_active: report.alarm_active,
            sunrise_active: report.sunrise_active,
            sunset_active: report.sunset_active,
            alarm_frequency: report.alarm_frequency,
            alarm_volume: report.alarm_volume,
            rgb: RgbFields {
                red: report.rgb.0,
                green: report.rgb.1,
                blue: report.rgb.2,
            },
        },
        timestamp,
    })
}

/// Serialize + append the newline terminator.  `None` if the record
/// would not fit the fixed wire buffer (never expected for these
/// schemas; the caller logs and drops).
fn to_record<T: Serialize>(value: &T) -> Option<Record> {
    let json = serde_json::to_vec(value).ok()?;
    if json.len() + 1 > MAX_FRAME_LEN {
        return None;
    }
    let mut record = Record::new();
    record.extend_from_slice(&json).ok()?;
    record.push(b'\n').ok()?;
    Some(record)
}

// ── Tests ────────────────────────────────────────────────────
