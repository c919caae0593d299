//! Integration tests for the frame → DeviceService → actuator pipeline.
//!
//! These run on the host (x86_64) and verify that the full dispatch
//! chain from an inbound serial frame down to an actuator call works
//! correctly without any real hardware.

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingSink, json_frame, line_frame};

use sleepsync::app::events::AppEvent;
use sleepsync::app::service::DeviceService;
use sleepsync::config::SystemConfig;

fn make_device() -> (DeviceService, MockHardware, RecordingSink) {
    (
        DeviceService::new(SystemConfig::default()),
        MockHardware::new(),
        RecordingSink::new(),
    )
}

// ── JSON command path ─────────────────────────────────────────

#[test]
fn set_rgb_json_commands_led_and_acks() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(
        &json_frame(r#"{"command":"set_rgb","r":200,"g":100,"b":50}"#),
        &mut hw,
        &mut sink,
    );

    // Default brightness 255 passes channels through unchanged.
    assert_eq!(hw.current_rgb(), (200, 100, 50));

    let (command, success, message) = sink.last_response().unwrap();
    assert_eq!(command, "set_rgb");
    assert!(success);
    assert_eq!(message, "Color set to (200, 100, 50)");
}

#[test]
fn night_light_applies_warm_preset_dimmed() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"night_light"}"#), &mut hw, &mut sink);

    // Warm white (255, 147, 41) scaled by brightness 40/255.
    assert_eq!(hw.current_rgb(), (40, 23, 6));
    assert_eq!(sink.last_response().unwrap().2, "Night light on");
}

#[test]
fn brightness_rescales_current_colour() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(
        &json_frame(r#"{"command":"set_rgb","r":200,"g":100,"b":50}"#),
        &mut hw,
        &mut sink,
    );
    svc.handle_frame(
        &json_frame(r#"{"command":"set_brightness","brightness":128}"#),
        &mut hw,
        &mut sink,
    );

    assert_eq!(hw.current_rgb(), (100, 50, 25));
    assert_eq!(svc.state().rgb.red, 200, "base colour must survive dimming");
}

#[test]
fn get_status_acks_then_reports() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"get_status"}"#), &mut hw, &mut sink);

    assert_eq!(sink.events.len(), 2, "ack followed by status payload");
    assert!(matches!(&sink.events[0], AppEvent::Response { success: true, .. }));
    assert!(matches!(&sink.events[1], AppEvent::Status(_)));
}

#[test]
fn get_sensors_returns_latest_snapshot() {
    let (mut svc, mut hw, mut sink) = make_device();

    let snap = sleepsync::app::state::SensorSnapshot {
        light_level: 1234,
        temperature: 21.5,
        humidity: 40.0,
        timestamp: 42,
        ..Default::default()
    };
    svc.update_sensors(snap);

    svc.handle_frame(&json_frame(r#"{"command":"get_sensors"}"#), &mut hw, &mut sink);

    match &sink.events[1] {
        AppEvent::Sensors(s) => {
            assert_eq!(s.light_level, 1234);
            assert_eq!(s.timestamp, 42);
        }
        other => panic!("expected Sensors payload, got {other:?}"),
    }
}

// ── Plain-text token path ─────────────────────────────────────

#[test]
fn status_token_behaves_like_get_status() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&line_frame("STATUS"), &mut hw, &mut sink);

    let (command, success, _) = sink.last_response().unwrap();
    assert_eq!(command, "STATUS", "token echoed verbatim");
    assert!(success);
    assert_eq!(sink.status_count(), 1);
}

#[test]
fn buzzer_test_token_plays_defaults() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&line_frame("BUZZER_TEST"), &mut hw, &mut sink);

    assert_eq!(
        hw.calls,
        vec![ActuatorCall::PlayTone {
            frequency_hz: 1000,
            volume: 100,
            duration_ms: 1000,
        }]
    );
    assert_eq!(sink.last_response().unwrap().2, "Buzzer test complete");
}

#[test]
fn preset_token_sets_colour() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&line_frame("BLUE_CALM"), &mut hw, &mut sink);

    assert_eq!(hw.current_rgb(), (0, 64, 160));
    assert!(sink.last_response().unwrap().1);
}

// ── Rejections ────────────────────────────────────────────────

#[test]
fn malformed_json_gets_failure_response() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command"}"#), &mut hw, &mut sink);

    let (command, success, message) = sink.last_response().unwrap();
    assert!(command.is_empty(), "no name to echo from unparseable JSON");
    assert!(!success);
    assert_eq!(message, "Invalid JSON");
    assert!(hw.calls.is_empty(), "rejected frames must not touch hardware");
}

#[test]
fn unknown_command_echoes_name_in_failure() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"levitate"}"#), &mut hw, &mut sink);

    let (command, success, message) = sink.last_response().unwrap();
    assert_eq!(command, "levitate");
    assert!(!success);
    assert_eq!(message, "Unknown command: levitate");
}

#[test]
fn every_frame_gets_exactly_one_response() {
    let (mut svc, mut hw, mut sink) = make_device();

    let frames = [
        json_frame(r#"{"command":"set_rgb","r":1,"g":2,"b":3}"#),
        json_frame(r#"{"command":"nonsense"}"#),
        line_frame("GARBAGE_TOKEN"),
        json_frame(r#"{"command":"enable_alarm"}"#),
        json_frame(r#"not json at all"#),
    ];
    for frame in &frames {
        svc.handle_frame(frame, &mut hw, &mut sink);
    }

    assert_eq!(sink.responses().len(), frames.len());
}

// ── State commands ────────────────────────────────────────────

#[test]
fn reset_disables_alarm_but_keeps_bedtime() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"enable_alarm"}"#), &mut hw, &mut sink);
    svc.handle_frame(
        &json_frame(r#"{"command":"set_bedtime","hour":21,"minute":30}"#),
        &mut hw,
        &mut sink,
    );
    svc.handle_frame(&json_frame(r#"{"command":"reset"}"#), &mut hw, &mut sink);

    assert!(!svc.state().alarm_enabled);
    let bedtime = svc.state().bedtime.unwrap();
    assert_eq!((bedtime.hour, bedtime.minute), (21, 30));
    assert_eq!(sink.last_response().unwrap().2, "Device reset");
}

#[test]
fn set_bedtime_formats_confirmation() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(
        &json_frame(r#"{"command":"set_bedtime","hour":8,"minute":5}"#),
        &mut hw,
        &mut sink,
    );

    assert_eq!(sink.last_response().unwrap().2, "Bedtime set to 08:05");
}
