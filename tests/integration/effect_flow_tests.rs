//! Integration tests for effect lifecycles driven through serial frames.
//!
//! Exercises start/preempt/stop/complete paths end to end: frame in,
//! effect engine stepping via `tick`, actuator calls and wire events out.

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingSink, json_frame, line_frame};

use sleepsync::app::ports::BedtimeDelegate;
use sleepsync::app::service::DeviceService;
use sleepsync::config::SystemConfig;
use sleepsync::scheduler::BedtimeScheduler;

fn fast_config() -> SystemConfig {
    SystemConfig {
        sunrise_duration_secs: 1,
        sunset_duration_secs: 1,
        rainbow_duration_secs: 1,
        alarm_auto_stop_secs: 5,
        ..Default::default()
    }
}

fn make_device() -> (DeviceService, MockHardware, RecordingSink) {
    (
        DeviceService::new(fast_config()),
        MockHardware::new(),
        RecordingSink::new(),
    )
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn sunrise_completes_and_leaves_lamp_on() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"start_sunrise"}"#), &mut hw, &mut sink);
    assert!(svc.state().sunrise_active);

    // Run well past the 1 s total duration.
    svc.tick(2_000, &mut hw, &mut sink);

    assert!(!svc.state().sunrise_active, "flag clears on completion");
    assert_ne!(hw.current_rgb(), (0, 0, 0), "lamp stays at the final step");
    assert_eq!(sink.status_count(), 1, "completion reports exactly once");

    // Further ticks stay silent.
    svc.tick(2_000, &mut hw, &mut sink);
    assert_eq!(sink.status_count(), 1);
}

#[test]
fn duplicate_start_is_rejected_without_restarting() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"start_sunrise"}"#), &mut hw, &mut sink);
    let calls_after_start = hw.calls.len();

    svc.handle_frame(&json_frame(r#"{"command":"start_sunrise"}"#), &mut hw, &mut sink);

    let (_, success, message) = sink.last_response().unwrap();
    assert!(!success);
    assert_eq!(message, "Sunrise already active");
    assert_eq!(hw.calls.len(), calls_after_start, "running effect untouched");
}

#[test]
fn new_effect_preempts_the_running_one() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"start_sunrise"}"#), &mut hw, &mut sink);
    svc.handle_frame(&line_frame("TRIGGER_SUNSET"), &mut hw, &mut sink);

    assert!(sink.last_response().unwrap().1, "preempting start succeeds");
    assert!(svc.state().sunset_active);
    assert!(!svc.state().sunrise_active);

    // Outputs are killed before the new effect's first step.
    let all_off_pos = hw
        .calls
        .iter()
        .position(|c| *c == ActuatorCall::AllOff)
        .expect("preemption must pass through all_off");
    let last_rgb_pos = hw
        .calls
        .iter()
        .rposition(|c| matches!(c, ActuatorCall::SetRgb { .. }))
        .unwrap();
    assert!(all_off_pos < last_rgb_pos);
}

#[test]
fn stop_all_is_idempotent() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"start_rainbow"}"#), &mut hw, &mut sink);
    svc.handle_frame(&json_frame(r#"{"command":"stop_all"}"#), &mut hw, &mut sink);
    svc.handle_frame(&json_frame(r#"{"command":"stop_all"}"#), &mut hw, &mut sink);

    let responses = sink.responses();
    assert!(responses[1].1 && responses[2].1, "stop_all never fails");
    assert_eq!(hw.current_rgb(), (0, 0, 0));
}

// ── Alarm ─────────────────────────────────────────────────────

#[test]
fn alarm_sounds_and_stop_silences() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"start_alarm"}"#), &mut hw, &mut sink);
    assert!(svc.state().alarm_active);
    assert!(hw.buzzer_on(), "first on-phase tone starts immediately");
    assert_eq!(svc.state().alarm_frequency, 800);

    svc.handle_frame(&json_frame(r#"{"command":"stop_alarm"}"#), &mut hw, &mut sink);
    assert!(!svc.state().alarm_active);
    assert!(!hw.buzzer_on());
    assert_eq!(sink.last_response().unwrap().2, "Alarm stopped");
}

#[test]
fn stop_alarm_without_alarm_fails() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"stop_alarm"}"#), &mut hw, &mut sink);

    let (_, success, message) = sink.last_response().unwrap();
    assert!(!success);
    assert_eq!(message, "No alarm active");
}

#[test]
fn stop_alarm_does_not_stop_light_effects() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"start_sunset"}"#), &mut hw, &mut sink);
    svc.handle_frame(&json_frame(r#"{"command":"stop_alarm"}"#), &mut hw, &mut sink);

    assert!(!sink.last_response().unwrap().1);
    assert!(svc.state().sunset_active, "sunset keeps running");
}

#[test]
fn disable_alarm_kills_a_sounding_alarm() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"enable_alarm"}"#), &mut hw, &mut sink);
    svc.handle_frame(&json_frame(r#"{"command":"start_alarm"}"#), &mut hw, &mut sink);
    svc.handle_frame(&json_frame(r#"{"command":"disable_alarm"}"#), &mut hw, &mut sink);

    assert!(!svc.state().alarm_enabled);
    assert!(!svc.state().alarm_active);
    assert!(!hw.buzzer_on());
}

#[test]
fn unattended_alarm_auto_stops() {
    let (mut svc, mut hw, mut sink) = make_device();

    svc.handle_frame(&json_frame(r#"{"command":"start_alarm"}"#), &mut hw, &mut sink);

    // Step past the 5 s cutoff in control-tick-sized increments.
    for _ in 0..120 {
        svc.tick(50, &mut hw, &mut sink);
    }

    assert!(!svc.state().alarm_active);
    assert!(!hw.buzzer_on());
    assert_eq!(sink.status_count(), 1, "auto-stop reports completion");
}

// ── Bedtime ───────────────────────────────────────────────────

struct QueueProbe {
    fired: u32,
}

impl BedtimeDelegate for QueueProbe {
    fn on_bedtime(&mut self) {
        self.fired += 1;
    }
}

#[test]
fn bedtime_starts_sunset_once() {
    let (mut svc, mut hw, mut sink) = make_device();
    let mut sched = BedtimeScheduler::new();
    let mut probe = QueueProbe { fired: 0 };

    svc.handle_frame(
        &json_frame(r#"{"command":"set_bedtime","hour":21,"minute":30}"#),
        &mut hw,
        &mut sink,
    );

    // Several control ticks inside the same minute fire exactly once.
    for _ in 0..5 {
        sched.tick(Some((21, 30)), svc.state().bedtime, &mut probe);
    }
    assert_eq!(probe.fired, 1);

    svc.on_bedtime(&mut hw, &mut sink);
    assert!(svc.state().sunset_active);
    assert_eq!(sink.status_count(), 1, "sunset start reports status");
}
