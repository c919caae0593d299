//! Integration tests for the byte stream → decoder → service pipeline.
//!
//! Feeds raw serial bytes (as a host client would send them) through the
//! combined decoder and hands each extracted frame to the service,
//! asserting on the resulting actuator calls and responses.

use crate::mock_hw::{MockHardware, RecordingSink, json_frame, line_frame};

use sleepsync::app::service::DeviceService;
use sleepsync::config::SystemConfig;
use sleepsync::link::channels::{FrameKind, FrameMsg};
use sleepsync::link::codec::{Frame, SerialDecoder};

/// Run bytes through the decoder, collecting owned frames.
fn decode_stream(bytes: &[u8]) -> Vec<FrameMsg> {
    let mut decoder = SerialDecoder::new();
    let mut frames = Vec::new();
    for &byte in bytes {
        if let Ok(Some(frame)) = decoder.feed(byte) {
            frames.push(match frame {
                Frame::Json(payload) => json_frame(core::str::from_utf8(payload).unwrap()),
                Frame::Line(token) => line_frame(token),
            });
        }
    }
    frames
}

#[test]
fn mixed_stream_decodes_in_order() {
    let frames = decode_stream(
        b"STATUS\r\n{\"command\":\"set_rgb\",\"r\":1,\"g\":2,\"b\":3}NIGHT_LIGHT\n",
    );

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].kind, FrameKind::Line);
    assert_eq!(frames[0].payload.as_slice(), b"STATUS");
    assert_eq!(frames[1].kind, FrameKind::Json);
    assert_eq!(frames[2].kind, FrameKind::Line);
    assert_eq!(frames[2].payload.as_slice(), b"NIGHT_LIGHT");
}

#[test]
fn full_session_from_bytes_to_actuators() {
    let mut svc = DeviceService::new(SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    let stream = b"{\"command\":\"enable_alarm\"}\n\
        {\"command\":\"set_rgb\",\"r\":10,\"g\":20,\"b\":30}\n\
        STATUS\r\n";
    for frame in decode_stream(stream) {
        svc.handle_frame(&frame, &mut hw, &mut sink);
    }

    assert_eq!(hw.current_rgb(), (10, 20, 30));
    assert!(svc.state().alarm_enabled);

    let responses = sink.responses();
    assert_eq!(responses.len(), 3);
    assert!(responses.iter().all(|(_, success, _)| *success));
    assert_eq!(responses[2].0, "STATUS");
    assert_eq!(sink.status_count(), 1);
}

#[test]
fn nested_json_objects_stay_one_frame() {
    // Nested braces must not terminate the frame early.
    let frames = decode_stream(b"{\"command\":\"x\",\"extra\":{\"a\":{\"b\":1}}}");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].kind, FrameKind::Json);
}

#[test]
fn noise_between_frames_is_dropped() {
    let frames = decode_stream(b"\r\n\r\n   \x00\x7f{\"command\":\"reset\"}junk\r\nSTATUS\r\n");

    // The stray "junk" token is still a Line frame (the service will
    // reject it with an unknown-command response); blank lines and
    // control bytes outside frames produce nothing.
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].kind, FrameKind::Json);
    assert_eq!(frames[1].payload.as_slice(), b"junk");
    assert_eq!(frames[2].payload.as_slice(), b"STATUS");
}

#[test]
fn overlong_line_is_discarded_and_stream_recovers() {
    let mut stream = vec![b'A'; 200];
    stream.extend_from_slice(b"\r\nSTATUS\r\n");

    let frames = decode_stream(&stream);

    assert_eq!(frames.len(), 1, "oversized token dropped, next one intact");
    assert_eq!(frames[0].payload.as_slice(), b"STATUS");
}
