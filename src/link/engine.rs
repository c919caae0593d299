//! Frame-to-command decode step shared by both input framings.
//!
//! Sits between the I/O task's channel and the
//! [`DeviceService`](crate::app::service::DeviceService): picks the
//! right parser for the frame kind and renders rejection messages.
//! Every frame, valid or not, yields material for exactly one
//! `command_response`.

use crate::app::commands::{self, ParseFailure, ParsedCommand};
use crate::error::CommandError;
use crate::link::channels::{FrameKind, FrameMsg};

/// Decode one inbound frame into a command.
pub fn decode(msg: &FrameMsg) -> Result<ParsedCommand, ParseFailure> {
    match msg.kind {
        FrameKind::Json => commands::parse_json(&msg.payload),
        FrameKind::Line => match core::str::from_utf8(&msg.payload) {
            Ok(line) => commands::parse_token(line),
            // The line decoder only emits valid UTF-8; this arm guards
            // against a malformed producer.
            Err(_) => Err(ParseFailure {
                name: commands::CommandName::new(),
                error: CommandError::BadJson,
            }),
        },
    }
}

/// Human-readable message for a rejected frame.
///
/// The unknown-command wording is part of the wire contract:
/// clients match on `Unknown command: <name>`.
pub fn failure_message(failure: &ParseFailure) -> String {
    match failure.error {
        CommandError::BadJson => "Invalid JSON".to_string(),
        CommandError::MissingCommand => "Missing 'command' field".to_string(),
        CommandError::UnknownCommand => format!("Unknown command: {}", failure.name),
        CommandError::InvalidParams(what) => format!("Invalid parameters: {what}"),
        CommandError::Conflict(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::commands::Command;
    use heapless::Vec;

    fn msg(kind: FrameKind, payload: &[u8]) -> FrameMsg {
        let mut v = Vec::new();
        v.extend_from_slice(payload).unwrap();
        FrameMsg { kind, payload: v }
    }

    #[test]
    fn json_frames_use_json_parser() {
        let parsed = decode(&msg(FrameKind::Json, br#"{"command":"get_status"}"#)).unwrap();
        assert_eq!(parsed.command, Command::GetStatus);
    }

    #[test]
    fn line_frames_use_token_parser() {
        let parsed = decode(&msg(FrameKind::Line, b"STATUS")).unwrap();
        assert_eq!(parsed.command, Command::GetStatus);
        assert_eq!(parsed.name.as_str(), "STATUS");
    }

    #[test]
    fn unknown_command_message_is_exact() {
        let failure = decode(&msg(FrameKind::Json, br#"{"command":"unknown_cmd"}"#)).unwrap_err();
        assert_eq!(failure_message(&failure), "Unknown command: unknown_cmd");
    }

    #[test]
    fn unknown_token_message_echoes_raw_token() {
        let failure = decode(&msg(FrameKind::Line, b"FROBNICATE")).unwrap_err();
        assert_eq!(failure_message(&failure), "Unknown command: FROBNICATE");
    }

    #[test]
    fn bad_json_message() {
        let failure = decode(&msg(FrameKind::Json, b"{oops")).unwrap_err();
        assert_eq!(failure_message(&failure), "Invalid JSON");
    }
}
