//! Command decoding — JSON frames and plain-text tokens into one tagged enum.
//!
//! The interpreter decodes each frame exactly once into [`Command`] and
//! dispatches by pattern match; no string comparisons survive past this
//! module.  Both input framings land on the same enum, so the rest of the
//! firmware never knows which flavour the client spoke.

use serde_json::Value;

use crate::app::events::MAX_COMMAND_NAME;
use crate::error::CommandError;

/// A decoded request, ephemeral — consumed by one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartSunrise,
    StartSunset,
    StartAlarm,
    StopAlarm,
    StartRainbow,
    NightLight,
    SetRgb {
        r: u8,
        g: u8,
        b: u8,
    },
    SetBrightness {
        brightness: u8,
    },
    EnableAlarm,
    DisableAlarm,
    TestBuzzer {
        frequency: u16,
        volume: u8,
        duration_ms: u32,
    },
    GetStatus,
    GetSensors,
    StopAll,
    Reset,
    SetBedtime {
        hour: u8,
        minute: u8,
    },
}

/// Name string echoed back in the `command_response` record.
pub type CommandName = heapless::String<MAX_COMMAND_NAME>;

/// A successfully decoded command together with its echo name.
#[derive(Debug, Clone)]
pub struct ParsedCommand {
    pub name: CommandName,
    pub command: Command,
}

/// A rejected frame: the error plus whatever name we could still echo.
///
/// `name` is empty when the frame never yielded a command name
/// (unparseable JSON, missing field).
#[derive(Debug, Clone)]
pub struct ParseFailure {
    pub name: CommandName,
    pub error: CommandError,
}

/// Static colour presets reachable from the plain-text token set.
pub const RED_AMBIENT: (u8, u8, u8) = (160, 0, 0);
pub const BLUE_CALM: (u8, u8, u8) = (0, 64, 160);

/// test_buzzer defaults when params are omitted.
const BUZZER_DEFAULT_FREQ_HZ: u16 = 1_000;
const BUZZER_DEFAULT_VOLUME: u8 = 100;
const BUZZER_DEFAULT_DURATION_MS: u32 = 1_000;

// ───────────────────────────────────────────────────────────────
// JSON frames
// ───────────────────────────────────────────────────────────────

/// Decode one complete JSON frame into a [`Command`].
pub fn parse_json(frame: &[u8]) -> Result<ParsedCommand, ParseFailure> {
    let value: Value = serde_json::from_slice(frame).map_err(|_| ParseFailure {
        name: CommandName::new(),
        error: CommandError::BadJson,
    })?;

    let Some(obj) = value.as_object() else {
        return Err(ParseFailure {
            name: CommandName::new(),
            error: CommandError::MissingCommand,
        });
    };

    let Some(raw_name) = obj.get("command").and_then(Value::as_str) else {
        return Err(ParseFailure {
            name: CommandName::new(),
            error: CommandError::MissingCommand,
        });
    };
    let name = echo_name(raw_name);

    let command = match raw_name {
        "start_sunrise" => Command::StartSunrise,
        "start_sunset" => Command::StartSunset,
        "start_alarm" => Command::StartAlarm,
        "stop_alarm" => Command::StopAlarm,
        "start_rainbow" => Command::StartRainbow,
        "night_light" => Command::NightLight,
        "enable_alarm" => Command::EnableAlarm,
        "disable_alarm" => Command::DisableAlarm,
        "get_status" => Command::GetStatus,
        "get_sensors" => Command::GetSensors,
        "stop_all" => Command::StopAll,
        "reset" => Command::Reset,

        "set_rgb" => Command::SetRgb {
            r: clamped_u8(obj, "r").map_err(fail(&name))?,
            g: clamped_u8(obj, "g").map_err(fail(&name))?,
            b: clamped_u8(obj, "b").map_err(fail(&name))?,
        },

        "set_brightness" => Command::SetBrightness {
            brightness: clamped_u8(obj, "brightness").map_err(fail(&name))?,
        },

        "test_buzzer" => Command::TestBuzzer {
            frequency: opt_frequency(obj, "frequency", BUZZER_DEFAULT_FREQ_HZ)
                .map_err(fail(&name))?,
            volume: opt_clamped_u8(obj, "volume", BUZZER_DEFAULT_VOLUME).map_err(fail(&name))?,
            duration_ms: opt_duration(obj, "duration", BUZZER_DEFAULT_DURATION_MS)
                .map_err(fail(&name))?,
        },

        "set_bedtime" => Command::SetBedtime {
            hour: ranged_u8(obj, "hour", 23).map_err(fail(&name))?,
            minute: ranged_u8(obj, "minute", 59).map_err(fail(&name))?,
        },

        _ => {
            return Err(ParseFailure {
                name,
                error: CommandError::UnknownCommand,
            });
        }
    };

    Ok(ParsedCommand { name, command })
}

// ───────────────────────────────────────────────────────────────
// Plain-text tokens
// ───────────────────────────────────────────────────────────────

/// Decode one CR/LF-terminated uppercase token into a [`Command`].
///
/// The token is echoed verbatim in the response even when unknown.
pub fn parse_token(line: &str) -> Result<ParsedCommand, ParseFailure> {
    let name = echo_name(line);

    let command = match line {
        "FAST_SUNRISE" | "TRIGGER_SUNRISE" => Command::StartSunrise,
        "TRIGGER_SUNSET" => Command::StartSunset,
        "TRIGGER_ALARM" => Command::StartAlarm,
        "STOP_ALARM" => Command::StopAlarm,
        "RAINBOW" => Command::StartRainbow,
        "NIGHT_LIGHT" => Command::NightLight,
        "ENABLE_ALARM" => Command::EnableAlarm,
        "DISABLE_ALARM" => Command::DisableAlarm,
        "STATUS" => Command::GetStatus,
        "BUZZER_TEST" => Command::TestBuzzer {
            frequency: BUZZER_DEFAULT_FREQ_HZ,
            volume: BUZZER_DEFAULT_VOLUME,
            duration_ms: BUZZER_DEFAULT_DURATION_MS,
        },
        "RED_AMBIENT" => Command::SetRgb {
            r: RED_AMBIENT.0,
            g: RED_AMBIENT.1,
            b: RED_AMBIENT.2,
        },
        "BLUE_CALM" => Command::SetRgb {
            r: BLUE_CALM.0,
            g: BLUE_CALM.1,
            b: BLUE_CALM.2,
        },
        _ => {
            return Err(ParseFailure {
                name,
                error: CommandError::UnknownCommand,
            });
        }
    };

    Ok(ParsedCommand { name, command })
}

// ───────────────────────────────────────────────────────────────
// Param helpers
// ───────────────────────────────────────────────────────────────

/// Required integer, clamped into 0..=255.  Out-of-range values are
/// clamped, never rejected; only wrong types and absence fail.
fn clamped_u8(obj: &serde_json::Map<String, Value>, key: &'static str) -> Result<u8, CommandError> {
    match obj.get(key) {
        Some(v) => v
            .as_i64()
            .map(|n| n.clamp(0, 255) as u8)
            .ok_or(CommandError::InvalidParams(key)),
        None => Err(CommandError::InvalidParams(key)),
    }
}

/// Optional integer with a default, clamped into 0..=255.
fn opt_clamped_u8(
    obj: &serde_json::Map<String, Value>,
    key: &'static str,
    default: u8,
) -> Result<u8, CommandError> {
    match obj.get(key) {
        Some(v) => v
            .as_i64()
            .map(|n| n.clamp(0, 255) as u8)
            .ok_or(CommandError::InvalidParams(key)),
        None => Ok(default),
    }
}

/// Optional tone frequency, clamped to the drivable PWM range.
fn opt_frequency(
    obj: &serde_json::Map<String, Value>,
    key: &'static str,
    default: u16,
) -> Result<u16, CommandError> {
    match obj.get(key) {
        Some(v) => v
            .as_i64()
            .map(|n| n.clamp(20, 20_000) as u16)
            .ok_or(CommandError::InvalidParams(key)),
        None => Ok(default),
    }
}

/// Optional duration in milliseconds.  Negative values are rejected;
/// large values pass through (a huge test tone blocks the control loop,
/// documented behaviour).
fn opt_duration(
    obj: &serde_json::Map<String, Value>,
    key: &'static str,
    default: u32,
) -> Result<u32, CommandError> {
    match obj.get(key) {
        Some(v) => match v.as_i64() {
            Some(n) if n >= 0 => Ok(u32::try_from(n).unwrap_or(u32::MAX)),
            _ => Err(CommandError::InvalidParams(key)),
        },
        None => Ok(default),
    }
}

/// Required integer validated against 0..=max (not clamped — a bedtime
/// of hour 30 is a caller bug, not a value to round).
fn ranged_u8(
    obj: &serde_json::Map<String, Value>,
    key: &'static str,
    max: u8,
) -> Result<u8, CommandError> {
    match obj.get(key).and_then(Value::as_i64) {
        Some(n) if n >= 0 && n <= i64::from(max) => Ok(n as u8),
        _ => Err(CommandError::InvalidParams(key)),
    }
}

fn echo_name(raw: &str) -> CommandName {
    let mut name = CommandName::new();
    for ch in raw.chars() {
        if name.push(ch).is_err() {
            break; // keep the truncated prefix
        }
    }
    name
}

fn fail(name: &CommandName) -> impl Fn(CommandError) -> ParseFailure + '_ {
    move |error| ParseFailure {
        name: name.clone(),
        error,
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_commands_decode() {
        let p = parse_json(br#"{"command":"start_sunrise"}"#).unwrap();
        assert_eq!(p.command, Command::StartSunrise);
        assert_eq!(p.name.as_str(), "start_sunrise");

        let p = parse_json(br#"{"command":"stop_all"}"#).unwrap();
        assert_eq!(p.command, Command::StopAll);
    }

    #[test]
    fn set_rgb_params_are_clamped() {
        let p = parse_json(br#"{"command":"set_rgb","r":300,"g":-5,"b":128}"#).unwrap();
        assert_eq!(
            p.command,
            Command::SetRgb {
                r: 255,
                g: 0,
                b: 128
            }
        );
    }

    #[test]
    fn set_rgb_missing_param_is_invalid() {
        let err = parse_json(br#"{"command":"set_rgb","r":10,"g":20}"#).unwrap_err();
        assert_eq!(err.error, CommandError::InvalidParams("b"));
        assert_eq!(err.name.as_str(), "set_rgb");
    }

    #[test]
    fn set_rgb_wrong_type_is_invalid() {
        let err = parse_json(br#"{"command":"set_rgb","r":"red","g":0,"b":0}"#).unwrap_err();
        assert_eq!(err.error, CommandError::InvalidParams("r"));
    }

    #[test]
    fn test_buzzer_defaults_apply() {
        let p = parse_json(br#"{"command":"test_buzzer"}"#).unwrap();
        assert_eq!(
            p.command,
            Command::TestBuzzer {
                frequency: 1000,
                volume: 100,
                duration_ms: 1000
            }
        );
    }

    #[test]
    fn test_buzzer_explicit_params() {
        let p =
            parse_json(br#"{"command":"test_buzzer","frequency":440,"volume":80,"duration":250}"#)
                .unwrap();
        assert_eq!(
            p.command,
            Command::TestBuzzer {
                frequency: 440,
                volume: 80,
                duration_ms: 250
            }
        );
    }

    #[test]
    fn negative_duration_rejected() {
        let err = parse_json(br#"{"command":"test_buzzer","duration":-1}"#).unwrap_err();
        assert_eq!(err.error, CommandError::InvalidParams("duration"));
    }

    #[test]
    fn bedtime_ranges_validated_not_clamped() {
        let p = parse_json(br#"{"command":"set_bedtime","hour":21,"minute":30}"#).unwrap();
        assert_eq!(
            p.command,
            Command::SetBedtime {
                hour: 21,
                minute: 30
            }
        );

        let err = parse_json(br#"{"command":"set_bedtime","hour":24,"minute":0}"#).unwrap_err();
        assert_eq!(err.error, CommandError::InvalidParams("hour"));

        let err = parse_json(br#"{"command":"set_bedtime","hour":8,"minute":60}"#).unwrap_err();
        assert_eq!(err.error, CommandError::InvalidParams("minute"));
    }

    #[test]
    fn unknown_command_echoes_name() {
        let err = parse_json(br#"{"command":"unknown_cmd"}"#).unwrap_err();
        assert_eq!(err.error, CommandError::UnknownCommand);
        assert_eq!(err.name.as_str(), "unknown_cmd");
    }

    #[test]
    fn missing_command_field() {
        let err = parse_json(br#"{"foo":1}"#).unwrap_err();
        assert_eq!(err.error, CommandError::MissingCommand);
        assert!(err.name.is_empty());
    }

    #[test]
    fn non_string_command_field() {
        let err = parse_json(br#"{"command":42}"#).unwrap_err();
        assert_eq!(err.error, CommandError::MissingCommand);
    }

    #[test]
    fn non_object_json_is_missing_command() {
        let err = parse_json(b"[1,2,3]").unwrap_err();
        assert_eq!(err.error, CommandError::MissingCommand);
    }

    #[test]
    fn garbage_is_bad_json() {
        let err = parse_json(b"{not json").unwrap_err();
        assert_eq!(err.error, CommandError::BadJson);
        assert!(err.name.is_empty());
    }

    #[test]
    fn command_names_are_case_sensitive() {
        let err = parse_json(br#"{"command":"START_SUNRISE"}"#).unwrap_err();
        assert_eq!(err.error, CommandError::UnknownCommand);
    }

    #[test]
    fn tokens_map_to_commands() {
        assert_eq!(
            parse_token("FAST_SUNRISE").unwrap().command,
            Command::StartSunrise
        );
        assert_eq!(
            parse_token("TRIGGER_SUNSET").unwrap().command,
            Command::StartSunset
        );
        assert_eq!(
            parse_token("TRIGGER_ALARM").unwrap().command,
            Command::StartAlarm
        );
        assert_eq!(
            parse_token("STOP_ALARM").unwrap().command,
            Command::StopAlarm
        );
        assert_eq!(parse_token("STATUS").unwrap().command, Command::GetStatus);
        assert_eq!(
            parse_token("RAINBOW").unwrap().command,
            Command::StartRainbow
        );
        assert_eq!(
            parse_token("NIGHT_LIGHT").unwrap().command,
            Command::NightLight
        );
    }

    #[test]
    fn preset_tokens_become_set_rgb() {
        let p = parse_token("RED_AMBIENT").unwrap();
        assert_eq!(
            p.command,
            Command::SetRgb {
                r: RED_AMBIENT.0,
                g: RED_AMBIENT.1,
                b: RED_AMBIENT.2
            }
        );
        assert_eq!(p.name.as_str(), "RED_AMBIENT");
    }

    #[test]
    fn buzzer_test_token_uses_defaults() {
        let p = parse_token("BUZZER_TEST").unwrap();
        assert_eq!(
            p.command,
            Command::TestBuzzer {
                frequency: 1000,
                volume: 100,
                duration_ms: 1000
            }
        );
    }

    #[test]
    fn unknown_token_echoes_raw() {
        let err = parse_token("MAKE_COFFEE").unwrap_err();
        assert_eq!(err.error, CommandError::UnknownCommand);
        assert_eq!(err.name.as_str(), "MAKE_COFFEE");
    }

    #[test]
    fn overlong_name_is_truncated_in_echo() {
        let long = "x".repeat(100);
        let frame = format!(r#"{{"command":"{long}"}}"#);
        let err = parse_json(frame.as_bytes()).unwrap_err();
        assert_eq!(err.error, CommandError::UnknownCommand);
        assert_eq!(err.name.len(), MAX_COMMAND_NAME);
    }
}
