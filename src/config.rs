//! System configuration parameters
//!
//! All tunable parameters for the SleepSync pebble.
//! No persistence — defaults apply at every boot.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Effect / control loop tick interval (milliseconds)
    pub control_tick_ms: u32,
    /// Sensor poll interval (milliseconds)
    pub sensor_poll_ms: u32,
    /// Telemetry report interval (milliseconds)
    pub telemetry_interval_ms: u32,

    // --- Light effects ---
    /// Total sunrise ramp duration (seconds)
    pub sunrise_duration_secs: u32,
    /// Total sunset fade duration (seconds)
    pub sunset_duration_secs: u32,
    /// Total rainbow sweep duration (seconds)
    pub rainbow_duration_secs: u32,

    // --- Alarm ---
    /// Tone frequency at the first alarm cycle (Hz)
    pub alarm_start_freq_hz: u16,
    /// Tone frequency ceiling (Hz)
    pub alarm_max_freq_hz: u16,
    /// Volume at the first alarm cycle (0-255 duty)
    pub alarm_start_volume: u8,
    /// Volume ceiling (0-255 duty)
    pub alarm_max_volume: u8,
    /// Cycles over which frequency/volume ramp to their maxima
    pub alarm_ramp_cycles: u32,
    /// Tone-on phase per alarm cycle (milliseconds)
    pub alarm_on_ms: u32,
    /// Silent phase per alarm cycle (milliseconds, shorter than on phase)
    pub alarm_off_ms: u32,
    /// Unattended alarm auto-stop cutoff (seconds)
    pub alarm_auto_stop_secs: u32,

    // --- Sensors ---
    /// ADC reading below which the room is classified as dark
    pub light_dark_threshold: u16,
    /// ADC reading above which the room is classified as bright
    pub light_bright_threshold: u16,
    /// Minimum gap between sound_event records (milliseconds)
    pub sound_cooldown_ms: u32,
    /// Minimum interval between climate sensor reads (milliseconds)
    pub climate_min_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            control_tick_ms: 50,          // 20 Hz effect stepping
            sensor_poll_ms: 500,          // 2 Hz
            telemetry_interval_ms: 2_000, // 0.5 Hz

            // Light effects
            sunrise_duration_secs: 300,
            sunset_duration_secs: 300,
            rainbow_duration_secs: 30,

            // Alarm
            alarm_start_freq_hz: 800,
            alarm_max_freq_hz: 2_500,
            alarm_start_volume: 40,
            alarm_max_volume: 200,
            alarm_ramp_cycles: 30,
            alarm_on_ms: 600,
            alarm_off_ms: 250,
            alarm_auto_stop_secs: 600,

            // Sensors
            light_dark_threshold: 800,
            light_bright_threshold: 2_000,
            sound_cooldown_ms: 2_000,
            climate_min_interval_ms: 2_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.control_tick_ms > 0);
        assert!(c.alarm_max_freq_hz > c.alarm_start_freq_hz);
        assert!(c.alarm_max_volume > c.alarm_start_volume);
        assert!(c.alarm_ramp_cycles > 0);
        assert!(c.sunrise_duration_secs > 0);
        assert!(c.sunset_duration_secs > 0);
        assert!(c.light_bright_threshold > c.light_dark_threshold);
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.alarm_start_freq_hz, c2.alarm_start_freq_hz);
        assert_eq!(c.sunrise_duration_secs, c2.sunrise_duration_secs);
        assert_eq!(c.sound_cooldown_ms, c2.sound_cooldown_ms);
    }

    #[test]
    fn alarm_off_phase_shorter_than_on_phase() {
        let c = SystemConfig::default();
        assert!(
            c.alarm_off_ms < c.alarm_on_ms,
            "silent gap must be shorter than the tone phase"
        );
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = SystemConfig::default();
        assert!(
            c.control_tick_ms < c.sensor_poll_ms,
            "effect stepping should be faster than sensor polling"
        );
        assert!(
            c.sensor_poll_ms < c.telemetry_interval_ms,
            "sensor polling should be faster than telemetry"
        );
    }
}
