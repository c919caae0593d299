//! Device state — the single owned "blackboard" of the firmware.
//!
//! Exactly one [`DeviceState`] instance exists, owned by the
//! [`DeviceService`](super::service::DeviceService).  The command
//! interpreter and effect executors mutate it through exclusive
//! references; the telemetry path only copies out of it.

/// Base RGB colour plus a brightness scaler.
///
/// The stored channels are the last commanded colour; `brightness`
/// scales them on the way to the LED driver so dimming never loses
/// colour information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbState {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub brightness: u8,
}

impl Default for RgbState {
    fn default() -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            brightness: 255,
        }
    }
}

impl RgbState {
    /// Channel values after brightness scaling — what actually reaches
    /// the LED driver.
    pub fn scaled(&self) -> (u8, u8, u8) {
        let s = |c: u8| ((u16::from(c) * u16::from(self.brightness)) / 255) as u8;
        (s(self.red), s(self.green), s(self.blue))
    }

    pub fn is_off(&self) -> bool {
        self.red == 0 && self.green == 0 && self.blue == 0
    }
}

/// Configured wind-down time (24 h clock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bedtime {
    pub hour: u8,
    pub minute: u8,
}

/// Current output state of the device.
///
/// Invariant: at most one of `sunrise_active`, `sunset_active`,
/// `alarm_active` is true at any time (enforced by the effect engine).
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    pub alarm_enabled: bool,
    pub alarm_active: bool,
    pub sunrise_active: bool,
    pub sunset_active: bool,
    /// Live alarm tone frequency (Hz) while the alarm ramps; 0 otherwise.
    pub alarm_frequency: u16,
    /// Live alarm volume (0-255 duty) while the alarm ramps; 0 otherwise.
    pub alarm_volume: u8,
    pub rgb: RgbState,
    /// Not part of the wire status record.
    pub bedtime: Option<Bedtime>,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while any long-running effect drives the outputs.
    pub fn any_effect_active(&self) -> bool {
        self.sunrise_active || self.sunset_active || self.alarm_active
    }

    /// Clear every effect-active flag and the live alarm ramp mirror.
    pub fn clear_effect_flags(&mut self) {
        self.sunrise_active = false;
        self.sunset_active = false;
        self.alarm_active = false;
        self.alarm_frequency = 0;
        self.alarm_volume = 0;
    }

    /// Copy the wire-visible fields for a `device_status` record.
    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            alarm_enabled: self.alarm_enabled,
            alarm_active: self.alarm_active,
            sunrise_active: self.sunrise_active,
            sunset_active: self.sunset_active,
            alarm_frequency: self.alarm_frequency,
            alarm_volume: self.alarm_volume,
            rgb: (self.rgb.red, self.rgb.green, self.rgb.blue),
        }
    }
}

/// Wire-visible slice of [`DeviceState`], detached so the telemetry
/// path never borrows the live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub alarm_enabled: bool,
    pub alarm_active: bool,
    pub sunrise_active: bool,
    pub sunset_active: bool,
    pub alarm_frequency: u16,
    pub alarm_volume: u8,
    pub rgb: (u8, u8, u8),
}

/// A point-in-time snapshot of every sensor.
///
/// `climate_valid` is internal only: when a climate read fails the
/// previous good temperature/humidity are carried forward and the
/// flag goes false.  It never appears on the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSnapshot {
    /// Averaged photoresistor reading (0 – 4095).
    pub light_level: u16,
    /// Instantaneous sound detector level.
    pub sound_detected: bool,
    /// Last-known temperature (°C).
    pub temperature: f32,
    /// Last-known relative humidity (%).
    pub humidity: f32,
    /// Monotonic microseconds at poll time.
    pub timestamp: u64,
    /// False while temperature/humidity are stale carry-forwards.
    pub climate_valid: bool,
}
