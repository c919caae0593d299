//! Alarm ramp math.
//!
//! The alarm alternates a tone-on phase and a shorter silent phase; on
//! every new cycle the tone frequency and volume step up a linear ramp
//! until both hit their configured maxima.  Pulling the math out of the
//! engine keeps it testable without any actuator plumbing.

use crate::config::SystemConfig;

/// Linear frequency/volume ramp, clamped at the configured maxima.
#[derive(Debug, Clone, Copy)]
pub struct AlarmRamp {
    start_freq_hz: u16,
    max_freq_hz: u16,
    start_volume: u8,
    max_volume: u8,
    ramp_cycles: u32,
}

impl AlarmRamp {
    pub fn from_config(cfg: &SystemConfig) -> Self {
        Self {
            start_freq_hz: cfg.alarm_start_freq_hz,
            max_freq_hz: cfg.alarm_max_freq_hz.max(cfg.alarm_start_freq_hz),
            start_volume: cfg.alarm_start_volume,
            max_volume: cfg.alarm_max_volume.max(cfg.alarm_start_volume),
            ramp_cycles: cfg.alarm_ramp_cycles.max(1),
        }
    }

    /// `(frequency_hz, volume)` for alarm cycle `cycle` (0-based).
    pub fn tone_at(&self, cycle: u32) -> (u16, u8) {
        let progress = cycle.min(self.ramp_cycles);

        let freq_span = u32::from(self.max_freq_hz - self.start_freq_hz);
        let freq = u32::from(self.start_freq_hz) + freq_span * progress / self.ramp_cycles;

        let vol_span = u32::from(self.max_volume - self.start_volume);
        let vol = u32::from(self.start_volume) + vol_span * progress / self.ramp_cycles;

        (freq as u16, vol as u8)
    }
}
