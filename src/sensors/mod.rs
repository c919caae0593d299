//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces a
//! [`SensorSnapshot`](crate::app::state::SensorSnapshot) each poll tick.
//! Individual read failures never propagate: the snapshot carries the
//! previous good value forward and flags it internally.

pub mod climate;
pub mod light;
pub mod sound;

use log::warn;

use crate::app::ports::SensorPort;
use crate::app::state::SensorSnapshot;
use crate::config::SystemConfig;
use crate::error::SensorError;
use climate::ClimateSensor;
use light::LightSensor;
use sound::SoundSensor;

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub {
    light: LightSensor,
    pub sound: SoundSensor,
    climate: ClimateSensor,
    /// Last good climate values, carried forward across failed reads.
    last_temperature: f32,
    last_humidity: f32,
    climate_valid: bool,
}

impl SensorHub {
    pub fn new(cfg: &SystemConfig) -> Self {
        Self {
            light: LightSensor::new(cfg.light_dark_threshold, cfg.light_bright_threshold),
            sound: SoundSensor::new(cfg.sound_cooldown_ms),
            climate: ClimateSensor::new(cfg.climate_min_interval_ms),
            last_temperature: 0.0,
            last_humidity: 0.0,
            climate_valid: false,
        }
    }
}

impl SensorPort for SensorHub {
    /// Read every sensor and return a unified snapshot.
    ///
    /// A flaky sensor must not crash the control loop: climate errors
    /// are logged and the last-known values substituted.
    fn poll(&mut self, now_us: u64) -> SensorSnapshot {
        let light_level = self.light.read();
        let sound_detected = self.sound.level();

        match self.climate.read(now_us) {
            Ok(reading) => {
                self.last_temperature = reading.temperature;
                self.last_humidity = reading.humidity;
                self.climate_valid = true;
            }
            // Between sampling windows the previous reading is current.
            Err(SensorError::TooSoon) => {}
            Err(e) => {
                warn!("SENSOR | climate read failed: {e}");
                self.climate_valid = false;
            }
        }

        SensorSnapshot {
            light_level,
            sound_detected,
            temperature: self.last_temperature,
            humidity: self.last_humidity,
            timestamp: now_us,
            climate_valid: self.climate_valid,
        }
    }
}
