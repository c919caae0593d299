//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the actuator drivers and exposes them through [`ActuatorPort`]
//! (the sensor side is covered by
//! [`SensorHub`](crate::sensors::SensorHub) implementing
//! [`SensorPort`](crate::app::ports::SensorPort) directly).  On
//! non-espidf targets the underlying drivers use cfg-gated simulation
//! stubs.

#[cfg(not(target_os = "espidf"))]
use embedded_hal::delay::DelayNs;

use crate::app::ports::ActuatorPort;
use crate::drivers::buzzer::BuzzerDriver;
use crate::drivers::rgb_led::RgbLedDriver;

#[cfg(target_os = "espidf")]
type Delay = esp_idf_hal::delay::FreeRtos;

#[cfg(not(target_os = "espidf"))]
struct Delay;

#[cfg(not(target_os = "espidf"))]
impl DelayNs for Delay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}

/// Concrete adapter that combines the output hardware behind one port.
pub struct HardwareAdapter {
    led: RgbLedDriver,
    buzzer: BuzzerDriver,
    delay: Delay,
}

impl HardwareAdapter {
    pub fn new(led: RgbLedDriver, buzzer: BuzzerDriver) -> Self {
        Self {
            led,
            buzzer,
            delay: Delay {},
        }
    }
}

impl ActuatorPort for HardwareAdapter {
    fn set_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.led.set(r, g, b);
    }

    fn set_tone(&mut self, frequency_hz: u16, volume: u8) {
        self.buzzer.set_tone(frequency_hz, volume);
    }

    fn buzzer_off(&mut self) {
        self.buzzer.off();
    }

    fn play_tone_blocking(&mut self, frequency_hz: u16, volume: u8, duration_ms: u32) {
        self.buzzer
            .play_tone(&mut self.delay, frequency_hz, volume, duration_ms);
    }

    fn all_off(&mut self) {
        self.led.off();
        self.buzzer.off();
    }
}
