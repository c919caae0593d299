//! RGB LED driver (common-cathode, one LEDC channel per colour).
//!
//! A dumb actuator: whatever duty it is handed goes straight to the
//! PWM channels. Brightness scaling and effect sequencing happen in
//! the application layer.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real LEDC duty via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct RgbLedDriver {
    current: (u8, u8, u8),
}

impl RgbLedDriver {
    pub fn new() -> Self {
        Self { current: (0, 0, 0) }
    }

    /// Drive the three colour channels.
    pub fn set(&mut self, r: u8, g: u8, b: u8) {
        hw_init::ledc_set(pins::LED_R_LEDC_CHANNEL, r);
        hw_init::ledc_set(pins::LED_G_LEDC_CHANNEL, g);
        hw_init::ledc_set(pins::LED_B_LEDC_CHANNEL, b);
        self.current = (r, g, b);
    }

    pub fn off(&mut self) {
        self.set(0, 0, 0);
    }

    pub fn current(&self) -> (u8, u8, u8) {
        self.current
    }
}

impl Default for RgbLedDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_last_written_color() {
        let mut led = RgbLedDriver::new();
        led.set(10, 20, 30);
        assert_eq!(led.current(), (10, 20, 30));
        led.off();
        assert_eq!(led.current(), (0, 0, 0));
    }
}
