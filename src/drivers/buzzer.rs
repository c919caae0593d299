//! Passive piezo buzzer driver on a dedicated LEDC timer.
//!
//! Tones are produced by retuning the buzzer timer's base frequency
//! and opening the duty cycle; volume maps to PWM duty (0-255, where
//! 128 is the loudest square wave and the useful range sits below it,
//! so duty is applied as-is and left to the product tuning in config).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real LEDC frequency/duty via hw_init helpers.
//! On host/test: tracks state in-memory only.

use embedded_hal::delay::DelayNs;

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerState {
    Silent,
    Sounding { frequency_hz: u16, volume: u8 },
}

pub struct BuzzerDriver {
    state: BuzzerState,
}

impl BuzzerDriver {
    pub fn new() -> Self {
        Self {
            state: BuzzerState::Silent,
        }
    }

    /// Start a continuous tone.  Volume 0 silences.
    pub fn set_tone(&mut self, frequency_hz: u16, volume: u8) {
        if volume == 0 || frequency_hz == 0 {
            self.off();
            return;
        }
        hw_init::ledc_set_freq(pins::BUZZER_LEDC_TIMER, u32::from(frequency_hz));
        hw_init::ledc_set(pins::BUZZER_LEDC_CHANNEL, volume);
        self.state = BuzzerState::Sounding {
            frequency_hz,
            volume,
        };
    }

    pub fn off(&mut self) {
        hw_init::ledc_set(pins::BUZZER_LEDC_CHANNEL, 0);
        self.state = BuzzerState::Silent;
    }

    /// Play one tone synchronously, blocking the caller.
    pub fn play_tone(
        &mut self,
        delay: &mut impl DelayNs,
        frequency_hz: u16,
        volume: u8,
        duration_ms: u32,
    ) {
        self.set_tone(frequency_hz, volume);
        delay.delay_ms(duration_ms);
        self.off();
    }

    pub fn state(&self) -> BuzzerState {
        self.state
    }
}

impl Default for BuzzerDriver {
    fn default() -> Self {
        Self::new()
    }
}
