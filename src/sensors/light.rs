//! Photoresistor ambient-light sensor (LDR voltage divider on ADC1).
//!
//! Single oneshot ADC channel; each poll averages a burst of samples to
//! tame LDR noise.  The averaged level is classified against the
//! configured dark/bright thresholds, mostly for logging — the raw
//! level is what goes on the wire.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the light ADC channel via the oneshot API
//! (initialised by hw_init).  On host/test: reads a static AtomicU16
//! for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use log::debug;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_LIGHT_ADC: AtomicU16 = AtomicU16::new(2048);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_light_adc(raw: u16) {
    SIM_LIGHT_ADC.store(raw, Ordering::Relaxed);
}

/// Samples averaged per poll.
const SAMPLE_COUNT: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightClass {
    Dark,
    Dim,
    Bright,
}

pub struct LightSensor {
    dark_threshold: u16,
    bright_threshold: u16,
    last_class: Option<LightClass>,
}

impl LightSensor {
    pub fn new(dark_threshold: u16, bright_threshold: u16) -> Self {
        Self {
            dark_threshold,
            bright_threshold: bright_threshold.max(dark_threshold),
            last_class: None,
        }
    }

    /// Averaged light level, 0-4095.
    pub fn read(&mut self) -> u16 {
        let mut sum: u32 = 0;
        for _ in 0..SAMPLE_COUNT {
            sum += u32::from(self.read_adc());
        }
        let level = (sum / SAMPLE_COUNT) as u16;

        let class = self.classify(level);
        if self.last_class != Some(class) {
            debug!("SENSOR | light {level} -> {class:?}");
            self.last_class = Some(class);
        }
        level
    }

    pub fn classify(&self, level: u16) -> LightClass {
        if level < self.dark_threshold {
            LightClass::Dark
        } else if level > self.bright_threshold {
            LightClass::Bright
        } else {
            LightClass::Dim
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::light_adc_read()
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_LIGHT_ADC.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_thresholds() {
        let s = LightSensor::new(800, 2000);
        assert_eq!(s.classify(100), LightClass::Dark);
        assert_eq!(s.classify(799), LightClass::Dark);
        assert_eq!(s.classify(800), LightClass::Dim);
        assert_eq!(s.classify(2000), LightClass::Dim);
        assert_eq!(s.classify(2001), LightClass::Bright);
    }

    #[test]
    fn inverted_thresholds_are_lifted() {
        let s = LightSensor::new(3000, 100);
        // bright threshold lifted to the dark one, never below it
        assert_eq!(s.classify(3001), LightClass::Bright);
        assert_eq!(s.classify(2999), LightClass::Dark);
    }

    #[test]
    fn read_reports_injected_level() {
        sim_set_light_adc(1234);
        let mut s = LightSensor::new(800, 2000);
        assert_eq!(s.read(), 1234);
    }
}
