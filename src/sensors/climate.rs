//! DHT11 temperature/humidity sensor, bit-banged over one GPIO.
//!
//! Protocol: host pulls the line low for 20 ms, releases it, the
//! sensor answers with an 80 µs low / 80 µs high preamble and then 40
//! data bits.  Each bit starts with ~50 µs low; the length of the
//! following high level encodes the bit (~27 µs = 0, ~70 µs = 1).
//! Five bytes total: humidity int/dec, temperature int/dec, additive
//! checksum over the first four.
//!
//! The part cannot be sampled faster than once per 2 s; early polls
//! return [`SensorError::TooSoon`] and the caller carries the previous
//! reading forward.
//!
//! ## Dual-target design
//!
//! On ESP-IDF the wire protocol runs over hw_init's GPIO helpers with
//! busy-wait timing.  On host/test the reading comes from static
//! atomics (tenths of a unit) plus a failure-injection flag.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use crate::error::SensorError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_X10: AtomicI32 = AtomicI32::new(215);
#[cfg(not(target_os = "espidf"))]
static SIM_HUM_X10: AtomicI32 = AtomicI32::new(450);
#[cfg(not(target_os = "espidf"))]
static SIM_FAIL: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(temperature_c: f32, humidity_pct: f32) {
    SIM_TEMP_X10.store((temperature_c * 10.0) as i32, Ordering::Relaxed);
    SIM_HUM_X10.store((humidity_pct * 10.0) as i32, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate_failing(failing: bool) {
    SIM_FAIL.store(failing, Ordering::Relaxed);
}

/// Serializes tests that drive the process-global sim injectors.
#[cfg(all(test, not(target_os = "espidf")))]
pub(crate) static SIM_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature: f32,
    pub humidity: f32,
}

pub struct ClimateSensor {
    min_interval_us: u64,
    last_attempt_us: Option<u64>,
}

impl ClimateSensor {
    pub fn new(min_interval_ms: u32) -> Self {
        Self {
            min_interval_us: u64::from(min_interval_ms) * 1000,
            last_attempt_us: None,
        }
    }

    /// Attempt a fresh reading.
    ///
    /// `TooSoon` is the normal outcome between sampling windows and
    /// carries no fault meaning.
    pub fn read(&mut self, now_us: u64) -> Result<ClimateReading, SensorError> {
        if let Some(last) = self.last_attempt_us {
            if now_us.saturating_sub(last) < self.min_interval_us {
                return Err(SensorError::TooSoon);
            }
        }
        self.last_attempt_us = Some(now_us);
        self.read_raw()
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self) -> Result<ClimateReading, SensorError> {
        let frame = read_frame()?;

        let sum = frame[0]
            .wrapping_add(frame[1])
            .wrapping_add(frame[2])
            .wrapping_add(frame[3]);
        if sum != frame[4] {
            return Err(SensorError::ChecksumMismatch);
        }

        Ok(ClimateReading {
            humidity: f32::from(frame[0]) + f32::from(frame[1]) * 0.1,
            temperature: f32::from(frame[2]) + f32::from(frame[3]) * 0.1,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self) -> Result<ClimateReading, SensorError> {
        if SIM_FAIL.load(Ordering::Relaxed) {
            return Err(SensorError::ClimateTimeout);
        }
        Ok(ClimateReading {
            temperature: SIM_TEMP_X10.load(Ordering::Relaxed) as f32 / 10.0,
            humidity: SIM_HUM_X10.load(Ordering::Relaxed) as f32 / 10.0,
        })
    }
}

// ── Wire protocol (device target only) ───────────────────────

#[cfg(target_os = "espidf")]
fn read_frame() -> Result<[u8; 5], SensorError> {
    let pin = pins::DHT_GPIO;

    // Start signal: >18 ms low, then release and let the pull-up win.
    hw_init::gpio_set_output(pin);
    hw_init::gpio_write(pin, false);
    hw_init::delay_us(20_000);
    hw_init::gpio_write(pin, true);
    hw_init::delay_us(30);
    hw_init::gpio_set_input(pin);

    // Sensor preamble: 80 us low, 80 us high.
    wait_level(pin, false, 100)?;
    wait_level(pin, true, 100)?;
    wait_level(pin, false, 100)?;

    let mut frame = [0u8; 5];
    for byte in frame.iter_mut() {
        for _ in 0..8 {
            // 50 us low gap, then the bit-length high pulse.
            wait_level(pin, true, 80)?;
            let high_us = pulse_width(pin, 100)?;
            *byte = (*byte << 1) | u8::from(high_us > 45);
        }
    }
    Ok(frame)
}

/// Busy-wait until the line reaches `level`, bounded by `timeout_us`.
#[cfg(target_os = "espidf")]
fn wait_level(pin: i32, level: bool, timeout_us: u64) -> Result<(), SensorError> {
    let start = hw_init::now_us();
    while hw_init::gpio_read(pin) != level {
        if hw_init::now_us().saturating_sub(start) > timeout_us {
            return Err(SensorError::ClimateTimeout);
        }
    }
    Ok(())
}

/// Width of the current high pulse in microseconds.
#[cfg(target_os = "espidf")]
fn pulse_width(pin: i32, timeout_us: u64) -> Result<u64, SensorError> {
    let start = hw_init::now_us();
    while hw_init::gpio_read(pin) {
        if hw_init::now_us().saturating_sub(start) > timeout_us {
            return Err(SensorError::ClimateTimeout);
        }
    }
    Ok(hw_init::now_us().saturating_sub(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    // One combined test: the sim injectors are process-global, so the
    // scenarios run in sequence instead of racing across test threads.
    #[test]
    fn interval_and_failure_handling() {
        let _guard = SIM_TEST_LOCK.lock().unwrap();
        sim_set_climate(21.5, 45.0);
        sim_set_climate_failing(false);

        // First read allowed immediately, then the window applies.
        let mut s = ClimateSensor::new(2000);
        let r = s.read(0).unwrap();
        assert!((r.temperature - 21.5).abs() < 0.01);
        assert_eq!(s.read(1_000_000), Err(SensorError::TooSoon));
        assert!(s.read(2_000_000).is_ok());

        // A failed read still consumes the sampling window.
        let mut s = ClimateSensor::new(2000);
        sim_set_climate_failing(true);
        assert_eq!(s.read(0), Err(SensorError::ClimateTimeout));
        assert_eq!(s.read(500_000), Err(SensorError::TooSoon));
        sim_set_climate_failing(false);
        assert!(s.read(2_000_000).is_ok());
    }
}
