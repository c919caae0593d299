//! Digital sound detector (comparator module on a GPIO).
//!
//! Rising edges arrive through the GPIO ISR, which calls
//! [`set_sound_from_isr`] and pushes a `SoundDetected` event; the main
//! loop then asks [`SoundSensor::take_event`] whether the edge survives
//! the cooldown filter.  The instantaneous level is also sampled into
//! every sensor snapshot.
//!
//! ## Dual-target design
//!
//! On ESP-IDF the level is a GPIO read; on host/test it comes from a
//! static AtomicBool for injection.

use core::sync::atomic::{AtomicBool, Ordering};

use log::debug;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Level cache written from the GPIO ISR (or the sim injector).
static SOUND_LEVEL_ATOMIC: AtomicBool = AtomicBool::new(false);

/// Update the cached level from an ISR or boot-time GPIO read.
/// Lock-free — safe to call from interrupt context.
pub fn set_sound_from_isr(level: bool) {
    SOUND_LEVEL_ATOMIC.store(level, Ordering::Release);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_sound(level: bool) {
    set_sound_from_isr(level);
}

pub struct SoundSensor {
    cooldown_us: u64,
    /// Monotonic time of the last edge that passed the filter.
    last_event_us: Option<u64>,
}

impl SoundSensor {
    pub fn new(cooldown_ms: u32) -> Self {
        Self {
            cooldown_us: u64::from(cooldown_ms) * 1000,
            last_event_us: None,
        }
    }

    /// Instantaneous detector level.
    pub fn level(&self) -> bool {
        #[cfg(target_os = "espidf")]
        {
            hw_init::gpio_read(pins::SOUND_GPIO)
        }
        #[cfg(not(target_os = "espidf"))]
        {
            SOUND_LEVEL_ATOMIC.load(Ordering::Acquire)
        }
    }

    /// Apply the cooldown filter to a detected edge.
    ///
    /// Returns `true` when a `sound_event` record should go out.
    pub fn take_event(&mut self, now_us: u64) -> bool {
        match self.last_event_us {
            Some(last) if now_us.saturating_sub(last) < self.cooldown_us => {
                debug!("SENSOR | sound edge suppressed (cooldown)");
                false
            }
            _ => {
                self.last_event_us = Some(now_us);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_edge_passes() {
        let mut s = SoundSensor::new(2000);
        assert!(s.take_event(1_000_000));
    }

    #[test]
    fn edges_inside_cooldown_are_suppressed() {
        let mut s = SoundSensor::new(2000);
        assert!(s.take_event(1_000_000));
        assert!(!s.take_event(1_500_000));
        assert!(!s.take_event(2_999_999));
        assert!(s.take_event(3_000_000));
    }

    #[test]
    fn suppressed_edge_does_not_extend_cooldown() {
        let mut s = SoundSensor::new(2000);
        assert!(s.take_event(0));
        assert!(!s.take_event(1_999_999));
        // Window measured from the last *emitted* event.
        assert!(s.take_event(2_000_000));
    }

    #[test]
    fn level_follows_injection() {
        sim_set_sound(true);
        let s = SoundSensor::new(2000);
        assert!(s.level());
        sim_set_sound(false);
        assert!(!s.level());
    }
}
