//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DeviceService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, event sinks) implement these traits.
//! The [`DeviceService`](super::service::DeviceService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::app::state::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Poll every sensor and return a unified snapshot.
    ///
    /// `now_us` is the monotonic timestamp stamped into the snapshot.
    fn poll(&mut self, now_us: u64) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command outputs.
pub trait ActuatorPort {
    /// Set the RGB LED colour (already brightness-scaled).
    fn set_rgb(&mut self, r: u8, g: u8, b: u8);

    /// Start a continuous buzzer tone.  `volume` is an 8-bit PWM duty;
    /// 0 silences the buzzer.
    fn set_tone(&mut self, frequency_hz: u16, volume: u8);

    /// Silence the buzzer.
    fn buzzer_off(&mut self);

    /// Play a tone synchronously, blocking the caller for `duration_ms`.
    fn play_tone_blocking(&mut self, frequency_hz: u16, volume: u8, duration_ms: u32);

    /// Kill all outputs (LED dark, buzzer silent).
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → telemetry / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (wire records on
/// the serial link, plain log lines in tests).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Bedtime delegate (decouples the scheduler from the event system)
// ───────────────────────────────────────────────────────────────

/// Callback trait the bedtime scheduler invokes when the configured
/// wind-down time is reached.
///
/// This decouples the [`BedtimeScheduler`](crate::scheduler::BedtimeScheduler)
/// from the ISR event queue.  The main loop implements this by forwarding
/// to [`push_event`](crate::events::push_event), but the scheduler itself
/// knows nothing about events, queues, or ISRs.
pub trait BedtimeDelegate {
    /// Called once per day when the bedtime is reached.
    fn on_bedtime(&mut self);
}
