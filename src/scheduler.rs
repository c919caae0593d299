//! Bedtime scheduler.
//!
//! Watches wall-clock time for the configured bedtime and notifies a
//! [`BedtimeDelegate`] when it is reached.  The scheduler is
//! intentionally decoupled from the event system: the main loop
//! implements the delegate and pushes into the ISR-safe event queue,
//! while the scheduler itself knows nothing about events or queues,
//! which keeps it independently testable.
//!
//! ```text
//!  wall clock ──▶ BedtimeScheduler.tick() ──▶ BedtimeDelegate
//!                                                  │
//!                                  (main loop pushes BedtimeReached)
//! ```

use log::info;

use crate::app::ports::BedtimeDelegate;
use crate::app::state::Bedtime;

/// Fires the delegate once when the clock crosses the configured
/// bedtime minute.
///
/// Wall-clock time may be unavailable (no time sync yet); ticks with
/// `None` simply do nothing.  The one-shot latch re-arms as soon as
/// the clock leaves the bedtime minute, so the next day fires again.
pub struct BedtimeScheduler {
    /// Latched while the clock sits inside the bedtime minute.
    fired_this_minute: bool,
}

impl BedtimeScheduler {
    pub fn new() -> Self {
        Self {
            fired_this_minute: false,
        }
    }

    /// Call once per control tick with the current wall-clock time.
    pub fn tick(
        &mut self,
        now: Option<(u8, u8)>,
        bedtime: Option<Bedtime>,
        delegate: &mut dyn BedtimeDelegate,
    ) {
        let (Some((hour, minute)), Some(bedtime)) = (now, bedtime) else {
            self.fired_this_minute = false;
            return;
        };

        if hour == bedtime.hour && minute == bedtime.minute {
            if !self.fired_this_minute {
                info!("STATE | bedtime {hour:02}:{minute:02} reached");
                self.fired_this_minute = true;
                delegate.on_bedtime();
            }
        } else {
            self.fired_this_minute = false;
        }
    }
}

impl Default for BedtimeScheduler {
    fn default() -> Self {
        Self::new()
    }
}
