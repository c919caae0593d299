//! Serial-link event sink adapter.
//!
//! Implements [`EventSink`] by serializing application events into
//! wire records and queueing them on the outbound channel, plus a
//! structured log line for local debugging.  In tests the same trait
//! is satisfied by a capturing vector instead.

use log::{info, warn};

use crate::adapters::time::Esp32TimeAdapter;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::link::telemetry::{self, Record};
use crate::link::io_task;

/// Adapter that turns every [`AppEvent`] into a JSON record on the
/// serial link.
pub struct LinkEventSink {
    time: Esp32TimeAdapter,
}

impl LinkEventSink {
    pub fn new(time: Esp32TimeAdapter) -> Self {
        Self { time }
    }

    fn send(&self, record: Option<Record>) {
        match record {
            Some(record) => io_task::send_record(record),
            None => warn!("LINK: record did not fit wire buffer, dropped"),
        }
    }
}

impl EventSink for LinkEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let now = self.time.uptime_us();
        match event {
            AppEvent::Ready => {
                info!("LINK | device ready");
                self.send(telemetry::device_ready(now));
            }
            AppEvent::Response {
                command,
                success,
                message,
            } => {
                info!(
                    "LINK | response {} {} ({message})",
                    command.as_str(),
                    if *success { "ok" } else { "failed" },
                );
                self.send(telemetry::command_response(command, *success, message, now));
            }
            AppEvent::Status(report) => {
                info!(
                    "STATE | alarm_enabled={} alarm={} sunrise={} sunset={} rgb={:?}",
                    report.alarm_enabled,
                    report.alarm_active,
                    report.sunrise_active,
                    report.sunset_active,
                    report.rgb,
                );
                self.send(telemetry::device_status(report, now));
            }
            AppEvent::Sensors(snapshot) => {
                info!(
                    "TELEM | light={} sound={} T={:.1}C RH={:.1}%",
                    snapshot.light_level,
                    snapshot.sound_detected,
                    snapshot.temperature,
                    snapshot.humidity,
                );
                self.send(telemetry::sensor_data(snapshot));
            }
            AppEvent::Sound => {
                info!("TELEM | sound event");
                self.send(telemetry::sound_event(now));
            }
        }
    }
}
