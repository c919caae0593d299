//! SleepSync Pebble Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    LinkEventSink     Esp32TimeAdapter         │
//! │  (ActuatorPort)     (EventSink)       (clock)                  │
//! │  SensorHub          UsbSerialTransport + io_task               │
//! │  (SensorPort)       (serial link)                              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            DeviceService (pure logic)                  │    │
//! │  │  Command dispatch · Effect engine · Device state       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  BedtimeScheduler (delegate-driven)                            │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod events;
mod pins;
mod scheduler;

mod adapters;
pub mod app;
mod drivers;
pub mod effects;
pub mod link;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::info;

use adapters::hardware::HardwareAdapter;
use adapters::link_sink::LinkEventSink;
use adapters::time::Esp32TimeAdapter;
use app::events::AppEvent;
use app::ports::{BedtimeDelegate, EventSink, SensorPort};
use app::service::DeviceService;
use config::SystemConfig;
use drivers::buzzer::BuzzerDriver;
use drivers::rgb_led::RgbLedDriver;
use events::{Event, push_event};
use scheduler::BedtimeScheduler;
use sensors::SensorHub;

// ── Bedtime delegate ──────────────────────────────────────────
//
// Bridges the scheduler (which knows nothing about the event system)
// to the ISR event queue: `on_bedtime` becomes an `Event::BedtimeReached`
// pushed to the lock-free queue and handled like any other event.

struct EventQueueDelegate;

impl BedtimeDelegate for EventQueueDelegate {
    fn on_bedtime(&mut self) {
        push_event(Event::BedtimeReached);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("╔══════════════════════════════════════╗");
    info!("║  SleepSync v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Hardware peripherals ───────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = drivers::hw_init::init_isr_service() {
        log::error!("ISR service init failed: {} — continuing without sound events", e);
    }

    let config = SystemConfig::default();
    drivers::hw_timer::start_timers(
        config.control_tick_ms,
        config.sensor_poll_ms,
        config.telemetry_interval_ms,
    );

    let time = Esp32TimeAdapter::new();

    // ── 3. Serial link ────────────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        let transport = adapters::serial::UsbSerialTransport::install(1024, 1024)
            .map_err(|rc| anyhow::anyhow!("USB serial install failed (rc={rc})"))?;
        link::io_task::spawn(transport);
    }
    #[cfg(not(target_os = "espidf"))]
    {
        let (transport, _handle) = adapters::serial::PipeTransport::pair();
        link::io_task::spawn(transport);
    }

    // ── 4. Adapters + service ─────────────────────────────────
    let mut hub = SensorHub::new(&config);
    let mut hw = HardwareAdapter::new(RgbLedDriver::new(), BuzzerDriver::new());
    let mut sink = LinkEventSink::new(Esp32TimeAdapter::new());
    let mut svc = DeviceService::new(config.clone());
    let mut bedtime_sched = BedtimeScheduler::new();
    let mut bedtime_delegate = EventQueueDelegate;

    sink.emit(&AppEvent::Ready);
    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────

    // Host-only tick derivation: one sleep per control tick, with the
    // slower cadences divided down from it.
    #[cfg(not(target_os = "espidf"))]
    let (mut sensor_div, mut telemetry_div) = (0u32, 0u32);

    loop {
        // On real hardware the esp_timer callbacks push the tick
        // events; the host simulation derives them from a sleep loop.
        #[cfg(not(target_os = "espidf"))]
        {
            std::thread::sleep(std::time::Duration::from_millis(u64::from(
                config.control_tick_ms,
            )));
            push_event(Event::ControlTick);

            sensor_div += config.control_tick_ms;
            if sensor_div >= config.sensor_poll_ms {
                sensor_div = 0;
                push_event(Event::SensorPollTick);
            }
            telemetry_div += config.control_tick_ms;
            if telemetry_div >= config.telemetry_interval_ms {
                telemetry_div = 0;
                push_event(Event::TelemetryTick);
            }
        }

        events::drain_events(|event| match event {
            Event::ControlTick => {
                svc.tick(config.control_tick_ms, &mut hw, &mut sink);
                bedtime_sched.tick(
                    time.wall_clock_hm(),
                    svc.state().bedtime,
                    &mut bedtime_delegate,
                );
            }

            Event::SensorPollTick => {
                let snapshot = hub.poll(time.uptime_us());
                svc.update_sensors(snapshot);
            }

            Event::TelemetryTick => {
                svc.emit_sensors(&mut sink);
            }

            Event::SoundDetected => {
                if hub.sound.take_event(time.uptime_us()) {
                    svc.on_sound(&mut sink);
                }
            }

            Event::BedtimeReached => {
                svc.on_bedtime(&mut hw, &mut sink);
            }

            Event::CommandReceived => {
                while let Some(frame) = link::io_task::try_recv_frame() {
                    svc.handle_frame(&frame, &mut hw, &mut sink);
                }
            }
        });

        // Idle until the next timer callback lands an event.
        #[cfg(target_os = "espidf")]
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}
