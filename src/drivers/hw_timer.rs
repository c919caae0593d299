//! Hardware timer module using ESP-IDF's esp_timer API.
//!
//! Creates periodic timers that push events into the lock-free SPSC queue.
//! On simulation targets the main loop drives ticks from a sleep loop
//! instead.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call push_event() which uses AtomicU8.

#[cfg(target_os = "espidf")]
use crate::events::{Event, push_event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut CONTROL_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut SENSOR_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut TELEMETRY_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn control_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::ControlTick);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn sensor_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::SensorPollTick);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn telemetry_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::TelemetryTick);
}

#[cfg(target_os = "espidf")]
unsafe fn create_periodic(
    name: &'static [u8],
    cb: unsafe extern "C" fn(*mut core::ffi::c_void),
    handle: *mut esp_timer_handle_t,
    period_us: u64,
) -> bool {
    let args = esp_timer_create_args_t {
        callback: Some(cb),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: name.as_ptr() as *const _,
        skip_unhandled_events: false,
    };
    // SAFETY: handle points at a static written once at boot from the
    // single main task, before any callback can fire.
    unsafe {
        let ret = esp_timer_create(&args, handle);
        if ret != ESP_OK {
            log::error!("hw_timer: timer create failed (rc={ret})");
            return false;
        }
        let ret = esp_timer_start_periodic(*handle, period_us);
        if ret != ESP_OK {
            log::error!("hw_timer: timer start failed (rc={ret})");
            return false;
        }
    }
    true
}

/// Start the periodic tick timers.
///
/// Effect stepping, sensor polling, and telemetry emission each get
/// their own cadence from the configuration.
#[cfg(target_os = "espidf")]
pub fn start_timers(control_ms: u32, sensor_ms: u32, telemetry_ms: u32) {
    // SAFETY: timer handle statics are written here once at boot from
    // the single main-task context. The callbacks only call
    // push_event(), which is ISR-safe.
    unsafe {
        let ok = create_periodic(
            b"control\0",
            control_tick_cb,
            &raw mut CONTROL_TIMER,
            u64::from(control_ms) * 1000,
        ) && create_periodic(
            b"sensor\0",
            sensor_tick_cb,
            &raw mut SENSOR_TIMER,
            u64::from(sensor_ms) * 1000,
        ) && create_periodic(
            b"telemetry\0",
            telemetry_tick_cb,
            &raw mut TELEMETRY_TIMER,
            u64::from(telemetry_ms) * 1000,
        );
        if ok {
            info!("hw_timer: control@{control_ms}ms sensor@{sensor_ms}ms telemetry@{telemetry_ms}ms");
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(_control_ms: u32, _sensor_ms: u32, _telemetry_ms: u32) {
    log::info!("hw_timer(sim): timers not started (events driven by sleep loop)");
}

/// Stop all periodic tick timers.
#[cfg(target_os = "espidf")]
pub fn stop_timers() {
    // SAFETY: handles are valid if start_timers() succeeded; the
    // null-check skips timers that never started.
    unsafe {
        for handle in [CONTROL_TIMER, SENSOR_TIMER, TELEMETRY_TIMER] {
            if !handle.is_null() {
                esp_timer_stop(handle);
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_timers() {}
