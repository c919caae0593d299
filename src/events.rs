//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - GPIO ISRs (sound detector edge)
//! - Timer callbacks (control tick, sensor poll, telemetry)
//! - The serial I/O task (frame received)
//! - Software (bedtime scheduler)
//!
//! Events are consumed by the main control loop, which processes them
//! one at a time in priority order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ GPIO ISR    │────▶│              │     │              │
//! │ Timer ISR   │────▶│  Event Queue │────▶│  Main Loop   │
//! │ I/O Task    │────▶│  (lock-free) │     │  (consumer)  │
//! │ Software    │────▶│              │     │              │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 so the free-running u8 indices stay consistent across wrap.
const EVENT_QUEUE_CAP: usize = 32;

/// System event types, ordered by rough priority.
/// Lower discriminant = higher priority when multiple events
/// are pending simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    // ── Sensor data ───────────────────────────────────────
    /// Sound detector comparator went HIGH.
    SoundDetected      = 0,
    /// Periodic sensor poll timer fired.
    SensorPollTick     = 10,

    // ── Control ───────────────────────────────────────────
    /// Effect-scheduler tick (drives step advancement).
    ControlTick        = 20,
    /// Bedtime scheduler reached the configured wind-down time.
    BedtimeReached     = 21,

    // ── Communication ─────────────────────────────────────
    /// Telemetry report timer fired.
    TelemetryTick      = 30,
    /// A complete serial frame is waiting in the command channel.
    CommandReceived    = 31,
}

// ── Lock-free MPSC ring buffer ────────────────────────────────
//
// Producers are concurrent: GPIO ISRs, esp_timer task callbacks, and
// the serial I/O thread can all push at the same time.  The consumer
// is the main loop alone.  Each slot carries its own sequence number
// (bounded multi-producer queue in the Vyukov style): a producer
// CAS-claims a head position, writes the slot, then publishes it by
// bumping the slot sequence.  The consumer only sees a slot once the
// publish store lands, so a half-written slot is never read.
//
// Head, tail and slot sequences are free-running u8 counters; with a
// power-of-2 capacity dividing 256 the modular arithmetic stays exact
// across wrap.  Distances never exceed the capacity, so they fit i8.

struct Slot {
    seq: AtomicU8,
    data: AtomicU8,
}

const fn make_slots() -> [Slot; EVENT_QUEUE_CAP] {
    let mut slots = [const {
        Slot {
            seq: AtomicU8::new(0),
            data: AtomicU8::new(0),
        }
    }; EVENT_QUEUE_CAP];
    let mut i = 0;
    while i < EVENT_QUEUE_CAP {
        slots[i] = Slot {
            seq: AtomicU8::new(i as u8),
            data: AtomicU8::new(0),
        };
        i += 1;
    }
    slots
}

static EVENT_SLOTS: [Slot; EVENT_QUEUE_CAP] = make_slots();
static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);

/// Push an event into the queue.
/// Safe to call concurrently from ISR, timer and thread context.
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let mut pos = EVENT_HEAD.load(Ordering::Relaxed);
    loop {
        let slot = &EVENT_SLOTS[pos as usize % EVENT_QUEUE_CAP];
        let seq = slot.seq.load(Ordering::Acquire);
        let dist = seq.wrapping_sub(pos) as i8;

        if dist == 0 {
            // Slot is free at this position; try to claim it.
            match EVENT_HEAD.compare_exchange_weak(
                pos,
                pos.wrapping_add(1),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    slot.data.store(event as u8, Ordering::Relaxed);
                    slot.seq.store(pos.wrapping_add(1), Ordering::Release);
                    return true;
                }
                Err(current) => pos = current,
            }
        } else if dist < 0 {
            // Slot still holds an unconsumed event from the previous lap.
            return false;
        } else {
            // Another producer claimed this position; move past it.
            pos = EVENT_HEAD.load(Ordering::Relaxed);
        }
    }
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty or the slot at the tail is
/// claimed but not yet published.
pub fn pop_event() -> Option<Event> {
    let pos = EVENT_TAIL.load(Ordering::Relaxed);
    let slot = &EVENT_SLOTS[pos as usize % EVENT_QUEUE_CAP];
    let seq = slot.seq.load(Ordering::Acquire);

    if seq.wrapping_sub(pos.wrapping_add(1)) as i8 != 0 {
        return None;
    }

    let raw = slot.data.load(Ordering::Relaxed);
    // Hand the slot back to the producers one lap ahead.
    slot.seq
        .store(pos.wrapping_add(EVENT_QUEUE_CAP as u8), Ordering::Release);
    EVENT_TAIL.store(pos.wrapping_add(1), Ordering::Relaxed);

    event_from_u8(raw)
}

/// Drain all pending events into a callback.
/// Processes events in FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Check if the event queue is empty.
pub fn queue_is_empty() -> bool {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);
    tail == head
}

/// Number of pending events (claimed slots included).
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    head.wrapping_sub(tail) as usize
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0  => Some(Event::SoundDetected),
        10 => Some(Event::SensorPollTick),
        20 => Some(Event::ControlTick),
        21 => Some(Event::BedtimeReached),
        30 => Some(Event::TelemetryTick),
        31 => Some(Event::CommandReceived),
        _  => None,
    }
}
