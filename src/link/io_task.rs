//! Async serial I/O task — reactor-driven transport bridge.
//!
//! Runs in a dedicated thread using `edge-executor` for cooperative
//! multi-task scheduling and `async-io-mini` for reactor-driven
//! timers (no busy-spinning). Two concurrent futures:
//!
//! 1. **Read** — polls the transport every 1ms via reactor timer,
//!    feeds each byte through the stream decoder, and forwards
//!    completed frames to the control loop
//! 2. **Write** — truly async via `RECORD_CHANNEL.receive().await`
//!    (wakes instantly when the control loop emits a record)
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │  I/O Thread                                              │
//!  │  ┌────────────────────────────────────────────────────┐  │
//!  │  │  futures_lite::block_on (drives reactor + futures) │  │
//!  │  │  ┌────────────────────────────────────────────────┐│  │
//!  │  │  │  edge_executor::LocalExecutor                  ││  │
//!  │  │  │                                                ││  │
//!  │  │  │  ┌────────────┐      ┌───────────────────┐   ││  │
//!  │  │  │  │ Read 1ms ⏱ │      │ Write (wake-on-send)│  ││  │
//!  │  │  │  └────────────┘      └───────────────────┘   ││  │
//!  │  │  └────────────────────────────────────────────────┘│  │
//!  │  └────────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────┘
//! ```

use core::cell::RefCell;
use core::time::Duration;
use heapless::Vec;
use log::{info, warn};
use std::rc::Rc;

use super::channels::{FRAME_CHANNEL, FrameKind, FrameMsg, RECORD_CHANNEL, RecordMsg};
use super::codec::{Frame, SerialDecoder};
use super::telemetry::Record;
use super::transport::Transport;
use crate::events::{Event, push_event};

const READ_BUF_SIZE: usize = 256;

// ── Frame forwarding ─────────────────────────────────────────

fn forward_frame(kind: FrameKind, bytes: &[u8]) {
    let mut payload = Vec::new();
    if payload.extend_from_slice(bytes).is_err() {
        warn!("IO: frame too large for channel buffer");
        return;
    }
    if FRAME_CHANNEL.try_send(FrameMsg { kind, payload }).is_err() {
        warn!("IO: frame channel full, dropping frame");
        return;
    }
    push_event(Event::CommandReceived);
}

fn feed_decoder(decoder: &mut SerialDecoder, data: &[u8]) {
    for &byte in data {
        match decoder.feed(byte) {
            Ok(Some(Frame::Json(frame))) => forward_frame(FrameKind::Json, frame),
            Ok(Some(Frame::Line(line))) => forward_frame(FrameKind::Line, line.as_bytes()),
            Ok(None) => {}
            Err(e) => warn!("IO: {e}, frame discarded"),
        }
    }
}

// ── Async I/O loops ──────────────────────────────────────────

/// Read task — drains the transport at 1ms intervals.  The reactor
/// timer is wake-based (not thread::sleep), so the executor can
/// service the write task between ticks.
async fn read_loop<T: Transport>(transport: Rc<RefCell<T>>) {
    let mut decoder = SerialDecoder::new();
    let mut read_buf = [0u8; READ_BUF_SIZE];
    loop {
        {
            let mut t = transport.borrow_mut();
            loop {
                match t.read(&mut read_buf) {
                    Ok(0) => break,
                    Ok(n) => feed_decoder(&mut decoder, &read_buf[..n]),
                    Err(e) => {
                        warn!("IO: read error: {e:?}");
                        decoder.reset();
                        break;
                    }
                }
            }
        }
        async_io_mini::Timer::after(Duration::from_millis(1)).await;
    }
}

/// Write task — truly async, wakes instantly when the control loop
/// pushes a record via `RECORD_CHANNEL.try_send()`. No polling.
async fn write_loop<T: Transport>(transport: Rc<RefCell<T>>) {
    loop {
        let record = RECORD_CHANNEL.receive().await;

        let mut t = transport.borrow_mut();
        if let Err(e) = t.write(&record.data) {
            warn!("IO: write failed: {e:?}");
        } else if let Err(e) = t.flush() {
            warn!("IO: flush failed: {e:?}");
        }
    }
}

/// Entry point for the I/O thread. Sets up the executor, spawns the
/// two async tasks, and drives them via the `async-io-mini` reactor.
fn run_io_loop<T: Transport>(transport: T) {
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();

    let transport = Rc::new(RefCell::new(transport));

    executor.spawn(read_loop(transport.clone())).detach();
    executor.spawn(write_loop(transport.clone())).detach();

    info!("IO task started (async, reactor-driven)");

    // The block_on drives the reactor (timers) while the executor
    // drives the two spawned tasks.
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}

// ── Thread spawn ─────────────────────────────────────────────

/// Spawn the I/O task in a dedicated thread pinned to Core 0 (PRO_CPU).
///
/// Takes ownership of the transport. Core 0 co-locates with the USB
/// peripheral interrupt handling; the control loop stays on Core 1.
pub fn spawn<T: Transport + Send + 'static>(transport: T) -> std::thread::JoinHandle<()> {
    crate::drivers::task_pin::TaskSpec {
        core: crate::drivers::task_pin::Core::Pro,
        priority: 12,
        stack_kb: 16,
        name: "serial-io\0",
    }
    .spawn(move || run_io_loop(transport))
}

// ── Channel accessors for the control loop ───────────────────

/// Queue a record for transmission.
///
/// When the control loop calls this, the I/O task's write future wakes
/// instantly via `RECORD_CHANNEL.receive().await` — no polling delay.
pub fn send_record(data: Record) {
    if RECORD_CHANNEL.try_send(RecordMsg { data }).is_err() {
        warn!("LINK: record channel full, dropping record");
    }
}

/// Try to receive one inbound frame from the I/O task.
pub fn try_recv_frame() -> Option<FrameMsg> {
    FRAME_CHANNEL.try_receive().ok()
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_decoder_no_panic_on_partial() {
        let mut decoder = SerialDecoder::new();
        feed_decoder(&mut decoder, br#"{"command":"sta"#);
    }

    #[test]
    fn completed_frame_lands_in_channel() {
        let mut decoder = SerialDecoder::new();
        feed_decoder(&mut decoder, b"{\"command\":\"get_status\"}");
        let msg = try_recv_frame().expect("frame expected");
        assert_eq!(msg.kind, FrameKind::Json);
        assert_eq!(&msg.payload[..], br#"{"command":"get_status"}"#);
    }
}
