//! Serial link — framing, command decode, wire records, I/O plumbing.
//!
//! Layering, leaf to root:
//!
//! ```text
//! codec      byte stream → frames (JSON / text token)
//! engine     frame → Command (+ rejection messages)
//! telemetry  domain data → newline-terminated JSON records
//! channels   static bounded channels between I/O task and control loop
//! transport  byte-oriented channel abstraction
//! io_task    the async reader/writer thread
//! ```

pub mod channels;
pub mod codec;
pub mod engine;
pub mod io_task;
pub mod telemetry;
pub mod transport;
