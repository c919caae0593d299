//! Serial transport adapters.
//!
//! [`UsbSerialTransport`] drives the ESP32-S3's built-in USB-Serial-JTAG
//! peripheral through raw ESP-IDF sys calls (the pebble's only external
//! connector).  [`PipeTransport`] is an in-memory pipe for host
//! simulation and integration tests; bytes pushed into its handle show
//! up as reads, writes accumulate for inspection.

use crate::link::transport::Transport;

// ── USB-Serial-JTAG (device target) ──────────────────────────

#[cfg(target_os = "espidf")]
pub struct UsbSerialTransport {
    _private: (),
}

#[cfg(target_os = "espidf")]
impl UsbSerialTransport {
    /// Install the USB-Serial-JTAG driver.  Call once.
    pub fn install(rx_buffer: usize, tx_buffer: usize) -> Result<Self, i32> {
        use esp_idf_svc::sys::*;
        let mut cfg = usb_serial_jtag_driver_config_t {
            rx_buffer_size: rx_buffer as u32,
            tx_buffer_size: tx_buffer as u32,
        };
        // SAFETY: driver install is called once from main before the
        // I/O task starts; the config struct is only read by the call.
        let ret = unsafe { usb_serial_jtag_driver_install(&mut cfg) };
        if ret != ESP_OK {
            return Err(ret);
        }
        log::info!("serial: USB-Serial-JTAG driver installed");
        Ok(Self { _private: () })
    }
}

#[cfg(target_os = "espidf")]
impl Transport for UsbSerialTransport {
    type Error = i32;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, i32> {
        use esp_idf_svc::sys::*;
        // Zero tick timeout: non-blocking poll from the read loop.
        // SAFETY: driver installed in install(); buffer is exclusive.
        let n = unsafe {
            usb_serial_jtag_read_bytes(buf.as_mut_ptr() as *mut core::ffi::c_void, buf.len(), 0)
        };
        Ok(n as usize)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, i32> {
        use esp_idf_svc::sys::*;
        // SAFETY: driver installed in install(); data is borrowed for
        // the duration of the call only.
        let n = unsafe {
            usb_serial_jtag_write_bytes(
                data.as_ptr() as *const core::ffi::c_void,
                data.len(),
                portMAX_DELAY,
            )
        };
        if n < 0 { Err(n as i32) } else { Ok(n as usize) }
    }

    fn flush(&mut self) -> Result<(), i32> {
        // The driver transmits from its ring buffer on its own; there
        // is no explicit flush call.
        Ok(())
    }
}

// ── In-memory pipe (host / tests) ────────────────────────────

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct PipeShared {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
}

/// Transport end of an in-memory pipe.
pub struct PipeTransport {
    shared: Arc<Mutex<PipeShared>>,
}

/// Test/simulation end of the pipe.
#[derive(Clone)]
pub struct PipeHandle {
    shared: Arc<Mutex<PipeShared>>,
}

impl PipeTransport {
    pub fn pair() -> (Self, PipeHandle) {
        let shared = Arc::new(Mutex::new(PipeShared::default()));
        (
            Self {
                shared: shared.clone(),
            },
            PipeHandle { shared },
        )
    }
}

impl PipeHandle {
    /// Inject bytes that the transport will read.
    pub fn push(&self, data: &[u8]) {
        let mut shared = self.shared.lock().unwrap();
        shared.inbound.extend(data.iter().copied());
    }

    /// Take everything written so far.
    pub fn drain_written(&self) -> Vec<u8> {
        let mut shared = self.shared.lock().unwrap();
        core::mem::take(&mut shared.outbound)
    }
}

impl Transport for PipeTransport {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let mut shared = self.shared.lock().unwrap();
        let mut n = 0;
        while n < buf.len() {
            match shared.inbound.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        let mut shared = self.shared.lock().unwrap();
        shared.outbound.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_round_trip() {
        let (mut transport, handle) = PipeTransport::pair();
        handle.push(b"STATUS\n");

        let mut buf = [0u8; 16];
        let n = transport.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"STATUS\n");

        transport.write(b"{\"type\":\"x\"}\n").unwrap();
        assert_eq!(handle.drain_written(), b"{\"type\":\"x\"}\n");
    }

    #[test]
    fn empty_pipe_reads_zero() {
        let (mut transport, _handle) = PipeTransport::pair();
        let mut buf = [0u8; 4];
        assert_eq!(transport.read(&mut buf).unwrap(), 0);
    }
}
