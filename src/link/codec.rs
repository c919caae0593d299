//! Serial stream framing.
//!
//! Two decoders run over the same byte stream:
//!
//! - [`JsonFrameDecoder`] — extracts brace-delimited JSON text frames.
//!   A frame starts at the first `{` seen outside a frame and ends when
//!   the matching top-level `}` brings the depth back to zero.  This is
//!   a depth counter, not a JSON tokenizer: braces inside string
//!   literals will misframe.  Known limitation, kept deliberately.
//! - [`LineDecoder`] — accumulates plain-text command tokens terminated
//!   by CR or LF.
//!
//! [`SerialDecoder`] routes each byte: while a JSON frame is open (or a
//! byte opens one) the JSON decoder wins; everything else feeds the line
//! decoder.  Bytes outside any frame are noise.
//!
//! Overlong frames are never truncated: the partial frame is discarded,
//! `FrameError::TooLong` is signalled, and the decoder returns to
//! hunting.

use crate::error::FrameError;

/// Maximum JSON frame length (protects against memory exhaustion).
pub const MAX_FRAME_LEN: usize = 512;

/// Maximum plain-text token length.
pub const MAX_LINE_LEN: usize = 64;

/// One complete inbound frame.  Borrows the decoder's buffer; valid
/// until the next `feed` call.
#[derive(Debug, PartialEq, Eq)]
pub enum Frame<'a> {
    /// A brace-delimited JSON object, braces included.
    Json(&'a [u8]),
    /// A non-empty CR/LF-terminated text token.
    Line(&'a str),
}

// ───────────────────────────────────────────────────────────────
// JSON frame decoder
// ───────────────────────────────────────────────────────────────

/// Streaming brace-depth frame extractor.
pub struct JsonFrameDecoder {
    buf: heapless::Vec<u8, MAX_FRAME_LEN>,
    depth: u16,
    in_frame: bool,
}

impl JsonFrameDecoder {
    pub fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            depth: 0,
            in_frame: false,
        }
    }

    /// True while an opening brace has been seen but not yet closed.
    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Feed one byte.  Returns the completed frame when this byte closes
    /// the top-level brace.
    pub fn feed(&mut self, byte: u8) -> Result<Option<&[u8]>, FrameError> {
        if !self.in_frame {
            if byte == b'{' {
                self.in_frame = true;
                self.depth = 1;
                self.buf.clear();
                // Cannot overflow: buffer was just cleared.
                let _ = self.buf.push(byte);
            }
            // Anything else outside a frame is noise.
            return Ok(None);
        }

        if self.buf.push(byte).is_err() {
            self.reset();
            return Err(FrameError::TooLong);
        }

        match byte {
            b'{' => self.depth += 1,
            b'}' => {
                self.depth -= 1;
                if self.depth == 0 {
                    self.in_frame = false;
                    return Ok(Some(&self.buf));
                }
            }
            _ => {}
        }

        Ok(None)
    }

    /// Drop any partial frame and return to hunting.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.depth = 0;
        self.in_frame = false;
    }
}

impl Default for JsonFrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Plain-text line decoder
// ───────────────────────────────────────────────────────────────

/// Accumulates bytes until CR or LF.  Empty lines are skipped, so CRLF
/// pairs cost nothing.  Overlong lines are discarded through to the
/// next terminator.
///
/// A completed line stays readable via [`current`](Self::current) until
/// the next `feed` call.
pub struct LineDecoder {
    buf: heapless::Vec<u8, MAX_LINE_LEN>,
    discarding: bool,
    ready: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            discarding: false,
            ready: false,
        }
    }

    pub fn feed(&mut self, byte: u8) -> Result<Option<&str>, FrameError> {
        if self.ready {
            // Previous line was handed out; start fresh.
            self.buf.clear();
            self.ready = false;
        }

        if byte == b'\r' || byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                self.buf.clear();
                return Ok(None);
            }
            if self.buf.is_empty() {
                return Ok(None); // second half of CRLF, or a blank line
            }
            // Non-UTF-8 lines are line noise, not commands.
            if core::str::from_utf8(&self.buf).is_err() {
                self.buf.clear();
                return Ok(None);
            }
            self.ready = true;
            return Ok(core::str::from_utf8(&self.buf).ok());
        }

        if self.discarding {
            return Ok(None);
        }

        if self.buf.push(byte).is_err() {
            self.buf.clear();
            self.discarding = true;
            return Err(FrameError::TooLong);
        }

        Ok(None)
    }

    /// The completed line from the most recent `feed`, if any.
    pub fn current(&self) -> Option<&str> {
        if self.ready {
            core::str::from_utf8(&self.buf).ok()
        } else {
            None
        }
    }

    /// Drop any partial line.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
        self.ready = false;
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Combined stream decoder
// ───────────────────────────────────────────────────────────────

/// Routes each inbound byte to the JSON or line decoder.
pub struct SerialDecoder {
    json: JsonFrameDecoder,
    line: LineDecoder,
}

impl SerialDecoder {
    pub fn new() -> Self {
        Self {
            json: JsonFrameDecoder::new(),
            line: LineDecoder::new(),
        }
    }

    /// Feed one byte; returns at most one completed frame.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame<'_>>, FrameError> {
        if self.json.in_frame() || byte == b'{' {
            if !self.json.in_frame() {
                // Pending line bytes were pre-frame noise.
                self.line.reset();
            }
            return Ok(self.json.feed(byte)?.map(Frame::Json));
        }

        match self.line.feed(byte)? {
            Some(_) => Ok(self.line.current().map(Frame::Line)),
            None => Ok(None),
        }
    }

    /// Drop all partial state (e.g. after a transport reopen).
    pub fn reset(&mut self) {
        self.json.reset();
        self.line.reset();
    }
}

impl Default for SerialDecoder {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
