//! # Byte Sources
//!
//! The reader pulls input through a single capability: yield the next byte
//! or report end of input. In-memory slices and blocking streams are both
//! instances of it, so the tokenizer and grammar driver are written once.
//!
//! A streaming source inherits its reader's blocking discipline verbatim;
//! an early EOF from the stream surfaces as a truncated-input parse error.

use std::io::{self, Read};

const STREAM_BUF_SIZE: usize = 8 * 1024;

/// Capability to yield bytes until end of input.
pub trait ByteSource {
    /// Returns the next byte, or `None` at end of input.
    fn next_byte(&mut self) -> io::Result<Option<u8>>;
}

/// In-memory byte source over a borrowed slice.
#[derive(Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        match self.data.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }
}

/// Buffered byte source over any `io::Read`.
pub struct StreamSource<R> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    len: usize,
    eof: bool,
}

impl<R: Read> StreamSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0; STREAM_BUF_SIZE],
            pos: 0,
            len: 0,
            eof: false,
        }
    }
}

impl<R: Read> ByteSource for StreamSource<R> {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pos >= self.len {
            if self.eof {
                return Ok(None);
            }
            loop {
                match self.inner.read(&mut self.buf) {
                    Ok(0) => {
                        self.eof = true;
                        return Ok(None);
                    }
                    Ok(n) => {
                        self.len = n;
                        self.pos = 0;
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(b))
    }
}
