//! HTTP header encoder implementation for serializing HTTP response heads
//!
//! Status lines are always written as `HTTP/1.1`. Field names are written the
//! way [`Headers`] stores them, lower-case and in insertion order.

use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::{CRLF, Headers, SendError, StatusCode};

/// Initial buffer size reserved for a field block
const INIT_HEADER_SIZE: usize = 1024;

/// Encoder for the status line and header field blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderEncoder;

impl Encoder<StatusCode> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, status: StatusCode, dst: &mut BytesMut) -> Result<(), Self::Error> {
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_u16(), status.reason_phrase())?;
        Ok(())
    }
}

impl Encoder<&Headers> for HeaderEncoder {
    type Error = SendError;

    /// Writes every field as `name: value\r\n`, then the blank line.
    fn encode(&mut self, headers: &Headers, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);
        for (name, value) in headers.iter() {
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(CRLF);
        }
        dst.put_slice(CRLF);
        Ok(())
    }
}

/// `io::Write` adapter over `BytesMut`, so `write!` can format straight into it.
pub(crate) struct FastWrite<'a>(pub(crate) &'a mut BytesMut);

impl std::io::Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
