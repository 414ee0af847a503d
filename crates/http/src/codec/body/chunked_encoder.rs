use std::io::Write;

use bytes::BytesMut;
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::header::{FastWrite, HeaderEncoder};
use crate::protocol::{CRLF, Headers, SendError};

/// A piece of a chunked body.
#[derive(Debug, Clone, Copy)]
pub enum PayloadItem<'a> {
    Chunk(&'a [u8]),
    /// Terminal zero-size chunk with no trailers.
    Eof,
    /// Terminal zero-size chunk followed by trailer fields.
    Trailers(&'a Headers),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkedEncoder {
    eof: bool,
    send_size: usize,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Payload bytes sent so far, excluding framing.
    pub fn send_size(&self) -> usize {
        self.send_size
    }
}

impl Encoder<PayloadItem<'_>> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<'_>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            return Ok(());
        }

        match item {
            // a zero-size frame would end the body early
            PayloadItem::Chunk([]) => Ok(()),
            PayloadItem::Chunk(bytes) => {
                write!(FastWrite(dst), "{:x}\r\n", bytes.len())?;
                dst.reserve(bytes.len() + CRLF.len());
                dst.extend_from_slice(bytes);
                dst.extend_from_slice(CRLF);
                self.send_size += bytes.len();
                Ok(())
            }
            PayloadItem::Eof => {
                self.eof = true;
                trace!(send_size = self.send_size, "chunked body finished");
                dst.extend_from_slice(b"0\r\n\r\n");
                Ok(())
            }
            PayloadItem::Trailers(trailers) => {
                self.eof = true;
                trace!(send_size = self.send_size, trailers = trailers.len(), "chunked body finished with trailers");
                dst.extend_from_slice(b"0\r\n");
                HeaderEncoder.encode(trailers, dst)
            }
        }
    }
}
