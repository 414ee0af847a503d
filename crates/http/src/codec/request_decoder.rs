//! HTTP request decoder module
//!
//! [`RequestDecoder`] turns a growing byte buffer into a [`Request`]. It is a
//! [`Decoder`] so it can sit under a [`tokio_util::codec::FramedRead`], which
//! takes care of pulling fragments off the transport.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use tcp_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("GET /coffee HTTP/1.1\r\nHost: loc");
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//!
//! buffer.extend_from_slice(b"alhost\r\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.target(), "/coffee");
//! assert_eq!(request.headers().get("host"), Some("localhost"));
//! ```

use std::mem;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{CRLF, Headers, ParseError, Request, RequestLine, RequestLineField, find_crlf};

/// Maximum size in bytes allowed for the request line plus header block
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

#[derive(Debug)]
enum DecodeState {
    RequestLine,
    Headers { request_line: RequestLine, headers: Headers },
}

/// Incremental decoder for the request line and header block.
///
/// The decoder operates in two phases:
/// 1. Request line: waits for the first CRLF, then validates method, target
///    and version together
/// 2. Headers: feeds every complete line to [`Headers::parse`] until the blank
///    line is seen
///
/// Bytes after the header block are left in the buffer.
#[derive(Debug)]
pub struct RequestDecoder {
    state: DecodeState,
    consumed: usize,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { state: DecodeState::RequestLine, consumed: 0 }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode a request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the request line and header block are complete
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: the request is invalid or larger than [`MAX_HEADER_BYTES`]
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if matches!(self.state, DecodeState::RequestLine) {
            let Some(line_len) = find_crlf(src) else {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                return Ok(None);
            };
            ensure!(line_len < MAX_HEADER_BYTES, ParseError::too_large_header(line_len, MAX_HEADER_BYTES));

            let line = src.split_to(line_len + CRLF.len());
            let request_line = parse_request_line(&line[..line_len])?;
            trace!(method = %request_line.method(), path = request_line.target(), "parsed request line");

            self.consumed = line.len();
            self.state = DecodeState::Headers { request_line, headers: Headers::new() };
        }

        let DecodeState::Headers { headers, .. } = &mut self.state else {
            return Ok(None);
        };

        let (consumed, done) = headers.parse(src)?;
        src.advance(consumed);
        self.consumed += consumed;
        ensure!(self.consumed <= MAX_HEADER_BYTES, ParseError::too_large_header(self.consumed, MAX_HEADER_BYTES));

        if done {
            let consumed = mem::take(&mut self.consumed);
            if let DecodeState::Headers { request_line, headers } = mem::replace(&mut self.state, DecodeState::RequestLine) {
                trace!(header_size = consumed, "parsed request header");
                return Ok(Some(Request::new(request_line, headers)));
            }
        }

        let pending = self.consumed + src.len();
        ensure!(pending <= MAX_HEADER_BYTES, ParseError::too_large_header(pending, MAX_HEADER_BYTES));
        Ok(None)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(request) => Ok(Some(request)),
            None if buf.is_empty() && matches!(self.state, DecodeState::RequestLine) => Ok(None),
            None => Err(ParseError::UnexpectedEof),
        }
    }
}

fn parse_request_line(line: &[u8]) -> Result<RequestLine, ParseError> {
    let line = std::str::from_utf8(line).map_err(|e| {
        let value = format!("{} (invalid utf-8 after {} bytes)", String::from_utf8_lossy(line), e.valid_up_to());
        ParseError::invalid_request_line(RequestLineField::Line, value)
    })?;
    line.parse()
}
