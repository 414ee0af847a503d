//! HTTP codec module for decoding requests and encoding responses
//!
//! The codecs work on [`bytes::BytesMut`] buffers and implement the
//! `tokio_util` [`Decoder`](tokio_util::codec::Decoder) and
//! [`Encoder`](tokio_util::codec::Encoder) traits, so they stay free of I/O:
//!
//! - Request side:
//!   - [`RequestDecoder`]: request line and header block, incrementally
//! - Response side:
//!   - [`HeaderEncoder`]: status line and header/trailer field blocks
//!   - [`ChunkedEncoder`]: chunked transfer-encoding frames

mod body;
mod header;
mod request_decoder;

pub use body::{ChunkedEncoder, PayloadItem};
pub use header::HeaderEncoder;
pub use request_decoder::{MAX_HEADER_BYTES, RequestDecoder};
