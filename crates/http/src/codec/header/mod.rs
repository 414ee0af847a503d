//! Serialization of the response head.
//!
//! - [`HeaderEncoder`]: writes the status line and `name: value` field blocks
//!   terminated by a blank line. The same field block format is used for
//!   chunked trailers.

mod header_encoder;

pub use header_encoder::HeaderEncoder;
pub(crate) use header_encoder::FastWrite;
