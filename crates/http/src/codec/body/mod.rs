//! HTTP body framing for responses.
//!
//! Fixed-length bodies are written verbatim, so the only framing that needs an
//! encoder is chunked transfer-encoding:
//!
//! - [`ChunkedEncoder`]: `<hex-size>\r\n<bytes>\r\n` frames, terminated by
//!   `0\r\n\r\n` or by `0\r\n`, trailer fields and a blank line
//! - [`PayloadItem`]: the unit fed to the encoder

mod chunked_encoder;

pub use chunked_encoder::ChunkedEncoder;
pub use chunked_encoder::PayloadItem;
