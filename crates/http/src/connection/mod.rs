//! Per-connection response output.
//!
//! - [`ResponseWriter`]: enforces status line → headers → body order on one
//!   connection's byte sink, with fixed-length and chunked bodies
//! - [`WriterState`]: the linear state the writer moves through

mod response_writer;

pub use response_writer::{ResponseWriter, WriterState};
