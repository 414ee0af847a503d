//! Core HTTP protocol types.
//!
//! - **Headers** ([`headers`]): the ordered, case-insensitive [`Headers`] store
//!   and its incremental line parser
//! - **Request** ([`request`]): [`Method`], [`RequestLine`] and the parsed [`Request`]
//! - **Response** ([`response`]): [`StatusCode`] and [`default_headers`]
//! - **Errors** ([`error`]):
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request parsing errors
//!   - [`SendError`]: Response writing errors
//!   - [`ServerError`]: Listener errors

mod headers;
pub use headers::Headers;
pub(crate) use headers::{CRLF, find_crlf};

mod request;
pub use request::Method;
pub use request::Request;
pub use request::RequestLine;

mod response;
pub use response::StatusCode;
pub use response::default_headers;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::RequestLineField;
pub use error::SendError;
pub use error::ServerError;
