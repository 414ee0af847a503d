use std::fmt;
use std::io;
use thiserror::Error;

use crate::connection::WriterState;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// The part of the request line that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestLineField {
    Line,
    Method,
    Target,
    Version,
}

impl fmt::Display for RequestLineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestLineField::Line => "request line",
            RequestLineField::Method => "method",
            RequestLineField::Target => "request target",
            RequestLineField::Version => "http version",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("malformed header line: {line:?}")]
    MalformedHeaderLine { line: String },

    #[error("invalid {field}: {value:?}")]
    InvalidRequestLine { field: RequestLineField, value: String },

    #[error("connection closed before the request was complete")]
    UnexpectedEof,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn malformed_header<S: ToString>(line: S) -> Self {
        Self::MalformedHeaderLine { line: line.to_string() }
    }

    pub fn invalid_request_line<S: ToString>(field: RequestLineField, value: S) -> Self {
        Self::InvalidRequestLine { field, value: value.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("{operation} is not allowed in state {state:?}")]
    OutOfOrderWrite { operation: &'static str, state: WriterState },

    #[error("unsupported status code: {0}")]
    UnsupportedStatus(u16),

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn out_of_order(operation: &'static str, state: WriterState) -> Self {
        Self::OutOfOrderWrite { operation, state }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("can't bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error("accept loop terminated abnormally: {reason}")]
    AcceptLoop { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ServerError {
    pub fn bind<S: ToString>(addr: S, source: io::Error) -> Self {
        Self::Bind { addr: addr.to_string(), source }
    }
}
