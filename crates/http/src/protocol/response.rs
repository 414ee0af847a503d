use std::fmt;

use crate::protocol::{Headers, SendError};

/// Status codes the response writer knows a reason phrase for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok,
    BadRequest,
    InternalServerError,
}

impl StatusCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = SendError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            200 => Ok(StatusCode::Ok),
            400 => Ok(StatusCode::BadRequest),
            500 => Ok(StatusCode::InternalServerError),
            other => Err(SendError::UnsupportedStatus(other)),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// Headers for a fixed-length `text/plain` response that closes the connection.
///
/// Streaming handlers remove `content-length` and `connection` and set
/// `transfer-encoding: chunked` instead.
pub fn default_headers(content_length: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set("content-length", content_length.to_string());
    headers.set("connection", "close");
    headers.set("content-type", "text/plain");
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_from_u16() {
        assert_eq!(StatusCode::try_from(200).unwrap(), StatusCode::Ok);
        assert_eq!(StatusCode::try_from(400).unwrap(), StatusCode::BadRequest);
        assert_eq!(StatusCode::try_from(500).unwrap(), StatusCode::InternalServerError);
        assert!(matches!(StatusCode::try_from(404), Err(SendError::UnsupportedStatus(404))));
    }

    #[test]
    fn display_is_status_line_suffix() {
        assert_eq!(StatusCode::BadRequest.to_string(), "400 Bad Request");
    }

    #[test]
    fn default_headers_shape() {
        let headers = default_headers(42);
        let entries: Vec<_> = headers.iter().collect();
        assert_eq!(entries, vec![("content-length", "42"), ("connection", "close"), ("content-type", "text/plain")]);
    }
}
