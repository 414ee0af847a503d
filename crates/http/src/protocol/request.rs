//! Parsed HTTP request types.
//!
//! A [`Request`] is produced once per connection by
//! [`Request::from_reader`] and handed to the handler as a read-only value.
//! Only the request line and header block are read; any request body is left
//! on the transport untouched.

use std::fmt;
use std::str::FromStr;

use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;

use crate::codec::RequestDecoder;
use crate::ensure;
use crate::protocol::{Headers, ParseError, RequestLineField};

/// Initial capacity of the read buffer used by [`Request::from_reader`].
const READ_BUFFER_SIZE: usize = 1024;

const SUPPORTED_VERSION: &str = "HTTP/1.1";

/// The request methods this server accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl FromStr for Method {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            other => Err(ParseError::invalid_request_line(RequestLineField::Method, other)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `METHOD SP TARGET SP HTTP/VERSION`, validated as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: Method,
    target: String,
    version: String,
}

impl RequestLine {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// The numeric part of the protocol token, e.g. `1.1`.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl FromStr for RequestLine {
    type Err = ParseError;

    /// Parses a request line without its trailing CRLF.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split(' ');
        let (Some(method), Some(target), Some(version), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
            return Err(ParseError::invalid_request_line(RequestLineField::Line, line));
        };

        let method = method.parse::<Method>()?;

        ensure!(target.starts_with('/'), ParseError::invalid_request_line(RequestLineField::Target, target));

        ensure!(version == SUPPORTED_VERSION, ParseError::invalid_request_line(RequestLineField::Version, version));
        let version = version.trim_start_matches("HTTP/").to_owned();

        Ok(RequestLine { method, target: target.to_owned(), version })
    }
}

/// A request line together with its header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
}

impl Request {
    pub(crate) fn new(request_line: RequestLine, headers: Headers) -> Self {
        Self { request_line, headers }
    }

    /// Reads one request off `reader`.
    ///
    /// Bytes are pulled in whatever fragment sizes the transport delivers until
    /// the header block is complete. The reader is not drained beyond that.
    ///
    /// # Errors
    ///
    /// Fails if the transport errors, closes before the header block ends, or
    /// the request line or a header line is invalid. No partial request is
    /// ever returned.
    pub async fn from_reader<R: AsyncRead + Unpin>(reader: R) -> Result<Request, ParseError> {
        let mut framed = FramedRead::with_capacity(reader, RequestDecoder::new(), READ_BUFFER_SIZE);
        match framed.next().await {
            Some(result) => result,
            None => Err(ParseError::UnexpectedEof),
        }
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> Method {
        self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    pub fn version(&self) -> &str {
        &self.request_line.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use indoc::indoc;
    use tokio::io::ReadBuf;

    use super::*;

    /// Hands out at most `step` bytes per read.
    struct ChunkReader {
        data: Vec<u8>,
        position: usize,
        step: usize,
    }

    impl ChunkReader {
        fn new(data: impl Into<Vec<u8>>, step: usize) -> Self {
            Self { data: data.into(), position: 0, step }
        }
    }

    impl AsyncRead for ChunkReader {
        fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<std::io::Result<()>> {
            let end = (self.position + self.step).min(self.data.len()).min(self.position + buf.remaining());
            let start = self.position;
            buf.put_slice(&self.data[start..end]);
            self.position = end;
            Poll::Ready(Ok(()))
        }
    }

    fn crlf(s: &str) -> String {
        s.replace('\n', "\r\n")
    }

    #[test]
    fn parse_request_line() {
        let line: RequestLine = "GET /coffee HTTP/1.1".parse().unwrap();
        assert_eq!(line.method(), Method::Get);
        assert_eq!(line.target(), "/coffee");
        assert_eq!(line.version(), "1.1");

        let line: RequestLine = "POST /coffee HTTP/1.1".parse().unwrap();
        assert_eq!(line.method(), Method::Post);
    }

    #[test]
    fn invalid_request_line_names_field() {
        let cases = [
            ("/coffee HTTP/1.1", RequestLineField::Line),
            ("GET /coffee HTTP/1.1 extra", RequestLineField::Line),
            ("GET  /coffee HTTP/1.1", RequestLineField::Line),
            ("DELETE /coffee HTTP/1.1", RequestLineField::Method),
            ("get /coffee HTTP/1.1", RequestLineField::Method),
            ("GET coffee HTTP/1.1", RequestLineField::Target),
            ("GET /coffee HTTP/1.0", RequestLineField::Version),
            ("GET /coffee HTTP/2", RequestLineField::Version),
        ];

        for (line, expected) in cases {
            match line.parse::<RequestLine>() {
                Err(ParseError::InvalidRequestLine { field, .. }) => assert_eq!(field, expected, "line {line:?}"),
                other => panic!("line {line:?} gave {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn good_get_request_line() {
        let raw = crlf(indoc! {"
            GET / HTTP/1.1
            Host: localhost:42069
            User-Agent: curl/7.81.0
            Accept: */*

        "});
        let request = Request::from_reader(ChunkReader::new(raw, 3)).await.unwrap();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.target(), "/");
        assert_eq!(request.version(), "1.1");
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
        assert_eq!(request.headers().get("user-agent"), Some("curl/7.81.0"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
    }

    #[tokio::test]
    async fn good_get_request_line_with_path() {
        let raw = crlf(indoc! {"
            GET /coffee HTTP/1.1
            Host: localhost:42069

        "});
        let request = Request::from_reader(ChunkReader::new(raw, 1)).await.unwrap();
        assert_eq!(request.target(), "/coffee");
        assert_eq!(request.headers().len(), 1);
    }

    #[tokio::test]
    async fn fragment_size_does_not_matter() {
        let raw = crlf(indoc! {"
            POST /submit HTTP/1.1
            Host: localhost:42069
            Content-Type: application/json
            X-Tag: one
            x-tag: two

        "});

        let whole = Request::from_reader(raw.as_bytes()).await.unwrap();
        for step in 1..raw.len() {
            let request = Request::from_reader(ChunkReader::new(raw.clone(), step)).await.unwrap();
            assert_eq!(request, whole, "step {step}");
        }
        assert_eq!(whole.headers().get("x-tag"), Some("one, two"));
    }

    #[tokio::test]
    async fn body_is_left_unread() {
        let raw = b"POST /submit HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let request = Request::from_reader(&raw[..]).await.unwrap();
        assert_eq!(request.headers().get("content-length"), Some("5"));
    }

    #[tokio::test]
    async fn invalid_method() {
        let raw = b"PATCH /coffee HTTP/1.1\r\nHost: localhost:42069\r\n\r\n";
        let result = Request::from_reader(&raw[..]).await;
        assert!(matches!(result, Err(ParseError::InvalidRequestLine { field: RequestLineField::Method, .. })));
    }

    #[tokio::test]
    async fn invalid_number_of_parts() {
        let raw = b"/coffee HTTP/1.1\r\nHost: localhost:42069\r\n\r\n";
        let result = Request::from_reader(ChunkReader::new(&raw[..], 2)).await;
        assert!(matches!(result, Err(ParseError::InvalidRequestLine { field: RequestLineField::Line, .. })));
    }

    #[tokio::test]
    async fn malformed_header_fails_request() {
        let raw = b"GET / HTTP/1.1\r\nHost : localhost:42069\r\n\r\n";
        let result = Request::from_reader(&raw[..]).await;
        assert!(matches!(result, Err(ParseError::MalformedHeaderLine { .. })));
    }

    #[tokio::test]
    async fn truncated_request() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost:42069\r\n";
        assert!(matches!(Request::from_reader(&raw[..]).await, Err(ParseError::UnexpectedEof)));

        let raw = b"GET / HTT";
        assert!(matches!(Request::from_reader(&raw[..]).await, Err(ParseError::UnexpectedEof)));

        assert!(matches!(Request::from_reader(&b""[..]).await, Err(ParseError::UnexpectedEof)));
    }
}
