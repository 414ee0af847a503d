use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::warn;

use crate::codec::{ChunkedEncoder, HeaderEncoder, PayloadItem};
use crate::protocol::{Headers, SendError, StatusCode};

const INIT_BUFFER_SIZE: usize = 4 * 1024;

/// Progress of a response through its mandatory part order.
///
/// Every write is legal from exactly one state and moves forward one step.
/// Chunk frames are the exception: they may repeat in `HeadersWritten` until
/// a terminator moves the writer to `BodyWritten`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Started,
    StatusLineWritten,
    HeadersWritten,
    BodyWritten,
}

/// Writes one HTTP/1.1 response onto a byte sink, in order.
///
/// ```text
/// Started --status line--> StatusLineWritten --headers--> HeadersWritten
///     HeadersWritten --body--> BodyWritten
///     HeadersWritten --chunk*--> HeadersWritten --done | trailers--> BodyWritten
/// ```
///
/// A call made from the wrong state fails with [`SendError::OutOfOrderWrite`]
/// and writes nothing.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    state: WriterState,
    chunked_encoder: ChunkedEncoder,
    announced_trailers: Vec<String>,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: BytesMut::with_capacity(INIT_BUFFER_SIZE),
            state: WriterState::Started,
            chunked_encoder: ChunkedEncoder::new(),
            announced_trailers: Vec::new(),
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.advance("write_status_line", WriterState::Started, WriterState::StatusLineWritten)?;
        HeaderEncoder.encode(status, &mut self.buffer)?;
        self.write_buffer().await?;
        Ok(())
    }

    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), SendError> {
        self.advance("write_headers", WriterState::StatusLineWritten, WriterState::HeadersWritten)?;
        if let Some(trailer) = headers.get("trailer") {
            self.announced_trailers = trailer.split(',').map(|name| name.trim().to_ascii_lowercase()).collect();
        }
        HeaderEncoder.encode(headers, &mut self.buffer)?;
        self.write_buffer().await?;
        Ok(())
    }

    /// Writes a fixed-length body verbatim.
    ///
    /// The caller is responsible for a matching `content-length` header.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.advance("write_body", WriterState::HeadersWritten, WriterState::BodyWritten)?;
        self.writer.write_all(body).await?;
        Ok(body.len())
    }

    /// Writes one chunk frame and returns the bytes put on the wire.
    ///
    /// An empty `data` writes nothing, since a zero-size frame terminates
    /// the body.
    pub async fn write_chunked_body(&mut self, data: &[u8]) -> Result<usize, SendError> {
        self.check("write_chunked_body", WriterState::HeadersWritten)?;
        self.chunked_encoder.encode(PayloadItem::Chunk(data), &mut self.buffer)?;
        self.write_buffer().await
    }

    /// Ends a chunked body with no trailers.
    pub async fn write_chunked_body_done(&mut self) -> Result<usize, SendError> {
        self.advance("write_chunked_body_done", WriterState::HeadersWritten, WriterState::BodyWritten)?;
        self.chunked_encoder.encode(PayloadItem::Eof, &mut self.buffer)?;
        self.write_buffer().await
    }

    /// Ends a chunked body with trailer fields.
    ///
    /// Trailers should be announced with a `trailer` header beforehand; names
    /// that were not are logged but still sent.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<usize, SendError> {
        self.advance("write_trailers", WriterState::HeadersWritten, WriterState::BodyWritten)?;
        for (name, _) in trailers.iter() {
            if !self.announced_trailers.iter().any(|announced| announced == name) {
                warn!(trailer = name, "trailer was not announced in the trailer header");
            }
        }
        self.chunked_encoder.encode(PayloadItem::Trailers(trailers), &mut self.buffer)?;
        self.write_buffer().await
    }

    pub async fn flush(&mut self) -> Result<(), SendError> {
        Ok(self.writer.flush().await?)
    }

    /// Flushes and shuts down the write side of the sink.
    pub async fn shutdown(&mut self) -> Result<(), SendError> {
        self.writer.flush().await?;
        Ok(self.writer.shutdown().await?)
    }

    fn check(&self, operation: &'static str, expected: WriterState) -> Result<(), SendError> {
        if self.state == expected { Ok(()) } else { Err(SendError::out_of_order(operation, self.state)) }
    }

    // The state moves before any I/O: after a failed write the sink is in an
    // unknown position and the same part must not be written again.
    fn advance(&mut self, operation: &'static str, from: WriterState, to: WriterState) -> Result<(), SendError> {
        self.check(operation, from)?;
        self.state = to;
        Ok(())
    }

    async fn write_buffer(&mut self) -> Result<usize, SendError> {
        let len = self.buffer.len();
        if len > 0 {
            self.writer.write_all(&self.buffer).await?;
            self.buffer.clear();
        }
        Ok(len)
    }
}
