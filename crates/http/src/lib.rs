//! HTTP/1.1 message exchange written directly over TCP
//!
//! This crate implements the wire-level mechanics of HTTP/1.1 without an HTTP
//! library underneath: it parses a request line and header block out of a byte
//! stream that may arrive in arbitrary fragments, writes responses with either
//! a fixed-length or a chunked body (with trailers), and serves TCP
//! connections concurrently, one task per connection.
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use tcp_http::connection::ResponseWriter;
//! use tcp_http::handler::Handler;
//! use tcp_http::protocol::{default_headers, Request, StatusCode};
//! use tcp_http::Server;
//! use tokio::io::AsyncWrite;
//! use tracing::error;
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl<W: AsyncWrite + Unpin + Send> Handler<W> for HelloWorld {
//!     async fn handle(&self, writer: &mut ResponseWriter<W>, _request: &Request) {
//!         let body = b"Hello World!\r\n";
//!         let result = async {
//!             writer.write_status_line(StatusCode::Ok).await?;
//!             writer.write_headers(&default_headers(body.len())).await?;
//!             writer.write_body(body).await
//!         };
//!         if let Err(e) = result.await {
//!             error!(cause = %e, "can't write response");
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::serve(42069, HelloWorld).await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: [`Headers`](protocol::Headers), [`Request`](protocol::Request),
//!   status codes and the error types
//! - [`codec`]: the incremental [`RequestDecoder`](codec::RequestDecoder) and the
//!   response head / chunked body encoders
//! - [`connection`]: the ordered [`ResponseWriter`](connection::ResponseWriter)
//! - [`handler`]: the [`Handler`](handler::Handler) trait the server dispatches to
//! - [`Server`]: accept loop and per-connection tasks
//!
//! # Limitations
//!
//! - One request per connection; the connection is closed after the response
//! - Request bodies are not read
//! - Only `GET` and `POST` requests, and only `HTTP/1.1`
//! - Maximum request line plus header size: 8KB
//! - No TLS

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod server;
pub use server::Server;

mod utils;
pub(crate) use utils::ensure;
