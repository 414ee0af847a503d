use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tcp_http::Server;
use tcp_http::connection::ResponseWriter;
use tcp_http::handler::Handler;
use tcp_http::protocol::{Request, SendError, StatusCode, default_headers};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{Barrier, Notify};
use tokio::time::timeout;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

async fn write_text<W: AsyncWrite + Unpin>(writer: &mut ResponseWriter<W>, body: &str) -> Result<(), SendError> {
    writer.write_status_line(StatusCode::Ok).await?;
    writer.write_headers(&default_headers(body.len())).await?;
    writer.write_body(body.as_bytes()).await?;
    Ok(())
}

async fn send(addr: SocketAddr, raw: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

/// Answers with the target and `x-client` header once `barrier` releases.
struct EchoAfterBarrier {
    barrier: Arc<Barrier>,
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Handler<W> for EchoAfterBarrier {
    async fn handle(&self, writer: &mut ResponseWriter<W>, request: &Request) {
        self.barrier.wait().await;
        let body = format!("{} from {}", request.target(), request.headers().get("x-client").unwrap_or("?"));
        write_text(writer, &body).await.unwrap();
    }
}

#[tokio::test]
async fn concurrent_connections_get_independent_responses() {
    let handler = EchoAfterBarrier { barrier: Arc::new(Barrier::new(2)) };
    let mut server = Server::bind("127.0.0.1:0", handler).await.unwrap();
    let addr = server.local_addr();

    // both handlers must be running at once for the barrier to open
    let (first, second) = timeout(TEST_TIMEOUT, async {
        tokio::join!(
            send(addr, b"GET /first HTTP/1.1\r\nX-Client: one\r\n\r\n"),
            send(addr, b"GET /second HTTP/1.1\r\nX-Client: two\r\n\r\n"),
        )
    })
    .await
    .expect("connections were not served concurrently");

    assert_eq!(
        first,
        "HTTP/1.1 200 OK\r\ncontent-length: 15\r\nconnection: close\r\ncontent-type: text/plain\r\n\r\n/first from one"
    );
    assert!(second.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(second.ends_with("\r\n\r\n/second from two"));

    server.close().await.unwrap();
}

struct Hello;

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Handler<W> for Hello {
    async fn handle(&self, writer: &mut ResponseWriter<W>, _request: &Request) {
        write_text(writer, "hello").await.unwrap();
    }
}

#[tokio::test]
async fn invalid_request_gets_500() {
    let mut server = Server::bind("127.0.0.1:0", Hello).await.unwrap();
    let addr = server.local_addr();

    for raw in [
        &b"GET / HTTP/1.0\r\n\r\n"[..],
        &b"DELETE / HTTP/1.1\r\n\r\n"[..],
        &b"GET / HTTP/1.1\r\nHost : x\r\n\r\n"[..],
    ] {
        let response = timeout(TEST_TIMEOUT, send(addr, raw)).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 500 Internal Server Error\r\n"), "{response:?}");
        assert!(response.contains("content-length: 25\r\n"));
        assert!(response.ends_with("\r\n\r\nerror reading the request"));
    }

    // the server keeps accepting after bad connections
    let response = timeout(TEST_TIMEOUT, send(addr, b"GET / HTTP/1.1\r\n\r\n")).await.unwrap();
    assert!(response.ends_with("hello"));

    server.close().await.unwrap();
}

#[tokio::test]
async fn request_split_across_writes() {
    let mut server = Server::bind("127.0.0.1:0", Hello).await.unwrap();

    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
    for fragment in ["GET /sl", "ow HTTP/1.1\r\nHo", "st: localhost\r\n", "\r\n"] {
        stream.write_all(fragment.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let mut response = String::new();
    timeout(TEST_TIMEOUT, stream.read_to_string(&mut response)).await.unwrap().unwrap();
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.ends_with("hello"));

    server.close().await.unwrap();
}

/// Writes the status line only.
struct Truncated;

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Handler<W> for Truncated {
    async fn handle(&self, writer: &mut ResponseWriter<W>, _request: &Request) {
        writer.write_status_line(StatusCode::BadRequest).await.unwrap();
    }
}

#[tokio::test]
async fn incomplete_handler_yields_truncated_response() {
    let mut server = Server::bind("127.0.0.1:0", Truncated).await.unwrap();
    let response = timeout(TEST_TIMEOUT, send(server.local_addr(), b"GET / HTTP/1.1\r\n\r\n")).await.unwrap();
    assert_eq!(response, "HTTP/1.1 400 Bad Request\r\n");
    server.close().await.unwrap();
}

/// Signals `entered`, then waits for `release` before answering.
struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Handler<W> for Gate {
    async fn handle(&self, writer: &mut ResponseWriter<W>, _request: &Request) {
        self.entered.notify_one();
        self.release.notified().await;
        write_text(writer, "done").await.unwrap();
    }
}

#[tokio::test]
async fn close_stops_accepting_but_finishes_in_flight() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let handler = Gate { entered: Arc::clone(&entered), release: Arc::clone(&release) };

    let mut server = Server::bind("127.0.0.1:0", handler).await.unwrap();
    let addr = server.local_addr();

    let in_flight = tokio::spawn(send(addr, b"GET / HTTP/1.1\r\n\r\n"));
    timeout(TEST_TIMEOUT, entered.notified()).await.unwrap();

    assert!(!server.is_closed());
    timeout(TEST_TIMEOUT, server.close()).await.unwrap().unwrap();
    assert!(server.is_closed());
    assert!(TcpStream::connect(addr).await.is_err());

    release.notify_one();
    let response = timeout(TEST_TIMEOUT, in_flight).await.unwrap().unwrap();
    assert!(response.ends_with("\r\n\r\ndone"));

    // closing twice is harmless
    server.close().await.unwrap();
}

#[tokio::test]
async fn bind_failure_is_reported() {
    let server = Server::bind("127.0.0.1:0", Hello).await.unwrap();
    let result = Server::bind(server.local_addr(), Hello).await;
    assert!(matches!(result, Err(tcp_http::protocol::ServerError::Bind { .. })));
}
