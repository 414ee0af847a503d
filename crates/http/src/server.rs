//! TCP accept loop dispatching one task per connection.

use std::fmt::Debug;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::connection::{ResponseWriter, WriterState};
use crate::handler::Handler;
use crate::protocol::{HttpError, Request, SendError, ServerError, StatusCode, default_headers};

const PARSE_ERROR_BODY: &[u8] = b"error reading the request";

/// A running HTTP/1.1 server.
///
/// The accept loop runs on its own task from the moment the listener is bound.
/// Every accepted connection gets its own task that reads exactly one request,
/// hands it to the handler and closes the connection. There is no limit on
/// the number of connection tasks and no timeout on a slow peer.
///
/// Dropping the server stops the accept loop without waiting for it.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_loop: Option<JoinHandle<()>>,
}

impl Server {
    /// Listens on every interface at `port`.
    ///
    /// # Errors
    ///
    /// Fails if the port can't be bound.
    pub async fn serve<H>(port: u16, handler: H) -> Result<Server, ServerError>
    where
        H: Handler<OwnedWriteHalf> + 'static,
    {
        Self::bind(("0.0.0.0", port), handler).await
    }

    /// Binds `addr` and starts accepting in the background.
    ///
    /// # Errors
    ///
    /// Fails if the address can't be bound.
    pub async fn bind<A, H>(addr: A, handler: H) -> Result<Server, ServerError>
    where
        A: ToSocketAddrs + Debug,
        H: Handler<OwnedWriteHalf> + 'static,
    {
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(cause = %e, addr = ?addr, "bind server error");
                return Err(ServerError::bind(format!("{addr:?}"), e));
            }
        };
        let local_addr = listener.local_addr()?;
        info!(%local_addr, "start listening");

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());
        let accept_loop =
            tokio::spawn(accept_loop(listener, Arc::new(handler), Arc::clone(&closed), Arc::clone(&shutdown)));

        Ok(Server { local_addr, closed, shutdown, accept_loop: Some(accept_loop) })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stops accepting and waits for the accept loop to release the listener.
    ///
    /// Connections already being served run to completion on their own.
    ///
    /// # Errors
    ///
    /// Fails if the accept loop panicked.
    pub async fn close(&mut self) -> Result<(), ServerError> {
        self.signal_close();
        match self.accept_loop.take() {
            Some(handle) => handle.await.map_err(|e| ServerError::AcceptLoop { reason: e.to_string() }),
            None => Ok(()),
        }
    }

    fn signal_close(&self) {
        self.closed.store(true, Ordering::Release);
        self.shutdown.notify_one();
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if self.accept_loop.is_some() {
            self.signal_close();
        }
    }
}

async fn accept_loop<H>(listener: TcpListener, handler: Arc<H>, closed: Arc<AtomicBool>, shutdown: Arc<Notify>)
where
    H: Handler<OwnedWriteHalf> + 'static,
{
    loop {
        tokio::select! {
            biased;
            () = shutdown.notified() => {
                if closed.load(Ordering::Acquire) {
                    info!("server closed, stop accepting");
                    return;
                }
            }
            accepted = listener.accept() => match accepted {
                Ok((tcp_stream, remote_addr)) => {
                    let handler = Arc::clone(&handler);
                    tokio::spawn(async move {
                        match process(tcp_stream, handler).await {
                            Ok(()) => info!(%remote_addr, "finished process, connection shutdown"),
                            Err(e) => error!(%remote_addr, cause = %e, "connection has error, connection shutdown"),
                        }
                    });
                }
                Err(_) if closed.load(Ordering::Acquire) => return,
                Err(e) => warn!(cause = %e, "failed to accept"),
            },
        }
    }
}

async fn process<H>(tcp_stream: TcpStream, handler: Arc<H>) -> Result<(), HttpError>
where
    H: Handler<OwnedWriteHalf>,
{
    let (reader, writer) = tcp_stream.into_split();
    let mut response_writer = ResponseWriter::new(writer);

    let request = match Request::from_reader(reader).await {
        Ok(request) => request,
        Err(e) => {
            error!(cause = %e, "can't parse request, sending error response");
            write_parse_error(&mut response_writer).await?;
            return Err(e.into());
        }
    };

    info!(method = %request.method(), path = request.target(), "handling request");
    handler.handle(&mut response_writer, &request).await;

    if response_writer.state() != WriterState::BodyWritten {
        warn!(state = ?response_writer.state(), "handler returned before finishing the response");
    }
    response_writer.shutdown().await?;
    Ok(())
}

async fn write_parse_error<W>(writer: &mut ResponseWriter<W>) -> Result<(), SendError>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    writer.write_status_line(StatusCode::InternalServerError).await?;
    writer.write_headers(&default_headers(PARSE_ERROR_BODY.len())).await?;
    writer.write_body(PARSE_ERROR_BODY).await?;
    writer.shutdown().await
}
