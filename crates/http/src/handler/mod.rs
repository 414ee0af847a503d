//! The capability a [`Server`](crate::Server) dispatches connections to.

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::connection::ResponseWriter;
use crate::protocol::Request;

/// Produces the response for one parsed request.
///
/// Implementations are expected to drive `writer` through status line,
/// headers and a body (or chunks plus a terminator) before returning. Nothing
/// enforces completion: returning early leaves a truncated response, which
/// the connection then closes.
///
/// The sink type is a parameter so handlers can be exercised against
/// in-memory writers; the server needs `Handler<OwnedWriteHalf>`.
#[async_trait]
pub trait Handler<W>: Send + Sync
where
    W: AsyncWrite + Unpin + Send,
{
    async fn handle(&self, writer: &mut ResponseWriter<W>, request: &Request);
}
