//! Demonstration request handlers.
//!
//! | target            | response |
//! |-------------------|----------|
//! | `/yourproblem`    | 400 with a canned HTML page |
//! | `/myproblem`      | 500 with a canned HTML page |
//! | `/httpbin/<path>` | `GET <upstream>/<path>` streamed back chunked, with `X-Content-SHA256` and `X-Content-Length` trailers |
//! | `/video`          | `<assets>/vim.mp4` |
//! | anything else     | 200 with a canned HTML page |

use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tcp_http::connection::ResponseWriter;
use tcp_http::handler::Handler;
use tcp_http::protocol::{Headers, Request, SendError, StatusCode, default_headers};
use tokio::io::AsyncWrite;
use tracing::{error, info, warn};

/// Largest chunk frame sent while proxying.
const PROXY_CHUNK_SIZE: usize = 1024;

pub const OK_HTML: &str = "<html>
<head>
<title>200 OK</title>
</head>
<body>
<h1>Success!</h1>
<p>Your request was an absolute banger.</p>
</body>
</html>
";

pub const BAD_REQUEST_HTML: &str = "<html>
<head>
<title>400 Bad Request</title>
</head>
<body>
<h1>Bad Request</h1>
<p>Your request honestly kinda sucked.</p>
</body>
</html>
";

pub const INTERNAL_SERVER_ERROR_HTML: &str = "<html>
<head>
<title>500 Internal Server Error</title>
</head>
<body>
<h1>Internal Server Error</h1>
<p>Okay, you know what? This one is on me.</p>
</body>
</html>
";

#[derive(Debug, Clone)]
pub struct DemoHandler {
    client: reqwest::Client,
    upstream: String,
    assets: PathBuf,
}

impl DemoHandler {
    pub fn new(upstream: impl Into<String>, assets: impl Into<PathBuf>) -> Self {
        Self::with_client(reqwest::Client::new(), upstream, assets)
    }

    pub fn with_client(client: reqwest::Client, upstream: impl Into<String>, assets: impl Into<PathBuf>) -> Self {
        Self { client, upstream: upstream.into(), assets: assets.into() }
    }

    async fn proxy<W>(&self, writer: &mut ResponseWriter<W>, path: &str) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let url = format!("{}/{}", self.upstream.trim_end_matches('/'), path);
        info!(%url, "proxying request");

        let mut upstream_response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, cause = %e, "upstream request failed");
                let body = format!("error executing endpoint: {e}");
                return write_fixed(writer, StatusCode::InternalServerError, "text/plain", body.as_bytes()).await;
            }
        };

        writer.write_status_line(StatusCode::Ok).await?;
        let mut headers = default_headers(0);
        headers.remove("content-length");
        headers.remove("connection");
        headers.set("content-type", "application/json");
        headers.set("transfer-encoding", "chunked");
        headers.merge_append("trailer", "X-Content-SHA256");
        headers.merge_append("trailer", "X-Content-Length");
        writer.write_headers(&headers).await?;

        let mut hasher = Sha256::new();
        let mut content_length = 0;
        loop {
            match upstream_response.chunk().await {
                Ok(Some(bytes)) => {
                    for piece in bytes.chunks(PROXY_CHUNK_SIZE) {
                        writer.write_chunked_body(piece).await?;
                    }
                    hasher.update(&bytes);
                    content_length += bytes.len();
                }
                Ok(None) => break,
                Err(e) => {
                    // the status line is already out, so end the body with what we have
                    warn!(%url, cause = %e, "reading upstream body failed");
                    break;
                }
            }
        }

        let mut trailers = Headers::new();
        trailers.set("X-Content-SHA256", format!("{:x}", hasher.finalize()));
        trailers.set("X-Content-Length", content_length.to_string());
        writer.write_trailers(&trailers).await?;
        Ok(())
    }

    async fn video<W>(&self, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let path = self.assets.join("vim.mp4");
        match tokio::fs::read(&path).await {
            Ok(body) => write_fixed(writer, StatusCode::Ok, "video/mp4", &body).await,
            Err(e) => {
                error!(path = %path.display(), cause = %e, "can't read video");
                write_html(writer, StatusCode::InternalServerError, INTERNAL_SERVER_ERROR_HTML).await
            }
        }
    }
}

#[async_trait]
impl<W> Handler<W> for DemoHandler
where
    W: AsyncWrite + Unpin + Send,
{
    async fn handle(&self, writer: &mut ResponseWriter<W>, request: &Request) {
        let target = request.target();
        let result = match target {
            "/yourproblem" => write_html(writer, StatusCode::BadRequest, BAD_REQUEST_HTML).await,
            "/myproblem" => write_html(writer, StatusCode::InternalServerError, INTERNAL_SERVER_ERROR_HTML).await,
            "/video" => self.video(writer).await,
            _ => match target.strip_prefix("/httpbin/") {
                Some(path) => self.proxy(writer, path).await,
                None => write_html(writer, StatusCode::Ok, OK_HTML).await,
            },
        };

        if let Err(e) = result {
            error!(path = target, cause = %e, "can't write response");
        }
    }
}

async fn write_html<W>(writer: &mut ResponseWriter<W>, status: StatusCode, html: &str) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin,
{
    write_fixed(writer, status, "text/html", html.as_bytes()).await
}

async fn write_fixed<W>(
    writer: &mut ResponseWriter<W>,
    status: StatusCode,
    content_type: &str,
    body: &[u8],
) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_status_line(status).await?;
    let mut headers = default_headers(body.len());
    headers.set("content-type", content_type);
    writer.write_headers(&headers).await?;
    writer.write_body(body).await?;
    Ok(())
}
