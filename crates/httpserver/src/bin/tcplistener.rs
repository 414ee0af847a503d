//! Accepts connections one at a time and prints each parsed request.

use clap::Parser;
use httpserver::{DEFAULT_PORT, init_tracing};
use tcp_http::protocol::Request;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "tcplistener", about = "Print the request line and headers of incoming HTTP requests", long_about = None)]
struct Cli {
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    let listener = TcpListener::bind(("0.0.0.0", cli.port)).await?;
    info!(local_addr = %listener.local_addr()?, "start listening");

    loop {
        let (mut tcp_stream, remote_addr) = match listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };
        info!(%remote_addr, "connection accepted");

        match Request::from_reader(&mut tcp_stream).await {
            Ok(request) => {
                let line = request.request_line();
                println!("Request line:");
                println!("- Method: {}", line.method());
                println!("- Target: {}", line.target());
                println!("- Version: {}", line.version());
                println!("Headers:");
                for (name, value) in request.headers().iter() {
                    println!("- {name}: {value}");
                }
            }
            Err(e) => error!(%remote_addr, cause = %e, "can't parse request"),
        }

        if let Err(e) = tcp_stream.shutdown().await {
            warn!(%remote_addr, cause = %e, "can't shut down connection");
        }
        info!(%remote_addr, "connection closed");
    }
}
