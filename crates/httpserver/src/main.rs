use clap::Parser;
use httpserver::handlers::DemoHandler;
use httpserver::{Config, init_tracing, shutdown_signal};
use tcp_http::Server;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_tracing();

    info!(port = config.port, assets = %config.assets.display(), upstream = %config.upstream, "configuration loaded");

    let handler = DemoHandler::new(config.upstream, config.assets);
    let mut server = match Server::serve(config.port, handler).await {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "can't start server");
            return Err(e.into());
        }
    };
    info!(port = config.port, "server started");

    shutdown_signal().await;
    server.close().await?;
    info!("server gracefully stopped");
    Ok(())
}
