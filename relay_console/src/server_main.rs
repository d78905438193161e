use anyhow::Context;
use async_std::net::TcpListener;
use async_std::task;
use log::info;

use chess_relay::server;

use crate::server_config::ServerConfig;


pub fn run(config: ServerConfig) -> anyhow::Result<()> {
    // Best-effort shutdown: stop accepting and exit. In-flight connections
    // are not drained; there is no persisted state to corrupt.
    ctrlc::set_handler(|| {
        info!("Shutting down");
        std::process::exit(0);
    })?;

    task::block_on(async {
        let listener = TcpListener::bind(config.address.as_str())
            .await
            .context(format!("Cannot bind to {}", config.address))?;
        server::serve(listener, config.topology).await?;
        Ok(())
    })
}
