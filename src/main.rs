//! Lobby server runner (default binary).
//!
//! Binds the TCP lobby and serves clients until killed. Configure with
//! `GRIDFALL_HOST`, `GRIDFALL_PORT` and `GRIDFALL_SCORES`.

use anyhow::Result;

use gridfall::adapter::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    log::info!(
        "starting lobby on {}:{} (scores: {})",
        config.host,
        config.port,
        config.scores_path.display()
    );
    run_server(config, None).await
}
