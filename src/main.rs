//! Environment server (default binary).
//!
//! Serves one independent environment per TCP connection. Configuration comes
//! from `TETRIS_ENV_*` variables, then command-line flags.

use anyhow::Result;
use tracing::info;

use rl_tetris::adapter::{run_server, ServerConfig};
use rl_tetris::cli::parse_server_args;

#[tokio::main]
async fn main() -> Result<()> {
    rl_tetris::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_server_args(&args, ServerConfig::from_env())?;
    info!(host = %config.host, port = config.port, "starting environment server");

    run_server(config, None).await
}
