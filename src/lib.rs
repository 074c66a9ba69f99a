//! RL Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so binaries, integration
//! tests and benches can write `rl_tetris::{core, env, adapter, types}`.

pub mod cli;
pub mod rollout;

pub use rl_tetris_adapter as adapter;
pub use rl_tetris_core as core;
pub use rl_tetris_env as env;
pub use rl_tetris_types as types;

/// Install the global `tracing` subscriber; `RUST_LOG` overrides the `info` default
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
