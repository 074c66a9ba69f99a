//! Random-policy rollouts without a server.
//!
//! `rollout --episodes 20 --seed 7 --max-steps 5000`

use std::time::Instant;

use anyhow::Result;
use tracing::info;

use rl_tetris::adapter::ServerConfig;
use rl_tetris::cli::parse_rollout_args;
use rl_tetris::core::rng::entropy_seed;
use rl_tetris::core::SimpleRng;
use rl_tetris::env::TetrisEnv;
use rl_tetris::rollout::run_episode;

fn main() -> Result<()> {
    rl_tetris::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let rollout = parse_rollout_args(&args)?;
    // Same TETRIS_ENV_* board and gravity settings the server would use.
    let config = ServerConfig::from_env().env;

    let mut env = TetrisEnv::new(config)?;
    let base_seed = rollout.seed.unwrap_or_else(entropy_seed);
    let mut policy = SimpleRng::new(base_seed ^ 0x9e37_79b9);

    let started = Instant::now();
    let mut total_steps = 0u64;
    let mut total_lines = 0u32;
    let mut best_score = 0u32;

    for n in 0..rollout.episodes {
        let seed = base_seed.wrapping_add(n);
        let stats = run_episode(&mut env, Some(seed), &mut policy, rollout.max_steps);
        total_steps += stats.steps;
        total_lines += stats.lines;
        best_score = best_score.max(stats.score);
        info!(
            episode = n,
            seed,
            steps = stats.steps,
            reward = stats.total_reward,
            score = stats.score,
            lines = stats.lines,
            freezes = stats.freezes,
            terminated = stats.terminated,
            truncated = stats.truncated,
            "episode finished"
        );
    }

    let secs = started.elapsed().as_secs_f64().max(1e-9);
    info!(
        episodes = rollout.episodes,
        steps = total_steps,
        lines = total_lines,
        best_score,
        steps_per_sec = (total_steps as f64 / secs) as u64,
        "rollout complete"
    );
    Ok(())
}
