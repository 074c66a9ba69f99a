//! Command-line parsing for the binaries.
//!
//! Flags override whatever the environment variables configured.

use anyhow::{anyhow, Result};

use crate::adapter::ServerConfig;

/// Apply `--host`/`--port` (and friends) on top of `config`
pub fn parse_server_args(args: &[String], mut config: ServerConfig) -> Result<ServerConfig> {
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--host" => {
                config.host = value(args, &mut i, flag)?.to_string();
            }
            "--port" => {
                config.port = parse_value(args, &mut i, flag)?;
            }
            "--max-sessions" => {
                config.max_sessions = parse_value(args, &mut i, flag)?;
            }
            "--rows" => {
                config.env.rows = parse_value(args, &mut i, flag)?;
            }
            "--cols" => {
                config.env.cols = parse_value(args, &mut i, flag)?;
            }
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(config)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloutArgs {
    pub episodes: u32,
    /// Seed of the first episode; later episodes use `seed + n`
    pub seed: Option<u32>,
    pub max_steps: u64,
}

impl Default for RolloutArgs {
    fn default() -> Self {
        Self {
            episodes: 10,
            seed: None,
            max_steps: 10_000,
        }
    }
}

pub fn parse_rollout_args(args: &[String]) -> Result<RolloutArgs> {
    let mut out = RolloutArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--episodes" => out.episodes = parse_value(args, &mut i, flag)?,
            "--seed" => out.seed = Some(parse_value(args, &mut i, flag)?),
            "--max-steps" => out.max_steps = parse_value(args, &mut i, flag)?,
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }
    if out.max_steps == 0 {
        return Err(anyhow!("--max-steps must be positive"));
    }
    Ok(out)
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T> {
    let v = value(args, i, flag)?;
    v.parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}
