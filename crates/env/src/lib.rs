//! Reinforcement-learning environment over the core engine
//!
//! [`TetrisEnv`] turns the turn-based engine into a step function:
//!
//! 1. **Action**: one of the seven [`Action`](types::Action)s is applied
//! 2. **Gravity**: if the action did not freeze a piece and the gravity
//!    deadline has passed, the piece moves down one row (possibly freezing)
//! 3. **Reward**: computed only on freezes, from the lines cleared and the
//!    change in bumpiness, holes and stack height since the previous freeze
//! 4. **Termination**: game over ends the episode (with a penalty); too many
//!    freezes without a line clear truncate it
//!
//! Gravity runs on step counts, not wall-clock time. The interval starts at
//! 24 steps and shrinks by 4 per level up to level 5.
//!
//! # Example
//!
//! ```
//! use rl_tetris_env::{EnvConfig, TetrisEnv};
//! use rl_tetris_env::types::Action;
//!
//! let mut env = TetrisEnv::new(EnvConfig::default()).unwrap();
//! let obs = env.reset(Some(7));
//! assert_eq!(obs.to_vec().len(), env.observation_len());
//!
//! let step = env.step(Action::HardDrop);
//! assert!(step.info.froze);
//! assert!(!step.terminated);
//! ```

pub mod config;
pub mod env;
pub mod observation;

pub use rl_tetris_core as core;
pub use rl_tetris_types as types;

pub use config::{EnvConfig, RewardConfig};
pub use env::{StepInfo, StepResult, TetrisEnv};
pub use observation::{observation_len, Observation, HEADER_LEN};
