//! The step/reset loop.

use crate::config::EnvConfig;
use crate::core::{BoardMetrics, Game, GameError};
use crate::observation::{observation_len, Observation};
use crate::types::Action;

/// Extra per-step facts for logging and debugging
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepInfo {
    /// A piece froze during this step (by action or by gravity)
    pub froze: bool,
    pub lines_cleared: u32,
    pub score: u32,
    pub level: u32,
    /// Steps taken since the last reset, this one included
    pub frame: u64,
    pub piece_id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

/// A single-agent environment over one [`Game`]
#[derive(Debug, Clone)]
pub struct TetrisEnv {
    config: EnvConfig,
    game: Game,
    fall_interval: u32,
    frame: u64,
    next_gravity_frame: u64,
    /// Board terms of the reward, as of the last freeze
    tracked: BoardMetrics,
    freezes_without_scoring: u32,
}

impl TetrisEnv {
    /// Build an environment and start its first episode from an entropy seed
    pub fn new(config: EnvConfig) -> Result<Self, GameError> {
        let game = Game::new(config.rows, config.cols, None)?;
        let mut env = Self {
            config,
            game,
            fall_interval: config.base_fall_interval,
            frame: 0,
            next_gravity_frame: 0,
            tracked: BoardMetrics::default(),
            freezes_without_scoring: 0,
        };
        env.reset_counters();
        Ok(env)
    }

    fn reset_counters(&mut self) {
        self.fall_interval = self.config.base_fall_interval;
        self.frame = 0;
        self.next_gravity_frame = self.fall_interval as u64;
        self.tracked = BoardMetrics::default();
        self.freezes_without_scoring = 0;
    }

    /// Start a new episode; `None` draws a fresh seed
    pub fn reset(&mut self, seed: Option<u32>) -> Observation {
        self.game.restart(seed);
        self.reset_counters();
        self.observation()
    }

    /// Advance one step
    pub fn step(&mut self, action: Action) -> StepResult {
        let level_before = self.game.level();
        let mut reward = 0.0f32;

        // Drop any event left over from outside `step` (e.g. a manual freeze).
        self.game.take_last_event();
        self.game.apply_action(action);
        let mut event = self.game.take_last_event();

        if event.is_none() && self.frame >= self.next_gravity_frame {
            self.game.soft_drop_step();
            event = self.game.take_last_event();
            self.next_gravity_frame += self.fall_interval as u64;
        }

        if let Some(ev) = event {
            reward += self.freeze_reward(ev.lines_cleared);
        }

        let terminated = self.game.is_game_over();
        let truncated = self.freezes_without_scoring >= self.config.steps_until_truncated;
        if terminated {
            reward += self.config.reward.game_over_penalty;
        }
        let clip = self.config.reward.clip;
        reward = reward.clamp(-clip, clip);

        self.frame += 1;

        let level = self.game.level();
        if level != level_before {
            self.fall_interval = self.config.fall_interval_for_level(level);
        }

        StepResult {
            observation: self.observation(),
            reward,
            terminated,
            truncated,
            info: StepInfo {
                froze: event.is_some(),
                lines_cleared: event.map(|e| e.lines_cleared).unwrap_or(0),
                score: self.game.score(),
                level,
                frame: self.frame,
                piece_id: self.game.piece_id(),
            },
        }
    }

    /// Shaped reward for a freeze that cleared `lines`
    fn freeze_reward(&mut self, lines: u32) -> f32 {
        let weights = self.config.reward;
        let mut now = self.game.metrics();
        now.max_height = self.game.cached_max_height();
        let delta = now.delta(&self.tracked);
        self.tracked = now;

        let bonus = weights.line_bonus(lines);
        if lines > 0 {
            self.freezes_without_scoring = 0;
        } else {
            self.freezes_without_scoring += 1;
        }

        bonus
            + weights.bumpiness_weight * delta.bumpiness as f32
            + weights.holes_weight * delta.holes as f32
            + weights.height_weight * delta.max_height as f32
    }

    /// Steps until gravity next pulls the piece down, clamped to `[0, base_fall_interval]`
    pub fn ticks_to_gravity(&self) -> u32 {
        let remaining = self.next_gravity_frame.saturating_sub(self.frame);
        remaining.min(self.config.base_fall_interval as u64) as u32
    }

    pub fn observation(&self) -> Observation {
        Observation::encode(&self.game, self.ticks_to_gravity())
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Mutable engine access for scenario setup
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn fall_interval(&self) -> u32 {
        self.fall_interval
    }

    pub fn freezes_without_scoring(&self) -> u32 {
        self.freezes_without_scoring
    }

    pub fn action_count(&self) -> usize {
        Action::COUNT
    }

    pub fn observation_len(&self) -> usize {
        observation_len(self.config.rows, self.config.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, Tetromino};
    use crate::types::PieceKind;

    fn env(seed: u32) -> TetrisEnv {
        let mut env = TetrisEnv::new(EnvConfig::default()).unwrap();
        env.reset(Some(seed));
        env
    }

    #[test]
    fn test_reset_counters() {
        let mut e = env(1);
        e.step(Action::HardDrop);
        e.step(Action::None);
        e.reset(Some(1));
        assert_eq!(e.frame(), 0);
        assert_eq!(e.ticks_to_gravity(), 24);
        assert_eq!(e.freezes_without_scoring(), 0);
        assert_eq!(e.game().board().filled_cells(), 0);
    }

    #[test]
    fn test_gravity_fires_on_schedule() {
        let mut e = env(3);
        let y0 = e.game().active_piece().y;

        for _ in 0..24 {
            e.step(Action::None);
        }
        assert_eq!(e.game().active_piece().y, y0);
        assert_eq!(e.ticks_to_gravity(), 0);

        e.step(Action::None);
        assert_eq!(e.game().active_piece().y, y0 + 1);
        assert_eq!(e.ticks_to_gravity(), 23);
    }

    #[test]
    fn test_line_clear_reward() {
        let mut e = env(9);
        let mut grid = vec![vec![0u8; 10]; 20];
        for (c, cell) in grid[19].iter_mut().enumerate() {
            if c != 5 && c != 6 {
                *cell = 1;
            }
        }
        let game = e.game_mut();
        game.load_board(Board::from_rows(grid).unwrap()).unwrap();
        game.set_active_piece(Tetromino::new(PieceKind::O, 2, 10).at(4, 0))
            .unwrap();

        let result = e.step(Action::HardDrop);
        assert!(result.info.froze);
        assert_eq!(result.info.lines_cleared, 1);
        // One line: +1. Remaining O half in cols 5-6: bumpiness 2, no holes, height 1.
        let expected = 1.0 - 0.2 * 2.0 - 0.5 * 1.0;
        assert!((result.reward - expected).abs() < 1e-5, "{}", result.reward);
        assert_eq!(e.freezes_without_scoring(), 0);
        assert!(!result.terminated);
    }

    #[test]
    fn test_truncates_after_freezes_without_scoring() {
        let config = EnvConfig {
            steps_until_truncated: 2,
            ..EnvConfig::default()
        };
        let mut e = TetrisEnv::new(config).unwrap();
        e.reset(Some(5));

        let first = e.step(Action::HardDrop);
        assert!(!first.truncated);
        // Two pieces stack at most 8 rows, far below the spawn rows.
        let second = e.step(Action::HardDrop);
        assert!(second.truncated);
        assert!(!second.terminated);
        assert_eq!(e.freezes_without_scoring(), 2);
    }

    #[test]
    fn test_reward_follows_metric_deltas() {
        let mut e = env(31);
        e.step(Action::HardDrop);
        let before = e.game().metrics();
        let height_before = e.game().cached_max_height();

        let result = e.step(Action::HardDrop);
        assert!(result.info.froze);
        let after = e.game().metrics();
        let height_after = e.game().cached_max_height();

        let lines = result.info.lines_cleared;
        let expected = e.config().reward.line_bonus(lines)
            - 0.2 * (after.bumpiness as f32 - before.bumpiness as f32)
            - 1.0 * (after.holes as f32 - before.holes as f32)
            - 0.5 * (height_after as f32 - height_before as f32);
        assert!((result.reward - expected).abs() < 1e-5, "{} vs {}", result.reward, expected);
    }

    #[test]
    fn test_game_over_penalty_and_clip() {
        let mut e = env(2);
        let mut grid = vec![vec![0u8; 10]; 20];
        for row in grid.iter_mut().skip(1) {
            for cell in &mut row[5..9] {
                *cell = 4;
            }
        }
        let game = e.game_mut();
        game.set_active_piece(Tetromino::new(PieceKind::O, 1, 10).at(-1, 0))
            .unwrap();
        game.load_board(Board::from_rows(grid).unwrap()).unwrap();

        let result = e.step(Action::HardDrop);
        assert!(result.terminated);
        assert!(result.reward <= 0.0);
        assert!(result.reward >= -20.0);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let actions = [
            Action::Left,
            Action::Rotate,
            Action::HardDrop,
            Action::Hold,
            Action::Right,
            Action::SoftDrop,
            Action::HardDrop,
        ];
        let mut a = env(77);
        let mut b = env(77);
        for _ in 0..10 {
            for &action in &actions {
                assert_eq!(a.step(action), b.step(action));
            }
        }
    }

    #[test]
    fn test_observation_len_matches_config() {
        let e = env(1);
        assert_eq!(e.observation().to_vec().len(), e.observation_len());
        assert_eq!(e.action_count(), 7);
    }
}
