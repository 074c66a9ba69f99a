//! Environment and reward configuration.

use crate::types::{
    BASE_FALL_INTERVAL, DEFAULT_COLS, DEFAULT_ROWS, FALL_INTERVAL_STEP, FALL_SPEEDUP_MAX_LEVEL,
    STEPS_UNTIL_TRUNCATED,
};

/// Reward shaping weights, applied on every freeze
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardConfig {
    /// Bonus indexed by lines cleared in one freeze (0..=4)
    pub line_bonus: [f32; 5],
    pub bumpiness_weight: f32,
    pub holes_weight: f32,
    pub height_weight: f32,
    /// Added on every step that ends in game over
    pub game_over_penalty: f32,
    /// Rewards are clipped to `[-clip, clip]`
    pub clip: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            line_bonus: [0.0, 1.0, 3.0, 5.0, 8.0],
            bumpiness_weight: -0.2,
            holes_weight: -1.0,
            height_weight: -0.5,
            game_over_penalty: -5.0,
            clip: 20.0,
        }
    }
}

impl RewardConfig {
    pub fn line_bonus(&self, lines: u32) -> f32 {
        let idx = (lines as usize).min(self.line_bonus.len() - 1);
        self.line_bonus[idx]
    }
}

/// Environment configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvConfig {
    pub rows: usize,
    pub cols: usize,
    /// Steps between gravity drops at level 1
    pub base_fall_interval: u32,
    /// Freezes without a line clear before the episode is truncated
    pub steps_until_truncated: u32,
    pub reward: RewardConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            base_fall_interval: BASE_FALL_INTERVAL,
            steps_until_truncated: STEPS_UNTIL_TRUNCATED,
            reward: RewardConfig::default(),
        }
    }
}

impl EnvConfig {
    /// Gravity interval at `level`, speeding up until level 5
    ///
    /// ```
    /// use rl_tetris_env::EnvConfig;
    ///
    /// let config = EnvConfig::default();
    /// assert_eq!(config.fall_interval_for_level(1), 24);
    /// assert_eq!(config.fall_interval_for_level(3), 16);
    /// assert_eq!(config.fall_interval_for_level(9), 8);
    /// ```
    pub fn fall_interval_for_level(&self, level: u32) -> u32 {
        let steps = level.clamp(1, FALL_SPEEDUP_MAX_LEVEL) - 1;
        self.base_fall_interval
            .saturating_sub(FALL_INTERVAL_STEP * steps)
    }
}
