//! Environment tests - step semantics, reward shaping and observation layout

use rl_tetris::core::{Board, Tetromino};
use rl_tetris::env::{observation_len, EnvConfig, RewardConfig, TetrisEnv, HEADER_LEN};
use rl_tetris::types::{Action, PieceKind};

fn env(seed: u32) -> TetrisEnv {
    let mut env = TetrisEnv::new(EnvConfig::default()).unwrap();
    env.reset(Some(seed));
    env
}

#[test]
fn test_rejects_invalid_board_size() {
    let config = EnvConfig {
        rows: 2,
        ..EnvConfig::default()
    };
    assert!(TetrisEnv::new(config).is_err());
}

#[test]
fn test_observation_layout() {
    let mut e = env(21);
    let obs = e.reset(Some(21));
    let flat = obs.to_vec();
    assert_eq!(HEADER_LEN, 29);
    assert_eq!(flat.len(), observation_len(20, 10));
    assert_eq!(flat.len(), 29 + 200);

    let active = e.game().active_piece();
    // One-hot kind, then one-hot orientation.
    assert_eq!(flat[active.kind.index()], 1.0);
    assert_eq!(flat[..7].iter().sum::<f32>(), 1.0);
    assert_eq!(flat[7], 1.0);
    assert_eq!(flat[7..11].iter().sum::<f32>(), 1.0);
    // x and y normalised by cols - 1 and rows - 1.
    assert!((flat[11] - 5.0 / 9.0).abs() < 1e-6);
    assert_eq!(flat[12], 0.0);
    assert_eq!(flat[13], 24.0);
    // Next kind, empty hold slot, level.
    let next = e.game().next_piece();
    assert_eq!(flat[14 + next.kind.index()], 1.0);
    assert!(flat[21..28].iter().all(|&v| v == 0.0));
    assert_eq!(flat[28], 1.0);
    assert!(flat[29..].iter().all(|&v| v == 0.0));
}

#[test]
fn test_observation_marks_hold_and_board() {
    let mut e = env(4);
    let first = e.game().active_piece().kind;
    e.step(Action::Hold);
    e.step(Action::HardDrop);

    let flat = e.observation().to_vec();
    assert_eq!(flat[21 + first.index()], 1.0);
    let occupied = flat[HEADER_LEN..].iter().filter(|&&v| v == 1.0).count();
    assert_eq!(occupied, e.game().board().filled_cells());
}

#[test]
fn test_hard_drop_freeze_reward() {
    let mut e = env(6);
    e.game_mut()
        .set_active_piece(Tetromino::new(PieceKind::O, 1, 10).at(-1, 0))
        .unwrap();

    let result = e.step(Action::HardDrop);
    assert!(result.info.froze);
    assert_eq!(result.info.lines_cleared, 0);
    // O in columns 0-1: bumpiness 2, no holes, height 2.
    let expected = -0.2 * 2.0 - 0.5 * 2.0;
    assert!((result.reward - expected).abs() < 1e-5, "{}", result.reward);
    assert_eq!(e.freezes_without_scoring(), 1);
}

#[test]
fn test_non_freezing_steps_are_unrewarded() {
    let mut e = env(10);
    for action in [Action::Left, Action::Rotate, Action::Right, Action::None] {
        let result = e.step(action);
        assert_eq!(result.reward, 0.0);
        assert!(!result.info.froze);
        assert!(!result.terminated && !result.truncated);
    }
    assert_eq!(e.frame(), 4);
}

#[test]
fn test_gravity_eventually_freezes_idle_piece() {
    let mut e = env(12);
    let first_id = e.game().piece_id();
    let mut froze_at = None;
    for i in 0..2_000 {
        let result = e.step(Action::None);
        if result.info.froze {
            froze_at = Some(i);
            break;
        }
    }
    assert!(froze_at.is_some());
    assert_eq!(e.game().piece_id(), first_id + 1);
}

#[test]
fn test_fall_interval_speeds_up_with_level() {
    let config = EnvConfig::default();
    let intervals: Vec<u32> = (1..=7).map(|l| config.fall_interval_for_level(l)).collect();
    assert_eq!(intervals, vec![24, 20, 16, 12, 8, 8, 8]);

    let mut e = env(3);
    let mut grid = vec![vec![0u8; 10]; 20];
    for row in grid.iter_mut().skip(10) {
        for cell in &mut row[1..] {
            *cell = 1;
        }
    }
    e.game_mut()
        .load_board(Board::from_rows(grid).unwrap())
        .unwrap();

    // Vertical I pieces down column 0 clear 4, 4, then 2 lines.
    for expected_lines in [4, 4, 2] {
        e.game_mut()
            .set_active_piece(Tetromino::new(PieceKind::I, 2, 10).at(-1, 0))
            .unwrap();
        let result = e.step(Action::HardDrop);
        assert_eq!(result.info.lines_cleared, expected_lines);
    }
    assert_eq!(e.game().score(), 10);
    assert_eq!(e.game().level(), 2);
    assert_eq!(e.fall_interval(), 20);
    assert_eq!(e.freezes_without_scoring(), 0);
}

#[test]
fn test_custom_reward_weights() {
    let config = EnvConfig {
        reward: RewardConfig {
            bumpiness_weight: 0.0,
            holes_weight: 0.0,
            height_weight: 0.0,
            ..RewardConfig::default()
        },
        ..EnvConfig::default()
    };
    let mut e = TetrisEnv::new(config).unwrap();
    e.reset(Some(1));
    let result = e.step(Action::HardDrop);
    assert_eq!(result.reward, 0.0);
    assert_eq!(config.reward.line_bonus(4), 8.0);
    assert_eq!(config.reward.line_bonus(9), 8.0);
}

#[test]
fn test_episode_ends_and_reset_recovers() {
    let mut e = env(15);
    let mut finished = false;
    for _ in 0..500 {
        let result = e.step(Action::HardDrop);
        if result.terminated || result.truncated {
            finished = true;
            break;
        }
    }
    assert!(finished);

    let obs = e.reset(Some(15));
    assert_eq!(obs.to_vec().len(), e.observation_len());
    assert!(!e.game().is_game_over());
    assert_eq!(e.frame(), 0);
}
