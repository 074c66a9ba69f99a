use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rl_tetris::core::{Board, Game, GameSnapshot};
use rl_tetris::env::{EnvConfig, TetrisEnv};
use rl_tetris::types::Action;

fn bench_env_step(c: &mut Criterion) {
    let mut env = TetrisEnv::new(EnvConfig::default()).unwrap();
    env.reset(Some(12345));
    let script = [
        Action::Left,
        Action::Rotate,
        Action::Right,
        Action::None,
        Action::SoftDrop,
        Action::HardDrop,
    ];
    let mut i = 0usize;

    c.bench_function("env_step", |b| {
        b.iter(|| {
            let result = env.step(black_box(script[i % script.len()]));
            i += 1;
            if result.terminated || result.truncated {
                env.reset(Some(12345));
            }
            result.reward
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new(20, 10).unwrap();
            // Fill bottom 4 rows
            for r in 16..20 {
                for col in 0..10 {
                    board.set(r, col, 1);
                }
            }
            board.clear_full_rows()
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut game = Game::new(20, 10, Some(12345)).unwrap();

    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            if game.is_game_over() {
                game.restart(Some(12345));
            }
            game.hard_drop()
        })
    });
}

fn bench_move_and_rotate(c: &mut Criterion) {
    let mut game = Game::new(20, 10, Some(12345)).unwrap();

    c.bench_function("move_and_rotate", |b| {
        b.iter(|| {
            let moved = game.move_horizontal(black_box(1)).unwrap_or(false);
            let rotated = game.rotate();
            let _ = game.move_horizontal(-1);
            moved && rotated
        })
    });
}

fn bench_metrics(c: &mut Criterion) {
    let mut game = Game::new(20, 10, Some(7)).unwrap();
    for _ in 0..8 {
        game.hard_drop();
    }

    c.bench_function("board_metrics", |b| b.iter(|| black_box(&game).metrics()));
}

fn bench_snapshot_into(c: &mut Criterion) {
    let game = Game::new(20, 10, Some(7)).unwrap();
    let mut snapshot = GameSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            game.snapshot_into(&mut snapshot);
            snapshot.score
        })
    });
}

fn bench_observation(c: &mut Criterion) {
    let mut env = TetrisEnv::new(EnvConfig::default()).unwrap();
    env.reset(Some(3));
    let mut out = Vec::with_capacity(env.observation_len());

    c.bench_function("observation_encode", |b| {
        b.iter(|| {
            out.clear();
            env.observation().write_into(&mut out);
            out.len()
        })
    });
}

criterion_group!(
    benches,
    bench_env_step,
    bench_line_clear,
    bench_hard_drop,
    bench_move_and_rotate,
    bench_metrics,
    bench_snapshot_into,
    bench_observation
);
criterion_main!(benches);
