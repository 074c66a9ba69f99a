//! Board tests - construction, cell access and line clearing

use rl_tetris::core::{Board, GameError};
use rl_tetris::types::{DEFAULT_COLS, DEFAULT_ROWS, EMPTY};

fn grid(rows: usize, cols: usize) -> Vec<Vec<u8>> {
    vec![vec![0u8; cols]; rows]
}

#[test]
fn test_board_new_empty() {
    let board = Board::new(DEFAULT_ROWS, DEFAULT_COLS).unwrap();
    assert_eq!(board.rows(), DEFAULT_ROWS);
    assert_eq!(board.cols(), DEFAULT_COLS);

    for r in 0..DEFAULT_ROWS as i32 {
        for c in 0..DEFAULT_COLS as i32 {
            assert_eq!(board.cell(r, c), Some(EMPTY), "Cell ({}, {}) should be empty", r, c);
        }
    }
}

#[test]
fn test_board_rejects_tiny_dimensions() {
    assert_eq!(
        Board::new(3, 10),
        Err(GameError::InvalidDimensions { rows: 3, cols: 10 })
    );
    assert!(Board::new(20, 0).is_err());
    assert!(Board::new(4, 4).is_ok());
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new(20, 10).unwrap();

    assert_eq!(board.cell(-1, 0), None);
    assert_eq!(board.cell(0, -1), None);
    assert_eq!(board.cell(20, 0), None);
    assert_eq!(board.cell(0, 10), None);
    assert!(!board.is_free(20, 0));
    assert!(!board.occupied(20, 0));
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new(20, 10).unwrap();

    assert!(board.set(10, 5, 3));
    assert_eq!(board.cell(10, 5), Some(3));
    assert!(board.occupied(10, 5));

    assert!(board.set(10, 5, EMPTY));
    assert!(board.is_free(10, 5));

    // Out of bounds or out of the color range
    assert!(!board.set(-1, 0, 1));
    assert!(!board.set(0, 10, 1));
    assert!(!board.set(0, 0, 5));
}

#[test]
fn test_from_rows_validation() {
    let mut ragged = grid(5, 5);
    ragged[2].push(0);
    assert!(matches!(
        Board::from_rows(ragged),
        Err(GameError::RaggedRows { row: 2, .. })
    ));

    let mut bad_color = grid(5, 5);
    bad_color[4][1] = 9;
    assert!(matches!(
        Board::from_rows(bad_color),
        Err(GameError::InvalidCell { row: 4, col: 1, value: 9 })
    ));

    let mut ok = grid(5, 5);
    ok[4][0] = 4;
    let board = Board::from_rows(ok.clone()).unwrap();
    assert_eq!(board.to_rows(), ok);
}

#[test]
fn test_clear_single_line() {
    let mut g = grid(6, 4);
    g[5] = vec![1, 2, 3, 4];
    g[4] = vec![1, 0, 0, 2];
    let mut board = Board::from_rows(g).unwrap();

    assert_eq!(board.clear_full_rows(), 1);
    assert_eq!(board.row(5), &[1, 0, 0, 2]);
    assert!(board.is_row_empty(0));
    assert_eq!(board.filled_cells(), 2);
}

#[test]
fn test_clear_non_adjacent_lines_preserves_order() {
    let mut g = grid(6, 4);
    g[1] = vec![0, 3, 0, 0];
    g[2] = vec![1, 1, 1, 1];
    g[3] = vec![2, 0, 0, 0];
    g[4] = vec![4, 4, 4, 4];
    g[5] = vec![0, 0, 0, 1];
    let mut board = Board::from_rows(g).unwrap();

    assert_eq!(board.clear_full_rows(), 2);
    assert_eq!(
        board.to_rows(),
        vec![
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 3, 0, 0],
            vec![2, 0, 0, 0],
            vec![0, 0, 0, 1],
        ]
    );
}

#[test]
fn test_clear_includes_top_row() {
    let mut g = grid(4, 4);
    g[0] = vec![1, 1, 1, 1];
    g[3] = vec![2, 0, 0, 0];
    let mut board = Board::from_rows(g).unwrap();

    assert_eq!(board.clear_full_rows(), 1);
    assert_eq!(board.filled_cells(), 1);
    assert_eq!(board.cell(3, 0), Some(2));
}

#[test]
fn test_clear_four_lines() {
    let mut board = Board::new(20, 10).unwrap();
    for r in 16..20 {
        for c in 0..10 {
            board.set(r, c, 1);
        }
    }
    assert_eq!(board.clear_full_rows(), 4);
    assert_eq!(board.filled_cells(), 0);
}

#[test]
fn test_lock_cells_is_all_or_nothing() {
    let mut board = Board::new(6, 6).unwrap();
    board.set(5, 2, 1);

    assert!(!board.lock_cells(&[(5, 1), (5, 2)], 3));
    assert!(board.is_free(5, 1));

    assert!(!board.lock_cells(&[(6, 0)], 3));
    assert!(!board.lock_cells(&[(0, 0)], EMPTY));

    assert!(board.lock_cells(&[(4, 1), (4, 2)], 3));
    assert_eq!(board.cell(4, 1), Some(3));
}
