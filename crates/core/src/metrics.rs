//! Board metrics used by renderers and as reward shaping terms.
//!
//! All functions are pure reads of a [`Board`]. Complexity O(rows * cols).

use crate::board::Board;
use crate::types::EMPTY;

/// Height of one column: `rows - first_filled_row`, or 0 when empty
pub fn column_height(board: &Board, col: usize) -> u32 {
    if col >= board.cols() {
        return 0;
    }
    (0..board.rows())
        .find(|&r| board.row(r)[col] != EMPTY)
        .map(|r| (board.rows() - r) as u32)
        .unwrap_or(0)
}

/// Heights of all columns, left to right
pub fn column_heights(board: &Board) -> Vec<u32> {
    (0..board.cols()).map(|c| column_height(board, c)).collect()
}

/// Empty cells lying below the topmost filled cell of their column
pub fn blocked_cells(board: &Board) -> u32 {
    holes_of(board, &column_heights(board))
}

fn holes_of(board: &Board, heights: &[u32]) -> u32 {
    let rows = board.rows();
    let mut holes = 0u32;
    for (c, &h) in heights.iter().enumerate() {
        let top = rows - h as usize;
        holes += (top..rows).filter(|&r| board.row(r)[c] == EMPTY).count() as u32;
    }
    holes
}

/// Sum of absolute height differences between neighbouring columns
pub fn bumpiness(board: &Board) -> u32 {
    bumpiness_of(&column_heights(board))
}

fn bumpiness_of(heights: &[u32]) -> u32 {
    heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum()
}

/// Sum of all column heights
pub fn aggregate_height(board: &Board) -> u32 {
    column_heights(board).iter().sum()
}

/// Stack height measured from the first fully empty row above the floor
///
/// Scans upwards from the bottom; returns `rows - 1` when no row is empty.
pub fn max_height(board: &Board) -> u32 {
    let rows = board.rows();
    (0..rows)
        .rev()
        .find(|&r| board.is_row_empty(r))
        .map(|r| (rows - r - 1) as u32)
        .unwrap_or(rows.saturating_sub(1) as u32)
}

/// All metrics of one board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoardMetrics {
    pub max_height: u32,
    pub aggregate_height: u32,
    pub holes: u32,
    pub bumpiness: u32,
}

/// Signed change between two [`BoardMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsDelta {
    pub max_height: i32,
    pub aggregate_height: i32,
    pub holes: i32,
    pub bumpiness: i32,
}

impl BoardMetrics {
    /// Compute every metric with a single height scan
    pub fn compute(board: &Board) -> Self {
        let heights = column_heights(board);
        Self {
            max_height: max_height(board),
            aggregate_height: heights.iter().sum(),
            holes: holes_of(board, &heights),
            bumpiness: bumpiness_of(&heights),
        }
    }

    /// `self - prev`
    pub fn delta(&self, prev: &BoardMetrics) -> MetricsDelta {
        MetricsDelta {
            max_height: self.max_height as i32 - prev.max_height as i32,
            aggregate_height: self.aggregate_height as i32 - prev.aggregate_height as i32,
            holes: self.holes as i32 - prev.holes as i32,
            bumpiness: self.bumpiness as i32 - prev.bumpiness as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Board {
        // heights: 3, 0, 2, 4 ; holes: col0 one, col3 two
        Board::from_rows(vec![
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 1],
            vec![2, 0, 0, 0],
            vec![0, 0, 3, 0],
            vec![1, 0, 3, 1],
        ])
        .unwrap()
    }

    #[test]
    fn test_column_heights() {
        let board = sample();
        assert_eq!(column_heights(&board), vec![3, 0, 2, 4]);
        assert_eq!(column_height(&board, 7), 0);
    }

    #[test]
    fn test_blocked_cells_counts_holes_under_overhangs() {
        assert_eq!(blocked_cells(&sample()), 3);
        assert_eq!(blocked_cells(&Board::new(6, 4).unwrap()), 0);
    }

    #[test]
    fn test_bumpiness_and_aggregate() {
        let board = sample();
        assert_eq!(bumpiness(&board), 3 + 2 + 2);
        assert_eq!(aggregate_height(&board), 9);
    }

    #[test]
    fn test_max_height_uses_first_empty_row_from_bottom() {
        let board = sample();
        // Row 1 is the first fully empty row scanning up from row 5.
        assert_eq!(max_height(&board), 4);
        assert_eq!(max_height(&Board::new(6, 4).unwrap()), 0);

        let full = Board::from_rows(vec![vec![1; 4]; 4]).unwrap();
        assert_eq!(max_height(&full), 3);
    }

    #[test]
    fn test_max_height_with_no_empty_row() {
        // One settled cell in column 0 of every row.
        let mut board = Board::new(20, 10).unwrap();
        for r in 0..20 {
            board.set(r, 0, 1);
        }
        assert_eq!(max_height(&board), 19);
        assert_eq!(BoardMetrics::compute(&board).max_height, 19);
    }

    #[test]
    fn test_compute_matches_individual_functions() {
        let board = sample();
        let m = BoardMetrics::compute(&board);
        assert_eq!(m.max_height, max_height(&board));
        assert_eq!(m.aggregate_height, aggregate_height(&board));
        assert_eq!(m.holes, blocked_cells(&board));
        assert_eq!(m.bumpiness, bumpiness(&board));
    }

    #[test]
    fn test_delta() {
        let prev = BoardMetrics {
            max_height: 4,
            aggregate_height: 10,
            holes: 3,
            bumpiness: 2,
        };
        let cur = BoardMetrics {
            max_height: 2,
            aggregate_height: 12,
            holes: 3,
            bumpiness: 5,
        };
        let d = cur.delta(&prev);
        assert_eq!(d.max_height, -2);
        assert_eq!(d.aggregate_height, 2);
        assert_eq!(d.holes, 0);
        assert_eq!(d.bumpiness, 3);
    }
}
