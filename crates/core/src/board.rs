//! Board module - manages the game grid
//!
//! The board is a `rows x cols` grid where each cell is empty (0) or holds a color tag.
//! Uses a flat row-major buffer allocated once at construction.
//! Coordinates: (row, col) where row 0 is the top and col 0 the left edge.

use crate::error::GameError;
use crate::pieces::Offset;
use crate::types::{is_valid_cell, Cell, EMPTY, MIN_BOARD_SIDE};

/// The settled cells of a game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(rows: usize, cols: usize) -> Result<Self, GameError> {
        if rows < MIN_BOARD_SIDE || cols < MIN_BOARD_SIDE {
            return Err(GameError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![EMPTY; rows * cols],
        })
    }

    /// Build a board from a grid literal, top row first
    pub fn from_rows(grid: Vec<Vec<Cell>>) -> Result<Self, GameError> {
        let rows = grid.len();
        let cols = grid.first().map(Vec::len).unwrap_or(0);
        let mut board = Self::new(rows, cols)?;

        for (r, line) in grid.iter().enumerate() {
            if line.len() != cols {
                return Err(GameError::RaggedRows {
                    row: r,
                    expected: cols,
                    found: line.len(),
                });
            }
            for (c, &value) in line.iter().enumerate() {
                if !is_valid_cell(value) {
                    return Err(GameError::InvalidCell {
                        row: r,
                        col: c,
                        value,
                    });
                }
            }
            board.cells[r * cols..(r + 1) * cols].copy_from_slice(line);
        }

        Ok(board)
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get cell at (row, col)
    /// Returns None if out of bounds
    pub fn cell(&self, row: i32, col: i32) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col)
    /// Returns false if out of bounds or the value is not a palette entry
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if !is_valid_cell(cell) {
            return false;
        }
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn occupied(&self, row: i32, col: i32) -> bool {
        matches!(self.cell(row, col), Some(c) if c != EMPTY)
    }

    /// Check if position is free (within bounds and empty)
    pub fn is_free(&self, row: i32, col: i32) -> bool {
        self.cell(row, col) == Some(EMPTY)
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        row < self.rows && self.row(row).iter().all(|&c| c != EMPTY)
    }

    /// Check if a row has no filled cell
    pub fn is_row_empty(&self, row: usize) -> bool {
        row < self.rows && self.row(row).iter().all(|&c| c == EMPTY)
    }

    /// Clear all full rows and return how many were removed
    ///
    /// Single bottom-up pass: surviving rows are compacted downwards in order
    /// and the freed rows at the top are emptied.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.cols;
        let mut cleared = 0usize;
        let mut write_row = self.rows;

        for read_row in (0..self.rows).rev() {
            if self.is_row_full(read_row) {
                cleared += 1;
            } else {
                write_row -= 1;
                if write_row != read_row {
                    let src = read_row * width;
                    self.cells.copy_within(src..src + width, write_row * width);
                }
            }
        }

        self.cells[..write_row * width].fill(EMPTY);
        cleared
    }

    /// Write `color` into every listed (row, col)
    /// Returns false and leaves the board untouched if any cell is out of bounds or occupied
    pub fn lock_cells(&mut self, cells: &[Offset], color: Cell) -> bool {
        if !is_valid_cell(color) || color == EMPTY {
            return false;
        }
        if !cells.iter().all(|&(r, c)| self.is_free(r, c)) {
            return false;
        }
        for &(r, c) in cells {
            self.set(r, c, color);
        }
        true
    }

    /// Number of nonzero cells
    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert to a grid of rows, top row first
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.cols).map(<[Cell]>::to_vec).collect()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }
}
