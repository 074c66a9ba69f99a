//! Precondition failures reported by the engine.
//!
//! Collisions during play are not errors (the move is simply refused). These
//! variants cover calls the engine cannot honour at all; none of them leaves
//! state partially modified.

use std::fmt;

use crate::types::{Cell, PieceKind, COLOR_COUNT, MIN_BOARD_SIDE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// Board smaller than the 4x4 piece box
    InvalidDimensions { rows: usize, cols: usize },
    /// A board of the wrong size was supplied to an existing game
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Rows of a grid literal have different lengths
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A cell value outside the palette
    InvalidCell { row: usize, col: usize, value: Cell },
    /// A piece color tag outside `1..=COLOR_COUNT`
    InvalidColor(Cell),
    /// Orientation index at or past the kind's orientation count
    InvalidOrientation { kind: PieceKind, orientation: u8 },
    /// Horizontal moves are one column at a time
    InvalidShift(i32),
    /// The requested placement overlaps the board or its walls
    Collision,
}

impl GameError {
    /// Stable snake_case identifier (used by the wire protocol)
    pub fn code(self) -> &'static str {
        match self {
            GameError::InvalidDimensions { .. } => "invalid_dimensions",
            GameError::DimensionMismatch { .. } => "dimension_mismatch",
            GameError::RaggedRows { .. } => "ragged_rows",
            GameError::InvalidCell { .. } => "invalid_cell",
            GameError::InvalidColor(_) => "invalid_color",
            GameError::InvalidOrientation { .. } => "invalid_orientation",
            GameError::InvalidShift(_) => "invalid_shift",
            GameError::Collision => "collision",
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidDimensions { rows, cols } => write!(
                f,
                "board must be at least {0}x{0}, got {1} rows x {2} cols",
                MIN_BOARD_SIDE, rows, cols
            ),
            GameError::DimensionMismatch { expected, found } => write!(
                f,
                "expected a {}x{} board, got {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            GameError::RaggedRows {
                row,
                expected,
                found,
            } => write!(f, "row {} has {} cells, expected {}", row, found, expected),
            GameError::InvalidCell { row, col, value } => {
                write!(f, "cell ({}, {}) holds invalid value {}", row, col, value)
            }
            GameError::InvalidColor(value) => write!(
                f,
                "piece color must be in 1..={}, got {}",
                COLOR_COUNT, value
            ),
            GameError::InvalidOrientation { kind, orientation } => write!(
                f,
                "{} piece has no orientation {}",
                kind.as_str(),
                orientation
            ),
            GameError::InvalidShift(dx) => {
                write!(f, "horizontal shift must be -1 or +1, got {}", dx)
            }
            GameError::Collision => write!(f, "placement collides with the board"),
        }
    }
}

impl std::error::Error for GameError {}
