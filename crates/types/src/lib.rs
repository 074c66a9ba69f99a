//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine, RL environment, wire protocol).
//!
//! # Board Dimensions
//!
//! The engine accepts any `rows x cols` board of at least 4x4. The defaults
//! match the classic playfield:
//!
//! - **Columns**: 10 (indexed 0-9, left to right)
//! - **Rows**: 20 (indexed 0-19, top to bottom)
//! - **Spawn anchor**: `(min(cols / 2, cols - 4), 0)` for the 4x4 piece box
//!
//! # Environment Timing Constants
//!
//! The RL environment runs on action steps, not wall-clock time:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_FALL_INTERVAL` | 24 | Steps between gravity drops at level 1 |
//! | `FALL_INTERVAL_STEP` | 4 | Interval reduction per level |
//! | `FALL_SPEEDUP_MAX_LEVEL` | 5 | Last level that speeds gravity up |
//! | `STEPS_UNTIL_TRUNCATED` | 35 | Freezes without a line clear before truncation |
//! | `LINES_PER_LEVEL` | 10 | Cleared lines per level |
//!
//! # Examples
//!
//! ```
//! use rl_tetris_types::{Action, PieceKind, DEFAULT_COLS, DEFAULT_ROWS};
//!
//! let piece = PieceKind::T;
//! assert_eq!(PieceKind::from_str("t"), Some(piece));
//! assert_eq!(piece.index(), 5);
//!
//! let action = Action::from_str("hardDrop").unwrap();
//! assert_eq!(action, Action::HardDrop);
//! assert_eq!(Action::from_index(action.index()), Some(action));
//!
//! assert_eq!(DEFAULT_COLS, 10);
//! assert_eq!(DEFAULT_ROWS, 20);
//! ```

/// Default board width in cells
pub const DEFAULT_COLS: usize = 10;

/// Default board height in cells
pub const DEFAULT_ROWS: usize = 20;

/// Smallest accepted board side (the 4x4 piece box must fit)
pub const MIN_BOARD_SIDE: usize = 4;

/// Side of the square box every orientation pattern lives in
pub const PIECE_BOX: usize = 4;

/// Number of cells in every tetromino
pub const MINOS: usize = 4;

/// A cell on the board: `EMPTY` or a color tag in `1..=COLOR_COUNT`
pub type Cell = u8;

/// Empty cell value
pub const EMPTY: Cell = 0;

/// Number of color tags in the palette
pub const COLOR_COUNT: u8 = 4;

/// Cleared lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Gravity interval (in environment steps) at level 1
pub const BASE_FALL_INTERVAL: u32 = 24;

/// Gravity interval reduction per level
pub const FALL_INTERVAL_STEP: u32 = 4;

/// Gravity stops speeding up after this level
pub const FALL_SPEEDUP_MAX_LEVEL: u32 = 5;

/// Freezes without a line clear before an episode is truncated
pub const STEPS_UNTIL_TRUNCATED: u32 = 35;

/// Returns true if `cell` is a legal board value
#[inline]
pub fn is_valid_cell(cell: Cell) -> bool {
    cell <= COLOR_COUNT
}

/// Level for a cumulative count of cleared lines (starts at 1)
///
/// ```
/// use rl_tetris_types::level_for_score;
///
/// assert_eq!(level_for_score(0), 1);
/// assert_eq!(level_for_score(9), 1);
/// assert_eq!(level_for_score(10), 2);
/// assert_eq!(level_for_score(25), 3);
/// ```
#[inline]
pub fn level_for_score(score: u32) -> u32 {
    1 + score / LINES_PER_LEVEL
}

/// The seven tetromino piece kinds
///
/// Declaration order is the one-hot index order used by observations:
/// I, Z, S, J, L, T, O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    Z,
    S,
    J,
    L,
    T,
    O,
}

impl PieceKind {
    /// All kinds in index order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
        PieceKind::O,
    ];

    /// Number of piece kinds
    pub const COUNT: usize = 7;

    /// Stable index in `0..7`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`PieceKind::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use rl_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "z" => Some(PieceKind::Z),
            "s" => Some(PieceKind::S),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "t" => Some(PieceKind::T),
            "o" => Some(PieceKind::O),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::Z => "z",
            PieceKind::S => "s",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::T => "t",
            PieceKind::O => "o",
        }
    }
}

/// Actions an agent (or a human driver) can take in one environment step
///
/// Discriminants are the discrete action ids exposed to trainers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Shift the active piece one column left
    Left,
    /// Shift the active piece one column right
    Right,
    /// Move down one row, freezing if blocked
    SoftDrop,
    /// Advance to the next orientation
    Rotate,
    /// Drop to the resting position and freeze
    HardDrop,
    /// Stash or swap the active piece
    Hold,
    /// Let the step pass (gravity still applies)
    None,
}

impl Action {
    /// All actions in id order
    pub const ALL: [Action; 7] = [
        Action::Left,
        Action::Right,
        Action::SoftDrop,
        Action::Rotate,
        Action::HardDrop,
        Action::Hold,
        Action::None,
    ];

    /// Size of the discrete action space
    pub const COUNT: usize = 7;

    /// Discrete action id
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Action::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse action from string (case-insensitive, accepts a few aliases)
    ///
    /// # Examples
    ///
    /// ```
    /// use rl_tetris_types::Action;
    ///
    /// assert_eq!(Action::from_str("left"), Some(Action::Left));
    /// assert_eq!(Action::from_str("softDrop"), Some(Action::SoftDrop));
    /// assert_eq!(Action::from_str("noop"), Some(Action::None));
    /// assert_eq!(Action::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "moveleft" => Some(Action::Left),
            "right" | "moveright" => Some(Action::Right),
            "softdrop" | "down" => Some(Action::SoftDrop),
            "rotate" => Some(Action::Rotate),
            "harddrop" | "drop" => Some(Action::HardDrop),
            "hold" => Some(Action::Hold),
            "none" | "noop" => Some(Action::None),
            _ => None,
        }
    }

    /// Convert to camelCase string for the wire protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::SoftDrop => "softDrop",
            Action::Rotate => "rotate",
            Action::HardDrop => "hardDrop",
            Action::Hold => "hold",
            Action::None => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_kind_index_roundtrip() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(PieceKind::from_index(i), Some(*kind));
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(*kind));
        }
        assert_eq!(PieceKind::from_index(PieceKind::COUNT), None);
    }

    #[test]
    fn action_ids_match_declaration_order() {
        assert_eq!(Action::Left.index(), 0);
        assert_eq!(Action::Right.index(), 1);
        assert_eq!(Action::SoftDrop.index(), 2);
        assert_eq!(Action::Rotate.index(), 3);
        assert_eq!(Action::HardDrop.index(), 4);
        assert_eq!(Action::Hold.index(), 5);
        assert_eq!(Action::None.index(), 6);
        for action in Action::ALL {
            assert_eq!(Action::from_str(action.as_str()), Some(action));
        }
    }

    #[test]
    fn cell_palette_bounds() {
        assert!(is_valid_cell(EMPTY));
        assert!(is_valid_cell(COLOR_COUNT));
        assert!(!is_valid_cell(COLOR_COUNT + 1));
    }

    #[test]
    fn gravity_defaults() {
        // Fastest gravity stays positive.
        let fastest = BASE_FALL_INTERVAL - FALL_INTERVAL_STEP * (FALL_SPEEDUP_MAX_LEVEL - 1);
        assert_eq!(fastest, 8);
        assert_eq!(STEPS_UNTIL_TRUNCATED, 35);
    }
}
