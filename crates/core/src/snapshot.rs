use crate::metrics::BoardMetrics;
use crate::pieces::Tetromino;
use crate::types::{Cell, PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub orientation: u8,
    pub x: i32,
    pub y: i32,
    pub color: Cell,
}

impl From<Tetromino> for PieceSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            orientation: value.orientation,
            x: value.x,
            y: value.y,
            color: value.color,
        }
    }
}

impl Default for PieceSnapshot {
    fn default() -> Self {
        Self {
            kind: PieceKind::I,
            orientation: 0,
            x: 0,
            y: 0,
            color: 1,
        }
    }
}

/// Plain-data copy of a [`Game`](crate::Game) for observers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub rows: usize,
    pub cols: usize,
    /// Settled cells, row-major
    pub board: Vec<Cell>,
    pub active: PieceSnapshot,
    pub ghost_y: i32,
    pub next: PieceSnapshot,
    pub hold: Option<PieceSnapshot>,
    pub allow_hold: bool,
    pub score: u32,
    pub level: u32,
    pub game_over: bool,
    /// Cached at the last freeze
    pub max_height: u32,
    pub seed: u32,
    pub piece_id: u32,
    pub metrics: BoardMetrics,
}

impl GameSnapshot {
    /// Row `r` of the settled cells
    pub fn board_row(&self, r: usize) -> &[Cell] {
        &self.board[r * self.cols..(r + 1) * self.cols]
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            rows: 0,
            cols: 0,
            board: Vec::new(),
            active: PieceSnapshot::default(),
            ghost_y: 0,
            next: PieceSnapshot::default(),
            hold: None,
            allow_hold: true,
            score: 0,
            level: 1,
            game_over: false,
            max_height: 0,
            seed: 0,
            piece_id: 0,
            metrics: BoardMetrics::default(),
        }
    }
}
