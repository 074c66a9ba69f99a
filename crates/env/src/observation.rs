//! Observation encoding
//!
//! Layout of [`Observation::to_vec`], in order:
//!
//! | field | len |
//! |-------|-----|
//! | active kind one-hot (I,Z,S,J,L,T,O) | 7 |
//! | orientation one-hot | 4 |
//! | x / (cols - 1) | 1 |
//! | y / (rows - 1) | 1 |
//! | steps to next gravity drop | 1 |
//! | next kind one-hot | 7 |
//! | held kind one-hot (zeros when empty) | 7 |
//! | level | 1 |
//! | board occupancy, row-major | rows * cols |

use crate::core::Game;
use crate::types::{PieceKind, EMPTY};

/// Orientation slots in the one-hot encoding
pub const ORIENTATION_SLOTS: usize = 4;

/// Length of everything before the board
pub const HEADER_LEN: usize = 3 * PieceKind::COUNT + ORIENTATION_SLOTS + 4;

/// Total flattened length for a `rows x cols` board
pub fn observation_len(rows: usize, cols: usize) -> usize {
    HEADER_LEN + rows * cols
}

fn one_hot<const N: usize>(index: Option<usize>) -> [f32; N] {
    let mut out = [0.0; N];
    if let Some(slot) = index.and_then(|i| out.get_mut(i)) {
        *slot = 1.0;
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub piece_type: [f32; PieceKind::COUNT],
    pub rotation: [f32; ORIENTATION_SLOTS],
    pub x: f32,
    pub y: f32,
    pub ticks_to_gravity: f32,
    pub next_piece: [f32; PieceKind::COUNT],
    pub hold_piece: [f32; PieceKind::COUNT],
    pub level: f32,
    /// 1.0 for every occupied cell, row-major
    pub board: Vec<f32>,
}

impl Observation {
    /// Encode the current state of `game`
    pub fn encode(game: &Game, ticks_to_gravity: u32) -> Self {
        let active = game.active_piece();
        let x_scale = (game.cols() - 1) as f32;
        let y_scale = (game.rows() - 1) as f32;

        Self {
            piece_type: one_hot(Some(active.kind.index())),
            rotation: one_hot(Some(active.orientation as usize)),
            x: active.x as f32 / x_scale,
            y: active.y as f32 / y_scale,
            ticks_to_gravity: ticks_to_gravity as f32,
            next_piece: one_hot(Some(game.next_piece().kind.index())),
            hold_piece: one_hot(game.held_piece().map(|p| p.kind.index())),
            level: game.level() as f32,
            board: game
                .board()
                .cells()
                .iter()
                .map(|&c| if c != EMPTY { 1.0 } else { 0.0 })
                .collect(),
        }
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        HEADER_LEN + self.board.len()
    }

    /// Append the flattened observation to `out`
    pub fn write_into(&self, out: &mut Vec<f32>) {
        out.reserve(self.len());
        out.extend_from_slice(&self.piece_type);
        out.extend_from_slice(&self.rotation);
        out.push(self.x);
        out.push(self.y);
        out.push(self.ticks_to_gravity);
        out.extend_from_slice(&self.next_piece);
        out.extend_from_slice(&self.hold_piece);
        out.push(self.level);
        out.extend_from_slice(&self.board);
    }

    pub fn to_vec(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len());
        self.write_into(&mut out);
        out
    }
}
