//! Pieces module - tetromino shape catalogue and the piece instance
//!
//! Every orientation is a 16-bit mask over a 4x4 box, bit index `row * 4 + col`:
//!
//! ```text
//!  0  1  2  3
//!  4  5  6  7
//!  8  9 10 11
//! 12 13 14 15
//! ```
//!
//! Rotation is a plain step through the kind's orientation list. There are no
//! wall kicks: the engine accepts a rotation only if the new pattern fits.

use arrayvec::ArrayVec;

use crate::types::{Cell, PieceKind, MINOS, PIECE_BOX};

/// Occupancy of one orientation inside the 4x4 box
pub type ShapeMask = u16;

/// `(row, col)` offset inside the 4x4 box, or an absolute board position
pub type Offset = (i32, i32);

/// The cells of one piece
pub type PieceCells = ArrayVec<Offset, MINOS>;

const fn mask(cells: [u8; MINOS]) -> ShapeMask {
    (1 << cells[0]) | (1 << cells[1]) | (1 << cells[2]) | (1 << cells[3])
}

const I_SHAPES: [ShapeMask; 2] = [mask([1, 5, 9, 13]), mask([4, 5, 6, 7])];
const Z_SHAPES: [ShapeMask; 2] = [mask([4, 5, 9, 10]), mask([2, 6, 5, 9])];
const S_SHAPES: [ShapeMask; 2] = [mask([6, 7, 9, 10]), mask([1, 5, 6, 10])];
const J_SHAPES: [ShapeMask; 4] = [
    mask([1, 2, 5, 9]),
    mask([0, 4, 5, 6]),
    mask([1, 5, 9, 8]),
    mask([4, 5, 6, 10]),
];
const L_SHAPES: [ShapeMask; 4] = [
    mask([1, 2, 6, 10]),
    mask([5, 6, 7, 9]),
    mask([2, 6, 10, 11]),
    mask([3, 5, 6, 7]),
];
const T_SHAPES: [ShapeMask; 4] = [
    mask([1, 4, 5, 6]),
    mask([1, 4, 5, 9]),
    mask([4, 5, 6, 9]),
    mask([1, 5, 6, 9]),
];
const O_SHAPES: [ShapeMask; 1] = [mask([1, 2, 5, 6])];

/// Orientation masks of a kind, in rotation order
pub fn orientations(kind: PieceKind) -> &'static [ShapeMask] {
    match kind {
        PieceKind::I => &I_SHAPES,
        PieceKind::Z => &Z_SHAPES,
        PieceKind::S => &S_SHAPES,
        PieceKind::J => &J_SHAPES,
        PieceKind::L => &L_SHAPES,
        PieceKind::T => &T_SHAPES,
        PieceKind::O => &O_SHAPES,
    }
}

/// Number of distinct orientations (1, 2 or 4)
pub fn orientation_count(kind: PieceKind) -> usize {
    orientations(kind).len()
}

/// Mask for `orientation`, wrapping modulo the kind's orientation count
pub fn shape_mask(kind: PieceKind, orientation: usize) -> ShapeMask {
    let shapes = orientations(kind);
    shapes[orientation % shapes.len()]
}

/// Expand a mask into `(row, col)` offsets, row-major
pub fn mask_offsets(mask: ShapeMask) -> PieceCells {
    let mut out = PieceCells::new();
    for idx in 0..(PIECE_BOX * PIECE_BOX) {
        if mask & (1 << idx) != 0 {
            out.push(((idx / PIECE_BOX) as i32, (idx % PIECE_BOX) as i32));
        }
    }
    out
}

/// Offsets occupied by `kind` in `orientation`, relative to the box corner
pub fn occupied_cells(kind: PieceKind, orientation: usize) -> PieceCells {
    mask_offsets(shape_mask(kind, orientation))
}

/// Spawn anchor `(x, y)` of the 4x4 box for a board `cols` wide
///
/// The box starts at the middle column, shifted left on narrow boards so it
/// stays inside the walls.
pub fn spawn_anchor(cols: usize) -> (i32, i32) {
    ((cols / 2).min(cols.saturating_sub(PIECE_BOX)) as i32, 0)
}

/// A tetromino instance: active, queued as next, or held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    /// Index into [`orientations`], always below the kind's count
    pub orientation: u8,
    /// Column of the box's top-left cell
    pub x: i32,
    /// Row of the box's top-left cell
    pub y: i32,
    /// Color tag in `1..=COLOR_COUNT`, fixed at creation
    pub color: Cell,
}

impl Tetromino {
    /// Create a piece at the spawn anchor of a board `cols` wide
    pub fn new(kind: PieceKind, color: Cell, cols: usize) -> Self {
        let (x, y) = spawn_anchor(cols);
        Self {
            kind,
            orientation: 0,
            x,
            y,
            color,
        }
    }

    /// Same piece moved to `(x, y)`
    pub fn at(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    pub fn mask(&self) -> ShapeMask {
        shape_mask(self.kind, self.orientation as usize)
    }

    pub fn orientation_count(&self) -> usize {
        orientation_count(self.kind)
    }

    /// Offsets of the current orientation within the 4x4 box
    pub fn occupied_cells(&self) -> PieceCells {
        mask_offsets(self.mask())
    }

    /// Absolute `(row, col)` board positions at the current anchor
    pub fn cells(&self) -> PieceCells {
        self.occupied_cells()
            .into_iter()
            .map(|(dr, dc)| (self.y + dr, self.x + dc))
            .collect()
    }

    /// Step to the next orientation (no collision check)
    pub fn rotate_forward(&mut self) {
        let count = self.orientation_count();
        self.orientation = ((self.orientation as usize + 1) % count) as u8;
    }

    /// Back to orientation 0 at the spawn anchor; kind and color are kept
    pub fn reset_to_spawn(&mut self, cols: usize) {
        let (x, y) = spawn_anchor(cols);
        self.orientation = 0;
        self.x = x;
        self.y = y;
    }
}
