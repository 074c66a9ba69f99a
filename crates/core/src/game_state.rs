//! Game state module - the engine state machine
//!
//! [`Game`] owns the board, the active/next/held pieces, the score and the
//! seeded generator. Every mutation is one synchronous, deterministic
//! transition:
//!
//! ```text
//! Active --(freeze: lock, clear, spawn next)--> Active
//!                                          \--> GameOver (new piece collides)
//! ```
//!
//! Once the game is over, every mutator is a no-op until [`Game::reset`].
//! Refused moves (collisions) are not errors: the piece simply stays put and
//! the call reports `false`.

use crate::board::Board;
use crate::error::GameError;
use crate::metrics::{self, BoardMetrics};
use crate::pieces::{PieceCells, Tetromino};
use crate::rng::{entropy_seed, PieceGenerator};
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::{level_for_score, Action, Cell, COLOR_COUNT, MINOS};

/// Result of the most recent freeze (consumed by observers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FreezeEvent {
    /// Cells written onto the board by the frozen piece
    pub cells_written: u32,
    /// Full rows removed by this freeze
    pub lines_cleared: u32,
    /// Whether the piece spawned afterwards collided
    pub game_over: bool,
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    active: Tetromino,
    next: Tetromino,
    hold: Option<Tetromino>,
    allow_hold: bool,
    /// Cumulative cleared lines
    score: u32,
    level: u32,
    game_over: bool,
    /// Stack height as of the last freeze
    max_height: u32,
    generator: PieceGenerator,
    /// Pieces that became active from the generator since the game started
    piece_id: u32,
    last_event: Option<FreezeEvent>,
}

impl Game {
    /// Start a game on an empty `rows x cols` board
    ///
    /// A `None` seed draws one from the OS entropy source; the chosen seed is
    /// reported by [`Game::seed`] so the game can be replayed.
    pub fn new(rows: usize, cols: usize, seed: Option<u32>) -> Result<Self, GameError> {
        Ok(Self::start(Board::new(rows, cols)?, seed))
    }

    fn start(board: Board, seed: Option<u32>) -> Self {
        let cols = board.cols();
        let mut generator = PieceGenerator::new(seed.unwrap_or_else(entropy_seed));
        let active = generator.spawn(cols);
        let next = generator.spawn(cols);

        let mut game = Self {
            board,
            active,
            next,
            hold: None,
            allow_hold: true,
            score: 0,
            level: level_for_score(0),
            game_over: false,
            max_height: 0,
            generator,
            piece_id: 1,
            last_event: None,
        };
        // Only reachable on boards barely larger than the piece box.
        game.game_over = game.intersects(&game.active);
        game
    }

    /// Reinitialise everything from a fresh generator stream
    ///
    /// On error the current game is left untouched.
    pub fn reset(&mut self, rows: usize, cols: usize, seed: Option<u32>) -> Result<(), GameError> {
        *self = Self::new(rows, cols, seed)?;
        Ok(())
    }

    /// New game on an empty board of the current dimensions
    pub fn restart(&mut self, seed: Option<u32>) {
        let mut board = self.board.clone();
        board.clear();
        *self = Self::start(board, seed);
    }

    pub fn rows(&self) -> usize {
        self.board.rows()
    }

    pub fn cols(&self) -> usize {
        self.board.cols()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Copy of the settled cells, top row first
    pub fn board_snapshot(&self) -> Vec<Vec<Cell>> {
        self.board.to_rows()
    }

    pub fn active_piece(&self) -> Tetromino {
        self.active
    }

    pub fn next_piece(&self) -> Tetromino {
        self.next
    }

    pub fn held_piece(&self) -> Option<Tetromino> {
        self.hold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn allow_hold(&self) -> bool {
        self.allow_hold
    }

    /// Seed of the current game's generator
    pub fn seed(&self) -> u32 {
        self.generator.seed()
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    /// Stack height recorded at the last freeze (0 before the first one)
    pub fn cached_max_height(&self) -> u32 {
        self.max_height
    }

    /// Take and clear the last freeze event.
    pub fn take_last_event(&mut self) -> Option<FreezeEvent> {
        self.last_event.take()
    }

    /// True if any cell of `piece` is out of bounds or on a settled cell
    pub fn intersects(&self, piece: &Tetromino) -> bool {
        piece
            .cells()
            .iter()
            .any(|&(row, col)| !self.board.is_free(row, col))
    }

    /// Commit `candidate` as the active piece if it fits
    fn try_place(&mut self, candidate: Tetromino) -> bool {
        if self.intersects(&candidate) {
            return false;
        }
        self.active = candidate;
        true
    }

    /// Shift the active piece one column left (`-1`) or right (`+1`)
    pub fn move_horizontal(&mut self, dx: i32) -> Result<bool, GameError> {
        if dx != -1 && dx != 1 {
            return Err(GameError::InvalidShift(dx));
        }
        if self.game_over {
            return Ok(false);
        }
        let moved = self.active.at(self.active.x + dx, self.active.y);
        Ok(self.try_place(moved))
    }

    /// Step to the next orientation in place; refused if the new pattern collides
    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let mut rotated = self.active;
        rotated.rotate_forward();
        self.try_place(rotated)
    }

    /// Move down one row, freezing instead when blocked
    ///
    /// Returns true if the piece froze.
    pub fn soft_drop_step(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let lowered = self.active.at(self.active.x, self.active.y + 1);
        if self.try_place(lowered) {
            return false;
        }
        self.freeze();
        true
    }

    /// Rows the active piece can fall before it would collide
    fn drop_distance(&self) -> u32 {
        let mut distance = 0;
        loop {
            let probe = self
                .active
                .at(self.active.x, self.active.y + distance as i32 + 1);
            if self.intersects(&probe) {
                return distance;
            }
            distance += 1;
        }
    }

    /// Drop to the resting position and freeze
    ///
    /// Returns the number of rows travelled.
    pub fn hard_drop(&mut self) -> u32 {
        if self.game_over {
            return 0;
        }
        let distance = self.drop_distance();
        self.active = self.active.at(self.active.x, self.active.y + distance as i32);
        self.freeze();
        distance
    }

    /// Board cells the active piece would occupy after falling straight down
    pub fn project_ghost(&self) -> PieceCells {
        let distance = self.drop_distance();
        self.active
            .at(self.active.x, self.active.y + distance as i32)
            .cells()
    }

    /// Row of the ghost piece's anchor
    pub fn ghost_y(&self) -> i32 {
        self.active.y + self.drop_distance() as i32
    }

    /// Stash the active piece, or swap it with the held one
    ///
    /// Allowed once between freezes. Both pieces go back to their spawn
    /// placement; if the piece that becomes active collides, the game is over.
    pub fn hold(&mut self) -> bool {
        if self.game_over || !self.allow_hold {
            return false;
        }
        let cols = self.cols();
        let mut stashed = self.active;
        stashed.reset_to_spawn(cols);

        match self.hold.replace(stashed) {
            Some(mut held) => {
                held.reset_to_spawn(cols);
                self.active = held;
            }
            None => self.advance_queue(),
        }

        self.allow_hold = false;
        if self.intersects(&self.active) {
            self.game_over = true;
        }
        true
    }

    /// Promote the next piece and draw a replacement
    fn advance_queue(&mut self) {
        let cols = self.cols();
        self.active = self.next;
        self.next = self.generator.spawn(cols);
        self.piece_id = self.piece_id.wrapping_add(1);
    }

    /// Lock the active piece, clear lines and spawn the next piece
    ///
    /// Returns whether any cell was written (false once the game is over).
    pub fn freeze(&mut self) -> bool {
        if self.game_over {
            return false;
        }

        let cells = self.active.cells();
        if !self.board.lock_cells(&cells, self.active.color) {
            // The active piece always fits while the game runs; stop rather than corrupt the board.
            self.game_over = true;
            return false;
        }

        let lines = self.board.clear_full_rows() as u32;
        self.score += lines;
        self.level = level_for_score(self.score);
        self.max_height = metrics::max_height(&self.board);

        self.advance_queue();
        self.allow_hold = true;
        self.game_over = self.intersects(&self.active);

        self.last_event = Some(FreezeEvent {
            cells_written: MINOS as u32,
            lines_cleared: lines,
            game_over: self.game_over,
        });
        true
    }

    /// Apply one agent action
    ///
    /// Returns whether the action changed the game. Use
    /// [`Game::take_last_event`] to learn whether it froze a piece.
    pub fn apply_action(&mut self, action: Action) -> bool {
        if self.game_over {
            return false;
        }
        match action {
            Action::Left => matches!(self.move_horizontal(-1), Ok(true)),
            Action::Right => matches!(self.move_horizontal(1), Ok(true)),
            Action::SoftDrop => {
                self.soft_drop_step();
                true
            }
            Action::Rotate => self.rotate(),
            Action::HardDrop => {
                self.hard_drop();
                true
            }
            Action::Hold => self.hold(),
            Action::None => false,
        }
    }

    /// Replace the settled cells (scenario setup and replays)
    ///
    /// The board must have the game's dimensions. If the active piece now
    /// overlaps a settled cell, the game is over.
    pub fn load_board(&mut self, board: Board) -> Result<(), GameError> {
        let expected = (self.rows(), self.cols());
        let found = (board.rows(), board.cols());
        if expected != found {
            return Err(GameError::DimensionMismatch { expected, found });
        }
        self.board = board;
        self.max_height = metrics::max_height(&self.board);
        if self.intersects(&self.active) {
            self.game_over = true;
        }
        Ok(())
    }

    /// Place an arbitrary piece as the active one
    pub fn set_active_piece(&mut self, piece: Tetromino) -> Result<(), GameError> {
        if piece.color == 0 || piece.color > COLOR_COUNT {
            return Err(GameError::InvalidColor(piece.color));
        }
        if piece.orientation as usize >= piece.orientation_count() {
            return Err(GameError::InvalidOrientation {
                kind: piece.kind,
                orientation: piece.orientation,
            });
        }
        if self.intersects(&piece) {
            return Err(GameError::Collision);
        }
        self.active = piece;
        Ok(())
    }

    pub fn blocked_cells(&self) -> u32 {
        metrics::blocked_cells(&self.board)
    }

    pub fn bumpiness(&self) -> u32 {
        metrics::bumpiness(&self.board)
    }

    /// Current stack height (not the cached value)
    pub fn max_height(&self) -> u32 {
        metrics::max_height(&self.board)
    }

    pub fn aggregate_height(&self) -> u32 {
        metrics::aggregate_height(&self.board)
    }

    pub fn metrics(&self) -> BoardMetrics {
        BoardMetrics::compute(&self.board)
    }

    /// Fill `out` in place, reusing its board buffer
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.rows = self.rows();
        out.cols = self.cols();
        out.board.clear();
        out.board.extend_from_slice(self.board.cells());

        out.active = PieceSnapshot::from(self.active);
        out.ghost_y = self.ghost_y();
        out.next = PieceSnapshot::from(self.next);
        out.hold = self.hold.map(PieceSnapshot::from);
        out.allow_hold = self.allow_hold;
        out.score = self.score;
        out.level = self.level;
        out.game_over = self.game_over;
        out.max_height = self.max_height;
        out.seed = self.seed();
        out.piece_id = self.piece_id;
        out.metrics = self.metrics();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
