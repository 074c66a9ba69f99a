//! RNG module - seeded piece generation
//!
//! Every game owns its own generator, so two games started from the same seed
//! see the same stream of kinds and colors. Kinds are drawn uniformly (no bag),
//! and each piece gets a color tag drawn uniformly from the palette,
//! independently of its kind.

use crate::pieces::Tetromino;
use crate::types::{PieceKind, COLOR_COUNT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Multiply-shift keeps the high bits; the low bits of an LCG have short periods.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Draws a fresh seed from the OS-backed thread RNG
pub fn entropy_seed() -> u32 {
    rand::random()
}

/// Uniform piece generator
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: SimpleRng,
    seed: u32,
}

impl PieceGenerator {
    /// Create a new generator with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            seed,
        }
    }

    /// The seed this generator was created from
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn draw_kind(&mut self) -> PieceKind {
        let idx = self.rng.next_range(PieceKind::COUNT as u32) as usize;
        PieceKind::ALL[idx]
    }

    /// Color tag in `1..=COLOR_COUNT`
    pub fn draw_color(&mut self) -> u8 {
        1 + self.rng.next_range(COLOR_COUNT as u32) as u8
    }

    /// Draw a kind then a color, and place the piece at the spawn anchor
    pub fn spawn(&mut self, cols: usize) -> Tetromino {
        let kind = self.draw_kind();
        let color = self.draw_color();
        Tetromino::new(kind, color, cols)
    }
}
