//! Cell states of the Hex board.

use std::fmt;

/// State of a single board cell.
///
/// `Blue` owns the top and bottom edges and wins by connecting them;
/// `Red` owns the left and right edges. Blue moves first in a full game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Blue,
    Red,
}

impl CellState {
    /// The opposing player. `Empty` has no opponent and maps to itself.
    #[inline]
    pub fn opponent(self) -> CellState {
        match self {
            CellState::Blue => CellState::Red,
            CellState::Red => CellState::Blue,
            CellState::Empty => CellState::Empty,
        }
    }

    /// Single-character board symbol: `.`, `B` or `R`.
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Blue => 'B',
            CellState::Red => 'R',
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
