//! Board state, move validation and winner detection.
//!
//! The board is a flat row-major grid of [`CellState`]. Winner detection is
//! the hot path of the search engine's random playouts, so it runs an
//! allocation-light depth-first search that erases the visited cell in a
//! scratch grid and restores it before returning.

use std::fmt;

use thiserror::Error;

use crate::cell::CellState;

/// The six offsets defining hex adjacency, in canonical order. Two cells are
/// neighbors iff their coordinate difference appears in this array, and the
/// winner DFS probes them in exactly this order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 6] =
    [(-1, 0), (-1, 1), (0, 1), (1, 0), (1, -1), (0, -1)];

/// Errors surfaced by board operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board size {size} is too small, the minimum is 2")]
    InvalidSize { size: usize },

    #[error("invalid move at row {row}, column {col}: out of bounds or occupied")]
    InvalidMove { row: usize, col: usize },

    #[error("cannot parse {input:?} as a move, expected a row number and a column letter (e.g. \"3 a\")")]
    InvalidCoord { input: String },
}

/// A Hex board of `size x size` cells.
///
/// Cells only ever go from `Empty` to a player state; nothing visible to
/// callers clears a cell again. The winner is therefore stable once found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<CellState>,
}

impl Board {
    /// Create an empty board. Sizes below 2 cannot host a game.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size < 2 {
            return Err(BoardError::InvalidSize { size });
        }
        Ok(Self {
            size,
            cells: vec![CellState::Empty; size * size],
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// State of the cell at `(row, col)`. Panics when out of bounds; use
    /// [`Board::is_within_bounds`] first for untrusted coordinates.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> CellState {
        self.cells[row * self.size + col]
    }

    /// Bounds predicate over signed coordinates, so neighbor arithmetic can
    /// probe positions off the edge of the board.
    #[inline]
    pub fn is_within_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    /// A move is valid when it lands on an empty cell inside the board.
    #[inline]
    pub fn is_valid_move(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cell(row, col) == CellState::Empty
    }

    /// Place `player` at `(row, col)`.
    pub fn make_move(&mut self, row: usize, col: usize, player: CellState) -> Result<(), BoardError> {
        if !self.is_valid_move(row, col) {
            return Err(BoardError::InvalidMove { row, col });
        }
        self.cells[row * self.size + col] = player;
        Ok(())
    }

    /// Every empty cell, in row-major order. The search engine relies on
    /// this order for its deterministic tie-breaks.
    pub fn valid_moves(&self) -> Vec<(usize, usize)> {
        let mut moves = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.cell(row, col) == CellState::Empty {
                    moves.push((row, col));
                }
            }
        }
        moves
    }

    /// True iff the two coordinates are adjacent under [`NEIGHBOR_OFFSETS`].
    pub fn are_cells_connected(&self, a: (usize, usize), b: (usize, usize)) -> bool {
        NEIGHBOR_OFFSETS
            .iter()
            .any(|&(dr, dc)| a.0 as i32 + dr == b.0 as i32 && a.1 as i32 + dc == b.1 as i32)
    }

    /// The winning player, or `Empty` while the game is open.
    ///
    /// Blue wins with a path of Blue cells from row 0 to row `size - 1`,
    /// Red with a path of Red cells from column 0 to column `size - 1`.
    /// Each candidate edge pair is checked with a source-to-destination DFS;
    /// the scratch grid is restored after every probe, so one clone serves
    /// the whole call.
    pub fn winner(&self) -> CellState {
        let mut scratch = self.cells.clone();

        for start_col in 0..self.size {
            if self.cell(0, start_col) != CellState::Blue {
                continue;
            }
            for end_col in 0..self.size {
                if self.cell(self.size - 1, end_col) == CellState::Blue
                    && self.reachable(
                        &mut scratch,
                        (0, start_col),
                        (self.size - 1, end_col),
                        CellState::Blue,
                    )
                {
                    return CellState::Blue;
                }
            }
        }

        for start_row in 0..self.size {
            if self.cell(start_row, 0) != CellState::Red {
                continue;
            }
            for end_row in 0..self.size {
                if self.cell(end_row, self.size - 1) == CellState::Red
                    && self.reachable(
                        &mut scratch,
                        (start_row, 0),
                        (end_row, self.size - 1),
                        CellState::Red,
                    )
                {
                    return CellState::Red;
                }
            }
        }

        CellState::Empty
    }

    // DFS restricted to `player` cells. The visited cell is erased in the
    // scratch grid on entry and written back on every return path, so the
    // grid is unchanged after each call.
    fn reachable(
        &self,
        scratch: &mut [CellState],
        from: (usize, usize),
        to: (usize, usize),
        player: CellState,
    ) -> bool {
        if from == to {
            return true;
        }
        scratch[from.0 * self.size + from.1] = CellState::Empty;
        for (dr, dc) in NEIGHBOR_OFFSETS {
            let next_row = from.0 as i32 + dr;
            let next_col = from.1 as i32 + dc;
            if !self.is_within_bounds(next_row, next_col) {
                continue;
            }
            let next = (next_row as usize, next_col as usize);
            if scratch[next.0 * self.size + next.1] == player
                && self.reachable(scratch, next, to, player)
            {
                scratch[from.0 * self.size + from.1] = player;
                return true;
            }
        }
        scratch[from.0 * self.size + from.1] = player;
        false
    }

    /// Write the hex-oriented diagram of the board to `out`.
    ///
    /// Rows are staggered two columns per rank and numbered 1-based on the
    /// right; the bottom line carries the column letters.
    pub fn render(&self, out: &mut impl fmt::Write) -> fmt::Result {
        for row in 0..self.size {
            write!(out, "{:indent$}", "", indent = 2 * row)?;
            for col in 0..self.size {
                if col > 0 {
                    out.write_str(" - ")?;
                }
                write!(out, "{}", self.cell(row, col))?;
            }
            writeln!(out, " {}", row + 1)?;
            if row + 1 < self.size {
                write!(out, "{:indent$}", "", indent = 2 * row + 1)?;
                for _ in 0..self.size - 1 {
                    out.write_str("\\ / ")?;
                }
                writeln!(out, "\\")?;
            }
        }
        write!(out, "{:indent$}", "", indent = 2 * self.size)?;
        for col in 0..self.size {
            if col > 0 {
                out.write_str("   ")?;
            }
            write!(out, "{}", (b'a' + col as u8) as char)?;
        }
        writeln!(out)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}
