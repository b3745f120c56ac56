//! The game driver: alternate two players until one connects their edges.

use hex_board::{Board, BoardError, CellState};
use tracing::info;

use crate::player::{Player, PlayerError};

/// A game of Hex between two [`Player`]s. Blue owns the top and bottom
/// edges and moves first; Red owns the left and right edges.
pub struct Game {
    board: Board,
    blue: Box<dyn Player>,
    red: Box<dyn Player>,
}

impl Game {
    pub fn new(
        size: usize,
        blue: Box<dyn Player>,
        red: Box<dyn Player>,
    ) -> Result<Self, BoardError> {
        Ok(Self {
            board: Board::new(size)?,
            blue,
            red,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the game to completion and return the winner.
    ///
    /// Each turn the current player gets a read-only snapshot of the board
    /// and must return a valid move; the board is mutated here, never by
    /// the players. Hex cannot draw, so the loop always ends with a winner.
    pub fn play(&mut self) -> Result<CellState, PlayerError> {
        let mut current = CellState::Blue;
        loop {
            let player = match current {
                CellState::Blue => &mut self.blue,
                _ => &mut self.red,
            };
            let (row, col) = player.choose_move(&self.board, current)?;
            self.board.make_move(row, col, current)?;
            info!(player = %current, row, col, "move played");

            let winner = self.board.winner();
            if winner != CellState::Empty {
                info!(winner = %winner, "game over");
                return Ok(winner);
            }
            current = current.opponent();
        }
    }
}
