//! Players: the capability the game loop consumes.

use std::io::BufRead;

use hex_board::{parse_coord, Board, BoardError, CellState};
use mcts::{MctsAgent, MctsConfig, SearchError};
use thiserror::Error;
use tracing::warn;

/// Errors surfaced while a player chooses a move.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("move input ended before a move was entered")]
    InputClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Something that can choose a move on a board.
///
/// The board is a read-only snapshot; applying the move is the caller's
/// job. A returned coordinate satisfies `is_valid_move` on the supplied
/// board, or the call fails.
pub trait Player {
    fn choose_move(
        &mut self,
        board: &Board,
        side: CellState,
    ) -> Result<(usize, usize), PlayerError>;
}

/// A player backed by the Monte Carlo tree search engine.
///
/// Each decision constructs a fresh agent; no search state survives between
/// moves.
pub struct MctsPlayer {
    config: MctsConfig,
}

impl MctsPlayer {
    /// Create the player, rejecting contradictory engine configurations up
    /// front rather than on the first move.
    pub fn new(config: MctsConfig) -> Result<Self, PlayerError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

impl Player for MctsPlayer {
    fn choose_move(
        &mut self,
        board: &Board,
        side: CellState,
    ) -> Result<(usize, usize), PlayerError> {
        let agent = MctsAgent::new(self.config.clone())?;
        Ok(agent.choose_move(board, side)?)
    }
}

/// A human entering moves as `<row-number> <column-letter>` lines, e.g.
/// `3 a`. Unparseable lines and occupied cells are skipped until a valid
/// move arrives; end of input is an error.
pub struct HumanPlayer<R> {
    input: R,
}

impl<R: BufRead> HumanPlayer<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> Player for HumanPlayer<R> {
    fn choose_move(
        &mut self,
        board: &Board,
        _side: CellState,
    ) -> Result<(usize, usize), PlayerError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(PlayerError::InputClosed);
            }
            match parse_coord(line.trim()) {
                Ok((row, col)) if board.is_valid_move(row, col) => return Ok((row, col)),
                Ok((row, col)) => {
                    warn!(row, col, "cell is occupied or off the board, try again");
                }
                Err(err) => {
                    warn!(%err, "could not read move, try again");
                }
            }
        }
    }
}
