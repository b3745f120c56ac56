//! Player abstraction and game driver for the Hex engine.
//!
//! The game loop only knows the [`Player`] capability: given a read-only
//! board and the side to move, a player returns one coordinate. The engine
//! player wraps the `mcts` crate; the human player interprets the fixed
//! `<row> <letter>` notation from any buffered reader.

pub mod game;
pub mod player;

// Re-export main types for convenience
pub use game::Game;
pub use player::{HumanPlayer, MctsPlayer, Player, PlayerError};
