//! Time-bounded Monte Carlo tree search for Hex.
//!
//! The engine implements the *flat* variant of MCTS: every decision expands
//! only the root's children, and all signal about deeper play comes from
//! uniformly random playouts. Each call to
//! [`MctsAgent::choose_move`](search::MctsAgent::choose_move) builds a fresh
//! tree, runs select / simulate / backpropagate iterations until its
//! wall-clock deadline expires, and returns the child with the best
//! empirical win ratio. Nothing carries over between moves.
//!
//! # Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use hex_board::{Board, CellState};
//! use mcts::{MctsAgent, MctsConfig};
//!
//! let mut board = Board::new(3).unwrap();
//! board.make_move(0, 0, CellState::Blue).unwrap();
//! board.make_move(1, 0, CellState::Blue).unwrap();
//!
//! let agent = MctsAgent::new(
//!     MctsConfig::default().with_deadline(Duration::from_millis(200)),
//! )
//! .unwrap();
//! let (row, col) = agent.choose_move(&board, CellState::Blue).unwrap();
//! assert!(board.is_valid_move(row, col));
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls a decision:
//!
//! - `exploration`: constant of the UCT formula (default: 1.41)
//! - `deadline`: wall-clock budget per decision (default: 1 s)
//! - `parallel`: one playout per available core from each selected child
//! - `verbose`: full search trace through the [`SearchLogger`]

pub mod config;
pub mod logger;
pub mod node;
pub mod playout;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use logger::SearchLogger;
pub use node::{Node, NodeId, NodeStats};
pub use playout::simulate_playout;
pub use search::{MctsAgent, SearchError};
pub use tree::{Selection, Tree};
