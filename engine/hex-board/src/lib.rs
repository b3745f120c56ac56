//! Hex board primitives for the engine workspace.
//!
//! This crate owns the game substrate: the three-valued cell state, the
//! board with its move validation and winner detection, and the parsing of
//! the human move notation. The search engine consumes boards read-only and
//! works on private copies, so everything here is cheap to clone.

pub mod board;
pub mod cell;
pub mod coords;

// Re-export main types for convenience
pub use board::{Board, BoardError, NEIGHBOR_OFFSETS};
pub use cell::CellState;
pub use coords::parse_coord;
