//! Random playout simulation.
//!
//! A playout takes a private copy of the live board, applies the selected
//! child's move, then lets both sides place uniformly random stones until
//! someone completes a connection. Hex cannot draw, so the loop always
//! terminates with a winner, at the latest on a full board.

use hex_board::{Board, CellState};
use rand::Rng;

use crate::logger::SearchLogger;

/// Play `mv` as `player` on `board` and complete the game with uniformly
/// random moves. Returns the winning player.
///
/// The RNG is injected so callers control determinism: tests pass a seeded
/// generator, the serial engine path its thread-local one, and each parallel
/// worker its own. `trace` narrates the playout in verbose mode and must be
/// `None` on worker threads.
///
/// Playout moves are drawn from `valid_moves()`, so a rejected move here is
/// a programming error, not a recoverable condition.
pub fn simulate_playout<R: Rng>(
    mv: (usize, usize),
    player: CellState,
    mut board: Board,
    rng: &mut R,
    trace: Option<&SearchLogger>,
) -> CellState {
    board
        .make_move(mv.0, mv.1, player)
        .expect("playout starts from a move drawn from valid_moves");
    if let Some(logger) = trace {
        logger.log_simulation_start(mv, &board);
    }

    let mut current = player;
    while board.winner() == CellState::Empty {
        current = current.opponent();

        let moves = board.valid_moves();
        let (row, col) = moves[rng.gen_range(0..moves.len())];
        if let Some(logger) = trace {
            logger.log_simulation_step(current, &board, (row, col));
        }
        board
            .make_move(row, col, current)
            .expect("playout moves are drawn from valid_moves");

        if board.winner() != CellState::Empty {
            if let Some(logger) = trace {
                logger.log_simulation_end(current, &board);
            }
            break;
        }
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_playout_always_produces_a_winner() {
        for seed in 0..50 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let board = Board::new(5).unwrap();
            let winner = simulate_playout((0, 0), CellState::Blue, board, &mut rng, None);
            assert_ne!(winner, CellState::Empty, "seed {seed} produced no winner");
        }
    }

    #[test]
    fn test_playout_is_deterministic_for_a_seed() {
        let board = Board::new(5).unwrap();
        let mut first = ChaCha20Rng::seed_from_u64(99);
        let mut second = ChaCha20Rng::seed_from_u64(99);

        let winner_a =
            simulate_playout((2, 2), CellState::Red, board.clone(), &mut first, None);
        let winner_b = simulate_playout((2, 2), CellState::Red, board, &mut second, None);
        assert_eq!(winner_a, winner_b);
    }

    #[test]
    fn test_winning_move_ends_playout_immediately() {
        // Blue already holds (0,0) and (1,0); playing (2,0) completes the
        // connection, so the playout returns Blue without random moves.
        let mut board = Board::new(3).unwrap();
        board.make_move(0, 0, CellState::Blue).unwrap();
        board.make_move(1, 0, CellState::Blue).unwrap();

        for seed in 0..10 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let winner =
                simulate_playout((2, 0), CellState::Blue, board.clone(), &mut rng, None);
            assert_eq!(winner, CellState::Blue);
        }
    }
}
