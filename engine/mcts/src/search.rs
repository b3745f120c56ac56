//! The time-bounded decision loop.
//!
//! Implements the flat search protocol:
//! 1. Expansion: create one child of the root per valid move
//! 2. Selection: pick a root child by UCT score
//! 3. Simulation: one random playout (or one per core in parallel mode)
//! 4. Backpropagation: credit the playout winner to child and root
//!
//! Steps 2-4 repeat until the wall-clock deadline expires; the move with
//! the best empirical win ratio is returned. Only the root is ever
//! expanded: depth beyond one move comes from the random playouts, not
//! from tree growth.

use std::num::NonZeroUsize;
use std::thread;
use std::time::Instant;

use hex_board::{Board, CellState};
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::logger::SearchLogger;
use crate::playout::simulate_playout;
use crate::tree::Tree;

/// Errors surfaced by the decision engine.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Parallel playouts and the verbose trace cannot be combined; the
    /// interleaved output would be unreadable.
    #[error("parallel playouts cannot be combined with verbose logging")]
    IncompatibleConfig,

    /// The decision deadline expired before a single playout completed.
    #[error("the decision deadline expired before a single playout completed; give the engine more time for this board size")]
    NoBudget,
}

/// The Monte Carlo tree search decision engine.
///
/// An agent is cheap to construct and holds only its configuration; each
/// [`choose_move`](MctsAgent::choose_move) call owns a fresh tree that is
/// dropped when the call returns.
pub struct MctsAgent {
    config: MctsConfig,
}

impl MctsAgent {
    /// Create an agent, rejecting contradictory configurations.
    pub fn new(config: MctsConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Choose a move for `player` on `board`.
    ///
    /// The board is only read; the returned coordinate is a valid move on
    /// it. Fails with [`SearchError::NoBudget`] when the deadline expired
    /// before any child collected a visit.
    pub fn choose_move(
        &self,
        board: &Board,
        player: CellState,
    ) -> Result<(usize, usize), SearchError> {
        let logger = SearchLogger::global(self.config.verbose);
        self.run(board, player, logger)
    }

    fn run(
        &self,
        board: &Board,
        player: CellState,
        logger: &SearchLogger,
    ) -> Result<(usize, usize), SearchError> {
        debug!(
            player = %player,
            deadline_ms = self.config.deadline.as_millis() as u64,
            parallel = self.config.parallel,
            "starting search"
        );
        logger.log_mcts_start(player);

        let mut tree = Tree::new(player);
        let root = tree.root();
        for mv in board.valid_moves() {
            tree.add_child(root, mv);
            logger.log_expanded_child(mv);
        }

        let workers = if self.config.parallel { worker_count() } else { 1 };

        let start = Instant::now();
        let deadline = start + self.config.deadline;
        let mut iterations: u64 = 0;

        // The deadline is only polled here, never inside a playout: an
        // iteration that starts just before the deadline runs to completion.
        while Instant::now() < deadline {
            logger.log_iteration(iterations + 1);
            let Some(selection) = tree.select_child(root, self.config.exploration) else {
                break;
            };
            logger.log_selected_child(selection.mv, selection.score);

            let winners = if self.config.parallel {
                parallel_playouts(board, selection.mv, player, workers)
            } else {
                let trace_sink = logger.verbose().then_some(logger);
                vec![simulate_playout(
                    selection.mv,
                    player,
                    board.clone(),
                    &mut rand::thread_rng(),
                    trace_sink,
                )]
            };

            for winner in winners {
                for (mv, stats) in tree.backpropagate(selection.id, winner) {
                    logger.log_backpropagation(mv, stats);
                }
            }

            if logger.verbose() {
                let root_node = tree.get(root);
                logger.log_root_stats(root_node.stats(), root_node.children.len());
                for &child_id in &root_node.children {
                    let child = tree.get(child_id);
                    if let Some(mv) = child.mv {
                        logger.log_child_stats(mv, child.stats());
                    }
                }
            }

            iterations += 1;
        }

        logger.log_timer_ran_out(iterations);
        if logger.verbose() {
            for &child_id in &tree.get(root).children {
                let child = tree.get(child_id);
                if let Some(mv) = child.mv {
                    logger.log_win_ratio(mv, child.stats());
                }
            }
        }

        let (best_mv, win_ratio) = tree.best_move().ok_or(SearchError::NoBudget)?;
        logger.log_best_child(iterations, best_mv, win_ratio);
        logger.log_mcts_end();

        trace!(
            row = best_mv.0,
            col = best_mv.1,
            win_ratio,
            iterations,
            "decision complete"
        );
        Ok(best_mv)
    }
}

/// Number of playout workers per iteration in parallel mode.
fn worker_count() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Fan out one playout per worker from the same selected child, then join.
/// Every worker gets its own board copy and its own thread-local RNG; the
/// winners come back in spawn order so backpropagation order stays
/// deterministic.
fn parallel_playouts(
    board: &Board,
    mv: (usize, usize),
    player: CellState,
    workers: usize,
) -> Vec<CellState> {
    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let board = board.clone();
                scope.spawn(move || {
                    simulate_playout(mv, player, board, &mut rand::thread_rng(), None)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("playout worker panicked"))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl SharedSink {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn quiet_logger() -> SearchLogger {
        SearchLogger::with_sink(false, Box::new(SharedSink::default()))
    }

    /// Board 3 with Blue on (0,0) and (1,0); (2,0) completes the connection.
    fn forced_win_board() -> Board {
        let mut board = Board::new(3).unwrap();
        board.make_move(0, 0, CellState::Blue).unwrap();
        board.make_move(1, 0, CellState::Blue).unwrap();
        board
    }

    #[test]
    fn test_rejects_parallel_verbose_config() {
        let config = MctsConfig::default().with_parallel(true).with_verbose(true);
        assert!(matches!(
            MctsAgent::new(config),
            Err(SearchError::IncompatibleConfig)
        ));
    }

    #[test]
    fn test_finds_forced_win() {
        let board = forced_win_board();
        let agent = MctsAgent::new(
            MctsConfig::default().with_deadline(Duration::from_secs(1)),
        )
        .unwrap();

        let mv = agent
            .run(&board, CellState::Blue, &quiet_logger())
            .unwrap();
        assert_eq!(mv, (2, 0), "the unique winning completion must be chosen");
    }

    #[test]
    fn test_forced_win_has_perfect_ratio() {
        // Every playout from (2,0) ends immediately with a Blue win, so the
        // chosen child's win ratio at decision time is exactly 1.0.
        let board = forced_win_board();
        let sink = SharedSink::default();
        let logger = SearchLogger::with_sink(true, Box::new(sink.clone()));
        let agent = MctsAgent::new(
            MctsConfig::default()
                .with_deadline(Duration::from_millis(150))
                .with_verbose(true),
        )
        .unwrap();

        let mv = agent.run(&board, CellState::Blue, &logger).unwrap();
        assert_eq!(mv, (2, 0));
        assert!(
            sink.contents()
                .contains("choose child 2, 0 with win ratio 1.0000"),
            "trace should report a perfect win ratio"
        );
    }

    #[test]
    fn test_no_budget_when_deadline_already_expired() {
        let board = Board::new(3).unwrap();
        let agent =
            MctsAgent::new(MctsConfig::default().with_deadline(Duration::ZERO)).unwrap();

        assert!(matches!(
            agent.run(&board, CellState::Blue, &quiet_logger()),
            Err(SearchError::NoBudget)
        ));
    }

    #[test]
    fn test_chosen_move_is_valid_and_board_untouched() {
        let mut board = Board::new(5).unwrap();
        board.make_move(2, 2, CellState::Red).unwrap();
        let snapshot = board.clone();

        let agent = MctsAgent::new(
            MctsConfig::default().with_deadline(Duration::from_millis(150)),
        )
        .unwrap();
        let (row, col) = agent
            .run(&board, CellState::Blue, &quiet_logger())
            .unwrap();

        assert!(board.is_valid_move(row, col));
        assert_eq!(board, snapshot, "the engine must not mutate the live board");
    }

    #[test]
    fn test_parallel_mode_finds_forced_win() {
        let board = forced_win_board();
        let agent = MctsAgent::new(
            MctsConfig::default()
                .with_deadline(Duration::from_millis(500))
                .with_parallel(true),
        )
        .unwrap();

        let mv = agent
            .run(&board, CellState::Blue, &quiet_logger())
            .unwrap();
        assert_eq!(mv, (2, 0));
    }

    #[test]
    fn test_serial_and_parallel_backprop_agree_for_same_streams() {
        // With identical seeded RNG streams, N serial playouts and N joined
        // worker playouts must leave identical root statistics.
        let board = forced_win_board();
        let mv = (2, 1);
        let seeds: Vec<u64> = (0..8).collect();

        let mut serial = Tree::new(CellState::Blue);
        let serial_child = serial.add_child(serial.root(), mv);
        for &seed in &seeds {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let winner =
                simulate_playout(mv, CellState::Blue, board.clone(), &mut rng, None);
            serial.backpropagate(serial_child, winner);
        }

        let mut parallel = Tree::new(CellState::Blue);
        let parallel_child = parallel.add_child(parallel.root(), mv);
        let winners: Vec<CellState> = thread::scope(|scope| {
            let handles: Vec<_> = seeds
                .iter()
                .map(|&seed| {
                    let board = board.clone();
                    scope.spawn(move || {
                        let mut rng = ChaCha20Rng::seed_from_u64(seed);
                        simulate_playout(mv, CellState::Blue, board, &mut rng, None)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for winner in winners {
            parallel.backpropagate(parallel_child, winner);
        }

        assert_eq!(
            serial.get(serial.root()).stats(),
            parallel.get(parallel.root()).stats()
        );
        assert_eq!(
            serial.get(serial_child).stats(),
            parallel.get(parallel_child).stats()
        );
    }

    #[test]
    fn test_visits_accumulate_across_iterations() {
        // Even with a short budget the root should collect several visits
        // on a tiny board; every child visit is mirrored in the root.
        let board = Board::new(2).unwrap();
        let sink = SharedSink::default();
        let logger = SearchLogger::with_sink(true, Box::new(sink.clone()));
        let agent = MctsAgent::new(
            MctsConfig::default()
                .with_deadline(Duration::from_millis(25))
                .with_verbose(true),
        )
        .unwrap();

        agent.run(&board, CellState::Red, &logger).unwrap();
        let contents = sink.contents();
        assert!(contents.contains("AFTER BACKPROPAGATION, root node has"));
        assert!(contents.contains("TIMER RAN OUT."));
    }
}
