//! Thread-serialized trace logging for the search engine.
//!
//! The logger is a process-wide singleton whose verbosity is fixed by the
//! first caller. Every message goes through one mutex-guarded sink, so
//! multi-line board snapshots never interleave even when several threads
//! log. In verbose mode it narrates every stage of a decision; otherwise it
//! prints a single "Thinking silently..." line per decision and nothing
//! else. Write failures are swallowed: logging must never abort a decision.

use std::io::{self, Write};
use std::sync::Mutex;

use hex_board::{Board, CellState};
use once_cell::sync::OnceCell;

use crate::node::NodeStats;

static GLOBAL_LOGGER: OnceCell<SearchLogger> = OnceCell::new();

/// Trace logger for the search engine.
pub struct SearchLogger {
    verbose: bool,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl SearchLogger {
    /// The process-wide logger, created on first use. The first call fixes
    /// the verbosity for the life of the process; later calls return the
    /// existing instance and ignore the argument.
    pub fn global(verbose: bool) -> &'static SearchLogger {
        GLOBAL_LOGGER.get_or_init(|| SearchLogger::with_sink(verbose, Box::new(io::stdout())))
    }

    /// A standalone logger writing to `sink`. Lets tests capture the trace
    /// without touching the global instance.
    pub fn with_sink(verbose: bool, sink: Box<dyn Write + Send>) -> Self {
        Self {
            verbose,
            sink: Mutex::new(sink),
        }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    fn write(&self, message: &str, always: bool) {
        if self.verbose || always {
            let Ok(mut sink) = self.sink.lock() else {
                return;
            };
            let _ = writeln!(sink, "{message}");
        }
    }

    pub fn log_mcts_start(&self, player: CellState) {
        if self.verbose {
            self.write(
                &format!("\n-------------MCTS VERBOSE START - {player} to move-------------\n"),
                false,
            );
        } else {
            self.write("Thinking silently...", true);
        }
    }

    pub fn log_iteration(&self, iteration: u64) {
        self.write(
            &format!("\n------------------STARTING SIMULATION {iteration}------------------\n"),
            false,
        );
    }

    pub fn log_expanded_child(&self, mv: (usize, usize)) {
        self.write(&format!("EXPANDED CHILD {}, {}", mv.0, mv.1), false);
    }

    pub fn log_selected_child(&self, mv: (usize, usize), score: f64) {
        self.write(
            &format!(
                "SELECTED CHILD {}, {} with UCT of {}",
                mv.0,
                mv.1,
                score_label(score)
            ),
            false,
        );
    }

    pub fn log_simulation_start(&self, mv: (usize, usize), board: &Board) {
        if !self.verbose {
            return;
        }
        self.write(
            &format!(
                "\nSIMULATING A RANDOM PLAYOUT from node {}, {}. Simulation board is in state:\n{board}",
                mv.0, mv.1
            ),
            false,
        );
    }

    pub fn log_simulation_step(&self, player: CellState, board: &Board, mv: (usize, usize)) {
        if !self.verbose {
            return;
        }
        self.write(
            &format!(
                "Current player in simulation is {player} in Board state:\n{board}{player} makes random move {},{}. ",
                mv.0, mv.1
            ),
            false,
        );
    }

    pub fn log_simulation_end(&self, winner: CellState, board: &Board) {
        if !self.verbose {
            return;
        }
        self.write(
            &format!("DETECTED WIN for player {winner} in Board state:\n{board}"),
            false,
        );
    }

    pub fn log_backpropagation(&self, mv: Option<(usize, usize)>, stats: NodeStats) {
        let target = match mv {
            Some((row, col)) => format!("node {row}, {col}"),
            None => "the root".to_string(),
        };
        self.write(
            &format!(
                "BACKPROPAGATED result to {target}. It currently has {} wins and {} visits.",
                stats.win_count, stats.visit_count
            ),
            false,
        );
    }

    pub fn log_root_stats(&self, stats: NodeStats, child_count: usize) {
        self.write(
            &format!(
                "\nAFTER BACKPROPAGATION, root node has {} visits, {} wins, and {child_count} child nodes. Their details are:\n",
                stats.visit_count, stats.win_count
            ),
            false,
        );
    }

    pub fn log_child_stats(&self, mv: (usize, usize), stats: NodeStats) {
        self.write(
            &format!(
                "Child node {},{}: Wins: {}, Visits: {}. Win ratio: {}",
                mv.0,
                mv.1,
                stats.win_count,
                stats.visit_count,
                ratio_label(stats)
            ),
            false,
        );
    }

    pub fn log_timer_ran_out(&self, iterations: u64) {
        self.write(
            &format!(
                "\nTIMER RAN OUT. {iterations} iterations completed. CHOOSING A MOVE FROM ROOT'S CHILDREN:\n"
            ),
            false,
        );
    }

    pub fn log_win_ratio(&self, mv: (usize, usize), stats: NodeStats) {
        self.write(
            &format!(
                "Child {},{} has a win ratio of {}",
                mv.0,
                mv.1,
                ratio_label(stats)
            ),
            false,
        );
    }

    pub fn log_best_child(&self, iterations: u64, mv: (usize, usize), win_ratio: f64) {
        self.write(
            &format!(
                "\nAfter {iterations} iterations, choose child {}, {} with win ratio {win_ratio:.4}",
                mv.0, mv.1
            ),
            false,
        );
    }

    pub fn log_mcts_end(&self) {
        self.write(
            "\n--------------------MCTS VERBOSE END--------------------\n",
            false,
        );
    }
}

fn score_label(score: f64) -> String {
    if score.is_infinite() {
        "infinity".to_string()
    } else {
        format!("{score:.4}")
    }
}

fn ratio_label(stats: NodeStats) -> String {
    if stats.visit_count > 0 {
        format!(
            "{:.2}",
            stats.win_count as f64 / stats.visit_count as f64
        )
    } else {
        "N/A (no visits yet)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Sink that keeps everything written to it readable by the test.
    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl SharedSink {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(verbose: bool) -> (SearchLogger, SharedSink) {
        let sink = SharedSink::default();
        let logger = SearchLogger::with_sink(verbose, Box::new(sink.clone()));
        (logger, sink)
    }

    fn stats(wins: u64, visits: u64) -> NodeStats {
        NodeStats {
            win_count: wins,
            visit_count: visits,
        }
    }

    #[test]
    fn test_silent_mode_emits_single_line() {
        let (logger, sink) = capture(false);

        logger.log_mcts_start(CellState::Blue);
        logger.log_iteration(1);
        logger.log_expanded_child((0, 0));
        logger.log_selected_child((0, 0), f64::INFINITY);
        logger.log_backpropagation(Some((0, 0)), stats(1, 1));
        logger.log_timer_ran_out(12);
        logger.log_best_child(12, (0, 0), 1.0);
        logger.log_mcts_end();

        assert_eq!(sink.contents(), "Thinking silently...\n");
    }

    #[test]
    fn test_verbose_banner_names_player() {
        let (logger, sink) = capture(true);
        logger.log_mcts_start(CellState::Red);
        assert_eq!(
            sink.contents(),
            "\n-------------MCTS VERBOSE START - R to move-------------\n\n"
        );
    }

    #[test]
    fn test_infinite_uct_prints_infinity() {
        let (logger, sink) = capture(true);
        logger.log_selected_child((2, 1), f64::INFINITY);
        assert_eq!(
            sink.contents(),
            "SELECTED CHILD 2, 1 with UCT of infinity\n"
        );
    }

    #[test]
    fn test_finite_uct_is_formatted() {
        let (logger, sink) = capture(true);
        logger.log_selected_child((0, 2), 1.5);
        assert_eq!(sink.contents(), "SELECTED CHILD 0, 2 with UCT of 1.5000\n");
    }

    #[test]
    fn test_child_stats_without_visits() {
        let (logger, sink) = capture(true);
        logger.log_child_stats((1, 1), stats(0, 0));
        assert_eq!(
            sink.contents(),
            "Child node 1,1: Wins: 0, Visits: 0. Win ratio: N/A (no visits yet)\n"
        );
    }

    #[test]
    fn test_child_stats_with_visits() {
        let (logger, sink) = capture(true);
        logger.log_child_stats((1, 2), stats(3, 4));
        assert_eq!(
            sink.contents(),
            "Child node 1,2: Wins: 3, Visits: 4. Win ratio: 0.75\n"
        );
    }

    #[test]
    fn test_backpropagation_to_root() {
        let (logger, sink) = capture(true);
        logger.log_backpropagation(None, stats(2, 5));
        assert_eq!(
            sink.contents(),
            "BACKPROPAGATED result to the root. It currently has 2 wins and 5 visits.\n"
        );
    }

    #[test]
    fn test_board_snapshot_is_embedded() {
        let (logger, sink) = capture(true);
        let board = Board::new(2).unwrap();
        logger.log_simulation_start((0, 1), &board);

        let contents = sink.contents();
        assert!(contents.starts_with("\nSIMULATING A RANDOM PLAYOUT from node 0, 1."));
        assert!(contents.contains(". - . 1\n"), "snapshot missing: {contents}");
    }

    #[test]
    fn test_global_logger_fixes_verbosity_on_first_use() {
        let first = SearchLogger::global(false);
        assert!(!first.verbose());

        // Later calls ignore the requested verbosity
        let second = SearchLogger::global(true);
        assert!(!second.verbose());
        assert!(std::ptr::eq(first, second));
    }
}
