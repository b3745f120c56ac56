//! Engine configuration parameters.

use std::time::Duration;

use crate::search::SearchError;

/// Configuration for one Monte Carlo tree search decision.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Exploration constant *c* in the UCT formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    /// The surrounding UI keeps this within [0.1, 2.0].
    pub exploration: f64,

    /// Wall-clock budget per decision. Polled between iterations, so a
    /// playout started just before the deadline may overrun it slightly.
    /// The surrounding UI enforces a minimum of 100 ms.
    pub deadline: Duration,

    /// Run one playout per available core from each selected child instead
    /// of a single playout per iteration.
    pub parallel: bool,

    /// Emit the full search trace through the logger.
    pub verbose: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: 1.41,
            deadline: Duration::from_secs(1),
            parallel: false,
            verbose: false,
        }
    }
}

impl MctsConfig {
    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Builder pattern: set the decision deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Builder pattern: enable or disable parallel playouts.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builder pattern: enable or disable the verbose trace.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the configuration for contradictions. Parallel playouts and
    /// the verbose trace cannot be combined: the interleaved multi-line
    /// output would be unreadable.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.parallel && self.verbose {
            return Err(SearchError::IncompatibleConfig);
        }
        Ok(())
    }
}
