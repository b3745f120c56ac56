//! Search tree node representation.
//!
//! Each node records the move that produced it and the statistics gathered
//! by playouts through it. The counters sit behind a per-node mutex so a
//! node can be updated without exclusive access to the whole tree.

use std::sync::Mutex;

use hex_board::CellState;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// Aggregated playout statistics, guarded by the owning node's mutex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Playouts through this node won by the node's player.
    pub win_count: u64,

    /// Playouts backpropagated through this node.
    pub visit_count: u64,
}

/// A node in the search tree.
///
/// `player` is the side whose move produced this node. In the flat search
/// every root child carries the root's own player, and backpropagation
/// credits a win to each node whose player matches the playout winner.
#[derive(Debug)]
pub struct Node {
    /// Parent node index (`NONE` for the root).
    pub parent: NodeId,

    /// Move that led to this node; `None` for the root sentinel.
    pub mv: Option<(usize, usize)>,

    pub player: CellState,

    /// Children in the order they were added (row-major for the root).
    pub children: Vec<NodeId>,

    stats: Mutex<NodeStats>,
}

impl Node {
    /// Create the root node for a decision by `player`.
    pub fn new_root(player: CellState) -> Self {
        Self {
            parent: NodeId::NONE,
            mv: None,
            player,
            children: Vec::new(),
            stats: Mutex::new(NodeStats::default()),
        }
    }

    /// Create a child reached by `player` playing `mv`.
    pub fn new_child(parent: NodeId, player: CellState, mv: (usize, usize)) -> Self {
        Self {
            parent,
            mv: Some(mv),
            player,
            children: Vec::new(),
            stats: Mutex::new(NodeStats::default()),
        }
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> NodeStats {
        *self.stats.lock().unwrap()
    }

    /// Record one playout outcome. The lock covers both increments, so the
    /// pair is always updated atomically.
    pub fn record_playout(&self, won: bool) -> NodeStats {
        let mut stats = self.stats.lock().unwrap();
        stats.visit_count += 1;
        if won {
            stats.win_count += 1;
        }
        *stats
    }

    /// Empirical win ratio, `None` while the node is unvisited.
    pub fn win_ratio(&self) -> Option<f64> {
        let stats = self.stats();
        (stats.visit_count > 0).then(|| stats.win_count as f64 / stats.visit_count as f64)
    }

    /// UCT score of this node as a child of a parent with `parent_visits`
    /// visits. Unvisited nodes score infinite so every child gets explored
    /// at least once.
    pub fn uct_score(&self, parent_visits: u64, exploration: f64) -> f64 {
        let stats = self.stats();
        if stats.visit_count == 0 {
            return f64::INFINITY;
        }
        let exploitation = stats.win_count as f64 / stats.visit_count as f64;
        let bonus =
            exploration * ((parent_visits as f64).ln() / stats.visit_count as f64).sqrt();
        exploitation + bonus
    }
}
