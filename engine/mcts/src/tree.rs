//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous `Vec` and refer to each other through
//! [`NodeId`] indices, so parent back-edges carry no ownership. The arena is
//! owned by a single decision and dropped when the decision returns.

use hex_board::CellState;

use crate::node::{Node, NodeId, NodeStats};

/// A child picked by UCT selection.
#[derive(Debug, Clone, Copy)]
pub struct Selection {
    pub id: NodeId,
    pub mv: (usize, usize),
    /// The winning UCT score; infinite while the child is unvisited.
    pub score: f64,
}

/// Search tree with arena-based node storage.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a tree holding only a root for a decision by `player`.
    pub fn new(player: CellState) -> Self {
        Self {
            nodes: vec![Node::new_root(player)],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// Total number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a child under `parent` for `mv`. The child carries the parent's
    /// player: in the flat search a child stands for "the root's player
    /// moves here", not for the opponent's reply position.
    pub fn add_child(&mut self, parent: NodeId, mv: (usize, usize)) -> NodeId {
        let player = self.get(parent).player;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new_child(parent, player, mv));
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    /// Pick the child of `parent` with the highest UCT score. Ties keep the
    /// first child encountered, which for the root equals the row-major
    /// expansion order.
    pub fn select_child(&self, parent: NodeId, exploration: f64) -> Option<Selection> {
        let node = self.get(parent);
        let parent_visits = node.stats().visit_count;

        let mut best: Option<Selection> = None;
        for &child_id in &node.children {
            let child = self.get(child_id);
            let Some(mv) = child.mv else { continue };
            let score = child.uct_score(parent_visits, exploration);
            if best.map_or(true, |b| score > b.score) {
                best = Some(Selection {
                    id: child_id,
                    mv,
                    score,
                });
            }
        }
        best
    }

    /// Walk from `start` to the root, crediting the playout to each node
    /// whose player matches `winner`. Returns the updated nodes in walk
    /// order for the caller's trace.
    pub fn backpropagate(
        &self,
        start: NodeId,
        winner: CellState,
    ) -> Vec<(Option<(usize, usize)>, NodeStats)> {
        let mut updates = Vec::new();
        let mut current = start;
        while current.is_some() {
            let node = self.get(current);
            let stats = node.record_playout(winner == node.player);
            updates.push((node.mv, stats));
            current = node.parent;
        }
        updates
    }

    /// The root child with the highest empirical win ratio, with its ratio.
    /// Unvisited children are skipped; ties keep the first child in
    /// expansion order. `None` when no child has been visited.
    pub fn best_move(&self) -> Option<((usize, usize), f64)> {
        let root = self.get(self.root);
        let mut best: Option<((usize, usize), f64)> = None;
        for &child_id in &root.children {
            let child = self.get(child_id);
            let Some(mv) = child.mv else { continue };
            let Some(ratio) = child.win_ratio() else {
                continue;
            };
            if best.map_or(true, |(_, r)| ratio > r) {
                best = Some((mv, ratio));
            }
        }
        best
    }
}
