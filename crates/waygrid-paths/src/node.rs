//! Per-search node bookkeeping.
//!
//! Nodes live in a [`NodeArena`] and refer to their parent by [`NodeId`]
//! handle, so an entire search is released with a single
//! [`clear`](NodeArena::clear).

use rustc_hash::FxHashMap;
use waygrid_core::Cell;

/// Handle of a [`SearchNode`] inside its [`NodeArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Frontier membership of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeState {
    Open,
    Closed,
}

/// Cost and parent record for one cell during one search.
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub cell: Cell,
    /// Movement cost from the start.
    pub g: i32,
    /// Heuristic estimate to the goal.
    pub h: i32,
    /// `g + h`.
    pub f: i32,
    pub parent: Option<NodeId>,
    pub state: NodeState,
}

impl SearchNode {
    fn new(cell: Cell) -> Self {
        Self {
            cell,
            g: 0,
            h: 0,
            f: 0,
            parent: None,
            state: NodeState::Open,
        }
    }

    /// Set movement and heuristic costs, keeping `f = g + h`.
    #[inline]
    pub fn set_costs(&mut self, g: i32, h: i32) {
        self.g = g;
        self.h = h;
        self.f = g + h;
    }
}

/// Growable arena of [`SearchNode`]s with a cell lookup table.
#[derive(Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
    table: FxHashMap<Cell, NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// The node for `cell`, creating it on first touch.
    ///
    /// The boolean is `true` when the node was just created.
    pub fn get_or_insert(&mut self, cell: Cell) -> (NodeId, bool) {
        if let Some(&id) = self.table.get(&cell) {
            return (id, false);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(SearchNode::new(cell));
        self.table.insert(cell, id);
        (id, true)
    }

    #[inline]
    pub fn lookup(&self, cell: Cell) -> Option<NodeId> {
        self.table.get(&cell).copied()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node. Capacity is kept for the next search.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.table.clear();
    }

    /// Cells from the root of `id`'s parent chain to `id`, in that order.
    pub fn path_to(&self, id: NodeId) -> Vec<Cell> {
        let mut path = Vec::new();
        let mut cur = Some(id);
        while let Some(ci) = cur {
            // A parent chain can never be longer than the arena.
            if path.len() > self.nodes.len() {
                log::error!("parent cycle detected while rebuilding path");
                break;
            }
            let node = &self.nodes[ci.0];
            path.push(node.cell);
            cur = node.parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lazily_creates_nodes_once() {
        let mut arena = NodeArena::new();
        let (a, created) = arena.get_or_insert(Cell::new(1, 1));
        assert!(created);
        let (b, created) = arena.get_or_insert(Cell::new(1, 1));
        assert!(!created);
        assert_eq!(a, b);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.lookup(Cell::new(1, 1)), Some(a));
        assert_eq!(arena.lookup(Cell::new(0, 0)), None);
    }

    #[test]
    fn set_costs_keeps_total() {
        let mut arena = NodeArena::new();
        let (id, _) = arena.get_or_insert(Cell::new(0, 0));
        arena.node_mut(id).set_costs(24, 30);
        let n = arena.node(id);
        assert_eq!((n.g, n.h, n.f), (24, 30, 54));
    }

    #[test]
    fn path_follows_parents() {
        let mut arena = NodeArena::new();
        let (a, _) = arena.get_or_insert(Cell::new(0, 0));
        let (b, _) = arena.get_or_insert(Cell::new(0, 1));
        let (c, _) = arena.get_or_insert(Cell::new(1, 2));
        arena.node_mut(b).parent = Some(a);
        arena.node_mut(c).parent = Some(b);
        assert_eq!(
            arena.path_to(c),
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 2)]
        );
        assert_eq!(arena.path_to(a), vec![Cell::new(0, 0)]);
    }

    #[test]
    fn clear_releases_everything() {
        let mut arena = NodeArena::new();
        arena.get_or_insert(Cell::new(0, 0));
        arena.get_or_insert(Cell::new(0, 1));
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.lookup(Cell::new(0, 0)), None);
    }
}
