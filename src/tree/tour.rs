//! Euler 序构造：显式工作栈上的深度优先遍历。
//!
//! 进入结点与从子树返回结点都会追加一条记录，因此 `n` 个结点的树得到长度
//! `2n - 1` 的序列，相邻深度恰好相差 1。栈帧为 `(node, parent, cursor)`，
//! 遍历深度不受调用栈限制，并可通过 [`TourBuilder::step`] 单步推进。
use serde::Serialize;

use crate::tree::adjacency::{Adjacency, InvalidTreeError, check_node_count};
use crate::tree::ids::NodeId;
use crate::tree::index_vec::{Idx, IndexVec};

const UNSET: u32 = u32::MAX;

/// One traversal event, as appended to the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourStep {
    Enter { node: NodeId, depth: u32 },
    Return { node: NodeId, depth: u32 },
}

impl TourStep {
    pub fn node(self) -> NodeId {
        match self {
            TourStep::Enter { node, .. } | TourStep::Return { node, .. } => node,
        }
    }

    pub fn depth(self) -> u32 {
        match self {
            TourStep::Enter { depth, .. } | TourStep::Return { depth, .. } => depth,
        }
    }
}

/// Euler tour of a rooted tree together with its per-node lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EulerTour {
    root: Option<NodeId>,
    nodes: Vec<NodeId>,
    depths: Vec<u32>,
    first: IndexVec<NodeId, u32>,
    last: IndexVec<NodeId, u32>,
    parent: IndexVec<NodeId, Option<NodeId>>,
}

impl EulerTour {
    fn with_capacity(node_count: usize, root: Option<NodeId>) -> Self {
        let tour_len = (2 * node_count).saturating_sub(1);
        Self {
            root,
            nodes: Vec::with_capacity(tour_len),
            depths: Vec::with_capacity(tour_len),
            first: IndexVec::from_elem(UNSET, node_count),
            last: IndexVec::from_elem(UNSET, node_count),
            parent: IndexVec::from_elem(None, node_count),
        }
    }

    /// Runs a [`TourBuilder`] to completion.
    pub fn build(adjacency: &Adjacency, root: NodeId) -> Result<Self, InvalidTreeError> {
        TourBuilder::new(adjacency, root)?.build()
    }

    fn record(&mut self, node: NodeId, depth: u32) {
        let position = self.nodes.len() as u32;
        if self.first[node] == UNSET {
            self.first[node] = position;
        }
        self.last[node] = position;
        self.nodes.push(node);
        self.depths.push(depth);
    }

    /// `None` only for the empty tree.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of tour positions.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of tree nodes.
    pub fn node_count(&self) -> usize {
        self.first.len()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn depths(&self) -> &[u32] {
        &self.depths
    }

    pub fn first_occurrence(&self, node: NodeId) -> Option<usize> {
        self.first.get(node).map(|&idx| idx as usize)
    }

    pub fn last_occurrence(&self, node: NodeId) -> Option<usize> {
        self.last.get(node).map(|&idx| idx as usize)
    }

    /// Parent of `node`; `None` for the root and for unknown ids.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent.get(node).copied().flatten()
    }

    pub fn depth(&self, node: NodeId) -> Option<u32> {
        self.first_occurrence(node).map(|idx| self.depths[idx])
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    parent: Option<NodeId>,
    cursor: usize,
}

/// Step-wise Euler tour traversal over an [`Adjacency`].
pub struct TourBuilder<'a> {
    adjacency: &'a Adjacency,
    stack: Vec<Frame>,
    tour: EulerTour,
    reached: usize,
    started: bool,
    failure: Option<InvalidTreeError>,
}

impl<'a> TourBuilder<'a> {
    pub fn new(adjacency: &'a Adjacency, root: NodeId) -> Result<Self, InvalidTreeError> {
        let nodes = adjacency.len();
        check_node_count(nodes)?;
        let root = if nodes == 0 {
            None
        } else if adjacency.contains(root) {
            Some(root)
        } else {
            return Err(InvalidTreeError::RootOutOfBounds { root, nodes });
        };

        Ok(Self {
            adjacency,
            stack: Vec::new(),
            tour: EulerTour::with_capacity(nodes, root),
            reached: 0,
            started: false,
            failure: None,
        })
    }

    /// The tour recorded so far.
    pub fn tour(&self) -> &EulerTour {
        &self.tour
    }

    /// Advances the traversal by one appended position. `Ok(None)` once the
    /// root has been closed; a detected cycle is returned again on every
    /// later call.
    pub fn step(&mut self) -> Result<Option<TourStep>, InvalidTreeError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        if !self.started {
            self.started = true;
            let Some(root) = self.tour.root else {
                return Ok(None);
            };
            return Ok(Some(self.enter(root, None)));
        }

        let adjacency = self.adjacency;
        let Some(top) = self.stack.last_mut() else {
            return Ok(None);
        };
        let node = top.node;
        let neighbors = adjacency.neighbors(node);

        while top.cursor < neighbors.len() {
            let next = neighbors[top.cursor];
            top.cursor += 1;
            if Some(next) == top.parent {
                continue;
            }
            if self.tour.first[next] != UNSET {
                let err = InvalidTreeError::Cycle {
                    from: node,
                    to: next,
                };
                self.stack.clear();
                self.failure = Some(err.clone());
                return Err(err);
            }
            return Ok(Some(self.enter(next, Some(node))));
        }

        self.stack.pop();
        let Some(parent) = self.stack.last() else {
            return Ok(None);
        };
        let (node, depth) = (parent.node, (self.stack.len() - 1) as u32);
        self.tour.record(node, depth);
        log::trace!("euler tour: return to {:?} at depth {}", node, depth);
        Ok(Some(TourStep::Return { node, depth }))
    }

    fn enter(&mut self, node: NodeId, parent: Option<NodeId>) -> TourStep {
        let depth = self.stack.len() as u32;
        self.stack.push(Frame {
            node,
            parent,
            cursor: 0,
        });
        self.tour.parent[node] = parent;
        self.tour.record(node, depth);
        self.reached += 1;
        log::trace!("euler tour: enter {:?} at depth {}", node, depth);
        TourStep::Enter { node, depth }
    }

    /// Drives [`Self::step`] to completion and checks that every node was reached.
    pub fn build(mut self) -> Result<EulerTour, InvalidTreeError> {
        while self.step()?.is_some() {}

        let nodes = self.adjacency.len();
        if self.reached < nodes {
            let node = self
                .tour
                .first
                .iter_enumerated()
                .find(|(_, first)| **first == UNSET)
                .map(|(node, _)| node)
                .unwrap_or(NodeId::from_usize(nodes));
            return Err(InvalidTreeError::Unreachable {
                node,
                reached: self.reached,
                nodes,
            });
        }

        debug_assert_eq!(self.tour.len(), (2 * nodes).saturating_sub(1));
        Ok(self.tour)
    }
}
