//! LCA 索引门面：一次性构造 Euler 序与稀疏表，此后只读查询。
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;

use crate::tree::adjacency::{Adjacency, InvalidTreeError};
use crate::tree::ids::NodeId;
use crate::tree::sparse_table::{RmqError, SparseTable};
use crate::tree::tour::EulerTour;

/// Batches at least this long are answered on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LcaError {
    #[error("invalid tree: {0}")]
    InvalidTree(#[from] InvalidTreeError),
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error(transparent)]
    Rmq(#[from] RmqError),
}

#[derive(Debug, Clone)]
pub struct LcaIndex {
    tour: EulerTour,
    table: SparseTable,
    parallel_threshold: usize,
}

impl LcaIndex {
    /// Roots `adjacency` at `root` and preprocesses it. `root` is ignored for
    /// an empty tree.
    pub fn new(adjacency: &Adjacency, root: NodeId) -> Result<Self, LcaError> {
        let tour = EulerTour::build(adjacency, root).inspect_err(|err| {
            log::warn!("rejecting tree of {} nodes: {}", adjacency.len(), err);
        })?;
        let table = SparseTable::build(tour.depths());
        log::debug!(
            "lca index ready: {} nodes, tour length {}, {} sparse table levels",
            tour.node_count(),
            tour.len(),
            table.levels()
        );
        Ok(Self {
            tour,
            table,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// [`Self::new`] rooted at node `0`.
    pub fn build(adjacency: &Adjacency) -> Result<Self, LcaError> {
        Self::new(adjacency, NodeId::ROOT)
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn first(&self, node: NodeId) -> Result<usize, LcaError> {
        self.tour
            .first_occurrence(node)
            .ok_or(LcaError::UnknownNode(node))
    }

    /// Lowest common ancestor of `u` and `v`.
    pub fn query(&self, u: NodeId, v: NodeId) -> Result<NodeId, LcaError> {
        let position = self.query_position(u, v)?;
        Ok(self.tour.nodes()[position])
    }

    /// Tour position whose node answers `query(u, v)`: the leftmost minimum
    /// depth between the first occurrences of `u` and `v`.
    pub fn query_position(&self, u: NodeId, v: NodeId) -> Result<usize, LcaError> {
        let (fu, fv) = (self.first(u)?, self.first(v)?);
        let (lo, hi) = if fu <= fv { (fu, fv) } else { (fv, fu) };
        Ok(self.table.query_min_index(self.tour.depths(), lo, hi)?)
    }

    /// Answers every pair, keeping input order. Long batches run in parallel.
    pub fn query_batch(&self, pairs: &[(NodeId, NodeId)]) -> Vec<Result<NodeId, LcaError>> {
        if pairs.len() >= self.parallel_threshold {
            log::debug!("answering {} lca queries in parallel", pairs.len());
            pairs.par_iter().map(|&(u, v)| self.query(u, v)).collect()
        } else {
            pairs.iter().map(|&(u, v)| self.query(u, v)).collect()
        }
    }

    /// Whether `ancestor` lies on the path from the root to `node`, inclusive.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> Result<bool, LcaError> {
        let (a_first, n_first) = (self.first(ancestor)?, self.first(node)?);
        let a_last = self.tour.last_occurrence(ancestor).unwrap_or(a_first);
        let n_last = self.tour.last_occurrence(node).unwrap_or(n_first);
        Ok(a_first <= n_first && n_last <= a_last)
    }

    pub fn depth(&self, node: NodeId) -> Result<u32, LcaError> {
        self.tour.depth(node).ok_or(LcaError::UnknownNode(node))
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>, LcaError> {
        self.first(node)?;
        Ok(self.tour.parent(node))
    }

    pub fn first_occurrence(&self, node: NodeId) -> Result<usize, LcaError> {
        self.first(node)
    }

    /// `None` only for the empty tree.
    pub fn root(&self) -> Option<NodeId> {
        self.tour.root()
    }

    /// Number of tree nodes.
    pub fn len(&self) -> usize {
        self.tour.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.tour.node_count() == 0
    }

    pub fn euler_tour(&self) -> &EulerTour {
        &self.tour
    }

    pub fn depths(&self) -> &[u32] {
        self.tour.depths()
    }

    pub fn sparse_table(&self) -> &SparseTable {
        &self.table
    }
}
