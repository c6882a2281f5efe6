//! 树的输入表示：边表、邻接表、邻接矩阵、父指针数组以及 petgraph 无向图，
//! 统一规范化为无向邻接行。
//!
//! 每个结点的邻居顺序即"发现顺序"，后续 DFS 按此顺序访问子结点。
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use smallvec::SmallVec;
use thiserror::Error;

use crate::tree::ids::NodeId;
use crate::tree::index_vec::{Idx, IndexVec};

type NeighborRow = SmallVec<[NodeId; 4]>;

/// 结点数上限：Euler 序长度 `2n - 1` 必须能以 `u32` 位置表示，且 `u32::MAX` 保留为未访问标记。
pub const MAX_NODES: usize = (u32::MAX / 2) as usize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTreeError {
    #[error("root {root:?} is out of bounds for a tree of {nodes} nodes")]
    RootOutOfBounds { root: NodeId, nodes: usize },
    #[error("cycle detected: {from:?} reaches already visited node {to:?}")]
    Cycle { from: NodeId, to: NodeId },
    #[error("node {node:?} is unreachable from the root ({reached} of {nodes} nodes reached)")]
    Unreachable {
        node: NodeId,
        reached: usize,
        nodes: usize,
    },
    #[error("node id {node} is outside of 0..{nodes}")]
    NodeOutOfBounds { node: u32, nodes: usize },
    #[error("adjacency matrix row {row} has {len} columns, expected {expected}")]
    NonSquareMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("self loop on node {0:?}")]
    SelfLoop(NodeId),
    #[error("tree of {nodes} nodes exceeds the limit of {max}")]
    TooManyNodes { nodes: usize, max: usize },
}

pub(crate) fn check_node_count(nodes: usize) -> Result<(), InvalidTreeError> {
    if nodes > MAX_NODES {
        return Err(InvalidTreeError::TooManyNodes {
            nodes,
            max: MAX_NODES,
        });
    }
    Ok(())
}

/// Undirected neighbour rows, one per node id in `0..len()`.
#[derive(Clone, PartialEq, Eq)]
pub struct Adjacency {
    rows: IndexVec<NodeId, NeighborRow>,
}

impl fmt::Debug for Adjacency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adjacency")
            .field("nodes", &self.len())
            .field("rows", &self.rows)
            .finish()
    }
}

/// Collects undirected edges, collapsing repeated mentions of the same pair.
struct EdgeCollector {
    rows: IndexVec<NodeId, NeighborRow>,
    seen: HashSet<(u32, u32)>,
}

impl EdgeCollector {
    fn new(nodes: usize) -> Result<Self, InvalidTreeError> {
        check_node_count(nodes)?;
        Ok(Self {
            rows: IndexVec::from_elem(NeighborRow::new(), nodes),
            seen: HashSet::new(),
        })
    }

    fn check(&self, raw: u32) -> Result<NodeId, InvalidTreeError> {
        let nodes = self.rows.len();
        if (raw as usize) < nodes {
            Ok(NodeId::new(raw))
        } else {
            Err(InvalidTreeError::NodeOutOfBounds { node: raw, nodes })
        }
    }

    fn connect(&mut self, u: u32, v: u32) -> Result<(), InvalidTreeError> {
        let u = self.check(u)?;
        let v = self.check(v)?;
        if u == v {
            return Err(InvalidTreeError::SelfLoop(u));
        }
        if self.seen.insert((u.raw().min(v.raw()), u.raw().max(v.raw()))) {
            self.rows[u].push(v);
            self.rows[v].push(u);
        }
        Ok(())
    }

    fn finish(self) -> Adjacency {
        Adjacency { rows: self.rows }
    }
}

impl Adjacency {
    /// `nodes` isolated nodes. Only a tree with `nodes <= 1` is valid without edges.
    pub fn with_nodes(nodes: usize) -> Self {
        Self {
            rows: IndexVec::from_elem(NeighborRow::new(), nodes),
        }
    }

    pub fn empty() -> Self {
        Self::with_nodes(0)
    }

    /// Builds from an undirected edge list over `0..nodes`.
    pub fn from_edges<I>(nodes: usize, edges: I) -> Result<Self, InvalidTreeError>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut collector = EdgeCollector::new(nodes)?;
        for (u, v) in edges {
            collector.connect(u, v)?;
        }
        Ok(collector.finish())
    }

    /// Builds from dense adjacency lists, `lists[u]` being the neighbours of `u`.
    /// Edges may be listed in one direction or both.
    pub fn from_lists<R>(lists: &[R]) -> Result<Self, InvalidTreeError>
    where
        R: AsRef<[u32]>,
    {
        let mut collector = EdgeCollector::new(lists.len())?;
        for (u, row) in lists.iter().enumerate() {
            for &v in row.as_ref() {
                collector.connect(u as u32, v)?;
            }
        }
        Ok(collector.finish())
    }

    /// Builds from a `node -> neighbours` mapping. Keys are walked in ascending order.
    pub fn from_map(
        nodes: usize,
        map: &BTreeMap<u32, Vec<u32>>,
    ) -> Result<Self, InvalidTreeError> {
        let mut collector = EdgeCollector::new(nodes)?;
        for (&u, row) in map {
            collector.check(u)?;
            for &v in row {
                collector.connect(u, v)?;
            }
        }
        Ok(collector.finish())
    }

    /// Builds from an `n x n` matrix. A cell is an edge when it differs from
    /// `T::default()`; the diagonal is ignored and either triangle suffices.
    pub fn from_matrix<T, R>(matrix: &[R]) -> Result<Self, InvalidTreeError>
    where
        T: Default + PartialEq,
        R: AsRef<[T]>,
    {
        let nodes = matrix.len();
        let empty = T::default();
        let mut collector = EdgeCollector::new(nodes)?;
        for (i, row) in matrix.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != nodes {
                return Err(InvalidTreeError::NonSquareMatrix {
                    row: i,
                    len: row.len(),
                    expected: nodes,
                });
            }
            for (j, cell) in row.iter().enumerate() {
                if i != j && *cell != empty {
                    collector.connect(i as u32, j as u32)?;
                }
            }
        }
        Ok(collector.finish())
    }

    /// Builds from a parent array; `None` marks a node without a parent.
    pub fn from_parents(parents: &[Option<u32>]) -> Result<Self, InvalidTreeError> {
        let mut collector = EdgeCollector::new(parents.len())?;
        for (child, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                collector.connect(*parent, child as u32)?;
            }
        }
        Ok(collector.finish())
    }

    /// Imports an undirected petgraph graph, walking edges in edge-index order.
    pub fn from_petgraph<N, E>(graph: &UnGraph<N, E>) -> Result<Self, InvalidTreeError> {
        let mut collector = EdgeCollector::new(graph.node_count())?;
        for edge in graph.edge_references() {
            collector.connect(edge.source().index() as u32, edge.target().index() as u32)?;
        }
        Ok(collector.finish())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        self.rows.indices()
    }

    /// Neighbours of `node` in discovery order. Panics when `node` is out of bounds.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.rows[node]
    }

    pub fn edge_count(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum::<usize>() / 2
    }
}

impl Default for Adjacency {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn edges_are_symmetrised_in_discovery_order() {
        let adjacency = Adjacency::from_edges(4, [(0, 2), (0, 1), (3, 0)]).unwrap();
        assert_eq!(adjacency.neighbors(NodeId::new(0)), ids(&[2, 1, 3]).as_slice());
        assert_eq!(adjacency.neighbors(NodeId::new(3)), ids(&[0]).as_slice());
        assert_eq!(adjacency.edge_count(), 3);
    }

    #[test]
    fn duplicate_mentions_collapse() {
        let adjacency = Adjacency::from_lists(&[vec![1, 2], vec![0], vec![0, 0]]).unwrap();
        assert_eq!(adjacency.edge_count(), 2);
        assert_eq!(adjacency.neighbors(NodeId::new(2)), ids(&[0]).as_slice());
    }

    #[test]
    fn matrix_ignores_diagonal_and_accepts_one_triangle() {
        let matrix = vec![
            vec![1u8, 1, 0],
            vec![0, 1, 0],
            vec![1, 0, 0],
        ];
        let adjacency = Adjacency::from_matrix::<u8, _>(&matrix).unwrap();
        assert_eq!(adjacency.edge_count(), 2);
        assert_eq!(adjacency.neighbors(NodeId::new(0)), ids(&[1, 2]).as_slice());

        let flags = [[false, true], [true, false]];
        assert_eq!(Adjacency::from_matrix::<bool, _>(&flags).unwrap().edge_count(), 1);
    }

    #[test]
    fn non_square_matrix_is_rejected() {
        let matrix = vec![vec![false, true], vec![true]];
        assert_eq!(
            Adjacency::from_matrix::<bool, _>(&matrix),
            Err(InvalidTreeError::NonSquareMatrix {
                row: 1,
                len: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn out_of_bounds_and_self_loops_are_rejected() {
        assert_eq!(
            Adjacency::from_edges(2, [(0, 5)]),
            Err(InvalidTreeError::NodeOutOfBounds { node: 5, nodes: 2 })
        );
        assert_eq!(
            Adjacency::from_lists(&[vec![0u32]]),
            Err(InvalidTreeError::SelfLoop(NodeId::new(0)))
        );

        let mut map = BTreeMap::new();
        map.insert(9, vec![]);
        assert!(matches!(
            Adjacency::from_map(3, &map),
            Err(InvalidTreeError::NodeOutOfBounds { node: 9, .. })
        ));
    }

    #[test]
    fn oversized_trees_are_rejected_before_allocating() {
        assert_eq!(
            Adjacency::from_edges(MAX_NODES + 1, std::iter::empty()),
            Err(InvalidTreeError::TooManyNodes {
                nodes: MAX_NODES + 1,
                max: MAX_NODES
            })
        );
        assert_eq!(check_node_count(MAX_NODES), Ok(()));
    }

    #[test]
    fn parents_and_petgraph_agree() {
        let from_parents = Adjacency::from_parents(&[None, Some(0), Some(0), Some(1)]).unwrap();

        let mut graph = UnGraph::<(), ()>::new_undirected();
        let nodes: Vec<_> = (0..4).map(|_| graph.add_node(())).collect();
        graph.add_edge(nodes[0], nodes[1], ());
        graph.add_edge(nodes[0], nodes[2], ());
        graph.add_edge(nodes[1], nodes[3], ());
        let from_graph = Adjacency::from_petgraph(&graph).unwrap();

        assert_eq!(from_parents, from_graph);
    }
}
