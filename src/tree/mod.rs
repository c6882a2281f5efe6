//! # 有根树最近公共祖先（LCA）索引
//!
//! 设有根树 `T` 含 `n` 个结点，标识为稠密整数 `[0, n)`。从根出发的深度优先遍历
//! 在进入结点及从子树返回结点时各记录一次，得到长度 `2n - 1` 的 Euler 序 `E`
//! 及其深度序列 `D`，并记录每个结点的首次出现位置 `first[u]`。则
//!
//! * `lca(u, v) = E[argmin D[l..=r]]`，其中 `l = min(first[u], first[v])`，
//!   `r = max(first[u], first[v])`；
//! * 区间最小值由稀疏表回答：`O(n log n)` 预处理，`O(1)` 查询，深度相等时取左侧位置。
//!
//! 索引构造完成后不可变，可经 `Arc` 在多线程间只读共享。
//!
//! ## 示例
//!
//! ```rust
//! use euler_lca::tree::*;
//!
//! let adjacency = Adjacency::from_edges(5, [(0, 1), (0, 2), (1, 3), (1, 4)]).unwrap();
//! let index = LcaIndex::build(&adjacency).unwrap();
//!
//! assert_eq!(index.query(NodeId::new(3), NodeId::new(4)), Ok(NodeId::new(1)));
//! assert_eq!(index.query(NodeId::new(3), NodeId::new(2)), Ok(NodeId::new(0)));
//! assert_eq!(index.query(NodeId::new(4), NodeId::new(4)), Ok(NodeId::new(4)));
//! assert!(index.query(NodeId::new(9), NodeId::new(0)).is_err());
//! ```

pub mod adjacency;
pub mod dot;
pub mod ids;
pub mod index;
pub mod index_vec;
pub mod io;
pub mod sparse_table;
pub mod tour;

pub use adjacency::{Adjacency, InvalidTreeError, MAX_NODES};
pub use ids::NodeId;
pub use index::{DEFAULT_PARALLEL_THRESHOLD, LcaError, LcaIndex};
pub use index_vec::{Idx, IndexVec};
pub use io::{DocumentFormat, IoError, QueryAnswer, QueryBatch, TreeDocument, TreeInput};
pub use sparse_table::{RmqError, SparseTable};
pub use tour::{EulerTour, TourBuilder, TourStep};
