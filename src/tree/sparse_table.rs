//! 稀疏表区间最小值查询（RMQ）：`O(m log m)` 预处理，`O(1)` 查询。
//!
//! `st[k][i]` 记录窗口 `[i, i + 2^k)` 中深度最小的位置，平铺存放于一维数组，
//! 偏移量为 `k * m + i`。深度相等时取左侧位置。
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RmqError {
    #[error("range [{left}, {right}] is invalid for a table of {len} positions")]
    Range {
        left: usize,
        right: usize,
        len: usize,
    },
    #[error("range minimum query on an empty table")]
    EmptyTable,
}

fn floor_log2(x: usize) -> usize {
    debug_assert!(x > 0);
    x.ilog2() as usize
}

/// Position of the smaller depth; `a` wins ties.
#[inline]
fn argmin(depths: &[u32], a: u32, b: u32) -> u32 {
    if depths[b as usize] < depths[a as usize] {
        b
    } else {
        a
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseTable {
    len: usize,
    levels: usize,
    table: Vec<u32>,
}

impl SparseTable {
    pub fn build(depths: &[u32]) -> Self {
        let len = depths.len();
        if len == 0 {
            return Self {
                len,
                levels: 0,
                table: Vec::new(),
            };
        }
        debug_assert!(len <= u32::MAX as usize);

        let levels = floor_log2(len) + 1;
        let mut table = vec![0u32; levels * len];
        for (i, slot) in table[..len].iter_mut().enumerate() {
            *slot = i as u32;
        }

        for k in 1..levels {
            let half = 1usize << (k - 1);
            let (lower, upper) = table.split_at_mut(k * len);
            let prev = &lower[(k - 1) * len..];
            for i in 0..=len - (1 << k) {
                upper[i] = argmin(depths, prev[i], prev[i + half]);
            }
        }

        Self { len, levels, table }
    }

    /// Position of the minimum depth within the inclusive range `[left, right]`.
    pub fn query_min_index(
        &self,
        depths: &[u32],
        left: usize,
        right: usize,
    ) -> Result<usize, RmqError> {
        if self.len == 0 {
            return Err(RmqError::EmptyTable);
        }
        if left > right || right >= self.len {
            return Err(RmqError::Range {
                left,
                right,
                len: self.len,
            });
        }
        debug_assert_eq!(depths.len(), self.len);

        let k = floor_log2(right - left + 1);
        let row = &self.table[k * self.len..];
        let a = row[left];
        let b = row[right + 1 - (1 << k)];
        Ok(argmin(depths, a, b) as usize)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// The populated windows of level `k`: entry `i` covers `[i, i + 2^k)`.
    pub fn level(&self, k: usize) -> Option<&[u32]> {
        if k >= self.levels {
            return None;
        }
        let start = k * self.len;
        Some(&self.table[start..start + self.len + 1 - (1 << k)])
    }
}
