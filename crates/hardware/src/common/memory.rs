//! Sparse data memory.
//!
//! Word-granular memory addressed by signed integers. Only addresses that have
//! been written are stored; every other address reads as 0.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sparse integer memory keyed by address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Memory {
    cells: BTreeMap<i64, i64>,
}

impl Memory {
    /// Creates an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the value at `addr`, or 0 if the address was never written.
    pub fn read(&self, addr: i64) -> i64 {
        self.cells.get(&addr).copied().unwrap_or(0)
    }

    /// Stores `val` at `addr`.
    pub fn write(&mut self, addr: i64, val: i64) {
        let _ = self.cells.insert(addr, val);
    }

    /// Returns the value at `addr` only if it has been written.
    pub fn get(&self, addr: i64) -> Option<i64> {
        self.cells.get(&addr).copied()
    }

    /// Number of written addresses.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over written cells in address order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.cells.iter().map(|(a, v)| (*a, *v))
    }
}

impl FromIterator<(i64, i64)> for Memory {
    fn from_iter<I: IntoIterator<Item = (i64, i64)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(i64, i64); N]> for Memory {
    fn from(arr: [(i64, i64); N]) -> Self {
        arr.into_iter().collect()
    }
}
