//! Architectural Register File.
//!
//! This module provides the `RegisterFile` struct, the architectural register state
//! the commit unit reads and writes. It provides:
//! 1. **Open Namespace:** Registers are named by strings; there is no fixed register count.
//! 2. **Zero Default:** A register that was never written reads as 0.
//! 3. **Observability:** Ordered iteration for dumping register state after a run.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// String-keyed register file.
///
/// Backed by a `BTreeMap` so that dumps and serialized output are ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterFile {
    regs: BTreeMap<String, i64>,
}

impl RegisterFile {
    /// Creates an empty register file; every register reads as 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register.
    ///
    /// # Arguments
    ///
    /// * `name` - Register name. Unwritten registers return 0.
    pub fn read(&self, name: &str) -> i64 {
        self.regs.get(name).copied().unwrap_or(0)
    }

    /// Writes a register, creating it if needed.
    pub fn write(&mut self, name: &str, val: i64) {
        let _ = self.regs.insert(name.to_owned(), val);
    }

    /// Returns the value of a register only if it has been written.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.regs.get(name).copied()
    }

    /// Number of registers that have been written.
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    /// Returns `true` if no register has been written.
    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Iterates over written registers in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.regs.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Formats all written registers as `name = value` lines.
    pub fn dump(&self) -> String {
        self.iter().fold(String::new(), |mut out, (name, val)| {
            let _ = writeln!(out, "{name:<6} = {val}");
            out
        })
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for RegisterFile {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        Self {
            regs: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<S: Into<String>, const N: usize> From<[(S, i64); N]> for RegisterFile {
    fn from(arr: [(S, i64); N]) -> Self {
        arr.into_iter().collect()
    }
}
