//! Cycle-based scoreboard for register dependency tracking.
//!
//! Maps each register to the cycle on which its most recent write completes.
//! A register with no entry has no pending writer and is ready at cycle 0.
//! Values themselves live in the architectural register file; the scoreboard
//! only decides when a reader may issue.

use std::collections::HashMap;

/// Register ready-at table.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    ready_at: HashMap<String, u64>,
}

impl Scoreboard {
    /// Creates a scoreboard with every register ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cycle on which `reg`'s latest write completes, or 0.
    pub fn ready_at(&self, reg: &str) -> u64 {
        self.ready_at.get(reg).copied().unwrap_or(0)
    }

    /// Latest ready-at cycle over a set of registers, or 0 for an empty set.
    pub fn data_ready<'a>(&self, regs: impl IntoIterator<Item = &'a str>) -> u64 {
        regs.into_iter()
            .map(|r| self.ready_at(r))
            .max()
            .unwrap_or(0)
    }

    /// Records that `reg`'s newest value becomes visible after cycle `cycle`.
    ///
    /// The newest writer always wins, even if an older in-flight writer
    /// completes later (WAW is not tracked).
    pub fn set_producer(&mut self, reg: &str, cycle: u64) {
        let _ = self.ready_at.insert(reg.to_owned(), cycle);
    }
}
