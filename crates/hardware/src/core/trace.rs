//! Execution trace records.
//!
//! One [`TraceEntry`] is appended per dynamic instruction, so each loop
//! iteration keeps its own cycle range.

use std::fmt;

use serde::Serialize;

use super::control::Outcome;
use crate::isa::{Opcode, UnitType};

/// Why an instruction issued later than the cycle after its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StallCause {
    /// Issued back-to-back with the previous instruction.
    None,
    /// Waited on a source register (RAW hazard).
    Data,
    /// Waited for a functional unit instance to free up.
    Structural,
}

impl StallCause {
    /// Short label used in listings.
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "-",
            Self::Data => "data",
            Self::Structural => "unit",
        }
    }
}

/// Timing and outcome of one dynamic instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// Dynamic sequence number, starting at 0.
    pub seq: u64,
    /// Static program counter.
    pub pc: usize,
    /// Display text of the instruction.
    pub text: String,
    /// Opcode.
    pub opcode: Opcode,
    /// Unit type it executed on.
    pub unit: UnitType,
    /// Unit instance index.
    pub unit_index: usize,
    /// Cycle the instruction issued (and committed).
    pub issue: u64,
    /// Last cycle of execution; dependants may issue after it.
    pub complete: u64,
    /// Cycles lost waiting beyond the single-issue slot.
    pub stall_cycles: u64,
    /// Cause of `stall_cycles`.
    pub stall: StallCause,
    /// Control-flow outcome.
    pub outcome: Outcome,
}

impl TraceEntry {
    /// Number of cycles the instruction occupies its unit.
    pub const fn latency(&self) -> u64 {
        self.complete + 1 - self.issue
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<4} pc={:<3} {:<24} {:<10}[{}] issue={:<5} complete={:<5}",
            self.seq,
            self.pc,
            self.text,
            self.unit.name(),
            self.unit_index,
            self.issue,
            self.complete,
        )?;
        if self.stall != StallCause::None {
            write!(f, " stall={}({})", self.stall.label(), self.stall_cycles)?;
        }
        if let Outcome::Taken(target) = self.outcome {
            write!(f, " -> {target}")?;
        }
        Ok(())
    }
}
