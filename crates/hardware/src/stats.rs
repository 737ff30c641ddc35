//! Simulation statistics collection and reporting.
//!
//! This module tracks run metrics for the scheduling engine. It provides:
//! 1. **Cycle and IPC:** Total cycles, dynamic instructions, and derived IPC/CPI.
//! 2. **Instruction mix:** Counts by category (ALU, multiply/divide, load, store, branch, jump).
//! 3. **Control flow:** Taken and not-taken conditional branches.
//! 4. **Stalls:** Data (RAW) and structural (unit busy) stall cycles.
//! 5. **Units:** Per unit type issue counts and busy cycles, for utilisation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::MachineConfig;
use crate::core::control::Outcome;
use crate::core::trace::{StallCause, TraceEntry};
use crate::isa::{Opcode, UnitType};

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"instruction_mix"`, `"stalls"`, `"units"`.
/// Pass an empty slice to [`SimStats::render_sections`] to render all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "stalls", "units"];

const RULE: &str = "==========================================================";
const SEPARATOR: &str = "----------------------------------------------------------";

/// Per unit type counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UnitStats {
    /// Configured instance count; `None` for unbounded unit types.
    pub instances: Option<usize>,
    /// Instructions issued to this unit type.
    pub issued: u64,
    /// Sum of occupied cycles over all instances.
    pub busy_cycles: u64,
}

/// Statistics for one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Total cycles: latest completion cycle seen.
    pub cycles: u64,
    /// Dynamic instructions issued.
    pub instructions: u64,

    /// Integer ALU operations (arithmetic, logic, shifts, `li`).
    pub inst_alu: u64,
    /// Multiply and divide operations.
    pub inst_mul_div: u64,
    /// Loads.
    pub inst_load: u64,
    /// Stores.
    pub inst_store: u64,
    /// Conditional branches.
    pub inst_branch: u64,
    /// Unconditional jumps.
    pub inst_jump: u64,

    /// Conditional branches that redirected control.
    pub branches_taken: u64,

    /// Cycles lost waiting on source registers.
    pub stalls_data: u64,
    /// Cycles lost waiting on a busy unit instance.
    pub stalls_structural: u64,

    /// Per unit type counters.
    pub units: BTreeMap<UnitType, UnitStats>,
}

impl SimStats {
    /// Creates empty statistics for a machine model.
    pub fn new(machine: &MachineConfig) -> Self {
        let units = UnitType::ALL
            .iter()
            .map(|&unit| {
                let instances = if unit.is_unbounded() {
                    None
                } else {
                    Some(machine.unit_count(unit).unwrap_or(0))
                };
                (
                    unit,
                    UnitStats {
                        instances,
                        ..UnitStats::default()
                    },
                )
            })
            .collect();
        Self {
            units,
            ..Self::default()
        }
    }

    /// Accounts for one dynamic instruction.
    pub fn record(&mut self, entry: &TraceEntry) {
        self.instructions += 1;
        self.cycles = self.cycles.max(entry.complete);

        let op = entry.opcode;
        match op {
            Opcode::Mul | Opcode::Muli | Opcode::Div | Opcode::Divi => self.inst_mul_div += 1,
            Opcode::Lw => self.inst_load += 1,
            Opcode::Sw => self.inst_store += 1,
            Opcode::Jmp => self.inst_jump += 1,
            _ if op.is_branch() => {
                self.inst_branch += 1;
                if matches!(entry.outcome, Outcome::Taken(_)) {
                    self.branches_taken += 1;
                }
            }
            _ => self.inst_alu += 1,
        }

        match entry.stall {
            StallCause::None => {}
            StallCause::Data => self.stalls_data += entry.stall_cycles,
            StallCause::Structural => self.stalls_structural += entry.stall_cycles,
        }

        let unit = self.units.entry(entry.unit).or_default();
        unit.issued += 1;
        unit.busy_cycles += entry.latency();
    }

    /// Instructions per cycle; 0 for an empty run.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions as f64 / self.cycles as f64
        }
    }

    /// Cycles per instruction; 0 for an empty run.
    pub fn cpi(&self) -> f64 {
        if self.instructions == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions as f64
        }
    }

    /// Fraction of available instance-cycles a finite unit type was busy.
    ///
    /// Returns `None` for unbounded unit types and for empty runs.
    pub fn utilisation(&self, unit: UnitType) -> Option<f64> {
        let stats = self.units.get(&unit)?;
        let capacity = stats.instances? as u64 * self.cycles;
        if capacity == 0 {
            return None;
        }
        Some(stats.busy_cycles as f64 / capacity as f64)
    }

    /// Renders the requested statistics sections as text.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to render every section.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let pct = |n: u64, d: u64| {
            if d == 0 {
                0.0
            } else {
                n as f64 / d as f64 * 100.0
            }
        };
        let mut out = vec![String::new(), RULE.to_owned()];
        out.push("SCHEDULING SIMULATION STATISTICS".to_owned());
        out.push(RULE.to_owned());

        if want("summary") {
            out.push(format!("sim_cycles               {}", self.cycles));
            out.push(format!("sim_insts                {}", self.instructions));
            out.push(format!("sim_ipc                  {:.4}", self.ipc()));
            out.push(format!("sim_cpi                  {:.4}", self.cpi()));
            out.push(SEPARATOR.to_owned());
        }
        if want("instruction_mix") {
            let total = self.instructions;
            out.push("INSTRUCTION MIX".to_owned());
            for (name, count) in [
                ("op.alu", self.inst_alu),
                ("op.mul_div", self.inst_mul_div),
                ("op.load", self.inst_load),
                ("op.store", self.inst_store),
                ("op.branch", self.inst_branch),
                ("op.jump", self.inst_jump),
            ] {
                out.push(format!("  {name:<22} {count} ({:.2}%)", pct(count, total)));
            }
            out.push(format!(
                "  {:<22} {} ({:.2}%)",
                "branch.taken",
                self.branches_taken,
                pct(self.branches_taken, self.inst_branch)
            ));
            out.push(SEPARATOR.to_owned());
        }
        if want("stalls") {
            out.push("STALLS".to_owned());
            out.push(format!(
                "  stalls.data            {} ({:.2}%)",
                self.stalls_data,
                pct(self.stalls_data, self.cycles)
            ));
            out.push(format!(
                "  stalls.structural      {} ({:.2}%)",
                self.stalls_structural,
                pct(self.stalls_structural, self.cycles)
            ));
            out.push(SEPARATOR.to_owned());
        }
        if want("units") {
            out.push("FUNCTIONAL UNITS".to_owned());
            for (&unit, stats) in &self.units {
                let instances = stats
                    .instances
                    .map_or_else(|| "inf".to_owned(), |n| n.to_string());
                let util = self
                    .utilisation(unit)
                    .map_or_else(|| "-".to_owned(), |u| format!("{:.2}%", u * 100.0));
                out.push(format!(
                    "  {:<10} x{:<4} issued: {:<8} | busy: {:<8} | util: {}",
                    unit.name(),
                    instances,
                    stats.issued,
                    stats.busy_cycles,
                    util
                ));
            }
        }
        out.push(RULE.to_owned());
        out.join("\n")
    }

    /// Prints only the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        println!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
