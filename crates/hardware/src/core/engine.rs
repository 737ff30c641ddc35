//! Scheduling/Execution Engine.
//!
//! Drives a program one dynamic instruction at a time. For each instruction it:
//! 1. **Fetches** the static instruction at the current program counter.
//! 2. **Schedules** it: the issue cycle is one past the latest of its operands'
//!    ready cycle, the chosen unit instance's busy-until cycle, and the previous
//!    instruction's issue cycle.
//! 3. **Commits** its architectural effect immediately.
//! 4. **Resolves** the next program counter.
//!
//! Issue is strictly in order and single-wide. Nothing is speculated and no
//! pipeline is flushed; a taken branch simply changes the next fetch.

use std::sync::Arc;

use serde::Serialize;

use super::commit;
use super::control::{self, Outcome};
use super::scoreboard::Scoreboard;
use super::trace::{StallCause, TraceEntry};
use super::units::FunctionalUnitPool;
use crate::common::{ExecError, Memory, RegisterFile};
use crate::config::{GeneralConfig, MachineConfig};
use crate::isa::Program;
use crate::stats::SimStats;

/// Final state of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimOutcome {
    /// Final register values.
    pub registers: RegisterFile,
    /// Final memory contents.
    pub memory: Memory,
    /// Latest completion cycle over all dynamic instructions; 0 if none ran.
    pub total_cycles: u64,
    /// One entry per dynamic instruction, in issue order.
    pub trace: Vec<TraceEntry>,
    /// Run statistics.
    pub stats: SimStats,
}

/// In-order, single-issue scheduling engine.
#[derive(Debug)]
pub struct Engine {
    machine: Arc<MachineConfig>,
    program: Program,
    regs: RegisterFile,
    mem: Memory,
    scoreboard: Scoreboard,
    units: FunctionalUnitPool,
    pc: usize,
    last_issue: u64,
    seq: u64,
    max_instructions: Option<u64>,
    trace_instructions: bool,
    trace: Vec<TraceEntry>,
    stats: SimStats,
}

impl Engine {
    /// Creates an engine positioned at the first instruction.
    ///
    /// # Arguments
    ///
    /// * `machine` - Shared machine model.
    /// * `program` - Loaded program.
    /// * `regs` - Initial register values.
    /// * `mem` - Initial memory contents.
    pub fn new(
        machine: Arc<MachineConfig>,
        program: Program,
        regs: RegisterFile,
        mem: Memory,
    ) -> Self {
        let units = FunctionalUnitPool::new(&machine);
        let stats = SimStats::new(&machine);
        Self {
            machine,
            program,
            regs,
            mem,
            scoreboard: Scoreboard::new(),
            units,
            pc: 0,
            last_issue: 0,
            seq: 0,
            max_instructions: None,
            trace_instructions: false,
            trace: Vec::new(),
            stats,
        }
    }

    /// Applies the instruction ceiling and trace logging switch from `general`.
    #[must_use]
    pub const fn with_general(mut self, general: &GeneralConfig) -> Self {
        self.max_instructions = general.max_instructions;
        self.trace_instructions = general.trace_instructions;
        self
    }

    /// Sets the dynamic instruction ceiling; `None` runs unbounded.
    #[must_use]
    pub const fn with_max_instructions(mut self, limit: Option<u64>) -> Self {
        self.max_instructions = limit;
        self
    }

    /// Current program counter.
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// Returns `true` once the program counter has left the program.
    pub fn is_finished(&self) -> bool {
        self.pc >= self.program.len()
    }

    /// Current register values.
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Current memory contents.
    pub const fn memory(&self) -> &Memory {
        &self.mem
    }

    /// Trace recorded so far.
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Statistics recorded so far.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Latest completion cycle so far.
    pub const fn total_cycles(&self) -> u64 {
        self.stats.cycles
    }

    /// Issues and commits the instruction at the current program counter.
    ///
    /// # Returns
    ///
    /// The new trace entry, or `None` if the program has finished. On error
    /// the engine state is left as it was before the call.
    pub fn step(&mut self) -> Result<Option<TraceEntry>, ExecError> {
        let pc = self.pc;
        let Some(inst) = self.program.fetch(pc) else {
            return Ok(None);
        };
        if let Some(limit) = self.max_instructions.filter(|&l| self.seq >= l) {
            return Err(ExecError::InstructionLimit { limit, pc });
        }

        let opcode = inst.opcode;
        let unit = self
            .machine
            .unit_for(opcode)
            .ok_or(ExecError::NoUnitMapping { pc, opcode })?;
        let latency = self
            .machine
            .latency(opcode)
            .ok_or(ExecError::MissingLatency { pc, opcode })?;
        let grant = self
            .units
            .select(unit)
            .ok_or(ExecError::NoUnitsAvailable { pc, opcode, unit })?;

        let data_ready = self.scoreboard.data_ready(inst.read_set());
        let issue = data_ready.max(grant.busy_until).max(self.last_issue) + 1;
        let complete = (issue + latency).saturating_sub(1);

        let stall_cycles = issue - (self.last_issue + 1);
        let stall = if stall_cycles == 0 {
            StallCause::None
        } else if data_ready >= grant.busy_until {
            StallCause::Data
        } else {
            StallCause::Structural
        };

        let effect = commit::compute(pc, inst, &self.regs, &self.mem)?;
        let outcome = control::resolve(pc, inst, &self.regs)?;

        let entry = TraceEntry {
            seq: self.seq,
            pc,
            text: inst.to_string(),
            opcode,
            unit,
            unit_index: grant.index,
            issue,
            complete,
            stall_cycles,
            stall,
            outcome,
        };

        self.units.occupy(grant, complete);
        if let Some(rd) = inst.write_reg() {
            self.scoreboard.set_producer(rd, complete);
        }
        commit::apply(effect, &mut self.regs, &mut self.mem);

        if self.trace_instructions {
            tracing::info!(
                seq = entry.seq,
                pc,
                inst = %entry.text,
                unit = %unit,
                index = grant.index,
                issue,
                complete,
                "issue"
            );
        } else {
            tracing::debug!(
                seq = entry.seq,
                pc,
                inst = %entry.text,
                issue,
                complete,
                "issue"
            );
        }
        if let Outcome::Taken(target) = outcome {
            tracing::trace!(pc, target, "control transfer");
        }

        self.pc = outcome.next_pc(pc);
        self.last_issue = issue;
        self.seq += 1;
        self.stats.record(&entry);
        self.trace.push(entry.clone());
        Ok(Some(entry))
    }

    /// Steps until the program counter leaves the program.
    pub fn run(&mut self) -> Result<(), ExecError> {
        while self.step()?.is_some() {}
        tracing::debug!(
            instructions = self.seq,
            cycles = self.stats.cycles,
            "run complete"
        );
        Ok(())
    }

    /// Consumes the engine and returns the final state.
    pub fn finish(self) -> SimOutcome {
        SimOutcome {
            registers: self.regs,
            memory: self.mem,
            total_cycles: self.stats.cycles,
            trace: self.trace,
            stats: self.stats,
        }
    }
}
