//! Error taxonomy for loading, configuring and running a simulation.
//!
//! This module defines every fatal condition the simulator can report. It provides:
//! 1. **Parse Errors:** Problems found by the loader, always tied to a source line.
//! 2. **Execution Errors:** Internal-consistency failures raised by the engine at run time.
//! 3. **Configuration Errors:** Machine models that cannot be scheduled.
//! 4. **Top-Level Errors:** `SimError`, which wraps the above plus I/O and JSON failures.
//!
//! None of these are recoverable: a simulation is a deterministic batch computation
//! and any error aborts it without a partial result.

use std::path::PathBuf;

use thiserror::Error;

use crate::isa::{Opcode, UnitType};

/// Fatal error found while turning source text into a [`Program`](crate::isa::Program).
///
/// Every variant carries the 1-based source line number and the offending text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The mnemonic is not part of the instruction set.
    #[error("line {line}: unknown opcode '{mnemonic}' in `{text}`")]
    UnknownOpcode {
        /// Source line number.
        line: usize,
        /// The mnemonic as written.
        mnemonic: String,
        /// The full source line.
        text: String,
    },

    /// The opcode exists but the machine configuration maps it to no functional unit.
    #[error("line {line}: opcode '{opcode}' is not available on this machine: `{text}`")]
    UnsupportedOpcode {
        /// Source line number.
        line: usize,
        /// The rejected opcode.
        opcode: Opcode,
        /// The full source line.
        text: String,
    },

    /// The line has a recognised shape, but not one this opcode accepts.
    #[error("line {line}: '{opcode}' expects {expected}: `{text}`")]
    OperandMismatch {
        /// Source line number.
        line: usize,
        /// The opcode whose operands are wrong.
        opcode: Opcode,
        /// Human-readable operand form the opcode accepts.
        expected: &'static str,
        /// The full source line.
        text: String,
    },

    /// An immediate or memory offset could not be read as a 64-bit integer.
    #[error("line {line}: invalid immediate '{value}' in `{text}`")]
    InvalidImmediate {
        /// Source line number.
        line: usize,
        /// The literal as written.
        value: String,
        /// The full source line.
        text: String,
    },

    /// A label declaration whose name contains characters outside `[A-Za-z0-9_.]`.
    #[error("line {line}: invalid label name in `{text}`")]
    InvalidLabel {
        /// Source line number.
        line: usize,
        /// The full source line.
        text: String,
    },

    /// The same label was declared twice.
    #[error("line {line}: duplicate label '{label}' (first declared on line {first})")]
    DuplicateLabel {
        /// Line of the second declaration.
        line: usize,
        /// Line of the first declaration.
        first: usize,
        /// The label name.
        label: String,
        /// The full source line.
        text: String,
    },

    /// A branch or jump names a label that is never declared.
    #[error("line {line}: undefined label '{label}' in `{text}`")]
    UndefinedLabel {
        /// Source line number of the branch.
        line: usize,
        /// The missing label.
        label: String,
        /// The full source line.
        text: String,
    },

    /// The line matches none of the instruction shapes.
    #[error("line {line}: unrecognized instruction `{text}`")]
    UnrecognizedLine {
        /// Source line number.
        line: usize,
        /// The full source line.
        text: String,
    },
}

impl ParseError {
    /// Returns the 1-based source line the error refers to.
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownOpcode { line, .. }
            | Self::UnsupportedOpcode { line, .. }
            | Self::OperandMismatch { line, .. }
            | Self::InvalidImmediate { line, .. }
            | Self::InvalidLabel { line, .. }
            | Self::DuplicateLabel { line, .. }
            | Self::UndefinedLabel { line, .. }
            | Self::UnrecognizedLine { line, .. } => *line,
        }
    }
}

/// Fatal error raised by the engine while a program is running.
///
/// These indicate an instruction or configuration the engine cannot give a
/// meaning to. They are never downgraded to a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The instruction lacks an operand its opcode needs.
    #[error("pc {pc}: '{opcode}' has no {operand} operand")]
    MissingOperand {
        /// Static program counter.
        pc: usize,
        /// Opcode being executed.
        opcode: Opcode,
        /// Name of the missing field.
        operand: &'static str,
    },

    /// The machine configuration maps the opcode to no unit type.
    #[error("pc {pc}: no functional unit configured for '{opcode}'")]
    NoUnitMapping {
        /// Static program counter.
        pc: usize,
        /// Opcode being scheduled.
        opcode: Opcode,
    },

    /// The machine configuration has no latency for the opcode.
    #[error("pc {pc}: no latency configured for '{opcode}'")]
    MissingLatency {
        /// Static program counter.
        pc: usize,
        /// Opcode being scheduled.
        opcode: Opcode,
    },

    /// The unit type the opcode needs has no instances.
    #[error("pc {pc}: '{opcode}' needs a {unit} unit but the machine has none")]
    NoUnitsAvailable {
        /// Static program counter.
        pc: usize,
        /// Opcode being scheduled.
        opcode: Opcode,
        /// The empty unit type.
        unit: UnitType,
    },

    /// Integer division with a zero divisor.
    #[error("pc {pc}: division by zero in `{text}`")]
    DivisionByZero {
        /// Static program counter.
        pc: usize,
        /// Display text of the instruction.
        text: String,
    },

    /// Shift by a negative amount.
    #[error("pc {pc}: negative shift amount {amount} in `{text}`")]
    NegativeShift {
        /// Static program counter.
        pc: usize,
        /// The shift amount.
        amount: i64,
        /// Display text of the instruction.
        text: String,
    },

    /// A control-flow instruction reached the engine without a resolved target.
    #[error("pc {pc}: branch target '{label}' was never resolved")]
    UnresolvedTarget {
        /// Static program counter.
        pc: usize,
        /// Label as written, or empty when missing altogether.
        label: String,
    },

    /// The configured ceiling on dynamic instructions was reached.
    #[error("exceeded the limit of {limit} dynamic instructions (pc {pc})")]
    InstructionLimit {
        /// The configured ceiling.
        limit: u64,
        /// Static program counter of the instruction that would have exceeded it.
        pc: usize,
    },
}

/// Invalid machine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An opcode is mapped to a unit but has no latency entry.
    #[error("opcode '{0}' has a unit but no latency")]
    MissingLatency(Opcode),

    /// An opcode's latency is zero; every instruction occupies at least one cycle.
    #[error("opcode '{0}' has zero latency")]
    ZeroLatency(Opcode),

    /// An opcode is mapped to a finite unit type that has no instance count.
    #[error("opcode '{opcode}' uses unit {unit}, which has no instance count")]
    UnknownUnit {
        /// The opcode.
        opcode: Opcode,
        /// The missing unit type.
        unit: UnitType,
    },

    /// A finite unit type is declared with zero instances.
    #[error("unit {0} has zero instances")]
    ZeroUnits(UnitType),
}

/// Top-level error for a complete load-and-run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Source text was rejected by the loader.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The engine aborted while executing.
    #[error("execution error: {0}")]
    Exec(#[from] ExecError),

    /// The machine configuration is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A configuration file was not valid JSON for [`Config`](crate::config::Config).
    #[error("malformed configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// A file could not be read.
    #[error("could not read '{}': {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
