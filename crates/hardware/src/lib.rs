//! In-order scheduling simulator library.
//!
//! This crate models the timing of a simple in-order, single-issue processor with a
//! register scoreboard and typed functional units. It provides:
//! 1. **ISA:** A closed opcode set, static instructions and loaded programs.
//! 2. **Loader:** Assembly text to program, with labels and typed operand shapes.
//! 3. **Core:** The scheduling engine, scoreboard, unit pool, commit unit and control resolver.
//! 4. **Configuration:** The machine model (units, latencies, opcode mapping) and run options.
//! 5. **Reporting:** Per-instruction trace, timeline chart and run statistics.
//!
//! # Examples
//!
//! ```
//! use ilpsim_core::{Memory, RegisterFile, Simulator};
//!
//! let sim = Simulator::default();
//! let program = sim.load("lw t1, 0(t0)\nadd t2, t1, t1\nsw t2, 4(t0)").unwrap();
//! let regs = RegisterFile::from([("t0", 100)]);
//! let mem = Memory::from([(100, 10)]);
//!
//! let out = sim.run(program, regs, mem).unwrap();
//! assert_eq!(out.registers.read("t2"), 20);
//! assert_eq!(out.memory.read(104), 20);
//! assert_eq!(out.total_cycles, 11);
//! ```

/// Common types (errors, register file, memory).
pub mod common;
/// Simulator configuration (machine model and general options).
pub mod config;
/// Scheduling core (engine, scoreboard, units, commit, control flow, trace).
pub mod core;
/// Instruction set (opcodes, unit types, instructions, programs).
pub mod isa;
/// Program loading, simulator facade and reporting.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Error types returned by loading, configuration and execution.
pub use crate::common::{ConfigError, ExecError, ParseError, SimError};
/// Architectural state containers.
pub use crate::common::{Memory, RegisterFile};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Scheduling engine and its final result.
pub use crate::core::{Engine, SimOutcome};
/// Loaded program type.
pub use crate::isa::Program;
/// Configuration, loader and engine facade.
pub use crate::sim::Simulator;
