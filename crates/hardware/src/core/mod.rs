//! Scheduling core.
//!
//! This module contains the in-order, single-issue scheduling engine and the
//! components it coordinates: the hazard scoreboard, the functional-unit pool,
//! the commit unit and the control-flow resolver.

/// Architectural effect computation and application.
pub mod commit;

/// Next program counter after a committed instruction.
pub mod control;

/// Per dynamic instruction scheduling and execution.
pub mod engine;

/// Register ready-at tracking.
pub mod scoreboard;

/// Dynamic instruction trace records.
pub mod trace;

/// Functional-unit instances and their busy-until cycles.
pub mod units;

pub use self::engine::{Engine, SimOutcome};
pub use self::trace::{StallCause, TraceEntry};
