//! Instruction Set Architecture.
//!
//! This module defines the register-machine instruction set the simulator executes. It provides:
//! 1. **Opcodes:** The closed mnemonic set, operand forms and unit classification.
//! 2. **Instructions:** Immutable static descriptors produced by the loader.
//! 3. **Programs:** Instruction sequences plus their label tables.

/// Static instruction descriptor.
pub mod instruction;

/// Opcode and unit-type enums.
pub mod opcode;

/// Program container.
pub mod program;

pub use instruction::{Instruction, Target};
pub use opcode::{Opcode, OperandForm, UnitType};
pub use program::Program;
