//! Common utilities and types used throughout the simulator.
//!
//! This module provides the building blocks shared by the loader and the engine. It includes:
//! 1. **Error Handling:** Parse, execution, configuration and top-level error types.
//! 2. **Register Management:** The open-namespace architectural register file.
//! 3. **Memory:** Sparse word-addressed data memory.

/// Error types for every stage of a simulation.
pub mod error;

/// Sparse data memory.
pub mod memory;

/// Register file implementation.
pub mod reg;

pub use error::{ConfigError, ExecError, ParseError, SimError};
pub use memory::Memory;
pub use reg::RegisterFile;
