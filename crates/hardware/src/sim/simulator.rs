//! Simulator: ties configuration, loader and engine together.
//!
//! The machine model is validated once and shared with every engine the
//! simulator creates, so one `Simulator` can load and run many programs.

use std::path::Path;
use std::sync::Arc;

use crate::common::{ExecError, Memory, ParseError, RegisterFile, SimError};
use crate::config::{Config, GeneralConfig, MachineConfig};
use crate::core::{Engine, SimOutcome};
use crate::isa::Program;

use super::loader::{self, LoaderOptions};

/// Top-level simulator: validated machine model plus general options.
#[derive(Debug, Clone)]
pub struct Simulator {
    machine: Arc<MachineConfig>,
    general: GeneralConfig,
}

impl Default for Simulator {
    /// Reference machine, unbounded runs, strict loading.
    fn default() -> Self {
        Self {
            machine: Arc::new(MachineConfig::default()),
            general: GeneralConfig::default(),
        }
    }
}

impl Simulator {
    /// Creates a simulator, rejecting an invalid machine model.
    pub fn new(config: Config) -> Result<Self, SimError> {
        config.machine.validate()?;
        Ok(Self {
            machine: Arc::new(config.machine),
            general: config.general,
        })
    }

    /// Shared machine model.
    pub const fn machine(&self) -> &Arc<MachineConfig> {
        &self.machine
    }

    /// General options.
    pub const fn general(&self) -> &GeneralConfig {
        &self.general
    }

    /// Parses assembly source against this simulator's machine model.
    pub fn load(&self, source: &str) -> Result<Program, ParseError> {
        loader::load(source, &self.machine, &LoaderOptions::from(&self.general))
    }

    /// Reads and parses an assembly file.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Program, SimError> {
        Program::from_file(path, &self.machine, &self.general)
    }

    /// Builds an engine for `program` with the given initial state.
    pub fn engine(&self, program: Program, regs: RegisterFile, mem: Memory) -> Engine {
        Engine::new(Arc::clone(&self.machine), program, regs, mem).with_general(&self.general)
    }

    /// Runs `program` to completion.
    pub fn run(
        &self,
        program: Program,
        regs: RegisterFile,
        mem: Memory,
    ) -> Result<SimOutcome, ExecError> {
        let mut engine = self.engine(program, regs, mem);
        engine.run()?;
        Ok(engine.finish())
    }

    /// Parses and runs `source` from an empty register file and memory.
    pub fn run_source(&self, source: &str) -> Result<SimOutcome, SimError> {
        let program = self.load(source)?;
        Ok(self.run(program, RegisterFile::new(), Memory::new())?)
    }
}
