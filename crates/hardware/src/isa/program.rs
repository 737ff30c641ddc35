//! Loaded program: static instruction list plus label table.

use std::collections::HashMap;
use std::path::Path;

use crate::common::SimError;
use crate::config::{GeneralConfig, MachineConfig};
use crate::sim::loader::{self, LoaderOptions};

use super::instruction::Instruction;

/// Ordered static instructions indexed by program counter, plus the label table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Instructions in program order.
    pub instructions: Vec<Instruction>,
    /// Label name to the index of the first instruction following it.
    pub labels: HashMap<String, usize>,
}

impl Program {
    /// Builds a program from already-constructed instructions, with no labels.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            labels: HashMap::new(),
        }
    }

    /// Parses source text against the reference machine with default loader options.
    pub fn parse(source: &str) -> Result<Self, crate::common::ParseError> {
        loader::load(source, &MachineConfig::default(), &LoaderOptions::default())
    }

    /// Reads and parses a source file.
    pub fn from_file(
        path: impl AsRef<Path>,
        machine: &MachineConfig,
        general: &GeneralConfig,
    ) -> Result<Self, SimError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let opts = LoaderOptions::from(general);
        Ok(loader::load(&source, machine, &opts)?)
    }

    /// Fetches the instruction at `pc`, or `None` past the end.
    pub fn fetch(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    /// Looks up a label's instruction index.
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Number of static instructions.
    pub const fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program has no instructions.
    pub const fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
