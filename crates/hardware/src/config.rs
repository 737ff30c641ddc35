//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** The reference machine (unit counts and per-opcode latencies).
//! 2. **Machine Model:** Opcode-to-unit, opcode-to-latency and unit-count tables.
//! 3. **General Options:** Tracing, the dynamic instruction ceiling and loader leniency.
//!
//! Configuration is an immutable value injected into the engine. It can be built in
//! code, taken from `Config::default()`, or deserialized from JSON. JSON tables are
//! merged over the reference machine, so a file only needs the entries it changes.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{ConfigError, SimError};
use crate::isa::{Opcode, UnitType};

/// Default configuration constants for the reference machine.
mod defaults {
    /// Number of integer ALUs.
    pub const ALU_UNITS: usize = 2;

    /// Number of multiply/divide units.
    pub const MUL_DIV_UNITS: usize = 1;

    /// Number of load/store units.
    pub const LOAD_STORE_UNITS: usize = 1;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use ilpsim_core::config::Config;
/// use ilpsim_core::isa::{Opcode, UnitType};
///
/// let json = r#"{
///     "general": { "max_instructions": 1000 },
///     "machine": {
///         "units": { "ALU": 1 },
///         "latency": { "mul": 1 }
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.max_instructions, Some(1000));
/// assert_eq!(config.machine.unit_count(UnitType::Alu), Some(1));
/// assert_eq!(config.machine.latency(Opcode::Mul), Some(1));
/// assert_eq!(config.machine.latency(Opcode::Div), Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Machine timing model.
    #[serde(default)]
    pub machine: MachineConfig,
}

impl Config {
    /// Parses a JSON configuration and validates its machine model.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.machine.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log every issued instruction at `info` level instead of `debug`.
    #[serde(default)]
    pub trace_instructions: bool,

    /// Abort with an error after this many dynamic instructions. `None` runs unbounded.
    #[serde(default)]
    pub max_instructions: Option<u64>,

    /// Skip source lines that match no instruction shape instead of rejecting them.
    #[serde(default)]
    pub skip_unrecognized_lines: bool,
}

/// Machine timing model: which unit each opcode occupies, for how long, and how
/// many instances of each unit type exist.
///
/// Unit types whose [`UnitType::is_unbounded`] is true need no count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MachineOverrides")]
pub struct MachineConfig {
    /// Instance count per finite unit type.
    pub units: BTreeMap<UnitType, usize>,
    /// Latency in cycles per opcode.
    pub latency: BTreeMap<Opcode, u64>,
    /// Unit type each opcode executes on.
    pub op_to_unit: BTreeMap<Opcode, UnitType>,
}

impl Default for MachineConfig {
    /// Creates the reference machine.
    ///
    /// Two ALUs, one multiply/divide unit, one load/store unit and an unbounded
    /// branch unit; every opcode mapped with its reference latency.
    fn default() -> Self {
        let units = BTreeMap::from([
            (UnitType::Alu, defaults::ALU_UNITS),
            (UnitType::MulDiv, defaults::MUL_DIV_UNITS),
            (UnitType::LoadStore, defaults::LOAD_STORE_UNITS),
        ]);
        let latency = Opcode::ALL
            .into_iter()
            .map(|op| (op, op.default_latency()))
            .collect();
        let op_to_unit = Opcode::ALL
            .into_iter()
            .map(|op| (op, op.default_unit()))
            .collect();
        Self {
            units,
            latency,
            op_to_unit,
        }
    }
}

impl MachineConfig {
    /// Sets the instance count of a unit type.
    #[must_use]
    pub fn with_units(mut self, unit: UnitType, count: usize) -> Self {
        let _ = self.units.insert(unit, count);
        self
    }

    /// Sets the latency of an opcode.
    #[must_use]
    pub fn with_latency(mut self, op: Opcode, cycles: u64) -> Self {
        let _ = self.latency.insert(op, cycles);
        self
    }

    /// Maps an opcode to a unit type.
    #[must_use]
    pub fn with_unit_for(mut self, op: Opcode, unit: UnitType) -> Self {
        let _ = self.op_to_unit.insert(op, unit);
        self
    }

    /// Removes an opcode from the machine; the loader will then reject it.
    #[must_use]
    pub fn without_opcode(mut self, op: Opcode) -> Self {
        let _ = self.op_to_unit.remove(&op);
        let _ = self.latency.remove(&op);
        self
    }

    /// Unit type an opcode runs on, if the machine supports it.
    pub fn unit_for(&self, op: Opcode) -> Option<UnitType> {
        self.op_to_unit.get(&op).copied()
    }

    /// Latency of an opcode, if configured.
    pub fn latency(&self, op: Opcode) -> Option<u64> {
        self.latency.get(&op).copied()
    }

    /// Instance count of a finite unit type.
    pub fn unit_count(&self, unit: UnitType) -> Option<usize> {
        self.units.get(&unit).copied()
    }

    /// Returns `true` if the machine has a unit for `op`.
    pub fn supports(&self, op: Opcode) -> bool {
        self.op_to_unit.contains_key(&op)
    }

    /// Checks that every supported opcode can actually be scheduled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((&unit, _)) = self.units.iter().find(|&(_, &n)| n == 0) {
            return Err(ConfigError::ZeroUnits(unit));
        }
        for (&op, &unit) in &self.op_to_unit {
            match self.latency(op) {
                None => return Err(ConfigError::MissingLatency(op)),
                Some(0) => return Err(ConfigError::ZeroLatency(op)),
                Some(_) => {}
            }
            if !unit.is_unbounded() && !self.units.contains_key(&unit) {
                return Err(ConfigError::UnknownUnit { opcode: op, unit });
            }
        }
        Ok(())
    }
}

/// Deserialization form of [`MachineConfig`]: every table is optional and its
/// entries override the reference machine.
#[derive(Debug, Default, Deserialize)]
struct MachineOverrides {
    #[serde(default)]
    units: BTreeMap<UnitType, usize>,
    #[serde(default)]
    latency: BTreeMap<Opcode, u64>,
    #[serde(default)]
    op_to_unit: BTreeMap<Opcode, UnitType>,
}

impl From<MachineOverrides> for MachineConfig {
    fn from(o: MachineOverrides) -> Self {
        let mut config = Self::default();
        config.units.extend(o.units);
        config.latency.extend(o.latency);
        config.op_to_unit.extend(o.op_to_unit);
        config
    }
}
