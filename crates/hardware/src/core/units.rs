//! Functional-Unit Pool.
//!
//! Tracks, for every instance of every finite unit type, the last cycle on
//! which it is busy. Unbounded unit types (the branch unit) keep no state: a
//! request for one always succeeds immediately on a fresh instance.

use std::collections::BTreeMap;

use crate::config::MachineConfig;
use crate::isa::UnitType;

/// A unit instance chosen for an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitGrant {
    /// Unit type.
    pub unit: UnitType,
    /// Instance index within the type.
    pub index: usize,
    /// Last busy cycle of the instance before this instruction; 0 if never used.
    pub busy_until: u64,
}

/// Busy-until bookkeeping for all unit instances.
#[derive(Debug, Clone, Default)]
pub struct FunctionalUnitPool {
    busy_until: BTreeMap<UnitType, Vec<u64>>,
    issued: BTreeMap<UnitType, u64>,
}

impl FunctionalUnitPool {
    /// Creates a pool with every instance free, sized from the machine model.
    pub fn new(machine: &MachineConfig) -> Self {
        let busy_until = machine
            .units
            .iter()
            .filter(|(unit, _)| !unit.is_unbounded())
            .map(|(&unit, &count)| (unit, vec![0; count]))
            .collect();
        Self {
            busy_until,
            issued: BTreeMap::new(),
        }
    }

    /// Selects the instance of `unit` that frees up earliest.
    ///
    /// Ties go to the lowest index. Returns `None` for a finite unit type
    /// with no instances.
    pub fn select(&self, unit: UnitType) -> Option<UnitGrant> {
        if unit.is_unbounded() {
            let index = self.issued.get(&unit).copied().unwrap_or(0) as usize;
            return Some(UnitGrant {
                unit,
                index,
                busy_until: 0,
            });
        }
        let slots = self.busy_until.get(&unit)?;
        let (index, &busy_until) = slots
            .iter()
            .enumerate()
            .min_by_key(|&(i, &until)| (until, i))?;
        Some(UnitGrant {
            unit,
            index,
            busy_until,
        })
    }

    /// Marks a granted instance busy through cycle `until`.
    ///
    /// Busy-until never moves backwards.
    pub fn occupy(&mut self, grant: UnitGrant, until: u64) {
        *self.issued.entry(grant.unit).or_insert(0) += 1;
        if let Some(slot) = self
            .busy_until
            .get_mut(&grant.unit)
            .and_then(|slots| slots.get_mut(grant.index))
        {
            *slot = (*slot).max(until);
        }
    }

    /// Busy-until cycles of every instance of `unit`.
    pub fn busy_until(&self, unit: UnitType) -> &[u64] {
        self.busy_until.get(&unit).map_or(&[], Vec::as_slice)
    }

    /// Number of instructions issued to `unit` so far.
    pub fn issued(&self, unit: UnitType) -> u64 {
        self.issued.get(&unit).copied().unwrap_or(0)
    }
}
