//! Control-Flow Resolver.
//!
//! Decides the next program counter once an instruction has committed. Branch
//! conditions read the architectural register file, which already holds every
//! older instruction's result.

use serde::Serialize;

use crate::common::{ExecError, RegisterFile};
use crate::isa::{Instruction, Opcode};

/// Control-flow outcome of one dynamic instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "target")]
pub enum Outcome {
    /// Fall through to `pc + 1`.
    Sequential,
    /// Redirect to a static instruction index.
    Taken(usize),
}

impl Outcome {
    /// Program counter after an instruction at `pc` with this outcome.
    pub const fn next_pc(self, pc: usize) -> usize {
        match self {
            Self::Sequential => pc + 1,
            Self::Taken(target) => target,
        }
    }

    /// Returns `true` if control was redirected.
    pub const fn is_taken(self) -> bool {
        matches!(self, Self::Taken(_))
    }
}

/// Resolves the outcome of `inst` at static index `pc`.
///
/// # Returns
///
/// [`Outcome::Sequential`] for every non-control opcode. Branches compare the
/// current values of `rs1` and `rs2`; `jmp` is always taken. A control opcode
/// with no resolved target fails with [`ExecError::UnresolvedTarget`].
pub fn resolve(pc: usize, inst: &Instruction, regs: &RegisterFile) -> Result<Outcome, ExecError> {
    let op = inst.opcode;
    if !op.is_control() {
        return Ok(Outcome::Sequential);
    }

    let target = inst
        .target
        .as_ref()
        .map(|t| t.pc)
        .ok_or_else(|| ExecError::UnresolvedTarget {
            pc,
            label: inst
                .target
                .as_ref()
                .map_or_else(String::new, |t| t.label.clone()),
        })?;

    if op == Opcode::Jmp {
        return Ok(Outcome::Taken(target));
    }

    let read = |field: &Option<String>, operand| {
        field
            .as_deref()
            .map(|r| regs.read(r))
            .ok_or(ExecError::MissingOperand {
                pc,
                opcode: op,
                operand,
            })
    };
    let a = read(&inst.rs1, "rs1")?;
    let b = read(&inst.rs2, "rs2")?;

    let taken = match op {
        Opcode::Beq => a == b,
        Opcode::Bne => a != b,
        Opcode::Bgt => a > b,
        Opcode::Bge => a >= b,
        Opcode::Blt => a < b,
        Opcode::Ble => a <= b,
        _ => false,
    };

    Ok(if taken {
        Outcome::Taken(target)
    } else {
        Outcome::Sequential
    })
}
