//! Commit Unit.
//!
//! Computes an instruction's architectural effect and applies it. It provides:
//! 1. **Effect Computation:** A pure function of the instruction, register file and memory.
//! 2. **Application:** Writes the effect to the register file or memory.
//! 3. **Integer Semantics:** Wrapping 64-bit arithmetic, floor division and saturating shifts.
//!
//! Effects are applied when the instruction issues, not when its latency has
//! elapsed; the scoreboard is what keeps dependants from issuing early.

use crate::common::{ExecError, Memory, RegisterFile};
use crate::isa::{Instruction, Opcode};

/// Architectural effect of one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// No architectural change (branches and jumps).
    None,
    /// Write `value` to register `reg`.
    Register {
        /// Destination register.
        reg: String,
        /// Value written.
        value: i64,
    },
    /// Store `value` at `addr`.
    Memory {
        /// Target address.
        addr: i64,
        /// Value stored.
        value: i64,
    },
}

/// Integer division rounding toward negative infinity.
///
/// Returns `None` for a zero divisor. `i64::MIN / -1` wraps to `i64::MIN`.
///
/// # Examples
///
/// ```
/// use ilpsim_core::core::commit::floor_div;
///
/// assert_eq!(floor_div(-7, 2), Some(-4));
/// assert_eq!(floor_div(7, -2), Some(-4));
/// assert_eq!(floor_div(-7, -2), Some(3));
/// assert_eq!(floor_div(1, 0), None);
/// ```
pub const fn floor_div(a: i64, b: i64) -> Option<i64> {
    if b == 0 {
        return None;
    }
    let q = a.wrapping_div(b);
    if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

/// Logical left shift; amounts of 64 or more yield 0.
const fn shift_left(val: i64, amount: u32) -> i64 {
    match val.checked_shl(amount) {
        Some(v) => v,
        None => 0,
    }
}

/// Arithmetic right shift; amounts of 64 or more yield 0 or -1 by sign.
const fn shift_right(val: i64, amount: u32) -> i64 {
    match val.checked_shr(amount) {
        Some(v) => v,
        None if val < 0 => -1,
        None => 0,
    }
}

/// Computes the effect of `inst` against the current architectural state.
///
/// # Arguments
///
/// * `pc` - Static program counter, for diagnostics.
/// * `inst` - The instruction.
/// * `regs` - Current register values.
/// * `mem` - Current memory contents.
///
/// # Returns
///
/// The effect to apply, or an [`ExecError`] if the instruction lacks an operand
/// its opcode needs, divides by zero, or shifts by a negative amount.
pub fn compute(
    pc: usize,
    inst: &Instruction,
    regs: &RegisterFile,
    mem: &Memory,
) -> Result<Effect, ExecError> {
    let op = inst.opcode;
    let missing = |operand| ExecError::MissingOperand {
        pc,
        opcode: op,
        operand,
    };
    let reg = |field: &Option<String>, name| {
        field
            .as_deref()
            .map(|r| regs.read(r))
            .ok_or_else(|| missing(name))
    };
    let rs1 = || reg(&inst.rs1, "rs1");
    let rs2 = || reg(&inst.rs2, "rs2");
    let imm = || inst.imm.ok_or_else(|| missing("immediate"));
    let div = |a, b| {
        floor_div(a, b).ok_or_else(|| ExecError::DivisionByZero {
            pc,
            text: inst.to_string(),
        })
    };
    let shift = || {
        let amount = imm()?;
        u32::try_from(amount)
            .map(|a| a.min(64))
            .map_err(|_| ExecError::NegativeShift {
                pc,
                amount,
                text: inst.to_string(),
            })
    };

    let value = match op {
        Opcode::Add => rs1()?.wrapping_add(rs2()?),
        Opcode::Sub => rs1()?.wrapping_sub(rs2()?),
        Opcode::Mul => rs1()?.wrapping_mul(rs2()?),
        Opcode::Div => div(rs1()?, rs2()?)?,
        Opcode::And => rs1()? & rs2()?,
        Opcode::Or => rs1()? | rs2()?,
        Opcode::Xor => rs1()? ^ rs2()?,
        Opcode::Addi => rs1()?.wrapping_add(imm()?),
        Opcode::Subi => rs1()?.wrapping_sub(imm()?),
        Opcode::Muli => rs1()?.wrapping_mul(imm()?),
        Opcode::Divi => div(rs1()?, imm()?)?,
        Opcode::Andi => rs1()? & imm()?,
        Opcode::Ori => rs1()? | imm()?,
        Opcode::Xori => rs1()? ^ imm()?,
        Opcode::Shl => shift_left(rs1()?, shift()?),
        Opcode::Shr => shift_right(rs1()?, shift()?),
        Opcode::Li => imm()?,
        Opcode::Lw => mem.read(rs1()?.wrapping_add(inst.offset)),
        Opcode::Sw => {
            let base = reg(&inst.rd, "base")?;
            return Ok(Effect::Memory {
                addr: base.wrapping_add(inst.offset),
                value: rs1()?,
            });
        }
        Opcode::Beq
        | Opcode::Bne
        | Opcode::Bgt
        | Opcode::Bge
        | Opcode::Blt
        | Opcode::Ble
        | Opcode::Jmp => return Ok(Effect::None),
    };

    let rd = inst.rd.clone().ok_or_else(|| missing("rd"))?;
    Ok(Effect::Register { reg: rd, value })
}

/// Writes an effect to architectural state.
pub fn apply(effect: Effect, regs: &mut RegisterFile, mem: &mut Memory) {
    match effect {
        Effect::None => {}
        Effect::Register { reg, value } => regs.write(&reg, value),
        Effect::Memory { addr, value } => mem.write(addr, value),
    }
}
