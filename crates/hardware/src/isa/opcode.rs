//! Opcodes and functional-unit types.
//!
//! This module defines the closed instruction set and how each opcode is classified. It provides:
//! 1. **Opcodes:** The mnemonic enum with text conversion in both directions.
//! 2. **Operand Forms:** The surface shape each opcode accepts in source text.
//! 3. **Unit Types:** The typed functional-unit classes an opcode can occupy.
//! 4. **Reference Tables:** Default unit and latency per opcode for the reference machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operand shape an opcode accepts in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandForm {
    /// `op rd, #imm` where `rd` is both source and destination.
    ShiftImm,
    /// `op label`.
    Jump,
    /// `op rs1, rs2, label`.
    Branch,
    /// `op rd, rs1, rs2`.
    RegReg,
    /// `op rd, offset(rs1)`.
    Memory,
    /// `op rd, rs1, #imm`.
    RegImm,
    /// `op rd, #imm`.
    LoadImm,
}

impl OperandForm {
    /// Human-readable operand syntax, used in diagnostics.
    pub const fn syntax(self) -> &'static str {
        match self {
            Self::ShiftImm | Self::LoadImm => "`rd, #imm`",
            Self::Jump => "`label`",
            Self::Branch => "`rs1, rs2, label`",
            Self::RegReg => "`rd, rs1, rs2`",
            Self::Memory => "`reg, offset(base)`",
            Self::RegImm => "`rd, rs1, #imm`",
        }
    }
}

/// Typed functional-unit class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum UnitType {
    /// Integer add/sub, logic, shifts, load-immediate.
    Alu,
    /// Integer multiply and divide.
    MulDiv,
    /// Memory loads and stores.
    LoadStore,
    /// Branches and jumps. Always has a free instance.
    Branch,
}

impl UnitType {
    /// Every unit type, in table order.
    pub const ALL: [Self; 4] = [Self::Alu, Self::MulDiv, Self::LoadStore, Self::Branch];

    /// Configuration name of the unit type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Alu => "ALU",
            Self::MulDiv => "MUL_DIV",
            Self::LoadStore => "LOAD_STORE",
            Self::Branch => "BRANCH",
        }
    }

    /// Returns `true` for unit types with an effectively unbounded instance count.
    ///
    /// Instructions on such a unit never wait for a free instance.
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Branch)
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|u| u.name() == norm)
            .ok_or_else(|| format!("unknown unit type '{s}'"))
    }
}

impl TryFrom<String> for UnitType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<UnitType> for &'static str {
    fn from(u: UnitType) -> Self {
        u.name()
    }
}

/// Instruction mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Opcode {
    /// `rd = rs1 + rs2`
    Add,
    /// `rd = rs1 - rs2`
    Sub,
    /// `rd = rs1 * rs2`
    Mul,
    /// `rd = floor(rs1 / rs2)`
    Div,
    /// `rd = rs1 & rs2`
    And,
    /// `rd = rs1 | rs2`
    Or,
    /// `rd = rs1 ^ rs2`
    Xor,
    /// `rd = rs1 + imm`
    Addi,
    /// `rd = rs1 - imm`
    Subi,
    /// `rd = rs1 * imm`
    Muli,
    /// `rd = floor(rs1 / imm)`
    Divi,
    /// `rd = rs1 & imm`
    Andi,
    /// `rd = rs1 | imm`
    Ori,
    /// `rd = rs1 ^ imm`
    Xori,
    /// `rd = rd << imm`
    Shl,
    /// `rd = rd >> imm` (arithmetic)
    Shr,
    /// `rd = imm`
    Li,
    /// `rd = mem[rs1 + offset]`
    Lw,
    /// `mem[base + offset] = src`
    Sw,
    /// Branch if equal.
    Beq,
    /// Branch if not equal.
    Bne,
    /// Branch if greater than.
    Bgt,
    /// Branch if greater or equal.
    Bge,
    /// Branch if less than.
    Blt,
    /// Branch if less or equal.
    Ble,
    /// Unconditional jump.
    Jmp,
}

impl Opcode {
    /// Every opcode, in mnemonic table order.
    pub const ALL: [Self; 26] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Addi,
        Self::Subi,
        Self::Muli,
        Self::Divi,
        Self::Andi,
        Self::Ori,
        Self::Xori,
        Self::Shl,
        Self::Shr,
        Self::Li,
        Self::Lw,
        Self::Sw,
        Self::Beq,
        Self::Bne,
        Self::Bgt,
        Self::Bge,
        Self::Blt,
        Self::Ble,
        Self::Jmp,
    ];

    /// Lowercase assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Addi => "addi",
            Self::Subi => "subi",
            Self::Muli => "muli",
            Self::Divi => "divi",
            Self::Andi => "andi",
            Self::Ori => "ori",
            Self::Xori => "xori",
            Self::Shl => "shl",
            Self::Shr => "shr",
            Self::Li => "li",
            Self::Lw => "lw",
            Self::Sw => "sw",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Bgt => "bgt",
            Self::Bge => "bge",
            Self::Blt => "blt",
            Self::Ble => "ble",
            Self::Jmp => "jmp",
        }
    }

    /// Operand shape this opcode accepts.
    pub const fn form(self) -> OperandForm {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::And | Self::Or | Self::Xor => {
                OperandForm::RegReg
            }
            Self::Addi
            | Self::Subi
            | Self::Muli
            | Self::Divi
            | Self::Andi
            | Self::Ori
            | Self::Xori => OperandForm::RegImm,
            Self::Shl | Self::Shr => OperandForm::ShiftImm,
            Self::Li => OperandForm::LoadImm,
            Self::Lw | Self::Sw => OperandForm::Memory,
            Self::Beq | Self::Bne | Self::Bgt | Self::Bge | Self::Blt | Self::Ble => {
                OperandForm::Branch
            }
            Self::Jmp => OperandForm::Jump,
        }
    }

    /// Returns `true` for stores, which write memory instead of a register.
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Sw)
    }

    /// Returns `true` for loads.
    pub const fn is_load(self) -> bool {
        matches!(self, Self::Lw)
    }

    /// Returns `true` for conditional branches.
    pub const fn is_branch(self) -> bool {
        matches!(self.form(), OperandForm::Branch)
    }

    /// Returns `true` for any opcode that can redirect the program counter.
    pub const fn is_control(self) -> bool {
        matches!(self.form(), OperandForm::Branch | OperandForm::Jump)
    }

    /// Returns `true` if the opcode writes its destination register.
    pub const fn writes_register(self) -> bool {
        !self.is_store() && !self.is_control()
    }

    /// Unit type of this opcode on the reference machine.
    pub const fn default_unit(self) -> UnitType {
        match self {
            Self::Mul | Self::Div | Self::Muli | Self::Divi => UnitType::MulDiv,
            Self::Lw | Self::Sw => UnitType::LoadStore,
            op if op.is_control() => UnitType::Branch,
            _ => UnitType::Alu,
        }
    }

    /// Latency in cycles of this opcode on the reference machine.
    pub const fn default_latency(self) -> u64 {
        match self {
            Self::Mul | Self::Muli => 3,
            Self::Div | Self::Divi => 10,
            Self::Lw | Self::Sw | Self::Li => 5,
            _ => 1,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Opcode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic() == lower)
            .ok_or_else(|| format!("unknown opcode '{s}'"))
    }
}

impl TryFrom<String> for Opcode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Opcode> for &'static str {
    fn from(op: Opcode) -> Self {
        op.mnemonic()
    }
}
