//! Static instruction descriptor.
//!
//! An `Instruction` is produced once by the loader and never mutated afterwards.
//! A loop executes the same static instruction many times; each of those dynamic
//! instances is recorded separately in the execution trace instead of being
//! written back into this struct.

use std::fmt;

use super::opcode::{OperandForm, Opcode};

/// Resolved branch or jump destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    /// Label name as written in the source.
    pub label: String,
    /// Static index of the first instruction after the label.
    pub pc: usize,
}

/// One static instruction of a program.
///
/// Field roles follow the internal encoding, not the surface syntax. In
/// particular a store keeps its base-address register in `rd` and the value
/// register in `rs1`, and a shift by immediate reads and writes `rd` (the loader
/// copies it into `rs1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Operation.
    pub opcode: Opcode,
    /// Destination register (base address register for stores).
    pub rd: Option<String>,
    /// First source register (value register for stores).
    pub rs1: Option<String>,
    /// Second source register.
    pub rs2: Option<String>,
    /// Signed immediate operand.
    pub imm: Option<i64>,
    /// Signed memory offset, 0 when absent.
    pub offset: i64,
    /// Branch or jump destination.
    pub target: Option<Target>,
    /// Source text used for display.
    pub text: String,
    /// 1-based source line, 0 for instructions built in code.
    pub line: usize,
}

impl Instruction {
    /// Creates an instruction with no operands.
    pub const fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            rd: None,
            rs1: None,
            rs2: None,
            imm: None,
            offset: 0,
            target: None,
            text: String::new(),
            line: 0,
        }
    }

    /// Sets the destination register.
    #[must_use]
    pub fn with_rd(mut self, reg: impl Into<String>) -> Self {
        self.rd = Some(reg.into());
        self
    }

    /// Sets the first source register.
    #[must_use]
    pub fn with_rs1(mut self, reg: impl Into<String>) -> Self {
        self.rs1 = Some(reg.into());
        self
    }

    /// Sets the second source register.
    #[must_use]
    pub fn with_rs2(mut self, reg: impl Into<String>) -> Self {
        self.rs2 = Some(reg.into());
        self
    }

    /// Sets the immediate.
    #[must_use]
    pub const fn with_imm(mut self, imm: i64) -> Self {
        self.imm = Some(imm);
        self
    }

    /// Sets the memory offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Sets a resolved branch target.
    #[must_use]
    pub fn with_target(mut self, label: impl Into<String>, pc: usize) -> Self {
        self.target = Some(Target {
            label: label.into(),
            pc,
        });
        self
    }

    /// Sets the display text and source line.
    #[must_use]
    pub fn with_source(mut self, text: impl Into<String>, line: usize) -> Self {
        self.text = text.into();
        self.line = line;
        self
    }

    /// Registers this instruction reads.
    ///
    /// Both source fields when present; a store additionally reads its `rd`
    /// field, which holds the base address.
    pub fn read_set(&self) -> impl Iterator<Item = &str> + '_ {
        let base = if self.opcode.is_store() {
            self.rd.as_deref()
        } else {
            None
        };
        [self.rs1.as_deref(), self.rs2.as_deref(), base]
            .into_iter()
            .flatten()
    }

    /// Register this instruction writes, if any.
    pub fn write_reg(&self) -> Option<&str> {
        if self.opcode.writes_register() {
            self.rd.as_deref()
        } else {
            None
        }
    }

    /// Canonical assembly text rebuilt from the fields.
    pub fn canonical_text(&self) -> String {
        let reg = |r: &Option<String>| r.as_deref().unwrap_or("?").to_owned();
        let imm = self.imm.unwrap_or(0);
        let label = self.target.as_ref().map_or("?", |t| t.label.as_str());
        let op = self.opcode;
        match op.form() {
            OperandForm::ShiftImm | OperandForm::LoadImm => {
                format!("{op} {}, #{imm}", reg(&self.rd))
            }
            OperandForm::Jump => format!("{op} {label}"),
            OperandForm::Branch => {
                format!("{op} {}, {}, {label}", reg(&self.rs1), reg(&self.rs2))
            }
            OperandForm::RegReg => format!(
                "{op} {}, {}, {}",
                reg(&self.rd),
                reg(&self.rs1),
                reg(&self.rs2)
            ),
            OperandForm::Memory if op.is_store() => {
                format!(
                    "{op} {}, {}({})",
                    reg(&self.rs1),
                    self.offset,
                    reg(&self.rd)
                )
            }
            OperandForm::Memory => {
                format!(
                    "{op} {}, {}({})",
                    reg(&self.rd),
                    self.offset,
                    reg(&self.rs1)
                )
            }
            OperandForm::RegImm => {
                format!("{op} {}, {}, #{imm}", reg(&self.rd), reg(&self.rs1))
            }
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            f.write_str(&self.canonical_text())
        } else {
            f.write_str(&self.text)
        }
    }
}
