//! Program Loader.
//!
//! This module turns assembly source into a [`Program`]. It performs:
//! 1. **Tokenizing:** Each line is split into a mnemonic and typed operands (see [`lexer`]).
//! 2. **Shape Classification:** Operand sequences are matched against the instruction
//!    shapes in a fixed precedence order; the first match wins.
//! 3. **Validation:** Opcodes are checked against the instruction set, their operand
//!    form, and the machine configuration.
//! 4. **Label Resolution:** Labels are collected over the whole file before any branch
//!    target is resolved, so forward references are valid.
//!
//! Shape precedence:
//!
//! | # | Shape | Syntax |
//! |---|-------|--------|
//! | 1 | shift by immediate | `op rd, #imm` (shift opcodes only) |
//! | 2 | jump | `op label` |
//! | 3 | conditional branch | `op rs1, rs2, label` (branch opcodes only) |
//! | 4 | register-register | `op rd, rs1, rs2` |
//! | 5 | memory | `op rd, offset(rs1)` |
//! | 6 | register-immediate | `op rd, rs1, #imm` |
//! | 7 | load immediate | `op rd, #imm` |

use std::collections::HashMap;

use crate::common::ParseError;
use crate::config::{GeneralConfig, MachineConfig};
use crate::isa::{Instruction, Opcode, OperandForm, Program};

use super::lexer::{self, Operand, SourceLine};

/// Loader behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Skip lines that match no shape (with a warning) instead of failing.
    pub skip_unrecognized_lines: bool,
}

impl From<&GeneralConfig> for LoaderOptions {
    fn from(general: &GeneralConfig) -> Self {
        Self {
            skip_unrecognized_lines: general.skip_unrecognized_lines,
        }
    }
}

/// An instruction whose branch label has not been looked up yet.
struct Pending {
    inst: Instruction,
    label: Option<String>,
}

/// Parses `source` into a program for `machine`.
///
/// # Arguments
///
/// * `source` - Assembly text.
/// * `machine` - Machine model; opcodes it has no unit for are rejected.
/// * `opts` - Loader switches.
///
/// # Returns
///
/// The loaded program, or the first [`ParseError`] in source order. Label
/// errors are reported after all lines have been read.
pub fn load(
    source: &str,
    machine: &MachineConfig,
    opts: &LoaderOptions,
) -> Result<Program, ParseError> {
    let mut pending: Vec<Pending> = Vec::new();
    let mut labels: HashMap<String, usize> = HashMap::new();
    let mut label_lines: HashMap<String, usize> = HashMap::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let text = lexer::strip_comment(raw);

        match lexer::tokenize(raw) {
            SourceLine::Blank => {}
            SourceLine::Label(name) => {
                if !lexer::is_ident(name) {
                    return Err(ParseError::InvalidLabel {
                        line,
                        text: text.to_owned(),
                    });
                }
                if let Some(&first) = label_lines.get(name) {
                    return Err(ParseError::DuplicateLabel {
                        line,
                        first,
                        label: name.to_owned(),
                        text: text.to_owned(),
                    });
                }
                let _ = label_lines.insert(name.to_owned(), line);
                let _ = labels.insert(name.to_owned(), pending.len());
            }
            SourceLine::Instruction { mnemonic, operands } => {
                match parse_instruction(mnemonic, &operands, line, text, machine) {
                    Ok(p) => pending.push(p),
                    Err(ParseError::UnrecognizedLine { line, text })
                        if opts.skip_unrecognized_lines =>
                    {
                        tracing::warn!(line, %text, "skipping unrecognized line");
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    let instructions = pending
        .into_iter()
        .map(|Pending { mut inst, label }| {
            if let Some(label) = label {
                let Some(&pc) = labels.get(&label) else {
                    return Err(ParseError::UndefinedLabel {
                        line: inst.line,
                        label,
                        text: inst.text,
                    });
                };
                inst = inst.with_target(label, pc);
            }
            Ok(inst)
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        instructions = instructions.len(),
        labels = labels.len(),
        "program loaded"
    );

    Ok(Program {
        instructions,
        labels,
    })
}

/// Matches an operand sequence against the shapes in precedence order.
///
/// `op` gates the two shapes that share a token pattern with a later shape:
/// shift-by-immediate (vs load immediate) and conditional branch (vs
/// register-register).
fn classify(op: Opcode, operands: &[Operand<'_>]) -> Option<OperandForm> {
    let is = |form: OperandForm| op.form() == form;
    match operands {
        [Operand::Ident(_), Operand::Imm(_)] if is(OperandForm::ShiftImm) => {
            Some(OperandForm::ShiftImm)
        }
        [Operand::Ident(_)] => Some(OperandForm::Jump),
        [Operand::Ident(_), Operand::Ident(_), Operand::Ident(_)] if is(OperandForm::Branch) => {
            Some(OperandForm::Branch)
        }
        [Operand::Ident(_), Operand::Ident(_), Operand::Ident(_)] => Some(OperandForm::RegReg),
        [Operand::Ident(_), Operand::Mem { .. }] => Some(OperandForm::Memory),
        [Operand::Ident(_), Operand::Ident(_), Operand::Imm(_)] => Some(OperandForm::RegImm),
        [Operand::Ident(_), Operand::Imm(_)] => Some(OperandForm::LoadImm),
        _ => None,
    }
}

fn parse_instruction(
    mnemonic: &str,
    operands: &[Operand<'_>],
    line: usize,
    text: &str,
    machine: &MachineConfig,
) -> Result<Pending, ParseError> {
    let op = mnemonic.parse::<Opcode>().ok();
    let unrecognized = || ParseError::UnrecognizedLine {
        line,
        text: text.to_owned(),
    };

    if !lexer::is_ident(mnemonic) {
        return Err(unrecognized());
    }
    // An unknown mnemonic is fatal whatever its operands look like.
    let Some(op) = op else {
        return Err(ParseError::UnknownOpcode {
            line,
            mnemonic: mnemonic.to_owned(),
            text: text.to_owned(),
        });
    };
    let form = classify(op, operands).ok_or_else(unrecognized)?;
    if op.form() != form {
        return Err(ParseError::OperandMismatch {
            line,
            opcode: op,
            expected: op.form().syntax(),
            text: text.to_owned(),
        });
    }
    if !machine.supports(op) {
        return Err(ParseError::UnsupportedOpcode {
            line,
            opcode: op,
            text: text.to_owned(),
        });
    }

    let int = |s: &str| {
        lexer::parse_int(s).ok_or_else(|| ParseError::InvalidImmediate {
            line,
            value: s.to_owned(),
            text: text.to_owned(),
        })
    };

    let inst = Instruction::new(op).with_source(text, line);
    let mut label = None;
    let inst = match (form, operands) {
        (OperandForm::ShiftImm, [Operand::Ident(rd), Operand::Imm(imm)]) => {
            inst.with_rd(*rd).with_rs1(*rd).with_imm(int(*imm)?)
        }
        (OperandForm::Jump, [Operand::Ident(target)]) => {
            label = Some((*target).to_owned());
            inst
        }
        (
            OperandForm::Branch,
            [Operand::Ident(rs1), Operand::Ident(rs2), Operand::Ident(target)],
        ) => {
            label = Some((*target).to_owned());
            inst.with_rs1(*rs1).with_rs2(*rs2)
        }
        (OperandForm::RegReg, [Operand::Ident(rd), Operand::Ident(rs1), Operand::Ident(rs2)]) => {
            inst.with_rd(*rd).with_rs1(*rs1).with_rs2(*rs2)
        }
        (OperandForm::Memory, [Operand::Ident(reg), Operand::Mem { offset, base }]) => {
            let inst = inst.with_offset(int(*offset)?);
            if op.is_store() {
                // `sw src, off(base)` keeps the base in `rd` and the value in `rs1`.
                inst.with_rd(*base).with_rs1(*reg)
            } else {
                inst.with_rd(*reg).with_rs1(*base)
            }
        }
        (OperandForm::RegImm, [Operand::Ident(rd), Operand::Ident(rs1), Operand::Imm(imm)]) => {
            inst.with_rd(*rd).with_rs1(*rs1).with_imm(int(*imm)?)
        }
        (OperandForm::LoadImm, [Operand::Ident(rd), Operand::Imm(imm)]) => {
            inst.with_rd(*rd).with_imm(int(*imm)?)
        }
        _ => return Err(unrecognized()),
    };

    Ok(Pending { inst, label })
}
