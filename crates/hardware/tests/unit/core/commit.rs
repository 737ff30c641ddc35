//! Commit unit tests: integer semantics and effect application.

use ilpsim_core::core::commit::{Effect, apply, compute};
use ilpsim_core::isa::{Instruction, Opcode};
use ilpsim_core::{ExecError, Memory, RegisterFile};
use rstest::rstest;

fn regs() -> RegisterFile {
    RegisterFile::from([("a", -7), ("b", 2), ("big", i64::MAX), ("p", 96)])
}

fn value(inst: &Instruction) -> i64 {
    match compute(0, inst, &regs(), &Memory::from([(100, 5)])).unwrap() {
        Effect::Register { value, .. } => value,
        other => panic!("expected a register write, got {other:?}"),
    }
}

#[rstest]
#[case(Opcode::Add, -5)]
#[case(Opcode::Sub, -9)]
#[case(Opcode::Mul, -14)]
#[case(Opcode::Div, -4)]
#[case(Opcode::And, 0)]
#[case(Opcode::Or, -5)]
#[case(Opcode::Xor, -5)]
fn test_reg_reg(#[case] op: Opcode, #[case] expected: i64) {
    let inst = Instruction::new(op)
        .with_rd("d")
        .with_rs1("a")
        .with_rs2("b");
    assert_eq!(value(&inst), expected);
}

#[rstest]
#[case(Opcode::Addi, 3, -4)]
#[case(Opcode::Subi, 3, -10)]
#[case(Opcode::Muli, -3, 21)]
#[case(Opcode::Divi, 2, -4)]
#[case(Opcode::Divi, -2, 3)]
#[case(Opcode::Andi, 0xf, 9)]
#[case(Opcode::Ori, 0, -7)]
#[case(Opcode::Xori, -1, 6)]
fn test_reg_imm(#[case] op: Opcode, #[case] imm: i64, #[case] expected: i64) {
    let inst = Instruction::new(op)
        .with_rd("d")
        .with_rs1("a")
        .with_imm(imm);
    assert_eq!(value(&inst), expected);
}

#[rstest]
#[case(Opcode::Shl, 2, -28)]
#[case(Opcode::Shl, 64, 0)]
#[case(Opcode::Shl, 1000, 0)]
#[case(Opcode::Shr, 1, -4)]
#[case(Opcode::Shr, 0, -7)]
#[case(Opcode::Shr, 64, -1)]
fn test_shifts(#[case] op: Opcode, #[case] amount: i64, #[case] expected: i64) {
    let inst = Instruction::new(op)
        .with_rd("a")
        .with_rs1("a")
        .with_imm(amount);
    assert_eq!(value(&inst), expected);
}

#[test]
fn test_wrapping_overflow() {
    let inst = Instruction::new(Opcode::Addi)
        .with_rd("d")
        .with_rs1("big")
        .with_imm(1);
    assert_eq!(value(&inst), i64::MIN);
    let inst = Instruction::new(Opcode::Muli)
        .with_rd("d")
        .with_rs1("big")
        .with_imm(2);
    assert_eq!(value(&inst), -2);
}

#[test]
fn test_li_and_loads() {
    let li = Instruction::new(Opcode::Li).with_rd("d").with_imm(9);
    assert_eq!(value(&li), 9);
    let lw = Instruction::new(Opcode::Lw)
        .with_rd("d")
        .with_rs1("p")
        .with_offset(4);
    assert_eq!(value(&lw), 5);
    let unread = Instruction::new(Opcode::Lw)
        .with_rd("d")
        .with_rs1("p")
        .with_offset(-96);
    assert_eq!(value(&unread), 0);
}

#[test]
fn test_store_effect() {
    let sw = Instruction::new(Opcode::Sw)
        .with_rd("p")
        .with_rs1("a")
        .with_offset(8);
    let effect = compute(0, &sw, &regs(), &Memory::new()).unwrap();
    assert_eq!(
        effect,
        Effect::Memory {
            addr: 104,
            value: -7
        }
    );

    let mut r = regs();
    let mut mem = Memory::new();
    apply(effect, &mut r, &mut mem);
    assert_eq!(mem.read(104), -7);
    assert_eq!(r, regs());
}

#[test]
fn test_control_has_no_effect() {
    let beq = Instruction::new(Opcode::Beq)
        .with_rs1("a")
        .with_rs2("b")
        .with_target("x", 0);
    assert_eq!(compute(0, &beq, &regs(), &Memory::new()), Ok(Effect::None));
}

#[test]
fn test_errors() {
    let div = Instruction::new(Opcode::Divi)
        .with_rd("d")
        .with_rs1("a")
        .with_imm(0);
    assert!(matches!(
        compute(4, &div, &regs(), &Memory::new()),
        Err(ExecError::DivisionByZero { pc: 4, .. })
    ));

    let shr = Instruction::new(Opcode::Shr)
        .with_rd("a")
        .with_rs1("a")
        .with_imm(-3);
    assert!(matches!(
        compute(1, &shr, &regs(), &Memory::new()),
        Err(ExecError::NegativeShift { pc: 1, amount: -3, .. })
    ));

    let no_rd = Instruction::new(Opcode::Add).with_rs1("a").with_rs2("b");
    assert_eq!(
        compute(0, &no_rd, &regs(), &Memory::new()),
        Err(ExecError::MissingOperand {
            pc: 0,
            opcode: Opcode::Add,
            operand: "rd"
        })
    );

    let no_base = Instruction::new(Opcode::Sw).with_rs1("a");
    assert_eq!(
        compute(0, &no_base, &regs(), &Memory::new()),
        Err(ExecError::MissingOperand {
            pc: 0,
            opcode: Opcode::Sw,
            operand: "base"
        })
    );
}

#[test]
fn test_apply_register_write() {
    let mut r = RegisterFile::new();
    let mut mem = Memory::new();
    apply(
        Effect::Register {
            reg: "t0".to_owned(),
            value: 3,
        },
        &mut r,
        &mut mem,
    );
    apply(Effect::None, &mut r, &mut mem);
    assert_eq!(r.read("t0"), 3);
    assert!(mem.is_empty());
}
