//! Scheduling engine tests.
//!
//! Cycle numbers below are worked out by hand from the issue rule
//! `issue = max(data_ready, unit_busy_until, previous_issue) + 1`.

use ilpsim_core::config::MachineConfig;
use ilpsim_core::core::control::Outcome;
use ilpsim_core::core::{Engine, StallCause};
use ilpsim_core::isa::{Instruction, Opcode, UnitType};
use ilpsim_core::{ExecError, Memory, Program, RegisterFile};
use pretty_assertions::assert_eq;
use std::sync::Arc;

use crate::common::harness::TestContext;
use crate::common::programs;

fn issues(out: &ilpsim_core::SimOutcome) -> Vec<(u64, u64)> {
    out.trace.iter().map(|e| (e.issue, e.complete)).collect()
}

fn raw_engine(machine: MachineConfig, instructions: Vec<Instruction>) -> Engine {
    Engine::new(
        Arc::new(machine),
        Program::from_instructions(instructions),
        RegisterFile::new(),
        Memory::new(),
    )
}

#[test]
fn test_sum_of_immediates() {
    let out = TestContext::new().run(programs::SUM);
    assert_eq!(out.registers.read("t2"), 25);
    assert_eq!(issues(&out), vec![(1, 5), (2, 6), (7, 7)]);
    assert_eq!(out.total_cycles, 7);

    let add = &out.trace[2];
    assert_eq!((add.stall, add.stall_cycles), (StallCause::Data, 4));
    assert_eq!((add.unit, add.unit_index), (UnitType::Alu, 0));
}

#[test]
fn test_load_add_store() {
    let out = TestContext::new()
        .with_reg("t0", 100)
        .with_mem(100, 10)
        .run(programs::LOAD_ADD_STORE);
    assert_eq!(out.registers.read("t1"), 10);
    assert_eq!(out.registers.read("t2"), 20);
    assert_eq!(out.memory.read(104), 20);
    assert_eq!(issues(&out), vec![(1, 5), (6, 6), (7, 11)]);
    assert_eq!(out.total_cycles, 11);
}

#[test]
fn test_floor_division() {
    let out = TestContext::new().run(programs::FLOOR_DIV);
    assert_eq!(out.registers.read("t2"), -4);
    assert_eq!(out.total_cycles, 16);
}

#[test]
fn test_max_loop() {
    let ctx = TestContext::new()
        .with_reg("t0", 3)
        .with_reg("t1", 100)
        .with_mem(100, 20)
        .with_mem(104, 30)
        .with_mem(108, 10);
    let program = ctx.load(programs::MAX_LOOP);
    let out = ctx.run(programs::MAX_LOOP);

    assert_eq!(out.registers.read("t2"), 30);
    assert_eq!(out.registers.read("t0"), 0);
    assert_eq!(out.registers.read("t1"), 112);
    assert!(out.trace.len() > program.len());
    assert_eq!(out.trace.len(), 18);

    let pcs: Vec<usize> = out.trace.iter().map(|e| e.pc).collect();
    assert_eq!(
        pcs,
        vec![0, 1, 2, 3, 4, 5, 6, 1, 2, 3, 4, 5, 6, 1, 2, 4, 5, 6]
    );
    let issue: Vec<u64> = out.trace.iter().map(|e| e.issue).collect();
    let expected: Vec<u64> = vec![
        1, 2, 7, 8, 9, 10, 11, 12, 17, 18, 19, 20, 21, 22, 27, 28, 29, 30,
    ];
    assert_eq!(issue, expected);
    assert_eq!(out.total_cycles, 30);
    assert_eq!(out.trace[14].outcome, Outcome::Taken(4));
    assert_eq!(out.trace[17].outcome, Outcome::Sequential);
}

#[test]
fn test_empty_program() {
    let out = TestContext::new().run("; nothing here\n");
    assert!(out.trace.is_empty());
    assert_eq!(out.total_cycles, 0);
    assert_eq!(out.stats.instructions, 0);
}

#[test]
fn test_single_alu_machine_serializes() {
    let src = "li t0, #1\nli t1, #2";
    let two = TestContext::new().run(src);
    assert_eq!(two.total_cycles, 6);

    let one = TestContext::new()
        .with_machine(MachineConfig::default().with_units(UnitType::Alu, 1))
        .run(src);
    assert_eq!(issues(&one), vec![(1, 5), (6, 10)]);
    assert_eq!(one.trace[1].stall, StallCause::Structural);
    assert_eq!(one.total_cycles, 10);
}

#[test]
fn test_fast_multiplier() {
    let src = "mul t2, t0, t1";
    assert_eq!(TestContext::new().run(src).total_cycles, 3);
    let fast = TestContext::new()
        .with_machine(MachineConfig::default().with_latency(Opcode::Mul, 1))
        .run(src);
    assert_eq!(fast.total_cycles, 1);
}

#[test]
fn test_opcode_remapped_to_other_unit() {
    // Moving `lw` onto the ALUs lets two loads overlap.
    let src = "lw t0, 0(a)\nlw t1, 4(a)";
    let base = TestContext::new().run(src);
    assert_eq!(issues(&base), vec![(1, 5), (6, 10)]);

    let machine = MachineConfig::default().with_unit_for(Opcode::Lw, UnitType::Alu);
    let remapped = TestContext::new().with_machine(machine).run(src);
    assert_eq!(issues(&remapped), vec![(1, 5), (2, 6)]);
}

#[test]
fn test_newest_writer_wins() {
    let out = TestContext::new()
        .with_reg("a", 10)
        .with_reg("b", 2)
        .run("div t0, a, b\nli t0, #1\nadd t1, t0, t0");
    assert_eq!(issues(&out), vec![(1, 10), (2, 6), (7, 7)]);
    assert_eq!(out.registers.read("t0"), 1);
    assert_eq!(out.registers.read("t1"), 2);
    assert_eq!(out.total_cycles, 10);
}

const STORE_THEN_BRANCH: &str = "sw t0, 0(p)\nadd t1, t0, p\nbeq t1, t1, end\nend:\nadd t2, t1, t1";

#[test]
fn test_store_and_branch_do_not_block_readers() {
    let out = TestContext::new()
        .with_reg("p", 8)
        .run(STORE_THEN_BRANCH);
    assert_eq!(issues(&out), vec![(1, 5), (2, 2), (3, 3), (4, 4)]);
}

#[test]
fn test_branch_unit_never_contends() {
    let out = TestContext::new().run("jmp a\na:\njmp b\nb:\njmp c\nc:");
    assert_eq!(issues(&out), vec![(1, 1), (2, 2), (3, 3)]);
    let idx: Vec<usize> = out.trace.iter().map(|e| e.unit_index).collect();
    assert_eq!(idx, vec![0, 1, 2]);
}

#[test]
fn test_step_by_step() {
    let mut engine = TestContext::new().engine(programs::SUM);
    assert_eq!(engine.pc(), 0);
    let first = engine.step().unwrap().unwrap();
    assert_eq!((first.seq, first.pc), (0, 0));
    assert_eq!(engine.registers().read("t0"), 20, "committed at issue");
    assert_eq!(engine.pc(), 1);

    engine.run().unwrap();
    assert!(engine.is_finished());
    assert_eq!(engine.step().unwrap(), None);
    assert_eq!(engine.total_cycles(), 7);
    assert_eq!(engine.stats().instructions, 3);
}

#[test]
fn test_division_by_zero_aborts() {
    let mut engine = TestContext::new().engine("li t0, #1\ndiv t1, t0, zero\nli t2, #3");
    let err = engine.run().unwrap_err();
    assert_eq!(
        err,
        ExecError::DivisionByZero {
            pc: 1,
            text: "div t1, t0, zero".to_owned()
        }
    );
    assert_eq!(engine.trace().len(), 1);
    assert_eq!(engine.pc(), 1);
    assert_eq!(engine.registers().get("t1"), None);
}

#[test]
fn test_negative_shift_aborts() {
    let err = TestContext::new().try_run("shl t0, #-1").unwrap_err();
    assert!(err.to_string().contains("negative shift amount -1"));
}

#[test]
fn test_instruction_limit() {
    let err = TestContext::new()
        .with_max_instructions(100)
        .try_run("spin:\njmp spin")
        .unwrap_err();
    assert!(err.to_string().contains("limit of 100"));
}

#[test]
fn test_unmapped_opcode() {
    let mut engine = raw_engine(
        MachineConfig::default().without_opcode(Opcode::Xor),
        vec![Instruction::new(Opcode::Xor).with_rd("a").with_rs1("a").with_rs2("a")],
    );
    assert_eq!(
        engine.step(),
        Err(ExecError::NoUnitMapping {
            pc: 0,
            opcode: Opcode::Xor
        })
    );
}

#[test]
fn test_missing_latency() {
    let mut machine = MachineConfig::default();
    let _ = machine.latency.remove(&Opcode::Li);
    let li = Instruction::new(Opcode::Li).with_rd("a").with_imm(1);
    let mut engine = raw_engine(machine, vec![li]);
    assert_eq!(
        engine.step(),
        Err(ExecError::MissingLatency {
            pc: 0,
            opcode: Opcode::Li
        })
    );
}

#[test]
fn test_unit_without_instances() {
    let mut engine = raw_engine(
        MachineConfig::default().with_units(UnitType::MulDiv, 0),
        vec![Instruction::new(Opcode::Muli).with_rd("a").with_rs1("a").with_imm(2)],
    );
    assert_eq!(
        engine.step(),
        Err(ExecError::NoUnitsAvailable {
            pc: 0,
            opcode: Opcode::Muli,
            unit: UnitType::MulDiv
        })
    );
}

#[test]
fn test_missing_operand_is_not_a_noop() {
    let mut engine = raw_engine(
        MachineConfig::default(),
        vec![Instruction::new(Opcode::Add).with_rd("a").with_rs1("b")],
    );
    assert_eq!(
        engine.step(),
        Err(ExecError::MissingOperand {
            pc: 0,
            opcode: Opcode::Add,
            operand: "rs2"
        })
    );
}

#[test]
fn test_unresolved_target() {
    let jmp = Instruction::new(Opcode::Jmp);
    let mut engine = raw_engine(MachineConfig::default(), vec![jmp]);
    assert!(matches!(
        engine.step(),
        Err(ExecError::UnresolvedTarget { pc: 0, .. })
    ));
}

#[test]
fn test_trace_instructions_logging_path() {
    let mut ctx = TestContext::new();
    ctx.config.general.trace_instructions = true;
    let out = ctx.run(programs::SUM);
    assert_eq!(out.total_cycles, 7);
}
