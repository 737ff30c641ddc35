//! Program container tests.

use std::io::Write;

use ilpsim_core::config::{GeneralConfig, MachineConfig};
use ilpsim_core::isa::{Instruction, Opcode};
use ilpsim_core::{Program, SimError};

#[test]
fn test_labels_do_not_consume_indices() {
    let prog = Program::parse("start:\nli t0, #1\nmid:\nend:\nli t1, #2").unwrap();
    assert_eq!(prog.len(), 2);
    assert_eq!(prog.label("start"), Some(0));
    assert_eq!(prog.label("mid"), Some(1));
    assert_eq!(prog.label("end"), Some(1));
    assert_eq!(prog.label("nowhere"), None);
}

#[test]
fn test_trailing_label_points_past_end() {
    let prog = Program::parse("jmp out\nout:").unwrap();
    assert_eq!(prog.label("out"), Some(1));
    assert_eq!(prog.fetch(1), None);
}

#[test]
fn test_from_instructions() {
    let li = Instruction::new(Opcode::Li).with_rd("a").with_imm(1);
    let prog = Program::from_instructions(vec![li]);
    assert!(!prog.is_empty());
    assert_eq!(prog.fetch(0).map(|i| i.opcode), Some(Opcode::Li));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "li t0, #3\nmuli t1, t0, #2").unwrap();
    let prog = Program::from_file(
        file.path(),
        &MachineConfig::default(),
        &GeneralConfig::default(),
    )
    .unwrap();
    assert_eq!(prog.len(), 2);
    assert_eq!(prog.instructions[1].line, 2);
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Program::from_file(
        dir.path().join("absent.s"),
        &MachineConfig::default(),
        &GeneralConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SimError::Io { .. }));
}
