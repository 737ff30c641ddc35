//! Sparse memory tests.

use ilpsim_core::Memory;

#[test]
fn test_unwritten_address_reads_zero() {
    let mem = Memory::new();
    assert_eq!(mem.read(0), 0);
    assert_eq!(mem.read(-4), 0);
    assert_eq!(mem.get(8), None);
}

#[test]
fn test_write_overwrites() {
    let mut mem = Memory::from([(100, 10)]);
    mem.write(100, 11);
    mem.write(i64::MIN, 3);
    assert_eq!(mem.read(100), 11);
    assert_eq!(mem.read(i64::MIN), 3);
    assert_eq!(mem.len(), 2);
}

#[test]
fn test_iter_in_address_order() {
    let mem: Memory = [(8, 1), (-8, 2), (0, 3)].into_iter().collect();
    let addrs: Vec<i64> = mem.iter().map(|(a, _)| a).collect();
    assert_eq!(addrs, vec![-8, 0, 8]);
}
