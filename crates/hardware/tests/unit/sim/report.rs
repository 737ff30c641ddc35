//! Timeline and trace listing tests.

use ilpsim_core::sim::report::{self, TIMELINE_WIDTH};

use crate::common::harness::TestContext;
use crate::common::programs;

#[test]
fn test_timeline_rows() {
    let out = TestContext::new()
        .with_reg("t0", 100)
        .with_mem(100, 10)
        .run(programs::LOAD_ADD_STORE);
    let chart = report::timeline(&out.trace, out.total_cycles);

    assert!(chart.contains("Timeline (cycles 1..11)"));
    for row in [
        "lw t1, 0(t0)   |     1 |     5 | #####......",
        "add t2, t1, t1 |     6 |     6 | .....#.....",
        "sw t2, 4(t0)   |     7 |    11 | ......#####",
    ] {
        assert!(chart.contains(row), "missing row {row:?}");
    }
    assert!(chart.ends_with("TOTAL CYCLES: 11"));
}

#[test]
fn test_timeline_caps_width() {
    let src = "li t0, #1\ndiv t0, t0, t0\ndiv t0, t0, t0\ndiv t0, t0, t0\n\
               div t0, t0, t0\ndiv t0, t0, t0\ndiv t0, t0, t0\ndiv t0, t0, t0";
    let out = TestContext::new().run(src);
    assert_eq!(out.total_cycles, 75);

    let chart = report::timeline(&out.trace, out.total_cycles);
    let last = chart
        .lines()
        .filter(|l| l.starts_with("div"))
        .last()
        .unwrap();
    let bar = last.rsplit("| ").next().unwrap();
    assert_eq!(bar.len(), TIMELINE_WIDTH + 1);
    assert!(bar.ends_with('>'));
}

#[test]
fn test_trace_listing_one_line_per_dynamic_instruction() {
    let out = TestContext::new()
        .with_reg("t0", 3)
        .with_reg("t1", 100)
        .with_mem(100, 20)
        .with_mem(104, 30)
        .with_mem(108, 10)
        .run(programs::MAX_LOOP);
    let listing = report::trace_listing(&out.trace);
    assert_eq!(listing.lines().count(), out.trace.len());
    assert!(listing.lines().next().unwrap().starts_with("#0"));
    assert!(listing.contains("-> 1"), "taken back-edge is shown");
    assert!(listing.contains("stall=data"));
}
