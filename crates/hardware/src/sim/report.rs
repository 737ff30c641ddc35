//! Trace/Timeline Reporter.
//!
//! Renders an execution trace as text: a per-instruction timeline bar chart
//! (`#` for cycles between issue and completion) and a plain trace listing.

use crate::core::trace::TraceEntry;

/// Maximum number of cycle columns drawn in a timeline bar.
pub const TIMELINE_WIDTH: usize = 65;

const HEADER_WIDTH: usize = 80;

/// Renders the timeline bar chart for a trace.
///
/// One row per dynamic instruction. Bars longer than [`TIMELINE_WIDTH`]
/// cycles are cut off and end in `>`.
///
/// # Examples
///
/// ```
/// use ilpsim_core::sim::{report, Simulator};
///
/// let out = Simulator::default().run_source("li t0, #1").unwrap();
/// let chart = report::timeline(&out.trace, out.total_cycles);
/// assert!(chart.contains("#####"));
/// assert!(chart.contains("TOTAL CYCLES: 5"));
/// ```
pub fn timeline(trace: &[TraceEntry], total_cycles: u64) -> String {
    let rule = "=".repeat(HEADER_WIDTH);
    let mut out = vec![
        String::new(),
        rule.clone(),
        format!("{:^HEADER_WIDTH$}", "Simulation Timeline"),
        rule,
    ];
    if trace.is_empty() {
        out.push("No instructions executed.".to_owned());
        return out.join("\n");
    }

    let name_w = trace
        .iter()
        .map(|e| e.text.chars().count())
        .max()
        .unwrap_or(0)
        .max(11);
    let cols = (total_cycles as usize).min(TIMELINE_WIDTH);
    let truncated = total_cycles as usize > TIMELINE_WIDTH;

    out.push(format!(
        "{:<name_w$} | {:>5} | {:>5} | Timeline (cycles 1..{total_cycles})",
        "Instruction", "Issue", "Done"
    ));
    out.push(format!(
        "{}-+-------+-------+-{}",
        "-".repeat(name_w),
        "-".repeat(cols)
    ));

    for entry in trace {
        out.push(format!(
            "{:<name_w$} | {:>5} | {:>5} | {}",
            entry.text,
            entry.issue,
            entry.complete,
            bar(entry, cols, truncated)
        ));
    }

    out.push(String::new());
    out.push(format!("TOTAL CYCLES: {total_cycles}"));
    out.join("\n")
}

/// Timeline bar for one entry over `cols` columns (cycle `c` in column `c - 1`).
fn bar(entry: &TraceEntry, cols: usize, truncated: bool) -> String {
    let mut bar: String = (1..=cols as u64)
        .map(|c| {
            if (entry.issue..=entry.complete).contains(&c) {
                '#'
            } else {
                '.'
            }
        })
        .collect();
    if truncated && entry.complete > cols as u64 {
        bar.push('>');
    }
    bar
}

/// Renders one line per trace entry.
pub fn trace_listing(trace: &[TraceEntry]) -> String {
    trace
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
