use std::cmp::Ordering;

use crate::format::fit_column;
use crate::system::snapshot::ProcessRow;

pub const PID_WIDTH: usize = 8;
pub const NAME_WIDTH: usize = 28;
pub const CPU_WIDTH: usize = 10;
pub const SEPARATOR_WIDTH: usize = 60;

/// CPU descending, ties broken by MEM descending.
pub fn compare_rows(a: &ProcessRow, b: &ProcessRow) -> Ordering {
    b.cpu_percent
        .total_cmp(&a.cpu_percent)
        .then_with(|| b.mem_percent.total_cmp(&a.mem_percent))
}

/// Drop rows whose process disappeared (empty name), sort, keep the top `limit`.
pub fn rank_rows(rows: Vec<ProcessRow>, limit: usize) -> Vec<ProcessRow> {
    let mut rows: Vec<ProcessRow> = rows.into_iter().filter(|r| !r.name.is_empty()).collect();
    rows.sort_by(compare_rows);
    rows.truncate(limit);
    rows
}

pub fn header_line() -> String {
    format!(
        "{:<PID_WIDTH$}{:<NAME_WIDTH$}{:<CPU_WIDTH$}{}",
        "PID", "NAME", "CPU(%)", "MEM(%)"
    )
}

pub fn separator_line() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

pub fn format_row(row: &ProcessRow) -> String {
    format!(
        "{:<PID_WIDTH$}{}{:<CPU_WIDTH$.2}{:.2}",
        row.pid,
        fit_column(&row.name, NAME_WIDTH),
        row.cpu_percent,
        row.mem_percent
    )
}
