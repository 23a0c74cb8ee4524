use serde::Serialize;

/// One display row. Rows live for a single frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub mem_percent: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub cpu_usage_percent: f64,
    pub memory_total_kb: u64,
    pub memory_used_kb: u64,
    /// Ranked and truncated, ready to draw.
    pub rows: Vec<ProcessRow>,
}
