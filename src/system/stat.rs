use std::path::Path;

/// Cumulative CPU ticks from the aggregate `cpu` line of `/proc/stat`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTicks {
    pub fn total(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .into_iter()
        .fold(0u64, u64::saturating_add)
    }

    pub fn idle_total(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }
}

/// Memory totals from `/proc/meminfo`, in kilobytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryTotals {
    pub total_kb: u64,
    pub available_kb: u64,
}

impl MemoryTotals {
    pub fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.available_kb)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregateCounters {
    pub cpu: CpuTicks,
    pub memory: MemoryTotals,
}

/// Parse the first `cpu` line. Missing trailing fields count as zero; anything
/// malformed yields all zeros.
pub fn parse_cpu_line(contents: &str) -> CpuTicks {
    let Some(line) = contents.lines().find(|l| l.starts_with("cpu ")) else {
        return CpuTicks::default();
    };

    let mut values = [0u64; 8];
    for (slot, field) in values.iter_mut().zip(line.split_whitespace().skip(1)) {
        match field.parse() {
            Ok(v) => *slot = v,
            Err(_) => return CpuTicks::default(),
        }
    }

    let [user, nice, system, idle, iowait, irq, softirq, steal] = values;
    CpuTicks {
        user,
        nice,
        system,
        idle,
        iowait,
        irq,
        softirq,
        steal,
    }
}

pub fn parse_meminfo(contents: &str) -> MemoryTotals {
    let mut totals = MemoryTotals::default();
    for line in contents.lines() {
        if let Some(val) = line.strip_prefix("MemTotal:") {
            totals.total_kb = parse_kb(val);
        } else if let Some(val) = line.strip_prefix("MemAvailable:") {
            totals.available_kb = parse_kb(val);
        }
    }
    totals
}

fn parse_kb(value: &str) -> u64 {
    // "   16318236 kB"
    value
        .split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

pub fn read_aggregate_counters(root: &Path) -> AggregateCounters {
    let cpu = match std::fs::read_to_string(root.join("stat")) {
        Ok(contents) => parse_cpu_line(&contents),
        Err(err) => {
            tracing::debug!(%err, "aggregate cpu counters unavailable");
            CpuTicks::default()
        }
    };
    let memory = match std::fs::read_to_string(root.join("meminfo")) {
        Ok(contents) => parse_meminfo(&contents),
        Err(err) => {
            tracing::debug!(%err, "memory totals unavailable");
            MemoryTotals::default()
        }
    };
    AggregateCounters { cpu, memory }
}
