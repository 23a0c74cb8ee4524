//! Converts two time-separated samples into utilization percentages.
//!
//! Everything here is pure arithmetic over counters; no I/O.

use std::collections::HashMap;

use super::process::ProcessSnapshot;
use super::stat::{AggregateCounters, CpuTicks};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessUsage {
    pub pid: u32,
    pub cpu_percent: f64,
    pub mem_percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Estimate {
    pub cpu_usage_percent: f64,
    pub memory_total_kb: u64,
    pub memory_used_kb: u64,
    pub processes: Vec<ProcessUsage>,
}

/// Overall CPU busy percentage between two aggregate readings.
pub fn system_cpu_percent(prev: &CpuTicks, cur: &CpuTicks) -> f64 {
    let total_delta = cur.total().saturating_sub(prev.total());
    if total_delta == 0 {
        return 0.0;
    }
    let idle_delta = cur.idle_total().saturating_sub(prev.idle_total());
    let busy_delta = total_delta.saturating_sub(idle_delta);
    100.0 * busy_delta as f64 / total_delta as f64
}

/// Elapsed system-wide ticks, floored at 1 so it can be used as a divisor.
pub fn tick_delta(prev: &CpuTicks, cur: &CpuTicks) -> u64 {
    cur.total().saturating_sub(prev.total()).max(1)
}

pub fn process_cpu_percent(prev_ticks: u64, cur_ticks: u64, total_delta: u64) -> f64 {
    let delta = cur_ticks.saturating_sub(prev_ticks);
    100.0 * delta as f64 / total_delta.max(1) as f64
}

pub fn process_mem_percent(rss_pages: u64, page_size: u64, total_kb: u64) -> f64 {
    if rss_pages == 0 || total_kb == 0 {
        return 0.0;
    }
    let rss_bytes = rss_pages as f64 * page_size as f64;
    let total_bytes = total_kb as f64 * 1024.0;
    100.0 * rss_bytes / total_bytes
}

pub fn used_memory_kb(total_kb: u64, available_kb: u64) -> u64 {
    total_kb.saturating_sub(available_kb)
}

/// Holds the system-wide baseline between calls.
#[derive(Debug, Clone)]
pub struct UtilizationEstimator {
    baseline: CpuTicks,
    page_size: u64,
}

impl UtilizationEstimator {
    pub fn new(baseline: CpuTicks, page_size: u64) -> Self {
        Self {
            baseline,
            page_size,
        }
    }

    pub fn baseline(&self) -> &CpuTicks {
        &self.baseline
    }

    /// Compute usage for every process in `current`. Processes absent from
    /// `previous` are measured against a zero baseline. The system baseline is
    /// replaced by `aggregate.cpu` afterwards.
    pub fn estimate(
        &mut self,
        aggregate: &AggregateCounters,
        previous: &HashMap<u32, ProcessSnapshot>,
        current: &HashMap<u32, ProcessSnapshot>,
    ) -> Estimate {
        let cpu_usage_percent = system_cpu_percent(&self.baseline, &aggregate.cpu);
        let total_delta = tick_delta(&self.baseline, &aggregate.cpu);
        let memory_total_kb = aggregate.memory.total_kb;

        let processes = current
            .iter()
            .map(|(&pid, cur)| {
                let prev_ticks = previous.get(&pid).map_or(0, |p| p.total_ticks);
                ProcessUsage {
                    pid,
                    cpu_percent: process_cpu_percent(prev_ticks, cur.total_ticks, total_delta),
                    mem_percent: process_mem_percent(
                        cur.rss_pages,
                        self.page_size,
                        memory_total_kb,
                    ),
                }
            })
            .collect();

        self.baseline = aggregate.cpu;

        Estimate {
            cpu_usage_percent,
            memory_total_kb,
            memory_used_kb: used_memory_kb(memory_total_kb, aggregate.memory.available_kb),
            processes,
        }
    }
}
