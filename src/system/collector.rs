use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::platform;
use super::process::{ProcessSnapshot, list_pids, read_process_name, read_process_snapshot};
use super::stat::{AggregateCounters, read_aggregate_counters};

/// One sampling generation: aggregate counters plus every live process.
#[derive(Clone, Debug, Default)]
pub struct Sample {
    pub aggregate: AggregateCounters,
    pub processes: HashMap<u32, ProcessSnapshot>,
}

pub struct Collector {
    root: PathBuf,
    page_size: u64,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl Collector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_page_size(root, platform::page_size())
    }

    pub fn with_page_size(root: impl Into<PathBuf>, page_size: u64) -> Self {
        Collector {
            root: root.into(),
            page_size,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn sample(&self) -> Sample {
        let _span = tracing::debug_span!("collector.sample").entered();

        let aggregate = read_aggregate_counters(&self.root);
        let processes: HashMap<u32, ProcessSnapshot> = list_pids(&self.root)
            .into_iter()
            .map(|pid| (pid, read_process_snapshot(&self.root, pid, self.page_size)))
            .collect();

        tracing::debug!(processes = processes.len(), "sampled");
        Sample {
            aggregate,
            processes,
        }
    }

    pub fn process_name(&self, pid: u32) -> String {
        read_process_name(&self.root, pid)
    }
}
