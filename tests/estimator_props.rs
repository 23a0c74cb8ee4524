use std::collections::HashMap;

use proptest::prelude::*;
use procmon::system::estimator::{
    UtilizationEstimator, process_cpu_percent, system_cpu_percent, used_memory_kb,
};
use procmon::system::process::ProcessSnapshot;
use procmon::system::snapshot::ProcessRow;
use procmon::system::stat::{AggregateCounters, CpuTicks, MemoryTotals};
use procmon::ui::table::rank_rows;

fn cpu_ticks() -> impl Strategy<Value = CpuTicks> {
    prop::array::uniform8(0u64..1_000_000).prop_map(
        |[user, nice, system, idle, iowait, irq, softirq, steal]| CpuTicks {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
        },
    )
}

fn rows() -> impl Strategy<Value = Vec<ProcessRow>> {
    prop::collection::vec(
        (1u32..100_000, "[a-z]{0,6}", 0u8..=100, 0u8..=20),
        0..80,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .map(|(pid, name, cpu, mem)| ProcessRow {
                pid,
                name,
                // Coarse values so ties actually happen.
                cpu_percent: f64::from(cpu) / 4.0,
                mem_percent: f64::from(mem) / 2.0,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn system_cpu_is_zero_when_no_ticks_elapse(t in cpu_ticks()) {
        prop_assert_eq!(system_cpu_percent(&t, &t), 0.0);
    }

    #[test]
    fn system_cpu_stays_in_range(prev in cpu_ticks(), cur in cpu_ticks()) {
        let pct = system_cpu_percent(&prev, &cur);
        prop_assert!(pct.is_finite());
        prop_assert!((0.0..=100.0).contains(&pct), "out of range: {}", pct);
    }

    #[test]
    fn process_cpu_never_negative(prev in 0u64..u32::MAX as u64, cur in 0u64..u32::MAX as u64, total in 0u64..1_000_000) {
        let pct = process_cpu_percent(prev, cur, total);
        prop_assert!(pct.is_finite());
        prop_assert!(pct >= 0.0);
        if cur < prev {
            prop_assert_eq!(pct, 0.0);
        }
    }

    #[test]
    fn used_memory_never_exceeds_total(total in 0u64..u64::MAX / 2, available in 0u64..u64::MAX / 2) {
        let used = used_memory_kb(total, available);
        prop_assert!(used <= total);
        if available <= total {
            prop_assert_eq!(used, total - available);
        } else {
            prop_assert_eq!(used, 0);
        }
    }

    #[test]
    fn ranking_is_ordered_and_filtered(input in rows(), limit in 0usize..30) {
        let ranked = rank_rows(input.clone(), limit);
        prop_assert!(ranked.len() <= limit);
        prop_assert!(ranked.iter().all(|r| !r.name.is_empty()));
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.cpu_percent >= b.cpu_percent);
            if a.cpu_percent == b.cpu_percent {
                prop_assert!(a.mem_percent >= b.mem_percent);
            }
        }
        let named = input.iter().filter(|r| !r.name.is_empty()).count();
        prop_assert_eq!(ranked.len(), named.min(limit));
    }

    #[test]
    fn identical_samples_are_idle(
        cpu in cpu_ticks(),
        procs in prop::collection::hash_map(1u32..10_000, (0u64..1_000_000, 0u64..10_000), 0..50),
    ) {
        let procs: HashMap<u32, ProcessSnapshot> = procs
            .into_iter()
            .map(|(pid, (total_ticks, rss_pages))| (pid, ProcessSnapshot { total_ticks, rss_pages }))
            .collect();
        let aggregate = AggregateCounters {
            cpu,
            memory: MemoryTotals { total_kb: 1 << 20, available_kb: 1 << 19 },
        };
        let mut estimator = UtilizationEstimator::new(cpu, 4096);
        let estimate = estimator.estimate(&aggregate, &procs, &procs);
        prop_assert_eq!(estimate.cpu_usage_percent, 0.0);
        prop_assert_eq!(estimate.processes.len(), procs.len());
        prop_assert!(estimate.processes.iter().all(|p| p.cpu_percent == 0.0));
    }
}
