use std::fs;
use std::path::{Path, PathBuf};

use procmon::app::App;
use procmon::config::Config;
use procmon::system::collector::Collector;
use procmon::system::process::{list_pids, read_process_name, read_process_snapshot};

const PAGE_SIZE: u64 = 4096;

/// A throwaway directory laid out like /proc.
struct FakeProc {
    root: PathBuf,
}

impl FakeProc {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("procmon_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        FakeProc { root }
    }

    fn path(&self) -> &Path {
        &self.root
    }

    fn set_aggregate(&self, busy: u64, idle: u64, total_kb: u64, available_kb: u64) {
        fs::write(
            self.root.join("stat"),
            format!("cpu  {busy} 0 0 {idle} 0 0 0 0 0 0\ncpu0 {busy} 0 0 {idle} 0 0 0 0 0 0\n"),
        )
        .unwrap();
        fs::write(
            self.root.join("meminfo"),
            format!("MemTotal: {total_kb} kB\nMemFree: 1 kB\nMemAvailable: {available_kb} kB\n"),
        )
        .unwrap();
    }

    fn set_process(&self, pid: u32, name: &str, utime: u64, stime: u64, rss_pages: u64) {
        let dir = self.root.join(pid.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("stat"),
            format!("{pid} ({name}) S 1 {pid} {pid} 0 -1 4194304 100 0 0 0 {utime} {stime} 0 0 20 0 1 0 500 1000 {rss_pages}\n"),
        )
        .unwrap();
        fs::write(dir.join("statm"), format!("1000 {rss_pages} 50 10 0 200 0\n")).unwrap();
        fs::write(dir.join("comm"), format!("{name}\n")).unwrap();
    }

    fn remove_process(&self, pid: u32) {
        let _ = fs::remove_dir_all(self.root.join(pid.to_string()));
    }
}

impl Drop for FakeProc {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

#[test]
fn lists_only_numeric_entries() {
    let proc = FakeProc::new("list");
    proc.set_aggregate(0, 0, 0, 0);
    proc.set_process(12, "a", 0, 0, 0);
    proc.set_process(3, "b", 0, 0, 0);
    fs::create_dir_all(proc.path().join("self")).unwrap();
    fs::create_dir_all(proc.path().join("12abc")).unwrap();
    fs::create_dir_all(proc.path().join("sys")).unwrap();

    assert_eq!(list_pids(proc.path()), vec![3, 12]);
}

#[test]
fn rss_falls_back_to_status_record() {
    let proc = FakeProc::new("status_fallback");
    proc.set_process(9, "worker", 5, 5, 0);
    let dir = proc.path().join("9");
    fs::remove_file(dir.join("statm")).unwrap();
    fs::write(dir.join("status"), "Name:\tworker\nVmRSS:\t   10 kB\n").unwrap();

    let snap = read_process_snapshot(proc.path(), 9, PAGE_SIZE);
    assert_eq!(snap.total_ticks, 10);
    assert_eq!(snap.rss_pages, 3);
}

#[test]
fn rss_is_zero_without_memory_records() {
    let proc = FakeProc::new("no_mem");
    proc.set_process(9, "worker", 1, 2, 0);
    fs::remove_file(proc.path().join("9").join("statm")).unwrap();

    let snap = read_process_snapshot(proc.path(), 9, PAGE_SIZE);
    assert_eq!(snap.total_ticks, 3);
    assert_eq!(snap.rss_pages, 0);
}

#[test]
fn name_falls_back_to_stat_then_empty() {
    let proc = FakeProc::new("names");
    proc.set_process(5, "tmux: server (1)", 0, 0, 0);
    fs::remove_file(proc.path().join("5").join("comm")).unwrap();

    assert_eq!(read_process_name(proc.path(), 5), "tmux: server (1)");
    assert_eq!(read_process_name(proc.path(), 404), "");
}

#[test]
fn vanished_process_yields_zero_snapshot() {
    let proc = FakeProc::new("vanished");
    let snap = read_process_snapshot(proc.path(), 777, PAGE_SIZE);
    assert_eq!(snap.total_ticks, 0);
    assert_eq!(snap.rss_pages, 0);
}

#[test]
fn refresh_computes_deltas_between_samples() {
    let proc = FakeProc::new("refresh");
    proc.set_aggregate(100, 900, 4096, 1024);
    proc.set_process(1, "init", 10, 10, 16);
    proc.set_process(2, "busy", 50, 50, 256);
    proc.set_process(3, "doomed", 5, 0, 8);

    let config = Config::default();
    let mut app = App::with_collector(Collector::with_page_size(proc.path(), PAGE_SIZE), &config);

    // 1000 ticks elapse, 400 of them busy.
    proc.set_aggregate(500, 1500, 4096, 1024);
    proc.set_process(1, "init", 10, 20, 16);
    proc.set_process(2, "busy", 250, 150, 256);
    proc.remove_process(3);
    proc.set_process(4, "fresh", 30, 20, 0);

    app.refresh_data();
    let snapshot = &app.snapshot;

    assert!((snapshot.cpu_usage_percent - 40.0).abs() < 1e-9);
    assert_eq!(snapshot.memory_total_kb, 4096);
    assert_eq!(snapshot.memory_used_kb, 3072);

    let order: Vec<(u32, &str)> = snapshot
        .rows
        .iter()
        .map(|r| (r.pid, r.name.as_str()))
        .collect();
    assert_eq!(order, vec![(2, "busy"), (4, "fresh"), (1, "init")]);

    assert!((snapshot.rows[0].cpu_percent - 30.0).abs() < 1e-9);
    assert!((snapshot.rows[0].mem_percent - 25.0).abs() < 1e-9);
    // New process: measured against a zero baseline.
    assert!((snapshot.rows[1].cpu_percent - 5.0).abs() < 1e-9);
    assert!((snapshot.rows[2].cpu_percent - 1.0).abs() < 1e-9);
}

#[test]
fn unchanged_counters_show_zero_everywhere() {
    let proc = FakeProc::new("steady");
    proc.set_aggregate(100, 900, 4096, 1024);
    proc.set_process(1, "init", 10, 10, 16);
    proc.set_process(2, "busy", 50, 50, 256);

    let mut app = App::with_collector(
        Collector::with_page_size(proc.path(), PAGE_SIZE),
        &Config::default(),
    );
    app.refresh_data();

    assert_eq!(app.snapshot.cpu_usage_percent, 0.0);
    assert_eq!(app.snapshot.rows.len(), 2);
    assert!(app.snapshot.rows.iter().all(|r| r.cpu_percent == 0.0));
    // Ties on CPU fall back to memory.
    assert_eq!(app.snapshot.rows[0].pid, 2);
}

#[test]
fn reused_pid_with_lower_ticks_clamps_to_zero() {
    let proc = FakeProc::new("reuse");
    proc.set_aggregate(100, 900, 4096, 1024);
    proc.set_process(8, "old", 400, 400, 16);

    let mut app = App::with_collector(
        Collector::with_page_size(proc.path(), PAGE_SIZE),
        &Config::default(),
    );

    proc.set_aggregate(200, 1000, 4096, 1024);
    proc.set_process(8, "new", 1, 1, 16);
    app.refresh_data();

    assert_eq!(app.snapshot.rows.len(), 1);
    assert_eq!(app.snapshot.rows[0].cpu_percent, 0.0);
}

#[test]
fn row_limit_is_honored() {
    let proc = FakeProc::new("limit");
    proc.set_aggregate(0, 0, 1024, 512);
    for pid in 1..=30 {
        proc.set_process(pid, &format!("p{pid}"), pid as u64, 0, 1);
    }

    let mut config = Config::default();
    config.display.max_rows = 5;
    let mut app = App::with_collector(Collector::with_page_size(proc.path(), PAGE_SIZE), &config);
    app.refresh_data();
    assert_eq!(app.snapshot.rows.len(), 5);
}
