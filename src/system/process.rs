use std::path::Path;

/// Point-in-time counters for one process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessSnapshot {
    /// utime + stime, in clock ticks.
    pub total_ticks: u64,
    pub rss_pages: u64,
}

// Fields after comm: state(0) ppid(1) pgrp(2) session(3) tty_nr(4)
// tpgid(5) flags(6) minflt(7) cminflt(8) majflt(9) cmajflt(10)
// utime(11) stime(12)
const UTIME_FIELD: usize = 11;

/// Enumerate numeric entries of the process directory.
pub fn list_pids(root: &Path) -> Vec<u32> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(%err, root = %root.display(), "process directory unreadable");
            return Vec::new();
        }
    };

    let mut pids: Vec<u32> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name();
            let name = name.to_str()?;
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            name.parse::<u32>().ok().filter(|&pid| pid > 0)
        })
        .collect();
    pids.sort_unstable();
    pids
}

/// Text between the first '(' and the last ')' of a stat record.
pub fn parse_stat_name(stat: &str) -> Option<String> {
    let open = stat.find('(')?;
    let close = stat.rfind(')')?;
    if close <= open {
        return None;
    }
    Some(stat[open + 1..close].to_string())
}

/// utime + stime from a stat record. The comm field may contain spaces and
/// parens, so fields are counted from the last ')'.
pub fn parse_stat_ticks(stat: &str) -> Option<u64> {
    let open = stat.find('(')?;
    let close = stat.rfind(')')?;
    if close <= open {
        return None;
    }
    let mut fields = stat[close + 1..].split_whitespace().skip(UTIME_FIELD);
    let utime: u64 = fields.next()?.parse().ok()?;
    let stime: u64 = fields.next()?.parse().ok()?;
    utime.checked_add(stime)
}

/// Resident page count, the second number of a statm record.
pub fn parse_statm_resident(statm: &str) -> Option<u64> {
    let mut fields = statm.split_whitespace();
    let _size: u64 = fields.next()?.parse().ok()?;
    fields.next()?.parse().ok()
}

/// `VmRSS` from a status record converted to pages, rounding up.
pub fn parse_status_rss_pages(status: &str, page_size: u64) -> Option<u64> {
    if page_size == 0 {
        return None;
    }
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line["VmRSS:".len()..]
        .split_whitespace()
        .next()?
        .parse()
        .ok()?;
    Some(kb.checked_mul(1024)?.div_ceil(page_size))
}

pub fn read_process_snapshot(root: &Path, pid: u32, page_size: u64) -> ProcessSnapshot {
    let dir = root.join(pid.to_string());

    let Some(total_ticks) = std::fs::read_to_string(dir.join("stat"))
        .ok()
        .and_then(|stat| parse_stat_ticks(&stat))
    else {
        tracing::debug!(pid, "stat record missing or malformed");
        return ProcessSnapshot::default();
    };

    let rss_pages = match std::fs::read_to_string(dir.join("statm")) {
        Ok(statm) => parse_statm_resident(&statm).unwrap_or(0),
        Err(_) => std::fs::read_to_string(dir.join("status"))
            .ok()
            .and_then(|status| parse_status_rss_pages(&status, page_size))
            .unwrap_or(0),
    };

    ProcessSnapshot {
        total_ticks,
        rss_pages,
    }
}

/// Short process name. Empty when the process has gone away.
pub fn read_process_name(root: &Path, pid: u32) -> String {
    let dir = root.join(pid.to_string());
    if let Ok(comm) = std::fs::read_to_string(dir.join("comm")) {
        return comm.lines().next().unwrap_or_default().to_string();
    }
    std::fs::read_to_string(dir.join("stat"))
        .ok()
        .and_then(|stat| parse_stat_name(&stat))
        .unwrap_or_default()
}
