use chrono::{DateTime, Local, TimeZone};
use procfs::ProcError;
use procfs::process::Process as ProcfsProcess;

pub mod fields;

pub use fields::Field;

// Main Process Data Structure

/// One process's metrics at the moment of collection.
///
/// Every field holds either a real reading or its documented fallback, so a
/// record can always become a table row. Metrics that the kernel refuses to
/// hand over (affinity, unique set size, I/O counters, owning user) degrade
/// individually instead of failing the whole record.
#[derive(Debug, Clone)]
pub struct ProcessRecord {
    pub pid: i32,
    pub name: String,
    pub create_time: DateTime<Local>,
    pub cores: u32,       //CPU cores this process may be scheduled on; 0 when denied
    pub cpu_usage: f32,   //Percent since the previous collection pass; 0.0 on first sight
    pub status: String,
    pub nice: Option<i64>, //None when unreadable; coerced to 0 only at format time
    pub memory_usage: u64, //Unique set size in bytes; 0 when denied
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub n_threads: i64,
    pub username: String, //"N/A" when the uid cannot be resolved
}

// Implementation

/// Reads one process out of /proc.
///
/// Returns the record together with the process's total CPU time in clock
/// ticks, taken from the same `/proc/<pid>/stat` read as the rest of the
/// stat-derived fields; the collector turns the ticks into a percentage.
///
/// The stat read is the observability gate: if it fails the whole record is
/// discarded and the caller skips the process. A process that exits after
/// that read still yields a record (the stat-derived core is from one
/// instant; the remaining metrics just read as their fallback values).
pub fn extract(prc: &ProcfsProcess) -> Result<(ProcessRecord, u64), ProcError> {
    //Single consistent read: every stat-derived metric comes from this one snapshot
    let stat = prc.stat()?;

    //Cumulative I/O counters need elevated privileges for foreign processes
    let (read_bytes, write_bytes) = match prc.io() {
        Ok(io) => (io.read_bytes, io.write_bytes),
        Err(_) => (0, 0),
    };

    let record = ProcessRecord {
        pid: prc.pid,
        name: stat.comm.clone(),
        create_time: create_time(stat.starttime),
        cores: affinity_core_count(prc.pid),
        cpu_usage: 0.0, //Filled in by the collector once it has a baseline
        status: status_name(stat.state),
        nice: Some(stat.nice),
        memory_usage: unique_set_size(prc.pid),
        read_bytes,
        write_bytes,
        n_threads: stat.num_threads,
        username: username(prc),
    };

    Ok((record, stat.utime + stat.stime))
}

/// Converts a start time in clock ticks since boot into a wall-clock
/// timestamp. When the start offset cannot be scaled the process is
/// attributed to the boot instant itself, mirroring what the kernel reports
/// for protected system processes.
fn create_time(starttime_ticks: u64) -> DateTime<Local> {
    let boot_secs = procfs::boot_time_secs().unwrap_or(0);
    let secs = boot_secs + starttime_ticks / clock_ticks_per_second();

    Local
        .timestamp_opt(secs as i64, 0)
        .single()
        .unwrap_or_else(|| DateTime::from(std::time::UNIX_EPOCH))
}

//Number of CPU cores the process is allowed to run on, via sched_getaffinity.
//0 means the kernel denied the query (e.g. the process is gone or protected).
fn affinity_core_count(pid: i32) -> u32 {
    let mut set: libc::cpu_set_t = unsafe { std::mem::zeroed() };
    let rc = unsafe {
        libc::sched_getaffinity(pid, std::mem::size_of::<libc::cpu_set_t>(), &mut set)
    };

    if rc == 0 {
        unsafe { libc::CPU_COUNT(&set) as u32 }
    } else {
        0
    }
}

//Unique set size: pages privately owned by the process, from smaps_rollup.
//Reading another user's smaps_rollup is denied without root; that reads as 0.
fn unique_set_size(pid: i32) -> u64 {
    let Ok(content) = std::fs::read_to_string(format!("/proc/{}/smaps_rollup", pid)) else {
        return 0;
    };

    let mut total_kb: u64 = 0;
    for line in content.lines() {
        if line.starts_with("Private_Clean:") || line.starts_with("Private_Dirty:") {
            if let Some(kb) = line
                .split_whitespace()
                .nth(1)
                .and_then(|v| v.parse::<u64>().ok())
            {
                total_kb += kb;
            }
        }
    }

    total_kb * 1024
}

//Resolves the real uid of the process to an account name.
fn username(prc: &ProcfsProcess) -> String {
    let uid = match prc.status() {
        Ok(status) => status.ruid,
        Err(_) => return "N/A".to_string(),
    };

    match nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(uid)) {
        Ok(Some(user)) => user.name,
        _ => "N/A".to_string(),
    }
}

/// Expands the single-character state from /proc/<pid>/stat into the usual
/// human-readable name. Unknown states pass through as the raw character,
/// since the value space is kernel-defined and treated as opaque.
fn status_name(state: char) -> String {
    match state {
        'R' => "running".to_string(),
        'S' => "sleeping".to_string(),
        'D' => "disk-sleep".to_string(),
        'Z' => "zombie".to_string(),
        'T' => "stopped".to_string(),
        't' => "tracing-stop".to_string(),
        'X' | 'x' => "dead".to_string(),
        'W' => "waking".to_string(),
        'P' => "parked".to_string(),
        'I' => "idle".to_string(),
        other => other.to_string(),
    }
}

fn clock_ticks_per_second() -> u64 {
    let hz = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if hz > 0 { hz as u64 } else { 100 } //100 is the standard HZ on Linux
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_cover_common_states() {
        assert_eq!(status_name('R'), "running");
        assert_eq!(status_name('S'), "sleeping");
        assert_eq!(status_name('Z'), "zombie");
        assert_eq!(status_name('T'), "stopped");
    }

    #[test]
    fn unknown_status_passes_through() {
        assert_eq!(status_name('Q'), "Q");
    }

    #[test]
    fn affinity_of_own_process_is_positive() {
        let cores = affinity_core_count(std::process::id() as i32);
        assert!(cores >= 1);
    }

    #[test]
    fn affinity_of_missing_process_is_zero() {
        //Negative pids are never valid, so the kernel rejects the query
        assert_eq!(affinity_core_count(-1), 0);
    }

    #[test]
    fn unreadable_memory_degrades_to_zero() {
        //No /proc/-1/smaps_rollup exists, so the read fails the same way a
        //permission denial does and must fall back to 0 instead of erroring
        assert_eq!(unique_set_size(-1), 0);
    }

    #[test]
    fn clock_ticks_is_sane() {
        assert!(clock_ticks_per_second() >= 1);
    }

    #[test]
    fn extracting_own_process_succeeds() {
        let prc = ProcfsProcess::myself().expect("own /proc entry");
        let (record, ticks) = extract(&prc).expect("extraction");

        assert_eq!(record.pid, std::process::id() as i32);
        assert!(!record.name.is_empty());
        assert!(record.n_threads >= 1);
        assert_ne!(record.username, "N/A");
        //Our own smaps_rollup is always readable
        assert!(record.memory_usage > 0);
        let _ = ticks;
    }
}
