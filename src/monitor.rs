use std::collections::HashMap;
use std::time::Instant;

use log::warn;
use procfs::ProcError;

use crate::error::Error;
use crate::process::{self, ProcessRecord};

/// All process records captured in one collection pass, in enumeration order.
/// Ordering is established later, by the table projection.
pub type Snapshot = Vec<ProcessRecord>;

// Reads the /proc filesystem and turns every observable process into a
// ProcessRecord. Also calculates CPU percentage by tracking CPU time between
// collection passes.
pub struct SnapshotCollector {
    //pid -> (total CPU ticks, when they were sampled); the sampling window
    //that turns cumulative tick counters into a usage percentage
    previous_cpu_times: HashMap<i32, (u64, Instant)>,
    num_cores: f64,
    ticks_per_second: f64,
}

impl SnapshotCollector {
    pub fn new() -> Self {
        SnapshotCollector {
            previous_cpu_times: HashMap::new(),
            num_cores: online_cores(),
            ticks_per_second: clock_ticks(),
        }
    }

    /// Enumerates every process visible at the caller's privilege level.
    ///
    /// A process that vanishes between enumeration and extraction, or whose
    /// stat cannot be read, is excluded and the pass continues; one broken
    /// process never aborts the snapshot. The reserved idle pseudo-process
    /// (pid 0) is skipped deliberately.
    pub fn collect(&mut self) -> Result<Snapshot, Error> {
        let procfs_processes = procfs::process::all_processes()?;

        let now = Instant::now();
        let mut snapshot = Snapshot::new();
        let mut cpu_times = HashMap::new();

        for p in procfs_processes {
            let Ok(prc) = p else {
                continue; //Skip listing errors
            };

            if prc.pid == 0 {
                continue; //Kernel idle pseudo-process, useless to see anyways
            }

            let (mut record, ticks) = match process::extract(&prc) {
                Ok(extracted) => extracted,
                Err(ProcError::NotFound(_)) => {
                    //The process vanished between listing and reading its data
                    continue;
                }
                Err(e) => {
                    warn!("could not read data for pid {}: {:?}", prc.pid, e);
                    continue;
                }
            };

            record.cpu_usage = self.cpu_percent(record.pid, ticks, now);
            cpu_times.insert(record.pid, (ticks, now));
            snapshot.push(record);
        }

        //Replacing the map wholesale drops baselines for vanished processes
        self.previous_cpu_times = cpu_times;

        Ok(snapshot)
    }

    //CPU% = (delta CPU time / delta wall time) * 100 / number of cores.
    //Without a previous sample for this pid there is no baseline, so 0.0.
    fn cpu_percent(&self, pid: i32, ticks: u64, now: Instant) -> f32 {
        let Some(&(prev_ticks, prev_at)) = self.previous_cpu_times.get(&pid) else {
            return 0.0;
        };

        let delta_cpu_secs = ticks.saturating_sub(prev_ticks) as f64 / self.ticks_per_second;
        let delta_wall_secs = now.duration_since(prev_at).as_secs_f64();

        if delta_wall_secs > 0.0 {
            ((delta_cpu_secs / delta_wall_secs) * 100.0 / self.num_cores) as f32
        } else {
            0.0
        }
    }
}

impl Default for SnapshotCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn online_cores() -> f64 {
    let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    if n > 0 { n as f64 } else { 1.0 }
}

fn clock_ticks() -> f64 {
    let hz = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if hz > 0 { hz as f64 } else { 100.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn snapshot_pids_are_unique_and_nonzero() {
        let mut collector = SnapshotCollector::new();
        let snapshot = collector.collect().expect("collection");

        assert!(!snapshot.is_empty());

        let mut seen = HashSet::new();
        for record in &snapshot {
            assert_ne!(record.pid, 0);
            assert!(seen.insert(record.pid), "duplicate pid {}", record.pid);
        }
    }

    #[test]
    fn first_pass_reports_zero_cpu() {
        let mut collector = SnapshotCollector::new();
        let snapshot = collector.collect().expect("collection");

        //No baseline exists on the first pass for any process
        assert!(snapshot.iter().all(|r| r.cpu_usage == 0.0));
    }

    #[test]
    fn second_pass_keeps_usage_non_negative() {
        let mut collector = SnapshotCollector::new();
        collector.collect().expect("first pass");
        let snapshot = collector.collect().expect("second pass");

        assert!(snapshot.iter().all(|r| r.cpu_usage >= 0.0));
    }

    #[test]
    fn own_process_shows_up() {
        let mut collector = SnapshotCollector::new();
        let snapshot = collector.collect().expect("collection");
        let own = std::process::id() as i32;

        assert!(snapshot.iter().any(|r| r.pid == own));
    }
}
