use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, ProcessRefreshKind, RefreshKind, System, UpdateKind,
    Users,
};

/// Host facts that hold for the whole run (read once at startup).
#[derive(Clone, Debug)]
pub struct SystemInfo {
    pub os_name: String,
    pub os_version: String,
    pub kernel_version: String,
    pub hostname: String,
}

/// One performance sample (CPU / memory / swap), taken every perf tick.
#[derive(Clone, Copy, Debug)]
pub struct PerfSample {
    pub cpu_pct: f32,
    pub mem_pct: f32,
    pub swap_pct: f32,
    pub mem_used: u64,
    pub mem_total: u64,
    pub swap_used: u64,
    pub swap_total: u64,
}

#[derive(Clone, Debug)]
pub struct ProcessInfo {
    pub pid: u32,
    pub parent_pid: Option<u32>,
    pub name: String,
    pub user: String,
    pub cmd: Vec<String>,
    pub exe: Option<String>,
    pub cpu_usage: f32,
    pub memory_bytes: u64,
    /// Read/write rates in bytes per second, from successive I/O totals.
    pub read_bps: u64,
    pub write_bps: u64,
    /// Tasks belonging to the process, main thread included.
    pub thread_count: u32,
    /// Single-letter scheduler state (R, S, D, Z, T, I).
    pub status: char,
}

#[derive(Clone, Debug)]
pub struct DiskInfo {
    pub name: String,
    pub mount: String,
    pub fs_type: String,
    pub total: u64,
    pub available: u64,
}

/// Long form of a status char for the details pane.
pub fn status_name(status: char) -> &'static str {
    match status {
        'R' => "running",
        'S' => "sleeping",
        'Z' => "zombie",
        'I' => "idle",
        'T' => "stopped",
        'D' => "disk wait",
        _ => "unknown",
    }
}

// ─── I/O RATE TRACKING ──────────────────────────────────────────

struct IoStamp {
    at: Instant,
    read_total: u64,
    write_total: u64,
}

/// Per-process delta cache turning cumulative I/O byte counters into
/// bytes-per-second rates. Entries for vanished PIDs are evicted after
/// every collection pass.
pub struct IoRateTracker {
    stamps: HashMap<u32, IoStamp>,
}

impl IoRateTracker {
    pub fn new() -> Self {
        Self {
            stamps: HashMap::new(),
        }
    }

    /// Records the current totals for `pid` and returns (read, write) rates
    /// in bytes per second. The first sighting of a PID yields zero rates.
    pub fn update(&mut self, pid: u32, read_total: u64, write_total: u64, at: Instant) -> (u64, u64) {
        let rates = match self.stamps.get(&pid) {
            Some(prev) => {
                let dt = at.duration_since(prev.at).as_secs_f64();
                if dt > 0.0 {
                    // saturating_sub: totals restart when a PID is recycled
                    let read = read_total.saturating_sub(prev.read_total) as f64 / dt;
                    let write = write_total.saturating_sub(prev.write_total) as f64 / dt;
                    (read as u64, write as u64)
                } else {
                    (0, 0)
                }
            }
            None => (0, 0),
        };
        self.stamps.insert(
            pid,
            IoStamp {
                at,
                read_total,
                write_total,
            },
        );
        rates
    }

    /// Drops cache entries for PIDs no longer alive.
    pub fn retain_live(&mut self, live: &HashSet<u32>) {
        self.stamps.retain(|pid, _| live.contains(pid));
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.stamps.len()
    }
}

// ─── COLLECTOR ──────────────────────────────────────────────────

/// Owns the sysinfo handles and the I/O-rate cache. Each data source has
/// its own collect method so the UI can poll them on different timers.
pub struct Collector {
    sys: System,
    disks: Disks,
    users: Users,
    io_rates: IoRateTracker,
    pub sys_info: Arc<SystemInfo>,
}

impl Collector {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        let sys_info = Arc::new(SystemInfo {
            os_name: System::name().unwrap_or_else(|| "Unknown".into()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".into()),
            kernel_version: System::kernel_version().unwrap_or_else(|| "Unknown".into()),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".into()),
        });

        Self {
            sys,
            disks: Disks::new_with_refreshed_list(),
            users: Users::new_with_refreshed_list(),
            io_rates: IoRateTracker::new(),
            sys_info,
        }
    }

    /// CPU / memory / swap percentages for the performance charts.
    pub fn collect_perf(&mut self) -> PerfSample {
        self.sys.refresh_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::new().with_cpu_usage())
                .with_memory(MemoryRefreshKind::everything()),
        );

        let cpus = self.sys.cpus();
        let cpu_pct = if cpus.is_empty() {
            0.0
        } else {
            cpus.iter().map(|c| c.cpu_usage()).sum::<f32>() / cpus.len() as f32
        };

        let mem_total = self.sys.total_memory();
        let mem_used = self.sys.used_memory();
        let swap_total = self.sys.total_swap();
        let swap_used = self.sys.used_swap();

        PerfSample {
            cpu_pct,
            mem_pct: percent(mem_used, mem_total),
            swap_pct: percent(swap_used, swap_total),
            mem_used,
            mem_total,
            swap_used,
            swap_total,
        }
    }

    /// The full process table. Thread entries are folded into a per-process
    /// task count; I/O rates come from the delta cache.
    pub fn collect_processes(&mut self) -> Vec<ProcessInfo> {
        // cmd/exe/user don't change over a process lifetime; fetch them once
        let proc_refresh = ProcessRefreshKind::new()
            .with_cpu()
            .with_memory()
            .with_disk_usage()
            .with_user(UpdateKind::OnlyIfNotSet)
            .with_cmd(UpdateKind::OnlyIfNotSet)
            .with_exe(UpdateKind::OnlyIfNotSet);

        self.sys
            .refresh_specifics(RefreshKind::new().with_processes(proc_refresh));

        let num_cpus = self.sys.cpus().len().max(1) as f32;

        // Pre-build the thread-count map in one pass.
        let mut thread_counts: HashMap<sysinfo::Pid, u32> = HashMap::new();
        for p in self.sys.processes().values() {
            if let (Some(parent), Some(_)) = (p.parent(), p.thread_kind()) {
                *thread_counts.entry(parent).or_insert(0) += 1;
            }
        }

        let now = Instant::now();
        let mut live: HashSet<u32> = HashSet::new();

        let processes: Vec<ProcessInfo> = self
            .sys
            .processes()
            .values()
            .filter(|p| p.thread_kind().is_none())
            .map(|p| {
                let pid = p.pid().as_u32();
                live.insert(pid);

                let user = p
                    .user_id()
                    .map(|uid| match self.users.get_user_by_id(uid) {
                        Some(u) => u.name().to_string(),
                        None => (**uid).to_string(),
                    })
                    .unwrap_or_else(|| "-".into());

                let status = match p.status() {
                    sysinfo::ProcessStatus::Run => 'R',
                    sysinfo::ProcessStatus::Sleep => 'S',
                    sysinfo::ProcessStatus::Zombie => 'Z',
                    sysinfo::ProcessStatus::Idle => 'I',
                    sysinfo::ProcessStatus::Stop => 'T',
                    sysinfo::ProcessStatus::UninterruptibleDiskSleep => 'D',
                    _ => 'S',
                };

                let du = p.disk_usage();
                let (read_bps, write_bps) =
                    self.io_rates
                        .update(pid, du.total_read_bytes, du.total_written_bytes, now);

                ProcessInfo {
                    pid,
                    parent_pid: p.parent().map(|pp| pp.as_u32()),
                    name: p.name().to_string_lossy().to_string(),
                    user,
                    cmd: p
                        .cmd()
                        .iter()
                        .map(|s| s.to_string_lossy().to_string())
                        .collect(),
                    exe: p.exe().map(|e| e.to_string_lossy().to_string()),
                    cpu_usage: p.cpu_usage() / num_cpus,
                    memory_bytes: p.memory(),
                    read_bps,
                    write_bps,
                    thread_count: thread_counts.get(&p.pid()).copied().unwrap_or(0) + 1,
                    status,
                }
            })
            .collect();

        self.io_rates.retain_live(&live);
        processes
    }

    /// Mounted filesystems with capacity figures.
    pub fn collect_disks(&mut self) -> Vec<DiskInfo> {
        self.disks.refresh_list();
        self.disks
            .iter()
            .filter(|d| d.total_space() > 0)
            .map(|d| DiskInfo {
                name: d.name().to_string_lossy().to_string(),
                mount: d.mount_point().to_string_lossy().to_string(),
                fs_type: d.file_system().to_string_lossy().to_string(),
                total: d.total_space(),
                available: d.available_space(),
            })
            .collect()
    }

    /// Resolves the executable path recorded for a PID, if any.
    pub fn exe_of(&self, pid: u32) -> Option<String> {
        self.sys
            .process(sysinfo::Pid::from_u32(pid))
            .and_then(|p| p.exe())
            .map(|e| e.to_string_lossy().to_string())
    }
}

pub fn uptime_secs() -> u64 {
    System::uptime()
}

fn percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        used as f32 / total as f32 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_io_rates_first_sighting_is_zero() {
        let mut tracker = IoRateTracker::new();
        let now = Instant::now();
        assert_eq!(tracker.update(1, 4096, 1024, now), (0, 0));
    }

    #[test]
    fn test_io_rates_from_deltas() {
        let mut tracker = IoRateTracker::new();
        let t0 = Instant::now();
        tracker.update(1, 10_000, 5_000, t0);
        let t1 = t0 + Duration::from_secs(2);
        let (read, write) = tracker.update(1, 30_000, 9_000, t1);
        assert_eq!(read, 10_000);
        assert_eq!(write, 2_000);
    }

    #[test]
    fn test_io_rates_counter_reset_clamps_to_zero() {
        // PID recycled: new process starts with smaller totals
        let mut tracker = IoRateTracker::new();
        let t0 = Instant::now();
        tracker.update(7, 50_000, 50_000, t0);
        let (read, write) = tracker.update(7, 100, 100, t0 + Duration::from_secs(1));
        assert_eq!((read, write), (0, 0));
    }

    #[test]
    fn test_io_rates_evicts_dead_pids() {
        let mut tracker = IoRateTracker::new();
        let now = Instant::now();
        tracker.update(1, 0, 0, now);
        tracker.update(2, 0, 0, now);
        tracker.update(3, 0, 0, now);
        let live: HashSet<u32> = [1, 3].into_iter().collect();
        tracker.retain_live(&live);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_status_names() {
        assert_eq!(status_name('R'), "running");
        assert_eq!(status_name('Z'), "zombie");
        assert_eq!(status_name('?'), "unknown");
    }

    #[test]
    fn test_percent_guards_zero_total() {
        assert_eq!(percent(10, 0), 0.0);
        assert!((percent(1, 4) - 25.0).abs() < 0.01);
    }

    #[test]
    fn test_collect_perf_in_range() {
        let mut collector = Collector::new();
        let sample = collector.collect_perf();
        assert!((0.0..=100.0).contains(&sample.mem_pct));
        assert!((0.0..=100.0).contains(&sample.swap_pct));
        assert!(sample.mem_total >= sample.mem_used);
    }
}
