//! The record types each profiler produces.
//!
//! Every record carries a `timestamp`: nanoseconds since the Unix epoch,
//! UTC, assigned when the sample finishes parsing (not when it started).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Memory totals in kilobytes, from `/proc/meminfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemInfo {
    pub timestamp: i64,
    pub mem_total: u64,
    pub mem_free: u64,
    pub mem_available: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_cached: u64,
    pub active: u64,
    pub inactive: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

/// One `processor:` block from `/proc/cpuinfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuFact {
    pub processor: u32,
    pub vendor_id: String,
    pub cpu_family: String,
    pub model: String,
    pub model_name: String,
    pub stepping: String,
    pub microcode: String,
    pub cpu_mhz: f32,
    pub cache_size: String,
    pub physical_id: i32,
    pub siblings: u32,
    pub core_id: i32,
    pub cpu_cores: u32,
    pub apicid: i32,
    pub initial_apicid: i32,
    pub fpu: String,
    pub fpu_exception: String,
    pub cpuid_level: String,
    pub wp: String,
    /// Whitespace-separated token list, preserved as one string; split on
    /// demand by callers that need individual flags.
    pub flags: String,
    pub bogomips: f32,
    pub clflush_size: String,
    pub cache_alignment: String,
    pub address_sizes: String,
    pub power_management: String,
}

/// The full `/proc/cpuinfo` listing, one [`CpuFact`] per logical CPU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CPUInfo {
    pub timestamp: i64,
    pub cpus: Vec<CpuFact>,
}

/// One host's aggregated CPU topology: `/proc/cpuinfo` folded together with
/// a walk of `/sys/devices/system/cpu/cpu<N>/{cpufreq,cache}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Processors {
    pub timestamp: i64,
    pub sockets: u32,
    pub cpus: u32,
    pub cores_per_socket: u32,
    pub threads_per_core: u32,
    pub vendor_id: String,
    pub cpu_family: String,
    pub model: String,
    pub model_name: String,
    pub stepping: String,
    pub microcode: String,
    pub cpu_mhz: f32,
    pub mhz_min: f32,
    pub mhz_max: f32,
    pub cache_size: String,
    /// Cache level identifier (e.g. `"L1d"`, `"L2"`) to human-readable size.
    pub cache: HashMap<String, String>,
    /// Iteration order of `cache`'s keys, since map order is not stable.
    pub cache_ids: Vec<String>,
    pub bogomips: f32,
    pub flags: Vec<String>,
    /// Always includes `"32-bit"`; includes `"64-bit"` iff `flags` has `lm`.
    pub op_modes: Vec<String>,
}

/// Per-CPU jiffy counters from one line of `/proc/stat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuUsage {
    /// `"cpu"` for the aggregate line, `"cpu<n>"` for each logical CPU.
    pub id: String,
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

/// A full `/proc/stat` sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub timestamp: i64,
    pub ctxt: u64,
    pub btime: u64,
    pub processes: u64,
    pub cpus: Vec<CpuUsage>,
}

/// Per-CPU jiffy deltas, converted to a percentage of the interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuPercent {
    pub id: String,
    pub usage: u64,
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

/// The delta between two [`Stat`] snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CPUUtilization {
    pub timestamp: i64,
    pub time_delta: i64,
    pub btime_delta: u64,
    pub ctxt_delta: u64,
    pub processes: u64,
    pub cpus: Vec<CpuPercent>,
}

/// One device's counters from a line of `/proc/diskstats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskStat {
    pub major: u32,
    pub minor: u32,
    pub name: String,
    pub reads_completed: u64,
    pub reads_merged: u64,
    pub sectors_read: u64,
    pub reading_ms: u64,
    pub writes_completed: u64,
    pub writes_merged: u64,
    pub sectors_written: u64,
    pub writing_ms: u64,
    pub io_in_progress: u64,
    pub io_ms: u64,
    pub weighted_io_ms: u64,
}

/// A full `/proc/diskstats` sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskStats {
    pub timestamp: i64,
    pub disks: Vec<DiskStat>,
}

/// One interface's counters from a line of `/proc/net/dev`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevInfo {
    pub name: String,
    pub rx_bytes: u64,
    pub rx_packets: u64,
    pub rx_errs: u64,
    pub rx_drop: u64,
    pub rx_fifo: u64,
    pub rx_frame: u64,
    pub rx_compressed: u64,
    pub rx_multicast: u64,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub tx_errs: u64,
    pub tx_drop: u64,
    pub tx_fifo: u64,
    pub tx_colls: u64,
    pub tx_carrier: u64,
    pub tx_compressed: u64,
}

/// A full `/proc/net/dev` sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetDev {
    pub timestamp: i64,
    pub interfaces: Vec<DevInfo>,
}

/// One interface's counter deltas between two [`NetDev`] snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevUsage {
    pub name: String,
    pub rx_bytes: u64,
    pub rx_packets: u64,
    pub rx_errs: u64,
    pub rx_drop: u64,
    pub rx_fifo: u64,
    pub rx_frame: u64,
    pub rx_compressed: u64,
    pub rx_multicast: u64,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub tx_errs: u64,
    pub tx_drop: u64,
    pub tx_fifo: u64,
    pub tx_colls: u64,
    pub tx_carrier: u64,
    pub tx_compressed: u64,
}

/// The delta between two [`NetDev`] snapshots, aligned by interface name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetUsage {
    pub timestamp: i64,
    pub time_delta: i64,
    pub interfaces: Vec<DevUsage>,
}

/// `/proc/uptime`: seconds since boot and aggregated per-CPU idle time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uptime {
    pub timestamp: i64,
    pub total: f64,
    pub idle: f64,
}

/// `/proc/loadavg`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadAvg {
    pub timestamp: i64,
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
    pub runnable: u32,
    pub total_tasks: u32,
    pub last_pid: u32,
}

/// The running kernel's build string, from `/proc/version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub timestamp: i64,
    pub version: String,
}

/// Distribution metadata from `/etc/os-release`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub timestamp: i64,
    pub name: Option<String>,
    pub id: Option<String>,
    pub id_like: Option<String>,
    pub pretty_name: Option<String>,
    pub version: Option<String>,
}
