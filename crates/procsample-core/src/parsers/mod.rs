//! One incremental parser per counter source.
//!
//! Each parser owns a [`LineScanner`](crate::scanner::LineScanner) and turns
//! a single pass over its source into a typed record. The timestamp is
//! captured at the end of a successful parse, not the start.

pub mod cpufreq;
pub mod cpuinfo;
pub mod diskstats;
pub mod loadavg;
pub mod meminfo;
pub mod netdev;
pub mod processors;
pub mod release;
pub mod stat;
pub mod uptime;
pub mod version;

use std::time::{SystemTime, UNIX_EPOCH};

/// Nanoseconds since the Unix epoch, UTC, right now.
pub(crate) fn now_ns() -> i64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_nanos() as i64
}
