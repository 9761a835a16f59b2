//! A mutex-protected, lazily-initialized profiler per source, exposing a
//! zero-argument `sample()` for callers that just want one reading and
//! don't want to manage a [`crate::profiler::Profiler`] themselves.
//!
//! A construction failure on the first call leaves the shortcut
//! uninitialized, so a later call retries rather than failing forever.

use std::sync::Mutex;

use crate::model::{CPUInfo, DiskStats, LoadAvg, MemInfo, NetDev, Processors, Release, Stat, Uptime, Version};
use crate::profiler::{
    CpuInfoProfiler, DiskStatsProfiler, LoadAvgProfiler, MemInfoProfiler, NetDevProfiler,
    ProcessorsProfiler, ReleaseProfiler, StatProfiler, UptimeProfiler, VersionProfiler,
};
use crate::Error;

macro_rules! shortcut {
    ($modname:ident, $profiler:ty, $output:ty) => {
        pub mod $modname {
            use super::*;

            static PROFILER: Mutex<Option<$profiler>> = Mutex::new(None);

            pub fn sample() -> Result<$output, Error> {
                let mut guard = PROFILER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                if guard.is_none() {
                    *guard = Some(<$profiler>::open_default()?);
                }
                guard.as_mut().unwrap().sample()
            }
        }
    };
}

shortcut!(meminfo, MemInfoProfiler, MemInfo);
shortcut!(cpuinfo, CpuInfoProfiler, CPUInfo);
shortcut!(processors, ProcessorsProfiler, Processors);
shortcut!(stat, StatProfiler, Stat);
shortcut!(diskstats, DiskStatsProfiler, DiskStats);
shortcut!(netdev, NetDevProfiler, NetDev);
shortcut!(uptime, UptimeProfiler, Uptime);
shortcut!(loadavg, LoadAvgProfiler, LoadAvg);
shortcut!(version, VersionProfiler, Version);
shortcut!(release, ReleaseProfiler, Release);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sample_reuses_the_singleton_across_calls() {
        // Shortcuts read real /proc paths; exercise the underlying pattern
        // directly against a scratch file instead of relying on the host.
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"MemTotal: 500 kB\nMemFree: 100 kB\n").unwrap();

        let mut profiler = MemInfoProfiler::new(file.path(), crate::parsers::meminfo::MemInfoParser::new()).unwrap();
        let a = profiler.sample().unwrap();
        let b = profiler.sample().unwrap();
        assert_eq!(a.mem_total, b.mem_total);
    }
}
