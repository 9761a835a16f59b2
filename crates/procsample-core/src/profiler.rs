//! Pairs a [`SourceHandle`] with parser state behind a single `sample()`.

use std::path::Path;

use tracing::trace;

use crate::parsers::cpuinfo::CpuInfoParser;
use crate::parsers::diskstats::DiskStatsParser;
use crate::parsers::loadavg::LoadAvgParser;
use crate::parsers::meminfo::MemInfoParser;
use crate::parsers::netdev::NetDevParser;
use crate::parsers::processors::ProcessorsParser;
use crate::parsers::release::ReleaseParser;
use crate::parsers::stat::StatParser;
use crate::parsers::uptime::UptimeParser;
use crate::parsers::version::VersionParser;
use crate::source::SourceHandle;
use crate::Error;

/// Something that can turn one full pass over a source into a typed record.
pub trait Parse {
    type Output;

    fn parse(&mut self, source: &mut SourceHandle) -> Result<Self::Output, Error>;
}

macro_rules! impl_parse {
    ($parser:ty, $output:ty) => {
        impl Parse for $parser {
            type Output = $output;

            fn parse(&mut self, source: &mut SourceHandle) -> Result<Self::Output, Error> {
                <$parser>::parse(self, source)
            }
        }
    };
}

impl_parse!(MemInfoParser, crate::model::MemInfo);
impl_parse!(CpuInfoParser, crate::model::CPUInfo);
impl_parse!(ProcessorsParser, crate::model::Processors);
impl_parse!(StatParser, crate::model::Stat);
impl_parse!(DiskStatsParser, crate::model::DiskStats);
impl_parse!(NetDevParser, crate::model::NetDev);
impl_parse!(UptimeParser, crate::model::Uptime);
impl_parse!(LoadAvgParser, crate::model::LoadAvg);
impl_parse!(VersionParser, crate::model::Version);
impl_parse!(ReleaseParser, crate::model::Release);

/// Owns a rewindable source and the parser state that reads it.
///
/// `sample()` is the only operation: rewind, parse, return a freshly owned
/// record. Not safe for concurrent use — callers serialize access to one
/// profiler instance.
pub struct Profiler<P: Parse> {
    source: SourceHandle,
    parser: P,
}

impl<P: Parse> Profiler<P> {
    pub fn new(path: impl AsRef<Path>, parser: P) -> Result<Self, Error> {
        Ok(Self { source: SourceHandle::open(path)?, parser })
    }

    pub fn sample(&mut self) -> Result<P::Output, Error> {
        trace!(path = %self.source.path().display(), "sampling");
        self.source.rewind()?;
        self.parser.parse(&mut self.source)
    }
}

pub const PROC_MEMINFO: &str = "/proc/meminfo";
pub const PROC_CPUINFO: &str = "/proc/cpuinfo";
pub const PROC_STAT: &str = "/proc/stat";
pub const PROC_DISKSTATS: &str = "/proc/diskstats";
pub const PROC_NET_DEV: &str = "/proc/net/dev";
pub const PROC_UPTIME: &str = "/proc/uptime";
pub const PROC_LOADAVG: &str = "/proc/loadavg";
pub const PROC_VERSION: &str = "/proc/version";
pub const ETC_OS_RELEASE: &str = "/etc/os-release";

pub type MemInfoProfiler = Profiler<MemInfoParser>;
pub type CpuInfoProfiler = Profiler<CpuInfoParser>;
pub type ProcessorsProfiler = Profiler<ProcessorsParser>;
pub type StatProfiler = Profiler<StatParser>;
pub type DiskStatsProfiler = Profiler<DiskStatsParser>;
pub type NetDevProfiler = Profiler<NetDevParser>;
pub type UptimeProfiler = Profiler<UptimeParser>;
pub type LoadAvgProfiler = Profiler<LoadAvgParser>;
pub type VersionProfiler = Profiler<VersionParser>;
pub type ReleaseProfiler = Profiler<ReleaseParser>;

impl MemInfoProfiler {
    pub fn open_default() -> Result<Self, Error> {
        Self::new(PROC_MEMINFO, MemInfoParser::new())
    }
}

impl CpuInfoProfiler {
    pub fn open_default() -> Result<Self, Error> {
        Self::new(PROC_CPUINFO, CpuInfoParser::new())
    }
}

impl ProcessorsProfiler {
    pub fn open_default() -> Result<Self, Error> {
        Self::new(PROC_CPUINFO, ProcessorsParser::new())
    }
}

impl StatProfiler {
    pub fn open_default() -> Result<Self, Error> {
        Self::new(PROC_STAT, StatParser::new())
    }
}

impl DiskStatsProfiler {
    pub fn open_default() -> Result<Self, Error> {
        Self::new(PROC_DISKSTATS, DiskStatsParser::new())
    }
}

impl NetDevProfiler {
    pub fn open_default() -> Result<Self, Error> {
        Self::new(PROC_NET_DEV, NetDevParser::new())
    }
}

impl UptimeProfiler {
    pub fn open_default() -> Result<Self, Error> {
        Self::new(PROC_UPTIME, UptimeParser::new())
    }
}

impl LoadAvgProfiler {
    pub fn open_default() -> Result<Self, Error> {
        Self::new(PROC_LOADAVG, LoadAvgParser::new())
    }
}

impl VersionProfiler {
    pub fn open_default() -> Result<Self, Error> {
        Self::new(PROC_VERSION, VersionParser::new())
    }
}

impl ReleaseProfiler {
    pub fn open_default() -> Result<Self, Error> {
        Self::new(ETC_OS_RELEASE, ReleaseParser::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sample_rewinds_between_calls() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"MemTotal: 100 kB\nMemFree: 40 kB\n").unwrap();
        let mut profiler = MemInfoProfiler::new(file.path(), MemInfoParser::new()).unwrap();

        let first = profiler.sample().unwrap();
        let second = profiler.sample().unwrap();
        assert_eq!(first.mem_total, second.mem_total);
        assert_eq!(first.mem_total, 100);
    }

    #[test]
    fn open_fails_for_missing_file() {
        let result = MemInfoProfiler::new("/no/such/path", MemInfoParser::new());
        assert!(matches!(result, Err(Error::Open { .. })));
    }
}
