//! Parses `/proc/diskstats`.

use crate::decode::parse_u64;
use crate::kv::split_fields;
use crate::model::{DiskStat, DiskStats};
use crate::scanner::LineScanner;
use crate::source::SourceHandle;
use crate::Error;

use super::now_ns;

/// Reusable parser state for `/proc/diskstats`.
///
/// Each line is `major minor name` followed by 14 whitespace-delimited
/// counters in fixed kernel column order.
pub struct DiskStatsParser {
    scanner: LineScanner,
}

impl DiskStatsParser {
    pub fn new() -> Self {
        Self { scanner: LineScanner::new() }
    }

    pub fn parse(&mut self, source: &mut SourceHandle) -> Result<DiskStats, Error> {
        let mut disks = Vec::new();

        while let Some(line) = self.scanner.next_line(source)? {
            let mut fields = split_fields(line);
            let Some(major) = fields.next() else { continue };
            let Some(minor) = fields.next() else { continue };
            let Some(name) = fields.next() else { continue };

            let nums: Vec<u64> = fields.map(|f| parse_u64("diskstats field", f)).collect::<Result<_, _>>()?;
            let at = |i: usize| nums.get(i).copied().unwrap_or(0);

            disks.push(DiskStat {
                major: parse_u64("major", major)? as u32,
                minor: parse_u64("minor", minor)? as u32,
                name: String::from_utf8_lossy(name).into_owned(),
                reads_completed: at(0),
                reads_merged: at(1),
                sectors_read: at(2),
                reading_ms: at(3),
                writes_completed: at(4),
                writes_merged: at(5),
                sectors_written: at(6),
                writing_ms: at(7),
                io_in_progress: at(8),
                io_ms: at(9),
                weighted_io_ms: at(10),
            });
        }

        Ok(DiskStats { timestamp: now_ns(), disks })
    }
}

impl Default for DiskStatsParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn source_with(contents: &str) -> SourceHandle {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        SourceHandle::open(file.path()).unwrap()
    }

    #[test]
    fn parses_fixed_columns() {
        let fixture = "   8       0 sda 10268  3926 583792  6172  16861  28003 1249984  21376  0  14688  27548\n\
                        253       0 dm-0 100  0  2000  30  50  0  1000  20  0  40  50\n";
        let mut source = source_with(fixture);
        let stats = DiskStatsParser::new().parse(&mut source).unwrap();

        assert_eq!(stats.disks.len(), 2);
        assert_eq!(stats.disks[0].name, "sda");
        assert_eq!(stats.disks[0].major, 8);
        assert_eq!(stats.disks[0].reads_completed, 10268);
        assert_eq!(stats.disks[0].weighted_io_ms, 27548);
        assert_eq!(stats.disks[1].name, "dm-0");
    }
}
