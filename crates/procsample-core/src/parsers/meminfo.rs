//! Parses `/proc/meminfo`.

use crate::decode::parse_u64_prefix;
use crate::kv::split_colon;
use crate::model::MemInfo;
use crate::scanner::LineScanner;
use crate::source::SourceHandle;
use crate::Error;

use super::now_ns;

/// Reusable parser state for `/proc/meminfo`.
///
/// Reads at most 16 lines; lines 9 through 13 (1-indexed) are skipped, since
/// they hold fields this library does not expose.
pub struct MemInfoParser {
    scanner: LineScanner,
}

impl MemInfoParser {
    pub fn new() -> Self {
        Self { scanner: LineScanner::new() }
    }

    pub fn parse(&mut self, source: &mut SourceHandle) -> Result<MemInfo, Error> {
        let mut info = MemInfo {
            timestamp: 0,
            mem_total: 0,
            mem_free: 0,
            mem_available: 0,
            buffers: 0,
            cached: 0,
            swap_cached: 0,
            active: 0,
            inactive: 0,
            swap_total: 0,
            swap_free: 0,
        };

        for line_no in 0..16u32 {
            let line = match self.scanner.next_line(source)? {
                Some(line) => line,
                None => break,
            };
            if (8..13).contains(&line_no) {
                continue;
            }
            let Some((key, value)) = split_colon(line) else {
                continue;
            };
            // Reject "Active(anon)"/"Inactive(file)" and similar breakdown
            // variants outright: the byte-prefix dispatch below would
            // otherwise mistake them for the bare `Active`/`Inactive` keys.
            if key.contains(&b'(') {
                continue;
            }
            // The value runs up to the unit suffix (" kB"); only the leading
            // digits matter.
            let n = parse_u64_prefix("meminfo", value)?;

            match key.first() {
                Some(b'M') => match key.get(3) {
                    Some(b'T') => info.mem_total = n,
                    Some(b'F') => info.mem_free = n,
                    _ => info.mem_available = n,
                },
                Some(b'S') => match key.get(4) {
                    Some(b'C') => info.swap_cached = n,
                    Some(b'T') => info.swap_total = n,
                    Some(b'F') => info.swap_free = n,
                    _ => {}
                },
                Some(b'B') => info.buffers = n,
                Some(b'I') => info.inactive = n,
                Some(b'C') => info.cached = n,
                Some(b'A') => info.active = n,
                _ => {}
            }
        }

        info.timestamp = now_ns();
        Ok(info)
    }
}

impl Default for MemInfoParser {
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
    fn parses_known_fields_and_skips_unknowns() {
        let fixture = "MemTotal:       8000000 kB\n\
                        MemFree:        1000000 kB\n\
                        MemAvailable:   2000000 kB\n\
                        Buffers:         100000 kB\n\
                        Cached:          500000 kB\n\
                        SwapCached:           0 kB\n\
                        Active:         3000000 kB\n\
                        Inactive:       2000000 kB\n\
                        Active(anon):   1000000 kB\n\
                        Inactive(anon):  900000 kB\n\
                        Active(file):   2000000 kB\n\
                        Inactive(file): 1100000 kB\n\
                        Unevictable:          0 kB\n\
                        SwapTotal:      4000000 kB\n\
                        SwapFree:       3500000 kB\n";
        let mut source = source_with(fixture);
        let mut parser = MemInfoParser::new();
        let info = parser.parse(&mut source).unwrap();

        assert_eq!(info.mem_total, 8000000);
        assert_eq!(info.mem_free, 1000000);
        assert_eq!(info.mem_available, 2000000);
        assert_eq!(info.buffers, 100000);
        assert_eq!(info.cached, 500000);
        assert_eq!(info.swap_cached, 0);
        assert_eq!(info.active, 3000000);
        assert_eq!(info.inactive, 2000000);
        assert_eq!(info.swap_total, 4000000);
        assert_eq!(info.swap_free, 3500000);
        assert!(info.timestamp > 0);
    }

    #[test]
    fn invariants_hold() {
        let fixture = "MemTotal: 100 kB\nMemFree: 50 kB\nSwapTotal: 10 kB\nSwapFree: 5 kB\n";
        let mut source = source_with(fixture);
        let info = MemInfoParser::new().parse(&mut source).unwrap();
        assert!(info.mem_free <= info.mem_total);
        assert!(info.swap_free <= info.swap_total);
    }
}
