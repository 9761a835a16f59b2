//! Parses `/proc/uptime`: two whitespace-separated floats.

use crate::decode::parse_f64;
use crate::kv::split_fields;
use crate::model::Uptime;
use crate::scanner::LineScanner;
use crate::source::SourceHandle;
use crate::Error;

use super::now_ns;

pub struct UptimeParser {
    scanner: LineScanner,
}

impl UptimeParser {
    pub fn new() -> Self {
        Self { scanner: LineScanner::new() }
    }

    pub fn parse(&mut self, source: &mut SourceHandle) -> Result<Uptime, Error> {
        let line = self.scanner.next_line(source)?.unwrap_or(&[]);
        let mut fields = split_fields(line);
        let total = fields.next().map(|f| parse_f64("uptime total", f)).transpose()?.unwrap_or(0.0);
        let idle = fields.next().map(|f| parse_f64("uptime idle", f)).transpose()?.unwrap_or(0.0);
        Ok(Uptime { timestamp: now_ns(), total, idle })
    }
}

impl Default for UptimeParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_two_floats() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"350735.47 1159581.22\n").unwrap();
        let mut source = SourceHandle::open(file.path()).unwrap();
        let uptime = UptimeParser::new().parse(&mut source).unwrap();
        assert!((uptime.total - 350735.47).abs() < 1e-6);
        assert!((uptime.idle - 1159581.22).abs() < 1e-6);
    }
}
