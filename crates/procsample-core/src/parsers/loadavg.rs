//! Parses `/proc/loadavg`: three floats, then `runnable/total`, then `last_pid`.

use crate::decode::{parse_f64, parse_u64};
use crate::kv::split_fields;
use crate::model::LoadAvg;
use crate::scanner::LineScanner;
use crate::source::SourceHandle;
use crate::Error;

use super::now_ns;

pub struct LoadAvgParser {
    scanner: LineScanner,
}

impl LoadAvgParser {
    pub fn new() -> Self {
        Self { scanner: LineScanner::new() }
    }

    pub fn parse(&mut self, source: &mut SourceHandle) -> Result<LoadAvg, Error> {
        let line = self.scanner.next_line(source)?.unwrap_or(&[]);
        let mut fields = split_fields(line);

        let one = fields.next().map(|f| parse_f64("loadavg one", f)).transpose()?.unwrap_or(0.0);
        let five = fields.next().map(|f| parse_f64("loadavg five", f)).transpose()?.unwrap_or(0.0);
        let fifteen = fields.next().map(|f| parse_f64("loadavg fifteen", f)).transpose()?.unwrap_or(0.0);

        let mut runnable = 0;
        let mut total_tasks = 0;
        if let Some(field) = fields.next() {
            if let Some(slash) = field.iter().position(|&b| b == b'/') {
                runnable = parse_u64("loadavg runnable", &field[..slash])? as u32;
                total_tasks = parse_u64("loadavg total_tasks", &field[slash + 1..])? as u32;
            }
        }
        let last_pid = fields
            .next()
            .map(|f| parse_u64("loadavg last_pid", f))
            .transpose()?
            .unwrap_or(0) as u32;

        Ok(LoadAvg { timestamp: now_ns(), one, five, fifteen, runnable, total_tasks, last_pid })
    }
}

impl Default for LoadAvgParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_all_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0.52 0.48 0.39 3/512 12345\n").unwrap();
        let mut source = SourceHandle::open(file.path()).unwrap();
        let avg = LoadAvgParser::new().parse(&mut source).unwrap();

        assert!((avg.one - 0.52).abs() < 1e-6);
        assert!((avg.five - 0.48).abs() < 1e-6);
        assert!((avg.fifteen - 0.39).abs() < 1e-6);
        assert_eq!(avg.runnable, 3);
        assert_eq!(avg.total_tasks, 512);
        assert_eq!(avg.last_pid, 12345);
    }
}
