//! Parses `/proc/version`: a single line identifying the running kernel build.

use crate::model::Version;
use crate::scanner::LineScanner;
use crate::source::SourceHandle;
use crate::Error;

use super::now_ns;

pub struct VersionParser {
    scanner: LineScanner,
}

impl VersionParser {
    pub fn new() -> Self {
        Self { scanner: LineScanner::new() }
    }

    pub fn parse(&mut self, source: &mut SourceHandle) -> Result<Version, Error> {
        let line = self.scanner.next_line(source)?.unwrap_or(&[]);
        let version = String::from_utf8_lossy(line).into_owned();
        Ok(Version { timestamp: now_ns(), version })
    }
}

impl Default for VersionParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn captures_the_whole_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Linux version 6.1.0-generic (build@host) (gcc 12) #1 SMP\n").unwrap();
        let mut source = SourceHandle::open(file.path()).unwrap();
        let version = VersionParser::new().parse(&mut source).unwrap();
        assert!(version.version.starts_with("Linux version 6.1.0-generic"));
    }
}
