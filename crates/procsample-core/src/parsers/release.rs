//! Parses `/etc/os-release`: `KEY=VALUE` pairs, values optionally quoted.

use crate::model::Release;
use crate::scanner::LineScanner;
use crate::source::SourceHandle;
use crate::Error;

use super::now_ns;

pub struct ReleaseParser {
    scanner: LineScanner,
}

impl ReleaseParser {
    pub fn new() -> Self {
        Self { scanner: LineScanner::new() }
    }

    pub fn parse(&mut self, source: &mut SourceHandle) -> Result<Release, Error> {
        let mut release = Release {
            timestamp: 0,
            name: None,
            id: None,
            id_like: None,
            pretty_name: None,
            version: None,
        };

        while let Some(line) = self.scanner.next_line(source)? {
            if line.is_empty() || line[0] == b'#' {
                continue;
            }
            let Some(eq) = line.iter().position(|&b| b == b'=') else { continue };
            let key = &line[..eq];
            let value = unquote(&line[eq + 1..]);

            match key {
                b"NAME" => release.name = Some(value),
                b"ID" => release.id = Some(value),
                b"ID_LIKE" => release.id_like = Some(value),
                b"PRETTY_NAME" => release.pretty_name = Some(value),
                b"VERSION" => release.version = Some(value),
                _ => {}
            }
        }

        release.timestamp = now_ns();
        Ok(release)
    }
}

impl Default for ReleaseParser {
    fn default() -> Self {
        Self::new()
    }
}

fn unquote(bytes: &[u8]) -> String {
    let trimmed = match bytes {
        [b'"', middle @ .., b'"'] => middle,
        [b'\'', middle @ .., b'\''] => middle,
        other => other,
    };
    String::from_utf8_lossy(trimmed).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_quoted_and_bare_values() {
        let fixture = "NAME=\"Ubuntu\"\n\
                        ID=ubuntu\n\
                        ID_LIKE=debian\n\
                        PRETTY_NAME=\"Ubuntu 22.04.3 LTS\"\n\
                        VERSION=\"22.04.3 LTS (Jammy Jellyfish)\"\n";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(fixture.as_bytes()).unwrap();
        let mut source = SourceHandle::open(file.path()).unwrap();
        let release = ReleaseParser::new().parse(&mut source).unwrap();

        assert_eq!(release.name.as_deref(), Some("Ubuntu"));
        assert_eq!(release.id.as_deref(), Some("ubuntu"));
        assert_eq!(release.id_like.as_deref(), Some("debian"));
        assert_eq!(release.pretty_name.as_deref(), Some("Ubuntu 22.04.3 LTS"));
    }
}
