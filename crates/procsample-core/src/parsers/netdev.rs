//! Parses `/proc/net/dev`.

use crate::decode::parse_u64;
use crate::kv::split_fields;
use crate::model::{DevInfo, NetDev};
use crate::scanner::LineScanner;
use crate::source::SourceHandle;
use crate::Error;

use super::now_ns;

/// Reusable parser state for `/proc/net/dev`.
///
/// Skips the two header lines; for each interface line, the name is
/// everything up to the first `:`, then 16 whitespace-delimited counters
/// follow in fixed kernel column order (receive side, then transmit side).
pub struct NetDevParser {
    scanner: LineScanner,
}

impl NetDevParser {
    pub fn new() -> Self {
        Self { scanner: LineScanner::new() }
    }

    pub fn parse(&mut self, source: &mut SourceHandle) -> Result<NetDev, Error> {
        let mut interfaces = Vec::new();

        self.scanner.next_line(source)?; // "Inter-|   Receive ..."
        self.scanner.next_line(source)?; // " face |bytes    packets ..."

        while let Some(line) = self.scanner.next_line(source)? {
            let Some(colon) = line.iter().position(|&b| b == b':') else { continue };
            let name = trim_start(&line[..colon]);
            let rest = &line[colon + 1..];

            let nums: Vec<u64> = split_fields(rest)
                .map(|f| parse_u64("netdev field", f))
                .collect::<Result<_, _>>()?;
            let at = |i: usize| nums.get(i).copied().unwrap_or(0);

            interfaces.push(DevInfo {
                name: String::from_utf8_lossy(name).into_owned(),
                rx_bytes: at(0),
                rx_packets: at(1),
                rx_errs: at(2),
                rx_drop: at(3),
                rx_fifo: at(4),
                rx_frame: at(5),
                rx_compressed: at(6),
                rx_multicast: at(7),
                tx_bytes: at(8),
                tx_packets: at(9),
                tx_errs: at(10),
                tx_drop: at(11),
                tx_fifo: at(12),
                tx_colls: at(13),
                tx_carrier: at(14),
                tx_compressed: at(15),
            });
        }

        Ok(NetDev { timestamp: now_ns(), interfaces })
    }
}

impl Default for NetDevParser {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_start(mut buf: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = buf {
        buf = rest;
    }
    buf
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
    fn skips_header_and_parses_two_interfaces() {
        let fixture = "Inter-|   Receive                                                |  Transmit\n \
                        face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed\n\
                          lo:       0       0    0    0    0     0          0         0        0       0    0    0    0     0       0          0\n\
                        eth0:    1000       5    0    0    0     0          0         0     2000      10    0    0    0     0       0          0\n";
        let mut source = source_with(fixture);
        let netdev = NetDevParser::new().parse(&mut source).unwrap();

        assert_eq!(netdev.interfaces.len(), 2);
        assert_eq!(netdev.interfaces[0].name, "lo");
        assert_eq!(netdev.interfaces[1].name, "eth0");
        assert_eq!(netdev.interfaces[1].rx_bytes, 1000);
        assert_eq!(netdev.interfaces[1].tx_bytes, 2000);
    }
}
