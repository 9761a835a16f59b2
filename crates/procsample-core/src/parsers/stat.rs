//! Parses `/proc/stat`.

use crate::decode::parse_u64;
use crate::kv::split_fields;
use crate::model::{CpuUsage, Stat};
use crate::scanner::LineScanner;
use crate::source::SourceHandle;
use crate::Error;

use super::now_ns;

/// Reusable parser state for `/proc/stat`.
///
/// The aggregate `cpu` line is emitted first, followed by each `cpuN` line,
/// in kernel output order. `intr` and `softirq` lines are skipped entirely;
/// this library does not expose per-interrupt counters.
pub struct StatParser {
    scanner: LineScanner,
}

impl StatParser {
    pub fn new() -> Self {
        Self { scanner: LineScanner::new() }
    }

    pub fn parse(&mut self, source: &mut SourceHandle) -> Result<Stat, Error> {
        let mut stat = Stat { timestamp: 0, ctxt: 0, btime: 0, processes: 0, cpus: Vec::new() };

        while let Some(line) = self.scanner.next_line(source)? {
            let mut fields = split_fields(line);
            let Some(id) = fields.next() else { continue };

            if id == b"cpu" || (id.starts_with(b"cpu") && id[3..].iter().all(u8::is_ascii_digit)) {
                let nums: Vec<u64> = fields
                    .map(|f| parse_u64("stat cpu field", f))
                    .collect::<Result<_, _>>()?;
                let at = |i: usize| nums.get(i).copied().unwrap_or(0);
                stat.cpus.push(CpuUsage {
                    id: String::from_utf8_lossy(id).into_owned(),
                    user: at(0),
                    nice: at(1),
                    system: at(2),
                    idle: at(3),
                    iowait: at(4),
                    irq: at(5),
                    softirq: at(6),
                    steal: at(7),
                    guest: at(8),
                    guest_nice: at(9),
                });
                continue;
            }

            match id {
                b"ctxt" => {
                    if let Some(v) = fields.next() {
                        stat.ctxt = parse_u64("ctxt", v)?;
                    }
                }
                b"btime" => {
                    if let Some(v) = fields.next() {
                        stat.btime = parse_u64("btime", v)?;
                    }
                }
                b"processes" => {
                    if let Some(v) = fields.next() {
                        stat.processes = parse_u64("processes", v)?;
                    }
                }
                // intr, softirq, procs_running, procs_blocked: not exposed.
                _ => {}
            }
        }

        stat.timestamp = now_ns();
        Ok(stat)
    }
}

impl Default for StatParser {
    fn default() -> Self {
        Self::new()
    }
}
