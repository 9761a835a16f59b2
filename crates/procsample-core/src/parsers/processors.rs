//! Parses `/proc/cpuinfo`'s first logical-CPU block and folds in sysfs
//! topology, producing one aggregated [`Processors`] summary per host.
//!
//! For multi-socket systems all sockets are assumed identical; only the
//! first `processor:` block is read from `/proc/cpuinfo`; everything else
//! (socket count, frequency range, cache map) comes from a sysfs walk
//! rooted at `cpu0`.

use crate::decode::{parse_f64, parse_u64};
use crate::kv::split_colon;
use crate::model::Processors;
use crate::parsers::cpufreq::CpuSysfs;
use crate::scanner::LineScanner;
use crate::source::SourceHandle;
use crate::Error;

use super::now_ns;

/// Reusable parser state for the aggregated processor summary.
pub struct ProcessorsParser {
    scanner: LineScanner,
    sysfs: CpuSysfs,
}

impl ProcessorsParser {
    pub fn new() -> Self {
        Self { scanner: LineScanner::new(), sysfs: CpuSysfs::new() }
    }

    pub fn with_sysfs(sysfs: CpuSysfs) -> Self {
        Self { scanner: LineScanner::new(), sysfs }
    }

    pub fn parse(&mut self, source: &mut SourceHandle) -> Result<Processors, Error> {
        let mut procs = Processors {
            timestamp: 0,
            sockets: 1,
            cpus: 0,
            cores_per_socket: 0,
            threads_per_core: 0,
            vendor_id: String::new(),
            cpu_family: String::new(),
            model: String::new(),
            model_name: String::new(),
            stepping: String::new(),
            microcode: String::new(),
            cpu_mhz: 0.0,
            mhz_min: 0.0,
            mhz_max: 0.0,
            cache_size: String::new(),
            cache: Default::default(),
            cache_ids: Vec::new(),
            bogomips: 0.0,
            flags: Vec::new(),
            op_modes: Vec::new(),
        };

        let mut siblings: u32 = 0;
        let mut seen_first_processor = false;

        while let Some(line) = self.scanner.next_line(source)? {
            let Some((key, value)) = split_colon(line) else { continue };

            if key == b"processor" {
                if seen_first_processor {
                    break;
                }
                seen_first_processor = true;
                continue;
            }

            if key.len() > 4 && &key[..3] == b"cpu" && key[3] == b' ' {
                match key[4] {
                    b'c' => procs.cores_per_socket = parse_u64("cpu cores", value)? as u32,
                    b'f' => procs.cpu_family = String::from_utf8_lossy(value).into_owned(),
                    b'M' => procs.cpu_mhz = parse_f64("cpu MHz", value)? as f32,
                    _ => {}
                }
                continue;
            }

            match key {
                b"vendor_id" => procs.vendor_id = String::from_utf8_lossy(value).into_owned(),
                b"model" => procs.model = String::from_utf8_lossy(value).into_owned(),
                b"model name" => procs.model_name = String::from_utf8_lossy(value).into_owned(),
                b"stepping" => procs.stepping = String::from_utf8_lossy(value).into_owned(),
                b"microcode" => procs.microcode = String::from_utf8_lossy(value).into_owned(),
                b"cache size" => procs.cache_size = String::from_utf8_lossy(value).into_owned(),
                b"siblings" => siblings = parse_u64("siblings", value)? as u32,
                b"bogomips" => procs.bogomips = parse_f64("bogomips", value)? as f32,
                b"flags" => {
                    procs.flags = String::from_utf8_lossy(value)
                        .split_whitespace()
                        .map(str::to_string)
                        .collect();
                    procs.op_modes.push("32-bit".to_string());
                    if procs.flags.iter().any(|f| f == "lm") {
                        procs.op_modes.push("64-bit".to_string());
                    }
                }
                _ => {}
            }
        }

        if procs.cores_per_socket > 0 {
            procs.threads_per_core = siblings / procs.cores_per_socket;
        }

        procs.sockets = self.sysfs.sockets()?;
        let (mhz_min, mhz_max) = self.sysfs.freq_mhz(0)?;
        procs.mhz_min = mhz_min;
        procs.mhz_max = mhz_max;
        let (cache, cache_ids) = self.sysfs.cache(0)?;
        procs.cache = cache;
        procs.cache_ids = cache_ids;

        procs.cpus = procs.sockets * procs.cores_per_socket * procs.threads_per_core;
        procs.timestamp = now_ns();
        Ok(procs)
    }
}

impl Default for ProcessorsParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    fn source_with(contents: &str) -> SourceHandle {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        SourceHandle::open(file.path()).unwrap()
    }

    fn quad_core_fixture() -> String {
        let mut out = String::new();
        for n in 0..8 {
            out.push_str(&format!(
                "processor\t: {n}\n\
                 vendor_id\t: GenuineIntel\n\
                 cpu family\t: 6\n\
                 model\t\t: 158\n\
                 model name\t: Intel Fake CPU\n\
                 stepping\t: 10\n\
                 microcode\t: 0xde\n\
                 cpu MHz\t\t: 3600.000\n\
                 cache size\t: 8192 KB\n\
                 siblings\t: 8\n\
                 cpu cores\t: 4\n\
                 flags\t\t: fpu vme de pse tsc msr pae lm\n\
                 bogomips\t: 7200.00\n\n"
            ));
        }
        out
    }

    #[test]
    fn derives_topology_from_first_block_and_sysfs() {
        let tmp = tempfile::tempdir().unwrap();
        for n in 0..8u32 {
            let dir = tmp.path().join(format!("cpu{n}/topology"));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("physical_package_id"), "0\n").unwrap();
        }

        let mut source = source_with(&quad_core_fixture());
        let mut parser = ProcessorsParser::with_sysfs(CpuSysfs::with_root(tmp.path()));
        let procs = parser.parse(&mut source).unwrap();

        assert_eq!(procs.sockets, 1);
        assert_eq!(procs.cores_per_socket, 4);
        assert_eq!(procs.threads_per_core, 2);
        assert_eq!(procs.cpus, 8);
        assert!(procs.op_modes.iter().any(|m| m == "32-bit"));
        assert!(procs.op_modes.iter().any(|m| m == "64-bit"));
    }

    #[test]
    fn cache_ids_is_permutation_of_cache_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let cache_dir = tmp.path().join("cpu0/cache/index0");
        fs::create_dir_all(&cache_dir).unwrap();
        fs::write(cache_dir.join("level"), "1").unwrap();
        fs::write(cache_dir.join("type"), "Data").unwrap();
        fs::write(cache_dir.join("size"), "32K").unwrap();

        let mut source = source_with(&quad_core_fixture());
        let mut parser = ProcessorsParser::with_sysfs(CpuSysfs::with_root(tmp.path()));
        let procs = parser.parse(&mut source).unwrap();

        let mut ids_sorted = procs.cache_ids.clone();
        ids_sorted.sort();
        let mut keys_sorted: Vec<String> = procs.cache.keys().cloned().collect();
        keys_sorted.sort();
        assert_eq!(ids_sorted, keys_sorted);
    }
}
