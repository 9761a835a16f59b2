//! Walks `/sys/devices/system/cpu/cpu<N>/{cpufreq,cache,topology}` for the
//! facts `/proc/cpuinfo` does not carry: socket count, frequency range, and
//! cache topology.
//!
//! Unlike the `/proc` parsers, these are single-integer or single-line
//! files read fresh on each call; there is no reusable buffered reader to
//! rewind, since every read is already a single syscall.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::decode::parse_u64;
use crate::Error;

/// Root of the per-CPU sysfs tree, overridable for testing.
pub struct CpuSysfs {
    root: PathBuf,
}

impl CpuSysfs {
    pub fn new() -> Self {
        Self::with_root("/sys/devices/system/cpu")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn cpu_dir(&self, cpu_index: u32) -> PathBuf {
        self.root.join(format!("cpu{cpu_index}"))
    }

    /// The logical CPU indices present under the sysfs root, in ascending
    /// order (directories named `cpu<N>` for a decimal `N`).
    pub fn present_cpus(&self) -> Result<Vec<u32>, Error> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return Ok(Vec::new()),
        };
        let mut cpus: Vec<u32> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter_map(|name| {
                name.strip_prefix("cpu")
                    .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
                    .and_then(|rest| rest.parse::<u32>().ok())
            })
            .collect();
        cpus.sort_unstable();
        Ok(cpus)
    }

    /// Number of distinct physical packages across the present CPUs.
    ///
    /// Falls back to 1 if `topology/physical_package_id` is unavailable
    /// (common in containers and some virtualized guests).
    pub fn sockets(&self) -> Result<u32, Error> {
        let mut seen = std::collections::HashSet::new();
        for i in self.present_cpus()? {
            let path = self.cpu_dir(i).join("topology/physical_package_id");
            match read_trimmed(&path)? {
                Some(text) => {
                    seen.insert(parse_u64("physical_package_id", text.trim().as_bytes())?);
                }
                None => continue,
            }
        }
        if seen.is_empty() {
            warn!("no topology/physical_package_id found under {:?}, assuming 1 socket", self.root);
        }
        Ok(seen.len().max(1) as u32)
    }

    /// `(min_mhz, max_mhz)` for one logical CPU, from `scaling_min_freq` and
    /// `scaling_max_freq` (both reported in kHz by the kernel).
    pub fn freq_mhz(&self, cpu_index: u32) -> Result<(f32, f32), Error> {
        let dir = self.cpu_dir(cpu_index).join("cpufreq");
        let min = read_khz(&dir.join("scaling_min_freq"))?;
        let max = read_khz(&dir.join("scaling_max_freq"))?;
        Ok((min / 1000.0, max / 1000.0))
    }

    /// Cache levels for one logical CPU: a map from identifier (`"L1d"`,
    /// `"L2"`, ...) to human-readable size, plus the identifiers in the
    /// order the kernel exposes their `cache/index<K>` directories.
    pub fn cache(&self, cpu_index: u32) -> Result<(HashMap<String, String>, Vec<String>), Error> {
        let dir = self.cpu_dir(cpu_index).join("cache");
        let mut cache = HashMap::new();
        let mut ids = Vec::new();

        let mut indices: Vec<PathBuf> = match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with("index"))
                })
                .collect(),
            Err(_) => return Ok((cache, ids)),
        };
        indices.sort();

        for index_dir in indices {
            let Some(level) = read_trimmed(&index_dir.join("level"))? else { continue };
            let Some(kind) = read_trimmed(&index_dir.join("type"))? else { continue };
            let Some(size) = read_trimmed(&index_dir.join("size"))? else { continue };

            let suffix = match kind.chars().next() {
                Some('D') | Some('d') => "d",
                Some('I') | Some('i') => "i",
                _ => "",
            };
            let id = format!("L{}{}", level.trim(), suffix);
            ids.push(id.clone());
            cache.insert(id, size.trim().to_string());
        }

        Ok((cache, ids))
    }
}

impl Default for CpuSysfs {
    fn default() -> Self {
        Self::new()
    }
}

fn read_trimmed(path: &Path) -> Result<Option<String>, Error> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Read { path: path.to_path_buf(), source }),
    }
}

fn read_khz(path: &Path) -> Result<f32, Error> {
    match read_trimmed(path)? {
        Some(text) => Ok(parse_u64("cpufreq", text.trim().as_bytes())? as f32),
        None => Ok(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_cpu(root: &Path, cpu: u32) -> PathBuf {
        let dir = root.join(format!("cpu{cpu}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn reads_freq_in_mhz() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = scratch_cpu(tmp.path(), 0).join("cpufreq");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("scaling_min_freq"), "800000\n").unwrap();
        fs::write(dir.join("scaling_max_freq"), "3600000\n").unwrap();

        let sysfs = CpuSysfs::with_root(tmp.path());
        let (min, max) = sysfs.freq_mhz(0).unwrap();
        assert!((min - 800.0).abs() < 0.01);
        assert!((max - 3600.0).abs() < 0.01);
    }

    #[test]
    fn missing_cpufreq_yields_zero() {
        let tmp = tempfile::tempdir().unwrap();
        scratch_cpu(tmp.path(), 0);
        let sysfs = CpuSysfs::with_root(tmp.path());
        assert_eq!(sysfs.freq_mhz(0).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn builds_cache_ids_from_level_and_type() {
        let tmp = tempfile::tempdir().unwrap();
        let cache_dir = scratch_cpu(tmp.path(), 0).join("cache");
        for (idx, level, kind, size) in [
            (0, "1", "Data", "32K"),
            (1, "1", "Instruction", "32K"),
            (2, "2", "Unified", "1024K"),
        ] {
            let dir = cache_dir.join(format!("index{idx}"));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("level"), level).unwrap();
            fs::write(dir.join("type"), kind).unwrap();
            fs::write(dir.join("size"), size).unwrap();
        }

        let sysfs = CpuSysfs::with_root(tmp.path());
        let (cache, ids) = sysfs.cache(0).unwrap();
        assert_eq!(ids, vec!["L1d", "L1i", "L2"]);
        assert_eq!(cache.get("L1d").unwrap(), "32K");
        assert_eq!(cache.get("L2").unwrap(), "1024K");
    }
}
