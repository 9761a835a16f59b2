//! Parses `/proc/cpuinfo`.

use crate::decode::{parse_f64, parse_i64, parse_u64};
use crate::kv::split_colon;
use crate::model::{CpuFact, CPUInfo};
use crate::scanner::LineScanner;
use crate::source::SourceHandle;
use crate::Error;

use super::now_ns;

fn empty_fact() -> CpuFact {
    CpuFact {
        processor: 0,
        vendor_id: String::new(),
        cpu_family: String::new(),
        model: String::new(),
        model_name: String::new(),
        stepping: String::new(),
        microcode: String::new(),
        cpu_mhz: 0.0,
        cache_size: String::new(),
        physical_id: 0,
        siblings: 0,
        core_id: 0,
        cpu_cores: 0,
        apicid: 0,
        initial_apicid: 0,
        fpu: String::new(),
        fpu_exception: String::new(),
        cpuid_level: String::new(),
        wp: String::new(),
        flags: String::new(),
        bogomips: 0.0,
        clflush_size: String::new(),
        cache_alignment: String::new(),
        address_sizes: String::new(),
        power_management: String::new(),
    }
}

/// Reusable parser state for `/proc/cpuinfo`.
///
/// Each `processor:` line opens a new [`CpuFact`]; the prior one (if any)
/// is closed and appended first.
pub struct CpuInfoParser {
    scanner: LineScanner,
}

impl CpuInfoParser {
    pub fn new() -> Self {
        Self { scanner: LineScanner::new() }
    }

    pub fn parse(&mut self, source: &mut SourceHandle) -> Result<CPUInfo, Error> {
        let mut cpus = Vec::new();
        let mut current: Option<CpuFact> = None;

        while let Some(line) = self.scanner.next_line(source)? {
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = split_colon(line) else {
                continue;
            };
            let value_str = || String::from_utf8_lossy(value).into_owned();

            if key == b"processor" {
                if let Some(cpu) = current.take() {
                    cpus.push(cpu);
                }
                let mut cpu = empty_fact();
                cpu.processor = parse_i64("processor", value)? as u32;
                current = Some(cpu);
                continue;
            }

            let Some(cpu) = current.as_mut() else {
                continue;
            };

            // "cpu <x>" keys share a common prefix; byte 4 distinguishes them.
            if key.len() > 4 && &key[..3] == b"cpu" && key[3] == b' ' {
                match key[4] {
                    b'c' => cpu.cpu_cores = parse_u64("cpu cores", value)? as u32,
                    b'f' => cpu.cpu_family = value_str(),
                    b'M' => cpu.cpu_mhz = parse_f64("cpu MHz", value)? as f32,
                    _ => {}
                }
                continue;
            }

            match key {
                b"vendor_id" => cpu.vendor_id = value_str(),
                b"model" => cpu.model = value_str(),
                b"model name" => cpu.model_name = value_str(),
                b"stepping" => cpu.stepping = value_str(),
                b"microcode" => cpu.microcode = value_str(),
                b"cache size" => cpu.cache_size = value_str(),
                b"physical id" => cpu.physical_id = parse_i64("physical id", value)? as i32,
                b"siblings" => cpu.siblings = parse_u64("siblings", value)? as u32,
                b"core id" => cpu.core_id = parse_i64("core id", value)? as i32,
                b"apicid" => cpu.apicid = parse_i64("apicid", value)? as i32,
                b"initial apicid" => cpu.initial_apicid = parse_i64("initial apicid", value)? as i32,
                b"fpu" => cpu.fpu = value_str(),
                b"fpu_exception" => cpu.fpu_exception = value_str(),
                b"cpuid level" => cpu.cpuid_level = value_str(),
                b"wp" | b"WP" => cpu.wp = value_str(),
                b"flags" => cpu.flags = value_str(),
                b"bogomips" => cpu.bogomips = parse_f64("bogomips", value)? as f32,
                b"clflush size" => cpu.clflush_size = value_str(),
                b"cache_alignment" => cpu.cache_alignment = value_str(),
                b"address sizes" => cpu.address_sizes = value_str(),
                b"power management" => cpu.power_management = value_str(),
                _ => {}
            }
        }

        if let Some(cpu) = current.take() {
            cpus.push(cpu);
        }

        Ok(CPUInfo { timestamp: now_ns(), cpus })
    }
}

impl Default for CpuInfoParser {
    fn default() -> Self {
        Self::new()
    }
}
