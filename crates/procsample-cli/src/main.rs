//! procsample - command-line front end for procsample-core.
//!
//! Takes one sample, or ticks on an interval, from any of the host
//! telemetry sources and writes each record to stdout as JSON or as the
//! library's schema-tagged binary envelope.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use procsample_core::codec::{self, BinaryEncoder};
use procsample_core::delta::{CpuUtilizationEngine, NetUsageEngine};
use procsample_core::profiler::{
    CpuInfoProfiler, DiskStatsProfiler, LoadAvgProfiler, MemInfoProfiler, NetDevProfiler,
    ProcessorsProfiler, ReleaseProfiler, StatProfiler, UptimeProfiler, VersionProfiler,
};
use procsample_core::ticker;
use procsample_core::Error;

/// Samples Linux host telemetry from /proc and /sys.
#[derive(Parser)]
#[command(name = "procsample", about = "Samples Linux /proc and /sys host telemetry", version)]
struct Args {
    /// Which source to sample.
    #[arg(value_enum)]
    source: Source,

    /// Output encoding.
    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Sample once and exit (default). Mutually exclusive with --interval.
    #[arg(long, conflicts_with = "interval")]
    once: bool,

    /// Sample repeatedly on this period in seconds instead of once.
    #[arg(short, long, value_name = "SECONDS")]
    interval: Option<u64>,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Meminfo,
    Cpuinfo,
    Processors,
    Stat,
    Diskstats,
    Netdev,
    Uptime,
    Loadavg,
    Version,
    Release,
    /// Delta: per-CPU utilization percentages, one interval at a time.
    CpuUtilization,
    /// Delta: per-interface network throughput, one interval at a time.
    NetUsage,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Binary,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        match verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("procsample={level}").parse().unwrap());

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// Writes one record to stdout in the requested format. Binary frames are
/// length-prefixed with a u32 LE so a stream of ticks can be split back out.
fn emit<T: serde::Serialize>(
    out: &mut impl Write,
    encoder: &mut BinaryEncoder,
    format: Format,
    record: &T,
) -> Result<(), Error> {
    match format {
        Format::Json => {
            let text = codec::json::encode(record)?;
            writeln!(out, "{text}").map_err(|e| Error::Schema { message: e.to_string() })?;
        }
        Format::Binary => {
            let bytes = encoder.encode(record)?;
            out.write_all(&(bytes.len() as u32).to_le_bytes())
                .and_then(|()| out.write_all(&bytes))
                .map_err(|e| Error::Schema { message: e.to_string() })?;
        }
    }
    out.flush().map_err(|e| Error::Schema { message: e.to_string() })
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut encoder = BinaryEncoder::new();

    let result = match args.interval {
        Some(secs) => run_ticking(args.source, args.format, Duration::from_secs(secs), &mut out, &mut encoder),
        None => run_once(args.source, args.format, &mut out, &mut encoder),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run_once(
    source: Source,
    format: Format,
    out: &mut impl Write,
    encoder: &mut BinaryEncoder,
) -> Result<(), Error> {
    match source {
        Source::Meminfo => emit(out, encoder, format, &MemInfoProfiler::open_default()?.sample()?),
        Source::Cpuinfo => emit(out, encoder, format, &CpuInfoProfiler::open_default()?.sample()?),
        Source::Processors => emit(out, encoder, format, &ProcessorsProfiler::open_default()?.sample()?),
        Source::Stat => emit(out, encoder, format, &StatProfiler::open_default()?.sample()?),
        Source::Diskstats => emit(out, encoder, format, &DiskStatsProfiler::open_default()?.sample()?),
        Source::Netdev => emit(out, encoder, format, &NetDevProfiler::open_default()?.sample()?),
        Source::Uptime => emit(out, encoder, format, &UptimeProfiler::open_default()?.sample()?),
        Source::Loadavg => emit(out, encoder, format, &LoadAvgProfiler::open_default()?.sample()?),
        Source::Version => emit(out, encoder, format, &VersionProfiler::open_default()?.sample()?),
        Source::Release => emit(out, encoder, format, &ReleaseProfiler::open_default()?.sample()?),
        Source::CpuUtilization => {
            info!("Sampling cpu-utilization requires two readings one second apart");
            let utilization = CpuUtilizationEngine::usage(StatProfiler::open_default()?, Duration::from_secs(1))?;
            emit(out, encoder, format, &utilization)
        }
        Source::NetUsage => {
            info!("Sampling net-usage requires two readings one second apart");
            let usage = NetUsageEngine::usage(NetDevProfiler::open_default()?, Duration::from_secs(1))?;
            emit(out, encoder, format, &usage)
        }
    }
}

fn run_ticking(
    source: Source,
    format: Format,
    period: Duration,
    out: &mut impl Write,
    encoder: &mut BinaryEncoder,
) -> Result<(), Error> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    macro_rules! drain {
        ($profiler:expr) => {{
            let ticker = ticker::spawn(period, $profiler);
            while running.load(Ordering::SeqCst) {
                match ticker.data().recv_timeout(Duration::from_millis(200)) {
                    Ok(record) => emit(out, encoder, format, &record)?,
                    Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                        if let Ok(e) = ticker.errors().try_recv() {
                            warn!("{e}");
                        }
                    }
                    Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
            Ok(())
        }};
    }

    match source {
        Source::Meminfo => drain!(MemInfoProfiler::open_default()?),
        Source::Cpuinfo => drain!(CpuInfoProfiler::open_default()?),
        Source::Processors => drain!(ProcessorsProfiler::open_default()?),
        Source::Stat => drain!(StatProfiler::open_default()?),
        Source::Diskstats => drain!(DiskStatsProfiler::open_default()?),
        Source::Netdev => drain!(NetDevProfiler::open_default()?),
        Source::Uptime => drain!(UptimeProfiler::open_default()?),
        Source::Loadavg => drain!(LoadAvgProfiler::open_default()?),
        Source::Version => drain!(VersionProfiler::open_default()?),
        Source::Release => drain!(ReleaseProfiler::open_default()?),
        Source::CpuUtilization => {
            let mut engine = CpuUtilizationEngine::new(StatProfiler::open_default()?)?;
            while running.load(Ordering::SeqCst) {
                std::thread::sleep(period);
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                emit(out, encoder, format, &engine.step()?)?;
            }
            Ok(())
        }
        Source::NetUsage => {
            let mut engine = NetUsageEngine::new(NetDevProfiler::open_default()?)?;
            while running.load(Ordering::SeqCst) {
                std::thread::sleep(period);
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                emit(out, encoder, format, &engine.step()?)?;
            }
            Ok(())
        }
    }
}
