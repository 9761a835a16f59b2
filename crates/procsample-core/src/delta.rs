//! Turns two snapshots of a monotonically-increasing counter record into a
//! per-interval delta (usage) record.

use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::model::{CPUUtilization, CpuPercent, CpuUsage, DevInfo, DevUsage, NetDev, NetUsage, Stat};
use crate::profiler::{NetDevProfiler, StatProfiler};
use crate::Error;

/// Maintains `prior`/`current` [`Stat`] snapshots and emits per-CPU
/// utilization percentages on each step.
pub struct CpuUtilizationEngine {
    profiler: StatProfiler,
    prior: Stat,
}

impl CpuUtilizationEngine {
    /// Seeds the engine with one sample; the first [`Self::step`] call
    /// produces the delta against it.
    pub fn new(mut profiler: StatProfiler) -> Result<Self, Error> {
        let prior = profiler.sample()?;
        Ok(Self { profiler, prior })
    }

    pub fn step(&mut self) -> Result<CPUUtilization, Error> {
        let current = self.profiler.sample()?;
        let utilization = cpu_utilization(&self.prior, &current);
        self.prior = current;
        Ok(utilization)
    }

    /// One-shot: samples now, sleeps `duration`, samples again, and returns
    /// the delta between the two.
    pub fn usage(mut profiler: StatProfiler, duration: Duration) -> Result<CPUUtilization, Error> {
        let prior = profiler.sample()?;
        sleep(duration);
        let current = profiler.sample()?;
        Ok(cpu_utilization(&prior, &current))
    }
}

fn cpu_utilization(prior: &Stat, current: &Stat) -> CPUUtilization {
    let prior_by_id: HashMap<&str, &CpuUsage> =
        prior.cpus.iter().map(|c| (c.id.as_str(), c)).collect();

    let cpus = current
        .cpus
        .iter()
        .map(|cur| {
            let zero = CpuUsage {
                id: cur.id.clone(),
                user: 0,
                nice: 0,
                system: 0,
                idle: 0,
                iowait: 0,
                irq: 0,
                softirq: 0,
                steal: 0,
                guest: 0,
                guest_nice: 0,
            };
            let prev = prior_by_id.get(cur.id.as_str()).copied().unwrap_or(&zero);
            cpu_percent(prev, cur)
        })
        .collect();

    CPUUtilization {
        timestamp: current.timestamp,
        time_delta: current.timestamp - prior.timestamp,
        btime_delta: current.btime.saturating_sub(prior.btime),
        ctxt_delta: current.ctxt.saturating_sub(prior.ctxt),
        processes: current.processes,
        cpus,
    }
}

fn cpu_percent(prior: &CpuUsage, current: &CpuUsage) -> CpuPercent {
    let d = |f: fn(&CpuUsage) -> u64| f(current).saturating_sub(f(prior));
    let user = d(|c| c.user);
    let nice = d(|c| c.nice);
    let system = d(|c| c.system);
    let idle = d(|c| c.idle);
    let iowait = d(|c| c.iowait);
    let irq = d(|c| c.irq);
    let softirq = d(|c| c.softirq);
    let steal = d(|c| c.steal);
    let guest = d(|c| c.guest);
    let guest_nice = d(|c| c.guest_nice);

    let total = user + nice + system + idle + iowait + irq + softirq + steal + guest + guest_nice;
    if total == 0 {
        return CpuPercent {
            id: current.id.clone(),
            usage: 0,
            user: 0,
            nice: 0,
            system: 0,
            idle: 0,
            iowait: 0,
            irq: 0,
            softirq: 0,
            steal: 0,
        };
    }

    let pct = |n: u64| n * 100 / total;
    let idle_pct = pct(idle);

    CpuPercent {
        id: current.id.clone(),
        usage: 100 - idle_pct,
        user: pct(user),
        nice: pct(nice),
        system: pct(system),
        idle: idle_pct,
        iowait: pct(iowait),
        irq: pct(irq),
        softirq: pct(softirq),
        steal: pct(steal),
    }
}

/// Maintains `prior`/`current` [`NetDev`] snapshots and emits per-interface
/// byte/packet deltas on each step, aligned by interface name.
pub struct NetUsageEngine {
    profiler: NetDevProfiler,
    prior: NetDev,
}

impl NetUsageEngine {
    pub fn new(mut profiler: NetDevProfiler) -> Result<Self, Error> {
        let prior = profiler.sample()?;
        Ok(Self { profiler, prior })
    }

    pub fn step(&mut self) -> Result<NetUsage, Error> {
        let current = self.profiler.sample()?;
        let usage = net_usage(&self.prior, &current);
        self.prior = current;
        Ok(usage)
    }

    pub fn usage(mut profiler: NetDevProfiler, duration: Duration) -> Result<NetUsage, Error> {
        let prior = profiler.sample()?;
        sleep(duration);
        let current = profiler.sample()?;
        Ok(net_usage(&prior, &current))
    }
}

fn net_usage(prior: &NetDev, current: &NetDev) -> NetUsage {
    let prior_by_name: HashMap<&str, &DevInfo> =
        prior.interfaces.iter().map(|d| (d.name.as_str(), d)).collect();

    let interfaces = current
        .interfaces
        .iter()
        .map(|cur| {
            let zero = DevInfo {
                name: cur.name.clone(),
                rx_bytes: 0,
                rx_packets: 0,
                rx_errs: 0,
                rx_drop: 0,
                rx_fifo: 0,
                rx_frame: 0,
                rx_compressed: 0,
                rx_multicast: 0,
                tx_bytes: 0,
                tx_packets: 0,
                tx_errs: 0,
                tx_drop: 0,
                tx_fifo: 0,
                tx_colls: 0,
                tx_carrier: 0,
                tx_compressed: 0,
            };
            let prev = prior_by_name.get(cur.name.as_str()).copied().unwrap_or(&zero);
            dev_usage(prev, cur)
        })
        .collect();

    NetUsage {
        timestamp: current.timestamp,
        time_delta: current.timestamp - prior.timestamp,
        interfaces,
    }
}

fn dev_usage(prior: &DevInfo, current: &DevInfo) -> DevUsage {
    macro_rules! delta {
        ($field:ident) => {
            current.$field.saturating_sub(prior.$field)
        };
    }
    DevUsage {
        name: current.name.clone(),
        rx_bytes: delta!(rx_bytes),
        rx_packets: delta!(rx_packets),
        rx_errs: delta!(rx_errs),
        rx_drop: delta!(rx_drop),
        rx_fifo: delta!(rx_fifo),
        rx_frame: delta!(rx_frame),
        rx_compressed: delta!(rx_compressed),
        rx_multicast: delta!(rx_multicast),
        tx_bytes: delta!(tx_bytes),
        tx_packets: delta!(tx_packets),
        tx_errs: delta!(tx_errs),
        tx_drop: delta!(tx_drop),
        tx_fifo: delta!(tx_fifo),
        tx_colls: delta!(tx_colls),
        tx_carrier: delta!(tx_carrier),
        tx_compressed: delta!(tx_compressed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::netdev::NetDevParser;
    use crate::parsers::stat::StatParser;
    use std::io::{Seek, SeekFrom, Write};

    fn netdev_fixture(eth0_rx: u64, eth0_tx: u64) -> String {
        format!(
            "Inter-|   Receive                                                |  Transmit\n \
             face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed\n\
               lo:       0       0    0    0    0     0          0         0        0       0    0    0    0     0       0          0\n\
             eth0: {eth0_rx}       5    0    0    0     0          0         0   {eth0_tx}      10    0    0    0     0       0          0\n"
        )
    }

    #[test]
    fn net_usage_deltas_match_raw_difference() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(netdev_fixture(1000, 2000).as_bytes()).unwrap();
        let profiler = NetDevProfiler::new(file.path(), NetDevParser::new()).unwrap();
        let mut engine = NetUsageEngine::new(profiler).unwrap();

        file.as_file_mut().set_len(0).unwrap();
        file.as_file_mut().seek(SeekFrom::Start(0)).unwrap();
        file.write_all(netdev_fixture(3500, 2000).as_bytes()).unwrap();

        let usage = engine.step().unwrap();
        let eth0 = usage.interfaces.iter().find(|i| i.name == "eth0").unwrap();
        assert_eq!(eth0.rx_bytes, 2500);
        assert_eq!(eth0.tx_bytes, 0);
    }

    #[test]
    fn cpu_utilization_handles_zero_total_delta() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"cpu 100 0 0 0 0 0 0 0 0 0\nctxt 1\nbtime 1\nprocesses 1\n").unwrap();
        let profiler = StatProfiler::new(file.path(), StatParser::new()).unwrap();
        let mut engine = CpuUtilizationEngine::new(profiler).unwrap();

        let utilization = engine.step().unwrap();
        let cpu = &utilization.cpus[0];
        assert_eq!(cpu.usage, 0);
        assert_eq!(cpu.idle, 0);
    }
}
