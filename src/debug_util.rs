//! Formatting helpers for logging measurements in a human-readable way.

use crate::counters::CounterSnapshot;
use crate::events::EVENT_MAP;
use crate::report::{BenchmarkResult, Metric};

/// A wrapper struct whose [core::fmt::Display] implementation prints a result as a table, one
/// metric per row, followed by the IPC.
///
/// If a baseline is provided, a second column shows each value with the baseline subtracted.
pub struct FormatBenchmarkResult<'a> {
    pub result: &'a BenchmarkResult,
    pub baseline: Option<&'a BenchmarkResult>,
}

impl<'a> core::fmt::Display for FormatBenchmarkResult<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let net = self.baseline.map(|baseline| self.result.net_of(baseline));
        for (row_idx, (metric, value)) in self.result.metrics().enumerate() {
            if row_idx > 0 {
                writeln!(f)?;
            }
            let reg = metric.register();
            write!(f, "{:<18} x{} {:>12}", metric.label(), reg.number(), value)?;
            if let Some(net) = &net {
                write!(f, " {:>12}", net.get(metric))?;
            }
        }
        writeln!(f)?;
        write!(f, "{:<18} {:>16.4}", "IPC", self.result.ipc())?;
        if let Some(baseline) = self.baseline {
            write!(f, " {:>12.4}", self.result.net_ipc(baseline))?;
        }
        Ok(())
    }
}

/// Prints the exit registers the way a simulator's register dump lists them, e.g. `x18 0x00a2`.
pub struct FormatExitRegisters<'a>(pub &'a BenchmarkResult);

impl<'a> core::fmt::Display for FormatExitRegisters<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (idx, metric) in Metric::ALL.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "x{} {:#06x}", metric.register().number(), self.0.get(*metric))?;
        }
        Ok(())
    }
}

/// Prints a snapshot on a single line, naming each event counter.
pub struct FormatSnapshot<'a>(pub &'a CounterSnapshot);

impl<'a> core::fmt::Display for FormatSnapshot<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "cycle {} instret {}",
            self.0.cycles(),
            self.0.instructions()
        )?;
        for (row, value) in EVENT_MAP.iter().zip(self.0.events()) {
            write!(f, " hpm{}({:?}) {}", row.slot.index(), row.event, value)?;
        }
        Ok(())
    }
}

/// Logs the given result as a table (see [FormatBenchmarkResult]).
pub fn log_result(log_level: log::Level, result: &BenchmarkResult) {
    log::log!(
        log_level,
        "--- Benchmark result\n{}",
        FormatBenchmarkResult {
            result,
            baseline: None
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BenchmarkResult {
        BenchmarkResult {
            cycles: 1_000,
            instructions: 500,
            icache_misses: 12,
            dcache_misses: 9,
            icache_accesses: 300,
            dcache_accesses: 80,
            branch_instructions: 40,
            branch_mispredicts: 3,
            elapsed_us: 20,
        }
    }

    #[test]
    fn format_table_without_baseline() {
        assert_eq!(
            "Cycles             x18         1000\n\
             Instructions       x19          500\n\
             I-Cache Miss       x20           12\n\
             D-Cache Miss       x21            9\n\
             I-Cache Access     x22          300\n\
             D-Cache Access     x23           80\n\
             Branches           x24           40\n\
             Branch Mispredicts x25            3\n\
             Time (us)          x26           20\n\
             IPC                          0.5000",
            FormatBenchmarkResult {
                result: &sample(),
                baseline: None
            }
            .to_string()
        );
    }

    #[test]
    fn format_table_with_baseline() {
        let baseline = BenchmarkResult {
            cycles: 500,
            instructions: 100,
            icache_misses: 20,
            ..Default::default()
        };
        let table = FormatBenchmarkResult {
            result: &sample(),
            baseline: Some(&baseline),
        }
        .to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "Cycles             x18         1000          500");
        assert_eq!(lines[2], "I-Cache Miss       x20           12            0");
        assert_eq!(lines[9], "IPC                          0.5000       0.8000");
    }

    #[test]
    fn format_exit_registers() {
        assert_eq!(
            "x18 0x03e8 x19 0x01f4 x20 0x000c x21 0x0009 x22 0x012c x23 0x0050 x24 0x0028 \
             x25 0x0003 x26 0x0014",
            FormatExitRegisters(&sample()).to_string()
        );
    }

    #[test]
    fn format_snapshot() {
        let snapshot = CounterSnapshot::from_raw(10, 20, [1, 2, 3, 4, 5, 6]);
        assert_eq!(
            "cycle 10 instret 20 hpm3(ICacheMiss) 1 hpm4(DCacheMiss) 2 hpm5(ICacheAccess) 3 \
             hpm6(DCacheAccess) 4 hpm7(BranchInstruction) 5 hpm8(BranchMispredict) 6",
            FormatSnapshot(&snapshot).to_string()
        );
    }
}
