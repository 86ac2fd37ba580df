//! The result of one benchmark run and the ways of handing it off.
//!
//! On the target the nine values leave the program through registers `s2` to `s10` right before
//! the exit call; the simulator reads them from its final register dump. [ExitRegister] and
//! [BenchmarkResult::to_registers] define that layout, and [ResultSink] abstracts over who
//! consumes it.

use crate::config::ClockConfig;
use crate::counters::CounterDeltas;

/// One of the nine reported values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cycles,
    Instructions,
    ICacheMisses,
    DCacheMisses,
    ICacheAccesses,
    DCacheAccesses,
    BranchInstructions,
    BranchMispredicts,
    ElapsedMicros,
}

impl Metric {
    /// All metrics, in exit-register order.
    pub const ALL: [Metric; 9] = [
        Metric::Cycles,
        Metric::Instructions,
        Metric::ICacheMisses,
        Metric::DCacheMisses,
        Metric::ICacheAccesses,
        Metric::DCacheAccesses,
        Metric::BranchInstructions,
        Metric::BranchMispredicts,
        Metric::ElapsedMicros,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Metric::Cycles => "Cycles",
            Metric::Instructions => "Instructions",
            Metric::ICacheMisses => "I-Cache Miss",
            Metric::DCacheMisses => "D-Cache Miss",
            Metric::ICacheAccesses => "I-Cache Access",
            Metric::DCacheAccesses => "D-Cache Access",
            Metric::BranchInstructions => "Branches",
            Metric::BranchMispredicts => "Branch Mispredicts",
            Metric::ElapsedMicros => "Time (us)",
        }
    }

    /// The register this metric is reported in.
    pub const fn register(self) -> ExitRegister {
        ExitRegister::ALL[self as usize]
    }
}

/// The registers that carry the results when the program exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitRegister {
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
    S9,
    S10,
}

impl ExitRegister {
    pub const ALL: [ExitRegister; 9] = [
        ExitRegister::S2,
        ExitRegister::S3,
        ExitRegister::S4,
        ExitRegister::S5,
        ExitRegister::S6,
        ExitRegister::S7,
        ExitRegister::S8,
        ExitRegister::S9,
        ExitRegister::S10,
    ];

    /// The ABI name, as used in assembly.
    pub const fn abi_name(self) -> &'static str {
        match self {
            ExitRegister::S2 => "s2",
            ExitRegister::S3 => "s3",
            ExitRegister::S4 => "s4",
            ExitRegister::S5 => "s5",
            ExitRegister::S6 => "s6",
            ExitRegister::S7 => "s7",
            ExitRegister::S8 => "s8",
            ExitRegister::S9 => "s9",
            ExitRegister::S10 => "s10",
        }
    }

    /// The architectural register number, i.e. the N in `xN` as printed in simulator logs.
    pub const fn number(self) -> u8 {
        // s2..s10 are the contiguous range x18..x26.
        18 + self as u8
    }
}

/// The measurements of one benchmark run: eight counter deltas plus the elapsed time derived from
/// the cycle delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BenchmarkResult {
    pub cycles: u64,
    pub instructions: u64,
    pub icache_misses: u64,
    pub dcache_misses: u64,
    pub icache_accesses: u64,
    pub dcache_accesses: u64,
    pub branch_instructions: u64,
    pub branch_mispredicts: u64,
    pub elapsed_us: u64,
}

impl BenchmarkResult {
    /// Builds the result from the counter deltas, converting the cycle delta into microseconds
    /// using `clock`.
    pub const fn from_deltas(deltas: &CounterDeltas, clock: &ClockConfig) -> BenchmarkResult {
        BenchmarkResult {
            cycles: deltas.cycles,
            instructions: deltas.instructions,
            icache_misses: deltas.icache_misses,
            dcache_misses: deltas.dcache_misses,
            icache_accesses: deltas.icache_accesses,
            dcache_accesses: deltas.dcache_accesses,
            branch_instructions: deltas.branch_instructions,
            branch_mispredicts: deltas.branch_mispredicts,
            elapsed_us: clock.cycles_to_micros(deltas.cycles),
        }
    }

    /// The inverse of [BenchmarkResult::to_registers].
    pub const fn from_registers(registers: [u64; 9]) -> BenchmarkResult {
        BenchmarkResult {
            cycles: registers[0],
            instructions: registers[1],
            icache_misses: registers[2],
            dcache_misses: registers[3],
            icache_accesses: registers[4],
            dcache_accesses: registers[5],
            branch_instructions: registers[6],
            branch_mispredicts: registers[7],
            elapsed_us: registers[8],
        }
    }

    /// The register values, in [ExitRegister::ALL] order (`s2` first).
    pub const fn to_registers(&self) -> [u64; 9] {
        [
            self.cycles,
            self.instructions,
            self.icache_misses,
            self.dcache_misses,
            self.icache_accesses,
            self.dcache_accesses,
            self.branch_instructions,
            self.branch_mispredicts,
            self.elapsed_us,
        ]
    }

    pub const fn get(&self, metric: Metric) -> u64 {
        self.to_registers()[metric as usize]
    }

    /// Each metric paired with its value, in exit-register order.
    pub fn metrics(&self) -> impl Iterator<Item = (Metric, u64)> {
        let values = self.to_registers();
        Metric::ALL.into_iter().zip(values)
    }

    /// Instructions per cycle. Zero if no cycles were counted.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            return 0.0;
        }
        self.instructions as f64 / self.cycles as f64
    }

    /// Subtracts the measurements of a baseline run from this one, field by field, clamping at
    /// zero.
    ///
    /// The baseline is normally a run of the empty workload, whose counts are the cost of the
    /// configuration and snapshot code itself.
    pub fn net_of(&self, baseline: &BenchmarkResult) -> BenchmarkResult {
        let mut registers = self.to_registers();
        for (value, base) in registers.iter_mut().zip(baseline.to_registers()) {
            *value = value.saturating_sub(base);
        }
        BenchmarkResult::from_registers(registers)
    }

    /// Instructions per cycle after subtracting `baseline`, counting at least one cycle.
    pub fn net_ipc(&self, baseline: &BenchmarkResult) -> f64 {
        let net = self.net_of(baseline);
        net.instructions as f64 / net.cycles.max(1) as f64
    }
}

/// Consumes the result of a run.
pub trait ResultSink {
    /// What reporting produces. The register sink on the target never returns, and uses
    /// [core::convert::Infallible] here.
    type Output;

    fn report(self, result: BenchmarkResult) -> Self::Output;
}

/// A sink for hosted runs that hands the result straight back to the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordingSink;

impl ResultSink for RecordingSink {
    type Output = BenchmarkResult;

    fn report(self, result: BenchmarkResult) -> BenchmarkResult {
        result
    }
}
