//! Platform-agnostic pieces of a bare-metal benchmark that measures a workload with the RISC-V
//! hardware performance monitor: the event map, counter snapshots, the result value object, the
//! workloads, and the measurement sequence that ties them together.
//!
//! Nothing in this crate touches a CSR directly. The chip-specific crate supplies a
//! [counters::HardwareCounterPort] and a [report::ResultSink] for the real hardware, while the
//! unit tests use in-memory implementations of both.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod counters;
pub mod debug_util;
pub mod events;
pub mod harness;
pub mod report;
pub mod workload;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ClockConfig, ConfigError, CPU_FREQ_HZ};
pub use counters::{CounterDeltas, CounterSnapshot, HardwareCounterPort};
pub use harness::{measure, run};
pub use report::{BenchmarkResult, ExitRegister, Metric, RecordingSink, ResultSink};
pub use workload::{EmptyWorkload, MixedWorkload, Workload};
