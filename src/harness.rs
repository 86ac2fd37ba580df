//! The measurement sequence: configure the PMU, snapshot, run the workload, snapshot again, and
//! turn the difference into a [BenchmarkResult].

use crate::config::ClockConfig;
use crate::counters::{CounterSnapshot, HardwareCounterPort};
use crate::debug_util;
use crate::report::{BenchmarkResult, ResultSink};
use crate::workload::Workload;
use core::sync::atomic::{compiler_fence, Ordering};

/// Measures a single run of `workload`.
///
/// Configuration, both snapshots and the workload all run inside one critical section, so the
/// only code between the two snapshots is the workload itself. The compiler fences keep the
/// optimizer from moving workload code across either snapshot. The hardware is assumed to order
/// CSR reads with respect to the surrounding instructions.
pub fn measure<P, W>(port: &mut P, workload: &mut W, clock: &ClockConfig) -> BenchmarkResult
where
    P: HardwareCounterPort + ?Sized,
    W: Workload + ?Sized,
{
    let (start, end) = critical_section::with(|cs| {
        port.configure();
        let start = CounterSnapshot::capture(cs, port);
        compiler_fence(Ordering::SeqCst);
        workload.run();
        compiler_fence(Ordering::SeqCst);
        let end = CounterSnapshot::capture(cs, port);
        (start, end)
    });

    let result = BenchmarkResult::from_deltas(&end.delta_since(&start), clock);
    if log::log_enabled!(log::Level::Debug) {
        log::debug!(
            "start: {}\nend:   {}",
            debug_util::FormatSnapshot(&start),
            debug_util::FormatSnapshot(&end)
        );
        debug_util::log_result(log::Level::Debug, &result);
        log::debug!("exit registers: {}", debug_util::FormatExitRegisters(&result));
    }
    result
}

/// Measures a single run of `workload` and hands the result to `sink`.
///
/// With the register sink used on the target this never returns.
pub fn run<P, W, S>(port: &mut P, workload: &mut W, clock: &ClockConfig, sink: S) -> S::Output
where
    P: HardwareCounterPort + ?Sized,
    W: Workload + ?Sized,
    S: ResultSink,
{
    let result = measure(port, workload, clock);
    sink.report(result)
}
