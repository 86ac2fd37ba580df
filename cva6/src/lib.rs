#![no_std]

// This crate contains the CVA6-specific half of the benchmark: CSR access, the register-based exit
// protocol, and the glue that turns a workload into a bootable program.

pub mod csr;
pub mod exit;

pub use csr::CsrCounterPort;
pub use exit::RegisterSink;
pub use riscv_rt::entry;

// Only needed for the critical section implementation it provides.
use riscv as _;

use hpmbench::{ClockConfig, Workload, CPU_FREQ_HZ};

/// The clock the elapsed time is computed with. Defaults to [CPU_FREQ_HZ], and can be overridden
/// at build time by setting `HPMBENCH_CPU_FREQ_HZ` to a decimal number of Hz.
pub const CLOCK: ClockConfig = match option_env!("HPMBENCH_CPU_FREQ_HZ") {
    Some(hz) => match ClockConfig::parse(hz) {
        Ok(clock) => clock,
        Err(_) => panic!("HPMBENCH_CPU_FREQ_HZ must be a non-zero decimal number of Hz"),
    },
    None => match ClockConfig::new(CPU_FREQ_HZ) {
        Ok(clock) => clock,
        Err(_) => panic!("CPU_FREQ_HZ must be non-zero"),
    },
};

/// Measures one run of `workload` with the CSR counters, then exits with the results in the exit
/// registers. This is the whole body of a benchmark program's entry point (see the `#[benchmark]`
/// attribute in `hpmbench_proc_macros`).
pub fn run_benchmark<W: Workload + ?Sized>(workload: &mut W) -> ! {
    let Some(mut port) = CsrCounterPort::take() else {
        panic!("run_benchmark may only be called once");
    };
    match hpmbench::run(&mut port, workload, &CLOCK, RegisterSink) {}
}
