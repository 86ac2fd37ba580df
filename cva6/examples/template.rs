//! The benchmark template: measures an empty workload.
//!
//! The resulting counts are the fixed cost of the measurement itself (the second half of the PMU
//! configuration, the snapshot reads and the bookkeeping between them). Subtract them from another
//! benchmark's results to get that benchmark's net cost.

#![no_std]
#![no_main]

use hpmbench_proc_macros::benchmark;
use panic_halt as _;

#[benchmark]
fn workload() {}
