//! Reporting results the way the simulator expects them: the nine values in `s2`..`s10`, followed
//! by an exit call with status 0 in `a0`.
//!
//! The simulator traps the exit and dumps the register file, so nothing may touch `s2`..`s10`
//! between loading them and halting. This is why the exit routine below is written in assembly
//! rather than Rust: a compiled function is free to use callee-saved registers as temporaries.

use core::arch::asm;
#[cfg(not(feature = "platform-exit"))]
use core::arch::global_asm;
use core::convert::Infallible;
#[cfg(not(feature = "platform-exit"))]
use core::sync::atomic::AtomicU64;
use hpmbench::{BenchmarkResult, ResultSink};

/// The HTIF mailbox the simulator polls. Writing `(status << 1) | 1` ends the simulation with
/// `status`.
#[cfg(not(feature = "platform-exit"))]
#[used]
#[export_name = "tohost"]
static TOHOST: AtomicU64 = AtomicU64::new(0);

/// Unused, but some harnesses refuse to load an ELF without it.
#[cfg(not(feature = "platform-exit"))]
#[used]
#[export_name = "fromhost"]
static FROMHOST: AtomicU64 = AtomicU64::new(0);

#[cfg(not(feature = "platform-exit"))]
global_asm!(
    ".pushsection .text.hpmbench_exit, \"ax\", @progbits",
    ".global hpmbench_exit",
    ".p2align 2",
    "hpmbench_exit:",
    "    slli a0, a0, 1",
    "    ori  a0, a0, 1",
    "    la   t0, {tohost}",
    "    sd   a0, 0(t0)",
    // The simulator stops as soon as it sees the write. Real hardware just parks here.
    "1:  j    1b",
    ".popsection",
    tohost = sym TOHOST,
);

extern "C" {
    /// Ends the program with the given status. Only clobbers `a0` and `t0`.
    #[cfg_attr(feature = "platform-exit", link_name = "exit")]
    fn hpmbench_exit(status: usize) -> !;
}

/// A [ResultSink] that loads the result into the exit registers and halts.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegisterSink;

impl ResultSink for RegisterSink {
    type Output = Infallible;

    fn report(self, result: BenchmarkResult) -> Infallible {
        let [cycles, instructions, ic_miss, dc_miss, ic_access, dc_access, br_inst, br_miss, time_us] =
            result.to_registers();
        // SAFETY: the exit routine never returns, so the registers this overwrites don't matter.
        unsafe {
            asm!(
                "li a0, 0",
                "call {exit}",
                exit = sym hpmbench_exit,
                in("s2") cycles,
                in("s3") instructions,
                in("s4") ic_miss,
                in("s5") dc_miss,
                in("s6") ic_access,
                in("s7") dc_access,
                in("s8") br_inst,
                in("s9") br_miss,
                in("s10") time_us,
                options(noreturn),
            )
        }
    }
}
