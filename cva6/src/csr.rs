//! A [HardwareCounterPort] backed by the machine-mode performance-monitoring CSRs.

use core::arch::asm;
use core::sync::atomic::{AtomicBool, Ordering};
use hpmbench::events::{
    CounterSlot, CSR_MCOUNTEREN, CSR_MCOUNTINHIBIT, CSR_MCYCLE, CSR_MHPMCOUNTER_BASE, CSR_MINSTRET,
    ENABLE_ALL, EVENT_MAP, INHIBIT_ALL, INHIBIT_NONE,
};
use hpmbench::HardwareCounterPort;
use log::trace;

/// Reads the CSR with the given (constant) number.
macro_rules! read_csr {
    ($csr:expr) => {{
        let value: u64;
        // SAFETY: reading a counter CSR has no side effects.
        unsafe {
            asm!("csrr {value}, {csr}", value = out(reg) value, csr = const $csr, options(nostack));
        }
        value
    }};
}

/// Writes `value` into the CSR with the given (constant) number.
macro_rules! write_csr {
    ($csr:expr, $value:expr) => {{
        let value: u64 = $value;
        unsafe {
            asm!("csrw {csr}, {value}", csr = const $csr, value = in(reg) value, options(nostack));
        }
    }};
}

/// CSR numbers have to be immediates, so a slot only known at runtime is dispatched to one `csrr`
/// per programmable slot. After inlining into the snapshot loop this folds away.
macro_rules! read_hpm_counter {
    ($slot:expr, [$($n:literal),*]) => {
        match $slot {
            $($n => read_csr!(CSR_MHPMCOUNTER_BASE + $n - 3),)*
            // CounterSlot only holds 3..=31. Unimplemented counters read as zero anyway.
            _ => 0,
        }
    };
}

/// Writes each [EVENT_MAP] row into its slot's event-select CSR. The CSR numbers come straight from
/// the table, as constants.
macro_rules! program_event_map {
    ($($row:literal),*) => {
        $(write_csr!(EVENT_MAP[$row].slot.event_csr(), EVENT_MAP[$row].event.id());)*
    };
}

static TAKEN: AtomicBool = AtomicBool::new(false);

/// The core's performance counters. There is only ever one instance, see [CsrCounterPort::take].
#[derive(Debug)]
pub struct CsrCounterPort {
    _private: (),
}

impl CsrCounterPort {
    /// Returns the counter port the first time it's called, and `None` afterwards.
    pub fn take() -> Option<CsrCounterPort> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(CsrCounterPort { _private: () })
    }
}

impl HardwareCounterPort for CsrCounterPort {
    fn configure(&mut self) {
        // Freeze all counters while they're being reprogrammed.
        write_csr!(CSR_MCOUNTINHIBIT, INHIBIT_ALL);

        program_event_map!(0, 1, 2, 3, 4, 5);

        // Allow lower privilege modes to read every counter. The mask goes through t0, the one
        // scratch register the exit protocol leaves undefined.
        unsafe {
            asm!(
                "li t0, {mask}",
                "csrw {mcounteren}, t0",
                mask = const ENABLE_ALL as i64,
                mcounteren = const CSR_MCOUNTEREN,
                out("t0") _,
                options(nostack),
            );
        }

        // Let the counters run again.
        write_csr!(CSR_MCOUNTINHIBIT, INHIBIT_NONE);
        trace!("PMU configured");
    }

    #[inline(always)]
    fn read_cycle(&mut self) -> u64 {
        read_csr!(CSR_MCYCLE)
    }

    #[inline(always)]
    fn read_instructions(&mut self) -> u64 {
        read_csr!(CSR_MINSTRET)
    }

    #[inline(always)]
    fn read_event_counter(&mut self, slot: CounterSlot) -> u64 {
        read_hpm_counter!(
            slot.index(),
            [
                3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
                25, 26, 27, 28, 29, 30, 31
            ]
        )
    }
}
