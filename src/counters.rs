//! Reading the performance counters: the [HardwareCounterPort] capability implemented by the
//! platform, and the [CounterSnapshot] / [CounterDeltas] values built from it.

use crate::events::{CounterSlot, EVENT_MAP, NUM_EVENT_COUNTERS};
use critical_section::CriticalSection;

/// Access to the core's performance-monitoring CSRs.
///
/// Implementations map these calls onto CSR instructions (or onto an in-memory model, in tests).
/// None of the operations can fail: a target lacking the CSRs is outside what the benchmark
/// supports.
pub trait HardwareCounterPort {
    /// Programs the PMU: freezes all counters, writes the [EVENT_MAP] into the event-select CSRs,
    /// enables all counters for lower privilege modes, and lets the counters run again.
    fn configure(&mut self);

    /// Reads the free-running cycle counter.
    fn read_cycle(&mut self) -> u64;

    /// Reads the instructions-retired counter.
    fn read_instructions(&mut self) -> u64;

    /// Reads the programmable counter in `slot`.
    fn read_event_counter(&mut self, slot: CounterSlot) -> u64;
}

/// The values of all tracked counters at one point in time.
///
/// A snapshot is immutable once taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    cycles: u64,
    instructions: u64,
    /// Indexed like [EVENT_MAP].
    events: [u64; NUM_EVENT_COUNTERS],
}

impl CounterSnapshot {
    /// Reads the cycle counter, the instructions-retired counter and then each event counter in
    /// [EVENT_MAP] order.
    ///
    /// Takes a critical section token so that no interrupt handler can run between the first and
    /// the last read. The PMU must already have been configured. Nothing but the reads happens
    /// here, since on the target this code lies inside the measured window.
    pub fn capture<P: HardwareCounterPort + ?Sized>(
        _cs: CriticalSection<'_>,
        port: &mut P,
    ) -> CounterSnapshot {
        let cycles = port.read_cycle();
        let instructions = port.read_instructions();
        let mut events = [0; NUM_EVENT_COUNTERS];
        for (value, row) in events.iter_mut().zip(EVENT_MAP.iter()) {
            *value = port.read_event_counter(row.slot);
        }
        CounterSnapshot {
            cycles,
            instructions,
            events,
        }
    }

    #[cfg(test)]
    pub(crate) const fn from_raw(
        cycles: u64,
        instructions: u64,
        events: [u64; NUM_EVENT_COUNTERS],
    ) -> CounterSnapshot {
        CounterSnapshot {
            cycles,
            instructions,
            events,
        }
    }

    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    pub const fn instructions(&self) -> u64 {
        self.instructions
    }

    /// The event counter values, in [EVENT_MAP] order.
    pub const fn events(&self) -> &[u64; NUM_EVENT_COUNTERS] {
        &self.events
    }

    /// Returns how much each counter advanced between `start` and this snapshot.
    ///
    /// Uses wrapping subtraction: a counter that wrapped (or was reset) in between shows up as a
    /// huge delta rather than a panic.
    pub fn delta_since(&self, start: &CounterSnapshot) -> CounterDeltas {
        let mut events = [0; NUM_EVENT_COUNTERS];
        for (i, delta) in events.iter_mut().enumerate() {
            *delta = self.events[i].wrapping_sub(start.events[i]);
        }
        CounterDeltas {
            cycles: self.cycles.wrapping_sub(start.cycles),
            instructions: self.instructions.wrapping_sub(start.instructions),
            icache_misses: events[0],
            dcache_misses: events[1],
            icache_accesses: events[2],
            dcache_accesses: events[3],
            branch_instructions: events[4],
            branch_mispredicts: events[5],
        }
    }
}

/// The difference between two [CounterSnapshot]s.
///
/// The event fields are named after the events [EVENT_MAP] assigns to the slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDeltas {
    pub cycles: u64,
    pub instructions: u64,
    pub icache_misses: u64,
    pub dcache_misses: u64,
    pub icache_accesses: u64,
    pub dcache_accesses: u64,
    pub branch_instructions: u64,
    pub branch_mispredicts: u64,
}
