//! The hardware events the benchmark counts, and the programmable counter slots they are assigned
//! to.
//!
//! The assignment is kept as plain data ([EVENT_MAP]) so the platform code only has to walk the
//! table, writing each event ID into the slot's `mhpmeventN` CSR.

use crate::config::ConfigError;

/// Machine counter-inhibit register. Writing a set bit stops the corresponding counter.
pub const CSR_MCOUNTINHIBIT: u16 = 0x320;
/// Machine counter-enable register. A set bit lets lower privilege modes read the counter.
pub const CSR_MCOUNTEREN: u16 = 0x306;
/// Machine cycle counter.
pub const CSR_MCYCLE: u16 = 0xB00;
/// Machine instructions-retired counter.
pub const CSR_MINSTRET: u16 = 0xB02;
/// `mhpmevent3`. The event-select CSR of slot N is at `CSR_MHPMEVENT_BASE + N - 3`.
pub const CSR_MHPMEVENT_BASE: u16 = 0x323;
/// `mhpmcounter3`. The counter CSR of slot N is at `CSR_MHPMCOUNTER_BASE + N - 3`.
pub const CSR_MHPMCOUNTER_BASE: u16 = 0xB03;

/// Freezes every counter, including `mcycle` and `minstret`.
pub const INHIBIT_ALL: u64 = u64::MAX;
/// Lets every counter run.
pub const INHIBIT_NONE: u64 = 0;
/// Exposes every counter to lower privilege modes.
pub const ENABLE_ALL: u64 = u64::MAX;

/// A micro-architectural event that CVA6 can count in an HPM counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HpmEvent {
    ICacheMiss,
    DCacheMiss,
    ICacheAccess,
    DCacheAccess,
    BranchInstruction,
    BranchMispredict,
}

impl HpmEvent {
    /// The event ID written into `mhpmeventN` to select this event.
    pub const fn id(self) -> u64 {
        match self {
            HpmEvent::ICacheMiss => 1,
            HpmEvent::DCacheMiss => 2,
            HpmEvent::BranchInstruction => 9,
            HpmEvent::BranchMispredict => 10,
            HpmEvent::ICacheAccess => 16,
            HpmEvent::DCacheAccess => 17,
        }
    }
}

/// A programmable HPM counter slot (`mhpmcounter3` to `mhpmcounter31`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CounterSlot(u8);

impl CounterSlot {
    /// The first programmable slot.
    pub const FIRST: u8 = 3;
    /// The last programmable slot.
    pub const LAST: u8 = 31;

    pub const fn new(index: u8) -> Result<CounterSlot, ConfigError> {
        if index < Self::FIRST || index > Self::LAST {
            return Err(ConfigError::SlotOutOfRange(index));
        }
        Ok(CounterSlot(index))
    }

    /// Only for slots known to be valid at compile time.
    const fn from_const(index: u8) -> CounterSlot {
        match CounterSlot::new(index) {
            Ok(slot) => slot,
            Err(_) => panic!("invalid HPM slot"),
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// The CSR number of this slot's `mhpmeventN` register.
    pub const fn event_csr(self) -> u16 {
        CSR_MHPMEVENT_BASE + (self.0 - Self::FIRST) as u16
    }

    /// The CSR number of this slot's `mhpmcounterN` register.
    pub const fn counter_csr(self) -> u16 {
        CSR_MHPMCOUNTER_BASE + (self.0 - Self::FIRST) as u16
    }
}

/// One row of the slot-to-event assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventAssignment {
    pub slot: CounterSlot,
    pub event: HpmEvent,
}

/// The number of programmable counters the benchmark uses.
pub const NUM_EVENT_COUNTERS: usize = 6;

/// The fixed slot-to-event assignment. Snapshots and results list the event counters in this
/// order.
pub const EVENT_MAP: [EventAssignment; NUM_EVENT_COUNTERS] = [
    EventAssignment {
        slot: CounterSlot::from_const(3),
        event: HpmEvent::ICacheMiss,
    },
    EventAssignment {
        slot: CounterSlot::from_const(4),
        event: HpmEvent::DCacheMiss,
    },
    EventAssignment {
        slot: CounterSlot::from_const(5),
        event: HpmEvent::ICacheAccess,
    },
    EventAssignment {
        slot: CounterSlot::from_const(6),
        event: HpmEvent::DCacheAccess,
    },
    EventAssignment {
        slot: CounterSlot::from_const(7),
        event: HpmEvent::BranchInstruction,
    },
    EventAssignment {
        slot: CounterSlot::from_const(8),
        event: HpmEvent::BranchMispredict,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_map_matches_cva6_assignment() {
        let rows: Vec<(u8, u64)> = EVENT_MAP
            .iter()
            .map(|row| (row.slot.index(), row.event.id()))
            .collect();
        assert_eq!(rows, [(3, 1), (4, 2), (5, 16), (6, 17), (7, 9), (8, 10)]);
    }

    #[test]
    fn event_map_uses_each_slot_once() {
        let mut slots: Vec<CounterSlot> = EVENT_MAP.iter().map(|row| row.slot).collect();
        slots.sort();
        slots.dedup();
        assert_eq!(slots.len(), NUM_EVENT_COUNTERS);
    }

    #[test]
    fn slot_csr_numbers() {
        let slot = CounterSlot::new(3).unwrap();
        assert_eq!(slot.event_csr(), 0x323);
        assert_eq!(slot.counter_csr(), 0xB03);
        let slot = CounterSlot::new(8).unwrap();
        assert_eq!(slot.event_csr(), 0x328);
        assert_eq!(slot.counter_csr(), 0xB08);
        let slot = CounterSlot::new(31).unwrap();
        assert_eq!(slot.event_csr(), 0x33F);
        assert_eq!(slot.counter_csr(), 0xB1F);
    }

    #[test]
    fn slot_range_is_checked() {
        assert_eq!(CounterSlot::new(0), Err(ConfigError::SlotOutOfRange(0)));
        assert_eq!(CounterSlot::new(2), Err(ConfigError::SlotOutOfRange(2)));
        assert_eq!(CounterSlot::new(32), Err(ConfigError::SlotOutOfRange(32)));
    }
}
