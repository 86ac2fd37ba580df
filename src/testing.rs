//! In-memory test doubles for the hardware-facing traits.

use crate::counters::HardwareCounterPort;
use crate::events::{CounterSlot, EVENT_MAP, NUM_EVENT_COUNTERS};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

/// An operation observed by a [FakeCounterPort].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortCall {
    Configure,
    Cycle,
    Instructions,
    /// A read of the event counter in the given slot.
    Event(u8),
    /// Pushed by test workloads, to check where the workload ran relative to the reads.
    Workload,
}

#[derive(Debug, Default)]
struct FakeState {
    configured: bool,
    cycles: u64,
    instructions: u64,
    events: [u64; NUM_EVENT_COUNTERS],
    calls: Vec<PortCall>,
}

/// A [HardwareCounterPort] backed by plain integers.
///
/// Clones share the same state, so a test can hand one clone to the harness and use another one
/// from inside the workload to advance the counters.
#[derive(Debug, Clone, Default)]
pub struct FakeCounterPort {
    state: Rc<RefCell<FakeState>>,
}

impl FakeCounterPort {
    pub fn new() -> FakeCounterPort {
        FakeCounterPort::default()
    }

    pub fn set_counters(&self, cycles: u64, instructions: u64, events: [u64; NUM_EVENT_COUNTERS]) {
        let mut state = self.state.borrow_mut();
        state.cycles = cycles;
        state.instructions = instructions;
        state.events = events;
    }

    /// Advances every counter, like executing some code would.
    pub fn advance(&self, cycles: u64, instructions: u64, events: [u64; NUM_EVENT_COUNTERS]) {
        let mut state = self.state.borrow_mut();
        state.cycles = state.cycles.wrapping_add(cycles);
        state.instructions = state.instructions.wrapping_add(instructions);
        for (counter, delta) in state.events.iter_mut().zip(events) {
            *counter = counter.wrapping_add(delta);
        }
    }

    pub fn record_workload(&self) {
        self.state.borrow_mut().calls.push(PortCall::Workload);
    }

    pub fn calls(&self) -> Vec<PortCall> {
        self.state.borrow().calls.clone()
    }

    pub fn is_configured(&self) -> bool {
        self.state.borrow().configured
    }
}

impl HardwareCounterPort for FakeCounterPort {
    fn configure(&mut self) {
        let mut state = self.state.borrow_mut();
        state.configured = true;
        state.calls.push(PortCall::Configure);
    }

    fn read_cycle(&mut self) -> u64 {
        let mut state = self.state.borrow_mut();
        state.calls.push(PortCall::Cycle);
        state.cycles
    }

    fn read_instructions(&mut self) -> u64 {
        let mut state = self.state.borrow_mut();
        state.calls.push(PortCall::Instructions);
        state.instructions
    }

    fn read_event_counter(&mut self, slot: CounterSlot) -> u64 {
        let mut state = self.state.borrow_mut();
        state.calls.push(PortCall::Event(slot.index()));
        let position = EVENT_MAP
            .iter()
            .position(|row| row.slot == slot)
            .expect("read of a slot outside the event map");
        state.events[position]
    }
}

thread_local! {
    static LOG_RECORDS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// A [log::Log] that keeps every record in a per-thread buffer, so that tests running in parallel
/// only see their own records.
struct RecordingLogger;

impl log::Log for RecordingLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let line = format!("{} {}", record.level(), record.args());
        LOG_RECORDS.with(|records| records.borrow_mut().push(line));
    }

    fn flush(&self) {}
}

static RECORDING_LOGGER: RecordingLogger = RecordingLogger;
static INSTALL_LOGGER: Once = Once::new();

/// Installs the recording logger at `Trace` level (once per test binary) and clears the current
/// thread's records.
pub fn install_recording_logger() {
    INSTALL_LOGGER.call_once(|| {
        log::set_logger(&RECORDING_LOGGER).expect("another logger was already installed");
        log::set_max_level(log::LevelFilter::Trace);
    });
    LOG_RECORDS.with(|records| records.borrow_mut().clear());
}

/// Returns the records logged on the current thread since [install_recording_logger].
pub fn log_records() -> Vec<String> {
    LOG_RECORDS.with(|records| records.borrow().clone())
}
