//! Build-time configuration of the benchmark: the core clock frequency used to convert cycles into
//! elapsed time.

/// The clock frequency of the CVA6 core on the reference FPGA/simulation setup (50 MHz).
pub const CPU_FREQ_HZ: u64 = 50_000_000;

/// Errors produced when validating configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A clock frequency of zero would make every elapsed-time computation divide by zero.
    #[error("clock frequency must be non-zero")]
    ZeroFrequency,
    /// The frequency string contained something other than decimal digits, or didn't fit a u64.
    #[error("clock frequency is not a decimal number of Hz")]
    InvalidFrequency,
    /// Only `mhpmcounter3` to `mhpmcounter31` are programmable.
    #[error("counter slot {0} is not a programmable HPM slot (3..=31)")]
    SlotOutOfRange(u8),
}

/// The clock the cycle counter runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    cpu_freq_hz: u64,
}

impl ClockConfig {
    /// Constructs a [ClockConfig] for a core running at `cpu_freq_hz`.
    pub const fn new(cpu_freq_hz: u64) -> Result<ClockConfig, ConfigError> {
        if cpu_freq_hz == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        Ok(ClockConfig { cpu_freq_hz })
    }

    /// Parses a frequency given as a decimal number of Hz, e.g. `"50000000"`.
    ///
    /// This is a `const fn` so that a frequency passed in through the build environment can be
    /// validated at compile time.
    pub const fn parse(s: &str) -> Result<ClockConfig, ConfigError> {
        let bytes = s.as_bytes();
        if bytes.is_empty() {
            return Err(ConfigError::InvalidFrequency);
        }
        let mut value: u64 = 0;
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if !b.is_ascii_digit() {
                return Err(ConfigError::InvalidFrequency);
            }
            value = match value.checked_mul(10) {
                Some(v) => match v.checked_add((b - b'0') as u64) {
                    Some(v) => v,
                    None => return Err(ConfigError::InvalidFrequency),
                },
                None => return Err(ConfigError::InvalidFrequency),
            };
            i += 1;
        }
        ClockConfig::new(value)
    }

    /// The core clock frequency, in Hz.
    pub const fn cpu_freq_hz(&self) -> u64 {
        self.cpu_freq_hz
    }

    /// Converts a number of elapsed cycles into whole microseconds, truncating any remainder.
    ///
    /// The multiplication wraps rather than panics, matching the unchecked arithmetic of the rest of
    /// the measurement path. It only wraps for cycle counts beyond ~1.8e13.
    pub const fn cycles_to_micros(&self, cycles: u64) -> u64 {
        cycles.wrapping_mul(1_000_000) / self.cpu_freq_hz
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            cpu_freq_hz: CPU_FREQ_HZ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_50mhz() {
        assert_eq!(ClockConfig::default().cpu_freq_hz(), 50_000_000);
    }

    // 50 cycles at 50 MHz is exactly one microsecond, anything less truncates to zero.
    #[test]
    fn micros_truncate() {
        let clock = ClockConfig::default();
        assert_eq!(clock.cycles_to_micros(0), 0);
        assert_eq!(clock.cycles_to_micros(49), 0);
        assert_eq!(clock.cycles_to_micros(50), 1);
        assert_eq!(clock.cycles_to_micros(99), 1);
        assert_eq!(clock.cycles_to_micros(50_000_000), 1_000_000);
    }

    #[test]
    fn micros_follow_injected_frequency() {
        let clock = ClockConfig::new(1_000_000).unwrap();
        assert_eq!(clock.cycles_to_micros(162), 162);
        let clock = ClockConfig::new(100_000_000).unwrap();
        assert_eq!(clock.cycles_to_micros(162), 1);
        assert_eq!(clock.cycles_to_micros(199), 1);
        assert_eq!(clock.cycles_to_micros(200), 2);
    }

    #[test]
    fn zero_frequency_is_rejected() {
        assert_eq!(ClockConfig::new(0), Err(ConfigError::ZeroFrequency));
        assert_eq!(ClockConfig::parse("0"), Err(ConfigError::ZeroFrequency));
    }

    #[test]
    fn parse_decimal() {
        assert_eq!(
            ClockConfig::parse("50000000").unwrap(),
            ClockConfig::default()
        );
        assert_eq!(ClockConfig::parse("7").unwrap().cpu_freq_hz(), 7);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(ClockConfig::parse(""), Err(ConfigError::InvalidFrequency));
        assert_eq!(ClockConfig::parse("50MHz"), Err(ConfigError::InvalidFrequency));
        assert_eq!(ClockConfig::parse("-1"), Err(ConfigError::InvalidFrequency));
        assert_eq!(
            ClockConfig::parse("18446744073709551616"),
            Err(ConfigError::InvalidFrequency)
        );
    }

    #[test]
    fn parse_in_const_context() {
        const CLOCK: ClockConfig = match ClockConfig::parse("25000000") {
            Ok(clock) => clock,
            Err(_) => panic!("bad frequency"),
        };
        assert_eq!(CLOCK.cpu_freq_hz(), 25_000_000);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ConfigError::SlotOutOfRange(2).to_string(),
            "counter slot 2 is not a programmable HPM slot (3..=31)"
        );
    }
}
