//! crates/logging/src/state.rs
//! The three independent thresholds consulted on every log call.

use std::sync::atomic::{AtomicI32, Ordering};

use crate::error::ContractViolation;
use crate::level::{LogLevel, Threshold};

/// Console, persistent and backtrace thresholds.
///
/// Each field is stored as an atomic so setters may race with readers on other
/// threads without undefined behaviour. Updates are independent; no ordering
/// is promised between writes to different thresholds.
#[derive(Debug)]
pub struct LevelState {
    print: AtomicI32,
    persistent: AtomicI32,
    backtrace: AtomicI32,
}

impl LevelState {
    /// Start-up defaults: console and persistent at `Notice`, backtraces off.
    pub const fn new() -> Self {
        Self {
            print: AtomicI32::new(LogLevel::Notice.as_i32()),
            persistent: AtomicI32::new(LogLevel::Notice.as_i32()),
            backtrace: AtomicI32::new(LogLevel::Disabled.as_i32()),
        }
    }

    const fn slot(&self, threshold: Threshold) -> &AtomicI32 {
        match threshold {
            Threshold::Print => &self.print,
            Threshold::Persistent => &self.persistent,
            Threshold::Backtrace => &self.backtrace,
        }
    }

    /// Reads a threshold.
    pub fn get(&self, threshold: Threshold) -> LogLevel {
        // Only validated values are ever stored.
        LogLevel::from_i32(self.slot(threshold).load(Ordering::Relaxed))
            .unwrap_or(LogLevel::Disabled)
    }

    /// Stores a threshold. Every [`LogLevel`] is in range, so this cannot fail.
    pub fn set(&self, threshold: Threshold, level: LogLevel) {
        self.slot(threshold).store(level.as_i32(), Ordering::Relaxed);
    }

    /// Stores a threshold from a raw value, rejecting anything outside `-1..=4`.
    ///
    /// The stored value is left untouched when the call fails.
    pub fn set_raw(&self, threshold: Threshold, value: i32) -> Result<(), ContractViolation> {
        let level = LogLevel::from_i32(value)
            .ok_or(ContractViolation::LevelOutOfRange { threshold, value })?;
        self.set(threshold, level);
        Ok(())
    }

    /// Console gate.
    pub fn print_level(&self) -> LogLevel {
        self.get(Threshold::Print)
    }

    /// Sets the console gate.
    pub fn set_print_level(&self, level: LogLevel) {
        self.set(Threshold::Print, level);
    }

    /// Persistent-log gate.
    pub fn log_level(&self) -> LogLevel {
        self.get(Threshold::Persistent)
    }

    /// Sets the persistent-log gate.
    pub fn set_log_level(&self, level: LogLevel) {
        self.set(Threshold::Persistent, level);
    }

    /// Backtrace gate.
    pub fn backtrace_level(&self) -> LogLevel {
        self.get(Threshold::Backtrace)
    }

    /// Sets the backtrace gate.
    pub fn set_backtrace_level(&self, level: LogLevel) {
        self.set(Threshold::Backtrace, level);
    }

    /// Returns `true` when `level` would reach neither the console nor the
    /// persistent channel, so the message need not be rendered at all.
    pub fn filters_out(&self, level: LogLevel) -> bool {
        !level.passes(self.print_level()) && !level.passes(self.log_level())
    }
}

impl Default for LevelState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_startup_state() {
        let state = LevelState::new();
        assert_eq!(state.print_level(), LogLevel::Notice);
        assert_eq!(state.log_level(), LogLevel::Notice);
        assert_eq!(state.backtrace_level(), LogLevel::Disabled);
    }

    #[test]
    fn thresholds_are_independent() {
        let state = LevelState::new();
        state.set_print_level(LogLevel::Debug);
        state.set_backtrace_level(LogLevel::Error);

        assert_eq!(state.print_level(), LogLevel::Debug);
        assert_eq!(state.log_level(), LogLevel::Notice);
        assert_eq!(state.backtrace_level(), LogLevel::Error);
    }

    #[test]
    fn raw_setter_accepts_full_range() {
        let state = LevelState::new();
        for value in -1..=4 {
            state.set_raw(Threshold::Persistent, value).unwrap();
            assert_eq!(state.log_level().as_i32(), value);
        }
    }

    #[test]
    fn raw_setter_rejects_out_of_range_without_storing() {
        let state = LevelState::new();
        state.set_print_level(LogLevel::Info);

        let err = state.set_raw(Threshold::Print, 5).unwrap_err();
        assert_eq!(
            err,
            ContractViolation::LevelOutOfRange {
                threshold: Threshold::Print,
                value: 5,
            }
        );
        assert!(state.set_raw(Threshold::Backtrace, -2).is_err());
        assert_eq!(state.print_level(), LogLevel::Info);
        assert_eq!(state.backtrace_level(), LogLevel::Disabled);
    }

    #[test]
    fn filters_out_requires_both_gates_closed() {
        let state = LevelState::new();
        state.set_print_level(LogLevel::Error);
        state.set_log_level(LogLevel::Warn);

        assert!(!state.filters_out(LogLevel::Error));
        assert!(!state.filters_out(LogLevel::Warn));
        assert!(state.filters_out(LogLevel::Notice));
        assert!(state.filters_out(LogLevel::Disabled));
    }
}
