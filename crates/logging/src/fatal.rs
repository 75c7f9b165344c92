//! crates/logging/src/fatal.rs
//! Turning contract violations into a diagnostic and process termination.

use std::panic::Location;

use logging_sink::{SourceLocation, write_located};

use crate::engine::LogContext;
use crate::error::ContractViolation;
use crate::level::LogLevel;

/// Reports `violation` through `ctx` at [`LogLevel::Error`].
///
/// When an override sink is installed, or the console threshold hides errors,
/// the diagnostic is also written straight to stderr so the reason for the
/// coming termination is always visible.
pub fn report(ctx: &LogContext, violation: &ContractViolation, location: SourceLocation<'_>) {
    ctx.log(
        LogLevel::Error,
        Some(location),
        "{}",
        format_args!("{violation}"),
    );

    if ctx.has_override() || !LogLevel::Error.passes(ctx.levels().print_level()) {
        let mut line = String::new();
        if write_located(&mut line, location, LogLevel::Error.name(), &violation.to_string())
            .is_ok()
        {
            eprintln!("{line}");
        }
    }
}

/// Reports `violation` through the global context and aborts the process.
///
/// The reported location is the caller's; `function` names the API entry
/// point that detected the violation.
#[track_caller]
pub fn report_and_abort(violation: &ContractViolation, function: &str) -> ! {
    let caller = Location::caller();
    report(
        crate::global(),
        violation,
        SourceLocation::new(caller.file(), caller.line(), function),
    );
    std::process::abort()
}

/// Converts a contract violation into process termination at the call site.
pub trait OrAbort<T> {
    /// Returns the success value or reports the violation and aborts.
    fn or_abort(self, function: &str) -> T;
}

impl<T> OrAbort<T> for Result<T, ContractViolation> {
    #[track_caller]
    fn or_abort(self, function: &str) -> T {
        match self {
            Ok(value) => value,
            Err(violation) => report_and_abort(&violation, function),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::capture::{CaptureBuffer, RecordingPersistentLog, RecordingSink};
    use crate::level::Threshold;

    #[test]
    fn report_logs_at_error_level() {
        let console = CaptureBuffer::new();
        let ctx = LogContext::builder()
            .console(console.clone())
            .persistent(RecordingPersistentLog::new())
            .build();

        let violation = ContractViolation::LevelOutOfRange {
            threshold: Threshold::Backtrace,
            value: 11,
        };
        report(&ctx, &violation, SourceLocation::new("app.rs", 5, "set_backtrace_level"));

        assert!(console.text().ends_with(
            "app.rs:   5:set_backtrace_level: *ERROR*: backtrace level 11 is outside -1..=4\n"
        ));
    }

    #[test]
    fn report_reaches_override_sink() {
        let ctx = LogContext::builder()
            .console(CaptureBuffer::new())
            .persistent(RecordingPersistentLog::new())
            .build();
        let sink = Arc::new(RecordingSink::new());
        ctx.open(Some(sink.clone()));

        report(
            &ctx,
            &ContractViolation::MissingFlagName,
            SourceLocation::new("app.rs", 9, "register_flag"),
        );

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Error);
        assert_eq!(records[0].message, "missing log flag name");
    }

    #[test]
    fn or_abort_passes_success_through() {
        let ok: Result<u8, ContractViolation> = Ok(3);
        assert_eq!(ok.or_abort("test"), 3);
    }
}
