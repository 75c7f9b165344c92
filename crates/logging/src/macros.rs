//! crates/logging/src/macros.rs
//! Call-site macros that capture file, line and function name.

/// Expands to the name of the enclosing function.
///
/// Closures report the function that contains them.
///
/// ```
/// fn connect() -> &'static str {
///     logging::function_name!()
/// }
///
/// assert_eq!(connect(), "connect");
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        let name = name.strip_suffix("::__here").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        match name.rfind("::") {
            Some(pos) => &name[pos + 2..],
            None => name,
        }
    }};
}

/// Logs at an explicit level with the call site attached.
///
/// Uses the global context unless `ctx:` names another one.
///
/// ```
/// use logging::{CaptureBuffer, LogContext, LogLevel};
///
/// let console = CaptureBuffer::new();
/// let ctx = LogContext::builder().console(console.clone()).build();
///
/// fn handshake(ctx: &LogContext, peer: &str) {
///     logging::log_at!(ctx: ctx, LogLevel::Error, "peer {} refused", peer);
/// }
/// handshake(&ctx, "10.0.0.2");
///
/// assert!(console.text().contains(":handshake: *ERROR*: peer 10.0.0.2 refused"));
/// ```
#[macro_export]
macro_rules! log_at {
    (ctx: $ctx:expr, $level:expr, $fmt:literal $($arg:tt)*) => {
        $ctx.log(
            $level,
            ::core::option::Option::Some($crate::SourceLocation::new(
                ::core::file!(),
                ::core::line!(),
                $crate::function_name!(),
            )),
            $fmt,
            ::core::format_args!($fmt $($arg)*),
        )
    };
    ($level:expr, $fmt:literal $($arg:tt)*) => {
        $crate::log_at!(ctx: $crate::global(), $level, $fmt $($arg)*)
    };
}

/// Logs at [`LogLevel::Error`](crate::LogLevel::Error).
#[macro_export]
macro_rules! error_log {
    (ctx: $ctx:expr, $($rest:tt)+) => {
        $crate::log_at!(ctx: $ctx, $crate::LogLevel::Error, $($rest)+)
    };
    ($($rest:tt)+) => {
        $crate::log_at!($crate::LogLevel::Error, $($rest)+)
    };
}

/// Logs at [`LogLevel::Warn`](crate::LogLevel::Warn).
#[macro_export]
macro_rules! warn_log {
    (ctx: $ctx:expr, $($rest:tt)+) => {
        $crate::log_at!(ctx: $ctx, $crate::LogLevel::Warn, $($rest)+)
    };
    ($($rest:tt)+) => {
        $crate::log_at!($crate::LogLevel::Warn, $($rest)+)
    };
}

/// Logs at [`LogLevel::Notice`](crate::LogLevel::Notice).
#[macro_export]
macro_rules! notice_log {
    (ctx: $ctx:expr, $($rest:tt)+) => {
        $crate::log_at!(ctx: $ctx, $crate::LogLevel::Notice, $($rest)+)
    };
    ($($rest:tt)+) => {
        $crate::log_at!($crate::LogLevel::Notice, $($rest)+)
    };
}

/// Logs at [`LogLevel::Info`](crate::LogLevel::Info) while `flag` is enabled.
///
/// `flag` is anything with an `is_enabled()` method, normally the
/// [`LogFlag`](crate::LogFlag) handle returned by registration.
#[macro_export]
macro_rules! info_log {
    (ctx: $ctx:expr, $flag:expr, $($rest:tt)+) => {
        if $flag.is_enabled() {
            $crate::log_at!(ctx: $ctx, $crate::LogLevel::Info, $($rest)+)
        }
    };
    ($flag:expr, $($rest:tt)+) => {
        if $flag.is_enabled() {
            $crate::log_at!($crate::LogLevel::Info, $($rest)+)
        }
    };
}

/// Logs at [`LogLevel::Debug`](crate::LogLevel::Debug) while `flag` is enabled.
///
/// Expands to nothing unless the `debug-flags` feature is on.
#[cfg(feature = "debug-flags")]
#[macro_export]
macro_rules! debug_log {
    (ctx: $ctx:expr, $flag:expr, $($rest:tt)+) => {
        if $flag.is_enabled() {
            $crate::log_at!(ctx: $ctx, $crate::LogLevel::Debug, $($rest)+)
        }
    };
    ($flag:expr, $($rest:tt)+) => {
        if $flag.is_enabled() {
            $crate::log_at!($crate::LogLevel::Debug, $($rest)+)
        }
    };
}

/// Logs at [`LogLevel::Debug`](crate::LogLevel::Debug) while `flag` is enabled.
///
/// Expands to nothing unless the `debug-flags` feature is on.
#[cfg(not(feature = "debug-flags"))]
#[macro_export]
macro_rules! debug_log {
    ($($rest:tt)*) => {
        ()
    };
}

/// Hex-dumps a non-empty buffer to the console while `flag` is enabled.
///
/// Expands to nothing unless the `debug-flags` feature is on.
#[cfg(feature = "debug-flags")]
#[macro_export]
macro_rules! log_dump {
    (ctx: $ctx:expr, $flag:expr, $label:expr, $bytes:expr) => {{
        let bytes: &[u8] = $bytes;
        if $flag.is_enabled() && !bytes.is_empty() {
            let _ = $ctx.dump($label, bytes);
        }
    }};
    ($flag:expr, $label:expr, $bytes:expr) => {
        $crate::log_dump!(ctx: $crate::global(), $flag, $label, $bytes)
    };
}

/// Hex-dumps a non-empty buffer to the console while `flag` is enabled.
///
/// Expands to nothing unless the `debug-flags` feature is on.
#[cfg(not(feature = "debug-flags"))]
#[macro_export]
macro_rules! log_dump {
    ($($rest:tt)*) => {
        ()
    };
}

#[cfg(test)]
mod tests {
    use crate::capture::{CaptureBuffer, RecordingPersistentLog, RecordingSink};
    use crate::engine::LogContext;
    use crate::level::LogLevel;
    use std::sync::Arc;

    fn context() -> (LogContext, CaptureBuffer) {
        let console = CaptureBuffer::new();
        let ctx = LogContext::builder()
            .console(console.clone())
            .persistent(RecordingPersistentLog::new())
            .build();
        (ctx, console)
    }

    #[test]
    fn function_name_reports_enclosing_fn() {
        fn outer() -> &'static str {
            crate::function_name!()
        }
        assert_eq!(outer(), "outer");

        let in_closure = || crate::function_name!();
        assert_eq!(in_closure(), "function_name_reports_enclosing_fn");
    }

    #[test]
    fn log_at_captures_call_site() {
        let (ctx, _) = context();
        let sink = Arc::new(RecordingSink::new());
        ctx.open(Some(sink.clone()));

        let line = line!() + 1;
        crate::log_at!(ctx: ctx, LogLevel::Warn, "retry {} of {}", 1, 3);

        let record = &sink.records()[0];
        assert_eq!(record.file.as_deref(), Some(file!()));
        assert_eq!(record.line, line);
        assert_eq!(record.function.as_deref(), Some("log_at_captures_call_site"));
        assert_eq!(record.format, "retry {} of {}");
        assert_eq!(record.message, "retry 1 of 3");
    }

    #[test]
    fn shorthands_pick_their_level() {
        let (ctx, _) = context();
        let sink = Arc::new(RecordingSink::new());
        ctx.open(Some(sink.clone()));

        crate::error_log!(ctx: ctx, "e");
        crate::warn_log!(ctx: ctx, "w");
        crate::notice_log!(ctx: ctx, "n {}", 1);

        let levels: Vec<_> = sink.records().iter().map(|r| r.level).collect();
        assert_eq!(levels, [LogLevel::Error, LogLevel::Warn, LogLevel::Notice]);
    }

    #[test]
    fn info_log_is_gated_by_flag() {
        let (ctx, console) = context();
        ctx.levels().set_print_level(LogLevel::Info);
        let flag = ctx.register_flag("conn").unwrap();

        crate::info_log!(ctx: ctx, flag, "hidden");
        assert!(console.text().is_empty());

        flag.set_enabled(true);
        crate::info_log!(ctx: ctx, flag, "shown {}", 2);
        assert!(console.text().contains("*INFO*: shown 2"));
    }

    #[cfg(feature = "debug-flags")]
    #[test]
    fn debug_log_and_dump_follow_flag() {
        let (ctx, console) = context();
        ctx.levels().set_print_level(LogLevel::Debug);
        let flag = ctx.register_flag("mr").unwrap();

        crate::debug_log!(ctx: ctx, flag, "hidden");
        crate::log_dump!(ctx: ctx, flag, "hidden", b"xy");
        assert!(console.text().is_empty());

        ctx.flags().set("MR").unwrap();
        crate::debug_log!(ctx: ctx, flag, "visible");
        crate::log_dump!(ctx: ctx, flag, "empty", &[]);
        crate::log_dump!(ctx: ctx, flag, "bytes", b"xy");

        let text = console.text();
        assert!(text.contains("*DEBUG*: visible"));
        assert!(!text.contains("empty"));
        assert!(text.contains("bytes\n00000000  78 79 "));
    }
}
