//! crates/logging/src/tracing_bridge.rs
//! Bridge from the tracing crate into a [`LogContext`].
//!
//! [`EngineLayer`] is a tracing-subscriber layer that feeds events through the
//! same thresholds, flags and sinks as the native macros. Levels map as
//! follows:
//!
//! | tracing | engine   |
//! |---------|----------|
//! | ERROR   | Error    |
//! | WARN    | Warn     |
//! | INFO    | Notice   |
//! | DEBUG   | Info     |
//! | TRACE   | Debug    |
//!
//! When the last `::` segment of an event's target names a registered flag,
//! the event is dropped while that flag is disabled.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::init_tracing;
//!
//! logging::register_flag("conn");
//! init_tracing(logging::global()).expect("no other subscriber installed");
//!
//! tracing::warn!("retrying");
//! tracing::debug!(target: "app::conn", "connected");
//! ```

use std::fmt;
use std::ops::Deref;

use logging_sink::SourceLocation;
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

use crate::engine::LogContext;
use crate::level::LogLevel;

/// A tracing layer that logs events through a [`LogContext`].
///
/// `C` is any shared handle to the context: `&'static LogContext` for the
/// global one, or `Arc<LogContext>` for an explicitly built one.
pub struct EngineLayer<C> {
    ctx: C,
}

impl<C> EngineLayer<C>
where
    C: Deref<Target = LogContext>,
{
    /// Creates a layer that logs into `ctx`.
    pub const fn new(ctx: C) -> Self {
        Self { ctx }
    }

    /// Maps a tracing level onto an engine level.
    pub const fn map_level(level: &Level) -> LogLevel {
        match *level {
            Level::ERROR => LogLevel::Error,
            Level::WARN => LogLevel::Warn,
            Level::INFO => LogLevel::Notice,
            Level::DEBUG => LogLevel::Info,
            Level::TRACE => LogLevel::Debug,
        }
    }

    /// Last `::` segment of a target, the part matched against flag names.
    fn flag_name(target: &str) -> &str {
        target.rsplit("::").next().unwrap_or(target)
    }

    fn gated_off(&self, target: &str) -> bool {
        self.ctx
            .flags()
            .find(Self::flag_name(target))
            .is_some_and(|flag| !flag.is_enabled())
    }
}

impl<C> fmt::Debug for EngineLayer<C>
where
    C: Deref<Target = LogContext>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineLayer")
            .field("ctx", &*self.ctx)
            .finish()
    }
}

impl<S, C> Layer<S> for EngineLayer<C>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    C: Deref<Target = LogContext> + Send + Sync + 'static,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if self.gated_off(target) {
            return;
        }

        let level = Self::map_level(metadata.level());
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let message = visitor.message.unwrap_or_default();

        let location = metadata
            .file()
            .map(|file| SourceLocation::new(file, metadata.line().unwrap_or(0), target));

        self.ctx
            .log(level, location, &message, format_args!("{message}"));
    }
}

/// Visitor to extract the message from a tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// Installs a registry with an [`EngineLayer`] as the global default
/// subscriber.
///
/// Fails if another global subscriber is already installed.
pub fn init_tracing<C>(ctx: C) -> Result<(), TryInitError>
where
    C: Deref<Target = LogContext> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(EngineLayer::new(ctx))
        .try_init()
}

/// Like [`init_tracing`], with an extra filter layer in front of the engine.
///
/// ```rust,ignore
/// use logging::init_tracing_with_filter;
/// use tracing_subscriber::EnvFilter;
///
/// init_tracing_with_filter(logging::global(), EnvFilter::from_default_env())?;
/// ```
pub fn init_tracing_with_filter<C, F>(ctx: C, filter: F) -> Result<(), TryInitError>
where
    C: Deref<Target = LogContext> + Send + Sync + 'static,
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(EngineLayer::new(ctx))
        .try_init()
}
