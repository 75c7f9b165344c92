//! crates/logging/src/config.rs
//! Threshold and flag configuration applied to a [`LogContext`].

use logging_sink::SyslogConfig;

use crate::engine::{LogContext, LogContextBuilder};
use crate::error::FlagError;
use crate::level::LogLevel;

/// Settings for a [`LogContext`], usually assembled from command-line options
/// or a configuration file.
///
/// ```
/// use logging::{LogConfig, LogContext, LogLevel};
///
/// let mut config = LogConfig::from_verbosity(1);
/// config.apply_flag_token("+conn").unwrap();
///
/// let ctx = config.context_builder().build();
/// ctx.register_flag("conn").unwrap();
/// config.apply(&ctx).unwrap();
///
/// assert_eq!(ctx.levels().print_level(), LogLevel::Info);
/// assert!(ctx.flags().get("conn"));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LogConfig {
    /// Console threshold.
    pub print_level: LogLevel,
    /// Persistent-log threshold.
    pub log_level: LogLevel,
    /// Backtrace threshold.
    pub backtrace_level: LogLevel,
    /// Flag tokens applied in order: `name` or `+name` enables, `-name`
    /// disables, and `all` addresses every flag.
    pub flags: Vec<String>,
    /// Persistent channel identity and facility.
    pub syslog: SyslogConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            print_level: LogLevel::Notice,
            log_level: LogLevel::Notice,
            backtrace_level: LogLevel::Disabled,
            flags: Vec::new(),
            syslog: SyslogConfig::default(),
        }
    }
}

impl LogConfig {
    /// Maps a `-v` count onto the console threshold.
    pub fn from_verbosity(count: u8) -> Self {
        let print_level = match count {
            0 => LogLevel::Notice,
            1 => LogLevel::Info,
            _ => LogLevel::Debug,
        };

        Self {
            print_level,
            ..Self::default()
        }
    }

    /// Validates and records a flag token.
    pub fn apply_flag_token(&mut self, token: &str) -> Result<(), FlagError> {
        parse_flag_token(token)?;
        self.flags.push(token.trim().to_owned());
        Ok(())
    }

    /// A context builder carrying this configuration's syslog settings.
    pub fn context_builder(&self) -> LogContextBuilder {
        LogContext::builder().syslog(self.syslog.clone())
    }

    /// Sets the thresholds of `ctx` and applies every flag token.
    ///
    /// All tokens are attempted; the first failure is returned.
    pub fn apply(&self, ctx: &LogContext) -> Result<(), FlagError> {
        let levels = ctx.levels();
        levels.set_print_level(self.print_level);
        levels.set_log_level(self.log_level);
        levels.set_backtrace_level(self.backtrace_level);

        let mut first_error = None;
        for token in &self.flags {
            let result = parse_flag_token(token).and_then(|(name, enable)| {
                if enable {
                    ctx.flags().set(name)
                } else {
                    ctx.flags().clear(name)
                }
            });
            if let Err(error) = result
                && first_error.is_none()
            {
                first_error = Some(error);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

/// Splits `+name`, `-name` or `name` into the flag name and whether to enable it.
fn parse_flag_token(token: &str) -> Result<(&str, bool), FlagError> {
    let token = token.trim();
    let (name, enable) = if let Some(name) = token.strip_prefix('-') {
        (name, false)
    } else {
        (token.strip_prefix('+').unwrap_or(token), true)
    };

    if name.is_empty() {
        return Err(FlagError::EmptyToken);
    }
    Ok((name, enable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureBuffer, RecordingPersistentLog};
    use logging_sink::SyslogFacility;

    fn context() -> LogContext {
        let ctx = LogContext::builder()
            .console(CaptureBuffer::new())
            .persistent(RecordingPersistentLog::new())
            .build();
        for name in ["conn", "mr", "qp"] {
            ctx.register_flag(name).unwrap();
        }
        ctx
    }

    #[test]
    fn defaults_match_startup_thresholds() {
        let config = LogConfig::default();
        assert_eq!(config.print_level, LogLevel::Notice);
        assert_eq!(config.log_level, LogLevel::Notice);
        assert_eq!(config.backtrace_level, LogLevel::Disabled);
        assert!(config.flags.is_empty());
    }

    #[test]
    fn verbosity_raises_console_threshold_only() {
        assert_eq!(LogConfig::from_verbosity(0).print_level, LogLevel::Notice);
        assert_eq!(LogConfig::from_verbosity(1).print_level, LogLevel::Info);
        assert_eq!(LogConfig::from_verbosity(2).print_level, LogLevel::Debug);
        assert_eq!(LogConfig::from_verbosity(9).print_level, LogLevel::Debug);
        assert_eq!(LogConfig::from_verbosity(9).log_level, LogLevel::Notice);
    }

    #[test]
    fn parse_flag_token_handles_prefixes() {
        assert_eq!(parse_flag_token("conn"), Ok(("conn", true)));
        assert_eq!(parse_flag_token("+conn"), Ok(("conn", true)));
        assert_eq!(parse_flag_token("-conn"), Ok(("conn", false)));
        assert_eq!(parse_flag_token(" all "), Ok(("all", true)));
        assert_eq!(parse_flag_token(""), Err(FlagError::EmptyToken));
        assert_eq!(parse_flag_token("-"), Err(FlagError::EmptyToken));
    }

    #[test]
    fn tokens_apply_in_order() {
        let ctx = context();
        let mut config = LogConfig::default();
        config.apply_flag_token("all").unwrap();
        config.apply_flag_token("-mr").unwrap();
        config.apply(&ctx).unwrap();

        assert!(ctx.flags().get("conn"));
        assert!(!ctx.flags().get("mr"));
        assert!(ctx.flags().get("qp"));
    }

    #[test]
    fn unknown_flag_is_reported_after_applying_the_rest() {
        let ctx = context();
        let config = LogConfig {
            flags: vec!["nope".into(), "qp".into()],
            backtrace_level: LogLevel::Error,
            ..LogConfig::default()
        };

        assert_eq!(
            config.apply(&ctx),
            Err(FlagError::NotFound {
                name: "nope".into()
            })
        );
        assert!(ctx.flags().get("qp"));
        assert_eq!(ctx.levels().backtrace_level(), LogLevel::Error);
    }

    #[test]
    fn context_builder_carries_syslog_settings() {
        let config = LogConfig {
            syslog: SyslogConfig::new(SyslogFacility::Daemon, "probe"),
            ..LogConfig::default()
        };
        let ctx = config.context_builder().build();
        assert_eq!(ctx.syslog_config().ident(), "probe");
        assert_eq!(ctx.syslog_config().facility(), SyslogFacility::Daemon);
    }

    #[cfg(feature = "serde")]
    mod serde_tests {
        use super::*;

        #[test]
        fn partial_document_fills_defaults() {
            let config: LogConfig =
                serde_json::from_str(r#"{"print_level":"debug","flags":["conn"]}"#).unwrap();
            assert_eq!(config.print_level, LogLevel::Debug);
            assert_eq!(config.log_level, LogLevel::Notice);
            assert_eq!(config.flags, ["conn"]);
            assert_eq!(config.syslog, SyslogConfig::default());
        }

        #[test]
        fn config_serde_roundtrip() {
            let mut config = LogConfig::from_verbosity(2);
            config.apply_flag_token("-qp").unwrap();

            let json = serde_json::to_string(&config).unwrap();
            let decoded: LogConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, config);
        }
    }
}
