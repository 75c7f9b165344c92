//! Command-line front end for the logging engine.
//!
//! Configures the global context from arguments, emits one message and can
//! hex-dump a file. Contract violations (for example registering the same
//! flag twice with `--register`) abort the process here, after the engine has
//! reported them.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::{PathBufValueParser, ValueParser};
use clap::{Arg, ArgAction, ArgMatches, Command};
use logging::{
    ContractViolation, LogConfig, LogContext, LogLevel, OrAbort, SyslogConfig, SyslogFacility,
};

/// Name shown in help output.
const PROGRAM_NAME: &str = "embedlog";

/// Flags every run registers, besides those given with `--register`.
const BUILTIN_FLAGS: &[&str] = &[logging::LOG_COMPONENT_FLAG, "cli"];

/// Options gathered from the command line.
#[derive(Debug)]
struct Options {
    config: LogConfig,
    register: Vec<String>,
    level: LogLevel,
    located: bool,
    message: Option<String>,
    dump: Option<PathBuf>,
    label: String,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    let level_parser = ValueParser::new(|value: &str| value.parse::<LogLevel>());

    Command::new(PROGRAM_NAME)
        .about("Emit a message through the leveled logging engine.")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Raise the console threshold (-v info, -vv debug).")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("logflag")
                .short('L')
                .long("logflag")
                .value_name("FLAG")
                .help("Enable (FLAG, +FLAG) or disable (-FLAG) a debug log flag.")
                .allow_hyphen_values(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("register")
                .long("register")
                .value_name("NAME")
                .help("Register an additional debug log flag.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("print-level")
                .long("print-level")
                .value_name("LEVEL")
                .help("Console threshold.")
                .value_parser(level_parser.clone()),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Syslog threshold; syslog is opened only when this is set.")
                .value_parser(level_parser.clone()),
        )
        .arg(
            Arg::new("backtrace-level")
                .long("backtrace-level")
                .value_name("LEVEL")
                .help("Threshold for stack dumps after console lines.")
                .value_parser(level_parser.clone()),
        )
        .arg(
            Arg::new("facility")
                .long("facility")
                .value_name("NAME")
                .help("Syslog facility (default local7).")
                .value_parser(ValueParser::new(|value: &str| {
                    SyslogFacility::from_name(value)
                        .ok_or_else(|| format!("unknown syslog facility '{value}'"))
                })),
        )
        .arg(
            Arg::new("ident")
                .long("ident")
                .value_name("NAME")
                .help("Syslog identity (default embedlog)."),
        )
        .arg(
            Arg::new("level")
                .long("level")
                .short('l')
                .value_name("LEVEL")
                .help("Level of the emitted message (default notice).")
                .value_parser(level_parser),
        )
        .arg(
            Arg::new("no-location")
                .long("no-location")
                .help("Emit the message without file, line and function.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump")
                .long("dump")
                .value_name("FILE")
                .help("Hex-dump FILE to standard output.")
                .value_parser(PathBufValueParser::new()),
        )
        .arg(
            Arg::new("label")
                .long("label")
                .value_name("TEXT")
                .help("Label printed above the hex dump (default: the file name)."),
        )
        .arg(
            Arg::new("message")
                .value_name("MESSAGE")
                .help("Message to log.")
                .num_args(1..)
                .trailing_var_arg(true),
        )
}

fn options_from(matches: &ArgMatches) -> Result<Options, logging::FlagError> {
    let verbosity = matches.get_count("verbose");
    let mut config = LogConfig::from_verbosity(verbosity);
    // The CLI keeps syslog quiet unless asked for.
    config.log_level = LogLevel::Disabled;

    if let Some(level) = matches.get_one::<LogLevel>("print-level") {
        config.print_level = *level;
    }
    if let Some(level) = matches.get_one::<LogLevel>("log-level") {
        config.log_level = *level;
    }
    if let Some(level) = matches.get_one::<LogLevel>("backtrace-level") {
        config.backtrace_level = *level;
    }

    let facility = matches
        .get_one::<SyslogFacility>("facility")
        .copied()
        .unwrap_or_default();
    let ident = matches
        .get_one::<String>("ident")
        .map_or(logging_sink::syslog::DEFAULT_SYSLOG_IDENT, String::as_str);
    config.syslog = SyslogConfig::new(facility, ident);

    for token in matches.get_many::<String>("logflag").into_iter().flatten() {
        config.apply_flag_token(token)?;
    }

    let dump = matches.get_one::<PathBuf>("dump").cloned();
    let label = matches.get_one::<String>("label").cloned().unwrap_or_else(|| {
        dump.as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_default()
    });

    let message = matches
        .get_many::<String>("message")
        .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "));

    Ok(Options {
        config,
        register: matches
            .get_many::<String>("register")
            .into_iter()
            .flatten()
            .cloned()
            .collect(),
        level: matches
            .get_one::<LogLevel>("level")
            .copied()
            .unwrap_or(LogLevel::Notice),
        located: !matches.get_flag("no-location"),
        message,
        dump,
        label,
    })
}

fn write_help<Out: Write>(stdout: &mut Out, ctx: &LogContext) -> std::io::Result<()> {
    let help = clap_command().render_help();
    writeln!(stdout, "{help}")?;
    writeln!(stdout, "Debug log flags:")?;
    ctx.usage(stdout, "-L")
}

/// Registers [`BUILTIN_FLAGS`] that `ctx` does not know yet. A context left
/// over from an earlier run already carries them.
fn register_builtin_flags(ctx: &LogContext) -> Result<(), ContractViolation> {
    for name in BUILTIN_FLAGS {
        if ctx.flags().find(name).is_none() {
            ctx.register_flag(name)?;
        }
    }
    Ok(())
}

fn emit_message(level: LogLevel, located: bool, message: &str) {
    if located {
        logging::log_at!(level, "{}", message);
    } else {
        logging::log(level, None, "{}", format_args!("{message}"));
    }
}

/// Parses `args`, configures the global context and performs the requested
/// actions.
pub fn run_with<I, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let matches = match clap_command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(error) => {
            let _ = write!(stderr, "{error}");
            return ExitCode::from(2);
        }
    };

    let options = match options_from(&matches) {
        Ok(options) => options,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            return ExitCode::from(2);
        }
    };

    let ctx = logging::init_global(options.config.context_builder().build())
        .unwrap_or_else(|_| logging::global());
    register_builtin_flags(ctx).or_abort("run_with");
    for name in &options.register {
        ctx.register_flag(name).or_abort("run_with");
    }

    if matches.get_flag("help") {
        return match write_help(stdout, ctx) {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    }

    if let Err(error) = options.config.apply(ctx) {
        let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
        return ExitCode::from(2);
    }

    let _ = logging::init_tracing(ctx);
    tracing::debug!(
        target: "embedlog::cli",
        "print level {}, log level {}, backtrace level {}",
        ctx.levels().print_level(),
        ctx.levels().log_level(),
        ctx.levels().backtrace_level()
    );

    let syslog = ctx.levels().log_level() != LogLevel::Disabled;
    if syslog {
        logging::open(None);
    }

    if let Some(message) = &options.message {
        emit_message(options.level, options.located, message);
    }

    let mut status = ExitCode::SUCCESS;
    if let Some(path) = &options.dump {
        match std::fs::read(path) {
            Ok(bytes) => {
                if logging::dump(stdout, &options.label, &bytes).is_err() {
                    status = ExitCode::FAILURE;
                }
            }
            Err(error) => {
                logging::error_log!("cannot read {}: {}", path.display(), error);
                status = ExitCode::FAILURE;
            }
        }
    }

    if syslog {
        logging::close();
    }
    status
}
