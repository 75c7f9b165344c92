//! End-to-end tests for the `embedlog` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn embedlog() -> Command {
    Command::cargo_bin("embedlog").expect("embedlog binary is built")
}

// ============================================================================
// Help
// ============================================================================

/// Verifies --help prints clap usage followed by the flag usage line.
#[test]
fn help_lists_options_and_flags() {
    let expected = if cfg!(feature = "debug-flags") {
        " -L, --logflag <flag>    enable debug log flag (all, cli, log)\n"
    } else {
        " -L, --logflag <flag>    enable debug log flag \
         (not supported - must rebuild with the debug-flags feature)\n"
    };

    embedlog()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--print-level"))
        .stdout(predicate::str::ends_with(expected));
}

/// Verifies flags added with --register appear in sorted position.
#[cfg(feature = "debug-flags")]
#[test]
fn help_includes_registered_flags() {
    embedlog()
        .args(["--register", "Conn", "--register", "rdma", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "enable debug log flag (all, cli, Conn, log, rdma)\n",
        ));
}

// ============================================================================
// Messages
// ============================================================================

/// Verifies a notice reaches stderr with timestamp and call site.
#[test]
fn notice_is_printed_with_location() {
    embedlog()
        .args(["link", "is", "up"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_match(
            r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{6}\] .+:\s*\d+:emit_message: \*NOTICE\*: link is up\n$",
        )
        .unwrap());
}

/// Verifies --no-location prints only the timestamp and message.
#[test]
fn bare_message_has_no_location() {
    embedlog()
        .args(["--no-location", "--level", "error", "plain"])
        .assert()
        .success()
        .stderr(predicate::str::is_match(r"^\[[^\]]+\] plain\n$").unwrap());
}

/// Verifies messages above the console threshold are suppressed.
#[test]
fn debug_message_is_filtered_by_default() {
    embedlog()
        .args(["--level", "debug", "noisy"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

/// Verifies -vv admits debug messages.
#[test]
fn double_verbose_admits_debug() {
    embedlog()
        .args(["-vv", "--level", "debug", "noisy"])
        .assert()
        .success()
        .stderr(predicate::str::contains("*DEBUG*: noisy"));
}

/// Verifies the cli flag gates the bridged tracing event.
#[test]
fn cli_flag_enables_configuration_trace() {
    embedlog()
        .args(["-v"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    embedlog()
        .args(["-v", "-L", "cli"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "*INFO*: print level INFO, log level DISABLED, backtrace level DISABLED",
        ));
}

// ============================================================================
// Errors
// ============================================================================

/// Verifies an unknown flag name is reported and fails.
#[test]
fn unknown_logflag_fails() {
    embedlog()
        .args(["-L", "nope", "hello"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown log flag 'nope'"));
}

/// Verifies an unparsable level is rejected by argument parsing.
#[test]
fn invalid_level_fails() {
    embedlog()
        .args(["--print-level", "7"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown log level '7'"));
}

/// Verifies a duplicate registration is reported before the process aborts.
#[test]
fn duplicate_registration_aborts() {
    embedlog()
        .args(["--register", "LOG"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("*ERROR*: duplicate log flag 'LOG'"));
}

// ============================================================================
// Hex Dump
// ============================================================================

/// Verifies --dump writes the exact table to stdout.
#[test]
fn dump_writes_table_to_stdout() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0x41, 0x42, 0x0a, 0x00]).unwrap();

    let expected = format!(
        "sample\n00000000  41 42 0a 00 {}{}{}  AB..\n",
        "   ".repeat(4),
        " ",
        "   ".repeat(8)
    );

    embedlog()
        .arg("--dump")
        .arg(file.path())
        .args(["--label", "sample"])
        .assert()
        .success()
        .stdout(predicate::str::diff(expected));
}

/// Verifies a missing dump file is logged as an error.
#[test]
fn missing_dump_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.bin");

    embedlog()
        .arg("--dump")
        .arg(&missing)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("*ERROR*: cannot read"));
}
