//! crates/logging/src/error.rs
//! Error types for contract violations and flag lookups.

use thiserror::Error;

use crate::level::Threshold;

/// Misuse of the logging API by the embedding code.
///
/// These are programming errors, not runtime conditions. Library methods
/// return them so tests can observe the violation; the facade functions on
/// the global context hand them to [`report_and_abort`](crate::report_and_abort).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ContractViolation {
    /// A threshold setter received a value that is not a level.
    #[error("{threshold} {value} is outside -1..=4")]
    LevelOutOfRange {
        /// The threshold being set.
        threshold: Threshold,
        /// The rejected value.
        value: i32,
    },
    /// A flag was registered without a name.
    #[error("missing log flag name")]
    MissingFlagName,
    /// A flag name was registered twice, ignoring case.
    #[error("duplicate log flag '{name}'")]
    DuplicateFlag {
        /// The name that was already registered.
        name: String,
    },
    /// A flag tried to claim the name that addresses every flag.
    #[error("log flag name '{name}' is reserved")]
    ReservedFlagName {
        /// The reserved name as passed by the caller.
        name: String,
    },
}

/// Failure to enable or disable a flag by name.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FlagError {
    /// No registered flag matches the name.
    #[error("unknown log flag '{name}'")]
    NotFound {
        /// The name that failed to match.
        name: String,
    },
    /// A configuration token carried no flag name.
    #[error("empty log flag token")]
    EmptyToken,
}

impl FlagError {
    /// Status code reported to C-style callers.
    pub const fn status(&self) -> i32 {
        -1
    }
}

/// Converts a flag operation result into the `0`/`-1` status convention.
///
/// ```
/// use logging::{FlagError, flag_status};
///
/// assert_eq!(flag_status(&Ok(())), 0);
/// assert_eq!(flag_status(&Err(FlagError::EmptyToken)), -1);
/// ```
pub fn flag_status(result: &Result<(), FlagError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => error.status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violations_render_readable_messages() {
        let err = ContractViolation::LevelOutOfRange {
            threshold: Threshold::Print,
            value: 9,
        };
        assert_eq!(err.to_string(), "print level 9 is outside -1..=4");
        assert_eq!(
            ContractViolation::DuplicateFlag {
                name: "log".into()
            }
            .to_string(),
            "duplicate log flag 'log'"
        );
        assert_eq!(
            ContractViolation::MissingFlagName.to_string(),
            "missing log flag name"
        );
    }

    #[test]
    fn flag_errors_map_to_minus_one() {
        let err = FlagError::NotFound {
            name: "grom".into(),
        };
        assert_eq!(err.status(), -1);
        assert_eq!(err.to_string(), "unknown log flag 'grom'");
        assert_eq!(flag_status(&Err(err)), -1);
    }
}
