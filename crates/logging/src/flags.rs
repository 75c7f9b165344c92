//! crates/logging/src/flags.rs
//!
//! Named debug flags.
//!
//! A [`FlagRegistry`] keeps its flags sorted by name, ignoring ASCII case, so
//! enumeration and the usage line are deterministic. Registration is expected
//! to finish during start-up; afterwards the list is only read. Each flag's
//! enabled bit is an independent atomic, and toggling one flag while another
//! thread logs under it is a benign race: the logger may see either value.

use std::cmp::Ordering;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{ContractViolation, FlagError};

/// Pseudo-name addressing every registered flag.
pub const ALL_FLAGS: &str = "all";

/// Compares two flag names the way `strcasecmp` does.
pub fn compare_names(left: &str, right: &str) -> Ordering {
    left.bytes()
        .map(|b| b.to_ascii_lowercase())
        .cmp(right.bytes().map(|b| b.to_ascii_lowercase()))
}

/// A named boolean toggle for one category of debug output.
///
/// Handles are shared: the registry and every call site that registered or
/// looked up the flag hold the same [`Arc`].
pub struct LogFlag {
    name: Box<str>,
    enabled: AtomicBool,
}

impl LogFlag {
    fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            enabled: AtomicBool::new(false),
        }
    }

    /// The name as it was registered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether output gated on this flag is currently emitted.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(AtomicOrdering::Relaxed)
    }

    /// Turns the flag on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, AtomicOrdering::Relaxed);
    }
}

impl fmt::Debug for LogFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFlag")
            .field("name", &self.name)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Case-insensitively sorted set of [`LogFlag`]s.
///
/// ```
/// use logging::FlagRegistry;
///
/// let registry = FlagRegistry::new();
/// registry.register("beta").unwrap();
/// registry.register("Alpha").unwrap();
/// registry.register("gamma").unwrap();
///
/// assert_eq!(registry.names(), ["Alpha", "beta", "gamma"]);
///
/// registry.set("ALPHA").unwrap();
/// assert!(registry.get("alpha"));
/// assert!(!registry.get("beta"));
/// ```
#[derive(Debug, Default)]
pub struct FlagRegistry {
    flags: RwLock<Vec<Arc<LogFlag>>>,
}

impl FlagRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            flags: RwLock::new(Vec::new()),
        }
    }

    /// Adds a disabled flag, keeping the list sorted.
    ///
    /// The new flag goes before the first existing flag whose name compares
    /// greater. Empty names, the reserved name `all` and names already present
    /// (ignoring case) are contract violations.
    pub fn register(&self, name: &str) -> Result<Arc<LogFlag>, ContractViolation> {
        if name.is_empty() {
            return Err(ContractViolation::MissingFlagName);
        }
        if name.eq_ignore_ascii_case(ALL_FLAGS) {
            return Err(ContractViolation::ReservedFlagName {
                name: name.to_owned(),
            });
        }

        let mut flags = self.flags.write().unwrap_or_else(PoisonError::into_inner);
        if flags.iter().any(|flag| flag.name.eq_ignore_ascii_case(name)) {
            return Err(ContractViolation::DuplicateFlag {
                name: name.to_owned(),
            });
        }

        let position = flags
            .iter()
            .position(|flag| compare_names(&flag.name, name) == Ordering::Greater)
            .unwrap_or(flags.len());
        let flag = Arc::new(LogFlag::new(name));
        flags.insert(position, Arc::clone(&flag));
        Ok(flag)
    }

    /// Looks up a flag, ignoring case.
    pub fn find(&self, name: &str) -> Option<Arc<LogFlag>> {
        self.flags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|flag| flag.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Returns `true` only for a registered flag that is enabled.
    pub fn get(&self, name: &str) -> bool {
        self.find(name).is_some_and(|flag| flag.is_enabled())
    }

    /// Enables the named flag, or every flag for `all`.
    pub fn set(&self, name: &str) -> Result<(), FlagError> {
        self.update(name, true)
    }

    /// Disables the named flag, or every flag for `all`.
    pub fn clear(&self, name: &str) -> Result<(), FlagError> {
        self.update(name, false)
    }

    fn update(&self, name: &str, enabled: bool) -> Result<(), FlagError> {
        let flags = self.flags.read().unwrap_or_else(PoisonError::into_inner);

        if name.eq_ignore_ascii_case(ALL_FLAGS) {
            for flag in flags.iter() {
                flag.set_enabled(enabled);
            }
            return Ok(());
        }

        let flag = flags
            .iter()
            .find(|flag| flag.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FlagError::NotFound {
                name: name.to_owned(),
            })?;
        flag.set_enabled(enabled);
        Ok(())
    }

    /// Snapshot of the registered flags in sorted order.
    ///
    /// The snapshot is independent of the registry, so it can be walked any
    /// number of times.
    pub fn flags(&self) -> Vec<Arc<LogFlag>> {
        self.flags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.flags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|flag| flag.name().to_owned())
            .collect()
    }

    /// Number of registered flags.
    pub fn len(&self) -> usize {
        self.flags.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no flag has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the `--logflag` help line for `option_label`.
    ///
    /// Without the `debug-flags` feature the line reports that flags are not
    /// supported instead of listing them.
    pub fn usage<W>(&self, writer: &mut W, option_label: &str) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        write!(
            writer,
            " {option_label}, --logflag <flag>    enable debug log flag "
        )?;

        if cfg!(feature = "debug-flags") {
            write!(writer, "({ALL_FLAGS}")?;
            for flag in self.flags() {
                write!(writer, ", {}", flag.name())?;
            }
            writeln!(writer, ")")
        } else {
            writeln!(
                writer,
                "(not supported - must rebuild with the debug-flags feature)"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(names: &[&str]) -> FlagRegistry {
        let registry = FlagRegistry::new();
        for name in names {
            registry.register(name).unwrap();
        }
        registry
    }

    #[test]
    fn compare_names_ignores_ascii_case() {
        assert_eq!(compare_names("Alpha", "alpha"), Ordering::Equal);
        assert_eq!(compare_names("alpha", "BETA"), Ordering::Less);
        assert_eq!(compare_names("rdma", "RDM"), Ordering::Greater);
    }

    #[test]
    fn registration_keeps_case_insensitive_order() {
        let registry = registry(&["beta", "Alpha", "gamma"]);
        assert_eq!(registry.names(), ["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn registration_appends_largest_name() {
        let registry = registry(&["a", "b", "Zed"]);
        assert_eq!(registry.names(), ["a", "b", "Zed"]);
    }

    #[test]
    fn new_flags_start_disabled() {
        let registry = FlagRegistry::new();
        let flag = registry.register("conn").unwrap();
        assert!(!flag.is_enabled());
        assert!(!registry.get("conn"));
    }

    #[test]
    fn duplicate_names_are_rejected_ignoring_case() {
        let registry = registry(&["conn"]);
        assert_eq!(
            registry.register("CONN").unwrap_err(),
            ContractViolation::DuplicateFlag {
                name: "CONN".into()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_and_reserved_names_are_rejected() {
        let registry = FlagRegistry::new();
        assert_eq!(
            registry.register("").unwrap_err(),
            ContractViolation::MissingFlagName
        );
        assert!(matches!(
            registry.register("All"),
            Err(ContractViolation::ReservedFlagName { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn lookup_of_unknown_flag_is_false() {
        let registry = registry(&["conn"]);
        assert!(!registry.get("nope"));
        assert!(registry.find("nope").is_none());
    }

    #[test]
    fn handle_and_registry_share_state() {
        let registry = FlagRegistry::new();
        let flag = registry.register("mr").unwrap();

        registry.set("MR").unwrap();
        assert!(flag.is_enabled());

        flag.set_enabled(false);
        assert!(!registry.get("mr"));
    }

    #[test]
    fn all_toggles_every_flag() {
        let registry = registry(&["a", "b", "c"]);
        registry.set("b").unwrap();

        registry.set("ALL").unwrap();
        assert!(registry.flags().iter().all(|flag| flag.is_enabled()));

        registry.clear("all").unwrap();
        assert!(registry.flags().iter().all(|flag| !flag.is_enabled()));
    }

    #[test]
    fn all_succeeds_on_empty_registry() {
        assert_eq!(FlagRegistry::new().set("all"), Ok(()));
    }

    #[test]
    fn unknown_name_fails_without_side_effects() {
        let registry = registry(&["a", "b"]);
        registry.set("a").unwrap();

        let err = registry.set("doesnotexist").unwrap_err();
        assert_eq!(err.status(), -1);
        assert!(registry.get("a"));
        assert!(!registry.get("b"));
        assert!(registry.clear("missing").is_err());
    }

    #[test]
    fn clear_is_idempotent() {
        let registry = registry(&["a"]);
        registry.set("a").unwrap();
        assert_eq!(registry.clear("a"), Ok(()));
        assert_eq!(registry.clear("a"), Ok(()));
        assert!(!registry.get("a"));
    }

    #[test]
    fn snapshot_is_restartable() {
        let registry = registry(&["b", "a"]);
        let snapshot = registry.flags();
        let first: Vec<_> = snapshot.iter().map(|flag| flag.name()).collect();
        let second: Vec<_> = snapshot.iter().map(|flag| flag.name()).collect();
        assert_eq!(first, second);
    }

    #[cfg(feature = "debug-flags")]
    #[test]
    fn usage_lists_flags_in_order() {
        let registry = registry(&["rdma", "Conn"]);
        let mut out = Vec::new();
        registry.usage(&mut out, "-L").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            " -L, --logflag <flag>    enable debug log flag (all, Conn, rdma)\n"
        );
    }

    #[cfg(not(feature = "debug-flags"))]
    #[test]
    fn usage_reports_missing_support() {
        let registry = registry(&["rdma"]);
        let mut out = Vec::new();
        registry.usage(&mut out, "-L").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            " -L, --logflag <flag>    enable debug log flag \
             (not supported - must rebuild with the debug-flags feature)\n"
        );
    }
}
