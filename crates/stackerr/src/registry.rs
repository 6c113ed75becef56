//! Process-wide error code registry.
//!
//! # Lifecycle
//!
//! ```text
//! first use ──► seeded { 0 → UNKNOWN }
//!      │
//!      ▼  startup: register / must_register
//! { 0 → UNKNOWN, 1000 → .., 1001 → .. }
//!      │
//!      ▼  steady state: parse_coder / resolve (read-mostly)
//! process exit
//! ```
//!
//! One lock guards the map and is held for the map access only. Chain
//! walks happen before the lock is taken.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::chain::chain;
use crate::coder::{Coder, UNKNOWN, UNKNOWN_CODE};
use crate::Error;

/// Why a coder was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    #[error("code `0` is reserved for the unknown error coder")]
    Reserved,
    #[error("code {0} is already registered")]
    Duplicate(i32),
}

/// Mapping from integer code to [`Coder`].
pub struct Registry {
    codes: Mutex<HashMap<i32, Arc<dyn Coder>>>,
    unknown: Arc<dyn Coder>,
}

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry holding only the unknown coder.
    pub fn new() -> Self {
        let unknown: Arc<dyn Coder> = Arc::new(UNKNOWN);
        let mut codes = HashMap::new();
        codes.insert(UNKNOWN_CODE, Arc::clone(&unknown));
        Self {
            codes: Mutex::new(codes),
            unknown,
        }
    }

    /// The registry behind the crate-level functions.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    fn insert(&self, coder: Arc<dyn Coder>, overwrite: bool) -> Result<(), RegisterError> {
        let code = coder.code();
        if code == UNKNOWN_CODE {
            return Err(RegisterError::Reserved);
        }

        let replaced = {
            let mut codes = self.codes.lock();
            if !overwrite && codes.contains_key(&code) {
                return Err(RegisterError::Duplicate(code));
            }
            codes.insert(code, coder).is_some()
        };

        tracing::debug!(code, replaced, "registered error coder");
        Ok(())
    }

    /// Register `coder`, replacing any coder already under its code.
    ///
    /// # Panics
    ///
    /// If the code is `0`.
    pub fn register<C: Coder + 'static>(&self, coder: C) {
        if let Err(err) = self.insert(Arc::new(coder), true) {
            panic!("{}", err);
        }
    }

    /// Register `coder`, refusing to replace an existing code.
    ///
    /// # Panics
    ///
    /// If the code is `0` or already registered.
    pub fn must_register<C: Coder + 'static>(&self, coder: C) {
        if let Err(err) = self.insert(Arc::new(coder), false) {
            panic!("{}", err);
        }
    }

    /// Like [`Registry::must_register`], reporting misuse as an error.
    pub fn try_register<C: Coder + 'static>(&self, coder: C) -> Result<(), RegisterError> {
        self.insert(Arc::new(coder), false)
    }

    /// The coder registered under `code`.
    pub fn lookup(&self, code: i32) -> Option<Arc<dyn Coder>> {
        self.codes.lock().get(&code).cloned()
    }

    /// The coder registered under `code`, or the unknown coder.
    pub fn resolve(&self, code: i32) -> Arc<dyn Coder> {
        match self.lookup(code) {
            Some(coder) => coder,
            None => {
                tracing::trace!(code, "unregistered error code");
                Arc::clone(&self.unknown)
            }
        }
    }

    /// Sorted snapshot of every registered code.
    pub fn codes(&self) -> Vec<i32> {
        let mut codes: Vec<i32> = self.codes.lock().keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Resolve the nearest code in `err`'s chain against this registry.
    pub fn parse(&self, err: &(dyn StdError + 'static)) -> Arc<dyn Coder> {
        match nearest_code(err) {
            Some(code) => self.resolve(code),
            None => Arc::clone(&self.unknown),
        }
    }
}

/// The code of the outermost coded [`Error`] in the chain, looking through
/// foreign errors.
fn nearest_code(err: &(dyn StdError + 'static)) -> Option<i32> {
    chain(err)
        .filter_map(|node| node.downcast_ref::<Error>())
        .find_map(Error::code)
}

// ── Global registry ───────────────────────────────────────────────

/// Register a user defined coder, overriding any existing one.
///
/// # Panics
///
/// If the code is `0`.
pub fn register<C: Coder + 'static>(coder: C) {
    Registry::global().register(coder)
}

/// Register a user defined coder.
///
/// # Panics
///
/// If the code is `0` or is already registered.
pub fn must_register<C: Coder + 'static>(coder: C) {
    Registry::global().must_register(coder)
}

/// Register a user defined coder without panicking.
pub fn try_register<C: Coder + 'static>(coder: C) -> Result<(), RegisterError> {
    Registry::global().try_register(coder)
}

/// The coder registered under `code` in the global registry.
pub fn lookup(code: i32) -> Option<Arc<dyn Coder>> {
    Registry::global().lookup(code)
}

/// Sorted snapshot of every globally registered code.
pub fn registered_codes() -> Vec<i32> {
    Registry::global().codes()
}

/// Classify `err` by the nearest code in its chain.
///
/// Errors with no code, or with an unregistered one, resolve to the
/// unknown coder. Never fails.
///
/// ```
/// use stackerr::{parse_coder, Coder, Error};
///
/// let err = Error::new("no code here");
/// assert_eq!(parse_coder(&err).http_status(), 500);
/// ```
pub fn parse_coder(err: &(dyn StdError + 'static)) -> Arc<dyn Coder> {
    Registry::global().parse(err)
}

/// [`parse_coder`] for an optional error. No error in, no coder out.
pub fn parse_coder_opt(err: Option<&(dyn StdError + 'static)>) -> Option<Arc<dyn Coder>> {
    err.map(parse_coder)
}

/// Reports whether any coded node in `err`'s chain carries `code`.
///
/// Only nodes built by this crate can carry a code, so the walk stops at
/// the first foreign error.
pub fn is_code(err: &(dyn StdError + 'static), code: i32) -> bool {
    let mut next = Some(err);
    while let Some(node) = next {
        let Some(e) = node.downcast_ref::<Error>() else {
            return false;
        };
        if e.code() == Some(code) {
            return true;
        }
        next = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coder::DefaultCoder;

    #[derive(Debug, thiserror::Error)]
    #[error("foreign: {source}")]
    struct Foreign {
        source: Error,
    }

    fn coder(code: i32, text: &'static str) -> DefaultCoder {
        DefaultCoder::new_static(code, 0, text, "")
    }

    #[test]
    fn seeded_with_unknown() {
        let reg = Registry::new();
        assert_eq!(reg.codes(), vec![UNKNOWN_CODE]);
        assert_eq!(reg.resolve(UNKNOWN_CODE).http_status(), 500);
    }

    #[test]
    fn register_overwrites() {
        let reg = Registry::new();
        reg.register(coder(5, "first"));
        reg.register(coder(5, "second"));
        assert_eq!(reg.resolve(5).text(), "second");
        assert_eq!(reg.codes(), vec![0, 5]);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn must_register_twice_panics() {
        let reg = Registry::new();
        reg.must_register(coder(5, "first"));
        reg.must_register(coder(5, "second"));
    }

    #[test]
    #[should_panic(expected = "reserved")]
    fn register_zero_panics() {
        Registry::new().register(coder(0, "zero"));
    }

    #[test]
    #[should_panic(expected = "reserved")]
    fn must_register_zero_panics() {
        Registry::new().must_register(coder(0, "zero"));
    }

    #[test]
    fn try_register_reports_misuse() {
        let reg = Registry::new();
        assert_eq!(reg.try_register(coder(0, "zero")), Err(RegisterError::Reserved));
        assert_eq!(reg.try_register(coder(6, "six")), Ok(()));
        assert_eq!(
            reg.try_register(coder(6, "again")),
            Err(RegisterError::Duplicate(6))
        );
        assert_eq!(reg.resolve(6).text(), "six");
    }

    #[test]
    fn resolve_unregistered_is_unknown() {
        let reg = Registry::new();
        assert!(reg.lookup(404).is_none());
        assert_eq!(reg.resolve(404).code(), UNKNOWN_CODE);
    }

    #[test]
    fn parse_nearest_code_wins() {
        let reg = Registry::new();
        reg.register(coder(10, "inner"));
        reg.register(coder(11, "outer"));
        let err = Error::wrap_c(Error::wrap_c(Error::new("base"), 10, "a"), 11, "b");
        assert_eq!(reg.parse(&err).code(), 11);
    }

    #[test]
    fn parse_unregistered_code_is_unknown() {
        let reg = Registry::new();
        let err = Error::wrap_c(Error::new("base"), 999, "m");
        let coder = reg.parse(&err);
        assert_eq!(coder.code(), UNKNOWN_CODE);
        assert_eq!(coder.http_status(), 500);
    }

    #[test]
    fn parse_uncoded_and_foreign_errors_are_unknown() {
        let reg = Registry::new();
        assert_eq!(reg.parse(&Error::new("plain")).code(), UNKNOWN_CODE);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "io");
        assert_eq!(reg.parse(&io).code(), UNKNOWN_CODE);
    }

    #[test]
    fn parse_looks_through_foreign_layers() {
        let reg = Registry::new();
        reg.register(coder(20, "below foreign"));
        let err = Foreign {
            source: Error::with_code(Error::new("base"), 20, "m"),
        };
        assert_eq!(reg.parse(&err).code(), 20);
    }

    #[test]
    fn parse_skips_uncoded_wrappers() {
        let reg = Registry::new();
        reg.register(coder(21, "deep"));
        let err = Error::wrap(Error::with_stack(Error::wrap_c(Error::new("x"), 21, "m")), "top");
        assert_eq!(reg.parse(&err).code(), 21);
    }

    #[test]
    fn parse_coder_opt_propagates_absence() {
        assert!(parse_coder_opt(None).is_none());
        let err = Error::new("x");
        assert!(parse_coder_opt(Some(&err)).is_some());
    }

    #[test]
    fn is_code_finds_every_layer() {
        let err = Error::wrap_c(Error::wrap_c(Error::new("base"), 30, "a"), 31, "b");
        assert!(is_code(&err, 30));
        assert!(is_code(&err, 31));
        assert!(!is_code(&err, 32));
    }

    #[test]
    fn is_code_through_uncoded_wrappers() {
        let err = Error::with_message(Error::with_stack(Error::coded(33, "root")), "top");
        assert!(is_code(&err, 33));
    }

    #[test]
    fn is_code_stops_at_foreign_errors() {
        let err = Error::wrap_c(
            Foreign {
                source: Error::wrap_c(Error::new("base"), 40, "inner"),
            },
            41,
            "outer",
        );
        assert!(is_code(&err, 41));
        assert!(!is_code(&err, 40));

        let io = std::io::Error::new(std::io::ErrorKind::Other, "io");
        assert!(!is_code(&io, 0));
    }

    #[test]
    fn concurrent_register_and_resolve() {
        let reg = Registry::new();
        std::thread::scope(|s| {
            for t in 0..4 {
                let reg = &reg;
                s.spawn(move || {
                    for i in 0..50 {
                        let code = 10_000 + t * 100 + i;
                        reg.register(coder(code, "threaded"));
                        assert_eq!(reg.resolve(code).code(), code);
                        assert_eq!(reg.resolve(UNKNOWN_CODE).http_status(), 500);
                    }
                });
            }
        });
        assert_eq!(reg.codes().len(), 1 + 4 * 50);
    }
}
