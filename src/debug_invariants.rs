//! Invariant hooks run after every mutation point of a store
//! (construction, attribute toggling, completion).

use crate::forest_error::ForestError;

/// Structures whose invariants can be checked on demand.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation.
    fn validate_invariants(&self) -> Result<(), ForestError>;

    /// Panic on the first violation when invariant checking is compiled in;
    /// a no-op in plain release builds.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "connectivity");
    }
}

/// Run a fallible check and panic with context on error, but only in debug
/// builds or with `strict-invariants` / `check-invariants` enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
