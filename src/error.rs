//! Error types for the topkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when tracker configuration parameters are
//!   invalid (e.g. zero leaderboard size, zero segment capacity).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//! - [`StoreError`]: Returned when a segment store fails for any reason other
//!   than being full. A full segment is never an error to the caller; the
//!   segmented map grows instead.
//!
//! ## Example Usage
//!
//! ```
//! use topkit::builder::TrackerBuilder;
//! use topkit::error::ConfigError;
//!
//! let bad = TrackerBuilder::new(0).try_build::<u32>();
//! assert!(matches!(bad, Err(ConfigError { .. })));
//!
//! let ok = TrackerBuilder::new(10).try_build::<u32>();
//! assert!(ok.is_ok());
//! ```

use std::collections::TryReserveError;
use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal tracker invariants are violated.
///
/// Produced by `check_invariants` methods (e.g.
/// [`RequestTracker::check_invariants`](crate::tracker::RequestTracker::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when tracker configuration parameters are invalid.
///
/// Produced by [`TrackerBuilder::try_build`](crate::builder::TrackerBuilder::try_build)
/// and [`SegmentedMap::try_new`](crate::store::segmented::SegmentedMap::try_new).
///
/// # Example
///
/// ```
/// use topkit::builder::TrackerBuilder;
///
/// let err = TrackerBuilder::new(100)
///     .segment_capacity(0)
///     .try_build::<u64>()
///     .unwrap_err();
/// assert!(err.to_string().contains("segment_capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Non-capacity failure raised by a segment store.
///
/// The segmented map propagates these unchanged; it only reacts to
/// [`InsertError::Full`](crate::store::traits::InsertError::Full) by growing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing table could not reserve room for one more entry.
    Alloc(TryReserveError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Alloc(err) => write!(f, "segment allocation failed: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Alloc(err) => Some(err),
        }
    }
}

impl From<TryReserveError> for StoreError {
    fn from(err: TryReserveError) -> Self {
        StoreError::Alloc(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("leaderboard out of order");
        assert_eq!(err.to_string(), "leaderboard out of order");
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("flag mismatch");
        assert_eq!(err.message(), "flag mismatch");
    }

    #[test]
    fn invariant_clone_and_eq() {
        let a = InvariantError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("top_n must be > 0");
        assert_eq!(err.to_string(), "top_n must be > 0");
    }

    #[test]
    fn config_debug_includes_message() {
        let err = ConfigError::new("bad capacity");
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("bad capacity"));
    }

    #[test]
    fn config_message_accessor_and_eq() {
        let err = ConfigError::new("segment_capacity must be > 0");
        assert_eq!(err.message(), "segment_capacity must be > 0");
        assert_eq!(err.clone(), ConfigError::new("segment_capacity must be > 0"));
    }

    #[test]
    fn errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
        assert_error::<ConfigError>();
        assert_error::<StoreError>();
    }

    // -- StoreError -------------------------------------------------------

    #[test]
    fn store_error_wraps_reserve_failure() {
        let mut v: Vec<u8> = Vec::new();
        let reserve_err = v.try_reserve(usize::MAX).unwrap_err();
        let err = StoreError::from(reserve_err.clone());
        assert_eq!(err, StoreError::Alloc(reserve_err));
        assert!(err.to_string().starts_with("segment allocation failed"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
