//! Error types for irmc.
//!
//! The valuation core is a deterministic batch computation: a failure aborts
//! the enclosing valuation instead of being locally recovered.  The single
//! `thiserror`-derived enum below distinguishes the three failure classes of
//! the library: precondition violations (malformed inputs, fail fast),
//! calculation failures (numerical-domain errors, e.g. a time outside the
//! simulated grid, where the caller must be able to tell "no value" from
//! "value is zero"), and unsupported operations.

use thiserror::Error;

/// The top-level error type used throughout irmc.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Precondition violated (malformed schedule, invalid parameter
    /// vector, ...).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// A valuation or simulation step failed for numerical-domain reasons
    /// (e.g. a maturity before the valuation time, a time outside the
    /// simulated grid).
    #[error("calculation failed: {0}")]
    Calculation(String),

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested operation is not supported by this implementation
    /// (e.g. a parameter-modified clone of a non-recalibratable model).
    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Shorthand `Result` type used throughout irmc.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Check a precondition, returning `Err(Error::Precondition(...))` on failure.
///
/// # Example
/// ```
/// use irmc_core::ensure;
/// fn positive(x: f64) -> irmc_core::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Abort the enclosing computation with a calculation failure.
///
/// # Example
/// ```
/// use irmc_core::fail;
/// fn always_err() -> irmc_core::Result<()> {
///     fail!("time {} is outside the simulated grid", 42.0);
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Calculation(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let e = Error::IndexOutOfRange { index: 7, size: 5 };
        assert_eq!(e.to_string(), "index (7) out of range [0, 5)");

        let e = Error::Calculation("maturity 1 < time 2".into());
        assert!(e.to_string().contains("maturity 1 < time 2"));
    }

    #[test]
    fn ensure_macro_returns_precondition() {
        fn check(x: f64) -> Result<()> {
            ensure!(x >= 0.0, "x must be non-negative, got {x}");
            Ok(())
        }
        assert!(check(1.0).is_ok());
        match check(-1.0) {
            Err(Error::Precondition(msg)) => assert!(msg.contains("-1")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn fail_macro_returns_calculation() {
        fn boom() -> Result<()> {
            fail!("boom");
        }
        assert_eq!(boom(), Err(Error::Calculation("boom".into())));
    }
}
