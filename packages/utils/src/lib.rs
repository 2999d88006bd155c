//! A collection of utilities for the light client crates.

#![doc = include_str!("../README.md")]
#![deny(clippy::nursery, clippy::pedantic, missing_docs, warnings, unused_crate_dependencies)]

pub mod serde;

/// Ensure that a condition is true, otherwise return an error.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

#[cfg(test)]
mod tests {
    #[derive(Debug, PartialEq, Eq)]
    struct Rejected(u64);

    fn only_even(n: u64) -> Result<u64, Rejected> {
        ensure!(n % 2 == 0, Rejected(n));
        Ok(n / 2)
    }

    #[test]
    fn ensure_passes_through_when_condition_holds() {
        assert_eq!(only_even(10), Ok(5));
    }

    #[test]
    fn ensure_returns_the_error_otherwise() {
        assert_eq!(only_even(7), Err(Rejected(7)));
    }
}
