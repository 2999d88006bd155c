//! This module defines [`TrustThreshold`].

use std::{fmt, str::FromStr};

use light_client_utils::ensure;
use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// A fraction of voting power, `0 < numerator <= denominator`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTrustThreshold", into = "RawTrustThreshold")]
pub struct TrustThreshold {
    numerator: u64,
    denominator: u64,
}

#[derive(Serialize, Deserialize)]
struct RawTrustThreshold {
    numerator: u64,
    denominator: u64,
}

impl TrustThreshold {
    /// One third, the default trust level for skipping verification
    pub const ONE_THIRD: Self = Self {
        numerator: 1,
        denominator: 3,
    };

    /// Two thirds, the commit quorum
    pub const TWO_THIRDS: Self = Self {
        numerator: 2,
        denominator: 3,
    };

    /// Creates a new trust threshold
    /// # Errors
    /// Returns an error if the numerator is zero or greater than the denominator
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, TypesError> {
        ensure!(
            numerator > 0 && numerator <= denominator,
            TypesError::InvalidTrustThreshold {
                numerator,
                denominator,
            }
        );
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Numerator of the fraction
    #[must_use]
    pub const fn numerator(&self) -> u64 {
        self.numerator
    }

    /// Denominator of the fraction
    #[must_use]
    pub const fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Whether `signed` is at least this fraction of `total`.
    ///
    /// Computed as `signed * denominator >= total * numerator` in 128-bit arithmetic.
    #[must_use]
    pub fn is_met(&self, signed: u64, total: u64) -> bool {
        u128::from(signed) * u128::from(self.denominator)
            >= u128::from(total) * u128::from(self.numerator)
    }
}

impl Default for TrustThreshold {
    fn default() -> Self {
        Self::ONE_THIRD
    }
}

impl fmt::Display for TrustThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for TrustThreshold {
    type Err = TypesError;

    /// Parses a `numerator/denominator` fraction such as `1/3`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TypesError::MalformedTrustThreshold(s.to_string());
        let (numerator, denominator) = s.split_once('/').ok_or_else(malformed)?;
        let numerator = numerator.trim().parse().map_err(|_| malformed())?;
        let denominator = denominator.trim().parse().map_err(|_| malformed())?;
        Self::new(numerator, denominator)
    }
}

impl TryFrom<RawTrustThreshold> for TrustThreshold {
    type Error = TypesError;

    fn try_from(raw: RawTrustThreshold) -> Result<Self, Self::Error> {
        Self::new(raw.numerator, raw.denominator)
    }
}

impl From<TrustThreshold> for RawTrustThreshold {
    fn from(threshold: TrustThreshold) -> Self {
        Self {
            numerator: threshold.numerator,
            denominator: threshold.denominator,
        }
    }
}
