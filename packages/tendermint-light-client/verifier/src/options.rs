//! Verification options.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tendermint_light_client_types::TrustThreshold;

/// Default cap on header provider calls made by one bisection
pub const DEFAULT_MAX_BISECTION_FETCHES: usize = 64;

/// Per-verification parameters, derived from the client state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Fraction of trusted voting power required to skip heights
    pub trust_threshold: TrustThreshold,
    /// How long a header may serve as a trust anchor
    pub trusting_period: Duration,
    /// Tolerated clock skew between the chain and the verifier
    pub clock_drift: Duration,
}

/// Configuration of the verifier itself
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierOptions {
    /// Maximum number of intermediate headers fetched while bisecting
    pub max_bisection_fetches: usize,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            max_bisection_fetches: DEFAULT_MAX_BISECTION_FETCHES,
        }
    }
}
