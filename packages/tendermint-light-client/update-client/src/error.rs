//! Errors of the update client state machine.

use std::time::Duration;

use tendermint_light_client_types::{Hash, Time, TypesError};
use tendermint_light_client_verification::{ErrorKind, VerificationError};

/// Errors returned by [`apply_update`](crate::apply_update)
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum UpdateClientError {
    /// Client is frozen
    #[error("client is frozen")]
    ClientFrozen,

    /// The latest trusted header is older than the trusting period
    #[error("trusting period expired: latest header at {latest}, now {now}, trusting period {trusting_period:?}")]
    TrustingPeriodExpired {
        /// Time of the latest trusted header
        latest: Time,
        /// Verifier time
        now: Time,
        /// Trusting period
        trusting_period: Duration,
    },

    /// The candidate is a trusting period or more after the latest trusted header
    #[error("header outside trusting period: latest header at {latest}, candidate at {candidate}, trusting period {trusting_period:?}")]
    HeaderOutsideTrustingPeriod {
        /// Time of the latest trusted header
        latest: Time,
        /// Time of the candidate header
        candidate: Time,
        /// Trusting period
        trusting_period: Duration,
    },

    /// The candidate is not newer than the latest trusted header
    #[error("non-monotonic timestamp: latest {latest}, candidate {candidate}")]
    NonMonotonicTimestamp {
        /// Time of the latest trusted header
        latest: Time,
        /// Time of the candidate header
        candidate: Time,
    },

    /// The candidate is not above the latest trusted height
    #[error("non-monotonic height: latest {latest}, candidate {candidate}")]
    NonMonotonicHeight {
        /// Latest trusted height
        latest: u64,
        /// Candidate height
        candidate: u64,
    },

    /// The candidate is beyond `now + max_clock_drift`
    #[error("header at height {height} is from the future: time {time}, now {now}, max clock drift {max_clock_drift:?}")]
    HeaderFromFuture {
        /// Candidate height
        height: u64,
        /// Candidate time
        time: Time,
        /// Verifier time
        now: Time,
        /// Tolerated drift
        max_clock_drift: Duration,
    },

    /// The candidate's next validator set does not hash to its `next_validators_hash`
    #[error("next validator set mismatch at height {height}: header commits to {expected}, set hashes to {found}")]
    NextValidatorSetMismatch {
        /// Candidate height
        height: u64,
        /// `next_validators_hash` of the candidate
        expected: Hash,
        /// Hash of the supplied next validator set
        found: Hash,
    },

    /// The trust verifier rejected the candidate
    #[error("header verification failed: {0}")]
    Verification(#[from] VerificationError),
}

impl UpdateClientError {
    /// Classifies the error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ClientFrozen => ErrorKind::ClientFrozen,
            Self::TrustingPeriodExpired { .. }
            | Self::HeaderOutsideTrustingPeriod { .. }
            | Self::NonMonotonicTimestamp { .. }
            | Self::NonMonotonicHeight { .. }
            | Self::HeaderFromFuture { .. } => ErrorKind::TemporalViolation,
            Self::NextValidatorSetMismatch { .. } => ErrorKind::CryptoVerificationFailure,
            Self::Verification(err) => err.kind(),
        }
    }
}

/// Errors returned when a client state violates its invariants
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum ClientStateError {
    /// Chain id is empty
    #[error("chain id must not be empty")]
    EmptyChainId,

    /// Trusting period is zero
    #[error("trusting period must be positive")]
    ZeroTrustingPeriod,

    /// Trusting period is not shorter than the unbonding period
    #[error("trusting period {trusting_period:?} must be shorter than unbonding period {unbonding_period:?}")]
    TrustingPeriodNotBelowUnbonding {
        /// Trusting period
        trusting_period: Duration,
        /// Unbonding period
        unbonding_period: Duration,
    },

    /// Latest header belongs to another chain
    #[error("latest header chain id {found} does not match client chain id {expected}")]
    ChainIdMismatch {
        /// Client chain id
        expected: String,
        /// Header chain id
        found: String,
    },

    /// Latest header's validator set does not hash to its `validators_hash`
    #[error("latest header validator set does not hash to validators hash {expected}")]
    ValidatorSetHashMismatch {
        /// `validators_hash` of the latest header
        expected: Hash,
    },

    /// Latest header's next validator set does not hash to its `next_validators_hash`
    #[error("latest header next validator set does not hash to next validators hash {expected}")]
    NextValidatorSetHashMismatch {
        /// `next_validators_hash` of the latest header
        expected: Hash,
    },

    /// A validator set of the latest header is malformed
    #[error("invalid validator set in latest header: {0}")]
    InvalidValidatorSet(#[from] TypesError),
}
