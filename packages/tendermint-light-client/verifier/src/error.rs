//! This module defines [`VerificationError`] and the [`ErrorKind`] taxonomy.

use std::{fmt, time::Duration};

use tendermint_light_client_types::{Hash, Time, TrustThreshold, TypesError};

/// Coarse classification of a failed update, used by callers to decide on retry or alerting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Stale or misused update: height, time or trusting-period checks. Never retried.
    TemporalViolation,
    /// Quorum, trust level, signature or hash mismatch. Fatal for the update, possibly an attack.
    CryptoVerificationFailure,
    /// No intermediate header could be obtained during bisection. The update may be retried.
    ProviderFailure,
    /// The client is frozen and accepts no updates.
    ClientFrozen,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TemporalViolation => "temporal violation",
            Self::CryptoVerificationFailure => "crypto verification failure",
            Self::ProviderFailure => "provider failure",
            Self::ClientFrozen => "client frozen",
        };
        f.write_str(name)
    }
}

/// Errors returned by the trust verifier
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum VerificationError {
    /// Header failed structural validation
    #[error("invalid header: {0}")]
    InvalidHeader(#[from] TypesError),

    /// Valid signatures do not carry enough voting power
    #[error("insufficient voting power at height {height}: signed {signed} of {total}, need {threshold}")]
    InsufficientVotingPower {
        /// Height of the header being verified
        height: u64,
        /// Voting power of valid signatures
        signed: u64,
        /// Total voting power of the reference set
        total: u64,
        /// Required fraction
        threshold: TrustThreshold,
    },

    /// Validator set does not hash to the header's `validators_hash`
    #[error("validator set mismatch at height {height}: header commits to {expected}, set hashes to {found}")]
    ValidatorSetMismatch {
        /// Height of the header
        height: u64,
        /// Hash carried by the header
        expected: Hash,
        /// Hash of the supplied validator set
        found: Hash,
    },

    /// Adjacent header is signed by a set the trusted header did not commit to
    #[error("next validators mismatch at height {height}: trusted header commits to {expected}, found {found}")]
    NextValidatorsHashMismatch {
        /// Height of the untrusted header
        height: u64,
        /// `next_validators_hash` of the trusted header
        expected: Hash,
        /// Hash of the untrusted validator set
        found: Hash,
    },

    /// A commit slot votes for the block but carries no signature
    #[error("missing signature at height {height}, slot {index}")]
    MissingSignature {
        /// Height of the commit
        height: u64,
        /// Commit slot
        index: usize,
    },

    /// Commit has a different number of slots than the validator set
    #[error("commit at height {height} has {signatures} signature slots for {validators} validators")]
    CommitSignaturesLengthMismatch {
        /// Height of the commit
        height: u64,
        /// Number of commit slots
        signatures: usize,
        /// Number of validators
        validators: usize,
    },

    /// Untrusted height is not above the trusted height
    #[error("non-increasing height: trusted {trusted}, untrusted {untrusted}")]
    NonIncreasingHeight {
        /// Trusted height
        trusted: u64,
        /// Untrusted height
        untrusted: u64,
    },

    /// Untrusted time is not after the trusted time
    #[error("non-increasing time: trusted {trusted}, untrusted {untrusted}")]
    NonIncreasingTime {
        /// Trusted header time
        trusted: Time,
        /// Untrusted header time
        untrusted: Time,
    },

    /// Header time is beyond `now + max_clock_drift`
    #[error("header at height {height} is from the future: time {time}, now {now}, max clock drift {max_clock_drift:?}")]
    HeaderFromFuture {
        /// Height of the header
        height: u64,
        /// Header time
        time: Time,
        /// Verifier time
        now: Time,
        /// Tolerated drift
        max_clock_drift: Duration,
    },

    /// Trusted header is older than the trusting period
    #[error("trusted header at height {height} expired: time {time}, now {now}, trusting period {trusting_period:?}")]
    TrustedHeaderExpired {
        /// Height of the trusted header
        height: u64,
        /// Trusted header time
        time: Time,
        /// Verifier time
        now: Time,
        /// Trusting period
        trusting_period: Duration,
    },

    /// Bisection could not connect the trusted and target headers
    #[error("no trust path from height {trusted_height} to {target_height}: {reason}")]
    NoTrustPath {
        /// Trusted height of the failed step
        trusted_height: u64,
        /// Target height of the failed step
        target_height: u64,
        /// Reason for error
        reason: String,
    },
}

impl VerificationError {
    /// Classifies the error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NonIncreasingHeight { .. }
            | Self::NonIncreasingTime { .. }
            | Self::HeaderFromFuture { .. }
            | Self::TrustedHeaderExpired { .. } => ErrorKind::TemporalViolation,
            Self::NoTrustPath { .. } => ErrorKind::ProviderFailure,
            Self::InvalidHeader(_)
            | Self::InsufficientVotingPower { .. }
            | Self::ValidatorSetMismatch { .. }
            | Self::NextValidatorsHashMismatch { .. }
            | Self::MissingSignature { .. }
            | Self::CommitSignaturesLengthMismatch { .. } => ErrorKind::CryptoVerificationFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_errors_are_crypto_failures() {
        let err = VerificationError::from(TypesError::ZeroHeight);
        assert_eq!(err.kind(), ErrorKind::CryptoVerificationFailure);
    }

    #[test]
    fn display_names_the_failing_height() {
        let err = VerificationError::NoTrustPath {
            trusted_height: 1,
            target_height: 100,
            reason: "header 50 not found".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ProviderFailure);
        assert_eq!(
            err.to_string(),
            "no trust path from height 1 to 100: header 50 not found"
        );
    }
}
