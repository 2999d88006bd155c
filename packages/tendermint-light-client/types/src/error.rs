//! This module defines [`TypesError`].

use tendermint::{account::Id as Address, Hash};

/// Errors raised while constructing or validating light client value types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum TypesError {
    /// The validator set has no voting power at all
    #[error("validator set is empty or has zero total voting power")]
    EmptyValidatorSet,

    /// Two validators share the same address
    #[error("duplicate validator address {0}")]
    DuplicateValidator(Address),

    /// The validator address is not derived from its public key
    #[error("validator address {found} does not match its public key (expected {expected})")]
    ValidatorAddressMismatch {
        /// Address derived from the public key
        expected: Address,
        /// Address carried by the validator
        found: Address,
    },

    /// Summing the voting powers exceeded the protocol maximum
    #[error("total voting power exceeds the maximum of {max}")]
    VotingPowerOverflow {
        /// Largest total voting power a set may carry
        max: u64,
    },

    /// Invalid trust threshold fraction
    #[error("invalid trust threshold {numerator}/{denominator}: expected 0 < numerator <= denominator")]
    InvalidTrustThreshold {
        /// Numerator
        numerator: u64,
        /// Denominator
        denominator: u64,
    },

    /// Trust threshold string could not be parsed
    #[error("invalid trust threshold fraction `{0}`: expected format 'numerator/denominator'")]
    MalformedTrustThreshold(String),

    /// Header belongs to another chain
    #[error("chain id mismatch: expected {expected} but found {found}")]
    ChainIdMismatch {
        /// Chain id the client tracks
        expected: String,
        /// Chain id carried by the header
        found: String,
    },

    /// Height zero is not a valid block height
    #[error("header height must be at least 1")]
    ZeroHeight,

    /// Commit is for another height than its header
    #[error("commit height {commit} does not match header height {header}")]
    CommitHeightMismatch {
        /// Header height
        header: u64,
        /// Commit height
        commit: u64,
    },

    /// Commit signs a block id that is not the header's hash
    #[error("commit at height {height} signs block {found} but the header hashes to {expected}")]
    CommitBlockIdMismatch {
        /// Header height
        height: u64,
        /// Hash of the header
        expected: Hash,
        /// Block hash referenced by the commit
        found: Hash,
    },

    /// Commit signature index out of range
    #[error("commit signature index {index} out of range ({len} slots)")]
    SignatureIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of slots
        len: usize,
    },
}
