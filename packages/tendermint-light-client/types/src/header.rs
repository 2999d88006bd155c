//! This module defines [`Header`], the update payload, and [`LightBlock`].

use serde::{Deserialize, Serialize};
use tendermint::{block::signed_header::SignedHeader, validator::Set as ValidatorSet, Time};

use crate::{crypto::Hasher, signed_header::SignedHeaderExt};

/// A signed header with the validator set that signed it and the one that signs the next block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header and its commit
    pub signed_header: SignedHeader,
    /// Validator set that produced the commit
    pub validator_set: ValidatorSet,
    /// Validator set committed to by `next_validators_hash`
    pub next_validator_set: ValidatorSet,
}

impl Header {
    /// Block height
    #[must_use]
    pub fn height(&self) -> u64 {
        self.signed_header.height()
    }

    /// Block time
    #[must_use]
    pub fn timestamp(&self) -> Time {
        self.signed_header.time()
    }

    /// Chain id carried by the header
    #[must_use]
    pub fn chain_id(&self) -> &str {
        self.signed_header.chain_id().as_str()
    }

    /// Whether `validator_set` is the set the header commits to
    #[must_use]
    pub fn validator_set_matches<H: Hasher>(&self) -> bool {
        self.validator_set.hash_with::<H>() == self.signed_header.header.validators_hash
    }

    /// Whether `next_validator_set` is the set the header commits to
    #[must_use]
    pub fn next_validator_set_matches<H: Hasher>(&self) -> bool {
        self.next_validator_set.hash_with::<H>() == self.signed_header.header.next_validators_hash
    }
}

/// A signed header and its validator set, as returned by a header provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightBlock {
    /// Header and its commit
    pub signed_header: SignedHeader,
    /// Validator set that produced the commit
    pub validator_set: ValidatorSet,
}

impl LightBlock {
    /// Block height
    #[must_use]
    pub fn height(&self) -> u64 {
        self.signed_header.height()
    }
}

impl From<Header> for LightBlock {
    fn from(header: Header) -> Self {
        Self {
            signed_header: header.signed_header,
            validator_set: header.validator_set,
        }
    }
}
