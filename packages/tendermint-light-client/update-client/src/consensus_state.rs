//! This module defines [`ConsensusState`] and [`CommitmentRoot`].

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use tendermint_light_client_types::{Hash, Hasher, Header, Time};

/// Application state root used by higher layers to verify membership proofs
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitmentRoot(#[serde_as(as = "Hex")] Vec<u8>);

impl CommitmentRoot {
    /// Derives the commitment root from a header's app hash
    #[must_use]
    pub fn from_app_hash(app_hash: &[u8]) -> Self {
        Self(app_hash.to_vec())
    }

    /// Returns the root bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Snapshot of a verified header, one per trusted height
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusState {
    /// Height of the verified header
    #[serde(with = "light_client_utils::serde::number_as_string")]
    pub height: u64,
    /// Time of the verified header
    pub timestamp: Time,
    /// Application state root of the verified header
    pub commitment_root: CommitmentRoot,
    /// Hash of the validator set that signs the next block
    pub next_validators_hash: Hash,
}

impl ConsensusState {
    /// Derives the consensus state of a verified header
    #[must_use]
    pub fn from_header<H: Hasher>(header: &Header) -> Self {
        Self {
            height: header.height(),
            timestamp: header.timestamp(),
            commitment_root: CommitmentRoot::from_app_hash(header.signed_header.header.app_hash.as_bytes()),
            next_validators_hash: header.next_validator_set.hash_with::<H>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tendermint_light_client_types::{
        test_utils::{app_hash_at, base_time, update_header, TestSigner},
        Sha256Hasher,
    };

    use super::*;

    #[test]
    fn derived_from_header() {
        let current = TestSigner::many(&[1, 2, 3], 10);
        let next = TestSigner::many(&[2, 3, 4], 10);
        let header = update_header(12, base_time(), &current, &next, |_| true);

        let cs = ConsensusState::from_header::<Sha256Hasher>(&header);
        assert_eq!(cs.height, 12);
        assert_eq!(cs.timestamp, base_time());
        assert_eq!(cs.commitment_root.as_bytes(), app_hash_at(12).as_slice());
        assert_eq!(
            cs.next_validators_hash,
            header.signed_header.header.next_validators_hash
        );
    }

    #[test]
    fn serializes_root_as_hex() {
        let cs = ConsensusState {
            height: 3,
            timestamp: base_time(),
            commitment_root: CommitmentRoot::from_app_hash(&[0xab, 0xcd]),
            next_validators_hash: Hash::Sha256([0x42; 32]),
        };
        let json = serde_json::to_value(&cs).unwrap();
        assert_eq!(json["commitment_root"], "abcd");
        assert_eq!(json["height"], "3");
        assert_eq!(serde_json::from_value::<ConsensusState>(json).unwrap(), cs);
    }
}
