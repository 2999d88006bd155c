//! Basic validation of signed headers and the vote sign bytes of commit slots.

use light_client_utils::ensure;
use tendermint::{
    block::{signed_header::SignedHeader, Commit, CommitSig},
    chain::Id as ChainId,
    vote::{self, ValidatorIndex, Vote},
    Time,
};

use crate::{crypto::Hasher, error::TypesError};

/// Accessors and structural checks on a [`SignedHeader`]
pub trait SignedHeaderExt {
    /// Block height
    fn height(&self) -> u64;

    /// Block time
    fn time(&self) -> Time;

    /// Chain id carried by the header
    fn chain_id(&self) -> &ChainId;

    /// Checks the header belongs to `chain_id` and that the commit is for this exact header.
    /// # Errors
    /// Returns an error if
    /// - the chain id differs
    /// - the height is zero
    /// - the commit height or block hash does not match the header
    fn validate_basic<H: Hasher>(&self, chain_id: &str) -> Result<(), TypesError>;
}

impl SignedHeaderExt for SignedHeader {
    fn height(&self) -> u64 {
        self.header.height.value()
    }

    fn time(&self) -> Time {
        self.header.time
    }

    fn chain_id(&self) -> &ChainId {
        &self.header.chain_id
    }

    fn validate_basic<H: Hasher>(&self, chain_id: &str) -> Result<(), TypesError> {
        ensure!(
            self.header.chain_id.as_str() == chain_id,
            TypesError::ChainIdMismatch {
                expected: chain_id.to_string(),
                found: self.header.chain_id.to_string(),
            }
        );
        let height = self.height();
        ensure!(height > 0, TypesError::ZeroHeight);
        ensure!(
            self.commit.height == self.header.height,
            TypesError::CommitHeightMismatch {
                header: height,
                commit: self.commit.height.value(),
            }
        );

        let header_hash = self.header.hash_with::<H>();
        ensure!(
            self.commit.block_id.hash == header_hash,
            TypesError::CommitBlockIdMismatch {
                height,
                expected: header_hash,
                found: self.commit.block_id.hash,
            }
        );

        Ok(())
    }
}

/// Sign bytes of the precommits carried by a [`Commit`]
pub trait CommitExt {
    /// Returns the canonical vote bytes signed by the validator in slot `index`, or `None` if the
    /// slot holds no vote for the committed block.
    /// # Errors
    /// Returns an error if `index` is out of range
    fn vote_sign_bytes(&self, chain_id: &ChainId, index: usize) -> Result<Option<Vec<u8>>, TypesError>;
}

impl CommitExt for Commit {
    fn vote_sign_bytes(&self, chain_id: &ChainId, index: usize) -> Result<Option<Vec<u8>>, TypesError> {
        let out_of_range = || TypesError::SignatureIndexOutOfRange {
            index,
            len: self.signatures.len(),
        };
        let slot = self.signatures.get(index).ok_or_else(out_of_range)?;

        // nil and absent slots never count towards the commit
        let CommitSig::BlockIdFlagCommit {
            validator_address,
            timestamp,
            signature,
        } = slot
        else {
            return Ok(None);
        };

        let vote = Vote {
            vote_type: vote::Type::Precommit,
            height: self.height,
            round: self.round,
            block_id: Some(self.block_id),
            timestamp: Some(*timestamp),
            validator_address: *validator_address,
            validator_index: ValidatorIndex::try_from(index).map_err(|_| out_of_range())?,
            signature: signature.clone(),
            extension: Vec::new(),
            extension_signature: None,
        };
        Ok(Some(vote.into_signable_vec(chain_id.clone())))
    }
}

#[cfg(test)]
mod tests {
    use prost::Message;
    use tendermint::block;
    use tendermint_proto::v0_38::types::CanonicalVote;

    use crate::{
        crypto::Sha256Hasher,
        test_utils::{base_time, chain_id, signed_header, TestSigner, TEST_CHAIN_ID},
    };

    use super::*;

    fn sample() -> SignedHeader {
        let signers = TestSigner::many(&[1, 2, 3], 10);
        signed_header(TEST_CHAIN_ID, 5, base_time(), &signers, &signers, |_| true)
    }

    #[test]
    fn generated_header_passes_basic_validation() {
        assert_eq!(sample().validate_basic::<Sha256Hasher>(TEST_CHAIN_ID), Ok(()));
    }

    #[test]
    fn first_block_without_last_block_id_hashes_like_tendermint() {
        let signers = TestSigner::many(&[1, 2, 3], 10);
        let sh = signed_header(TEST_CHAIN_ID, 1, base_time(), &signers, &signers, |_| true);
        assert!(sh.header.last_block_id.is_none());
        assert!(sh.header.last_commit_hash.is_none());
        assert_eq!(sh.validate_basic::<Sha256Hasher>(TEST_CHAIN_ID), Ok(()));
        assert_eq!(sh.commit.block_id.hash, sh.header.hash());

        // a missing last block id is encoded as the empty id with an empty part set header
        let mut explicit = sh.header.clone();
        explicit.last_block_id = Some(block::Id::default());
        assert_eq!(
            explicit.hash_with::<Sha256Hasher>(),
            sh.header.hash_with::<Sha256Hasher>()
        );
    }

    #[test]
    fn rejects_other_chain() {
        assert!(matches!(
            sample().validate_basic::<Sha256Hasher>("other-chain"),
            Err(TypesError::ChainIdMismatch { .. })
        ));
    }

    #[test]
    fn rejects_commit_for_other_height() {
        let mut sh = sample();
        sh.commit.height = sh.commit.height.increment();
        assert_eq!(
            sh.validate_basic::<Sha256Hasher>(TEST_CHAIN_ID),
            Err(TypesError::CommitHeightMismatch {
                header: 5,
                commit: 6
            })
        );
    }

    #[test]
    fn rejects_tampered_header_field() {
        let mut sh = sample();
        sh.header.app_hash = b"forged".to_vec().try_into().unwrap();
        assert!(matches!(
            sh.validate_basic::<Sha256Hasher>(TEST_CHAIN_ID),
            Err(TypesError::CommitBlockIdMismatch { height: 5, .. })
        ));
    }

    #[test]
    fn vote_sign_bytes_are_a_canonical_precommit() {
        let sh = sample();
        let bytes = sh
            .commit
            .vote_sign_bytes(&chain_id(TEST_CHAIN_ID), 0)
            .unwrap()
            .unwrap();
        let vote = CanonicalVote::decode_length_delimited(bytes.as_slice()).unwrap();
        assert_eq!(vote.height, 5);
        assert_eq!(vote.round, 0);
        assert_eq!(vote.chain_id, TEST_CHAIN_ID);
        assert_eq!(
            vote.block_id.unwrap().hash,
            sh.commit.block_id.hash.as_bytes().to_vec()
        );
    }

    #[test]
    fn vote_sign_bytes_differ_per_timestamp_and_skip_absent() {
        let mut sh = sample();
        let id = chain_id(TEST_CHAIN_ID);
        let first = sh.commit.vote_sign_bytes(&id, 0).unwrap().unwrap();
        if let CommitSig::BlockIdFlagCommit { timestamp, .. } = &mut sh.commit.signatures[0] {
            *timestamp = timestamp
                .checked_add(std::time::Duration::from_nanos(1))
                .unwrap();
        }
        let second = sh.commit.vote_sign_bytes(&id, 0).unwrap().unwrap();
        assert_ne!(first, second);

        sh.commit.signatures[1] = CommitSig::BlockIdFlagAbsent;
        assert_eq!(sh.commit.vote_sign_bytes(&id, 1), Ok(None));
        assert!(matches!(
            sh.commit.vote_sign_bytes(&id, 3),
            Err(TypesError::SignatureIndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn nil_votes_have_no_sign_bytes() {
        let mut sh = sample();
        let CommitSig::BlockIdFlagCommit {
            validator_address,
            timestamp,
            signature,
        } = sh.commit.signatures[2].clone()
        else {
            panic!("slot 2 is signed");
        };
        sh.commit.signatures[2] = CommitSig::BlockIdFlagNil {
            validator_address,
            timestamp,
            signature,
        };
        assert_eq!(
            sh.commit.vote_sign_bytes(&chain_id(TEST_CHAIN_ID), 2),
            Ok(None)
        );
    }
}
