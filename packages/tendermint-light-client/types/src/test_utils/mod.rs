//! Test utilities for the tendermint light client: deterministic signers and signed header builders

#[cfg(any(test, feature = "test-utils"))]
pub use fixtures::*;

#[allow(
    missing_docs,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
#[cfg(any(test, feature = "test-utils"))]
mod fixtures {
    use ed25519_dalek::{Signer, SigningKey};
    use tendermint::{
        account::Id as Address,
        block::{self, parts, signed_header::SignedHeader, Commit, CommitSig},
        chain::Id as ChainId,
        crypto::Sha256,
        validator::{Info as Validator, Set as ValidatorSet},
        vote::Power,
        AppHash, Hash, PublicKey, Signature, Time,
    };

    use crate::{
        crypto::Sha256Hasher,
        header::{Header, LightBlock},
        signed_header::CommitExt,
        validator::ValidatorSetExt,
    };

    pub const TEST_CHAIN_ID: &str = "test-chain-1";

    pub const BASE_TIME_SECS: i64 = 1_700_000_000;

    /// Time of the genesis test header
    pub fn base_time() -> Time {
        Time::from_unix_timestamp(BASE_TIME_SECS, 0).expect("base time fits")
    }

    pub fn chain_id(id: &str) -> ChainId {
        ChainId::try_from(id).expect("valid chain id")
    }

    /// A validator with a deterministic ed25519 key
    pub struct TestSigner {
        signing_key: SigningKey,
        voting_power: u64,
    }

    impl TestSigner {
        pub fn from_seed(seed: u8, voting_power: u64) -> Self {
            Self {
                signing_key: SigningKey::from_bytes(&[seed; 32]),
                voting_power,
            }
        }

        /// One signer per seed, all with the same voting power
        pub fn many(seeds: &[u8], voting_power: u64) -> Vec<Self> {
            seeds
                .iter()
                .map(|seed| Self::from_seed(*seed, voting_power))
                .collect()
        }

        pub fn public_key(&self) -> PublicKey {
            PublicKey::from_raw_ed25519(&self.signing_key.verifying_key().to_bytes())
                .expect("valid ed25519 key")
        }

        pub fn address(&self) -> Address {
            Address::from(self.public_key())
        }

        pub fn validator(&self) -> Validator {
            Validator::new(
                self.public_key(),
                Power::try_from(self.voting_power).expect("voting power fits"),
            )
        }

        pub fn sign(&self, message: &[u8]) -> Signature {
            Signature::from(self.signing_key.sign(message))
        }
    }

    pub fn validator_set(signers: &[TestSigner]) -> ValidatorSet {
        ValidatorSet::try_new(signers.iter().map(TestSigner::validator).collect())
            .expect("valid test validator set")
    }

    /// Deterministic application state root for a height
    pub fn app_hash_at(height: u64) -> Vec<u8> {
        <Sha256Hasher as Sha256>::digest(height.to_be_bytes()).to_vec()
    }

    /// Builds a header at `height` signed by `signers`, committing to `next_signers` as the next
    /// validator set.
    ///
    /// Commit slots follow the order of the signing set. A slot is signed only if `signs`
    /// returns `true` for its validator, otherwise it is absent.
    pub fn signed_header(
        chain: &str,
        height: u64,
        time: Time,
        signers: &[TestSigner],
        next_signers: &[TestSigner],
        signs: impl Fn(&Validator) -> bool,
    ) -> SignedHeader {
        let validators = validator_set(signers);
        let next_validators = validator_set(next_signers);
        let id = chain_id(chain);
        let height = block::Height::try_from(height).expect("height fits");

        let header = block::Header {
            version: block::header::Version { block: 11, app: 0 },
            chain_id: id.clone(),
            height,
            time,
            last_block_id: None,
            last_commit_hash: None,
            data_hash: None,
            validators_hash: validators.hash_with::<Sha256Hasher>(),
            next_validators_hash: next_validators.hash_with::<Sha256Hasher>(),
            consensus_hash: Hash::Sha256([0x11; 32]),
            app_hash: AppHash::try_from(app_hash_at(height.value())).expect("valid app hash"),
            last_results_hash: None,
            evidence_hash: None,
            proposer_address: validators.validators()[0].address,
        };
        let block_id = block::Id {
            hash: header.hash_with::<Sha256Hasher>(),
            part_set_header: parts::Header::new(1, Hash::Sha256([0x22; 32]))
                .expect("valid part set header"),
        };

        // placeholder slots carry the vote data, the signatures are filled in below
        let mut commit = Commit {
            height,
            round: block::Round::default(),
            block_id,
            signatures: validators
                .validators()
                .iter()
                .map(|validator| {
                    if signs(validator) {
                        CommitSig::BlockIdFlagCommit {
                            validator_address: validator.address,
                            timestamp: time,
                            signature: None,
                        }
                    } else {
                        CommitSig::BlockIdFlagAbsent
                    }
                })
                .collect(),
        };

        for index in 0..commit.signatures.len() {
            let Some(sign_bytes) = commit.vote_sign_bytes(&id, index).expect("index in range")
            else {
                continue;
            };
            let CommitSig::BlockIdFlagCommit {
                validator_address,
                signature,
                ..
            } = &mut commit.signatures[index]
            else {
                continue;
            };
            let signer = signers
                .iter()
                .find(|s| s.address() == *validator_address)
                .expect("validator belongs to signers");
            *signature = Some(signer.sign(&sign_bytes));
        }

        SignedHeader::new(header, commit).expect("commit height matches header")
    }

    /// Update payload on [`TEST_CHAIN_ID`]
    pub fn update_header(
        height: u64,
        time: Time,
        signers: &[TestSigner],
        next_signers: &[TestSigner],
        signs: impl Fn(&Validator) -> bool,
    ) -> Header {
        Header {
            signed_header: signed_header(TEST_CHAIN_ID, height, time, signers, next_signers, signs),
            validator_set: validator_set(signers),
            next_validator_set: validator_set(next_signers),
        }
    }

    /// Fully signed light block on [`TEST_CHAIN_ID`]
    pub fn light_block(
        height: u64,
        time: Time,
        signers: &[TestSigner],
        next_signers: &[TestSigner],
    ) -> LightBlock {
        LightBlock {
            signed_header: signed_header(TEST_CHAIN_ID, height, time, signers, next_signers, |_| true),
            validator_set: validator_set(signers),
        }
    }
}
