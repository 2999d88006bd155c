//! Voting power calculation over commit signatures.

use std::collections::BTreeSet;

use light_client_utils::ensure;
use tendermint_light_client_types::{
    Address, ChainId, Commit, CommitExt, CommitSig, PublicKey, Signature, SignatureVerifier,
    TrustThreshold, ValidatorSet, ValidatorSetExt,
};

use crate::error::VerificationError;

/// Voting power that signed a commit, measured against a reference validator set
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VotingPowerTally {
    /// Total voting power of the reference set
    pub total: u64,
    /// Voting power of the valid signers
    pub tally: u64,
    /// Fraction the tally was checked against
    pub trust_threshold: TrustThreshold,
}

impl VotingPowerTally {
    /// Whether the tally reaches the threshold
    #[must_use]
    pub fn is_met(&self) -> bool {
        self.trust_threshold.is_met(self.tally, self.total)
    }

    pub(crate) const fn into_error(self, height: u64) -> VerificationError {
        VerificationError::InsufficientVotingPower {
            height,
            signed: self.tally,
            total: self.total,
            threshold: self.trust_threshold,
        }
    }
}

/// Checks that valid signatures in `commit` carry at least 2/3 of `validator_set`'s power.
///
/// Commit slots are matched positionally with the validator set, which is ordered by voting
/// power descending and then by address. A slot signed by an address other than the validator
/// at that position, or whose signature does not verify, contributes nothing; the remaining
/// slots may still reach the quorum. Nil votes never count.
///
/// Returns whether the quorum is reached and the voting power of the valid signatures.
/// # Errors
/// Returns an error if
/// - the commit has a different number of slots than the set has validators
/// - a slot votes for the block without a signature
pub fn has_quorum<S: SignatureVerifier>(
    commit: &Commit,
    chain_id: &ChainId,
    validator_set: &ValidatorSet,
    signature_verifier: &S,
) -> Result<(bool, u64), VerificationError> {
    let height = commit.height.value();
    let validators = validator_set.validators();
    ensure!(
        commit.signatures.len() == validators.len(),
        VerificationError::CommitSignaturesLengthMismatch {
            height,
            signatures: commit.signatures.len(),
            validators: validators.len(),
        }
    );

    let mut signed = 0u64;
    for (index, (slot, validator)) in commit.signatures.iter().zip(validators).enumerate() {
        let CommitSig::BlockIdFlagCommit {
            validator_address,
            signature,
            ..
        } = slot
        else {
            continue;
        };

        if *validator_address != validator.address {
            tracing::warn!(
                height,
                index,
                found = %validator_address,
                expected = %validator.address,
                "commit slot signed by a validator at the wrong position"
            );
            continue;
        }

        if !verify_slot(
            commit,
            chain_id,
            index,
            &validator.pub_key,
            signature.as_ref(),
            signature_verifier,
        )? {
            tracing::warn!(height, index, "ignoring invalid commit signature");
            continue;
        }

        // bounded by the set's total voting power, which fits in a u64
        signed += validator.power();
    }

    Ok((
        TrustThreshold::TWO_THIRDS.is_met(signed, validator_set.total_power()),
        signed,
    ))
}

/// Collects the addresses of `trusted` validators with a valid signature in `commit`.
///
/// Slots are matched by address rather than position, since the commit was produced by a
/// possibly different set. Unknown addresses are skipped and an address is counted once even
/// if it appears in several slots.
/// # Errors
/// Returns an error if a trusted validator's slot votes for the block without a signature
pub fn trusted_signers<S: SignatureVerifier>(
    commit: &Commit,
    chain_id: &ChainId,
    trusted: &ValidatorSet,
    signature_verifier: &S,
) -> Result<BTreeSet<Address>, VerificationError> {
    let mut signers = BTreeSet::new();
    for (index, slot) in commit.signatures.iter().enumerate() {
        let CommitSig::BlockIdFlagCommit {
            validator_address,
            signature,
            ..
        } = slot
        else {
            continue;
        };
        let Some(validator) = trusted.validator(*validator_address) else {
            continue;
        };
        if signers.contains(validator_address) {
            tracing::warn!(
                height = commit.height.value(),
                index,
                address = %validator_address,
                "duplicate vote in commit"
            );
            continue;
        }

        if verify_slot(
            commit,
            chain_id,
            index,
            &validator.pub_key,
            signature.as_ref(),
            signature_verifier,
        )? {
            signers.insert(*validator_address);
        }
    }
    Ok(signers)
}

/// Tallies the trusted voting power behind `commit` against `trust_threshold`
/// # Errors
/// Returns an error if a trusted validator's slot votes for the block without a signature
pub fn trust_tally<S: SignatureVerifier>(
    commit: &Commit,
    chain_id: &ChainId,
    trusted: &ValidatorSet,
    trust_threshold: TrustThreshold,
    signature_verifier: &S,
) -> Result<VotingPowerTally, VerificationError> {
    let signers = trusted_signers(commit, chain_id, trusted, signature_verifier)?;
    Ok(VotingPowerTally {
        total: trusted.total_power(),
        tally: trusted.voting_power_in(&signers),
        trust_threshold,
    })
}

fn verify_slot<S: SignatureVerifier>(
    commit: &Commit,
    chain_id: &ChainId,
    index: usize,
    public_key: &PublicKey,
    signature: Option<&Signature>,
    signature_verifier: &S,
) -> Result<bool, VerificationError> {
    let signature = signature.ok_or(VerificationError::MissingSignature {
        height: commit.height.value(),
        index,
    })?;
    let Some(message) = commit.vote_sign_bytes(chain_id, index)? else {
        return Ok(false);
    };
    Ok(signature_verifier.verify(public_key, &message, signature))
}
