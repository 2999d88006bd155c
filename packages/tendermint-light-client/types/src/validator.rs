//! Validator set construction and voting power accounting.
//!
//! Sets are [`tendermint::validator::Set`] values, ordered by voting power descending and then
//! by address, which is the order commit signatures are aligned with.

use std::collections::BTreeSet;

use light_client_utils::ensure;
use tendermint::{
    account::Id as Address,
    validator::{Info as Validator, Set as ValidatorSet},
};

use crate::error::TypesError;

/// Checked construction and voting power sums over a validator set
pub trait ValidatorSetExt: Sized {
    /// Builds a validator set after checking it with [`ValidatorSetExt::validate`]
    /// # Errors
    /// Returns an error if the validators do not form a valid set
    fn try_new(validators: Vec<Validator>) -> Result<Self, TypesError>;

    /// Checks that
    /// - every address is derived from its public key
    /// - no address appears twice
    /// - the total voting power is non-zero and within the protocol maximum
    /// # Errors
    /// Returns the first violated condition
    fn validate(&self) -> Result<(), TypesError>;

    /// Sum of all voting powers
    fn total_power(&self) -> u64;

    /// Sums the voting power of the validators whose address is in `signers`.
    ///
    /// Addresses that are not part of the set are ignored.
    fn voting_power_in(&self, signers: &BTreeSet<Address>) -> u64;
}

impl ValidatorSetExt for ValidatorSet {
    fn try_new(validators: Vec<Validator>) -> Result<Self, TypesError> {
        check_validators(&validators)?;
        Ok(Self::without_proposer(validators))
    }

    fn validate(&self) -> Result<(), TypesError> {
        check_validators(self.validators())
    }

    fn total_power(&self) -> u64 {
        self.total_voting_power().value()
    }

    fn voting_power_in(&self, signers: &BTreeSet<Address>) -> u64 {
        self.validators()
            .iter()
            .filter(|v| signers.contains(&v.address))
            .map(Validator::power)
            .sum()
    }
}

fn check_validators(validators: &[Validator]) -> Result<(), TypesError> {
    let mut seen = BTreeSet::new();
    for validator in validators {
        let expected = Address::from(validator.pub_key);
        ensure!(
            validator.address == expected,
            TypesError::ValidatorAddressMismatch {
                expected,
                found: validator.address,
            }
        );
        ensure!(
            seen.insert(validator.address),
            TypesError::DuplicateValidator(validator.address)
        );
    }

    let max = ValidatorSet::MAX_TOTAL_VOTING_POWER;
    let total = validators
        .iter()
        .try_fold(0u64, |acc, v| acc.checked_add(v.power()))
        .filter(|total| *total <= max)
        .ok_or(TypesError::VotingPowerOverflow { max })?;
    ensure!(total > 0, TypesError::EmptyValidatorSet);
    Ok(())
}
