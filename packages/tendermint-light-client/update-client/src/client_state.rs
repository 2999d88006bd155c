//! This module defines [`ClientState`].

use std::time::Duration;

use light_client_utils::ensure;
use serde::{Deserialize, Serialize};
use tendermint_light_client_types::{Header, Sha256Hasher, Time, TrustThreshold, ValidatorSetExt};
use tendermint_light_client_verification::Options;

use crate::error::ClientStateError;

/// The state of a light client tracking one counterparty chain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    /// Chain id of the tracked chain
    pub chain_id: String,
    /// Fraction of trusted voting power required to skip heights
    pub trust_level: TrustThreshold,
    /// How long a header may serve as a trust anchor
    pub trusting_period: Duration,
    /// Unbonding period of the tracked chain
    pub unbonding_period: Duration,
    /// Tolerated clock skew between the chain and the verifier
    pub max_clock_drift: Duration,
    /// Most recently trusted header
    pub latest_header: Header,
    /// Whether misbehaviour froze the client
    pub frozen: bool,
}

impl ClientState {
    /// Creates an active client state anchored at `latest_header`
    /// # Errors
    /// Returns an error if the client state is invalid, see [`ClientState::validate`]
    pub fn new(
        chain_id: impl Into<String>,
        trust_level: TrustThreshold,
        trusting_period: Duration,
        unbonding_period: Duration,
        max_clock_drift: Duration,
        latest_header: Header,
    ) -> Result<Self, ClientStateError> {
        let client_state = Self {
            chain_id: chain_id.into(),
            trust_level,
            trusting_period,
            unbonding_period,
            max_clock_drift,
            latest_header,
            frozen: false,
        };
        client_state.validate()?;
        Ok(client_state)
    }

    /// Checks the client state invariants
    /// # Errors
    /// Returns an error if
    /// - the chain id is empty
    /// - the trusting period is zero or not shorter than the unbonding period
    /// - the latest header belongs to another chain
    /// - a validator set of the latest header is malformed or does not hash to the value the
    ///   header commits to
    pub fn validate(&self) -> Result<(), ClientStateError> {
        ensure!(!self.chain_id.is_empty(), ClientStateError::EmptyChainId);
        ensure!(
            !self.trusting_period.is_zero(),
            ClientStateError::ZeroTrustingPeriod
        );
        ensure!(
            self.trusting_period < self.unbonding_period,
            ClientStateError::TrustingPeriodNotBelowUnbonding {
                trusting_period: self.trusting_period,
                unbonding_period: self.unbonding_period,
            }
        );
        ensure!(
            self.latest_header.chain_id() == self.chain_id,
            ClientStateError::ChainIdMismatch {
                expected: self.chain_id.clone(),
                found: self.latest_header.chain_id().to_string(),
            }
        );

        let header = &self.latest_header;
        header.validator_set.validate()?;
        header.next_validator_set.validate()?;
        ensure!(
            header.validator_set_matches::<Sha256Hasher>(),
            ClientStateError::ValidatorSetHashMismatch {
                expected: header.signed_header.header.validators_hash,
            }
        );
        ensure!(
            header.next_validator_set_matches::<Sha256Hasher>(),
            ClientStateError::NextValidatorSetHashMismatch {
                expected: header.signed_header.header.next_validators_hash,
            }
        );
        Ok(())
    }

    /// Height of the latest trusted header
    #[must_use]
    pub fn latest_height(&self) -> u64 {
        self.latest_header.height()
    }

    /// Time of the latest trusted header
    #[must_use]
    pub fn latest_timestamp(&self) -> Time {
        self.latest_header.timestamp()
    }

    /// Freezes the client. A frozen client rejects all updates.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Verification options derived from this client state
    #[must_use]
    pub const fn options(&self) -> Options {
        Options {
            trust_threshold: self.trust_level,
            trusting_period: self.trusting_period,
            clock_drift: self.max_clock_drift,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tendermint_light_client_types::{
        test_utils::{base_time, update_header, validator_set, TestSigner},
        TypesError,
    };

    use super::*;

    const DAY: Duration = Duration::from_secs(24 * 3600);

    fn genesis() -> Header {
        let signers = TestSigner::many(&[1, 2, 3], 10);
        update_header(1, base_time(), &signers, &signers, |_| true)
    }

    #[test]
    fn new_client_is_active() {
        let cs = ClientState::new(
            "test-chain-1",
            TrustThreshold::ONE_THIRD,
            14 * DAY,
            21 * DAY,
            Duration::from_secs(10),
            genesis(),
        )
        .unwrap();
        assert!(!cs.frozen);
        assert_eq!(cs.latest_height(), 1);
        assert_eq!(cs.latest_timestamp(), base_time());
        assert_eq!(cs.options().trusting_period, 14 * DAY);
    }

    #[rstest]
    #[case::empty_chain_id("", 14 * DAY, 21 * DAY, ClientStateError::EmptyChainId)]
    #[case::zero_trusting_period("test-chain-1", Duration::ZERO, 21 * DAY, ClientStateError::ZeroTrustingPeriod)]
    #[case::trusting_equals_unbonding(
        "test-chain-1",
        21 * DAY,
        21 * DAY,
        ClientStateError::TrustingPeriodNotBelowUnbonding { trusting_period: 21 * DAY, unbonding_period: 21 * DAY }
    )]
    #[case::other_chain(
        "other-chain",
        14 * DAY,
        21 * DAY,
        ClientStateError::ChainIdMismatch { expected: "other-chain".to_string(), found: "test-chain-1".to_string() }
    )]
    fn rejects_invalid_client_state(
        #[case] chain_id: &str,
        #[case] trusting_period: Duration,
        #[case] unbonding_period: Duration,
        #[case] expected: ClientStateError,
    ) {
        assert_eq!(
            ClientState::new(
                chain_id,
                TrustThreshold::ONE_THIRD,
                trusting_period,
                unbonding_period,
                Duration::from_secs(10),
                genesis(),
            ),
            Err(expected)
        );
    }

    #[test]
    fn rejects_latest_header_with_foreign_validator_set() {
        let signers = TestSigner::many(&[1, 2, 3], 10);
        let mut header = genesis();
        header.validator_set = validator_set(&TestSigner::many(&[4, 5, 6], 10));
        let expected = header.signed_header.header.validators_hash;

        assert_eq!(
            ClientState::new(
                "test-chain-1",
                TrustThreshold::ONE_THIRD,
                14 * DAY,
                21 * DAY,
                Duration::from_secs(10),
                header,
            ),
            Err(ClientStateError::ValidatorSetHashMismatch { expected })
        );

        let mut header = genesis();
        header.next_validator_set = validator_set(&signers[..2]);
        let expected = header.signed_header.header.next_validators_hash;
        assert_eq!(
            ClientState::new(
                "test-chain-1",
                TrustThreshold::ONE_THIRD,
                14 * DAY,
                21 * DAY,
                Duration::from_secs(10),
                header,
            ),
            Err(ClientStateError::NextValidatorSetHashMismatch { expected })
        );
    }

    #[test]
    fn rejects_malformed_validator_set_in_latest_header() {
        let mut header = genesis();
        let first = header.validator_set.validators()[0].clone();
        header.validator_set.validators.push(first.clone());

        assert_eq!(
            ClientState::new(
                "test-chain-1",
                TrustThreshold::ONE_THIRD,
                14 * DAY,
                21 * DAY,
                Duration::from_secs(10),
                header,
            ),
            Err(ClientStateError::InvalidValidatorSet(
                TypesError::DuplicateValidator(first.address)
            ))
        );
    }

    #[test]
    fn freeze_only_flips_the_flag() {
        let mut cs = ClientState::new(
            "test-chain-1",
            TrustThreshold::TWO_THIRDS,
            14 * DAY,
            21 * DAY,
            Duration::from_secs(10),
            genesis(),
        )
        .unwrap();
        let before = cs.clone();
        cs.freeze();
        assert!(cs.frozen);
        cs.frozen = false;
        assert_eq!(cs, before);
    }

    #[test]
    fn json_round_trip() {
        let cs = ClientState::new(
            "test-chain-1",
            TrustThreshold::ONE_THIRD,
            14 * DAY,
            21 * DAY,
            Duration::from_secs(10),
            genesis(),
        )
        .unwrap();
        let json = serde_json::to_string(&cs).unwrap();
        assert_eq!(serde_json::from_str::<ClientState>(&json).unwrap(), cs);
    }
}
