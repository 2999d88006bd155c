//! Common test utilities and fixtures for update client tests

#![allow(dead_code)]

use std::{cell::Cell, time::Duration};

use tendermint_light_client_types::{
    test_utils::{base_time, update_header, TestSigner, TEST_CHAIN_ID},
    Ed25519Verifier, PublicKey, Signature, SignatureVerifier, Validator,
};
use tendermint_light_client_update_client::{ClientState, Header, Time, TrustThreshold};

pub const TRUSTING_PERIOD: Duration = Duration::from_secs(14 * 24 * 3600);
pub const UNBONDING_PERIOD: Duration = Duration::from_secs(21 * 24 * 3600);
pub const MAX_CLOCK_DRIFT: Duration = Duration::from_secs(10);

/// Signature verifier that counts how often it is invoked
#[derive(Default)]
pub struct CountingVerifier {
    pub calls: Cell<usize>,
}

impl SignatureVerifier for CountingVerifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        self.calls.set(self.calls.get() + 1);
        Ed25519Verifier.verify(public_key, message, signature)
    }
}

pub fn validators() -> Vec<TestSigner> {
    TestSigner::many(&[0xcd, 0x02, 0x03, 0x10], 25)
}

/// Time `secs` seconds after the genesis header
pub fn at_secs(secs: u64) -> Time {
    base_time()
        .checked_add(Duration::from_secs(secs))
        .unwrap()
}

pub fn genesis_header() -> Header {
    let signers = validators();
    update_header(1, base_time(), &signers, &signers, |_| true)
}

pub fn genesis_client_state() -> ClientState {
    ClientState::new(
        TEST_CHAIN_ID,
        TrustThreshold::ONE_THIRD,
        TRUSTING_PERIOD,
        UNBONDING_PERIOD,
        MAX_CLOCK_DRIFT,
        genesis_header(),
    )
    .expect("valid genesis client state")
}

/// Header signed by the full test validator set
pub fn signed_by_all(height: u64, time: Time) -> Header {
    let signers = validators();
    update_header(height, time, &signers, &signers, |_| true)
}

/// Header signed only by the validators accepted by `signs`
pub fn signed_by(height: u64, time: Time, signs: impl Fn(&Validator) -> bool) -> Header {
    let signers = validators();
    update_header(height, time, &signers, &signers, signs)
}
