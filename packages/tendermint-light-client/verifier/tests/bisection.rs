//! Bisection across a full validator set rotation

use std::{
    cell::{Cell, RefCell},
    time::Duration,
};

use tendermint_light_client_types::{
    test_utils::{base_time, light_block, TestSigner},
    LightBlock, Time, TrustThreshold,
};
use tendermint_light_client_verification::{
    ErrorKind, HeaderProvider, MemoryProvider, Options, ProdVerifier, ProviderError,
    VerificationError, VerifierOptions,
};

const ROTATION_HEIGHT: u64 = 50;
const TARGET_HEIGHT: u64 = 100;

struct CountingProvider {
    inner: MemoryProvider,
    calls: Cell<usize>,
    fetched: RefCell<Vec<u64>>,
}

impl CountingProvider {
    fn new(inner: MemoryProvider) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
            fetched: RefCell::new(Vec::new()),
        }
    }
}

impl HeaderProvider for CountingProvider {
    fn fetch_light_block(&self, height: u64) -> Result<LightBlock, ProviderError> {
        self.calls.set(self.calls.get() + 1);
        self.fetched.borrow_mut().push(height);
        self.inner.fetch_light_block(height)
    }
}

fn time_at(height: u64) -> Time {
    base_time()
        .checked_add(Duration::from_secs(60 * height))
        .unwrap()
}

/// Heights 1..=100: set A signs up to the rotation height, set B afterwards
fn rotating_chain() -> Vec<LightBlock> {
    let set_a = TestSigner::many(&[1, 2, 3, 4], 10);
    let set_b = TestSigner::many(&[11, 12, 13, 14], 10);
    let signers_at = |height: u64| {
        if height <= ROTATION_HEIGHT {
            &set_a
        } else {
            &set_b
        }
    };

    (1..=TARGET_HEIGHT)
        .map(|height| {
            light_block(
                height,
                time_at(height),
                signers_at(height),
                signers_at(height + 1),
            )
        })
        .collect()
}

fn options() -> Options {
    Options {
        trust_threshold: TrustThreshold::ONE_THIRD,
        trusting_period: Duration::from_secs(14 * 24 * 3600),
        clock_drift: Duration::from_secs(10),
    }
}

fn now() -> Time {
    time_at(TARGET_HEIGHT + 1)
}

fn ends(chain: &[LightBlock]) -> (&LightBlock, &LightBlock) {
    (&chain[0], &chain[chain.len() - 1])
}

#[test]
fn bisection_crosses_rotation_with_logarithmic_fetches() {
    let chain = rotating_chain();
    let (trusted, target) = ends(&chain);
    let provider = CountingProvider::new(chain.iter().cloned().collect());
    let verifier = ProdVerifier::default().with_provider(&provider);

    let result = verifier.verify(
        &trusted.signed_header,
        &trusted.validator_set,
        &target.signed_header,
        &target.validator_set,
        &options(),
        now(),
    );

    assert_eq!(result, Ok(()));
    assert_eq!(*provider.fetched.borrow(), vec![50, 75, 62, 56, 53, 51]);
    // 2 * ceil(log2(99))
    assert!(provider.calls.get() <= 14);
}

#[test]
fn direct_skip_fails_without_provider() {
    let chain = rotating_chain();
    let (trusted, target) = ends(&chain);

    let err = ProdVerifier::default()
        .verify(
            &trusted.signed_header,
            &trusted.validator_set,
            &target.signed_header,
            &target.validator_set,
            &options(),
            now(),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CryptoVerificationFailure);
    assert!(matches!(
        err,
        VerificationError::InsufficientVotingPower {
            height: TARGET_HEIGHT,
            signed: 0,
            total: 40,
            ..
        }
    ));
}

#[test]
fn missing_intermediate_header_is_a_provider_failure() {
    let chain = rotating_chain();
    let (trusted, target) = ends(&chain);
    let provider: MemoryProvider = chain
        .iter()
        .filter(|block| block.height() != 75)
        .cloned()
        .collect();

    let err = ProdVerifier::default()
        .with_provider(provider)
        .verify(
            &trusted.signed_header,
            &trusted.validator_set,
            &target.signed_header,
            &target.validator_set,
            &options(),
            now(),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProviderFailure);
    assert!(matches!(
        err,
        VerificationError::NoTrustPath {
            trusted_height: 50,
            target_height: 100,
            ..
        }
    ));
}

#[test]
fn fetch_budget_is_enforced() {
    let chain = rotating_chain();
    let (trusted, target) = ends(&chain);
    let provider = CountingProvider::new(chain.iter().cloned().collect());

    let err = ProdVerifier::default()
        .with_provider(&provider)
        .with_options(VerifierOptions {
            max_bisection_fetches: 2,
        })
        .verify(
            &trusted.signed_header,
            &trusted.validator_set,
            &target.signed_header,
            &target.validator_set,
            &options(),
            now(),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProviderFailure);
    assert_eq!(provider.calls.get(), 2);
}

#[test]
fn tampered_intermediate_header_is_rejected() {
    let chain = rotating_chain();
    let (trusted, target) = ends(&chain);
    let mut provider: MemoryProvider = chain.iter().cloned().collect();
    let mut tampered = chain[49].clone();
    tampered.signed_header.header.app_hash = b"forged".to_vec().try_into().unwrap();
    provider.insert(tampered);

    let err = ProdVerifier::default()
        .with_provider(provider)
        .verify(
            &trusted.signed_header,
            &trusted.validator_set,
            &target.signed_header,
            &target.validator_set,
            &options(),
            now(),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CryptoVerificationFailure);
    assert!(matches!(err, VerificationError::InvalidHeader(_)));
}
