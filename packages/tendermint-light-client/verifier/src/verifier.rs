//! The trust verifier: adjacent, skipping and bisection verification.

use std::marker::PhantomData;

use light_client_utils::ensure;
use tendermint_light_client_types::{
    Ed25519Verifier, Hasher, LightBlock, Sha256Hasher, SignatureVerifier, SignedHeader,
    SignedHeaderExt, Time, TrustThreshold, ValidatorSet, ValidatorSetExt,
};

use crate::{
    error::{ErrorKind, VerificationError},
    options::{Options, VerifierOptions},
    provider::{HeaderProvider, NoProvider},
    voting_power::{has_quorum, trust_tally, VotingPowerTally},
};

/// Verifier with the production hasher and signature scheme and no bisection
pub type ProdVerifier = Verifier<Sha256Hasher, Ed25519Verifier, NoProvider>;

/// Outcome of a single verification step
#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    /// The untrusted header is trusted
    Success,
    /// The trusted set's signers fall short of the trust level; bisection may still succeed
    NotEnoughTrust(VotingPowerTally),
}

#[derive(Clone, Copy)]
struct Block<'a> {
    signed_header: &'a SignedHeader,
    validator_set: &'a ValidatorSet,
}

impl<'a> From<&'a LightBlock> for Block<'a> {
    fn from(block: &'a LightBlock) -> Self {
        Self {
            signed_header: &block.signed_header,
            validator_set: &block.validator_set,
        }
    }
}

impl Block<'_> {
    fn height(&self) -> u64 {
        self.signed_header.height()
    }
}

/// Decides whether an untrusted header can be trusted given a trusted one.
///
/// `H` must be the digest the chain uses in consensus and `S` its signature scheme.
/// With a [`HeaderProvider`] configured, headers that cannot be verified directly are reached
/// by bisection.
#[derive(Debug)]
pub struct Verifier<H = Sha256Hasher, S = Ed25519Verifier, P = NoProvider> {
    signature_verifier: S,
    provider: Option<P>,
    options: VerifierOptions,
    _hasher: PhantomData<H>,
}

impl Default for ProdVerifier {
    fn default() -> Self {
        Self::new(Ed25519Verifier)
    }
}

impl<H: Hasher, S: SignatureVerifier> Verifier<H, S, NoProvider> {
    /// Creates a verifier that does not bisect
    #[must_use]
    pub fn new(signature_verifier: S) -> Self {
        Self {
            signature_verifier,
            provider: None,
            options: VerifierOptions::default(),
            _hasher: PhantomData,
        }
    }
}

impl<H: Hasher, S: SignatureVerifier, P: HeaderProvider> Verifier<H, S, P> {
    /// Enables bisection through `provider`
    #[must_use]
    pub fn with_provider<Q: HeaderProvider>(self, provider: Q) -> Verifier<H, S, Q> {
        Verifier {
            signature_verifier: self.signature_verifier,
            provider: Some(provider),
            options: self.options,
            _hasher: PhantomData,
        }
    }

    /// Replaces the verifier options
    #[must_use]
    pub const fn with_options(mut self, options: VerifierOptions) -> Self {
        self.options = options;
        self
    }

    /// The verifier options
    #[must_use]
    pub const fn options(&self) -> &VerifierOptions {
        &self.options
    }

    /// Verifies `untrusted` against the trusted header and validator set.
    ///
    /// The temporal preconditions are checked first and never touch the signature verifier.
    /// # Errors
    /// Returns an error if
    /// - the untrusted header is malformed or for another chain
    /// - the trusted header expired, or the untrusted header is not newer or is from the future
    /// - the commit does not carry the required voting power
    /// - a validator set does not match the hash it is bound to
    /// - bisection cannot find a trust path
    pub fn verify(
        &self,
        trusted: &SignedHeader,
        trusted_validators: &ValidatorSet,
        untrusted: &SignedHeader,
        untrusted_validators: &ValidatorSet,
        options: &Options,
        now: Time,
    ) -> Result<(), VerificationError> {
        let trusted = Block {
            signed_header: trusted,
            validator_set: trusted_validators,
        };
        let untrusted = Block {
            signed_header: untrusted,
            validator_set: untrusted_validators,
        };

        let result = Self::check_preconditions(trusted, untrusted, options, now)
            .and_then(|()| {
                let mut fetches = 0;
                self.verify_to_target(trusted, untrusted, options, &mut fetches)
            });

        match &result {
            Ok(()) => tracing::debug!(
                trusted_height = trusted.height(),
                untrusted_height = untrusted.height(),
                "header verified"
            ),
            Err(err) if err.kind() == ErrorKind::CryptoVerificationFailure => tracing::warn!(
                trusted_height = trusted.height(),
                untrusted_height = untrusted.height(),
                error = %err,
                "header failed cryptographic verification"
            ),
            Err(err) => tracing::debug!(
                trusted_height = trusted.height(),
                untrusted_height = untrusted.height(),
                kind = %err.kind(),
                error = %err,
                "header rejected"
            ),
        }
        result
    }

    fn check_preconditions(
        trusted: Block<'_>,
        untrusted: Block<'_>,
        options: &Options,
        now: Time,
    ) -> Result<(), VerificationError> {
        let trusted_time = trusted.signed_header.time();
        let untrusted_time = untrusted.signed_header.time();

        if let Ok(elapsed) = now.duration_since(trusted_time) {
            ensure!(
                elapsed < options.trusting_period,
                VerificationError::TrustedHeaderExpired {
                    height: trusted.height(),
                    time: trusted_time,
                    now,
                    trusting_period: options.trusting_period,
                }
            );
        }

        if let Some(limit) = now.checked_add(options.clock_drift) {
            ensure!(
                untrusted_time < limit,
                VerificationError::HeaderFromFuture {
                    height: untrusted.height(),
                    time: untrusted_time,
                    now,
                    max_clock_drift: options.clock_drift,
                }
            );
        }

        ensure!(
            untrusted.height() > trusted.height(),
            VerificationError::NonIncreasingHeight {
                trusted: trusted.height(),
                untrusted: untrusted.height(),
            }
        );
        ensure!(
            untrusted_time > trusted_time,
            VerificationError::NonIncreasingTime {
                trusted: trusted_time,
                untrusted: untrusted_time,
            }
        );

        untrusted
            .signed_header
            .validate_basic::<H>(trusted.signed_header.chain_id().as_str())?;
        Ok(())
    }

    /// Verifies `target` from `trusted`, bisecting on [`Verdict::NotEnoughTrust`]
    fn verify_to_target(
        &self,
        trusted: Block<'_>,
        target: Block<'_>,
        options: &Options,
        fetches: &mut usize,
    ) -> Result<(), VerificationError> {
        let tally = match self.verify_step(trusted, target, options)? {
            Verdict::Success => return Ok(()),
            Verdict::NotEnoughTrust(tally) => tally,
        };

        let Some(provider) = &self.provider else {
            return Err(tally.into_error(target.height()));
        };

        // adjacent steps never return NotEnoughTrust, so the gap is at least 2
        let pivot = trusted.height() + (target.height() - trusted.height()) / 2;
        let no_trust_path = |reason: String| VerificationError::NoTrustPath {
            trusted_height: trusted.height(),
            target_height: target.height(),
            reason,
        };

        ensure!(
            *fetches < self.options.max_bisection_fetches,
            no_trust_path(format!(
                "bisection budget of {} fetches exhausted",
                self.options.max_bisection_fetches
            ))
        );
        *fetches += 1;

        tracing::debug!(
            trusted_height = trusted.height(),
            target_height = target.height(),
            pivot,
            signed = tally.tally,
            total = tally.total,
            "not enough trust, bisecting"
        );

        let interim = provider
            .fetch_light_block(pivot)
            .map_err(|e| no_trust_path(e.to_string()))?;
        Self::check_interim(trusted, target, &interim, pivot)?;

        self.verify_to_target(trusted, Block::from(&interim), options, fetches)?;
        self.verify_to_target(Block::from(&interim), target, options, fetches)
    }

    fn check_interim(
        trusted: Block<'_>,
        target: Block<'_>,
        interim: &LightBlock,
        pivot: u64,
    ) -> Result<(), VerificationError> {
        ensure!(
            interim.height() == pivot,
            VerificationError::NoTrustPath {
                trusted_height: trusted.height(),
                target_height: target.height(),
                reason: format!("provider returned height {} for {pivot}", interim.height()),
            }
        );
        interim
            .signed_header
            .validate_basic::<H>(trusted.signed_header.chain_id().as_str())?;

        let time = interim.signed_header.time();
        ensure!(
            time > trusted.signed_header.time(),
            VerificationError::NonIncreasingTime {
                trusted: trusted.signed_header.time(),
                untrusted: time,
            }
        );
        ensure!(
            time < target.signed_header.time(),
            VerificationError::NonIncreasingTime {
                trusted: time,
                untrusted: target.signed_header.time(),
            }
        );
        Ok(())
    }

    /// One direct verification step from `trusted` to `untrusted`
    fn verify_step(
        &self,
        trusted: Block<'_>,
        untrusted: Block<'_>,
        options: &Options,
    ) -> Result<Verdict, VerificationError> {
        let chain_id = trusted.signed_header.chain_id();
        let header = &untrusted.signed_header.header;
        let commit = &untrusted.signed_header.commit;
        let height = untrusted.height();

        let untrusted_hash = untrusted.validator_set.hash_with::<H>();
        ensure!(
            untrusted_hash == header.validators_hash,
            VerificationError::ValidatorSetMismatch {
                height,
                expected: header.validators_hash,
                found: untrusted_hash,
            }
        );
        untrusted.validator_set.validate()?;

        let adjacent = height == trusted.height() + 1;
        let same_set = untrusted_hash == trusted.validator_set.hash_with::<H>();

        if adjacent {
            let expected = trusted.signed_header.header.next_validators_hash;
            ensure!(
                untrusted_hash == expected,
                VerificationError::NextValidatorsHashMismatch {
                    height,
                    expected,
                    found: untrusted_hash,
                }
            );
        }

        if adjacent || same_set {
            tracing::debug!(
                trusted_height = trusted.height(),
                untrusted_height = untrusted.height(),
                adjacent,
                "verifying commit against the bound validator set"
            );

            // the untrusted set is hash-bound to the trusted header, or equal to the trusted set
            let signing_set = untrusted.validator_set;
            let (quorum, signed) =
                has_quorum(commit, chain_id, signing_set, &self.signature_verifier)?;
            let total = signing_set.total_power();
            ensure!(
                quorum,
                VerificationError::InsufficientVotingPower {
                    height,
                    signed,
                    total,
                    threshold: TrustThreshold::TWO_THIRDS,
                }
            );
            ensure!(
                options.trust_threshold.is_met(signed, total),
                VerificationError::InsufficientVotingPower {
                    height,
                    signed,
                    total,
                    threshold: options.trust_threshold,
                }
            );
            return Ok(Verdict::Success);
        }

        tracing::debug!(
            trusted_height = trusted.height(),
            untrusted_height = untrusted.height(),
            "skipping verification against the trusted validator set"
        );

        let tally = trust_tally(
            commit,
            chain_id,
            trusted.validator_set,
            options.trust_threshold,
            &self.signature_verifier,
        )?;
        if !tally.is_met() {
            return Ok(Verdict::NotEnoughTrust(tally));
        }

        let (quorum, signed) = has_quorum(
            commit,
            chain_id,
            untrusted.validator_set,
            &self.signature_verifier,
        )?;
        ensure!(
            quorum,
            VerificationError::InsufficientVotingPower {
                height,
                signed,
                total: untrusted.validator_set.total_power(),
                threshold: TrustThreshold::TWO_THIRDS,
            }
        );
        Ok(Verdict::Success)
    }
}
