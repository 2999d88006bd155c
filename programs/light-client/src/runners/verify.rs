//! Runner for the `verify` command.

use std::time::Duration;

use serde::Serialize;
use tendermint_light_client_types::{LightBlock, Time};
use tendermint_light_client_verification::{
    MemoryProvider, Options, ProdVerifier, VerificationError, VerifierOptions,
};

use crate::cli::command::{OutputPath, VerifyCmd};

/// Summary of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyOutput {
    /// Height of the trusted light block.
    pub trusted_height: u64,
    /// Height of the verified light block.
    pub target_height: u64,
}

/// Verifies the target light block against the trusted one, bisecting through `--headers` if
/// given.
/// # Errors
/// Returns an error if an input cannot be read, or verification fails
pub fn run(args: &VerifyCmd, verifier_options: VerifierOptions) -> anyhow::Result<()> {
    let trusted: LightBlock = super::read_json(&args.trusted)?;
    let target: LightBlock = super::read_json(&args.target)?;
    let provider: Option<MemoryProvider> = args
        .headers
        .as_deref()
        .map(super::read_json::<Vec<LightBlock>>)
        .transpose()?
        .map(|blocks| blocks.into_iter().collect());
    let now = super::resolve_now(args.now)?;

    let options = Options {
        trust_threshold: args.trust_options.trust_level,
        trusting_period: Duration::from_secs(args.trust_options.trusting_period_secs),
        clock_drift: Duration::from_secs(args.trust_options.max_clock_drift_secs),
    };

    verify(&trusted, &target, provider, &options, verifier_options, now).map_err(|e| {
        anyhow::anyhow!(
            "verification of height {} rejected ({}): {e}",
            target.height(),
            e.kind()
        )
    })?;

    tracing::info!(
        trusted_height = trusted.height(),
        target_height = target.height(),
        "light block verified"
    );
    super::write_json(
        &OutputPath::Stdout,
        &VerifyOutput {
            trusted_height: trusted.height(),
            target_height: target.height(),
        },
    )
}

/// Verifies `target` against `trusted`, with bisection only when a provider is given.
/// # Errors
/// Returns the verifier's rejection
pub fn verify(
    trusted: &LightBlock,
    target: &LightBlock,
    provider: Option<MemoryProvider>,
    options: &Options,
    verifier_options: VerifierOptions,
    now: Time,
) -> Result<(), VerificationError> {
    let verifier = ProdVerifier::default().with_options(verifier_options);
    match provider {
        Some(provider) => verifier.with_provider(provider).verify(
            &trusted.signed_header,
            &trusted.validator_set,
            &target.signed_header,
            &target.validator_set,
            options,
            now,
        ),
        None => verifier.verify(
            &trusted.signed_header,
            &trusted.validator_set,
            &target.signed_header,
            &target.validator_set,
            options,
            now,
        ),
    }
}
