//! The update transition: temporal checks, trust verification and the new states.

use light_client_utils::ensure;
use tendermint_light_client_types::{Hasher, Header, SignatureVerifier, Time};
use tendermint_light_client_verification::{HeaderProvider, ProdVerifier, Verifier};

use crate::{client_state::ClientState, consensus_state::ConsensusState, error::UpdateClientError};

/// Applies `header` to `client_state` with the production verifier.
///
/// Returns the updated client state and the consensus state of the new height.
/// # Errors
/// Returns an error if the update is rejected, see [`apply_update_with`]
pub fn apply_update(
    client_state: &ClientState,
    header: Header,
    now: Time,
) -> Result<(ClientState, ConsensusState), UpdateClientError> {
    apply_update_with(&ProdVerifier::default(), client_state, header, now)
}

/// Applies `header` to `client_state` using `verifier`.
///
/// Cheap temporal checks run first and reject stale or misused updates before any signature
/// is checked.
/// # Errors
/// Returns an error if
/// - the client is frozen
/// - the latest header is older than the trusting period
/// - the candidate is not newer, is from the future, or is a trusting period or more ahead
/// - the trust verifier rejects the candidate
/// - the next validator set does not match the candidate header
pub fn apply_update_with<H, S, P>(
    verifier: &Verifier<H, S, P>,
    client_state: &ClientState,
    header: Header,
    now: Time,
) -> Result<(ClientState, ConsensusState), UpdateClientError>
where
    H: Hasher,
    S: SignatureVerifier,
    P: HeaderProvider,
{
    ensure!(!client_state.frozen, UpdateClientError::ClientFrozen);
    if let Err(err) = check_temporal(client_state, &header, now) {
        tracing::debug!(
            chain_id = %client_state.chain_id,
            latest_height = client_state.latest_height(),
            candidate_height = header.height(),
            error = %err,
            "stale update rejected"
        );
        return Err(err);
    }

    let trusted = &client_state.latest_header;
    verifier.verify(
        &trusted.signed_header,
        &trusted.validator_set,
        &header.signed_header,
        &header.validator_set,
        &client_state.options(),
        now,
    )?;

    let next_validators_hash = header.next_validator_set.hash_with::<H>();
    ensure!(
        next_validators_hash == header.signed_header.header.next_validators_hash,
        UpdateClientError::NextValidatorSetMismatch {
            height: header.height(),
            expected: header.signed_header.header.next_validators_hash,
            found: next_validators_hash,
        }
    );

    let consensus_state = ConsensusState::from_header::<H>(&header);
    let new_client_state = ClientState {
        latest_header: header,
        ..client_state.clone()
    };

    tracing::info!(
        chain_id = %new_client_state.chain_id,
        height = consensus_state.height,
        timestamp = %consensus_state.timestamp,
        "client updated"
    );

    Ok((new_client_state, consensus_state))
}

fn check_temporal(
    client_state: &ClientState,
    header: &Header,
    now: Time,
) -> Result<(), UpdateClientError> {
    let latest = client_state.latest_timestamp();
    let candidate = header.timestamp();
    let trusting_period = client_state.trusting_period;

    if let Ok(elapsed) = now.duration_since(latest) {
        ensure!(
            elapsed < trusting_period,
            UpdateClientError::TrustingPeriodExpired {
                latest,
                now,
                trusting_period,
            }
        );
    }

    if let Ok(ahead) = candidate.duration_since(latest) {
        ensure!(
            ahead < trusting_period,
            UpdateClientError::HeaderOutsideTrustingPeriod {
                latest,
                candidate,
                trusting_period,
            }
        );
    }

    ensure!(
        candidate > latest,
        UpdateClientError::NonMonotonicTimestamp { latest, candidate }
    );
    ensure!(
        header.height() > client_state.latest_height(),
        UpdateClientError::NonMonotonicHeight {
            latest: client_state.latest_height(),
            candidate: header.height(),
        }
    );

    if let Some(limit) = now.checked_add(client_state.max_clock_drift) {
        ensure!(
            candidate < limit,
            UpdateClientError::HeaderFromFuture {
                height: header.height(),
                time: candidate,
                now,
                max_clock_drift: client_state.max_clock_drift,
            }
        );
    }

    Ok(())
}
