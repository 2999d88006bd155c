//! Runner for the `update` command.

use serde::Serialize;
use tendermint_light_client_update_client::{
    apply_update_with, ClientState, ConsensusState, Header, Time,
};
use tendermint_light_client_verification::{ProdVerifier, VerifierOptions};

use crate::cli::command::UpdateCmd;

/// The states produced by an accepted update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutput {
    /// The client state after the update.
    pub client_state: ClientState,
    /// The consensus state stored for the new height.
    pub consensus_state: ConsensusState,
}

/// Applies the header to the client state and writes both new states.
/// # Errors
/// Returns an error if an input cannot be read, or the update is rejected
pub fn run(args: &UpdateCmd, options: VerifierOptions) -> anyhow::Result<()> {
    let client_state: ClientState = super::read_json(&args.client_state)?;
    let header: Header = super::read_json(&args.header)?;
    let now = super::resolve_now(args.now)?;

    let output = update(&client_state, header, now, options)?;
    super::write_json(&args.output_path, &output)
}

/// Validates `client_state` and applies `header` to it.
/// # Errors
/// Returns an error if the client state is invalid or the update is rejected
pub fn update(
    client_state: &ClientState,
    header: Header,
    now: Time,
    options: VerifierOptions,
) -> anyhow::Result<UpdateOutput> {
    client_state.validate()?;
    let verifier = ProdVerifier::default().with_options(options);
    let (client_state, consensus_state) = apply_update_with(&verifier, client_state, header, now)
        .map_err(|e| anyhow::anyhow!("update rejected ({}): {e}", e.kind()))?;

    Ok(UpdateOutput {
        client_state,
        consensus_state,
    })
}
