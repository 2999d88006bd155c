//! This module defines [`ClientHandle`], the single-writer owner of a client's state.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tendermint_light_client_types::{
    Ed25519Verifier, Hasher, Header, Sha256Hasher, SignatureVerifier, Time,
};
use tendermint_light_client_verification::{HeaderProvider, NoProvider, ProdVerifier, Verifier};

use crate::{
    client_state::ClientState, consensus_state::ConsensusState, error::UpdateClientError,
    update::apply_update_with,
};

#[derive(Debug)]
struct ClientRecord {
    client_state: ClientState,
    consensus_states: BTreeMap<u64, ConsensusState>,
}

/// A client state together with its height-ordered consensus states.
///
/// Updates are serialized: each one holds the lock from reading the trusted header until the
/// new states are written, and a rejected update leaves the record untouched.
#[derive(Debug)]
pub struct ClientHandle<H = Sha256Hasher, S = Ed25519Verifier, P = NoProvider> {
    verifier: Verifier<H, S, P>,
    record: Mutex<ClientRecord>,
}

impl ClientHandle {
    /// Creates a handle using the production verifier
    #[must_use]
    pub fn new(client_state: ClientState) -> Self {
        Self::with_verifier(ProdVerifier::default(), client_state)
    }
}

impl<H: Hasher, S: SignatureVerifier, P: HeaderProvider> ClientHandle<H, S, P> {
    /// Creates a handle whose initial consensus state is derived from the latest header
    #[must_use]
    pub fn with_verifier(verifier: Verifier<H, S, P>, client_state: ClientState) -> Self {
        let genesis = ConsensusState::from_header::<H>(&client_state.latest_header);
        Self {
            verifier,
            record: Mutex::new(ClientRecord {
                client_state,
                consensus_states: BTreeMap::from([(genesis.height, genesis)]),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClientRecord> {
        // the record is only replaced after a successful update, so it is consistent even if
        // another thread panicked while holding the lock
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Verifies `header` against the current client state and stores the result.
    /// # Errors
    /// Returns the rejection reason, see [`apply_update_with`]
    pub fn update(&self, header: Header, now: Time) -> Result<ConsensusState, UpdateClientError> {
        let mut record = self.lock();
        let (client_state, consensus_state) =
            apply_update_with(&self.verifier, &record.client_state, header, now)?;

        record.client_state = client_state;
        record
            .consensus_states
            .insert(consensus_state.height, consensus_state.clone());
        Ok(consensus_state)
    }

    /// Snapshot of the current client state
    #[must_use]
    pub fn client_state(&self) -> ClientState {
        self.lock().client_state.clone()
    }

    /// Consensus state stored at `height`
    #[must_use]
    pub fn consensus_state(&self, height: u64) -> Option<ConsensusState> {
        self.lock().consensus_states.get(&height).cloned()
    }

    /// Consensus state at the highest stored height
    #[must_use]
    pub fn latest_consensus_state(&self) -> Option<ConsensusState> {
        self.lock()
            .consensus_states
            .last_key_value()
            .map(|(_, cs)| cs.clone())
    }

    /// Heights of all stored consensus states, in increasing order
    #[must_use]
    pub fn consensus_heights(&self) -> Vec<u64> {
        self.lock().consensus_states.keys().copied().collect()
    }

    /// Freezes the client
    pub fn freeze(&self) {
        self.lock().client_state.freeze();
    }
}
