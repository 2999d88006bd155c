//! The crate that contains the update client state machine of the tendermint light client.
//!
//! [`apply_update`] checks a candidate header against the latest trusted header and returns the
//! next [`ClientState`] and the [`ConsensusState`] of the new height. [`ClientHandle`] keeps a
//! client and its consensus states behind a lock for callers that update concurrently.
#![deny(missing_docs, clippy::nursery, clippy::pedantic, warnings)]

pub mod client_state;
pub mod consensus_state;
pub mod error;
pub mod store;
pub mod update;

pub use client_state::ClientState;
pub use consensus_state::{CommitmentRoot, ConsensusState};
pub use error::{ClientStateError, UpdateClientError};
pub use store::ClientHandle;
pub use update::{apply_update, apply_update_with};

pub use tendermint_light_client_types::{Header, Time, TrustThreshold};
pub use tendermint_light_client_verification::ErrorKind;
