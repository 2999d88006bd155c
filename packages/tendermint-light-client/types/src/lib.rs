//! The crate that contains the value types shared by the tendermint light client verifier and
//! the update client state machine.
//!
//! Headers, commits, validator sets and time are the [`tendermint`] domain types; this crate adds
//! the checks and voting power accounting the light client runs over them.
#![deny(missing_docs, clippy::nursery, clippy::pedantic, warnings)]

pub mod crypto;
pub mod error;
pub mod header;
pub mod signed_header;
pub mod trust_threshold;
pub mod validator;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crypto::{Ed25519Verifier, Hasher, Sha256Hasher, SignatureVerifier};
pub use error::TypesError;
pub use header::{Header, LightBlock};
pub use signed_header::{CommitExt, SignedHeaderExt};
pub use trust_threshold::TrustThreshold;
pub use validator::ValidatorSetExt;

pub use tendermint::{
    account::Id as Address,
    block::{signed_header::SignedHeader, Commit, CommitSig, Header as BlockHeader},
    chain::Id as ChainId,
    validator::{Info as Validator, Set as ValidatorSet},
    Hash, PublicKey, Signature, Time,
};
