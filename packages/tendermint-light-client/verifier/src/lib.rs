//! The crate that contains the trust verifier of the tendermint light client: quorum and
//! trust-level checks over commits, adjacent and skipping verification, and bisection through
//! a [`HeaderProvider`].
#![deny(missing_docs, clippy::nursery, clippy::pedantic, warnings)]

pub mod error;
pub mod options;
pub mod provider;
pub mod verifier;
pub mod voting_power;

pub use error::{ErrorKind, VerificationError};
pub use options::{Options, VerifierOptions};
pub use provider::{HeaderProvider, MemoryProvider, NoProvider, ProviderError};
pub use verifier::{ProdVerifier, Verifier};
pub use voting_power::{has_quorum, VotingPowerTally};
