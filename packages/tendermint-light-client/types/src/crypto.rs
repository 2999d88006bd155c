//! Hashing and the [`SignatureVerifier`] collaborator.

use tendermint::{
    crypto::{signature::Verifier as _, Sha256},
    merkle::MerkleHash,
    PublicKey, Signature,
};

/// Digest used for header, validator set and Merkle hashing
pub trait Hasher: MerkleHash + Sha256 + Default {}

impl<T: MerkleHash + Sha256 + Default> Hasher for T {}

/// The SHA-256 hasher used by tendermint chains
pub type Sha256Hasher = tendermint::crypto::default::Sha256;

/// Signature verification primitive.
///
/// Returns `true` iff `signature` verifies over `message` under `public_key`.
pub trait SignatureVerifier {
    /// Verifies a single signature
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool;
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for &T {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        (**self).verify(public_key, message, signature)
    }
}

/// Production ed25519 verifier backed by the tendermint crypto provider
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        tendermint::crypto::default::signature::Verifier::verify(*public_key, message, signature)
            .is_ok()
    }
}
