use chunk_tree::signer::canonical_message;
use chunk_tree::{PublicKey, Signature, Signer};
use ed25519_dalek::{Signer as DalekSigner, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

/// The reference `Signer`: wraps an ed25519 keypair and signs the
/// canonical `(seq, salt, v)` encoding, never the raw payload.
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    pub fn generate() -> Self {
        Self { signing_key: SigningKey::generate(&mut OsRng) }
    }

    pub fn from_bytes(secret: &[u8; 32]) -> Self {
        Self { signing_key: SigningKey::from_bytes(secret) }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl Signer for Ed25519Signer {
    fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    fn sign(&self, seq: u64, salt: &[u8], v: &[u8]) -> Signature {
        let salt = if salt.is_empty() { None } else { Some(salt) };
        let message = canonical_message(seq, salt, v);
        Signature(self.signing_key.sign(&message).to_bytes())
    }
}

/// Verifies a detached ed25519 signature produced by [`Ed25519Signer`].
/// Lives alongside the signer rather than inside `MemoryTransport` since
/// verification is a property of the signature scheme, not of any one
/// `Transport` implementation.
pub fn verify(public_key: &PublicKey, seq: u64, salt: &[u8], v: &[u8], signature: &Signature) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let salt = if salt.is_empty() { None } else { Some(salt) };
    let message = canonical_message(seq, salt, v);
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify_strict(&message, &sig).is_ok()
}
