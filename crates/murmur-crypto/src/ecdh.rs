//! X25519 key agreement and pairwise key derivation.
//!
//! Two identities derive the same AES key from either side:
//!
//! ```text
//! HKDF-SHA256(ECDH(a_private, b_public), info) == HKDF-SHA256(ECDH(b_private, a_public), info)
//! ```
//!
//! Direct messages and room-key grants both use [`derive_pairwise_key`], so a
//! grant from A to B is wrapped under exactly the key A and B would use to
//! message each other.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::defaults::{KEY_LEN, PAIRWISE_KEY_INFO};
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{PrivateKey, PublicKey};

/// Raw X25519 output (32 bytes).
///
/// Passed through HKDF before use as an encryption key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    /// Get the raw bytes of the shared secret.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// AES-256-GCM key shared by two identities.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PairwiseKey([u8; KEY_LEN]);

impl PairwiseKey {
    /// Get the raw bytes of the key.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for PairwiseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairwiseKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Perform X25519 Diffie-Hellman.
///
/// The result is the same whether computed as ECDH(our_private, their_public)
/// or ECDH(their_private, our_public). Low-order public keys yield an all-zero
/// secret and are rejected.
pub fn ecdh(our_private: &PrivateKey, their_public: &PublicKey) -> CryptoResult<SharedSecret> {
    let shared = our_private
        .to_x25519()
        .diffie_hellman(&their_public.to_x25519());

    if !shared.was_contributory() {
        return Err(CryptoError::KeyMaterial(
            "Public key is a low-order point".to_string(),
        ));
    }

    Ok(SharedSecret(*shared.as_bytes()))
}

/// Derive the pairwise AES key for (our_private, their_public).
pub fn derive_pairwise_key(
    our_private: &PrivateKey,
    their_public: &PublicKey,
) -> CryptoResult<PairwiseKey> {
    let shared = ecdh(our_private, their_public)?;

    let hkdf = Hkdf::<Sha256>::new(None, shared.as_bytes());
    let mut key = [0u8; KEY_LEN];
    hkdf.expand(PAIRWISE_KEY_INFO, &mut key)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    Ok(PairwiseKey(key))
}
