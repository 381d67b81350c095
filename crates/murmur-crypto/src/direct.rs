//! Pairwise direct-message encryption.
//!
//! Both parties derive the same AES key from their own private key and the
//! other party's public key (see [`crate::ecdh`]). Each message gets a fresh
//! 12-byte IV.
//!
//! Callers holding a conversation open can derive the [`PairwiseKey`] once
//! (or keep it in a [`crate::cache::PairwiseKeyCache`]) and use
//! [`encrypt_with_key`] / [`decrypt_with_key`].

use tracing::trace;

use crate::cipher::{open, seal};
use crate::codec::EncryptedPayload;
use crate::ecdh::{derive_pairwise_key, PairwiseKey};
use crate::error::CryptoResult;
use crate::keys::{PrivateKey, PublicKey};

/// Encrypt a direct message for `remote_public`.
pub fn encrypt_direct(
    local_private: &PrivateKey,
    remote_public: &PublicKey,
    plaintext: &[u8],
) -> CryptoResult<EncryptedPayload> {
    let key = derive_pairwise_key(local_private, remote_public)?;
    trace!(
        subsystem = "crypto",
        op = "encrypt_direct",
        remote = %remote_public.to_address(),
        len = plaintext.len(),
        "Encrypting direct message"
    );
    encrypt_with_key(&key, plaintext)
}

/// Decrypt a direct message from `remote_public`.
///
/// Fails with [`crate::CryptoError::Authentication`] if the payload was not
/// encrypted between these two identities or was tampered with.
pub fn decrypt_direct(
    local_private: &PrivateKey,
    remote_public: &PublicKey,
    payload: &EncryptedPayload,
) -> CryptoResult<Vec<u8>> {
    let key = derive_pairwise_key(local_private, remote_public)?;
    trace!(
        subsystem = "crypto",
        op = "decrypt_direct",
        remote = %remote_public.to_address(),
        "Decrypting direct message"
    );
    decrypt_with_key(&key, payload)
}

/// Encrypt with an already-derived pairwise key.
pub fn encrypt_with_key(key: &PairwiseKey, plaintext: &[u8]) -> CryptoResult<EncryptedPayload> {
    seal(key.as_bytes(), plaintext)
}

/// Decrypt with an already-derived pairwise key.
pub fn decrypt_with_key(key: &PairwiseKey, payload: &EncryptedPayload) -> CryptoResult<Vec<u8>> {
    open(key.as_bytes(), payload)
}
