//! Identity key generation and password-based wrapping.
//!
//! Each user owns one X25519 identity, created at profile creation and never
//! rotated. The private key is stored on the ledger wrapped under a key
//! derived from the user's wrapping secret (a deterministic wallet signature):
//!
//! ```text
//! wrapping_key      = PBKDF2-HMAC-SHA256(secret, salt, 100_000)
//! wrapped_private   = AES-256-GCM(wrapping_key, wrap_iv, private_key)
//! ```
//!
//! All four fields of [`IdentityKeyMaterial`] are published. Confidentiality
//! rests on the wrapping secret alone.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::address::Address;
use crate::cipher::{aes_gcm_decrypt, aes_gcm_encrypt, generate_iv, generate_salt};
use crate::codec::fixed_bytes;
use crate::defaults::{IV_LEN, PRIVATE_KEY_LEN, SALT_LEN};
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::derive_wrapping_key;
use crate::keys::{Keypair, PrivateKey, PublicKey};

/// Published identity key material, as stored on the ledger.
///
/// Every field is a raw byte vector matching the contract's `vector<u8>`
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityKeyMaterial {
    /// Raw 32-byte X25519 public key.
    pub public_key: Vec<u8>,
    /// AES-GCM wrapped private key (32 bytes + 16-byte tag).
    pub wrapped_private_key: Vec<u8>,
    /// PBKDF2 salt (16 bytes).
    pub salt: Vec<u8>,
    /// AES-GCM IV used for wrapping (12 bytes).
    pub wrap_iv: Vec<u8>,
}

impl IdentityKeyMaterial {
    /// Parse the published public key.
    pub fn public_key(&self) -> CryptoResult<PublicKey> {
        PublicKey::from_slice(&self.public_key)
    }

    /// Address of the published public key.
    pub fn address(&self) -> CryptoResult<Address> {
        Ok(self.public_key()?.to_address())
    }
}

/// Generate a fresh identity and wrap its private key under `secret`.
pub fn generate_identity(secret: &str) -> CryptoResult<IdentityKeyMaterial> {
    let keypair = Keypair::generate();
    let salt = generate_salt();
    let wrap_iv = generate_iv();

    let wrapping_key = derive_wrapping_key(secret, &salt)?;
    let wrapped_private_key =
        aes_gcm_encrypt(wrapping_key.as_bytes(), &wrap_iv, keypair.private.as_bytes())?;

    debug!(
        subsystem = "crypto",
        op = "generate_identity",
        address = %keypair.address(),
        "Generated identity key material"
    );

    Ok(IdentityKeyMaterial {
        public_key: keypair.public.to_vec(),
        wrapped_private_key,
        salt: salt.to_vec(),
        wrap_iv: wrap_iv.to_vec(),
    })
}

/// Unwrap the identity private key with the wrapping secret.
///
/// # Errors
///
/// - [`CryptoError::Authentication`] if the secret is wrong or the wrapped
///   bytes were tampered with. The two cases are indistinguishable.
/// - [`CryptoError::KeyMaterial`] if a field has the wrong length, or the
///   unwrapped key does not correspond to the published public key.
pub fn unwrap_identity(material: &IdentityKeyMaterial, secret: &str) -> CryptoResult<PrivateKey> {
    let public_key = material.public_key()?;
    let salt: [u8; SALT_LEN] = fixed_bytes(&material.salt, "Salt")?;
    let wrap_iv: [u8; IV_LEN] = fixed_bytes(&material.wrap_iv, "Wrap IV")?;

    // Never a valid wrapping secret; reported as a wrong one.
    if secret.is_empty() {
        debug!(
            subsystem = "crypto",
            op = "unwrap_identity",
            address = %public_key.to_address(),
            "Empty wrapping secret"
        );
        return Err(CryptoError::Authentication);
    }

    let wrapping_key = derive_wrapping_key(secret, &salt)?;
    let decrypted = aes_gcm_decrypt(
        wrapping_key.as_bytes(),
        &wrap_iv,
        &material.wrapped_private_key,
    )
    .map(Zeroizing::new)
    .inspect_err(|_| {
        debug!(
            subsystem = "crypto",
            op = "unwrap_identity",
            address = %public_key.to_address(),
            "Identity unwrap failed authentication"
        );
    })?;

    let private = PrivateKey::from_bytes(fixed_bytes::<PRIVATE_KEY_LEN>(
        &decrypted,
        "Unwrapped private key",
    )?);

    if private.public_key() != public_key {
        warn!(
            subsystem = "crypto",
            op = "unwrap_identity",
            address = %public_key.to_address(),
            "Unwrapped private key does not match published public key"
        );
        return Err(CryptoError::KeyMaterial(
            "Unwrapped private key does not match published public key".to_string(),
        ));
    }

    Ok(private)
}
