//! Wrapping-key derivation using PBKDF2-HMAC-SHA256.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec::fixed_bytes;
use crate::defaults::{KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};
use crate::error::{CryptoError, CryptoResult};

/// Symmetric key used only to wrap and unwrap identity private keys.
///
/// Re-derived for every identity operation and zeroized on drop; it is never
/// cached beyond the call that needed it.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct WrappingKey {
    key: [u8; KEY_LEN],
}

impl WrappingKey {
    /// Get the key bytes.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for WrappingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappingKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 256-bit wrapping key from a wrapping secret and a 16-byte salt.
///
/// Deterministic for a given (secret, salt). Callers must never reuse a salt
/// across identities.
pub fn derive_wrapping_key(secret: &str, salt: &[u8]) -> CryptoResult<WrappingKey> {
    if secret.is_empty() {
        return Err(CryptoError::KeyMaterial(
            "Wrapping secret must not be empty".to_string(),
        ));
    }
    let salt: [u8; SALT_LEN] = fixed_bytes(salt, "Salt")?;

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(secret.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut key);

    Ok(WrappingKey { key })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_deterministic() {
        let salt = [42u8; 16];

        let key1 = derive_wrapping_key("0xsignature", &salt).unwrap();
        let key2 = derive_wrapping_key("0xsignature", &salt).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_salts() {
        let key1 = derive_wrapping_key("0xsignature", &[1u8; 16]).unwrap();
        let key2 = derive_wrapping_key("0xsignature", &[2u8; 16]).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_secrets() {
        let salt = [9u8; 16];
        let key1 = derive_wrapping_key("sigA", &salt).unwrap();
        let key2 = derive_wrapping_key("sigB", &salt).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_salt_wrong_length() {
        let result = derive_wrapping_key("0xsignature", &[0u8; 32]);
        assert!(matches!(result, Err(CryptoError::KeyMaterial(_))));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = derive_wrapping_key("", &[0u8; 16]);
        assert!(matches!(result, Err(CryptoError::KeyMaterial(_))));
    }

    #[test]
    fn test_wrapping_key_debug_redacted() {
        let key = derive_wrapping_key("0xsignature", &[0u8; 16]).unwrap();
        let debug_str = format!("{:?}", key);
        assert!(debug_str.contains("REDACTED"));
    }
}
