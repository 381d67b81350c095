//! AES-256-GCM cipher operations.
//!
//! Every symmetric operation in murmur goes through [`seal`] and [`open`]:
//! a fresh random IV per call, the tag appended to the ciphertext, and any
//! tag mismatch reported as [`CryptoError::Authentication`].

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use crate::codec::EncryptedPayload;
use crate::defaults::{IV_LEN, KEY_LEN, SALT_LEN};
use crate::error::{CryptoError, CryptoResult};

/// Generate cryptographically secure random bytes.
pub fn generate_random<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Generate a random salt (16 bytes).
pub fn generate_salt() -> [u8; SALT_LEN] {
    generate_random()
}

/// Generate a random IV (12 bytes).
pub fn generate_iv() -> [u8; IV_LEN] {
    generate_random()
}

/// Encrypt plaintext with AES-256-GCM under an explicit IV.
///
/// Returns ciphertext with appended authentication tag (16 bytes).
pub fn aes_gcm_encrypt(
    key: &[u8; KEY_LEN],
    iv: &[u8; IV_LEN],
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|e| CryptoError::Encryption(e.to_string()))?;

    cipher
        .encrypt(Nonce::from_slice(iv), plaintext)
        .map_err(|_| CryptoError::Encryption("AES-GCM encryption failed".into()))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// The ciphertext must include the authentication tag (16 bytes) at the end.
pub fn aes_gcm_decrypt(
    key: &[u8; KEY_LEN],
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|_| CryptoError::KeyMaterial("Invalid AES key".to_string()))?;

    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| CryptoError::Authentication)
}

/// Encrypt under a fresh random IV and return the wire payload.
pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> CryptoResult<EncryptedPayload> {
    let iv = generate_iv();
    let ciphertext = aes_gcm_encrypt(key, &iv, plaintext)?;
    Ok(EncryptedPayload::from_parts(&iv, &ciphertext))
}

/// Decrypt a wire payload.
pub fn open(key: &[u8; KEY_LEN], payload: &EncryptedPayload) -> CryptoResult<Vec<u8>> {
    let iv = payload.iv_bytes()?;
    let ciphertext = payload.ciphertext_bytes()?;
    aes_gcm_decrypt(key, &iv, &ciphertext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::TAG_LEN;

    #[test]
    fn test_generate_salt() {
        let salt1 = generate_salt();
        let salt2 = generate_salt();

        assert_eq!(salt1.len(), 16);
        assert_ne!(salt1, salt2);
    }

    #[test]
    fn test_generate_iv() {
        let iv1 = generate_iv();
        let iv2 = generate_iv();

        assert_eq!(iv1.len(), 12);
        assert_ne!(iv1, iv2);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = [42u8; 32];
        let iv = [1u8; 12];
        let plaintext = b"Hello, World!";

        let ciphertext = aes_gcm_encrypt(&key, &iv, plaintext).unwrap();
        let decrypted = aes_gcm_decrypt(&key, &iv, &ciphertext).unwrap();

        assert_eq!(plaintext.as_slice(), decrypted.as_slice());
        assert_eq!(ciphertext.len(), plaintext.len() + TAG_LEN);
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let iv = [1u8; 12];
        let ciphertext = aes_gcm_encrypt(&[42u8; 32], &iv, b"Secret data").unwrap();

        let result = aes_gcm_decrypt(&[99u8; 32], &iv, &ciphertext);
        assert!(matches!(result, Err(CryptoError::Authentication)));
    }

    #[test]
    fn test_decrypt_wrong_iv() {
        let key = [42u8; 32];
        let ciphertext = aes_gcm_encrypt(&key, &[1u8; 12], b"Secret data").unwrap();

        let result = aes_gcm_decrypt(&key, &[2u8; 12], &ciphertext);
        assert!(matches!(result, Err(CryptoError::Authentication)));
    }

    #[test]
    fn test_decrypt_truncated_ciphertext() {
        let key = [42u8; 32];
        let iv = [1u8; 12];

        let result = aes_gcm_decrypt(&key, &iv, &[0u8; 4]);
        assert!(matches!(result, Err(CryptoError::Authentication)));
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let key = [7u8; 32];
        let payload = seal(&key, b"sealed message").unwrap();
        assert_eq!(open(&key, &payload).unwrap(), b"sealed message");
    }

    #[test]
    fn test_seal_uses_fresh_iv() {
        let key = [7u8; 32];
        let first = seal(&key, b"same").unwrap();
        let second = seal(&key, b"same").unwrap();

        assert_ne!(first.iv, second.iv);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_open_empty_plaintext() {
        let key = [7u8; 32];
        let payload = seal(&key, b"").unwrap();
        assert!(open(&key, &payload).unwrap().is_empty());
    }

    #[test]
    fn test_open_rejects_tampered_tag() {
        let key = [7u8; 32];
        let payload = seal(&key, b"data").unwrap();

        let mut bytes = payload.ciphertext_bytes().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = EncryptedPayload::from_parts(&payload.iv_bytes().unwrap(), &bytes);

        assert!(matches!(
            open(&key, &tampered),
            Err(CryptoError::Authentication)
        ));
    }
}
