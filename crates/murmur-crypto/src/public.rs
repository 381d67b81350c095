//! Public channel obfuscation.
//!
//! **This is not encryption in any confidentiality sense.** The key is
//! SHA-256 of the room owner's public identifier (its account address), so
//! anyone who knows which room a message belongs to can read it. The scheme
//! exists so that public-room content on the ledger has the same ciphertext
//! shape as private content. It must never be used to restrict readership.

use sha2::{Digest, Sha256};
use tracing::trace;

use crate::cipher::{open, seal};
use crate::codec::EncryptedPayload;
use crate::defaults::KEY_LEN;
use crate::error::CryptoResult;

fn channel_key(owner_identifier: &str) -> [u8; KEY_LEN] {
    Sha256::digest(owner_identifier.as_bytes()).into()
}

/// Obfuscate `plaintext` for the public room owned by `owner_identifier`.
///
/// Each call uses a fresh IV, so identical plaintexts produce different payloads.
pub fn obfuscate(owner_identifier: &str, plaintext: &[u8]) -> CryptoResult<EncryptedPayload> {
    let key = channel_key(owner_identifier);
    trace!(
        subsystem = "crypto",
        op = "obfuscate",
        owner = owner_identifier,
        len = plaintext.len(),
        "Obfuscating public channel content"
    );
    seal(&key, plaintext)
}

/// Reverse [`obfuscate`].
pub fn reveal(owner_identifier: &str, payload: &EncryptedPayload) -> CryptoResult<Vec<u8>> {
    let key = channel_key(owner_identifier);
    open(&key, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;

    const OWNER: &str = "0x7d1f3a9e0b22c4f18e6a5d0c3b9f7e2a1d4c6b8e0f2a4c6e8b0d2f4a6c8e0b2d";

    #[test]
    fn test_roundtrip() {
        let payload = obfuscate(OWNER, b"gm everyone").unwrap();
        assert_eq!(reveal(OWNER, &payload).unwrap(), b"gm everyone");
    }

    #[test]
    fn test_fresh_iv_same_plaintext() {
        let first = obfuscate(OWNER, b"same").unwrap();
        let second = obfuscate(OWNER, b"same").unwrap();

        assert_ne!(first, second);
        assert_eq!(reveal(OWNER, &first).unwrap(), b"same");
        assert_eq!(reveal(OWNER, &second).unwrap(), b"same");
    }

    #[test]
    fn test_anyone_with_identifier_can_reveal() {
        // The key is a pure function of the identifier.
        let payload = obfuscate(OWNER, b"public").unwrap();
        let key: [u8; 32] = Sha256::digest(OWNER.as_bytes()).into();
        assert_eq!(open(&key, &payload).unwrap(), b"public");
    }

    #[test]
    fn test_other_owner_fails() {
        let payload = obfuscate(OWNER, b"room a").unwrap();
        let result = reveal("0xsomeone-else", &payload);
        assert!(matches!(result, Err(CryptoError::Authentication)));
    }

    #[test]
    fn test_empty_owner_identifier() {
        let payload = obfuscate("", b"x").unwrap();
        assert_eq!(reveal("", &payload).unwrap(), b"x");
        assert!(matches!(
            reveal(OWNER, &payload),
            Err(CryptoError::Authentication)
        ));
    }
}
