//! Room key generation and per-member distribution.
//!
//! A private room has one random 32-byte room key, generated once at room
//! creation. Each member receives a [`RoomKeyGrant`]: the room key wrapped
//! under the pairwise key between the granter and that member.
//!
//! # Distribution Flow
//!
//! 1. Creator generates the room key
//! 2. Creator grants the key to their own public key (self-grant)
//! 3. For each invitee, the inviter (any member holding the room key):
//!    a. Derives the pairwise key (inviter private, invitee public)
//!    b. Encrypts the room key under a fresh IV
//!    c. Publishes the grant with the inviter's public key
//!
//! # Opening
//!
//! 1. Derive the pairwise key (own private, granter public from the grant)
//! 2. Decrypt the wrapped room key
//!
//! Grants are written once and never updated. Removing a member does not
//! rotate the room key: a removed member keeps the ability to open every
//! message encrypted under it.

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::cipher::{aes_gcm_decrypt, aes_gcm_encrypt, generate_iv, generate_random, open, seal};
use crate::codec::{fixed_bytes, EncryptedPayload};
use crate::defaults::{IV_LEN, ROOM_KEY_LEN};
use crate::ecdh::derive_pairwise_key;
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{PrivateKey, PublicKey};

/// Room symmetric key material (32 bytes).
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RoomKey([u8; ROOM_KEY_LEN]);

impl RoomKey {
    /// Create a room key from raw bytes.
    pub fn from_bytes(bytes: [u8; ROOM_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the room key.
    pub fn as_bytes(&self) -> &[u8; ROOM_KEY_LEN] {
        &self.0
    }
}

impl Clone for RoomKey {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl std::fmt::Debug for RoomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// A member's wrapped copy of a room key, as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomKeyGrant {
    /// AES-GCM wrapped room key (32 bytes + 16-byte tag).
    pub wrapped_room_key: Vec<u8>,
    /// IV used for wrapping (12 bytes).
    pub grant_iv: Vec<u8>,
    /// Raw public key of the identity that issued the grant.
    pub granter_public_key: Vec<u8>,
}

impl RoomKeyGrant {
    /// Parse the granter's public key.
    pub fn granter_public_key(&self) -> CryptoResult<PublicKey> {
        PublicKey::from_slice(&self.granter_public_key)
    }
}

/// Generate a new random room key. Called exactly once per room.
pub fn generate_room_key() -> RoomKey {
    RoomKey(generate_random())
}

/// Wrap `room_key` for `recipient_public`.
///
/// The creator calls this with their own public key as recipient to store
/// their own access; there is no separate self-access path.
pub fn grant_room_key(
    room_key: &RoomKey,
    granter_private: &PrivateKey,
    granter_public: &PublicKey,
    recipient_public: &PublicKey,
) -> CryptoResult<RoomKeyGrant> {
    // Recipients derive the unwrap key from the published granter key.
    if granter_private.public_key() != *granter_public {
        return Err(CryptoError::KeyMaterial(
            "Granter public key does not belong to granter private key".to_string(),
        ));
    }

    let pairwise = derive_pairwise_key(granter_private, recipient_public)?;
    let grant_iv = generate_iv();
    let wrapped_room_key = aes_gcm_encrypt(pairwise.as_bytes(), &grant_iv, room_key.as_bytes())?;

    debug!(
        subsystem = "crypto",
        op = "grant_room_key",
        granter = %granter_public.to_address(),
        recipient = %recipient_public.to_address(),
        self_grant = granter_public == recipient_public,
        "Issued room key grant"
    );

    Ok(RoomKeyGrant {
        wrapped_room_key,
        grant_iv: grant_iv.to_vec(),
        granter_public_key: granter_public.to_vec(),
    })
}

/// Recover the room key from a grant addressed to `recipient_private`.
///
/// Fails with [`CryptoError::Authentication`] for any identity other than
/// the intended recipient.
pub fn open_room_key(grant: &RoomKeyGrant, recipient_private: &PrivateKey) -> CryptoResult<RoomKey> {
    let granter_public = grant.granter_public_key()?;
    let grant_iv: [u8; IV_LEN] = fixed_bytes(&grant.grant_iv, "Grant IV")?;

    let pairwise = derive_pairwise_key(recipient_private, &granter_public)?;
    let decrypted = Zeroizing::new(aes_gcm_decrypt(
        pairwise.as_bytes(),
        &grant_iv,
        &grant.wrapped_room_key,
    )?);

    Ok(RoomKey(fixed_bytes(&decrypted, "Room key")?))
}

/// Like [`open_room_key`], for a grant the caller may not have.
///
/// A missing grant means the identity was never invited to `room_id`.
pub fn open_member_room_key(
    room_id: &str,
    grant: Option<&RoomKeyGrant>,
    recipient_private: &PrivateKey,
) -> CryptoResult<RoomKey> {
    let grant = grant.ok_or_else(|| CryptoError::NotGranted {
        room_id: room_id.to_string(),
    })?;
    open_room_key(grant, recipient_private)
}

/// Encrypt room content under the room key.
pub fn encrypt_with_room_key(room_key: &RoomKey, plaintext: &[u8]) -> CryptoResult<EncryptedPayload> {
    seal(room_key.as_bytes(), plaintext)
}

/// Decrypt room content with the room key.
pub fn decrypt_with_room_key(room_key: &RoomKey, payload: &EncryptedPayload) -> CryptoResult<Vec<u8>> {
    open(room_key.as_bytes(), payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Keypair;

    #[test]
    fn test_generate_room_key_random() {
        let k1 = generate_room_key();
        let k2 = generate_room_key();
        assert_eq!(k1.as_bytes().len(), 32);
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_grant_roundtrip() {
        let inviter = Keypair::generate();
        let member = Keypair::generate();
        let room_key = generate_room_key();

        let grant = grant_room_key(&room_key, &inviter.private, &inviter.public, &member.public)
            .unwrap();
        let opened = open_room_key(&grant, &member.private).unwrap();

        assert_eq!(opened.as_bytes(), room_key.as_bytes());
        assert_eq!(grant.granter_public_key, inviter.public.to_vec());
        assert_eq!(grant.grant_iv.len(), 12);
    }

    #[test]
    fn test_grant_rejects_foreign_granter_key() {
        let inviter = Keypair::generate();
        let impostor = Keypair::generate();
        let member = Keypair::generate();
        let room_key = generate_room_key();

        let result = grant_room_key(&room_key, &inviter.private, &impostor.public, &member.public);
        assert!(matches!(result, Err(CryptoError::KeyMaterial(_))));
    }

    #[test]
    fn test_self_grant() {
        let creator = Keypair::generate();
        let room_key = generate_room_key();

        let grant =
            grant_room_key(&room_key, &creator.private, &creator.public, &creator.public).unwrap();
        let opened = open_room_key(&grant, &creator.private).unwrap();

        assert_eq!(opened.as_bytes(), room_key.as_bytes());
    }

    #[test]
    fn test_non_recipient_cannot_open() {
        let inviter = Keypair::generate();
        let member = Keypair::generate();
        let outsider = Keypair::generate();
        let room_key = generate_room_key();

        let grant = grant_room_key(&room_key, &inviter.private, &inviter.public, &member.public)
            .unwrap();

        let result = open_room_key(&grant, &outsider.private);
        assert!(matches!(result, Err(CryptoError::Authentication)));

        let self_grant =
            grant_room_key(&room_key, &inviter.private, &inviter.public, &inviter.public).unwrap();
        let result = open_room_key(&self_grant, &outsider.private);
        assert!(matches!(result, Err(CryptoError::Authentication)));
    }

    #[test]
    fn test_missing_grant_is_not_granted() {
        let member = Keypair::generate();
        let result = open_member_room_key("room-7", None, &member.private);

        match result {
            Err(CryptoError::NotGranted { room_id }) => assert_eq!(room_id, "room-7"),
            other => panic!("expected NotGranted, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_grant_iv() {
        let inviter = Keypair::generate();
        let member = Keypair::generate();
        let mut grant = grant_room_key(
            &generate_room_key(),
            &inviter.private,
            &inviter.public,
            &member.public,
        )
        .unwrap();
        grant.grant_iv.push(0);

        let result = open_room_key(&grant, &member.private);
        assert!(matches!(result, Err(CryptoError::KeyMaterial(_))));
    }

    #[test]
    fn test_room_content_roundtrip() {
        let room_key = generate_room_key();
        let payload = encrypt_with_room_key(&room_key, b"hello room").unwrap();
        assert_eq!(
            decrypt_with_room_key(&room_key, &payload).unwrap(),
            b"hello room"
        );

        let other = generate_room_key();
        assert!(matches!(
            decrypt_with_room_key(&other, &payload),
            Err(CryptoError::Authentication)
        ));
    }

    #[test]
    fn test_room_key_debug_redacted() {
        let room_key = generate_room_key();
        assert!(format!("{:?}", room_key).contains("REDACTED"));
    }
}
