//! Room-type dispatch for message content and attachments.
//!
//! Callers pass the [`RoomType`] and a [`KeyContext`] holding exactly the key
//! material that room type needs. Nothing is retained between calls.
//!
//! Message text and every attachment URL are encrypted as independent
//! payloads, so any one of them can be decrypted without the others.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::EncryptedPayload;
use crate::direct::{decrypt_with_key, encrypt_with_key};
use crate::ecdh::{derive_pairwise_key, PairwiseKey};
use crate::error::{CryptoError, CryptoResult};
use crate::group::{decrypt_with_room_key, encrypt_with_room_key, RoomKey};
use crate::keys::{PrivateKey, PublicKey};
use crate::public::{obfuscate, reveal};

/// Encryption scheme of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    /// Pairwise room between two identities.
    DirectMessage,
    /// Private or group room sharing a granted room key.
    PrivateGroup,
    /// Public room; content is obfuscated, not confidential.
    PublicGroup,
}

impl RoomType {
    /// Parse from a loose string tag (`dm`, `private`, `public`, ...).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "dm" | "direct" | "direct_message" => Some(Self::DirectMessage),
            "private" | "group" | "private_group" => Some(Self::PrivateGroup),
            "public" | "public_group" => Some(Self::PublicGroup),
            _ => None,
        }
    }

    /// Canonical tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectMessage => "direct_message",
            Self::PrivateGroup => "private_group",
            Self::PublicGroup => "public_group",
        }
    }

    /// Whether content in this room type is confidential.
    pub fn is_confidential(&self) -> bool {
        !matches!(self, Self::PublicGroup)
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s)
            .ok_or_else(|| CryptoError::InvalidInput(format!("Unknown room type: {}", s)))
    }
}

/// Key material for one encrypt/decrypt call.
#[derive(Debug, Clone, Copy)]
pub enum KeyContext<'a> {
    /// Direct message: own private key and the counterparty's public key.
    Direct {
        local_private: &'a PrivateKey,
        remote_public: &'a PublicKey,
    },
    /// Direct message with a pairwise key the caller already derived.
    DirectKey { key: &'a PairwiseKey },
    /// Private group: the opened room key.
    Group { room_key: &'a RoomKey },
    /// Public group: the room owner's public identifier.
    Public { owner_identifier: &'a str },
}

impl KeyContext<'_> {
    /// Room type this context serves.
    pub fn room_type(&self) -> RoomType {
        match self {
            KeyContext::Direct { .. } | KeyContext::DirectKey { .. } => RoomType::DirectMessage,
            KeyContext::Group { .. } => RoomType::PrivateGroup,
            KeyContext::Public { .. } => RoomType::PublicGroup,
        }
    }
}

/// Per-call cipher resolved from a [`KeyContext`].
enum FieldCipher<'a> {
    Direct(PairwiseKey),
    DirectKey(&'a PairwiseKey),
    Group(&'a RoomKey),
    Public(&'a str),
}

impl<'a> FieldCipher<'a> {
    fn resolve(room_type: RoomType, context: &KeyContext<'a>) -> CryptoResult<Self> {
        if context.room_type() != room_type {
            return Err(CryptoError::KeyMaterial(format!(
                "{} key context supplied for {} room",
                context.room_type(),
                room_type
            )));
        }

        Ok(match *context {
            KeyContext::Direct {
                local_private,
                remote_public,
            } => FieldCipher::Direct(derive_pairwise_key(local_private, remote_public)?),
            KeyContext::DirectKey { key } => FieldCipher::DirectKey(key),
            KeyContext::Group { room_key } => FieldCipher::Group(room_key),
            KeyContext::Public { owner_identifier } => FieldCipher::Public(owner_identifier),
        })
    }

    fn seal(&self, plaintext: &[u8]) -> CryptoResult<EncryptedPayload> {
        match self {
            FieldCipher::Direct(key) => encrypt_with_key(key, plaintext),
            FieldCipher::DirectKey(key) => encrypt_with_key(key, plaintext),
            FieldCipher::Group(room_key) => encrypt_with_room_key(room_key, plaintext),
            FieldCipher::Public(owner) => obfuscate(owner, plaintext),
        }
    }

    fn open(&self, payload: &EncryptedPayload) -> CryptoResult<Vec<u8>> {
        match self {
            FieldCipher::Direct(key) => decrypt_with_key(key, payload),
            FieldCipher::DirectKey(key) => decrypt_with_key(key, payload),
            FieldCipher::Group(room_key) => decrypt_with_room_key(room_key, payload),
            FieldCipher::Public(owner) => reveal(owner, payload),
        }
    }

    fn open_text(&self, payload: &EncryptedPayload) -> CryptoResult<String> {
        String::from_utf8(self.open(payload)?)
            .map_err(|e| CryptoError::InvalidFormat(format!("Decrypted text is not UTF-8: {}", e)))
    }
}

/// Encrypt bytes for a room.
pub fn encrypt_for_room(
    room_type: RoomType,
    context: &KeyContext<'_>,
    plaintext: &[u8],
) -> CryptoResult<EncryptedPayload> {
    FieldCipher::resolve(room_type, context)?.seal(plaintext)
}

/// Decrypt bytes from a room.
pub fn decrypt_for_room(
    room_type: RoomType,
    context: &KeyContext<'_>,
    payload: &EncryptedPayload,
) -> CryptoResult<Vec<u8>> {
    FieldCipher::resolve(room_type, context)?.open(payload)
}

/// A message before encryption.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainMessage {
    /// Message body.
    pub text: String,
    /// Attachment URLs.
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// A message as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMessage {
    /// Encrypted message body.
    pub content: EncryptedPayload,
    #[serde(default)]
    pub attachments: Vec<EncryptedPayload>,
}

/// Encrypt message text and each attachment URL independently.
pub fn encrypt_message(
    room_type: RoomType,
    context: &KeyContext<'_>,
    message: &PlainMessage,
) -> CryptoResult<EncryptedMessage> {
    let cipher = FieldCipher::resolve(room_type, context)?;

    let content = cipher.seal(message.text.as_bytes())?;
    let attachments = message
        .attachments
        .iter()
        .map(|url| cipher.seal(url.as_bytes()))
        .collect::<CryptoResult<Vec<_>>>()?;

    debug!(
        subsystem = "crypto",
        op = "encrypt_message",
        room_type = %room_type,
        attachments = attachments.len(),
        "Encrypted message"
    );

    Ok(EncryptedMessage {
        content,
        attachments,
    })
}

/// Decrypt message text and all attachment URLs.
pub fn decrypt_message(
    room_type: RoomType,
    context: &KeyContext<'_>,
    message: &EncryptedMessage,
) -> CryptoResult<PlainMessage> {
    let cipher = FieldCipher::resolve(room_type, context)?;

    let text = cipher.open_text(&message.content)?;
    let attachments = message
        .attachments
        .iter()
        .map(|payload| cipher.open_text(payload))
        .collect::<CryptoResult<Vec<_>>>()?;

    Ok(PlainMessage { text, attachments })
}

/// Decrypt only the message text.
pub fn decrypt_text(
    room_type: RoomType,
    context: &KeyContext<'_>,
    message: &EncryptedMessage,
) -> CryptoResult<String> {
    FieldCipher::resolve(room_type, context)?.open_text(&message.content)
}

/// Decrypt a single attachment URL by index.
pub fn decrypt_attachment(
    room_type: RoomType,
    context: &KeyContext<'_>,
    message: &EncryptedMessage,
    index: usize,
) -> CryptoResult<String> {
    let payload = message.attachments.get(index).ok_or_else(|| {
        CryptoError::InvalidInput(format!(
            "Attachment index {} out of range ({} attachments)",
            index,
            message.attachments.len()
        ))
    })?;
    FieldCipher::resolve(room_type, context)?.open_text(payload)
}
