//! # murmur-crypto
//!
//! End-to-end encryption core for murmur chat.
//!
//! Three trust models share one identity-key infrastructure:
//!
//! - **Direct messages**: pairwise X25519 key agreement between the two parties
//! - **Private groups**: one random room key per room, granted to each member
//!   wrapped under the pairwise key between inviter and member
//! - **Public groups**: content obfuscated under a key anyone can compute from
//!   the room owner's identifier. This provides no confidentiality.
//!
//! Everything here is client-local and pure: functions take explicit key
//! material and return byte buffers for the ledger collaborator to persist.
//! Optional caches ([`cache`]) and the collaborator boundary ([`directory`])
//! are owned and driven by callers.
//!
//! ## Cryptographic Primitives
//!
//! - **Key agreement**: X25519, HKDF-SHA256 to the pairwise AES key
//! - **Symmetric cipher**: AES-256-GCM, fresh 12-byte IV per operation
//! - **Private key wrapping**: PBKDF2-HMAC-SHA256 (100,000 iterations, 16-byte salt)
//! - **Public channel key**: SHA-256 of the owner identifier
//! - **Wire encoding**: Base64-URL without padding, `[iv, ciphertext]` text form
//!
//! ## Examples
//!
//! ### Direct Message
//!
//! ```rust
//! use murmur_crypto::{decrypt_direct, encrypt_direct, Keypair};
//!
//! let alice = Keypair::generate();
//! let bob = Keypair::generate();
//!
//! let payload = encrypt_direct(&alice.private, &bob.public, b"hello").unwrap();
//! let plaintext = decrypt_direct(&bob.private, &alice.public, &payload).unwrap();
//! assert_eq!(plaintext, b"hello");
//! ```
//!
//! ### Private Room
//!
//! ```rust
//! use murmur_crypto::{generate_room_key, grant_room_key, open_room_key, Keypair};
//!
//! let creator = Keypair::generate();
//! let member = Keypair::generate();
//! let room_key = generate_room_key();
//!
//! // The creator stores their own access through the same path as invitees.
//! let own = grant_room_key(&room_key, &creator.private, &creator.public, &creator.public).unwrap();
//! let invite = grant_room_key(&room_key, &creator.private, &creator.public, &member.public).unwrap();
//!
//! assert_eq!(open_room_key(&own, &creator.private).unwrap().as_bytes(), room_key.as_bytes());
//! assert_eq!(open_room_key(&invite, &member.private).unwrap().as_bytes(), room_key.as_bytes());
//! ```
//!
//! ### Room-Type Dispatch
//!
//! ```rust
//! use murmur_crypto::{decrypt_message, encrypt_message, KeyContext, PlainMessage, RoomType};
//!
//! let context = KeyContext::Public { owner_identifier: "0xowner" };
//! let message = PlainMessage { text: "gm".into(), attachments: vec![] };
//!
//! let encrypted = encrypt_message(RoomType::PublicGroup, &context, &message).unwrap();
//! let decrypted = decrypt_message(RoomType::PublicGroup, &context, &encrypted).unwrap();
//! assert_eq!(decrypted, message);
//! ```

pub mod address;
pub mod cache;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod defaults;
pub mod direct;
pub mod directory;
pub mod ecdh;
pub mod error;
pub mod group;
pub mod identity;
pub mod kdf;
pub mod keys;
pub mod message;
pub mod public;

// Re-export commonly used types
pub use address::Address;
pub use cache::{KeyCache, PairwiseKeyCache, RoomKeyCache};
pub use codec::{base64url_decode, base64url_encode, EncryptedPayload};
pub use config::KeyCacheConfig;
pub use direct::{decrypt_direct, encrypt_direct};
pub use directory::{fetch_public_key, open_room_key_from_directory, InMemoryDirectory, KeyDirectory};
pub use ecdh::{derive_pairwise_key, PairwiseKey};
pub use error::{CryptoError, CryptoResult};
pub use group::{
    generate_room_key, grant_room_key, open_member_room_key, open_room_key, RoomKey, RoomKeyGrant,
};
pub use identity::{generate_identity, unwrap_identity, IdentityKeyMaterial};
pub use kdf::{derive_wrapping_key, WrappingKey};
pub use keys::{Keypair, PrivateKey, PublicKey};
pub use message::{
    decrypt_attachment, decrypt_for_room, decrypt_message, decrypt_text, encrypt_for_room,
    encrypt_message, EncryptedMessage, KeyContext, PlainMessage, RoomType,
};
pub use public::{obfuscate, reveal};
