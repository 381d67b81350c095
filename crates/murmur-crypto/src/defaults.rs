//! Fixed system-wide constants for murmur encryption.
//!
//! **This module is the single source of truth** for algorithm parameters and
//! wire sizes. None of these are negotiated per call: every identity, room and
//! message in the system uses the same values, so changing one is a format
//! break for everything already on the ledger.

// =============================================================================
// KEY DERIVATION
// =============================================================================

/// PBKDF2-HMAC-SHA256 iteration count for wrapping-key derivation.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt length for wrapping-key derivation.
pub const SALT_LEN: usize = 16;

/// HKDF info string for pairwise (ECDH) AES keys.
///
/// Shared by direct messages and room-key grants.
pub const PAIRWISE_KEY_INFO: &[u8] = b"murmur-e2ee-pairwise-v1";

// =============================================================================
// SYMMETRIC CIPHER
// =============================================================================

/// AES-256 key length.
pub const KEY_LEN: usize = 32;

/// AES-GCM IV length. Every AES-GCM operation uses a fresh random IV of this size.
pub const IV_LEN: usize = 12;

/// AES-GCM authentication tag length appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Room key material length.
pub const ROOM_KEY_LEN: usize = 32;

// =============================================================================
// IDENTITY KEYS
// =============================================================================

/// X25519 public key length.
pub const PUBLIC_KEY_LEN: usize = 32;

/// X25519 private key length (canonical serialization).
pub const PRIVATE_KEY_LEN: usize = 32;

// =============================================================================
// CACHES
// =============================================================================

/// Default capacity for caller-owned key caches.
pub const KEY_CACHE_CAPACITY: usize = 256;

/// Environment variable overriding [`KEY_CACHE_CAPACITY`].
pub const KEY_CACHE_CAPACITY_ENV: &str = "MURMUR_KEY_CACHE_CAPACITY";
