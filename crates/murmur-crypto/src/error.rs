//! Error types for murmur encryption operations.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// AEAD tag verification failed - wrong key, wrong IV, or tampered ciphertext.
    ///
    /// On identity unwrap this is also what a wrong wrapping secret looks like.
    #[error("Authentication failed - wrong key or tampered data")]
    Authentication,

    /// Malformed or missing key material (public key, salt, IV, room key).
    #[error("Invalid key material: {0}")]
    KeyMaterial(String),

    /// The caller's identity holds no room key grant for this room.
    #[error("No room key grant for this identity in room {room_id}")]
    NotGranted {
        /// Room the grant was looked up in.
        room_id: String,
    },

    /// Key derivation failed.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Encryption failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Invalid wire format (base64, JSON text form, UTF-8 content).
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Invalid address format.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The ledger-access collaborator failed to answer a lookup.
    #[error("Directory lookup failed: {0}")]
    Directory(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CryptoError {
    /// Whether this is an AEAD authentication failure.
    ///
    /// Presentation layers use this to show a "protected content" placeholder
    /// instead of failing the whole view.
    pub fn is_authentication(&self) -> bool {
        matches!(self, CryptoError::Authentication)
    }

    /// Whether a user retry (re-entering the wrapping secret) can fix this.
    ///
    /// A wrong secret and corrupted wrapped bytes both fail authentication,
    /// so both report as recoverable.
    pub fn is_user_recoverable(&self) -> bool {
        self.is_authentication()
    }
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_display() {
        let err = CryptoError::Authentication;
        assert!(err.to_string().contains("Authentication failed"));
    }

    #[test]
    fn test_not_granted_display() {
        let err = CryptoError::NotGranted {
            room_id: "room-42".into(),
        };
        assert!(err.to_string().contains("room-42"));
    }

    #[test]
    fn test_predicates() {
        assert!(CryptoError::Authentication.is_authentication());
        assert!(CryptoError::Authentication.is_user_recoverable());

        let err = CryptoError::KeyMaterial("salt must be 16 bytes".into());
        assert!(!err.is_authentication());
        assert!(!err.is_user_recoverable());
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let crypto_err: CryptoError = json_err.into();
        assert!(matches!(crypto_err, CryptoError::Json(_)));
    }
}
