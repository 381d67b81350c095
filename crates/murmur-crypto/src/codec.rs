//! Wire encoding for ciphertext and key material.
//!
//! Binary values crossing a text boundary use Base64-URL without padding
//! (`+` becomes `-`, `/` becomes `_`, no trailing `=`). Every AES-GCM output
//! travels as an [`EncryptedPayload`]; fields that hold a single string carry
//! it as the JSON array `[iv, ciphertext]`.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::defaults::IV_LEN;
use crate::error::{CryptoError, CryptoResult};

/// Encode bytes as Base64-URL without padding.
pub fn base64url_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(data)
}

/// Decode a Base64-URL string without padding.
pub fn base64url_decode(data: &str) -> CryptoResult<Vec<u8>> {
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(data)
        .map_err(|e| CryptoError::InvalidFormat(format!("Invalid base64url: {}", e)))
}

/// Copy a byte slice into a fixed-size array, naming the field on mismatch.
pub(crate) fn fixed_bytes<const N: usize>(bytes: &[u8], what: &str) -> CryptoResult<[u8; N]> {
    bytes.try_into().map_err(|_| {
        CryptoError::KeyMaterial(format!(
            "{} must be {} bytes, got {}",
            what,
            N,
            bytes.len()
        ))
    })
}

/// AES-GCM output in wire form.
///
/// Produced by every cipher in this crate and consumed verbatim by
/// ledger-write collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// Base64-URL IV (12 bytes decoded).
    pub iv: String,
    /// Base64-URL ciphertext with the 16-byte tag appended.
    pub ciphertext: String,
}

impl EncryptedPayload {
    /// Build a payload from raw IV and ciphertext bytes.
    pub fn from_parts(iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Self {
        Self {
            iv: base64url_encode(iv),
            ciphertext: base64url_encode(ciphertext),
        }
    }

    /// Decode the IV, checking its length.
    pub fn iv_bytes(&self) -> CryptoResult<[u8; IV_LEN]> {
        let iv = base64url_decode(&self.iv)
            .map_err(|e| CryptoError::KeyMaterial(format!("IV: {}", e)))?;
        fixed_bytes(&iv, "IV")
    }

    /// Decode the ciphertext bytes.
    pub fn ciphertext_bytes(&self) -> CryptoResult<Vec<u8>> {
        base64url_decode(&self.ciphertext)
    }

    /// Serialize to the single-field text form `["<iv>","<ciphertext>"]`.
    pub fn to_text(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string(&(&self.iv, &self.ciphertext))?)
    }

    /// Parse the single-field text form produced by [`EncryptedPayload::to_text`].
    pub fn from_text(text: &str) -> CryptoResult<Self> {
        let (iv, ciphertext): (String, String) = serde_json::from_str(text).map_err(|e| {
            CryptoError::InvalidFormat(format!("Expected [iv, ciphertext] array: {}", e))
        })?;
        Ok(Self { iv, ciphertext })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64url_alphabet() {
        // 0xfb 0xff encodes to "+/8=" in standard base64
        let encoded = base64url_encode(&[0xfb, 0xff]);
        assert_eq!(encoded, "-_8");
        assert!(!encoded.contains('='));
        assert_eq!(base64url_decode(&encoded).unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_base64url_rejects_standard_alphabet() {
        assert!(matches!(
            base64url_decode("+/8="),
            Err(CryptoError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_payload_text_form() {
        let payload = EncryptedPayload::from_parts(&[7u8; IV_LEN], b"sealed");
        let text = payload.to_text().unwrap();

        assert!(text.starts_with("[\""));
        let values: Vec<String> = serde_json::from_str(&text).unwrap();
        assert_eq!(values, vec![payload.iv.clone(), payload.ciphertext.clone()]);

        assert_eq!(EncryptedPayload::from_text(&text).unwrap(), payload);
    }

    #[test]
    fn test_payload_from_text_rejects_objects() {
        let result = EncryptedPayload::from_text(r#"{"iv":"a","ciphertext":"b"}"#);
        assert!(matches!(result, Err(CryptoError::InvalidFormat(_))));

        let result = EncryptedPayload::from_text(r#"["only-one"]"#);
        assert!(matches!(result, Err(CryptoError::InvalidFormat(_))));
    }

    #[test]
    fn test_payload_struct_serialization() {
        let payload = EncryptedPayload::from_parts(&[1u8; IV_LEN], b"x");
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("iv").is_some());
        assert!(json.get("ciphertext").is_some());
    }

    #[test]
    fn test_iv_bytes_wrong_length() {
        let payload = EncryptedPayload {
            iv: base64url_encode(&[0u8; 8]),
            ciphertext: base64url_encode(b"data"),
        };
        assert!(matches!(
            payload.iv_bytes(),
            Err(CryptoError::KeyMaterial(_))
        ));
    }

    #[test]
    fn test_iv_bytes_invalid_base64() {
        let payload = EncryptedPayload {
            iv: "not base64!!".into(),
            ciphertext: String::new(),
        };
        assert!(matches!(
            payload.iv_bytes(),
            Err(CryptoError::KeyMaterial(_))
        ));
    }
}
