//! Transfer encoding helpers.
//!
//! Attachment payloads are written as a single unwrapped Base64 line.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Transfer encodings emitted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 8-bit text, used for the text and HTML alternatives.
    EightBit,
    /// Base64, used for attachments.
    Base64,
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// Whitespace is stripped first so that a part body copied out of a
/// rendered message (trailing CRLF included) decodes cleanly.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_encode_decode() {
        let data = b"Hello, World!";
        let encoded = encode_base64(data);
        assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");

        let decoded = decode_base64(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_base64_is_single_line() {
        let data = vec![0xAB_u8; 4096];
        let encoded = encode_base64(&data);
        assert!(!encoded.contains('\n'));
        assert!(!encoded.contains('\r'));
    }

    #[test]
    fn test_base64_decode_ignores_line_breaks() {
        let decoded = decode_base64("SGVs\r\nbG8=\r\n").unwrap();
        assert_eq!(decoded, b"Hello");
    }

    #[test]
    fn test_base64_decode_invalid() {
        assert!(decode_base64("not*base64").is_err());
    }

    #[test]
    fn test_transfer_encoding_display() {
        assert_eq!(TransferEncoding::EightBit.to_string(), "8bit");
        assert_eq!(TransferEncoding::Base64.to_string(), "base64");
    }
}
