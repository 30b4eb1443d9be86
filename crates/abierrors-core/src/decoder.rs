//! The `ErrorDecoder` trait, implemented by each decoding backend.

use crate::error::DecodeError;
use crate::types::DecodedResult;

/// Length of the selector that prefixes every encoded error.
pub const SELECTOR_LEN: usize = 4;

/// Decodes raw revert payloads into a named error and its arguments.
///
/// Implementations hold only immutable state and must be `Send + Sync`,
/// so one decoder can serve concurrent callers.
pub trait ErrorDecoder: Send + Sync {
    /// Decode `payload`, which is `selector ++ ABI-encoded arguments`.
    fn decode(&self, payload: &[u8]) -> Result<DecodedResult, DecodeError>;

    /// Convenience: decode from a hex string (with or without `0x` prefix).
    fn decode_hex(&self, hex_str: &str) -> Result<DecodedResult, DecodeError> {
        self.decode(&parse_hex_payload(hex_str)?)
    }
}

/// Parse a hex payload. Surrounding whitespace and a `0x`/`0X` prefix are accepted.
pub fn parse_hex_payload(hex_str: &str) -> Result<Vec<u8>, DecodeError> {
    let trimmed = hex_str.trim();
    let stripped = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(stripped).map_err(|e| DecodeError::InvalidPayloadEncoding {
        reason: format!("invalid hex: {e}"),
    })
}
