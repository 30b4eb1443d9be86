//! Error types for interface loading and error decoding.

use thiserror::Error;

/// Why a payload could not be decoded.
///
/// All variants are terminal for a single decode call. Each message starts
/// with the failure kind so callers that only see the text can still tell
/// them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Not well-formed hex, or too short to hold a selector.
    #[error("invalid payload encoding: {reason}")]
    InvalidPayloadEncoding { reason: String },

    /// No error definition derives this selector.
    #[error("unknown selector {selector}: no error definition matches")]
    UnknownSelector { selector: String },

    /// Several definitions derive this selector and the policy rejects collisions.
    #[error("ambiguous selector {selector}: matches {}", .candidates.join(", "))]
    AmbiguousSelector {
        selector: String,
        candidates: Vec<String>,
    },

    /// The bytes after the selector do not satisfy the matched definition.
    ///
    /// `offset` is absolute within the payload, selector included.
    #[error("malformed payload: parameter {param_index} at byte offset {offset}: {reason}")]
    MalformedPayload {
        param_index: usize,
        offset: usize,
        reason: String,
    },
}

/// Errors raised while building an [`InterfaceDescription`](crate::InterfaceDescription).
#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("interface declares no errors")]
    Empty,

    #[error("unsupported ABI type: {ty}")]
    UnsupportedType { ty: String },

    #[error("invalid error signature: {signature}")]
    InvalidSignature { signature: String },

    #[error("invalid ABI JSON: {0}")]
    Json(#[from] serde_json::Error),
}
