//! abierrors-core — foundation types and traits for the abierrors decoder.
//!
//! This crate defines:
//! - [`ParamType`] and [`AbiValue`] — the ABI type and value model
//! - [`ErrorDefinition`] and [`InterfaceDescription`] — what payloads are matched against
//! - [`DecodedResult`] — the output of a successful decode
//! - [`DecodeError`] — the four ways a decode can fail
//! - [`ErrorDecoder`] — the decoder trait backends implement
//! - [`DecoderConfig`] — collision and builtin policy

pub mod config;
pub mod decoder;
pub mod error;
pub mod interface;
pub mod types;

pub use config::{CollisionPolicy, DecoderConfig};
pub use decoder::{parse_hex_payload, ErrorDecoder, SELECTOR_LEN};
pub use error::{DecodeError, InterfaceError};
pub use interface::InterfaceDescription;
pub use types::{AbiValue, DecodedArg, DecodedResult, ErrorDefinition, ErrorParam, ParamType, WORD_SIZE};
