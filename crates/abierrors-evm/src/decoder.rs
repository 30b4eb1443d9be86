//! `AbiErrorDecoder`, the selector-matching decoder.
//!
//! Decode steps:
//! 1. Payload shorter than 4 bytes → `InvalidPayloadEncoding`
//! 2. Leading 4 bytes looked up in the selector table → `UnknownSelector`,
//!    or `AmbiguousSelector` under `CollisionPolicy::Reject`
//! 3. Remaining bytes ABI-decoded per the matched definition → `MalformedPayload`
//!
//! Builtin `Error(string)` and `Panic(uint256)` rank after the interface's
//! own definitions.

use abierrors_core::{
    DecodeError, DecodedArg, DecodedResult, DecoderConfig, ErrorDecoder, ErrorDefinition,
    InterfaceDescription, ParamType, SELECTOR_LEN,
};
use tracing::debug;

use crate::abi::decode_params;
use crate::builtin;
use crate::selector::{selector_hex, selector_of, SelectorTable};

/// Decodes revert payloads against one interface description.
///
/// Selectors are derived once at construction; decoding is then a pure
/// function of the payload, so a decoder can be shared across threads.
///
/// # Usage
/// ```rust
/// use abierrors_core::{ErrorDecoder, InterfaceDescription};
/// use abierrors_evm::AbiErrorDecoder;
///
/// let iface = InterfaceDescription::from_signatures(&["Unauthorized(address caller)"]).unwrap();
/// let decoder = AbiErrorDecoder::new(iface);
///
/// let mut payload = abierrors_evm::selector::selector_of("Unauthorized(address)").to_vec();
/// payload.extend_from_slice(&[0u8; 12]);
/// payload.extend_from_slice(&hex::decode("d8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap());
///
/// let result = decoder.decode(&payload).unwrap();
/// assert_eq!(result.to_string(), "Unauthorized(caller=0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045)");
/// ```
#[derive(Debug, Clone)]
pub struct AbiErrorDecoder {
    definitions: Vec<ErrorDefinition>,
    table: SelectorTable,
    config: DecoderConfig,
}

impl AbiErrorDecoder {
    /// Create a decoder with the default config.
    pub fn new(interface: InterfaceDescription) -> Self {
        Self::with_config(interface, DecoderConfig::default())
    }

    pub fn with_config(interface: InterfaceDescription, config: DecoderConfig) -> Self {
        let mut definitions = interface.into_errors();
        if config.builtins {
            for def in builtin::definitions() {
                let signature = def.signature();
                if !definitions.iter().any(|d| d.signature() == signature) {
                    definitions.push(def);
                }
            }
        }
        let table = SelectorTable::build(&definitions);
        debug!(
            definitions = definitions.len(),
            collision = ?config.collision,
            builtins = config.builtins,
            "built error decoder"
        );
        Self {
            definitions,
            table,
            config,
        }
    }

    /// Every definition the decoder matches against, builtins included.
    pub fn definitions(&self) -> &[ErrorDefinition] {
        &self.definitions
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// The definition a payload with this selector would be decoded with.
    pub fn lookup(&self, selector: [u8; 4]) -> Result<&ErrorDefinition, DecodeError> {
        let index = self.table.resolve(selector, self.config.collision)?;
        Ok(&self.definitions[index])
    }
}

impl ErrorDecoder for AbiErrorDecoder {
    fn decode(&self, payload: &[u8]) -> Result<DecodedResult, DecodeError> {
        if payload.len() < SELECTOR_LEN {
            return Err(DecodeError::InvalidPayloadEncoding {
                reason: format!(
                    "payload is {} bytes, need at least {SELECTOR_LEN} for the selector",
                    payload.len()
                ),
            });
        }
        let (head, args) = payload.split_at(SELECTOR_LEN);
        let selector = [head[0], head[1], head[2], head[3]];

        let def = self.lookup(selector)?;
        let signature = def.signature();
        debug!(selector = %selector_hex(selector), %signature, "matched error definition");

        let types: Vec<&ParamType> = def.inputs.iter().map(|p| &p.ty).collect();
        let values = decode_params(&types, args, SELECTOR_LEN)?;

        let args = def
            .inputs
            .iter()
            .zip(values)
            .enumerate()
            .map(|(i, (param, value))| DecodedArg {
                name: if param.name.is_empty() {
                    format!("arg{i}")
                } else {
                    param.name.clone()
                },
                ty: param.ty.clone(),
                value,
            })
            .collect();

        Ok(DecodedResult {
            error_name: def.name.clone(),
            signature,
            selector,
            args,
        })
    }
}

/// Decode `payload` against `interface` with the default config.
///
/// Builds the selector table on every call; hold an [`AbiErrorDecoder`]
/// when decoding more than once.
pub fn decode_error(
    interface: &InterfaceDescription,
    payload: &[u8],
) -> Result<DecodedResult, DecodeError> {
    AbiErrorDecoder::new(interface.clone()).decode(payload)
}

/// Selector of a definition, as derived for matching.
pub fn definition_selector(def: &ErrorDefinition) -> [u8; 4] {
    selector_of(&def.signature())
}
