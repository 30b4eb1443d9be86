//! abierrors-evm — decode EVM custom error payloads against an ABI.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use abierrors_core::{ErrorDecoder, InterfaceDescription};
//! use abierrors_evm::AbiErrorDecoder;
//!
//! let abi = std::fs::read_to_string("out/Vault.sol/Vault.json").unwrap();
//! let decoder = AbiErrorDecoder::new(InterfaceDescription::from_json(&abi).unwrap());
//! let result = decoder.decode_hex("0xcf479181...").unwrap();
//! println!("{result}");  // "InsufficientBalance(available=100, required=250)"
//! ```

pub mod abi;
pub mod builtin;
pub mod decoder;
pub mod selector;

pub use decoder::{decode_error, definition_selector, AbiErrorDecoder};
pub use selector::{keccak256, selector_of, SelectorTable};
