//! Selector derivation and the per-interface selector table.
//!
//! The selector of an error is the first 4 bytes of the keccak256 hash of
//! its canonical signature:
//!   keccak256("InsufficientBalance(uint256,uint256)")[..4]

use std::collections::HashMap;

use abierrors_core::{CollisionPolicy, DecodeError, ErrorDefinition};
use tiny_keccak::{Hasher, Keccak};
use tracing::{debug, warn};

/// keccak256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Compute the 4-byte selector of a canonical signature string.
pub fn selector_of(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

pub(crate) fn selector_hex(selector: [u8; 4]) -> String {
    format!("0x{}", hex::encode(selector))
}

/// Selectors for a fixed list of definitions, computed once.
#[derive(Debug, Clone)]
pub struct SelectorTable {
    /// selector → definition indices, in declaration order
    by_selector: HashMap<[u8; 4], Vec<usize>>,
    signatures: Vec<String>,
}

impl SelectorTable {
    pub fn build(definitions: &[ErrorDefinition]) -> Self {
        let mut by_selector: HashMap<[u8; 4], Vec<usize>> = HashMap::new();
        let mut signatures = Vec::with_capacity(definitions.len());

        for (index, def) in definitions.iter().enumerate() {
            let signature = def.signature();
            let selector = selector_of(&signature);
            debug!(%signature, selector = %selector_hex(selector), "derived error selector");
            by_selector.entry(selector).or_default().push(index);
            signatures.push(signature);
        }

        for (selector, indices) in &by_selector {
            if indices.len() > 1 {
                let colliding: Vec<&str> = indices.iter().map(|&i| signatures[i].as_str()).collect();
                warn!(
                    selector = %selector_hex(*selector),
                    signatures = ?colliding,
                    "selector collision in interface description"
                );
            }
        }

        Self { by_selector, signatures }
    }

    /// Canonical signature of the definition at `index`.
    pub fn signature(&self, index: usize) -> Option<&str> {
        self.signatures.get(index).map(String::as_str)
    }

    /// All definition indices deriving `selector`, in declaration order.
    pub fn candidates(&self, selector: [u8; 4]) -> &[usize] {
        self.by_selector.get(&selector).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pick the definition index for `selector` under `policy`.
    pub fn resolve(&self, selector: [u8; 4], policy: CollisionPolicy) -> Result<usize, DecodeError> {
        match (self.candidates(selector), policy) {
            ([], _) => Err(DecodeError::UnknownSelector {
                selector: selector_hex(selector),
            }),
            ([only], _) => Ok(*only),
            ([first, ..], CollisionPolicy::FirstDeclared) => Ok(*first),
            (many, CollisionPolicy::Reject) => Err(DecodeError::AmbiguousSelector {
                selector: selector_hex(selector),
                candidates: many.iter().map(|&i| self.signatures[i].clone()).collect(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
