//! The interface description: the ordered set of declared errors a payload
//! is matched against.

use crate::error::InterfaceError;
use crate::types::ErrorDefinition;

/// An immutable, ordered collection of error definitions.
///
/// Declaration order is preserved; it decides which definition wins when
/// two of them derive the same selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescription {
    errors: Vec<ErrorDefinition>,
}

impl InterfaceDescription {
    /// Build from already-parsed definitions. At least one is required.
    pub fn new(errors: Vec<ErrorDefinition>) -> Result<Self, InterfaceError> {
        if errors.is_empty() {
            return Err(InterfaceError::Empty);
        }
        Ok(Self { errors })
    }

    /// Load the error entries of an ABI JSON document.
    ///
    /// Accepts a bare ABI array or a compilation artifact object with an
    /// `abi` key (Foundry's `out/<File>.sol/<Contract>.json`). Functions,
    /// events and other entries are skipped.
    pub fn from_json(json: &str) -> Result<Self, InterfaceError> {
        let doc: serde_json::Value = serde_json::from_str(json)?;
        let entries = match doc {
            serde_json::Value::Object(mut obj) => match obj.remove("abi") {
                Some(abi) => abi,
                None => serde_json::Value::Object(obj),
            },
            other => other,
        };
        let entries: Vec<serde_json::Value> = serde_json::from_value(entries)?;

        let mut errors = Vec::new();
        for entry in entries {
            if entry.get("type").and_then(|t| t.as_str()) != Some("error") {
                continue;
            }
            let error: alloy_json_abi::Error = serde_json::from_value(entry)?;
            errors.push(ErrorDefinition::try_from(&error)?);
        }
        Self::new(errors)
    }

    /// Build from human-readable declarations, e.g.
    /// `["InsufficientBalance(uint256 available, uint256 required)"]`.
    pub fn from_signatures<S: AsRef<str>>(declarations: &[S]) -> Result<Self, InterfaceError> {
        let errors = declarations
            .iter()
            .map(|d| ErrorDefinition::parse(d.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(errors)
    }

    /// All definitions, in declaration order.
    pub fn errors(&self) -> &[ErrorDefinition] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ErrorDefinition> {
        self.errors
    }

    /// First definition with the given name.
    pub fn get(&self, name: &str) -> Option<&ErrorDefinition> {
        self.errors.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`: construction rejects empty descriptions.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
