//! Decoder policy configuration.

use serde::{Deserialize, Serialize};

/// What to do when more than one definition derives the payload's selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Use the definition declared first. Builtins rank after user definitions.
    #[default]
    FirstDeclared,
    /// Fail with `AmbiguousSelector`.
    Reject,
}

/// Decoder settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub collision: CollisionPolicy,
    /// Also recognise the standard `Error(string)` and `Panic(uint256)` reverts.
    pub builtins: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            collision: CollisionPolicy::FirstDeclared,
            builtins: true,
        }
    }
}
