//! The two errors every Solidity contract can revert with, whether or not
//! its ABI declares them.
//!
//! - `Error(string)`, selector `0x08c379a0`, from `require(cond, "message")`
//! - `Panic(uint256)`, selector `0x4e487b71`, from failed `assert` and
//!   compiler-inserted checks (Solidity 0.8.0+)
//!
//! Full list of panic codes:
//! <https://docs.soliditylang.org/en/latest/control-structures.html#panic-via-assert-and-error-via-require>

use abierrors_core::{DecodedResult, ErrorDefinition, ErrorParam, ParamType};
use alloy_primitives::U256;

/// The 4-byte selector for `Error(string)`.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// The 4-byte selector for `Panic(uint256)`.
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// `error Error(string message)`
pub fn error_string() -> ErrorDefinition {
    ErrorDefinition::new("Error", vec![ErrorParam::new("message", ParamType::String)])
}

/// `error Panic(uint256 code)`
pub fn panic() -> ErrorDefinition {
    ErrorDefinition::new("Panic", vec![ErrorParam::new("code", ParamType::Uint(256))])
}

pub fn definitions() -> [ErrorDefinition; 2] {
    [error_string(), panic()]
}

/// Map a Solidity panic code to a human-readable description.
pub fn panic_meaning(code: U256) -> &'static str {
    if code > U256::from(u64::MAX) {
        return "unknown panic code";
    }
    match code.to::<u64>() {
        0x00 => "generic compiler-inserted panic",
        0x01 => "assert() called with false condition",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division or modulo by zero",
        0x21 => "invalid enum value",
        0x22 => "corrupted storage byte array",
        0x31 => ".pop() on empty array",
        0x32 => "out-of-bounds array access",
        0x41 => "too much memory allocated (out of memory)",
        0x51 => "called zero-initialized internal function pointer",
        _ => "unknown panic code",
    }
}

/// Describe the panic code if `result` is a decoded `Panic(uint256)`.
pub fn panic_reason(result: &DecodedResult) -> Option<&'static str> {
    if result.selector != PANIC_SELECTOR {
        return None;
    }
    result.values().next().and_then(|v| v.as_uint()).map(panic_meaning)
}
