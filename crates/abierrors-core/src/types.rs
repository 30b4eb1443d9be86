//! Core types: ABI parameter types, error definitions, decoded values.

use alloy_core::dyn_abi::DynSolType;
use alloy_json_abi::Param;
use alloy_primitives::{Address, I256, U256};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::InterfaceError;

/// Size of one ABI word slot in bytes.
pub const WORD_SIZE: usize = 32;

// ─── ParamType ────────────────────────────────────────────────────────────────

/// A Solidity ABI parameter type.
///
/// Closed over every type that can appear in a custom error declaration.
/// Composite variants carry their nested types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// `uintN`. Width in bits (8..=256, multiple of 8).
    Uint(usize),
    /// `intN`. Width in bits (8..=256, multiple of 8).
    Int(usize),
    Bool,
    Address,
    /// `bytesN`. Length in bytes (1..=32).
    FixedBytes(usize),
    /// Dynamic `bytes`.
    Bytes,
    String,
    /// `T[N]`
    FixedArray(Box<ParamType>, usize),
    /// `T[]`
    Array(Box<ParamType>),
    /// `(T1,T2,...)`, a struct or anonymous tuple.
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Returns `true` if values of this type are stored behind an offset
    /// pointer in the tail region rather than in place.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Bytes | Self::String | Self::Array(_) => true,
            Self::FixedArray(elem, _) => elem.is_dynamic(),
            Self::Tuple(members) => members.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Number of bytes this type occupies in the head of its enclosing tuple.
    ///
    /// Dynamic types take one word (the offset). Static composites are
    /// stored inline, so they take the sum of their members.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return WORD_SIZE;
        }
        match self {
            Self::FixedArray(elem, len) => elem.head_size().saturating_mul(*len),
            Self::Tuple(members) => members
                .iter()
                .fold(0usize, |acc, m| acc.saturating_add(m.head_size())),
            _ => WORD_SIZE,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Int(bits) => write!(f, "int{bits}"),
            Self::Bool => f.write_str("bool"),
            Self::Address => f.write_str("address"),
            Self::FixedBytes(n) => write!(f, "bytes{n}"),
            Self::Bytes => f.write_str("bytes"),
            Self::String => f.write_str("string"),
            Self::FixedArray(elem, len) => write!(f, "{elem}[{len}]"),
            Self::Array(elem) => write!(f, "{elem}[]"),
            Self::Tuple(members) => {
                f.write_str("(")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{m}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for ParamType {
    type Err = InterfaceError;

    /// Parse a Solidity type string such as `"(uint256,address)[]"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = s
            .trim()
            .parse::<DynSolType>()
            .map_err(|_| InterfaceError::UnsupportedType { ty: s.to_string() })?;
        Self::try_from(&ty)
    }
}

impl TryFrom<&DynSolType> for ParamType {
    type Error = InterfaceError;

    fn try_from(ty: &DynSolType) -> Result<Self, Self::Error> {
        Ok(match ty {
            DynSolType::Bool => Self::Bool,
            DynSolType::Int(bits) => Self::Int(*bits),
            DynSolType::Uint(bits) => Self::Uint(*bits),
            DynSolType::FixedBytes(len) => Self::FixedBytes(*len),
            DynSolType::Address => Self::Address,
            DynSolType::Bytes => Self::Bytes,
            DynSolType::String => Self::String,
            DynSolType::Array(elem) => Self::Array(Box::new(Self::try_from(elem.as_ref())?)),
            DynSolType::FixedArray(elem, len) => {
                Self::FixedArray(Box::new(Self::try_from(elem.as_ref())?), *len)
            }
            DynSolType::Tuple(members) => Self::Tuple(
                members
                    .iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            // `function`
            other => {
                return Err(InterfaceError::UnsupportedType {
                    ty: other.sol_type_name().into_owned(),
                })
            }
        })
    }
}

impl Serialize for ParamType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ─── Error definitions ────────────────────────────────────────────────────────

/// A single declared parameter of a custom error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorParam {
    /// Parameter name (may be empty for unnamed params).
    pub name: String,
    pub ty: ParamType,
}

impl ErrorParam {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A declared custom error: `error Name(T1 a, T2 b)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDefinition {
    pub name: String,
    pub inputs: Vec<ErrorParam>,
}

impl ErrorDefinition {
    pub fn new(name: impl Into<String>, inputs: Vec<ErrorParam>) -> Self {
        Self { name: name.into(), inputs }
    }

    /// The canonical signature, e.g. `"InsufficientBalance(uint256,uint256)"`.
    ///
    /// Parameter names never take part in the signature.
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|p| p.ty.to_string()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// Parse a human-readable declaration such as
    /// `"InsufficientBalance(uint256 available, uint256 required)"`.
    ///
    /// A leading `error` keyword is accepted.
    pub fn parse(declaration: &str) -> Result<Self, InterfaceError> {
        let error = alloy_json_abi::Error::parse(declaration.trim()).map_err(|_| {
            InterfaceError::InvalidSignature {
                signature: declaration.to_string(),
            }
        })?;
        Self::try_from(&error)
    }
}

impl TryFrom<&Param> for ErrorParam {
    type Error = InterfaceError;

    /// Tuple parameters are resolved from their `components`.
    fn try_from(param: &Param) -> Result<Self, Self::Error> {
        Ok(Self::new(param.name.clone(), param.selector_type().parse()?))
    }
}

impl TryFrom<&alloy_json_abi::Error> for ErrorDefinition {
    type Error = InterfaceError;

    fn try_from(error: &alloy_json_abi::Error) -> Result<Self, Self::Error> {
        let inputs = error
            .inputs
            .iter()
            .map(ErrorParam::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(error.name.clone(), inputs))
    }
}

// ─── Decoded values ───────────────────────────────────────────────────────────

/// A decoded ABI value, shaped by the `ParamType` it was decoded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// Unsigned integer with its declared width in bits.
    Uint(U256, usize),
    /// Signed integer with its declared width in bits.
    Int(I256, usize),
    Bool(bool),
    Address(Address),
    /// `bytesN` contents, exactly N bytes.
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    FixedArray(Vec<AbiValue>),
    Array(Vec<AbiValue>),
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    /// Returns the value as a `U256` if it is an unsigned integer.
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(v, _) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(v, _) => write!(f, "{v}"),
            Self::Int(v, _) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Address(a) => write!(f, "{}", a.to_checksum(None)),
            Self::FixedBytes(b) | Self::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Self::String(s) => f.write_str(s),
            Self::FixedArray(items) | Self::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[AbiValue]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

// Integers serialize as decimal strings so 256-bit values survive JSON.
impl Serialize for AbiValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::String(s) => serializer.serialize_str(s),
            Self::FixedArray(items) | Self::Array(items) | Self::Tuple(items) => {
                items.serialize(serializer)
            }
            other => serializer.collect_str(other),
        }
    }
}

// ─── DecodedResult ────────────────────────────────────────────────────────────

/// One decoded argument of a matched error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedArg {
    /// Declared parameter name, or `arg{index}` when the ABI leaves it blank.
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    pub value: AbiValue,
}

/// The output of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedResult {
    /// Error name (e.g. `"InsufficientBalance"`).
    pub error_name: String,
    /// Canonical signature the selector was derived from.
    pub signature: String,
    #[serde(serialize_with = "serialize_selector")]
    pub selector: [u8; 4],
    /// Arguments in declaration order.
    pub args: Vec<DecodedArg>,
}

fn serialize_selector<S: Serializer>(selector: &[u8; 4], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{}", hex::encode(selector)))
}

impl DecodedResult {
    /// The bare argument values, in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &AbiValue> {
        self.args.iter().map(|a| &a.value)
    }

    /// Look up an argument by its declared name.
    pub fn arg(&self, name: &str) -> Option<&AbiValue> {
        self.args.iter().find(|a| a.name == name).map(|a| &a.value)
    }
}

impl fmt::Display for DecodedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<_> = self
            .args
            .iter()
            .map(|a| format!("{}={}", a.name, a.value))
            .collect();
        write!(f, "{}({})", self.error_name, args.join(", "))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
