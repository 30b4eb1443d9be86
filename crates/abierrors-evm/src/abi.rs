//! Recursive decoder for the standard contract ABI encoding.
//!
//! An argument list is encoded as a tuple: a head region holding one slot
//! per parameter, followed by a tail region. Static values live in their
//! head slot (static composites take several consecutive words); dynamic
//! values leave a 32-byte offset in the head, measured from the start of
//! the enclosing tuple, pointing at their length-prefixed data in the tail.
//!
//! Every offset and length is bounds-checked before it is followed, so a
//! truncated or corrupt payload is reported rather than misread.

use abierrors_core::{AbiValue, DecodeError, ParamType, WORD_SIZE};
use alloy_primitives::{Address, I256, U256};
use tracing::trace;

/// A decode failure located at an absolute payload offset.
#[derive(Debug)]
struct Fault {
    offset: usize,
    reason: String,
}

fn fault(offset: usize, reason: impl Into<String>) -> Fault {
    Fault {
        offset,
        reason: reason.into(),
    }
}

/// A window onto the payload. Offsets read inside it are relative to
/// `buf[0]`, which sits at absolute position `origin`.
#[derive(Clone, Copy)]
struct Region<'a> {
    buf: &'a [u8],
    origin: usize,
}

impl<'a> Region<'a> {
    fn word(&self, at: usize) -> Result<&'a [u8; WORD_SIZE], Fault> {
        at.checked_add(WORD_SIZE)
            .and_then(|end| self.buf.get(at..end))
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| {
                fault(
                    self.origin.saturating_add(at),
                    format!(
                        "need {WORD_SIZE} bytes, {} available",
                        self.buf.len().saturating_sub(at)
                    ),
                )
            })
    }

    fn bytes(&self, at: usize, len: usize) -> Result<&'a [u8], Fault> {
        at.checked_add(len)
            .and_then(|end| self.buf.get(at..end))
            .ok_or_else(|| {
                fault(
                    self.origin.saturating_add(at),
                    format!(
                        "declared length {len} exceeds the {} bytes remaining",
                        self.buf.len().saturating_sub(at)
                    ),
                )
            })
    }

    /// Read a word as an offset or length. Values that cannot address
    /// anything in memory are rejected outright.
    fn usize_at(&self, at: usize, what: &str) -> Result<usize, Fault> {
        let word = self.word(at)?;
        let (high, low) = word.split_at(WORD_SIZE - 8);
        let mut low_bytes = [0u8; 8];
        low_bytes.copy_from_slice(low);
        let value = u64::from_be_bytes(low_bytes);
        if high.iter().any(|&b| b != 0) {
            return Err(fault(
                self.origin.saturating_add(at),
                format!("{what} 0x{} is out of range", hex::encode(word)),
            ));
        }
        usize::try_from(value)
            .map_err(|_| fault(self.origin.saturating_add(at), format!("{what} {value} is out of range")))
    }

    /// The sub-region starting at `at`. `at == len` yields an empty region.
    fn tail(&self, at: usize) -> Result<Region<'a>, Fault> {
        match self.buf.get(at..) {
            Some(buf) => Ok(Region {
                buf,
                origin: self.origin.saturating_add(at),
            }),
            None => Err(fault(
                self.origin.saturating_add(at),
                format!("offset {at} points past the end of its {}-byte region", self.buf.len()),
            )),
        }
    }
}

/// How many words a decode may visit per word of payload. Offsets may share
/// tail data, but total work stays linear in the payload size.
const VISITS_PER_WORD: usize = 4;

/// Words left to visit in one decode call.
struct Budget {
    limit: usize,
    remaining: usize,
}

impl Budget {
    fn for_payload(len: usize) -> Self {
        let limit = len.div_ceil(WORD_SIZE).saturating_mul(VISITS_PER_WORD);
        Self {
            limit,
            remaining: limit,
        }
    }

    fn charge(&mut self, words: usize, offset: usize) -> Result<(), Fault> {
        match self.remaining.checked_sub(words) {
            Some(left) => {
                self.remaining = left;
                Ok(())
            }
            None => Err(fault(
                offset,
                format!(
                    "decoding visits more than {} words; offsets revisit shared data",
                    self.limit
                ),
            )),
        }
    }
}

/// Decode an argument list encoded as a tuple of `types`.
///
/// `base` is the absolute position of `args[0]` in the full payload and is
/// only used for error reporting. Failures are attributed to the index of
/// the top-level parameter being decoded.
pub fn decode_params(
    types: &[&ParamType],
    args: &[u8],
    base: usize,
) -> Result<Vec<AbiValue>, DecodeError> {
    let region = Region { buf: args, origin: base };

    // Every head slot must be present before any value is read.
    let mut head = 0usize;
    for (index, ty) in types.iter().enumerate() {
        let end = head.saturating_add(ty.head_size());
        if end > args.len() {
            return Err(DecodeError::MalformedPayload {
                param_index: index,
                offset: base.saturating_add(args.len().min(head)),
                reason: format!(
                    "arguments end after {} bytes, but the head slots need {end}",
                    args.len()
                ),
            });
        }
        head = end;
    }

    let mut budget = Budget::for_payload(args.len());
    let mut values = Vec::with_capacity(types.len());
    let mut head = 0usize;
    for (index, ty) in types.iter().enumerate() {
        trace!(index, ty = %ty, head, "decoding parameter");
        let value =
            decode_at(ty, region, head, &mut budget).map_err(|f| DecodeError::MalformedPayload {
                param_index: index,
                offset: f.offset,
                reason: f.reason,
            })?;
        values.push(value);
        head += ty.head_size();
    }
    Ok(values)
}

/// Decode the value whose head slot starts at `at`.
fn decode_at(
    ty: &ParamType,
    region: Region<'_>,
    at: usize,
    budget: &mut Budget,
) -> Result<AbiValue, Fault> {
    if ty.is_dynamic() {
        budget.charge(1, region.origin.saturating_add(at))?;
        let offset = region.usize_at(at, "offset")?;
        return decode_in_place(ty, region.tail(offset)?, budget);
    }
    decode_in_place(ty, region.tail(at)?, budget)
}

fn unsupported(ty: &ParamType, region: Region<'_>) -> Fault {
    fault(region.origin, format!("{ty} is not a valid ABI type"))
}

fn valid_bits(bits: usize) -> bool {
    (8..=256).contains(&bits) && bits % 8 == 0
}

/// Decode a value whose encoding starts at the beginning of `region`.
fn decode_in_place(
    ty: &ParamType,
    region: Region<'_>,
    budget: &mut Budget,
) -> Result<AbiValue, Fault> {
    match ty {
        ParamType::Uint(bits) => {
            if !valid_bits(*bits) {
                return Err(unsupported(ty, region));
            }
            budget.charge(1, region.origin)?;
            let word = region.word(0)?;
            let value = U256::from_be_bytes(*word);
            if *bits < 256 && (value >> *bits) != U256::ZERO {
                return Err(fault(region.origin, format!("value {value} does not fit in uint{bits}")));
            }
            Ok(AbiValue::Uint(value, *bits))
        }
        ParamType::Int(bits) => {
            if !valid_bits(*bits) {
                return Err(unsupported(ty, region));
            }
            budget.charge(1, region.origin)?;
            let word = region.word(0)?;
            let raw = U256::from_be_bytes(*word);
            if *bits < 256 {
                // The top 256 - bits + 1 bits must all equal the sign bit.
                let high = raw >> (*bits - 1);
                if high != U256::ZERO && high != (U256::MAX >> (*bits - 1)) {
                    return Err(fault(
                        region.origin,
                        format!("0x{} is not a sign-extended int{bits}", hex::encode(word)),
                    ));
                }
            }
            Ok(AbiValue::Int(I256::from_raw(raw), *bits))
        }
        ParamType::Bool => {
            budget.charge(1, region.origin)?;
            let word = region.word(0)?;
            match U256::from_be_bytes(*word) {
                v if v == U256::ZERO => Ok(AbiValue::Bool(false)),
                v if v == U256::from(1u8) => Ok(AbiValue::Bool(true)),
                v => Err(fault(region.origin, format!("bool word holds {v}, expected 0 or 1"))),
            }
        }
        ParamType::Address => {
            budget.charge(1, region.origin)?;
            let word = region.word(0)?;
            if word[..12].iter().any(|&b| b != 0) {
                return Err(fault(
                    region.origin,
                    format!("address word 0x{} has dirty upper bytes", hex::encode(word)),
                ));
            }
            Ok(AbiValue::Address(Address::from_slice(&word[12..])))
        }
        ParamType::FixedBytes(len) => {
            if !(1..=WORD_SIZE).contains(len) {
                return Err(unsupported(ty, region));
            }
            budget.charge(1, region.origin)?;
            let word = region.word(0)?;
            Ok(AbiValue::FixedBytes(word[..*len].to_vec()))
        }
        ParamType::Bytes => Ok(AbiValue::Bytes(read_length_prefixed(region, budget)?.to_vec())),
        ParamType::String => {
            let data = read_length_prefixed(region, budget)?;
            let s = std::str::from_utf8(data)
                .map_err(|e| fault(region.origin + WORD_SIZE, format!("string is not valid UTF-8: {e}")))?;
            Ok(AbiValue::String(s.to_string()))
        }
        ParamType::FixedArray(elem, len) => {
            let needed = elem.head_size().max(1).saturating_mul(*len);
            if needed > region.buf.len() {
                return Err(fault(
                    region.origin,
                    format!(
                        "{ty} needs {needed} bytes, {} remaining",
                        region.buf.len()
                    ),
                ));
            }
            let items =
                decode_sequence(std::iter::repeat(&**elem).take(*len), *len, region, budget)?;
            Ok(AbiValue::FixedArray(items))
        }
        ParamType::Array(elem) => {
            budget.charge(1, region.origin)?;
            let len = region.usize_at(0, "array length")?;
            let items = region.tail(WORD_SIZE)?;
            // Each element needs at least one head slot, which bounds `len`
            // by the bytes actually present.
            let needed = len.checked_mul(elem.head_size().max(1));
            if needed.map_or(true, |n| n > items.buf.len()) {
                return Err(fault(
                    region.origin,
                    format!(
                        "array length {len} exceeds the {} bytes remaining",
                        items.buf.len()
                    ),
                ));
            }
            // Zero-sized elements read nothing, so charge them here.
            if elem.head_size() == 0 {
                budget.charge(len, region.origin)?;
            }
            let values =
                decode_sequence(std::iter::repeat(&**elem).take(len), len, items, budget)?;
            Ok(AbiValue::Array(values))
        }
        ParamType::Tuple(members) => {
            let values = decode_sequence(members.iter(), members.len(), region, budget)?;
            Ok(AbiValue::Tuple(values))
        }
    }
}

/// Read `bytes`/`string` contents. The data is padded to a whole number of
/// words and the padding must be present too.
fn read_length_prefixed<'a>(region: Region<'a>, budget: &mut Budget) -> Result<&'a [u8], Fault> {
    budget.charge(1, region.origin)?;
    let len = region.usize_at(0, "length")?;
    let padded = len
        .checked_next_multiple_of(WORD_SIZE)
        .ok_or_else(|| fault(region.origin, format!("length {len} is out of range")))?;
    let data = region.bytes(WORD_SIZE, padded)?;
    budget.charge(padded / WORD_SIZE, region.origin.saturating_add(WORD_SIZE))?;
    Ok(&data[..len])
}

/// Decode consecutive head slots starting at the beginning of `region`.
/// Dynamic members' offsets are relative to `region`.
fn decode_sequence<'t>(
    types: impl Iterator<Item = &'t ParamType>,
    count: usize,
    region: Region<'_>,
    budget: &mut Budget,
) -> Result<Vec<AbiValue>, Fault> {
    let mut values = Vec::with_capacity(count);
    let mut head = 0usize;
    for ty in types {
        values.push(decode_at(ty, region, head, budget)?);
        head = head.saturating_add(ty.head_size());
    }
    Ok(values)
}
