//! Integration tests for abierrors-evm.
//!
//! Payloads are produced by alloy's dynamic ABI encoder, an encoder
//! independent of the decoder under test, then decoded through
//! `AbiErrorDecoder` and compared against the values that were encoded.

use abierrors_core::{AbiValue, DecodeError, ErrorDecoder, InterfaceDescription};
use abierrors_evm::{selector_of, AbiErrorDecoder};
use alloy_core::dyn_abi::DynSolValue;
use alloy_primitives::{Address, B256, I256, U256};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn uint(v: u64, bits: usize) -> DynSolValue {
    DynSolValue::Uint(U256::from(v), bits)
}

fn int(v: i64, bits: usize) -> DynSolValue {
    DynSolValue::Int(I256::try_from(v).unwrap(), bits)
}

fn string(s: &str) -> DynSolValue {
    DynSolValue::String(s.to_string())
}

/// Convert a decoded value into alloy's representation for comparison.
fn to_dyn(value: &AbiValue) -> DynSolValue {
    match value {
        AbiValue::Uint(v, bits) => DynSolValue::Uint(*v, *bits),
        AbiValue::Int(v, bits) => DynSolValue::Int(*v, *bits),
        AbiValue::Bool(b) => DynSolValue::Bool(*b),
        AbiValue::Address(a) => DynSolValue::Address(*a),
        AbiValue::FixedBytes(b) => DynSolValue::FixedBytes(B256::right_padding_from(b), b.len()),
        AbiValue::Bytes(b) => DynSolValue::Bytes(b.clone()),
        AbiValue::String(s) => DynSolValue::String(s.clone()),
        AbiValue::FixedArray(items) => DynSolValue::FixedArray(items.iter().map(to_dyn).collect()),
        AbiValue::Array(items) => DynSolValue::Array(items.iter().map(to_dyn).collect()),
        AbiValue::Tuple(items) => DynSolValue::Tuple(items.iter().map(to_dyn).collect()),
    }
}

struct Case {
    declaration: &'static str,
    signature: &'static str,
    args: Vec<DynSolValue>,
}

fn encode(case: &Case) -> Vec<u8> {
    let mut payload = selector_of(case.signature).to_vec();
    payload.extend(DynSolValue::Tuple(case.args.clone()).abi_encode_params());
    payload
}

fn static_case() -> Case {
    Case {
        declaration: "Static(uint256 a, int64 b, bool c, address d, bytes32 e, bytes3 f, uint8[3] g, (uint16,bool) h)",
        signature: "Static(uint256,int64,bool,address,bytes32,bytes3,uint8[3],(uint16,bool))",
        args: vec![
            DynSolValue::Uint(U256::MAX, 256),
            int(i64::MIN, 64),
            DynSolValue::Bool(true),
            DynSolValue::Address(Address::repeat_byte(0x11)),
            DynSolValue::FixedBytes(B256::repeat_byte(0xab), 32),
            DynSolValue::FixedBytes(B256::right_padding_from(&[1, 2, 3]), 3),
            DynSolValue::FixedArray(vec![uint(1, 8), uint(2, 8), uint(255, 8)]),
            DynSolValue::Tuple(vec![uint(65535, 16), DynSolValue::Bool(false)]),
        ],
    }
}

fn dynamic_case() -> Case {
    Case {
        declaration: "Dynamic(string reason, bytes data, uint256[] amounts, string[2] names, (address,bytes)[] calls)",
        signature: "Dynamic(string,bytes,uint256[],string[2],(address,bytes)[])",
        args: vec![
            string("transfer amount exceeds balance, and this message is longer than one word"),
            DynSolValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]),
            DynSolValue::Array(vec![uint(1, 256), uint(2, 256), uint(3, 256)]),
            DynSolValue::FixedArray(vec![string("alice"), string("")]),
            DynSolValue::Array(vec![
                DynSolValue::Tuple(vec![
                    DynSolValue::Address(Address::repeat_byte(0x22)),
                    DynSolValue::Bytes(vec![0x01; 40]),
                ]),
                DynSolValue::Tuple(vec![
                    DynSolValue::Address(Address::ZERO),
                    DynSolValue::Bytes(vec![]),
                ]),
            ]),
        ],
    }
}

fn nested_case() -> Case {
    Case {
        declaration: "Nested(((uint256,string)[],bytes4)[2] deep, int256 neg, bool[][] grid)",
        signature: "Nested(((uint256,string)[],bytes4)[2],int256,bool[][])",
        args: vec![
            DynSolValue::FixedArray(vec![
                DynSolValue::Tuple(vec![
                    DynSolValue::Array(vec![
                        DynSolValue::Tuple(vec![uint(7, 256), string("seven")]),
                        DynSolValue::Tuple(vec![uint(8, 256), string("eight")]),
                    ]),
                    DynSolValue::FixedBytes(B256::right_padding_from(&[0xca, 0xfe, 0xba, 0xbe]), 4),
                ]),
                DynSolValue::Tuple(vec![
                    DynSolValue::Array(vec![]),
                    DynSolValue::FixedBytes(B256::ZERO, 4),
                ]),
            ]),
            int(-42, 256),
            DynSolValue::Array(vec![
                DynSolValue::Array(vec![DynSolValue::Bool(true)]),
                DynSolValue::Array(vec![]),
                DynSolValue::Array(vec![DynSolValue::Bool(false), DynSolValue::Bool(true)]),
            ]),
        ],
    }
}

fn all_cases() -> Vec<Case> {
    vec![static_case(), dynamic_case(), nested_case()]
}

fn decoder_for(cases: &[Case]) -> AbiErrorDecoder {
    let declarations: Vec<&str> = cases.iter().map(|c| c.declaration).collect();
    AbiErrorDecoder::new(InterfaceDescription::from_signatures(&declarations).unwrap())
}

// ─── Round trip ───────────────────────────────────────────────────────────────

#[test]
fn encoded_arguments_decode_back_exactly() {
    let cases = all_cases();
    let decoder = decoder_for(&cases);

    for case in &cases {
        let result = decoder
            .decode(&encode(case))
            .unwrap_or_else(|e| panic!("{}: {e}", case.signature));
        assert_eq!(result.signature, case.signature);
        let decoded: Vec<DynSolValue> = result.values().map(to_dyn).collect();
        assert_eq!(decoded, case.args, "{}", case.signature);
    }
}

#[test]
fn argument_names_follow_declaration() {
    let cases = all_cases();
    let decoder = decoder_for(&cases);
    let result = decoder.decode(&encode(&dynamic_case())).unwrap();
    let names: Vec<&str> = result.args.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["reason", "data", "amounts", "names", "calls"]);
    assert_eq!(
        result.arg("reason").and_then(|v| v.as_str()),
        Some("transfer amount exceeds balance, and this message is longer than one word")
    );
}

// ─── Truncation ───────────────────────────────────────────────────────────────

#[test]
fn truncating_one_byte_is_always_malformed() {
    let cases = all_cases();
    let decoder = decoder_for(&cases);

    for case in &cases {
        let mut payload = encode(case);
        payload.pop();
        match decoder.decode(&payload) {
            Err(DecodeError::MalformedPayload { .. }) => {}
            other => panic!("{}: expected MalformedPayload, got {other:?}", case.signature),
        }
    }
}

#[test]
fn truncation_reports_failing_parameter() {
    // Cut into the `names` tail; string[2] is parameter 1.
    let case = Case {
        declaration: "Tail(uint256 a, string[2] names)",
        signature: "Tail(uint256,string[2])",
        args: vec![uint(5, 256), DynSolValue::FixedArray(vec![string("x"), string("y")])],
    };
    let decoder = decoder_for(std::slice::from_ref(&case));
    let mut payload = encode(&case);
    payload.truncate(payload.len() - 32);
    match decoder.decode(&payload) {
        Err(DecodeError::MalformedPayload { param_index, offset, .. }) => {
            assert_eq!(param_index, 1);
            assert!(offset <= payload.len(), "offset {offset} beyond payload");
        }
        other => panic!("expected MalformedPayload, got {other:?}"),
    }
}

// ─── Documented scenarios ─────────────────────────────────────────────────────

fn insufficient_balance() -> AbiErrorDecoder {
    AbiErrorDecoder::new(
        InterfaceDescription::from_signatures(&[
            "InsufficientBalance(uint256 available, uint256 required)",
        ])
        .unwrap(),
    )
}

#[test]
fn insufficient_balance_example() {
    let mut payload = selector_of("InsufficientBalance(uint256,uint256)").to_vec();
    payload.extend_from_slice(&U256::from(100u64).to_be_bytes::<32>());
    payload.extend_from_slice(&U256::from(250u64).to_be_bytes::<32>());

    let result = insufficient_balance().decode(&payload).unwrap();
    assert_eq!(result.error_name, "InsufficientBalance");
    let values: Vec<String> = result.values().map(|v| v.to_string()).collect();
    assert_eq!(values, vec!["100", "250"]);
}

#[test]
fn insufficient_balance_selector_only() {
    let payload = selector_of("InsufficientBalance(uint256,uint256)");
    assert!(matches!(
        insufficient_balance().decode(&payload),
        Err(DecodeError::MalformedPayload { .. })
    ));
}

#[test]
fn arbitrary_selector_is_unknown() {
    assert!(matches!(
        insufficient_balance().decode(&[0x12, 0x34, 0x56, 0x78]),
        Err(DecodeError::UnknownSelector { .. })
    ));
}

#[test]
fn short_hex_is_invalid_encoding() {
    for hex_str in ["0x", "0x123456", "0xcf47"] {
        assert!(matches!(
            insufficient_balance().decode_hex(hex_str),
            Err(DecodeError::InvalidPayloadEncoding { .. })
        ));
    }
    assert!(matches!(
        insufficient_balance().decode_hex("0xnothex!"),
        Err(DecodeError::InvalidPayloadEncoding { .. })
    ));
}

#[test]
fn duplicate_signature_tie_break_is_deterministic() {
    let iface = InterfaceDescription::from_signatures(&[
        "Duplicate(address who, uint256 amount)",
        "Duplicate(address account, uint256 value)",
    ])
    .unwrap();
    let defs = iface.errors();
    assert_eq!(
        selector_of(&defs[0].signature()),
        selector_of(&defs[1].signature())
    );

    let decoder = AbiErrorDecoder::new(iface);
    let mut payload = selector_of("Duplicate(address,uint256)").to_vec();
    payload.extend(
        DynSolValue::Tuple(vec![
            DynSolValue::Address(Address::repeat_byte(0x33)),
            uint(1, 256),
        ])
        .abi_encode_params(),
    );

    let first = decoder.decode(&payload).unwrap();
    for _ in 0..10 {
        assert_eq!(decoder.decode(&payload).unwrap(), first);
    }
    assert_eq!(first.args[0].name, "who");
}

// ─── JSON ABI ─────────────────────────────────────────────────────────────────

#[test]
fn decode_against_foundry_artifact() {
    let artifact = serde_json::json!({
        "abi": [
            { "type": "constructor", "inputs": [] },
            { "type": "error", "name": "OrderExpired", "inputs": [
                { "name": "order", "type": "tuple", "internalType": "struct Order", "components": [
                    { "name": "maker", "type": "address", "internalType": "address" },
                    { "name": "deadline", "type": "uint64", "internalType": "uint64" }
                ] },
                { "name": "reason", "type": "string", "internalType": "string" }
            ] }
        ],
        "bytecode": { "object": "0x" }
    });
    let iface = InterfaceDescription::from_json(&artifact.to_string()).unwrap();
    let decoder = AbiErrorDecoder::new(iface);

    let args = vec![
        DynSolValue::Tuple(vec![
            DynSolValue::Address(Address::repeat_byte(0x44)),
            uint(1_700_000_000, 64),
        ]),
        string("too late"),
    ];
    let mut payload = selector_of("OrderExpired((address,uint64),string)").to_vec();
    payload.extend(DynSolValue::Tuple(args.clone()).abi_encode_params());

    let result = decoder.decode(&payload).unwrap();
    assert_eq!(result.error_name, "OrderExpired");
    let decoded: Vec<DynSolValue> = result.values().map(to_dyn).collect();
    assert_eq!(decoded, args);
}

// ─── Concurrency ──────────────────────────────────────────────────────────────

#[test]
fn shared_decoder_across_threads() {
    let cases = all_cases();
    let decoder = decoder_for(&cases);
    let payloads: Vec<Vec<u8>> = cases.iter().map(encode).collect();

    std::thread::scope(|s| {
        for payload in &payloads {
            let decoder = &decoder;
            s.spawn(move || {
                for _ in 0..50 {
                    decoder.decode(payload).unwrap();
                }
            });
        }
    });
}
