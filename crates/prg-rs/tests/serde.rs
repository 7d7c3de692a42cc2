//! Serde round-trip tests for `prg_rs` public types.
//!
//! Validates that the public value types serialize to JSON and
//! deserialize back to identical values.

#![cfg(feature = "serde")]

use prg_rs::{
    generate_with, BasicStub, FixupKind, FixupSite, Payload, PrgError, TargetConfig,
};

/// Helper: serialize to JSON, deserialize back, assert equality.
fn round_trip<T>(val: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + core::fmt::Debug,
{
    let json = serde_json::to_string(val).expect("serialize");
    let back: T = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(val, &back, "round-trip mismatch for JSON: {json}");
}

#[test]
fn serde_fixup_kind() {
    round_trip(&FixupKind::AbsoluteLow);
    round_trip(&FixupKind::AbsoluteHigh);
    round_trip(&FixupKind::RelativeBranch);
}

#[test]
fn serde_fixup_site() {
    round_trip(&FixupSite {
        offset: 6,
        kind: FixupKind::AbsoluteLow,
        label: "message".into(),
    });
}

#[test]
fn serde_target_config() {
    round_trip(&TargetConfig::c64());
    round_trip(&TargetConfig {
        load_address: 0xC000,
        space_after_sys: false,
        ..TargetConfig::c64()
    });
}

#[test]
fn serde_payload() {
    round_trip(&Payload::MessageWaitKey {
        message: "HELLO".into(),
    });
    round_trip(&Payload::PrintLiteral { text: "HI".into() });
}

#[test]
fn serde_basic_stub() {
    round_trip(&BasicStub::sys(&TargetConfig::c64()).unwrap());
}

#[test]
fn serde_prg_image() {
    let payload = Payload::MessageWaitKey {
        message: "HELLO".into(),
    };
    round_trip(&generate_with(TargetConfig::c64(), &payload).unwrap());
}

#[test]
fn serde_errors() {
    round_trip(&PrgError::LayoutOverflow {
        load_address: 0x0801,
        iterations: 5,
    });
    round_trip(&PrgError::BranchRangeExceeded {
        label: "done".into(),
        disp: 300,
        offset: 9,
    });
    round_trip(&PrgError::UnresolvedLabel {
        label: "waitkey".into(),
        offset: 18,
    });
    round_trip(&PrgError::DuplicateLabel {
        label: "loop".into(),
        offset: 20,
        first_offset: 5,
    });
    round_trip(&PrgError::AddressOverflow { address: 0x10000 });
}
