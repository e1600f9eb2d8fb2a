//! Error Display Tests.

use r3k_mmu::TlbError;

#[test]
fn wired_register_message_names_both_values() {
    let err = TlbError::WiredRegisterUnresponsive {
        expected: 3,
        found: 2,
    };
    assert_eq!(err.to_string(), "wired register unresponsive: wrote 3, read back 2");
}

#[test]
fn trampoline_size_message() {
    let err = TlbError::TrampolineSize {
        expected: 128,
        found: 64,
    };
    assert_eq!(err.to_string(), "trampoline image is 64 bytes, expected 128");
}

#[test]
fn other_messages() {
    assert_eq!(
        TlbError::WiredExhausted { capacity: 8 }.to_string(),
        "no free wired slot (8 already pinned)"
    );
    assert_eq!(TlbError::WiredUnsupported.to_string(), "this TLB has no wired entries");
    assert_eq!(TlbError::AlreadyInitialized.to_string(), "TLB already initialised");
    assert_eq!(
        TlbError::InvalidConfig("x".into()).to_string(),
        "invalid configuration: x"
    );
    assert_eq!(
        TlbError::TrampolineImage("y".into()).to_string(),
        "cannot load trampoline: y"
    );
}
