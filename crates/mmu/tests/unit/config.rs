//! Configuration Tests.
//!
//! Verifies JSON parsing with defaults, the CPU presets and range validation.

use r3k_mmu::TlbError;
use r3k_mmu::config::{Config, WiredMode};

// ══════════════════════════════════════════════════════════
// 1. Presets
// ══════════════════════════════════════════════════════════

#[test]
fn r3000_preset() {
    let config = Config::r3000();
    assert_eq!(config.tlb.entries, 64);
    assert_eq!(config.tlb.wired, WiredMode::Fixed);
    assert_eq!(config.tlb.fixed_wired, 8);
    assert!(config.validate().is_ok());
}

#[test]
fn tx39_preset_uses_wired_register() {
    let config = Config::tx39();
    assert_eq!(config.tlb.entries, 64);
    assert_eq!(config.tlb.wired, WiredMode::Register);
    assert!(config.validate().is_ok());
}

// ══════════════════════════════════════════════════════════
// 2. JSON
// ══════════════════════════════════════════════════════════

#[test]
fn empty_json_is_r3000() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.tlb.entries, 64);
    assert_eq!(config.tlb.wired, WiredMode::Fixed);
    assert_eq!(config.tlb.fixed_wired, 8);
}

#[test]
fn wired_mode_accepts_aliases() {
    for (name, mode) in [
        ("None", WiredMode::None),
        ("none", WiredMode::None),
        ("Fixed", WiredMode::Fixed),
        ("fixed", WiredMode::Fixed),
        ("Register", WiredMode::Register),
        ("register", WiredMode::Register),
        ("WiredRegister", WiredMode::Register),
    ] {
        let json = format!(r#"{{ "tlb": {{ "wired": "{name}" }} }}"#);
        let config = Config::from_json(&json).unwrap();
        assert_eq!(config.tlb.wired, mode, "alias {name}");
    }
}

#[test]
fn partial_tlb_section_keeps_defaults() {
    let config = Config::from_json(r#"{ "tlb": { "fixed_wired": 4 } }"#).unwrap();
    assert_eq!(config.tlb.entries, 64);
    assert_eq!(config.tlb.fixed_wired, 4);
}

#[test]
fn malformed_json_is_invalid_config() {
    let err = Config::from_json("{ tlb: ").unwrap_err();
    assert!(matches!(err, TlbError::InvalidConfig(_)));
}

#[test]
fn unknown_wired_mode_rejected() {
    let err = Config::from_json(r#"{ "tlb": { "wired": "Sometimes" } }"#).unwrap_err();
    assert!(matches!(err, TlbError::InvalidConfig(_)));
}

// ══════════════════════════════════════════════════════════
// 3. Validation
// ══════════════════════════════════════════════════════════

#[test]
fn zero_entries_rejected() {
    let err = Config::from_json(r#"{ "tlb": { "entries": 0 } }"#).unwrap_err();
    assert!(matches!(err, TlbError::InvalidConfig(_)));
}

#[test]
fn more_entries_than_index_can_address_rejected() {
    let err = Config::from_json(r#"{ "tlb": { "entries": 65 } }"#).unwrap_err();
    assert!(matches!(err, TlbError::InvalidConfig(_)));
}

#[test]
fn fixed_region_must_leave_a_replaceable_slot() {
    let err = Config::from_json(r#"{ "tlb": { "entries": 8, "fixed_wired": 8 } }"#).unwrap_err();
    assert!(matches!(err, TlbError::InvalidConfig(_)));
}

#[test]
fn fixed_wired_ignored_without_fixed_mode() {
    let json = r#"{ "tlb": { "entries": 8, "fixed_wired": 8, "wired": "Register" } }"#;
    assert!(Config::from_json(json).is_ok());
}

#[test]
fn small_tlb_accepted() {
    let config = Config::from_json(r#"{ "tlb": { "entries": 16, "wired": "None" } }"#).unwrap();
    assert_eq!(config.tlb.entries, 16);
}
