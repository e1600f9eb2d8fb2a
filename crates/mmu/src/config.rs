//! Configuration for the TLB controller.
//!
//! This module describes the hardware the controller drives. It provides:
//! 1. **Defaults:** R3000 TLB geometry (64 entries, eight fixed wired slots).
//! 2. **Structures:** The capability description consumed by the maintenance algorithms.
//! 3. **Presets:** `Config::r3000()` and `Config::tx39()`.
//!
//! Configuration is supplied as JSON (see [`Config::from_json`]) or built from a preset.

use serde::Deserialize;

use crate::common::TlbError;
use crate::common::constants::{FIXED_WIRED_SLOTS, MAX_TLB_ENTRIES};

/// Default configuration constants.
mod defaults {
    /// Entries in an R3000 TLB.
    pub const TLB_ENTRIES: usize = 64;

    /// Slots below the R3000 Random floor.
    pub const FIXED_WIRED: usize = super::FIXED_WIRED_SLOTS;
}

/// How the CPU keeps entries out of random replacement.
///
/// The maintenance algorithms consume this single value; there is no separate code path
/// per CPU model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WiredMode {
    /// No pinned region. Flushes sweep from entry 0.
    #[serde(alias = "none")]
    None,
    /// A fixed number of low entries sit below the Random floor (R2000/R3000).
    #[default]
    #[serde(alias = "fixed")]
    Fixed,
    /// A CP0 Wired register sets the floor (TX39xx).
    #[serde(alias = "register", alias = "WiredRegister")]
    Register,
}

/// TLB geometry and capabilities.
#[derive(Debug, Clone, Deserialize)]
pub struct TlbConfig {
    /// Number of TLB entries.
    #[serde(default = "TlbConfig::default_entries")]
    pub entries: usize,

    /// Pinning capability.
    #[serde(default)]
    pub wired: WiredMode,

    /// Size of the pinned region when `wired` is [`WiredMode::Fixed`].
    #[serde(default = "TlbConfig::default_fixed_wired")]
    pub fixed_wired: usize,
}

impl TlbConfig {
    /// Returns the default TLB entry count.
    fn default_entries() -> usize {
        defaults::TLB_ENTRIES
    }

    /// Returns the default number of fixed wired slots.
    fn default_fixed_wired() -> usize {
        defaults::FIXED_WIRED
    }
}

impl Default for TlbConfig {
    fn default() -> Self {
        Self {
            entries: defaults::TLB_ENTRIES,
            wired: WiredMode::default(),
            fixed_wired: defaults::FIXED_WIRED,
        }
    }
}

/// Root configuration for the controller.
///
/// # Examples
///
/// ```
/// use r3k_mmu::config::{Config, WiredMode};
///
/// let json = r#"{ "tlb": { "entries": 32, "wired": "Register" } }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.tlb.entries, 32);
/// assert_eq!(config.tlb.wired, WiredMode::Register);
/// assert_eq!(config.tlb.fixed_wired, 8);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// TLB configuration
    #[serde(default)]
    pub tlb: TlbConfig,
}

impl Config {
    /// R2000/R3000: 64 entries, eight fixed wired slots.
    pub fn r3000() -> Self {
        Self::default()
    }

    /// TX39xx with an R3000-style TLB and a Wired register.
    pub fn tx39() -> Self {
        Self {
            tlb: TlbConfig {
                wired: WiredMode::Register,
                ..TlbConfig::default()
            },
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TlbError::InvalidConfig`] if the JSON is malformed or describes
    /// hardware the controller cannot drive.
    pub fn from_json(json: &str) -> Result<Self, TlbError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TlbError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration fits the CP0 register layout.
    ///
    /// # Errors
    ///
    /// Returns [`TlbError::InvalidConfig`] if the entry count is zero or beyond what the
    /// Index register can address, or if the fixed wired region leaves no replaceable slot.
    pub fn validate(&self) -> Result<(), TlbError> {
        let tlb = &self.tlb;
        if tlb.entries == 0 || tlb.entries > MAX_TLB_ENTRIES {
            return Err(TlbError::InvalidConfig(format!(
                "tlb.entries must be 1..={MAX_TLB_ENTRIES}, got {}",
                tlb.entries
            )));
        }
        if tlb.wired == WiredMode::Fixed && tlb.fixed_wired >= tlb.entries {
            return Err(TlbError::InvalidConfig(format!(
                "tlb.fixed_wired ({}) must be below tlb.entries ({})",
                tlb.fixed_wired, tlb.entries
            )));
        }
        Ok(())
    }
}
