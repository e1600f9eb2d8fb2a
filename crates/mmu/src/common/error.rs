//! Error definitions.
//!
//! A TLB miss is never an error. The variants here cover the only conditions that cannot be
//! handled at this layer:
//! 1. **Hardware contract violations:** a CP0 register that does not reflect a write.
//! 2. **Exhausted or missing capabilities:** wired slots, one-shot startup.
//! 3. **Invalid inputs:** configuration and exception-vector images.

use thiserror::Error;

/// Errors reported by the TLB controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TlbError {
    /// The Wired register did not take the incremented value.
    ///
    /// Continuing would leave the pinned region and the flush sweep in disagreement, so
    /// callers must treat this as fatal.
    #[error("wired register unresponsive: wrote {expected}, read back {found}")]
    WiredRegisterUnresponsive {
        /// Value written to the register.
        expected: usize,
        /// Value read back.
        found: usize,
    },

    /// Every pinnable slot is already in use.
    #[error("no free wired slot ({capacity} already pinned)")]
    WiredExhausted {
        /// Number of slots that can be pinned.
        capacity: usize,
    },

    /// The configured CPU cannot pin entries.
    #[error("this TLB has no wired entries")]
    WiredUnsupported,

    /// The startup sequence was requested a second time.
    #[error("TLB already initialised")]
    AlreadyInitialized,

    /// The exception trampoline is not the size the vector slot requires.
    #[error("trampoline image is {found} bytes, expected {expected}")]
    TrampolineSize {
        /// Required size in bytes.
        expected: usize,
        /// Supplied size in bytes.
        found: usize,
    },

    /// The trampoline could not be extracted from an ELF image.
    #[error("cannot load trampoline: {0}")]
    TrampolineImage(String),

    /// The configuration is out of range for the hardware.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
