//! Software-managed TLB controller for R3000-class MIPS processors.
//!
//! The R2000/R3000 TLB is a 64-entry, fully associative translation cache with no hardware
//! refill. This crate keeps it consistent with the page tables:
//! 1. **Common:** Address types, CP0 register encodings, constants and errors.
//! 2. **Hardware:** The CP0 register interface, interrupt masking and a software TLB model.
//! 3. **MMU:** ASID allocation, flushes, fault refill, wired entries and startup.
//! 4. **Configuration:** TLB geometry and wired-entry capability.
//! 5. **Statistics:** Counters for every maintenance operation.

/// Common types and constants (addresses, register encodings, errors).
pub mod common;
/// Controller configuration (TLB size, wired capability, presets).
pub mod config;
/// CP0 register interface, critical sections and the simulated TLB.
pub mod hw;
/// ASID management and TLB maintenance.
pub mod mmu;
/// Maintenance statistics.
pub mod stats;

/// Root configuration type; use `Config::r3000()`, `Config::tx39()` or `Config::from_json`.
pub use crate::config::Config;
/// Main controller type; wraps one processor's CP0 handle.
pub use crate::mmu::TlbController;
/// Address space as seen by the controller.
pub use crate::mmu::AddressSpace;
/// Error type for every fallible operation.
pub use crate::common::TlbError;
