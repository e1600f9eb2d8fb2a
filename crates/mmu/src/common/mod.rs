//! Common types and constants used throughout the TLB controller.
//!
//! This module provides the building blocks shared by the hardware interface and the
//! maintenance algorithms. It includes:
//! 1. **Address Types:** Strong types for virtual and physical addresses.
//! 2. **Constants:** Page geometry, segment bases and CP0 field layouts.
//! 3. **Register Encodings:** EntryHi, EntryLo, Index and ASID.
//! 4. **Error Handling:** The controller's error type.

/// Address type definitions (physical and virtual addresses).
pub mod addr;

/// R3000 paging, segment and CP0 constants.
pub mod constants;

/// CP0 TLB register encodings.
pub mod entry;

/// Error types.
pub mod error;

pub use addr::{PhysAddr, VirtAddr, pages_spanned};
pub use constants::{KSEG0, PAGE_SHIFT, PAGE_SIZE};
pub use entry::{Asid, EntryHi, EntryLo, Index};
pub use error::TlbError;
