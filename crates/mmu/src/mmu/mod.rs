//! Software TLB management.
//!
//! This module implements the maintenance side of the R3000 MMU:
//! 1. **Identities:** ASID allocation with generation rollover (`asid`).
//! 2. **Maintenance:** Flushes and refill over the CP0 interface (`tlb`).
//! 3. **Pinning:** Wired entry registration (`wired`).
//! 4. **Startup:** Initial flush and exception trampoline installation (`startup`).

/// Address spaces and the ASID allocator.
pub mod asid;

/// One-time startup sequence.
pub mod startup;

/// The TLB controller and its flush/refill operations.
pub mod tlb;

/// Wired entry registration.
pub mod wired;

pub use asid::{AddressSpace, AsidAllocator, SpaceId};
pub use startup::{TrampolineImage, VECTOR_BASE};
pub use tlb::{TlbController, TlbSnapshot};
pub use wired::WiredEntry;
