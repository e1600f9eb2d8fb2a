//! Global MMU Constants.
//!
//! This module defines the fixed R3000 memory-management constants. It includes:
//! 1. **Paging Constants:** Page size, shift and masks.
//! 2. **Segment Constants:** Base of the unmapped, cached KSEG0 window.
//! 3. **CP0 Field Constants:** EntryHi/EntryLo/Index field positions.
//! 4. **ASID Constants:** Identity field layout and allocator versioning.

/// Page size in bytes (4KB).
pub const PAGE_SIZE: u32 = 4096;

/// Number of bits to shift to convert between bytes and pages.
pub const PAGE_SHIFT: u32 = 12;

/// Mask selecting the page-aligned part of an address.
pub const PAGE_MASK: u32 = !(PAGE_SIZE - 1);

/// Base of KSEG0, the unmapped cached kernel segment (physical 0).
pub const KSEG0: u32 = 0x8000_0000;

/// Mask for the ASID field of EntryHi (bits 11..6).
pub const ASID_MASK: u32 = 0xfc0;

/// Distance between consecutive ASIDs in EntryHi encoding.
pub const ASID_INC: u64 = 0x40;

/// Number of hardware ASIDs.
pub const ASID_COUNT: usize = 64;

/// Mask for the allocator generation bits above the hardware ASID.
pub const ASID_VERSION_MASK: u64 = !((ASID_MASK as u64) | (ASID_INC - 1));

/// First allocator generation. Context `0` is reserved for "no identity yet".
pub const ASID_FIRST_VERSION: u64 = 0x1000;

/// EntryLo: non-cacheable.
pub const ENTRYLO_N: u32 = 1 << 11;

/// EntryLo: dirty (write enable).
pub const ENTRYLO_D: u32 = 1 << 10;

/// EntryLo: valid.
pub const ENTRYLO_V: u32 = 1 << 9;

/// EntryLo: global (ignore ASID on match).
pub const ENTRYLO_G: u32 = 1 << 8;

/// Bit position of the Index register's entry field.
pub const INDEX_SHIFT: u32 = 8;

/// Mask of the Index register's entry field (after shifting).
pub const INDEX_FIELD_MASK: u32 = 0x3f;

/// Index register probe-failure bit.
pub const INDEX_PROBE_FAIL: u32 = 1 << 31;

/// Largest TLB the Index register can address.
pub const MAX_TLB_ENTRIES: usize = 64;

/// Number of slots pinned below the Random floor on fixed-wired parts.
pub const FIXED_WIRED_SLOTS: usize = 8;

/// VPN bit that pushes flush tags into KSEG0 so they can never match.
pub const FLUSH_VPN_BASE: u32 = 0x80000;

/// Size of the general exception trampoline copied to KSEG0 at boot.
pub const TRAMPOLINE_SIZE: usize = 0x80;
