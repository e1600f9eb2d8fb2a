//! CP0 TLB register encodings.
//!
//! Typed wrappers over the raw 32-bit EntryHi, EntryLo and Index register values. An entry's
//! tag is its EntryHi (VPN + ASID) and its data is its EntryLo (PFN + N/D/V/G flags).

use std::fmt;

use super::addr::{PhysAddr, VirtAddr};
use super::constants::{
    ASID_MASK, ENTRYLO_D, ENTRYLO_G, ENTRYLO_N, ENTRYLO_V, FLUSH_VPN_BASE, INDEX_FIELD_MASK,
    INDEX_PROBE_FAIL, INDEX_SHIFT, KSEG0, PAGE_MASK, PAGE_SHIFT,
};

/// Hardware address-space identifier as it appears in EntryHi bits 11..6.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Asid(u32);

impl Asid {
    /// Extracts the hardware ASID from an allocator context word.
    pub const fn from_context(context: u64) -> Self {
        Self(context as u32 & ASID_MASK)
    }

    /// Builds an ASID from its ordinal (0..64).
    pub const fn from_ordinal(n: u32) -> Self {
        Self((n << 6) & ASID_MASK)
    }

    /// Returns the ordinal (0..64) of this ASID.
    pub const fn ordinal(self) -> u32 {
        self.0 >> 6
    }

    /// Returns the EntryHi-positioned bits.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Asid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal())
    }
}

/// EntryHi: the tag half of a TLB entry and the current-context register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntryHi(pub u32);

impl EntryHi {
    /// Tag for `page` under `asid`. The page offset is discarded.
    pub const fn new(page: VirtAddr, asid: Asid) -> Self {
        Self((page.0 & PAGE_MASK) | asid.bits())
    }

    /// Context-only value: VPN zero, just the ASID.
    pub const fn from_asid(asid: Asid) -> Self {
        Self(asid.bits())
    }

    /// Tag written into slot `index` by a full flush.
    ///
    /// The VPN lands in KSEG0, which is never translated, and is distinct per index so
    /// the flushed slots cannot alias each other either.
    pub const fn unmapped(index: usize) -> Self {
        Self((index as u32 | FLUSH_VPN_BASE) << PAGE_SHIFT)
    }

    /// Tag written over a single probed hit.
    pub const fn kseg0() -> Self {
        Self(KSEG0)
    }

    /// Virtual page base address.
    pub const fn page(self) -> VirtAddr {
        VirtAddr(self.0 & PAGE_MASK)
    }

    /// Virtual page number.
    pub const fn vpn(self) -> u32 {
        self.0 >> PAGE_SHIFT
    }

    /// ASID field.
    pub const fn asid(self) -> Asid {
        Asid(self.0 & ASID_MASK)
    }
}

/// EntryLo: the data half of a TLB entry, as carried in a page-table entry.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EntryLo(pub u32);

impl EntryLo {
    /// An entry with no mapping and every flag clear.
    pub const INVALID: Self = Self(0);

    /// Valid mapping to `frame` with no other flags.
    pub const fn new(frame: PhysAddr) -> Self {
        Self((frame.0 & PAGE_MASK) | ENTRYLO_V)
    }

    /// Valid mapping to the given physical frame number.
    pub const fn from_pfn(pfn: u32) -> Self {
        Self((pfn << PAGE_SHIFT) | ENTRYLO_V)
    }

    /// Sets the dirty (writable) bit.
    #[must_use]
    pub const fn dirty(self) -> Self {
        Self(self.0 | ENTRYLO_D)
    }

    /// Sets the global bit.
    #[must_use]
    pub const fn global(self) -> Self {
        Self(self.0 | ENTRYLO_G)
    }

    /// Sets the non-cacheable bit.
    #[must_use]
    pub const fn uncached(self) -> Self {
        Self(self.0 | ENTRYLO_N)
    }

    /// Physical frame number.
    pub const fn pfn(self) -> u32 {
        self.0 >> PAGE_SHIFT
    }

    /// Physical base address of the frame.
    pub const fn frame(self) -> PhysAddr {
        PhysAddr(self.0 & PAGE_MASK)
    }

    /// Whether the valid bit is set.
    pub const fn is_valid(self) -> bool {
        self.0 & ENTRYLO_V != 0
    }

    /// Whether the dirty bit is set.
    pub const fn is_dirty(self) -> bool {
        self.0 & ENTRYLO_D != 0
    }

    /// Whether the global bit is set.
    pub const fn is_global(self) -> bool {
        self.0 & ENTRYLO_G != 0
    }

    /// Whether the non-cacheable bit is set.
    pub const fn is_uncached(self) -> bool {
        self.0 & ENTRYLO_N != 0
    }
}

impl fmt::Debug for EntryLo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EntryLo(pfn={:#x}{}{}{}{})",
            self.pfn(),
            if self.is_uncached() { " N" } else { "" },
            if self.is_dirty() { " D" } else { "" },
            if self.is_valid() { " V" } else { "" },
            if self.is_global() { " G" } else { "" },
        )
    }
}

/// Raw Index register value.
///
/// The entry number lives in bits 13..8; bit 31 is set by a probe that found no match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Index(pub u32);

impl Index {
    /// Encodes an entry number.
    pub const fn new(entry: usize) -> Self {
        Self(((entry as u32) & INDEX_FIELD_MASK) << INDEX_SHIFT)
    }

    /// The value a failed probe leaves behind.
    pub const fn probe_failed() -> Self {
        Self(INDEX_PROBE_FAIL)
    }

    /// Entry number, or `None` when the probe-failure bit is set.
    pub const fn entry(self) -> Option<usize> {
        if self.0 & INDEX_PROBE_FAIL != 0 {
            None
        } else {
            Some(((self.0 >> INDEX_SHIFT) & INDEX_FIELD_MASK) as usize)
        }
    }
}
