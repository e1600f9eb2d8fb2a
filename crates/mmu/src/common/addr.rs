//! Physical and Virtual Address types.
//!
//! This module defines strong types for physical and virtual addresses to prevent
//! accidental mixing of address spaces. It provides the following:
//! 1. **Type Safety:** Distinguishes between virtual and physical address spaces at compile time.
//! 2. **Page Arithmetic:** Page alignment and page-number extraction.
//! 3. **Segment Mapping:** Conversion between KSEG0 virtual addresses and physical addresses.

use super::constants::{KSEG0, PAGE_MASK, PAGE_SHIFT, PAGE_SIZE};

/// A 32-bit virtual address.
///
/// Virtual addresses in KUSEG are translated through the TLB; KSEG0 and KSEG1 are
/// hard-wired windows onto the low 512MB of physical memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub u32);

/// A 32-bit physical address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u32);

impl VirtAddr {
    /// Creates a new virtual address from a raw 32-bit value.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }

    /// Extracts the byte offset within the 4KB page.
    pub const fn page_offset(self) -> u32 {
        self.0 & !PAGE_MASK
    }

    /// Returns the address rounded down to its page boundary.
    #[inline(always)]
    pub const fn page_base(self) -> Self {
        Self(self.0 & PAGE_MASK)
    }

    /// Returns the virtual page number.
    pub const fn vpn(self) -> u32 {
        self.0 >> PAGE_SHIFT
    }

    /// Returns the physical address behind a KSEG0 virtual address.
    ///
    /// # Returns
    ///
    /// `None` if the address lies outside KSEG0.
    pub const fn kseg0_to_phys(self) -> Option<PhysAddr> {
        if self.0 >= KSEG0 && self.0 < KSEG0 + 0x2000_0000 {
            Some(PhysAddr(self.0 - KSEG0))
        } else {
            None
        }
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw 32-bit value.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }

    /// Returns the physical frame number.
    pub const fn pfn(self) -> u32 {
        self.0 >> PAGE_SHIFT
    }
}

impl From<u32> for VirtAddr {
    fn from(addr: u32) -> Self {
        Self(addr)
    }
}

impl From<u32> for PhysAddr {
    fn from(addr: u32) -> Self {
        Self(addr)
    }
}

/// Rounded-up page count of the byte length `end - start`.
///
/// This is the figure compared against TLB capacity when deciding whether a ranged
/// flush should degrade to retiring the whole address space.
pub const fn pages_spanned(start: VirtAddr, end: VirtAddr) -> u32 {
    if end.0 <= start.0 {
        return 0;
    }
    let len = (end.0 - start.0) as u64;
    ((len + PAGE_SIZE as u64 - 1) >> PAGE_SHIFT) as u32
}
