//! Hardware interface for the R3000 TLB.
//!
//! The maintenance algorithms never touch CP0 directly. They run against these traits:
//! 1. **Registers:** [`TlbRegisters`] exposes the CP0 TLB registers plus `tlbp`, `tlbr`,
//!    `tlbwi` and `tlbwr`.
//! 2. **Interrupts:** [`InterruptControl`] saves and masks the interrupt enable, and
//!    [`CriticalSection`] scopes it.
//! 3. **Vector memory:** [`VectorMemory`] writes the exception trampoline and
//!    synchronises the instruction cache.
//! 4. **Model:** [`SimulatedTlb`] implements all three in software.

/// Interrupt masking and the critical-section guard.
pub mod irq;

/// Software model of the R3000/TX39 TLB and its CP0 registers.
pub mod sim;

pub use irq::{CriticalSection, InterruptControl, IrqState};
pub use sim::SimulatedTlb;

use crate::common::{EntryHi, EntryLo, PhysAddr, VirtAddr};

/// CP0 TLB registers and instructions.
///
/// Every method assumes the caller holds a [`CriticalSection`]; a multi-register sequence
/// interrupted half way leaves the staged tag and index in an undefined state.
pub trait TlbRegisters {
    /// Reads EntryHi (current VPN and ASID).
    fn entry_hi(&self) -> EntryHi;
    /// Writes EntryHi.
    fn set_entry_hi(&mut self, hi: EntryHi);
    /// Reads EntryLo.
    fn entry_lo(&self) -> EntryLo;
    /// Writes EntryLo.
    fn set_entry_lo(&mut self, lo: EntryLo);
    /// Selects the entry used by `write_indexed` and `read_indexed`.
    fn set_index(&mut self, entry: usize);
    /// Reads PageMask. Parts without variable page sizes return 0.
    fn page_mask(&self) -> u32;
    /// Writes PageMask.
    fn set_page_mask(&mut self, mask: u32);
    /// Reads the Wired register. Only meaningful on parts that have one.
    fn wired(&self) -> usize;
    /// Writes the Wired register.
    fn set_wired(&mut self, wired: usize);

    /// `tlbp`: looks up the staged EntryHi.
    ///
    /// # Returns
    ///
    /// The matching entry number, or `None` on a miss. A miss is a normal outcome.
    fn probe(&mut self) -> Option<usize>;
    /// `tlbr`: loads EntryHi and EntryLo from the selected entry.
    fn read_indexed(&mut self);
    /// `tlbwi`: stores EntryHi/EntryLo into the selected entry.
    fn write_indexed(&mut self);
    /// `tlbwr`: stores EntryHi/EntryLo into a hardware-chosen replaceable entry.
    fn write_random(&mut self);
}

/// Memory holding the general exception vector.
pub trait VectorMemory {
    /// Copies `bytes` to physical memory at `addr`.
    fn write_phys(&mut self, addr: PhysAddr, bytes: &[u8]);
    /// Makes instruction fetch observe stores to `[start, end)`.
    fn flush_icache_range(&mut self, start: VirtAddr, end: VirtAddr);
}

/// Everything the controller needs from one processor.
pub trait Cp0: TlbRegisters + InterruptControl + VectorMemory {}

impl<T: TlbRegisters + InterruptControl + VectorMemory> Cp0 for T {}
