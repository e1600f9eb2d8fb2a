//! Wired (pinned) TLB entries.
//!
//! Wired entries sit below the Random floor, so hardware replacement never picks them and
//! full flushes start above them. They are only ever added, during early boot or when a
//! fixed kernel mapping is installed.

use tracing::{debug, error, warn};

use crate::common::{EntryHi, EntryLo, TlbError};
use crate::config::WiredMode;
use crate::hw::{CriticalSection, InterruptControl, TlbRegisters};

use super::tlb::TlbController;

/// A permanent mapping to pin into the TLB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WiredEntry {
    /// Tag, including the ASID unless `lo` is global.
    pub hi: EntryHi,
    /// Data.
    pub lo: EntryLo,
    /// Page mask for parts with variable page sizes; 0 for 4KB.
    pub page_mask: u32,
}

impl WiredEntry {
    /// A 4KB wired mapping.
    pub const fn new(hi: EntryHi, lo: EntryLo) -> Self {
        Self {
            hi,
            lo,
            page_mask: 0,
        }
    }

    /// Sets the page mask.
    #[must_use]
    pub const fn with_page_mask(mut self, page_mask: u32) -> Self {
        self.page_mask = page_mask;
        self
    }
}

impl<H: TlbRegisters + InterruptControl> TlbController<H> {
    /// Pins `entry` into the next wired slot and flushes the rest of the TLB.
    ///
    /// With a Wired register the register is bumped and read back; otherwise a software
    /// counter tracks the fixed low slots.
    ///
    /// # Returns
    ///
    /// The slot the entry was written to.
    ///
    /// # Errors
    ///
    /// - [`TlbError::WiredRegisterUnresponsive`] if the Wired register does not hold the
    ///   value just written. This is fatal: the pinned region is no longer known.
    /// - [`TlbError::WiredExhausted`] if no slot is left.
    /// - [`TlbError::WiredUnsupported`] if the CPU has no wired entries.
    pub fn add_wired_entry(&mut self, entry: WiredEntry) -> Result<usize, TlbError> {
        let mode = self.state.config.wired;
        let entries = self.state.config.entries;

        let mut cs = CriticalSection::enter(&mut self.hw);
        let old_hi = EntryHi::from_asid(cs.entry_hi().asid());
        let old_mask = cs.page_mask();

        let slot = match mode {
            WiredMode::None => {
                warn!("wired entry requested on a TLB without wired slots");
                return Err(TlbError::WiredUnsupported);
            }
            WiredMode::Register => {
                let wired = cs.wired();
                if wired + 1 >= entries {
                    warn!(wired, "wired region full");
                    return Err(TlbError::WiredExhausted {
                        capacity: entries - 1,
                    });
                }
                cs.set_wired(wired + 1);
                let found = cs.wired();
                if found != wired + 1 {
                    error!(expected = wired + 1, found, "wired register did not take write");
                    return Err(TlbError::WiredRegisterUnresponsive {
                        expected: wired + 1,
                        found,
                    });
                }
                wired
            }
            WiredMode::Fixed => {
                let capacity = self.state.config.fixed_wired;
                let wired = self.state.fixed_wired;
                if wired >= capacity {
                    warn!(wired, "wired region full");
                    return Err(TlbError::WiredExhausted { capacity });
                }
                self.state.fixed_wired += 1;
                wired
            }
        };

        debug!(slot, hi = ?entry.hi, lo = ?entry.lo, page_mask = entry.page_mask, "tlb wired");
        cs.set_index(slot);
        cs.set_page_mask(entry.page_mask);
        cs.set_entry_hi(entry.hi);
        cs.set_entry_lo(entry.lo);
        cs.write_indexed();

        cs.set_entry_hi(old_hi);
        cs.set_page_mask(old_mask);
        self.state.sweep(&mut *cs);
        self.state.stats.wired_entries += 1;
        Ok(slot)
    }
}
