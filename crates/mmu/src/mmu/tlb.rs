//! TLB maintenance.
//!
//! The R3000 TLB is a small, fully associative array with no hardware refill. Software keeps
//! it consistent with the page tables:
//! 1. **Flush all:** overwrite every non-wired slot with a tag that can never match.
//! 2. **Flush space:** retire the address space's ASID so its entries become unreachable.
//! 3. **Flush range / page:** probe each page and overwrite the hits.
//! 4. **Refill:** install a resolved PTE after a TLB miss, overwriting any existing match.
//!
//! Each operation is one critical section over the CP0 registers, and each restores the
//! ASID in EntryHi before interrupts come back on.

use tracing::{debug, trace, warn};

use crate::common::constants::ASID_COUNT;
use crate::common::{Asid, EntryHi, EntryLo, PAGE_SHIFT, TlbError, VirtAddr, pages_spanned};
use crate::config::{Config, TlbConfig, WiredMode};
use crate::hw::{CriticalSection, InterruptControl, TlbRegisters};
use crate::stats::TlbStats;

use super::asid::{AddressSpace, AsidAllocator, SpaceId};

/// One slot as read back by [`TlbController::dump`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TlbSnapshot {
    /// Slot number.
    pub index: usize,
    /// Tag.
    pub hi: EntryHi,
    /// Data.
    pub lo: EntryLo,
    /// Page mask.
    pub page_mask: u32,
}

/// Controller state that lives outside the hardware.
#[derive(Debug)]
pub(crate) struct TlbState {
    pub(crate) config: TlbConfig,
    pub(crate) asids: AsidAllocator,
    pub(crate) active: Option<SpaceId>,
    pub(crate) fixed_wired: usize,
    pub(crate) initialized: bool,
    pub(crate) stats: TlbStats,
}

/// First slot a flush may overwrite.
fn first_flushable<H: TlbRegisters + ?Sized>(config: &TlbConfig, hw: &H) -> usize {
    match config.wired {
        WiredMode::None => 0,
        WiredMode::Fixed => config.fixed_wired,
        WiredMode::Register => hw.wired(),
    }
}

/// Overwrites every non-wired slot with a parked KSEG0 tag. Caller holds the critical section.
fn sweep<H: TlbRegisters + ?Sized>(hw: &mut H, config: &TlbConfig, stats: &mut TlbStats) {
    let old = hw.entry_hi().asid();
    hw.set_entry_lo(EntryLo::INVALID);
    for entry in first_flushable(config, hw)..config.entries {
        hw.set_index(entry);
        hw.set_entry_hi(EntryHi::unmapped(entry));
        hw.write_indexed();
    }
    hw.set_entry_hi(EntryHi::from_asid(old));
    stats.flush_all += 1;
}

impl TlbState {
    pub(crate) fn sweep<H: TlbRegisters + ?Sized>(&mut self, hw: &mut H) {
        sweep(hw, &self.config, &mut self.stats);
    }

    /// Assigns `space` a fresh ASID, flushing first if the generation rolls over.
    fn assign<H: TlbRegisters + ?Sized>(&mut self, hw: &mut H, space: &mut AddressSpace) -> Asid {
        let asid = self.asids.allocate(space, || {
            debug!("asid generation rollover");
            self.stats.asid_rollovers += 1;
            sweep(hw, &self.config, &mut self.stats);
        });
        self.stats.asid_allocations += 1;
        asid
    }

    /// Makes every entry of `space` unreachable by moving it to a new ASID.
    pub(crate) fn retire<H: TlbRegisters + ?Sized>(&mut self, hw: &mut H, space: &mut AddressSpace) {
        let asid = self.assign(hw, space);
        if self.active == Some(space.id()) {
            hw.set_entry_hi(EntryHi::from_asid(asid));
        }
        self.stats.flush_space += 1;
    }

    /// Probes for `tag` and overwrites the matching slot, if any.
    ///
    /// Leaves EntryHi pointing into KSEG0; the caller restores it.
    fn invalidate_one<H: TlbRegisters + ?Sized>(&mut self, hw: &mut H, tag: EntryHi) -> bool {
        hw.set_entry_hi(tag);
        let hit = hw.probe();
        hw.set_entry_lo(EntryLo::INVALID);
        hw.set_entry_hi(EntryHi::kseg0());
        self.stats.record_probe(hit.is_some());
        if hit.is_some() {
            // Index still holds the probe result.
            hw.write_indexed();
        }
        hit.is_some()
    }
}

/// Software TLB controller for one processor.
///
/// Owns the hardware handle; every operation masks interrupts on it for its duration.
#[derive(Debug)]
pub struct TlbController<H> {
    pub(crate) hw: H,
    pub(crate) state: TlbState,
}

impl<H> TlbController<H> {
    /// Creates a controller for `hw`.
    ///
    /// Nothing is written to the hardware until the first operation; call
    /// [`init`](Self::init) before any translation activity.
    ///
    /// # Errors
    ///
    /// Returns [`TlbError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: &Config, hw: H) -> Result<Self, TlbError> {
        config.validate()?;
        Ok(Self {
            hw,
            state: TlbState {
                config: config.tlb.clone(),
                asids: AsidAllocator::new(),
                active: None,
                fixed_wired: 0,
                initialized: false,
                stats: TlbStats::default(),
            },
        })
    }

    /// Hardware handle.
    pub const fn hw(&self) -> &H {
        &self.hw
    }

    /// Mutable hardware handle.
    pub const fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Releases the hardware handle.
    pub fn into_inner(self) -> H {
        self.hw
    }

    /// TLB configuration in use.
    pub const fn config(&self) -> &TlbConfig {
        &self.state.config
    }

    /// ASID allocator.
    pub const fn asids(&self) -> &AsidAllocator {
        &self.state.asids
    }

    /// Address space currently running on this processor.
    pub const fn active(&self) -> Option<SpaceId> {
        self.state.active
    }

    /// Maintenance counters.
    pub const fn stats(&self) -> &TlbStats {
        &self.state.stats
    }

    /// Number of wired entries registered so far.
    pub const fn wired_count(&self) -> u64 {
        self.state.stats.wired_entries
    }
}

impl<H: TlbRegisters + InterruptControl> TlbController<H> {
    /// Switches this processor to `space`.
    ///
    /// Keeps the space's ASID if it belongs to the current generation, otherwise allocates
    /// one (flushing on rollover). Loads the ASID into EntryHi and marks the space active.
    pub fn activate(&mut self, space: &mut AddressSpace) -> Asid {
        let mut cs = CriticalSection::enter(&mut self.hw);
        let asid = if self.state.asids.is_current(space) {
            Asid::from_context(space.context())
        } else {
            self.state.assign(&mut *cs, space)
        };
        cs.set_entry_hi(EntryHi::from_asid(asid));
        self.state.active = Some(space.id());
        trace!(space = space.id().val(), %asid, "activate");
        asid
    }

    /// Invalidates every non-wired entry.
    pub fn flush_all(&mut self) {
        trace!("tlb flush all");
        let mut cs = CriticalSection::enter(&mut self.hw);
        self.state.sweep(&mut *cs);
    }

    /// Invalidates everything `space` has in the TLB.
    ///
    /// Does nothing for a space that never had an ASID. Otherwise the space moves to a
    /// new ASID; the old entries stay in the TLB but can no longer match.
    pub fn flush_space(&mut self, space: &mut AddressSpace) {
        if !space.has_identity() {
            return;
        }
        debug!(space = space.id().val(), context = space.context(), "tlb flush space");
        let mut cs = CriticalSection::enter(&mut self.hw);
        self.state.retire(&mut *cs, space);
    }

    /// Invalidates the pages of `space` covering `[start, end)`.
    ///
    /// Ranges longer than the TLB retire the whole address space instead of probing
    /// page by page.
    pub fn flush_range(&mut self, space: &mut AddressSpace, start: VirtAddr, end: VirtAddr) {
        let Some(asid) = space.asid() else {
            return;
        };
        let pages = pages_spanned(start, end) as usize;

        let mut cs = CriticalSection::enter(&mut self.hw);
        if pages > self.state.config.entries {
            debug!(space = space.id().val(), %asid, pages, "tlb flush range degraded");
            self.state.stats.flush_range_degraded += 1;
            self.state.retire(&mut *cs, space);
            return;
        }

        let old = cs.entry_hi().asid();
        let mut hits = 0_usize;
        if end > start {
            // Inclusive on the last VPN so a range ending in the top page still covers it.
            let last = VirtAddr(end.val() - 1).vpn();
            for vpn in start.vpn()..=last {
                let tag = EntryHi::new(VirtAddr(vpn << PAGE_SHIFT), asid);
                if self.state.invalidate_one(&mut *cs, tag) {
                    hits += 1;
                }
            }
        }
        cs.set_entry_hi(EntryHi::from_asid(old));
        self.state.stats.flush_range += 1;
        debug!(
            space = space.id().val(),
            %asid,
            start = start.val(),
            end = end.val(),
            pages,
            hits,
            "tlb flush range"
        );
    }

    /// Invalidates one page.
    ///
    /// With `None` the page is invalidated whoever owns it: every hardware ASID is probed
    /// and each hit overwritten. A space that never had an ASID is skipped.
    ///
    /// # Returns
    ///
    /// `true` if an entry was overwritten.
    pub fn flush_page(&mut self, space: Option<&AddressSpace>, page: VirtAddr) -> bool {
        if space.is_some_and(|s| !s.has_identity()) {
            return false;
        }
        trace!(space = ?space.map(|s| s.id().val()), page = page.val(), "tlb flush page");

        let page = page.page_base();
        let mut cs = CriticalSection::enter(&mut self.hw);
        let old = cs.entry_hi().asid();
        let hit = match space.and_then(AddressSpace::asid) {
            Some(asid) => self.state.invalidate_one(&mut *cs, EntryHi::new(page, asid)),
            None => {
                let mut any = false;
                for n in 0..ASID_COUNT as u32 {
                    let tag = EntryHi::new(page, Asid::from_ordinal(n));
                    any |= self.state.invalidate_one(&mut *cs, tag);
                }
                any
            }
        };
        cs.set_entry_hi(EntryHi::from_asid(old));
        self.state.stats.flush_page += 1;
        hit
    }

    /// Installs `pte` for `address` after a TLB miss or modify fault.
    ///
    /// Faults for a space other than the active one are ignored: the context switch they
    /// belonged to has already happened. An existing match is overwritten in place;
    /// otherwise hardware picks the victim slot.
    pub fn update_mmu_cache(&mut self, space: &AddressSpace, address: VirtAddr, pte: EntryLo) {
        if self.state.active != Some(space.id()) {
            trace!(space = space.id().val(), address = address.val(), "stale refill ignored");
            self.state.stats.refill_stale += 1;
            return;
        }

        let mut cs = CriticalSection::enter(&mut self.hw);
        let pid = cs.entry_hi().asid();
        if space.asid() != Some(pid) {
            warn!(space = space.id().val(), %pid, expected = ?space.asid(), "refill under foreign asid");
        }
        let tag = EntryHi::new(address.page_base(), pid);
        cs.set_entry_hi(tag);
        let hit = cs.probe();
        cs.set_entry_lo(pte);
        cs.set_entry_hi(tag);
        if hit.is_some() {
            cs.write_indexed();
            self.state.stats.refill_indexed += 1;
        } else {
            cs.write_random();
            self.state.stats.refill_random += 1;
        }
        self.state.stats.record_probe(hit.is_some());
        cs.set_entry_hi(EntryHi::from_asid(pid));
        trace!(address = address.val(), ?pte, slot = ?hit, "refill");
    }

    /// Reads back every slot.
    pub fn dump(&mut self) -> Vec<TlbSnapshot> {
        let entries = self.state.config.entries;
        let mut cs = CriticalSection::enter(&mut self.hw);
        let (hi, lo, mask) = (cs.entry_hi(), cs.entry_lo(), cs.page_mask());
        let mut out = Vec::with_capacity(entries);
        for index in 0..entries {
            cs.set_index(index);
            cs.read_indexed();
            out.push(TlbSnapshot {
                index,
                hi: cs.entry_hi(),
                lo: cs.entry_lo(),
                page_mask: cs.page_mask(),
            });
        }
        cs.set_entry_hi(hi);
        cs.set_entry_lo(lo);
        cs.set_page_mask(mask);
        out
    }
}
