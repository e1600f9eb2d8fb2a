//! Software model of the R3000/TX39 TLB.
//!
//! A fully associative array of (EntryHi, EntryLo) pairs with the CP0 registers that
//! drive it. It models:
//! 1. **Probe:** VPN match plus ASID match unless the entry is global; a multi-way match
//!    latches the TLB-shutdown condition.
//! 2. **Replacement:** the Random register counts down from the top entry to the pinned
//!    floor (entry 8 on R3000, the Wired register on TX39) and wraps.
//! 3. **Interrupts:** the IEc bit, plus a count of TLB instructions issued while unmasked.
//! 4. **Memory:** low physical memory for the exception vector and an I-cache flush log.

use crate::common::constants::{ASID_MASK, MAX_TLB_ENTRIES};
use crate::common::{Asid, EntryHi, EntryLo, Index, PhysAddr, VirtAddr};
use crate::config::{TlbConfig, WiredMode};

use super::{InterruptControl, IrqState, TlbRegisters, VectorMemory};

/// Bytes of low physical memory backing the model (enough for the exception vectors).
const LOW_MEMORY: usize = 0x1000;

/// One hardware TLB slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimEntry {
    /// Tag.
    pub hi: EntryHi,
    /// Data.
    pub lo: EntryLo,
    /// Page mask latched at write time.
    pub page_mask: u32,
}

impl SimEntry {
    /// Whether this entry answers a lookup for `hi`.
    fn matches(&self, hi: EntryHi) -> bool {
        self.hi.vpn() == hi.vpn() && (self.lo.is_global() || self.hi.asid() == hi.asid())
    }
}

/// In-memory TLB with CP0 register semantics.
#[derive(Debug, Clone)]
pub struct SimulatedTlb {
    entries: Vec<SimEntry>,
    entry_hi: EntryHi,
    entry_lo: EntryLo,
    index: Index,
    page_mask: u32,
    random: usize,
    wired: usize,
    wired_mode: WiredMode,
    fixed_floor: usize,
    wired_stuck: bool,
    interrupts_enabled: bool,
    unmasked_ops: u64,
    shutdown: bool,
    memory: Vec<u8>,
    icache_flushes: Vec<(VirtAddr, VirtAddr)>,
}

impl SimulatedTlb {
    /// Creates a TLB shaped by `config`, with interrupts enabled.
    ///
    /// Every slot starts parked on a distinct, never-matching KSEG0 tag so the model is
    /// free of aliases before the first flush.
    pub fn new(config: &TlbConfig) -> Self {
        let size = config.entries.clamp(1, MAX_TLB_ENTRIES);
        let entries = (0..size)
            .map(|i| SimEntry {
                hi: EntryHi::unmapped(i),
                ..SimEntry::default()
            })
            .collect();

        Self {
            entries,
            entry_hi: EntryHi::default(),
            entry_lo: EntryLo::INVALID,
            index: Index::default(),
            page_mask: 0,
            random: size - 1,
            wired: 0,
            wired_mode: config.wired,
            fixed_floor: config.fixed_wired.min(size - 1),
            wired_stuck: false,
            interrupts_enabled: true,
            unmasked_ops: 0,
            shutdown: false,
            memory: vec![0; LOW_MEMORY],
            icache_flushes: Vec::new(),
        }
    }

    /// Makes the Wired register ignore writes, as on a part that lacks it.
    #[must_use]
    pub const fn with_stuck_wired(mut self) -> Self {
        self.wired_stuck = true;
        self
    }

    /// All slots in index order.
    pub fn entries(&self) -> &[SimEntry] {
        &self.entries
    }

    /// One slot.
    pub fn entry(&self, index: usize) -> Option<&SimEntry> {
        self.entries.get(index)
    }

    /// Side-effect-free lookup of `page` under `asid`.
    ///
    /// Unlike [`probe`](TlbRegisters::probe) this leaves EntryHi and Index untouched.
    ///
    /// # Returns
    ///
    /// The first matching slot and its contents.
    pub fn lookup(&self, page: VirtAddr, asid: Asid) -> Option<(usize, SimEntry)> {
        let hi = EntryHi::new(page, asid);
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.matches(hi))
            .map(|(i, e)| (i, *e))
    }

    /// Slots holding a valid mapping.
    pub fn live_entries(&self) -> impl Iterator<Item = (usize, &SimEntry)> {
        self.entries.iter().enumerate().filter(|(_, e)| e.lo.is_valid())
    }

    /// Lowest entry that random replacement may pick.
    pub fn random_floor(&self) -> usize {
        match self.wired_mode {
            WiredMode::None => 0,
            WiredMode::Fixed => self.fixed_floor,
            WiredMode::Register => self.wired.min(self.entries.len() - 1),
        }
    }

    /// Current value of the Random register.
    pub const fn random(&self) -> usize {
        self.random
    }

    /// Whether a probe has ever matched more than one slot.
    pub const fn shutdown(&self) -> bool {
        self.shutdown
    }

    /// Whether interrupts are currently enabled.
    pub const fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    /// Enables or disables interrupts directly, as an exception return would.
    pub const fn set_interrupts_enabled(&mut self, enabled: bool) {
        self.interrupts_enabled = enabled;
    }

    /// TLB instructions executed while interrupts were enabled.
    pub const fn unmasked_ops(&self) -> u64 {
        self.unmasked_ops
    }

    /// Low physical memory.
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// I-cache ranges flushed so far, oldest first.
    pub fn icache_flushes(&self) -> &[(VirtAddr, VirtAddr)] {
        &self.icache_flushes
    }

    /// Current ASID bits of EntryHi.
    pub const fn current_asid(&self) -> Asid {
        Asid::from_context((self.entry_hi.0 & ASID_MASK) as u64)
    }

    const fn note_op(&mut self) {
        if self.interrupts_enabled {
            self.unmasked_ops += 1;
        }
    }

    fn store(&mut self, slot: usize) {
        let entry = SimEntry {
            hi: self.entry_hi,
            lo: self.entry_lo,
            page_mask: self.page_mask,
        };
        if let Some(e) = self.entries.get_mut(slot) {
            *e = entry;
        }
    }

    fn step_random(&mut self) {
        let top = self.entries.len() - 1;
        let floor = self.random_floor();
        self.random = if self.random <= floor || self.random > top {
            top
        } else {
            self.random - 1
        };
    }
}

impl TlbRegisters for SimulatedTlb {
    fn entry_hi(&self) -> EntryHi {
        self.entry_hi
    }

    fn set_entry_hi(&mut self, hi: EntryHi) {
        self.entry_hi = hi;
    }

    fn entry_lo(&self) -> EntryLo {
        self.entry_lo
    }

    fn set_entry_lo(&mut self, lo: EntryLo) {
        self.entry_lo = lo;
    }

    fn set_index(&mut self, entry: usize) {
        self.index = Index::new(entry);
    }

    fn page_mask(&self) -> u32 {
        self.page_mask
    }

    fn set_page_mask(&mut self, mask: u32) {
        self.page_mask = mask;
    }

    fn wired(&self) -> usize {
        match self.wired_mode {
            WiredMode::Register => self.wired,
            WiredMode::None | WiredMode::Fixed => 0,
        }
    }

    fn set_wired(&mut self, wired: usize) {
        if self.wired_mode != WiredMode::Register || self.wired_stuck {
            return;
        }
        self.wired = wired.min(self.entries.len());
        // Writing Wired resets Random to the top entry.
        self.random = self.entries.len() - 1;
    }

    fn probe(&mut self) -> Option<usize> {
        self.note_op();
        let hi = self.entry_hi;
        let mut hits = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matches(hi))
            .map(|(i, _)| i);
        let first = hits.next();
        if hits.next().is_some() {
            self.shutdown = true;
        }
        self.index = first.map_or_else(Index::probe_failed, Index::new);
        first
    }

    fn read_indexed(&mut self) {
        self.note_op();
        let slot = ((self.index.0 >> 8) & 0x3f) as usize;
        if let Some(e) = self.entries.get(slot).copied() {
            self.entry_hi = e.hi;
            self.entry_lo = e.lo;
            self.page_mask = e.page_mask;
        }
    }

    fn write_indexed(&mut self) {
        self.note_op();
        let slot = ((self.index.0 >> 8) & 0x3f) as usize;
        self.store(slot);
    }

    fn write_random(&mut self) {
        self.note_op();
        let slot = self.random;
        self.store(slot);
        self.step_random();
    }
}

impl InterruptControl for SimulatedTlb {
    fn save_and_disable(&mut self) -> IrqState {
        let state = IrqState {
            enabled: self.interrupts_enabled,
        };
        self.interrupts_enabled = false;
        state
    }

    fn restore(&mut self, state: IrqState) {
        self.interrupts_enabled = state.enabled;
    }
}

impl VectorMemory for SimulatedTlb {
    fn write_phys(&mut self, addr: PhysAddr, bytes: &[u8]) {
        let start = addr.val() as usize;
        let end = start + bytes.len();
        if self.memory.len() < end {
            self.memory.resize(end, 0);
        }
        self.memory[start..end].copy_from_slice(bytes);
    }

    fn flush_icache_range(&mut self, start: VirtAddr, end: VirtAddr) {
        self.icache_flushes.push((start, end));
    }
}
