//! TLB maintenance statistics.
//!
//! Counts what the controller asked the hardware to do. It tracks:
//! 1. **Invalidation:** Full flushes, per-space retirements, ranged and single-page flushes.
//! 2. **Probing:** Probe hits and misses across all probe-driven operations.
//! 3. **Refill:** Installs by replacement versus in-place overwrite, and stale faults ignored.
//! 4. **Identity:** ASID allocations and generation rollovers.

/// Counters for every maintenance operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TlbStats {
    /// Full (non-wired) flushes.
    pub flush_all: u64,
    /// Per-address-space invalidations that retired an ASID.
    pub flush_space: u64,
    /// Ranged flushes that probed page by page.
    pub flush_range: u64,
    /// Ranged flushes that degraded to a per-space invalidation.
    pub flush_range_degraded: u64,
    /// Single-page flushes.
    pub flush_page: u64,
    /// Probes that found a matching entry.
    pub probe_hits: u64,
    /// Probes that found nothing.
    pub probe_misses: u64,
    /// Fault installs that let hardware pick the slot.
    pub refill_random: u64,
    /// Fault installs that overwrote an existing match.
    pub refill_indexed: u64,
    /// Fault installs skipped because the space was not active.
    pub refill_stale: u64,
    /// ASIDs handed out.
    pub asid_allocations: u64,
    /// ASID generation rollovers (each forces a full flush).
    pub asid_rollovers: u64,
    /// Wired entries registered.
    pub wired_entries: u64,
}

impl TlbStats {
    /// Records the outcome of one probe.
    pub(crate) const fn record_probe(&mut self, hit: bool) {
        if hit {
            self.probe_hits += 1;
        } else {
            self.probe_misses += 1;
        }
    }

    /// Fraction of probes that hit, or 0.0 when nothing was probed.
    pub fn probe_hit_rate(&self) -> f64 {
        let total = self.probe_hits + self.probe_misses;
        if total == 0 {
            0.0
        } else {
            self.probe_hits as f64 / total as f64
        }
    }

    /// Prints a summary to stdout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("TLB MAINTENANCE STATISTICS");
        println!("==========================================================");
        println!("flush.all                {}", self.flush_all);
        println!("flush.space              {}", self.flush_space);
        println!("flush.range              {}", self.flush_range);
        println!("flush.range.degraded     {}", self.flush_range_degraded);
        println!("flush.page               {}", self.flush_page);
        println!("----------------------------------------------------------");
        println!("probe.hits               {}", self.probe_hits);
        println!("probe.misses             {}", self.probe_misses);
        println!("probe.hit_rate           {:.2}%", self.probe_hit_rate() * 100.0);
        println!("----------------------------------------------------------");
        println!("refill.random            {}", self.refill_random);
        println!("refill.indexed           {}", self.refill_indexed);
        println!("refill.stale             {}", self.refill_stale);
        println!("----------------------------------------------------------");
        println!("asid.allocations         {}", self.asid_allocations);
        println!("asid.rollovers           {}", self.asid_rollovers);
        println!("wired.entries            {}", self.wired_entries);
        println!("==========================================================");
    }
}
