//! Context Switch Tests.
//!
//! Verifies ASID assignment through `TlbController::activate`:
//! - First activation assigns a fresh ASID and loads it into EntryHi
//! - Re-activation within a generation keeps the ASID
//! - Generation rollover flushes before any ASID is reused

use crate::common::TestContext;
use r3k_mmu::common::Asid;
use r3k_mmu::common::constants::ASID_COUNT;
use r3k_mmu::mmu::AddressSpace;

// ══════════════════════════════════════════════════════════
// 1. Assignment
// ══════════════════════════════════════════════════════════

#[test]
fn first_activation_assigns_and_loads_asid() {
    let mut ctx = TestContext::r3000().booted();
    let mut space = AddressSpace::new();
    assert!(!space.has_identity());

    let asid = ctx.ctl.activate(&mut space);

    assert_eq!(asid, Asid::from_ordinal(1));
    assert_eq!(space.asid(), Some(asid));
    assert_eq!(ctx.tlb().current_asid(), asid);
    assert_eq!(ctx.ctl.active(), Some(space.id()));
    ctx.assert_masked();
}

#[test]
fn reactivation_keeps_asid() {
    let mut ctx = TestContext::r3000();
    let mut a = AddressSpace::new();
    let mut b = AddressSpace::new();

    let first = ctx.ctl.activate(&mut a);
    let _ = ctx.ctl.activate(&mut b);
    let again = ctx.ctl.activate(&mut a);

    assert_eq!(first, again);
    assert_eq!(ctx.ctl.stats().asid_allocations, 2);
    assert_eq!(ctx.tlb().current_asid(), first);
}

#[test]
fn live_spaces_have_distinct_asids() {
    let mut ctx = TestContext::r3000();
    let mut spaces: Vec<AddressSpace> = (0..40).map(|_| AddressSpace::new()).collect();
    for space in &mut spaces {
        let _ = ctx.ctl.activate(space);
    }
    let mut asids: Vec<_> = spaces.iter().filter_map(AddressSpace::asid).collect();
    asids.sort();
    asids.dedup();
    assert_eq!(asids.len(), 40);
}

// ══════════════════════════════════════════════════════════
// 2. Rollover
// ══════════════════════════════════════════════════════════

#[test]
fn rollover_flushes_before_reuse() {
    let mut ctx = TestContext::r3000().booted();
    let mut old = AddressSpace::new();
    ctx.install(&mut old, 0x4000, 0x11);
    assert_eq!(old.asid(), Some(Asid::from_ordinal(1)));
    let flushes_before = ctx.ctl.stats().flush_all;

    // 62 more fill the first generation; the next starts the second at ASID 0, then 1.
    let mut others: Vec<AddressSpace> = (0..ASID_COUNT).map(|_| AddressSpace::new()).collect();
    for space in &mut others {
        let _ = ctx.ctl.activate(space);
    }

    assert_eq!(ctx.ctl.stats().asid_rollovers, 1);
    assert_eq!(ctx.ctl.stats().flush_all, flushes_before + 1);
    let reused = others
        .iter()
        .find(|s| s.asid() == Some(Asid::from_ordinal(1)))
        .expect("ASID 1 handed out again");
    assert!(ctx.lookup(reused, 0x4000).is_none());
    assert_eq!(ctx.tlb().live_entries().count(), 0);
}

#[test]
fn stale_generation_gets_new_asid() {
    let mut ctx = TestContext::r3000();
    let mut old = AddressSpace::new();
    let _ = ctx.ctl.activate(&mut old);
    let before = old.context();

    // Each per-space flush retires the filler's ASID and takes the next one.
    let mut filler = AddressSpace::new();
    let _ = ctx.ctl.activate(&mut filler);
    for _ in 0..ASID_COUNT {
        ctx.ctl.flush_space(&mut filler);
    }
    assert_eq!(ctx.ctl.stats().asid_rollovers, 1);

    let _ = ctx.ctl.activate(&mut old);
    assert_ne!(old.context(), before);
    assert!(ctx.ctl.asids().is_current(&old));
}
