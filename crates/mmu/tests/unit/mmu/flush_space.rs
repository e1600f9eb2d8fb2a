//! Per-Space Invalidation Tests.
//!
//! Retiring an address space's ASID must make all of its entries unreachable under the
//! space's identity while leaving other spaces alone.

use crate::common::TestContext;
use r3k_mmu::mmu::AddressSpace;

#[test]
fn space_without_identity_is_a_no_op() {
    let mut ctx = TestContext::r3000().booted();
    let mut fresh = AddressSpace::new();

    ctx.ctl.flush_space(&mut fresh);

    assert!(!fresh.has_identity());
    assert_eq!(ctx.ctl.stats().flush_space, 0);
    assert_eq!(ctx.ctl.stats().asid_allocations, 0);
}

#[test]
fn retired_space_misses_everywhere() {
    let mut ctx = TestContext::r3000().booted();
    let mut space = ctx.running_space();
    for n in 0..5u32 {
        ctx.install(&mut space, 0x0040_0000 + (n << 12), 0x80 + n);
    }
    let old = space.asid().unwrap();

    ctx.ctl.flush_space(&mut space);

    let new = space.asid().unwrap();
    assert_ne!(old, new);
    for n in 0..5u32 {
        assert!(ctx.lookup(&space, 0x0040_0000 + (n << 12)).is_none());
    }
    ctx.assert_masked();
}

#[test]
fn active_space_reloads_entry_hi() {
    let mut ctx = TestContext::r3000().booted();
    let mut space = ctx.running_space();

    ctx.ctl.flush_space(&mut space);

    assert_eq!(Some(ctx.tlb().current_asid()), space.asid());
}

#[test]
fn inactive_space_leaves_entry_hi_alone() {
    let mut ctx = TestContext::r3000().booted();
    let mut background = ctx.running_space();
    let running = ctx.running_space();
    let running_asid = running.asid().unwrap();

    ctx.ctl.flush_space(&mut background);

    assert_eq!(ctx.tlb().current_asid(), running_asid);
    assert_ne!(background.asid(), Some(running_asid));
}

#[test]
fn other_spaces_keep_their_entries() {
    let mut ctx = TestContext::r3000().booted();
    let mut a = AddressSpace::new();
    let mut b = AddressSpace::new();
    ctx.install(&mut a, 0x2000, 0x9);
    ctx.install(&mut b, 0x2000, 0xA);

    ctx.ctl.flush_space(&mut a);

    assert!(ctx.lookup(&a, 0x2000).is_none());
    let hit = ctx.lookup(&b, 0x2000).expect("b still mapped");
    assert_eq!(hit.lo.pfn(), 0xA);
}

#[test]
fn refill_after_retire_uses_new_asid() {
    let mut ctx = TestContext::r3000().booted();
    let mut space = ctx.running_space();
    ctx.install(&mut space, 0x2000, 0x9);

    ctx.ctl.flush_space(&mut space);
    ctx.install(&mut space, 0x2000, 0xB);

    let hit = ctx.lookup(&space, 0x2000).expect("remapped");
    assert_eq!(hit.lo.pfn(), 0xB);
    assert_eq!(hit.hi.asid(), space.asid().unwrap());
    ctx.assert_no_duplicates();
}
