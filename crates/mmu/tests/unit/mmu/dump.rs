//! Diagnostic Dump Tests.

use crate::common::TestContext;
use pretty_assertions::assert_eq;
use r3k_mmu::common::EntryHi;
use r3k_mmu::hw::TlbRegisters;
use r3k_mmu::mmu::TlbSnapshot;

#[test]
fn dump_matches_the_model() {
    let mut ctx = TestContext::r3000().booted();
    let mut space = ctx.running_space();
    ctx.install(&mut space, 0x0040_0000, 0x12);

    let dump = ctx.ctl.dump();

    let expected: Vec<TlbSnapshot> = ctx
        .tlb()
        .entries()
        .iter()
        .enumerate()
        .map(|(index, e)| TlbSnapshot {
            index,
            hi: e.hi,
            lo: e.lo,
            page_mask: e.page_mask,
        })
        .collect();
    assert_eq!(dump, expected);
    assert_eq!(dump.iter().filter(|s| s.lo.is_valid()).count(), 1);
}

#[test]
fn dump_restores_registers() {
    let mut ctx = TestContext::r3000().booted();
    let mut space = ctx.running_space();
    ctx.install(&mut space, 0x0040_0000, 0x12);
    let hi = ctx.tlb().entry_hi();
    let lo = ctx.tlb().entry_lo();

    let _ = ctx.ctl.dump();

    assert_eq!(ctx.tlb().entry_hi(), hi);
    assert_eq!(ctx.tlb().entry_lo(), lo);
    assert_eq!(hi, EntryHi::from_asid(space.asid().unwrap()));
    assert!(ctx.lookup(&space, 0x0040_0000).is_some());
    ctx.assert_masked();
}
