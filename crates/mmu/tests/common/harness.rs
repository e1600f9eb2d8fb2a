use r3k_mmu::common::{Asid, EntryLo, VirtAddr};
use r3k_mmu::config::Config;
use r3k_mmu::hw::SimulatedTlb;
use r3k_mmu::hw::sim::SimEntry;
use r3k_mmu::mmu::{AddressSpace, TlbController, TrampolineImage};
use std::collections::HashSet;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub struct TestContext {
    pub ctl: TlbController<SimulatedTlb>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new(&Config::r3000())
    }
}

impl TestContext {
    pub fn new(config: &Config) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let hw = SimulatedTlb::new(&config.tlb);
        let ctl = TlbController::new(config, hw).expect("valid test config");
        Self { ctl }
    }

    pub fn r3000() -> Self {
        Self::new(&Config::r3000())
    }

    pub fn tx39() -> Self {
        Self::new(&Config::tx39())
    }

    /// Runs the startup sequence with a recognisable trampoline.
    pub fn booted(mut self) -> Self {
        let image = TrampolineImage::new(&trampoline_bytes()).expect("128-byte image");
        self.ctl.init(&image).expect("first init");
        self
    }

    pub fn tlb(&self) -> &SimulatedTlb {
        self.ctl.hw()
    }

    /// Creates an address space and makes it the running one.
    pub fn running_space(&mut self) -> AddressSpace {
        let mut space = AddressSpace::new();
        let _ = self.ctl.activate(&mut space);
        space
    }

    /// Switches to `space` and installs `page -> pfn` through the refill path.
    pub fn install(&mut self, space: &mut AddressSpace, page: u32, pfn: u32) {
        let _ = self.ctl.activate(space);
        self.ctl
            .update_mmu_cache(space, VirtAddr::new(page), EntryLo::from_pfn(pfn).dirty());
    }

    /// Looks `page` up under the space's current ASID without touching CP0 state.
    pub fn lookup(&self, space: &AddressSpace, page: u32) -> Option<SimEntry> {
        let asid = space.asid()?;
        self.lookup_asid(asid, page)
    }

    pub fn lookup_asid(&self, asid: Asid, page: u32) -> Option<SimEntry> {
        self.tlb()
            .lookup(VirtAddr::new(page), asid)
            .map(|(_, e)| e)
            .filter(|e| e.lo.is_valid())
    }

    /// Panics if two valid slots answer the same (VPN, ASID).
    pub fn assert_no_duplicates(&self) {
        let mut seen = HashSet::new();
        for (i, e) in self.tlb().live_entries() {
            let key = if e.lo.is_global() {
                (e.hi.vpn(), None)
            } else {
                (e.hi.vpn(), Some(e.hi.asid()))
            };
            assert!(seen.insert(key), "duplicate live entry at slot {i}: {e:?}");
        }
        assert!(!self.tlb().shutdown(), "probe matched more than one slot");
    }

    /// Panics if any TLB instruction ran with interrupts enabled.
    pub fn assert_masked(&self) {
        assert_eq!(self.tlb().unmasked_ops(), 0, "TLB instruction issued with interrupts on");
        assert!(self.tlb().interrupts_enabled(), "interrupts left disabled");
    }
}

pub fn trampoline_bytes() -> Vec<u8> {
    (0..0x80u32).map(|i| (i as u8) ^ 0xA5).collect()
}
