//! Address-space identities.
//!
//! Every address space that has run on the CPU carries a context word: the hardware ASID in
//! bits 11..6 and the allocator generation above that. Context `0` means the space has never
//! been given an identity, so no TLB entry can exist for it.
//!
//! The allocator hands out ASIDs from a global cursor. When the ASID bits of the cursor wrap,
//! every previously issued ASID becomes ambiguous: the whole TLB is flushed before the new
//! generation's first ASID is used, and spaces from older generations get a fresh ASID the
//! next time they are activated.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::Asid;
use crate::common::constants::{ASID_FIRST_VERSION, ASID_INC, ASID_MASK, ASID_VERSION_MASK};

static NEXT_SPACE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique handle for an address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpaceId(u64);

impl SpaceId {
    /// Raw value.
    pub const fn val(self) -> u64 {
        self.0
    }
}

/// The parts of an address space the TLB controller reads and updates.
///
/// The page tables themselves belong to the memory manager.
#[derive(Debug)]
pub struct AddressSpace {
    id: SpaceId,
    context: u64,
}

impl AddressSpace {
    /// Creates an address space with no identity.
    pub fn new() -> Self {
        Self {
            id: SpaceId(NEXT_SPACE_ID.fetch_add(1, Ordering::Relaxed)),
            context: 0,
        }
    }

    /// Unique handle.
    pub const fn id(&self) -> SpaceId {
        self.id
    }

    /// Context word (generation and ASID), or 0 if never activated.
    pub const fn context(&self) -> u64 {
        self.context
    }

    /// Whether an ASID has ever been assigned.
    pub const fn has_identity(&self) -> bool {
        self.context != 0
    }

    /// Hardware ASID, if one has been assigned.
    pub const fn asid(&self) -> Option<Asid> {
        if self.context == 0 {
            None
        } else {
            Some(Asid::from_context(self.context))
        }
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

/// Generation-tagged ASID allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsidAllocator {
    cursor: u64,
}

impl AsidAllocator {
    /// Creates an allocator at the first generation.
    pub const fn new() -> Self {
        Self {
            cursor: ASID_FIRST_VERSION,
        }
    }

    /// Last context handed out (or the initial generation base).
    pub const fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Current generation bits.
    pub const fn generation(&self) -> u64 {
        self.cursor & ASID_VERSION_MASK
    }

    /// Whether `space` holds an ASID issued in the current generation.
    pub const fn is_current(&self, space: &AddressSpace) -> bool {
        space.context != 0 && (space.context ^ self.cursor) & ASID_VERSION_MASK == 0
    }

    /// Gives `space` a fresh ASID.
    ///
    /// `on_rollover` runs before the first ASID of a new generation is assigned and must
    /// invalidate every non-wired TLB entry.
    pub fn allocate(&mut self, space: &mut AddressSpace, on_rollover: impl FnOnce()) -> Asid {
        let mut next = self.cursor.wrapping_add(ASID_INC);
        if next & ASID_MASK as u64 == 0 {
            on_rollover();
            if next == 0 {
                next = ASID_FIRST_VERSION;
            }
        }
        self.cursor = next;
        space.context = next;
        Asid::from_context(next)
    }

    /// Returns the ASID `space` should run with, allocating one if it has none or holds an
    /// ASID from an earlier generation.
    pub fn activate(&mut self, space: &mut AddressSpace, on_rollover: impl FnOnce()) -> Asid {
        if self.is_current(space) {
            Asid::from_context(space.context)
        } else {
            self.allocate(space, on_rollover)
        }
    }
}

impl Default for AsidAllocator {
    fn default() -> Self {
        Self::new()
    }
}
