//! One-time TLB startup.
//!
//! Before any translation happens the TLB is flushed and the general exception trampoline
//! is copied to the base of KSEG0, where the CPU vectors TLB refill exceptions.

use object::{Object, ObjectSection, ObjectSymbol};
use tracing::{info, warn};

use crate::common::constants::TRAMPOLINE_SIZE;
use crate::common::{KSEG0, PhysAddr, TlbError, VirtAddr};
use crate::hw::Cp0;

use super::tlb::TlbController;

/// Virtual address of the general exception vector.
pub const VECTOR_BASE: VirtAddr = VirtAddr::new(KSEG0);

/// The exception trampoline copied to [`VECTOR_BASE`].
#[derive(Clone, PartialEq, Eq)]
pub struct TrampolineImage {
    bytes: [u8; TRAMPOLINE_SIZE],
}

impl TrampolineImage {
    /// Wraps raw trampoline code.
    ///
    /// # Errors
    ///
    /// Returns [`TlbError::TrampolineSize`] unless `bytes` is exactly the vector slot size.
    pub fn new(bytes: &[u8]) -> Result<Self, TlbError> {
        let bytes = bytes.try_into().map_err(|_| TlbError::TrampolineSize {
            expected: TRAMPOLINE_SIZE,
            found: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    /// Extracts the trampoline from a linked or relocatable ELF image.
    ///
    /// Reads the vector slot's worth of bytes starting at `symbol`, for example
    /// `except_vec0_r2300`.
    ///
    /// # Errors
    ///
    /// Returns [`TlbError::TrampolineImage`] if the image cannot be parsed, the symbol is
    /// missing or not in a section with file data, or the section ends too early.
    pub fn from_elf(data: &[u8], symbol: &str) -> Result<Self, TlbError> {
        let bad = |msg: String| TlbError::TrampolineImage(msg);

        let file = object::File::parse(data).map_err(|e| bad(e.to_string()))?;
        let sym = file
            .symbols()
            .find(|s| s.name().is_ok_and(|n| n == symbol))
            .ok_or_else(|| bad(format!("symbol `{symbol}` not found")))?;
        let section_index = sym
            .section_index()
            .ok_or_else(|| bad(format!("symbol `{symbol}` is not defined in a section")))?;
        let section = file
            .section_by_index(section_index)
            .map_err(|e| bad(e.to_string()))?;
        let contents = section.data().map_err(|e| bad(e.to_string()))?;

        let offset = sym
            .address()
            .checked_sub(section.address())
            .and_then(|o| usize::try_from(o).ok())
            .ok_or_else(|| bad(format!("symbol `{symbol}` lies before its section")))?;
        let code = offset
            .checked_add(TRAMPOLINE_SIZE)
            .and_then(|end| contents.get(offset..end))
            .ok_or_else(|| {
                bad(format!(
                    "section holds {} bytes past `{symbol}`, need {TRAMPOLINE_SIZE}",
                    contents.len().saturating_sub(offset)
                ))
            })?;
        Self::new(code)
    }

    /// Trampoline code.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for TrampolineImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrampolineImage")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl<H: Cp0> TlbController<H> {
    /// Brings the TLB to a known state and installs the exception trampoline.
    ///
    /// Runs once, before any other translation activity: flush, copy the trampoline to
    /// the KSEG0 vector, then flush the I-cache over it.
    ///
    /// # Errors
    ///
    /// Returns [`TlbError::AlreadyInitialized`] on a second call.
    pub fn init(&mut self, trampoline: &TrampolineImage) -> Result<(), TlbError> {
        if self.state.initialized {
            warn!("tlb init called twice");
            return Err(TlbError::AlreadyInitialized);
        }

        self.flush_all();

        let end = VirtAddr::new(VECTOR_BASE.val() + TRAMPOLINE_SIZE as u32);
        let phys = VECTOR_BASE.kseg0_to_phys().unwrap_or(PhysAddr::new(0));
        self.hw.write_phys(phys, trampoline.as_bytes());
        self.hw.flush_icache_range(VECTOR_BASE, end);

        self.state.initialized = true;
        info!(entries = self.state.config.entries, wired = ?self.state.config.wired, "tlb initialised");
        Ok(())
    }

    /// Whether [`init`](Self::init) has run.
    pub const fn is_initialized(&self) -> bool {
        self.state.initialized
    }
}
