//! Interrupt masking for TLB critical sections.
//!
//! Every multi-register TLB sequence (stage tag, probe, stage data, commit) runs with
//! interrupts masked. A fault taken between the probe and the commit would run the refill
//! path against the same CP0 registers and clobber the staged tag and index.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Interrupt-enable state captured on entry to a critical section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct IrqState {
    /// Whether interrupts were enabled before masking.
    pub enabled: bool,
}

/// Status register interrupt-enable control.
pub trait InterruptControl {
    /// Masks interrupts and returns the previous state.
    fn save_and_disable(&mut self) -> IrqState;
    /// Restores a state returned by [`save_and_disable`](Self::save_and_disable).
    fn restore(&mut self, state: IrqState);
}

/// Scoped interrupt mask around a hardware handle.
///
/// Dereferences to the handle, so register accesses can only be written while the guard is
/// alive. The saved state is restored on drop, including early returns and `?` exits.
/// Sections nest: an inner section saves "disabled" and restores "disabled".
pub struct CriticalSection<'a, H: InterruptControl + ?Sized> {
    hw: &'a mut H,
    saved: IrqState,
}

impl<'a, H: InterruptControl + ?Sized> CriticalSection<'a, H> {
    /// Masks interrupts on `hw`.
    pub fn enter(hw: &'a mut H) -> Self {
        let saved = hw.save_and_disable();
        Self { hw, saved }
    }

    /// State that will be restored when the section ends.
    pub const fn saved(&self) -> IrqState {
        self.saved
    }
}

impl<H: InterruptControl + ?Sized> Deref for CriticalSection<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.hw
    }
}

impl<H: InterruptControl + ?Sized> DerefMut for CriticalSection<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.hw
    }
}

impl<H: InterruptControl + ?Sized> Drop for CriticalSection<'_, H> {
    fn drop(&mut self) {
        self.hw.restore(self.saved);
    }
}

impl<H: InterruptControl + ?Sized> fmt::Debug for CriticalSection<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CriticalSection")
            .field("saved", &self.saved)
            .finish_non_exhaustive()
    }
}
