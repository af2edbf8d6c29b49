// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! HAL trait definitions
//!
//! Platform-agnostic interfaces for the three pieces of hardware the
//! endorsement pass drives. Each has a memory-mapped H1 implementation
//! and a host simulation.

use crate::error::HalResult;
use crate::nv::{AuthHandle, NvPublic, ReservedSlot, StartupType};
use ek_common::constants::DERIVED_KEY_SIZE;
use ek_common::FlashRegion;

/// Hardware key-derivation engine
///
/// One ladder step is `start`, poll `poll_done` until true, `clear_status`,
/// then `has_error`. The caller owns the poll budget.
pub trait KeyLadderInterface {
    /// Reset the engine's internal transform state
    fn reset(&mut self) -> HalResult<()>;

    /// Clear status, select `cert_index` and trigger the step
    fn start(&mut self, cert_index: u8) -> HalResult<()>;

    /// Whether the current step has completed
    fn poll_done(&mut self) -> bool;

    /// Clear the completion status
    fn clear_status(&mut self);

    /// Whether the engine reported an error for the last step
    fn has_error(&self) -> bool;

    /// Copy the ladder output out of the result registers
    fn read_result(&mut self, out: &mut [u8; DERIVED_KEY_SIZE]);
}

/// Protected flash window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlashWindow {
    /// Info-block area holding the encrypted endorsement seed
    ManufactureState,
    /// Read-only certificate region
    CertRegion,
}

impl FlashWindow {
    /// Short name for diagnostics
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ManufactureState => "manufacture-state",
            Self::CertRegion => "cert-region",
        }
    }
}

/// Read-only access windows onto protected flash
///
/// At most one window may be read-enabled at a time.
pub trait FlashWindowInterface {
    /// Map `region` behind `window` and enable reads
    ///
    /// Fails with `FlashWindowBusy` if another window is open.
    fn enable_read(&mut self, window: FlashWindow, region: FlashRegion) -> HalResult<()>;

    /// Disable reads through `window`; a no-op if already closed
    fn disable_read(&mut self, window: FlashWindow);

    /// Whether `window` is currently read-enabled
    fn is_read_enabled(&self, window: FlashWindow) -> bool;

    /// Read one 32-bit word at `offset` bytes from the window base
    fn read_word(&self, window: FlashWindow, offset: u32) -> HalResult<u32>;
}

/// Access-controlled non-volatile storage engine
pub trait NvStorageInterface {
    /// Signal a hierarchy startup
    ///
    /// `StartupType::Reset` establishes platform authorization.
    fn startup(&mut self, startup: StartupType) -> HalResult<()>;

    /// Define a new NV index
    fn define_space(
        &mut self,
        auth: AuthHandle,
        index_auth: &[u8],
        public: &NvPublic,
    ) -> HalResult<()>;

    /// Write `data` into a defined index at `offset`
    fn write(&mut self, auth: AuthHandle, index: u32, offset: u16, data: &[u8]) -> HalResult<()>;

    /// Write a reserved (non-index) persistent slot
    fn write_reserved(&mut self, slot: ReservedSlot, data: &[u8]) -> HalResult<()>;

    /// Flush pending writes to flash
    fn commit(&mut self) -> HalResult<()>;
}
