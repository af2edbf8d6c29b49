// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Host simulation of the provisioning hardware
//!
//! Deterministic stand-ins for the key ladder, protected flash and NV engine
//! with fault injection, used to run the endorsement pass on a workstation.

use crate::error::{HalError, HalResult};
use crate::nv::{AuthHandle, NvAttributes, NvPublic, ReservedSlot, StartupType};
use crate::traits::{FlashWindow, FlashWindowInterface, KeyLadderInterface, NvStorageInterface};
use ek_common::constants::{
    CERT_REGION_SIZE, DERIVED_KEY_SIZE, ENDORSEMENT_SEED_SIZE, FLASH_WORD_SIZE, MAX_NV_BUFFER_SIZE,
};
use ek_common::FlashRegion;
use heapless::Vec;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

// =============================================================================
// Key Ladder
// =============================================================================

/// Longest step history kept by [`SimKeyLadder`]
pub const SIM_LADDER_LOG_CAPACITY: usize = 512;

/// Simulated key ladder
///
/// Every completed step folds its certificate index into a SHA-256 chain
/// seeded from the device secret. The engine starts with unknown residual
/// state: a step started without a prior `reset` completes with the error
/// flag raised, as does any step after a result has been read.
pub struct SimKeyLadder {
    device_secret: [u8; DERIVED_KEY_SIZE],
    state: [u8; DERIVED_KEY_SIZE],
    primed: bool,
    pending: Option<u8>,
    countdown: u32,
    done: bool,
    error: bool,
    latency: u32,
    fail_at: Option<usize>,
    hang_at: Option<usize>,
    steps: Vec<u8, SIM_LADDER_LOG_CAPACITY>,
    step_count: usize,
    resets: usize,
}

impl SimKeyLadder {
    /// Create a ladder for a device with the given fused secret
    #[must_use]
    pub fn new(device_secret: [u8; DERIVED_KEY_SIZE]) -> Self {
        Self {
            device_secret,
            state: [0; DERIVED_KEY_SIZE],
            primed: false,
            pending: None,
            countdown: 0,
            done: false,
            error: false,
            latency: 0,
            fail_at: None,
            hang_at: None,
            steps: Vec::new(),
            step_count: 0,
            resets: 0,
        }
    }

    /// Number of polls each step takes to complete
    pub fn set_latency(&mut self, polls: u32) {
        self.latency = polls;
    }

    /// Raise the error flag on the `step`-th step (zero based)
    pub fn fail_at_step(&mut self, step: usize) {
        self.fail_at = Some(step);
    }

    /// Never complete the `step`-th step (zero based)
    pub fn hang_at_step(&mut self, step: usize) {
        self.hang_at = Some(step);
    }

    /// Certificate indices of the steps run since the last reset
    #[must_use]
    pub fn steps(&self) -> &[u8] {
        &self.steps
    }

    /// Steps started since the last reset
    #[must_use]
    pub const fn step_count(&self) -> usize {
        self.step_count
    }

    /// Number of engine resets
    #[must_use]
    pub const fn resets(&self) -> usize {
        self.resets
    }

    /// The key a correctly sequenced ladder produces for `certs`
    #[must_use]
    pub fn expected_output(
        device_secret: &[u8; DERIVED_KEY_SIZE],
        certs: &[u8],
    ) -> [u8; DERIVED_KEY_SIZE] {
        let mut state = *device_secret;
        for &cert in certs {
            state = Self::mix(&state, cert);
        }
        state
    }

    fn mix(state: &[u8; DERIVED_KEY_SIZE], cert: u8) -> [u8; DERIVED_KEY_SIZE] {
        let mut h = Sha256::new();
        h.update(state);
        h.update([cert]);
        h.finalize().into()
    }
}

impl KeyLadderInterface for SimKeyLadder {
    fn reset(&mut self) -> HalResult<()> {
        self.state = self.device_secret;
        self.primed = true;
        self.pending = None;
        self.done = false;
        self.error = false;
        self.steps.clear();
        self.step_count = 0;
        self.resets += 1;
        Ok(())
    }

    fn start(&mut self, cert_index: u8) -> HalResult<()> {
        self.done = false;
        self.pending = Some(cert_index);
        self.countdown = self.latency;
        let _ = self.steps.push(cert_index);
        self.step_count += 1;
        Ok(())
    }

    fn poll_done(&mut self) -> bool {
        if self.done {
            return true;
        }
        let Some(cert) = self.pending else {
            return false;
        };
        let step = self.step_count - 1;
        if self.hang_at == Some(step) {
            return false;
        }
        if self.countdown > 0 {
            self.countdown -= 1;
            return false;
        }

        self.state = Self::mix(&self.state, cert);
        self.error = !self.primed || self.fail_at == Some(step);
        self.pending = None;
        self.done = true;
        true
    }

    fn clear_status(&mut self) {
        self.done = false;
    }

    fn has_error(&self) -> bool {
        self.error
    }

    fn read_result(&mut self, out: &mut [u8; DERIVED_KEY_SIZE]) {
        out.copy_from_slice(&self.state);
        self.primed = false;
    }
}

impl Drop for SimKeyLadder {
    fn drop(&mut self) {
        self.state.zeroize();
        self.device_secret.zeroize();
    }
}

// =============================================================================
// Protected Flash
// =============================================================================

/// Simulated protected flash
///
/// Both windows read as erased (`0xFF`) until programmed.
pub struct SimFlash {
    manufacture_state: [u8; MANUFACTURE_STATE_CAPACITY],
    cert_region: [u8; CERT_REGION_SIZE],
    open: Option<(FlashWindow, FlashRegion)>,
    fail_read_at: Option<(FlashWindow, u32)>,
    enables: usize,
    disables: usize,
    reads: core::cell::Cell<usize>,
}

/// Bytes of manufacture-state storage backing [`SimFlash`]
pub const MANUFACTURE_STATE_CAPACITY: usize = 0x200;

impl SimFlash {
    /// Create fully erased flash
    #[must_use]
    pub fn new() -> Self {
        Self {
            manufacture_state: [0xFF; MANUFACTURE_STATE_CAPACITY],
            cert_region: [0xFF; CERT_REGION_SIZE],
            open: None,
            fail_read_at: None,
            enables: 0,
            disables: 0,
            reads: core::cell::Cell::new(0),
        }
    }

    /// Program the encrypted seed at `offset` inside the manufacture-state area
    ///
    /// # Errors
    ///
    /// Returns `HalError::FlashOutOfBounds` if the seed does not fit.
    pub fn program_seed(&mut self, offset: usize, encrypted: &[u8; ENDORSEMENT_SEED_SIZE]) -> HalResult<()> {
        let end = offset
            .checked_add(ENDORSEMENT_SEED_SIZE)
            .ok_or(HalError::FlashOutOfBounds)?;
        let dst = self
            .manufacture_state
            .get_mut(offset..end)
            .ok_or(HalError::FlashOutOfBounds)?;
        dst.copy_from_slice(encrypted);
        Ok(())
    }

    /// Program the full certificate region
    pub fn program_cert_region(&mut self, image: &[u8; CERT_REGION_SIZE]) {
        self.cert_region.copy_from_slice(image);
    }

    /// Fail the read of the word at `offset` in `window`
    pub fn fail_read_at(&mut self, window: FlashWindow, offset: u32) {
        self.fail_read_at = Some((window, offset));
    }

    /// Number of successful `enable_read` calls
    #[must_use]
    pub const fn enables(&self) -> usize {
        self.enables
    }

    /// Number of `disable_read` calls
    #[must_use]
    pub const fn disables(&self) -> usize {
        self.disables
    }

    /// Number of word reads attempted
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Whether any window is read-enabled
    #[must_use]
    pub const fn any_window_open(&self) -> bool {
        self.open.is_some()
    }

    fn backing(&self, window: FlashWindow) -> &[u8] {
        match window {
            FlashWindow::ManufactureState => &self.manufacture_state,
            FlashWindow::CertRegion => &self.cert_region,
        }
    }
}

impl Default for SimFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashWindowInterface for SimFlash {
    fn enable_read(&mut self, window: FlashWindow, region: FlashRegion) -> HalResult<()> {
        if region.size == 0 || region.size as usize > self.backing(window).len() {
            return Err(HalError::InvalidParameter);
        }
        match self.open {
            Some((open, _)) if open != window => return Err(HalError::FlashWindowBusy),
            _ => {}
        }
        self.open = Some((window, region));
        self.enables += 1;
        Ok(())
    }

    fn disable_read(&mut self, window: FlashWindow) {
        self.disables += 1;
        if matches!(self.open, Some((open, _)) if open == window) {
            self.open = None;
        }
    }

    fn is_read_enabled(&self, window: FlashWindow) -> bool {
        matches!(self.open, Some((open, _)) if open == window)
    }

    fn read_word(&self, window: FlashWindow, offset: u32) -> HalResult<u32> {
        self.reads.set(self.reads.get() + 1);
        let region = match self.open {
            Some((open, region)) if open == window => region,
            _ => return Err(HalError::FlashWindowClosed),
        };
        if offset as usize % FLASH_WORD_SIZE != 0 {
            return Err(HalError::InvalidParameter);
        }
        if !region.contains_range(offset, FLASH_WORD_SIZE as u32) {
            return Err(HalError::FlashOutOfBounds);
        }
        if self.fail_read_at == Some((window, offset)) {
            return Err(HalError::FlashReadFailed);
        }
        let start = offset as usize;
        let bytes = self
            .backing(window)
            .get(start..start + FLASH_WORD_SIZE)
            .ok_or(HalError::FlashOutOfBounds)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

// =============================================================================
// NV Storage
// =============================================================================

/// Maximum NV indices the simulation holds
pub const SIM_NV_MAX_SPACES: usize = 8;

/// Longest operation history kept by [`SimNvStorage`]
pub const SIM_NV_LOG_CAPACITY: usize = 64;

/// One NV engine operation, as recorded by [`SimNvStorage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NvOp {
    /// Hierarchy startup
    Startup(StartupType),
    /// Index definition attempt
    Define {
        /// NV index
        index: u32,
        /// Declared size
        size: u16,
    },
    /// Index write attempt
    Write {
        /// NV index
        index: u32,
        /// Payload length
        len: usize,
    },
    /// Reserved slot write attempt
    WriteReserved(ReservedSlot),
    /// Commit attempt
    Commit,
}

/// Fault injection for [`SimNvStorage`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NvFaults {
    /// Fail `startup`
    pub startup: bool,
    /// Fail `define_space` for this index
    pub define_index: Option<u32>,
    /// Fail `write` for this index
    pub write_index: Option<u32>,
    /// Fail `write_reserved`
    pub reserved: bool,
    /// Fail every `commit`
    pub commit: bool,
}

struct SimSpace {
    public: NvPublic,
    data: Vec<u8, MAX_NV_BUFFER_SIZE>,
}

/// Simulated NV engine
pub struct SimNvStorage {
    spaces: Vec<SimSpace, SIM_NV_MAX_SPACES>,
    seed: Option<[u8; ENDORSEMENT_SEED_SIZE]>,
    platform_auth: bool,
    uncommitted: bool,
    commits: usize,
    ops: Vec<NvOp, SIM_NV_LOG_CAPACITY>,
    /// Active fault injection
    pub faults: NvFaults,
}

impl SimNvStorage {
    /// Create an empty NV engine
    #[must_use]
    pub fn new() -> Self {
        Self {
            spaces: Vec::new(),
            seed: None,
            platform_auth: false,
            uncommitted: false,
            commits: 0,
            ops: Vec::new(),
            faults: NvFaults::default(),
        }
    }

    /// Recorded operations, oldest first
    #[must_use]
    pub fn ops(&self) -> &[NvOp] {
        &self.ops
    }

    /// Forget the recorded operations
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Whether `index` is defined
    #[must_use]
    pub fn is_defined(&self, index: u32) -> bool {
        self.space(index).is_some()
    }

    /// Public area of `index`
    #[must_use]
    pub fn public(&self, index: u32) -> Option<&NvPublic> {
        self.space(index).map(|s| &s.public)
    }

    /// Contents of `index`
    #[must_use]
    pub fn data(&self, index: u32) -> Option<&[u8]> {
        self.space(index).map(|s| s.data.as_slice())
    }

    /// Persisted endorsement seed
    #[must_use]
    pub fn endorsement_seed(&self) -> Option<&[u8; ENDORSEMENT_SEED_SIZE]> {
        self.seed.as_ref()
    }

    /// Number of successful commits
    #[must_use]
    pub const fn commits(&self) -> usize {
        self.commits
    }

    /// Whether writes are pending a commit
    #[must_use]
    pub const fn has_uncommitted(&self) -> bool {
        self.uncommitted
    }

    fn space(&self, index: u32) -> Option<&SimSpace> {
        self.spaces.iter().find(|s| s.public.index == index)
    }

    fn record(&mut self, op: NvOp) {
        let _ = self.ops.push(op);
    }
}

impl Default for SimNvStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl NvStorageInterface for SimNvStorage {
    fn startup(&mut self, startup: StartupType) -> HalResult<()> {
        self.record(NvOp::Startup(startup));
        if self.faults.startup {
            return Err(HalError::HardwareFault);
        }
        if startup == StartupType::Reset {
            self.platform_auth = true;
        }
        Ok(())
    }

    fn define_space(
        &mut self,
        auth: AuthHandle,
        _index_auth: &[u8],
        public: &NvPublic,
    ) -> HalResult<()> {
        self.record(NvOp::Define {
            index: public.index,
            size: public.data_size,
        });
        if self.faults.define_index == Some(public.index) {
            return Err(HalError::NvFailure);
        }
        if auth != AuthHandle::PLATFORM || !self.platform_auth {
            return Err(HalError::NvAuthFailed);
        }
        if !public.attributes.contains(NvAttributes::PLATFORMCREATE) {
            return Err(HalError::NvAuthFailed);
        }
        if usize::from(public.data_size) > MAX_NV_BUFFER_SIZE {
            return Err(HalError::InvalidParameter);
        }
        if self.is_defined(public.index) {
            return Err(HalError::NvSpaceDefined);
        }
        self.spaces
            .push(SimSpace {
                public: public.clone(),
                data: Vec::new(),
            })
            .map_err(|_| HalError::NvNoSpace)?;
        self.uncommitted = true;
        Ok(())
    }

    fn write(&mut self, auth: AuthHandle, index: u32, offset: u16, data: &[u8]) -> HalResult<()> {
        self.record(NvOp::Write {
            index,
            len: data.len(),
        });
        if self.faults.write_index == Some(index) {
            return Err(HalError::NvFailure);
        }
        let space = self
            .spaces
            .iter_mut()
            .find(|s| s.public.index == index)
            .ok_or(HalError::NvSpaceUndefined)?;
        if auth != AuthHandle::PLATFORM || !space.public.attributes.contains(NvAttributes::PPWRITE) {
            return Err(HalError::NvAuthFailed);
        }
        if space.public.attributes.contains(NvAttributes::WRITELOCKED) {
            return Err(HalError::NvWriteLocked);
        }
        let start = usize::from(offset);
        let end = start.checked_add(data.len()).ok_or(HalError::NvOutOfBounds)?;
        if end > usize::from(space.public.data_size) {
            return Err(HalError::NvOutOfBounds);
        }
        if space.data.len() < end {
            space
                .data
                .resize(end, 0)
                .map_err(|()| HalError::NvOutOfBounds)?;
        }
        space.data[start..end].copy_from_slice(data);
        space.public.attributes.insert(NvAttributes::WRITTEN);
        self.uncommitted = true;
        Ok(())
    }

    fn write_reserved(&mut self, slot: ReservedSlot, data: &[u8]) -> HalResult<()> {
        self.record(NvOp::WriteReserved(slot));
        if self.faults.reserved {
            return Err(HalError::NvFailure);
        }
        match slot {
            ReservedSlot::EndorsementSeed => {
                let seed: [u8; ENDORSEMENT_SEED_SIZE] =
                    data.try_into().map_err(|_| HalError::InvalidParameter)?;
                self.seed = Some(seed);
            }
        }
        self.uncommitted = true;
        Ok(())
    }

    fn commit(&mut self) -> HalResult<()> {
        self.record(NvOp::Commit);
        if self.faults.commit {
            return Err(HalError::NvCommitFailed);
        }
        self.uncommitted = false;
        self.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_steps(ladder: &mut SimKeyLadder, certs: &[u8]) -> bool {
        for &c in certs {
            ladder.start(c).unwrap();
            let mut polls = 0;
            while !ladder.poll_done() {
                polls += 1;
                if polls > 100 {
                    return false;
                }
            }
            ladder.clear_status();
            if ladder.has_error() {
                return false;
            }
        }
        true
    }

    #[test]
    fn test_ladder_requires_reset() {
        let mut ladder = SimKeyLadder::new([7; 32]);
        assert!(!run_steps(&mut ladder, &[0]));
        ladder.reset().unwrap();
        assert!(run_steps(&mut ladder, &[0, 3]));
    }

    #[test]
    fn test_ladder_output_matches_expected_chain() {
        let secret = [9u8; 32];
        let mut ladder = SimKeyLadder::new(secret);
        ladder.set_latency(3);
        ladder.reset().unwrap();
        assert!(run_steps(&mut ladder, &[0, 3, 4]));
        let mut out = [0u8; 32];
        ladder.read_result(&mut out);
        assert_eq!(out, SimKeyLadder::expected_output(&secret, &[0, 3, 4]));
        assert_eq!(ladder.steps(), &[0, 3, 4]);
    }

    #[test]
    fn test_ladder_dirty_after_result() {
        let mut ladder = SimKeyLadder::new([1; 32]);
        ladder.reset().unwrap();
        assert!(run_steps(&mut ladder, &[0]));
        let mut out = [0u8; 32];
        ladder.read_result(&mut out);
        assert!(!run_steps(&mut ladder, &[3]));
    }

    #[test]
    fn test_flash_reads_erased_by_default() {
        let mut flash = SimFlash::new();
        flash
            .enable_read(FlashWindow::CertRegion, FlashRegion::new(0x43800, 0x800))
            .unwrap();
        assert_eq!(flash.read_word(FlashWindow::CertRegion, 0), Ok(0xFFFF_FFFF));
        assert_eq!(flash.read_word(FlashWindow::CertRegion, 0x800), Err(HalError::FlashOutOfBounds));
    }

    #[test]
    fn test_flash_fault_injection() {
        let mut flash = SimFlash::new();
        flash.program_seed(0, &[0x11; 32]).unwrap();
        flash.fail_read_at(FlashWindow::ManufactureState, 8);
        flash
            .enable_read(FlashWindow::ManufactureState, FlashRegion::new(0x28000, 0x200))
            .unwrap();
        assert_eq!(flash.read_word(FlashWindow::ManufactureState, 4), Ok(0x1111_1111));
        assert_eq!(
            flash.read_word(FlashWindow::ManufactureState, 8),
            Err(HalError::FlashReadFailed)
        );
    }

    #[test]
    fn test_nv_define_requires_platform_startup() {
        let mut nv = SimNvStorage::new();
        let public = NvPublic::endorsement_certificate(0x01C0_0000, 16);
        assert_eq!(
            nv.define_space(AuthHandle::PLATFORM, &[], &public),
            Err(HalError::NvAuthFailed)
        );
        nv.startup(StartupType::Reset).unwrap();
        nv.define_space(AuthHandle::PLATFORM, &[], &public).unwrap();
        assert_eq!(
            nv.define_space(AuthHandle::PLATFORM, &[], &public),
            Err(HalError::NvSpaceDefined)
        );
    }

    #[test]
    fn test_nv_write_bounds_and_commit() {
        let mut nv = SimNvStorage::new();
        nv.startup(StartupType::Reset).unwrap();
        let public = NvPublic::endorsement_certificate(0x01C0_0001, 4);
        nv.define_space(AuthHandle::PLATFORM, &[], &public).unwrap();
        assert_eq!(
            nv.write(AuthHandle::PLATFORM, 0x01C0_0001, 0, &[1, 2, 3, 4, 5]),
            Err(HalError::NvOutOfBounds)
        );
        nv.write(AuthHandle::PLATFORM, 0x01C0_0001, 0, &[1, 2, 3, 4]).unwrap();
        assert!(nv.has_uncommitted());
        nv.commit().unwrap();
        assert!(!nv.has_uncommitted());
        assert_eq!(nv.data(0x01C0_0001), Some(&[1u8, 2, 3, 4][..]));
        assert!(nv.public(0x01C0_0001).unwrap().attributes.contains(NvAttributes::WRITTEN));
    }
}
