// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! H1 KEYMGR key ladder driver
//!
//! Each ladder step selects a certificate index, triggers the SHA engine and
//! waits for the ITOP status register to go non-zero. The 256-bit result is
//! read from the eight HKEY_FRR registers.

use super::{read_reg, write_reg};
use crate::error::HalResult;
use crate::traits::KeyLadderInterface;
use ek_common::constants::{DERIVED_KEY_SIZE, DERIVED_KEY_WORDS};

/// SHA_TRIG: start the selected operation
pub const SHA_TRIG_GO: u32 = 1 << 0;
/// SHA_TRIG: reset the SHA engine state
pub const SHA_TRIG_RESET: u32 = 1 << 2;
/// SHA_CFG_EN: raise ITOP when the operation is done
pub const SHA_CFG_EN_INT_EN_DONE: u32 = 1 << 0;
/// SHA_USE_CERT_INDEX: certificate index field position
pub const SHA_USE_CERT_INDEX_LSB: u32 = 0;
/// SHA_USE_CERT_INDEX: use the selected certificate
pub const SHA_USE_CERT_ENABLE: u32 = 1 << 8;

/// KEYMGR register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeymgrRegisters {
    /// SHA_TRIG
    pub sha_trig: usize,
    /// SHA_CFG_EN
    pub sha_cfg_en: usize,
    /// SHA_ITOP
    pub sha_itop: usize,
    /// SHA_USE_CERT_INDEX
    pub sha_use_cert_index: usize,
    /// HKEY_ERR_FLAGS
    pub hkey_err_flags: usize,
    /// HKEY_FRR0; FRR1..FRR7 follow at 4-byte strides
    pub hkey_frr0: usize,
}

/// H1 key ladder
pub struct H1KeyLadder {
    regs: KeymgrRegisters,
}

impl H1KeyLadder {
    /// Create a driver over the given register block
    ///
    /// # Safety
    ///
    /// Every address in `regs` must be a valid KEYMGR register (or, in tests,
    /// an aligned `u32` that outlives the driver), and nothing else may drive
    /// the key ladder while this driver exists.
    #[must_use]
    pub const unsafe fn new(regs: KeymgrRegisters) -> Self {
        Self { regs }
    }
}

impl KeyLadderInterface for H1KeyLadder {
    fn reset(&mut self) -> HalResult<()> {
        // SAFETY: sha_trig is a valid KEYMGR register per the constructor contract.
        unsafe { write_reg(self.regs.sha_trig, SHA_TRIG_RESET) };
        Ok(())
    }

    fn start(&mut self, cert_index: u8) -> HalResult<()> {
        // SAFETY: all addresses are valid KEYMGR registers per the constructor contract.
        unsafe {
            write_reg(self.regs.sha_itop, 0);
            write_reg(
                self.regs.sha_use_cert_index,
                (u32::from(cert_index) << SHA_USE_CERT_INDEX_LSB) | SHA_USE_CERT_ENABLE,
            );
            write_reg(self.regs.sha_cfg_en, SHA_CFG_EN_INT_EN_DONE);
            write_reg(self.regs.sha_trig, SHA_TRIG_GO);
        }
        Ok(())
    }

    fn poll_done(&mut self) -> bool {
        // SAFETY: sha_itop is a valid KEYMGR register per the constructor contract.
        unsafe { read_reg(self.regs.sha_itop) != 0 }
    }

    fn clear_status(&mut self) {
        // SAFETY: sha_itop is a valid KEYMGR register per the constructor contract.
        unsafe { write_reg(self.regs.sha_itop, 0) };
    }

    fn has_error(&self) -> bool {
        // SAFETY: hkey_err_flags is a valid KEYMGR register per the constructor contract.
        unsafe { read_reg(self.regs.hkey_err_flags) != 0 }
    }

    fn read_result(&mut self, out: &mut [u8; DERIVED_KEY_SIZE]) {
        for (i, chunk) in out.chunks_exact_mut(4).enumerate().take(DERIVED_KEY_WORDS) {
            // SAFETY: FRR0..FRR7 are contiguous valid KEYMGR registers.
            let word = unsafe { read_reg(self.regs.hkey_frr0 + i * 4) };
            chunk.copy_from_slice(&word.to_le_bytes());
        }
    }
}
