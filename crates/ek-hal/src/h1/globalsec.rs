// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! H1 GLOBALSEC flash window driver
//!
//! Protected flash is readable only through a GLOBALSEC region whose base,
//! size and control registers have been programmed. Region 7 maps the
//! manufacture-state area of the info block, region 6 the certificate region.

use super::{read_reg, write_reg};
use crate::error::{HalError, HalResult};
use crate::traits::{FlashWindow, FlashWindowInterface};
use ek_common::constants::FLASH_WORD_SIZE;
use ek_common::FlashRegion;

/// Region control: region enabled
pub const REGION_CTRL_EN: u32 = 1 << 0;
/// Region control: reads permitted
pub const REGION_CTRL_RD_EN: u32 = 1 << 1;

/// Base/size/control registers of one GLOBALSEC flash region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalsecRegisters {
    /// FLASH_REGIONn_BASE_ADDR
    pub base_addr: usize,
    /// FLASH_REGIONn_SIZE (programmed as size - 1)
    pub size: usize,
    /// FLASH_REGIONn_CTRL
    pub ctrl: usize,
}

/// Register and data addresses for both windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct H1FlashLayout {
    /// Region 7 registers
    pub manufacture_state_regs: GlobalsecRegisters,
    /// Bus address at which the manufacture-state data is read
    pub manufacture_state_data: usize,
    /// Region 6 registers
    pub cert_region_regs: GlobalsecRegisters,
    /// Bus address at which the certificate region is read
    pub cert_region_data: usize,
}

impl H1FlashLayout {
    const fn regs(&self, window: FlashWindow) -> GlobalsecRegisters {
        match window {
            FlashWindow::ManufactureState => self.manufacture_state_regs,
            FlashWindow::CertRegion => self.cert_region_regs,
        }
    }

    const fn data(&self, window: FlashWindow) -> usize {
        match window {
            FlashWindow::ManufactureState => self.manufacture_state_data,
            FlashWindow::CertRegion => self.cert_region_data,
        }
    }
}

/// H1 protected flash windows
pub struct H1FlashWindows {
    layout: H1FlashLayout,
    open: Option<(FlashWindow, FlashRegion)>,
}

impl H1FlashWindows {
    /// Create a driver over the given layout
    ///
    /// # Safety
    ///
    /// All register addresses must be valid GLOBALSEC registers and both data
    /// addresses must be readable for the full size of any region later passed
    /// to `enable_read`. Nothing else may program these regions while the
    /// driver exists.
    #[must_use]
    pub const unsafe fn new(layout: H1FlashLayout) -> Self {
        Self { layout, open: None }
    }
}

impl FlashWindowInterface for H1FlashWindows {
    fn enable_read(&mut self, window: FlashWindow, region: FlashRegion) -> HalResult<()> {
        if region.size == 0 || region.end().is_none() {
            return Err(HalError::InvalidParameter);
        }
        match self.open {
            Some((open, _)) if open != window => return Err(HalError::FlashWindowBusy),
            _ => {}
        }

        let regs = self.layout.regs(window);
        // SAFETY: register addresses are valid GLOBALSEC registers per the constructor contract.
        unsafe {
            write_reg(regs.base_addr, region.base);
            write_reg(regs.size, region.size - 1);
            write_reg(regs.ctrl, REGION_CTRL_EN | REGION_CTRL_RD_EN);
        }
        self.open = Some((window, region));
        Ok(())
    }

    fn disable_read(&mut self, window: FlashWindow) {
        let regs = self.layout.regs(window);
        // SAFETY: ctrl is a valid GLOBALSEC register per the constructor contract.
        unsafe { write_reg(regs.ctrl, 0) };
        if matches!(self.open, Some((open, _)) if open == window) {
            self.open = None;
        }
    }

    fn is_read_enabled(&self, window: FlashWindow) -> bool {
        matches!(self.open, Some((open, _)) if open == window)
    }

    fn read_word(&self, window: FlashWindow, offset: u32) -> HalResult<u32> {
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
        // SAFETY: the window is enabled and offset lies inside the region, which
        // the constructor contract guarantees is readable at the data address.
        Ok(unsafe { read_reg(self.layout.data(window) + offset as usize) })
    }
}
