// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Provisioning configuration
//!
//! Board-specific addresses and limits for the endorsement pass. All
//! configuration is compile-time; [`EndorsementConfig::validate`] is run once
//! when the orchestrator is built and rejects anything that would break a
//! provisioning invariant.

use crate::constants::{
    CERT_REGION_SIZE, DEFAULT_LADDER_POLL_BUDGET, DERIVED_KEY_SIZE, EK_CERT_NV_START_INDEX,
    ENDORSEMENT_SEED_SIZE, FLASH_WORD_SIZE, MAX_FIRMWARE_MAJOR_VERSION, MAX_NV_BUFFER_SIZE,
};
use crate::errors::{Error, Result};
use crate::types::FlashRegion;

/// Base address of the H1 info flash block
pub const FLASH_INFO_MEMORY_BASE: u32 = 0x0002_8000;

/// Offset of the manufacture-state area inside the info block
pub const FLASH_INFO_MANUFACTURE_STATE_OFFSET: u32 = 0x0;

/// Size of the manufacture-state area
pub const FLASH_INFO_MANUFACTURE_STATE_SIZE: u32 = 0x200;

/// Read-only certificate region base address
pub const RO_CERTS_START_ADDR: u32 = 0x0004_3800;

/// Key ladder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderConfig {
    /// Running firmware major version
    pub firmware_major_version: u8,
    /// Highest firmware major version the ladder supports
    pub max_firmware_major_version: u8,
    /// Status polls per step before the step is declared hung
    pub poll_budget: u32,
}

impl LadderConfig {
    /// Default ladder configuration
    pub const DEFAULT: Self = Self {
        firmware_major_version: 0,
        max_firmware_major_version: MAX_FIRMWARE_MAJOR_VERSION,
        poll_budget: DEFAULT_LADDER_POLL_BUDGET,
    };

    /// Number of version-bound diversification steps
    #[must_use]
    pub const fn version_steps(&self) -> u32 {
        self.max_firmware_major_version.saturating_sub(self.firmware_major_version) as u32
    }
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Endorsement provisioning configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndorsementConfig {
    /// Read-only certificate region
    pub cert_region: FlashRegion,
    /// Manufacture-state window holding the encrypted seed
    pub manufacture_state: FlashRegion,
    /// Offset of the encrypted seed inside `manufacture_state`
    pub seed_offset: u32,
    /// Size of the encrypted seed in bytes
    pub seed_size: usize,
    /// NV index of the RSA certificate (ECC is the next index)
    pub ek_cert_nv_start_index: u32,
    /// Largest certificate accepted for installation
    pub max_certificate_size: usize,
    /// Key ladder settings
    pub ladder: LadderConfig,
}

impl EndorsementConfig {
    /// H1 defaults
    pub const DEFAULT: Self = Self {
        cert_region: FlashRegion::new(RO_CERTS_START_ADDR, CERT_REGION_SIZE as u32),
        manufacture_state: FlashRegion::new(
            FLASH_INFO_MEMORY_BASE + FLASH_INFO_MANUFACTURE_STATE_OFFSET,
            FLASH_INFO_MANUFACTURE_STATE_SIZE,
        ),
        seed_offset: 0,
        seed_size: ENDORSEMENT_SEED_SIZE,
        ek_cert_nv_start_index: EK_CERT_NV_START_INDEX,
        max_certificate_size: MAX_NV_BUFFER_SIZE,
        ladder: LadderConfig::DEFAULT,
    };

    /// Check every provisioning invariant
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if:
    /// - the seed size differs from the derived key size
    /// - the seed is not word aligned or lies outside its window
    /// - the certificate region is not the fixed region size or is unaligned
    /// - the certificate limit is zero or above the NV buffer size
    /// - the firmware version exceeds the supported maximum
    /// - the poll budget is zero
    /// - the ECC NV index would overflow
    pub fn validate(&self) -> Result<()> {
        // One-time pad: key and ciphertext must be the same length.
        if self.seed_size != DERIVED_KEY_SIZE {
            return Err(Error::InvalidConfig);
        }

        let word = FLASH_WORD_SIZE as u32;
        if self.seed_offset % word != 0
            || self.manufacture_state.base % word != 0
            || !self
                .manufacture_state
                .contains_range(self.seed_offset, self.seed_size as u32)
            || self.manufacture_state.end().is_none()
        {
            return Err(Error::InvalidConfig);
        }

        if self.cert_region.size as usize != CERT_REGION_SIZE
            || self.cert_region.base % word != 0
            || self.cert_region.end().is_none()
        {
            return Err(Error::InvalidConfig);
        }

        if self.max_certificate_size == 0 || self.max_certificate_size > MAX_NV_BUFFER_SIZE {
            return Err(Error::InvalidConfig);
        }

        if self.ladder.firmware_major_version > self.ladder.max_firmware_major_version
            || self.ladder.poll_budget == 0
        {
            return Err(Error::InvalidConfig);
        }

        if self.ek_cert_nv_start_index.checked_add(1).is_none() {
            return Err(Error::InvalidConfig);
        }

        Ok(())
    }
}

impl Default for EndorsementConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EndorsementConfig::DEFAULT.validate().is_ok());
        assert_eq!(EndorsementConfig::DEFAULT.ladder.version_steps(), 254);
    }

    #[test]
    fn test_seed_size_must_match_key_size() {
        let mut cfg = EndorsementConfig::DEFAULT;
        cfg.seed_size = 48;
        assert_eq!(cfg.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_unaligned_seed_offset_rejected() {
        let mut cfg = EndorsementConfig::DEFAULT;
        cfg.seed_offset = 2;
        assert_eq!(cfg.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_seed_outside_window_rejected() {
        let mut cfg = EndorsementConfig::DEFAULT;
        cfg.seed_offset = FLASH_INFO_MANUFACTURE_STATE_SIZE - 4;
        assert_eq!(cfg.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_firmware_version_above_max_rejected() {
        let mut cfg = EndorsementConfig::DEFAULT;
        cfg.ladder.firmware_major_version = 255;
        assert_eq!(cfg.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_certificate_limit_bounded_by_nv_buffer() {
        let mut cfg = EndorsementConfig::DEFAULT;
        cfg.max_certificate_size = MAX_NV_BUFFER_SIZE + 1;
        assert_eq!(cfg.validate(), Err(Error::InvalidConfig));
    }
}
