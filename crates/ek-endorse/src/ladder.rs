// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Key ladder engine
//!
//! Walks the hardware key manager through the fixed certificate-index
//! sequence and copies out the device-unique key:
//!
//! ```text
//! reset → 0 → 3 → 4 → 5 → 7 → 15 → 20 → 25 × (max − version) → 26 → result
//! ```
//!
//! The repeated step binds the key to the firmware major version: every
//! version bump removes one step, so an older image cannot reproduce a
//! newer image's key.

use core::iter;

use ek_common::config::LadderConfig;
use ek_common::constants::{
    DERIVED_KEY_SIZE, LADDER_FINAL_CERT, LADDER_PREFIX_CERTS, LADDER_VERSION_CERT,
};
use ek_common::{Error, Result};
use ek_crypto::SecureBuffer;
use ek_hal::KeyLadderInterface;

/// Ladder output; zeroized when dropped
pub type DerivedKey = SecureBuffer<DERIVED_KEY_SIZE>;

/// Certificate indices of one full derivation, in order
pub fn step_sequence(config: &LadderConfig) -> impl Iterator<Item = u8> {
    LADDER_PREFIX_CERTS
        .into_iter()
        .chain(iter::repeat(LADDER_VERSION_CERT).take(config.version_steps() as usize))
        .chain(iter::once(LADDER_FINAL_CERT))
}

/// Drives a [`KeyLadderInterface`] through a full derivation
pub struct KeyLadder<'a, L: KeyLadderInterface> {
    hw: &'a mut L,
    config: LadderConfig,
}

impl<'a, L: KeyLadderInterface> KeyLadder<'a, L> {
    /// Borrow the engine for one derivation session
    pub fn new(hw: &'a mut L, config: LadderConfig) -> Self {
        Self { hw, config }
    }

    /// Run the full sequence and return the derived key
    ///
    /// The engine is reset before the first step so no state from an
    /// earlier session leaks in.
    ///
    /// # Errors
    ///
    /// - `Error::LadderTimeout` if a step does not complete within the poll budget
    /// - `Error::LadderStepFailed` if the engine flags an error on any step
    pub fn derive(&mut self) -> Result<DerivedKey> {
        self.hw.reset().map_err(Error::from)?;

        for cert in step_sequence(&self.config) {
            self.step(cert)?;
        }

        let mut key = DerivedKey::new();
        self.hw.read_result(key.as_mut_bytes());
        Ok(key)
    }

    fn step(&mut self, cert: u8) -> Result<()> {
        self.hw.start(cert).map_err(Error::from)?;
        self.wait_done()?;
        self.hw.clear_status();
        if self.hw.has_error() {
            return Err(Error::LadderStepFailed);
        }
        Ok(())
    }

    fn wait_done(&mut self) -> Result<()> {
        for _ in 0..self.config.poll_budget {
            if self.hw.poll_done() {
                return Ok(());
            }
        }
        Err(Error::LadderTimeout)
    }
}
