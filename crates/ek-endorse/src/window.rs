// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Scoped protected-flash read access
//!
//! A [`ReadWindow`] read-enables one flash window for its lifetime and
//! disables it on drop, so every exit path closes the window.

use ek_common::constants::FLASH_WORD_SIZE;
use ek_common::{Error, FlashRegion, RegionDescriptor, Result};
use ek_hal::{FlashWindow, FlashWindowInterface};

/// A read-enabled flash window
pub struct ReadWindow<'a, F: FlashWindowInterface> {
    flash: &'a mut F,
    window: FlashWindow,
    region: FlashRegion,
}

impl<'a, F: FlashWindowInterface> ReadWindow<'a, F> {
    /// Map `region` behind `window` and enable reads
    ///
    /// # Errors
    ///
    /// - `Error::FlashWindowBusy` if another window is already open
    /// - `Error::FlashWindowFailed` for any other mapping failure
    pub fn open(flash: &'a mut F, window: FlashWindow, region: FlashRegion) -> Result<Self> {
        flash.enable_read(window, region).map_err(|e| match Error::from(e) {
            Error::FlashWindowBusy => Error::FlashWindowBusy,
            _ => Error::FlashWindowFailed,
        })?;
        Ok(Self {
            flash,
            window,
            region,
        })
    }

    /// Mapped region and its current read-enable state
    #[must_use]
    pub fn descriptor(&self) -> RegionDescriptor {
        RegionDescriptor {
            region: self.region,
            read_enabled: self.flash.is_read_enabled(self.window),
        }
    }

    /// Read the word at `offset` bytes from the window base
    ///
    /// # Errors
    ///
    /// Returns `Error::FlashReadFailed` if the read fails.
    pub fn read_word(&self, offset: u32) -> Result<u32> {
        self.flash
            .read_word(self.window, offset)
            .map_err(|_| Error::FlashReadFailed)
    }

    /// Fill `out` with consecutive little-endian words starting at `offset`
    ///
    /// `out.len()` must be a whole number of words.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidParameter` if `out` is not word sized
    /// - `Error::FlashReadFailed` on the first failing word; earlier words
    ///   remain in `out`
    pub fn read_words(&self, offset: u32, out: &mut [u8]) -> Result<()> {
        if out.len() % FLASH_WORD_SIZE != 0 {
            return Err(Error::InvalidParameter);
        }
        let mut addr = offset;
        for chunk in out.chunks_exact_mut(FLASH_WORD_SIZE) {
            let word = self.read_word(addr)?;
            chunk.copy_from_slice(&word.to_le_bytes());
            addr = addr
                .checked_add(FLASH_WORD_SIZE as u32)
                .ok_or(Error::FlashReadFailed)?;
        }
        Ok(())
    }
}

impl<F: FlashWindowInterface> Drop for ReadWindow<'_, F> {
    fn drop(&mut self) {
        self.flash.disable_read(self.window);
    }
}
