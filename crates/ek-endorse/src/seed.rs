// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Endorsement seed recovery
//!
//! The seed is stored in the manufacture-state info block XOR-masked with
//! the ladder output. Recovery reads it word by word through a scoped
//! window and unmasks it in place.

use ek_common::constants::{DERIVED_KEY_SIZE, ENDORSEMENT_SEED_SIZE};
use ek_common::{EndorsementConfig, Error, Result};
use ek_crypto::SecureBuffer;
use ek_hal::{FlashWindow, FlashWindowInterface};
use zeroize::Zeroize;

use crate::ladder::DerivedKey;
use crate::window::ReadWindow;

/// Recovered endorsement seed; zeroized when dropped
pub type EndorsementSeed = SecureBuffer<ENDORSEMENT_SEED_SIZE>;

// One-time pad: the mask must cover the seed exactly.
const _: () = assert!(DERIVED_KEY_SIZE == ENDORSEMENT_SEED_SIZE);

/// Read and unmask the endorsement seed
///
/// The derived key is zeroized before this returns whether or not
/// recovery succeeds. On a read failure the partially read seed is
/// zeroized as well. The manufacture-state window is closed on every path.
///
/// # Errors
///
/// - `Error::InvalidConfig` if the configured seed size is not the key size
/// - `Error::FlashWindowBusy` / `Error::FlashWindowFailed` if the window
///   cannot be opened
/// - `Error::FlashReadFailed` if any word read fails
pub fn recover_seed<F: FlashWindowInterface>(
    flash: &mut F,
    config: &EndorsementConfig,
    key: &mut DerivedKey,
) -> Result<EndorsementSeed> {
    if config.seed_size != DERIVED_KEY_SIZE {
        key.zeroize();
        return Err(Error::InvalidConfig);
    }

    let mut seed = EndorsementSeed::new();
    let read = ReadWindow::open(flash, FlashWindow::ManufactureState, config.manufacture_state)
        .and_then(|window| window.read_words(config.seed_offset, seed.as_mut_bytes()));

    if let Err(e) = read {
        seed.zeroize();
        key.zeroize();
        return Err(e);
    }

    for (s, k) in seed.as_mut_bytes().iter_mut().zip(key.as_bytes()) {
        *s ^= k;
    }
    key.zeroize();
    Ok(seed)
}
