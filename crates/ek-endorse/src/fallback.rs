// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Fallback provisioner
//!
//! Installs the fixed seed and certificate pair from [`crate::fixed`]. The
//! result is a working but untrusted identity.

use ek_common::{ComponentType, Result};
use ek_hal::NvStorageInterface;

use crate::fixed::{FIXED_ECC_ENDORSEMENT_CERT, FIXED_ENDORSEMENT_SEED, FIXED_RSA_ENDORSEMENT_CERT};
use crate::persist::IdentityStore;

/// Install the fixed endorsement: RSA, then ECC, then the seed
///
/// Stops at the first failure. The seed is written last so a device whose
/// certificate indices are already defined keeps its installed seed.
///
/// # Errors
///
/// Propagates the failing [`IdentityStore`] operation's error.
pub fn install_fallback<N: NvStorageInterface>(
    store: &mut IdentityStore<N>,
    base_index: u32,
) -> Result<()> {
    store.install_certificate(ComponentType::RsaCert, &FIXED_RSA_ENDORSEMENT_CERT, base_index)?;
    store.install_certificate(ComponentType::P256Cert, &FIXED_ECC_ENDORSEMENT_CERT, base_index)?;
    store.store_endorsement_seed(&FIXED_ENDORSEMENT_SEED)
}
