// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Secure persistence adapter
//!
//! [`IdentityStore`] is the explicit handle onto the device identity: it owns
//! the NV engine and the runtime endorsement-seed slot. Certificates go into
//! write-once platform indices; the seed goes into its reserved slot.

use ek_common::constants::{ENDORSEMENT_SEED_SIZE, MAX_NV_BUFFER_SIZE};
use ek_common::{ComponentType, Error, Result};
use ek_crypto::SecureBuffer;
use ek_hal::{AuthHandle, HalError, NvPublic, NvStorageInterface, ReservedSlot, StartupType};
use zeroize::Zeroize;

/// Device identity store
pub struct IdentityStore<N: NvStorageInterface> {
    nv: N,
    endorsement_seed: SecureBuffer<ENDORSEMENT_SEED_SIZE>,
    seed_installed: bool,
}

impl<N: NvStorageInterface> IdentityStore<N> {
    /// Take ownership of the NV engine
    pub fn new(nv: N) -> Self {
        Self {
            nv,
            endorsement_seed: SecureBuffer::new(),
            seed_installed: false,
        }
    }

    /// NV engine
    pub fn nv(&self) -> &N {
        &self.nv
    }

    /// NV engine, mutably
    pub fn nv_mut(&mut self) -> &mut N {
        &mut self.nv
    }

    /// Whether an endorsement seed has been installed through this handle
    #[must_use]
    pub const fn endorsement_seed_installed(&self) -> bool {
        self.seed_installed
    }

    /// Release the NV engine; the runtime seed slot is zeroized
    pub fn into_inner(self) -> N {
        let Self { nv, .. } = self;
        nv
    }

    /// Define and write the endorsement certificate index for `component_type`
    ///
    /// The index is `base_index` for RSA and `base_index + 1` for P-256.
    /// Returns the index written.
    ///
    /// # Errors
    ///
    /// - `Error::UnknownComponentType` if `component_type` is not a certificate
    /// - `Error::CertificateTooLarge` if `cert` exceeds the NV payload limit
    /// - `Error::NvStartupFailed` if platform authorization cannot be established
    /// - `Error::NvSpaceAlreadyDefined` if the index exists; it is left untouched
    /// - `Error::NvDefineFailed`, `Error::NvWriteFailed`, `Error::NvCommitFailed`
    ///   for the corresponding engine failures
    pub fn install_certificate(
        &mut self,
        component_type: ComponentType,
        cert: &[u8],
        base_index: u32,
    ) -> Result<u32> {
        let offset = component_type
            .nv_index_offset()
            .ok_or(Error::UnknownComponentType)?;
        let index = base_index.checked_add(offset).ok_or(Error::InvalidConfig)?;
        if cert.len() > MAX_NV_BUFFER_SIZE {
            return Err(Error::CertificateTooLarge);
        }
        let data_size = u16::try_from(cert.len()).map_err(|_| Error::CertificateTooLarge)?;

        self.nv
            .startup(StartupType::Reset)
            .map_err(|_| Error::NvStartupFailed)?;

        let public = NvPublic::endorsement_certificate(index, data_size);
        self.nv
            .define_space(AuthHandle::PLATFORM, &[], &public)
            .map_err(|e| match e {
                HalError::NvSpaceDefined => Error::NvSpaceAlreadyDefined,
                _ => Error::NvDefineFailed,
            })?;

        self.nv
            .write(AuthHandle::PLATFORM, index, 0, cert)
            .map_err(|_| Error::NvWriteFailed)?;
        self.nv.commit().map_err(|_| Error::NvCommitFailed)?;

        Ok(index)
    }

    /// Install `seed` as the endorsement primary seed
    ///
    /// The seed is copied into the runtime slot, then written to its reserved
    /// NV slot and committed. On failure the runtime slot is cleared.
    ///
    /// # Errors
    ///
    /// - `Error::SeedStoreFailed` if the reserved write fails
    /// - `Error::NvCommitFailed` if the commit fails
    pub fn store_endorsement_seed(&mut self, seed: &[u8; ENDORSEMENT_SEED_SIZE]) -> Result<()> {
        self.endorsement_seed.as_mut_bytes().copy_from_slice(seed);

        let stored = self
            .nv
            .write_reserved(ReservedSlot::EndorsementSeed, self.endorsement_seed.as_slice())
            .map_err(|_| Error::SeedStoreFailed)
            .and_then(|()| self.nv.commit().map_err(|_| Error::NvCommitFailed));

        match stored {
            Ok(()) => {
                self.seed_installed = true;
                Ok(())
            }
            Err(e) => {
                self.endorsement_seed.zeroize();
                self.seed_installed = false;
                Err(e)
            }
        }
    }
}
