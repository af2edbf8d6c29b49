// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Endorsement orchestrator
//!
//! One provisioning pass:
//!
//! ```text
//! Start ─► LadderDerived ─► SeedRecovered ─► RegionParsed ─┬─► IntegrityOk ─► Authenticated ─► Persisted
//!                                                          └─► IntegrityFail ─► FallbackAttempted
//! ```
//!
//! An unprovisioned region, a ladder or seed failure, or a malformed region
//! ends the pass where it happens. On the trusted path each certificate is
//! authenticated and installed in turn, RSA first; the seed is installed
//! only after both certificates. The seed and derived key are zeroized on
//! every exit.

use ek_common::constants::ENDORSEMENT_SEED_SIZE;
use ek_common::{log_error, log_info, log_warn};
use ek_common::{EndorsementConfig, Error, LogBuffer, Result};
use ek_crypto::TrustAnchor;
use ek_hal::{FlashWindowInterface, KeyLadderInterface, NvStorageInterface};
use zeroize::Zeroize;

use crate::authenticate::CertificateAuthenticator;
use crate::fallback::install_fallback;
use crate::integrity;
use crate::ladder::KeyLadder;
use crate::persist::IdentityStore;
use crate::region::CertRegion;
use crate::seed::recover_seed;

/// Log module tag
const MODULE: &str = "endorse";

/// Progress of a provisioning pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndorsementState {
    /// Nothing done yet
    Start,
    /// Ladder key derived
    LadderDerived,
    /// Endorsement seed unmasked
    SeedRecovered,
    /// Certificate records parsed
    RegionParsed,
    /// Region tag matched
    IntegrityOk,
    /// Certificate signature accepted
    Authenticated,
    /// Certificates and seed installed
    Persisted,
    /// Region tag did not match
    IntegrityFail,
    /// Fixed endorsement installation attempted
    FallbackAttempted,
}

impl EndorsementState {
    /// Short name for diagnostics
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::LadderDerived => "ladder-derived",
            Self::SeedRecovered => "seed-recovered",
            Self::RegionParsed => "region-parsed",
            Self::IntegrityOk => "integrity-ok",
            Self::Authenticated => "authenticated",
            Self::Persisted => "persisted",
            Self::IntegrityFail => "integrity-fail",
            Self::FallbackAttempted => "fallback-attempted",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EndorsementState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.name());
    }
}

/// How a successful pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndorsementOutcome {
    /// The device identity from the certificate region was installed
    Endorsed,
    /// The region failed its integrity check; the fixed endorsement was installed
    FallbackInstalled,
}

/// Runs endorsement passes over borrowed hardware
pub struct Endorser<'a, L, F, N>
where
    L: KeyLadderInterface,
    F: FlashWindowInterface,
    N: NvStorageInterface,
{
    ladder: &'a mut L,
    flash: &'a mut F,
    store: &'a mut IdentityStore<N>,
    config: EndorsementConfig,
    authenticator: CertificateAuthenticator<'a>,
    log: &'a mut LogBuffer,
    state: EndorsementState,
}

impl<'a, L, F, N> Endorser<'a, L, F, N>
where
    L: KeyLadderInterface,
    F: FlashWindowInterface,
    N: NvStorageInterface,
{
    /// Create an orchestrator
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `config` fails validation or
    /// `anchors` is empty.
    pub fn new(
        ladder: &'a mut L,
        flash: &'a mut F,
        store: &'a mut IdentityStore<N>,
        config: &EndorsementConfig,
        anchors: &'a [TrustAnchor],
        log: &'a mut LogBuffer,
    ) -> Result<Self> {
        config.validate()?;
        if anchors.is_empty() {
            return Err(Error::InvalidConfig);
        }
        Ok(Self {
            ladder,
            flash,
            store,
            config: *config,
            authenticator: CertificateAuthenticator::new(anchors, config.max_certificate_size),
            log,
            state: EndorsementState::Start,
        })
    }

    /// Last state reached
    #[must_use]
    pub const fn state(&self) -> EndorsementState {
        self.state
    }

    /// Run one pass; `true` on success
    pub fn endorse(&mut self) -> bool {
        self.run().is_ok()
    }

    /// Run one provisioning pass
    ///
    /// # Errors
    ///
    /// - `Error::RegionUnprovisioned` on a blank device
    /// - ladder, flash and region errors from the corresponding stage
    /// - certificate and NV errors from the trusted path
    /// - `Error::FallbackFailed` if the fixed endorsement could not be installed
    pub fn run(&mut self) -> Result<EndorsementOutcome> {
        self.state = EndorsementState::Start;
        log_info!(self.log, MODULE, "endorsement start");

        let region = match CertRegion::read(self.flash, &self.config) {
            Ok(region) => region,
            Err(Error::RegionUnprovisioned) => {
                log_info!(self.log, MODULE, "cert region unprovisioned; skipping endorsement");
                return Err(Error::RegionUnprovisioned);
            }
            Err(e) => return Err(self.abort("cert region read", e)),
        };

        let derived = KeyLadder::new(self.ladder, self.config.ladder).derive();
        let mut key = match derived {
            Ok(key) => key,
            Err(e) => return Err(self.abort("key ladder", e)),
        };
        self.state = EndorsementState::LadderDerived;

        let recovered = recover_seed(self.flash, &self.config, &mut key);
        key.zeroize();
        let mut seed = match recovered {
            Ok(seed) => seed,
            Err(e) => return Err(self.abort("seed recovery", e)),
        };
        self.state = EndorsementState::SeedRecovered;

        let result = self.install_region(&region, seed.as_bytes());
        seed.zeroize();
        result
    }

    fn install_region(
        &mut self,
        region: &CertRegion,
        seed: &[u8; ENDORSEMENT_SEED_SIZE],
    ) -> Result<EndorsementOutcome> {
        let parsed = match region.parse() {
            Ok(parsed) => parsed,
            Err(e) => return Err(self.abort("cert region parse", e)),
        };
        self.state = EndorsementState::RegionParsed;

        if !integrity::verify(region.as_bytes(), seed) {
            self.state = EndorsementState::IntegrityFail;
            log_warn!(self.log, MODULE, "bad cert region hmac; falling back to fixed endorsement");
            return self.fallback();
        }
        self.state = EndorsementState::IntegrityOk;

        let base_index = self.config.ek_cert_nv_start_index;
        for record in parsed.records() {
            let ty = record.component_type;
            if let Err(e) = self.authenticator.check(ty, record.cert) {
                log_error!(self.log, MODULE, "cert authentication failed, type: {}, {}", ty, e);
                return Err(e);
            }
            self.state = EndorsementState::Authenticated;

            match self.store.install_certificate(ty, record.cert, base_index) {
                Ok(index) => {
                    log_info!(self.log, MODULE, "installed {} cert at 0x{:08X}", ty, index);
                }
                Err(e) => {
                    log_error!(self.log, MODULE, "cert storage failed, type: {}, {}", ty, e);
                    return Err(e);
                }
            }
        }

        if let Err(e) = self.store.store_endorsement_seed(seed) {
            log_error!(self.log, MODULE, "endorsement seed storage failed, {}", e);
            return Err(e);
        }
        self.state = EndorsementState::Persisted;
        log_info!(self.log, MODULE, "endorsement complete");
        Ok(EndorsementOutcome::Endorsed)
    }

    fn fallback(&mut self) -> Result<EndorsementOutcome> {
        self.state = EndorsementState::FallbackAttempted;
        match install_fallback(self.store, self.config.ek_cert_nv_start_index) {
            Ok(()) => {
                log_warn!(self.log, MODULE, "fixed endorsement installed");
                Ok(EndorsementOutcome::FallbackInstalled)
            }
            Err(e) => {
                log_error!(
                    self.log,
                    MODULE,
                    "failed to install fixed endorsement certs; unknown endorsement state, {}",
                    e
                );
                Err(Error::FallbackFailed)
            }
        }
    }

    fn abort(&mut self, stage: &str, e: Error) -> Error {
        log_error!(self.log, MODULE, "{} failed in state {}, {}", stage, self.state.name(), e);
        e
    }
}
