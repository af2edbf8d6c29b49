// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Integration tests for ek-endorse
//!
//! Full provisioning passes against the simulated key ladder, protected
//! flash and NV engine. Certificates are the DER fixtures shared with
//! ek-crypto, signed by two RSA-2048 test roots.

use ek_common::constants::{CERT_REGION_SIZE, ENDORSEMENT_SEED_SIZE, REGION_TAG_SIZE};
use ek_common::{EndorsementConfig, Error, LogBuffer, Result};
use ek_crypto::TrustAnchor;
use ek_endorse::ladder::step_sequence;
use ek_endorse::{EndorsementOutcome, EndorsementState, Endorser, IdentityStore};
use ek_hal::sim::{SimFlash, SimKeyLadder, SimNvStorage};
use hmac::{Hmac, Mac};
use sha2::Sha256;

const PROD_ROOT: &[u8] = include_bytes!("../../ek-crypto/tests/fixtures/prod_root_modulus.bin");
const DEV_ROOT: &[u8] = include_bytes!("../../ek-crypto/tests/fixtures/dev_root_modulus.bin");
const RSA_EK_PROD: &[u8] = include_bytes!("../../ek-crypto/tests/fixtures/rsa_ek_prod.der");
const ECC_EK_PROD: &[u8] = include_bytes!("../../ek-crypto/tests/fixtures/ecc_ek_prod.der");
const RSA_EK_DEV: &[u8] = include_bytes!("../../ek-crypto/tests/fixtures/rsa_ek_dev.der");
const ECC_EK_DEV: &[u8] = include_bytes!("../../ek-crypto/tests/fixtures/ecc_ek_dev.der");
const RSA_EK_ROGUE: &[u8] = include_bytes!("../../ek-crypto/tests/fixtures/rsa_ek_rogue.der");
const RSA_EK_OVERSIZED: &[u8] =
    include_bytes!("../../ek-crypto/tests/fixtures/rsa_ek_oversized.der");

const ANCHORS: [TrustAnchor; 2] = [
    TrustAnchor::new("prod", PROD_ROOT),
    TrustAnchor::new("dev", DEV_ROOT),
];

const DEVICE_SECRET: [u8; 32] = [0x5C; 32];
const BASE: u32 = 0x01C0_0000;

fn test_seed() -> [u8; ENDORSEMENT_SEED_SIZE] {
    let mut seed = [0u8; ENDORSEMENT_SEED_SIZE];
    for (i, b) in seed.iter_mut().enumerate() {
        *b = 0xA0 ^ (i as u8);
    }
    seed
}

/// Key the simulated ladder produces for `config`
fn ladder_key(config: &EndorsementConfig) -> [u8; 32] {
    let steps: Vec<u8> = step_sequence(&config.ladder).collect();
    SimKeyLadder::expected_output(&DEVICE_SECRET, &steps)
}

/// HMAC(HMAC(seed, "RSA\0"), body)
fn reference_tag(seed: &[u8], body: &[u8]) -> [u8; 32] {
    let mut mac = Hmac::<Sha256>::new_from_slice(seed).unwrap();
    mac.update(b"RSA\0");
    let subkey = mac.finalize().into_bytes();
    let mut mac = Hmac::<Sha256>::new_from_slice(&subkey).unwrap();
    mac.update(body);
    mac.finalize().into_bytes().into()
}

fn put_record(buf: &mut [u8], offset: usize, ty: u8, cert: &[u8]) -> usize {
    let len = cert.len();
    buf[offset..offset + 2].copy_from_slice(&((len + 8) as u16).to_le_bytes());
    buf[offset + 2] = ty;
    buf[offset + 3..offset + 8].fill(0);
    buf[offset + 8..offset + 12].copy_from_slice(b"EKID");
    buf[offset + 12..offset + 16].copy_from_slice(&(len as u32).to_le_bytes());
    buf[offset + 16..offset + 16 + len].copy_from_slice(cert);
    offset + 16 + len
}

/// Region image with both records and a tag keyed by `seed`
fn region_image(rsa: &[u8], ecc: &[u8], seed: &[u8]) -> [u8; CERT_REGION_SIZE] {
    let mut buf = [0xFFu8; CERT_REGION_SIZE];
    let next = put_record(&mut buf, 0, 129, rsa);
    put_record(&mut buf, next, 130, ecc);
    seal(&mut buf, seed);
    buf
}

fn seal(buf: &mut [u8; CERT_REGION_SIZE], seed: &[u8]) {
    let body_len = CERT_REGION_SIZE - REGION_TAG_SIZE;
    let tag = reference_tag(seed, &buf[..body_len]);
    buf[body_len..].copy_from_slice(&tag);
}

struct Device {
    ladder: SimKeyLadder,
    flash: SimFlash,
    store: IdentityStore<SimNvStorage>,
    log: LogBuffer,
}

impl Device {
    fn blank() -> Self {
        Self {
            ladder: SimKeyLadder::new(DEVICE_SECRET),
            flash: SimFlash::new(),
            store: IdentityStore::new(SimNvStorage::new()),
            log: LogBuffer::new(),
        }
    }

    /// Device whose info block holds the masked test seed and whose
    /// certificate region is `image`
    fn provisioned(image: &[u8; CERT_REGION_SIZE]) -> Self {
        let config = EndorsementConfig::DEFAULT;
        let key = ladder_key(&config);
        let mut masked = test_seed();
        for (m, k) in masked.iter_mut().zip(key.iter()) {
            *m ^= k;
        }
        let mut device = Self::blank();
        device
            .flash
            .program_seed(config.seed_offset as usize, &masked)
            .unwrap();
        device.flash.program_cert_region(image);
        device
    }

    fn with_certs(rsa: &[u8], ecc: &[u8]) -> Self {
        Self::provisioned(&region_image(rsa, ecc, &test_seed()))
    }

    fn run_with(&mut self, config: &EndorsementConfig) -> (Result<EndorsementOutcome>, EndorsementState) {
        let mut endorser = Endorser::new(
            &mut self.ladder,
            &mut self.flash,
            &mut self.store,
            config,
            &ANCHORS,
            &mut self.log,
        )
        .unwrap();
        let result = endorser.run();
        (result, endorser.state())
    }

    fn run(&mut self) -> (Result<EndorsementOutcome>, EndorsementState) {
        self.run_with(&EndorsementConfig::DEFAULT)
    }

    fn nv(&self) -> &SimNvStorage {
        self.store.nv()
    }
}

mod scenario_tests {
    use super::*;
    use ek_endorse::fixed::{
        FIXED_ECC_ENDORSEMENT_CERT, FIXED_ENDORSEMENT_SEED, FIXED_RSA_ENDORSEMENT_CERT,
    };
    use ek_hal::sim::NvOp;
    use ek_hal::{ReservedSlot, StartupType};

    #[test]
    fn test_unprovisioned_region_skips_everything() {
        let mut device = Device::blank();
        let (result, state) = device.run();

        assert_eq!(result, Err(Error::RegionUnprovisioned));
        assert_eq!(state, EndorsementState::Start);
        assert!(device.nv().ops().is_empty());
        assert_eq!(device.ladder.resets(), 0);
        assert!(!device.flash.any_window_open());
        assert!(device.log.contains("unprovisioned"));
    }

    #[test]
    fn test_valid_region_endorses_device() {
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_PROD);
        let (result, state) = device.run();

        assert_eq!(result, Ok(EndorsementOutcome::Endorsed));
        assert_eq!(state, EndorsementState::Persisted);

        let nv = device.nv();
        assert_eq!(nv.data(BASE), Some(RSA_EK_PROD));
        assert_eq!(nv.data(BASE + 1), Some(ECC_EK_PROD));
        assert_eq!(nv.endorsement_seed(), Some(&test_seed()));
        assert!(!nv.has_uncommitted());
        assert_eq!(
            nv.ops(),
            &[
                NvOp::Startup(StartupType::Reset),
                NvOp::Define { index: BASE, size: RSA_EK_PROD.len() as u16 },
                NvOp::Write { index: BASE, len: RSA_EK_PROD.len() },
                NvOp::Commit,
                NvOp::Startup(StartupType::Reset),
                NvOp::Define { index: BASE + 1, size: ECC_EK_PROD.len() as u16 },
                NvOp::Write { index: BASE + 1, len: ECC_EK_PROD.len() },
                NvOp::Commit,
                NvOp::WriteReserved(ReservedSlot::EndorsementSeed),
                NvOp::Commit,
            ]
        );
        assert!(device.store.endorsement_seed_installed());
        assert!(device.log.contains("endorsement complete"));
        assert!(!device.flash.any_window_open());
    }

    #[test]
    fn test_development_signed_region_endorses_device() {
        let mut device = Device::with_certs(RSA_EK_DEV, ECC_EK_DEV);
        let (result, _) = device.run();
        assert_eq!(result, Ok(EndorsementOutcome::Endorsed));
        assert_eq!(device.nv().data(BASE), Some(RSA_EK_DEV));
    }

    #[test]
    fn test_tag_mismatch_installs_fixed_endorsement() {
        let mut image = region_image(RSA_EK_PROD, ECC_EK_PROD, &test_seed());
        image[CERT_REGION_SIZE - 1] ^= 0x01;
        let mut device = Device::provisioned(&image);
        let (result, state) = device.run();

        assert_eq!(result, Ok(EndorsementOutcome::FallbackInstalled));
        assert_eq!(state, EndorsementState::FallbackAttempted);

        let nv = device.nv();
        assert_eq!(nv.endorsement_seed(), Some(&FIXED_ENDORSEMENT_SEED));
        assert_eq!(nv.data(BASE), Some(&FIXED_RSA_ENDORSEMENT_CERT[..]));
        assert_eq!(nv.data(BASE + 1), Some(&FIXED_ECC_ENDORSEMENT_CERT[..]));
        assert_eq!(nv.ops()[0], NvOp::Startup(StartupType::Reset));
        assert_eq!(
            nv.ops()[nv.ops().len() - 2..],
            [NvOp::WriteReserved(ReservedSlot::EndorsementSeed), NvOp::Commit]
        );
        assert!(device
            .log
            .contains("bad cert region hmac; falling back to fixed endorsement"));
    }

    #[test]
    fn test_region_sealed_under_other_seed_falls_back() {
        let mut device = Device::provisioned(&region_image(RSA_EK_PROD, ECC_EK_PROD, &[0u8; 32]));
        let (result, _) = device.run();
        assert_eq!(result, Ok(EndorsementOutcome::FallbackInstalled));
    }

    #[test]
    fn test_fallback_failure_is_reported() {
        let mut image = region_image(RSA_EK_PROD, ECC_EK_PROD, &test_seed());
        image[100] ^= 0xFF;
        let mut device = Device::provisioned(&image);
        device.store.nv_mut().faults.define_index = Some(BASE);
        let (result, state) = device.run();

        assert_eq!(result, Err(Error::FallbackFailed));
        assert_eq!(state, EndorsementState::FallbackAttempted);
        assert!(device.log.contains("unknown endorsement state"));
    }

    #[test]
    fn test_oversized_region_rejected_before_install() {
        let mut image = region_image(RSA_EK_PROD, ECC_EK_PROD, &test_seed());
        let huge = (CERT_REGION_SIZE as u32).to_le_bytes();
        image[12..16].copy_from_slice(&huge);
        // Re-seal so only the structure is wrong
        seal(&mut image, &test_seed());
        let mut device = Device::provisioned(&image);
        let (result, state) = device.run();

        assert_eq!(result, Err(Error::RegionOversized));
        assert_eq!(state, EndorsementState::SeedRecovered);
        assert!(device.nv().ops().is_empty());
    }

    #[test]
    fn test_swapped_records_rejected() {
        let mut image = [0xFFu8; CERT_REGION_SIZE];
        let next = put_record(&mut image, 0, 130, ECC_EK_PROD);
        put_record(&mut image, next, 129, RSA_EK_PROD);
        seal(&mut image, &test_seed());
        let mut device = Device::provisioned(&image);

        let (result, _) = device.run();
        assert_eq!(result, Err(Error::ComponentTypeMismatch));
        assert!(device.nv().ops().is_empty());
    }

    #[test]
    fn test_bool_entry_point() {
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_PROD);
        let config = EndorsementConfig::DEFAULT;
        let mut endorser = Endorser::new(
            &mut device.ladder,
            &mut device.flash,
            &mut device.store,
            &config,
            &ANCHORS,
            &mut device.log,
        )
        .unwrap();
        assert!(endorser.endorse());
        assert!(!endorser.endorse());
    }
}

mod idempotence_tests {
    use super::*;
    use ek_hal::sim::NvOp;

    #[test]
    fn test_second_pass_refuses_to_redefine() {
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_PROD);
        assert_eq!(device.run().0, Ok(EndorsementOutcome::Endorsed));
        device.store.nv_mut().clear_ops();

        let (result, _) = device.run();
        assert_eq!(result, Err(Error::NvSpaceAlreadyDefined));
        assert!(!device
            .nv()
            .ops()
            .iter()
            .any(|op| matches!(op, NvOp::Write { .. } | NvOp::WriteReserved(_))));
        assert_eq!(device.nv().data(BASE), Some(RSA_EK_PROD));
        assert_eq!(device.nv().endorsement_seed(), Some(&test_seed()));
        assert!(device.log.contains("cert storage failed"));
    }

    #[test]
    fn test_second_fallback_fails() {
        let mut image = region_image(RSA_EK_PROD, ECC_EK_PROD, &test_seed());
        image[0x7F0] ^= 0x10;
        let mut device = Device::provisioned(&image);
        assert_eq!(device.run().0, Ok(EndorsementOutcome::FallbackInstalled));
        assert_eq!(device.run().0, Err(Error::FallbackFailed));
    }

    #[test]
    fn test_tag_mismatch_after_endorsement_keeps_genuine_seed() {
        let mut image = region_image(RSA_EK_PROD, ECC_EK_PROD, &test_seed());
        let mut device = Device::provisioned(&image);
        assert_eq!(device.run().0, Ok(EndorsementOutcome::Endorsed));
        device.store.nv_mut().clear_ops();

        image[0x7F0] ^= 0x10;
        device.flash.program_cert_region(&image);
        let (result, state) = device.run();

        assert_eq!(result, Err(Error::FallbackFailed));
        assert_eq!(state, EndorsementState::FallbackAttempted);
        assert_eq!(device.nv().endorsement_seed(), Some(&test_seed()));
        assert_eq!(device.nv().data(BASE), Some(RSA_EK_PROD));
        assert_eq!(device.nv().data(BASE + 1), Some(ECC_EK_PROD));
        assert!(!device
            .nv()
            .ops()
            .iter()
            .any(|op| matches!(op, NvOp::Write { .. } | NvOp::WriteReserved(_))));
    }
}

mod ladder_tests {
    use super::*;
    use ek_endorse::KeyLadder;

    #[test]
    fn test_derivation_is_deterministic() {
        let config = EndorsementConfig::DEFAULT;
        let mut a = SimKeyLadder::new(DEVICE_SECRET);
        let mut b = SimKeyLadder::new(DEVICE_SECRET);
        b.set_latency(5);

        let k1 = KeyLadder::new(&mut a, config.ladder).derive().unwrap();
        let k2 = KeyLadder::new(&mut a, config.ladder).derive().unwrap();
        let k3 = KeyLadder::new(&mut b, config.ladder).derive().unwrap();

        assert_eq!(k1.as_bytes(), k2.as_bytes());
        assert_eq!(k1.as_bytes(), k3.as_bytes());
        assert_eq!(k1.as_bytes(), &ladder_key(&config));
        assert_eq!(a.resets(), 2);
    }

    #[test]
    fn test_version_changes_key() {
        let v0 = EndorsementConfig::DEFAULT;
        let mut v1 = EndorsementConfig::DEFAULT;
        v1.ladder.firmware_major_version = 1;
        assert_ne!(ladder_key(&v0), ladder_key(&v1));

        let mut ladder = SimKeyLadder::new(DEVICE_SECRET);
        KeyLadder::new(&mut ladder, v1.ladder).derive().unwrap();
        assert_eq!(ladder.step_count(), 7 + 253 + 1);
    }

    #[test]
    fn test_newer_firmware_cannot_unmask_seed() {
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_PROD);
        let mut config = EndorsementConfig::DEFAULT;
        config.ladder.firmware_major_version = 1;
        let (result, _) = device.run_with(&config);
        assert_eq!(result, Ok(EndorsementOutcome::FallbackInstalled));
    }

    #[test]
    fn test_step_error_aborts_pass() {
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_PROD);
        device.ladder.fail_at_step(100);
        let (result, state) = device.run();

        assert_eq!(result, Err(Error::LadderStepFailed));
        assert_eq!(state, EndorsementState::Start);
        assert_eq!(device.ladder.step_count(), 101);
        assert!(device.nv().ops().is_empty());
        // Only the certificate region was ever mapped
        assert_eq!(device.flash.enables(), 1);
        assert!(device.log.contains("key ladder failed"));
    }

    #[test]
    fn test_hung_step_times_out() {
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_PROD);
        device.ladder.hang_at_step(3);
        let mut config = EndorsementConfig::DEFAULT;
        config.ladder.poll_budget = 1000;
        let (result, _) = device.run_with(&config);

        assert_eq!(result, Err(Error::LadderTimeout));
        assert!(Error::LadderTimeout.is_retryable_by_caller());
        assert!(device.nv().ops().is_empty());
    }
}

mod seed_tests {
    use super::*;
    use ek_endorse::{recover_seed, DerivedKey};
    use ek_hal::FlashWindow;

    #[test]
    fn test_read_fault_aborts_and_closes_window() {
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_PROD);
        device.flash.fail_read_at(FlashWindow::ManufactureState, 8);
        let (result, state) = device.run();

        assert_eq!(result, Err(Error::FlashReadFailed));
        assert_eq!(state, EndorsementState::LadderDerived);
        assert!(!device.flash.any_window_open());
        assert_eq!(device.flash.enables(), device.flash.disables());
        assert!(device.nv().ops().is_empty());
    }

    #[test]
    fn test_key_zeroized_after_recovery() {
        let config = EndorsementConfig::DEFAULT;
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_PROD);
        let mut key = DerivedKey::from_slice(&ladder_key(&config)).unwrap();

        let seed = recover_seed(&mut device.flash, &config, &mut key).unwrap();
        assert_eq!(seed.as_bytes(), &test_seed());
        assert!(key.is_zeroed());
    }

    #[test]
    fn test_window_busy_is_reported() {
        use ek_hal::FlashWindowInterface;

        let config = EndorsementConfig::DEFAULT;
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_PROD);
        device
            .flash
            .enable_read(FlashWindow::CertRegion, config.cert_region)
            .unwrap();
        let mut key = DerivedKey::from_slice(&[1u8; 32]).unwrap();

        assert_eq!(
            recover_seed(&mut device.flash, &config, &mut key).unwrap_err(),
            Error::FlashWindowBusy
        );
        assert!(key.is_zeroed());
    }
}

mod authentication_tests {
    use super::*;

    #[test]
    fn test_rogue_rsa_cert_installs_nothing() {
        let mut device = Device::with_certs(RSA_EK_ROGUE, ECC_EK_PROD);
        let (result, state) = device.run();

        assert_eq!(result, Err(Error::CertificateUntrusted));
        assert_eq!(state, EndorsementState::IntegrityOk);
        assert!(device.nv().ops().is_empty());
        assert!(device.log.contains("cert authentication failed"));
    }

    #[test]
    fn test_rogue_ecc_cert_stops_before_seed() {
        let mut device = Device::with_certs(RSA_EK_PROD, RSA_EK_ROGUE);
        let (result, _) = device.run();

        assert_eq!(result, Err(Error::CertificateUntrusted));
        assert!(device.nv().is_defined(BASE));
        assert!(!device.nv().is_defined(BASE + 1));
        assert!(device.nv().endorsement_seed().is_none());
        assert!(!device.store.endorsement_seed_installed());
    }

    #[test]
    fn test_oversized_cert_rejected_despite_valid_signature() {
        let mut device = Device::with_certs(RSA_EK_OVERSIZED, ECC_EK_PROD);
        let (result, _) = device.run();
        assert_eq!(result, Err(Error::CertificateTooLarge));
        assert!(device.nv().ops().is_empty());
    }

    #[test]
    fn test_mixed_roots_accepted() {
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_DEV);
        assert_eq!(device.run().0, Ok(EndorsementOutcome::Endorsed));
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn test_rsa_write_failure_stops_ecc_and_seed() {
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_PROD);
        device.store.nv_mut().faults.write_index = Some(BASE);
        let (result, state) = device.run();

        assert_eq!(result, Err(Error::NvWriteFailed));
        assert_eq!(state, EndorsementState::Authenticated);
        assert!(!device.nv().is_defined(BASE + 1));
        assert!(device.nv().endorsement_seed().is_none());
    }

    #[test]
    fn test_seed_store_failure_reported() {
        let mut device = Device::with_certs(RSA_EK_PROD, ECC_EK_PROD);
        device.store.nv_mut().faults.reserved = true;
        let (result, state) = device.run();

        assert_eq!(result, Err(Error::SeedStoreFailed));
        assert_ne!(state, EndorsementState::Persisted);
        assert!(device.nv().is_defined(BASE + 1));
        assert!(!device.store.endorsement_seed_installed());
        assert!(!device.log.contains("endorsement complete"));
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_invalid_config_rejected() {
        let mut device = Device::blank();
        let config = EndorsementConfig {
            seed_size: 16,
            ..EndorsementConfig::DEFAULT
        };
        let result = Endorser::new(
            &mut device.ladder,
            &mut device.flash,
            &mut device.store,
            &config,
            &ANCHORS,
            &mut device.log,
        );
        assert!(matches!(result, Err(Error::InvalidConfig)));
    }

    #[test]
    fn test_empty_anchor_list_rejected() {
        let mut device = Device::blank();
        let result = Endorser::new(
            &mut device.ladder,
            &mut device.flash,
            &mut device.store,
            &EndorsementConfig::DEFAULT,
            &[],
            &mut device.log,
        );
        assert!(matches!(result, Err(Error::InvalidConfig)));
    }
}
