// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Tests for ek-common
//!
//! Error taxonomy, configuration invariants, shared types and the log buffer.

mod error_tests {
    use ek_common::{Error, ErrorClass};
    use std::collections::HashSet;

    const ALL: [Error; 25] = [
        Error::LadderStepFailed,
        Error::LadderTimeout,
        Error::FlashReadFailed,
        Error::FlashWindowBusy,
        Error::FlashWindowFailed,
        Error::RegionUnprovisioned,
        Error::RegionOversized,
        Error::RegionMalformed,
        Error::ComponentTypeMismatch,
        Error::UnknownComponentType,
        Error::CertificateTooLarge,
        Error::CertificateMalformed,
        Error::CertificateUntrusted,
        Error::IntegrityMismatch,
        Error::NvStartupFailed,
        Error::NvSpaceAlreadyDefined,
        Error::NvDefineFailed,
        Error::NvWriteFailed,
        Error::NvCommitFailed,
        Error::SeedStoreFailed,
        Error::FallbackFailed,
        Error::InvalidConfig,
        Error::InvalidParameter,
        Error::BufferTooSmall,
        Error::InternalError,
    ];

    #[test]
    fn test_error_codes_unique() {
        let unique: HashSet<u16> = ALL.iter().map(Error::code).collect();
        assert_eq!(unique.len(), ALL.len());
    }

    #[test]
    fn test_only_hardware_errors_are_retryable() {
        for e in ALL {
            assert_eq!(
                e.is_retryable_by_caller(),
                e.class() == ErrorClass::HardwareTransient,
                "{e}"
            );
        }
    }

    #[test]
    fn test_structural_errors() {
        for e in [
            Error::RegionOversized,
            Error::ComponentTypeMismatch,
            Error::CertificateTooLarge,
        ] {
            assert_eq!(e.class(), ErrorClass::Structural);
        }
    }

    #[test]
    fn test_only_blank_region_is_unprovisioned() {
        for e in ALL {
            assert_eq!(
                e.class() == ErrorClass::Unprovisioned,
                e == Error::RegionUnprovisioned,
                "{e}"
            );
        }
    }

    #[test]
    fn test_persistence_errors() {
        for e in [
            Error::NvSpaceAlreadyDefined,
            Error::NvDefineFailed,
            Error::NvWriteFailed,
            Error::SeedStoreFailed,
        ] {
            assert_eq!(e.class(), ErrorClass::Persistence);
        }
    }

    #[test]
    fn test_error_display() {
        let display = format!("{}", Error::NvSpaceAlreadyDefined);
        assert!(display.starts_with("[0x0602]"));
        assert!(display.contains("already defined"));
    }
}

mod config_tests {
    use ek_common::{EndorsementConfig, Error, FlashRegion, LadderConfig};

    #[test]
    fn test_default_layout() {
        let config = EndorsementConfig::DEFAULT;
        assert_eq!(config.cert_region, FlashRegion::new(0x43800, 0x800));
        assert_eq!(config.ek_cert_nv_start_index, 0x01C0_0000);
        assert_eq!(config.max_certificate_size, 1024);
        assert_eq!(config.ladder.version_steps(), 254);
        assert!(config.validate().is_ok());
        assert_eq!(EndorsementConfig::default(), config);
    }

    #[test]
    fn test_cert_region_size_fixed() {
        let config = EndorsementConfig {
            cert_region: FlashRegion::new(0x43800, 0x1000),
            ..EndorsementConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_zero_poll_budget_rejected() {
        let config = EndorsementConfig {
            ladder: LadderConfig {
                poll_budget: 0,
                ..LadderConfig::DEFAULT
            },
            ..EndorsementConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_nv_index_overflow_rejected() {
        let config = EndorsementConfig {
            ek_cert_nv_start_index: u32::MAX,
            ..EndorsementConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_version_steps_shrink_with_version() {
        let ladder = LadderConfig {
            firmware_major_version: 10,
            ..LadderConfig::DEFAULT
        };
        assert_eq!(ladder.version_steps(), 244);
    }
}

mod types_tests {
    use ek_common::{ComponentType, FlashRegion, RegionDescriptor};

    #[test]
    fn test_certificate_components() {
        assert!(ComponentType::RsaCert.is_certificate());
        assert!(ComponentType::P256Cert.is_certificate());
        assert!(!ComponentType::Eps.is_certificate());
        assert_eq!(ComponentType::Eps.nv_index_offset(), None);
        assert_eq!(ComponentType::from_u8(131), None);
        assert_eq!(format!("{}", ComponentType::RsaCert), "RSA(129)");
    }

    #[test]
    fn test_region_end_overflow() {
        assert_eq!(FlashRegion::new(0x1000, 0x100).end(), Some(0x1100));
        assert_eq!(FlashRegion::new(u32::MAX, 2).end(), None);
    }

    #[test]
    fn test_descriptor_starts_closed() {
        let d = RegionDescriptor::closed(FlashRegion::new(0x43800, 0x800));
        assert!(!d.read_enabled);
    }
}

mod log_tests {
    use ek_common::log::LogLevel;
    use ek_common::{log_error, log_info, LogBuffer};

    #[test]
    fn test_macros_record_module_and_message() {
        let mut log = LogBuffer::new();
        log_info!(log, "endorse", "installed {} cert", "RSA");
        log_error!(log, "endorse", "cert storage failed, type: {}", 129);

        let entries: Vec<_> = log.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].module, "endorse");
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[1].message.as_str(), "cert storage failed, type: 129");
        assert!(entries[0].sequence < entries[1].sequence);
    }

    #[test]
    fn test_clear_keeps_sequence_running() {
        let mut log = LogBuffer::new();
        log_info!(log, "test", "before");
        log.clear();
        assert!(log.is_empty());
        assert!(!log.contains("before"));

        log_info!(log, "test", "after");
        assert_eq!(log.len(), 1);
        assert_eq!(log.iter().next().unwrap().sequence, 1);
    }
}
