// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Error types for endorsement provisioning
//!
//! This module defines the unified error type used by every provisioning
//! component. Errors are `Copy`, carry no heap data, and map onto a small
//! taxonomy ([`ErrorClass`]) that tells the caller how to react.

use core::fmt;

/// Result type alias for provisioning operations
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for endorsement provisioning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Key Ladder Errors (0x01xx)
    // =========================================================================
    /// A ladder step raised the hardware error flag
    LadderStepFailed,
    /// A ladder step did not report completion within the poll budget
    LadderTimeout,

    // =========================================================================
    // Flash Errors (0x02xx)
    // =========================================================================
    /// A word read from a protected flash window failed
    FlashReadFailed,
    /// Another flash window is already read-enabled
    FlashWindowBusy,
    /// Flash window could not be opened
    FlashWindowFailed,

    // =========================================================================
    // Certificate Region Errors (0x03xx)
    // =========================================================================
    /// Certificate region is still in the erased state (first boot)
    RegionUnprovisioned,
    /// Declared record sizes exceed the region capacity
    RegionOversized,
    /// Region contents cannot be parsed
    RegionMalformed,
    /// Records are not in RSA, then ECC order
    ComponentTypeMismatch,

    // =========================================================================
    // Certificate Errors (0x04xx)
    // =========================================================================
    /// Component type is not a certificate kind
    UnknownComponentType,
    /// Certificate exceeds the NV payload limit
    CertificateTooLarge,
    /// Certificate DER structure is not understood
    CertificateMalformed,
    /// No trust anchor verifies the certificate signature
    CertificateUntrusted,

    // =========================================================================
    // Integrity Errors (0x05xx)
    // =========================================================================
    /// Region tag does not match the recomputed digest
    IntegrityMismatch,

    // =========================================================================
    // Persistence Errors (0x06xx)
    // =========================================================================
    /// Platform hierarchy startup failed
    NvStartupFailed,
    /// NV index is already defined (device already provisioned)
    NvSpaceAlreadyDefined,
    /// NV space definition failed
    NvDefineFailed,
    /// NV write failed
    NvWriteFailed,
    /// NV commit failed
    NvCommitFailed,
    /// Endorsement seed could not be written to its reserved slot
    SeedStoreFailed,

    // =========================================================================
    // Provisioning Outcome Errors (0x07xx)
    // =========================================================================
    /// Fixed fallback identity could not be installed
    FallbackFailed,

    // =========================================================================
    // General Errors (0xFFxx)
    // =========================================================================
    /// Configuration violates a provisioning invariant
    InvalidConfig,
    /// Invalid parameter provided
    InvalidParameter,
    /// Buffer is too small for operation
    BufferTooSmall,
    /// Internal error (should not occur)
    InternalError,
}

/// How the caller should treat an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Blank device before manufacturing; nothing to install yet
    Unprovisioned,
    /// Hardware hiccup; fatal to this pass, caller may reboot and retry
    HardwareTransient,
    /// Corrupted or inconsistent on-device data; never retried
    Structural,
    /// Anticipated mismatch with a defined recovery path
    IntegrityExpected,
    /// NV storage refused the operation
    Persistence,
    /// Build or board configuration is wrong
    Configuration,
}

impl Error {
    /// Get the error code for this error
    ///
    /// Error codes are organized by category:
    /// - 0x01xx: Key ladder errors
    /// - 0x02xx: Flash errors
    /// - 0x03xx: Certificate region errors
    /// - 0x04xx: Certificate errors
    /// - 0x05xx: Integrity errors
    /// - 0x06xx: Persistence errors
    /// - 0x07xx: Provisioning outcome errors
    /// - 0xFFxx: General errors
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::LadderStepFailed => 0x0101,
            Self::LadderTimeout => 0x0102,

            Self::FlashReadFailed => 0x0201,
            Self::FlashWindowBusy => 0x0202,
            Self::FlashWindowFailed => 0x0203,

            Self::RegionUnprovisioned => 0x0301,
            Self::RegionOversized => 0x0302,
            Self::RegionMalformed => 0x0303,
            Self::ComponentTypeMismatch => 0x0304,

            Self::UnknownComponentType => 0x0401,
            Self::CertificateTooLarge => 0x0402,
            Self::CertificateMalformed => 0x0403,
            Self::CertificateUntrusted => 0x0404,

            Self::IntegrityMismatch => 0x0501,

            Self::NvStartupFailed => 0x0601,
            Self::NvSpaceAlreadyDefined => 0x0602,
            Self::NvDefineFailed => 0x0603,
            Self::NvWriteFailed => 0x0604,
            Self::NvCommitFailed => 0x0605,
            Self::SeedStoreFailed => 0x0606,

            Self::FallbackFailed => 0x0701,

            Self::InvalidConfig => 0xFF01,
            Self::InvalidParameter => 0xFF02,
            Self::BufferTooSmall => 0xFF03,
            Self::InternalError => 0xFFFF,
        }
    }

    /// Classify the error
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::LadderStepFailed
            | Self::LadderTimeout
            | Self::FlashReadFailed
            | Self::FlashWindowBusy
            | Self::FlashWindowFailed => ErrorClass::HardwareTransient,

            Self::RegionUnprovisioned => ErrorClass::Unprovisioned,

            Self::RegionOversized
            | Self::RegionMalformed
            | Self::ComponentTypeMismatch
            | Self::UnknownComponentType
            | Self::CertificateTooLarge
            | Self::CertificateMalformed
            | Self::CertificateUntrusted => ErrorClass::Structural,

            Self::IntegrityMismatch => ErrorClass::IntegrityExpected,

            Self::NvStartupFailed
            | Self::NvSpaceAlreadyDefined
            | Self::NvDefineFailed
            | Self::NvWriteFailed
            | Self::NvCommitFailed
            | Self::SeedStoreFailed
            | Self::FallbackFailed => ErrorClass::Persistence,

            Self::InvalidConfig
            | Self::InvalidParameter
            | Self::BufferTooSmall
            | Self::InternalError => ErrorClass::Configuration,
        }
    }

    /// Whether rebooting and re-running the whole pass may succeed
    ///
    /// Nothing is retried inside a pass.
    #[must_use]
    pub const fn is_retryable_by_caller(&self) -> bool {
        matches!(self.class(), ErrorClass::HardwareTransient)
    }

    /// Get a short description of the error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::LadderStepFailed => "key ladder step failed",
            Self::LadderTimeout => "key ladder step timed out",
            Self::FlashReadFailed => "flash read failed",
            Self::FlashWindowBusy => "flash window busy",
            Self::FlashWindowFailed => "flash window unavailable",
            Self::RegionUnprovisioned => "certificate region unprovisioned",
            Self::RegionOversized => "certificate region oversized",
            Self::RegionMalformed => "certificate region malformed",
            Self::ComponentTypeMismatch => "unexpected component type",
            Self::UnknownComponentType => "unknown component type",
            Self::CertificateTooLarge => "certificate too large",
            Self::CertificateMalformed => "certificate malformed",
            Self::CertificateUntrusted => "certificate not signed by a trusted root",
            Self::IntegrityMismatch => "certificate region tag mismatch",
            Self::NvStartupFailed => "hierarchy startup failed",
            Self::NvSpaceAlreadyDefined => "NV space already defined",
            Self::NvDefineFailed => "NV define space failed",
            Self::NvWriteFailed => "NV write failed",
            Self::NvCommitFailed => "NV commit failed",
            Self::SeedStoreFailed => "endorsement seed store failed",
            Self::FallbackFailed => "fallback endorsement failed",
            Self::InvalidConfig => "invalid configuration",
            Self::InvalidParameter => "invalid parameter",
            Self::BufferTooSmall => "buffer too small",
            Self::InternalError => "internal error",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:04X}] {}", self.code(), self.description())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[0x{:04X}] {}", self.code(), self.description());
    }
}
