// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Cryptographic error types

use core::fmt;

/// Error type for cryptographic operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid key format or size
    InvalidKey,
    /// Signature verification failed
    InvalidSignature,
    /// DER structure could not be parsed
    MalformedCertificate,
    /// Signature algorithm is not sha256WithRSAEncryption
    UnsupportedAlgorithm,
    /// Buffer is too small for the operation
    BufferTooSmall,
    /// Internal error (should not occur)
    InternalError,
}

impl CryptoError {
    /// Get error code for logging/debugging
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::InvalidKey => 0x0C01,
            Self::InvalidSignature => 0x0C02,
            Self::MalformedCertificate => 0x0C03,
            Self::UnsupportedAlgorithm => 0x0C04,
            Self::BufferTooSmall => 0x0C05,
            Self::InternalError => 0x0CFF,
        }
    }

    /// Get error description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidKey => "invalid key",
            Self::InvalidSignature => "invalid signature",
            Self::MalformedCertificate => "malformed certificate",
            Self::UnsupportedAlgorithm => "unsupported algorithm",
            Self::BufferTooSmall => "buffer too small",
            Self::InternalError => "internal error",
        }
    }
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:04X}] {}", self.code(), self.description())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CryptoError {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[0x{:04X}] {}", self.code(), self.description());
    }
}

impl From<CryptoError> for ek_common::Error {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidSignature | CryptoError::InvalidKey => Self::CertificateUntrusted,
            CryptoError::MalformedCertificate | CryptoError::UnsupportedAlgorithm => {
                Self::CertificateMalformed
            }
            CryptoError::BufferTooSmall => Self::BufferTooSmall,
            CryptoError::InternalError => Self::InternalError,
        }
    }
}

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;
