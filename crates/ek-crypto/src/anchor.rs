// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! RSA trust anchors
//!
//! A trust anchor is a compiled-in RSA public key against which endorsement
//! certificates are verified directly, without chain building. Signatures are
//! PKCS#1 v1.5 over the SHA-256 digest of the raw TBS certificate.

use crate::error::{CryptoError, CryptoResult};
use crate::x509::parse_certificate;
use rsa::{BigUint, Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};

/// Public exponent F4
pub const RSA_F4: u32 = 65_537;

/// RSA-2048 modulus size in bytes
pub const RSA2048_MODULUS_SIZE: usize = 256;

/// A compiled-in root public key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustAnchor {
    /// Short name for diagnostics
    pub name: &'static str,
    /// Big-endian modulus
    pub modulus: &'static [u8],
    /// Public exponent
    pub exponent: u32,
}

impl TrustAnchor {
    /// Create an anchor with exponent F4
    #[must_use]
    pub const fn new(name: &'static str, modulus: &'static [u8]) -> Self {
        Self {
            name,
            modulus,
            exponent: RSA_F4,
        }
    }

    fn public_key(&self) -> CryptoResult<RsaPublicKey> {
        RsaPublicKey::new(
            BigUint::from_bytes_be(self.modulus),
            BigUint::from(self.exponent),
        )
        .map_err(|_| CryptoError::InvalidKey)
    }

    /// Verify a PKCS#1 v1.5 / SHA-256 signature over `message`
    ///
    /// # Errors
    ///
    /// - `CryptoError::InvalidKey` if the anchor is not a usable RSA key
    /// - `CryptoError::InvalidSignature` if the signature does not verify
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> CryptoResult<()> {
        let key = self.public_key()?;
        let digest = Sha256::digest(message);
        key.verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Verify that `der` is a certificate signed by this anchor
    ///
    /// # Errors
    ///
    /// Parse errors from [`parse_certificate`], then as [`TrustAnchor::verify`].
    pub fn verify_certificate(&self, der: &[u8]) -> CryptoResult<()> {
        let cert = parse_certificate(der)?;
        self.verify(cert.tbs, cert.signature)
    }
}

/// Return the first anchor in `anchors` that verifies `der`
///
/// Anchors are tried in order.
///
/// # Errors
///
/// - The parse error if `der` is not a supported certificate
/// - `CryptoError::InvalidSignature` if no anchor verifies it
pub fn find_verifying_anchor<'a>(
    anchors: &'a [TrustAnchor],
    der: &[u8],
) -> CryptoResult<&'a TrustAnchor> {
    let cert = parse_certificate(der)?;
    anchors
        .iter()
        .find(|anchor| anchor.verify(cert.tbs, cert.signature).is_ok())
        .ok_or(CryptoError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_exponent_rejected() {
        static MODULUS: [u8; RSA2048_MODULUS_SIZE] = [0xC3; RSA2048_MODULUS_SIZE];
        let anchor = TrustAnchor {
            name: "bogus",
            modulus: &MODULUS,
            exponent: 1,
        };
        assert_eq!(anchor.verify(b"msg", &[0u8; 256]), Err(CryptoError::InvalidKey));
    }

    #[test]
    fn test_empty_anchor_list_rejects() {
        let toy: &[u8] = &[
            0x30, 0x19, 0x30, 0x03, 0x02, 0x01, 0x01, 0x30, 0x0D, 0x06, 0x09, 0x2A, 0x86, 0x48,
            0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0B, 0x05, 0x00, 0x03, 0x03, 0x00, 0xAA, 0xBB,
        ];
        assert_eq!(find_verifying_anchor(&[], toy), Err(CryptoError::InvalidSignature));
    }
}
