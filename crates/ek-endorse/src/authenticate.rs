// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Certificate authenticator
//!
//! Endorsement certificates are checked directly against an ordered list of
//! trust anchors; a certificate is accepted if any anchor verifies it.

use ek_common::{ComponentType, Error, Result};
use ek_crypto::{find_verifying_anchor, TrustAnchor};

/// Verifies endorsement certificates against compiled-in roots
#[derive(Debug, Clone, Copy)]
pub struct CertificateAuthenticator<'a> {
    anchors: &'a [TrustAnchor],
    max_certificate_size: usize,
}

impl<'a> CertificateAuthenticator<'a> {
    /// Create an authenticator over `anchors`, tried in order
    #[must_use]
    pub const fn new(anchors: &'a [TrustAnchor], max_certificate_size: usize) -> Self {
        Self {
            anchors,
            max_certificate_size,
        }
    }

    /// Trust anchors in the order they are tried
    #[must_use]
    pub const fn anchors(&self) -> &'a [TrustAnchor] {
        self.anchors
    }

    /// Check a certificate and return the anchor that signed it
    ///
    /// # Errors
    ///
    /// - `Error::UnknownComponentType` if `component_type` is not a certificate
    /// - `Error::CertificateTooLarge` if `cert` exceeds the size limit
    /// - `Error::CertificateMalformed` if `cert` is not a supported certificate
    /// - `Error::CertificateUntrusted` if no anchor verifies it
    pub fn check(&self, component_type: ComponentType, cert: &[u8]) -> Result<&'a TrustAnchor> {
        if !component_type.is_certificate() {
            return Err(Error::UnknownComponentType);
        }
        if cert.len() > self.max_certificate_size {
            return Err(Error::CertificateTooLarge);
        }
        find_verifying_anchor(self.anchors, cert).map_err(Error::from)
    }

    /// Whether `cert` is an acceptable endorsement certificate
    #[must_use]
    pub fn authenticate(&self, component_type: ComponentType, cert: &[u8]) -> bool {
        self.check(component_type, cert).is_ok()
    }
}
