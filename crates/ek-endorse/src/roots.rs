// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Compiled-in endorsement trust anchors
//!
//! Two RSA-2048 roots, e = 65537. Devices are provisioned under one or the
//! other depending on the signing mode of the factory image, so both stay
//! acceptable.

use ek_crypto::anchor::{TrustAnchor, RSA2048_MODULUS_SIZE};

/// Production root modulus (big-endian)
pub const PRODUCTION_ROOT_MODULUS: [u8; RSA2048_MODULUS_SIZE] = [
    0xbd, 0x6f, 0x01, 0x98, 0xff, 0xa7, 0xf7, 0xd2, 0x0c, 0x15, 0xf8, 0x16,
    0x42, 0x09, 0x6e, 0x33, 0x5e, 0x2c, 0xd7, 0x47, 0x34, 0xf7, 0x30, 0x08,
    0x26, 0x5f, 0xc9, 0x95, 0x7b, 0xbe, 0x01, 0x8d, 0xfb, 0xac, 0x0d, 0x2a,
    0x0e, 0xa9, 0x9f, 0x5f, 0xb7, 0xbb, 0xff, 0x6f, 0x0d, 0x36, 0x7b, 0x81,
    0x19, 0x9e, 0x83, 0x7c, 0x39, 0x05, 0x27, 0x97, 0x2a, 0xa5, 0x39, 0x2c,
    0x2c, 0xa0, 0xf2, 0xa3, 0x50, 0x6e, 0xe7, 0xd4, 0xa9, 0x38, 0xf4, 0x71,
    0x58, 0xa7, 0xc5, 0x6a, 0x39, 0x0d, 0xf2, 0xb7, 0x81, 0x34, 0x4a, 0x82,
    0xb8, 0x85, 0xa6, 0x2f, 0x1d, 0xe7, 0x8f, 0x37, 0xec, 0x10, 0x57, 0x49,
    0x69, 0xd8, 0xab, 0xf3, 0x16, 0x3f, 0x0c, 0xf5, 0xc6, 0x7f, 0xa0, 0x5d,
    0xd4, 0xfb, 0x3e, 0xb0, 0x7a, 0x75, 0x71, 0x88, 0x8b, 0x7a, 0x87, 0xed,
    0x57, 0x73, 0x5c, 0xe4, 0x76, 0x15, 0x6b, 0xf7, 0xd6, 0xef, 0xf6, 0xcb,
    0x8c, 0x8b, 0x30, 0x3c, 0x21, 0xeb, 0xfe, 0x0e, 0x11, 0xb6, 0x60, 0xed,
    0xbd, 0xf9, 0x03, 0xc7, 0x0a, 0xc1, 0x69, 0x27, 0x34, 0x5d, 0x0b, 0x38,
    0xc7, 0x2f, 0x1e, 0x60, 0x14, 0x60, 0x74, 0x35, 0x84, 0xf5, 0xa3, 0xea,
    0xef, 0x30, 0x3d, 0xbc, 0x5c, 0xfd, 0xa4, 0x8e, 0x4c, 0x7a, 0x1f, 0x33,
    0x81, 0x08, 0xc7, 0xf0, 0xc7, 0x0a, 0x69, 0x4f, 0x81, 0x4b, 0x66, 0x91,
    0xba, 0x9d, 0x05, 0x8a, 0xb9, 0x88, 0x15, 0x2b, 0xb7, 0x09, 0x7a, 0x01,
    0x0e, 0x40, 0x04, 0x62, 0x18, 0x78, 0x11, 0xc3, 0xe0, 0x62, 0x00, 0x1b,
    0xce, 0x8a, 0xa8, 0x08, 0xdb, 0x48, 0x5b, 0xd8, 0x2f, 0x7f, 0x0e, 0x1e,
    0x2a, 0x2d, 0xdb, 0x95, 0xc3, 0x64, 0xdf, 0xfe, 0xa4, 0xc2, 0x3e, 0x87,
    0x2f, 0xc3, 0x87, 0x4c, 0x47, 0x56, 0xe8, 0x5e, 0x6c, 0xf8, 0xec, 0xa6,
    0xeb, 0x6a, 0x07, 0xbf,
];

/// Development root modulus (big-endian)
pub const DEVELOPMENT_ROOT_MODULUS: [u8; RSA2048_MODULUS_SIZE] = [
    0xcd, 0xc1, 0x08, 0x74, 0x5d, 0xc5, 0x0d, 0xd6, 0xa1, 0x09, 0x8c, 0x31,
    0x48, 0x6f, 0xb3, 0x15, 0x78, 0x60, 0x7f, 0xd6, 0x4f, 0x64, 0xb0, 0xd9,
    0x1b, 0x99, 0x42, 0x44, 0xca, 0x1a, 0x9a, 0x69, 0xa7, 0x4c, 0x6b, 0xcc,
    0xc7, 0xf2, 0x49, 0x23, 0xe1, 0x51, 0x3e, 0x13, 0x2d, 0xc0, 0xd9, 0xdb,
    0xcb, 0x1b, 0x22, 0x08, 0x92, 0x99, 0xbb, 0x6c, 0xb6, 0x69, 0xcb, 0xf4,
    0xb7, 0x04, 0xc9, 0x92, 0x27, 0xbb, 0x76, 0x9f, 0xa1, 0xf9, 0x1a, 0xb1,
    0x1f, 0x67, 0xfb, 0x46, 0x4a, 0x06, 0x5b, 0x34, 0xb1, 0xa0, 0xe8, 0x24,
    0x13, 0x6a, 0xf5, 0xe5, 0x9d, 0x1a, 0xc0, 0x4b, 0xda, 0x22, 0xc1, 0x99,
    0x9f, 0x7a, 0x5b, 0x34, 0xbd, 0x6b, 0x50, 0xc8, 0x1b, 0x4a, 0x88, 0xcc,
    0x09, 0x7d, 0x4d, 0xfe, 0xb4, 0xdc, 0x69, 0x50, 0x96, 0x46, 0x3d, 0x95,
    0x29, 0xd6, 0x9f, 0x11, 0x6e, 0x2a, 0x26, 0xde, 0x07, 0x0e, 0xf3, 0x11,
    0x82, 0x87, 0x07, 0x2b, 0xdb, 0xe9, 0x44, 0x66, 0xb8, 0x73, 0x70, 0x49,
    0x80, 0x9b, 0xb8, 0xe1, 0x27, 0x6b, 0x24, 0x59, 0x30, 0x05, 0x1b, 0x2b,
    0xbb, 0xad, 0x71, 0xdd, 0x20, 0xd2, 0x63, 0x49, 0xd1, 0xd8, 0x3c, 0xdb,
    0x2f, 0xf9, 0xc6, 0x52, 0x51, 0xa1, 0x7d, 0xae, 0x4f, 0x40, 0x0e, 0xcc,
    0x3e, 0x77, 0xf8, 0x9e, 0x27, 0xa7, 0x5f, 0xe0, 0x70, 0x9d, 0xc8, 0x1f,
    0xe1, 0x72, 0x00, 0x8a, 0x3e, 0x65, 0xde, 0x68, 0x5d, 0x9d, 0xf4, 0x3e,
    0x03, 0x6c, 0x55, 0x7e, 0x88, 0xf1, 0xa9, 0xae, 0xdf, 0x7a, 0x91, 0x64,
    0x43, 0x91, 0x52, 0x3d, 0x97, 0x28, 0xf9, 0x46, 0x45, 0xc0, 0xe8, 0xad,
    0xaf, 0x37, 0xe9, 0xa1, 0x57, 0x77, 0x02, 0x1a, 0xd4, 0x3b, 0x67, 0x55,
    0x83, 0x30, 0x24, 0x02, 0x91, 0x2d, 0x66, 0x23, 0x3c, 0x59, 0xad, 0x05,
    0xfa, 0x3b, 0x34, 0xed,
];

/// Production endorsement root
pub const PRODUCTION_ROOT: TrustAnchor = TrustAnchor::new("production", &PRODUCTION_ROOT_MODULUS);

/// Development endorsement root
pub const DEVELOPMENT_ROOT: TrustAnchor = TrustAnchor::new("development", &DEVELOPMENT_ROOT_MODULUS);

/// Anchors tried in order by the authenticator
pub const DEFAULT_TRUST_ANCHORS: &[TrustAnchor] = &[PRODUCTION_ROOT, DEVELOPMENT_ROOT];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_first() {
        assert_eq!(DEFAULT_TRUST_ANCHORS.len(), 2);
        assert_eq!(DEFAULT_TRUST_ANCHORS[0].name, "production");
        assert_eq!(DEFAULT_TRUST_ANCHORS[1].name, "development");
    }

    #[test]
    fn test_moduli_are_full_width() {
        for m in [&PRODUCTION_ROOT_MODULUS, &DEVELOPMENT_ROOT_MODULUS] {
            assert_ne!(m[0] & 0x80, 0, "top bit of a 2048-bit modulus");
        }
    }

    #[test]
    fn test_moduli_are_odd() {
        for m in [&PRODUCTION_ROOT_MODULUS, &DEVELOPMENT_ROOT_MODULUS] {
            assert_eq!(m[RSA2048_MODULUS_SIZE - 1] & 1, 1);
        }
    }
}
