// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Keyed digest over the certificate region
//!
//! The region tag is a two-level HMAC-SHA256: a sub-key is derived by
//! keying the label `"RSA\0"` under the endorsement seed, and the region body
//! is then keyed under that sub-key.

use crate::error::{CryptoError, CryptoResult};
use crate::zeroize_utils::{constant_time_eq, SecureBuffer};
use ek_common::constants::REGION_SUBKEY_LABEL;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 output size
pub const REGION_MAC_SIZE: usize = 32;

/// Derive the region sub-key from the endorsement seed
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` if the MAC rejects the seed length.
pub fn region_subkey(seed: &[u8]) -> CryptoResult<SecureBuffer<REGION_MAC_SIZE>> {
    let mut mac = HmacSha256::new_from_slice(seed).map_err(|_| CryptoError::InvalidKey)?;
    mac.update(REGION_SUBKEY_LABEL);
    let mut subkey = SecureBuffer::new();
    subkey.as_mut_bytes().copy_from_slice(&mac.finalize().into_bytes());
    Ok(subkey)
}

/// Compute the tag over `body` for a region provisioned under `seed`
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` if the MAC rejects a key length.
pub fn region_tag(seed: &[u8], body: &[u8]) -> CryptoResult<[u8; REGION_MAC_SIZE]> {
    let subkey = region_subkey(seed)?;
    let mut mac =
        HmacSha256::new_from_slice(subkey.as_slice()).map_err(|_| CryptoError::InvalidKey)?;
    mac.update(body);
    Ok(mac.finalize().into_bytes().into())
}

/// Check `tag` against the recomputed tag over `body`
///
/// Any MAC failure counts as a mismatch.
#[must_use]
pub fn verify_region_tag(seed: &[u8], body: &[u8], tag: &[u8]) -> bool {
    match region_tag(seed, body) {
        Ok(expected) => constant_time_eq(&expected, tag),
        Err(_) => false,
    }
}
