// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Region integrity verifier

use ek_common::constants::REGION_TAG_SIZE;
use ek_crypto::verify_region_tag;

/// Check the trailing tag of `region` against the digest keyed by `seed`
///
/// A mismatch is an expected outcome: the region was provisioned under a
/// different seed or signing mode.
#[must_use]
pub fn verify(region: &[u8], seed: &[u8]) -> bool {
    let Some(body_len) = region.len().checked_sub(REGION_TAG_SIZE) else {
        return false;
    };
    let (body, tag) = region.split_at(body_len);
    verify_region_tag(seed, body, tag)
}
