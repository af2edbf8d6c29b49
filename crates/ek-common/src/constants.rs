// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Provisioning constants
//!
//! Sizes, indices and hardware identifiers shared by every provisioning
//! component. Board-specific addresses live in [`crate::config`].

// =============================================================================
// Secret Sizes
// =============================================================================

/// Endorsement seed size in bytes
pub const ENDORSEMENT_SEED_SIZE: usize = 32;

/// Key ladder output size in bytes
pub const DERIVED_KEY_SIZE: usize = 32;

/// Key ladder output size in 32-bit words
pub const DERIVED_KEY_WORDS: usize = DERIVED_KEY_SIZE / 4;

/// Flash read granularity in bytes
pub const FLASH_WORD_SIZE: usize = 4;

// The seed is decrypted as a one-time pad under the derived key.
const _: () = assert!(DERIVED_KEY_SIZE == ENDORSEMENT_SEED_SIZE);
const _: () = assert!(ENDORSEMENT_SEED_SIZE % FLASH_WORD_SIZE == 0);

// =============================================================================
// Certificate Region Layout
// =============================================================================

/// Fixed capacity of the certificate region
pub const CERT_REGION_SIZE: usize = 0x800;

/// Trailing HMAC-SHA256 tag size
pub const REGION_TAG_SIZE: usize = 32;

/// Component info header: u16 size, u8 type, 5 reserved bytes
pub const COMPONENT_INFO_SIZE: usize = 8;

/// Certificate response header: 4-byte key id, u32 certificate length
pub const CERT_RESPONSE_HEADER_SIZE: usize = 8;

/// Combined header bytes preceding each certificate
pub const RECORD_HEADER_SIZE: usize = COMPONENT_INFO_SIZE + CERT_RESPONSE_HEADER_SIZE;

/// Key identifier size inside the certificate response header
pub const KEY_ID_SIZE: usize = 4;

/// Label keyed under the seed to derive the region sub-key
pub const REGION_SUBKEY_LABEL: &[u8; 4] = b"RSA\0";

/// First word of an erased flash region
pub const ERASED_WORD: u32 = 0xFFFF_FFFF;

// =============================================================================
// NV Storage
// =============================================================================

/// Largest payload a single NV write accepts
pub const MAX_NV_BUFFER_SIZE: usize = 1024;

/// NV index of the RSA endorsement certificate; ECC follows at +1
pub const EK_CERT_NV_START_INDEX: u32 = 0x01C0_0000;

/// Platform hierarchy handle
pub const TPM_RH_PLATFORM: u32 = 0x4000_000C;

/// SHA-256 algorithm identifier
pub const TPM_ALG_SHA256: u16 = 0x000B;

// =============================================================================
// Key Ladder
// =============================================================================

/// Certificate indices run once, in order, before the version-bound steps
pub const LADDER_PREFIX_CERTS: [u8; 7] = [0, 3, 4, 5, 7, 15, 20];

/// Certificate index repeated once per firmware version below the maximum
pub const LADDER_VERSION_CERT: u8 = 25;

/// Final certificate index
pub const LADDER_FINAL_CERT: u8 = 26;

/// Default maximum firmware major version
pub const MAX_FIRMWARE_MAJOR_VERSION: u8 = 254;

/// Default status polls per ladder step before giving up
pub const DEFAULT_LADDER_POLL_BUDGET: u32 = 1_000_000;
