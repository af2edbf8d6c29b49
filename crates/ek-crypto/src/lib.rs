// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Endorsement Provisioning Cryptography
//!
//! The primitives consumed by the endorsement pass:
//!
//! - **Secret handling**: zeroize-on-drop buffers, constant-time comparison
//! - **Region digest**: two-level HMAC-SHA256 keyed by the endorsement seed
//! - **Certificates**: X.509 outer-structure parsing and RSA-2048
//!   PKCS#1 v1.5 / SHA-256 verification against compiled-in trust anchors
//!
//! # Security Requirements
//!
//! - Zeroize sensitive data after use
//! - Never log or expose key material
//!
//! The RSA arithmetic allocates; targets must provide a global allocator.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod zeroize_utils;
pub mod region_mac;
pub mod x509;
pub mod anchor;

pub use error::{CryptoError, CryptoResult};
pub use zeroize_utils::{constant_time_eq, secure_zero, SecureBuffer};
pub use region_mac::{region_tag, verify_region_tag, REGION_MAC_SIZE};
pub use anchor::{find_verifying_anchor, TrustAnchor, RSA_F4};
