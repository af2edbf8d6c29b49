// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Endorsement provisioning for the H1 security module
//!
//! This crate installs the device's long-term endorsement identity:
//!
//! - **Key ladder**: derives the device-unique key through the key manager
//! - **Seed recovery**: unmasks the endorsement seed stored in the info block
//! - **Certificate region**: parses the RSA and ECC endorsement certificates
//! - **Integrity**: checks the region's keyed digest under the seed
//! - **Authentication**: verifies both certificates against compiled-in roots
//! - **Persistence**: writes certificates and seed into write-once NV storage
//! - **Fallback**: installs a fixed, untrusted endorsement on integrity failure
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │                 Endorser                    │
//! └──────┬──────────────┬────────────────┬──────┘
//!        │              │                │
//!        ▼              ▼                ▼
//!   KeyLadder     ReadWindow        IdentityStore
//!  (KEYMGR HAL)  (GLOBALSEC HAL)     (NV engine)
//! ```
//!
//! Hardware is reached only through the `ek-hal` traits, so the whole pass
//! runs on a host against the `sim` doubles.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod ladder;
pub mod window;
pub mod seed;
pub mod region;
pub mod integrity;
pub mod authenticate;
pub mod persist;
pub mod fallback;
pub mod fixed;
pub mod roots;
pub mod orchestrator;

// Re-exports
pub use ladder::{DerivedKey, KeyLadder};
pub use seed::{recover_seed, EndorsementSeed};
pub use region::{parse_region, CertRegion, CertificateRecord, ParsedRegion};
pub use authenticate::CertificateAuthenticator;
pub use persist::IdentityStore;
pub use fallback::install_fallback;
pub use roots::DEFAULT_TRUST_ANCHORS;
pub use orchestrator::{EndorsementOutcome, EndorsementState, Endorser};
