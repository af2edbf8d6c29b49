// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Hardware Abstraction Layer for endorsement provisioning
//!
//! The provisioning pass touches three pieces of hardware:
//!
//! - **Key ladder**: the KEYMGR engine that derives the device-unique key
//! - **Flash windows**: GLOBALSEC-gated read access to protected flash
//! - **NV storage**: the TPM non-volatile index engine
//!
//! # Architecture
//!
//! 1. **Traits**: Platform-agnostic interfaces (`traits` module)
//! 2. **Drivers**: Memory-mapped H1 implementations (`h1` feature)
//! 3. **Simulation**: Deterministic host doubles (`sim` feature)
//!
//! # Security
//!
//! - Volatile register access is confined to the `h1` module
//! - Only one protected flash window may be read-enabled at a time

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod traits;
pub mod error;
pub mod nv;

#[cfg(any(feature = "h1", test))]
pub mod h1;

#[cfg(any(feature = "sim", test))]
pub mod sim;

// Re-export main traits
pub use traits::*;
pub use error::{HalError, HalResult};
pub use nv::{AuthHandle, NvAttributes, NvPublic, ReservedSlot, StartupType};
