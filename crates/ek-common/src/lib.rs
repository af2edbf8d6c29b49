// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Endorsement Provisioning Common Library
//!
//! This crate provides the error type, log buffer, configuration and
//! constants shared by the endorsement provisioning crates.
//!
//! # Features
//!
//! - `std`: Enable standard library support (disabled by default for embedded)
//! - `defmt`: Enable defmt logging support for embedded debugging
//!
//! # Security
//!
//! Nothing in this crate holds secret material. No heap allocations are
//! performed - all buffers use fixed-size arrays or heapless collections.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "std")]
extern crate std;

pub mod types;
pub mod errors;
pub mod config;
pub mod log;
pub mod constants;

// Re-export commonly used items
pub use errors::{Error, ErrorClass, Result};
pub use types::*;
pub use config::{EndorsementConfig, LadderConfig};
pub use log::{LogBuffer, LogLevel};
