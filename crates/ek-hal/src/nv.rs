// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! NV space definitions
//!
//! Attribute bits follow the TPMA_NV layout of TPM 2.0 Part 2.

use ek_common::constants::{TPM_ALG_SHA256, TPM_RH_PLATFORM};
use heapless::Vec;

/// Maximum authorization policy digest size
pub const MAX_AUTH_POLICY_SIZE: usize = 64;

bitflags::bitflags! {
    /// TPMA_NV attribute bits
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct NvAttributes: u32 {
        /// Writable with platform authorization
        const PPWRITE = 1 << 0;
        /// Writable with owner authorization
        const OWNERWRITE = 1 << 1;
        /// Writable with the index authorization value
        const AUTHWRITE = 1 << 2;
        /// Writable with the index policy
        const POLICYWRITE = 1 << 3;
        /// Deletable only with a policy
        const POLICY_DELETE = 1 << 10;
        /// Index is currently write locked
        const WRITELOCKED = 1 << 11;
        /// Partial writes are not allowed
        const WRITEALL = 1 << 12;
        /// Write lock persists until the index is deleted
        const WRITEDEFINE = 1 << 13;
        /// Write lock clears on TPM reset
        const WRITE_STCLEAR = 1 << 14;
        /// Affected by a global write lock
        const GLOBALLOCK = 1 << 15;
        /// Readable with platform authorization
        const PPREAD = 1 << 16;
        /// Readable with owner authorization
        const OWNERREAD = 1 << 17;
        /// Readable with the index authorization value
        const AUTHREAD = 1 << 18;
        /// Readable with the index policy
        const POLICYREAD = 1 << 19;
        /// Exempt from dictionary-attack protection
        const NO_DA = 1 << 25;
        /// State saved only on orderly shutdown
        const ORDERLY = 1 << 26;
        /// WRITTEN clears on TPM reset
        const CLEAR_STCLEAR = 1 << 27;
        /// Index is currently read locked
        const READLOCKED = 1 << 28;
        /// Index has been written
        const WRITTEN = 1 << 29;
        /// Defined under platform authorization
        const PLATFORMCREATE = 1 << 30;
        /// Read lock clears on TPM reset
        const READ_STCLEAR = 1 << 31;
    }
}

impl NvAttributes {
    /// Attributes of an endorsement certificate index (TCG PC Client PTP)
    pub const ENDORSEMENT_CERTIFICATE: Self = Self::PPWRITE
        .union(Self::WRITEDEFINE)
        .union(Self::PLATFORMCREATE)
        .union(Self::AUTHREAD)
        .union(Self::NO_DA);
}

/// Authorization hierarchy handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthHandle(pub u32);

impl AuthHandle {
    /// Platform hierarchy
    pub const PLATFORM: Self = Self(TPM_RH_PLATFORM);
}

/// Hierarchy startup type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupType {
    /// TPM reset; establishes platform authorization
    Reset,
    /// TPM restart
    Restart,
    /// TPM resume
    Resume,
}

/// Persistent slots outside the NV index space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedSlot {
    /// Endorsement primary seed
    EndorsementSeed,
}

/// Public area of an NV index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvPublic {
    /// NV index handle
    pub index: u32,
    /// Name algorithm
    pub name_alg: u16,
    /// Access attributes
    pub attributes: NvAttributes,
    /// Authorization policy digest (empty for none)
    pub auth_policy: Vec<u8, MAX_AUTH_POLICY_SIZE>,
    /// Payload size in bytes
    pub data_size: u16,
}

impl NvPublic {
    /// Public area for an endorsement certificate of `data_size` bytes
    #[must_use]
    pub fn endorsement_certificate(index: u32, data_size: u16) -> Self {
        Self {
            index,
            name_alg: TPM_ALG_SHA256,
            attributes: NvAttributes::ENDORSEMENT_CERTIFICATE,
            auth_policy: Vec::new(),
            data_size,
        }
    }
}
