// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Certificate region reader
//!
//! The read-only certificate region holds two packed records followed by a
//! keyed digest over everything before it:
//!
//! ```text
//! offset 0                      ┌──────────────────────────────┐
//!                               │ component info (8)           │
//!                               │   size u16 LE, type u8, rsvd │
//!                               │ key id (4), cert len u32 LE  │
//!                               │ RSA certificate (rsa_len)    │
//! 16 + rsa_len                  ├──────────────────────────────┤
//!                               │ component info (8)           │
//!                               │ key id (4), cert len u32 LE  │
//!                               │ ECC certificate (ecc_len)    │
//!                               ├──────────────────────────────┤
//!                               │ 0xFF padding                 │
//! size - 32                     ├──────────────────────────────┤
//!                               │ region tag (32)              │
//!                               └──────────────────────────────┘
//! ```

use ek_common::constants::{
    CERT_REGION_SIZE, COMPONENT_INFO_SIZE, ERASED_WORD, KEY_ID_SIZE, RECORD_HEADER_SIZE,
    REGION_TAG_SIZE,
};
use ek_common::{ComponentType, EndorsementConfig, Error, Result};
use ek_hal::{FlashWindow, FlashWindowInterface};

use crate::window::ReadWindow;

/// Offset of the certificate length inside a record header
const CERT_LEN_OFFSET: usize = COMPONENT_INFO_SIZE + KEY_ID_SIZE;

/// A snapshot of the certificate region
#[derive(Clone, PartialEq, Eq)]
pub struct CertRegion {
    bytes: [u8; CERT_REGION_SIZE],
}

impl CertRegion {
    /// Wrap a region image
    #[must_use]
    pub const fn from_bytes(bytes: [u8; CERT_REGION_SIZE]) -> Self {
        Self { bytes }
    }

    /// Copy the region out of flash
    ///
    /// The certificate window is open only for the duration of the copy.
    ///
    /// # Errors
    ///
    /// - `Error::FlashWindowBusy` / `Error::FlashWindowFailed` if the window
    ///   cannot be opened
    /// - `Error::FlashReadFailed` if any word read fails
    /// - `Error::RegionUnprovisioned` if the region was never programmed
    pub fn read<F: FlashWindowInterface>(flash: &mut F, config: &EndorsementConfig) -> Result<Self> {
        let mut bytes = [0u8; CERT_REGION_SIZE];
        {
            let window = ReadWindow::open(flash, FlashWindow::CertRegion, config.cert_region)?;
            if window.read_word(0)? == ERASED_WORD {
                return Err(Error::RegionUnprovisioned);
            }
            window.read_words(0, &mut bytes)?;
        }
        Ok(Self { bytes })
    }

    /// Whether the region is still erased
    #[must_use]
    pub fn is_unprovisioned(&self) -> bool {
        self.bytes[..4] == ERASED_WORD.to_le_bytes()
    }

    /// Raw region bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; CERT_REGION_SIZE] {
        &self.bytes
    }

    /// Bytes covered by the region tag
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.bytes[..CERT_REGION_SIZE - REGION_TAG_SIZE]
    }

    /// Trailing region tag
    #[must_use]
    pub fn tag(&self) -> &[u8] {
        &self.bytes[CERT_REGION_SIZE - REGION_TAG_SIZE..]
    }

    /// Parse the two certificate records
    ///
    /// # Errors
    ///
    /// See [`parse_region`].
    pub fn parse(&self) -> Result<ParsedRegion<'_>> {
        parse_region(&self.bytes)
    }
}

impl core::fmt::Debug for CertRegion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CertRegion")
            .field("unprovisioned", &self.is_unprovisioned())
            .finish_non_exhaustive()
    }
}

/// One packed certificate record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateRecord<'a> {
    /// Declared component size (informational)
    pub component_size: u16,
    /// Declared component type
    pub component_type: ComponentType,
    /// Key identifier
    pub key_id: [u8; KEY_ID_SIZE],
    /// Certificate bytes
    pub cert: &'a [u8],
}

/// The records of a well-formed region, in region order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRegion<'a> {
    /// RSA endorsement certificate
    pub rsa: CertificateRecord<'a>,
    /// P-256 endorsement certificate
    pub ecc: CertificateRecord<'a>,
}

impl<'a> ParsedRegion<'a> {
    /// Records in installation order
    #[must_use]
    pub const fn records(&self) -> [CertificateRecord<'a>; 2] {
        [self.rsa, self.ecc]
    }
}

struct RawRecord<'a> {
    component_size: u16,
    component_type: u8,
    key_id: [u8; KEY_ID_SIZE],
    cert_len: usize,
    cert_start: usize,
    region: &'a [u8],
}

impl<'a> RawRecord<'a> {
    fn read(region: &'a [u8], offset: usize) -> Result<Self> {
        let end = offset
            .checked_add(RECORD_HEADER_SIZE)
            .ok_or(Error::RegionOversized)?;
        let h = region.get(offset..end).ok_or(Error::RegionOversized)?;

        let cert_len = u32::from_le_bytes([
            h[CERT_LEN_OFFSET],
            h[CERT_LEN_OFFSET + 1],
            h[CERT_LEN_OFFSET + 2],
            h[CERT_LEN_OFFSET + 3],
        ]);

        Ok(Self {
            component_size: u16::from_le_bytes([h[0], h[1]]),
            component_type: h[2],
            key_id: [
                h[COMPONENT_INFO_SIZE],
                h[COMPONENT_INFO_SIZE + 1],
                h[COMPONENT_INFO_SIZE + 2],
                h[COMPONENT_INFO_SIZE + 3],
            ],
            cert_len: usize::try_from(cert_len).map_err(|_| Error::RegionOversized)?,
            cert_start: end,
            region,
        })
    }

    fn finish(self, expected: ComponentType) -> Result<CertificateRecord<'a>> {
        let component_type = ComponentType::from_u8(self.component_type)
            .filter(|&t| t == expected)
            .ok_or(Error::ComponentTypeMismatch)?;
        let cert_end = self
            .cert_start
            .checked_add(self.cert_len)
            .ok_or(Error::RegionOversized)?;
        let cert = self
            .region
            .get(self.cert_start..cert_end)
            .ok_or(Error::RegionOversized)?;
        Ok(CertificateRecord {
            component_size: self.component_size,
            component_type,
            key_id: self.key_id,
            cert,
        })
    }
}

/// Parse the RSA and ECC records from a region image
///
/// Both record headers plus both certificates must fit inside `region`;
/// the first record must be the RSA certificate and the second the P-256
/// certificate.
///
/// # Errors
///
/// - `Error::RegionOversized` if the declared lengths run past the region
/// - `Error::ComponentTypeMismatch` if the records are not RSA then ECC
pub fn parse_region(region: &[u8]) -> Result<ParsedRegion<'_>> {
    let size = region.len();
    let headers = 2 * RECORD_HEADER_SIZE;

    let rsa = RawRecord::read(region, 0)?;
    let rsa_total = headers
        .checked_add(rsa.cert_len)
        .filter(|&n| n <= size)
        .ok_or(Error::RegionOversized)?;

    let ecc = RawRecord::read(region, RECORD_HEADER_SIZE + rsa.cert_len)?;
    rsa_total
        .checked_add(ecc.cert_len)
        .filter(|&n| n <= size)
        .ok_or(Error::RegionOversized)?;

    Ok(ParsedRegion {
        rsa: rsa.finish(ComponentType::RsaCert)?,
        ecc: ecc.finish(ComponentType::P256Cert)?,
    })
}
