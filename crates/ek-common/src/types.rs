// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Common types for endorsement provisioning

use core::fmt;

/// Component type tag stored in each certificate region record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ComponentType {
    /// Endorsement primary seed
    Eps = 128,
    /// RSA-2048 endorsement certificate
    RsaCert = 129,
    /// NIST P-256 endorsement certificate
    P256Cert = 130,
}

impl ComponentType {
    /// Parse a raw type byte
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            128 => Some(Self::Eps),
            129 => Some(Self::RsaCert),
            130 => Some(Self::P256Cert),
            _ => None,
        }
    }

    /// Raw type byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this component carries an X.509 certificate
    #[must_use]
    pub const fn is_certificate(self) -> bool {
        matches!(self, Self::RsaCert | Self::P256Cert)
    }

    /// Offset from the first endorsement certificate NV index
    #[must_use]
    pub const fn nv_index_offset(self) -> Option<u32> {
        match self {
            Self::RsaCert => Some(0),
            Self::P256Cert => Some(1),
            Self::Eps => None,
        }
    }

    /// Short name for diagnostics
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eps => "EPS",
            Self::RsaCert => "RSA",
            Self::P256Cert => "P256",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.as_u8())
    }
}

/// A fixed flash window: base address and size in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashRegion {
    /// Base address
    pub base: u32,
    /// Size in bytes
    pub size: u32,
}

impl FlashRegion {
    /// Create a region
    #[must_use]
    pub const fn new(base: u32, size: u32) -> Self {
        Self { base, size }
    }

    /// Exclusive end address, or `None` on overflow
    #[must_use]
    pub const fn end(&self) -> Option<u32> {
        self.base.checked_add(self.size)
    }

    /// Whether `offset..offset + len` lies inside the region
    #[must_use]
    pub const fn contains_range(&self, offset: u32, len: u32) -> bool {
        match offset.checked_add(len) {
            Some(end) => end <= self.size,
            None => false,
        }
    }
}

/// A flash window together with its current read-enable state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionDescriptor {
    /// Mapped region
    pub region: FlashRegion,
    /// Whether reads are currently enabled
    pub read_enabled: bool,
}

impl RegionDescriptor {
    /// Describe a closed window
    #[must_use]
    pub const fn closed(region: FlashRegion) -> Self {
        Self {
            region,
            read_enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_type_roundtrip_codes() {
        assert_eq!(ComponentType::from_u8(129), Some(ComponentType::RsaCert));
        assert_eq!(ComponentType::from_u8(130), Some(ComponentType::P256Cert));
        assert_eq!(ComponentType::from_u8(128), Some(ComponentType::Eps));
        assert_eq!(ComponentType::from_u8(131), None);
        assert!(!ComponentType::Eps.is_certificate());
    }

    #[test]
    fn test_region_range_checks() {
        let r = FlashRegion::new(0x43800, 0x800);
        assert!(r.contains_range(0, 0x800));
        assert!(!r.contains_range(1, 0x800));
        assert!(!r.contains_range(u32::MAX, 2));
        assert_eq!(r.end(), Some(0x44000));
    }
}
