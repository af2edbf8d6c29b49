// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Secure memory utilities
//!
//! Zeroization and constant-time comparison for the seed, derived key and
//! region sub-key.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Zero `data` with writes the compiler cannot elide
pub fn secure_zero(data: &mut [u8]) {
    data.zeroize();
}

/// Secure buffer that zeroizes on drop
///
/// This wrapper ensures sensitive data is zeroized when it goes out of scope.
/// It is deliberately not `Clone`.
pub struct SecureBuffer<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> SecureBuffer<N> {
    /// Create a new zeroed secure buffer
    #[must_use]
    pub const fn new() -> Self {
        Self { data: [0u8; N] }
    }

    /// Create from a byte slice
    ///
    /// Returns `None` if the slice length doesn't match N.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != N {
            return None;
        }
        let mut buf = Self::new();
        buf.data.copy_from_slice(slice);
        Some(buf)
    }

    /// Get the data as a fixed-size array
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.data
    }

    /// Get the data as a mutable fixed-size array
    #[must_use]
    pub fn as_mut_bytes(&mut self) -> &mut [u8; N] {
        &mut self.data
    }

    /// Get the data as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer size
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    /// Check if buffer is empty (always false for N > 0)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Whether every byte is zero
    #[must_use]
    pub fn is_zeroed(&self) -> bool {
        is_zero(&self.data)
    }
}

impl<const N: usize> Default for SecureBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> AsRef<[u8]> for SecureBuffer<N> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl<const N: usize> AsMut<[u8]> for SecureBuffer<N> {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl<const N: usize> Zeroize for SecureBuffer<N> {
    fn zeroize(&mut self) {
        self.data.zeroize();
    }
}

impl<const N: usize> Drop for SecureBuffer<N> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> core::fmt::Debug for SecureBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SecureBuffer<{}>([REDACTED])", N)
    }
}

/// Compare two byte slices in constant time
///
/// Slices of different length compare unequal.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Check if all bytes are zero in constant time
#[must_use]
pub fn is_zero(data: &[u8]) -> bool {
    let mut acc: u8 = 0;
    for &byte in data {
        acc |= byte;
    }
    acc == 0
}
