// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Minimal X.509 outer-structure parser
//!
//! Only the three top-level fields of a certificate are located:
//!
//! ```text
//! Certificate ::= SEQUENCE {
//!     tbsCertificate       TBSCertificate,
//!     signatureAlgorithm   AlgorithmIdentifier,
//!     signatureValue       BIT STRING }
//! ```
//!
//! The TBS certificate is returned as raw DER so it can be hashed as signed.
//! Nothing inside it is interpreted.

use crate::error::{CryptoError, CryptoResult};

const TAG_SEQUENCE: u8 = 0x30;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_OID: u8 = 0x06;
const TAG_NULL: u8 = 0x05;

/// DER content of OID 1.2.840.113549.1.1.11 (sha256WithRSAEncryption)
pub const OID_SHA256_WITH_RSA: &[u8] = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0B];

/// Longest length field accepted (4 bytes covers any certificate we store)
const MAX_LENGTH_OCTETS: usize = 4;

/// The signed parts of a certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedCertificate<'a> {
    /// Full DER encoding of `tbsCertificate`, tag and length included
    pub tbs: &'a [u8],
    /// Signature bytes (BIT STRING contents minus the unused-bits octet)
    pub signature: &'a [u8],
}

/// One DER element
struct Tlv<'a> {
    tag: u8,
    value: &'a [u8],
    /// Tag, length and value
    raw: &'a [u8],
}

/// Read one TLV from the front of `input`, returning it and the remainder
fn read_tlv(input: &[u8]) -> CryptoResult<(Tlv<'_>, &[u8])> {
    let (&tag, rest) = input.split_first().ok_or(CryptoError::MalformedCertificate)?;
    let (&first, mut rest) = rest.split_first().ok_or(CryptoError::MalformedCertificate)?;

    let len = if first & 0x80 == 0 {
        usize::from(first)
    } else {
        let octets = usize::from(first & 0x7F);
        // 0x80 is the BER indefinite form, never valid DER
        if octets == 0 || octets > MAX_LENGTH_OCTETS || octets > rest.len() {
            return Err(CryptoError::MalformedCertificate);
        }
        let mut len = 0usize;
        for &b in &rest[..octets] {
            len = (len << 8) | usize::from(b);
        }
        rest = &rest[octets..];
        len
    };

    if len > rest.len() {
        return Err(CryptoError::MalformedCertificate);
    }
    let header = input.len() - rest.len();
    let (value, remainder) = rest.split_at(len);
    Ok((
        Tlv {
            tag,
            value,
            raw: &input[..header + len],
        },
        remainder,
    ))
}

fn expect_tlv(input: &[u8], tag: u8) -> CryptoResult<(Tlv<'_>, &[u8])> {
    let (tlv, rest) = read_tlv(input)?;
    if tlv.tag != tag {
        return Err(CryptoError::MalformedCertificate);
    }
    Ok((tlv, rest))
}

/// Split a DER certificate into its TBS bytes and RSA signature
///
/// # Errors
///
/// - `CryptoError::MalformedCertificate` if the outer structure does not
///   parse or trailing bytes follow it
/// - `CryptoError::UnsupportedAlgorithm` if the signature algorithm is not
///   sha256WithRSAEncryption
pub fn parse_certificate(der: &[u8]) -> CryptoResult<SignedCertificate<'_>> {
    let (cert, trailing) = expect_tlv(der, TAG_SEQUENCE)?;
    if !trailing.is_empty() {
        return Err(CryptoError::MalformedCertificate);
    }

    let (tbs, rest) = expect_tlv(cert.value, TAG_SEQUENCE)?;
    let (alg, rest) = expect_tlv(rest, TAG_SEQUENCE)?;
    let (sig, rest) = expect_tlv(rest, TAG_BIT_STRING)?;
    if !rest.is_empty() {
        return Err(CryptoError::MalformedCertificate);
    }

    let (oid, params) = expect_tlv(alg.value, TAG_OID)?;
    if oid.value != OID_SHA256_WITH_RSA {
        return Err(CryptoError::UnsupportedAlgorithm);
    }
    // Parameters are absent or NULL
    if !params.is_empty() {
        let (null, after) = expect_tlv(params, TAG_NULL)?;
        if !null.value.is_empty() || !after.is_empty() {
            return Err(CryptoError::MalformedCertificate);
        }
    }

    let (&unused_bits, signature) = sig
        .value
        .split_first()
        .ok_or(CryptoError::MalformedCertificate)?;
    if unused_bits != 0 || signature.is_empty() {
        return Err(CryptoError::MalformedCertificate);
    }

    Ok(SignedCertificate {
        tbs: tbs.raw,
        signature,
    })
}
