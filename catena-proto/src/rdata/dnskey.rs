//! `DNSKEY` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use byteorder::{NetworkEndian, WriteBytesExt};
use data_encoding::BASE64;
use repr_with_fallback::repr_with_fallback;

use crate::error::{EncodeError, ParseError};
use crate::RecordType;

use super::RdataTrait;

repr_with_fallback! {
    /// Algorithms for use in zone signing.
    ///
    /// See <https://www.iana.org/assignments/dns-sec-alg-numbers/dns-sec-alg-numbers.xhtml>
    /// for the official list. The chain builder never dispatches on the
    /// algorithm (signature verification is the resolver's job), so every
    /// value is carried through; the named variants exist for clarity.
    #[derive(PartialEq, Eq, Copy, Clone, Debug)]
    #[non_exhaustive]
    #[allow(non_camel_case_types)]
    pub enum Algorithm {
        DSA = 3,
        RSASHA1 = 5,
        DSA_NSEC3_SHA1 = 6,
        RSASHA1_NSEC3_SHA1 = 7,
        /// RSA with SHA256 [\[RFC 5702\]](https://www.rfc-editor.org/rfc/rfc5702)
        RSASHA256 = 8,
        /// RSA with SHA512 [\[RFC 5702\]](https://www.rfc-editor.org/rfc/rfc5702)
        RSASHA512 = 10,
        ECC_GOST = 12,
        /// ECDSA Curve P-256 with SHA-256 [\[RFC 6605\]](https://www.rfc-editor.org/rfc/rfc6605)
        ECDSAP256SHA256 = 13,
        /// ECDSA Curve P-384 with SHA-384 [\[RFC 6605\]](https://www.rfc-editor.org/rfc/rfc6605)
        ECDSAP384SHA384 = 14,
        /// Ed25519 [\[RFC 8080\]](https://www.rfc-editor.org/rfc/rfc8080)
        ED25519 = 15,
        /// Ed448 [\[RFC 8080\]](https://www.rfc-editor.org/rfc/rfc8080)
        ED448 = 16,
        Unassigned(u8),
    }
}

/// A record containing a public key used to sign record sets of the zone.
/// [\[RFC 4034\]](https://www.rfc-editor.org/rfc/rfc4034)
///
/// The flags field is kept verbatim rather than decomposed: the serialised
/// rdata (flags ‖ protocol ‖ algorithm ‖ key) is the input to both the key
/// tag and the DS digest, so every bit must round-trip.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct DNSKEY {
    /// The flags field; bit 7 of the first octet marks a zone key, bit 15 a
    /// secure entry point.
    pub flags: u16,
    // the wire format also contains a "Protocol" field, but that must always
    // be 3 (see https://www.iana.org/assignments/dns-key-rr/dns-key-rr.xhtml),
    // so we don't store it explicitly
    /// The public key's cryptographic algorithm; determines the format of
    /// [`Self::key`].
    pub algorithm: Algorithm,
    /// The public key material.
    pub key: Vec<u8>,
}

impl DNSKEY {
    /// Calculates this key's key tag. Key tags are used in
    /// [`RRSIG`](super::RRSIG) and [`DS`](super::DS) records to "help select
    /// the corresponding `DNSKEY` record efficiently when more than one
    /// candidate `DNSKEY` record is available."
    /// [\[RFC 4034\]](https://www.rfc-editor.org/rfc/rfc4034)
    ///
    /// Note that the key tag is not a unique identifier: two distinct
    /// `DNSKEY` records can share a tag, so a tag match must be treated as a
    /// candidate, not an identity.
    pub fn key_tag(&self) -> u16 {
        // This is a translation of the C reference code from RFC 4034,
        // Appendix B: sum the serialised rdata as big-endian 16-bit words (a
        // trailing lone byte contributes its value shifted left by eight),
        // then fold the carry once.
        let mut key_data = Vec::with_capacity(self.key.len() + 4);
        self.encode_rdata_into(&mut key_data)
            .expect("encoding DNSKEY into vector failed");
        let mut ac = 0u32;
        for (i, byte) in key_data.iter().enumerate() {
            let byte = *byte as u32;
            ac += if (i & 1) != 0 { byte } else { byte << 8 };
        }
        ac += (ac >> 16) & 0xFFFF;
        (ac & 0xFFFF) as u16
    }
}

impl RdataTrait for DNSKEY {
    const RTYPE: RecordType = RecordType::DNSKEY;

    /// Parses `DNSKEY` RDATA from its presentation format:
    /// `flags protocol algorithm key`, where the base64 key may span several
    /// whitespace-separated groups.
    fn parse_rdata(rdata: &str) -> Result<Self, ParseError> {
        let (fields, key) = super::fields_and_payload(rdata, 3).ok_or_else(|| {
            ParseError::MalformedRdata(RecordType::DNSKEY, rdata.to_string())
        })?;

        let flags = fields[0].parse()?;

        let protocol: u8 = fields[1].parse()?;
        if protocol != 3 {
            return Err(ParseError::InvalidDnskeyProtocol(protocol));
        }

        let algorithm: Algorithm = fields[2].parse::<u8>()?.into();

        Ok(Self {
            flags,
            algorithm,
            key: BASE64.decode(key.as_bytes())?,
        })
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        buf.write_u16::<NetworkEndian>(self.flags)?;
        // protocol must always be 3
        buf.write_u8(3)?;
        buf.write_u8(self.algorithm.into())?;
        buf.write_all(&self.key)?;

        Ok(self.key.len() as u16 + 2 + 1 + 1)
    }
}

impl Display for DNSKEY {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = BASE64.encode(&self.key);
        write!(f, "{} 3 {} {}", self.flags, u8::from(self.algorithm), key)
    }
}

#[cfg(test)]
mod tests {
    use super::{Algorithm, DNSKEY};
    use crate::rdata::RdataTrait;

    #[test]
    fn parse_presentation_rdata() {
        let key = DNSKEY::parse_rdata("256 3 8 AQID BAUGBwg=").unwrap();
        assert_eq!(key.flags, 256);
        assert_eq!(key.algorithm, Algorithm::RSASHA256);
        assert_eq!(key.key, [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn rejects_wrong_protocol() {
        assert!(DNSKEY::parse_rdata("256 2 8 AQIDBAUGBwg=").is_err());
    }

    #[test]
    fn rejects_missing_key() {
        assert!(DNSKEY::parse_rdata("256 3 8").is_err());
    }

    #[test]
    fn serialised_form() {
        let key = DNSKEY {
            flags: 257,
            algorithm: Algorithm::RSASHA256,
            key: vec![0],
        };
        assert_eq!(key.encode().unwrap(), [0x01, 0x01, 0x03, 0x08, 0x00]);
    }

    #[test]
    fn key_tag_of_tiny_key() {
        // the serialised rdata is 01 01 03 08 00: the word sum is
        // 0x0101 + 0x0308 + 0x0000 = 0x0409 = 1033, with no carry to fold
        let key = DNSKEY {
            flags: 257,
            algorithm: Algorithm::RSASHA256,
            key: vec![0],
        };
        assert_eq!(key.key_tag(), 1033);
    }
}
