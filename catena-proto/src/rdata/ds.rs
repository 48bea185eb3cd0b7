//! `DS` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use byteorder::{NetworkEndian, WriteBytesExt};
use data_encoding::HEXUPPER_PERMISSIVE;
use repr_with_fallback::repr_with_fallback;

use crate::error::{EncodeError, ParseError};
use crate::RecordType;

use super::dnskey::Algorithm;
use super::RdataTrait;

// import DNSKEY for easier rustdoc links
#[allow(unused_imports)]
use super::dnskey::DNSKEY;

repr_with_fallback! {
    /// Digest algorithms for the [`DS`] record.
    ///
    /// See <https://www.iana.org/assignments/ds-rr-types/ds-rr-types.xhtml>
    /// for the official list. Only SHA-1 and SHA-256 digests can be
    /// recomputed by a chain verifier; records with other digest types are
    /// carried verbatim but never matched against keys.
    #[derive(PartialEq, Eq, Copy, Clone, Debug)]
    #[non_exhaustive]
    pub enum DigestType {
        /// [RFC 3658](https://www.rfc-editor.org/rfc/rfc3658)
        SHA1 = 1,
        /// [RFC 4509](https://www.rfc-editor.org/rfc/rfc4509)
        SHA256 = 2,
        /// GOST R 34.11-94 [\[RFC 5933\]](https://www.rfc-editor.org/rfc/rfc5933)
        GOST = 3,
        /// [RFC 6605](https://www.rfc-editor.org/rfc/rfc6605)
        SHA384 = 4,
        Unassigned(u8),
    }
}

/// A record referring to a [`DNSKEY`] record by storing the key tag,
/// algorithm number, and a digest of the [`DNSKEY`] record.
/// [\[RFC 4034\]](https://www.rfc-editor.org/rfc/rfc4034)
///
/// The `DS` record and its corresponding [`DNSKEY`] record have the same
/// owner name, but the `DS` record appears only on the upper (parental) side
/// of a delegation and is authoritative data in the parent zone.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct DS {
    /// The key tag of the corresponding [`DNSKEY`] record.
    pub key_tag: u16,
    /// The algorithm used by the corresponding [`DNSKEY`] record.
    pub algorithm: Algorithm,
    /// The type of digest stored in [`Self::digest`].
    pub digest_type: DigestType,
    /// The digest of the corresponding [`DNSKEY`] record.
    pub digest: Vec<u8>,
}

impl RdataTrait for DS {
    const RTYPE: RecordType = RecordType::DS;

    /// Parses `DS` RDATA from its presentation format:
    /// `key-tag algorithm digest-type digest`, where the hex digest may span
    /// several whitespace-separated groups and use either letter case.
    fn parse_rdata(rdata: &str) -> Result<Self, ParseError> {
        let (fields, digest) = super::fields_and_payload(rdata, 3)
            .ok_or_else(|| ParseError::MalformedRdata(RecordType::DS, rdata.to_string()))?;

        Ok(Self {
            key_tag: fields[0].parse()?,
            algorithm: fields[1].parse::<u8>()?.into(),
            digest_type: fields[2].parse::<u8>()?.into(),
            digest: HEXUPPER_PERMISSIVE.decode(digest.as_bytes())?,
        })
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        buf.write_u16::<NetworkEndian>(self.key_tag)?;
        buf.write_u8(self.algorithm.into())?;
        buf.write_u8(self.digest_type.into())?;
        buf.write_all(&self.digest)?;

        Ok(self.digest.len() as u16 + 2 + 1 + 1)
    }
}

impl Display for DS {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digest = HEXUPPER_PERMISSIVE.encode(&self.digest);
        write!(
            f,
            "{} {} {} {}",
            self.key_tag,
            u8::from(self.algorithm),
            u8::from(self.digest_type),
            digest
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{DigestType, DS};
    use crate::rdata::dnskey::Algorithm;
    use crate::rdata::RdataTrait;

    #[test]
    fn parse_presentation_rdata() {
        let ds = DS::parse_rdata("22878 8 2 da2b 9B76").unwrap();
        assert_eq!(ds.key_tag, 22878);
        assert_eq!(ds.algorithm, Algorithm::RSASHA256);
        assert_eq!(ds.digest_type, DigestType::SHA256);
        assert_eq!(ds.digest, [0xda, 0x2b, 0x9b, 0x76]);
    }

    #[test]
    fn serialised_form() {
        let ds = DS::parse_rdata("1111 8 3 0011223344").unwrap();
        assert_eq!(
            ds.encode().unwrap(),
            [0x04, 0x57, 8, 3, 0x00, 0x11, 0x22, 0x33, 0x44]
        );
    }

    #[test]
    fn rejects_odd_hex() {
        assert!(DS::parse_rdata("22878 8 2 ABC").is_err());
        assert!(DS::parse_rdata("22878 8 2 XY").is_err());
    }
}
