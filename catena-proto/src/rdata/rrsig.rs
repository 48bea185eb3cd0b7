//! `RRSIG` RDATA definition.

use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

use byteorder::{NetworkEndian, WriteBytesExt};
use chrono::{TimeZone, Utc};
use data_encoding::BASE64;

use crate::error::{EncodeError, ParseError};
use crate::name::Name;
use crate::RecordType;

use super::dnskey::Algorithm;

/// A record storing the digital signature for a resource record set with a
/// particular name, class, and type. The signature can be verified using the
/// public key stored in the matching [`DNSKEY`](super::DNSKEY) record.
/// [\[RFC 4034\]](https://www.rfc-editor.org/rfc/rfc4034)
///
/// The chain builder never verifies signatures itself (the validating
/// resolver already has); it only selects and repackages them.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct RRSIG {
    /// The type of the record set covered by this record.
    pub type_covered: RecordType,
    /// The cryptographic algorithm used to create the signature.
    pub algorithm: Algorithm,
    /// The number of labels in the original record owner name, not counting
    /// the root label or a wildcard label.
    pub labels: u8,
    /// The TTL of the covered record set as it appears in the authoritative
    /// zone.
    pub original_ttl: u32,
    /// The end of the validity period for the signature, as seconds since
    /// 1 January 1970 00:00:00 UTC.
    pub signature_expiration: u32,
    /// The start of the validity period for the signature. See
    /// [`Self::signature_expiration`] for the format.
    pub signature_inception: u32,
    /// The key tag of the `DNSKEY` record that validates this signature.
    pub key_tag: u16,
    /// The owner name of the `DNSKEY` record that a validator is supposed to
    /// use, i.e. the name of the zone of the covered record set.
    pub signer_name: Name,
    /// The cryptographic signature. The format of this field depends on the
    /// algorithm in use.
    pub signature: Vec<u8>,
}

impl RRSIG {
    /// Parses `RRSIG` RDATA from its presentation format: nine fields, the
    /// last of which (the base64 signature) may span several
    /// whitespace-separated groups.
    ///
    /// The timestamp fields are of the form `YYYYMMDDHHMMSS` in UTC.
    pub fn parse_rdata(rdata: &str) -> Result<Self, ParseError> {
        let (fields, signature) = super::fields_and_payload(rdata, 8).ok_or_else(|| {
            ParseError::MalformedRdata(RecordType::RRSIG, rdata.to_string())
        })?;

        let type_covered = RecordType::from_str(fields[0])
            .map_err(|_| ParseError::UnknownRecordType(fields[0].to_string()))?;

        Ok(Self {
            type_covered,
            algorithm: fields[1].parse::<u8>()?.into(),
            labels: fields[2].parse()?,
            original_ttl: fields[3].parse()?,
            signature_expiration: parse_timestamp(fields[4])?,
            signature_inception: parse_timestamp(fields[5])?,
            key_tag: fields[6].parse()?,
            signer_name: Name::from_ascii(fields[7])?,
            signature: BASE64.decode(signature.as_bytes())?,
        })
    }

    /// Encodes the signature in the compact form used by the chain format:
    /// algorithm, labels, original TTL, expiration, inception, key tag, and
    /// the raw signature bytes.
    ///
    /// The covered type, the signer name, and any length framing are omitted
    /// because the surrounding chain supplies them.
    pub fn encode_compact_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        buf.write_u8(self.algorithm.into())?;
        buf.write_u8(self.labels)?;
        buf.write_u32::<NetworkEndian>(self.original_ttl)?;
        buf.write_u32::<NetworkEndian>(self.signature_expiration)?;
        buf.write_u32::<NetworkEndian>(self.signature_inception)?;
        buf.write_u16::<NetworkEndian>(self.key_tag)?;
        buf.write_all(&self.signature)?;

        Ok(1 + 1 + 4 + 4 + 4 + 2 + self.signature.len() as u16)
    }

    /// The same as [`encode_compact_into()`](Self::encode_compact_into), but
    /// returns the encoded bytes instead of appending them to a buffer.
    pub fn encode_compact(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        self.encode_compact_into(&mut buf)?;
        Ok(buf)
    }
}

/// Parses a `YYYYMMDDHHMMSS` timestamp (UTC) into seconds since the epoch.
///
/// The result fits in a u32 until the year 2106.
fn parse_timestamp(s: &str) -> Result<u32, ParseError> {
    match Utc.datetime_from_str(s, "%Y%m%d%H%M%S") {
        Ok(datetime) => Ok(datetime.timestamp() as u32),
        Err(_) => Err(ParseError::InvalidTimestamp(s.to_string())),
    }
}

impl Display for RRSIG {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let signature_expiration = Utc
            .timestamp(self.signature_expiration as i64, 0)
            .format("%Y%m%d%H%M%S")
            .to_string();
        let signature_inception = Utc
            .timestamp(self.signature_inception as i64, 0)
            .format("%Y%m%d%H%M%S")
            .to_string();
        let signature = BASE64.encode(&self.signature);
        write!(
            f,
            "{} {} {} {} {} {} {} {} {}",
            self.type_covered,
            u8::from(self.algorithm),
            self.labels,
            self.original_ttl,
            signature_expiration,
            signature_inception,
            self.key_tag,
            self.signer_name,
            signature
        )
    }
}

#[cfg(test)]
mod tests {
    use super::RRSIG;
    use crate::{Name, RecordType};

    #[test]
    fn parse_presentation_rdata() {
        let rrsig = RRSIG::parse_rdata(
            "DS 8 1 86400 20300101000000 20250101000000 5148 . BAUGBw==",
        )
        .unwrap();
        assert_eq!(rrsig.type_covered, RecordType::DS);
        assert_eq!(rrsig.algorithm, super::Algorithm::RSASHA256);
        assert_eq!(rrsig.labels, 1);
        assert_eq!(rrsig.original_ttl, 86400);
        assert_eq!(rrsig.signature_expiration, 1893456000);
        assert_eq!(rrsig.signature_inception, 1735689600);
        assert_eq!(rrsig.key_tag, 5148);
        assert_eq!(rrsig.signer_name, Name::root());
        assert_eq!(rrsig.signature, [4, 5, 6, 7]);
    }

    #[test]
    fn signature_may_span_several_groups() {
        let split = RRSIG::parse_rdata(
            "TXT 8 2 300 20300101000000 20250101000000 22878 example. BAUG Bw==",
        )
        .unwrap();
        assert_eq!(split.signature, [4, 5, 6, 7]);
    }

    #[test]
    fn compact_encoding() {
        let rrsig = RRSIG::parse_rdata(
            "DS 8 1 86400 20300101000000 20250101000000 5148 . BAUGBw==",
        )
        .unwrap();
        let bytes = rrsig.encode_compact().unwrap();
        let expected = [
            8,    // algorithm
            1,    // labels
            0x00, 0x01, 0x51, 0x80, // original ttl 86400
            0x70, 0xdb, 0xd8, 0x80, // expiration 1893456000
            0x67, 0x74, 0x85, 0x80, // inception 1735689600
            0x14, 0x1c, // key tag 5148
            4, 5, 6, 7, // signature
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(RRSIG::parse_rdata("DS 8 1 86400").is_err());
    }

    #[test]
    fn rejects_bad_timestamp() {
        assert!(RRSIG::parse_rdata(
            "DS 8 1 86400 2030 20250101000000 5148 . BAUGBw=="
        )
        .is_err());
    }
}
