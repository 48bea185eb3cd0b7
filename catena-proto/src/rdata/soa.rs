//! `SOA` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use byteorder::{NetworkEndian, WriteBytesExt};

use crate::error::{EncodeError, ParseError};
use crate::name::Name;
use crate::RecordType;

use super::RdataTrait;

/// A record that marks the start of a zone of authority.
/// [\[RFC 1035\]](https://www.rfc-editor.org/rfc/rfc1035)
///
/// The zone walker cares about the *owner* of this record (it names the
/// zone apex), but the rdata is parsed in full so that malformed resolver
/// output is caught early.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SOA {
    /// The domain name of the name server that was the original or primary
    /// source of data for this zone.
    pub mname: Name,
    /// A domain name which specifies the mailbox of the person responsible
    /// for this zone.
    pub rname: Name,
    /// The version number of the original copy of the zone.
    pub serial: u32,
    /// A time interval before the zone should be refreshed.
    pub refresh: u32,
    /// A time interval that should elapse before a failed refresh should be
    /// retried.
    pub retry: u32,
    /// The upper limit on the time interval that can elapse before the zone
    /// is no longer authoritative.
    pub expire: u32,
    /// The TTL to be used for negative responses.
    /// [\[RFC 2308\]](https://www.rfc-editor.org/rfc/rfc2308)
    pub minimum: u32,
}

impl RdataTrait for SOA {
    const RTYPE: RecordType = RecordType::SOA;

    fn parse_rdata(rdata: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = rdata.split_whitespace().collect();
        if fields.len() != 7 {
            return Err(ParseError::MalformedRdata(
                RecordType::SOA,
                rdata.to_string(),
            ));
        }

        Ok(Self {
            mname: Name::from_ascii(fields[0])?,
            rname: Name::from_ascii(fields[1])?,
            serial: fields[2].parse()?,
            refresh: fields[3].parse()?,
            retry: fields[4].parse()?,
            expire: fields[5].parse()?,
            minimum: fields[6].parse()?,
        })
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        let mut bytes_written = self.mname.encode_into(buf)?;
        bytes_written += self.rname.encode_into(buf)?;
        buf.write_u32::<NetworkEndian>(self.serial)?;
        buf.write_u32::<NetworkEndian>(self.refresh)?;
        buf.write_u32::<NetworkEndian>(self.retry)?;
        buf.write_u32::<NetworkEndian>(self.expire)?;
        buf.write_u32::<NetworkEndian>(self.minimum)?;

        Ok(bytes_written + 4 + 4 + 4 + 4 + 4)
    }
}

impl Display for SOA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname,
            self.rname,
            self.serial,
            self.refresh,
            self.retry,
            self.expire,
            self.minimum
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SOA;
    use crate::rdata::RdataTrait;
    use crate::Name;

    #[test]
    fn parse_presentation_rdata() {
        let soa =
            SOA::parse_rdata("ns.example. admin.example. 2025010101 7200 900 1209600 86400")
                .unwrap();
        assert_eq!(soa.mname, Name::from_ascii("ns.example.").unwrap());
        assert_eq!(soa.serial, 2025010101);
        assert_eq!(soa.minimum, 86400);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(SOA::parse_rdata("ns.example. admin.example. 1 2 3").is_err());
    }
}
