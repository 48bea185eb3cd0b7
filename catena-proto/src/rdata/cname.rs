//! `CNAME` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use crate::error::{EncodeError, ParseError};
use crate::name::Name;
use crate::RecordType;

use super::RdataTrait;

/// A record containing the canonical name for an alias.
/// [\[RFC 1035\]](https://www.rfc-editor.org/rfc/rfc1035)
///
/// When the chain builder runs into one of these, it finishes the current
/// chain and starts a fresh one for the canonical name.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct CNAME {
    /// A domain name which specifies the canonical or primary name for the
    /// owner. The owner name is an alias.
    pub cname: Name,
}

impl RdataTrait for CNAME {
    const RTYPE: RecordType = RecordType::CNAME;

    fn parse_rdata(rdata: &str) -> Result<Self, ParseError> {
        Ok(Self {
            cname: Name::from_ascii(rdata.trim())?,
        })
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        self.cname.encode_into(buf)
    }
}

impl Display for CNAME {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cname)
    }
}
