//! `catena-proto` provides the DNS data types that the `catena` chain builder
//! works with: domain names, the typed records of a DNSSEC delegation walk
//! (DNSKEY, DS, RRSIG, CNAME, TXT, SOA), parsing of resolver output in
//! presentation format, and the DNSSEC primitives (key tags and DS digests)
//! needed to match keys against their delegation records.
//!
//! The crate deliberately does not speak the DNS wire *message* format.
//! Records arrive as text from a validating resolver (see the resolver
//! contract in `catena`) and leave as fragments of the compact chain
//! encoding, so only names and rdata ever get wire-encoded here.
//!
//! # Basic usage example
//! ```rust
//! use catena_proto::rdata::{RdataTrait, DNSKEY};
//! use catena_proto::Name;
//!
//! let key = DNSKEY::parse_rdata("257 3 8 AwEAAaOZ").unwrap();
//! let _tag = key.key_tag();
//!
//! let mut wire = Vec::new();
//! Name::from_ascii("example.com.").unwrap().encode_into(&mut wire).unwrap();
//! assert_eq!(wire, b"\x07example\x03com\0");
//! ```

use std::fmt::{self, Display};

use repr_with_fallback::repr_with_fallback;
use strum_macros::EnumString;

pub mod dnssec;
pub mod error;
pub mod name;
pub mod rdata;
pub mod rrset;

pub use name::Name;

repr_with_fallback! {
    /// Represents a DNS TYPE.
    ///
    /// Only the types that can appear in an authentication chain are named;
    /// everything else falls back to `Unknown`. See
    /// [here](https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml)
    /// for the full registry.
    #[derive(PartialEq, Eq, Copy, Clone, EnumString, Debug)]
    #[non_exhaustive]
    pub enum RecordType {
        CNAME = 5,
        SOA = 6,
        TXT = 16,
        DS = 43,
        RRSIG = 46,
        DNSKEY = 48,
        Unknown(u16),
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Unknown(x) => write!(f, "TYPE{}", x),
            _ => write!(f, "{:?}", self),
        }
    }
}
