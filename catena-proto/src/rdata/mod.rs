//! RDATA type definitions.
//!
//! Unlike a full DNS message codec, these types parse the *presentation*
//! format: the rdata portion of one line of validating-resolver output
//! (what `dig` prints). Encoding, on the other hand, produces the binary
//! rdata forms that the chain format and the DS digest computation need.

use std::fmt::Display;
use std::io::Write;

use crate::error::{EncodeError, ParseError};
use crate::RecordType;

pub mod cname;
pub mod dnskey;
pub mod ds;
pub mod rrsig;
pub mod soa;
pub mod txt;

pub use cname::CNAME;
pub use dnskey::DNSKEY;
pub use ds::DS;
pub use rrsig::RRSIG;
pub use soa::SOA;
pub use txt::TXT;

/// A trait for working with the different RDATA types.
pub trait RdataTrait: Sized + Display {
    /// The record type this RDATA belongs to.
    const RTYPE: RecordType;

    /// Parses the RDATA from its presentation format, i.e. the rdata portion
    /// of one line of resolver output.
    fn parse_rdata(rdata: &str) -> Result<Self, ParseError>;

    /// Encodes the RDATA into the given `buf` and returns the number of
    /// written bytes on success.
    ///
    /// If an error is returned, no guarantees for the state of `buf` are
    /// given.
    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError>;

    /// Encodes the RDATA and returns the encoded bytes.
    fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut rdata = Vec::new();
        self.encode_rdata_into(&mut rdata)?;
        Ok(rdata)
    }
}

/// Splits `rdata` into its first `n` whitespace-separated fields plus the
/// concatenation of all remaining tokens.
///
/// The trailing concatenation serves base64/hex payloads, which resolvers
/// print in whitespace-separated groups: joining the tokens strips the
/// whitespace, leaving the bare payload for decoding. Returns [`None`] if
/// there are fewer than `n` fields or the payload is empty.
pub(crate) fn fields_and_payload(rdata: &str, n: usize) -> Option<(Vec<&str>, String)> {
    let mut tokens = rdata.split_whitespace();
    let fields: Vec<&str> = tokens.by_ref().take(n).collect();
    if fields.len() < n {
        return None;
    }

    let payload: String = tokens.collect();
    if payload.is_empty() {
        return None;
    }

    Some((fields, payload))
}
