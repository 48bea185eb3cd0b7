//! `TXT` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use byteorder::WriteBytesExt;

use crate::error::{EncodeError, ParseError};
use crate::RecordType;

use super::RdataTrait;

/// The marker a TXT record must carry to hold a usable TLS policy.
pub const TLS_POLICY_MARKER: &str = "v=tls1";

/// A record containing descriptive text.
/// [\[RFC 1035\]](https://www.rfc-editor.org/rfc/rfc1035)
///
/// One `TXT` holds the decoded text of a single record. A resolver prints
/// the text as one or more quoted strings; adjacent quoted strings belong to
/// the same record and are concatenated during parsing.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub struct TXT {
    /// The decoded text.
    pub text: String,
}

impl TXT {
    /// Returns true iff the text carries the `v=tls1` TLS policy marker.
    pub fn has_tls_policy(&self) -> bool {
        self.text.contains(TLS_POLICY_MARKER)
    }
}

impl RdataTrait for TXT {
    const RTYPE: RecordType = RecordType::TXT;

    /// Parses `TXT` RDATA from its presentation format.
    ///
    /// If the rdata starts with a double quote, it is decoded as a sequence
    /// of quoted strings: whitespace outside quotes is ignored (so adjacent
    /// quoted strings concatenate), and a backslash passes the following
    /// character through literally. Anything else is taken verbatim.
    fn parse_rdata(rdata: &str) -> Result<Self, ParseError> {
        let text = if rdata.starts_with('"') {
            parse_quoted_string(rdata)
                .ok_or_else(|| ParseError::InvalidQuotedString(rdata.to_string()))?
        } else {
            rdata.to_string()
        };

        Ok(Self { text })
    }

    /// Encodes the text as a sequence of character strings: chunks of up to
    /// 255 bytes, each prefixed with its one-byte length.
    ///
    /// The empty text encodes as a single zero-length chunk, so that every
    /// text produces at least one chunk and decoding is unambiguous.
    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        let mut rest = self.text.as_bytes();
        let mut bytes_written = 0usize;
        loop {
            let piece = &rest[..rest.len().min(255)];
            buf.write_u8(piece.len() as u8)?;
            buf.write_all(piece)?;
            bytes_written += 1 + piece.len();
            rest = &rest[piece.len()..];
            if rest.is_empty() {
                break;
            }
        }
        Ok(bytes_written as u16)
    }
}

/// Decodes a sequence of quoted strings into their concatenation.
///
/// Returns [`None`] if a character other than whitespace appears outside
/// quotes.
fn parse_quoted_string(t: &str) -> Option<String> {
    let mut in_string = false;
    let mut quoting = false;
    let mut r = String::new();
    for c in t.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
                continue;
            } else if c == ' ' || c == '\t' {
                continue;
            } else {
                return None;
            }
        }
        if quoting {
            r.push(c);
            quoting = false;
            continue;
        }
        if c == '\\' {
            quoting = true;
            continue;
        }
        if c == '"' {
            in_string = false;
            continue;
        }
        r.push(c);
    }
    Some(r)
}

impl Display for TXT {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // escape any quotes in the text so the output could be re-parsed
        let text = self.text.replace('"', "\\\"");
        write!(f, "\"{}\"", text)
    }
}
