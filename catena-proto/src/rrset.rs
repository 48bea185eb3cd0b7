//! Assembly of typed record sets from resolver output lines.
//!
//! A validating resolver answers a (name, type) query with presentation
//! lines of the form `<owner> <ttl> <class> <rrtype> <rdata>`. This module
//! turns those lines into a typed record set: the rdata of the queried type
//! plus the RRSIG records covering it. Everything else (other owners, other
//! classes, signatures over other types) is dropped.

use crate::error::ParseError;
use crate::name::Name;
use crate::rdata::{RdataTrait, RRSIG, SOA};
use crate::RecordType;

/// A set of records with the same owner name and record type, together with
/// the RRSIG records covering the set.
#[derive(Clone, Debug)]
pub struct RrSet<T> {
    pub owner: Name,
    pub records: Vec<T>,
    pub rrsigs: Vec<RRSIG>,
}

impl<T: RdataTrait> RrSet<T> {
    /// Assembles the record set for `owner` from resolver output lines.
    ///
    /// Lines whose owner or class do not match are skipped; lines that match
    /// but fail to parse are an error.
    pub fn from_lines(owner: &Name, lines: &[String]) -> Result<Self, ParseError> {
        let mnemonic = T::RTYPE.to_string();
        let mut records = Vec::new();
        let mut rrsigs = Vec::new();

        for line in lines {
            let (line_owner, _ttl, class, rtype, rdata) = split_line(line)?;

            match Name::from_ascii(line_owner) {
                Ok(name) if &name == owner => (),
                // an owner that is not even a valid name cannot be ours
                _ => continue,
            }
            if class != "IN" {
                continue;
            }

            if rtype == mnemonic {
                records.push(T::parse_rdata(rdata)?);
            } else if rtype == "RRSIG" {
                // signatures over other types are not ours; checking the
                // covered-type field first keeps them from even being parsed
                match rdata.split_whitespace().next() {
                    Some(covered) if covered == mnemonic => {
                        rrsigs.push(RRSIG::parse_rdata(rdata)?)
                    }
                    _ => continue,
                }
            }
        }

        Ok(Self {
            owner: owner.clone(),
            records,
            rrsigs,
        })
    }

    /// Sorts the records by their serialised rdata.
    ///
    /// DNSKEY and DS sets must be held in this order: the chain format
    /// refers to keys by their index in the sorted set, so the order has to
    /// be reproducible across runs and implementations.
    pub fn sort_canonical(&mut self) {
        self.records
            .sort_by_cached_key(|rec| rec.encode().expect("encoding rdata into vector failed"));
    }
}

/// Scans resolver output for the first `IN SOA` line, regardless of owner,
/// and returns the owner (the zone apex) together with the parsed rdata.
///
/// An SOA answer names the apex of the zone containing the queried name, so
/// the owner will usually *not* equal the query name.
pub fn find_soa(lines: &[String]) -> Result<Option<(Name, SOA)>, ParseError> {
    for line in lines {
        let (owner, _ttl, class, rtype, rdata) = split_line(line)?;
        if class == "IN" && rtype == RecordType::SOA.to_string() {
            let apex = Name::from_ascii(owner)?;
            let soa = SOA::parse_rdata(rdata)?;
            return Ok(Some((apex, soa)));
        }
    }
    Ok(None)
}

/// Splits a record line into owner, TTL, class, record type, and rdata.
///
/// The TTL is validated but otherwise unused.
fn split_line(line: &str) -> Result<(&str, u32, &str, &str, &str), ParseError> {
    let (owner, rest) = next_field(line).ok_or_else(|| malformed(line))?;
    let (ttl, rest) = next_field(rest).ok_or_else(|| malformed(line))?;
    let (class, rest) = next_field(rest).ok_or_else(|| malformed(line))?;
    let (rtype, rest) = next_field(rest).ok_or_else(|| malformed(line))?;
    let rdata = rest.trim();
    if rdata.is_empty() {
        return Err(malformed(line));
    }

    let ttl: u32 = ttl.parse()?;

    Ok((owner, ttl, class, rtype, rdata))
}

fn next_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

fn malformed(line: &str) -> ParseError {
    ParseError::MalformedLine(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::{find_soa, RrSet};
    use crate::rdata::{DNSKEY, TXT};
    use crate::Name;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn collects_records_and_covering_signatures() {
        let answer = lines(&[
            "example.\t3600\tIN\tDNSKEY\t256 3 8 AQIDBAUGBwg=",
            "example. 3600 IN RRSIG DNSKEY 8 1 3600 20300101000000 20250101000000 5148 example. AAECAw==",
            // a signature over another type is not ours
            "example. 3600 IN RRSIG SOA 8 1 3600 20300101000000 20250101000000 5148 example. AAECAw==",
            // wrong owner
            "other. 3600 IN DNSKEY 256 3 8 AQIDBAUGBwg=",
            // wrong class
            "example. 3600 CH DNSKEY 256 3 8 AQIDBAUGBwg=",
        ]);

        let owner = Name::from_ascii("example.").unwrap();
        let set = RrSet::<DNSKEY>::from_lines(&owner, &answer).unwrap();
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.rrsigs.len(), 1);
        assert_eq!(set.rrsigs[0].key_tag, 5148);
    }

    #[test]
    fn owner_comparison_ignores_case() {
        let answer = lines(&["EXAMPLE. 300 IN TXT \"v=tls1\""]);
        let owner = Name::from_ascii("example.").unwrap();
        let set = RrSet::<TXT>::from_lines(&owner, &answer).unwrap();
        assert_eq!(set.records.len(), 1);
    }

    #[test]
    fn canonical_sort_orders_by_serialised_rdata() {
        let answer = lines(&[
            // flags 257 serialises after flags 256
            "example. 3600 IN DNSKEY 257 3 8 qqqqqqqqqqqqqqqqqqqqqg==",
            "example. 3600 IN DNSKEY 256 3 8 u7u7u7u7u7u7u7u7u7u7uw==",
        ]);
        let owner = Name::from_ascii("example.").unwrap();
        let mut set = RrSet::<DNSKEY>::from_lines(&owner, &answer).unwrap();
        set.sort_canonical();
        assert_eq!(set.records[0].flags, 256);
        assert_eq!(set.records[1].flags, 257);
    }

    #[test]
    fn soa_scan_returns_the_apex() {
        let answer = lines(&[
            "example. 3600 IN SOA ns.example. admin.example. 1 7200 900 1209600 86400",
        ]);
        let (apex, soa) = find_soa(&answer).unwrap().unwrap();
        assert_eq!(apex, Name::from_ascii("example.").unwrap());
        assert_eq!(soa.serial, 1);

        assert!(find_soa(&lines(&[])).unwrap().is_none());
    }

    #[test]
    fn malformed_lines_are_an_error() {
        let answer = lines(&["example. 3600 IN"]);
        let owner = Name::from_ascii("example.").unwrap();
        assert!(RrSet::<TXT>::from_lines(&owner, &answer).is_err());
    }
}
