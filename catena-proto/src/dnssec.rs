//! DNSSEC primitives: the root trust-anchor tag and DS digest computation.
//!
//! This is deliberately the only place where the chain builder touches
//! cryptography. Signature *verification* belongs to the validating
//! resolver; digests are recomputed here solely to discover which DNSKEY a
//! parent's DS record authenticates (and, symmetrically, which DS records a
//! verifier can reconstruct and therefore need not be shipped).

use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::EncodeError;
use crate::name::Name;
use crate::rdata::ds::DigestType;
use crate::rdata::{RdataTrait, DNSKEY};

/// The key tag of the root zone trust anchor the verifier is presumed to
/// hold (the ICANN KSK-2010).
pub const ROOT_KEY_TAG: u16 = 19036;

/// Computes the DS digest of `key` as published at `owner`: a hash over the
/// owner name in wire form followed by the key's serialised rdata.
///
/// Returns [`None`] for digest types the chain format does not support;
/// such DS records can never authenticate an entry key.
pub fn key_digest(
    digest_type: DigestType,
    key: &DNSKEY,
    owner: &Name,
) -> Result<Option<Vec<u8>>, EncodeError> {
    let mut data = Vec::with_capacity(key.key.len() + 64);
    owner.encode_into(&mut data)?;
    key.encode_rdata_into(&mut data)?;

    let digest = match digest_type {
        DigestType::SHA1 => Sha1::digest(&data).to_vec(),
        DigestType::SHA256 => Sha256::digest(&data).to_vec(),
        _ => return Ok(None),
    };

    Ok(Some(digest))
}

#[cfg(test)]
mod tests {
    use data_encoding::{BASE64, HEXUPPER};

    use super::{key_digest, ROOT_KEY_TAG};
    use crate::rdata::ds::DigestType;
    use crate::rdata::dnskey::{Algorithm, DNSKEY};
    use crate::Name;

    fn root_ksk_2010() -> DNSKEY {
        DNSKEY {
            flags: 257,
            algorithm: Algorithm::RSASHA256,
            key: BASE64
                .decode(
                    b"AwEAAagAIKlVZrpC6Ia7gEzahOR+9W29euxhJhVVLOyQbSEW0O8gcCjFFVQUTf6v58fLjwBd\
                      0YI0EzrAcQqBGCzh/RStIoO8g0NfnfL2MTJRkxoXbfDaUeVPQuYEhg37NZWAJQ9VnMVDxP/V\
                      HL496M/QZxkjf5/Efucp2gaDX6RS6CXpoY68LsvPVjR0ZSwzz1apAzvN9dlzEheX7ICJBBtu\
                      A6G3LQpzW5hOA2hzCTMjJPJ8LbqF6dsV6DoBQzgul0sGIcGOYl7OyQdXfZ57relSQageu+ip\
                      AdTTJ25AsRTAoub8ONGcLmqrAmRLKBP1dfwhYB4N7knNnulqQxA+Uk1ihz0=",
                )
                .unwrap(),
        }
    }

    #[test]
    fn ksk_2010_matches_the_trust_anchor_tag() {
        assert_eq!(root_ksk_2010().key_tag(), ROOT_KEY_TAG);
    }

    #[test]
    fn sha256_digest_over_owner_and_key() {
        let key = DNSKEY {
            flags: 257,
            algorithm: Algorithm::RSASHA256,
            key: vec![0xaa; 16],
        };
        let owner = Name::from_ascii("example.").unwrap();
        let digest = key_digest(DigestType::SHA256, &key, &owner)
            .unwrap()
            .unwrap();
        assert_eq!(
            HEXUPPER.encode(&digest),
            "DA2B9B76D85E3021EF8C9BC75F4CD4ED0A270D5937A897BB4B6816931CF897FF"
        );
    }

    #[test]
    fn sha1_digest_over_owner_and_key() {
        let key = DNSKEY {
            flags: 257,
            algorithm: Algorithm::RSASHA256,
            key: vec![0xaa; 16],
        };
        let owner = Name::from_ascii("example.").unwrap();
        let digest = key_digest(DigestType::SHA1, &key, &owner).unwrap().unwrap();
        assert_eq!(
            HEXUPPER.encode(&digest),
            "31DBB8F19850330E332F1CFEB7084C5B479FB820"
        );
    }

    #[test]
    fn unsupported_digest_types_yield_nothing() {
        let key = DNSKEY {
            flags: 257,
            algorithm: Algorithm::RSASHA256,
            key: vec![0xaa; 16],
        };
        let owner = Name::from_ascii("example.").unwrap();
        assert!(key_digest(DigestType::GOST, &key, &owner)
            .unwrap()
            .is_none());
    }
}
