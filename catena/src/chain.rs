//! Chain construction: walking the zone hierarchy, selecting the minimal
//! key and signature material per zone, and splicing consecutive chains.

use std::collections::BTreeSet;

use catena_proto::dnssec::{key_digest, ROOT_KEY_TAG};
use catena_proto::error::{EncodeError, ParseError};
use catena_proto::rdata::{CNAME, DNSKEY, DS, TXT};
use catena_proto::rrset::{find_soa, RrSet};
use catena_proto::{Name, RecordType};
use thiserror::Error;

use crate::resolver::{Resolver, ResolverError};
use crate::zone::{Delegation, DsEntry, Exit, Terminal, Zone};

/// Errors that may arise while building a chain.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Resolver failure.")]
    Resolver(#[from] ResolverError),

    #[error("Could not parse resolver output.")]
    Parse(#[from] ParseError),

    #[error("Encoding failed.")]
    Encode(#[from] EncodeError),

    #[error("IO error.")]
    Io(#[from] std::io::Error),

    #[error("No SOA record found while locating the zone of {0}.")]
    NoSoa(Name),

    #[error("Zone path out of order at {0}.")]
    DisorderedZonePath(Name),

    #[error("The root DNSKEY set contains no key with the trust-anchor tag.")]
    NoRootEntryKey,

    #[error("No DS record in the parent zone matches a DNSKEY of {0}.")]
    NoEntryKey(Name),

    #[error("No signature over the DNSKEY set of {0} by its entry key.")]
    NoDnskeySignature(Name),

    #[error("The exit record of {0} is not signed by any key in the zone.")]
    UntrustedExitRecord(Name),

    #[error("The exit record of {0} is not signed by its entry key.")]
    EntryKeyExitMismatch(Name),

    #[error("Serialised item of {0} bytes does not fit a two-byte length field.")]
    OversizedItem(usize),

    #[error("{0} records do not fit a one-byte count field.")]
    OversizedRecordSet(usize),
}

/// An unplanned zone: the fetched record sets, before key selection.
struct ZoneData {
    name: Name,
    dnskey: RrSet<DNSKEY>,
    exit: Exit,
}

/// Builds and plans the authentication chain for `target`: terminal lookup,
/// zone path discovery, per-zone fetches, and per-zone planning.
///
/// The returned zones are ordered root first. The last zone's exit is the
/// terminal; if it is a CNAME, the caller is expected to build another
/// chain for the canonical name and splice it against this one.
pub fn build_chain<R: Resolver>(resolver: &R, target: &Name) -> Result<Vec<Zone>, ChainError> {
    let terminal = fetch_terminal(resolver, target)?;
    let path = zone_path(resolver, target)?;
    let data = fetch_zones(resolver, &path, terminal)?;
    plan_zones(data)
}

/// Determines what the chain for `target` ends in: the first CNAME if the
/// name is an alias, its TXT set otherwise.
fn fetch_terminal<R: Resolver>(resolver: &R, target: &Name) -> Result<Terminal, ChainError> {
    let lines = resolver.query(target, RecordType::CNAME)?;
    let cnames = RrSet::<CNAME>::from_lines(target, &lines)?;
    if let Some(first) = cnames.records.first() {
        return Ok(Terminal::Cname {
            target: first.cname.clone(),
            rrsigs: cnames.rrsigs,
        });
    }

    let lines = resolver.query(target, RecordType::TXT)?;
    let mut txts = RrSet::<TXT>::from_lines(target, &lines)?;
    txts.records.sort();
    Ok(Terminal::Txt {
        records: txts.records,
        rrsigs: txts.rrsigs,
    })
}

/// Walks from `target` up to the root via SOA apex names.
///
/// Each SOA answer names the apex of the zone containing the queried name;
/// ascending strips the leftmost label of the apex just found. The returned
/// path is ordered root first and checked for strict parent/child ordering,
/// so a confused resolver cannot produce a nonsensical chain.
pub fn zone_path<R: Resolver>(resolver: &R, target: &Name) -> Result<Vec<Name>, ChainError> {
    let mut path = Vec::new();
    let mut current = target.clone();
    loop {
        let lines = resolver.query(&current, RecordType::SOA)?;
        let (apex, _soa) =
            find_soa(&lines)?.ok_or_else(|| ChainError::NoSoa(current.clone()))?;
        path.push(apex.clone());
        if current.is_root() {
            break;
        }
        let mut parent = apex;
        parent.pop_front_label();
        current = parent;
    }
    path.reverse();

    for pair in path.windows(2) {
        if pair[0] == pair[1] || !pair[0].zone_of(&pair[1]) {
            return Err(ChainError::DisorderedZonePath(pair[1].clone()));
        }
    }

    Ok(path)
}

/// Fetches the DNSKEY set of every zone on the path, the DS set of every
/// delegation, and attaches the terminal to the last zone.
fn fetch_zones<R: Resolver>(
    resolver: &R,
    path: &[Name],
    terminal: Terminal,
) -> Result<Vec<ZoneData>, ChainError> {
    let mut terminal = Some(terminal);
    let mut zones = Vec::with_capacity(path.len());

    for (i, name) in path.iter().enumerate() {
        let lines = resolver.query(name, RecordType::DNSKEY)?;
        let mut dnskey = RrSet::<DNSKEY>::from_lines(name, &lines)?;
        dnskey.sort_canonical();

        let exit = match path.get(i + 1) {
            Some(child) => {
                let lines = resolver.query(child, RecordType::DS)?;
                let mut ds = RrSet::<DS>::from_lines(child, &lines)?;
                ds.sort_canonical();
                Exit::Delegation(Delegation {
                    entries: ds
                        .records
                        .into_iter()
                        .map(|ds| DsEntry { ds, elide: false })
                        .collect(),
                    rrsigs: ds.rrsigs,
                })
            }
            None => Exit::Terminal(terminal.take().expect("one terminal per path")),
        };

        zones.push(ZoneData {
            name: name.clone(),
            dnskey,
            exit,
        });
    }

    Ok(zones)
}

/// Plans every zone of the path: selects entry keys, decides direct keying,
/// marks recomputable DS records for elision, and picks the signatures to
/// ship.
///
/// Wherever several candidates exist, the lowest index wins, keeping the
/// output reproducible across runs.
fn plan_zones(data: Vec<ZoneData>) -> Result<Vec<Zone>, ChainError> {
    let mut zones: Vec<Zone> = Vec::with_capacity(data.len());

    for zd in data {
        let tags: Vec<u16> = zd.dnskey.records.iter().map(|key| key.key_tag()).collect();

        // the keys that sign the exit record set
        let mut exit_signers = BTreeSet::new();
        for rrsig in zd.exit.rrsigs() {
            for (i, tag) in tags.iter().enumerate() {
                if rrsig.key_tag == *tag {
                    exit_signers.insert(i);
                }
            }
        }

        let (entry_key, direct_key) = match zones.last_mut() {
            None => {
                // root zone: enter on the well-known trust anchor
                let entry = tags
                    .iter()
                    .position(|tag| *tag == ROOT_KEY_TAG)
                    .ok_or(ChainError::NoRootEntryKey)?;
                (entry, false)
            }
            Some(parent) => {
                let delegation = match &mut parent.exit {
                    Exit::Delegation(delegation) => delegation,
                    Exit::Terminal(_) => unreachable!("interior zone without a delegation"),
                };

                // every DS the parent holds for us is a candidate; a DS
                // whose digest we can reproduce from one of our keys names
                // an entry key and becomes recomputable for the verifier
                let mut entry_keys = BTreeSet::new();
                for entry in delegation.entries.iter_mut() {
                    for (i, key) in zd.dnskey.records.iter().enumerate() {
                        match key_digest(entry.ds.digest_type, key, &zd.name)? {
                            Some(digest) if digest == entry.ds.digest => {
                                entry.elide = true;
                                entry_keys.insert(i);
                            }
                            _ => (),
                        }
                    }
                }

                // entering on a key that also signs the exit record lets us
                // drop the signature over the DNSKEY set
                match exit_signers.intersection(&entry_keys).next() {
                    Some(preferred) => (*preferred, true),
                    None => match entry_keys.iter().next() {
                        Some(first) => (*first, false),
                        None => return Err(ChainError::NoEntryKey(zd.name.clone())),
                    },
                }
            }
        };

        let dnskey_sig = if direct_key {
            None
        } else {
            let entry_tag = tags[entry_key];
            let sig = zd
                .dnskey
                .rrsigs
                .iter()
                .find(|sig| sig.key_tag == entry_tag)
                .ok_or_else(|| ChainError::NoDnskeySignature(zd.name.clone()))?;
            Some(sig.clone())
        };

        let exit_sig = if direct_key {
            let entry_tag = tags[entry_key];
            zd.exit
                .rrsigs()
                .iter()
                .find(|sig| sig.key_tag == entry_tag)
                .ok_or_else(|| ChainError::EntryKeyExitMismatch(zd.name.clone()))?
                .clone()
        } else {
            let mut selected = None;
            for index in &exit_signers {
                let tag = tags[*index];
                if let Some(sig) = zd.exit.rrsigs().iter().find(|sig| sig.key_tag == tag) {
                    selected = Some(sig.clone());
                    break;
                }
            }
            selected.ok_or_else(|| ChainError::UntrustedExitRecord(zd.name.clone()))?
        };

        zones.push(Zone {
            name: zd.name,
            dnskey: zd.dnskey,
            exit: zd.exit,
            entry_key,
            direct_key,
            dnskey_sig,
            exit_sig,
            already_in_zone: false,
        });
    }

    Ok(zones)
}

/// Drops the prefix that `zones` shares with the previously emitted path
/// and marks the first remaining zone as already known to the verifier, so
/// its key block is skipped on serialisation.
///
/// `previous` is the full (unspliced) path of the preceding chain. Both
/// paths start at the root, so at least one zone is always shared; splicing
/// two identical paths leaves only the last zone.
pub fn splice_zones(mut zones: Vec<Zone>, previous: &[Name]) -> Vec<Zone> {
    let mut shared = 0;
    while shared < zones.len()
        && shared < previous.len()
        && zones[shared].name == previous[shared]
    {
        shared += 1;
    }

    let mut spliced = zones.split_off(shared.saturating_sub(1));
    if let Some(first) = spliced.first_mut() {
        first.already_in_zone = true;
    }
    spliced
}

#[cfg(test)]
mod tests {
    use catena_proto::dnssec::ROOT_KEY_TAG;
    use catena_proto::Name;

    use super::{build_chain, splice_zones, zone_path, ChainError};
    use crate::resolver::testing::{
        world, world_with_broken_delegation, world_without_direct_keying,
    };
    use crate::zone::{Exit, Terminal};

    fn name(s: &str) -> Name {
        Name::from_ascii(s).unwrap()
    }

    fn path_names(zones: &[crate::zone::Zone]) -> Vec<Name> {
        zones.iter().map(|zone| zone.name.clone()).collect()
    }

    #[test]
    fn walks_the_zone_path_to_the_root() {
        let resolver = world();
        let path = zone_path(&resolver, &name("spki.example.")).unwrap();
        assert_eq!(path, vec![name("."), name("example.")]);

        let path = zone_path(&resolver, &name(".")).unwrap();
        assert_eq!(path, vec![name(".")]);
    }

    #[test]
    fn root_only_chain() {
        let resolver = world();
        let zones = build_chain(&resolver, &name(".")).unwrap();
        assert_eq!(zones.len(), 1);

        let root = &zones[0];
        // the sorted root key set is [ZSK (tag 5148), KSK (tag 19036)]
        assert_eq!(root.entry_key, 1);
        assert_eq!(root.dnskey.records[root.entry_key].key_tag(), ROOT_KEY_TAG);
        assert!(!root.direct_key);
        assert_eq!(root.dnskey_sig.as_ref().unwrap().key_tag, ROOT_KEY_TAG);
        assert_eq!(root.exit_sig.key_tag, 5148);
        match &root.exit {
            Exit::Terminal(Terminal::Txt { records, .. }) => {
                assert_eq!(records.len(), 1);
                assert!(records[0].has_tls_policy());
            }
            other => panic!("expected a TXT terminal, got {:?}", other),
        }
    }

    #[test]
    fn two_zone_chain_with_direct_keying() {
        let resolver = world();
        let zones = build_chain(&resolver, &name("spki.example.")).unwrap();
        assert_eq!(zones.len(), 2);

        let root = &zones[0];
        assert_eq!(root.entry_key, 1);
        assert!(!root.direct_key);
        assert_eq!(root.exit_sig.key_tag, 5148);
        match &root.exit {
            Exit::Delegation(delegation) => {
                // sorted by serialised rdata: the unsupported GOST record
                // (tag 1111) first, then the matching SHA-256 record
                assert_eq!(delegation.entries.len(), 2);
                assert_eq!(delegation.entries[0].ds.key_tag, 1111);
                assert!(!delegation.entries[0].elide);
                assert_eq!(delegation.entries[1].ds.key_tag, 22878);
                assert!(delegation.entries[1].elide);
            }
            other => panic!("expected a delegation, got {:?}", other),
        }

        let example = &zones[1];
        assert!(example.direct_key);
        assert_eq!(example.entry_key, 0);
        assert!(example.dnskey_sig.is_none());
        assert_eq!(example.exit_sig.key_tag, 22878);
    }

    #[test]
    fn falls_back_to_separate_dnskey_signature() {
        let resolver = world_without_direct_keying();
        let zones = build_chain(&resolver, &name("spki.example.")).unwrap();

        let example = &zones[1];
        // sorted keys: [tag 57829 (flags 256), tag 22878 (flags 257)];
        // only the second is delegated, only the first signs the TXT
        assert!(!example.direct_key);
        assert_eq!(example.entry_key, 1);
        assert_eq!(example.dnskey_sig.as_ref().unwrap().key_tag, 22878);
        assert_eq!(example.exit_sig.key_tag, 57829);
    }

    #[test]
    fn fails_without_an_entry_key() {
        let resolver = world_with_broken_delegation();
        let err = build_chain(&resolver, &name("spki.example.")).unwrap_err();
        assert!(matches!(err, ChainError::NoEntryKey(zone) if zone == name("example.")));
    }

    #[test]
    fn cname_terminal_names_the_canonical_target() {
        let resolver = world();
        let zones = build_chain(&resolver, &name("a.example.")).unwrap();
        match &zones.last().unwrap().exit {
            Exit::Terminal(Terminal::Cname { target, .. }) => {
                assert_eq!(target, &name("b.example."));
            }
            other => panic!("expected a CNAME terminal, got {:?}", other),
        }
    }

    #[test]
    fn splicing_identical_paths_keeps_only_the_last_zone() {
        let resolver = world();
        let first = build_chain(&resolver, &name("a.example.")).unwrap();
        let previous = path_names(&first);
        let second = build_chain(&resolver, &name("b.example.")).unwrap();

        let spliced = splice_zones(second, &previous);
        assert_eq!(spliced.len(), 1);
        assert_eq!(spliced[0].name, name("example."));
        assert!(spliced[0].already_in_zone);
    }

    #[test]
    fn splicing_divergent_paths_keeps_the_shared_ancestor() {
        let resolver = world();
        let first = build_chain(&resolver, &name("spki.example.")).unwrap();
        let previous = path_names(&first);
        let second = build_chain(&resolver, &name("w.other.")).unwrap();

        let spliced = splice_zones(second, &previous);
        assert_eq!(path_names(&spliced), vec![name("."), name("other.")]);
        assert!(spliced[0].already_in_zone);
        assert!(!spliced[1].already_in_zone);
    }
}
