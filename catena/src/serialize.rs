//! Emission of the compact chain wire format.
//!
//! All integers are big-endian. Variable-length items are framed with a
//! u16 length; a zero length means the verifier is expected to supply the
//! item from context (the trust-anchor key, or a DS it can recompute).

use byteorder::{NetworkEndian, WriteBytesExt};
use catena_proto::dnssec::ROOT_KEY_TAG;
use catena_proto::rdata::RdataTrait;
use catena_proto::{Name, RecordType};

use crate::chain::ChainError;
use crate::zone::{Exit, Terminal, Zone};

/// Writes the fixed chain header: the trust-anchor key tag the verifier is
/// presumed to hold.
pub fn write_header(out: &mut Vec<u8>) -> Result<(), ChainError> {
    out.write_u16::<NetworkEndian>(ROOT_KEY_TAG)?;
    Ok(())
}

/// Serialises one zone of the chain: its key block (unless the verifier
/// already holds this zone's keys from a spliced prefix) followed by its
/// exit block.
///
/// `next_name` is the owner the exit record points at: the next zone's name
/// for a delegation, or the chain's target name at the terminal.
pub fn write_zone(out: &mut Vec<u8>, zone: &Zone, next_name: &Name) -> Result<(), ChainError> {
    if !zone.already_in_zone {
        write_key_block(out, zone)?;
    }
    write_exit_block(out, zone, next_name)
}

/// The key block: the entry-key index, the signature over the DNSKEY set,
/// and the keys themselves.
///
/// Under direct keying the DNSKEY signature is superfluous, so a zero
/// length is written in its place and only the entry key is shipped; the
/// index always refers to the key list as emitted, which then has exactly
/// one element. In the root zone the trust-anchor key is emitted with a
/// zero length, as the verifier already holds it.
fn write_key_block(out: &mut Vec<u8>, zone: &Zone) -> Result<(), ChainError> {
    match &zone.dnskey_sig {
        None => {
            out.write_u8(0)?;
            out.write_u16::<NetworkEndian>(0)?;
            out.write_u8(1)?;
            let entry_key = &zone.dnskey.records[zone.entry_key];
            put_framed(out, &entry_key.encode()?)?;
        }
        Some(sig) => {
            let count = count_u8(zone.dnskey.records.len())?;
            out.write_u8(zone.entry_key as u8)?;
            put_framed(out, &sig.encode_compact()?)?;
            out.write_u8(count)?;
            for key in &zone.dnskey.records {
                if zone.name.is_root() && key.key_tag() == ROOT_KEY_TAG {
                    put_framed(out, &[])?;
                } else {
                    put_framed(out, &key.encode()?)?;
                }
            }
        }
    }
    Ok(())
}

/// The exit block: the next owner name, the exit record type, the signature
/// over the exit record set, and the set itself.
///
/// DS records marked for elision are emitted with a zero length (keeping
/// their digest-type byte, which the verifier needs to recompute them).
fn write_exit_block(out: &mut Vec<u8>, zone: &Zone, next_name: &Name) -> Result<(), ChainError> {
    next_name.encode_into(out)?;

    let rtype = match &zone.exit {
        Exit::Delegation(_) => RecordType::DS,
        Exit::Terminal(Terminal::Txt { .. }) => RecordType::TXT,
        Exit::Terminal(Terminal::Cname { .. }) => RecordType::CNAME,
    };
    out.write_u16::<NetworkEndian>(rtype.into())?;

    put_framed(out, &zone.exit_sig.encode_compact()?)?;

    match &zone.exit {
        Exit::Delegation(delegation) => {
            out.write_u8(count_u8(delegation.entries.len())?)?;
            for entry in &delegation.entries {
                out.write_u8(entry.ds.digest_type.into())?;
                if entry.elide {
                    put_framed(out, &[])?;
                } else {
                    put_framed(out, &entry.ds.encode()?)?;
                }
            }
        }
        Exit::Terminal(Terminal::Txt { records, .. }) => {
            out.write_u8(count_u8(records.len())?)?;
            for txt in records {
                put_framed(out, &txt.encode()?)?;
            }
        }
        Exit::Terminal(Terminal::Cname { target, .. }) => {
            target.encode_into(out)?;
        }
    }

    Ok(())
}

/// Writes a u16 length prefix followed by the bytes, failing loudly on
/// items the framing cannot express.
fn put_framed(out: &mut Vec<u8>, bytes: &[u8]) -> Result<(), ChainError> {
    let len = u16::try_from(bytes.len()).map_err(|_| ChainError::OversizedItem(bytes.len()))?;
    out.write_u16::<NetworkEndian>(len)?;
    out.extend_from_slice(bytes);
    Ok(())
}

fn count_u8(count: usize) -> Result<u8, ChainError> {
    u8::try_from(count).map_err(|_| ChainError::OversizedRecordSet(count))
}
