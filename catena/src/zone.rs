//! The per-zone data model of an authentication chain.
//!
//! A chain is a path of zones from the root down to the target. Each zone
//! carries its DNSKEY set and an *exit*: the thing a verifier must
//! authenticate within the zone, which is either the DS set delegating to
//! the next zone or the terminal record set at the end of the path. Path
//! neighbours are implicit in the order of the surrounding `Vec<Zone>`.

use catena_proto::rdata::{DNSKEY, DS, RRSIG, TXT};
use catena_proto::rrset::RrSet;
use catena_proto::Name;

/// One DS record of a delegation, together with the planner's elide mark.
#[derive(Clone, Debug)]
pub struct DsEntry {
    pub ds: DS,
    /// True once the planner has established that the verifier can
    /// recompute this DS from the next zone's entry key; elided records are
    /// emitted with a zero length and their bytes suppressed.
    pub elide: bool,
}

/// The delegation out of a zone: the DS set published at the child's owner
/// name, sorted by serialised rdata.
#[derive(Clone, Debug)]
pub struct Delegation {
    pub entries: Vec<DsEntry>,
    pub rrsigs: Vec<RRSIG>,
}

/// The record set that ends a chain.
#[derive(Clone, Debug)]
pub enum Terminal {
    /// The target is an alias. The current chain ends here and a fresh
    /// chain for the canonical name follows.
    Cname { target: Name, rrsigs: Vec<RRSIG> },
    /// The target's TXT records (sorted), expected to carry a `v=tls1`
    /// policy.
    Txt { records: Vec<TXT>, rrsigs: Vec<RRSIG> },
}

/// What the verifier must authenticate in a zone.
#[derive(Clone, Debug)]
pub enum Exit {
    Delegation(Delegation),
    Terminal(Terminal),
}

impl Exit {
    /// The signatures covering the exit record set.
    pub fn rrsigs(&self) -> &[RRSIG] {
        match self {
            Exit::Delegation(delegation) => &delegation.rrsigs,
            Exit::Terminal(Terminal::Cname { rrsigs, .. }) => rrsigs,
            Exit::Terminal(Terminal::Txt { rrsigs, .. }) => rrsigs,
        }
    }
}

/// A fully planned zone of the chain path.
#[derive(Clone, Debug)]
pub struct Zone {
    pub name: Name,
    /// The zone's DNSKEY set, sorted by serialised rdata. The chain format
    /// refers to keys by their index in this order.
    pub dnskey: RrSet<DNSKEY>,
    pub exit: Exit,
    /// Index of the entry key (the key the parent's DS authenticates; the
    /// trust-anchor key in the root zone).
    pub entry_key: usize,
    /// True iff the entry key itself signs the exit record, letting the
    /// serializer omit the DNSKEY signature and every other key.
    pub direct_key: bool,
    /// Signature over the DNSKEY set by the entry key. `None` iff
    /// [`Self::direct_key`] is set.
    pub dnskey_sig: Option<RRSIG>,
    /// Signature over the exit record set by a key of this zone.
    pub exit_sig: RRSIG,
    /// Set by splicing: the verifier already holds this zone's keys from
    /// the previous chain, so only the exit block is emitted.
    pub already_in_zone: bool,
}
