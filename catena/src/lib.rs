//! `catena` builds compact, self-contained DNSSEC authentication chains.
//!
//! Given a target name, it walks the zone hierarchy from the root down,
//! selects per zone the minimal key and signature material a verifier needs
//! to authenticate the terminal record (a `v=tls1` TXT policy, or a CNAME
//! redirect that restarts the walk), and serialises everything into a
//! length-prefixed binary blob with redundant material elided.
//!
//! Resolution and signature verification are delegated to an external
//! validating resolver behind the [`resolver::Resolver`] trait; this crate
//! trusts what it is handed and concerns itself with selection, compaction,
//! and encoding. The protocol data types live in `catena-proto`.

pub mod chain;
pub mod resolver;
pub mod serialize;
pub mod zone;
