//! The resolver seam: how the chain builder obtains DNSSEC-validated
//! records.
//!
//! The builder never speaks DNS itself. It hands (name, type) queries to a
//! [`Resolver`] and gets back presentation-format record lines, trusting
//! that the resolver has already validated the signatures it returns. The
//! production implementation shells out to `dig` against a local validating
//! resolver; tests use a canned-answer implementation of the same trait.

use std::process::Command;

use catena_proto::{Name, RecordType};
use thiserror::Error;

/// Errors that may arise while querying the resolver.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Failed to run dig.")]
    Spawn(#[from] std::io::Error),

    #[error("dig exited with {0}.")]
    Failed(std::process::ExitStatus),

    #[error("dig produced non-UTF-8 output.")]
    BadOutput(#[from] std::string::FromUtf8Error),
}

/// A source of DNSSEC-validated records in presentation format.
pub trait Resolver {
    /// Queries for records of `rtype` at `name`.
    ///
    /// Returns the resolver's record lines with comments and blank lines
    /// removed. An empty answer is not an error; the caller decides whether
    /// a missing record set is acceptable.
    fn query(&self, name: &Name, rtype: RecordType) -> Result<Vec<String>, ResolverError>;
}

/// A [`Resolver`] that invokes `dig +dnssec` against a validating recursive
/// resolver, one subprocess per query.
pub struct DigResolver {
    server: String,
}

impl DigResolver {
    /// Creates a resolver querying the given server (an address or hostname
    /// understood by dig's `@server` syntax).
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
        }
    }
}

impl Resolver for DigResolver {
    fn query(&self, name: &Name, rtype: RecordType) -> Result<Vec<String>, ResolverError> {
        let output = Command::new("dig")
            .arg(format!("@{}", self.server))
            .arg("+dnssec")
            .arg("-t")
            .arg(rtype.to_string())
            .arg(fqdn(name))
            .output()?;

        if !output.status.success() {
            return Err(ResolverError::Failed(output.status));
        }

        let stdout = String::from_utf8(output.stdout)?;
        Ok(stdout
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with(';'))
            .map(|line| line.to_string())
            .collect())
    }
}

/// Formats a name with its trailing dot, the way dig expects query names.
pub(crate) fn fqdn(name: &Name) -> String {
    if name.is_root() {
        ".".to_string()
    } else {
        format!("{}.", name)
    }
}
