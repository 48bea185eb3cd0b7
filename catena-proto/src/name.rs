//! Definition and implementation of the [`Name`] type.

use std::cmp::Ordering;
use std::fmt::Display;
use std::io::Write;

use byteorder::WriteBytesExt;
use smartstring::SmartString;

use crate::error::{EncodeError, ParseError};

/// A DNS domain name, stored as its sequence of labels.
///
/// Comparison ignores ASCII case, and the [`Ord`] impl follows the
/// canonical ordering of
/// [RFC 4034, Section 6.1](https://www.rfc-editor.org/rfc/rfc4034#section-6.1).
///
/// Displaying a `Name` never appends the final dot; the root, having no
/// labels, prints as `"."` alone.
#[derive(Eq, Clone, Debug)]
pub struct Name {
    // the root's name is the empty label sequence
    labels: Vec<SmartString<smartstring::LazyCompact>>,
}

impl Name {
    /// Returns a `Name` representing the DNS root (`"."`).
    ///
    /// # Examples
    /// ```rust
    /// use catena_proto::Name;
    ///
    /// assert_eq!(Name::from_ascii(".").ok(), Some(Name::root()));
    /// ```
    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    /// Constructs a `Name` from an ASCII domain string.
    ///
    /// A single trailing dot is accepted and stripped; what remains must be
    /// dot-separated labels of 1 to 63 characters drawn from `a-z`, `A-Z`,
    /// `0-9`, `_`, and `-`, with the restriction that a label cannot begin
    /// or end with `-`. Both `"."` and the empty string name the root.
    ///
    /// # Examples
    /// ```rust
    /// use catena_proto::Name;
    ///
    /// assert_eq!(Name::from_ascii(".").ok(), Some(Name::root()));
    /// assert_eq!(Name::from_ascii("").ok(), Some(Name::root()));
    ///
    /// assert!(Name::from_ascii("example.com").is_ok());
    /// assert!(Name::from_ascii("example.com.").is_ok());
    /// assert!(Name::from_ascii("_443._tcp.example.com.").is_ok());
    ///
    /// assert!(Name::from_ascii("exa-mple-.com").is_err());
    /// assert!(Name::from_ascii("exa..mple.com").is_err());
    /// assert!(Name::from_ascii("exämple.com").is_err());
    /// ```
    pub fn from_ascii(name: impl AsRef<str>) -> Result<Self, ParseError> {
        let name = name.as_ref();
        if name.len() > 255 {
            return Err(ParseError::NameTooLong(name.len()));
        }

        // the fully-qualified spelling carries one trailing dot
        let relative = name.strip_suffix('.').unwrap_or(name);
        if relative.is_empty() {
            return Ok(Self::root());
        }

        let labels = relative
            .split('.')
            .map(
                |label| -> Result<SmartString<smartstring::LazyCompact>, ParseError> {
                    if label.is_empty() {
                        return Err(ParseError::EmptyLabel);
                    }
                    if label.len() > 63 {
                        return Err(ParseError::LabelTooLong(label.len()));
                    }
                    check_label(label)?;
                    Ok(label.into())
                },
            )
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Name { labels })
    }

    /// Encodes this name as an uncompressed DNS wire name: each label as a
    /// length byte followed by its characters, closed by a zero byte. The
    /// root therefore encodes as the zero byte alone.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Examples
    /// ```rust
    /// use catena_proto::Name;
    ///
    /// let mut wire = Vec::new();
    /// let written = Name::from_ascii("ns.example").unwrap().encode_into(&mut wire).unwrap();
    /// assert_eq!(wire, b"\x02ns\x07example\0");
    /// assert_eq!(written, 12);
    ///
    /// let mut wire = Vec::new();
    /// Name::root().encode_into(&mut wire).unwrap();
    /// assert_eq!(wire, b"\0");
    /// ```
    pub fn encode_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        let wire_len = self
            .labels
            .iter()
            .fold(1usize, |len, label| len + 1 + label.len());

        for label in &self.labels {
            buf.write_u8(label.len() as u8)?;
            buf.write_all(label.as_bytes())?;
        }
        buf.write_u8(0)?;

        Ok(wire_len as u16)
    }

    /// Removes and returns the leftmost label, if any remain.
    ///
    /// Stripping the only label of a single-label name leaves the root's
    /// name, so repeated calls walk a name up the hierarchy.
    ///
    /// # Examples
    /// ```rust
    /// use catena_proto::Name;
    ///
    /// let mut name = Name::from_ascii("a.example.com").unwrap();
    ///
    /// let label = name.pop_front_label().unwrap();
    /// assert_eq!(label, "a");
    ///
    /// assert!(name.pop_front_label().is_some());
    /// assert!(name.pop_front_label().is_some());
    /// assert!(name.pop_front_label().is_none());
    ///
    /// assert!(name.is_root());
    /// ```
    pub fn pop_front_label(&mut self) -> Option<SmartString<smartstring::LazyCompact>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(self.labels.remove(0))
        }
    }

    /// Returns true iff this `Name` is a parent zone of `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use catena_proto::Name;
    ///
    /// let parent = Name::from_ascii("example.com").unwrap();
    /// let child = Name::from_ascii("a.example.com").unwrap();
    ///
    /// assert_eq!(child.zone_of(&child), true);
    /// assert_eq!(parent.zone_of(&child), true);
    /// assert_eq!(child.zone_of(&parent), false);
    /// assert_eq!(Name::root().zone_of(&parent), true);
    /// ```
    pub fn zone_of(&self, other: &Name) -> bool {
        if self.labels.len() > other.labels.len() {
            return false;
        }

        let label_pairs = self.labels.iter().rev().zip(other.labels.iter().rev());
        for (self_label, other_label) in label_pairs {
            if !self_label.eq_ignore_ascii_case(other_label) {
                return false;
            }
        }

        true
    }

    /// Returns true iff this `Name` represents the DNS root (`"."`).
    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Checks that a non-empty string is an acceptable DNS label.
fn check_label(label: &str) -> Result<(), ParseError> {
    let allowed = |byte: u8| byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-';

    let bytes = label.as_bytes();
    if !bytes.iter().copied().all(allowed) {
        return Err(ParseError::NameInvalidChars);
    }
    // hyphens may appear in a label but not delimit it
    if bytes[0] == b'-' || bytes[bytes.len() - 1] == b'-' {
        return Err(ParseError::NameInvalidChars);
    }

    Ok(())
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Canonical ordering, as defined in
/// [RFC 4034, Section 6.1](https://www.rfc-editor.org/rfc/rfc4034#section-6.1):
/// names are ordered by their rightmost labels first, labels compare as
/// lowercased octet strings, and a name sorts after every name it is a
/// descendant of.
///
/// # Examples
/// ```rust
/// use catena_proto::Name;
///
/// let names_sorted: Vec<_> = ["example", "a.example", "Z.a.example", "z.example"]
///     .into_iter()
///     .map(|n| Name::from_ascii(n).unwrap())
///     .collect();
///
/// let mut names = names_sorted.clone();
/// names.swap(0, 2);
/// names.swap(1, 3);
/// names.sort();
///
/// assert_eq!(names, names_sorted);
/// ```
impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        // walk both label sequences from the most significant (rightmost)
        // end; the zip stops at the shorter name, which by then is a suffix
        // of the longer one and must sort first
        let pairs = self.labels.iter().rev().zip(other.labels.iter().rev());
        for (ours, theirs) in pairs {
            let ordering = ours
                .bytes()
                .map(|byte| byte.to_ascii_lowercase())
                .cmp(theirs.bytes().map(|byte| byte.to_ascii_lowercase()));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        self.labels.len().cmp(&other.labels.len())
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            return write!(f, ".");
        }

        let mut separator = "";
        for label in &self.labels {
            write!(f, "{}{}", separator, label)?;
            separator = ".";
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Name;

    #[test]
    fn wire_encoding() {
        let mut buf = Vec::new();
        Name::from_ascii("a.b.").unwrap().encode_into(&mut buf).unwrap();
        assert_eq!(buf, b"\x01a\x01b\0");

        let mut buf = Vec::new();
        let written = Name::root().encode_into(&mut buf).unwrap();
        assert_eq!(buf, [0u8]);
        assert_eq!(written, 1);
    }

    #[test]
    fn case_insensitive_equality() {
        let a = Name::from_ascii("Example.COM").unwrap();
        let b = Name::from_ascii("example.com.").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn only_one_trailing_dot_is_tolerated() {
        assert!(Name::from_ascii("example.com.").is_ok());
        assert!(Name::from_ascii("example.com..").is_err());
    }

    #[test]
    fn popping_labels_reaches_the_root() {
        let mut name = Name::from_ascii("example.").unwrap();
        assert_eq!(name.pop_front_label().as_deref(), Some("example"));
        assert!(name.is_root());
        assert!(name.pop_front_label().is_none());
        assert!(name.is_root());
    }

    #[test]
    fn ancestors_sort_before_their_descendants() {
        let parent = Name::from_ascii("example.").unwrap();
        let child = Name::from_ascii("a.example.").unwrap();
        assert!(parent < child);
        assert!(Name::root() < parent);
    }
}
