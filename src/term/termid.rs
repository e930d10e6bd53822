use core::fmt::Debug;
use std::borrow::Borrow;
use std::fmt::Display;

/// The unique identifier of a term, typedef or instance
///
/// The id is kept as it appears in the source, e.g. `GO:0008150` for terms
/// or `part_of` for relation types.
///
/// # Examples
///
/// ```
/// use goenrich::TermId;
///
/// let id = TermId::from("GO:0008150");
/// assert_eq!(id.as_str(), "GO:0008150");
/// assert_eq!(id.to_string(), "GO:0008150");
/// assert!(id == "GO:0008150");
/// ```
#[derive(Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermId {
    inner: String,
}

impl TermId {
    /// Returns the id as string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for TermId {
    fn from(s: &str) -> Self {
        TermId {
            inner: s.to_string(),
        }
    }
}

impl From<String> for TermId {
    fn from(inner: String) -> Self {
        TermId { inner }
    }
}

impl From<&TermId> for TermId {
    fn from(id: &TermId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for TermId {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<str> for TermId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({})", self.inner)
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        self.inner == *other
    }
}
