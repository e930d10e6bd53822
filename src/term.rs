//! Terms, typedefs and instances of the ontology and the relations between them
//!
//! [`OboObject`] holds the parsed data of one stanza. Inside the
//! [`crate::Ontology`] every term is accessed via the [`GoTerm`] view, which
//! also knows about the children of the term.

use std::collections::HashSet;
use std::fmt::Display;

mod goterm;
pub(crate) mod internal;
mod obo_object;
mod termid;

pub use goterm::GoTerm;
pub use obo_object::OboObject;
pub use termid::TermId;

/// A set of typed relations
pub type Relations = HashSet<Relation>;

/// Name of the subclass relation type
pub const IS_A: &str = "is_a";

/// A typed, directed edge to another term
///
/// Relations of a term point to its parents, e.g. `is_a GO:0008150`
/// or `part_of GO:0005575`. The reverse relations of a term point to
/// its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Relation {
    kind: TermId,
    target: TermId,
}

impl Relation {
    /// Constructs a new relation of type `kind` to `target`
    pub fn new<K: Into<TermId>, T: Into<TermId>>(kind: K, target: T) -> Self {
        Self {
            kind: kind.into(),
            target: target.into(),
        }
    }

    /// The relation type, the id of a typedef such as `is_a`
    pub fn kind(&self) -> &TermId {
        &self.kind
    }

    /// The term the relation points to
    pub fn target(&self) -> &TermId {
        &self.target
    }

    /// Returns `true` for `is_a` relations
    pub fn is_a(&self) -> bool {
        self.kind == IS_A
    }

    /// Returns the relation with the same type pointing to `target` instead
    pub(crate) fn reversed<T: Into<TermId>>(&self, target: T) -> Self {
        Self::new(self.kind.clone(), target)
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.target)
    }
}
