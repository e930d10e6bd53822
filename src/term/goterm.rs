use std::collections::hash_set;

use crate::term::internal::TermNode;
use crate::term::{OboObject, Relations, TermId};
use crate::{GoResult, Ontology};

/// A single term of the [`Ontology`]
///
/// `GoTerm` is a lightweight view that borrows from the ontology. It knows
/// the parents of the term as well as the children, which are only available
/// after the whole ontology is loaded.
///
/// # Examples
///
/// ```
/// use goenrich::Ontology;
///
/// let ontology = Ontology::from_text("[Term]
/// id: GO:1
/// name: root
///
/// [Term]
/// id: GO:2
/// name: child
/// is_a: GO:1
/// ").unwrap();
///
/// let term = ontology.term("GO:2").unwrap();
/// assert_eq!(term.name(), Some("child"));
/// assert_eq!(term.depth().unwrap(), 2);
///
/// let parent = term.parents().next().unwrap();
/// assert_eq!(parent.id(), "GO:1");
/// assert_eq!(parent.children().count(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GoTerm<'a> {
    node: &'a TermNode,
    ontology: &'a Ontology,
}

impl<'a> GoTerm<'a> {
    pub(crate) fn new(ontology: &'a Ontology, node: &'a TermNode) -> GoTerm<'a> {
        GoTerm { node, ontology }
    }

    /// Returns the [`TermId`] of the term
    ///
    /// e.g.: `GO:0008150`
    pub fn id(&self) -> &'a TermId {
        self.node.id()
    }

    /// Returns the name of the term
    ///
    /// e.g.: `biological_process`
    pub fn name(&self) -> Option<&'a str> {
        self.node.object().name()
    }

    /// Returns the namespace of the term
    pub fn namespace(&self) -> Option<&'a str> {
        self.node.object().namespace()
    }

    /// Returns the parsed stanza data of the term
    pub fn object(&self) -> &'a OboObject {
        self.node.object()
    }

    /// Returns the relations to the direct parents
    pub fn related(&self) -> &'a Relations {
        self.node.related()
    }

    /// Returns the relations to the direct children
    ///
    /// The relation type is the one the child uses to refer to this term.
    pub fn related_to(&self) -> &'a Relations {
        self.node.related_to()
    }

    /// Returns an iterator of the direct parents of the term
    ///
    /// A parent that is connected via several relation types is
    /// returned once per relation.
    pub fn parents(&self) -> GoTerms<'a> {
        GoTerms::new(self.node.related(), self.ontology)
    }

    /// Returns an iterator of the direct children of the term
    ///
    /// A child that is connected via several relation types is
    /// returned once per relation.
    pub fn children(&self) -> GoTerms<'a> {
        GoTerms::new(self.node.related_to(), self.ontology)
    }

    /// Returns the depth of the term, `1` for root terms
    ///
    /// # Errors
    ///
    /// [`crate::GoError::CyclicGraph`] if the term has itself as ancestor
    pub fn depth(&self) -> GoResult<usize> {
        self.ontology.term_depth(self.id())
    }

    /// Returns `true` if the term is marked as obsolete
    pub fn is_obsolete(&self) -> bool {
        self.node.object().is_obsolete()
    }

    /// Returns `true` if the term belongs to the subset `name`
    pub fn in_subset(&self, name: &str) -> bool {
        self.node.object().in_subset(name)
    }
}

impl PartialEq for GoTerm<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for GoTerm<'_> {}

/// Iterates the targets of a set of [`crate::Relation`]s and yields [`GoTerm`]s
pub struct GoTerms<'a> {
    relations: hash_set::Iter<'a, crate::Relation>,
    ontology: &'a Ontology,
}

impl<'a> GoTerms<'a> {
    fn new(relations: &'a Relations, ontology: &'a Ontology) -> Self {
        GoTerms {
            relations: relations.iter(),
            ontology,
        }
    }
}

impl<'a> Iterator for GoTerms<'a> {
    type Item = GoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let ontology = self.ontology;
        // relation targets are always terms of the ontology
        self.relations
            .by_ref()
            .find_map(|relation| ontology.term(relation.target()))
    }
}
