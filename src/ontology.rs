use core::fmt::Debug;
use std::cell::RefCell;
use std::collections::hash_map::{self, HashMap};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::config::DataDirectory;
use crate::parser;
use crate::parser::obo::{self, OboDocument};
use crate::parser::stanza::{Stanza, StanzaKind};
use crate::parser::Milestones;
use crate::term::internal::TermNode;
use crate::term::{GoTerm, OboObject, Relations};
use crate::{GoError, GoResult, TermId};

mod termarena;
use termarena::Arena;

/// Restricts enrichment results to a subset of terms
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use goenrich::{Ontology, SlimSubset, TermId};
///
/// let mut ontology = Ontology::from_text("subsetdef: goslim_test \"Test slim\"
///
/// [Term]
/// id: GO:1
/// subset: goslim_test
///
/// [Term]
/// id: GO:2
/// is_a: GO:1
/// ").unwrap();
///
/// ontology.set_slim_subset(SlimSubset::Named("goslim_test".to_string()));
/// assert!(ontology.slim_subset().contains("GO:1"));
/// assert_eq!(ontology.slim_subset().len(), 1);
///
/// let ids: HashSet<TermId> = [TermId::from("GO:2")].into_iter().collect();
/// ontology.set_slim_subset(SlimSubset::Terms(ids));
/// assert!(ontology.slim_subset().contains("GO:2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlimSubset {
    /// All terms whose `subset` tag contains the name
    Named(String),
    /// An explicit set of terms
    Terms(HashSet<TermId>),
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `Ontology` is the vocabulary graph and holds all terms, typedefs and instances
///
/// The [`Ontology`] is built from the text of an OBO file. Every term knows
/// its direct parents (`related`), derived from its `is_a` and `relationship`
/// tags, and its direct children (`related_to`), which are collected once all
/// terms are loaded. After loading, the graph does not change; only the slim
/// subset can be updated.
///
/// # Examples
///
/// ```
/// use goenrich::Ontology;
///
/// let ontology = Ontology::from_text("format-version: 1.2
/// subsetdef: goslim_generic \"Generic GO slim\"
///
/// [Term]
/// id: GO:0008150
/// name: biological_process
/// namespace: biological_process
/// subset: goslim_generic
///
/// [Term]
/// id: GO:0009987
/// name: cellular process
/// namespace: biological_process
/// is_a: GO:0008150 ! biological_process
///
/// [Term]
/// id: GO:0007005
/// name: mitochondrion organization
/// namespace: biological_process
/// is_a: GO:0009987 ! cellular process
///
/// [Typedef]
/// id: part_of
/// name: part of
/// ").unwrap();
///
/// assert_eq!(ontology.len(), 3);
/// assert_eq!(ontology.defined_subsets(), ["goslim_generic"]);
///
/// let term = ontology.term("GO:0007005").unwrap();
/// assert_eq!(term.name(), Some("mitochondrion organization"));
/// assert_eq!(ontology.term_depth("GO:0007005").unwrap(), 3);
///
/// let ancestors = ontology.extract_super_graph(["GO:0007005"]).unwrap();
/// assert_eq!(ancestors.len(), 3);
///
/// assert!(ontology.typedef("part_of").is_some());
/// // built-in relation types are always present
/// assert!(ontology.typedef("is_a").is_some());
///
/// for term in &ontology {
///     println!("{}", term.id());
/// }
/// ```
///
/// # Layout
///
/// Terms are connected to each other by typed, directed relations. Every
/// relation points from a term to its parent. Genes are not part of the
/// ontology, they are kept in [`crate::Annotations`] and refer to terms by id.
///
/// ```mermaid
/// erDiagram
///     ONTOLOGY ||--|{ TERM : contains
///     ONTOLOGY ||--|{ TYPEDEF : contains
///     ONTOLOGY ||--o{ INSTANCE : contains
///     TERM ||--o{ TERM : related
///     TERM }o--|| TYPEDEF : relation_type
///     TERM }o--o{ ANNOTATION : annotated_by
///     TERM {
///         TermId id
///         Stanza stanza
///         Relations related
///         Relations related_to
///     }
///     ANNOTATION {
///         str gene_name
///         TermId term_id
///         str evidence
///         Aspect aspect
///     }
/// ```
#[derive(Default)]
pub struct Ontology {
    terms: Arena,
    typedefs: HashMap<TermId, OboObject>,
    instances: HashMap<TermId, OboObject>,
    header: String,
    slim_subset: HashSet<TermId>,
    depth_cache: RefCell<HashMap<TermId, usize>>,
}

impl Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ontology with {} terms, {} typedefs and {} instances",
            self.terms.len(),
            self.typedefs.len(),
            self.instances.len()
        )
    }
}

/// Loading the Ontology
impl Ontology {
    /// Builds the Ontology from the text of an OBO file
    ///
    /// # Errors
    ///
    /// - A stanza without `id`: [`GoError::MalformedStanza`]
    /// - A relation to an unknown term: [`GoError::DanglingReference`]
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::{GoError, Ontology};
    ///
    /// let ontology = Ontology::from_text("[Term]\nid: GO:1\n").unwrap();
    /// assert_eq!(ontology.len(), 1);
    ///
    /// let res = Ontology::from_text("[Term]\nid: GO:2\nis_a: GO:1\n");
    /// assert!(matches!(res, Err(GoError::DanglingReference{..})));
    /// ```
    pub fn from_text(text: &str) -> GoResult<Self> {
        Self::from_text_with_progress(text, &mut parser::no_progress)
    }

    /// Builds the Ontology and reports the progress in percent
    ///
    /// `progress` is called roughly every 1% of the stanzas. If it returns an
    /// error, loading stops and the error is returned unchanged.
    ///
    /// # Errors
    ///
    /// See [`Ontology::from_text`]; in addition every error of `progress`
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::{GoError, Ontology};
    ///
    /// let text = "[Term]\nid: GO:1\n\n[Term]\nid: GO:2\nis_a: GO:1\n";
    ///
    /// let mut updates = Vec::new();
    /// Ontology::from_text_with_progress(text, &mut |pct| {
    ///     updates.push(pct);
    ///     Ok(())
    /// }).unwrap();
    /// assert_eq!(updates, [0.0, 50.0]);
    ///
    /// let res = Ontology::from_text_with_progress(text, &mut |_| Err(GoError::Cancelled));
    /// assert!(matches!(res, Err(GoError::Cancelled)));
    /// ```
    pub fn from_text_with_progress<P>(text: &str, progress: &mut P) -> GoResult<Self>
    where
        P: FnMut(f64) -> GoResult<()>,
    {
        let doc = OboDocument::split(text);
        let mut ont = Ontology {
            header: doc.header,
            ..Default::default()
        };

        for stanza in obo::builtin_typedefs()? {
            ont.insert_object(OboObject::try_from_stanza(stanza)?);
        }

        let milestones = Milestones::new(doc.blocks.len());
        for (idx, block) in doc.blocks.iter().enumerate() {
            milestones.report(idx, progress)?;
            let object = OboObject::try_from_stanza(Stanza::parse(block)?)?;
            let kind = object.kind();
            if let Some(previous) = ont.insert_object(object) {
                match kind {
                    StanzaKind::Typedef => debug!("Replacing typedef {}", previous.id()),
                    _ => warn!("Duplicate {} {}, keeping the last one", kind, previous.id()),
                }
            }
        }

        ont.link_terms()?;
        debug!(
            "Loaded ontology with {} terms, {} typedefs and {} instances",
            ont.terms.len(),
            ont.typedefs.len(),
            ont.instances.len()
        );
        Ok(ont)
    }

    /// Builds the Ontology from any reader that provides OBO text
    ///
    /// # Errors
    ///
    /// - The reader fails: [`GoError::SourceUnavailable`]
    /// - See [`Ontology::from_text`]
    pub fn from_reader<R: Read>(reader: R) -> GoResult<Self> {
        Self::from_text(&parser::read_source(reader)?)
    }

    /// Builds the Ontology from an OBO file
    ///
    /// # Errors
    ///
    /// - The file cannot be read: [`GoError::SourceUnavailable`]
    /// - See [`Ontology::from_text`]
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::Ontology;
    ///
    /// let ontology = Ontology::from_file("tests/small.obo").unwrap();
    /// assert!(ontology.term("GO:0008150").is_some());
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> GoResult<Self> {
        Self::from_text(&parser::read_file(path)?)
    }

    /// Builds the Ontology from the ontology file inside the data folder
    ///
    /// # Errors
    ///
    /// See [`Ontology::from_file`]
    pub fn from_data_dir(config: &DataDirectory) -> GoResult<Self> {
        Self::from_file(config.ontology_path())
    }
}

/// Public API of the Ontology
///
/// Those methods are all safe to use
impl Ontology {
    /// Returns the number of terms in the Ontology
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the Ontology does not contain any terms
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::Ontology;
    /// let ontology = Ontology::default();
    /// assert!(ontology.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The header of the OBO file, everything before the first stanza
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Returns the [`GoTerm`] of the provided id
    ///
    /// If no such term is present in the Ontology, `None` is returned
    pub fn term<I: AsRef<str>>(&self, term_id: I) -> Option<GoTerm> {
        self.terms
            .get(term_id.as_ref())
            .map(|node| GoTerm::new(self, node))
    }

    /// Returns `true` if the Ontology contains the term
    pub fn contains<I: AsRef<str>>(&self, term_id: I) -> bool {
        self.terms.contains(term_id.as_ref())
    }

    /// Returns an Iterator of all [`GoTerm`]s of the Ontology
    pub fn terms(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Returns the relation type (typedef) with the provided id
    pub fn typedef<I: AsRef<str>>(&self, id: I) -> Option<&OboObject> {
        self.typedefs.get(id.as_ref())
    }

    /// Returns an Iterator of all relation types, including the built-in ones
    pub fn typedefs(&self) -> hash_map::Values<'_, TermId, OboObject> {
        self.typedefs.values()
    }

    /// Returns the instance with the provided id
    pub fn instance<I: AsRef<str>>(&self, id: I) -> Option<&OboObject> {
        self.instances.get(id.as_ref())
    }

    /// Returns an Iterator of all instances
    pub fn instances(&self) -> hash_map::Values<'_, TermId, OboObject> {
        self.instances.values()
    }

    /// Returns the provided terms and all their direct and indirect parents
    ///
    /// Parents are followed via every relation type.
    ///
    /// # Errors
    ///
    /// [`GoError::UnknownTerm`] if one of `ids` is not a term of the Ontology
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::Ontology;
    ///
    /// let ontology = Ontology::from_file("tests/small.obo").unwrap();
    /// let ids = ontology.extract_super_graph(["GO:0007005"]).unwrap();
    /// assert!(ids.contains("GO:0007005"));
    /// assert!(ids.contains("GO:0008150"));
    /// ```
    pub fn extract_super_graph<I, T>(&self, ids: I) -> GoResult<HashSet<TermId>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.reachable(ids, TermNode::related)
    }

    /// Returns the provided terms and all their direct and indirect children
    ///
    /// # Errors
    ///
    /// [`GoError::UnknownTerm`] if one of `ids` is not a term of the Ontology
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::Ontology;
    ///
    /// let ontology = Ontology::from_file("tests/small.obo").unwrap();
    /// let ids = ontology.extract_sub_graph(["GO:0008150"]).unwrap();
    /// assert_eq!(ids.len(), ontology.len() - 2);
    /// ```
    pub fn extract_sub_graph<I, T>(&self, ids: I) -> GoResult<HashSet<TermId>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.reachable(ids, TermNode::related_to)
    }

    /// Returns the depth of a term
    ///
    /// Root terms have a depth of `1`, every other term is one level
    /// below its shallowest parent. Depths are cached inside the Ontology.
    ///
    /// # Errors
    ///
    /// - [`GoError::UnknownTerm`] if the term is not part of the Ontology
    /// - [`GoError::CyclicGraph`] if the term has itself as ancestor
    pub fn term_depth<I: AsRef<str>>(&self, term_id: I) -> GoResult<usize> {
        let mut visiting = HashSet::new();
        self.depth(term_id.as_ref(), &mut visiting)
    }

    /// Returns the names of the subsets defined in the header
    pub fn defined_subsets(&self) -> Vec<String> {
        obo::subset_definitions(&self.header)
    }

    /// Sets the slim subset used by [`crate::stats::EnrichmentOptions::slims_only`]
    ///
    /// A named subset is resolved to all terms whose `subset` tag contains
    /// the name. Explicit term sets are used as they are.
    pub fn set_slim_subset(&mut self, subset: SlimSubset) {
        self.slim_subset = match subset {
            SlimSubset::Named(name) => self
                .terms
                .values()
                .filter(|node| node.object().in_subset(&name))
                .map(|node| node.id().clone())
                .collect(),
            SlimSubset::Terms(ids) => ids,
        };
        debug!("Slim subset with {} terms", self.slim_subset.len());
    }

    /// The current slim subset, empty by default
    pub fn slim_subset(&self) -> &HashSet<TermId> {
        &self.slim_subset
    }
}

/// Crate-only functions for building and traversing the Ontology
impl Ontology {
    /// Adds the object to the matching map and returns the object it replaced
    fn insert_object(&mut self, object: OboObject) -> Option<OboObject> {
        match object.kind() {
            StanzaKind::Term => self
                .terms
                .insert(TermNode::new(object))
                .map(|node| node.object().clone()),
            StanzaKind::Typedef => self.typedefs.insert(object.id().clone(), object),
            StanzaKind::Instance => self.instances.insert(object.id().clone(), object),
        }
    }

    /// Adds the reverse relations to all parent terms
    fn link_terms(&mut self) -> GoResult<()> {
        let mut children = Vec::new();
        for node in self.terms.values() {
            for relation in node.related() {
                if !self.terms.contains(relation.target().as_str()) {
                    return Err(GoError::DanglingReference {
                        term: node.id().clone(),
                        target: relation.target().clone(),
                    });
                }
                children.push((relation.target().clone(), relation.reversed(node.id())));
            }
        }
        for (parent, relation) in children {
            if let Some(node) = self.terms.get_mut(parent.as_str()) {
                node.add_child(relation);
            }
        }
        Ok(())
    }

    fn reachable<'a, I, T, F>(&'a self, ids: I, edges: F) -> GoResult<HashSet<TermId>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
        F: Fn(&'a TermNode) -> &'a Relations,
    {
        let mut visited = HashSet::new();
        let mut queue: Vec<&TermNode> = Vec::new();
        for id in ids {
            let node = self
                .terms
                .get(id.as_ref())
                .ok_or_else(|| GoError::UnknownTerm(id.as_ref().into()))?;
            if visited.insert(node.id().clone()) {
                queue.push(node);
            }
        }

        while let Some(node) = queue.pop() {
            for relation in edges(node) {
                if visited.contains(relation.target()) {
                    continue;
                }
                let next = self
                    .terms
                    .get(relation.target().as_str())
                    .ok_or_else(|| GoError::UnknownTerm(relation.target().clone()))?;
                visited.insert(next.id().clone());
                queue.push(next);
            }
        }
        Ok(visited)
    }

    fn depth(&self, term_id: &str, visiting: &mut HashSet<TermId>) -> GoResult<usize> {
        if let Some(depth) = self.depth_cache.borrow().get(term_id) {
            return Ok(*depth);
        }

        let node = self
            .terms
            .get(term_id)
            .ok_or_else(|| GoError::UnknownTerm(term_id.into()))?;
        if !visiting.insert(node.id().clone()) {
            return Err(GoError::CyclicGraph(node.id().clone()));
        }

        let mut shallowest: Option<usize> = None;
        for relation in node.related() {
            let depth = self.depth(relation.target().as_str(), visiting)?;
            shallowest = Some(shallowest.map_or(depth, |d| d.min(depth)));
        }
        visiting.remove(node.id());

        let depth = shallowest.map_or(1, |d| d + 1);
        self.depth_cache
            .borrow_mut()
            .insert(node.id().clone(), depth);
        Ok(depth)
    }
}

impl FromStr for Ontology {
    type Err = GoError;

    fn from_str(s: &str) -> GoResult<Self> {
        Self::from_text(s)
    }
}

/// Iterates the Ontology and yields [`GoTerm`]s
pub struct Iter<'a> {
    inner: hash_map::Values<'a, TermId, TermNode>,
    ontology: &'a Ontology,
}

impl<'a> std::iter::Iterator for Iter<'a> {
    type Item = GoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|node| GoTerm::new(self.ontology, node))
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = GoTerm<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.terms.values(),
            ontology: self,
        }
    }
}
