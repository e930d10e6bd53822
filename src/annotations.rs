//! GO annotations link genes (or other items) to terms of the ontology
//!
//! The [`Annotations`] store holds every [`AnnotationRecord`] of an
//! annotation file and indexes them by gene name and by term.
//! It refers to the ontology only through [`TermId`]s, so it can be
//! loaded independently of the [`crate::Ontology`].
//!
//! Every gene can be referenced by several names: its symbol, the
//! database object id and any synonyms. [`Annotations::resolve_names`]
//! maps all of them back to the canonical gene name.

use core::fmt::Debug;
use std::collections::HashMap;
use std::fmt::Display;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::config::DataDirectory;
use crate::parser::{self, no_progress};
use crate::{GoError, GoResult, TermId, DEFAULT_NUM_GENES};

mod evidence;
mod record;
pub use evidence::{evidence_description, Aspect, EVIDENCE_CODES};
pub use record::{AnnotationField, AnnotationRecord};

/// Identifies a single [`AnnotationRecord`] within the [`Annotations`]
///
/// Two records with identical content are still different annotations
/// and have different ids.
#[derive(Clone, Copy, Default, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct RecordId {
    inner: u32,
}

impl RecordId {
    /// Return the integer representation of the record ID
    pub fn as_u32(&self) -> u32 {
        self.inner
    }

    fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl From<u32> for RecordId {
    fn from(inner: u32) -> Self {
        RecordId { inner }
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Record:{}", self.inner)
    }
}

/// Holds all annotations of an annotation file
///
/// # Examples
///
/// ```
/// use goenrich::Annotations;
///
/// let gaf = "!gaf-version: 1.0
/// SGD\tS1\tAAC1\t\tGO:0006810\tPMID:1\tIDA\t\tP\tcarrier\tYMR056C\tgene\ttaxon:4932\t20070101\tSGD
/// SGD\tS1\tAAC1\t\tGO:0005743\tPMID:1\tIDA\t\tC\tcarrier\tYMR056C\tgene\ttaxon:4932\t20070101\tSGD
/// ";
/// let annotations: Annotations = gaf.parse().unwrap();
///
/// assert_eq!(annotations.len(), 2);
/// assert_eq!(annotations.gene_annotations("AAC1").len(), 2);
/// assert_eq!(annotations.term_annotations("GO:0005743").len(), 1);
/// assert_eq!(annotations.resolve("YMR056C"), Some("AAC1"));
/// ```
#[derive(Default)]
pub struct Annotations {
    records: Vec<AnnotationRecord>,
    header: String,
    gene_annotations: HashMap<String, Vec<RecordId>>,
    term_annotations: HashMap<TermId, Vec<RecordId>>,
    alias_mapper: HashMap<String, String>,
    additional_aliases: HashMap<String, String>,
    synonyms: HashMap<String, usize>,
    synonym_groups: Vec<Vec<String>>,
}

impl Debug for Annotations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Annotations with {} records of {} genes",
            self.records.len(),
            self.gene_annotations.len()
        )
    }
}

/// Loading the annotations
impl Annotations {
    /// Parses the annotations from the text of a gene association file
    ///
    /// # Errors
    ///
    /// - [`GoError::TryFromIntError`] if the file has more than `u32::MAX` records
    pub fn from_text(text: &str) -> GoResult<Self> {
        Self::from_text_with_progress(text, &mut no_progress)
    }

    /// Parses the annotations and reports progress
    ///
    /// `progress` is called with the percentage of processed lines roughly
    /// every 1%. Returning an error from `progress` stops the parsing and
    /// the error is returned unchanged.
    ///
    /// # Errors
    ///
    /// - Any error returned by `progress`
    /// - [`GoError::TryFromIntError`] if the file has more than `u32::MAX` records
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::{Annotations, GoError};
    ///
    /// let gaf = "SGD\tS1\tAAC1\t\tGO:0006810\tPMID:1\tIDA\t\tP\tcarrier\t\tgene\ttaxon:4932\t20070101\tSGD\n";
    ///
    /// let res = Annotations::from_text_with_progress(gaf, &mut |_| Err(GoError::Cancelled));
    /// assert!(matches!(res, Err(GoError::Cancelled)));
    /// ```
    pub fn from_text_with_progress<P>(text: &str, progress: &mut P) -> GoResult<Self>
    where
        P: FnMut(f64) -> GoResult<()>,
    {
        let mut annotations = Annotations::with_capacity(DEFAULT_NUM_GENES);
        parser::gene_association::parse(text, &mut annotations, progress)?;
        Ok(annotations)
    }

    /// Parses the annotations from any reader
    ///
    /// # Errors
    ///
    /// - [`GoError::SourceUnavailable`] if the reader fails
    /// - see [`Annotations::from_text`]
    pub fn from_reader<R: Read>(reader: R) -> GoResult<Self> {
        Self::from_text(&parser::read_source(reader)?)
    }

    /// Parses the annotations from a file
    ///
    /// # Errors
    ///
    /// - [`GoError::SourceUnavailable`] if the file cannot be read
    /// - see [`Annotations::from_text`]
    pub fn from_file<P: AsRef<Path>>(path: P) -> GoResult<Self> {
        Self::from_text(&parser::read_file(path)?)
    }

    /// Loads the annotations of `organism` from the data directory
    ///
    /// # Errors
    ///
    /// See [`Annotations::from_file`]
    pub fn from_data_dir(config: &DataDirectory, organism: &str) -> GoResult<Self> {
        Self::from_file(config.annotation_path(organism))
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            gene_annotations: HashMap::with_capacity(capacity),
            alias_mapper: HashMap::with_capacity(capacity),
            ..Default::default()
        }
    }

    pub(crate) fn push_header_line(&mut self, line: &str) {
        self.header.push_str(line);
        self.header.push('\n');
    }

    /// Adds a record to the store and returns its [`RecordId`]
    ///
    /// Records without gene name or term id are not added and `None` is returned.
    ///
    /// The first record of a gene defines the aliases of the gene.
    /// Aliases of later records of the same gene are ignored.
    ///
    /// # Errors
    ///
    /// [`GoError::TryFromIntError`] if the store already holds `u32::MAX` records
    pub fn add_record(&mut self, record: AnnotationRecord) -> GoResult<Option<RecordId>> {
        if record.gene_name().is_empty() || record.term_id().as_str().is_empty() {
            return Ok(None);
        }
        let id = RecordId::from(u32::try_from(self.records.len())?);
        let gene = record.gene_name().to_string();

        if !self.gene_annotations.contains_key(&gene) {
            self.register_aliases(&record);
        }
        self.gene_annotations.entry(gene).or_default().push(id);
        self.term_annotations
            .entry(record.term_id().clone())
            .or_default()
            .push(id);
        self.records.push(record);
        Ok(Some(id))
    }

    fn register_aliases(&mut self, record: &AnnotationRecord) {
        let gene = record.gene_name();
        for alias in record.aliases() {
            self.alias_mapper.insert(alias.clone(), gene.to_string());
        }
        for alias in record.additional_aliases() {
            self.additional_aliases
                .insert(alias.clone(), gene.to_string());
        }
        self.alias_mapper.insert(gene.to_string(), gene.to_string());
        self.alias_mapper
            .insert(record.object_id().to_string(), gene.to_string());

        let mut names = vec![record.object_id().to_string(), gene.to_string()];
        names.extend(record.aliases().iter().cloned());
        let group = self.synonym_groups.len();
        for name in &names {
            self.synonyms.insert(name.clone(), group);
        }
        self.synonym_groups.push(names);
    }
}

/// Lookups
impl Annotations {
    /// Returns the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of distinct genes
    pub fn gene_count(&self) -> usize {
        self.gene_annotations.len()
    }

    /// The comment lines (starting with `!`) of the source
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Returns the record with the given id
    pub fn record(&self, id: RecordId) -> Option<&AnnotationRecord> {
        self.records.get(id.as_usize())
    }

    /// Iterates all records together with their [`RecordId`]
    pub fn records(&self) -> impl Iterator<Item = (RecordId, &AnnotationRecord)> {
        self.records
            .iter()
            .zip(0u32..)
            .map(|(record, idx)| (RecordId::from(idx), record))
    }

    /// Iterates the canonical names of all genes
    pub fn gene_names(&self) -> impl Iterator<Item = &str> {
        self.gene_annotations.keys().map(String::as_str)
    }

    /// Returns `true` if `name` is the canonical name of an annotated gene
    pub fn contains_gene(&self, name: &str) -> bool {
        self.gene_annotations.contains_key(name)
    }

    /// Returns the stored canonical name if `name` is the canonical name of a gene
    ///
    /// Unlike [`Annotations::resolve`], aliases are not considered, so a
    /// canonical name that is also another gene's synonym maps to itself.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.gene_annotations
            .get_key_value(name)
            .map(|(gene, _)| gene.as_str())
    }

    /// Returns the ids of all records of the gene
    ///
    /// `name` must be the canonical name, use [`Annotations::resolve`] for aliases.
    pub fn gene_annotations(&self, name: &str) -> &[RecordId] {
        self.gene_annotations
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the ids of all records directly annotated to the term
    pub fn term_annotations(&self, term_id: &str) -> &[RecordId] {
        self.term_annotations
            .get(term_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the canonical gene name for any known name, id or alias
    ///
    /// Aliases from the object name are only used if no other name matches.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.alias_mapper
            .get(name)
            .or_else(|| self.additional_aliases.get(name))
            .map(String::as_str)
    }

    /// Maps the provided names to the canonical gene names
    ///
    /// The returned map has the canonical names as keys and the provided
    /// spelling as value. Names that cannot be resolved are left out.
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::Annotations;
    ///
    /// let gaf = "SGD\tS1\tAAC1\t\tGO:0006810\tPMID:1\tIDA\t\tP\tcarrier\tYMR056C\tgene\ttaxon:4932\t20070101\tSGD\n";
    /// let annotations = Annotations::from_text(gaf).unwrap();
    ///
    /// let names = annotations.resolve_names(["YMR056C", "FOOBAR"]);
    /// assert_eq!(names.len(), 1);
    /// assert_eq!(names["AAC1"], "YMR056C");
    /// ```
    pub fn resolve_names<I, S>(&self, items: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items
            .into_iter()
            .filter_map(|item| {
                let item = item.as_ref();
                self.resolve(item)
                    .map(|gene| (gene.to_string(), item.to_string()))
            })
            .collect()
    }

    /// Returns all names of the gene: object id, symbol and synonyms
    ///
    /// `name` can be any of these names.
    pub fn synonyms(&self, name: &str) -> Option<&[String]> {
        self.synonyms
            .get(name)
            .and_then(|group| self.synonym_groups.get(*group))
            .map(Vec::as_slice)
    }
}

impl FromStr for Annotations {
    type Err = GoError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}
