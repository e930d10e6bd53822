//! Over-representation analysis of GO terms in a set of genes
//!
//! The [`Enrichment`] engine tests every term that annotates at least one gene
//! of a query set, including all ancestors of those terms. For each term it
//! counts the query genes and the reference genes that are annotated to the
//! term or any of its descendants and calculates the probability to see that
//! many query genes by chance, using a [`ProbabilityModel`].
//!
//! Descendant annotations are collected by the [`AnnotationClosure`], which
//! caches the result of every term.
//!
//! # Examples
//!
//! ```
//! use goenrich::{Annotations, Ontology};
//! use goenrich::stats::{Enrichment, EnrichmentOptions, Hypergeometric};
//!
//! let ontology = Ontology::from_file("tests/small.obo").unwrap();
//! let annotations = Annotations::from_file("tests/small_gaf.txt").unwrap();
//!
//! let enrichment = Enrichment::new(&ontology, &annotations);
//! let terms = enrichment
//!     .enriched_terms(["COX1", "OXI1"], &EnrichmentOptions::default(), &Hypergeometric)
//!     .unwrap();
//!
//! let transport = &terms["GO:0022900"];
//! // genes are reported as they were provided
//! assert_eq!(transport.genes(), ["COX1", "OXI1"]);
//! assert_eq!(transport.reference_count(), 2);
//!
//! for (term, result) in &terms {
//!     println!("{}\t{}\t{:.4}", term, result.count(), result.pvalue());
//! }
//! ```

use std::collections::HashSet;

use crate::annotations::evidence_description;

mod closure;
mod enrichment;
mod probability;

pub use closure::{AnnotationClosure, RecordSet};
pub use enrichment::{Enrichment, EnrichmentOptions};
pub use probability::{Binomial, Hypergeometric, ProbabilityModel};

/// The result of the enrichment test of one term
///
/// [`TermEnrichment`] is returned from [`Enrichment::enriched_terms`].
#[derive(Debug, Clone, PartialEq)]
pub struct TermEnrichment {
    genes: Vec<String>,
    pvalue: f64,
    reference_count: usize,
    enrichment: f64,
}

impl TermEnrichment {
    /// Constructs a new `TermEnrichment`
    pub fn new(genes: Vec<String>, pvalue: f64, reference_count: usize, enrichment: f64) -> Self {
        Self {
            genes,
            pvalue,
            reference_count,
            enrichment,
        }
    }

    /// The query genes annotated to the term, sorted, in the spelling of the query
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    /// Returns the number of query genes annotated to the term
    pub fn count(&self) -> usize {
        self.genes.len()
    }

    /// Returns the p-value of the enrichment
    ///
    /// The p-value indicates the probability that the enrichment
    /// occured by chance
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// Returns the number of reference genes annotated to the term
    pub fn reference_count(&self) -> usize {
        self.reference_count
    }

    /// Returns the fold enrichment over the reference
    ///
    /// `0.0` if no reference gene is annotated to the term
    pub fn fold_enrichment(&self) -> f64 {
        self.enrichment
    }
}

/// Selects annotations by their evidence code
///
/// # Examples
///
/// ```
/// use goenrich::stats::EvidenceFilter;
///
/// assert!(EvidenceFilter::Known.accepts("IDA"));
/// assert!(!EvidenceFilter::Known.accepts("XYZ"));
///
/// let experimental = EvidenceFilter::codes(["EXP", "IDA", "IPI", "IMP", "IGI", "IEP"]);
/// assert!(experimental.accepts("IMP"));
/// assert!(!experimental.accepts("IEA"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EvidenceFilter {
    /// Every code listed in [`crate::annotations::EVIDENCE_CODES`]
    #[default]
    Known,
    /// Only the given codes
    Codes(HashSet<String>),
}

impl EvidenceFilter {
    /// Accepts only the given codes
    pub fn codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EvidenceFilter::Codes(codes.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if annotations with the evidence `code` are used
    pub fn accepts(&self, code: &str) -> bool {
        match self {
            EvidenceFilter::Known => evidence_description(code).is_some(),
            EvidenceFilter::Codes(codes) => codes.contains(code),
        }
    }
}
