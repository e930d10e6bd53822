use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, warn};

use crate::parser::{self, Milestones};
use crate::stats::{
    AnnotationClosure, EvidenceFilter, ProbabilityModel, RecordSet, TermEnrichment,
};
use crate::{
    f64_from_usize, AnnotationRecord, Annotations, Aspect, GoResult, Ontology, TermId,
};

/// Parameters of an enrichment query
///
/// The defaults use all known genes as reference, all known evidence codes,
/// the biological process aspect and all terms, not only the slim subset.
///
/// # Examples
///
/// ```
/// use goenrich::Aspect;
/// use goenrich::stats::EnrichmentOptions;
///
/// let options = EnrichmentOptions::new()
///     .reference(["COX1", "COX2", "ATP2"])
///     .evidence_codes(["IDA", "IMP"])
///     .aspect(Aspect::Process)
///     .slims_only(true);
/// assert!(options.is_slims_only());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnrichmentOptions {
    reference: Option<Vec<String>>,
    evidence: EvidenceFilter,
    aspect: Aspect,
    slims_only: bool,
}

impl EnrichmentOptions {
    /// Constructs the default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the given genes as reference instead of all known genes
    ///
    /// The names are resolved like the query genes.
    #[must_use]
    pub fn reference<I, S>(mut self, genes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference = Some(genes.into_iter().map(Into::into).collect());
        self
    }

    /// Uses only annotations with one of the given evidence codes
    #[must_use]
    pub fn evidence_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evidence = EvidenceFilter::codes(codes);
        self
    }

    /// Uses only annotations that are accepted by `filter`
    #[must_use]
    pub fn evidence(mut self, filter: EvidenceFilter) -> Self {
        self.evidence = filter;
        self
    }

    /// Uses only annotations of the given aspect
    #[must_use]
    pub fn aspect(mut self, aspect: Aspect) -> Self {
        self.aspect = aspect;
        self
    }

    /// Reports only terms of the slim subset of the ontology
    ///
    /// See [`Ontology::set_slim_subset`]
    #[must_use]
    pub fn slims_only(mut self, slims_only: bool) -> Self {
        self.slims_only = slims_only;
        self
    }

    /// Returns `true` if only slim terms are reported
    pub fn is_slims_only(&self) -> bool {
        self.slims_only
    }

    fn accepts(&self, record: &AnnotationRecord) -> bool {
        record.aspect() == self.aspect.code() && self.evidence.accepts(record.evidence())
    }
}

/// Finds the terms that are over-represented in a set of genes
///
/// The engine borrows the ontology and the annotations and keeps the
/// cached annotation closures of all terms between queries.
///
/// # Examples
///
/// ```
/// use goenrich::{Annotations, Ontology};
/// use goenrich::stats::{Binomial, Enrichment, EnrichmentOptions};
///
/// let ontology = Ontology::from_file("tests/small.obo").unwrap();
/// let annotations = Annotations::from_file("tests/small_gaf.txt").unwrap();
/// let enrichment = Enrichment::new(&ontology, &annotations);
///
/// let options = EnrichmentOptions::new().evidence_codes(["IDA", "IMP"]);
/// let terms = enrichment.enriched_terms(["MIP1"], &options, &Binomial).unwrap();
///
/// // MIP1 and all ancestors of its term
/// assert_eq!(terms.len(), 4);
/// assert_eq!(terms["GO:0000002"].genes(), ["MIP1"]);
/// ```
pub struct Enrichment<'a> {
    closure: AnnotationClosure<'a>,
}

impl<'a> Enrichment<'a> {
    /// Constructs a new `Enrichment` engine
    pub fn new(ontology: &'a Ontology, annotations: &'a Annotations) -> Self {
        Self {
            closure: AnnotationClosure::new(ontology, annotations),
        }
    }

    /// The annotation closure used by the engine
    pub fn closure(&self) -> &AnnotationClosure<'a> {
        &self.closure
    }

    /// Calculates the enrichment of every term annotated to the query genes
    ///
    /// `query` can contain gene symbols, ids or aliases. Names that are not
    /// known are ignored. The result contains every term that is directly
    /// annotated to a query gene together with all ancestors of those terms.
    /// Nothing is filtered by p-value.
    ///
    /// # Errors
    ///
    /// - [`crate::GoError::CyclicGraph`] if the ontology contains cycles
    /// - [`crate::GoError::InvalidParameters`] if the probability model
    ///   rejects the counts, e.g. if the query is larger than the reference
    pub fn enriched_terms<I, S, M>(
        &self,
        query: I,
        options: &EnrichmentOptions,
        model: &M,
    ) -> GoResult<BTreeMap<TermId, TermEnrichment>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        M: ProbabilityModel + ?Sized,
    {
        self.enriched_terms_with_progress(query, options, model, &mut parser::no_progress)
    }

    /// Calculates the enrichment and reports the progress in percent
    ///
    /// `progress` is called roughly every 1% of the tested terms. If it
    /// returns an error, the query stops and the error is returned unchanged.
    ///
    /// # Errors
    ///
    /// See [`Enrichment::enriched_terms`]; in addition every error of `progress`
    pub fn enriched_terms_with_progress<I, S, M, P>(
        &self,
        query: I,
        options: &EnrichmentOptions,
        model: &M,
        progress: &mut P,
    ) -> GoResult<BTreeMap<TermId, TermEnrichment>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        M: ProbabilityModel + ?Sized,
        P: FnMut(f64) -> GoResult<()>,
    {
        let ontology = self.closure.ontology();
        let annotations = self.closure.annotations();

        let query = annotations.resolve_names(query);
        let genes: HashSet<&str> = query.keys().map(String::as_str).collect();

        let reference: HashSet<&str> = match &options.reference {
            Some(names) => annotations
                .resolve_names(names)
                .into_keys()
                .filter_map(|name| annotations.canonical_name(&name))
                .collect(),
            None => annotations.gene_names().collect(),
        };

        let reference_records: RecordSet = reference
            .iter()
            .flat_map(|gene| annotations.gene_annotations(gene))
            .copied()
            .filter(|id| {
                annotations
                    .record(*id)
                    .is_some_and(|record| options.accepts(record))
            })
            .collect();

        let mut direct_terms: BTreeSet<&TermId> = BTreeSet::new();
        for gene in &genes {
            for id in annotations.gene_annotations(gene) {
                let Some(record) = annotations.record(*id) else {
                    continue;
                };
                if !options.accepts(record) {
                    continue;
                }
                if ontology.contains(record.term_id()) {
                    direct_terms.insert(record.term_id());
                } else {
                    warn!("{} is annotated to unknown term {}", gene, record.term_id());
                }
            }
        }

        let mut terms: BTreeSet<TermId> = ontology
            .extract_super_graph(direct_terms)?
            .into_iter()
            .collect();
        if options.slims_only {
            terms.retain(|term| ontology.slim_subset().contains(term));
        }
        debug!(
            "Testing {} terms for {} query and {} reference genes",
            terms.len(),
            genes.len(),
            reference.len()
        );

        let population = u64::try_from(reference.len())?;
        let sample_size = u64::try_from(genes.len())?;

        let mut res = BTreeMap::new();
        let milestones = Milestones::new(terms.len());
        for (idx, term) in terms.into_iter().enumerate() {
            milestones.report(idx, progress)?;

            let annotated: HashSet<&str> = self
                .closure
                .all_annotations(&term)?
                .intersection(&reference_records)
                .filter_map(|id| annotations.record(*id))
                .map(AnnotationRecord::gene_name)
                .collect();

            let mut mapped: Vec<String> = annotated
                .intersection(&genes)
                .filter_map(|gene| query.get(*gene))
                .cloned()
                .collect();
            mapped.sort_unstable();
            let reference_count = annotated.intersection(&reference).count();

            let observed = u64::try_from(mapped.len())?;
            let successes = u64::try_from(reference_count)?;
            let pvalue = model.p_value(observed, population, successes, sample_size)?;
            let enrichment =
                fold_enrichment(mapped.len(), genes.len(), reference_count, reference.len())?;

            debug!(
                "{}\tPopulation: {}, Successes: {}, Draws: {}, Observed: {}",
                term, population, successes, sample_size, observed
            );
            res.insert(
                term,
                TermEnrichment::new(mapped, pvalue, reference_count, enrichment),
            );
        }
        Ok(res)
    }
}

/// Ratio of the annotated fraction of the sample to the annotated fraction of the population
fn fold_enrichment(
    observed: usize,
    sample_size: usize,
    successes: usize,
    population: usize,
) -> GoResult<f64> {
    if sample_size == 0 || successes == 0 {
        return Ok(0.0);
    }
    Ok((f64_from_usize(observed)? / f64_from_usize(sample_size)?)
        / (f64_from_usize(successes)? / f64_from_usize(population)?))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stats::{Binomial, Hypergeometric};
    use crate::{GoError, SlimSubset};

    const OBO: &str = "subsetdef: slim \"test slim\"

[Term]
id: A
name: root
subset: slim

[Term]
id: B
name: child
is_a: A
";

    fn gaf_line(gene: &str, term: &str, evidence: &str, aspect: &str, synonyms: &str) -> String {
        format!("SGD\tID:{gene}\t{gene}\t\t{term}\tPMID:1\t{evidence}\t\t{aspect}\t{gene} protein\t{synonyms}\tgene\ttaxon:1\t20200101\tSGD\n")
    }

    fn scenario() -> (Ontology, Annotations) {
        let ontology = Ontology::from_text(OBO).unwrap();
        let gaf = [
            gaf_line("g1", "B", "IDA", "P", "alias1"),
            gaf_line("g2", "B", "IDA", "P", ""),
            gaf_line("g3", "A", "IDA", "P", ""),
        ]
        .concat();
        (ontology, Annotations::from_text(&gaf).unwrap())
    }

    #[test]
    fn scenario_counts() {
        let (ontology, annotations) = scenario();
        let enrichment = Enrichment::new(&ontology, &annotations);
        let options = EnrichmentOptions::new().reference(["g1", "g2", "g3"]);
        let terms = enrichment
            .enriched_terms(["g1", "g2"], &options, &Hypergeometric)
            .unwrap();

        assert_eq!(terms.len(), 2);
        assert_eq!(terms["B"].count(), 2);
        assert_eq!(terms["B"].reference_count(), 2);
        assert_eq!(terms["A"].count(), 2);
        assert_eq!(terms["A"].reference_count(), 3);

        // all reference genes are annotated to the root
        assert!((terms["A"].pvalue() - 1.0).abs() < 1e-9);
        // P(X >= 2) drawing 2 of 3 with 2 successes
        assert!((terms["B"].pvalue() - 1.0 / 3.0).abs() < 1e-9);
        assert!((terms["B"].fold_enrichment() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn query_keeps_original_spelling() {
        let (ontology, annotations) = scenario();
        let enrichment = Enrichment::new(&ontology, &annotations);
        let terms = enrichment
            .enriched_terms(["alias1", "ID:g2", "unknown"], &EnrichmentOptions::default(), &Binomial)
            .unwrap();
        assert_eq!(terms["B"].genes(), ["ID:g2", "alias1"]);
    }

    #[test]
    fn aliases_resolve_to_same_result() {
        let (ontology, annotations) = scenario();
        let enrichment = Enrichment::new(&ontology, &annotations);
        let options = EnrichmentOptions::default();
        let by_symbol = enrichment.enriched_terms(["g1"], &options, &Hypergeometric).unwrap();
        let by_alias = enrichment.enriched_terms(["alias1"], &options, &Hypergeometric).unwrap();

        assert_eq!(by_symbol.len(), by_alias.len());
        for (term, result) in &by_symbol {
            let other = &by_alias[term];
            assert_eq!(result.pvalue(), other.pvalue());
            assert_eq!(result.reference_count(), other.reference_count());
        }
    }

    #[test]
    fn seeds_only_from_query() {
        let (ontology, annotations) = scenario();
        let enrichment = Enrichment::new(&ontology, &annotations);
        let terms = enrichment
            .enriched_terms(["g3"], &EnrichmentOptions::default(), &Hypergeometric)
            .unwrap();
        assert_eq!(terms.len(), 1);
        assert!(terms.contains_key("A"));
    }

    #[test]
    fn empty_query() {
        let (ontology, annotations) = scenario();
        let enrichment = Enrichment::new(&ontology, &annotations);
        let terms = enrichment
            .enriched_terms(Vec::<String>::new(), &EnrichmentOptions::default(), &Hypergeometric)
            .unwrap();
        assert!(terms.is_empty());
    }

    #[test]
    fn evidence_and_aspect_filter() {
        let ontology = Ontology::from_text(OBO).unwrap();
        let gaf = [
            gaf_line("g1", "B", "IEA", "P", ""),
            gaf_line("g2", "B", "IDA", "F", ""),
            gaf_line("g3", "A", "IDA", "P", ""),
        ]
        .concat();
        let annotations = Annotations::from_text(&gaf).unwrap();
        let enrichment = Enrichment::new(&ontology, &annotations);

        let options = EnrichmentOptions::new().evidence_codes(["IDA"]);
        let terms = enrichment
            .enriched_terms(["g1", "g2", "g3"], &options, &Hypergeometric)
            .unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms["A"].genes(), ["g3"]);

        let options = EnrichmentOptions::new().aspect(Aspect::Function);
        let terms = enrichment
            .enriched_terms(["g1", "g2", "g3"], &options, &Hypergeometric)
            .unwrap();
        assert_eq!(terms["B"].genes(), ["g2"]);
        assert_eq!(terms["A"].genes(), ["g2"]);
    }

    #[test]
    fn term_without_reference_overlap_is_reported() {
        let (ontology, annotations) = scenario();
        let enrichment = Enrichment::new(&ontology, &annotations);
        let options = EnrichmentOptions::new().reference(["g3"]);
        let terms = enrichment
            .enriched_terms(["g1"], &options, &Binomial)
            .unwrap();
        assert_eq!(terms["B"].reference_count(), 0);
        assert_eq!(terms["B"].count(), 0);
        assert_eq!(terms["B"].pvalue(), 1.0);
        assert_eq!(terms["A"].reference_count(), 1);
    }

    #[test]
    fn slims_only() {
        let (mut ontology, annotations) = scenario();
        ontology.set_slim_subset(SlimSubset::Named("slim".to_string()));
        let enrichment = Enrichment::new(&ontology, &annotations);
        let options = EnrichmentOptions::new().slims_only(true);
        let terms = enrichment
            .enriched_terms(["g1"], &options, &Hypergeometric)
            .unwrap();
        assert_eq!(terms.len(), 1);
        assert!(terms.contains_key("A"));
    }

    #[test]
    fn progress_is_reported() {
        let (ontology, annotations) = scenario();
        let enrichment = Enrichment::new(&ontology, &annotations);
        let mut calls = Vec::new();
        enrichment
            .enriched_terms_with_progress(
                ["g1"],
                &EnrichmentOptions::default(),
                &Hypergeometric,
                &mut |pct| {
                    calls.push(pct);
                    Ok(())
                },
            )
            .unwrap();
        assert_eq!(calls, [0.0, 50.0]);

        let res = enrichment.enriched_terms_with_progress(
            ["g1"],
            &EnrichmentOptions::default(),
            &Hypergeometric,
            &mut |_| Err(GoError::Cancelled),
        );
        assert!(matches!(res, Err(GoError::Cancelled)));
    }

    #[test]
    fn reference_genes_are_resolved_once() {
        let ontology = Ontology::from_text(OBO).unwrap();
        // `AAC1` is the symbol of the first gene and a synonym of the second
        let gaf = [
            gaf_line("AAC1", "B", "IDA", "P", ""),
            gaf_line("PET9", "A", "IDA", "P", "AAC1"),
        ]
        .concat();
        let annotations = Annotations::from_text(&gaf).unwrap();
        let enrichment = Enrichment::new(&ontology, &annotations);

        let options = EnrichmentOptions::new().reference(["ID:AAC1", "ID:PET9"]);
        let terms = enrichment
            .enriched_terms(["ID:AAC1"], &options, &Binomial)
            .unwrap();
        assert_eq!(terms["B"].genes(), ["ID:AAC1"]);
        assert_eq!(terms["B"].reference_count(), 1);
        assert_eq!(terms["A"].genes(), ["ID:AAC1"]);
        assert_eq!(terms["A"].reference_count(), 2);
    }

    #[test]
    fn multiple_records_of_a_gene_count_once() {
        let ontology = Ontology::from_text(OBO).unwrap();
        let gaf = [
            gaf_line("g1", "B", "IDA", "P", ""),
            gaf_line("g1", "B", "IMP", "P", ""),
            gaf_line("g1", "A", "IDA", "P", ""),
            gaf_line("g2", "B", "IDA", "P", ""),
            gaf_line("g3", "A", "IDA", "P", ""),
        ]
        .concat();
        let annotations = Annotations::from_text(&gaf).unwrap();
        let enrichment = Enrichment::new(&ontology, &annotations);

        let terms = enrichment
            .enriched_terms(["g1"], &EnrichmentOptions::default(), &Hypergeometric)
            .unwrap();
        assert_eq!(terms["B"].count(), 1);
        assert_eq!(terms["B"].reference_count(), 2);
        assert_eq!(terms["A"].count(), 1);
        assert_eq!(terms["A"].reference_count(), 3);
        // P(X >= 1) drawing 1 of 3 with 2 successes
        assert!((terms["B"].pvalue() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn query_larger_than_reference() {
        let (ontology, annotations) = scenario();
        let enrichment = Enrichment::new(&ontology, &annotations);
        let options = EnrichmentOptions::new().reference(["g1"]);
        let res = enrichment.enriched_terms(["g1", "g2", "g3"], &options, &Hypergeometric);
        assert!(matches!(res, Err(GoError::InvalidParameters(_))));
    }
}
