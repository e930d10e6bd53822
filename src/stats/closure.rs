use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::trace;

use crate::stats::EvidenceFilter;
use crate::{Annotations, GoError, GoResult, Ontology, RecordId, TermId};

/// A set of annotation records
pub type RecordSet = HashSet<RecordId>;

/// Collects the annotations of terms including those of all their descendants
///
/// The closure of every term is computed once and cached. The closure of a
/// parent is the union of its own annotations and the cached closures of its
/// children. The cache lives as long as the `AnnotationClosure`; build a new
/// one for a different [`Annotations`] store.
///
/// # Examples
///
/// ```
/// use goenrich::{Annotations, Ontology};
/// use goenrich::stats::{AnnotationClosure, EvidenceFilter};
///
/// let ontology = Ontology::from_file("tests/small.obo").unwrap();
/// let annotations = Annotations::from_file("tests/small_gaf.txt").unwrap();
/// let closure = AnnotationClosure::new(&ontology, &annotations);
///
/// // COX1 and COX2 are annotated to a descendant of GO:0006091
/// let records = closure.all_annotations("GO:0006091").unwrap();
/// assert_eq!(records.len(), 3);
///
/// let genes = closure.all_genes("GO:0006091", &EvidenceFilter::Known).unwrap();
/// assert_eq!(genes, ["ATP2", "COX1", "COX2"]);
/// ```
pub struct AnnotationClosure<'a> {
    ontology: &'a Ontology,
    annotations: &'a Annotations,
    cache: RefCell<HashMap<TermId, Rc<RecordSet>>>,
}

impl<'a> AnnotationClosure<'a> {
    /// Constructs a new `AnnotationClosure` with an empty cache
    pub fn new(ontology: &'a Ontology, annotations: &'a Annotations) -> Self {
        Self {
            ontology,
            annotations,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// The ontology used to find descendants
    pub fn ontology(&self) -> &'a Ontology {
        self.ontology
    }

    /// The annotation store
    pub fn annotations(&self) -> &'a Annotations {
        self.annotations
    }

    /// Returns the records annotated to the term or any of its descendants
    ///
    /// # Errors
    ///
    /// - [`GoError::UnknownTerm`] if the term is not part of the ontology
    /// - [`GoError::CyclicGraph`] if the term is its own descendant
    pub fn all_annotations<I: AsRef<str>>(&self, term_id: I) -> GoResult<Rc<RecordSet>> {
        let mut visiting = HashSet::new();
        self.collect(term_id.as_ref(), &mut visiting)
    }

    /// Returns the sorted names of all genes annotated to the term or any of
    /// its descendants, using only annotations accepted by `evidence`
    ///
    /// # Errors
    ///
    /// See [`AnnotationClosure::all_annotations`]
    pub fn all_genes<I: AsRef<str>>(
        &self,
        term_id: I,
        evidence: &EvidenceFilter,
    ) -> GoResult<Vec<String>> {
        let records = self.all_annotations(term_id)?;
        let mut genes: Vec<String> = records
            .iter()
            .filter_map(|id| self.annotations.record(*id))
            .filter(|record| evidence.accepts(record.evidence()))
            .map(|record| record.gene_name().to_string())
            .collect::<HashSet<String>>()
            .into_iter()
            .collect();
        genes.sort_unstable();
        Ok(genes)
    }

    /// Returns the number of cached terms
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    fn collect(&self, term_id: &str, visiting: &mut HashSet<TermId>) -> GoResult<Rc<RecordSet>> {
        if let Some(records) = self.cache.borrow().get(term_id) {
            return Ok(Rc::clone(records));
        }

        let term = self
            .ontology
            .term(term_id)
            .ok_or_else(|| GoError::UnknownTerm(term_id.into()))?;
        if !visiting.insert(term.id().clone()) {
            return Err(GoError::CyclicGraph(term.id().clone()));
        }

        let mut records: RecordSet = self
            .annotations
            .term_annotations(term_id)
            .iter()
            .copied()
            .collect();
        for child in term.related_to() {
            let child_records = self.collect(child.target().as_str(), visiting)?;
            records.extend(child_records.iter().copied());
        }
        visiting.remove(term.id());

        trace!("{} has {} annotations", term.id(), records.len());
        let records = Rc::new(records);
        self.cache
            .borrow_mut()
            .insert(term.id().clone(), Rc::clone(&records));
        Ok(records)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const OBO: &str = "[Term]
id: A
name: root

[Term]
id: B
is_a: A

[Term]
id: C
is_a: A

[Term]
id: D
is_a: B
relationship: part_of C
";

    fn gaf_line(gene: &str, term: &str, evidence: &str) -> String {
        format!("SGD\tS:{gene}\t{gene}\t\t{term}\tPMID:1\t{evidence}\t\tP\tname\t\tgene\ttaxon:1\t20200101\tSGD\n")
    }

    fn annotations() -> Annotations {
        let gaf: String = [
            gaf_line("g1", "B", "IDA"),
            gaf_line("g2", "B", "IEA"),
            gaf_line("g3", "A", "IDA"),
            gaf_line("g4", "D", "IMP"),
            gaf_line("g4", "D", "IMP"),
            gaf_line("g5", "C", "XYZ"),
        ]
        .concat();
        Annotations::from_text(&gaf).unwrap()
    }

    #[test]
    fn direct_and_inherited() {
        let ontology = Ontology::from_text(OBO).unwrap();
        let annotations = annotations();
        let closure = AnnotationClosure::new(&ontology, &annotations);

        assert_eq!(closure.all_annotations("D").unwrap().len(), 2);
        assert_eq!(closure.all_annotations("B").unwrap().len(), 4);
        assert_eq!(closure.all_annotations("C").unwrap().len(), 3);
        assert_eq!(closure.all_annotations("A").unwrap().len(), 6);
    }

    #[test]
    fn children_are_subsets_of_parents() {
        let ontology = Ontology::from_text(OBO).unwrap();
        let annotations = annotations();
        let closure = AnnotationClosure::new(&ontology, &annotations);

        for term in &ontology {
            let parent = closure.all_annotations(term.id()).unwrap();
            for child in term.children() {
                let child = closure.all_annotations(child.id()).unwrap();
                assert!(child.is_subset(&parent));
            }
        }
    }

    #[test]
    fn cache_is_filled() {
        let ontology = Ontology::from_text(OBO).unwrap();
        let annotations = annotations();
        let closure = AnnotationClosure::new(&ontology, &annotations);
        assert_eq!(closure.cached(), 0);

        let first = closure.all_annotations("A").unwrap();
        assert_eq!(closure.cached(), 4);
        let second = closure.all_annotations("A").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn genes_by_evidence() {
        let ontology = Ontology::from_text(OBO).unwrap();
        let annotations = annotations();
        let closure = AnnotationClosure::new(&ontology, &annotations);

        let genes = closure.all_genes("A", &EvidenceFilter::Known).unwrap();
        assert_eq!(genes, ["g1", "g2", "g3", "g4"]);

        let genes = closure
            .all_genes("A", &EvidenceFilter::codes(["IDA", "XYZ"]))
            .unwrap();
        assert_eq!(genes, ["g1", "g3", "g5"]);
    }

    #[test]
    fn unknown_term() {
        let ontology = Ontology::from_text(OBO).unwrap();
        let annotations = annotations();
        let closure = AnnotationClosure::new(&ontology, &annotations);
        assert!(matches!(
            closure.all_annotations("Z"),
            Err(GoError::UnknownTerm(_))
        ));
    }

    #[test]
    fn cycle_fails_without_caching() {
        let ontology = Ontology::from_text(
            "[Term]\nid: A\nis_a: C\n\n[Term]\nid: B\nis_a: A\n\n[Term]\nid: C\nis_a: B\n",
        )
        .unwrap();
        let annotations = annotations();
        let closure = AnnotationClosure::new(&ontology, &annotations);
        assert!(matches!(
            closure.all_annotations("A"),
            Err(GoError::CyclicGraph(_))
        ));
        assert_eq!(closure.cached(), 0);
    }
}
