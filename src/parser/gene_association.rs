//! Parses GO annotation files (gene association format)
//!
//! ```text
//! !gaf-version: 1.0
//! SGD	S000007287	15S_RRNA		GO:0005763	SGD_REF:S000073642	ISS		C	Ribosomal RNA of the small mitochondrial ribosomal subunit	15S_rRNA|15S_RRNA_2	gene	taxon:4932	20040202	SGD
//! ```
use tracing::{debug, trace};

use crate::annotations::{AnnotationRecord, Annotations};
use crate::parser::Milestones;
use crate::GoResult;

/// Parses all lines of `text` and adds them to `annotations`
///
/// Blank lines are dropped, lines starting with `!` are added to the header.
/// Records without a symbol or a term id are skipped.
///
/// # Errors
///
/// Any error returned by `progress` is passed through and stops the parsing
pub(crate) fn parse<P>(text: &str, annotations: &mut Annotations, progress: &mut P) -> GoResult<()>
where
    P: FnMut(f64) -> GoResult<()>,
{
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    let milestones = Milestones::new(lines.len());

    for (idx, line) in lines.into_iter().enumerate() {
        if line.starts_with('!') {
            annotations.push_header_line(line);
            continue;
        }

        if annotations.add_record(AnnotationRecord::parse(line))?.is_none() {
            trace!("Skipping line without symbol or term: {}", line);
        }

        milestones.report(idx, progress)?;
    }

    debug!(
        "Parsed {} annotations for {} genes",
        annotations.len(),
        annotations.gene_count()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::no_progress;
    use crate::GoError;

    const GAF: &str = "!gaf-version: 1.0
!Date: 2008-01-01

SGD\tS1\tAAC1\t\tGO:0006810\tPMID:1\tIDA\t\tP\tADP/ATP carrier\tYMR056C\tgene\ttaxon:4932\t20070101\tSGD
SGD\tS2\t\t\tGO:0006810\tPMID:1\tIDA\t\tP\tno symbol\t\tgene\ttaxon:4932\t20070101\tSGD
SGD\tS3\tAAC3\t\t\tPMID:1\tIDA\t\tP\tno term\t\tgene\ttaxon:4932\t20070101\tSGD
";

    #[test]
    fn header_and_records() {
        let mut annotations = Annotations::default();
        parse(GAF, &mut annotations, &mut no_progress).unwrap();
        assert_eq!(annotations.header(), "!gaf-version: 1.0\n!Date: 2008-01-01\n");
        assert_eq!(annotations.len(), 1);
        assert!(annotations.contains_gene("AAC1"));
        assert!(!annotations.contains_gene("AAC3"));
    }

    #[test]
    fn progress_reported() {
        let mut annotations = Annotations::default();
        let mut calls = Vec::new();
        parse(GAF, &mut annotations, &mut |pct| {
            calls.push(pct);
            Ok(())
        })
        .unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|pct| (0.0..=100.0).contains(pct)));
    }

    #[test]
    fn cancel_parsing() {
        let mut annotations = Annotations::default();
        let res = parse(GAF, &mut annotations, &mut |_| Err(GoError::Cancelled));
        assert!(matches!(res, Err(GoError::Cancelled)));
    }
}
