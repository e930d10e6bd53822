//! Parsing of OBO ontologies and GO annotation files
//!
//! The parsers operate on the complete text of a source. Use
//! [`read_source`] or the `from_reader` / `from_file` constructors of
//! [`crate::Ontology`] and [`crate::Annotations`] to obtain it.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{f64_from_usize, GoError, GoResult};

pub(crate) mod gene_association;
pub(crate) mod obo;
pub mod stanza;

/// Reads the complete content of `reader` into a `String`
///
/// # Errors
///
/// [`GoError::SourceUnavailable`] if the reader fails or the data is not valid UTF-8
pub fn read_source<R: Read>(mut reader: R) -> GoResult<String> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|err| GoError::SourceUnavailable(err.to_string()))?;
    Ok(text)
}

/// Reads the complete content of the file at `path`
///
/// # Errors
///
/// [`GoError::SourceUnavailable`] if the file cannot be opened or read
pub fn read_file<P: AsRef<Path>>(path: P) -> GoResult<String> {
    let filename = path.as_ref().display().to_string();
    let file = File::open(path)
        .map_err(|err| GoError::SourceUnavailable(format!("{filename}: {err}")))?;
    read_source(file)
}

/// Reports progress of a loop over `total` items roughly every 1%
pub(crate) struct Milestones {
    step: usize,
    total: usize,
}

impl Milestones {
    pub fn new(total: usize) -> Self {
        Self {
            step: std::cmp::max(total / 100, 1),
            total,
        }
    }

    /// Invokes `progress` with the percentage if item `idx` is a milestone
    ///
    /// Errors returned by the callback are passed through unchanged
    pub fn report<P>(&self, idx: usize, progress: &mut P) -> GoResult<()>
    where
        P: FnMut(f64) -> GoResult<()>,
    {
        if idx % self.step == 0 {
            progress(100.0 * f64_from_usize(idx)? / f64_from_usize(self.total)?)?;
        }
        Ok(())
    }
}

/// Progress callback that ignores all updates
pub(crate) fn no_progress(_: f64) -> GoResult<()> {
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn milestones_every_percent() {
        let milestones = Milestones::new(1000);
        let mut reported = Vec::new();
        for idx in 0..1000 {
            milestones
                .report(idx, &mut |pct| {
                    reported.push(pct);
                    Ok(())
                })
                .unwrap();
        }
        assert_eq!(reported.len(), 100);
        assert!(reported[0].abs() < f64::EPSILON);
        assert!((reported[99] - 99.0).abs() < f64::EPSILON);
    }

    #[test]
    fn milestones_few_items() {
        let milestones = Milestones::new(3);
        let mut count = 0;
        for idx in 0..3 {
            milestones
                .report(idx, &mut |_| {
                    count += 1;
                    Ok(())
                })
                .unwrap();
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn milestone_error_is_propagated() {
        let milestones = Milestones::new(10);
        let res = milestones.report(0, &mut |_| Err(GoError::Cancelled));
        assert!(matches!(res, Err(GoError::Cancelled)));
    }

    #[test]
    fn missing_file() {
        let res = read_file("/this/path/does/not/exist.obo");
        assert!(matches!(res, Err(GoError::SourceUnavailable(_))));
    }
}
