#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
use core::fmt::Debug;
use std::num::TryFromIntError;
use thiserror::Error;

pub mod annotations;
pub mod config;
pub mod ontology;
pub mod parser;
pub mod stats;
pub mod term;

pub use annotations::{AnnotationRecord, Annotations, Aspect, RecordId};
pub use config::DataDirectory;
pub use ontology::{Ontology, SlimSubset};
pub use term::{GoTerm, OboObject, Relation, TermId};

const DEFAULT_NUM_TERMS: usize = 50_000;
const DEFAULT_NUM_GENES: usize = 10_000;

/// Error type of all fallible operations of this crate
#[derive(Error, Debug)]
pub enum GoError {
    /// A stanza could not be turned into a term, e.g. because it has no `id`
    #[error("malformed stanza: {0}")]
    MalformedStanza(String),
    /// A relation points to a term that is not part of the vocabulary
    #[error("term {term} references unknown term {target}")]
    DanglingReference {
        /// The term that holds the relation
        term: TermId,
        /// The missing target of the relation
        target: TermId,
    },
    /// The source text could not be obtained
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    /// A traversal revisited a term that is still being processed
    #[error("cyclic relation detected at {0}")]
    CyclicGraph(TermId),
    /// The term is not part of the vocabulary
    #[error("term {0} does not exist")]
    UnknownTerm(TermId),
    /// The input data has an invalid format
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A probability model received parameters it cannot evaluate
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    /// A progress callback requested to stop the current operation
    #[error("operation cancelled")]
    Cancelled,
    /// Failed to convert an integer to or from a smaller type
    #[error("cannot convert int to smaller type")]
    TryFromIntError(#[from] TryFromIntError),
}

/// Shortcut for `Result<T, GoError>`
pub type GoResult<T> = Result<T, GoError>;

/// Converts a count into `f64` without silently losing precision
///
/// # Errors
///
/// [`GoError::TryFromIntError`] if `n` does not fit into `u32`
pub(crate) fn f64_from_usize(n: usize) -> GoResult<f64> {
    let intermediate: u32 = n.try_into()?;
    Ok(intermediate.into())
}

/// Converts a count into `f64` without silently losing precision
///
/// # Errors
///
/// [`GoError::TryFromIntError`] if `n` does not fit into `u32`
pub(crate) fn f64_from_u64(n: u64) -> GoResult<f64> {
    let intermediate: u32 = n.try_into()?;
    Ok(intermediate.into())
}
