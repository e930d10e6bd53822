use std::fmt::Display;

use crate::{GoError, GoResult};

/// The known GO evidence codes and their description
///
/// Enrichment analyses use all of them unless restricted by the caller.
/// Annotations with a code not listed here are only considered when
/// the code is requested explicitly.
pub const EVIDENCE_CODES: &[(&str, &str)] = &[
    ("EXP", "Inferred from Experiment"),
    ("IDA", "Inferred from Direct Assay"),
    ("IPI", "Inferred from Physical Interaction"),
    ("IMP", "Inferred from Mutant Phenotype"),
    ("IGI", "Inferred from Genetic Interaction"),
    ("IEP", "Inferred from Expression Pattern"),
    ("HTP", "Inferred from High Throughput Experiment"),
    ("HDA", "Inferred from High Throughput Direct Assay"),
    ("HMP", "Inferred from High Throughput Mutant Phenotype"),
    ("HGI", "Inferred from High Throughput Genetic Interaction"),
    ("HEP", "Inferred from High Throughput Expression Pattern"),
    ("ISS", "Inferred from Sequence or Structural Similarity"),
    ("ISO", "Inferred from Sequence Orthology"),
    ("ISA", "Inferred from Sequence Alignment"),
    ("ISM", "Inferred from Sequence Model"),
    ("IGC", "Inferred from Genomic Context"),
    ("IBA", "Inferred from Biological aspect of Ancestor"),
    ("IBD", "Inferred from Biological aspect of Descendant"),
    ("IKR", "Inferred from Key Residues"),
    ("IRD", "Inferred from Rapid Divergence"),
    ("RCA", "Inferred from Reviewed Computational Analysis"),
    ("TAS", "Traceable Author Statement"),
    ("NAS", "Non-traceable Author Statement"),
    ("IC", "Inferred by Curator"),
    ("ND", "No biological Data available"),
    ("IEA", "Inferred from Electronic Annotation"),
    ("NR", "Not Recorded"),
];

/// Returns the description of a known evidence code
///
/// # Examples
///
/// ```
/// use goenrich::annotations::evidence_description;
///
/// assert_eq!(evidence_description("IDA"), Some("Inferred from Direct Assay"));
/// assert!(evidence_description("XYZ").is_none());
/// ```
pub fn evidence_description(code: &str) -> Option<&'static str> {
    EVIDENCE_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, description)| *description)
}

/// The three GO sub-ontologies, as used in the `Aspect` column
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    /// Biological process, `P`
    #[default]
    Process,
    /// Molecular function, `F`
    Function,
    /// Cellular component, `C`
    Component,
}

impl Aspect {
    /// The single letter code of the aspect
    pub fn code(&self) -> &'static str {
        match self {
            Aspect::Process => "P",
            Aspect::Function => "F",
            Aspect::Component => "C",
        }
    }

    /// The namespace of terms belonging to the aspect
    pub fn namespace(&self) -> &'static str {
        match self {
            Aspect::Process => "biological_process",
            Aspect::Function => "molecular_function",
            Aspect::Component => "cellular_component",
        }
    }
}

impl TryFrom<&str> for Aspect {
    type Error = GoError;
    fn try_from(value: &str) -> GoResult<Self> {
        match value {
            "P" | "biological_process" => Ok(Aspect::Process),
            "F" | "molecular_function" => Ok(Aspect::Function),
            "C" | "cellular_component" => Ok(Aspect::Component),
            _ => Err(GoError::InvalidInput(format!("unknown aspect: {value}"))),
        }
    }
}

impl Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
