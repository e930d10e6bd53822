//! Splits an OBO document into its header and stanza blocks
use tracing::trace;

use crate::parser::stanza::{Stanza, StanzaKind};
use crate::GoResult;

/// Relation types that every ontology knows about
///
/// They are added before the typedefs of the file, so that the
/// file can override them.
pub(crate) const BUILTIN_TYPEDEFS: &[&str] = &[
    "[Typedef]
id: is_a
name: is_a
range: OBO:TERM_OR_TYPE
domain: OBO:TERM_OR_TYPE
def: The basic subclassing relationship [OBO:defs]",
    "[Typedef]
id: disjoint_from
name: disjoint_from
range: OBO:TERM
domain: OBO:TERM
def: Indicates that two classes are disjoint [OBO:defs]",
    "[Typedef]
id: instance_of
name: instance_of
range: OBO:TERM
domain: OBO:INSTANCE
def: Indicates the type of an instance [OBO:defs]",
    "[Typedef]
id: inverse_of
name: inverse_of
range: OBO:TYPE
domain: OBO:TYPE
def: Indicates that one relationship type is the inverse of another [OBO:defs]",
    "[Typedef]
id: union_of
name: union_of
range: OBO:TERM
domain: OBO:TERM
def: Indicates that a term is the union of several others [OBO:defs]",
    "[Typedef]
id: intersection_of
name: intersection_of
range: OBO:TERM
domain: OBO:TERM
def: Indicates that a term is the intersection of several others [OBO:defs]",
];

/// An OBO document, split into header and raw stanza blocks
#[derive(Debug, Default)]
pub(crate) struct OboDocument {
    pub header: String,
    pub blocks: Vec<String>,
}

impl OboDocument {
    /// Splits the text of an OBO file
    ///
    /// Lines starting with `!` are removed first. Everything before the
    /// first stanza header is the document header. Stanzas are separated
    /// by blank lines; blocks with an unknown header are dropped.
    pub fn split(text: &str) -> Self {
        let mut doc = OboDocument::default();
        let mut current: Option<String> = None;
        let mut in_header = true;

        for line in text.lines().filter(|line| !line.starts_with('!')) {
            if line.trim().is_empty() {
                if let Some(block) = current.take() {
                    doc.push_block(block);
                } else if in_header {
                    doc.header.push('\n');
                }
                continue;
            }

            if line.starts_with('[') {
                if let Some(block) = current.take() {
                    doc.push_block(block);
                }
                in_header = false;
                current = Some(String::new());
            }

            match current.as_mut() {
                Some(block) => {
                    block.push_str(line);
                    block.push('\n');
                }
                None if in_header => {
                    doc.header.push_str(line);
                    doc.header.push('\n');
                }
                // stray lines between stanzas
                None => trace!("Ignoring line: {}", line),
            }
        }
        if let Some(block) = current.take() {
            doc.push_block(block);
        }
        doc
    }

    fn push_block(&mut self, block: String) {
        let header = block.lines().next().unwrap_or_default();
        if StanzaKind::from_header(header).is_some() {
            self.blocks.push(block);
        } else {
            trace!("Ignoring: {}", header);
        }
    }
}

/// Returns the parsed built-in typedef stanzas
pub(crate) fn builtin_typedefs() -> GoResult<Vec<Stanza>> {
    BUILTIN_TYPEDEFS.iter().map(|block| Stanza::parse(block)).collect()
}

/// Returns the names of all subsets defined in the header
///
/// ```text
/// subsetdef: goslim_generic "Generic GO slim"
/// ```
pub(crate) fn subset_definitions(header: &str) -> Vec<String> {
    header
        .lines()
        .filter(|line| line.starts_with("subsetdef:"))
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(String::from)
        .collect()
}
