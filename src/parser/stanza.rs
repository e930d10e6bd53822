//! Tokenizes a single OBO stanza into tagged lines
//!
//! A stanza starts with a `[Term]`, `[Typedef]` or `[Instance]` header
//! followed by lines of the form
//!
//! ```text
//! tag: value {modifiers} ! comment
//! ```
use std::collections::HashMap;
use std::fmt::Display;

use smallvec::SmallVec;

use crate::{GoError, GoResult};

/// Tags that can occur multiple times in a stanza
///
/// All values of these tags are collected in order. Every other tag
/// keeps only the value of the last line it appeared on.
pub const MULTI_VALUED_TAGS: &[&str] = &[
    "alt_id",
    "broad_synonym",
    "consider",
    "disjoint_from",
    "exact_synonym",
    "intersection_of",
    "is_a",
    "narrow_synonym",
    "property_value",
    "related_synonym",
    "relationship",
    "replaced_by",
    "subset",
    "synonym",
    "union_of",
    "xref",
    "xref_analog",
    "xref_unk",
];

/// Returns `true` if values of the tag accumulate instead of overwriting each other
pub fn is_multi_valued(tag: &str) -> bool {
    MULTI_VALUED_TAGS.contains(&tag)
}

/// The kind of object a stanza describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StanzaKind {
    /// `[Term]`
    Term,
    /// `[Typedef]`, a relation type
    Typedef,
    /// `[Instance]`
    Instance,
}

impl StanzaKind {
    /// Parses a stanza header line such as `[Term]`
    ///
    /// Returns `None` for unknown or malformed headers
    pub fn from_header(line: &str) -> Option<Self> {
        match line.trim() {
            "[Term]" => Some(StanzaKind::Term),
            "[Typedef]" => Some(StanzaKind::Typedef),
            "[Instance]" => Some(StanzaKind::Instance),
            _ => None,
        }
    }

    /// The header line of the stanza kind
    pub fn header(&self) -> &'static str {
        match self {
            StanzaKind::Term => "[Term]",
            StanzaKind::Typedef => "[Typedef]",
            StanzaKind::Instance => "[Instance]",
        }
    }
}

impl Display for StanzaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// A single `tag: value {modifiers} ! comment` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLine {
    tag: String,
    value: String,
    modifiers: Option<String>,
    comment: Option<String>,
}

impl TagLine {
    /// Parses a line of a stanza
    ///
    /// Returns `None` if the line does not contain a `:`
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::parser::stanza::TagLine;
    ///
    /// let line = TagLine::parse("is_a: GO:0008150 {source=\"GOC\"} ! biological_process").unwrap();
    /// assert_eq!(line.tag(), "is_a");
    /// assert_eq!(line.value(), "GO:0008150");
    /// assert_eq!(line.modifiers(), Some("source=\"GOC\""));
    /// assert_eq!(line.comment(), Some("biological_process"));
    ///
    /// assert!(TagLine::parse("[Term]").is_none());
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let (tag, rest) = line.split_once(':')?;

        let (rest, comment) = match rest.split_once('!') {
            Some((rest, comment)) => (rest, Some(comment.trim().to_string())),
            None => (rest, None),
        };

        let (value, modifiers) = match rest.split_once('{') {
            Some((value, modifiers)) => {
                let modifiers = match modifiers.find('}') {
                    Some(end) => &modifiers[..end],
                    None => modifiers,
                };
                (value, Some(modifiers.trim().to_string()))
            }
            None => (rest, None),
        };

        Some(TagLine {
            tag: tag.trim().to_string(),
            value: value.trim().to_string(),
            modifiers,
            comment,
        })
    }

    /// The tag name, e.g. `is_a`
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The value, without modifiers and comment
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The content of the `{...}` modifier block, if present
    pub fn modifiers(&self) -> Option<&str> {
        self.modifiers.as_deref()
    }

    /// The trailing comment after `!`, if present
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

impl Display for TagLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.tag, self.value)?;
        if let Some(modifiers) = &self.modifiers {
            write!(f, " {{{modifiers}}}")?;
        }
        if let Some(comment) = &self.comment {
            write!(f, " ! {comment}")?;
        }
        Ok(())
    }
}

/// The value(s) of a tag inside a stanza
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// Value of a single-valued tag (last occurrence wins)
    Single(String),
    /// All values of a multi-valued tag, in order of appearance
    Multiple(SmallVec<[String; 2]>),
}

impl TagValue {
    /// Returns the value of a single-valued tag or the first value of a multi-valued tag
    pub fn first(&self) -> Option<&str> {
        match self {
            TagValue::Single(value) => Some(value),
            TagValue::Multiple(values) => values.first().map(String::as_str),
        }
    }

    /// Returns all values as a slice
    pub fn as_slice(&self) -> &[String] {
        match self {
            TagValue::Single(value) => std::slice::from_ref(value),
            TagValue::Multiple(values) => values,
        }
    }

    /// Returns `true` if any of the values equals `value`
    pub fn contains(&self, value: &str) -> bool {
        self.as_slice().iter().any(|v| v == value)
    }
}

/// A parsed stanza
///
/// Holds the original lines for lossless reconstruction and
/// a tag map for lookups.
#[derive(Debug, Clone)]
pub struct Stanza {
    kind: StanzaKind,
    lines: Vec<TagLine>,
    values: HashMap<String, TagValue>,
}

impl Stanza {
    /// Parses a stanza block
    ///
    /// # Errors
    ///
    /// [`GoError::InvalidInput`] if the block does not start with a known header
    ///
    /// # Examples
    ///
    /// ```
    /// use goenrich::parser::stanza::{Stanza, StanzaKind};
    ///
    /// let block = "[Term]\nid: GO:0000002\nname: foo\nname: bar\nis_a: GO:0000001\nis_a: GO:0000003\n";
    /// let stanza = Stanza::parse(block).unwrap();
    ///
    /// assert_eq!(stanza.kind(), StanzaKind::Term);
    /// assert_eq!(stanza.first("name"), Some("bar"));
    /// assert_eq!(stanza.values("is_a"), ["GO:0000001", "GO:0000003"]);
    /// assert_eq!(stanza.lines().len(), 5);
    /// ```
    pub fn parse(block: &str) -> GoResult<Self> {
        let mut lines = block.lines().skip_while(|line| line.trim().is_empty());
        let header = lines.next().unwrap_or_default();
        let kind = StanzaKind::from_header(header)
            .ok_or_else(|| GoError::InvalidInput(format!("unknown stanza header: {header}")))?;

        let mut stanza = Stanza::new(kind);
        for line in lines.filter_map(TagLine::parse) {
            stanza.push(line);
        }
        Ok(stanza)
    }

    /// Constructs an empty stanza
    pub fn new(kind: StanzaKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
            values: HashMap::new(),
        }
    }

    fn push(&mut self, line: TagLine) {
        let value = line.value().to_string();
        if is_multi_valued(line.tag()) {
            match self.values.get_mut(line.tag()) {
                Some(TagValue::Multiple(values)) => values.push(value),
                _ => {
                    let mut values = SmallVec::new();
                    values.push(value);
                    self.values
                        .insert(line.tag().to_string(), TagValue::Multiple(values));
                }
            }
        } else {
            self.values
                .insert(line.tag().to_string(), TagValue::Single(value));
        }
        self.lines.push(line);
    }

    /// The kind of the stanza
    pub fn kind(&self) -> StanzaKind {
        self.kind
    }

    /// All parsed lines, in original order
    pub fn lines(&self) -> &[TagLine] {
        &self.lines
    }

    /// Returns the value(s) of `tag`, if present
    pub fn tag(&self, tag: &str) -> Option<&TagValue> {
        self.values.get(tag)
    }

    /// Returns the (first) value of `tag`, if present
    pub fn first(&self, tag: &str) -> Option<&str> {
        self.values.get(tag).and_then(TagValue::first)
    }

    /// Returns all values of `tag`
    ///
    /// The slice is empty if the tag is not present
    pub fn values(&self, tag: &str) -> &[String] {
        self.values
            .get(tag)
            .map(TagValue::as_slice)
            .unwrap_or_default()
    }

    /// Returns `true` if no tag line could be parsed
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Display for Stanza {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.kind)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
