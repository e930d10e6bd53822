use std::fmt::Display;

use crate::parser::stanza::{Stanza, StanzaKind, TagValue};
use crate::term::{Relation, Relations, TermId, IS_A};
use crate::{GoError, GoResult};

/// A term, typedef or instance as defined by one stanza
///
/// The relations of the object are derived from its own `is_a` and
/// `relationship` tags when it is constructed and never change afterwards.
///
/// # Examples
///
/// ```
/// use goenrich::OboObject;
/// use goenrich::parser::stanza::Stanza;
///
/// let stanza = Stanza::parse("[Term]
/// id: GO:0000002
/// name: mitochondrial genome maintenance
/// namespace: biological_process
/// is_a: GO:0007005 ! mitochondrion organization
/// relationship: part_of GO:0000001
/// subset: goslim_yeast
/// ").unwrap();
///
/// let term = OboObject::try_from_stanza(stanza).unwrap();
/// assert_eq!(term.id(), "GO:0000002");
/// assert_eq!(term.name(), Some("mitochondrial genome maintenance"));
/// assert_eq!(term.namespace(), Some("biological_process"));
/// assert_eq!(term.related().len(), 2);
/// assert!(term.in_subset("goslim_yeast"));
/// ```
#[derive(Debug, Clone)]
pub struct OboObject {
    id: TermId,
    stanza: Stanza,
    related: Relations,
}

impl OboObject {
    /// Builds the object from a parsed stanza
    ///
    /// # Errors
    ///
    /// [`GoError::MalformedStanza`] if the stanza has no `id` or a
    /// `relationship` value is not of the form `<type> <target>`
    pub fn try_from_stanza(stanza: Stanza) -> GoResult<Self> {
        let id = match stanza.first("id") {
            Some(id) if !id.is_empty() => TermId::from(id),
            _ => {
                return Err(GoError::MalformedStanza(format!(
                    "{} without id: {}",
                    stanza.kind(),
                    stanza.lines().first().map(ToString::to_string).unwrap_or_default()
                )))
            }
        };

        let mut related = Relations::new();
        for parent in stanza.values(IS_A) {
            related.insert(Relation::new(IS_A, parent.as_str()));
        }
        for value in stanza.values("relationship") {
            let mut parts = value.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(kind), Some(target)) => {
                    related.insert(Relation::new(kind, target));
                }
                _ => {
                    return Err(GoError::MalformedStanza(format!(
                        "{id}: invalid relationship `{value}`"
                    )))
                }
            }
        }

        Ok(Self {
            id,
            stanza,
            related,
        })
    }

    /// The kind of the object
    pub fn kind(&self) -> StanzaKind {
        self.stanza.kind()
    }

    /// The unique id
    pub fn id(&self) -> &TermId {
        &self.id
    }

    /// The value of the `name` tag
    pub fn name(&self) -> Option<&str> {
        self.stanza.first("name")
    }

    /// The value of the `namespace` tag, e.g. `biological_process`
    pub fn namespace(&self) -> Option<&str> {
        self.stanza.first("namespace")
    }

    /// The value of the `def` tag
    pub fn def(&self) -> Option<&str> {
        self.stanza.first("def")
    }

    /// Returns `true` if the object is marked as obsolete
    pub fn is_obsolete(&self) -> bool {
        self.stanza.first("is_obsolete") == Some("true")
    }

    /// The subsets (slims) the object belongs to
    pub fn subsets(&self) -> &[String] {
        self.stanza.values("subset")
    }

    /// Returns `true` if the object belongs to the subset `name`
    pub fn in_subset(&self, name: &str) -> bool {
        self.subsets().iter().any(|subset| subset == name)
    }

    /// Alternative ids of the object
    pub fn alt_ids(&self) -> &[String] {
        self.stanza.values("alt_id")
    }

    /// Returns the value(s) of any tag
    pub fn tag(&self, tag: &str) -> Option<&TagValue> {
        self.stanza.tag(tag)
    }

    /// The parsed stanza
    pub fn stanza(&self) -> &Stanza {
        &self.stanza
    }

    /// Relations to the parents of the object
    pub fn related(&self) -> &Relations {
        &self.related
    }
}

impl Display for OboObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stanza)
    }
}

impl PartialEq for OboObject {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.id == other.id
    }
}

impl Eq for OboObject {}
