use crate::term::{OboObject, Relation, Relations, TermId};

/// A term inside the ontology
///
/// In addition to the parsed object it holds the reverse relations,
/// which are only known once all terms are loaded.
#[derive(Debug)]
pub(crate) struct TermNode {
    object: OboObject,
    related_to: Relations,
}

impl TermNode {
    pub fn new(object: OboObject) -> Self {
        TermNode {
            object,
            related_to: Relations::new(),
        }
    }

    pub fn id(&self) -> &TermId {
        self.object.id()
    }

    pub fn object(&self) -> &OboObject {
        &self.object
    }

    pub fn related(&self) -> &Relations {
        self.object.related()
    }

    pub fn related_to(&self) -> &Relations {
        &self.related_to
    }

    pub fn add_child(&mut self, relation: Relation) -> bool {
        self.related_to.insert(relation)
    }
}
