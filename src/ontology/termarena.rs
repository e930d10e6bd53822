use crate::term::internal::TermNode;
use crate::{TermId, DEFAULT_NUM_TERMS};
use std::collections::hash_map::Values;
use std::collections::HashMap;

pub(crate) struct Arena {
    terms: HashMap<TermId, TermNode>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Inserts the term and returns the previous term with the same id
    pub fn insert(&mut self, term: TermNode) -> Option<TermNode> {
        self.terms.insert(term.id().clone(), term)
    }

    pub fn get(&self, id: &str) -> Option<&TermNode> {
        self.terms.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut TermNode> {
        self.terms.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.terms.contains_key(id)
    }

    pub fn values(&self) -> Values<'_, TermId, TermNode> {
        self.terms.values()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            terms: HashMap::with_capacity(DEFAULT_NUM_TERMS),
        }
    }
}
