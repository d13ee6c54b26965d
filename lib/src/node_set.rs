use oxigraph::model::Term;
use std::collections::HashSet;

/// A deduplicating collection of terms that remembers first-insertion order.
///
/// Oxigraph terms hash and compare by canonical value, so two terms with the
/// same value occupy a single slot no matter how they were produced.
#[derive(Debug, Default, Clone)]
pub struct NodeSet {
    items: Vec<Term>,
    index: HashSet<Term>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term, returning `true` if it was not already present.
    pub fn add(&mut self, term: Term) -> bool {
        if self.index.insert(term.clone()) {
            self.items.push(term);
            true
        } else {
            false
        }
    }

    pub fn add_all<I: IntoIterator<Item = Term>>(&mut self, terms: I) {
        for term in terms {
            self.add(term);
        }
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.index.contains(term)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Term> {
        self.items
    }
}

impl IntoIterator for NodeSet {
    type Item = Term;
    type IntoIter = std::vec::IntoIter<Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Term> for NodeSet {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut set = NodeSet::new();
        set.add_all(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::NamedNode;

    fn named(iri: &str) -> Term {
        NamedNode::new_unchecked(iri).into()
    }

    #[test]
    fn deduplicates_by_value() {
        let mut set = NodeSet::new();
        assert!(set.add(named("http://example.org/a")));
        assert!(!set.add(named("http://example.org/a")));
        assert!(set.add(named("http://example.org/b")));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&named("http://example.org/a")));
    }

    #[test]
    fn preserves_first_insertion_order() {
        let mut set = NodeSet::new();
        set.add(named("http://example.org/b"));
        set.add(named("http://example.org/a"));
        set.add(named("http://example.org/b"));
        let items = set.into_vec();
        assert_eq!(
            items,
            vec![named("http://example.org/b"), named("http://example.org/a")]
        );
    }
}
