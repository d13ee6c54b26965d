use oxigraph::model::{Term, TermRef};

/// A compiled SHACL property path.
///
/// Built once per distinct `sh:path` description and shared across
/// evaluations; see [`crate::path::compile_path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Path {
    /// A single predicate hop.
    Predicate(Term),
    /// An ordered chain of paths (`rdf:List` of path elements).
    Sequence(Vec<Path>),
    /// A union of paths (`sh:alternativePath`).
    Alternative(Vec<Path>),
    /// Reflexive-transitive closure (`sh:zeroOrMorePath`).
    ZeroOrMore(Box<Path>),
    /// Transitive closure (`sh:oneOrMorePath`).
    OneOrMore(Box<Path>),
    /// Optional hop (`sh:zeroOrOnePath`).
    ZeroOrOne(Box<Path>),
    /// Subject/object roles swapped (`sh:inversePath`).
    Inverse(Box<Path>),
}

/// The lexical value of a term, as used for parameter keys.
pub(crate) fn term_value(term: &Term) -> &str {
    match term.as_ref() {
        TermRef::NamedNode(node) => node.as_str(),
        TermRef::BlankNode(node) => node.as_str(),
        TermRef::Literal(literal) => literal.value(),
    }
}

/// The fragment or final path segment of a term's value.
///
/// Parameter values on a [`crate::shape::Constraint`] are keyed by the local
/// name of the parameter path, e.g. `minCount` for `sh:minCount`.
pub(crate) fn local_name(term: &Term) -> String {
    let value = term_value(term);
    match value.rsplit(['#', '/']).next() {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => value.to_owned(),
    }
}

/// True when the term is a literal with the lexical value `"true"`.
///
/// `sh:optional` and `sh:deactivated` are checked by string equality; the
/// graph loader canonicalizes `"0"`/`"1"` boolean literals first.
pub(crate) fn is_true(term: &Term) -> bool {
    matches!(term.as_ref(), TermRef::Literal(literal) if literal.value() == "true")
}
