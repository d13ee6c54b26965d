use crate::error::ShaclError;
use log::debug;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::vocab::{rdf, xsd};
use oxigraph::model::{
    GraphName, Literal, NamedNodeRef, NamedOrBlankNodeRef, Quad, Term, TermRef,
};
use oxigraph::store::Store;
use std::collections::HashSet;
use std::fmt;
use std::io::Read;

/// Borrows a term as a quad subject, where the term kind allows it.
pub(crate) trait ToSubjectRef {
    fn to_subject_ref(&self) -> Option<NamedOrBlankNodeRef<'_>>;
}

impl ToSubjectRef for Term {
    fn to_subject_ref(&self) -> Option<NamedOrBlankNodeRef<'_>> {
        match self.as_ref() {
            TermRef::NamedNode(node) => Some(node.into()),
            TermRef::BlankNode(node) => Some(node.into()),
            _ => None,
        }
    }
}

fn to_predicate_ref(term: &Term) -> Option<NamedNodeRef<'_>> {
    match term.as_ref() {
        TermRef::NamedNode(node) => Some(node),
        _ => None,
    }
}

/// Converted pattern positions for a `quads_for_pattern` call.
///
/// `Impossible` means a bound position holds a term kind that can never occupy
/// that position (e.g. a literal subject), so the pattern matches nothing.
enum PatternRefs<'a> {
    Impossible,
    Bound(
        Option<NamedOrBlankNodeRef<'a>>,
        Option<NamedNodeRef<'a>>,
        Option<TermRef<'a>>,
    ),
}

fn pattern_refs<'a>(
    subject: Option<&'a Term>,
    predicate: Option<&'a Term>,
    object: Option<&'a Term>,
) -> PatternRefs<'a> {
    let subject_ref = match subject {
        Some(term) => match term.to_subject_ref() {
            Some(subject_ref) => Some(subject_ref),
            None => return PatternRefs::Impossible,
        },
        None => None,
    };
    let predicate_ref = match predicate {
        Some(term) => match to_predicate_ref(term) {
            Some(predicate_ref) => Some(predicate_ref),
            None => return PatternRefs::Impossible,
        },
        None => None,
    };
    PatternRefs::Bound(subject_ref, predicate_ref, object.map(Term::as_ref))
}

/// A read view over one graph of an oxigraph [`Store`].
///
/// This is the store adapter the rest of the crate works against: a quad
/// pattern-matching primitive where `None` acts as a wildcard, plus the small
/// set of derived lookups (objects, instances, RDF lists) the shapes-graph
/// compiler needs.
pub struct ShaclGraph {
    store: Store,
    graph_name: GraphName,
}

impl fmt::Debug for ShaclGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaclGraph")
            .field("graph_name", &self.graph_name)
            .finish_non_exhaustive()
    }
}

impl ShaclGraph {
    /// An empty graph backed by a fresh in-memory store.
    pub fn new() -> Result<Self, ShaclError> {
        Ok(Self {
            store: Store::new()?,
            graph_name: GraphName::DefaultGraph,
        })
    }

    /// Wraps an existing store, reading only the given graph.
    pub fn from_store(store: Store, graph_name: GraphName) -> Self {
        Self { store, graph_name }
    }

    /// Loads a serialized graph into a fresh store copy.
    ///
    /// Boolean literals written as `"0"`/`"1"` are canonicalized to
    /// `"false"`/`"true"` so the string-equality checks on `sh:deactivated`
    /// and `sh:optional` behave uniformly across serializations.
    pub fn from_reader(format: RdfFormat, reader: impl Read) -> Result<Self, ShaclError> {
        let store = Store::new()?;
        let mut loader = store.bulk_loader();
        loader.load_from_reader(RdfParser::from_format(format), reader)?;
        loader.commit()?;
        let graph = Self {
            store,
            graph_name: GraphName::DefaultGraph,
        };
        graph.canonicalize_booleans()?;
        Ok(graph)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// All quads matching the pattern; `None` is a wildcard.
    ///
    /// A bound subject that is not an IRI or blank node, or a bound predicate
    /// that is not an IRI, matches nothing.
    pub fn match_pattern(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<Vec<Quad>, ShaclError> {
        match pattern_refs(subject, predicate, object) {
            PatternRefs::Impossible => Ok(Vec::new()),
            PatternRefs::Bound(subject_ref, predicate_ref, object_ref) => {
                let quads = self
                    .store
                    .quads_for_pattern(
                        subject_ref,
                        predicate_ref,
                        object_ref,
                        Some(self.graph_name.as_ref()),
                    )
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(quads)
            }
        }
    }

    /// True when at least one quad matches the pattern.
    pub fn has_match(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<bool, ShaclError> {
        match pattern_refs(subject, predicate, object) {
            PatternRefs::Impossible => Ok(false),
            PatternRefs::Bound(subject_ref, predicate_ref, object_ref) => Ok(self
                .store
                .quads_for_pattern(
                    subject_ref,
                    predicate_ref,
                    object_ref,
                    Some(self.graph_name.as_ref()),
                )
                .next()
                .transpose()?
                .is_some()),
        }
    }

    /// All objects of triples `(subject, predicate, ?)`.
    pub fn objects(
        &self,
        subject: &Term,
        predicate: NamedNodeRef<'_>,
    ) -> Result<Vec<Term>, ShaclError> {
        let Some(subject_ref) = subject.to_subject_ref() else {
            return Ok(Vec::new());
        };
        self.store
            .quads_for_pattern(
                Some(subject_ref),
                Some(predicate),
                None,
                Some(self.graph_name.as_ref()),
            )
            .map(|quad| Ok(quad?.object))
            .collect()
    }

    /// The object of the first matching triple, if any.
    ///
    /// Single-valued fields (`sh:severity`, `sh:path`, `sh:deactivated`) use
    /// only the first match; additional matches are ignored.
    pub fn first_object(
        &self,
        subject: &Term,
        predicate: NamedNodeRef<'_>,
    ) -> Result<Option<Term>, ShaclError> {
        let Some(subject_ref) = subject.to_subject_ref() else {
            return Ok(None);
        };
        Ok(self
            .store
            .quads_for_pattern(
                Some(subject_ref),
                Some(predicate),
                None,
                Some(self.graph_name.as_ref()),
            )
            .next()
            .transpose()?
            .map(|quad| quad.object))
    }

    /// All subjects of triples `(?, predicate, ?)`.
    pub fn subjects(&self, predicate: &Term) -> Result<Vec<Term>, ShaclError> {
        let Some(predicate_ref) = to_predicate_ref(predicate) else {
            return Ok(Vec::new());
        };
        self.store
            .quads_for_pattern(
                None,
                Some(predicate_ref),
                None,
                Some(self.graph_name.as_ref()),
            )
            .map(|quad| Ok(Term::from(quad?.subject)))
            .collect()
    }

    /// All subjects with a direct `rdf:type` assertion for `class`.
    ///
    /// No subclass reasoning is performed; inferred instances are visible only
    /// if the store itself materializes them.
    pub fn instances_of(&self, class: &Term) -> Result<Vec<Term>, ShaclError> {
        self.store
            .quads_for_pattern(
                None,
                Some(rdf::TYPE),
                Some(class.as_ref()),
                Some(self.graph_name.as_ref()),
            )
            .map(|quad| Ok(Term::from(quad?.subject)))
            .collect()
    }

    pub fn is_instance_of(&self, node: &Term, class: &Term) -> Result<bool, ShaclError> {
        let Some(subject_ref) = node.to_subject_ref() else {
            return Ok(false);
        };
        Ok(self
            .store
            .quads_for_pattern(
                Some(subject_ref),
                Some(rdf::TYPE),
                Some(class.as_ref()),
                Some(self.graph_name.as_ref()),
            )
            .next()
            .transpose()?
            .is_some())
    }

    /// The members of an RDF collection, in list order.
    ///
    /// Walks `rdf:first`/`rdf:rest` iteratively with a visited guard, so a
    /// malformed cyclic list terminates instead of looping; a missing
    /// `rdf:first` or `rdf:rest` ends the walk.
    pub fn list_items(&self, head: &Term) -> Result<Vec<Term>, ShaclError> {
        let nil = Term::from(rdf::NIL);
        let mut items = Vec::new();
        let mut seen: HashSet<Term> = HashSet::new();
        let mut current = head.clone();
        while current != nil {
            if !seen.insert(current.clone()) {
                debug!("cyclic rdf:rest chain at {current}; truncating list");
                break;
            }
            let Some(first) = self.first_object(&current, rdf::FIRST)? else {
                break;
            };
            items.push(first);
            match self.first_object(&current, rdf::REST)? {
                Some(rest) => current = rest,
                None => break,
            }
        }
        Ok(items)
    }

    /// Inserts a quad into the underlying store.
    pub fn insert_quad(&self, quad: &Quad) -> Result<(), ShaclError> {
        self.store.insert(quad)?;
        Ok(())
    }

    /// Rewrites `"0"`/`"1"` boolean literal objects to `"false"`/`"true"`.
    fn canonicalize_booleans(&self) -> Result<(), ShaclError> {
        let mut rewrites = Vec::new();
        for quad in self.store.iter() {
            let quad = quad?;
            if let Term::Literal(literal) = &quad.object {
                if literal.datatype() == xsd::BOOLEAN {
                    let canonical = match literal.value() {
                        "0" => Some("false"),
                        "1" => Some("true"),
                        _ => None,
                    };
                    if let Some(canonical) = canonical {
                        rewrites.push((
                            quad.clone(),
                            Literal::new_typed_literal(canonical, xsd::BOOLEAN),
                        ));
                    }
                }
            }
        }
        for (quad, literal) in rewrites {
            self.store.remove(&quad)?;
            let rewritten = Quad::new(quad.subject, quad.predicate, literal, quad.graph_name);
            self.store.insert(&rewritten)?;
        }
        Ok(())
    }
}
