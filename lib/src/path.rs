use crate::error::ShaclError;
use crate::graph::ShaclGraph;
use crate::named_nodes::SHACL;
use crate::node_set::NodeSet;
use crate::types::Path;
use oxigraph::model::vocab::rdf;
use oxigraph::model::{Term, TermRef};

/// Translates a `sh:path` description into a [`Path`] expression tree.
///
/// An IRI is a single predicate hop; an RDF list is a sequence; a blank node
/// carrying one of the structural path predicates (`sh:alternativePath`,
/// `sh:zeroOrMorePath`, `sh:oneOrMorePath`, `sh:zeroOrOnePath`,
/// `sh:inversePath`) compiles to the corresponding variant. Anything else is
/// an [`ShaclError::UnsupportedPath`].
pub fn compile_path(shapes: &ShaclGraph, path: &Term) -> Result<Path, ShaclError> {
    match path.as_ref() {
        TermRef::NamedNode(_) => Ok(Path::Predicate(path.clone())),
        TermRef::BlankNode(_) => compile_structural(shapes, path),
        _ => Err(ShaclError::UnsupportedPath(path.clone())),
    }
}

fn compile_list(shapes: &ShaclGraph, head: &Term) -> Result<Vec<Path>, ShaclError> {
    shapes
        .list_items(head)?
        .iter()
        .map(|item| compile_path(shapes, item))
        .collect()
}

fn compile_structural(shapes: &ShaclGraph, path: &Term) -> Result<Path, ShaclError> {
    let shacl = SHACL::new();

    // A blank node starting an rdf:List is a sequence path.
    if shapes.first_object(path, rdf::FIRST)?.is_some() {
        return Ok(Path::Sequence(compile_list(shapes, path)?));
    }
    if let Some(alternatives) = shapes.first_object(path, shacl.alternative_path)? {
        return Ok(Path::Alternative(compile_list(shapes, &alternatives)?));
    }
    if let Some(inner) = shapes.first_object(path, shacl.zero_or_more_path)? {
        return Ok(Path::ZeroOrMore(Box::new(compile_path(shapes, &inner)?)));
    }
    if let Some(inner) = shapes.first_object(path, shacl.one_or_more_path)? {
        return Ok(Path::OneOrMore(Box::new(compile_path(shapes, &inner)?)));
    }
    if let Some(inner) = shapes.first_object(path, shacl.zero_or_one_path)? {
        return Ok(Path::ZeroOrOne(Box::new(compile_path(shapes, &inner)?)));
    }
    if let Some(inner) = shapes.first_object(path, shacl.inverse_path)? {
        return Ok(Path::Inverse(Box::new(compile_path(shapes, &inner)?)));
    }
    Err(ShaclError::UnsupportedPath(path.clone()))
}

/// The set of value nodes reachable from `focus_node` via `path`.
///
/// Evaluation is cycle-safe: closures expand a frontier with a seen-node
/// guard, so each node is expanded at most once per closure and traversal
/// terminates on cyclic data.
pub fn evaluate_path(
    path: &Path,
    focus_node: &Term,
    data: &ShaclGraph,
) -> Result<NodeSet, ShaclError> {
    eval(path, focus_node, data, false)
}

fn eval(path: &Path, focus: &Term, data: &ShaclGraph, inverted: bool) -> Result<NodeSet, ShaclError> {
    match path {
        Path::Predicate(predicate) => {
            let mut reached = NodeSet::new();
            if inverted {
                for quad in data.match_pattern(None, Some(predicate), Some(focus))? {
                    reached.add(Term::from(quad.subject));
                }
            } else {
                for quad in data.match_pattern(Some(focus), Some(predicate), None)? {
                    reached.add(quad.object);
                }
            }
            Ok(reached)
        }
        Path::Sequence(steps) => {
            let mut current = NodeSet::new();
            current.add(focus.clone());
            // Under inversion the chain is walked back to front, each step inverted.
            let ordered: Vec<&Path> = if inverted {
                steps.iter().rev().collect()
            } else {
                steps.iter().collect()
            };
            for step in ordered {
                let mut next = NodeSet::new();
                for node in &current {
                    next.add_all(eval(step, node, data, inverted)?);
                }
                current = next;
            }
            Ok(current)
        }
        Path::Alternative(choices) => {
            let mut reached = NodeSet::new();
            for choice in choices {
                reached.add_all(eval(choice, focus, data, inverted)?);
            }
            Ok(reached)
        }
        Path::Inverse(inner) => eval(inner, focus, data, !inverted),
        Path::ZeroOrOne(inner) => {
            let mut reached = NodeSet::new();
            reached.add(focus.clone());
            reached.add_all(eval(inner, focus, data, inverted)?);
            Ok(reached)
        }
        Path::ZeroOrMore(inner) => closure(inner, focus, data, inverted, true),
        Path::OneOrMore(inner) => closure(inner, focus, data, inverted, false),
    }
}

/// Frontier-based closure over `step`.
///
/// With `include_focus` the result is the reflexive-transitive closure;
/// without it the frontier is seeded by applying `step` once, so the focus
/// node appears only if a cycle leads back to it.
fn closure(
    step: &Path,
    focus: &Term,
    data: &ShaclGraph,
    inverted: bool,
    include_focus: bool,
) -> Result<NodeSet, ShaclError> {
    let mut reached = NodeSet::new();
    let mut frontier: Vec<Term> = Vec::new();
    if include_focus {
        reached.add(focus.clone());
        frontier.push(focus.clone());
    } else {
        for node in eval(step, focus, data, inverted)? {
            if reached.add(node.clone()) {
                frontier.push(node);
            }
        }
    }
    while let Some(node) = frontier.pop() {
        for next in eval(step, &node, data, inverted)? {
            if reached.add(next.clone()) {
                frontier.push(next);
            }
        }
    }
    Ok(reached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{GraphName, NamedNode, Quad};

    fn named(iri: &str) -> Term {
        NamedNode::new_unchecked(iri).into()
    }

    fn graph_with(edges: &[(&str, &str, &str)]) -> ShaclGraph {
        let graph = ShaclGraph::new().unwrap();
        for (s, p, o) in edges {
            let quad = Quad::new(
                NamedNode::new_unchecked(*s),
                NamedNode::new_unchecked(*p),
                NamedNode::new_unchecked(*o),
                GraphName::DefaultGraph,
            );
            graph.insert_quad(&quad).unwrap();
        }
        graph
    }

    const SUB: &str = "http://example.org/subClassOf";

    #[test]
    fn zero_or_more_includes_focus() {
        let data = graph_with(&[
            ("http://example.org/X", SUB, "http://example.org/Y"),
            ("http://example.org/Y", SUB, "http://example.org/Z"),
        ]);
        let path = Path::ZeroOrMore(Box::new(Path::Predicate(named(SUB))));
        let reached = evaluate_path(&path, &named("http://example.org/X"), &data).unwrap();
        assert_eq!(reached.len(), 3);
        assert!(reached.contains(&named("http://example.org/X")));
        assert!(reached.contains(&named("http://example.org/Y")));
        assert!(reached.contains(&named("http://example.org/Z")));
    }

    #[test]
    fn one_or_more_excludes_focus_without_cycle() {
        let data = graph_with(&[
            ("http://example.org/X", SUB, "http://example.org/Y"),
            ("http://example.org/Y", SUB, "http://example.org/Z"),
        ]);
        let path = Path::OneOrMore(Box::new(Path::Predicate(named(SUB))));
        let reached = evaluate_path(&path, &named("http://example.org/X"), &data).unwrap();
        assert_eq!(reached.len(), 2);
        assert!(!reached.contains(&named("http://example.org/X")));
    }

    #[test]
    fn one_or_more_reincludes_focus_through_cycle() {
        let data = graph_with(&[
            ("http://example.org/X", SUB, "http://example.org/Y"),
            ("http://example.org/Y", SUB, "http://example.org/X"),
        ]);
        let path = Path::OneOrMore(Box::new(Path::Predicate(named(SUB))));
        let reached = evaluate_path(&path, &named("http://example.org/X"), &data).unwrap();
        assert_eq!(reached.len(), 2);
        assert!(reached.contains(&named("http://example.org/X")));
    }

    #[test]
    fn cyclic_closure_terminates() {
        let data = graph_with(&[
            ("http://example.org/X", SUB, "http://example.org/Y"),
            ("http://example.org/Y", SUB, "http://example.org/X"),
        ]);
        let path = Path::ZeroOrMore(Box::new(Path::Predicate(named(SUB))));
        let reached = evaluate_path(&path, &named("http://example.org/X"), &data).unwrap();
        assert_eq!(reached.len(), 2);
    }

    #[test]
    fn inverse_sequence_walks_back_to_front() {
        // A -a-> B -b-> C; inverse(a/b) from C must reach A.
        let data = graph_with(&[
            ("http://example.org/A", "http://example.org/a", "http://example.org/B"),
            ("http://example.org/B", "http://example.org/b", "http://example.org/C"),
        ]);
        let path = Path::Inverse(Box::new(Path::Sequence(vec![
            Path::Predicate(named("http://example.org/a")),
            Path::Predicate(named("http://example.org/b")),
        ])));
        let reached = evaluate_path(&path, &named("http://example.org/C"), &data).unwrap();
        assert_eq!(reached.into_vec(), vec![named("http://example.org/A")]);
    }

    #[test]
    fn empty_sequence_yields_focus() {
        let data = graph_with(&[]);
        let path = Path::Sequence(Vec::new());
        let reached = evaluate_path(&path, &named("http://example.org/X"), &data).unwrap();
        assert_eq!(reached.into_vec(), vec![named("http://example.org/X")]);
    }

    #[test]
    fn literal_path_term_is_unsupported() {
        let shapes = ShaclGraph::new().unwrap();
        let literal: Term = oxigraph::model::Literal::new_simple_literal("not a path").into();
        assert!(matches!(
            compile_path(&shapes, &literal),
            Err(ShaclError::UnsupportedPath(_))
        ));
    }
}
