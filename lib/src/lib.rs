//! A SHACL shapes-graph compiler.
//!
//! This library turns a shapes graph into an index a validation driver can
//! execute: constraint components parsed and indexed by parameter, shapes
//! with their resolved constraints, target-node resolution under the five
//! SHACL target rules, and compiled property-path expressions that select
//! value nodes from a focus node.
//!
//! It deliberately stops there. The semantics of individual constraints
//! (minCount, pattern, datatype, ...) belong to validator functions supplied
//! through a [`validators::ValidatorRegistry`], and the driver loop that
//! iterates shapes, focus nodes and constraints lives outside this crate:
//!
//! ```no_run
//! use shacl_shapes::{ShaclGraph, ShapesGraph, ValidatorRegistry};
//! use oxigraph::io::RdfFormat;
//! use std::rc::Rc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let shapes = Rc::new(ShaclGraph::from_reader(RdfFormat::Turtle, std::io::stdin())?);
//! let data = ShaclGraph::new()?;
//! let shapes_graph = ShapesGraph::new(shapes, ValidatorRegistry::new())?;
//! for shape in shapes_graph.get_shapes_with_target()? {
//!     for focus_node in shape.get_target_nodes(&data)? {
//!         let value_nodes = shape.get_value_nodes(&focus_node, &data)?;
//!         // hand value_nodes to the constraint validators
//!         # let _ = value_nodes;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
#![deny(clippy::all)]

pub mod components;
pub mod error;
pub mod graph;
pub(crate) mod named_nodes;
pub mod node_set;
pub mod path;
pub mod shape;
pub mod shapes_graph;
pub mod types;
pub mod validators;

pub use components::ConstraintComponent;
pub use error::ShaclError;
pub use graph::ShaclGraph;
pub use node_set::NodeSet;
pub use path::{compile_path, evaluate_path};
pub use shape::{Constraint, Shape};
pub use shapes_graph::ShapesGraph;
pub use types::Path;
pub use validators::{
    ComponentValidators, ValidationFn, ValidationFunction, ValidatorDefinition, ValidatorKind,
    ValidatorRegistry,
};

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::io::RdfFormat;
    use oxigraph::model::{Literal, NamedNode, Term};
    use std::rc::Rc;

    const SHAPES_TTL: &str = r#"@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix ex: <http://example.org/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

sh:MinCountConstraintComponent a sh:ConstraintComponent ;
    sh:parameter [ sh:path sh:minCount ] .

ex:NameShape
    sh:targetNode ex:Alice ;
    sh:path ex:name ;
    sh:minCount 1 .
"#;

    const DATA_TTL: &str = r#"@prefix ex: <http://example.org/> .

ex:Alice ex:name "Alice" .
"#;

    fn named(iri: &str) -> Term {
        NamedNode::new_unchecked(iri).into()
    }

    #[test]
    fn end_to_end_target_and_value_resolution() -> Result<(), ShaclError> {
        let shapes = Rc::new(ShaclGraph::from_reader(
            RdfFormat::Turtle,
            SHAPES_TTL.as_bytes(),
        )?);
        let data = ShaclGraph::from_reader(RdfFormat::Turtle, DATA_TTL.as_bytes())?;
        let shapes_graph = ShapesGraph::new(shapes, ValidatorRegistry::new())?;

        let target_shapes = shapes_graph.get_shapes_with_target()?;
        assert_eq!(target_shapes.len(), 1);

        let shape = &target_shapes[0];
        assert!(shape.is_property_shape());
        assert_eq!(shape.get_constraints().len(), 1);

        let focus_nodes = shape.get_target_nodes(&data)?;
        assert_eq!(focus_nodes, vec![named("http://example.org/Alice")]);

        let value_nodes = shape.get_value_nodes(&focus_nodes[0], &data)?;
        assert_eq!(
            value_nodes,
            vec![Term::from(Literal::new_simple_literal("Alice"))]
        );
        Ok(())
    }
}
