use crate::components::ConstraintComponent;
use crate::error::ShaclError;
use crate::graph::ShaclGraph;
use crate::named_nodes::SHACL;
use crate::node_set::NodeSet;
use crate::path::{compile_path, evaluate_path};
use crate::shapes_graph::ShapesGraph;
use crate::types::{is_true, local_name, Path};
use log::debug;
use oxigraph::model::vocab::rdfs;
use oxigraph::model::Term;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One concrete binding of a component's parameters for one shape.
///
/// Parameter values are keyed by the local name of the parameter path
/// (`minCount` for `sh:minCount`). For single-parameter components the
/// discovering triple's object is also kept as the explicit value.
#[derive(Debug)]
pub struct Constraint {
    shape_node: Term,
    component: Rc<ConstraintComponent>,
    parameter_values: HashMap<String, Term>,
    value: Option<Term>,
}

impl Constraint {
    fn new(
        shape_node: &Term,
        component: Rc<ConstraintComponent>,
        value: Option<Term>,
        shapes: &ShaclGraph,
    ) -> Result<Self, ShaclError> {
        let mut parameter_values = HashMap::new();
        for parameter in component.parameters() {
            let resolved = match &value {
                Some(explicit) => Some(explicit.clone()),
                None => shapes
                    .match_pattern(Some(shape_node), Some(parameter), None)?
                    .into_iter()
                    .next()
                    .map(|quad| quad.object),
            };
            if let Some(resolved) = resolved {
                parameter_values.insert(local_name(parameter), resolved);
            }
        }
        Ok(Self {
            shape_node: shape_node.clone(),
            component,
            parameter_values,
            value,
        })
    }

    pub fn shape_node(&self) -> &Term {
        &self.shape_node
    }

    pub fn component(&self) -> &Rc<ConstraintComponent> {
        &self.component
    }

    /// The resolved value for a parameter, by local name.
    pub fn get_parameter_value(&self, parameter_name: &str) -> Option<&Term> {
        self.parameter_values.get(parameter_name)
    }

    /// The explicit value bound when a single-parameter component was
    /// discovered through one of its parameter triples.
    pub fn value(&self) -> Option<&Term> {
        self.value.as_ref()
    }
}

/// A shape definition: severity and deactivation metadata, an optional
/// property path, and the constraints resolved for its node.
#[derive(Debug)]
pub struct Shape {
    shape_node: Term,
    severity: Term,
    deactivated: bool,
    path: Option<Term>,
    compiled_path: OnceCell<Path>,
    constraints: Vec<Constraint>,
    shapes: Rc<ShaclGraph>,
}

impl Shape {
    pub(crate) fn new(
        shapes: Rc<ShaclGraph>,
        shape_node: Term,
        shapes_graph: &ShapesGraph,
    ) -> Result<Self, ShaclError> {
        let shacl = SHACL::new();

        let severity = shapes
            .first_object(&shape_node, shacl.severity)?
            .unwrap_or_else(|| Term::from(shacl.violation));
        let deactivated = matches!(
            shapes.first_object(&shape_node, shacl.deactivated)?,
            Some(flag) if is_true(&flag)
        );
        let path = shapes.first_object(&shape_node, shacl.path)?;

        // Walk every triple on the shape node and resolve constraints through
        // the parameter index. A multi-parameter component is materialized at
        // most once, however many of its parameter predicates appear.
        let mut constraints = Vec::new();
        let mut handled = NodeSet::new();
        for quad in shapes.match_pattern(Some(&shape_node), None, None)? {
            let predicate = Term::from(quad.predicate);
            let Some(component) = shapes_graph.component_with_parameter(&predicate) else {
                continue;
            };
            if handled.contains(component.node()) {
                continue;
            }
            if component.parameters().len() == 1 {
                constraints.push(Constraint::new(
                    &shape_node,
                    component,
                    Some(quad.object),
                    &shapes,
                )?);
            } else if component.is_complete(&shape_node, &shapes)? {
                let component_node = component.node().clone();
                constraints.push(Constraint::new(&shape_node, component, None, &shapes)?);
                handled.add(component_node);
            }
        }
        debug!(
            "shape {} resolved {} constraints (property shape: {})",
            shape_node,
            constraints.len(),
            path.is_some()
        );

        Ok(Self {
            shape_node,
            severity,
            deactivated,
            path,
            compiled_path: OnceCell::new(),
            constraints,
            shapes,
        })
    }

    pub fn shape_node(&self) -> &Term {
        &self.shape_node
    }

    /// The shape's severity term, defaulting to `sh:Violation`.
    pub fn severity(&self) -> &Term {
        &self.severity
    }

    pub fn deactivated(&self) -> bool {
        self.deactivated
    }

    /// The raw `sh:path` term, when this is a property shape.
    pub fn path(&self) -> Option<&Term> {
        self.path.as_ref()
    }

    pub fn is_property_shape(&self) -> bool {
        self.path.is_some()
    }

    /// The resolved constraints, in construction order.
    pub fn get_constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Resolves the focus nodes this shape applies to in `data`, unioning the
    /// five target rules: shape-as-class, `sh:targetClass`, `sh:targetNode`,
    /// `sh:targetSubjectsOf` and `sh:targetObjectsOf`. Deduplicated, in
    /// enumeration order.
    pub fn get_target_nodes(&self, data: &ShaclGraph) -> Result<Vec<Term>, ShaclError> {
        let shacl = SHACL::new();
        let mut targets = NodeSet::new();

        if self
            .shapes
            .is_instance_of(&self.shape_node, &Term::from(rdfs::CLASS))?
        {
            targets.add_all(data.instances_of(&self.shape_node)?);
        }
        for class in self.shapes.objects(&self.shape_node, shacl.target_class)? {
            targets.add_all(data.instances_of(&class)?);
        }
        targets.add_all(self.shapes.objects(&self.shape_node, shacl.target_node)?);
        for predicate in self
            .shapes
            .objects(&self.shape_node, shacl.target_subjects_of)?
        {
            targets.add_all(data.subjects(&predicate)?);
        }
        for predicate in self
            .shapes
            .objects(&self.shape_node, shacl.target_objects_of)?
        {
            for quad in data.match_pattern(None, Some(&predicate), None)? {
                targets.add(quad.object);
            }
        }

        Ok(targets.into_vec())
    }

    /// The value nodes for `focus_node`: the nodes reached through the
    /// compiled property path, or the focus node itself for a node shape.
    pub fn get_value_nodes(
        &self,
        focus_node: &Term,
        data: &ShaclGraph,
    ) -> Result<Vec<Term>, ShaclError> {
        match self.compiled_path()? {
            Some(path) => Ok(evaluate_path(path, focus_node, data)?.into_vec()),
            None => Ok(vec![focus_node.clone()]),
        }
    }

    /// Compiles `sh:path` on first use. A failed compilation is reported on
    /// every call and never cached.
    fn compiled_path(&self) -> Result<Option<&Path>, ShaclError> {
        let Some(path_term) = &self.path else {
            return Ok(None);
        };
        if let Some(path) = self.compiled_path.get() {
            return Ok(Some(path));
        }
        let compiled = compile_path(&self.shapes, path_term)?;
        Ok(Some(self.compiled_path.get_or_init(|| compiled)))
    }
}
