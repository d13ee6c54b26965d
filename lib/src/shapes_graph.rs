use crate::components::ConstraintComponent;
use crate::error::ShaclError;
use crate::graph::ShaclGraph;
use crate::named_nodes::SHACL;
use crate::node_set::NodeSet;
use crate::shape::Shape;
use crate::validators::ValidatorRegistry;
use log::{info, warn};
use oxigraph::model::vocab::rdfs;
use oxigraph::model::Term;
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// The compiled index over a shapes graph.
///
/// Built once and reused across validation runs: constraint components are
/// parsed eagerly and indexed by parameter, shapes are materialized lazily on
/// first lookup and cached, and the derived sets (shape nodes with
/// constraints, shapes with targets) are computed once behind initialize-once
/// cells. All of this is single-threaded; share a `ShapesGraph` across
/// threads only behind external synchronization.
pub struct ShapesGraph {
    graph: Rc<ShaclGraph>,
    registry: Rc<ValidatorRegistry>,
    components: Vec<Rc<ConstraintComponent>>,
    parameters_map: HashMap<Term, Rc<ConstraintComponent>>,
    shapes: RefCell<HashMap<Term, Rc<Shape>>>,
    shape_nodes_with_constraints: OnceCell<Vec<Term>>,
    target_shapes: OnceCell<Vec<Rc<Shape>>>,
}

impl ShapesGraph {
    /// Compiles the component index from `graph`.
    ///
    /// Every instance of `sh:ConstraintComponent` is parsed and each of its
    /// parameter paths is mapped back to it. When two components declare the
    /// same parameter the later registration wins; the collision is logged.
    pub fn new(graph: Rc<ShaclGraph>, registry: ValidatorRegistry) -> Result<Self, ShaclError> {
        let shacl = SHACL::new();
        let registry = Rc::new(registry);

        let component_nodes = graph.instances_of(&Term::from(shacl.constraint_component))?;
        info!(
            "compiling shapes graph: {} constraint components",
            component_nodes.len()
        );
        let mut components = Vec::with_capacity(component_nodes.len());
        for node in component_nodes {
            components.push(Rc::new(ConstraintComponent::new(
                node,
                &graph,
                registry.clone(),
            )?));
        }

        let mut parameters_map: HashMap<Term, Rc<ConstraintComponent>> = HashMap::new();
        for component in &components {
            for parameter in component.parameters() {
                if let Some(previous) =
                    parameters_map.insert(parameter.clone(), component.clone())
                {
                    warn!(
                        "parameter {} is declared by both {} and {}; keeping the latter",
                        parameter,
                        previous.node(),
                        component.node()
                    );
                }
            }
        }

        Ok(Self {
            graph,
            registry,
            components,
            parameters_map,
            shapes: RefCell::new(HashMap::new()),
            shape_nodes_with_constraints: OnceCell::new(),
            target_shapes: OnceCell::new(),
        })
    }

    /// The shapes graph this index was compiled from.
    pub fn graph(&self) -> &Rc<ShaclGraph> {
        &self.graph
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// All parsed constraint components.
    pub fn components(&self) -> &[Rc<ConstraintComponent>] {
        &self.components
    }

    /// The component owning `parameter`, if any.
    pub fn component_with_parameter(&self, parameter: &Term) -> Option<Rc<ConstraintComponent>> {
        self.parameters_map.get(parameter).cloned()
    }

    /// The shape for `shape_node`, constructed on first request and cached:
    /// repeated calls with an equal node return the identical instance.
    pub fn get_shape(&self, shape_node: &Term) -> Result<Rc<Shape>, ShaclError> {
        if let Some(shape) = self.shapes.borrow().get(shape_node) {
            return Ok(shape.clone());
        }
        let shape = Rc::new(Shape::new(self.graph.clone(), shape_node.clone(), self)?);
        self.shapes
            .borrow_mut()
            .insert(shape_node.clone(), shape.clone());
        Ok(shape)
    }

    /// The nodes that carry at least one required parameter of some
    /// component, i.e. the nodes worth materializing as shapes. Computed once.
    ///
    /// Nodes referenced only structurally (inside `sh:node`, list elements)
    /// carry no constraint triples and are skipped by construction.
    pub fn get_shape_nodes_with_constraints(&self) -> Result<&[Term], ShaclError> {
        if let Some(nodes) = self.shape_nodes_with_constraints.get() {
            return Ok(nodes);
        }
        let mut nodes = NodeSet::new();
        for component in &self.components {
            for parameter in component.required_parameters() {
                nodes.add_all(self.graph.subjects(parameter)?);
            }
        }
        Ok(self
            .shape_nodes_with_constraints
            .get_or_init(|| nodes.into_vec()))
    }

    /// The shapes a validation driver should start from: constrained nodes
    /// that are declared a class or carry an explicit target declaration.
    /// Computed once, in first-seen order of
    /// [`Self::get_shape_nodes_with_constraints`].
    pub fn get_shapes_with_target(&self) -> Result<Vec<Rc<Shape>>, ShaclError> {
        if let Some(shapes) = self.target_shapes.get() {
            return Ok(shapes.clone());
        }
        let shacl = SHACL::new();
        let rdfs_class = Term::from(rdfs::CLASS);
        let shape_nodes = self.get_shape_nodes_with_constraints()?.to_vec();

        let mut target_shapes = Vec::new();
        for shape_node in shape_nodes {
            let targeted = self.graph.is_instance_of(&shape_node, &rdfs_class)?
                || self
                    .graph
                    .first_object(&shape_node, shacl.target_class)?
                    .is_some()
                || self
                    .graph
                    .first_object(&shape_node, shacl.target_node)?
                    .is_some()
                || self
                    .graph
                    .first_object(&shape_node, shacl.target_subjects_of)?
                    .is_some()
                || self
                    .graph
                    .first_object(&shape_node, shacl.target_objects_of)?
                    .is_some()
                || self.graph.first_object(&shape_node, shacl.target)?.is_some();
            if targeted {
                target_shapes.push(self.get_shape(&shape_node)?);
            }
        }
        info!("{} shapes declare targets", target_shapes.len());
        Ok(self.target_shapes.get_or_init(|| target_shapes).clone())
    }
}
