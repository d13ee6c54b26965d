use crate::error::ShaclError;
use crate::graph::ShaclGraph;
use crate::named_nodes::SHACL;
use crate::shape::Shape;
use crate::types::is_true;
use crate::validators::{ValidationFunction, ValidatorDefinition, ValidatorKind, ValidatorRegistry};
use log::debug;
use oxigraph::model::Term;
use std::collections::HashSet;
use std::rc::Rc;

/// A parsed `sh:ConstraintComponent` definition.
///
/// Holds the component's parameter paths (in declaration order), the subset
/// that is required, and the node/property validator bindings resolved from
/// the registry, with a flag recording whether each binding fell back to the
/// generic `sh:validator`.
#[derive(Debug)]
pub struct ConstraintComponent {
    node: Term,
    parameters: Vec<Term>,
    parameter_nodes: Vec<Term>,
    required_parameters: Vec<Term>,
    optionals: HashSet<Term>,
    registry: Rc<ValidatorRegistry>,
    node_validator: Option<ValidationFunction>,
    node_validator_generic: bool,
    property_validator: Option<ValidationFunction>,
    property_validator_generic: bool,
}

impl ConstraintComponent {
    pub(crate) fn new(
        node: Term,
        shapes: &ShaclGraph,
        registry: Rc<ValidatorRegistry>,
    ) -> Result<Self, ShaclError> {
        let shacl = SHACL::new();
        let mut parameters = Vec::new();
        let mut parameter_nodes = Vec::new();
        let mut required_parameters = Vec::new();
        let mut optionals = HashSet::new();

        for parameter in shapes.objects(&node, shacl.parameter)? {
            for path in shapes.objects(&parameter, shacl.path)? {
                let optional = shapes
                    .objects(&parameter, shacl.optional)?
                    .iter()
                    .any(is_true);
                if optional {
                    optionals.insert(path.clone());
                } else {
                    required_parameters.push(path.clone());
                }
                parameters.push(path);
                parameter_nodes.push(parameter.clone());
            }
        }
        debug!(
            "component {} declares {} parameters ({} required)",
            node,
            parameters.len(),
            required_parameters.len()
        );

        let mut component = Self {
            node,
            parameters,
            parameter_nodes,
            required_parameters,
            optionals,
            registry,
            node_validator: None,
            node_validator_generic: false,
            property_validator: None,
            property_validator_generic: false,
        };

        component.node_validator =
            component.find_validation_function(ValidatorKind::NodeValidator);
        if component.node_validator.is_none() {
            component.node_validator = component.find_validation_function(ValidatorKind::Validator);
            component.node_validator_generic = true;
        }
        component.property_validator =
            component.find_validation_function(ValidatorKind::PropertyValidator);
        if component.property_validator.is_none() {
            component.property_validator =
                component.find_validation_function(ValidatorKind::Validator);
            component.property_validator_generic = true;
        }

        Ok(component)
    }

    /// The node that defines this component in the shapes graph.
    pub fn node(&self) -> &Term {
        &self.node
    }

    /// The parameter paths, in declaration order.
    pub fn parameters(&self) -> &[Term] {
        &self.parameters
    }

    /// The parameter nodes parallel to [`Self::parameters`].
    pub fn parameter_nodes(&self) -> &[Term] {
        &self.parameter_nodes
    }

    pub fn required_parameters(&self) -> &[Term] {
        &self.required_parameters
    }

    pub fn is_optional(&self, parameter: &Term) -> bool {
        self.optionals.contains(parameter)
    }

    /// True when `shape_node` carries at least one triple for every required
    /// parameter, i.e. the component is fully configured for that shape.
    pub fn is_complete(&self, shape_node: &Term, shapes: &ShaclGraph) -> Result<bool, ShaclError> {
        for parameter in &self.parameters {
            if !self.is_optional(parameter)
                && !shapes.has_match(Some(shape_node), Some(parameter), None)?
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The validator resolved for node shapes, if any.
    pub fn node_validator(&self) -> Option<&ValidationFunction> {
        self.node_validator.as_ref()
    }

    /// The validator resolved for property shapes, if any.
    pub fn property_validator(&self) -> Option<&ValidationFunction> {
        self.property_validator.as_ref()
    }

    /// The message template of the validator binding that applies to `shape`,
    /// or an empty sequence if none is configured.
    pub fn get_messages(&self, shape: &Shape) -> Vec<String> {
        let generic = if shape.is_property_shape() {
            self.property_validator_generic
        } else {
            self.node_validator_generic
        };
        let kind = if generic {
            ValidatorKind::Validator
        } else if shape.is_property_shape() {
            ValidatorKind::PropertyValidator
        } else {
            ValidatorKind::NodeValidator
        };
        match self.find_validator(kind) {
            Some(validator) => validator.message.iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    fn find_validation_function(&self, kind: ValidatorKind) -> Option<ValidationFunction> {
        self.find_validator(kind)
            .map(|definition| ValidationFunction::new(self.parameters.clone(), definition.func.clone()))
    }

    fn find_validator(&self, kind: ValidatorKind) -> Option<&ValidatorDefinition> {
        self.registry
            .get(&self.node)
            .and_then(|validators| validators.get(kind))
    }
}
