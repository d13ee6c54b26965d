use crate::graph::ShaclGraph;
use crate::shape::Constraint;
use oxigraph::model::Term;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// An executable constraint check.
///
/// Called by an external validation driver with the constraint being checked,
/// the focus node, one value node, and the data graph; returns `true` when
/// the value node conforms. The semantics of individual checks (minCount,
/// pattern, datatype, ...) live entirely in the registered functions.
pub type ValidationFn = Rc<dyn Fn(&Constraint, &Term, &Term, &ShaclGraph) -> bool>;

/// A registered validator: the callable plus an optional message template.
#[derive(Clone)]
pub struct ValidatorDefinition {
    pub func: ValidationFn,
    pub message: Option<String>,
}

impl ValidatorDefinition {
    pub fn new(func: ValidationFn, message: Option<String>) -> Self {
        Self { func, message }
    }
}

impl fmt::Debug for ValidatorDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorDefinition")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Which validator binding a lookup refers to, mirroring `sh:validator`,
/// `sh:nodeValidator` and `sh:propertyValidator`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValidatorKind {
    Validator,
    NodeValidator,
    PropertyValidator,
}

/// The up-to-three validator bindings registered for one constraint component.
#[derive(Debug, Clone, Default)]
pub struct ComponentValidators {
    /// General-purpose validator, the fallback for both shape kinds.
    pub validator: Option<ValidatorDefinition>,
    /// Validator specialised for node shapes.
    pub node_validator: Option<ValidatorDefinition>,
    /// Validator specialised for property shapes.
    pub property_validator: Option<ValidatorDefinition>,
}

impl ComponentValidators {
    pub fn get(&self, kind: ValidatorKind) -> Option<&ValidatorDefinition> {
        match kind {
            ValidatorKind::Validator => self.validator.as_ref(),
            ValidatorKind::NodeValidator => self.node_validator.as_ref(),
            ValidatorKind::PropertyValidator => self.property_validator.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.validator.is_none()
            && self.node_validator.is_none()
            && self.property_validator.is_none()
    }
}

/// Registry of validators, keyed by constraint-component node.
///
/// The registry is consumed by the shapes-graph compiler, never populated by
/// it. A component with no resolvable validator performs no check and
/// contributes no message; that is a silent no-op, not an error.
#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    entries: HashMap<Term, ComponentValidators>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, component: Term, validators: ComponentValidators) {
        self.entries.insert(component, validators);
    }

    pub fn get(&self, component: &Term) -> Option<&ComponentValidators> {
        self.entries.get(component)
    }
}

/// A validator resolved against a specific constraint component: the callable
/// together with the component's declared parameters.
#[derive(Clone)]
pub struct ValidationFunction {
    parameters: Vec<Term>,
    func: ValidationFn,
}

impl ValidationFunction {
    pub(crate) fn new(parameters: Vec<Term>, func: ValidationFn) -> Self {
        Self { parameters, func }
    }

    /// The parameter paths of the owning component, in declaration order.
    pub fn parameters(&self) -> &[Term] {
        &self.parameters
    }

    pub fn execute(
        &self,
        constraint: &Constraint,
        focus_node: &Term,
        value_node: &Term,
        data: &ShaclGraph,
    ) -> bool {
        (self.func)(constraint, focus_node, value_node, data)
    }
}

impl fmt::Debug for ValidationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationFunction")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
