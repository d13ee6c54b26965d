use oxigraph::model::NamedNodeRef;

/// The SHACL vocabulary terms consumed by the shapes-graph compiler.
///
/// These are fixed IRIs, not configuration: they are the predicates a shapes
/// graph uses to declare constraint components, targets, and property paths.
#[allow(clippy::upper_case_acronyms)]
pub(crate) struct SHACL {
    pub constraint_component: NamedNodeRef<'static>,
    pub parameter: NamedNodeRef<'static>,
    pub path: NamedNodeRef<'static>,
    pub optional: NamedNodeRef<'static>,
    pub severity: NamedNodeRef<'static>,
    pub violation: NamedNodeRef<'static>,
    pub deactivated: NamedNodeRef<'static>,
    pub target_class: NamedNodeRef<'static>,
    pub target_node: NamedNodeRef<'static>,
    pub target_subjects_of: NamedNodeRef<'static>,
    pub target_objects_of: NamedNodeRef<'static>,
    pub target: NamedNodeRef<'static>,
    pub alternative_path: NamedNodeRef<'static>,
    pub zero_or_more_path: NamedNodeRef<'static>,
    pub one_or_more_path: NamedNodeRef<'static>,
    pub zero_or_one_path: NamedNodeRef<'static>,
    pub inverse_path: NamedNodeRef<'static>,
}

impl SHACL {
    pub fn new() -> Self {
        Self {
            constraint_component: NamedNodeRef::new_unchecked(
                "http://www.w3.org/ns/shacl#ConstraintComponent",
            ),
            parameter: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#parameter"),
            path: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#path"),
            optional: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#optional"),
            severity: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#severity"),
            violation: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#Violation"),
            deactivated: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#deactivated"),
            target_class: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#targetClass"),
            target_node: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#targetNode"),
            target_subjects_of: NamedNodeRef::new_unchecked(
                "http://www.w3.org/ns/shacl#targetSubjectsOf",
            ),
            target_objects_of: NamedNodeRef::new_unchecked(
                "http://www.w3.org/ns/shacl#targetObjectsOf",
            ),
            target: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#target"),
            alternative_path: NamedNodeRef::new_unchecked(
                "http://www.w3.org/ns/shacl#alternativePath",
            ),
            zero_or_more_path: NamedNodeRef::new_unchecked(
                "http://www.w3.org/ns/shacl#zeroOrMorePath",
            ),
            one_or_more_path: NamedNodeRef::new_unchecked(
                "http://www.w3.org/ns/shacl#oneOrMorePath",
            ),
            zero_or_one_path: NamedNodeRef::new_unchecked(
                "http://www.w3.org/ns/shacl#zeroOrOnePath",
            ),
            inverse_path: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#inversePath"),
        }
    }
}

impl Default for SHACL {
    fn default() -> Self {
        Self::new()
    }
}
