use std::collections::HashSet;

use crate::{
    bean::BeanType,
    element::{ElementDescriptor, DEFAULT_NAME},
    error::BindingError,
    introspect::{Alternative, PropertyInfo, RenderingKind, ResolvedWrapper},
    model::BindingModel,
    property::{MemberShape, Property, Rendering},
    types::{TypeHierarchy, TypeRef},
    xstypes::{is_ncname, QName},
};

const ID_REF_MARKING: &str = "identifier reference";

/// Checks one property and resolves it into a [`PropertyInfo`]. All problems found are returned,
/// not only the first one.
pub(crate) fn check_property(
    model: &BindingModel,
    bean: &BeanType,
    property: &Property,
) -> Result<PropertyInfo, Vec<BindingError>> {
    let mut checker = PropertyChecker {
        model,
        property,
        errors: Vec::new(),
    };

    let item_type = property.shape.item_type();
    checker.check_known(item_type);
    if let MemberShape::Map { key, .. } = &property.shape {
        checker.check_known(key);
    }

    let rendering = property.rendering.unwrapped();
    let wrapper = match &property.rendering {
        Rendering::Wrapped(wrapper, inner) => {
            let marking = property.rendering.marking_name();
            if let Rendering::Wrapped(..) = inner.as_ref() {
                checker.conflict(marking, marking);
            }
            checker.require_collection(marking);
            Some(ResolvedWrapper {
                name: wrapper.effective_name(&property.name, model.target_namespace()),
                nillable: wrapper.nillable,
                required: wrapper.required,
            })
        }
        _ => None,
    };
    let marking = rendering.marking_name();

    let (kind, alternatives) = match rendering {
        Rendering::Default => {
            let alternative = checker.resolve(&ElementDescriptor::new(DEFAULT_NAME));
            (RenderingKind::Default, vec![alternative])
        }
        Rendering::Element(element) => {
            checker.reject_map(marking);
            let alternative = checker.resolve(element);
            checker.check_alternative_type(&alternative);
            (RenderingKind::Element, vec![alternative])
        }
        Rendering::Elements(choice) => {
            checker.require_collection(marking);
            if choice.is_empty() {
                checker.errors.push(BindingError::EmptyAlternativeSet { marking });
            }
            let alternatives = choice
                .alternatives()
                .iter()
                .map(|element| checker.resolve(element))
                .collect::<Vec<_>>();
            for alternative in &alternatives {
                checker.check_alternative_type(alternative);
            }
            checker.check_unique_names(&alternatives);
            (RenderingKind::Elements, alternatives)
        }
        Rendering::ElementRefs(refs) => {
            checker.require_collection(marking);
            if property.id_ref {
                checker.conflict(marking, ID_REF_MARKING);
            }
            if refs.refs().is_empty() {
                checker.errors.push(BindingError::EmptyAlternativeSet { marking });
            }
            let alternatives = refs
                .refs()
                .iter()
                .map(|r| Alternative {
                    name: r.name.clone(),
                    type_: r.type_.clone().unwrap_or_else(|| item_type.clone()),
                    nillable: false,
                    required: false,
                    default_value: None,
                })
                .collect::<Vec<_>>();
            for alternative in &alternatives {
                checker.check_alternative_type(alternative);
            }
            checker.check_unique_names(&alternatives);
            (RenderingKind::ElementRefs, alternatives)
        }
        Rendering::Wrapped(..) => unreachable!("wrappers are stripped above"),
    };

    if property.id_ref && kind != RenderingKind::ElementRefs {
        checker.check_identifiers(&alternatives);
    }
    if let Some(wrapper) = &wrapper {
        checker.check_tag_name(&wrapper.name);
    }
    for alternative in &alternatives {
        checker.check_tag_name(&alternative.name);
    }

    if checker.errors.is_empty() {
        Ok(PropertyInfo {
            bean: bean.name.clone(),
            property: property.name.clone(),
            shape: property.shape.clone(),
            kind,
            wrapper,
            alternatives,
            id_ref: property.id_ref,
        })
    } else {
        Err(checker.errors)
    }
}

struct PropertyChecker<'a> {
    model: &'a BindingModel,
    property: &'a Property,
    errors: Vec<BindingError>,
}

impl PropertyChecker<'_> {
    fn resolve(&self, element: &ElementDescriptor) -> Alternative {
        Alternative {
            name: element.effective_name(&self.property.name, self.model.target_namespace()),
            type_: element
                .effective_type(self.property.shape.item_type())
                .clone(),
            nillable: element.nillable,
            required: element.required,
            default_value: element.default_value.clone(),
        }
    }

    fn conflict(&mut self, first: &'static str, second: &'static str) {
        self.errors
            .push(BindingError::ConflictingStructuralMarking { first, second });
    }

    fn require_collection(&mut self, marking: &'static str) {
        if !self.property.shape.is_collection() {
            self.errors.push(BindingError::UnsupportedMemberShape {
                marking,
                shape: self.property.shape.kind_name(),
            });
        }
    }

    fn reject_map(&mut self, marking: &'static str) {
        if let MemberShape::Map { .. } = self.property.shape {
            self.errors.push(BindingError::UnsupportedMemberShape {
                marking,
                shape: self.property.shape.kind_name(),
            });
        }
    }

    /// Returns `false` and records an error if `type_` is not registered.
    fn check_known(&mut self, type_: &TypeRef) -> bool {
        let known = self.model.is_known(type_);
        if !known && !self.errors.contains(&BindingError::UnknownType(type_.clone())) {
            self.errors.push(BindingError::UnknownType(type_.clone()));
        }
        known
    }

    fn check_alternative_type(&mut self, alternative: &Alternative) {
        if !self.check_known(&alternative.type_) {
            return;
        }
        let expected = self.property.shape.item_type();
        if !self.model.is_assignable(&alternative.type_, expected) {
            self.errors.push(BindingError::IncompatibleAlternativeType {
                name: alternative.name.clone(),
                found: alternative.type_.clone(),
                expected: expected.clone(),
            });
        }
    }

    fn check_unique_names(&mut self, alternatives: &[Alternative]) {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for alternative in alternatives {
            if !seen.insert(&alternative.name) && reported.insert(&alternative.name) {
                self.errors
                    .push(BindingError::DuplicateTagName(alternative.name.clone()));
            }
        }
    }

    /// Names given in code and names derived from property names are not checked on mapping.
    fn check_tag_name(&mut self, name: &QName) {
        let error = BindingError::InvalidTagName(name.clone());
        if !is_ncname(&name.local_name) && !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    fn check_identifiers(&mut self, alternatives: &[Alternative]) {
        let mut reported = HashSet::new();
        for alternative in alternatives {
            let type_ = &alternative.type_;
            if !self.model.has_id_property(type_) && reported.insert(type_) {
                self.errors
                    .push(BindingError::MissingIdentifierOnReferencedType(type_.clone()));
            }
        }
    }
}
