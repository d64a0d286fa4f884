use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::{
    bean::BeanType,
    builtins::BuiltinType,
    content_model::{Compositor, MaxOccurs, Particle},
    error::{BindingError, Diagnostic, Diagnostics},
    introspect::PropertyInfo,
    types::{TypeHierarchy, TypeRef},
    validation,
    xstypes::AnyURI,
};

/// The registered bean types of one binding, and the consumer that checks how their properties
/// are rendered.
///
/// Properties are checked lazily by [`introspect`](Self::introspect) or all at once by
/// [`validate`](Self::validate). Successful introspection results are cached per property.
#[derive(Debug, Default)]
pub struct BindingModel {
    target_namespace: Option<AnyURI>,
    beans: Vec<BeanType>,
    index: HashMap<String, usize>,
    cache: RwLock<HashMap<(String, String), Arc<PropertyInfo>>>,
}

impl BindingModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_namespace(mut self, namespace: impl Into<AnyURI>) -> Self {
        self.target_namespace = Some(namespace.into());
        self
    }

    /// The namespace of elements whose descriptor does not name one.
    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    pub fn register_bean(&mut self, bean: BeanType) -> Result<(), BindingError> {
        if self.index.contains_key(&bean.name) {
            return Err(BindingError::DuplicateBean(bean.name));
        }
        let mut names = HashSet::new();
        if let Some(property) = bean.properties.iter().find(|p| !names.insert(&p.name)) {
            return Err(BindingError::DuplicateProperty {
                bean: bean.name.clone(),
                property: property.name.clone(),
            });
        }
        debug!(
            "Registering bean type {:?} with {} properties",
            bean.name,
            bean.properties.len()
        );
        self.index.insert(bean.name.clone(), self.beans.len());
        self.beans.push(bean);
        // new types can change assignability of cached results
        self.cache = RwLock::default();
        Ok(())
    }

    pub fn bean(&self, name: &str) -> Option<&BeanType> {
        self.index.get(name).map(|&i| &self.beans[i])
    }

    /// Registered bean types, in registration order.
    pub fn beans(&self) -> impl Iterator<Item = &BeanType> {
        self.beans.iter()
    }

    pub fn is_known(&self, type_: &TypeRef) -> bool {
        match type_ {
            TypeRef::Builtin(_) => true,
            TypeRef::Bean(name) => self.index.contains_key(name),
        }
    }

    /// `name` and its registered base types, most derived first. Stops at unregistered bases and
    /// at cycles.
    fn bean_chain(&self, name: &str) -> Vec<&BeanType> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.bean(name);
        while let Some(bean) = current {
            if !seen.insert(bean.name.as_str()) {
                break;
            }
            chain.push(bean);
            current = bean.base.as_deref().and_then(|base| self.bean(base));
        }
        chain
    }

    /// Whether following the base types of `name` leads back to `name`.
    fn has_circular_base(&self, name: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = self.bean(name).and_then(|bean| bean.base.as_deref());
        while let Some(base) = current {
            if base == name {
                return true;
            }
            if !seen.insert(base) {
                return false;
            }
            current = self.bean(base).and_then(|bean| bean.base.as_deref());
        }
        false
    }

    /// Whether objects of `type_` expose an identifier property, possibly inherited.
    pub fn has_id_property(&self, type_: &TypeRef) -> bool {
        match type_ {
            TypeRef::Builtin(_) => false,
            TypeRef::Bean(name) => self
                .bean_chain(name)
                .iter()
                .any(|bean| bean.id_property().is_some()),
        }
    }

    /// Checks a single property, reusing the cached result if it was checked before.
    pub fn introspect(&self, bean: &str, property: &str) -> Result<Arc<PropertyInfo>, Diagnostics> {
        let key = (bean.to_owned(), property.to_owned());
        if let Some(info) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(info));
        }

        let diagnostic = |property: Option<&str>, error| Diagnostic {
            bean: bean.to_owned(),
            property: property.map(ToOwned::to_owned),
            error,
        };
        let Some(bean_type) = self.bean(bean) else {
            let error = BindingError::UnknownBean(bean.to_owned());
            return Err(Diagnostics::single(diagnostic(None, error)));
        };
        let Some(property_def) = bean_type.property(property) else {
            let error = BindingError::UnknownProperty {
                bean: bean.to_owned(),
                property: property.to_owned(),
            };
            return Err(Diagnostics::single(diagnostic(None, error)));
        };

        match validation::check_property(self, bean_type, property_def) {
            Ok(info) => {
                debug!("Caching introspection result for {bean}.{property}");
                let info = Arc::new(info);
                self.cache
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key, Arc::clone(&info));
                Ok(info)
            }
            Err(errors) => Err(Diagnostics::from_nonempty(
                errors
                    .into_iter()
                    .map(|error| diagnostic(Some(property), error))
                    .collect(),
            )),
        }
    }

    /// Checks every property of every registered bean type and the base types of the beans.
    pub fn validate(&self) -> Result<(), Diagnostics> {
        let mut diagnostics = Vec::new();
        for bean in &self.beans {
            if let Some(base) = &bean.base {
                let base = TypeRef::bean(base);
                if !self.is_known(&base) {
                    diagnostics.push(Diagnostic {
                        bean: bean.name.clone(),
                        property: None,
                        error: BindingError::UnknownType(base),
                    });
                }
            }
            if self.has_circular_base(&bean.name) {
                diagnostics.push(Diagnostic {
                    bean: bean.name.clone(),
                    property: None,
                    error: BindingError::CircularBaseType(bean.name.clone()),
                });
            }
            for property in &bean.properties {
                if let Err(errors) = self.introspect(&bean.name, &property.name) {
                    diagnostics.extend(errors);
                }
            }
        }
        match Diagnostics::from_vec(diagnostics) {
            Some(diagnostics) => Err(diagnostics),
            None => Ok(()),
        }
    }

    /// The checked properties of `bean` that render an element choice, in declaration order.
    pub fn choice_properties(&self, bean: &str) -> Result<Vec<Arc<PropertyInfo>>, Diagnostics> {
        let Some(bean_type) = self.bean(bean) else {
            return Err(Diagnostics::single(Diagnostic {
                bean: bean.to_owned(),
                property: None,
                error: BindingError::UnknownBean(bean.to_owned()),
            }));
        };
        bean_type
            .properties
            .iter()
            .filter(|p| p.rendering.choice().is_some())
            .map(|p| self.introspect(bean, &p.name))
            .collect()
    }

    /// The content model of the complex type `bean` is bound to: a sequence of the particles of
    /// its properties, inherited properties first.
    pub fn content_model(&self, bean: &str) -> Result<Particle, Diagnostics> {
        if self.bean(bean).is_none() {
            return Err(Diagnostics::single(Diagnostic {
                bean: bean.to_owned(),
                property: None,
                error: BindingError::UnknownBean(bean.to_owned()),
            }));
        }

        let mut particles = Vec::new();
        let mut diagnostics = Vec::new();
        for bean_type in self.bean_chain(bean).into_iter().rev() {
            for property in &bean_type.properties {
                match self.introspect(&bean_type.name, &property.name) {
                    Ok(info) => particles.push(info.content_model()),
                    Err(errors) => diagnostics.extend(errors),
                }
            }
        }
        match Diagnostics::from_vec(diagnostics) {
            Some(diagnostics) => Err(diagnostics),
            None => Ok(Particle::group(
                1,
                MaxOccurs::Count(1),
                Compositor::Sequence,
                particles,
            )),
        }
    }
}

impl TypeHierarchy for BindingModel {
    fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
        match (from, to) {
            (_, TypeRef::Builtin(BuiltinType::AnyType)) => true,
            (TypeRef::Builtin(from), TypeRef::Builtin(to)) => from.is_derived_from(*to),
            (TypeRef::Bean(from), TypeRef::Bean(to)) => {
                self.bean_chain(from).iter().any(|bean| &bean.name == to)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        element::ElementDescriptor,
        elements::ElementChoice,
        property::{MemberShape, Property, Rendering},
    };

    fn int_or_float() -> ElementChoice {
        ElementChoice::new([
            ElementDescriptor::of_type("A", BuiltinType::Int),
            ElementDescriptor::of_type("B", BuiltinType::Float),
        ])
    }

    #[test]
    fn property_names_must_be_unique_within_a_bean() {
        let bean = BeanType::new("Foo")
            .with_property(
                Property::field("items", MemberShape::List(TypeRef::any())).with_elements(int_or_float()),
            )
            .with_property(
                Property::field("items", MemberShape::Single(BuiltinType::Int.into()))
                    .with_elements(ElementChoice::new([])),
            );
        let mut model = BindingModel::new();
        assert_eq!(
            model.register_bean(bean),
            Err(BindingError::DuplicateProperty {
                bean: "Foo".into(),
                property: "items".into(),
            })
        );
        assert!(model.bean("Foo").is_none());
        model.validate().unwrap();
    }

    #[test]
    fn circular_base_types_are_reported() {
        let mut model = BindingModel::new();
        model.register_bean(BeanType::new("A").extending("B")).unwrap();
        model.register_bean(BeanType::new("B").extending("A")).unwrap();
        model.register_bean(BeanType::new("C").extending("A")).unwrap();

        let diagnostics = model.validate().unwrap_err();
        assert_eq!(
            diagnostics.errors().collect::<Vec<_>>(),
            [
                &BindingError::CircularBaseType("A".into()),
                &BindingError::CircularBaseType("B".into()),
            ]
        );
        assert!(model.is_assignable(&TypeRef::bean("C"), &TypeRef::bean("B")));
    }

    #[test]
    fn bean_content_model_is_a_sequence_of_properties() {
        let mut model = BindingModel::new();
        model
            .register_bean(BeanType::new("Document").with_property(
                Property::field("id", MemberShape::Single(BuiltinType::String.into()))
                    .with_rendering(Rendering::Element(ElementDescriptor::new("id").required())),
            ))
            .unwrap();
        model
            .register_bean(
                BeanType::new("Invoice").extending("Document").with_property(
                    Property::field("items", MemberShape::List(TypeRef::any()))
                        .with_elements(int_or_float()),
                ),
            )
            .unwrap();

        let particle = model.content_model("Invoice").unwrap();
        assert_eq!(
            particle.to_string(),
            "sequence [1..1]\n  element id [1..1]: xs:string\n  choice [0..unbounded]\n    element A [1..1]: xs:int\n    element B [1..1]: xs:float\n"
        );
        assert_eq!(particle.effective_total_range(), (1, MaxOccurs::Unbounded));
        assert!(!particle.is_emptiable());

        let base = model.content_model("Document").unwrap();
        assert_eq!(base.effective_total_range(), (1, MaxOccurs::Count(1)));
    }

    #[test]
    fn choice_only_bean_is_emptiable() {
        let mut model = BindingModel::new();
        model
            .register_bean(BeanType::new("Foo").with_property(
                Property::field("items", MemberShape::List(TypeRef::any())).with_elements(int_or_float()),
            ))
            .unwrap();
        assert!(model.content_model("Foo").unwrap().is_emptiable());
    }

    #[test]
    fn bean_content_model_reports_invalid_properties() {
        let mut model = BindingModel::new();
        model
            .register_bean(BeanType::new("Foo").with_property(
                Property::field("total", MemberShape::Single(BuiltinType::Decimal.into()))
                    .with_elements(int_or_float()),
            ))
            .unwrap();
        let diagnostics = model.content_model("Foo").unwrap_err();
        assert!(diagnostics
            .iter()
            .all(|d| d.property.as_deref() == Some("total")));
        assert!(diagnostics
            .errors()
            .any(|e| matches!(e, BindingError::UnsupportedMemberShape { .. })));
        assert!(matches!(
            model.content_model("Bar").unwrap_err().errors().next(),
            Some(BindingError::UnknownBean(name)) if name == "Bar"
        ));
    }
}
