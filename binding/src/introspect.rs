use log::trace;

use crate::{
    builtins::BuiltinType,
    content_model::{Compositor, ElementContent, ElementParticle, MaxOccurs, Particle},
    error::BindingError,
    property::MemberShape,
    types::{TypeHierarchy, TypeRef},
    xstypes::QName,
};

/// One element a property's items can be rendered as, with names and types resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alternative {
    pub name: QName,
    pub type_: TypeRef,
    pub nillable: bool,
    pub required: bool,
    pub default_value: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderingKind {
    Default,
    Element,
    Elements,
    ElementRefs,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedWrapper {
    pub name: QName,
    pub nillable: bool,
    pub required: bool,
}

/// The checked view of a property, as produced by
/// [`BindingModel::introspect`](crate::BindingModel::introspect).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyInfo {
    pub bean: String,
    pub property: String,
    pub shape: MemberShape,
    pub kind: RenderingKind,
    pub wrapper: Option<ResolvedWrapper>,
    /// Never empty; in declaration order.
    pub alternatives: Vec<Alternative>,
    pub id_ref: bool,
}

impl PropertyInfo {
    /// Picks the alternative an item of type `runtime_type` is rendered as.
    ///
    /// An alternative declared with exactly `runtime_type` wins. Otherwise the first alternative,
    /// in declaration order, whose type accepts `runtime_type` is used.
    pub fn select_for_type(
        &self,
        hierarchy: &impl TypeHierarchy,
        runtime_type: &TypeRef,
    ) -> Option<&Alternative> {
        let selected = self
            .alternatives
            .iter()
            .find(|a| &a.type_ == runtime_type)
            .or_else(|| {
                self.alternatives
                    .iter()
                    .find(|a| hierarchy.is_assignable(runtime_type, &a.type_))
            });
        trace!(
            "{}.{}: {runtime_type} selects {:?}",
            self.bean,
            self.property,
            selected.map(|a| a.name.to_string())
        );
        selected
    }

    /// Picks the alternative whose element name is `tag`, for reading an item back.
    pub fn select_for_tag(&self, tag: &QName) -> Option<&Alternative> {
        self.alternatives.iter().find(|a| &a.name == tag)
    }

    /// Selects an alternative for every item of a collection. The result follows the order of
    /// `runtime_types`, not the declaration order of the alternatives.
    pub fn plan<'a, 't>(
        &'a self,
        hierarchy: &impl TypeHierarchy,
        runtime_types: impl IntoIterator<Item = &'t TypeRef>,
    ) -> Result<Vec<&'a Alternative>, BindingError> {
        runtime_types
            .into_iter()
            .map(|runtime_type| {
                self.select_for_type(hierarchy, runtime_type)
                    .ok_or_else(|| BindingError::NoAlternativeForType(runtime_type.clone()))
            })
            .collect()
    }

    /// The particle this property contributes to the content model of its bean.
    pub fn content_model(&self) -> Particle {
        let collection = self.shape.is_collection();
        let particle = match self.kind {
            RenderingKind::Elements | RenderingKind::ElementRefs => {
                let particles = self
                    .alternatives
                    .iter()
                    .map(|a| Particle::element(1, MaxOccurs::Count(1), self.element_particle(a)))
                    .collect();
                Particle::group(0, MaxOccurs::Unbounded, Compositor::Choice, particles)
            }
            RenderingKind::Default | RenderingKind::Element => {
                let alternative = &self.alternatives[0];
                let (min_occurs, max_occurs) = if collection {
                    (0, MaxOccurs::Unbounded)
                } else {
                    (u64::from(alternative.required), MaxOccurs::Count(1))
                };
                Particle::element(min_occurs, max_occurs, self.element_particle(alternative))
            }
        };

        match &self.wrapper {
            Some(wrapper) => Particle::element(
                u64::from(wrapper.required),
                MaxOccurs::Count(1),
                ElementParticle {
                    name: wrapper.name.clone(),
                    content: ElementContent::Anonymous(Box::new(particle)),
                    nillable: wrapper.nillable,
                    default_value: None,
                },
            ),
            None => particle,
        }
    }

    fn element_particle(&self, alternative: &Alternative) -> ElementParticle {
        // referenced objects are rendered by their identifier
        let type_ = if self.id_ref {
            TypeRef::Builtin(BuiltinType::IdRef)
        } else {
            alternative.type_.clone()
        };
        ElementParticle {
            name: alternative.name.clone(),
            content: ElementContent::Type(type_),
            nillable: alternative.nillable,
            default_value: alternative.default_value.clone(),
        }
    }
}
