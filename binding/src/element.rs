use heck::ToLowerCamelCase;

use crate::{
    types::TypeRef,
    xstypes::{AnyURI, NCName, QName},
};

/// Marker value for names derived from the annotated property.
pub const DEFAULT_NAME: &str = "##default";

/// Maps a property, or one alternative of an [`ElementChoice`](crate::ElementChoice), to an
/// element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementDescriptor {
    /// Local name of the element, or [`DEFAULT_NAME`].
    pub name: NCName,
    /// `None` selects the target namespace of the binding; `Some("")` means no namespace.
    pub namespace: Option<AnyURI>,
    pub nillable: bool,
    pub required: bool,
    pub default_value: Option<String>,
    /// `None` means the item type of the annotated member.
    pub type_: Option<TypeRef>,
}

impl ElementDescriptor {
    pub fn new(name: impl Into<NCName>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            nillable: false,
            required: false,
            default_value: None,
            type_: None,
        }
    }

    /// Shorthand for `new(name).with_type(type_)`, the usual shape of a choice alternative.
    pub fn of_type(name: impl Into<NCName>, type_: impl Into<TypeRef>) -> Self {
        Self::new(name).with_type(type_)
    }

    pub fn with_type(mut self, type_: impl Into<TypeRef>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<AnyURI>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn nillable(mut self) -> Self {
        self.nillable = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The element name after resolving [`DEFAULT_NAME`] and the default namespace.
    pub fn effective_name(&self, property_name: &str, target_namespace: Option<&str>) -> QName {
        effective_name(&self.name, self.namespace.as_deref(), property_name, target_namespace)
    }

    /// The declared type, or `item_type` when none was declared.
    pub fn effective_type<'a>(&'a self, item_type: &'a TypeRef) -> &'a TypeRef {
        self.type_.as_ref().unwrap_or(item_type)
    }
}

/// Resolution shared by elements and element wrappers.
pub(crate) fn effective_name(
    name: &str,
    namespace: Option<&str>,
    property_name: &str,
    target_namespace: Option<&str>,
) -> QName {
    let local_name = if name == DEFAULT_NAME {
        property_name.to_lower_camel_case()
    } else {
        name.to_owned()
    };
    let namespace = match namespace {
        None => target_namespace,
        Some(DEFAULT_NAME) => target_namespace,
        Some("") => None,
        Some(namespace) => Some(namespace),
    };
    QName::with_optional_namespace(namespace, local_name)
}
