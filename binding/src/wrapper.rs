use crate::{
    element::effective_name,
    xstypes::{AnyURI, NCName, QName},
};

/// An element enclosing all rendered items of a collection property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementWrapper {
    pub name: NCName,
    pub namespace: Option<AnyURI>,
    pub nillable: bool,
    pub required: bool,
}

impl ElementWrapper {
    pub fn new(name: impl Into<NCName>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            nillable: false,
            required: false,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<AnyURI>) -> Self {
        self.namespace = Some(namespace.into());
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

    pub fn effective_name(&self, property_name: &str, target_namespace: Option<&str>) -> QName {
        effective_name(&self.name, self.namespace.as_deref(), property_name, target_namespace)
    }
}
