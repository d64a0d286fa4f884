use crate::property::Property;

/// A bean type whose properties are bound to XML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeanType {
    pub name: String,
    /// Name of the bean type this one extends.
    pub base: Option<String>,
    pub properties: Vec<Property>,
}

impl BeanType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            properties: Vec::new(),
        }
    }

    pub fn extending(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The property marked as identifier, not considering base types.
    pub fn id_property(&self) -> Option<&Property> {
        self.properties.iter().find(|p| p.id)
    }
}
