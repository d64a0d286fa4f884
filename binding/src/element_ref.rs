use crate::{
    types::TypeRef,
    xstypes::{QName, Sequence},
};

/// A reference to a global element, rendered under its own name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementRef {
    pub name: QName,
    /// `None` means the item type of the annotated member.
    pub type_: Option<TypeRef>,
}

impl ElementRef {
    pub fn new(name: QName) -> Self {
        Self { name, type_: None }
    }

    pub fn with_type(mut self, type_: impl Into<TypeRef>) -> Self {
        self.type_ = Some(type_.into());
        self
    }
}

/// The reference-list marking: each item of a collection is rendered as one of the referenced
/// global elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementRefs {
    refs: Sequence<ElementRef>,
}

impl ElementRefs {
    pub fn new(refs: impl IntoIterator<Item = ElementRef>) -> Self {
        Self {
            refs: refs.into_iter().collect(),
        }
    }

    pub fn refs(&self) -> &[ElementRef] {
        &self.refs
    }
}
