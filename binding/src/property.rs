use crate::{
    element::ElementDescriptor, element_ref::ElementRefs, elements::ElementChoice,
    types::TypeRef, wrapper::ElementWrapper,
};

/// How a property is accessed on its bean.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Accessor {
    #[default]
    Field,
    Getter,
}

/// The declared shape of a property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberShape {
    Single(TypeRef),
    Indexed(TypeRef),
    Array(TypeRef),
    List(TypeRef),
    Set(TypeRef),
    Map { key: TypeRef, value: TypeRef },
}

impl MemberShape {
    /// Indexed properties, arrays, lists and sets. Maps are not collections here.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Self::Indexed(_) | Self::Array(_) | Self::List(_) | Self::Set(_)
        )
    }

    /// The type of a single value, or of one item for collections. For maps this is the value
    /// type.
    pub fn item_type(&self) -> &TypeRef {
        match self {
            Self::Single(t) | Self::Indexed(t) | Self::Array(t) | Self::List(t) | Self::Set(t) => t,
            Self::Map { value, .. } => value,
        }
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Single(_) => "single-valued",
            Self::Indexed(_) => "indexed",
            Self::Array(_) => "array",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map { .. } => "map",
        }
    }
}

/// The structural marking of a property. Exactly one applies to every property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Rendering {
    /// No marking: one element named after the property.
    #[default]
    Default,
    Element(ElementDescriptor),
    Elements(ElementChoice),
    /// Encloses the inner rendering in a wrapper element.
    Wrapped(ElementWrapper, Box<Rendering>),
    ElementRefs(ElementRefs),
}

impl Rendering {
    pub fn wrapped(wrapper: ElementWrapper, inner: Rendering) -> Self {
        Self::Wrapped(wrapper, Box::new(inner))
    }

    pub const fn marking_name(&self) -> &'static str {
        match self {
            Self::Default => "default mapping",
            Self::Element(_) => "element",
            Self::Elements(_) => "elements",
            Self::Wrapped(..) => "element wrapper",
            Self::ElementRefs(_) => "element refs",
        }
    }

    /// The element choice, looking through a wrapper.
    pub fn choice(&self) -> Option<&ElementChoice> {
        match self {
            Self::Elements(choice) => Some(choice),
            Self::Wrapped(_, inner) => inner.choice(),
            _ => None,
        }
    }

    pub fn wrapper(&self) -> Option<&ElementWrapper> {
        match self {
            Self::Wrapped(wrapper, _) => Some(wrapper),
            _ => None,
        }
    }

    /// The rendering inside all wrappers.
    pub fn unwrapped(&self) -> &Rendering {
        let mut rendering = self;
        while let Self::Wrapped(_, inner) = rendering {
            rendering = inner.as_ref();
        }
        rendering
    }
}

/// A field or getter of a bean type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub accessor: Accessor,
    pub shape: MemberShape,
    pub rendering: Rendering,
    /// Marks the identifier of the bean.
    pub id: bool,
    /// Items are rendered as references to the identifier of the target object.
    pub id_ref: bool,
}

impl Property {
    pub fn field(name: impl Into<String>, shape: MemberShape) -> Self {
        Self::new(name, Accessor::Field, shape)
    }

    pub fn getter(name: impl Into<String>, shape: MemberShape) -> Self {
        Self::new(name, Accessor::Getter, shape)
    }

    pub fn new(name: impl Into<String>, accessor: Accessor, shape: MemberShape) -> Self {
        Self {
            name: name.into(),
            accessor,
            shape,
            rendering: Rendering::Default,
            id: false,
            id_ref: false,
        }
    }

    pub fn with_rendering(mut self, rendering: Rendering) -> Self {
        self.rendering = rendering;
        self
    }

    pub fn with_elements(self, choice: ElementChoice) -> Self {
        self.with_rendering(Rendering::Elements(choice))
    }

    pub fn id(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn id_ref(mut self) -> Self {
        self.id_ref = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinType;

    #[test]
    fn collection_shapes() {
        let t = TypeRef::any();
        assert!(MemberShape::List(t.clone()).is_collection());
        assert!(MemberShape::Set(t.clone()).is_collection());
        assert!(MemberShape::Array(t.clone()).is_collection());
        assert!(MemberShape::Indexed(t.clone()).is_collection());
        assert!(!MemberShape::Single(t.clone()).is_collection());
        assert!(!MemberShape::Map {
            key: BuiltinType::String.into(),
            value: t
        }
        .is_collection());
    }

    #[test]
    fn choice_is_found_through_wrapper() {
        let choice = ElementChoice::new([ElementDescriptor::of_type("A", BuiltinType::Int)]);
        let rendering = Rendering::wrapped(
            ElementWrapper::new("bar"),
            Rendering::Elements(choice.clone()),
        );
        assert_eq!(rendering.choice(), Some(&choice));
        assert_eq!(rendering.wrapper().map(|w| w.name.as_str()), Some("bar"));
        assert!(matches!(rendering.unwrapped(), Rendering::Elements(_)));
    }
}
