use crate::{element::ElementDescriptor, xstypes::Sequence};

/// Declares that a collection property holds items of several kinds, each rendered as one of a
/// closed, ordered set of elements.
///
/// ```text
/// Foo.items = [1, 2.5]     with alternatives (A: xs:int), (B: xs:float)
///
/// <A>1</A>
/// <B>2.5</B>
/// ```
///
/// The descriptor is a plain carrier: the alternatives are stored exactly as supplied and are not
/// checked here. Emptiness, duplicate tag names, the shape of the annotated member and the
/// compatibility with an identifier reference are checked when the owning
/// [`BindingModel`](crate::BindingModel) introspects the property.
///
/// The order of the alternatives only breaks ties between alternatives that accept the same
/// runtime type and fixes the order of the particles in the content model. Items are always
/// rendered in the order of the collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementChoice {
    alternatives: Sequence<ElementDescriptor>,
}

impl ElementChoice {
    pub fn new(alternatives: impl IntoIterator<Item = ElementDescriptor>) -> Self {
        Self {
            alternatives: alternatives.into_iter().collect(),
        }
    }

    /// The alternatives in declaration order.
    pub fn alternatives(&self) -> &[ElementDescriptor] {
        &self.alternatives
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

impl FromIterator<ElementDescriptor> for ElementChoice {
    fn from_iter<T: IntoIterator<Item = ElementDescriptor>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtins::BuiltinType, types::TypeRef};

    #[test]
    fn alternatives_keep_declaration_order() {
        let choice = ElementChoice::new([
            ElementDescriptor::of_type("B", BuiltinType::Float),
            ElementDescriptor::of_type("A", BuiltinType::Int),
            ElementDescriptor::of_type("C", TypeRef::bean("Foo")),
        ]);
        let names = choice
            .alternatives()
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["B", "A", "C"]);
    }

    #[test]
    fn alternatives_read_back_unchanged() {
        let supplied = vec![
            ElementDescriptor::of_type("A", BuiltinType::Int).nillable(),
            ElementDescriptor::of_type("B", BuiltinType::Float)
                .with_namespace("urn:b")
                .with_default_value("0.0"),
        ];
        let choice = supplied.iter().cloned().collect::<ElementChoice>();
        assert_eq!(choice.alternatives(), supplied.as_slice());
        assert_eq!(choice.len(), 2);
    }

    #[test]
    fn empty_choice_is_representable() {
        // rejected later by introspection, not here
        let choice = ElementChoice::new([]);
        assert!(choice.is_empty());
    }
}
