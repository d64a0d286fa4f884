use crate::{
    builtins::BuiltinType,
    error::MappingError,
    property::Accessor,
    types::TypeRef,
    xstypes::{is_ncname, QName},
};
use roxmltree::Node;

/// Conversion of an attribute's text to its value.
pub trait ActualValue<'a>: Sized {
    fn convert(src: &'a str, attribute: &'static str, parent: Node) -> Result<Self, MappingError>;
}

fn invalid(attribute: &'static str, value: &str) -> MappingError {
    MappingError::InvalidValue {
        attribute,
        value: value.to_owned(),
    }
}

impl<'a> ActualValue<'a> for &'a str {
    fn convert(src: &'a str, _attribute: &'static str, _parent: Node) -> Result<Self, MappingError> {
        Ok(src)
    }
}

impl ActualValue<'_> for String {
    fn convert(src: &str, _attribute: &'static str, _parent: Node) -> Result<Self, MappingError> {
        Ok(src.to_string())
    }
}

impl ActualValue<'_> for QName {
    fn convert(src: &str, _attribute: &'static str, parent: Node) -> Result<Self, MappingError> {
        QName::parse(src.trim(), parent)
    }
}

impl ActualValue<'_> for bool {
    fn convert(src: &str, attribute: &'static str, _parent: Node) -> Result<Self, MappingError> {
        match src.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(invalid(attribute, src)),
        }
    }
}

impl ActualValue<'_> for Accessor {
    fn convert(src: &str, attribute: &'static str, _parent: Node) -> Result<Self, MappingError> {
        match src.trim() {
            "field" => Ok(Self::Field),
            "getter" => Ok(Self::Getter),
            _ => Err(invalid(attribute, src)),
        }
    }
}

/// Type names: built-ins live in the XSD namespace, unprefixed names refer to bean types.
impl ActualValue<'_> for TypeRef {
    fn convert(src: &str, attribute: &'static str, parent: Node) -> Result<Self, MappingError> {
        let name = QName::parse_type_name(src.trim(), parent)?;
        match name.namespace_name {
            None if is_ncname(&name.local_name) => Ok(TypeRef::Bean(name.local_name)),
            None => Err(invalid(attribute, src)),
            Some(_) => BuiltinType::from_name(&name)
                .map(TypeRef::Builtin)
                .ok_or(MappingError::UnknownBuiltin(name)),
        }
    }
}

pub fn actual_value<'a, T: ActualValue<'a>>(
    x: &'a str,
    attribute: &'static str,
    parent: Node,
) -> Result<T, MappingError> {
    T::convert(x, attribute, parent)
}

/// The actual value of `attribute` on `node`, if present.
pub fn optional_attribute<'a, T: ActualValue<'a>>(
    node: Node<'a, '_>,
    attribute: &'static str,
) -> Result<Option<T>, MappingError> {
    node.attribute(attribute)
        .map(|v| actual_value(v, attribute, node))
        .transpose()
}

pub fn required_attribute<'a, T: ActualValue<'a>>(
    node: Node<'a, '_>,
    attribute: &'static str,
) -> Result<T, MappingError> {
    optional_attribute(node, attribute)?.ok_or_else(|| MappingError::MissingAttribute {
        element: node.tag_name().name().to_owned(),
        attribute,
    })
}
