use std::fmt;

use crate::builtins::BuiltinType;

/// The runtime type associated with an element: either a built-in datatype or a registered bean
/// type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Builtin(BuiltinType),
    Bean(String),
}

impl TypeRef {
    pub fn bean(name: impl Into<String>) -> Self {
        Self::Bean(name.into())
    }

    pub const fn any() -> Self {
        Self::Builtin(BuiltinType::AnyType)
    }
}

impl From<BuiltinType> for TypeRef {
    fn from(builtin: BuiltinType) -> Self {
        Self::Builtin(builtin)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => write!(f, "xs:{}", builtin.local_name()),
            Self::Bean(name) => write!(f, "{name}"),
        }
    }
}

/// Answers subtype questions between runtime types.
pub trait TypeHierarchy {
    /// Whether a value whose runtime type is `from` may be stored where `to` is expected.
    fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool;
}
