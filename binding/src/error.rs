use std::fmt;

use thiserror::Error;

use crate::{types::TypeRef, xstypes::QName};

/// Errors raised while reading a binding document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("Failed to resolve prefix {0:?} to a namespace URI")]
    NamePrefixNotResolved(String),
    #[error("<{element}> is missing the required attribute {attribute:?}")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
    #[error("invalid value {value:?} for attribute {attribute:?}")]
    InvalidValue {
        attribute: &'static str,
        value: String,
    },
    #[error("{0:?} is not a valid element name")]
    InvalidName(String),
    #[error("{0} is not a supported built-in type")]
    UnknownBuiltin(QName),
    #[error("unexpected element <{found}> inside <{parent}>")]
    UnexpectedElement { parent: String, found: String },
    #[error("property {property:?} declares both {first} and {second}")]
    ConflictingStructuralMarking {
        property: String,
        first: &'static str,
        second: &'static str,
    },
    #[error("the document root must be <bindings>, found <{0}>")]
    UnexpectedRoot(String),
    #[error(transparent)]
    Binding(#[from] BindingError),
}

/// Configuration errors reported by the consumer that introspects a [`BindingModel`].
///
/// [`BindingModel`]: crate::BindingModel
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("{marking} declares no alternatives")]
    EmptyAlternativeSet { marking: &'static str },
    #[error("tag name {0} is declared more than once")]
    DuplicateTagName(QName),
    #[error("{marking} cannot be used on a {shape} member")]
    UnsupportedMemberShape {
        marking: &'static str,
        shape: &'static str,
    },
    #[error("referenced type {0} has no identifier property")]
    MissingIdentifierOnReferencedType(TypeRef),
    #[error("{first} cannot be combined with {second}")]
    ConflictingStructuralMarking {
        first: &'static str,
        second: &'static str,
    },
    #[error("type {0} is not registered")]
    UnknownType(TypeRef),
    #[error("alternative {name} has type {found}, which is not assignable to {expected}")]
    IncompatibleAlternativeType {
        name: QName,
        found: TypeRef,
        expected: TypeRef,
    },
    #[error("element name {0} is not a valid NCName")]
    InvalidTagName(QName),
    #[error("bean type {0:?} is already registered")]
    DuplicateBean(String),
    #[error("bean type {bean:?} declares property {property:?} more than once")]
    DuplicateProperty { bean: String, property: String },
    #[error("base type chain of {0:?} leads back to itself")]
    CircularBaseType(String),
    #[error("bean type {0:?} is not registered")]
    UnknownBean(String),
    #[error("bean type {bean:?} has no property {property:?}")]
    UnknownProperty { bean: String, property: String },
    #[error("no alternative accepts values of type {0}")]
    NoAlternativeForType(TypeRef),
}

/// A [`BindingError`] together with the member it was found on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub bean: String,
    pub property: Option<String>,
    pub error: BindingError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.property {
            Some(property) => write!(f, "{}.{}: {}", self.bean, property, self.error),
            None => write!(f, "{}: {}", self.bean, self.error),
        }
    }
}

/// All configuration errors found in one introspection pass. Never empty.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{} binding error(s), first: {}", .0.len(), .0[0])]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Returns `None` if `diagnostics` is empty.
    pub(crate) fn from_vec(diagnostics: Vec<Diagnostic>) -> Option<Self> {
        (!diagnostics.is_empty()).then_some(Self(diagnostics))
    }

    pub(crate) fn single(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }

    /// `diagnostics` must not be empty.
    pub(crate) fn from_nonempty(diagnostics: Vec<Diagnostic>) -> Self {
        debug_assert!(!diagnostics.is_empty());
        Self(diagnostics)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &BindingError> {
        self.0.iter().map(|d| &d.error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
