use std::collections::HashMap;

use lazy_static::lazy_static;

use super::xstypes::QName;

// Namespaces used by the specification (pt. 1, §1.3.1)
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Built-in datatypes a runtime type can map to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    AnyType,
    AnySimpleType,
    String,
    Boolean,
    Decimal,
    Integer,
    Float,
    Double,
    Long,
    Int,
    Short,
    Byte,
    UnsignedLong,
    UnsignedInt,
    UnsignedShort,
    UnsignedByte,
    DateTime,
    Date,
    Time,
    Duration,
    HexBinary,
    Base64Binary,
    AnyURI,
    QName,
    Id,
    IdRef,
}

const ALL_BUILTINS: &[BuiltinType] = &[
    BuiltinType::AnyType,
    BuiltinType::AnySimpleType,
    BuiltinType::String,
    BuiltinType::Boolean,
    BuiltinType::Decimal,
    BuiltinType::Integer,
    BuiltinType::Float,
    BuiltinType::Double,
    BuiltinType::Long,
    BuiltinType::Int,
    BuiltinType::Short,
    BuiltinType::Byte,
    BuiltinType::UnsignedLong,
    BuiltinType::UnsignedInt,
    BuiltinType::UnsignedShort,
    BuiltinType::UnsignedByte,
    BuiltinType::DateTime,
    BuiltinType::Date,
    BuiltinType::Time,
    BuiltinType::Duration,
    BuiltinType::HexBinary,
    BuiltinType::Base64Binary,
    BuiltinType::AnyURI,
    BuiltinType::QName,
    BuiltinType::Id,
    BuiltinType::IdRef,
];

lazy_static! {
    static ref BUILTINS_BY_NAME: HashMap<&'static str, BuiltinType> = ALL_BUILTINS
        .iter()
        .map(|builtin| (builtin.local_name(), *builtin))
        .collect();
}

impl BuiltinType {
    pub const fn local_name(self) -> &'static str {
        match self {
            Self::AnyType => "anyType",
            Self::AnySimpleType => "anySimpleType",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Double => "double",
            Self::Long => "long",
            Self::Int => "int",
            Self::Short => "short",
            Self::Byte => "byte",
            Self::UnsignedLong => "unsignedLong",
            Self::UnsignedInt => "unsignedInt",
            Self::UnsignedShort => "unsignedShort",
            Self::UnsignedByte => "unsignedByte",
            Self::DateTime => "dateTime",
            Self::Date => "date",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::HexBinary => "hexBinary",
            Self::Base64Binary => "base64Binary",
            Self::AnyURI => "anyURI",
            Self::QName => "QName",
            Self::Id => "ID",
            Self::IdRef => "IDREF",
        }
    }

    pub fn name(self) -> QName {
        QName::with_namespace(XS_NAMESPACE, self.local_name())
    }

    /// Looks up a built-in by its qualified name. Names outside the XSD namespace never match.
    pub fn from_name(name: &QName) -> Option<Self> {
        if name.namespace_name.as_deref() != Some(XS_NAMESPACE) {
            return None;
        }
        BUILTINS_BY_NAME.get(name.local_name.as_str()).copied()
    }

    /// The type this built-in is derived from, following the XSD built-in hierarchy (pt. 2,
    /// §3.4). Only `xs:anyType` has no base.
    pub const fn base(self) -> Option<Self> {
        match self {
            Self::AnyType => None,
            Self::AnySimpleType => Some(Self::AnyType),
            Self::String
            | Self::Boolean
            | Self::Decimal
            | Self::Float
            | Self::Double
            | Self::DateTime
            | Self::Date
            | Self::Time
            | Self::Duration
            | Self::HexBinary
            | Self::Base64Binary
            | Self::AnyURI
            | Self::QName => Some(Self::AnySimpleType),
            Self::Integer => Some(Self::Decimal),
            Self::Long => Some(Self::Integer),
            Self::Int => Some(Self::Long),
            Self::Short => Some(Self::Int),
            Self::Byte => Some(Self::Short),
            // nonNegativeInteger is not modelled, unsignedLong derives from integer here
            Self::UnsignedLong => Some(Self::Integer),
            Self::UnsignedInt => Some(Self::UnsignedLong),
            Self::UnsignedShort => Some(Self::UnsignedInt),
            Self::UnsignedByte => Some(Self::UnsignedShort),
            // NCName and Name are not modelled either
            Self::Id | Self::IdRef => Some(Self::String),
        }
    }

    /// Whether values of `self` may appear where `target` is expected.
    pub fn is_derived_from(self, target: Self) -> bool {
        let mut current = Some(self);
        while let Some(type_) = current {
            if type_ == target {
                return true;
            }
            current = type_.base();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let int = QName::with_namespace(XS_NAMESPACE, "int");
        assert_eq!(BuiltinType::from_name(&int), Some(BuiltinType::Int));
        assert_eq!(BuiltinType::Int.name(), int);
    }

    #[test]
    fn lookup_requires_xsd_namespace() {
        assert_eq!(BuiltinType::from_name(&QName::local("int")), None);
        let foreign = QName::with_namespace("urn:other", "int");
        assert_eq!(BuiltinType::from_name(&foreign), None);
    }

    #[test]
    fn every_builtin_is_registered_by_name() {
        for builtin in ALL_BUILTINS {
            assert_eq!(BuiltinType::from_name(&builtin.name()), Some(*builtin));
        }
    }

    #[test]
    fn derivation_follows_hierarchy() {
        assert!(BuiltinType::Byte.is_derived_from(BuiltinType::Integer));
        assert!(BuiltinType::Float.is_derived_from(BuiltinType::AnyType));
        assert!(BuiltinType::Id.is_derived_from(BuiltinType::String));
        assert!(!BuiltinType::Float.is_derived_from(BuiltinType::Double));
        assert!(!BuiltinType::AnyType.is_derived_from(BuiltinType::AnySimpleType));
    }
}
