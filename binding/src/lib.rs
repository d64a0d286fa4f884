//! Metadata for binding bean properties to XML elements.
//!
//! The central declaration is [`ElementChoice`]: a collection property whose items are rendered
//! as one of several (element name, runtime type) alternatives. Declarations are plain data; the
//! [`BindingModel`] they are registered in is the consumer that checks them and decides which
//! alternative an item is rendered as.

pub mod bean;
pub mod builtins;
pub mod content_model;
pub mod element;
pub mod element_ref;
pub mod elements;
pub mod error;
pub mod introspect;
pub mod mapping;
pub mod model;
pub mod property;
pub mod types;
pub mod wrapper;
pub mod xstypes;

mod validation;
mod values;

pub use bean::BeanType;
pub use builtins::BuiltinType;
pub use content_model::Particle;
pub use element::{ElementDescriptor, DEFAULT_NAME};
pub use element_ref::{ElementRef, ElementRefs};
pub use elements::ElementChoice;
pub use error::{BindingError, Diagnostic, Diagnostics, MappingError};
pub use introspect::{Alternative, PropertyInfo, RenderingKind};
pub use model::BindingModel;
pub use property::{Accessor, MemberShape, Property, Rendering};
pub use types::{TypeHierarchy, TypeRef};
pub use wrapper::ElementWrapper;
pub use xstypes::QName;

/// Reads the bean registrations of a binding document. The returned model still has to be
/// checked with [`BindingModel::validate`] or per property with [`BindingModel::introspect`].
pub fn read_bindings(document: &roxmltree::Document) -> Result<BindingModel, MappingError> {
    mapping::map_bindings(document.root_element())
}
