//! Reads bean registrations from a binding document.
//!
//! ```xml
//! <bindings xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:foo">
//!   <bean name="Foo">
//!     <property name="items" shape="list">
//!       <elementWrapper name="bar"/>
//!       <elements>
//!         <element name="A" type="xs:int"/>
//!         <element name="B" type="xs:float"/>
//!       </elements>
//!     </property>
//!   </bean>
//! </bindings>
//! ```

use log::{debug, warn};
use roxmltree::Node;

use crate::{
    bean::BeanType,
    element::{ElementDescriptor, DEFAULT_NAME},
    element_ref::{ElementRef, ElementRefs},
    elements::ElementChoice,
    error::MappingError,
    model::BindingModel,
    property::{Accessor, MemberShape, Property, Rendering},
    types::TypeRef,
    values::{optional_attribute, required_attribute},
    wrapper::ElementWrapper,
    xstypes::{is_ncname, QName},
};

pub const BINDINGS_TAG: &str = "bindings";
const BEAN_TAG: &str = "bean";
const PROPERTY_TAG: &str = "property";
const ELEMENT_TAG: &str = "element";
const ELEMENTS_TAG: &str = "elements";
const ELEMENT_WRAPPER_TAG: &str = "elementWrapper";
const ELEMENT_REFS_TAG: &str = "elementRefs";
const ELEMENT_REF_TAG: &str = "elementRef";

fn child_elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

fn unexpected(parent: Node, found: Node) -> MappingError {
    MappingError::UnexpectedElement {
        parent: parent.tag_name().name().to_owned(),
        found: found.tag_name().name().to_owned(),
    }
}

/// Maps the `<bindings>` root element to a model. The model is not validated.
pub fn map_bindings(bindings: Node) -> Result<BindingModel, MappingError> {
    if bindings.tag_name().name() != BINDINGS_TAG {
        return Err(MappingError::UnexpectedRoot(
            bindings.tag_name().name().to_owned(),
        ));
    }

    let mut model = BindingModel::new();
    // {target namespace} The targetNamespace [attribute], or absent.
    if let Some(namespace) = optional_attribute::<String>(bindings, "targetNamespace")? {
        model = model.with_target_namespace(namespace);
    }

    for child in child_elements(bindings) {
        match child.tag_name().name() {
            BEAN_TAG => model.register_bean(map_bean(child)?)?,
            other => warn!("Ignoring unknown element <{other}> in binding document"),
        }
    }
    debug!("Mapped {} bean types", model.beans().count());
    Ok(model)
}

/// A `name` attribute that must be an NCName.
fn required_ncname(node: Node) -> Result<String, MappingError> {
    let name: String = required_attribute(node, "name")?;
    if !is_ncname(&name) {
        return Err(MappingError::InvalidName(name));
    }
    Ok(name)
}

fn map_bean(bean: Node) -> Result<BeanType, MappingError> {
    let name = required_ncname(bean)?;
    let mut bean_type = BeanType::new(name);
    bean_type.base = optional_attribute(bean, "base")?;

    for child in child_elements(bean) {
        match child.tag_name().name() {
            PROPERTY_TAG => bean_type.properties.push(map_property(child)?),
            _ => return Err(unexpected(bean, child)),
        }
    }
    Ok(bean_type)
}

fn map_shape(property: Node) -> Result<MemberShape, MappingError> {
    // {item type} The itemType [attribute], otherwise xs:anyType.
    let item_type = optional_attribute::<TypeRef>(property, "itemType")?.unwrap_or(TypeRef::any());
    let shape = optional_attribute::<&str>(property, "shape")?.unwrap_or("single");
    Ok(match shape.trim() {
        "single" => MemberShape::Single(item_type),
        "indexed" => MemberShape::Indexed(item_type),
        "array" => MemberShape::Array(item_type),
        "list" => MemberShape::List(item_type),
        "set" => MemberShape::Set(item_type),
        "map" => MemberShape::Map {
            key: optional_attribute(property, "keyType")?.unwrap_or(TypeRef::any()),
            value: item_type,
        },
        _ => {
            return Err(MappingError::InvalidValue {
                attribute: "shape",
                value: shape.to_owned(),
            })
        }
    })
}

fn map_property(property: Node) -> Result<Property, MappingError> {
    let name = required_ncname(property)?;
    let accessor = optional_attribute(property, "accessor")?.unwrap_or(Accessor::Field);
    let shape = map_shape(property)?;

    let mut marking: Option<(&'static str, Rendering)> = None;
    let mut wrapper = None;
    for child in child_elements(property) {
        let (tag, rendering) = match child.tag_name().name() {
            ELEMENT_TAG => (ELEMENT_TAG, Rendering::Element(map_element(child)?)),
            ELEMENTS_TAG => (ELEMENTS_TAG, Rendering::Elements(map_elements(child)?)),
            ELEMENT_REFS_TAG => (ELEMENT_REFS_TAG, Rendering::ElementRefs(map_element_refs(child)?)),
            ELEMENT_WRAPPER_TAG => {
                if wrapper.is_some() {
                    return Err(MappingError::ConflictingStructuralMarking {
                        property: name,
                        first: ELEMENT_WRAPPER_TAG,
                        second: ELEMENT_WRAPPER_TAG,
                    });
                }
                wrapper = Some(map_element_wrapper(child)?);
                continue;
            }
            _ => return Err(unexpected(property, child)),
        };
        if let Some((first, _)) = marking {
            return Err(MappingError::ConflictingStructuralMarking {
                property: name,
                first,
                second: tag,
            });
        }
        marking = Some((tag, rendering));
    }

    let rendering = marking.map_or(Rendering::Default, |(_, rendering)| rendering);
    let rendering = match wrapper {
        Some(wrapper) => Rendering::wrapped(wrapper, rendering),
        None => rendering,
    };

    Ok(Property {
        name,
        accessor,
        shape,
        rendering,
        id: optional_attribute(property, "id")?.unwrap_or(false),
        id_ref: optional_attribute(property, "idref")?.unwrap_or(false),
    })
}

fn map_name(node: Node) -> Result<String, MappingError> {
    // {name} The name [attribute], otherwise derived from the property.
    let name = optional_attribute::<String>(node, "name")?.unwrap_or_else(|| DEFAULT_NAME.into());
    if name != DEFAULT_NAME && !is_ncname(&name) {
        return Err(MappingError::InvalidName(name));
    }
    Ok(name)
}

fn map_element(element: Node) -> Result<ElementDescriptor, MappingError> {
    Ok(ElementDescriptor {
        name: map_name(element)?,
        namespace: optional_attribute(element, "namespace")?,
        nillable: optional_attribute(element, "nillable")?.unwrap_or(false),
        required: optional_attribute(element, "required")?.unwrap_or(false),
        default_value: optional_attribute(element, "defaultValue")?,
        type_: optional_attribute(element, "type")?,
    })
}

fn map_elements(elements: Node) -> Result<ElementChoice, MappingError> {
    child_elements(elements)
        .map(|child| match child.tag_name().name() {
            ELEMENT_TAG => map_element(child),
            _ => Err(unexpected(elements, child)),
        })
        .collect()
}

fn map_element_wrapper(wrapper: Node) -> Result<ElementWrapper, MappingError> {
    Ok(ElementWrapper {
        name: map_name(wrapper)?,
        namespace: optional_attribute(wrapper, "namespace")?,
        nillable: optional_attribute(wrapper, "nillable")?.unwrap_or(false),
        required: optional_attribute(wrapper, "required")?.unwrap_or(false),
    })
}

fn map_element_refs(refs: Node) -> Result<ElementRefs, MappingError> {
    child_elements(refs)
        .map(|child| match child.tag_name().name() {
            ELEMENT_REF_TAG => {
                let name: QName = required_attribute(child, "name")?;
                let element_ref = ElementRef::new(name);
                Ok(match optional_attribute::<TypeRef>(child, "type")? {
                    Some(type_) => element_ref.with_type(type_),
                    None => element_ref,
                })
            }
            _ => Err(unexpected(refs, child)),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ElementRefs::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtins::BuiltinType, error::BindingError};

    fn map(xml: &str) -> Result<BindingModel, MappingError> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        map_bindings(doc.root_element())
    }

    #[test_log::test]
    fn maps_choice_property() {
        let model = map(
            r#"<bindings xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <bean name="Foo">
                  <property name="items" shape="list">
                    <elements>
                      <element name="A" type="xs:int"/>
                      <element name="B" type="xs:float" nillable="true"/>
                    </elements>
                  </property>
                </bean>
              </bindings>"#,
        )
        .unwrap();
        let property = model.bean("Foo").unwrap().property("items").unwrap();
        assert_eq!(property.shape, MemberShape::List(TypeRef::any()));
        let choice = property.rendering.choice().unwrap();
        assert_eq!(
            choice.alternatives(),
            [
                ElementDescriptor::of_type("A", BuiltinType::Int),
                ElementDescriptor::of_type("B", BuiltinType::Float).nillable(),
            ]
        );
    }

    #[test]
    fn wrapper_encloses_choice() {
        let model = map(
            r#"<bindings xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <bean name="Foo">
                  <property name="items" shape="list">
                    <elements><element name="A" type="xs:int"/></elements>
                    <elementWrapper name="bar"/>
                  </property>
                </bean>
              </bindings>"#,
        )
        .unwrap();
        let rendering = &model.bean("Foo").unwrap().properties[0].rendering;
        assert_eq!(rendering.wrapper(), Some(&ElementWrapper::new("bar")));
        assert!(rendering.choice().is_some());
    }

    #[test]
    fn two_structural_markings_conflict() {
        let err = map(
            r#"<bindings>
                <bean name="Foo">
                  <property name="items" shape="list">
                    <element name="A"/>
                    <elements><element name="B"/></elements>
                  </property>
                </bean>
              </bindings>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MappingError::ConflictingStructuralMarking {
                property: "items".into(),
                first: "element",
                second: "elements",
            }
        );
    }

    #[test]
    fn element_refs_resolve_prefixed_names() {
        let model = map(
            r#"<bindings xmlns:tns="urn:foo">
                <bean name="Foo">
                  <property name="parts" shape="set">
                    <elementRefs>
                      <elementRef name="tns:part" type="Part"/>
                    </elementRefs>
                  </property>
                </bean>
              </bindings>"#,
        )
        .unwrap();
        let Rendering::ElementRefs(refs) = &model.bean("Foo").unwrap().properties[0].rendering
        else {
            panic!("expected element refs");
        };
        assert_eq!(
            refs.refs(),
            [ElementRef::new(QName::with_namespace("urn:foo", "part")).with_type(TypeRef::bean("Part"))]
        );
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = map(r#"<bindings><bean name="Foo"><property name="x" shape="bag"/></bean></bindings>"#)
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::InvalidValue {
                attribute: "shape",
                value: "bag".into()
            }
        );

        let err = map(
            r#"<bindings><bean name="Foo"><property name="x"><element name="a:b"/></property></bean></bindings>"#,
        )
        .unwrap_err();
        assert_eq!(err, MappingError::InvalidName("a:b".into()));
    }

    #[test]
    fn element_ref_names_use_default_namespace() {
        let model = map(
            r#"<bindings>
                <bean name="Foo">
                  <property name="parts" shape="set">
                    <elementRefs xmlns="urn:parts">
                      <elementRef name="part" type="Part"/>
                    </elementRefs>
                  </property>
                </bean>
              </bindings>"#,
        )
        .unwrap();
        let Rendering::ElementRefs(refs) = &model.bean("Foo").unwrap().properties[0].rendering
        else {
            panic!("expected element refs");
        };
        assert_eq!(
            refs.refs(),
            [ElementRef::new(QName::with_namespace("urn:parts", "part")).with_type(TypeRef::bean("Part"))]
        );
    }

    #[test]
    fn non_ascii_element_names_are_accepted() {
        let model = map(
            r#"<bindings xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <bean name="Maß">
                  <property name="werte" shape="list">
                    <elements>
                      <element name="Größe" type="xs:int"/>
                      <element name="名前" type="xs:string"/>
                    </elements>
                  </property>
                </bean>
              </bindings>"#,
        )
        .unwrap();
        let choice = model.bean("Maß").unwrap().properties[0].rendering.choice().unwrap();
        let names = choice
            .alternatives()
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Größe", "名前"]);
    }

    #[test]
    fn bean_and_property_names_must_be_ncnames() {
        let err = map(r#"<bindings><bean name="line items"/></bindings>"#).unwrap_err();
        assert_eq!(err, MappingError::InvalidName("line items".into()));

        let err = map(r#"<bindings><bean name="Foo"><property name="a:b"/></bean></bindings>"#)
            .unwrap_err();
        assert_eq!(err, MappingError::InvalidName("a:b".into()));
    }

    #[test]
    fn duplicate_property_is_reported() {
        let err = map(
            r#"<bindings>
                <bean name="Foo">
                  <property name="items" shape="list"/>
                  <property name="items"/>
                </bean>
              </bindings>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MappingError::Binding(BindingError::DuplicateProperty {
                bean: "Foo".into(),
                property: "items".into(),
            })
        );
    }

    #[test]
    fn unknown_builtin_is_reported() {
        let err = map(
            r#"<bindings xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <bean name="Foo"><property name="x" itemType="xs:gibberish"/></bean>
              </bindings>"#,
        )
        .unwrap_err();
        assert!(matches!(err, MappingError::UnknownBuiltin(name) if name.local_name == "gibberish"));
    }

    #[test]
    fn missing_name_is_reported() {
        let err = map(r#"<bindings><bean/></bindings>"#).unwrap_err();
        assert_eq!(
            err,
            MappingError::MissingAttribute {
                element: "bean".into(),
                attribute: "name"
            }
        );
    }

    #[test]
    fn wrong_root_is_rejected() {
        let err = map(r#"<schema/>"#).unwrap_err();
        assert_eq!(err, MappingError::UnexpectedRoot("schema".into()));
    }
}
