//! Record description XML parser.
//!
//! This module parses the class/attribute XML dialect used for PDU
//! definitions into a [`RecordSet`]:
//!
//! ```xml
//! <classes>
//!   <class name="EntityStatePdu" inheritsFrom="EntityInformationFamilyPdu">
//!     <initialValue name="pduType" value="1"/>
//!     <attribute name="entityID"><classRef name="EntityID"/></attribute>
//!     <attribute name="marking">
//!       <primitivelist length="11" couldBeString="true"><primitive type="byte"/></primitivelist>
//!     </attribute>
//!   </class>
//! </classes>
//! ```

use crate::error::ParseError;
use crate::records::{FieldDef, FieldKind, InitialValue, RecordDef};
use crate::types::RecordSet;
use quick_xml::Reader;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// Parent name assumed when a class declares no `inheritsFrom`.
pub const DEFAULT_PARENT: &str = "root";

/// Parses record descriptions from an XML string.
///
/// # Arguments
/// * `xml` - XML document content
///
/// # Returns
/// Records in document order.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, a class is declared twice,
/// or an attribute has no usable type element.
pub fn parse_records(xml: &str) -> Result<RecordSet, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = RecordSet::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"class" {
                    let record = parse_class(&mut reader, e)?;
                    records.add_record(record)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"class" {
                    records.add_record(parse_class_header(e)?)?;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(records)
}

/// Parses record descriptions from an XML file.
///
/// # Errors
/// Returns `ParseError` if reading or parsing fails.
pub fn parse_records_file(path: &Path) -> Result<RecordSet, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    parse_records(&xml)
}

/// Parses the class element attributes.
fn parse_class_header(e: &BytesStart<'_>) -> Result<RecordDef, ParseError> {
    let mut name = None;
    let mut parent = DEFAULT_PARENT.to_string();
    let mut comment = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr_value(&attr)?;

        match key {
            "name" => name = Some(value.to_string()),
            "inheritsFrom" => parent = value.to_string(),
            "comment" => comment = Some(value.to_string()),
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ParseError::missing_attr("class", "name"))?;

    let mut record = RecordDef::new(name, parent);
    record.comment = comment;
    Ok(record)
}

/// Parses a class element and its children.
fn parse_class(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<RecordDef, ParseError> {
    let mut record = parse_class_header(e)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"attribute" => {
                    let field = parse_attribute(reader, e, &record.name)?;
                    if record.field(&field.name).is_some() {
                        return Err(ParseError::duplicate(
                            "attribute",
                            format!("{}.{}", record.name, field.name),
                        ));
                    }
                    record.add_field(field);
                }
                b"initialValue" => {
                    record.add_initial_value(parse_initial_value(e)?);
                    skip_element(reader)?;
                }
                _ => skip_element(reader)?,
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"initialValue" => record.add_initial_value(parse_initial_value(e)?),
                b"attribute" => {
                    let name = attribute_name(e)?;
                    return Err(ParseError::structure(format!(
                        "attribute '{}.{}' has no type element",
                        record.name, name
                    )));
                }
                _ => {}
            },
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::structure(format!(
                    "unexpected end of document inside class '{}'",
                    record.name
                )));
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(record)
}

/// Parses an initialValue element.
fn parse_initial_value(e: &BytesStart<'_>) -> Result<InitialValue, ParseError> {
    let mut name = None;
    let mut value = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let val = attr_value(&attr)?;

        match key {
            "name" => name = Some(val.to_string()),
            "value" => value = Some(val.to_string()),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("initialValue", "name"))?;
    let value = value.ok_or_else(|| ParseError::missing_attr("initialValue", "value"))?;
    Ok(InitialValue::new(name, value))
}

/// Reads the name attribute of an attribute element.
fn attribute_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"name" {
            return attr_value(&attr);
        }
    }
    Err(ParseError::missing_attr("attribute", "name"))
}

/// Parses an attribute element into a field.
fn parse_attribute(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    record: &str,
) -> Result<FieldDef, ParseError> {
    let name = attribute_name(e)?;
    let mut comment = None;

    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"comment" {
            comment = Some(attr_value(&attr)?);
        }
    }

    let mut field: Option<FieldDef> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                match e.name().as_ref() {
                    b"primitive" => {
                        field = Some(FieldDef::primitive(&name, type_attr(e, "primitive")?));
                        skip_element(reader)?;
                    }
                    b"classRef" => {
                        field = Some(FieldDef::record(&name, name_attr(e, "classRef")?));
                        skip_element(reader)?;
                    }
                    b"primitivelist" => {
                        field = Some(parse_list(reader, e, &name, FieldKind::FixedList)?);
                    }
                    b"objectlist" => {
                        field = Some(parse_list(reader, e, &name, FieldKind::VariableList)?);
                    }
                    _ => skip_element(reader)?,
                }
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"primitive" => field = Some(FieldDef::primitive(&name, type_attr(e, "primitive")?)),
                b"classRef" => field = Some(FieldDef::record(&name, name_attr(e, "classRef")?)),
                b"primitivelist" | b"objectlist" => {
                    return Err(ParseError::structure(format!(
                        "list attribute '{record}.{name}' has no element type"
                    )));
                }
                _ => {}
            },
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::structure(format!(
                    "unexpected end of document inside attribute '{record}.{name}'"
                )));
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let mut field = field.ok_or_else(|| {
        ParseError::structure(format!("attribute '{record}.{name}' has no type element"))
    })?;
    field.comment = comment;
    Ok(field)
}

/// Parses a primitivelist or objectlist element and its element type.
fn parse_list(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    name: &str,
    kind: FieldKind,
) -> Result<FieldDef, ParseError> {
    let element = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut length = None;
    let mut could_be_string = false;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr_value(&attr)?;

        match key {
            "length" => {
                length = Some(
                    value
                        .parse()
                        .map_err(|_| ParseError::invalid_attr(&element, "length", &value))?,
                )
            }
            "couldBeString" => {
                could_be_string = match value.as_str() {
                    "true" => true,
                    "false" => false,
                    _ => return Err(ParseError::invalid_attr(&element, "couldBeString", value)),
                }
            }
            _ => {}
        }
    }

    let mut type_name = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                match e.name().as_ref() {
                    b"primitive" => type_name = Some(type_attr(e, "primitive")?),
                    b"classRef" => type_name = Some(name_attr(e, "classRef")?),
                    _ => {}
                }
                skip_element(reader)?;
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"primitive" => type_name = Some(type_attr(e, "primitive")?),
                b"classRef" => type_name = Some(name_attr(e, "classRef")?),
                _ => {}
            },
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::structure(format!(
                    "unexpected end of document inside {element} '{name}'"
                )));
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let type_name = type_name.ok_or_else(|| {
        ParseError::structure(format!("list attribute '{name}' has no element type"))
    })?;

    let mut field = FieldDef::new(name, type_name, kind);
    field.length = length;
    field.could_be_string = could_be_string;
    Ok(field)
}

/// Reads the required `type` attribute.
fn type_attr(e: &BytesStart<'_>, element: &str) -> Result<String, ParseError> {
    required_attr(e, element, "type")
}

/// Reads the required `name` attribute.
fn name_attr(e: &BytesStart<'_>, element: &str) -> Result<String, ParseError> {
    required_attr(e, element, "name")
}

fn required_attr(e: &BytesStart<'_>, element: &str, attribute: &str) -> Result<String, ParseError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == attribute.as_bytes() {
            let value = attr_value(&attr)?;
            if value.is_empty() {
                return Err(ParseError::invalid_attr(element, attribute, value));
            }
            return Ok(value.to_string());
        }
    }
    Err(ParseError::missing_attr(element, attribute))
}

/// Reads an attribute value with entity and character references expanded.
fn attr_value(attr: &Attribute<'_>) -> Result<String, ParseError> {
    let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
    Ok(value.into_owned())
}

/// Consumes events up to and including the end tag of the current element.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTITY_STATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xmlpg>
  <classes>
    <class name="EntityID" comment="Unique entity identifier">
      <attribute name="site"><primitive type="unsigned short"/></attribute>
      <attribute name="application"><primitive type="unsigned short"/></attribute>
      <attribute name="entity"><primitive type="unsigned short"/></attribute>
    </class>
    <class name="EntityInformationFamilyPdu" inheritsFrom="Pdu"/>
    <class name="EntityStatePdu" inheritsFrom="EntityInformationFamilyPdu"
           comment="Represents the state of an entity">
      <initialValue name="pduType" value="1"/>
      <attribute name="entityID" comment="Identifies the entity">
        <classRef name="EntityID"/>
      </attribute>
      <attribute name="forceId">
        <primitive type="unsigned byte" defaultValue="0"/>
      </attribute>
      <attribute name="marking">
        <primitivelist length="11" couldBeString="true">
          <primitive type="byte"/>
        </primitivelist>
      </attribute>
      <attribute name="articulationParameters">
        <objectlist countFieldName="numberOfArticulationParameters">
          <classRef name="ArticulationParameter"/>
        </objectlist>
      </attribute>
    </class>
  </classes>
</xmlpg>"#;

    #[test]
    fn test_parse_records_in_order() {
        let records = parse_records(ENTITY_STATE).expect("Failed to parse");
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["EntityID", "EntityInformationFamilyPdu", "EntityStatePdu"]
        );
    }

    #[test]
    fn test_parse_class_attributes() {
        let records = parse_records(ENTITY_STATE).expect("Failed to parse");

        let entity_id = records.get("EntityID").expect("EntityID");
        assert_eq!(entity_id.parent, DEFAULT_PARENT);
        assert_eq!(entity_id.comment.as_deref(), Some("Unique entity identifier"));
        assert_eq!(entity_id.fields.len(), 3);

        let family = records.get("EntityInformationFamilyPdu").expect("family");
        assert_eq!(family.parent, "Pdu");
        assert!(family.is_empty());
    }

    #[test]
    fn test_parse_field_kinds() {
        let records = parse_records(ENTITY_STATE).expect("Failed to parse");
        let pdu = records.get("EntityStatePdu").expect("EntityStatePdu");

        assert_eq!(pdu.pdu_type(), Some("1"));

        let entity_id = pdu.field("entityID").expect("entityID");
        assert_eq!(entity_id.kind, FieldKind::RecordReference);
        assert_eq!(entity_id.type_name, "EntityID");
        assert_eq!(entity_id.comment.as_deref(), Some("Identifies the entity"));

        let force = pdu.field("forceId").expect("forceId");
        assert_eq!(force.kind, FieldKind::Primitive);
        assert_eq!(force.type_name, "unsigned byte");

        let marking = pdu.field("marking").expect("marking");
        assert_eq!(marking.kind, FieldKind::FixedList);
        assert_eq!(marking.type_name, "byte");
        assert_eq!(marking.length, Some(11));
        assert!(marking.could_be_string);

        let params = pdu.field("articulationParameters").expect("params");
        assert_eq!(params.kind, FieldKind::VariableList);
        assert_eq!(params.type_name, "ArticulationParameter");
        assert!(!params.could_be_string);
    }

    #[test]
    fn test_parse_duplicate_class() {
        let xml = r#"<classes>
            <class name="A"><attribute name="x"><primitive type="int"/></attribute></class>
            <class name="A"/>
        </classes>"#;
        let err = parse_records(xml).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateDefinition { .. }));
    }

    #[test]
    fn test_parse_attribute_without_type() {
        let xml = r#"<classes>
            <class name="A"><attribute name="x" comment="no type"></attribute></class>
        </classes>"#;
        let err = parse_records(xml).unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure { .. }));
    }

    #[test]
    fn test_parse_list_without_element_type() {
        let xml = r#"<classes>
            <class name="A"><attribute name="x"><objectlist countFieldName="n"/></attribute></class>
        </classes>"#;
        let err = parse_records(xml).unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure { .. }));
    }

    #[test]
    fn test_parse_invalid_list_length() {
        let xml = r#"<classes>
            <class name="A">
              <attribute name="x">
                <primitivelist length="eleven"><primitive type="byte"/></primitivelist>
              </attribute>
            </class>
        </classes>"#;
        let err = parse_records(xml).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAttribute { .. }));
    }

    #[test]
    fn test_parse_skips_unknown_elements() {
        let xml = r#"<xmlpg>
            <javadoc>Generated protocol</javadoc>
            <classes>
              <class name="A">
                <documentation><p>nested</p></documentation>
                <attribute name="x"><primitive type="int"/></attribute>
              </class>
            </classes>
        </xmlpg>"#;
        let records = parse_records(xml).expect("Failed to parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records.get("A").map(|r| r.fields.len()), Some(1));
    }

    #[test]
    fn test_parse_class_without_name() {
        let xml = r#"<classes><class inheritsFrom="root"/></classes>"#;
        let err = parse_records(xml).unwrap_err();
        assert!(matches!(err, ParseError::MissingAttribute { .. }));
    }

    #[test]
    fn test_parse_expands_entities() {
        let xml = r#"<classes>
            <class name="A" comment="Range &lt; 10 &amp; more">
              <attribute name="x" comment="a &quot;b&quot; &#x41;"><primitive type="unsigned&#32;int"/></attribute>
            </class>
        </classes>"#;
        let records = parse_records(xml).expect("Failed to parse");
        let record = records.get("A").expect("A");
        assert_eq!(record.comment.as_deref(), Some("Range < 10 & more"));

        let field = record.field("x").expect("x");
        assert_eq!(field.comment.as_deref(), Some("a \"b\" A"));
        assert_eq!(field.type_name, "unsigned int");
    }
}
