//! Element tree to raw field mapping decoding

use std::sync::Arc;

use tracing::debug;

use crate::classify::{classify, Classification};
use crate::error::{Error, Result};
use crate::record::{Leftover, RawRecord, RawValue, Record};
use crate::scalar;
use crate::schema::{FieldDescriptor, FieldType, Schema};
use crate::xml::model::{Content, Element};

/// Walks an element tree against a schema
#[derive(Clone, Debug, Default)]
pub struct Decoder;

impl Decoder {
    pub const fn new() -> Self {
        Self
    }

    /// Decode `element` into the raw mapping for `schema`
    ///
    /// The element tag must equal the schema tag. Attribute values are coerced
    /// to their scalar kinds here; defaults and required-field checks are left
    /// to [`Schema::construct`].
    pub fn decode(&self, element: &Element, schema: &Schema) -> Result<RawRecord> {
        if element.name != schema.tag() {
            return Err(Error::structure(schema.tag(), &element.name));
        }
        self.decode_fields(element, schema)
    }

    /// Decode and construct the validated record
    pub fn decode_record(&self, element: &Element, schema: &Arc<Schema>) -> Result<Record> {
        let raw = self.decode(element, schema)?;
        Ok(Schema::construct(schema, raw)?)
    }

    fn decode_fields(&self, element: &Element, schema: &Schema) -> Result<RawRecord> {
        let mut raw = RawRecord::new();

        for field in schema.fields() {
            let name = field.xml_name();
            match (classify(field), field.field_type()) {
                (Classification::Attribute, FieldType::Scalar(kind)) => {
                    if let Some(text) = element.attribute(name) {
                        raw.insert(field.name(), scalar::coerce(text, *kind, field.name())?);
                    }
                }
                (Classification::Element, FieldType::Record(nested)) => {
                    if let Some(child) = element.find(name) {
                        raw.insert(field.name(), self.decode_fields(child, nested)?);
                    }
                }
                (Classification::RepeatedElement, field_type) => {
                    let items = element
                        .find_all(name)
                        .map(|child| self.decode_item(child, field, field_type))
                        .collect::<Result<Vec<_>>>()?;
                    if items.is_empty() && field.is_optional() {
                        continue;
                    }
                    raw.insert(field.name(), RawValue::List(items));
                }
                (classification, field_type) => {
                    return Err(Error::configuration(format!(
                        "field {} of type {} cannot be read as {classification:?}",
                        field.name(),
                        field_type.describe()
                    )));
                }
            }
        }

        log_unconsumed(element, schema);
        raw.set_leftover(leftover_of(element));
        Ok(raw)
    }

    fn decode_item(
        &self,
        child: &Element,
        field: &FieldDescriptor,
        field_type: &FieldType,
    ) -> Result<RawValue> {
        match field_type {
            FieldType::RecordList(nested) => Ok(RawValue::Record(self.decode_fields(child, nested)?)),
            FieldType::ScalarList(kind) => {
                Ok(RawValue::Value(scalar::coerce(&child.text(), *kind, field.name())?))
            }
            FieldType::Scalar(_) | FieldType::Record(_) => Err(Error::configuration(format!(
                "field {} is not a list",
                field.name()
            ))),
        }
    }
}

/// Direct text of `element`, split at its first child element
fn leftover_of(element: &Element) -> Option<Leftover> {
    let mut leading = String::new();
    let mut trailing = String::new();
    let mut seen_element = false;

    for content in &element.children {
        match content {
            Content::Element(_) => seen_element = true,
            Content::Text(text) if seen_element => trailing.push_str(text),
            Content::Text(text) => leading.push_str(text),
        }
    }

    let leftover = Leftover::new(leading, trailing);
    (!leftover.is_empty()).then_some(leftover)
}

fn log_unconsumed(element: &Element, schema: &Schema) {
    let declared = |name: &str| schema.fields().iter().any(|field| field.xml_name() == name);
    for name in element.attributes.keys() {
        if !declared(name) {
            debug!(schema = schema.name(), attribute = %name, "ignoring undeclared attribute");
        }
    }
    for child in element.elements() {
        if !declared(&child.name) {
            debug!(schema = schema.name(), element = %child.name, "ignoring undeclared element");
        }
    }
}

/// Decode with a default [`Decoder`]
pub fn decode(element: &Element, schema: &Schema) -> Result<RawRecord> {
    Decoder::new().decode(element, schema)
}

/// Decode and construct with a default [`Decoder`]
pub fn decode_record(element: &Element, schema: &Arc<Schema>) -> Result<Record> {
    Decoder::new().decode_record(element, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::ScalarKind;
    use crate::value::Value;

    fn example() -> Result<Arc<Schema>> {
        Schema::builder("example")
            .field(FieldDescriptor::string("name"))
            .field(FieldDescriptor::integer("value"))
            .build()
    }

    #[test]
    fn test_tag_mismatch_is_structure_error() -> Result<()> {
        let schema = example()?;
        let err = decode(&Element::new("other"), &schema).err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::Structure { expected, found }) if expected == "example" && found == "other"
        ));
        Ok(())
    }

    #[test]
    fn test_attributes_coerced_and_absent_left_unset() -> Result<()> {
        let schema = example()?;
        let element = Element::new("example").with_attribute("value", "123");
        let raw = decode(&element, &schema)?;

        assert_eq!(raw.get("value"), Some(&RawValue::Value(Value::Integer(123))));
        assert!(!raw.contains_key("name"));
        Ok(())
    }

    #[test]
    fn test_missing_required_is_validation_error() -> Result<()> {
        let schema = example()?;
        let element = Element::new("example").with_attribute("name", "test");
        let err = decode_record(&element, &schema).err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::Validation(_))
        ));
        Ok(())
    }

    #[test]
    fn test_empty_list_versus_optional_absence() -> Result<()> {
        let schema = Schema::builder("t")
            .field(FieldDescriptor::scalar_list("required", ScalarKind::String))
            .field(FieldDescriptor::scalar_list("maybe", ScalarKind::String).optional())
            .build()?;
        let raw = decode(&Element::new("t"), &schema)?;

        assert_eq!(raw.get("required"), Some(&RawValue::List(Vec::new())));
        assert!(!raw.contains_key("maybe"));
        Ok(())
    }

    #[test]
    fn test_leftover_placement() {
        let leading = Element::new("a").with_text("x").with_child(Element::new("b"));
        assert_eq!(leftover_of(&leading), Some(Leftover::leading("x")));

        let trailing = Element::new("a").with_child(Element::new("b")).with_text("y");
        assert_eq!(leftover_of(&trailing), Some(Leftover::trailing("y")));

        let both = Element::new("a")
            .with_text("head")
            .with_child(Element::new("b"))
            .with_text("mid")
            .with_child(Element::new("c"))
            .with_text("tail");
        assert_eq!(leftover_of(&both), Some(Leftover::new("head", "midtail")));

        assert_eq!(leftover_of(&Element::new("a")), None);
    }

    #[test]
    fn test_scalar_item_coercion_error() -> Result<()> {
        let schema = Schema::builder("t")
            .field(FieldDescriptor::scalar_list("n", ScalarKind::Integer))
            .build()?;
        let element = Element::new("t")
            .with_child(Element::new("n").with_text("1"))
            .with_child(Element::new("n").with_text("two"));
        let err = decode(&element, &schema).err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::Coercion { value, .. }) if value == "two"
        ));
        Ok(())
    }
}
