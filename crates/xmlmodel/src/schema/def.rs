//! Serde-loadable schema definitions and the serde view of records

use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::{FieldDescriptor, FieldType, NameStyle, ScalarKind, Schema, LEFTOVER_FIELD};
use crate::value::Value;

/// Declarative form of a [`Schema`]
///
/// ```json
/// {
///   "name": "Cat",
///   "fields": [
///     {"name": "name", "type": "string", "default": "Kitty"},
///     {"name": "tags", "type": {"list": "string"}, "optional": true}
///   ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default)]
    pub name_style: NameStyle,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeDef,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultDef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeDef {
    String,
    Integer,
    Float,
    Boolean,
    Record(SchemaDef),
    List(Box<TypeDef>),
}

/// Scalar default value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultDef {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl SchemaDef {
    /// Binds the definition, applying every [`SchemaBuilder`](crate::SchemaBuilder) check
    pub fn build(&self) -> Result<Arc<Schema>> {
        let mut builder = Schema::builder(&self.name).name_style(self.name_style);
        if let Some(tag) = &self.tag {
            builder = builder.tag(tag);
        }
        for field in &self.fields {
            builder = builder.field(field.descriptor()?);
        }
        builder.build()
    }
}

impl FieldDef {
    fn descriptor(&self) -> Result<FieldDescriptor> {
        let mut descriptor = FieldDescriptor::new(&self.name, self.ty.field_type(&self.name)?);
        if let Some(alias) = &self.alias {
            descriptor = descriptor.alias(alias);
        }
        if self.optional {
            descriptor = descriptor.optional();
        }
        if let Some(default) = &self.default {
            descriptor = descriptor.default_value(default.clone());
        }
        Ok(descriptor)
    }
}

impl TypeDef {
    const fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Self::String => Some(ScalarKind::String),
            Self::Integer => Some(ScalarKind::Integer),
            Self::Float => Some(ScalarKind::Float),
            Self::Boolean => Some(ScalarKind::Boolean),
            Self::Record(_) | Self::List(_) => None,
        }
    }

    fn field_type(&self, field: &str) -> Result<FieldType> {
        if let Some(kind) = self.scalar_kind() {
            return Ok(FieldType::Scalar(kind));
        }
        match self {
            Self::Record(def) => Ok(FieldType::Record(def.build()?)),
            Self::List(item) => match (item.scalar_kind(), item.as_ref()) {
                (Some(kind), _) => Ok(FieldType::ScalarList(kind)),
                (None, Self::Record(def)) => Ok(FieldType::RecordList(def.build()?)),
                _ => Err(Error::configuration(format!(
                    "field {field} declares a list of lists"
                ))),
            },
            _ => Err(Error::configuration(format!(
                "field {field} has an unsupported type"
            ))),
        }
    }
}

impl From<DefaultDef> for Value {
    fn from(default: DefaultDef) -> Self {
        match default {
            DefaultDef::Bool(b) => Self::Bool(b),
            DefaultDef::Integer(n) => Self::Integer(n),
            DefaultDef::Float(n) => Self::Float(n),
            DefaultDef::String(s) => Self::String(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::Record(record) => record.serialize(serializer),
            Self::List(items) => serializer.collect_seq(items),
        }
    }
}

/// Fields in schema order, leftover text under [`LEFTOVER_FIELD`]
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let leftover = self.leftover_text();
        let len = self.schema().fields().len() + usize::from(leftover.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (field, value) in self.fields() {
            map.serialize_entry(field.name(), value)?;
        }
        if let Some(text) = leftover {
            map.serialize_entry(LEFTOVER_FIELD, &text)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::record::{Leftover, RawRecord};
    use std::error::Error as StdError;

    const CAT: &str = r#"{
        "name": "Cat",
        "fields": [
            {"name": "name", "type": "string", "default": "Kitty"},
            {"name": "weight", "type": "float", "default": 1},
            {"name": "traits", "alias": "AnimalCharacteristics", "optional": true, "type": {"record": {
                "name": "AnimalCharacteristics",
                "fields": [{"name": "loud", "type": "boolean"}]
            }}},
            {"name": "tags", "type": {"list": "string"}}
        ]
    }"#;

    #[test]
    fn test_build_from_json() -> std::result::Result<(), Box<dyn StdError>> {
        let def: SchemaDef = serde_json::from_str(CAT)?;
        let schema = def.build()?;

        assert_eq!(schema.tag(), "Cat");
        assert_eq!(schema.fields().len(), 4);
        assert_eq!(
            schema.field("traits").map(FieldDescriptor::xml_name),
            Some("AnimalCharacteristics")
        );
        assert!(matches!(
            schema.field("tags").map(FieldDescriptor::field_type),
            Some(FieldType::ScalarList(ScalarKind::String))
        ));

        let record = Schema::construct(&schema, RawRecord::new())?;
        assert_eq!(record.string("name")?, "Kitty");
        assert_eq!(record.get("weight"), Some(&Value::Float(1.0)));
        Ok(())
    }

    #[test]
    fn test_nested_list_rejected() -> std::result::Result<(), Box<dyn StdError>> {
        let def: SchemaDef = serde_json::from_str(
            r#"{"name": "T", "fields": [{"name": "grid", "type": {"list": {"list": "integer"}}}]}"#,
        )?;
        let err = def.build().err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::Configuration { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_invalid_default_rejected() -> std::result::Result<(), Box<dyn StdError>> {
        let def: SchemaDef = serde_json::from_str(
            r#"{"name": "T", "fields": [{"name": "n", "type": "integer", "default": "many"}]}"#,
        )?;
        assert!(def.build().is_err());
        Ok(())
    }

    #[test]
    fn test_record_serializes_in_schema_order() -> std::result::Result<(), Box<dyn StdError>> {
        let def: SchemaDef = serde_json::from_str(CAT)?;
        let schema = def.build()?;
        let record = Schema::construct(
            &schema,
            RawRecord::new()
                .with_list("tags", ["a", "b"])
                .with("name", "Tom")
                .with_leftover(Leftover::leading("purrs")),
        )?;

        assert_eq!(
            serde_json::to_string(&record)?,
            r#"{"name":"Tom","weight":1.0,"traits":null,"tags":["a","b"],"xml_content":"purrs"}"#
        );
        Ok(())
    }
}
