//! Field descriptors

use std::fmt;
use std::sync::Arc;

use crate::classify::{classify, Classification};
use crate::schema::Schema;
use crate::value::Value;

/// Scalar type of an attribute or text value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ScalarKind {
    String,
    Integer,
    Float,
    Boolean,
}

impl ScalarKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }

    /// Whether `value` is a value of this kind; integers are accepted as floats
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::String, Value::String(_))
                | (Self::Integer, Value::Integer(_))
                | (Self::Float, Value::Float(_) | Value::Integer(_))
                | (Self::Boolean, Value::Bool(_))
        )
    }

    /// Converts an accepted value to this kind's canonical variant
    #[allow(clippy::as_conversions)]
    pub(crate) fn normalize(self, value: Value) -> Value {
        match (self, value) {
            (Self::Float, Value::Integer(n)) => Value::Float(n as f64),
            (_, value) => value,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a field
#[derive(Clone, Debug, PartialEq)]
pub enum FieldType {
    Scalar(ScalarKind),
    Record(Arc<Schema>),
    ScalarList(ScalarKind),
    RecordList(Arc<Schema>),
}

impl FieldType {
    /// Schema of the nested record(s), for record and record-list fields
    pub fn nested_schema(&self) -> Option<&Arc<Schema>> {
        match self {
            Self::Record(schema) | Self::RecordList(schema) => Some(schema),
            Self::Scalar(_) | Self::ScalarList(_) => None,
        }
    }

    /// Scalar kind of the value or of each list item
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) | Self::ScalarList(kind) => Some(*kind),
            Self::Record(_) | Self::RecordList(_) => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::ScalarList(_) | Self::RecordList(_))
    }

    /// Human readable type, e.g. `list of integer`
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.to_string(),
            Self::Record(schema) => format!("record {}", schema.name()),
            Self::ScalarList(kind) => format!("list of {kind}"),
            Self::RecordList(schema) => format!("list of record {}", schema.name()),
        }
    }
}

/// One declared field of a [`Schema`]
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    alias: Option<String>,
    field_type: FieldType,
    optional: bool,
    default: Option<Value>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            field_type,
            optional: false,
            default: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Scalar(ScalarKind::String))
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Scalar(ScalarKind::Integer))
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Scalar(ScalarKind::Float))
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Scalar(ScalarKind::Boolean))
    }

    pub fn record(name: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self::new(name, FieldType::Record(schema))
    }

    pub fn scalar_list(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(name, FieldType::ScalarList(kind))
    }

    pub fn record_list(name: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self::new(name, FieldType::RecordList(schema))
    }

    /// Use `alias` as the XML attribute or tag name instead of the field name
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Allow the field to hold null
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Name used for the attribute or child element in XML
    pub fn xml_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn classification(&self) -> Classification {
        classify(self)
    }
}
