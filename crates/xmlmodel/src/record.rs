//! Validated records and the raw field mappings they are built from

use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::classify::{classify, Classification};
use crate::error::{Error, Result, ValidationError, Violation};
use crate::schema::{FieldDescriptor, Schema, LEFTOVER_FIELD};
use crate::value::Value;
use crate::xml::model::is_blank;

/// Text inside an element that no declared field consumed
///
/// Text before the first child element is the leading segment, text after it
/// the trailing one. An element without child elements only has a leading
/// segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Leftover {
    leading: String,
    trailing: String,
}

impl Leftover {
    pub fn new(leading: impl Into<String>, trailing: impl Into<String>) -> Self {
        Self {
            leading: leading.into(),
            trailing: trailing.into(),
        }
    }

    pub fn leading(text: impl Into<String>) -> Self {
        Self::new(text, String::new())
    }

    pub fn trailing(text: impl Into<String>) -> Self {
        Self::new(String::new(), text)
    }

    /// Text written before the child elements
    pub fn before_children(&self) -> &str {
        &self.leading
    }

    /// Text written after the child elements
    pub fn after_children(&self) -> &str {
        &self.trailing
    }

    /// Both segments joined
    pub fn text(&self) -> Cow<'_, str> {
        if self.trailing.is_empty() {
            Cow::Borrowed(&self.leading)
        } else if self.leading.is_empty() {
            Cow::Borrowed(&self.trailing)
        } else {
            Cow::Owned(format!("{}{}", self.leading, self.trailing))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }

    pub fn into_text(self) -> String {
        let mut text = self.leading;
        text.push_str(&self.trailing);
        text
    }

    /// The segments as they read back from XML
    ///
    /// Next to child elements a whitespace-only segment is indentation and
    /// is dropped. Without child elements the segments share one text node.
    pub(crate) fn normalized(self, has_child_elements: bool) -> Option<Self> {
        let Self {
            mut leading,
            mut trailing,
        } = self;
        if has_child_elements {
            if is_blank(&leading) {
                leading.clear();
            }
            if is_blank(&trailing) {
                trailing.clear();
            }
        } else {
            leading.push_str(&trailing);
            trailing.clear();
        }
        let leftover = Self { leading, trailing };
        (!leftover.is_empty()).then_some(leftover)
    }
}

/// A value in a raw field mapping
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Value(Value),
    Record(RawRecord),
    List(Vec<RawValue>),
}

impl RawValue {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::Value(value) => value.type_name(),
            Self::Record(_) => "record",
            Self::List(_) => "list",
        }
    }
}

macro_rules! raw_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for RawValue {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

raw_value_from!(bool, i32, i64, u32, f64, String, &str, Record);

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<RawRecord> for RawValue {
    fn from(record: RawRecord) -> Self {
        Self::Record(record)
    }
}

/// Unvalidated field mapping, keyed by field name
///
/// This is what the decoder produces and what [`Schema::construct`] consumes.
/// Leftover content travels next to the declared fields; inserting a string
/// under [`LEFTOVER_FIELD`] sets it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    values: IndexMap<String, RawValue>,
    leftover: Option<Leftover>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field value, returning the previous one
    ///
    /// Under [`LEFTOVER_FIELD`] a string sets the leading leftover text and
    /// null clears it. Other values are not stored there.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        let name = name.into();
        let value = value.into();
        if name == LEFTOVER_FIELD {
            let previous = match value {
                RawValue::Value(Value::String(text)) => self.leftover.replace(Leftover::leading(text)),
                RawValue::Value(Value::Null) => self.leftover.take(),
                other => {
                    debug!(found = other.type_name(), "ignoring non-string leftover value");
                    return None;
                }
            };
            return previous.map(|leftover| RawValue::from(leftover.into_text()));
        }
        self.values.insert(name, value)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_record(self, name: impl Into<String>, record: Self) -> Self {
        self.with(name, RawValue::Record(record))
    }

    pub fn with_list<I, V>(self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        let items = items.into_iter().map(Into::into).collect();
        self.with(name, RawValue::List(items))
    }

    pub fn with_leftover(mut self, leftover: Leftover) -> Self {
        self.leftover = Some(leftover);
        self
    }

    pub fn set_leftover(&mut self, leftover: Option<Leftover>) {
        self.leftover = leftover;
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn leftover(&self) -> Option<&Leftover> {
        self.leftover.as_ref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.leftover.is_none()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, RawValue> {
        self.values.iter()
    }

    pub fn into_parts(self) -> (IndexMap<String, RawValue>, Option<Leftover>) {
        (self.values, self.leftover)
    }
}

/// A record instance that conforms to its schema
///
/// Records only come out of [`Schema::construct`]: every declared field holds
/// a value of its declared type (null only where the field is optional).
#[derive(Clone, Debug)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<Value>,
    leftover: Option<Leftover>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name()
            && self.values == other.values
            && self.leftover == other.leftover
    }
}

impl Record {
    pub(crate) fn from_parts(
        schema: Arc<Schema>,
        values: Vec<Value>,
        leftover: Option<Leftover>,
    ) -> Self {
        Self {
            schema,
            values,
            leftover: None,
        }
        .with_leftover(leftover)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Value of a declared field
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.schema.field_index(name)?;
        self.values.get(index)
    }

    /// Declared fields with their values, in schema order
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &Value)> {
        self.schema.fields().iter().zip(self.values.iter())
    }

    pub fn leftover(&self) -> Option<&Leftover> {
        self.leftover.as_ref()
    }

    pub fn leftover_text(&self) -> Option<Cow<'_, str>> {
        self.leftover.as_ref().map(Leftover::text)
    }

    /// Returns the record with its leftover content replaced
    pub fn with_leftover(mut self, leftover: Option<Leftover>) -> Self {
        let has_child_elements = self.has_child_elements();
        self.leftover = leftover.and_then(|leftover| leftover.normalized(has_child_elements));
        self
    }

    /// Whether the encoded record has any child element
    pub fn has_child_elements(&self) -> bool {
        self.fields().any(|(field, value)| match classify(field) {
            Classification::Attribute => false,
            Classification::Element => !value.is_null(),
            Classification::RepeatedElement => value.as_list().is_some_and(|items| !items.is_empty()),
        })
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        self.typed(name, "string", Value::as_str)
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        self.typed(name, "integer", Value::as_integer)
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        self.typed(name, "float", Value::as_float)
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        self.typed(name, "boolean", Value::as_bool)
    }

    pub fn record(&self, name: &str) -> Result<&Self> {
        self.typed(name, "record", Value::as_record)
    }

    /// Nested record of an optional field; null reads as `None`
    pub fn optional_record(&self, name: &str) -> Result<Option<&Self>> {
        match self.get(name) {
            Some(Value::Null) => Ok(None),
            _ => self.record(name).map(Some),
        }
    }

    /// Items of a list field; null reads as an empty slice
    pub fn list(&self, name: &str) -> Result<&[Value]> {
        match self.get(name) {
            Some(Value::Null) => Ok(&[]),
            _ => self.typed(name, "list", Value::as_list),
        }
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: &str,
        read: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T> {
        let Some(value) = self.get(name) else {
            return Err(self.violation(Violation::Missing {
                field: name.to_string(),
            }));
        };
        read(value).ok_or_else(|| {
            self.violation(Violation::TypeMismatch {
                field: name.to_string(),
                expected: expected.to_string(),
                found: value.type_name().to_string(),
            })
        })
    }

    fn violation(&self, violation: Violation) -> Error {
        ValidationError::new(self.schema.name(), vec![violation]).into()
    }

    /// Turns the record back into a raw mapping, e.g. to rebuild it with changes
    pub fn into_raw(self) -> RawRecord {
        let values = self
            .schema
            .fields()
            .iter()
            .zip(self.values)
            .map(|(field, value)| (field.name().to_string(), RawValue::Value(value)))
            .collect();
        RawRecord {
            values,
            leftover: self.leftover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn pet_schema() -> Result<Arc<Schema>> {
        Schema::builder("Pet")
            .field(FieldDescriptor::string("name"))
            .field(FieldDescriptor::integer("age").default_value(1))
            .build()
    }

    #[test]
    fn test_raw_record_leftover_key() {
        let raw = RawRecord::new()
            .with("name", "Rex")
            .with(LEFTOVER_FIELD, "free text");
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.leftover(), Some(&Leftover::leading("free text")));
    }

    #[test]
    fn test_raw_record_leftover_key_rejects_non_strings() {
        let mut raw = RawRecord::new().with(LEFTOVER_FIELD, "text");
        assert_eq!(raw.insert(LEFTOVER_FIELD, 5), None);
        assert!(!raw.contains_key(LEFTOVER_FIELD));
        assert_eq!(raw.leftover(), Some(&Leftover::leading("text")));

        let previous = raw.insert(LEFTOVER_FIELD, Value::Null);
        assert_eq!(previous, Some(RawValue::from("text")));
        assert_eq!(raw.leftover(), None);
        assert!(raw.is_empty());
    }

    #[test]
    fn test_leftover_without_child_elements_is_leading() -> Result<()> {
        let schema = pet_schema()?;
        let record = Schema::construct(
            &schema,
            RawRecord::new()
                .with("name", "Rex")
                .with_leftover(Leftover::new("  head", "tail ")),
        )?;
        assert_eq!(record.leftover(), Some(&Leftover::leading("  headtail ")));
        assert_eq!(record.leftover_text().as_deref(), Some("  headtail "));
        Ok(())
    }

    #[test]
    fn test_leftover_beside_child_elements_drops_blank_segments() -> Result<()> {
        let schema = Schema::builder("Owner")
            .field(FieldDescriptor::record("pet", pet_schema()?))
            .build()?;
        let raw = RawRecord::new().with_record("pet", RawRecord::new().with("name", "Rex"));

        let record = Schema::construct(
            &schema,
            raw.clone().with_leftover(Leftover::new(" \n ", " tail")),
        )?;
        assert!(record.has_child_elements());
        assert_eq!(record.leftover(), Some(&Leftover::trailing(" tail")));

        let record = Schema::construct(&schema, raw.with_leftover(Leftover::new("\t", "")))?;
        assert_eq!(record.leftover(), None);
        Ok(())
    }

    #[test]
    fn test_record_accessors() -> Result<()> {
        let schema = pet_schema()?;
        let record = Schema::construct(&schema, RawRecord::new().with("name", "Rex"))?;

        assert_eq!(record.string("name")?, "Rex");
        assert_eq!(record.integer("age")?, 1);
        assert!(record.get("missing").is_none());
        Ok(())
    }

    #[test]
    fn test_record_accessor_type_mismatch() -> Result<()> {
        let schema = pet_schema()?;
        let record = Schema::construct(&schema, RawRecord::new().with("name", "Rex"))?;

        let err = record.boolean("name").err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::Validation(_))
        ));
        Ok(())
    }

    #[test]
    fn test_into_raw_rebuilds_equal_record() -> Result<()> {
        let schema = pet_schema()?;
        let record = Schema::construct(
            &schema,
            RawRecord::new()
                .with("name", "Rex")
                .with_leftover(Leftover::leading("tail")),
        )?;
        let rebuilt = Schema::construct(&schema, record.clone().into_raw())?;
        assert_eq!(rebuilt, record);
        Ok(())
    }
}
