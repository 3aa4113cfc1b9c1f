//! Record schemas: declared fields, binding-time checks and record construction

#[cfg(feature = "serde")]
pub mod def;
pub mod field;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result, ValidationError, Violation};
use crate::record::{RawRecord, RawValue, Record};
use crate::value::Value;

pub use field::{FieldDescriptor, FieldType, ScalarKind};

/// Reserved pseudo-field carrying leftover text content
pub const LEFTOVER_FIELD: &str = "xml_content";

/// How a schema's tag is derived from its declared name
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum NameStyle {
    #[default]
    Verbatim,
    Lowercase,
    Uppercase,
}

impl NameStyle {
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Verbatim => name.to_string(),
            Self::Lowercase => name.to_lowercase(),
            Self::Uppercase => name.to_uppercase(),
        }
    }
}

/// Ordered field declarations of one record type
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    name: String,
    tag: String,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Declared record type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag of the element this record encodes to
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    /// Builds a record from a raw mapping
    ///
    /// Present values are type-checked (nested raw records are constructed
    /// recursively), absent ones take the field default, null when optional,
    /// and are reported missing otherwise. Every violation is collected before
    /// failing. Keys that name no declared field are ignored.
    pub fn construct(schema: &Arc<Self>, raw: RawRecord) -> std::result::Result<Record, ValidationError> {
        let mut violations = Vec::new();
        let record = build_record(schema, raw, "", &mut violations);
        if violations.is_empty() {
            Ok(record)
        } else {
            Err(ValidationError::new(schema.name(), violations))
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn build_record(
    schema: &Arc<Schema>,
    raw: RawRecord,
    prefix: &str,
    violations: &mut Vec<Violation>,
) -> Record {
    let (mut values, leftover) = raw.into_parts();
    let mut checked = Vec::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let path = join_path(prefix, field.name());
        let value = match values.shift_remove(field.name()) {
            Some(raw) => check_field(field, raw, &path, violations),
            None => match field.default() {
                Some(default) => check_field(field, RawValue::Value(default.clone()), &path, violations),
                None if field.is_optional() => Value::Null,
                None => {
                    violations.push(Violation::Missing { field: path });
                    Value::Null
                }
            },
        };
        checked.push(value);
    }

    for name in values.keys() {
        debug!(schema = schema.name(), field = %name, "ignoring undeclared field");
    }

    Record::from_parts(Arc::clone(schema), checked, leftover)
}

fn check_field(
    field: &FieldDescriptor,
    raw: RawValue,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Value {
    if matches!(raw, RawValue::Value(Value::Null)) {
        if field.is_optional() {
            return Value::Null;
        }
        violations.push(Violation::Missing {
            field: path.to_string(),
        });
        return Value::Null;
    }

    match field.field_type() {
        FieldType::Scalar(kind) => check_scalar(*kind, raw, path, violations),
        FieldType::Record(nested) => check_record(nested, raw, path, violations),
        FieldType::ScalarList(kind) => check_list(field.field_type(), raw, path, violations, |item, item_path, violations| {
            check_scalar(*kind, item, item_path, violations)
        }),
        FieldType::RecordList(nested) => check_list(field.field_type(), raw, path, violations, |item, item_path, violations| {
            check_record(nested, item, item_path, violations)
        }),
    }
}

fn mismatch(expected: String, found: &RawValue, path: &str, violations: &mut Vec<Violation>) -> Value {
    violations.push(Violation::TypeMismatch {
        field: path.to_string(),
        expected,
        found: found.type_name().to_string(),
    });
    Value::Null
}

fn check_scalar(
    kind: ScalarKind,
    raw: RawValue,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Value {
    match raw {
        RawValue::Value(value) if kind.accepts(&value) => kind.normalize(value),
        other => mismatch(kind.to_string(), &other, path, violations),
    }
}

fn check_record(
    nested: &Arc<Schema>,
    raw: RawValue,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Value {
    match raw {
        RawValue::Record(raw) => Value::Record(build_record(nested, raw, path, violations)),
        RawValue::Value(Value::Record(record)) if record.schema().as_ref() == nested.as_ref() => {
            Value::Record(record)
        }
        other => mismatch(format!("record {}", nested.name()), &other, path, violations),
    }
}

fn check_list<F>(
    field_type: &FieldType,
    raw: RawValue,
    path: &str,
    violations: &mut Vec<Violation>,
    mut check_item: F,
) -> Value
where
    F: FnMut(RawValue, &str, &mut Vec<Violation>) -> Value,
{
    let items: Vec<RawValue> = match raw {
        RawValue::List(items) => items,
        RawValue::Value(Value::List(items)) => items.into_iter().map(RawValue::Value).collect(),
        other => return mismatch(field_type.describe(), &other, path, violations),
    };

    let checked = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| check_item(item, &format!("{path}[{index}]"), violations))
        .collect();
    Value::List(checked)
}

/// Collects field declarations and validates them into a [`Schema`]
#[derive(Clone, Debug)]
pub struct SchemaBuilder {
    name: String,
    tag: Option<String>,
    name_style: NameStyle,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: None,
            name_style: NameStyle::default(),
            fields: Vec::new(),
        }
    }

    /// Explicit element tag; takes precedence over the name style
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn name_style(mut self, style: NameStyle) -> Self {
        self.name_style = style;
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Checks the declarations and freezes the schema
    ///
    /// Fails with a configuration error when a field name or XML name repeats,
    /// when either equals [`LEFTOVER_FIELD`], or when a default does not
    /// conform to its field type.
    pub fn build(self) -> Result<Arc<Schema>> {
        let tag = match self.tag {
            Some(tag) => tag,
            None => self.name_style.apply(&self.name),
        };
        if tag.is_empty() {
            return Err(Error::configuration(format!(
                "schema {} has an empty tag",
                self.name
            )));
        }

        let mut names = HashSet::new();
        let mut xml_names = HashSet::new();
        for field in &self.fields {
            if field.name() == LEFTOVER_FIELD || field.xml_name() == LEFTOVER_FIELD {
                return Err(Error::configuration(format!(
                    "field {} of {} collides with the reserved {LEFTOVER_FIELD} field",
                    field.name(),
                    self.name
                )));
            }
            if !names.insert(field.name()) {
                return Err(Error::configuration(format!(
                    "field {} is declared twice in {}",
                    field.name(),
                    self.name
                )));
            }
            if !xml_names.insert(field.xml_name()) {
                return Err(Error::configuration(format!(
                    "xml name {} is used by more than one field of {}",
                    field.xml_name(),
                    self.name
                )));
            }
            if let Some(default) = field.default() {
                check_default(&self.name, field, default)?;
            }
        }

        debug!(schema = %self.name, tag = %tag, fields = self.fields.len(), "schema bound");
        Ok(Arc::new(Schema {
            name: self.name,
            tag,
            fields: self.fields,
        }))
    }
}

fn check_default(schema: &str, field: &FieldDescriptor, default: &Value) -> Result<()> {
    let mut violations = Vec::new();
    check_field(
        field,
        RawValue::Value(default.clone()),
        field.name(),
        &mut violations,
    );
    match violations.first() {
        None => Ok(()),
        Some(violation) => Err(Error::configuration(format!(
            "default of {}.{} is invalid: {violation}",
            schema,
            field.name()
        ))),
    }
}
