//! Text conversion of scalar values

use crate::error::{Error, Result};
use crate::schema::ScalarKind;
use crate::value::Value;

/// Spelling of booleans in encoded output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoolStyle {
    /// `True` / `False`
    #[default]
    Capitalized,
    /// `true` / `false`
    Lowercase,
}

impl BoolStyle {
    pub const fn render(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::Capitalized, true) => "True",
            (Self::Capitalized, false) => "False",
            (Self::Lowercase, true) => "true",
            (Self::Lowercase, false) => "false",
        }
    }
}

/// Canonical text of a scalar; `None` for null and structural values
pub fn to_text(value: &Value, style: BoolStyle) -> Option<String> {
    match value {
        Value::Bool(b) => Some(style.render(*b).to_string()),
        Value::Integer(n) => Some(n.to_string()),
        Value::Float(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Record(_) | Value::List(_) => None,
    }
}

/// Case-insensitive `true` / `false`
pub fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Reads `text` as a value of `kind`; `field` names the target in errors
pub fn coerce(text: &str, kind: ScalarKind, field: &str) -> Result<Value> {
    let value = match kind {
        ScalarKind::String => Some(Value::String(text.to_string())),
        ScalarKind::Integer => text.trim().parse::<i64>().ok().map(Value::Integer),
        ScalarKind::Float => text.trim().parse::<f64>().ok().map(Value::Float),
        ScalarKind::Boolean => parse_bool(text).map(Value::Bool),
    };
    value.ok_or_else(|| Error::coercion(field, text, kind))
}
