//! Error types for xmlmodel

use std::fmt;
use thiserror::Error;

use crate::schema::ScalarKind;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }

    /// True when the span does not point into any source text
    pub const fn is_empty(&self) -> bool {
        self.start.line == 0
    }
}

/// One reason a raw record could not be turned into a [`Record`](crate::Record)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// A required field had no value and no default
    Missing { field: String },
    /// A value did not match the declared field type
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
}

impl Violation {
    /// Dotted path of the offending field, e.g. `items[2].weight`
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field } | Self::TypeMismatch { field, .. } => field,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{field}: field required"),
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "{field}: expected {expected}, found {found}"),
        }
    }
}

/// Failure reported by record construction, listing every violated field
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{count} validation error(s) for {schema}: {summary}", count = .violations.len(), summary = join_violations(.violations))]
pub struct ValidationError {
    schema: String,
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(schema: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            schema: schema.into(),
            violations,
        }
    }

    /// Name of the schema whose construction failed
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// Input is not well-formed XML
    Syntax,
    MaxDepthExceeded {
        max: u16,
    },
    MaxSizeExceeded {
        max: usize,
    },
    /// Element tag does not match the schema tag
    Structure {
        expected: String,
        found: String,
    },
    /// Attribute or text value cannot be converted to the field's scalar kind
    Coercion {
        field: String,
        value: String,
        expected: ScalarKind,
    },
    /// Record construction rejected the decoded fields
    Validation(ValidationError),
    /// Schema declaration is unusable
    Configuration {
        reason: String,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "malformed xml"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::Structure { expected, found } => {
                write!(f, "expected element <{expected}>, found <{found}>")
            }
            Self::Coercion {
                field,
                value,
                expected,
            } => write!(f, "field {field}: cannot read {value:?} as {expected}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Configuration { reason } => write!(f, "invalid schema: {reason}"),
        }
    }
}

/// Main error type for xmlmodel
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }

    pub fn structure(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Structure {
                expected: expected.into(),
                found: found.into(),
            },
            Span::empty(),
        )
    }

    pub fn coercion(field: impl Into<String>, value: impl Into<String>, expected: ScalarKind) -> Self {
        Self::new(
            ErrorKind::Coercion {
                field: field.into(),
                value: value.into(),
                expected,
            },
            Span::empty(),
        )
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Configuration {
                reason: reason.into(),
            },
            Span::empty(),
        )
    }

    /// The validation failure carried by this error, if any
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match &self.kind {
            ErrorKind::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::new(ErrorKind::Validation(err), Span::empty())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.message)
        }
    }
}

/// Result type alias for xmlmodel
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "10:5");
    }

    #[test]
    fn test_syntax_error_display_has_location() {
        let err = Error::at(ErrorKind::Syntax, 10, 2, 5);
        let display = err.to_string();
        assert!(display.contains("error at 2:5"));
        assert!(display.contains("malformed xml"));
    }

    #[test]
    fn test_structure_error_display() {
        let err = Error::structure("Cat", "Dog");
        assert_eq!(err.to_string(), "expected element <Cat>, found <Dog>");
    }

    #[test]
    fn test_coercion_error_display() {
        let err = Error::coercion("weight", "heavy", ScalarKind::Integer);
        assert_eq!(
            err.to_string(),
            "field weight: cannot read \"heavy\" as integer"
        );
    }

    #[test]
    fn test_validation_passthrough() {
        let validation = ValidationError::new(
            "Cat",
            vec![Violation::Missing {
                field: "name".to_string(),
            }],
        );
        let err = Error::from(validation.clone());
        assert_eq!(err.as_validation(), Some(&validation));
        assert_eq!(
            err.to_string(),
            "1 validation error(s) for Cat: name: field required"
        );
    }
}
