//! Field classification: attribute, single child element or repeated children
//!
//! The decision depends on the declared field type only, never on the current
//! value, so encoder and decoder always agree on where a field lives.

use crate::schema::{FieldDescriptor, FieldType};

/// Where a field is placed in XML
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Attribute on the record's element
    Attribute,
    /// One child element named after the field
    Element,
    /// One child element per list item, all named after the field
    RepeatedElement,
}

/// Payload of each repeated child element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    /// Child is an encoded record
    Record,
    /// Child holds only text content
    Text,
}

pub fn classify(field: &FieldDescriptor) -> Classification {
    classify_type(field.field_type())
}

pub fn classify_type(field_type: &FieldType) -> Classification {
    match field_type {
        FieldType::Scalar(_) => Classification::Attribute,
        FieldType::Record(_) => Classification::Element,
        FieldType::ScalarList(_) | FieldType::RecordList(_) => Classification::RepeatedElement,
    }
}

/// Item payload for list types, `None` otherwise
pub fn item_kind(field_type: &FieldType) -> Option<ItemKind> {
    match field_type {
        FieldType::ScalarList(_) => Some(ItemKind::Text),
        FieldType::RecordList(_) => Some(ItemKind::Record),
        FieldType::Scalar(_) | FieldType::Record(_) => None,
    }
}
