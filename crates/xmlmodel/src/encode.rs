//! Record to element tree encoding

use tracing::{trace, warn};

use crate::classify::{classify, item_kind, Classification, ItemKind};
use crate::record::Record;
use crate::scalar::{self, BoolStyle};
use crate::value::Value;
use crate::xml::model::Element;

/// Configuration for the encoder
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub bool_style: BoolStyle,
}

impl Config {
    pub const fn new(bool_style: BoolStyle) -> Self {
        Self { bool_style }
    }
}

/// Walks a record and builds its element tree
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    config: Config,
}

impl Encoder {
    pub const fn new() -> Self {
        Self::with_config(Config::new(BoolStyle::Capitalized))
    }

    pub const fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Encode `record` as an element tagged with its schema tag
    pub fn encode(&self, record: &Record) -> Element {
        self.encode_as(record, record.schema().tag())
    }

    fn encode_as(&self, record: &Record, tag: &str) -> Element {
        let mut element = Element::new(tag);
        let mut children = Vec::new();

        for (field, value) in record.fields() {
            if value.is_null() {
                trace!(field = field.name(), "null field omitted");
                continue;
            }

            match (classify(field), value) {
                (Classification::Attribute, value) => {
                    match scalar::to_text(value, self.config.bool_style) {
                        Some(text) => element.set_attribute(field.xml_name(), text),
                        None => warn!(
                            field = field.name(),
                            found = value.type_name(),
                            "attribute field does not hold a scalar"
                        ),
                    }
                }
                (Classification::Element, Value::Record(nested)) => {
                    children.push(self.encode_as(nested, field.xml_name()));
                }
                (Classification::RepeatedElement, Value::List(items)) => {
                    let kind = item_kind(field.field_type());
                    children.extend(
                        items
                            .iter()
                            .filter_map(|item| self.encode_item(item, kind, field.xml_name())),
                    );
                }
                (classification, value) => warn!(
                    field = field.name(),
                    ?classification,
                    found = value.type_name(),
                    "value does not match field classification"
                ),
            }
        }

        let leftover = record.leftover();
        if let Some(leftover) = leftover {
            element.push_text(leftover.before_children());
        }
        for child in children {
            element.push_element(child);
        }
        if let Some(leftover) = leftover {
            element.push_text(leftover.after_children());
        }

        element
    }

    fn encode_item(&self, item: &Value, kind: Option<ItemKind>, tag: &str) -> Option<Element> {
        match (kind, item) {
            (Some(ItemKind::Record), Value::Record(nested)) => Some(self.encode_as(nested, tag)),
            (Some(ItemKind::Text), item) => scalar::to_text(item, self.config.bool_style)
                .map(|text| Element::new(tag).with_text(text)),
            (_, item) => {
                warn!(tag, found = item.type_name(), "list item does not match item kind");
                None
            }
        }
    }
}

/// Encode with the default configuration
pub fn encode(record: &Record) -> Element {
    Encoder::new().encode(record)
}
