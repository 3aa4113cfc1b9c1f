//! xmlmodel - Bidirectional codec between schema-described records and XML
//!
//! A [`Schema`] declares the fields of one record type. Scalar fields become
//! attributes, nested records become child elements and lists become repeated
//! child elements. Text the schema does not claim is kept as leftover content.
//!
//! # Quick Start
//!
//! ```
//! use xmlmodel::{FieldDescriptor, RawRecord, Schema};
//! # fn main() -> Result<(), xmlmodel::Error> {
//! let schema = Schema::builder("Cat")
//!     .field(FieldDescriptor::string("name"))
//!     .field(FieldDescriptor::integer("lives").default_value(9))
//!     .build()?;
//!
//! let record = Schema::construct(&schema, RawRecord::new().with("name", "Tom"))?;
//! let xml = xmlmodel::to_xml_string(&record);
//! assert_eq!(xml, r#"<?xml version="1.0" ?><Cat name="Tom" lives="9"/>"#);
//!
//! let decoded = xmlmodel::from_xml_str(&xml, &schema)?;
//! assert_eq!(decoded, record);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use std::sync::Arc;

use tracing::instrument;

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span, ValidationError, Violation};

pub mod value;
pub use value::Value;

pub mod schema;
pub use schema::{
    FieldDescriptor, FieldType, NameStyle, ScalarKind, Schema, SchemaBuilder, LEFTOVER_FIELD,
};

pub mod record;
pub use record::{Leftover, RawRecord, RawValue, Record};

pub mod classify;
pub use classify::{classify, Classification, ItemKind};

pub mod scalar;
pub use scalar::BoolStyle;

pub mod xml;
pub use xml::{
    Content as XmlContent, Document as XmlDocument, Element as XmlElement, Parser as XmlParser,
};

pub mod encode;
pub use encode::{encode, Config as EncodeConfig, Encoder};

pub mod decode;
pub use decode::{decode, decode_record, Decoder};

pub mod model;
pub use model::XmlModel;

pub use xml::parser::Config as ParseConfig;
pub use xml::writer::Config as WriteConfig;

#[cfg(feature = "serde")]
pub use schema::def::{DefaultDef, FieldDef, SchemaDef, TypeDef};

/// Parse an XML document
pub fn parse_document(s: &str) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(s.as_bytes());
    parser.parse()
}

/// Parse an XML document with custom limits
pub fn parse_document_with_config(s: &str, config: ParseConfig) -> Result<XmlDocument> {
    let mut parser = XmlParser::with_config(s.as_bytes(), config);
    parser.parse()
}

/// Decode a record of `schema` from XML text
pub fn from_xml_str(s: &str, schema: &Arc<Schema>) -> Result<Record> {
    from_xml_str_with_config(s, schema, ParseConfig::default())
}

/// Decode a record of `schema` from XML text with custom parser limits
#[instrument(skip_all, fields(schema = schema.name()))]
pub fn from_xml_str_with_config(
    s: &str,
    schema: &Arc<Schema>,
    config: ParseConfig,
) -> Result<Record> {
    let document = parse_document_with_config(s, config)?;
    decode_record(&document.root, schema)
}

/// Encode a record as a compact XML document with declaration
pub fn to_xml_string(record: &Record) -> String {
    to_xml_string_with_config(record, EncodeConfig::default(), &WriteConfig::default())
}

/// Encode a record with custom encoder and writer settings
#[instrument(skip_all, fields(schema = record.schema().name()))]
pub fn to_xml_string_with_config(
    record: &Record,
    encode_config: EncodeConfig,
    write_config: &WriteConfig,
) -> String {
    let element = Encoder::with_config(encode_config).encode(record);
    xml::write_document(&element, write_config)
}
