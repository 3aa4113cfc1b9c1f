//! `to_xml` / `from_xml` for user record types

use std::sync::Arc;

use crate::encode::{self, Encoder};
use crate::error::Result;
use crate::record::{RawRecord, Record};
use crate::schema::Schema;
use crate::xml::model::Element;
use crate::xml::{parser, writer};

/// A Rust type that maps onto a [`Schema`]
///
/// Implementors describe their schema and how to move between themselves and
/// a [`Record`]; encoding and decoding are provided.
///
/// ```
/// use std::sync::Arc;
/// use xmlmodel::{FieldDescriptor, RawRecord, Record, Result, Schema, XmlModel};
///
/// #[derive(Debug, PartialEq)]
/// struct Pet {
///     name: String,
///     age: i64,
/// }
///
/// impl XmlModel for Pet {
///     fn schema() -> Result<Arc<Schema>> {
///         Schema::builder("Pet")
///             .field(FieldDescriptor::string("name"))
///             .field(FieldDescriptor::integer("age"))
///             .build()
///     }
///
///     fn to_raw(&self) -> RawRecord {
///         RawRecord::new()
///             .with("name", self.name.as_str())
///             .with("age", self.age)
///     }
///
///     fn from_record(record: &Record) -> Result<Self> {
///         Ok(Self {
///             name: record.string("name")?.to_string(),
///             age: record.integer("age")?,
///         })
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let pet = Pet { name: "Rex".into(), age: 3 };
/// let xml = pet.to_xml()?;
/// assert_eq!(xml, r#"<?xml version="1.0" ?><Pet name="Rex" age="3"/>"#);
/// assert_eq!(Pet::from_xml(&xml)?, pet);
/// # Ok(())
/// # }
/// ```
pub trait XmlModel: Sized {
    fn schema() -> Result<Arc<Schema>>;

    fn to_raw(&self) -> RawRecord;

    fn from_record(record: &Record) -> Result<Self>;

    /// Validated record for `self`
    fn to_record(&self) -> Result<Record> {
        Ok(Schema::construct(&Self::schema()?, self.to_raw())?)
    }

    fn to_element(&self) -> Result<Element> {
        Ok(encode::encode(&self.to_record()?))
    }

    fn to_xml(&self) -> Result<String> {
        self.to_xml_with_config(encode::Config::default(), &writer::Config::default())
    }

    fn to_xml_with_config(
        &self,
        encode_config: encode::Config,
        write_config: &writer::Config,
    ) -> Result<String> {
        let element = Encoder::with_config(encode_config).encode(&self.to_record()?);
        Ok(writer::write_document(&element, write_config))
    }

    fn from_xml(input: &str) -> Result<Self> {
        Self::from_xml_with_config(input, parser::Config::default())
    }

    fn from_xml_with_config(input: &str, config: parser::Config) -> Result<Self> {
        let record = crate::from_xml_str_with_config(input, &Self::schema()?, config)?;
        Self::from_record(&record)
    }
}
