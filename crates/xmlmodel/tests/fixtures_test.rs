use std::fs;
use std::sync::Arc;

use xmlmodel::{from_xml_str, to_xml_string, Schema, SchemaDef, Value};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn cat_schema() -> Result<Arc<Schema>, Box<dyn std::error::Error>> {
    let def: SchemaDef = serde_json::from_str(&fs::read_to_string(format!("{FIXTURES}/cat.json"))?)?;
    Ok(def.build()?)
}

#[test]
fn test_valid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let schema = cat_schema()?;
    for entry in fs::read_dir(format!("{FIXTURES}/valid"))? {
        let path = entry?.path();
        let content = fs::read_to_string(&path)?;
        let record = match from_xml_str(&content, &schema) {
            Ok(record) => record,
            Err(err) => {
                return Err(std::io::Error::other(format!(
                    "Failed to decode valid file {path:?}: {err}"
                ))
                .into());
            }
        };
        let again = from_xml_str(&to_xml_string(&record), &schema)?;
        if again != record {
            return Err(
                std::io::Error::other(format!("Round trip changed record: {path:?}")).into(),
            );
        }
    }
    Ok(())
}

#[test]
fn test_invalid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let schema = cat_schema()?;
    for entry in fs::read_dir(format!("{FIXTURES}/invalid"))? {
        let path = entry?.path();
        let content = fs::read_to_string(&path)?;
        if from_xml_str(&content, &schema).is_ok() {
            return Err(std::io::Error::other(format!(
                "Should fail to decode invalid file: {path:?}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_full_fixture_values() -> Result<(), Box<dyn std::error::Error>> {
    let schema = cat_schema()?;
    let cat = from_xml_str(&fs::read_to_string(format!("{FIXTURES}/valid/full.xml"))?, &schema)?;

    assert_eq!(cat.string("name")?, "Garfield");
    let traits = cat.record("animal_characteristics")?;
    assert_eq!(traits.string("color")?, "orange");
    assert_eq!(traits.integer("weight")?, 20);
    assert!(!traits.boolean("is_friendly")?);
    assert_eq!(
        cat.list("toys")?,
        &[Value::from("lasagna"), Value::from("<yarn>")]
    );
    assert_eq!(cat.leftover_text(), None);
    Ok(())
}

#[test]
fn test_leftover_fixture() -> Result<(), Box<dyn std::error::Error>> {
    let schema = cat_schema()?;
    let cat = from_xml_str(
        &fs::read_to_string(format!("{FIXTURES}/valid/leftover.xml"))?,
        &schema,
    )?;
    assert_eq!(cat.leftover_text().as_deref(), Some("chases \"Jerry\" & friends"));
    assert_eq!(cat.string("name")?, "Tom");
    assert_eq!(cat.get("toys"), Some(&Value::Null));
    Ok(())
}
