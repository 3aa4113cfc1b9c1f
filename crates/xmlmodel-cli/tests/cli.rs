use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCHEMA: &str = r#"{
    "name": "Cat",
    "fields": [
        {"name": "animal_characteristics", "alias": "AnimalCharacteristics", "type": {"record": {
            "name": "AnimalCharacteristics",
            "fields": [
                {"name": "color", "type": "string", "default": "black"},
                {"name": "weight", "type": "integer", "default": 10},
                {"name": "is_friendly", "type": "boolean", "default": true}
            ]
        }}},
        {"name": "name", "type": "string", "default": "Kitty"}
    ]
}"#;

const CAT: &str = r#"<Cat name="Tom"><AnimalCharacteristics color="grey"/></Cat>"#;

fn setup() -> Result<TempDir, Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("cat.json"), SCHEMA)?;
    fs::write(dir.path().join("cat.xml"), CAT)?;
    Ok(dir)
}

fn xmlmodel(dir: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("xmlmodel")?;
    cmd.current_dir(dir);
    Ok(cmd)
}

#[test]
fn test_validate_ok() -> Result<(), Box<dyn std::error::Error>> {
    let dir = setup()?;
    xmlmodel(dir.path())?
        .args(["validate", "--schema", "cat.json", "cat.xml"])
        .assert()
        .success()
        .stdout("ok\n");
    Ok(())
}

#[test]
fn test_validate_reports_wrong_root() -> Result<(), Box<dyn std::error::Error>> {
    let dir = setup()?;
    xmlmodel(dir.path())?
        .args(["validate", "--schema", "cat.json"])
        .write_stdin(r#"<Dog name="Rex"/>"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected element <Cat>, found <Dog>"));
    Ok(())
}

#[test]
fn test_validate_reports_coercion_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = setup()?;
    xmlmodel(dir.path())?
        .args(["validate", "-s", "cat.json"])
        .write_stdin(r#"<Cat><AnimalCharacteristics weight="heavy"/></Cat>"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("heavy"));
    Ok(())
}

#[test]
fn test_format_compact_fills_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = setup()?;
    xmlmodel(dir.path())?
        .args(["format", "--schema", "cat.json", "cat.xml"])
        .assert()
        .success()
        .stdout(
            "<?xml version=\"1.0\" ?><Cat name=\"Tom\"><AnimalCharacteristics color=\"grey\" weight=\"10\" is_friendly=\"True\"/></Cat>\n",
        );
    Ok(())
}

#[test]
fn test_format_indented_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = setup()?;
    xmlmodel(dir.path())?
        .args([
            "format",
            "--schema",
            "cat.json",
            "--indent",
            "2",
            "--no-declaration",
            "--lowercase-bools",
            "--output",
            "out.xml",
            "cat.xml",
        ])
        .assert()
        .success();

    let written = fs::read_to_string(dir.path().join("out.xml"))?;
    assert_eq!(
        written,
        "<Cat name=\"Tom\">\n  <AnimalCharacteristics color=\"grey\" weight=\"10\" is_friendly=\"true\"/>\n</Cat>\n"
    );
    Ok(())
}

#[test]
fn test_to_json() -> Result<(), Box<dyn std::error::Error>> {
    let dir = setup()?;
    let output = xmlmodel(dir.path())?
        .args(["to-json", "--schema", "cat.json", "cat.xml"])
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["name"], "Tom");
    assert_eq!(json["animal_characteristics"]["weight"], 10);
    assert_eq!(json["animal_characteristics"]["is_friendly"], true);
    Ok(())
}

#[test]
fn test_invalid_schema_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = setup()?;
    fs::write(
        dir.path().join("bad.json"),
        r#"{"name": "Cat", "fields": [{"name": "xml_content", "type": "string"}]}"#,
    )?;
    xmlmodel(dir.path())?
        .args(["validate", "--schema", "bad.json", "cat.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid schema Cat"));
    Ok(())
}

#[test]
fn test_empty_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let dir = setup()?;
    xmlmodel(dir.path())?
        .args(["validate", "--schema", "cat.json"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input provided on stdin"));
    Ok(())
}
