use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xmlmodel::{BoolStyle, EncodeConfig, Record, Schema, SchemaDef, WriteConfig};

#[derive(Debug, Parser)]
#[command(
    name = "xmlmodel",
    version,
    about = "Validate and re-encode XML documents against a record schema"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Raise log verbosity (RUST_LOG takes precedence)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode the input against the schema and report the outcome
    Validate(Source),
    /// Decode the input and encode it again
    Format {
        #[command(flatten)]
        source: Source,
        /// Indent nested elements by N spaces
        #[arg(long, value_name = "N")]
        indent: Option<usize>,
        /// Omit the XML declaration
        #[arg(long)]
        no_declaration: bool,
        /// Write booleans as true/false instead of True/False
        #[arg(long)]
        lowercase_bools: bool,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Decode the input and print the record as JSON
    ToJson {
        #[command(flatten)]
        source: Source,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
struct Source {
    /// Schema definition file (JSON)
    #[arg(short, long, value_name = "SCHEMA")]
    schema: PathBuf,
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Validate(source) => {
            decode(&source)?;
            write_output(&None, b"ok\n")
        }
        Command::Format {
            source,
            indent,
            no_declaration,
            lowercase_bools,
            output,
        } => {
            let record = decode(&source)?;
            let bool_style = if lowercase_bools {
                BoolStyle::Lowercase
            } else {
                BoolStyle::Capitalized
            };
            let mut xml = xmlmodel::to_xml_string_with_config(
                &record,
                EncodeConfig::new(bool_style),
                &WriteConfig::new(indent, !no_declaration),
            );
            if !xml.ends_with('\n') {
                xml.push('\n');
            }
            write_output(&output, xml.as_bytes())
        }
        Command::ToJson { source, output } => {
            let record = decode(&source)?;
            let mut json =
                serde_json::to_string_pretty(&record).context("failed to serialize record")?;
            json.push('\n');
            write_output(&output, json.as_bytes())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn decode(source: &Source) -> Result<Record> {
    let schema = load_schema(&source.schema)?;
    let input = read_input(&source.input)?;
    let record = xmlmodel::from_xml_str(&input, &schema)
        .with_context(|| format!("input does not match schema {}", schema.name()))?;
    info!(schema = schema.name(), "decoded record");
    Ok(record)
}

fn load_schema(path: &Path) -> Result<Arc<Schema>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))?;
    let def: SchemaDef = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse schema file {}", path.display()))?;
    let schema = def
        .build()
        .with_context(|| format!("invalid schema {}", def.name))?;
    debug!(schema = schema.name(), fields = schema.fields().len(), "schema loaded");
    Ok(schema)
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
