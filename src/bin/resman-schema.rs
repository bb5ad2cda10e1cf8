//! Resource definition CLI
//!
//! Validates definition documents and exercises resource identifiers
//! from the command line.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use resman_schema::{load_definition, load_directory, Registry, RegistryBuilder, ResourceId};

#[derive(Parser)]
#[command(name = "resman-schema")]
#[command(about = "Validate declarative resource-manager API definitions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate definition documents and report the first violation
    Validate {
        /// Definition file or directory of .json documents
        path: PathBuf,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Parse a concrete resource path against a registered identifier
    Parse {
        /// Definition file or directory
        path: PathBuf,

        /// Resource definition name
        #[arg(long)]
        definition: String,

        /// API version of the definition
        #[arg(long)]
        api_version: String,

        /// Resource identifier name within the definition
        #[arg(long)]
        id: String,

        /// Concrete resource path to parse
        resource_path: String,
    },

    /// Build a concrete resource path from placeholder values
    Build {
        /// Definition file or directory
        path: PathBuf,

        /// Resource definition name
        #[arg(long)]
        definition: String,

        /// API version of the definition
        #[arg(long)]
        api_version: String,

        /// Resource identifier name within the definition
        #[arg(long)]
        id: String,

        /// Placeholder value as key=value (repeatable)
        #[arg(long = "set", value_parser = parse_key_value)]
        values: Vec<(String, String)>,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {s:?}")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path, json } => run_validate(&path, json),
        Commands::Parse {
            path,
            definition,
            api_version,
            id,
            resource_path,
        } => run_parse(&path, &definition, &api_version, &id, &resource_path),
        Commands::Build {
            path,
            definition,
            api_version,
            id,
            values,
        } => run_build(&path, &definition, &api_version, &id, values),
    }
}

/// Load documents and build the validated registry; errors are mapped to
/// (message, exit code): 1 validation, 2 schema/parse, 3 IO.
fn load_registry(path: &Path) -> Result<Registry, (String, u8)> {
    let definitions = if path.is_dir() {
        load_directory(path)
    } else {
        load_definition(path).map(|definition| vec![definition])
    }
    .map_err(|e| (e.to_string(), e.exit_code() as u8))?;

    let mut builder = RegistryBuilder::new();
    for definition in definitions {
        builder
            .register(definition)
            .map_err(|e| (e.to_string(), e.exit_code() as u8))?;
    }
    builder
        .build()
        .map_err(|e| (e.to_string(), e.exit_code() as u8))
}

fn run_validate(path: &Path, json: bool) -> ExitCode {
    match load_registry(path) {
        Ok(registry) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "status": "ok", "definitions": registry.len() })
                );
            } else {
                println!("OK: {} definition(s) validated", registry.len());
            }
            ExitCode::SUCCESS
        }
        Err((message, code)) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "status": "error", "message": message })
                );
            } else {
                eprintln!("error: {message}");
            }
            ExitCode::from(code)
        }
    }
}

/// Look up an identifier in a validated registry.
fn find_identifier<'a>(
    registry: &'a Registry,
    definition: &str,
    api_version: &str,
    id: &str,
) -> Result<&'a ResourceId, String> {
    let definition = registry
        .get(definition, api_version)
        .ok_or_else(|| format!("no definition {definition} ({api_version})"))?;
    definition
        .resource_id(id)
        .ok_or_else(|| format!("no resource identifier {id} in {}", definition.name()))
}

fn run_parse(
    path: &Path,
    definition: &str,
    api_version: &str,
    id: &str,
    resource_path: &str,
) -> ExitCode {
    let registry = match load_registry(path) {
        Ok(registry) => registry,
        Err((message, code)) => {
            eprintln!("error: {message}");
            return ExitCode::from(code);
        }
    };
    let identifier = match find_identifier(&registry, definition, api_version, id) {
        Ok(identifier) => identifier,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(2);
        }
    };

    match identifier.parse(resource_path) {
        Ok(values) => {
            // Sorted keys for stable output.
            let ordered: BTreeMap<String, String> = values.into_iter().collect();
            match serde_json::to_string_pretty(&ordered) {
                Ok(output) => {
                    println!("{output}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::from(2)
                }
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}

fn run_build(
    path: &Path,
    definition: &str,
    api_version: &str,
    id: &str,
    values: Vec<(String, String)>,
) -> ExitCode {
    let registry = match load_registry(path) {
        Ok(registry) => registry,
        Err((message, code)) => {
            eprintln!("error: {message}");
            return ExitCode::from(code);
        }
    };
    let identifier = match find_identifier(&registry, definition, api_version, id) {
        Ok(identifier) => identifier,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(2);
        }
    };

    let values: HashMap<String, String> = values.into_iter().collect();
    match identifier.build(&values) {
        Ok(concrete) => {
            println!("{concrete}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}
