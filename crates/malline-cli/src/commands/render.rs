//! Implementation of the `malline render` command.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use malline::{Environment, Error, FileSystemLoader, Map, Value};
use serde::Serialize;
use tracing::debug;

use crate::output::TemplateDiagnostic;

/// Arguments for the render command.
#[derive(Debug, clap::Args)]
pub struct RenderArgs {
    /// Template name, relative to the search paths
    pub name: String,

    /// Directories to search for templates (repeatable)
    #[arg(short = 'p', long = "path", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// JSON file with an object to render against
    #[arg(short, long)]
    pub context: Option<PathBuf>,

    /// Variables in name=value format (repeatable)
    #[arg(long = "var", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for render results.
#[derive(Serialize)]
pub struct RenderResult {
    pub name: String,
    pub output: String,
}

/// Parse a key=value variable string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid variable format '{s}': expected name=value"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Interpret a command-line value as an integer, float or boolean, falling
/// back to a string.
fn parse_value(raw: String) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::from(f)
    } else if let Ok(b) = raw.parse::<bool>() {
        Value::from(b)
    } else {
        Value::from(raw)
    }
}

/// Read the `--context` file, which must hold a JSON object.
fn load_context(path: &Path) -> miette::Result<Map> {
    let content = read_to_string(path)
        .map_err(|e| miette::miette!("Cannot read context file {}: {}", path.display(), e))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| miette::miette!("Failed to parse context file {}: {}", path.display(), e))?;
    match Value::from(json) {
        Value::Mapping(map) => Ok(map),
        _ => Err(miette::miette!(
            "Context file {} must contain a JSON object",
            path.display()
        )),
    }
}

/// Exit code for a failed render.
fn exit_code(err: &Error) -> i32 {
    match err {
        Error::NotFound { .. } => exitcode::NOINPUT,
        Error::SuspiciousPath { .. } => exitcode::NOPERM,
        Error::Io { .. } => exitcode::IOERR,
        _ => exitcode::DATAERR,
    }
}

/// A labelled diagnostic when the error comes from parsing `name` itself.
///
/// The source is read back through the environment's loader so its path
/// checks apply. Errors raised while rendering, or inside included and
/// parent templates, get no source.
fn diagnose(env: &Environment, name: &str, err: &Error) -> Option<TemplateDiagnostic> {
    if matches!(
        err,
        Error::NotFound { .. } | Error::SuspiciousPath { .. } | Error::Io { .. }
    ) {
        return None;
    }
    let source = env.loader()?.load(name).ok()?;
    let parse_error = env.parse_named(name, &source).err()?;
    Some(TemplateDiagnostic::from_error(
        Path::new(name),
        &source,
        &parse_error,
    ))
}

/// Run the render command.
pub fn run_render(args: RenderArgs) -> miette::Result<i32> {
    let mut data = match &args.context {
        Some(path) => load_context(path)?,
        None => Map::new(),
    };
    for (name, raw) in args.vars {
        data.insert(name, parse_value(raw));
    }
    debug!(template = %args.name, variables = data.len(), "rendering");

    let loader = FileSystemLoader::new(args.paths.iter().cloned());
    let env = Environment::builder().loader(Arc::new(loader)).build();

    match env.render_template(&args.name, data) {
        Ok(output) => {
            if args.json {
                let result = RenderResult {
                    name: args.name,
                    output,
                };
                let json = serde_json::to_string_pretty(&result)
                    .map_err(|e| miette::miette!("Failed to serialize output: {}", e))?;
                println!("{json}");
            } else {
                print!("{output}");
            }
            Ok(exitcode::OK)
        }
        Err(err) => {
            if args.json {
                let output = serde_json::json!({ "error": err.to_string() });
                let json = serde_json::to_string_pretty(&output)
                    .map_err(|e| miette::miette!("Failed to serialize output: {}", e))?;
                eprintln!("{json}");
            } else if let Some(diagnostic) = diagnose(&env, &args.name, &err) {
                eprintln!("{:?}", miette::Report::new(diagnostic));
            } else {
                eprintln!("Render error: {err}");
            }
            Ok(exit_code(&err))
        }
    }
}
