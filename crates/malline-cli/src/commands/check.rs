//! Implementation of the `malline check` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use malline::Environment;
use serde::Serialize;

use crate::output::table::{format_check_table, CheckOutcome};
use crate::output::TemplateDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Template files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for a checked file.
#[derive(Serialize)]
pub struct CheckResult {
    pub file: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&CheckOutcome> for CheckResult {
    fn from(outcome: &CheckOutcome) -> Self {
        CheckResult {
            file: outcome.file.clone(),
            ok: outcome.result.is_ok(),
            nodes: outcome.result.as_ref().ok().copied(),
            error: outcome.result.as_ref().err().cloned(),
        }
    }
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let env = Environment::new();
    let mut outcomes = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let file = path.display().to_string();
        let content = match read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                outcomes.push(CheckOutcome {
                    file,
                    result: Err(format!("cannot read file: {e}")),
                });
                continue;
            }
        };

        let result = match env.parse_named(file.clone(), &content) {
            Ok(template) => Ok(template.nodes().len()),
            Err(err) => {
                if !args.json {
                    let diagnostic = TemplateDiagnostic::from_error(path, &content, &err);
                    eprintln!("{:?}", miette::Report::new(diagnostic));
                }
                Err(err.to_string())
            }
        };
        outcomes.push(CheckOutcome { file, result });
    }

    if args.json {
        let results: Vec<CheckResult> = outcomes.iter().map(CheckResult::from).collect();
        let json = serde_json::to_string_pretty(&results)
            .map_err(|e| miette::miette!("Failed to serialize output: {}", e))?;
        println!("{json}");
    } else {
        println!("{}", format_check_table(&outcomes));
    }

    if outcomes.iter().any(|outcome| outcome.result.is_err()) {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
