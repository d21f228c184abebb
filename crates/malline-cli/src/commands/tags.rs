//! Implementation of the `malline tags` command.

use std::collections::BTreeSet;

use malline::{Environment, Extension};
use serde::Serialize;

use crate::output::table::format_registry_table;

/// Arguments for the tags command.
#[derive(Debug, clap::Args)]
pub struct TagsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output listing the registered names.
#[derive(Serialize)]
pub struct Registry {
    pub tags: Vec<String>,
    pub filters: Vec<String>,
}

/// Run the tags command.
pub fn run_tags(args: TagsArgs) -> miette::Result<i32> {
    let env = Environment::new();
    let tags: BTreeSet<&str> = env.extensions().flat_map(Extension::tag_names).collect();
    let filters: BTreeSet<&str> = env.extensions().flat_map(Extension::filter_names).collect();

    let registry = Registry {
        tags: tags.into_iter().map(str::to_string).collect(),
        filters: filters.into_iter().map(str::to_string).collect(),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&registry)
            .map_err(|e| miette::miette!("Failed to serialize output: {}", e))?;
        println!("{json}");
    } else {
        println!("{}", format_registry_table(&registry.tags, &registry.filters));
    }
    Ok(exitcode::OK)
}
