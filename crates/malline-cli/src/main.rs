//! Malline CLI entry point.
//!
//! Provides command-line tools for working with malline templates:
//! - `malline render` - Render a template from disk against JSON data
//! - `malline check` - Parse templates and report syntax errors
//! - `malline tags` - List the built-in tags and filters

mod commands;
mod output;

use std::io;
use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{run_check, run_render, run_tags, CheckArgs, RenderArgs, TagsArgs};
use tracing_subscriber::EnvFilter;

/// Malline template tools.
#[derive(Debug, Parser)]
#[command(name = "malline")]
#[command(about = "Malline template tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a template against a context
    Render(RenderArgs),
    /// Check template files for syntax errors
    Check(CheckArgs),
    /// List the registered tags and filters
    Tags(TagsArgs),
}

/// Set up color output based on user preference.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {
            // owo-colors checks TTY, NO_COLOR and FORCE_COLOR itself
        }
        ColorWhen::Always => {
            owo_colors::set_override(true);
        }
        ColorWhen::Never => {
            owo_colors::set_override(false);
        }
    }
}

/// Install a stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_logging(cli.verbose);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Render(args) => run_render(args),
        Commands::Check(args) => run_check(args),
        Commands::Tags(args) => run_tags(args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{e:?}");
            exit(exitcode::SOFTWARE);
        }
    }
}
