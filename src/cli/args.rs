//! Command-line arguments and subcommands for the forma CLI.
//!
//! Uses the `clap` derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "forma",
    version,
    about = "Render and validate configuration-driven HTML forms."
)]
pub struct FormaArgs {
    /// Log debug events to stderr (overrides FORMA_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a form from a config file and print its markup.
    Render {
        /// JSON or YAML form configuration.
        #[arg(required = true)]
        file: PathBuf,
        /// Form action attribute.
        #[arg(long, default_value = "#")]
        action: String,
        /// Form method attribute.
        #[arg(long, default_value = "post")]
        method: String,
        /// Field values to bind before rendering, as a JSON object.
        #[arg(long)]
        values: Option<String>,
        /// Spaces per indentation level.
        #[arg(long, default_value_t = 4)]
        indent: usize,
    },
    /// Bind submitted values and report validation errors.
    Validate {
        /// JSON or YAML form configuration.
        #[arg(required = true)]
        file: PathBuf,
        /// Submitted values as a JSON object.
        #[arg(long, required = true)]
        values: String,
    },
    /// Build every config file under a directory and report failures.
    Check {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// List the supported field types.
    Types,
}
