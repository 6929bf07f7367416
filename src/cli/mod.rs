//! The forma command-line interface.
//!
//! Entry point for every subcommand. Configuration errors are printed as
//! `miette` reports; a failed validation or check exits with status 1.

use std::path::Path;
use std::process;

use clap::Parser;
use indexmap::IndexMap;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::cli::args::{Command, FormaArgs};
use crate::config;
use crate::diagnostics::Result;
use crate::factory::{FieldFactory, FIELD_TYPES};
use crate::form::Form;
use crate::tokens::MemoryTokenStore;
use crate::value::Value;

pub mod args;
pub mod output;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FORMA_LOG";

pub fn run() {
    let args = FormaArgs::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Command::Render {
            file,
            action,
            method,
            values,
            indent,
        } => handle_render(&file, action, method, values.as_deref(), indent),
        Command::Validate { file, values } => handle_validate(&file, &values),
        Command::Check { path } => handle_check(&path),
        Command::Types => handle_types(),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("forma=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

// ============================================================================
// SUBCOMMANDS
// ============================================================================

/// Every handler returns `Ok(false)` when it ran but the outcome is a
/// failure the user has already been told about.
type Outcome = Result<bool>;

fn build_form(path: &Path, store: &mut MemoryTokenStore) -> Result<Form> {
    let document = config::load(path)?;
    let mut factory = FieldFactory::with_token_store(store);
    Form::from_document(&document, &mut factory)
}

/// Binds values into every fieldset, not only the current one.
fn bind_values(form: &mut Form, values: &IndexMap<String, Value>) {
    let current = form.current();
    for index in 0..form.fieldsets().len() {
        form.set_current(index);
        form.set_field_values(values.iter().map(|(k, v)| (k, v.clone())));
    }
    if !form.fieldsets().is_empty() {
        form.set_current(current);
    }
}

fn handle_render(path: &Path, action: String, method: String, values: Option<&str>, indent: usize) -> Outcome {
    let mut store = MemoryTokenStore::new();
    let mut form = build_form(path, &mut store)?;
    form.set_action(action).set_method(method);
    if let Some(values) = values {
        bind_values(&mut form, &config::parse_values(values)?);
    }
    let pad = " ".repeat(indent);
    print!("{}", form.render(0, Some(pad.as_str())));
    Ok(true)
}

fn handle_validate(path: &Path, values: &str) -> Outcome {
    let mut store = MemoryTokenStore::new();
    let mut form = build_form(path, &mut store)?;
    bind_values(&mut form, &config::parse_values(values)?);

    let valid = form.is_valid();
    if valid {
        output::print_valid(&mut output::stdout()).ok();
    } else {
        output::print_field_errors(&mut output::stdout(), &form.get_all_errors()).ok();
    }
    Ok(valid)
}

fn handle_check(root: &Path) -> Outcome {
    let mut out = output::stdout();
    let mut checked = 0;
    let mut failed = 0;

    let files = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && config::is_config_file(entry.path()));

    for entry in files {
        checked += 1;
        let mut store = MemoryTokenStore::new();
        match build_form(entry.path(), &mut store) {
            Ok(form) => output::print_check_ok(&mut out, entry.path(), form.count()).ok(),
            Err(e) => {
                failed += 1;
                output::print_check_failed(&mut out, entry.path(), &miette::Report::new(e)).ok()
            }
        };
    }

    output::print_summary(&mut out, checked, failed).ok();
    Ok(failed == 0)
}

fn handle_types() -> Outcome {
    output::print_types(&mut output::stdout(), FIELD_TYPES).ok();
    Ok(true)
}
