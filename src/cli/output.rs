//! User-facing output for the CLI.
//!
//! Every printer writes to a [`WriteColor`] sink so output can be captured
//! in tests; [`stdout`] picks a color choice from whether the stream is a
//! terminal.

use std::io::{self, Write};
use std::path::Path;

use indexmap::IndexMap;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

// ============================================================================
// STREAMS
// ============================================================================

fn color_choice(stream: atty::Stream) -> ColorChoice {
    if atty::is(stream) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice(atty::Stream::Stdout))
}

// ============================================================================
// PRINTERS
// ============================================================================

pub fn print_valid(out: &mut impl WriteColor) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    writeln!(out, "valid")?;
    out.reset()
}

/// One block per failing field: the field name, then its messages.
pub fn print_field_errors(out: &mut impl WriteColor, errors: &IndexMap<String, Vec<String>>) -> io::Result<()> {
    for (field, messages) in errors {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(out, "{}", field)?;
        out.reset()?;
        writeln!(out, ":")?;
        for message in messages {
            writeln!(out, "  - {}", message)?;
        }
    }
    Ok(())
}

pub fn print_check_ok(out: &mut impl WriteColor, path: &Path, fields: usize) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "ok")?;
    out.reset()?;
    writeln!(out, "    {} ({} fields)", path.display(), fields)
}

pub fn print_check_failed(out: &mut impl WriteColor, path: &Path, report: &miette::Report) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
    write!(out, "error")?;
    out.reset()?;
    writeln!(out, " {}", path.display())?;
    writeln!(out, "{:?}", report)
}

pub fn print_summary(out: &mut impl WriteColor, checked: usize, failed: usize) -> io::Result<()> {
    let color = if failed == 0 { Color::Green } else { Color::Red };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    writeln!(out, "{} checked, {} failed", checked, failed)?;
    out.reset()
}

pub fn print_types(out: &mut impl WriteColor, types: &[&str]) -> io::Result<()> {
    for field_type in types {
        writeln!(out, "{}", field_type)?;
    }
    Ok(())
}
