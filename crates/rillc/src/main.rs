//! The Rill CLI.
//!
//! `rillc <file.rill>` runs the full pipeline: lex, parse, type-check,
//! and (by default) evaluate. Each stage only runs when the previous
//! one produced no diagnostics, so a lex error never cascades into
//! parser noise.
//!
//! Options:
//! - `--no-interpret` - stop after type checking
//! - `--debug` - dump the parsed AST as JSON to stdout

use std::io::Write;
use std::ops::Range;
use std::path::PathBuf;
use std::process::ExitCode;

use ariadne::{Config, Label, Report, ReportKind, Source};
use clap::Parser;

use rill_common::diagnostic::Diagnostic;
use rill_common::span::LineIndex;

#[derive(Parser)]
#[command(name = "rillc", version, about = "The Rill language toolchain")]
struct Cli {
    /// Path to a Rill source file
    file: PathBuf,

    /// Evaluate the program after checking (the default)
    #[arg(long, overrides_with = "no_interpret")]
    interpret: bool,

    /// Stop after type checking
    #[arg(long)]
    no_interpret: bool,

    /// Dump the parsed AST as JSON
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: failed to read '{}': {}", cli.file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(diagnostics) => {
            report(&source, &diagnostics);
            ExitCode::FAILURE
        }
    }
}

/// The pipeline. Returns the first stage's diagnostics when one fails.
fn run(cli: &Cli, source: &str) -> Result<(), Vec<Diagnostic>> {
    let lexed = rill_lexer::tokenize(source);
    if !lexed.ok() {
        return Err(lexed.diagnostics);
    }

    let parse = rill_parser::parse(lexed.tokens);
    if cli.debug {
        match serde_json::to_string_pretty(&parse.program) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("error: failed to serialize AST: {err}"),
        }
    }
    if !parse.ok() {
        return Err(parse.diagnostics);
    }

    let checked = rill_typeck::check(&parse.program);
    if !checked.ok() {
        return Err(checked.diagnostics);
    }

    let evaluate = cli.interpret || !cli.no_interpret;
    if evaluate {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        rill_interp::interpret(&parse.program, &mut out).map_err(|fault| vec![fault])?;
        let _ = out.flush();
    }

    Ok(())
}

/// Render diagnostics to stderr as `[row:col]: message` reports with a
/// labeled source span.
fn report(source: &str, diagnostics: &[Diagnostic]) {
    let lines = LineIndex::new(source);

    for diag in diagnostics {
        let rendered = diag.render(&lines);
        let span = clamp(diag.span.start as usize..diag.span.end as usize, source.len());

        let result = Report::<Range<usize>>::build(ReportKind::Error, span.clone())
            .with_config(Config::default().with_color(false))
            .with_message(&rendered)
            .with_label(Label::new(span).with_message(&diag.message))
            .finish()
            .eprint(Source::from(source));
        if result.is_err() {
            // Fall back to the plain rendering if ariadne cannot print.
            eprintln!("{rendered}");
        }
    }
}

/// Keep a span inside the source and at least one character wide so
/// ariadne always has something to underline.
fn clamp(range: Range<usize>, len: usize) -> Range<usize> {
    let start = range.start.min(len);
    let end = range.end.clamp(start, len);
    if start == end && len > 0 {
        start.saturating_sub(1)..end.max(1).min(len)
    } else {
        start..end
    }
}
