//! Output generation for the mathpad command line program

use mathpad::language::Span;
use mathpad::parsing::ParsingError;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Kinds of fragment that can be styled differently in output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Syntax {
    Location,
    Gutter,
    Source,
    Error,
    Marker,
    Problem,
    Example,
}

/// Trait for different rendering backends (the no-op no-markup one, ANSI
/// escapes for terminal colouring)
pub trait Render {
    /// Apply styling to content with the specified syntax type
    fn style(&self, syntax: Syntax, content: &str) -> String;
}

/// Returns content unchanged, with no markup applied
pub struct Identity;

impl Render for Identity {
    fn style(&self, _syntax: Syntax, content: &str) -> String {
        content.to_string()
    }
}

/// Embellish fragments with ANSI escapes for display on a terminal.
pub struct Terminal;

impl Render for Terminal {
    fn style(&self, syntax: Syntax, content: &str) -> String {
        match syntax {
            Syntax::Location => content
                .bright_blue()
                .to_string(),
            Syntax::Gutter => content
                .bright_blue()
                .to_string(),
            Syntax::Source => content.to_string(),
            Syntax::Error => content
                .bright_red()
                .to_string(),
            Syntax::Marker => content
                .bright_red()
                .bold()
                .to_string(),
            Syntax::Problem => content
                .bold()
                .to_string(),
            Syntax::Example => content // #3465a4 (blue)
                .color(owo_colors::Rgb(52, 101, 164))
                .to_string(),
        }
    }
}

/// List spans one after another, each headed by its line range and byte
/// range, with its source indented beneath.
pub fn render_spans(spans: &[Span<'_, ParsingError>], renderer: &dyn Render) -> String {
    let mut result = String::new();

    for span in spans {
        let lines = if span.first == span.last {
            format!("{}", span.first + 1)
        } else {
            format!("{}-{}", span.first + 1, span.last + 1)
        };

        result.push_str(&renderer.style(Syntax::Location, &format!("[{}]", lines)));
        result.push(' ');
        result.push_str(&format!("{}..{}", span.from, span.to));

        if let Some(error) = &span.error {
            result.push(' ');
            result.push_str(&renderer.style(Syntax::Error, "error:"));
            result.push(' ');
            result.push_str(&renderer.style(Syntax::Problem, &error.message()));
        }
        result.push('\n');

        for line in span
            .source
            .split('\n')
        {
            result.push_str(&renderer.style(Syntax::Gutter, "    |"));
            if !line.is_empty() {
                result.push(' ');
                result.push_str(&renderer.style(Syntax::Source, line));
            }
            result.push('\n');
        }
    }

    result
}

#[derive(Serialize)]
struct Record<'a> {
    from: usize,
    to: usize,
    first: usize,
    last: usize,
    source: &'a str,
    error: Option<String>,
}

/// Serialize spans as a JSON array of objects.
pub fn spans_to_json(spans: &[Span<'_, ParsingError>]) -> Result<String, serde_json::Error> {
    let records: Vec<Record> = spans
        .iter()
        .map(|span| Record {
            from: span.from,
            to: span.to,
            first: span.first,
            last: span.last,
            source: span.source,
            error: span
                .error
                .as_ref()
                .map(|error| error.message()),
        })
        .collect();

    serde_json::to_string_pretty(&records)
}
