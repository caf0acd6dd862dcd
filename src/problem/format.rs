use super::messages::generate_error_message;
use mathpad::{language::LoadingError, parsing::ParsingError};
use owo_colors::OwoColorize;
use std::path::Path;

use crate::output::{Render, Syntax};

/// Format a parsing error with full details including source code context.
/// The error's offset is relative to `base`, the start of the text it was
/// found in.
pub fn full_parsing_error<'i>(
    error: &ParsingError,
    base: usize,
    filename: &'i Path,
    source: &'i str,
    renderer: &impl Render,
) -> String {
    let (problem, details) = generate_error_message(error, renderer);
    let offset = absolute_offset(source, base, error);

    let i = calculate_line_number(source, offset);
    let j = calculate_column_number(source, offset);

    let code = source
        .split('\n')
        .nth(i)
        .unwrap_or("?");
    let line = i + 1;
    let column = j + 1;
    let width = 3.max(
        line.to_string()
            .len(),
    );

    // underline the width of the error, but stay on this line
    let end = source[offset..]
        .find('\n')
        .map(|n| offset + n)
        .unwrap_or(source.len());
    let end = (offset + error.width()).min(end);
    let carets = "^".repeat(
        source[offset..end]
            .chars()
            .count()
            .max(1),
    );

    format!(
        r#"
{}: {}:{}:{} {}

{:width$} {}
{} {} {}
{:width$} {} {}{}

{}
        "#,
        renderer.style(Syntax::Error, "error"),
        filename.to_string_lossy(),
        line,
        column,
        renderer.style(Syntax::Problem, &problem),
        ' ',
        renderer.style(Syntax::Gutter, "|"),
        renderer.style(Syntax::Gutter, &format!("{:>width$}", line)),
        renderer.style(Syntax::Gutter, "|"),
        code,
        ' ',
        renderer.style(Syntax::Gutter, "|"),
        " ".repeat(j),
        renderer.style(Syntax::Marker, &carets),
        details
    )
    .trim_ascii()
    .to_string()
}

/// Format a parsing error with concise single-line output
pub fn concise_parsing_error<'i>(
    error: &ParsingError,
    base: usize,
    filename: &'i Path,
    source: &'i str,
    renderer: &impl Render,
) -> String {
    let (problem, _) = generate_error_message(error, renderer);
    let offset = absolute_offset(source, base, error);
    let i = calculate_line_number(source, offset);
    let j = calculate_column_number(source, offset);
    let line = i + 1;
    let column = j + 1;

    format!(
        "{}: {}:{}:{} {}",
        renderer.style(Syntax::Error, "error"),
        filename.to_string_lossy(),
        line,
        column,
        renderer.style(Syntax::Problem, &problem),
    )
}

/// Format a LoadingError with concise single-line output
pub fn concise_loading_error<'i>(error: &LoadingError<'i>) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .to_string()
            .bold()
    )
}

fn absolute_offset(source: &str, base: usize, error: &ParsingError) -> usize {
    let mut offset = (base + error.offset()).min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

// This returns a zero-origin result so that it can subsequently be used for
// splitting; for display to humans you'll have to add 1.
pub fn calculate_line_number(content: &str, offset: usize) -> usize {
    content[..offset]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
}

// Zero-origin as well, counted in characters rather than bytes.
pub fn calculate_column_number(content: &str, offset: usize) -> usize {
    let before = &content[..offset];
    match before.rfind('\n') {
        Some(start) => content[start + 1..offset]
            .chars()
            .count(),
        None => before
            .chars()
            .count(),
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::output::Identity;

    #[test]
    fn counting_lines() {
        let content = "This is a test";

        let n = calculate_line_number(content, 5);
        assert_eq!(n + 1, 1);

        let content = r#"
This
is
a
test
            "#
        .trim_ascii();

        let n = calculate_line_number(content, 10);
        assert_eq!(n + 1, 4);

        let after = content
            .lines()
            .nth(n)
            .unwrap();
        assert_eq!(after, "test");
    }

    #[test]
    fn counting_columns() {
        let content = "ab\ncé = 1";

        assert_eq!(calculate_column_number(content, 0), 0);
        assert_eq!(calculate_column_number(content, 3), 0);
        // 'é' is two bytes but one column
        assert_eq!(calculate_column_number(content, 6), 2);
    }

    #[test]
    fn concise_position_relative_to_span() {
        let source = "a = 1\nb = 2 2\n";
        let error = ParsingError::Unrecognized(6, 1);

        let result = concise_parsing_error(&error, 6, Path::new("notes.mp"), source, &Identity);
        assert_eq!(result, "error: notes.mp:2:7 Unrecognized input");
    }

    #[test]
    fn full_underlines_error() {
        let source = "x = 1\ny = 2 +* 3";
        let error = ParsingError::Expected(7, 1, "an operand");

        let result = full_parsing_error(&error, 6, Path::new("notes.mp"), source, &Identity);
        let lines: Vec<&str> = result
            .lines()
            .collect();

        assert_eq!(lines[0], "error: notes.mp:2:8 Expected an operand");
        assert_eq!(lines[2], "    |");
        assert_eq!(lines[3], "  2 | y = 2 +* 3");
        assert_eq!(lines[4], "    |        ^");
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let source = "b = (";
        let error = ParsingError::UnexpectedEndOfInput(5, 0);

        let result = concise_parsing_error(&error, 3, Path::new("-"), source, &Identity);
        assert_eq!(result, "error: -:1:6 Unexpected end of input");
    }
}
