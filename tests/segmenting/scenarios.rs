use mathpad::language::{locate, Span};
use mathpad::parsing::{Grammar, ParsingError};
use mathpad::segmenting::{self, Segmenter};

fn sources<'i>(spans: &[Span<'i, ParsingError>]) -> Vec<&'i str> {
    spans
        .iter()
        .map(|span| span.source)
        .collect()
}

#[test]
fn every_line_valid() {
    let content = "round(e, 3)\na = 2\nb = 3\nc = 4";
    let spans = segmenting::segment(content);

    assert_eq!(spans.len(), 4);
    assert!(spans
        .iter()
        .all(|span| !span.is_error()));
    assert_eq!(sources(&spans), vec!["round(e, 3)", "a = 2", "b = 3", "c = 4"]);
}

#[test]
fn entirely_blank() {
    assert!(segmenting::segment("").is_empty());
    assert!(segmenting::segment("\n").is_empty());
    assert!(segmenting::segment("   \n\t\n  ").is_empty());
}

#[test]
fn single_unparsable_line() {
    let spans = segmenting::segment("(");

    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].source, "(");
    assert_eq!(spans[0].from, 0);
    assert_eq!(spans[0].to, 1);
    assert_eq!(
        spans[0].error,
        Some(ParsingError::UnexpectedEndOfInput(1, 0))
    );
}

#[test]
fn unclosed_between_valid_lines() {
    let content = "a = 1\nb = (\nc = 3";
    let spans = segmenting::segment(content);

    assert_eq!(sources(&spans), vec!["a = 1", "b = (", "c = 3"]);

    assert!(!spans[0].is_error());
    assert!(!spans[2].is_error());

    // the error comes from the last forward attempt, which ran to the end
    // of the buffer, so its position is past the region itself
    let middle = &spans[1];
    assert_eq!(middle.first, 1);
    assert_eq!(middle.last, 1);
    assert_eq!(
        middle.error,
        Some(ParsingError::ExpectedMatchingChar(
            11,
            0,
            "parenthesised expression",
            '(',
            ')'
        ))
    );
}

#[test]
fn blank_line_between_expressions() {
    let content = "1 + 1\n\n2 + 2";
    let spans = segmenting::segment(content);

    assert_eq!(sources(&spans), vec!["1 + 1", "2 + 2"]);
    assert_eq!(spans[1].from, 7);
    assert_eq!(spans[1].first, 2);
    assert!(locate(&spans, 1).is_none());
}

#[test]
fn repeated_calls_identical() {
    let content = "x = [1, 2\ny = 3\n\nz = y +";
    let segmenter = Segmenter::new(Grammar);

    let first = segmenter.segment(content);
    let second = segmenter.segment(content);

    assert_eq!(first, second);
    assert_eq!(first, segmenting::segment(content));
}

#[test]
fn expression_spanning_lines() {
    let content = "atan2(3,\n  -3 / pi)\nround(e, 3)";
    let spans = segmenting::segment(content);

    assert_eq!(sources(&spans), vec!["atan2(3,\n  -3 / pi)", "round(e, 3)"]);
    assert_eq!(spans[0].first, 0);
    assert_eq!(spans[0].last, 1);
    assert_eq!(spans[1].from, 19);
}

#[test]
fn stray_closing_bracket() {
    // nothing after the stray bracket can be claimed going forward, so the
    // lines after it are recovered by the backward scan
    let content = "a = 1\n)\nb = 2\nc = 3";
    let spans = segmenting::segment(content);

    assert_eq!(sources(&spans), vec!["a = 1", ")", "b = 2", "c = 3"]);
    assert_eq!(
        spans
            .iter()
            .filter(|span| span.is_error())
            .count(),
        1
    );
    assert_eq!(spans[1].error, Some(ParsingError::Expected(0, 1, "an operand")));
}

#[test]
fn backward_scan_joins_lines() {
    // the opening bracket on the first line never closes, but the backward
    // scan still finds the multi-line matrix at the bottom
    let content = "f(\nm = [1, 2;\n  3, 4]";
    let spans = segmenting::segment(content);

    assert_eq!(sources(&spans), vec!["f(", "m = [1, 2;\n  3, 4]"]);
    assert!(spans[0].is_error());
    assert!(!spans[1].is_error());
}

#[test]
fn carriage_returns_are_whitespace() {
    let content = "a = 1\r\nb = 2\r\n";
    let spans = segmenting::segment(content);

    assert_eq!(sources(&spans), vec!["a = 1\r", "b = 2\r"]);
}

#[test]
fn offsets_match_sources() {
    let content = "π = 3.14159\nτ = 2 π\nbad = [\n\nok = τ / 2";
    let spans = segmenting::segment(content);

    for span in &spans {
        assert_eq!(&content[span.from..span.to], span.source);
    }
    assert_eq!(spans.len(), 4);
}
