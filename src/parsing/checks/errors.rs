use super::*;

/// Helper function to check that parsing fails with exactly the expected error
fn expect_error(content: &str, expected: ParsingError) {
    let mut input = Parser::new();
    input.initialize(content);

    match input.parse_from_start() {
        Ok(_) => panic!(
            "Expected parsing to fail, but it succeeded for input: {}",
            content
        ),
        Err(error) => {
            assert_eq!(error, expected, "for input '{}'", content);
        }
    }
}

#[test]
fn unclosed_parenthesis() {
    expect_error(
        "atan2(3, -3 / pi",
        ParsingError::ExpectedMatchingChar(16, 0, "function call", '(', ')'),
    );

    expect_error(
        "b = (",
        ParsingError::UnexpectedEndOfInput(5, 0),
    );
}

#[test]
fn unclosed_across_lines() {
    // newlines are whitespace inside the parenthesis, so the error is only
    // discovered at the end of the input
    expect_error(
        "b = (\nc = 3",
        ParsingError::ExpectedMatchingChar(11, 0, "parenthesised expression", '(', ')'),
    );
}

#[test]
fn dangling_operator() {
    expect_error("1 +", ParsingError::UnexpectedEndOfInput(3, 0));
    expect_error("1 +\n2", ParsingError::UnexpectedEndOfInput(3, 0));
}

#[test]
fn missing_operand() {
    expect_error("* 2", ParsingError::Expected(0, 1, "an operand"));
    expect_error("(1, )", ParsingError::ExpectedMatchingChar(2, 1, "parenthesised expression", '(', ')'));
    expect_error("x = to", ParsingError::Expected(4, 2, "an operand"));
}

#[test]
fn trailing_content() {
    expect_error("1 2", ParsingError::Unrecognized(2, 1));
    expect_error("a)", ParsingError::Unrecognized(1, 1));
}

#[test]
fn invalid_characters() {
    expect_error("3 @ 4", ParsingError::Unrecognized(2, 1));
    expect_error("$", ParsingError::InvalidCharacter(0, 1, '$'));
    expect_error("😀", ParsingError::InvalidCharacter(0, 4, '😀'));
}

#[test]
fn invalid_assignment() {
    expect_error("2 + x = 3", ParsingError::InvalidAssignment(0, 5));
    expect_error("f(1) = 3", ParsingError::InvalidAssignment(0, 4));
}

#[test]
fn unclosed_string() {
    expect_error(r#"s = "abc"#, ParsingError::UnclosedString(4, 4));
    expect_error("s = 'abc\n'", ParsingError::UnclosedString(4, 4));
}

#[test]
fn conditional_without_alternative() {
    expect_error(
        "x ? 1",
        ParsingError::Expected(5, 0, "':' in conditional expression"),
    );
}

#[test]
fn nesting_limit() {
    let content = "(".repeat(MAXIMUM_NESTING + 10);

    let mut input = Parser::new();
    input.initialize(&content);

    let result = input.parse_from_start();
    assert!(matches!(result, Err(ParsingError::NestingTooDeep(_, 0))));
}

#[test]
fn messages() {
    assert_eq!(
        ParsingError::ExpectedMatchingChar(0, 0, "matrix", '[', ']').message(),
        "expected matching ']' for '[' in matrix"
    );
    assert_eq!(
        ParsingError::InvalidCharacter(0, 1, '$').to_string(),
        "invalid character '$'"
    );
    assert_eq!(ParsingError::Expected(7, 2, "an operand").offset(), 7);
    assert_eq!(ParsingError::Expected(7, 2, "an operand").width(), 2);
}
