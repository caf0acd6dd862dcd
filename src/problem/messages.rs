use mathpad::parsing::ParsingError;

use crate::output::{Render, Syntax};

/// Generate problem and detail messages for parsing errors
pub fn generate_error_message(error: &ParsingError, renderer: &dyn Render) -> (String, String) {
    match error {
        ParsingError::UnexpectedEndOfInput(_, _) => (
            "Unexpected end of input".to_string(),
            format!(
                r#"
The expression stops before it is complete. An operator needs an operand on
either side of it, and an assignment needs a value:

    {}

An expression continues onto the next line only while inside an open
parenthesis, bracket, or brace.
                "#,
                renderer.style(Syntax::Example, "total = (price +\n        tax)")
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::Unrecognized(_, _) => (
            "Unrecognized input".to_string(),
            r#"
The parser found a complete expression but then encountered further content
it could not attach to it. Separate expressions by putting them on their own
lines or with a semicolon.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::Expected(_, _, value) => (
            format!("Expected {}", value),
            format!(
                "The parser was looking for {} but found something else.",
                value
            ),
        ),
        ParsingError::ExpectedMatchingChar(_, _, subject, start, end) => (
            format!("Expected matching character '{}'", end),
            format!(
                r#"
The parser was expecting {} enclosed by '{}' and '{}' but
there was no more input remaining in the current scope.
                "#,
                subject, start, end
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::InvalidCharacter(_, _, c) => (
            format!("Invalid character '{}'", c),
            "This character cannot begin an operand or operator.".to_string(),
        ),
        ParsingError::InvalidAssignment(_, _) => (
            "Invalid assignment".to_string(),
            format!(
                r#"
Only a name, a property, an element, or a function signature can be assigned
to. For example:

    {}
    {}
    {}
                "#,
                renderer.style(Syntax::Example, "rate = 0.05"),
                renderer.style(Syntax::Example, "m[2, 1] = 7"),
                renderer.style(Syntax::Example, "f(x, y) = x^2 + y^2"),
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::UnclosedString(_, _) => (
            "Unclosed string".to_string(),
            format!(
                r#"
A string literal must be closed by the same quote that opened it, before the
end of the line. Quotes inside a string can be escaped with a backslash:

    {}
                "#,
                renderer.style(Syntax::Example, r#"label = "a \"quoted\" word""#)
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::NestingTooDeep(_, _) => (
            "Expression nested too deeply".to_string(),
            "Break the expression up by assigning some of its parts to names first."
                .to_string(),
        ),
    }
}
