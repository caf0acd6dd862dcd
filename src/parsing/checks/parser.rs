use super::*;

fn symbol(name: &str) -> Expression<'_> {
    Expression::Symbol(Identifier(name))
}

fn binary<'i>(operator: Operator, left: Expression<'i>, right: Expression<'i>) -> Expression<'i> {
    Expression::Binary(operator, Box::new(left), Box::new(right))
}

fn parse_one(content: &str) -> Expression<'_> {
    let mut input = Parser::new();
    input.initialize(content);

    let mut statements = input
        .parse_from_start()
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {:?}", content, e));
    assert_eq!(statements.len(), 1, "expected one statement in {:?}", content);
    statements.remove(0)
}

#[test]
fn maximal_munch_symbols() {
    let mut input = Parser::new();

    input.initialize(">>> 2");
    assert_eq!(input.peek_symbol(), Some(">>>"));

    input.initialize("<= 2");
    assert_eq!(input.peek_symbol(), Some("<="));

    input.initialize("^|1");
    assert_eq!(input.peek_symbol(), Some("^|"));

    input.initialize(".*b");
    assert_eq!(input.peek_symbol(), Some(".*"));

    input.initialize(".5");
    assert_eq!(input.peek_symbol(), None);
    assert_eq!(input.peek_number(), Some(".5"));

    input.initialize("total");
    assert_eq!(input.peek_symbol(), None);
    assert_eq!(input.peek_word(), Some("total"));
    assert_eq!(input.peek_operator(&CONVERSION), None);

    input.initialize("to inch");
    assert_eq!(input.peek_operator(&CONVERSION), Some((2, Operator::To)));
}

#[test]
fn whitespace_and_comments() {
    let mut input = Parser::new();

    input.initialize("   # a remark\nx");
    input.trim_whitespace();
    assert_eq!(input.peek_next_char(), Some('\n'));
    assert_eq!(input.offset, 13);

    input.initialize("\n  x");
    input.brackets = 1;
    input.trim_whitespace();
    assert_eq!(input.peek_next_char(), Some('x'));
    assert_eq!(input.offset, 3);
}

#[test]
fn blank_input() {
    let mut input = Parser::new();

    input.initialize("");
    assert_eq!(input.parse_from_start(), Ok(vec![]));

    input.initialize("   \n\t\n");
    assert_eq!(input.parse_from_start(), Ok(vec![]));

    input.initialize("# only a comment");
    assert_eq!(input.parse_from_start(), Ok(vec![]));
}

#[test]
fn numbers_and_strings() {
    assert_eq!(parse_one("42"), Expression::Number("42"));
    assert_eq!(parse_one("6.02e23"), Expression::Number("6.02e23"));
    assert_eq!(parse_one(r#""hello""#), Expression::String("hello"));
    assert_eq!(parse_one(r#"'it\'s'"#), Expression::String(r#"it\'s"#));
}

#[test]
fn precedence() {
    assert_eq!(
        parse_one("1 + 2 * 3"),
        binary(
            Operator::Add,
            Expression::Number("1"),
            binary(
                Operator::Multiply,
                Expression::Number("2"),
                Expression::Number("3")
            )
        )
    );

    assert_eq!(
        parse_one("-2^2"),
        Expression::Unary(
            Operator::Negate,
            Box::new(binary(
                Operator::Power,
                Expression::Number("2"),
                Expression::Number("2")
            ))
        )
    );

    assert_eq!(
        parse_one("2^3^2"),
        binary(
            Operator::Power,
            Expression::Number("2"),
            binary(
                Operator::Power,
                Expression::Number("3"),
                Expression::Number("2")
            )
        )
    );
}

#[test]
fn implicit_multiplication() {
    assert_eq!(
        parse_one("2 pi"),
        binary(Operator::Multiply, Expression::Number("2"), symbol("pi"))
    );

    assert_eq!(
        parse_one("12.7 cm to inch"),
        binary(
            Operator::To,
            binary(
                Operator::Multiply,
                Expression::Number("12.7"),
                symbol("cm")
            ),
            symbol("inch")
        )
    );
}

#[test]
fn calls_and_accessors() {
    assert_eq!(
        parse_one("round(e, 3)"),
        Expression::Call(
            Box::new(symbol("round")),
            vec![symbol("e"), Expression::Number("3")]
        )
    );

    assert_eq!(
        parse_one("now()"),
        Expression::Call(Box::new(symbol("now")), vec![])
    );

    assert_eq!(
        parse_one("m[1, 2]"),
        Expression::Index(
            Box::new(symbol("m")),
            vec![Expression::Number("1"), Expression::Number("2")]
        )
    );

    assert_eq!(
        parse_one("config.rate"),
        Expression::Property(Box::new(symbol("config")), Identifier("rate"))
    );
}

#[test]
fn assignments_and_definitions() {
    assert_eq!(
        parse_one("a = 2"),
        Expression::Assignment(Box::new(symbol("a")), Box::new(Expression::Number("2")))
    );

    let definition = parse_one("f(x, y) = x y");
    assert_eq!(definition.defines(), Some((&Identifier("f"), true)));

    let chained = parse_one("a = b = 1");
    match chained {
        Expression::Assignment(_, value) => {
            assert!(matches!(*value, Expression::Assignment(_, _)))
        }
        _ => panic!("expected an assignment"),
    }
}

#[test]
fn conditionals_and_ranges() {
    assert_eq!(
        parse_one("x > 0 ? 1 : 2"),
        Expression::Conditional(
            Box::new(binary(
                Operator::Larger,
                symbol("x"),
                Expression::Number("0")
            )),
            Box::new(Expression::Number("1")),
            Box::new(Expression::Number("2"))
        )
    );

    assert_eq!(
        parse_one("1:2:9"),
        Expression::Range(vec![
            Expression::Number("1"),
            Expression::Number("2"),
            Expression::Number("9")
        ])
    );

    // ranges are allowed again once inside brackets
    let conditional = parse_one("c ? [1:3] : 0");
    assert!(matches!(conditional, Expression::Conditional(_, _, _)));
}

#[test]
fn matrices_and_objects() {
    assert_eq!(
        parse_one("[-1, 2; 3, 1]"),
        Expression::Matrix(vec![
            vec![
                Expression::Unary(Operator::Negate, Box::new(Expression::Number("1"))),
                Expression::Number("2")
            ],
            vec![Expression::Number("3"), Expression::Number("1")]
        ])
    );

    assert_eq!(parse_one("[]"), Expression::Matrix(vec![]));

    assert_eq!(
        parse_one(r#"{a: 1, "b c": 2}"#),
        Expression::Object(vec![
            Pair {
                label: "a",
                value: Expression::Number("1")
            },
            Pair {
                label: "b c",
                value: Expression::Number("2")
            }
        ])
    );
}

#[test]
fn newlines_inside_brackets() {
    let call = parse_one("atan2(3,\n  -3 / pi)");
    assert!(matches!(call, Expression::Call(_, _)));

    let mut input = Parser::new();
    input.initialize("1 +\n2");
    assert!(input
        .parse_from_start()
        .is_err());
}

#[test]
fn multiple_statements() {
    let mut input = Parser::new();
    input.initialize("a = 1\nb = 2; c = 3, d");

    let statements = input.parse_from_start();
    assert_eq!(
        statements.map(|list| list.len()),
        Ok(4)
    );
}
