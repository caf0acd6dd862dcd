//! Types representing an Abstract Syntax Tree for notebook expressions

use crate::regex::*;

#[derive(Eq, Debug, PartialEq)]
pub struct Identifier<'i>(pub &'i str);

// entries within an object literal like { a: 1, "b": 2 }

#[derive(Debug, PartialEq, Eq)]
pub struct Pair<'i> {
    pub label: &'i str,
    pub value: Expression<'i>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    // prefix
    Negate,
    Plus,
    BitNot,
    Not,

    // postfix
    Factorial,
    Transpose,

    // infix, roughly from loosest to tightest binding
    Or,
    Xor,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Equal,
    Unequal,
    Smaller,
    Larger,
    SmallerEq,
    LargerEq,
    LeftShift,
    RightArithShift,
    RightLogShift,
    To,
    Add,
    Subtract,
    Multiply,
    Divide,
    DotMultiply,
    DotDivide,
    Modulus,
    Power,
    DotPower,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Expression<'i> {
    Number(&'i str),
    String(&'i str),
    Symbol(Identifier<'i>),
    Parenthesis(Box<Expression<'i>>),
    Matrix(Vec<Vec<Expression<'i>>>),
    Object(Vec<Pair<'i>>),
    Unary(Operator, Box<Expression<'i>>),
    Postfix(Operator, Box<Expression<'i>>),
    Binary(Operator, Box<Expression<'i>>, Box<Expression<'i>>),
    Conditional(Box<Expression<'i>>, Box<Expression<'i>>, Box<Expression<'i>>),
    Range(Vec<Expression<'i>>), // start, optional step, end
    Call(Box<Expression<'i>>, Vec<Expression<'i>>),
    Index(Box<Expression<'i>>, Vec<Expression<'i>>),
    Property(Box<Expression<'i>>, Identifier<'i>),
    Assignment(Box<Expression<'i>>, Box<Expression<'i>>),
}

impl<'i> Expression<'i> {
    /// Whether this expression can appear on the left hand side of `=`.
    /// Symbols, properties and indexes are assigned to; a call whose
    /// arguments are all plain symbols is a function definition.
    pub fn is_assignable(&self) -> bool {
        match self {
            Expression::Symbol(_) => true,
            Expression::Property(_, _) => true,
            Expression::Index(_, _) => true,
            Expression::Call(function, parameters) => {
                matches!(function.as_ref(), Expression::Symbol(_))
                    && parameters
                        .iter()
                        .all(|parameter| matches!(parameter, Expression::Symbol(_)))
            }
            _ => false,
        }
    }

    /// If this is an assignment to a plain symbol or a function definition,
    /// return the name being defined and whether it is a function.
    pub fn defines(&self) -> Option<(&Identifier<'i>, bool)> {
        match self {
            Expression::Assignment(target, _) => match target.as_ref() {
                Expression::Symbol(name) => Some((name, false)),
                Expression::Call(function, _) => match function.as_ref() {
                    Expression::Symbol(name) => Some((name, true)),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }
}

// words which read as operators and so can't be used as symbols

const KEYWORDS: [&str; 7] = ["and", "in", "mod", "not", "or", "to", "xor"];

pub fn is_keyword(input: &str) -> bool {
    KEYWORDS.contains(&input)
}

// validation patterns need both start and end anchors.

pub fn validate_identifier(input: &str) -> Option<Identifier<'_>> {
    let re = regex!(r"^[_A-Za-z\x{a1}-\x{ffff}][_A-Za-z0-9\x{a1}-\x{ffff}]*$");

    if re.is_match(input) && !is_keyword(input) {
        Some(Identifier(input))
    } else {
        None
    }
}
