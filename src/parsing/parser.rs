use std::fmt;

use crate::language::*;
use crate::regex::*;

// Bounds recursion on pathological input such as a long run of opening
// parenthesis.
const MAXIMUM_NESTING: usize = 64;

// Punctuation and symbolic operators, longest first so that the first match
// found is the maximal one.
const SYMBOLS: [&str; 36] = [
    ">>>", "<<", ">>", "==", "!=", "<=", ">=", ".*", "./", ".^", "^|", "+", "-", "*", "/", "%",
    "^", "&", "|", "~", "!", "'", "<", ">", "=", "?", ":", ",", ";", "(", ")", "[", "]", "{",
    "}", ".",
];

const OR: [(&str, Operator); 1] = [("or", Operator::Or)];

const XOR: [(&str, Operator); 1] = [("xor", Operator::Xor)];

const AND: [(&str, Operator); 1] = [("and", Operator::And)];

const BIT_OR: [(&str, Operator); 1] = [("|", Operator::BitOr)];

const BIT_XOR: [(&str, Operator); 1] = [("^|", Operator::BitXor)];

const BIT_AND: [(&str, Operator); 1] = [("&", Operator::BitAnd)];

const RELATIONAL: [(&str, Operator); 6] = [
    ("==", Operator::Equal),
    ("!=", Operator::Unequal),
    ("<", Operator::Smaller),
    (">", Operator::Larger),
    ("<=", Operator::SmallerEq),
    (">=", Operator::LargerEq),
];

const SHIFT: [(&str, Operator); 3] = [
    ("<<", Operator::LeftShift),
    (">>", Operator::RightArithShift),
    (">>>", Operator::RightLogShift),
];

const CONVERSION: [(&str, Operator); 2] = [("to", Operator::To), ("in", Operator::To)];

const ADDITIVE: [(&str, Operator); 2] = [("+", Operator::Add), ("-", Operator::Subtract)];

const MULTIPLICATIVE: [(&str, Operator); 6] = [
    ("*", Operator::Multiply),
    ("/", Operator::Divide),
    (".*", Operator::DotMultiply),
    ("./", Operator::DotDivide),
    ("%", Operator::Modulus),
    ("mod", Operator::Modulus),
];

const PREFIX: [(&str, Operator); 4] = [
    ("-", Operator::Negate),
    ("+", Operator::Plus),
    ("~", Operator::BitNot),
    ("not", Operator::Not),
];

const POWER: [(&str, Operator); 2] = [("^", Operator::Power), (".^", Operator::DotPower)];

const POSTFIX: [(&str, Operator); 2] = [("!", Operator::Factorial), ("'", Operator::Transpose)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    UnexpectedEndOfInput(usize, usize),
    Unrecognized(usize, usize),
    Expected(usize, usize, &'static str),
    ExpectedMatchingChar(usize, usize, &'static str, char, char),
    InvalidCharacter(usize, usize, char),
    InvalidAssignment(usize, usize),
    UnclosedString(usize, usize),
    NestingTooDeep(usize, usize),
}

impl ParsingError {
    pub fn offset(&self) -> usize {
        match self {
            ParsingError::UnexpectedEndOfInput(offset, _) => *offset,
            ParsingError::Unrecognized(offset, _) => *offset,
            ParsingError::Expected(offset, _, _) => *offset,
            ParsingError::ExpectedMatchingChar(offset, _, _, _, _) => *offset,
            ParsingError::InvalidCharacter(offset, _, _) => *offset,
            ParsingError::InvalidAssignment(offset, _) => *offset,
            ParsingError::UnclosedString(offset, _) => *offset,
            ParsingError::NestingTooDeep(offset, _) => *offset,
        }
    }

    pub fn width(&self) -> usize {
        match self {
            ParsingError::UnexpectedEndOfInput(_, width) => *width,
            ParsingError::Unrecognized(_, width) => *width,
            ParsingError::Expected(_, width, _) => *width,
            ParsingError::ExpectedMatchingChar(_, width, _, _, _) => *width,
            ParsingError::InvalidCharacter(_, width, _) => *width,
            ParsingError::InvalidAssignment(_, width) => *width,
            ParsingError::UnclosedString(_, width) => *width,
            ParsingError::NestingTooDeep(_, width) => *width,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingError::UnexpectedEndOfInput(_, _) => "unexpected end of input".to_string(),
            ParsingError::Unrecognized(_, _) => "unexpected content after expression".to_string(),
            ParsingError::Expected(_, _, value) => format!("expected {}", value),
            ParsingError::ExpectedMatchingChar(_, _, subject, start, end) => {
                format!("expected matching '{}' for '{}' in {}", end, start, subject)
            }
            ParsingError::InvalidCharacter(_, _, c) => format!("invalid character '{}'", c),
            ParsingError::InvalidAssignment(_, _) => "invalid assignment target".to_string(),
            ParsingError::UnclosedString(_, _) => "unclosed string literal".to_string(),
            ParsingError::NestingTooDeep(_, _) => "expression nested too deeply".to_string(),
        }
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ParsingError {}

#[derive(Debug)]
pub struct Parser<'i> {
    source: &'i str,
    offset: usize,
    brackets: usize,
    nesting: usize,
    ranges: bool,
}

impl<'i> Parser<'i> {
    pub fn new() -> Parser<'i> {
        Parser {
            source: "",
            offset: 0,
            brackets: 0,
            nesting: 0,
            ranges: true,
        }
    }

    pub fn initialize(&mut self, content: &'i str) {
        self.source = content;
        self.offset = 0;
        self.brackets = 0;
        self.nesting = 0;
        self.ranges = true;
    }

    fn advance(&mut self, width: usize) {
        // advance the parser position
        self.source = &self.source[width..];
        self.offset += width;
    }

    fn peek_next_char(&self) -> Option<char> {
        self.source
            .chars()
            .next()
    }

    /// Parse the whole input as a sequence of statements separated by
    /// newlines, semicolons, or commas. Blank input is zero statements.
    pub fn parse_from_start(&mut self) -> Result<Vec<Expression<'i>>, ParsingError> {
        let mut statements = Vec::new();

        loop {
            self.trim_whitespace();

            match self.peek_next_char() {
                None => break,
                Some('\n') | Some(';') => {
                    self.advance(1);
                    continue;
                }
                Some(_) => {}
            }

            let statement = self.read_expression()?;
            statements.push(statement);

            self.trim_whitespace();

            match self.peek_next_char() {
                None => break,
                Some('\n') | Some(';') | Some(',') => self.advance(1),
                Some(_) => return Err(ParsingError::Unrecognized(self.offset, self.token_width())),
            }
        }

        Ok(statements)
    }

    /// Skip spaces and comments. Newlines end a statement and so are only
    /// skipped when inside brackets.
    fn trim_whitespace(&mut self) {
        loop {
            match self.peek_next_char() {
                Some('\n') if self.brackets > 0 => self.advance(1),
                Some('\n') => break,
                Some('#') => {
                    let width = self
                        .source
                        .find('\n')
                        .unwrap_or(self.source.len());
                    self.advance(width);
                }
                Some(c) if c.is_whitespace() => self.advance(c.len_utf8()),
                _ => break,
            }
        }
    }

    fn peek_symbol(&self) -> Option<&'static str> {
        let content = self.source;

        // a leading '.' followed by a digit is a number, not an operator
        if content.starts_with('.')
            && content[1..].starts_with(|c: char| c.is_ascii_digit())
        {
            return None;
        }

        SYMBOLS
            .iter()
            .find(|symbol| content.starts_with(*symbol))
            .copied()
    }

    fn peek_word(&self) -> Option<&'i str> {
        let re = regex!(r"^[_A-Za-z\x{a1}-\x{ffff}][_A-Za-z0-9\x{a1}-\x{ffff}]*");

        re.find(self.source)
            .map(|m| m.as_str())
    }

    fn peek_number(&self) -> Option<&'i str> {
        let re = regex!(r"^(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?");

        re.find(self.source)
            .map(|m| m.as_str())
    }

    fn peek_operator(&self, table: &[(&str, Operator)]) -> Option<(usize, Operator)> {
        let token: &str = match self.peek_symbol() {
            Some(symbol) => symbol,
            None => self.peek_word()?,
        };

        table
            .iter()
            .find(|(text, _)| *text == token)
            .map(|(text, operator)| (text.len(), *operator))
    }

    // width of whatever token is next, for error reporting
    fn token_width(&self) -> usize {
        if let Some(symbol) = self.peek_symbol() {
            symbol.len()
        } else if let Some(word) = self.peek_word() {
            word.len()
        } else if let Some(number) = self.peek_number() {
            number.len()
        } else {
            self.peek_next_char()
                .map(|c| c.len_utf8())
                .unwrap_or(0)
        }
    }

    /// Run a nested parse, refusing to go deeper than MAXIMUM_NESTING.
    fn nested<A, F>(&mut self, function: F) -> Result<A, ParsingError>
    where
        F: Fn(&mut Parser<'i>) -> Result<A, ParsingError>,
    {
        if self.nesting >= MAXIMUM_NESTING {
            return Err(ParsingError::NestingTooDeep(self.offset, 0));
        }

        self.nesting += 1;
        let result = function(self);
        self.nesting -= 1;

        result
    }

    /// Consume an opening bracket, run the function on the content within,
    /// then require the closing bracket. Newlines are insignificant inside
    /// brackets, and ranges are allowed again even if within a conditional.
    fn take_bracketed<A, F>(
        &mut self,
        open: char,
        close: char,
        subject: &'static str,
        function: F,
    ) -> Result<A, ParsingError>
    where
        F: Fn(&mut Parser<'i>) -> Result<A, ParsingError>,
    {
        if self.peek_next_char() != Some(open) {
            return Err(ParsingError::Expected(self.offset, 0, "an opening bracket"));
        }
        self.advance(1);

        let ranges = self.ranges;
        self.brackets += 1;
        self.ranges = true;

        let result = function(self).and_then(|value| {
            self.trim_whitespace();
            if self.peek_next_char() == Some(close) {
                Ok(value)
            } else {
                Err(ParsingError::ExpectedMatchingChar(
                    self.offset,
                    self.token_width(),
                    subject,
                    open,
                    close,
                ))
            }
        });

        self.brackets -= 1;
        self.ranges = ranges;

        let value = result?;
        self.advance(1);

        Ok(value)
    }

    fn read_binary<F>(
        &mut self,
        table: &[(&str, Operator)],
        operand: F,
    ) -> Result<Expression<'i>, ParsingError>
    where
        F: Fn(&mut Parser<'i>) -> Result<Expression<'i>, ParsingError>,
    {
        let mut left = operand(self)?;

        loop {
            self.trim_whitespace();

            let (width, operator) = match self.peek_operator(table) {
                Some(found) => found,
                None => break,
            };
            self.advance(width);

            let right = operand(self)?;
            left = Expression::Binary(operator, Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    pub fn read_expression(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.nested(|inner| inner.read_assignment())
    }

    fn read_assignment(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.trim_whitespace();
        let start = self.offset;
        let before = self.source;

        let target = self.read_conditional()?;

        self.trim_whitespace();
        if self.peek_symbol() != Some("=") {
            return Ok(target);
        }

        if !target.is_assignable() {
            let width = before[..self.offset - start]
                .trim_end()
                .len();
            return Err(ParsingError::InvalidAssignment(start, width));
        }
        self.advance(1);

        let value = self.read_expression()?;

        Ok(Expression::Assignment(Box::new(target), Box::new(value)))
    }

    fn read_conditional(&mut self) -> Result<Expression<'i>, ParsingError> {
        let condition = self.read_or()?;

        self.trim_whitespace();
        if self.peek_symbol() != Some("?") {
            return Ok(condition);
        }
        self.advance(1);

        // a ':' here belongs to the conditional, not to a range
        let ranges = self.ranges;
        self.ranges = false;
        let then = self.read_expression();
        self.ranges = ranges;
        let then = then?;

        self.trim_whitespace();
        if self.peek_symbol() != Some(":") {
            return Err(ParsingError::Expected(
                self.offset,
                self.token_width(),
                "':' in conditional expression",
            ));
        }
        self.advance(1);

        let otherwise = self.read_expression()?;

        Ok(Expression::Conditional(
            Box::new(condition),
            Box::new(then),
            Box::new(otherwise),
        ))
    }

    fn read_or(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.read_binary(&OR, |inner| inner.read_xor())
    }

    fn read_xor(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.read_binary(&XOR, |inner| inner.read_and())
    }

    fn read_and(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.read_binary(&AND, |inner| inner.read_bit_or())
    }

    fn read_bit_or(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.read_binary(&BIT_OR, |inner| inner.read_bit_xor())
    }

    fn read_bit_xor(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.read_binary(&BIT_XOR, |inner| inner.read_bit_and())
    }

    fn read_bit_and(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.read_binary(&BIT_AND, |inner| inner.read_relational())
    }

    fn read_relational(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.read_binary(&RELATIONAL, |inner| inner.read_shift())
    }

    fn read_shift(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.read_binary(&SHIFT, |inner| inner.read_conversion())
    }

    fn read_conversion(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.read_binary(&CONVERSION, |inner| inner.read_range())
    }

    // start:end or start:step:end
    fn read_range(&mut self) -> Result<Expression<'i>, ParsingError> {
        let first = self.read_additive()?;

        if !self.ranges {
            return Ok(first);
        }

        let mut parts = vec![first];
        while parts.len() < 3 {
            self.trim_whitespace();
            if self.peek_symbol() != Some(":") {
                break;
            }
            self.advance(1);
            parts.push(self.read_additive()?);
        }

        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(Expression::Range(parts))
        }
    }

    fn read_additive(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.read_binary(&ADDITIVE, |inner| inner.read_multiplicative())
    }

    fn read_multiplicative(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.read_binary(&MULTIPLICATIVE, |inner| inner.read_implicit())
    }

    // juxtaposition such as `2 pi` or `3 (4 + 5)` multiplies
    fn read_implicit(&mut self) -> Result<Expression<'i>, ParsingError> {
        let mut left = self.read_unary()?;

        loop {
            self.trim_whitespace();
            if !self.is_implicit_operand() {
                break;
            }

            let right = self.read_power()?;
            left = Expression::Binary(Operator::Multiply, Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    fn is_implicit_operand(&self) -> bool {
        if self.peek_next_char() == Some('(') {
            return true;
        }
        match self.peek_word() {
            Some(word) => !is_keyword(word),
            None => false,
        }
    }

    fn read_unary(&mut self) -> Result<Expression<'i>, ParsingError> {
        let mut operators = Vec::new();

        loop {
            self.trim_whitespace();
            match self.peek_operator(&PREFIX) {
                Some((width, operator)) => {
                    self.advance(width);
                    operators.push(operator);
                }
                None => break,
            }
        }

        let mut expression = self.read_power()?;

        while let Some(operator) = operators.pop() {
            expression = Expression::Unary(operator, Box::new(expression));
        }

        Ok(expression)
    }

    // right associative, and the exponent may itself carry a sign
    fn read_power(&mut self) -> Result<Expression<'i>, ParsingError> {
        let base = self.read_postfix()?;

        self.trim_whitespace();
        match self.peek_operator(&POWER) {
            Some((width, operator)) => {
                self.advance(width);
                let exponent = self.nested(|inner| inner.read_unary())?;
                Ok(Expression::Binary(
                    operator,
                    Box::new(base),
                    Box::new(exponent),
                ))
            }
            None => Ok(base),
        }
    }

    fn read_postfix(&mut self) -> Result<Expression<'i>, ParsingError> {
        let mut expression = self.read_accessors()?;

        loop {
            self.trim_whitespace();
            match self.peek_operator(&POSTFIX) {
                Some((width, operator)) => {
                    self.advance(width);
                    expression = Expression::Postfix(operator, Box::new(expression));
                }
                None => break,
            }
        }

        Ok(expression)
    }

    // function calls, indexes, and property access following a primary.
    // Indexes and properties must be adjacent; a call may be separated from
    // its function by whitespace.
    fn read_accessors(&mut self) -> Result<Expression<'i>, ParsingError> {
        let mut expression = self.read_primary()?;

        loop {
            match self.peek_symbol() {
                Some("[") => {
                    let indexes =
                        self.take_bracketed('[', ']', "index", |inner| inner.read_arguments(']'))?;
                    expression = Expression::Index(Box::new(expression), indexes);
                    continue;
                }
                Some(".") => {
                    self.advance(1);
                    let name = self
                        .peek_word()
                        .and_then(validate_identifier)
                        .ok_or(ParsingError::Expected(
                            self.offset,
                            self.token_width(),
                            "a property name",
                        ))?;
                    self.advance(
                        name.0
                            .len(),
                    );
                    expression = Expression::Property(Box::new(expression), name);
                    continue;
                }
                _ => {}
            }

            if is_callable(&expression) {
                self.trim_whitespace();
                if self.peek_next_char() == Some('(') {
                    let arguments = self.take_bracketed('(', ')', "function call", |inner| {
                        inner.read_arguments(')')
                    })?;
                    expression = Expression::Call(Box::new(expression), arguments);
                    continue;
                }
            }

            break;
        }

        Ok(expression)
    }

    fn read_arguments(&mut self, close: char) -> Result<Vec<Expression<'i>>, ParsingError> {
        self.trim_whitespace();
        if self.peek_next_char() == Some(close) {
            Ok(vec![])
        } else {
            self.read_items()
        }
    }

    // one or more expressions separated by commas
    fn read_items(&mut self) -> Result<Vec<Expression<'i>>, ParsingError> {
        let mut items = vec![self.read_expression()?];

        loop {
            self.trim_whitespace();
            if self.peek_next_char() != Some(',') {
                break;
            }
            self.advance(1);
            items.push(self.read_expression()?);
        }

        Ok(items)
    }

    fn read_primary(&mut self) -> Result<Expression<'i>, ParsingError> {
        self.trim_whitespace();

        let c = match self.peek_next_char() {
            None | Some('\n') => return Err(ParsingError::UnexpectedEndOfInput(self.offset, 0)),
            Some(c) => c,
        };

        match c {
            '(' => {
                let inner = self.take_bracketed('(', ')', "parenthesised expression", |inner| {
                    inner.read_expression()
                })?;
                Ok(Expression::Parenthesis(Box::new(inner)))
            }
            '[' => self.read_matrix(),
            '{' => self.read_object(),
            '"' | '\'' => {
                let text = self.read_string()?;
                Ok(Expression::String(text))
            }
            _ => {
                if let Some(number) = self.peek_number() {
                    self.advance(number.len());
                    return Ok(Expression::Number(number));
                }

                if let Some(word) = self.peek_word() {
                    return match validate_identifier(word) {
                        Some(identifier) => {
                            self.advance(word.len());
                            Ok(Expression::Symbol(identifier))
                        }
                        None => Err(ParsingError::Expected(self.offset, word.len(), "an operand")),
                    };
                }

                if let Some(symbol) = self.peek_symbol() {
                    return Err(ParsingError::Expected(self.offset, symbol.len(), "an operand"));
                }

                Err(ParsingError::InvalidCharacter(
                    self.offset,
                    c.len_utf8(),
                    c,
                ))
            }
        }
    }

    // rows separated by ';', elements within a row by ','
    fn read_matrix(&mut self) -> Result<Expression<'i>, ParsingError> {
        let rows = self.take_bracketed('[', ']', "matrix", |inner| {
            let mut rows = Vec::new();

            inner.trim_whitespace();
            if inner.peek_next_char() == Some(']') {
                return Ok(rows);
            }

            loop {
                rows.push(inner.read_items()?);

                inner.trim_whitespace();
                if inner.peek_next_char() != Some(';') {
                    break;
                }
                inner.advance(1);
            }

            Ok(rows)
        })?;

        Ok(Expression::Matrix(rows))
    }

    fn read_object(&mut self) -> Result<Expression<'i>, ParsingError> {
        let pairs = self.take_bracketed('{', '}', "object", |inner| {
            let mut pairs = Vec::new();

            inner.trim_whitespace();
            if inner.peek_next_char() == Some('}') {
                return Ok(pairs);
            }

            loop {
                inner.trim_whitespace();
                let label = inner.read_label()?;

                inner.trim_whitespace();
                if inner.peek_next_char() != Some(':') {
                    return Err(ParsingError::Expected(
                        inner.offset,
                        inner.token_width(),
                        "':' after object key",
                    ));
                }
                inner.advance(1);

                let value = inner.read_expression()?;
                pairs.push(Pair { label, value });

                inner.trim_whitespace();
                if inner.peek_next_char() != Some(',') {
                    break;
                }
                inner.advance(1);
            }

            Ok(pairs)
        })?;

        Ok(Expression::Object(pairs))
    }

    fn read_label(&mut self) -> Result<&'i str, ParsingError> {
        match self.peek_next_char() {
            Some('"') | Some('\'') => self.read_string(),
            _ => {
                let label = self
                    .peek_word()
                    .or_else(|| self.peek_number())
                    .ok_or(ParsingError::Expected(
                        self.offset,
                        self.token_width(),
                        "an object key",
                    ))?;
                self.advance(label.len());
                Ok(label)
            }
        }
    }

    /// Read a single or double quoted string, returning the content between
    /// the quotes with any escapes left as written. Strings do not continue
    /// past the end of a line.
    fn read_string(&mut self) -> Result<&'i str, ParsingError> {
        let quote = match self.peek_next_char() {
            Some(c) if c == '"' || c == '\'' => c,
            _ => return Err(ParsingError::Expected(self.offset, 0, "a string")),
        };

        let mut escaped = false;

        for (i, c) in self
            .source
            .char_indices()
            .skip(1)
        {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                let text = &self.source[1..i];
                self.advance(i + 1);
                return Ok(text);
            } else if c == '\n' {
                break;
            }
        }

        let width = self
            .source
            .find('\n')
            .unwrap_or(self.source.len());

        Err(ParsingError::UnclosedString(self.offset, width))
    }
}

fn is_callable(expression: &Expression) -> bool {
    matches!(
        expression,
        Expression::Symbol(_)
            | Expression::Property(_, _)
            | Expression::Index(_, _)
            | Expression::Call(_, _)
    )
}

#[cfg(test)]
#[path = "checks/parser.rs"]
mod check;

#[cfg(test)]
#[path = "checks/errors.rs"]
mod errors;
