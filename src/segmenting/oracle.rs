use crate::parsing::parser::ParsingError;
use crate::parsing::{self, Grammar};

/// The only thing the segmenter knows about expressions: whether a piece of
/// text parses as one, and if not, an error to report. Implementations must
/// not carry state from one call to the next.
pub trait Oracle {
    type Error;

    fn parse(&self, text: &str) -> Result<(), Self::Error>;
}

impl Oracle for Grammar {
    type Error = ParsingError;

    fn parse(&self, text: &str) -> Result<(), ParsingError> {
        parsing::parse(text).map(|_| ())
    }
}

impl<F, E> Oracle for F
where
    F: Fn(&str) -> Result<(), E>,
{
    type Error = E;

    fn parse(&self, text: &str) -> Result<(), E> {
        self(text)
    }
}
