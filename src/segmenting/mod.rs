//! Partition a notebook into the regions that parse on their own

use crate::language::Span;
use crate::parsing::parser::ParsingError;
use crate::parsing::Grammar;

mod oracle;
mod segmenter;

pub use oracle::*;
pub use segmenter::*;

/// Segment text using the notebook expression grammar.
pub fn segment(content: &str) -> Vec<Span<'_, ParsingError>> {
    Segmenter::new(Grammar).segment(content)
}
