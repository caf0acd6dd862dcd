//! parser for notebook expressions

use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::language::{Expression, LoadingError};
use crate::parsing::parser::Parser;

pub mod parser;

pub use parser::ParsingError;

/// Read a file and return an owned String. A filename of "-" reads standard
/// input instead. We pass ownership back to the caller so that the spans
/// found by the segmenter can borrow from it.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    if filename.to_str() == Some("-") {
        let mut content = String::new();
        return match std::io::stdin().read_to_string(&mut content) {
            Ok(_) => Ok(content),
            Err(error) => {
                debug!(?error);
                Err(LoadingError {
                    problem: "Failed reading standard input".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                })
            }
        };
    }

    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Parse text into the list of statements it contains, or return the first
/// error encountered.
pub fn parse(content: &str) -> Result<Vec<Expression<'_>>, ParsingError> {
    let mut input = Parser::new();
    input.initialize(content);

    let result = input.parse_from_start();

    match &result {
        Ok(statements) => {
            debug!(
                "Found {} statement{}",
                statements.len(),
                if statements.len() == 1 { "" } else { "s" }
            );
        }
        Err(error) => {
            debug!(?error);
        }
    }

    result
}

/// The expression grammar of a notebook, as an oracle the segmenter can
/// consult. Holds no state; every call parses from scratch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Grammar;
