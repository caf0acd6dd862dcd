//! Split a notebook of math expressions into the regions that parse on their
//! own, isolating whatever cannot be parsed into a single error region.

pub mod language;
pub mod parsing;
mod regex;
pub mod segmenting;
