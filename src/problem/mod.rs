// Presenting errors found in a notebook to a human

mod format;
mod messages;

pub use format::*;
