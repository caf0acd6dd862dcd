// Types representing expressions in a math notebook and the regions found in it

mod error;
mod span;
mod types;

// Re-export all public symbols
pub use error::*;
pub use span::*;
pub use types::*;
