//! Output formatting module
//!
//! Renders suite results for the terminal.

mod formatter;

pub use formatter::{OutputFormat, PrintFilter, ResultFormatter};
