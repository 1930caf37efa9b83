//! fOS CSS
//!
//! Constructable style sheets compiled with lightningcss, ready to be
//! adopted by shadow roots.

mod stylesheet;

pub use stylesheet::CssStyleSheet;

/// Compile a style sheet from source text
pub fn parse_stylesheet(css: &str) -> Result<CssStyleSheet, CssError> {
    CssStyleSheet::parse(css)
}

/// CSS errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CssError {
    /// Source text was rejected by the parser (zero-based line)
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError { line: u32, column: u32, message: String },

    /// Parsed rules could not be serialized back to text
    #[error("Print error: {0}")]
    PrintError(String),
}
