//! CSSStyleSheet
//!
//! The parsed lightningcss sheet borrows its source, so a sheet keeps the
//! canonical serialized text of each rule instead.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;

use crate::CssError;

/// Constructable style sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyleSheet {
    rules: Vec<String>,
    css_text: String,
}

impl CssStyleSheet {
    /// Create an empty style sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile source text into a new style sheet
    pub fn parse(css: &str) -> Result<Self, CssError> {
        let mut sheet = Self::new();
        sheet.replace_sync(css)?;
        Ok(sheet)
    }

    /// Replace all rules with the rules in `css`.
    ///
    /// On error the sheet is left unchanged.
    pub fn replace_sync(&mut self, css: &str) -> Result<(), CssError> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| {
                let (line, column) = e.loc.as_ref().map_or((0, 0), |loc| (loc.line, loc.column));
                CssError::ParseError { line, column, message: e.kind.to_string() }
            })?;

        let rules = stylesheet.rules.0.iter()
            .map(|rule| rule.to_css_string(PrinterOptions::default()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CssError::PrintError(e.to_string()))?;
        let css_text = stylesheet.to_css(PrinterOptions::default())
            .map_err(|e| CssError::PrintError(e.to_string()))?
            .code;

        tracing::debug!(rules = rules.len(), "compiled style sheet");
        self.rules = rules;
        self.css_text = css_text;
        Ok(())
    }

    /// Serialized rules, in source order
    pub fn css_rules(&self) -> &[String] {
        &self.rules
    }

    /// Serialized text of the whole sheet
    pub fn css_text(&self) -> &str {
        &self.css_text
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the sheet has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
