//! Line format templates.
//!
//! A template is a format string in which `%x` stands for the current value of
//! the symbol `x`, and `%%` for a literal percent sign. The set of recognized
//! symbols is fixed when the [`Symbols`] table is created; parsing a template
//! that mentions any other symbol fails up front rather than at render time.
//!
//! ```
//! use pipeview::template::{Symbols, Template};
//!
//! let mut symbols = Symbols::new("sn");
//! let template = Template::parse(&symbols, "%n: %s").unwrap();
//! symbols.set('s', "hello");
//! symbols.set('n', "3");
//! assert_eq!(template.render(&symbols), "3: hello");
//! ```

use std::collections::HashMap;
use thiserror::Error;

/// Errors produced while parsing a format string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// `%x` where `x` is not a recognized symbol.
    #[error("Unknown placeholder '%{symbol}' at offset {offset}")]
    UnknownPlaceholder {
        /// The character following `%`.
        symbol: char,
        /// Byte offset of the `%`.
        offset: usize,
    },

    /// The format string ends with a lone `%`.
    #[error("Format string ends with a dangling '%'")]
    DanglingPercent,
}

/// Table of recognized symbols and their current values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symbols {
    values: HashMap<char, String>,
}

impl Symbols {
    /// Create a table recognizing each character of `symbols`, all unset.
    pub fn new(symbols: &str) -> Self {
        Self {
            values: symbols.chars().map(|c| (c, String::new())).collect(),
        }
    }

    /// Whether `symbol` is recognized.
    pub fn recognizes(&self, symbol: char) -> bool {
        self.values.contains_key(&symbol)
    }

    /// Set the current value of `symbol`.
    ///
    /// Returns `false` (and stores nothing) if `symbol` is not recognized.
    pub fn set(&mut self, symbol: char, value: impl Into<String>) -> bool {
        match self.values.get_mut(&symbol) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Current value of `symbol` (empty when unset or unrecognized).
    pub fn get(&self, symbol: char) -> &str {
        self.values.get(&symbol).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(char),
}

/// A parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `format` against the symbols recognized by `symbols`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::UnknownPlaceholder` for `%x` with an
    /// unrecognized `x`, and `TemplateError::DanglingPercent` for a trailing
    /// lone `%`.
    pub fn parse(symbols: &Symbols, format: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = format.char_indices();

        while let Some((offset, ch)) = chars.next() {
            if ch != '%' {
                literal.push(ch);
                continue;
            }
            match chars.next() {
                Some((_, '%')) => literal.push('%'),
                Some((_, symbol)) if symbols.recognizes(symbol) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(symbol));
                }
                Some((_, symbol)) => {
                    return Err(TemplateError::UnknownPlaceholder { symbol, offset });
                }
                None => return Err(TemplateError::DanglingPercent),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Substitute the current symbol values.
    pub fn render(&self, symbols: &Symbols) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(symbol) => out.push_str(symbols.get(*symbol)),
            }
        }
        out
    }
}
