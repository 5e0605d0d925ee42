use thiserror::Error;

use crate::fallback::MissingReason;

/// Errors returned by translation and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// A template could not be compiled or no branch matched. Always returned,
    /// whatever the missing-translation strategy.
    #[error(
        "ICU syntax error for key \"{key}\" in \"{language}\" at line {line}, column {column}: {reason}"
    )]
    Syntax {
        key: String,
        language: String,
        line: usize,
        column: usize,
        reason: String,
    },
    /// Raised only in strict mode.
    #[error(
        "Missing translation for key \"{key}\" in language \"{language}\" (default language \"{default_language}\"): {reason}"
    )]
    MissingTranslation {
        key: String,
        language: String,
        default_language: String,
        reason: MissingReason,
    },
}

/// A syntax error located by byte index inside the template being compiled.
///
/// Converted into [`TranslateError::Syntax`] once the key, language and
/// original template text are known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} (at byte {index})")]
pub struct IcuError {
    pub index: usize,
    pub reason: String,
}

impl IcuError {
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        IcuError {
            index,
            reason: reason.into(),
        }
    }

    /// Shift the index by `base`, used when the error came from a branch body
    /// that starts at `base` in the enclosing template.
    pub fn offset_by(mut self, base: usize) -> Self {
        self.index += base;
        self
    }

    pub fn locate(self, template: &str, key: &str, language: &str) -> TranslateError {
        let (line, column) = line_column(template, self.index);
        TranslateError::Syntax {
            key: key.to_string(),
            language: language.to_string(),
            line,
            column,
            reason: self.reason,
        }
    }
}

/// 1-based line and column (in characters) of a byte index.
pub fn line_column(text: &str, index: usize) -> (usize, usize) {
    let mut end = index.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let prefix = &text[..end];
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = prefix[line_start..].chars().count() + 1;
    (line, column)
}

/// Errors raised while loading tables or settings from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON from '{origin}': {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid translation table in '{origin}': {reason}")]
    InvalidTable { origin: String, reason: String },
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslateError>;
