//! Error types for loading and for grammar compilation.

use std::path::PathBuf;

use thiserror::Error;

/// An entry in a [`ConfigFile`](crate::ConfigFile) error log.
///
/// The `Display` form of each variant is the exact message reported by
/// [`ConfigFile::errors`](crate::ConfigFile::errors).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(
        "Cannot load file; no file was given. (Note: you cannot load() a query result.)"
    )]
    /// `load()` on a store with no source, such as a scope result.
    NoSource,

    /// Missing, a directory, or not permitted.
    #[error("Cannot load file; file does not exist or is not readable.")]
    Unreadable {
        /// The file that was asked for.
        path: PathBuf,
    },

    /// Any other read failure, including text that is not UTF-8.
    #[error("Cannot load file; unknown file error.")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A problem on a single line. `line` is 1-based.
    #[error("ConfigFile parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },
}

impl LoadError {
    /// Build a parse error from a 0-based line index.
    pub(crate) fn parse(index: usize, message: impl Into<String>) -> Self {
        LoadError::Parse {
            line: index + 1,
            message: message.into(),
        }
    }

    /// True for errors about a specific line.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, LoadError::Parse { .. })
    }
}

/// Raised when a [`Syntax`](crate::Syntax) cannot be compiled into a grammar.
#[derive(Error, Debug)]
pub enum SyntaxError {
    /// The assignment delimiter is `""`.
    #[error("assignment delimiter must not be empty")]
    EmptyAssignmentDelimiter,

    /// The scope delimiter is `""`.
    #[error("scope delimiter must not be empty")]
    EmptyScopeDelimiter,

    /// One of the comment markers is `""`.
    #[error("comment markers must not be empty strings")]
    EmptyCommentMarker,

    /// Quote and escape use the same character.
    #[error("quote and escape characters must differ (both are {0:?})")]
    QuoteIsEscape(char),

    #[error("invalid {field} character class `{class}`")]
    /// A character class does not compile inside a regex.
    InvalidCharClass {
        /// `scope_chars` or `name_chars`.
        field: &'static str,
        /// The offending class body.
        class: String,
        /// Compiler error from `regex`.
        #[source]
        source: regex::Error,
    },
}
