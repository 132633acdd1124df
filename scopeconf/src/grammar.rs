//! Compiled line-matching patterns.

use regex::Regex;

use crate::{error::SyntaxError, syntax::Syntax};

/// A compiled [`Syntax`].
///
/// Holds the regular expressions derived from the lexical choices so that
/// no pattern is rebuilt per line. The line classifier and value extractor
/// are implemented on this type (see `classify.rs` and `extract.rs`).
#[derive(Debug, Clone)]
pub struct Grammar {
    syntax: Syntax,
    /// `[a.b.c]` header, optionally followed by whitespace and a comment.
    /// Capture 1 is the scope path (absent for `[]`).
    scope_header: Regex,
    /// A complete, already isolated variable name such as `auth.user`.
    variable_name: Regex,
}

impl Grammar {
    pub(crate) fn build(syntax: Syntax) -> Result<Self, SyntaxError> {
        let scope_delim = regex::escape(&syntax.scope_delimiter);
        let comment_tail = if syntax.comment_starts.is_empty() {
            String::new()
        } else {
            let markers = syntax
                .comment_starts
                .iter()
                .map(|marker| regex::escape(marker))
                .collect::<Vec<_>>()
                .join("|");
            format!(r"(?:(?:{markers}).*)?")
        };

        let scope_chars = &syntax.scope_chars;
        let scope_header = Regex::new(&format!(
            r"^\s*\[\s*([{scope_chars}]+(?:{scope_delim}[{scope_chars}]+)*)?\s*\]\s*{comment_tail}$"
        ))
        .map_err(|source| SyntaxError::InvalidCharClass {
            field: "scope_chars",
            class: syntax.scope_chars.clone(),
            source,
        })?;

        let name_chars = &syntax.name_chars;
        let variable_name = Regex::new(&format!(
            r"^\s*(?:[{name_chars}]+(?:{scope_delim}[{name_chars}]+)*)\s*$"
        ))
        .map_err(|source| SyntaxError::InvalidCharClass {
            field: "name_chars",
            class: syntax.name_chars.clone(),
            source,
        })?;

        Ok(Self {
            syntax,
            scope_header,
            variable_name,
        })
    }

    /// The choices this grammar was built from.
    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    pub(crate) fn header_pattern(&self) -> &Regex {
        &self.scope_header
    }

    pub(crate) fn name_pattern(&self) -> &Regex {
        &self.variable_name
    }

    /// Join a bracket scope and a (possibly dotted) bare name.
    pub fn compose_name(&self, scope: &str, name: &str) -> String {
        if scope.is_empty() {
            name.to_string()
        } else {
            format!("{scope}{}{name}", self.syntax.scope_delimiter)
        }
    }
}
