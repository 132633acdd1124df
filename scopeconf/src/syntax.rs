//! Configurable lexical choices.

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_ASSIGNMENT_DELIMITER, DEFAULT_COMMENT_STARTS, DEFAULT_ESCAPE,
        DEFAULT_NAME_CHARS, DEFAULT_QUOTE, DEFAULT_SCOPE_DELIMITER,
    },
    error::SyntaxError,
    grammar::Grammar,
};

/// Lexical choices for a configuration file.
///
/// A `Syntax` is a plain value object. It is turned into a [`Grammar`] once,
/// via [`Syntax::compile`], and never changes while a file is being parsed.
/// Unusual values (for example a delimiter that is also a name character)
/// are accepted but can make lines ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Syntax {
    /// Strings that start a line comment. The leftmost match on a line wins.
    pub comment_starts: Vec<String>,
    /// Separates a variable name from its value. Only the first occurrence
    /// on a line counts.
    pub assignment_delimiter: String,
    /// Joins scope segments into a fully-scoped name.
    pub scope_delimiter: String,
    /// Opens and closes a quoted value.
    pub quote: char,
    /// Makes the following character literal, inside or outside quotes.
    pub escape: char,
    /// Regular-expression class body for bracketed scope segments.
    pub scope_chars: String,
    /// Regular-expression class body for variable name segments.
    pub name_chars: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            comment_starts: DEFAULT_COMMENT_STARTS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
            assignment_delimiter: DEFAULT_ASSIGNMENT_DELIMITER.to_string(),
            scope_delimiter: DEFAULT_SCOPE_DELIMITER.to_string(),
            quote: DEFAULT_QUOTE,
            escape: DEFAULT_ESCAPE,
            scope_chars: DEFAULT_NAME_CHARS.to_string(),
            name_chars: DEFAULT_NAME_CHARS.to_string(),
        }
    }
}

impl Syntax {
    /// Same as [`Syntax::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of comment markers.
    pub fn with_comment_starts<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comment_starts = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the assignment delimiter (for example `:`).
    pub fn with_assignment_delimiter(
        mut self,
        delimiter: impl Into<String>,
    ) -> Self {
        self.assignment_delimiter = delimiter.into();
        self
    }

    /// Replace the scope delimiter.
    pub fn with_scope_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.scope_delimiter = delimiter.into();
        self
    }

    /// Replace the quote character.
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Replace the escape character.
    pub fn with_escape(mut self, escape: char) -> Self {
        self.escape = escape;
        self
    }

    /// Set the character class allowed in bracketed scope segments, written
    /// as the body of a regex class (e.g. `a-z0-9`).
    pub fn with_scope_chars(mut self, class: impl Into<String>) -> Self {
        self.scope_chars = class.into();
        self
    }

    /// Set the character class allowed in variable name segments.
    pub fn with_name_chars(mut self, class: impl Into<String>) -> Self {
        self.name_chars = class.into();
        self
    }

    /// Validate the choices and build the line-matching patterns.
    pub fn compile(&self) -> Result<Grammar, SyntaxError> {
        if self.assignment_delimiter.is_empty() {
            return Err(SyntaxError::EmptyAssignmentDelimiter);
        }
        if self.scope_delimiter.is_empty() {
            return Err(SyntaxError::EmptyScopeDelimiter);
        }
        if self.comment_starts.iter().any(|marker| marker.is_empty()) {
            return Err(SyntaxError::EmptyCommentMarker);
        }
        if self.quote == self.escape {
            return Err(SyntaxError::QuoteIsEscape(self.quote));
        }

        Grammar::build(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_format() {
        let syntax = Syntax::default();
        assert_eq!(syntax.comment_starts, vec!["#", "//"]);
        assert_eq!(syntax.assignment_delimiter, "=");
        assert_eq!(syntax.scope_delimiter, ".");
        assert_eq!(syntax.quote, '"');
        assert_eq!(syntax.escape, '\\');
    }

    #[test]
    fn rejects_empty_delimiters() {
        let err = Syntax::new()
            .with_assignment_delimiter("")
            .compile()
            .unwrap_err();
        assert!(matches!(err, SyntaxError::EmptyAssignmentDelimiter));

        let err = Syntax::new().with_scope_delimiter("").compile().unwrap_err();
        assert!(matches!(err, SyntaxError::EmptyScopeDelimiter));

        let err = Syntax::new()
            .with_comment_starts(["#", ""])
            .compile()
            .unwrap_err();
        assert!(matches!(err, SyntaxError::EmptyCommentMarker));
    }

    #[test]
    fn rejects_broken_character_class() {
        let err = Syntax::new().with_name_chars("z-a").compile().unwrap_err();
        match err {
            SyntaxError::InvalidCharClass { field, .. } => {
                assert_eq!(field, "name_chars")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn deserializes_partial_overrides() {
        let syntax: Syntax = serde_json::from_str(
            r#"{ "comment_starts": [";"], "assignment_delimiter": ":" }"#,
        )
        .expect("valid syntax json");

        assert_eq!(syntax.comment_starts, vec![";"]);
        assert_eq!(syntax.assignment_delimiter, ":");
        assert_eq!(syntax.scope_delimiter, ".");
        assert!(syntax.compile().is_ok());
    }
}
