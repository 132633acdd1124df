//! Line classification: decides whether a raw line is a scope header, a
//! variable definition, or inert, without looking at the value.

use crate::{constants::INVALID_VARIABLE_NAME, error::LoadError, grammar::Grammar};

/// Structural role of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `[a.b]` header; the path is empty for `[]`.
    ScopeHeader(&'a str),
    /// Defines the (possibly dotted) bare name.
    Variable(&'a str),
    /// Blank or comment-only.
    Inert,
    /// Has a name region that is not a valid variable name.
    InvalidName,
}

impl Grammar {
    /// Leftmost position at or after `from` where any comment marker starts.
    pub fn find_comment(&self, line: &str, from: usize) -> Option<usize> {
        let rest = line.get(from..)?;
        self.syntax()
            .comment_starts
            .iter()
            .filter_map(|marker| rest.find(marker.as_str()))
            .min()
            .map(|pos| pos + from)
    }

    /// Position of the first assignment delimiter, ignoring quotes and
    /// comments.
    pub fn find_delimiter(&self, line: &str) -> Option<usize> {
        line.find(self.syntax().assignment_delimiter.as_str())
    }

    /// Position of the assignment delimiter unless a comment starts before
    /// it.
    pub fn live_delimiter(&self, line: &str) -> Option<usize> {
        let delim = self.find_delimiter(line)?;
        match self.find_comment(line, 0) {
            Some(comment) if comment < delim => None,
            _ => Some(delim),
        }
    }

    /// True for `[scope]` lines, including `[]`.
    pub fn is_scope_header(&self, line: &str) -> bool {
        self.header_pattern().is_match(line)
    }

    /// The scope path declared by a header line, or `None` if the line is
    /// not a header.
    pub fn header_scope<'a>(&self, line: &'a str) -> Option<&'a str> {
        let captures = self.header_pattern().captures(line)?;
        Some(captures.get(1).map_or("", |path| path.as_str()))
    }

    /// Trimmed text before the delimiter. A comment that starts before the
    /// delimiter comments it out, and the text before the comment is
    /// returned instead.
    pub fn pre_delimiter<'a>(&self, line: &'a str) -> &'a str {
        let delim = self.find_delimiter(line);
        let comment = self.find_comment(line, 0);
        let end = match (delim, comment) {
            (Some(delim), Some(comment)) if comment < delim => comment,
            (Some(delim), _) => delim,
            (None, Some(comment)) => comment,
            (None, None) => line.len(),
        };
        line[..end].trim()
    }

    /// True when [`pre_delimiter`](Self::pre_delimiter) is a non-empty
    /// name made of name characters and scope delimiters.
    pub fn has_valid_variable_name(&self, line: &str) -> bool {
        let name = self.pre_delimiter(line);
        !name.is_empty() && self.name_pattern().is_match(name)
    }

    /// Extract the bare variable name of a line.
    ///
    /// Returns `Ok(None)` for inert lines and a parse error (tagged with the
    /// 1-based line number) when the name region is present but invalid.
    pub fn variable_name<'a>(
        &self,
        line: &'a str,
        index: usize,
    ) -> Result<Option<&'a str>, LoadError> {
        match self.classify(line) {
            LineKind::Variable(name) => Ok(Some(name)),
            LineKind::InvalidName => {
                Err(LoadError::parse(index, INVALID_VARIABLE_NAME))
            }
            LineKind::ScopeHeader(_) | LineKind::Inert => Ok(None),
        }
    }

    /// Decide the role of a line.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if let Some(scope) = self.header_scope(line) {
            return LineKind::ScopeHeader(scope);
        }

        let name = self.pre_delimiter(line);
        if name.is_empty() {
            // `= value` has a live delimiter but nothing to assign to.
            return if self.live_delimiter(line).is_some() {
                LineKind::InvalidName
            } else {
                LineKind::Inert
            };
        }

        if self.name_pattern().is_match(name) {
            LineKind::Variable(name)
        } else {
            LineKind::InvalidName
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Syntax;

    fn grammar() -> Grammar {
        Syntax::default().compile().expect("default grammar")
    }

    #[test]
    fn comment_position_takes_leftmost_marker() {
        let g = grammar();
        assert_eq!(g.find_comment("a = b // c # d", 0), Some(6));
        assert_eq!(g.find_comment("a = b # c // d", 0), Some(6));
        assert_eq!(g.find_comment("a = b # c // d", 7), Some(10));
        assert_eq!(g.find_comment("a = b", 0), None);
        assert_eq!(g.find_comment("a", 10), None);
    }

    #[test]
    fn pre_delimiter_respects_commented_delimiter() {
        let g = grammar();
        assert_eq!(g.pre_delimiter("  var1 = 42"), "var1");
        assert_eq!(g.pre_delimiter("flag # note = x"), "flag");
        assert_eq!(g.pre_delimiter("enable_keys   # trailing"), "enable_keys");
        assert_eq!(g.pre_delimiter("var2 = 94 # eol"), "var2");
        assert_eq!(g.pre_delimiter("# comment only"), "");
        assert_eq!(g.live_delimiter("flag # note = x"), None);
        assert_eq!(g.live_delimiter("var2 = 94 # eol"), Some(5));
    }

    #[test]
    fn scope_headers() {
        let g = grammar();
        assert_eq!(g.header_scope("[marbles]"), Some("marbles"));
        assert_eq!(
            g.header_scope("  [ sql.maria ]   # sub-scopes and comments"),
            Some("sql.maria")
        );
        assert_eq!(g.header_scope("[]"), Some(""));
        assert_eq!(g.header_scope("[a.b] // note"), Some("a.b"));
        assert_eq!(g.header_scope("[my.scope]  = val"), None);
        assert_eq!(g.header_scope("[a..b]"), None);
        assert_eq!(g.header_scope("[.a]"), None);
        // The header match wins: `[]` followed by a comment resets scope.
        assert!(g.is_scope_header("[]#.$ = something"));
    }

    #[test]
    fn classifies_lines() {
        let g = grammar();
        assert_eq!(g.classify(""), LineKind::Inert);
        assert_eq!(g.classify("   "), LineKind::Inert);
        assert_eq!(g.classify("// Alternate comment"), LineKind::Inert);
        assert_eq!(g.classify("var1 = 42"), LineKind::Variable("var1"));
        assert_eq!(g.classify("enable_keys"), LineKind::Variable("enable_keys"));
        assert_eq!(
            g.classify("auth.user = apache  # full scope"),
            LineKind::Variable("auth.user")
        );
        assert_eq!(g.classify("[marbles]"), LineKind::ScopeHeader("marbles"));
    }

    #[test]
    fn rejects_invalid_names() {
        let g = grammar();
        for line in [
            "my var = my val",
            "[my.scope]  = val",
            "a..b = c",
            ".d. = e",
            "  = orphan value",
        ] {
            assert_eq!(g.classify(line), LineKind::InvalidName, "{line}");
            assert!(!g.has_valid_variable_name(line), "{line}");
        }
    }

    #[test]
    fn invalid_name_reports_one_based_line() {
        let g = grammar();
        let err = g.variable_name("a..b = c", 4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ConfigFile parse error on line 5: Invalid variable name."
        );
        assert_eq!(g.variable_name("# nothing", 0).unwrap(), None);
        assert_eq!(g.variable_name("x = 1", 0).unwrap(), Some("x"));
    }
}
