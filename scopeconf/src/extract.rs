//! Value extraction for lines already known to define a variable.

use crate::{grammar::Grammar, value::Value};

impl Grammar {
    /// True when the line has a valid name followed by a delimiter, live or
    /// commented out.
    pub fn has_value_delimiter(&self, line: &str) -> bool {
        self.has_valid_variable_name(line) && self.find_delimiter(line).is_some()
    }

    /// Byte range of the text between a value's opening and closing quotes.
    ///
    /// The opening quote must be the first non-whitespace character after
    /// the delimiter. An escape character always consumes the character
    /// after it, so `\"` never closes the value and `\\"` does. Only
    /// whitespace and an optional comment may follow the closing quote.
    fn quoted_span(&self, line: &str) -> Option<(usize, usize)> {
        let syntax = self.syntax();
        let delim = self.live_delimiter(line)?;
        let after_delim = delim + syntax.assignment_delimiter.len();
        let rest = &line[after_delim..];
        let value = rest.trim_start();
        let open = after_delim + (rest.len() - value.len());

        let mut chars = value.char_indices();
        match chars.next() {
            Some((_, c)) if c == syntax.quote => {}
            _ => return None,
        }

        let start = open + syntax.quote.len_utf8();
        while let Some((offset, c)) = chars.next() {
            if c == syntax.escape {
                chars.next()?;
                continue;
            }
            if c == syntax.quote {
                let end = open + offset;
                let tail = line[end + syntax.quote.len_utf8()..].trim_start();
                let closes = tail.is_empty() || self.find_comment(tail, 0) == Some(0);
                return closes.then_some((start, end));
            }
        }
        None
    }

    /// True when the value is a well-formed quoted string.
    pub fn has_quoted_value(&self, line: &str) -> bool {
        self.has_valid_variable_name(line) && self.quoted_span(line).is_some()
    }

    /// Raw text between the quotes, escapes still in place. Empty when the
    /// line has no valid quoted value.
    pub fn quoted_value<'a>(&self, line: &'a str) -> &'a str {
        self.quoted_span(line)
            .map_or("", |(start, end)| &line[start..end])
    }

    /// Trimmed text after the delimiter, comments included. Empty when the
    /// delimiter is missing or commented out.
    pub fn post_delimiter<'a>(&self, line: &'a str) -> &'a str {
        match self.live_delimiter(line) {
            Some(delim) => {
                line[delim + self.syntax().assignment_delimiter.len()..].trim()
            }
            None => "",
        }
    }

    /// Resolve the value of a variable line.
    ///
    /// A line without any delimiter is a presence flag. A delimiter behind
    /// a comment marker yields empty text. A quoted value runs to its
    /// closing quote and ignores anything after it. Any other value is cut
    /// at the first comment marker and trimmed. Malformed quoting is kept as
    /// literal text. Escapes are resolved in both cases.
    pub fn resolve_value(&self, line: &str) -> Value {
        if !self.has_value_delimiter(line) {
            return Value::Flag(true);
        }

        let raw = match self.quoted_span(line) {
            Some((start, end)) => &line[start..end],
            None => {
                let post = self.post_delimiter(line);
                let end = self.find_comment(post, 0).unwrap_or(post.len());
                post[..end].trim()
            }
        };

        Value::Text(self.unescape(raw))
    }

    /// Replace every escape character and the character after it with just
    /// that character. A trailing lone escape character is kept.
    pub fn unescape(&self, raw: &str) -> String {
        let escape = self.syntax().escape;
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            if c == escape {
                match chars.next() {
                    Some(escaped) => out.push(escaped),
                    None => out.push(c),
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::{Syntax, Value, grammar::Grammar};

    fn grammar() -> Grammar {
        Syntax::default().compile().expect("default grammar")
    }

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    #[test]
    fn missing_delimiter_is_a_flag() {
        let g = grammar();
        assert_eq!(g.resolve_value("enable_keys"), Value::Flag(true));
        assert_eq!(g.resolve_value("enable_keys  # comment"), Value::Flag(true));
        assert!(!g.has_value_delimiter("enable_keys  # comment"));
    }

    #[test]
    fn commented_out_delimiter_yields_empty_text() {
        let g = grammar();
        assert!(g.has_value_delimiter("flag # note = x"));
        assert_eq!(g.post_delimiter("flag # note = x"), "");
        assert_eq!(g.resolve_value("flag # note = x"), text(""));
        assert_eq!(g.resolve_value(r#"flag // "quoted" = x"#), text(""));
    }

    #[test]
    fn unquoted_values_are_trimmed_and_cut_at_comments() {
        let g = grammar();
        assert_eq!(g.resolve_value("var1 = 42"), text("42"));
        assert_eq!(g.resolve_value("var2 = 94           # EoL Comment!"), text("94"));
        assert_eq!(g.resolve_value("longname = John Doe"), text("John Doe"));
        assert_eq!(g.resolve_value("name3 = 'Jerry'"), text("'Jerry'"));
        assert_eq!(g.resolve_value("novalue ="), text(""));
        assert_eq!(g.resolve_value("novalue =   // nothing"), text(""));
        assert_eq!(
            g.resolve_value(r#"badquoted = this is "NOT" a quoted string"#),
            text(r#"this is "NOT" a quoted string"#)
        );
    }

    #[test]
    fn quoted_values_keep_whitespace_and_comment_markers() {
        let g = grammar();
        assert_eq!(g.resolve_value(r#"name2 = " Jane Doe ""#), text(" Jane Doe "));
        assert_eq!(
            g.resolve_value(r#"words = "Quotes \"inside\" a string""#),
            text(r#"Quotes "inside" a string"#)
        );
        assert_eq!(
            g.resolve_value(r#"specials = "This has #, \\, and = inside of it""#),
            text(r"This has #, \, and = inside of it")
        );
        assert_eq!(
            g.resolve_value(r#"var8 = "quoted string # in value"  # real comment"#),
            text("quoted string # in value")
        );
        assert_eq!(g.resolve_value(r#"empty = """#), text(""));
    }

    #[test]
    fn malformed_quotes_fall_back_to_literal_text() {
        let g = grammar();
        assert!(!g.has_quoted_value(r#"oddquote = "not a quoted value" cause extra"#));
        assert_eq!(
            g.resolve_value(r#"oddquote = "not a quoted value" cause extra"#),
            text(r#""not a quoted value" cause extra"#)
        );
        assert_eq!(
            g.resolve_value(r#"var9 = "start quoted" but not ended"#),
            text(r#""start quoted" but not ended"#)
        );
        assert_eq!(
            g.resolve_value(r#"open = "never closed # comment"#),
            text(r#""never closed"#)
        );
    }

    #[test]
    fn escaped_escape_closes_the_quote() {
        let g = grammar();
        let line = r#"path = "C:\\dir\\""#;
        assert!(g.has_quoted_value(line));
        assert_eq!(g.quoted_value(line), r"C:\\dir\\");
        assert_eq!(g.resolve_value(line), text(r"C:\dir\"));
    }

    #[test]
    fn quoted_round_trip() {
        let g = grammar();
        for original in [
            r#"plain"#,
            r#"has "quotes""#,
            r#"back\slash"#,
            r#"trailing\"#,
            r#"\"both\""#,
            r#"# not a comment // either"#,
        ] {
            let escaped = original.replace('\\', r"\\").replace('"', r#"\""#);
            let line = format!(r#"key = "{escaped}""#);
            assert_eq!(g.resolve_value(&line), text(original), "{line}");
        }
    }

    #[test]
    fn unquoted_values_unescape() {
        let g = grammar();
        assert_eq!(g.resolve_value(r"path = C:\\dir"), text(r"C:\dir"));
        assert_eq!(g.resolve_value(r"lone = end\"), text(r"end\"));
    }

    #[test]
    fn post_delimiter_ignores_commented_delimiter() {
        let g = grammar();
        assert_eq!(g.post_delimiter("a = b # c"), "b # c");
        assert_eq!(g.post_delimiter("a # = b"), "");
        assert_eq!(g.post_delimiter("a"), "");
    }

    #[test]
    fn custom_quote_and_escape() {
        let g = Syntax::new()
            .with_quote('\'')
            .with_escape('^')
            .with_assignment_delimiter(":")
            .compile()
            .expect("custom grammar");
        assert_eq!(g.resolve_value("name: 'it^'s here' # c"), text("it's here"));
        assert_eq!(g.resolve_value(r#"name: "plain""#), text(r#""plain""#));
    }
}
