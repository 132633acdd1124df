//! Default lexical choices and user-facing messages.

/// Comment markers recognised when no override is given.
pub const DEFAULT_COMMENT_STARTS: &[&str] = &["#", "//"];

/// Separates a name from its value.
pub const DEFAULT_ASSIGNMENT_DELIMITER: &str = "=";

/// Joins scope segments (`sql.maria.auth`).
pub const DEFAULT_SCOPE_DELIMITER: &str = ".";

/// Wraps values that keep whitespace and comment markers.
pub const DEFAULT_QUOTE: char = '"';

/// Makes the next character literal.
pub const DEFAULT_ESCAPE: char = '\\';

/// Regular-expression class body (without the surrounding brackets) used for
/// both scope segments and variable names.
pub const DEFAULT_NAME_CHARS: &str = r"A-Za-z0-9_\-";

/// Parse error message for a bad name region.
pub const INVALID_VARIABLE_NAME: &str = "Invalid variable name.";
