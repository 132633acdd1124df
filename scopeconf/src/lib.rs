//! Scoped, line-oriented configuration files.
//!
//! A file is a sequence of `name = value` lines, bare `name` flags, and
//! `[scope]` headers. Names may be dotted (`auth.user`), and bracket scopes
//! and dotted names compose into one fully-scoped name (`sql.maria.auth.user`).
//! Values may be quoted to keep whitespace and comment markers, names may be
//! declared repeatedly to collect several values, and defaults can be
//! preloaded before parsing.
//!
//! ```
//! use scopeconf::ConfigFile;
//!
//! let mut cf = ConfigFile::from_text(
//!     "[sql.maria]\nauth.user = apache  # comment\nauth.pw = \"se#cure\"",
//! );
//! assert!(cf.load());
//! assert_eq!(cf.get_str("sql.maria.auth.user"), Some("apache"));
//! assert_eq!(cf.get_str("sql.maria.auth.pw"), Some("se#cure"));
//! assert_eq!(cf.enumerate_scope("sql.maria.auth"), vec!["user", "pw"]);
//! ```
//!
//! Parsing is split across three stages implemented on [`Grammar`]: line
//! classification (`classify`), value extraction (`extract`), and the
//! store and query engine in [`ConfigFile`].

pub mod classify;
pub mod constants;
pub mod error;
pub mod extract;
pub mod grammar;
pub mod source;
pub mod store;
pub mod syntax;
pub mod value;

pub use classify::LineKind;
pub use error::{LoadError, SyntaxError};
pub use grammar::Grammar;
pub use source::Source;
pub use store::{ConfigFile, LoadState, Lookup};
pub use syntax::Syntax;
pub use value::{Defaults, PreloadValue, Value};
