//! The store and query engine.

use std::{
    collections::HashSet,
    path::PathBuf,
    sync::Arc,
};

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use tracing::{debug, trace, warn};

use crate::{
    error::{LoadError, SyntaxError},
    grammar::Grammar,
    source::Source,
    syntax::Syntax,
    value::{PreloadValue, Value},
};

static DEFAULT_GRAMMAR: Lazy<Arc<Grammar>> = Lazy::new(|| {
    Arc::new(
        Syntax::default()
            .compile()
            .expect("default syntax always compiles"),
    )
});

/// Lifecycle of a [`ConfigFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Fresh, or reset. Preloads may be added.
    #[default]
    NotLoaded,
    /// Every line parsed without errors.
    Loaded,
    /// Terminal until [`ConfigFile::reset`]; see [`ConfigFile::errors`].
    Failed,
}

/// Result of a successful [`ConfigFile::get`].
#[derive(Debug)]
pub enum Lookup {
    /// First value stored under the exact name.
    Value(Value),
    /// Every name below the queried scope, with the scope prefix removed.
    Scope(ConfigFile),
}

impl Lookup {
    /// The value of an exact-name match.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Lookup::Value(value) => Some(value),
            Lookup::Scope(_) => None,
        }
    }

    /// Shorthand for a text value.
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Shorthand for a flag value.
    pub fn as_flag(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_flag)
    }

    /// The sub-store of a scope match.
    pub fn as_scope(&self) -> Option<&ConfigFile> {
        match self {
            Lookup::Scope(scope) => Some(scope),
            Lookup::Value(_) => None,
        }
    }

    /// Consume the lookup, keeping only a scope match.
    pub fn into_scope(self) -> Option<ConfigFile> {
        match self {
            Lookup::Scope(scope) => Some(scope),
            Lookup::Value(_) => None,
        }
    }
}

impl From<Value> for Lookup {
    fn from(value: Value) -> Self {
        Lookup::Value(value)
    }
}

impl From<&str> for Lookup {
    fn from(value: &str) -> Self {
        Lookup::Value(value.into())
    }
}

impl From<String> for Lookup {
    fn from(value: String) -> Self {
        Lookup::Value(value.into())
    }
}

impl From<bool> for Lookup {
    fn from(value: bool) -> Self {
        Lookup::Value(value.into())
    }
}

impl From<ConfigFile> for Lookup {
    fn from(scope: ConfigFile) -> Self {
        Lookup::Scope(scope)
    }
}

/// A parsed configuration: fully-scoped names mapped to their values in
/// declaration order.
///
/// Mutation (`preload`, `load`, `reset`) happens during a single-threaded
/// setup phase. Afterwards every query takes `&self`, so a loaded store can
/// be shared between readers.
#[derive(Debug)]
pub struct ConfigFile {
    source: Option<Source>,
    grammar: Arc<Grammar>,
    state: LoadState,
    current_scope: String,
    values: IndexMap<String, Vec<Value>>,
    /// Names still holding a default from `preload`.
    preloaded: HashSet<String>,
    errors: Vec<LoadError>,
}

impl Default for ConfigFile {
    /// A store with no source. It can be preloaded and queried but never
    /// loaded.
    fn default() -> Self {
        Self::detached(Arc::clone(&DEFAULT_GRAMMAR))
    }
}

impl ConfigFile {
    /// Store backed by `source`, using the default syntax.
    pub fn new(source: Source) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    /// Store backed by a file, read on `load()`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Source::File(path.into()))
    }

    /// Store backed by in-memory text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(Source::Text(text.into()))
    }

    /// Store backed by `source` with custom lexical choices.
    pub fn with_syntax(
        source: Source,
        syntax: &Syntax,
    ) -> Result<Self, SyntaxError> {
        let grammar = Arc::new(syntax.compile()?);
        Ok(Self {
            source: Some(source),
            ..Self::detached(grammar)
        })
    }

    fn detached(grammar: Arc<Grammar>) -> Self {
        Self {
            source: None,
            grammar,
            state: LoadState::NotLoaded,
            current_scope: String::new(),
            values: IndexMap::new(),
            preloaded: HashSet::new(),
            errors: Vec::new(),
        }
    }

    /// Where lines come from. `None` for a scope result.
    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    /// The lexical choices in effect.
    pub fn syntax(&self) -> &Syntax {
        self.grammar.syntax()
    }

    /// The compiled grammar, shared with scope results.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// True once `load()` has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Supply defaults for names that are not stored yet.
    ///
    /// Existing names are never overwritten. A preloaded name is replaced
    /// (not appended to) by the first real assignment during `load()`.
    /// Empty lists are ignored.
    pub fn preload<I, K, V>(&mut self, defaults: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PreloadValue>,
    {
        for (name, value) in defaults {
            let name = name.into();
            if self.values.contains_key(&name) {
                continue;
            }
            let values = value.into().into_values();
            if values.is_empty() {
                continue;
            }
            self.preloaded.insert(name.clone());
            self.values.insert(name, values);
        }
    }

    /// True while `name` still holds its preloaded default.
    pub fn is_preloaded(&self, name: &str) -> bool {
        self.preloaded.contains(name)
    }

    /// Parse the source.
    ///
    /// Returns `true` once every line has been processed without errors.
    /// Calling it again on a loaded store is a no-op returning `true`; on a
    /// failed store it returns `false` until [`reset`](Self::reset). A store
    /// without a source always fails and records why.
    pub fn load(&mut self) -> bool {
        match self.state {
            LoadState::Loaded => {
                debug!("config already loaded; skipping");
                return true;
            }
            LoadState::Failed => return false,
            LoadState::NotLoaded => {}
        }

        let Some(source) = self.source.as_ref() else {
            warn!("load() called on a config without a source");
            self.errors.push(LoadError::NoSource);
            return false;
        };

        let lines = match source.read_lines() {
            Ok(lines) => lines,
            Err(err) => {
                warn!(source = %source, error = %err, "failed to read config source");
                self.errors.push(err);
                self.state = LoadState::Failed;
                return false;
            }
        };

        debug!(source = %source, lines = lines.len(), "parsing config");

        self.current_scope.clear();
        for (index, line) in lines.iter().enumerate() {
            self.process_line(index, line);
        }

        if self.errors.is_empty() {
            debug!(entries = self.values.len(), "config loaded");
            self.state = LoadState::Loaded;
            true
        } else {
            debug!(errors = self.errors.len(), "config failed to load");
            self.state = LoadState::Failed;
            false
        }
    }

    fn process_line(&mut self, index: usize, line: &str) {
        let grammar = Arc::clone(&self.grammar);
        if let Some(scope) = grammar.header_scope(line) {
            trace!(line = index + 1, scope, "entering scope");
            self.current_scope = scope.to_string();
            return;
        }

        match grammar.variable_name(line, index) {
            Ok(Some(name)) => {
                let full_name = grammar.compose_name(&self.current_scope, name);
                let value = grammar.resolve_value(line);
                self.assign(full_name, value);
            }
            Ok(None) => {}
            Err(err) => {
                warn!("{err}");
                self.errors.push(err);
            }
        }
    }

    fn assign(&mut self, name: String, value: Value) {
        if self.preloaded.remove(&name) {
            self.values.insert(name, vec![value]);
        } else {
            self.values.entry(name).or_default().push(value);
        }
    }

    /// Return to the unloaded state, dropping values, preloads and errors.
    pub fn reset(&mut self) {
        self.state = LoadState::NotLoaded;
        self.current_scope.clear();
        self.values.clear();
        self.preloaded.clear();
        self.errors.clear();
    }

    /// Error messages accumulated by `load()`, in order.
    pub fn errors(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// The typed form of [`errors`](Self::errors).
    pub fn diagnostics(&self) -> &[LoadError] {
        &self.errors
    }

    /// Look up a name, falling back to a scope match.
    ///
    /// An exact name yields its first value. Otherwise, if any stored name
    /// is a true descendant of `query` (`my.scope` matches `my.scope.x` but
    /// not `my.scopeless.x`), a new store holding those names with the
    /// prefix stripped is returned.
    pub fn get(&self, query: &str) -> Option<Lookup> {
        if let Some(value) = self.get_value(query) {
            return Some(Lookup::Value(value.clone()));
        }
        self.get_scope(query).map(Lookup::Scope)
    }

    /// Like [`get`](Self::get), returning `default` when nothing matches.
    pub fn get_or(&self, query: &str, default: impl Into<Lookup>) -> Lookup {
        self.get(query).unwrap_or_else(|| default.into())
    }

    /// First value under the exact name, without scope matching.
    pub fn get_value(&self, query: &str) -> Option<&Value> {
        self.values.get(query).and_then(|values| values.first())
    }

    /// First value under the exact name, if it is text.
    pub fn get_str(&self, query: &str) -> Option<&str> {
        self.get_value(query).and_then(Value::as_str)
    }

    /// Build a sub-store for every name below `scope`.
    pub fn get_scope(&self, scope: &str) -> Option<ConfigFile> {
        let delim = self.syntax().scope_delimiter.as_str();
        let matches: Vec<(String, Vec<Value>)> = self
            .values
            .iter()
            .filter_map(|(name, values)| {
                let rest = name.strip_prefix(scope)?.strip_prefix(delim)?;
                (!rest.is_empty()).then(|| (rest.to_string(), values.clone()))
            })
            .collect();

        if matches.is_empty() {
            return None;
        }

        let mut sub = ConfigFile::detached(Arc::clone(&self.grammar));
        sub.preload(matches);
        Some(sub)
    }

    /// Every value under the exact name, in declaration order.
    pub fn get_array(&self, query: &str) -> &[Value] {
        self.values
            .get(query)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The whole store, fully-scoped names in declaration order.
    pub fn get_all(&self) -> &IndexMap<String, Vec<Value>> {
        &self.values
    }

    /// True when the exact name is stored.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Next path segment of every name below `prefix`, de-duplicated in
    /// first-seen order. An empty prefix lists the top level. A trailing
    /// scope delimiter on `prefix` is ignored.
    pub fn enumerate_scope(&self, prefix: &str) -> Vec<String> {
        let delim = self.syntax().scope_delimiter.as_str();
        let prefix = prefix.strip_suffix(delim).unwrap_or(prefix);

        let mut segments = IndexSet::new();
        for name in self.values.keys() {
            let rest = if prefix.is_empty() {
                name.as_str()
            } else {
                match name
                    .strip_prefix(prefix)
                    .and_then(|rest| rest.strip_prefix(delim))
                {
                    Some(rest) => rest,
                    None => continue,
                }
            };
            let segment = match rest.find(delim) {
                Some(end) => &rest[..end],
                None => rest,
            };
            segments.insert(segment.to_string());
        }
        segments.into_iter().collect()
    }
}
