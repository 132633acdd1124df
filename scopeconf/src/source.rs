//! Line sources for a store.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use crate::error::LoadError;

/// Where a [`ConfigFile`](crate::ConfigFile) gets its lines from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A file on disk, read in full on the first `load()`.
    File(PathBuf),
    /// Text already in memory.
    Text(String),
}

impl Source {
    /// Read every line, newline characters stripped.
    pub fn read_lines(&self) -> Result<Vec<String>, LoadError> {
        match self {
            Source::File(path) => read_file_lines(path),
            Source::Text(text) => Ok(split_lines(text)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Text(text) => write!(f, "<inline text, {} bytes>", text.len()),
        }
    }
}

fn read_file_lines(path: &Path) -> Result<Vec<String>, LoadError> {
    let unreadable = || LoadError::Unreadable {
        path: path.to_path_buf(),
    };

    let metadata = fs::metadata(path).map_err(|_| unreadable())?;
    if metadata.is_dir() {
        return Err(unreadable());
    }

    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => unreadable(),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    Ok(split_lines(&contents))
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_owned).collect()
}
