//! Command validity cache.
//!
//! A one-shot snapshot of every executable basename reachable through
//! `PATH`, built at startup and read on every redraw to color the command
//! token. Lookup is an exact, case-sensitive match: `l` is invalid even
//! though `ls` is on `PATH`. That asymmetry is deliberate and kept.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

/// Immutable set of executable basenames.
#[derive(Debug, Default)]
pub struct CommandIndex {
    names: HashSet<String>,
}

impl CommandIndex {
    /// Scan every directory on the `PATH` environment variable. A missing
    /// `PATH` yields an empty index (every command colors invalid).
    pub fn from_path_env() -> Self {
        let index = match std::env::var_os("PATH") {
            Some(path) => Self::from_dirs(std::env::split_paths(&path)),
            None => Self::default(),
        };
        debug!(commands = index.len(), "built command validity index");
        index
    }

    /// Scan an explicit list of directories. Unreadable directories are
    /// skipped; duplicate basenames across directories collapse in the set.
    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut names = HashSet::new();
        for dir in dirs {
            let Ok(entries) = std::fs::read_dir(dir.as_ref()) else {
                continue;
            };
            for entry in entries.filter_map(Result::ok) {
                if is_executable(&entry.path()) {
                    names.insert(entry.file_name().to_string_lossy().into_owned());
                }
            }
        }
        Self { names }
    }

    /// Build from a fixed name list (tests, embedders).
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive membership check. Empty tokens are invalid.
    pub fn contains(&self, token: &str) -> bool {
        !token.is_empty() && self.names.contains(token)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
