use std::collections::HashMap;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{Error, Result};
use crate::paths;

/// One directory name or many, normalized into a list before any work happens.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DirList(Vec<String>);

impl DirList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for DirList {
    fn from(name: &str) -> Self {
        Self(vec![name.to_owned()])
    }
}

impl From<String> for DirList {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl<S: Into<String>> From<Vec<S>> for DirList {
    fn from(names: Vec<S>) -> Self {
        names.into_iter().collect()
    }
}

impl<S: AsRef<str>> From<&[S]> for DirList {
    fn from(names: &[S]) -> Self {
        Self(names.iter().map(|name| name.as_ref().to_owned()).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for DirList {
    fn from(names: [S; N]) -> Self {
        names.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for DirList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for DirList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Lazily creates directories under a base directory and remembers where they are.
///
/// Paths are memoized under the name they were requested with, so asking for the
/// same name again never touches the filesystem. Mutation goes through `&mut self`;
/// wrap the registry in a lock if it has to be shared between threads.
#[derive(Debug, Clone)]
pub struct Registry {
    base_dir: Utf8PathBuf,
    entries: HashMap<String, Utf8PathBuf>,
}

impl Registry {
    /// Resolve `base_dir` and ensure every name in `dirs` exists beneath it.
    ///
    /// `base_dir` accepts an existing file (its parent is used), the literals `~`,
    /// `HOME` and `ROOT`, or any existing path.
    pub fn new(dirs: impl Into<DirList>, base_dir: &str) -> Result<Self> {
        let base_dir = resolve_base_dir(base_dir)?;
        Self::with_base(dirs.into(), base_dir)
    }

    /// Like [`Registry::new`] with the home directory as the base.
    ///
    /// Fails with [`Error::InvalidBaseDirectory`] if the home directory is missing.
    pub fn in_home(dirs: impl Into<DirList>) -> Result<Self> {
        Self::under_existing(dirs.into(), paths::home_dir()?)
    }

    fn under_existing(dirs: DirList, base_dir: &Utf8Path) -> Result<Self> {
        Self::with_base(dirs, existing(base_dir)?)
    }

    fn with_base(dirs: DirList, base_dir: Utf8PathBuf) -> Result<Self> {
        let mut registry = Self {
            base_dir,
            entries: HashMap::new(),
        };
        for name in dirs.iter() {
            registry.get_or_create(name)?;
        }
        Ok(registry)
    }

    /// The resolved, absolute base directory.
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Re-resolve the base directory. Already memoized entries keep their paths.
    pub fn set_base_dir(&mut self, base_dir: &str) -> Result<()> {
        self.base_dir = resolve_base_dir(base_dir)?;
        Ok(())
    }

    /// Return the directory for `name`, creating it (and its parents) on first use.
    ///
    /// Absolute names are used verbatim; relative names are joined onto the base
    /// directory.
    pub fn get_or_create(&mut self, name: &str) -> Result<Utf8PathBuf> {
        if let Some(path) = self.entries.get(name) {
            tracing::trace!(name, %path, "directory already resolved");
            return Ok(path.clone());
        }

        let requested = Utf8Path::new(name);
        let path = if requested.is_absolute() {
            requested.to_owned()
        } else {
            self.base_dir.join(requested)
        };

        paths::ensure_dir(&path)?;
        self.entries.insert(name.to_owned(), path.clone());
        Ok(path)
    }

    /// Alias of [`Registry::get_or_create`].
    pub fn create(&mut self, name: &str) -> Result<Utf8PathBuf> {
        self.get_or_create(name)
    }

    /// The memoized path for `name`, if it was resolved before. Never touches disk.
    pub fn get(&self, name: &str) -> Option<&Utf8Path> {
        self.entries.get(name).map(Utf8PathBuf::as_path)
    }

    /// Every memoized `(name, path)` pair, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Utf8Path)> {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    /// Number of memoized names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no name has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn join_path<I, S>(parts: I) -> Utf8PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths::join_path(parts)
    }

    pub fn is_file(path: impl AsRef<Path>) -> bool {
        paths::is_file(path)
    }

    pub fn is_dir(path: impl AsRef<Path>) -> bool {
        paths::is_dir(path)
    }
}

fn resolve_base_dir(base_dir: &str) -> Result<Utf8PathBuf> {
    let candidate = Utf8Path::new(base_dir);

    // An existing file takes precedence over the literals.
    if paths::is_file(candidate) {
        let file = paths::absolute(candidate)?;
        let parent = file.parent().map(Utf8Path::to_owned).unwrap_or(file);
        tracing::debug!(base_dir = %parent, "using parent of file as base directory");
        return Ok(parent);
    }

    let resolved = match base_dir {
        "~" | "HOME" => existing(paths::home_dir()?)?,
        "ROOT" => paths::root_dir()?.to_owned(),
        _ if candidate.exists() => paths::absolute(candidate)?,
        _ => {
            return Err(Error::InvalidBaseDirectory {
                base_dir: base_dir.to_owned(),
            });
        }
    };
    tracing::debug!(base_dir = %resolved, "resolved base directory");
    Ok(resolved)
}

/// Host-provided base directories still have to exist on disk.
fn existing(dir: &Utf8Path) -> Result<Utf8PathBuf> {
    if dir.is_dir() {
        Ok(dir.to_owned())
    } else {
        Err(Error::InvalidBaseDirectory {
            base_dir: dir.to_string(),
        })
    }
}
