//! Host directory constants and stateless path helpers.
//!
//! The home and root directories are looked up once per process, the first time
//! anything asks for them, and never change afterwards.

use std::fs;
use std::io;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{Error, Result};

static HOME_DIR: LazyLock<Option<PathBuf>> = LazyLock::new(dirs::home_dir);

static ROOT_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    // On Windows the last ancestor of the working directory is its drive root.
    std::env::current_dir()
        .ok()
        .and_then(|cwd| cwd.ancestors().last().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from(MAIN_SEPARATOR_STR))
});

/// The current user's home directory.
pub fn home_dir() -> Result<&'static Utf8Path> {
    let home = HOME_DIR.as_deref().ok_or(Error::HomeDirUnavailable)?;
    utf8(home)
}

/// The filesystem root (drive root of the working directory on Windows).
pub fn root_dir() -> Result<&'static Utf8Path> {
    utf8(&ROOT_DIR)
}

/// Join path segments with the platform separator. Never touches the filesystem.
pub fn join_path<I, S>(parts: I) -> Utf8PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = Utf8PathBuf::new();
    for part in parts {
        joined.push(part.as_ref());
    }
    joined
}

/// Whether `path` exists and is a regular file.
pub fn is_file(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

/// Whether `path` exists and is a directory.
pub fn is_dir(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_dir()
}

/// Ensure a directory exists, creating it and any missing parents if needed.
///
/// A non-directory already sitting at `path` is reported as
/// [`io::ErrorKind::NotADirectory`].
pub fn ensure_dir(path: &Utf8Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(Error::Filesystem {
            path: path.to_owned(),
            source: io::Error::new(
                io::ErrorKind::NotADirectory,
                "path exists and is not a directory",
            ),
        });
    }
    fs::create_dir_all(path).map_err(|source| Error::Filesystem {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(%path, "created directory");
    Ok(())
}

/// Make `path` absolute against the current working directory without resolving
/// symlinks.
pub(crate) fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }
    let resolved = std::path::absolute(path).map_err(|source| Error::Filesystem {
        path: path.to_owned(),
        source,
    })?;
    Utf8PathBuf::from_path_buf(resolved).map_err(|path| Error::NonUtf8Path { path })
}

fn utf8(path: &Path) -> Result<&Utf8Path> {
    Utf8Path::from_path(path).ok_or_else(|| Error::NonUtf8Path {
        path: path.to_path_buf(),
    })
}
