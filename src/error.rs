use std::io;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by [`Registry`](crate::Registry) and the path helpers.
#[derive(Debug, Error)]
pub enum Error {
    /// The base directory is not a literal, an existing file, or an existing path.
    #[error(
        "invalid base directory `{base_dir}`: expected an existing path or one of `~`, `HOME`, `ROOT`"
    )]
    InvalidBaseDirectory { base_dir: String },

    /// The host did not report a home directory.
    #[error("home directory could not be determined")]
    HomeDirUnavailable,

    /// A path handed to us by the host is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    /// The host filesystem rejected an operation on `path`.
    #[error("filesystem error at {path}")]
    Filesystem {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
