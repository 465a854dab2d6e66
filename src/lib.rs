//! Ensure a set of directories exists under a base location.
//!
//! ```no_run
//! let mut dirs = autodirs::auto_create_dirs(["cache", "logs"], "~")?;
//! let cache = dirs.get_or_create("cache")?;
//! # Ok::<(), autodirs::Error>(())
//! ```

pub mod error;
pub mod paths;
mod registry;

pub use error::{Error, Result};
pub use registry::{DirList, Registry};

/// Function-style shortcut for [`Registry::new`].
pub fn auto_create_dirs(dirs: impl Into<DirList>, base_dir: &str) -> Result<Registry> {
    Registry::new(dirs, base_dir)
}
